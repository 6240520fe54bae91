//! Generic `SensorModule` trait for profile-producing hardware.

use streamsel_types::{Catalog, StreamselError};

/// One sensor module of a device, e.g. the stereo depth module or the
/// inertial unit.
///
/// Drivers implement this trait and register themselves with a
/// [`Device`][crate::device::Device].
pub trait SensorModule: Send + Sync {
    /// Module name as reported by the device, e.g. `"Stereo Module"`.
    fn name(&self) -> &str;

    /// Enumerate every stream profile the module can produce, in device
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`StreamselError::SensorFault`] if the module cannot be
    /// queried (e.g. the device was unplugged).
    fn enumerate_profiles(&self) -> Result<Catalog, StreamselError>;

    /// Module name reduced to a parameter prefix: `"Stereo Module"` →
    /// `"stereo_module"`.
    fn parameter_prefix(&self) -> String {
        graph_resource_name(self.name())
    }
}

/// Lowercase `name` and replace every character that is not ASCII
/// alphanumeric with `_`.
pub fn graph_resource_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamsel_types::{PixelFormat, Profile, StreamKind};

    struct MockSensor {
        name: String,
    }

    impl SensorModule for MockSensor {
        fn name(&self) -> &str {
            &self.name
        }

        fn enumerate_profiles(&self) -> Result<Catalog, StreamselError> {
            Ok(vec![Profile::video(
                StreamKind::Depth,
                0,
                PixelFormat::Z16,
                640,
                480,
                30,
            )]
            .into())
        }
    }

    #[test]
    fn mock_sensor_enumerates() {
        let sensor = MockSensor {
            name: "Stereo Module".to_string(),
        };
        assert_eq!(sensor.name(), "Stereo Module");
        assert_eq!(sensor.enumerate_profiles().unwrap().len(), 1);
        assert_eq!(sensor.parameter_prefix(), "stereo_module");
    }

    #[test]
    fn graph_resource_name_replaces_separators() {
        assert_eq!(graph_resource_name("RGB Camera"), "rgb_camera");
        assert_eq!(graph_resource_name("L500-Depth Sensor"), "l500_depth_sensor");
    }
}
