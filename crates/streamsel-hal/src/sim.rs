//! [`SimSensor`] – in-process sensor module for tests and CI.
//!
//! A `SimSensor` serves a fixed [`Catalog`] without touching real hardware,
//! so the whole negotiation stack can run on a machine with no camera
//! attached.
//!
//! # Presets
//!
//! | Preset | Module name | Streams |
//! |---|---|---|
//! | [`SimSensor::stereo_module`] | `Stereo Module` | Depth (Z16), Infrared 1/2 (Y8) |
//! | [`SimSensor::rgb_camera`] | `RGB Camera` | Color (RGB8, BGR8, YUYV) |
//! | [`SimSensor::motion_module`] | `Motion Module` | Accel, Gyro |
//! | [`SimSensor::tracking_module`] | `Tracking Module` | Pose, Fisheye 1/2, Accel, Gyro |
//!
//! Defaults are flagged the way the devices flag them: 848×480 @ 30 for the
//! stereo streams, 1280×720 @ 30 RGB8 for color, 63 Hz accel, 200 Hz gyro.
//!
//! # Example
//!
//! ```rust
//! use streamsel_hal::sim::SimSensor;
//! use streamsel_hal::SensorModule;
//! use streamsel_types::{PixelFormat, Profile, StreamKind};
//!
//! let module = SimSensor::new("Stereo Module")
//!     .with_profile(Profile::video(StreamKind::Depth, 0, PixelFormat::Z16, 640, 480, 30).as_default());
//!
//! assert_eq!(module.enumerate_profiles().unwrap().len(), 1);
//! ```

use streamsel_types::{Catalog, PixelFormat, Profile, StreamKind, StreamselError};

use crate::device::Device;
use crate::sensor::SensorModule;

const STEREO_MODES: [(u32, u32, &[u32]); 3] = [
    (1280, 720, &[30, 15, 6]),
    (848, 480, &[90, 60, 30, 15, 6]),
    (640, 480, &[90, 60, 30, 15, 6]),
];

const COLOR_MODES: [(u32, u32, &[u32]); 3] = [
    (1920, 1080, &[30, 15, 6]),
    (1280, 720, &[30, 15, 6]),
    (640, 480, &[60, 30, 15, 6]),
];

/// Sensor module backed by a fixed catalog.
#[derive(Debug, Clone)]
pub struct SimSensor {
    name: String,
    catalog: Catalog,
}

impl SimSensor {
    /// Create a module with an empty catalog.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            catalog: Catalog::new(),
        }
    }

    /// Create a module serving `catalog`.
    pub fn from_catalog(name: impl Into<String>, catalog: Catalog) -> Self {
        Self {
            name: name.into(),
            catalog,
        }
    }

    /// Append one profile to the served catalog.
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.catalog.push(profile);
        self
    }

    /// Depth plus left/right infrared imagers.
    pub fn stereo_module() -> Self {
        let mut module = Self::new("Stereo Module");
        for (kind, index, format) in [
            (StreamKind::Depth, 0, PixelFormat::Z16),
            (StreamKind::Infrared, 1, PixelFormat::Y8),
            (StreamKind::Infrared, 2, PixelFormat::Y8),
        ] {
            for (width, height, rates) in STEREO_MODES {
                for &fps in rates {
                    let profile = Profile::video(kind, index, format, width, height, fps);
                    module = module.with_profile(if (width, height, fps) == (848, 480, 30) {
                        profile.as_default()
                    } else {
                        profile
                    });
                }
            }
            // Infrared is also offered unrectified at 16 bit.
            if kind == StreamKind::Infrared {
                module = module.with_profile(Profile::video(
                    kind,
                    index,
                    PixelFormat::Y16,
                    1280,
                    800,
                    25,
                ));
            }
        }
        module
    }

    /// Color imager.
    pub fn rgb_camera() -> Self {
        let mut module = Self::new("RGB Camera");
        for format in [PixelFormat::Rgb8, PixelFormat::Bgr8, PixelFormat::Yuyv] {
            for (width, height, rates) in COLOR_MODES {
                for &fps in rates {
                    let profile =
                        Profile::video(StreamKind::Color, 0, format, width, height, fps);
                    let is_default =
                        format == PixelFormat::Rgb8 && (width, height, fps) == (1280, 720, 30);
                    module = module.with_profile(if is_default {
                        profile.as_default()
                    } else {
                        profile
                    });
                }
            }
        }
        module
    }

    /// Accelerometer and gyroscope.
    pub fn motion_module() -> Self {
        Self::new("Motion Module")
            .with_profile(Profile::motion(StreamKind::Accel, 0, PixelFormat::MotionXyz32f, 63).as_default())
            .with_profile(Profile::motion(StreamKind::Accel, 0, PixelFormat::MotionXyz32f, 250))
            .with_profile(Profile::motion(StreamKind::Gyro, 0, PixelFormat::MotionXyz32f, 200).as_default())
            .with_profile(Profile::motion(StreamKind::Gyro, 0, PixelFormat::MotionXyz32f, 400))
    }

    /// Tracking camera: pose, two fisheye imagers and an IMU.
    pub fn tracking_module() -> Self {
        Self::new("Tracking Module")
            .with_profile(Profile::pose(StreamKind::Pose, 0, PixelFormat::SixDof, 200).as_default())
            .with_profile(Profile::video(StreamKind::Fisheye, 1, PixelFormat::Y8, 848, 800, 30).as_default())
            .with_profile(Profile::video(StreamKind::Fisheye, 2, PixelFormat::Y8, 848, 800, 30).as_default())
            .with_profile(Profile::motion(StreamKind::Accel, 0, PixelFormat::MotionXyz32f, 62).as_default())
            .with_profile(Profile::motion(StreamKind::Gyro, 0, PixelFormat::MotionXyz32f, 200).as_default())
    }

    /// Build a complete simulated device by preset name.
    ///
    /// Known presets: `d435`, `d435i`, `d455` (alias of `d435i`), `t265`.
    ///
    /// # Errors
    ///
    /// Returns [`StreamselError::SensorFault`] for an unknown preset.
    pub fn device(preset: &str) -> Result<Device, StreamselError> {
        let modules: Vec<SimSensor> = match preset.to_ascii_lowercase().as_str() {
            "d435" => vec![Self::stereo_module(), Self::rgb_camera()],
            "d435i" | "d455" => vec![
                Self::stereo_module(),
                Self::rgb_camera(),
                Self::motion_module(),
            ],
            "t265" => vec![Self::tracking_module()],
            other => {
                return Err(StreamselError::SensorFault {
                    module: other.to_string(),
                    details: format!("unknown simulated device preset '{other}'"),
                });
            }
        };
        let mut device = Device::new(preset);
        for module in modules {
            device.register_module(Box::new(module));
        }
        Ok(device)
    }
}

impl SensorModule for SimSensor {
    fn name(&self) -> &str {
        &self.name
    }

    fn enumerate_profiles(&self) -> Result<Catalog, StreamselError> {
        Ok(self.catalog.clone())
    }
}
