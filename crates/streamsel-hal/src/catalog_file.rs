//! Device descriptions stored as TOML.
//!
//! A description lists the modules of one device and the profiles each
//! module advertises:
//!
//! ```toml
//! name = "bench-d435"
//!
//! [[modules]]
//! name = "Stereo Module"
//!
//! [[modules.profiles]]
//! stream = "depth"
//! format = "Z16"
//! fps = 30
//! default = true
//! class = "video"
//! width = 848
//! height = 480
//! ```
//!
//! Each module is served by a [`SimSensor`], so a captured description can
//! replay a real device's catalog offline.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use streamsel_types::{Catalog, Profile, StreamselError};
use tracing::debug;

use crate::device::Device;
use crate::sim::SimSensor;

/// On-disk form of a device.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceDescription {
    #[serde(default = "default_device_name")]
    pub name: String,
    #[serde(default)]
    pub modules: Vec<ModuleDescription>,
}

/// On-disk form of one sensor module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleDescription {
    pub name: String,
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

fn default_device_name() -> String {
    "device".to_string()
}

impl DeviceDescription {
    /// Build a [`Device`] whose modules serve the described catalogs.
    pub fn into_device(self) -> Device {
        let mut device = Device::new(self.name);
        for module in self.modules {
            let catalog: Catalog = module.profiles.into();
            device.register_module(Box::new(SimSensor::from_catalog(module.name, catalog)));
        }
        device
    }
}

/// Parse a device description from TOML text.
pub fn parse_description(raw: &str) -> Result<DeviceDescription, StreamselError> {
    toml::from_str(raw).map_err(|e| StreamselError::Parse(e.to_string()))
}

/// Read and parse a device description file.
pub fn load_description(path: &Path) -> Result<DeviceDescription, StreamselError> {
    let raw = fs::read_to_string(path).map_err(|e| StreamselError::Io {
        path: path.display().to_string(),
        details: e.to_string(),
    })?;
    let description = parse_description(&raw)?;
    debug!(
        path = %path.display(),
        modules = description.modules.len(),
        "loaded device description"
    );
    Ok(description)
}

/// Load a device description file straight into a [`Device`].
pub fn load_device(path: &Path) -> Result<Device, StreamselError> {
    load_description(path).map(DeviceDescription::into_device)
}

/// Serialize a description back to TOML.
pub fn to_toml(description: &DeviceDescription) -> Result<String, StreamselError> {
    toml::to_string_pretty(description).map_err(|e| StreamselError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::SensorModule;
    use streamsel_types::{PixelFormat, StreamKind};

    const BENCH: &str = r#"
        name = "bench"

        [[modules]]
        name = "Stereo Module"

        [[modules.profiles]]
        stream = "depth"
        format = "Z16"
        fps = 30
        default = true
        class = "video"
        width = 640
        height = 480

        [[modules.profiles]]
        stream = "depth"
        format = "Z16"
        fps = 30
        class = "video"
        width = 1280
        height = 720

        [[modules]]
        name = "Motion Module"

        [[modules.profiles]]
        stream = "gyro"
        format = "MOTION_XYZ32F"
        fps = 200
        class = "motion"
    "#;

    #[test]
    fn parse_bench_description() {
        let description = parse_description(BENCH).unwrap();
        assert_eq!(description.name, "bench");
        assert_eq!(description.modules.len(), 2);
        assert_eq!(description.modules[0].profiles.len(), 2);
        assert!(description.modules[0].profiles[0].is_default);
    }

    #[test]
    fn description_becomes_device() {
        let device = parse_description(BENCH).unwrap().into_device();
        let stereo = device.module("Stereo Module").unwrap();
        let catalog = stereo.enumerate_profiles().unwrap();
        assert_eq!(catalog.as_slice()[1].resolution(), Some((1280, 720)));
        let motion = device.module("Motion Module").unwrap();
        assert_eq!(motion.enumerate_profiles().unwrap().as_slice()[0].kind, StreamKind::Gyro);
    }

    #[test]
    fn malformed_description_is_parse_error() {
        let result = parse_description("[[modules]]\nname = 3");
        assert!(matches!(result, Err(StreamselError::Parse(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let result = load_device(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(StreamselError::Io { .. })));
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("device.toml");
        let description = DeviceDescription {
            name: "captured".to_string(),
            modules: vec![ModuleDescription {
                name: "RGB Camera".to_string(),
                profiles: vec![
                    Profile::video(StreamKind::Color, 0, PixelFormat::Rgb8, 1280, 720, 30)
                        .as_default(),
                ],
            }],
        };
        fs::write(&path, to_toml(&description).unwrap()).unwrap();

        let device = load_device(&path).unwrap();
        assert_eq!(device.name(), "captured");
        let catalog = device.module("RGB Camera").unwrap().enumerate_profiles().unwrap();
        assert_eq!(catalog.as_slice()[0].format, PixelFormat::Rgb8);
        assert!(catalog.as_slice()[0].is_default);
    }
}
