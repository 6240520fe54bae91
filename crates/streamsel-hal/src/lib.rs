//! `streamsel-hal` – the sensor layer as seen by the negotiation core.
//!
//! # Modules
//!
//! - [`sensor`] – [`SensorModule`][sensor::SensorModule]: one sensor module
//!   of a device (e.g. `"Stereo Module"`) that can enumerate its stream
//!   profiles.
//! - [`device`] – [`Device`][device::Device]: registry of the modules that
//!   make up one physical device, looked up by module name.
//! - [`sim`] – [`SimSensor`][sim::SimSensor]: in-process module backed by a
//!   fixed catalog, with presets modelled on common depth cameras.
//! - [`catalog_file`] – load a whole device description from a TOML file.

pub mod catalog_file;
pub mod device;
pub mod sensor;
pub mod sim;

pub use device::Device;
pub use sensor::SensorModule;
pub use sim::SimSensor;
