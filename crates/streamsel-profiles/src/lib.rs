//! `streamsel-profiles` – Stream Profile Negotiation
//!
//! Reconciles what a sensor module can produce with what the user asked
//! for, and keeps every selection criterion live as a dynamic parameter.
//!
//! # Modules
//!
//! - [`selector`] – [`ProfileSelector`][selector::ProfileSelector]: the
//!   per-class matching contract and the single selection pass written
//!   against it (first match wins, then manufacturer-default fallback).
//! - [`manager`] – [`ProfileManager`][manager::ProfileManager]: catalog and
//!   enable flags shared by all selectors, dynamic-parameter registration,
//!   and profile rendering for diagnostics.
//! - [`video`] – [`VideoProfiles`][video::VideoProfiles]: width, height, fps
//!   and pixel-format matching for image streams.
//! - [`motion`] – [`MotionProfiles`][motion::MotionProfiles]: per-stream fps
//!   matching for gyro and accel.
//! - [`pose`] – [`PoseProfiles`][pose::PoseProfiles]: accepts any enabled
//!   pose profile.
//! - [`module`] – [`SensorProfiles`][module::SensorProfiles]: runs all three
//!   selectors for one sensor module.
//! - [`naming`] – parameter-name derivation from templates.
//!
//! # Failure model
//!
//! Selection never fails.  An enabled stream without an exact match is
//! replaced by its manufacturer default or dropped, and reported through a
//! [`SelectionNotice`][selector::SelectionNotice] and a `tracing` warning.

pub mod manager;
pub mod module;
pub mod motion;
pub mod naming;
pub mod pose;
pub mod selector;
pub mod video;

pub use manager::{ParamMap, ProfileManager, UpdateCallback, describe_profile};
pub use module::{Negotiation, SensorProfiles};
pub use motion::MotionProfiles;
pub use naming::parameter_name;
pub use pose::PoseProfiles;
pub use selector::{KeyState, ProfileSelector, SelectionNotice};
pub use video::VideoProfiles;
