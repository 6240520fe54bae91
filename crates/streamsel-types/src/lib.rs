//! `streamsel-types` – shared vocabulary of the stream negotiation stack.
//!
//! Every crate in the workspace speaks in terms of these types:
//!
//! - [`StreamKind`] / [`StreamKey`] – identity of one logical stream
//!   (e.g. `Infrared/1`).
//! - [`Profile`] / [`ProfileClass`] – a read-only capability descriptor for
//!   one stream configuration a sensor can produce.
//! - [`Catalog`] – the ordered set of profiles a sensor module advertises.
//! - [`ParamValue`] – the dynamically typed value stored by a parameter
//!   registry.
//! - [`StreamselError`] / [`ParamError`] – error taxonomy.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ────────────────────────────────────────────────────────────────────────────
// Stream identity
// ────────────────────────────────────────────────────────────────────────────

/// Kind of data a stream carries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Depth,
    Color,
    Infrared,
    Fisheye,
    Gyro,
    Accel,
    Pose,
    Confidence,
}

impl StreamKind {
    /// Base of the graph-resource name used when deriving parameter names.
    pub fn resource_name(self) -> &'static str {
        match self {
            StreamKind::Depth => "depth",
            StreamKind::Color => "color",
            StreamKind::Infrared => "infra",
            StreamKind::Fisheye => "fisheye",
            StreamKind::Gyro => "gyro",
            StreamKind::Accel => "accel",
            StreamKind::Pose => "pose",
            StreamKind::Confidence => "confidence",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StreamKind::Depth => "Depth",
            StreamKind::Color => "Color",
            StreamKind::Infrared => "Infrared",
            StreamKind::Fisheye => "Fisheye",
            StreamKind::Gyro => "Gyro",
            StreamKind::Accel => "Accel",
            StreamKind::Pose => "Pose",
            StreamKind::Confidence => "Confidence",
        };
        f.write_str(name)
    }
}

/// `(kind, index)` identity of one logical stream instance.
///
/// Used as the map key for every per-stream parameter.  Ordering is by kind
/// first, then index, which keeps diagnostics in a stable order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StreamKey {
    pub kind: StreamKind,
    pub index: u32,
}

impl StreamKey {
    pub fn new(kind: StreamKind, index: u32) -> Self {
        Self { kind, index }
    }

    /// Canonical stream name: `depth`, `color`, `infra1`, `infra2`, `gyro`, …
    ///
    /// The index is only appended when it is non-zero.
    pub fn stream_name(&self) -> String {
        if self.index > 0 {
            format!("{}{}", self.kind.resource_name(), self.index)
        } else {
            self.kind.resource_name().to_string()
        }
    }
}

impl fmt::Display for StreamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind, self.index)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pixel formats
// ────────────────────────────────────────────────────────────────────────────

/// Pixel / sample encoding of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum PixelFormat {
    #[serde(rename = "Z16")]
    Z16,
    #[serde(rename = "Y8")]
    Y8,
    #[serde(rename = "Y16")]
    Y16,
    #[serde(rename = "RGB8")]
    Rgb8,
    #[serde(rename = "BGR8")]
    Bgr8,
    #[serde(rename = "RGBA8")]
    Rgba8,
    #[serde(rename = "BGRA8")]
    Bgra8,
    #[serde(rename = "YUYV")]
    Yuyv,
    #[serde(rename = "UYVY")]
    Uyvy,
    #[serde(rename = "RAW16")]
    Raw16,
    #[serde(rename = "MOTION_XYZ32F")]
    MotionXyz32f,
    #[serde(rename = "6DOF")]
    SixDof,
    #[serde(rename = "ANY")]
    Any,
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PixelFormat::Z16 => "Z16",
            PixelFormat::Y8 => "Y8",
            PixelFormat::Y16 => "Y16",
            PixelFormat::Rgb8 => "RGB8",
            PixelFormat::Bgr8 => "BGR8",
            PixelFormat::Rgba8 => "RGBA8",
            PixelFormat::Bgra8 => "BGRA8",
            PixelFormat::Yuyv => "YUYV",
            PixelFormat::Uyvy => "UYVY",
            PixelFormat::Raw16 => "RAW16",
            PixelFormat::MotionXyz32f => "MOTION_XYZ32F",
            PixelFormat::SixDof => "6DOF",
            PixelFormat::Any => "ANY",
        };
        f.write_str(name)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Profiles
// ────────────────────────────────────────────────────────────────────────────

/// Class-specific attributes of a [`Profile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "class", rename_all = "lowercase")]
pub enum ProfileClass {
    /// Image-producing stream (depth, infrared, color, fisheye).
    Video { width: u32, height: u32 },
    /// Inertial stream (gyro, accelerometer).
    Motion,
    /// 6-DoF pose stream.
    Pose,
}

/// One stream configuration a sensor module can produce.
///
/// Profiles are snapshots owned by a [`Catalog`]; selectors only read them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Profile {
    #[serde(rename = "stream")]
    pub kind: StreamKind,
    #[serde(default)]
    pub index: u32,
    pub format: PixelFormat,
    pub fps: u32,
    /// Manufacturer-declared default for this stream.
    #[serde(rename = "default", default)]
    pub is_default: bool,
    #[serde(flatten)]
    pub class: ProfileClass,
}

impl Profile {
    /// Build an image profile.
    pub fn video(
        kind: StreamKind,
        index: u32,
        format: PixelFormat,
        width: u32,
        height: u32,
        fps: u32,
    ) -> Self {
        Self {
            kind,
            index,
            format,
            fps,
            is_default: false,
            class: ProfileClass::Video { width, height },
        }
    }

    /// Build an inertial profile.
    pub fn motion(kind: StreamKind, index: u32, format: PixelFormat, fps: u32) -> Self {
        Self {
            kind,
            index,
            format,
            fps,
            is_default: false,
            class: ProfileClass::Motion,
        }
    }

    /// Build a pose profile.
    pub fn pose(kind: StreamKind, index: u32, format: PixelFormat, fps: u32) -> Self {
        Self {
            kind,
            index,
            format,
            fps,
            is_default: false,
            class: ProfileClass::Pose,
        }
    }

    /// Mark this profile as the manufacturer default for its stream.
    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    pub fn key(&self) -> StreamKey {
        StreamKey::new(self.kind, self.index)
    }

    pub fn is_video(&self) -> bool {
        matches!(self.class, ProfileClass::Video { .. })
    }

    pub fn is_motion(&self) -> bool {
        matches!(self.class, ProfileClass::Motion)
    }

    pub fn is_pose(&self) -> bool {
        matches!(self.class, ProfileClass::Pose)
    }

    /// `(width, height)` for image profiles, `None` otherwise.
    pub fn resolution(&self) -> Option<(u32, u32)> {
        match self.class {
            ProfileClass::Video { width, height } => Some((width, height)),
            _ => None,
        }
    }
}

/// Ordered, append-only sequence of [`Profile`]s advertised by one module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Catalog {
    #[serde(default)]
    profiles: Vec<Profile>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, profile: Profile) {
        self.profiles.push(profile);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Profile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn as_slice(&self) -> &[Profile] {
        &self.profiles
    }

    /// Distinct stream keys in order of first appearance.
    pub fn keys(&self) -> Vec<StreamKey> {
        let mut keys: Vec<StreamKey> = Vec::new();
        for profile in &self.profiles {
            let key = profile.key();
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }
}

impl From<Vec<Profile>> for Catalog {
    fn from(profiles: Vec<Profile>) -> Self {
        Self { profiles }
    }
}

impl FromIterator<Profile> for Catalog {
    fn from_iter<I: IntoIterator<Item = Profile>>(iter: I) -> Self {
        Self {
            profiles: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Profile;
    type IntoIter = std::slice::Iter<'a, Profile>;

    fn into_iter(self) -> Self::IntoIter {
        self.profiles.iter()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Parameter values
// ────────────────────────────────────────────────────────────────────────────

/// Dynamically typed value held by a parameter registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(String),
}

impl ParamValue {
    /// Short type name used in error messages and listings.
    pub fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Bool(_) => "bool",
            ParamValue::Integer(_) => "integer",
            ParamValue::Double(_) => "double",
            ParamValue::String(_) => "string",
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(v) => write!(f, "{v}"),
            ParamValue::Integer(v) => write!(f, "{v}"),
            ParamValue::Double(v) => write!(f, "{v}"),
            ParamValue::String(v) => f.write_str(v),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// Errors raised by a parameter registry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    #[error("parameter '{0}' is not declared")]
    NotDeclared(String),

    #[error("parameter '{0}' is already declared")]
    AlreadyDeclared(String),

    #[error("parameter '{name}' expects {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("parameter '{name}' rejected value: {reason}")]
    Rejected { name: String, reason: String },
}

/// Workspace-wide error type for catalog loading and module registration.
#[derive(Error, Debug)]
pub enum StreamselError {
    #[error("Parameter Error: {0}")]
    Param(#[from] ParamError),

    #[error("Catalog I/O Error on {path}: {details}")]
    Io { path: String, details: String },

    #[error("Catalog Parse Error: {0}")]
    Parse(String),

    #[error("Sensor Fault on {module}: {details}")]
    SensorFault { module: String, details: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_name_appends_non_zero_index() {
        assert_eq!(StreamKey::new(StreamKind::Depth, 0).stream_name(), "depth");
        assert_eq!(StreamKey::new(StreamKind::Infrared, 1).stream_name(), "infra1");
        assert_eq!(StreamKey::new(StreamKind::Infrared, 2).stream_name(), "infra2");
        assert_eq!(StreamKey::new(StreamKind::Gyro, 0).stream_name(), "gyro");
    }

    #[test]
    fn stream_key_display() {
        let key = StreamKey::new(StreamKind::Infrared, 1);
        assert_eq!(key.to_string(), "Infrared(1)");
    }

    #[test]
    fn stream_keys_order_by_kind_then_index() {
        let mut keys = vec![
            StreamKey::new(StreamKind::Infrared, 2),
            StreamKey::new(StreamKind::Depth, 0),
            StreamKey::new(StreamKind::Infrared, 1),
        ];
        keys.sort();
        assert_eq!(keys[0].kind, StreamKind::Depth);
        assert_eq!(keys[1], StreamKey::new(StreamKind::Infrared, 1));
    }

    #[test]
    fn pixel_format_display_uses_device_spelling() {
        assert_eq!(PixelFormat::Rgb8.to_string(), "RGB8");
        assert_eq!(PixelFormat::MotionXyz32f.to_string(), "MOTION_XYZ32F");
        assert_eq!(PixelFormat::SixDof.to_string(), "6DOF");
    }

    #[test]
    fn profile_classification() {
        let depth = Profile::video(StreamKind::Depth, 0, PixelFormat::Z16, 640, 480, 30);
        assert!(depth.is_video());
        assert_eq!(depth.resolution(), Some((640, 480)));
        assert!(!depth.is_default);
        assert!(depth.clone().as_default().is_default);

        let gyro = Profile::motion(StreamKind::Gyro, 0, PixelFormat::MotionXyz32f, 200);
        assert!(gyro.is_motion());
        assert!(gyro.resolution().is_none());

        let pose = Profile::pose(StreamKind::Pose, 0, PixelFormat::SixDof, 200);
        assert!(pose.is_pose());
        assert_eq!(pose.key(), StreamKey::new(StreamKind::Pose, 0));
    }

    #[test]
    fn catalog_keys_are_distinct_in_first_seen_order() {
        let catalog: Catalog = vec![
            Profile::video(StreamKind::Infrared, 1, PixelFormat::Y8, 640, 480, 30),
            Profile::video(StreamKind::Depth, 0, PixelFormat::Z16, 640, 480, 30),
            Profile::video(StreamKind::Infrared, 1, PixelFormat::Y8, 1280, 720, 30),
        ]
        .into();
        assert_eq!(catalog.len(), 3);
        assert_eq!(
            catalog.keys(),
            vec![
                StreamKey::new(StreamKind::Infrared, 1),
                StreamKey::new(StreamKind::Depth, 0)
            ]
        );
    }

    #[test]
    fn profile_json_shape() {
        let profile =
            Profile::video(StreamKind::Depth, 0, PixelFormat::Z16, 848, 480, 30).as_default();
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["stream"], "depth");
        assert_eq!(json["class"], "video");
        assert_eq!(json["width"], 848);
        assert_eq!(json["default"], true);
        let back: Profile = serde_json::from_value(json).unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn catalog_parses_from_toml() {
        let raw = r#"
            [[profiles]]
            stream = "gyro"
            format = "MOTION_XYZ32F"
            fps = 200
            class = "motion"

            [[profiles]]
            stream = "infrared"
            index = 1
            format = "Y8"
            fps = 30
            default = true
            class = "video"
            width = 640
            height = 480
        "#;
        let catalog: Catalog = toml::from_str(raw).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.as_slice()[0].is_motion());
        let ir = &catalog.as_slice()[1];
        assert_eq!(ir.key(), StreamKey::new(StreamKind::Infrared, 1));
        assert!(ir.is_default);
        assert_eq!(ir.resolution(), Some((640, 480)));
    }

    #[test]
    fn param_value_untagged_serde() {
        let v: ParamValue = serde_json::from_str("true").unwrap();
        assert_eq!(v, ParamValue::Bool(true));
        let v: ParamValue = serde_json::from_str("30").unwrap();
        assert_eq!(v, ParamValue::Integer(30));
        let v: ParamValue = serde_json::from_str("200.0").unwrap();
        assert_eq!(v, ParamValue::Double(200.0));
        assert_eq!(v.type_name(), "double");
    }

    #[test]
    fn error_display() {
        let err = StreamselError::from(ParamError::NotDeclared("enable_depth".into()));
        assert!(err.to_string().contains("enable_depth"));

        let err = ParamError::TypeMismatch {
            name: "depth_module.width".into(),
            expected: "integer",
            actual: "string",
        };
        assert!(err.to_string().contains("expects integer"));
    }
}
