//! [`VideoProfiles`] – selector for image-producing streams.
//!
//! A profile is wanted only when width, height, frame rate **and** pixel
//! format all agree with the desired configuration.  The format constraint
//! comes from a fixed policy table (depth must be `Z16`, infrared must be
//! `Y8`); kinds absent from the table accept any format.
//!
//! # Parameters
//!
//! | Name | Type | Default | On change |
//! |---|---|---|---|
//! | `enable_<stream>` | bool | `true` | restart hook |
//! | `<module>.width` | integer | 640 | advisory warning only |
//! | `<module>.height` | integer | 480 | advisory warning only |
//! | `<module>.fps` | integer | 30 | advisory warning only |

use std::collections::HashMap;
use std::sync::Arc;

use streamsel_params::{ParamCell, Parameter, ParameterRegistry, bind};
use streamsel_types::{Catalog, ParamError, PixelFormat, Profile, ProfileClass, StreamKey, StreamKind};
use tracing::{debug, warn};

use crate::manager::{ProfileManager, UpdateCallback, describe_profile};
use crate::selector::ProfileSelector;

pub const IMAGE_WIDTH: i64 = 640;
pub const IMAGE_HEIGHT: i64 = 480;
pub const IMAGE_FPS: i64 = 30;

/// Selector for depth, infrared, color and fisheye streams of one module.
#[derive(Debug)]
pub struct VideoProfiles {
    manager: ProfileManager,
    module_name: String,
    width: ParamCell<i64>,
    height: ParamCell<i64>,
    fps: ParamCell<i64>,
    allowed_formats: HashMap<StreamKind, PixelFormat>,
}

impl VideoProfiles {
    /// `module_name` prefixes the module-scoped parameters, e.g.
    /// `"depth_module"` → `depth_module.width`.
    pub fn new(module_name: impl Into<String>) -> Self {
        let allowed_formats = HashMap::from([
            (StreamKind::Depth, PixelFormat::Z16),
            (StreamKind::Infrared, PixelFormat::Y8),
        ]);
        Self {
            manager: ProfileManager::new(),
            module_name: module_name.into(),
            width: ParamCell::new(IMAGE_WIDTH),
            height: ParamCell::new(IMAGE_HEIGHT),
            fps: ParamCell::new(IMAGE_FPS),
            allowed_formats,
        }
    }

    /// Currently desired `(width, height, fps)`.
    pub fn desired(&self) -> (i64, i64, i64) {
        (self.width.get(), self.height.get(), self.fps.get())
    }

    fn register_video_sensor_params(
        &self,
        registry: &dyn ParameterRegistry,
    ) -> Result<(), ParamError> {
        for (suffix, default, cell) in [
            ("width", IMAGE_WIDTH, &self.width),
            ("height", IMAGE_HEIGHT, &self.height),
            ("fps", IMAGE_FPS, &self.fps),
        ] {
            let name = format!("{}.{}", self.module_name, suffix);
            debug!("reading parameter: {name}");
            bind(
                registry,
                &name,
                default,
                cell,
                Arc::new(|p: &Parameter| {
                    warn!(parameter = %p.name, "re-enable the stream for the change to take effect.");
                }),
            )?;
        }
        Ok(())
    }
}

impl ProfileSelector for VideoProfiles {
    fn manager(&self) -> &ProfileManager {
        &self.manager
    }

    fn register_profile_parameters(
        &mut self,
        all_profiles: &Catalog,
        registry: &dyn ParameterRegistry,
        on_update: UpdateCallback,
    ) -> Result<(), ParamError> {
        let keys = self.manager.collect_profiles(all_profiles, Profile::is_video);
        if keys.is_empty() {
            return Ok(());
        }
        self.manager.register_enable_flags(registry, &keys, &on_update)?;
        self.register_video_sensor_params(registry)
    }

    fn is_wanted_profile(&self, profile: &Profile) -> bool {
        let ProfileClass::Video { width, height } = profile.class else {
            return false;
        };
        debug!("Sensor profile: {}", describe_profile(profile));

        let format_ok = self
            .allowed_formats
            .get(&profile.kind)
            .is_none_or(|allowed| *allowed == profile.format);

        i64::from(width) == self.width.get()
            && i64::from(height) == self.height.get()
            && i64::from(profile.fps) == self.fps.get()
            && format_ok
    }

    fn describe_wanted(&self, key: StreamKey) -> String {
        format!(
            "{} with width: {}, height: {}, fps: {}",
            key.stream_name(),
            self.width.get(),
            self.height.get(),
            self.fps.get()
        )
    }

    fn has_any_enabled_stream(&self) -> bool {
        self.manager
            .catalog()
            .iter()
            .any(|p| p.is_video() && self.manager.is_enabled(p.key()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::SelectionNotice;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use streamsel_params::ParameterServer;
    use streamsel_types::ParamValue;

    fn registered(profiles: Vec<Profile>) -> (VideoProfiles, ParameterServer, Arc<AtomicUsize>) {
        let server = ParameterServer::new();
        let restarts = Arc::new(AtomicUsize::new(0));
        let counter = restarts.clone();
        let mut video = VideoProfiles::new("depth_module");
        video
            .register_profile_parameters(
                &profiles.into(),
                &server,
                Arc::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();
        (video, server, restarts)
    }

    fn depth(width: u32, height: u32, fps: u32) -> Profile {
        Profile::video(StreamKind::Depth, 0, PixelFormat::Z16, width, height, fps)
    }

    #[test]
    fn registers_enable_flags_and_module_parameters() {
        let (_video, server, _) = registered(vec![
            depth(640, 480, 30),
            Profile::video(StreamKind::Infrared, 1, PixelFormat::Y8, 640, 480, 30),
            Profile::motion(StreamKind::Gyro, 0, PixelFormat::MotionXyz32f, 200),
        ]);
        assert_eq!(server.get("enable_depth"), Some(ParamValue::Bool(true)));
        assert_eq!(server.get("enable_infra1"), Some(ParamValue::Bool(true)));
        assert_eq!(server.get("enable_gyro"), None);
        assert_eq!(server.get("depth_module.width"), Some(ParamValue::Integer(640)));
        assert_eq!(server.get("depth_module.height"), Some(ParamValue::Integer(480)));
        assert_eq!(server.get("depth_module.fps"), Some(ParamValue::Integer(30)));
    }

    #[test]
    fn color_with_two_defaults_falls_back_to_the_later_one() {
        let rgb8 = Profile::video(StreamKind::Color, 0, PixelFormat::Rgb8, 1280, 720, 30).as_default();
        let bgr8 = Profile::video(StreamKind::Color, 0, PixelFormat::Bgr8, 1280, 720, 30).as_default();
        let (video, _server, _) = registered(vec![rgb8, bgr8.clone()]);

        // Policy defaults ask for 640x480, so neither profile matches.
        let mut wanted = Vec::new();
        let notices = video.select_wanted_profiles(&mut wanted);
        assert_eq!(wanted, vec![bgr8]);
        assert_eq!(notices.len(), 1);
        assert!(notices[0].to_string().ends_with("Format: BGR8, Width: 1280, Height: 720, FPS: 30"));
    }

    #[test]
    fn no_video_profiles_registers_nothing() {
        let (video, server, _) = registered(vec![Profile::motion(
            StreamKind::Accel,
            0,
            PixelFormat::MotionXyz32f,
            63,
        )]);
        assert!(server.list().is_empty());
        assert!(!video.has_any_enabled_stream());
    }

    #[test]
    fn exact_match_is_selected_without_notice() {
        let (video, _, _) = registered(vec![depth(640, 480, 30).as_default(), depth(1280, 720, 30)]);
        let mut wanted = Vec::new();
        let notices = video.select_wanted_profiles(&mut wanted);
        assert_eq!(wanted, vec![depth(640, 480, 30).as_default()]);
        assert!(notices.is_empty());
    }

    #[test]
    fn width_change_without_match_falls_back_to_default() {
        let (video, server, restarts) =
            registered(vec![depth(640, 480, 30).as_default(), depth(1280, 720, 30)]);
        server
            .set("depth_module.width", ParamValue::Integer(848))
            .unwrap();
        // Resolution changes only advise; they do not restart the sensor.
        assert_eq!(restarts.load(Ordering::SeqCst), 0);
        assert_eq!(video.desired(), (848, 480, 30));

        let mut wanted = Vec::new();
        let notices = video.select_wanted_profiles(&mut wanted);
        assert_eq!(wanted, vec![depth(640, 480, 30).as_default()]);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].key(), StreamKey::new(StreamKind::Depth, 0));
        assert_eq!(
            notices[0].to_string(),
            "Could not find a match for profile: depth with width: 848, height: 480, fps: 30 \
             : Using Default: stream_type: Depth(0), Format: Z16, Width: 640, Height: 480, FPS: 30"
        );
    }

    #[test]
    fn each_dimension_is_required() {
        let (video, _, _) = registered(vec![depth(640, 480, 30)]);
        assert!(video.is_wanted_profile(&depth(640, 480, 30)));
        assert!(!video.is_wanted_profile(&depth(848, 480, 30)));
        assert!(!video.is_wanted_profile(&depth(640, 360, 30)));
        assert!(!video.is_wanted_profile(&depth(640, 480, 15)));
        assert!(!video.is_wanted_profile(&Profile::video(
            StreamKind::Depth,
            0,
            PixelFormat::Y16,
            640,
            480,
            30
        )));
    }

    #[test]
    fn infrared_requires_y8_and_color_accepts_any_format() {
        let (video, _, _) = registered(vec![depth(640, 480, 30)]);
        let ir = |format| Profile::video(StreamKind::Infrared, 1, format, 640, 480, 30);
        assert!(video.is_wanted_profile(&ir(PixelFormat::Y8)));
        assert!(!video.is_wanted_profile(&ir(PixelFormat::Y16)));

        let color = |format| Profile::video(StreamKind::Color, 0, format, 640, 480, 30);
        assert!(video.is_wanted_profile(&color(PixelFormat::Rgb8)));
        assert!(video.is_wanted_profile(&color(PixelFormat::Yuyv)));
    }

    #[test]
    fn non_video_profiles_never_match() {
        let (video, _, _) = registered(vec![depth(640, 480, 30)]);
        assert!(!video.is_wanted_profile(&Profile::motion(
            StreamKind::Gyro,
            0,
            PixelFormat::MotionXyz32f,
            30
        )));
    }

    #[test]
    fn enable_flag_restarts_and_disables_stream() {
        let (video, server, restarts) = registered(vec![depth(640, 480, 30)]);
        assert!(video.has_any_enabled_stream());

        server.set("enable_depth", ParamValue::Bool(false)).unwrap();
        assert_eq!(restarts.load(Ordering::SeqCst), 1);
        assert!(!video.has_any_enabled_stream());

        let mut wanted = Vec::new();
        assert!(video.select_wanted_profiles(&mut wanted).is_empty());
        assert!(wanted.is_empty());
    }

    #[test]
    fn unmatched_without_default_reports_no_default() {
        let (video, _, _) = registered(vec![depth(1280, 720, 30)]);
        let mut wanted = Vec::new();
        let notices = video.select_wanted_profiles(&mut wanted);
        assert!(wanted.is_empty());
        assert!(matches!(notices.as_slice(), [SelectionNotice::NoDefault { .. }]));
    }

    #[test]
    fn startup_overrides_shape_the_first_selection() {
        let server = ParameterServer::with_overrides(HashMap::from([
            ("rgb_camera.width".to_string(), ParamValue::Integer(1280)),
            ("rgb_camera.height".to_string(), ParamValue::Integer(720)),
        ]));
        let color = |w, h| Profile::video(StreamKind::Color, 0, PixelFormat::Rgb8, w, h, 30);
        let mut video = VideoProfiles::new("rgb_camera");
        video
            .register_profile_parameters(
                &vec![color(640, 480), color(1280, 720)].into(),
                &server,
                Arc::new(|| {}),
            )
            .unwrap();
        let mut wanted = Vec::new();
        video.select_wanted_profiles(&mut wanted);
        assert_eq!(wanted, vec![color(1280, 720)]);
    }
}
