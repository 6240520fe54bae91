//! [`MotionProfiles`] – selector for inertial streams (gyro, accelerometer).
//!
//! Motion profiles carry no resolution, so the only criterion is the frame
//! rate requested per stream through `<stream>_fps`.

use std::collections::BTreeSet;

use streamsel_params::ParameterRegistry;
use streamsel_types::{Catalog, ParamError, Profile, StreamKey};

use crate::manager::{ParamMap, ProfileManager, UpdateCallback, register_sensor_update_param};
use crate::selector::ProfileSelector;

/// Selector for gyro and accel streams.
#[derive(Debug, Default)]
pub struct MotionProfiles {
    manager: ProfileManager,
    fps: ParamMap<f64>,
}

impl MotionProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Desired rate of `key`; unregistered keys read as `0.0`.
    pub fn desired_fps(&self, key: StreamKey) -> f64 {
        self.fps.get(&key).map(|cell| cell.get()).unwrap_or(0.0)
    }
}

impl ProfileSelector for MotionProfiles {
    fn manager(&self) -> &ProfileManager {
        &self.manager
    }

    fn register_profile_parameters(
        &mut self,
        all_profiles: &Catalog,
        registry: &dyn ParameterRegistry,
        on_update: UpdateCallback,
    ) -> Result<(), ParamError> {
        let keys = self.manager.collect_profiles(all_profiles, Profile::is_motion);
        register_rate_params(registry, &keys, &mut self.manager, &mut self.fps, &on_update)
    }

    fn is_wanted_profile(&self, profile: &Profile) -> bool {
        f64::from(profile.fps) == self.desired_fps(profile.key())
    }

    fn describe_wanted(&self, key: StreamKey) -> String {
        format!("{} with fps: {}", key.stream_name(), self.desired_fps(key))
    }
}

/// Register `enable_<stream>` and `<stream>_fps` for every key, both wired
/// to the restart hook.
pub(crate) fn register_rate_params(
    registry: &dyn ParameterRegistry,
    keys: &BTreeSet<StreamKey>,
    manager: &mut ProfileManager,
    fps: &mut ParamMap<f64>,
    on_update: &UpdateCallback,
) -> Result<(), ParamError> {
    manager.register_enable_flags(registry, keys, on_update)?;
    register_sensor_update_param(registry, "%s_fps", keys, fps, 0.0, on_update)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::SelectionNotice;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use streamsel_params::ParameterServer;
    use streamsel_types::{ParamValue, PixelFormat, StreamKind};

    fn gyro(fps: u32) -> Profile {
        Profile::motion(StreamKind::Gyro, 0, PixelFormat::MotionXyz32f, fps)
    }

    fn accel(fps: u32) -> Profile {
        Profile::motion(StreamKind::Accel, 0, PixelFormat::MotionXyz32f, fps)
    }

    fn imu_catalog() -> Catalog {
        vec![accel(63).as_default(), accel(250), gyro(200).as_default(), gyro(400)].into()
    }

    fn registered(server: &ParameterServer) -> (MotionProfiles, Arc<AtomicUsize>) {
        let restarts = Arc::new(AtomicUsize::new(0));
        let counter = restarts.clone();
        let mut motion = MotionProfiles::new();
        motion
            .register_profile_parameters(
                &imu_catalog(),
                server,
                Arc::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();
        (motion, restarts)
    }

    #[test]
    fn registers_enable_and_fps_per_stream() {
        let server = ParameterServer::new();
        let _ = registered(&server);
        assert_eq!(server.get("enable_gyro"), Some(ParamValue::Bool(true)));
        assert_eq!(server.get("enable_accel"), Some(ParamValue::Bool(true)));
        assert_eq!(server.get("gyro_fps"), Some(ParamValue::Double(0.0)));
        assert_eq!(server.get("accel_fps"), Some(ParamValue::Double(0.0)));
    }

    #[test]
    fn unset_rates_fall_back_to_defaults() {
        let server = ParameterServer::new();
        let (motion, _) = registered(&server);
        let mut wanted = Vec::new();
        let notices = motion.select_wanted_profiles(&mut wanted);
        // Fallbacks are appended in stream-key order, gyro before accel.
        assert_eq!(wanted, vec![gyro(200).as_default(), accel(63).as_default()]);
        assert_eq!(notices.len(), 2);
        assert!(notices.iter().all(|n| matches!(n, SelectionNotice::DefaultSubstituted { .. })));
        assert!(notices[0].to_string().contains("gyro with fps: 0"));
        assert!(notices[1].to_string().contains("accel with fps: 0"));
    }

    #[test]
    fn fps_change_selects_match_and_restarts() {
        let server = ParameterServer::new();
        let (motion, restarts) = registered(&server);
        server.set("gyro_fps", ParamValue::Integer(400)).unwrap();
        server.set("accel_fps", ParamValue::Double(250.0)).unwrap();
        assert_eq!(restarts.load(Ordering::SeqCst), 2);

        let mut wanted = Vec::new();
        let notices = motion.select_wanted_profiles(&mut wanted);
        assert_eq!(wanted, vec![accel(250), gyro(400)]);
        assert!(notices.is_empty());
    }

    #[test]
    fn predicate_ignores_format_and_depends_on_fps() {
        let server = ParameterServer::with_overrides(HashMap::from([(
            "gyro_fps".to_string(),
            ParamValue::Double(200.0),
        )]));
        let (motion, _) = registered(&server);
        let mut other_format = gyro(200);
        other_format.format = PixelFormat::Any;
        assert!(motion.is_wanted_profile(&gyro(200)));
        assert!(motion.is_wanted_profile(&other_format));
        assert!(!motion.is_wanted_profile(&gyro(400)));
    }

    #[test]
    fn disabled_stream_is_not_requested() {
        let server = ParameterServer::new();
        let (motion, restarts) = registered(&server);
        server.set("enable_accel", ParamValue::Bool(false)).unwrap();
        assert_eq!(restarts.load(Ordering::SeqCst), 1);

        let mut wanted = Vec::new();
        motion.select_wanted_profiles(&mut wanted);
        assert_eq!(wanted, vec![gyro(200).as_default()]);
        assert!(motion.has_any_enabled_stream());
    }

    #[test]
    fn no_motion_profiles_means_no_stream() {
        let server = ParameterServer::new();
        let mut motion = MotionProfiles::new();
        motion
            .register_profile_parameters(
                &vec![Profile::video(StreamKind::Depth, 0, PixelFormat::Z16, 640, 480, 30)].into(),
                &server,
                Arc::new(|| {}),
            )
            .unwrap();
        assert!(!motion.has_any_enabled_stream());
        assert!(server.list().is_empty());
    }
}
