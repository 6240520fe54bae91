//! [`PoseProfiles`] – selector for 6-DoF pose streams.
//!
//! Registers the same `enable_<stream>` / `<stream>_fps` pair as the motion
//! selector, but every enabled pose profile is acceptable: the fps parameter
//! is advertised and triggers a restart, yet it is not a match criterion.

use streamsel_params::ParameterRegistry;
use streamsel_types::{Catalog, ParamError, Profile, StreamKey};

use crate::manager::{ParamMap, ProfileManager, UpdateCallback};
use crate::motion::register_rate_params;
use crate::selector::ProfileSelector;

#[derive(Debug, Default)]
pub struct PoseProfiles {
    manager: ProfileManager,
    fps: ParamMap<f64>,
}

impl PoseProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn desired_fps(&self, key: StreamKey) -> f64 {
        self.fps.get(&key).map(|cell| cell.get()).unwrap_or(0.0)
    }
}

impl ProfileSelector for PoseProfiles {
    fn manager(&self) -> &ProfileManager {
        &self.manager
    }

    fn register_profile_parameters(
        &mut self,
        all_profiles: &Catalog,
        registry: &dyn ParameterRegistry,
        on_update: UpdateCallback,
    ) -> Result<(), ParamError> {
        let keys = self.manager.collect_profiles(all_profiles, Profile::is_pose);
        register_rate_params(registry, &keys, &mut self.manager, &mut self.fps, &on_update)
    }

    fn describe_wanted(&self, key: StreamKey) -> String {
        format!("{} with fps: {}", key.stream_name(), self.desired_fps(key))
    }
}
