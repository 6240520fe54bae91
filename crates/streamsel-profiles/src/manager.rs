//! [`ProfileManager`] – state shared by every profile selector.
//!
//! Holds the catalog slice a selector is responsible for and the per-stream
//! enable flags, and knows how to turn a set of [`StreamKey`]s into live
//! dynamic parameters.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use streamsel_params::{ParamCell, ParamType, Parameter, ParameterRegistry, bind};
use streamsel_types::{Catalog, ParamError, Profile, ProfileClass, StreamKey};
use tracing::debug;

use crate::naming::parameter_name;

/// Restart hook supplied by the owner of a sensor module.  Invoked whenever
/// a parameter that requires re-negotiation changes.
pub type UpdateCallback = Arc<dyn Fn() + Send + Sync>;

/// Per-stream dynamic parameter cells.
pub type ParamMap<T> = BTreeMap<StreamKey, ParamCell<T>>;

/// Catalog and enable flags of one selector.
#[derive(Debug, Default)]
pub struct ProfileManager {
    catalog: Catalog,
    enabled: ParamMap<bool>,
}

impl ProfileManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Profiles this selector negotiates over, in device order.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Append every profile of `all` accepted by `filter` and return the
    /// distinct keys that were appended.
    pub fn collect_profiles(
        &mut self,
        all: &Catalog,
        filter: impl Fn(&Profile) -> bool,
    ) -> BTreeSet<StreamKey> {
        let mut keys = BTreeSet::new();
        for profile in all.iter().filter(|&p| filter(p)) {
            keys.insert(profile.key());
            self.catalog.push(profile.clone());
        }
        keys
    }

    /// Current value of the enable flag for `key`; absent flags read as
    /// disabled.
    pub fn is_enabled(&self, key: StreamKey) -> bool {
        self.enabled.get(&key).map(ParamCell::get).unwrap_or(false)
    }

    /// Keys whose enable flag currently reads `true`.
    pub fn enabled_keys(&self) -> Vec<StreamKey> {
        self.enabled
            .iter()
            .filter(|(_, cell)| cell.get())
            .map(|(key, _)| *key)
            .collect()
    }

    /// Whether any enable flag was registered at all.
    pub fn has_enabled_flags(&self) -> bool {
        !self.enabled.is_empty()
    }

    /// Register `enable_<stream>` (default `true`) for every key.
    pub fn register_enable_flags(
        &mut self,
        registry: &dyn ParameterRegistry,
        keys: &BTreeSet<StreamKey>,
        on_update: &UpdateCallback,
    ) -> Result<(), ParamError> {
        register_sensor_update_param(registry, "enable_%s", keys, &mut self.enabled, true, on_update)
    }
}

/// Register one dynamic parameter per key whose change requires a sensor
/// update.
///
/// For each key the parameter name is `template` with the key's canonical
/// stream name substituted, its cell lives in `params[key]` and starts at
/// `value` (or the registry's startup override), and every accepted change
/// invokes `on_update`.
pub fn register_sensor_update_param<T: ParamType>(
    registry: &dyn ParameterRegistry,
    template: &str,
    keys: &BTreeSet<StreamKey>,
    params: &mut ParamMap<T>,
    value: T,
    on_update: &UpdateCallback,
) -> Result<(), ParamError> {
    for key in keys {
        let name = parameter_name(template, &key.stream_name());
        let cell = params
            .entry(*key)
            .or_insert_with(|| ParamCell::new(value.clone()))
            .clone();
        let update = Arc::clone(on_update);
        bind(
            registry,
            &name,
            value.clone(),
            &cell,
            Arc::new(move |_: &Parameter| update()),
        )?;
        debug!(parameter = %name, stream = %key, "registered sensor update parameter");
    }
    Ok(())
}

/// Human-readable rendering of a profile.
///
/// Image profiles:
/// `stream_type: Depth(0), Format: Z16, Width: 640, Height: 480, FPS: 30`;
/// everything else: `stream_type: Gyro(0), Format: MOTION_XYZ32F, FPS: 200`.
pub fn describe_profile(profile: &Profile) -> String {
    match profile.class {
        ProfileClass::Video { width, height } => format!(
            "stream_type: {}, Format: {}, Width: {}, Height: {}, FPS: {}",
            profile.key(),
            profile.format,
            width,
            height,
            profile.fps
        ),
        ProfileClass::Motion | ProfileClass::Pose => format!(
            "stream_type: {}, Format: {}, FPS: {}",
            profile.key(),
            profile.format,
            profile.fps
        ),
    }
}
