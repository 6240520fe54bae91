//! Negotiation session – one device, one parameter server, one
//! [`SensorProfiles`] per module.
//!
//! The restart hook handed to each module only raises a flag.  The session
//! drains those flags after every parameter change and re-negotiates the
//! flagged modules one at a time, so at most one re-negotiation is ever in
//! flight.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use streamsel_hal::Device;
use streamsel_params::{Parameter, ParameterServer};
use streamsel_profiles::{Negotiation, SensorProfiles};
use streamsel_types::{ParamError, ParamValue, StreamKey, StreamselError};
use tracing::info;

struct ModuleSession {
    profiles: SensorProfiles,
    restart_requested: Arc<AtomicBool>,
}

/// Live negotiation state for one device.
pub struct Session {
    device: Device,
    server: ParameterServer,
    modules: Vec<ModuleSession>,
}

impl Session {
    /// Register every module of `device` against a fresh parameter server
    /// seeded with `overrides`.
    pub fn start(
        device: Device,
        overrides: HashMap<String, ParamValue>,
    ) -> Result<Self, StreamselError> {
        let server = ParameterServer::with_overrides(overrides);
        let mut modules = Vec::new();
        for module in device.modules() {
            let flag = Arc::new(AtomicBool::new(false));
            let hook_flag = Arc::clone(&flag);
            let module_name = module.name().to_string();
            let profiles = SensorProfiles::register(
                module,
                &server,
                Arc::new(move || {
                    info!(module = %module_name, "restart requested");
                    hook_flag.store(true, Ordering::SeqCst);
                }),
            )?;
            modules.push(ModuleSession {
                profiles,
                restart_requested: flag,
            });
        }
        Ok(Self {
            device,
            server,
            modules,
        })
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Every declared parameter, sorted by name.
    pub fn parameters(&self) -> Vec<Parameter> {
        self.server.list()
    }

    /// Enabled streams of the module called `module`; empty for unknown
    /// modules.
    pub fn enabled_streams(&self, module: &str) -> Vec<StreamKey> {
        self.modules
            .iter()
            .find(|m| m.profiles.module_name() == module)
            .map(|m| m.profiles.enabled_streams())
            .unwrap_or_default()
    }

    /// Negotiate every module that has an enabled stream.
    pub fn negotiate(&self) -> Vec<(String, Negotiation)> {
        self.modules
            .iter()
            .filter(|m| m.profiles.is_any_enabled())
            .map(|m| (m.profiles.module_name().to_string(), m.profiles.negotiate()))
            .collect()
    }

    /// Set a parameter from its textual form and re-negotiate the modules
    /// whose restart hook fired.
    pub fn set(&self, name: &str, raw: &str) -> Result<Vec<(String, Negotiation)>, ParamError> {
        self.server.set(name, parse_value(raw))?;
        Ok(self.drain_restarts())
    }

    fn drain_restarts(&self) -> Vec<(String, Negotiation)> {
        let mut restarted = Vec::new();
        for module in &self.modules {
            if module.restart_requested.swap(false, Ordering::SeqCst) {
                restarted.push((
                    module.profiles.module_name().to_string(),
                    module.profiles.negotiate(),
                ));
            }
        }
        restarted
    }
}

/// Interpret command-line text as a parameter value: `true`/`false`, then
/// integer, then floating point, otherwise a string.
pub fn parse_value(raw: &str) -> ParamValue {
    let raw = raw.trim();
    match raw {
        "true" => return ParamValue::Bool(true),
        "false" => return ParamValue::Bool(false),
        _ => {}
    }
    if let Ok(i) = raw.parse::<i64>() {
        return ParamValue::Integer(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return ParamValue::Double(f);
    }
    ParamValue::String(raw.to_string())
}
