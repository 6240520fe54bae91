//! [`Device`] – the set of sensor modules one physical device exposes.
//!
//! Modules keep their registration order, which is the order the owner
//! negotiates them in.

use streamsel_types::StreamselError;

use crate::sensor::SensorModule;

/// Registry of [`SensorModule`] drivers belonging to one device.
#[derive(Default)]
pub struct Device {
    name: String,
    modules: Vec<Box<dyn SensorModule>>,
}

impl Device {
    /// Create an empty device.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modules: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a module.  Any previously registered module with the same
    /// name is replaced in place.
    pub fn register_module(&mut self, module: Box<dyn SensorModule>) {
        match self.modules.iter().position(|m| m.name() == module.name()) {
            Some(pos) => self.modules[pos] = module,
            None => self.modules.push(module),
        }
    }

    /// Look up a module by name.
    ///
    /// # Errors
    ///
    /// Returns [`StreamselError::SensorFault`] when no module with that name
    /// is registered.
    pub fn module(&self, name: &str) -> Result<&dyn SensorModule, StreamselError> {
        self.modules
            .iter()
            .find(|m| m.name() == name)
            .map(|m| m.as_ref())
            .ok_or_else(|| StreamselError::SensorFault {
                module: name.to_string(),
                details: format!("module '{name}' is not registered on {}", self.name),
            })
    }

    /// Every registered module in registration order.
    pub fn modules(&self) -> impl Iterator<Item = &dyn SensorModule> {
        self.modules.iter().map(|m| m.as_ref())
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
