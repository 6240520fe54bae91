//! [`ParameterServer`] – in-memory [`ParameterRegistry`].
//!
//! Parameters are declared once with a default.  Startup overrides (for
//! example the `[parameters]` table of a config file) replace the default at
//! declaration time when their type is compatible.  Afterwards
//! [`ParameterServer::set`] routes every mutation through the handler
//! attached at declaration; only accepted values are stored and announced on
//! the [`ParameterEvent`] broadcast channel.
//!
//! # Type rules
//!
//! A parameter keeps the type of its default.  Integers are widened when the
//! declared type is a double; every other type change is rejected with
//! [`ParamError::TypeMismatch`].

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use streamsel_types::{ParamError, ParamValue};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::registry::{Parameter, ParameterRegistry, SetHandler};

/// Default capacity of the parameter event channel.
const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Announcement of an accepted parameter change.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterEvent {
    pub name: String,
    pub old_value: ParamValue,
    pub new_value: ParamValue,
    pub stamp: DateTime<Utc>,
}

type SharedHandler = Arc<dyn Fn(&ParamValue) -> Result<(), ParamError> + Send + Sync>;

struct Entry {
    value: ParamValue,
    on_set: SharedHandler,
    // Held from handler call to store so the bound cell and `value` agree.
    writer: Arc<Mutex<()>>,
}

/// Thread-safe in-memory parameter store.
pub struct ParameterServer {
    overrides: HashMap<String, ParamValue>,
    entries: Mutex<BTreeMap<String, Entry>>,
    events: broadcast::Sender<ParameterEvent>,
}

impl Default for ParameterServer {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterServer {
    /// Create an empty server without startup overrides.
    pub fn new() -> Self {
        Self::with_overrides(HashMap::new())
    }

    /// Create a server whose declarations resolve against `overrides`.
    pub fn with_overrides(overrides: HashMap<String, ParamValue>) -> Self {
        let (events, _) = broadcast::channel(DEFAULT_EVENT_CAPACITY);
        Self {
            overrides,
            entries: Mutex::new(BTreeMap::new()),
            events,
        }
    }

    /// Subscribe to accepted parameter changes.
    pub fn subscribe(&self) -> broadcast::Receiver<ParameterEvent> {
        self.events.subscribe()
    }

    /// Current value of `name`, if declared.
    pub fn get(&self, name: &str) -> Option<ParamValue> {
        self.lock().get(name).map(|entry| entry.value.clone())
    }

    /// Every declared parameter, sorted by name.
    pub fn list(&self) -> Vec<Parameter> {
        self.lock()
            .iter()
            .map(|(name, entry)| Parameter {
                name: name.clone(),
                value: entry.value.clone(),
            })
            .collect()
    }

    /// Mutate a declared parameter.
    ///
    /// The declaration handler runs without the store lock held, so it may
    /// read other parameters.  Writers of the same name are serialized from
    /// handler call to store, so the last handler to run is the last value
    /// stored; a handler must not `set` its own name.  The value is stored
    /// only when the handler accepts it.
    ///
    /// # Errors
    ///
    /// [`ParamError::NotDeclared`] for unknown names,
    /// [`ParamError::TypeMismatch`] for incompatible values, or whatever the
    /// declaration handler returns.
    pub fn set(&self, name: &str, value: ParamValue) -> Result<(), ParamError> {
        let (coerced, handler, writer) = {
            let entries = self.lock();
            let entry = entries
                .get(name)
                .ok_or_else(|| ParamError::NotDeclared(name.to_string()))?;
            (
                coerce(name, &entry.value, value)?,
                Arc::clone(&entry.on_set),
                Arc::clone(&entry.writer),
            )
        };

        let _write = match writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        handler(&coerced)?;

        let old_value = {
            let mut entries = self.lock();
            match entries.get_mut(name) {
                Some(entry) => std::mem::replace(&mut entry.value, coerced.clone()),
                None => return Err(ParamError::NotDeclared(name.to_string())),
            }
        };
        info!(parameter = name, value = %coerced, "parameter updated");

        // No subscribers is a normal condition.
        let _ = self.events.send(ParameterEvent {
            name: name.to_string(),
            old_value,
            new_value: coerced,
            stamp: Utc::now(),
        });
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Entry>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl ParameterRegistry for ParameterServer {
    fn declare(
        &self,
        name: &str,
        default: ParamValue,
        on_set: SetHandler,
    ) -> Result<ParamValue, ParamError> {
        let mut entries = self.lock();
        if entries.contains_key(name) {
            return Err(ParamError::AlreadyDeclared(name.to_string()));
        }

        let value = match self.overrides.get(name) {
            Some(over) => match coerce(name, &default, over.clone()) {
                Ok(v) => v,
                Err(e) => {
                    warn!(parameter = name, error = %e, "ignoring startup override");
                    default
                }
            },
            None => default,
        };
        debug!(parameter = name, value = %value, "declared parameter");

        entries.insert(
            name.to_string(),
            Entry {
                value: value.clone(),
                on_set: Arc::from(on_set),
                writer: Arc::new(Mutex::new(())),
            },
        );
        Ok(value)
    }
}

/// Convert `incoming` to the type of `declared`.
fn coerce(name: &str, declared: &ParamValue, incoming: ParamValue) -> Result<ParamValue, ParamError> {
    match (declared, incoming) {
        (ParamValue::Bool(_), v @ ParamValue::Bool(_))
        | (ParamValue::Integer(_), v @ ParamValue::Integer(_))
        | (ParamValue::Double(_), v @ ParamValue::Double(_))
        | (ParamValue::String(_), v @ ParamValue::String(_)) => Ok(v),
        (ParamValue::Double(_), ParamValue::Integer(i)) => Ok(ParamValue::Double(i as f64)),
        (declared, incoming) => Err(ParamError::TypeMismatch {
            name: name.to_string(),
            expected: declared.type_name(),
            actual: incoming.type_name(),
        }),
    }
}
