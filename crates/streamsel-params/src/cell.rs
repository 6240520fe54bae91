//! [`ParamCell`] – a value slot shared between a registry and its reader.
//!
//! A registry callback replaces the whole value under the write lock and a
//! selection pass reads a clone under the read lock, so readers never see a
//! half-written value.

use std::sync::{Arc, RwLock};

use streamsel_types::ParamValue;

/// Shared, thread-safe slot holding the latest accepted parameter value.
///
/// Cloning a cell yields another handle to the same slot.
#[derive(Debug, Default)]
pub struct ParamCell<T> {
    inner: Arc<RwLock<T>>,
}

impl<T> Clone for ParamCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone> ParamCell<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(value)),
        }
    }

    /// Return a copy of the current value.
    pub fn get(&self) -> T {
        // A poisoned lock still holds a fully written value.
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the current value.
    pub fn set(&self, value: T) {
        match self.inner.write() {
            Ok(mut guard) => *guard = value,
            Err(poisoned) => *poisoned.into_inner() = value,
        }
    }
}

/// Conversion between a Rust value type and [`ParamValue`].
pub trait ParamType: Clone + Send + Sync + 'static {
    /// Type name reported in mismatch errors.
    const TYPE_NAME: &'static str;

    fn into_value(self) -> ParamValue;

    /// Convert from a stored value; `None` on a type mismatch.
    fn from_value(value: &ParamValue) -> Option<Self>;
}

impl ParamType for bool {
    const TYPE_NAME: &'static str = "bool";

    fn into_value(self) -> ParamValue {
        ParamValue::Bool(self)
    }

    fn from_value(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl ParamType for i64 {
    const TYPE_NAME: &'static str = "integer";

    fn into_value(self) -> ParamValue {
        ParamValue::Integer(self)
    }

    fn from_value(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Integer(v) => Some(*v),
            _ => None,
        }
    }
}

impl ParamType for f64 {
    const TYPE_NAME: &'static str = "double";

    fn into_value(self) -> ParamValue {
        ParamValue::Double(self)
    }

    // Integers widen to double so `gyro_fps:=200` is accepted.
    fn from_value(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Double(v) => Some(*v),
            ParamValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl ParamType for String {
    const TYPE_NAME: &'static str = "string";

    fn into_value(self) -> ParamValue {
        ParamValue::String(self)
    }

    fn from_value(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::String(v) => Some(v.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn clones_share_the_same_slot() {
        let cell = ParamCell::new(false);
        let other = cell.clone();
        other.set(true);
        assert!(cell.get());
    }

    #[test]
    fn writes_from_another_thread_are_observed() {
        let cell = ParamCell::new(0i64);
        let writer = cell.clone();
        thread::spawn(move || writer.set(848)).join().unwrap();
        assert_eq!(cell.get(), 848);
    }

    #[test]
    fn double_accepts_integer_values() {
        assert_eq!(f64::from_value(&ParamValue::Integer(200)), Some(200.0));
        assert_eq!(f64::from_value(&ParamValue::Bool(true)), None);
    }

    #[test]
    fn integer_does_not_accept_double() {
        assert_eq!(i64::from_value(&ParamValue::Double(30.0)), None);
        assert_eq!(i64::from_value(&ParamValue::Integer(30)), Some(30));
    }

    #[test]
    fn into_value_roundtrips_through_from_value() {
        let v = String::from("depth_module").into_value();
        assert_eq!(String::from_value(&v).as_deref(), Some("depth_module"));
        assert_eq!(bool::from_value(&true.into_value()), Some(true));
    }
}
