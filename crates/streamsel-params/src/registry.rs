//! [`ParameterRegistry`] – the interface the negotiation core consumes.
//!
//! The registry owns storage and change notification; the core only needs
//! to declare a name with a default and be told about accepted mutations.
//! [`bind`] layers the typed "declare-and-bind" contract on top:
//!
//! 1. the resolved initial value (startup override or default) is written
//!    synchronously into the bound [`ParamCell`];
//! 2. every accepted mutation rewrites the cell and then fires the change
//!    callback exactly once.

use std::sync::Arc;

use streamsel_types::{ParamError, ParamValue};

use crate::cell::{ParamCell, ParamType};

/// A named parameter together with its current value.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub value: ParamValue,
}

/// Handler a registry invokes for every external mutation of a declared
/// parameter.  Returning an error rejects the mutation.
pub type SetHandler = Box<dyn Fn(&ParamValue) -> Result<(), ParamError> + Send + Sync>;

/// Callback fired after a bound parameter accepted a new value.
pub type ChangeCallback = Arc<dyn Fn(&Parameter) + Send + Sync>;

/// Key/value store with per-key change handlers.
pub trait ParameterRegistry: Send + Sync {
    /// Declare `name` with `default` and attach `on_set`.
    ///
    /// Returns the resolved initial value, which is the startup override for
    /// `name` when one exists and `default` otherwise.  `on_set` is **not**
    /// invoked for the initial value.
    ///
    /// # Errors
    ///
    /// Implementations may return [`ParamError::AlreadyDeclared`] when
    /// `name` was declared before.
    fn declare(
        &self,
        name: &str,
        default: ParamValue,
        on_set: SetHandler,
    ) -> Result<ParamValue, ParamError>;
}

/// Declare `name` in `registry` and bind it to `cell`.
///
/// # Errors
///
/// Propagates declaration errors, and returns
/// [`ParamError::TypeMismatch`] when the resolved initial value cannot be
/// converted to `T`.
pub fn bind<T: ParamType>(
    registry: &dyn ParameterRegistry,
    name: &str,
    default: T,
    cell: &ParamCell<T>,
    on_change: ChangeCallback,
) -> Result<(), ParamError> {
    let handler_cell = cell.clone();
    let handler_name = name.to_string();
    let on_set: SetHandler = Box::new(move |value: &ParamValue| {
        let typed = T::from_value(value).ok_or_else(|| ParamError::TypeMismatch {
            name: handler_name.clone(),
            expected: T::TYPE_NAME,
            actual: value.type_name(),
        })?;
        handler_cell.set(typed);
        on_change(&Parameter {
            name: handler_name.clone(),
            value: value.clone(),
        });
        Ok(())
    });

    let initial = registry.declare(name, default.into_value(), on_set)?;
    let typed = T::from_value(&initial).ok_or_else(|| ParamError::TypeMismatch {
        name: name.to_string(),
        expected: T::TYPE_NAME,
        actual: initial.type_name(),
    })?;
    cell.set(typed);
    Ok(())
}
