//! `streamsel-params` – the Parameter Registry Adapter
//!
//! Turns user-facing configuration into live, mutable selector state.
//!
//! # Modules
//!
//! - [`cell`] – [`ParamCell`][cell::ParamCell]: shared, lock-protected value
//!   slot that a registry writes and a selector reads, plus the
//!   [`ParamType`][cell::ParamType] conversions between Rust values and
//!   [`ParamValue`][streamsel_types::ParamValue].
//! - [`registry`] – [`ParameterRegistry`][registry::ParameterRegistry]: the
//!   narrow interface the negotiation core consumes, and the generic
//!   [`bind`][registry::bind] helper that wires a cell to a declared name.
//! - [`server`] – [`ParameterServer`][server::ParameterServer]: in-memory
//!   registry with startup overrides, typed `set`/`get`, and a broadcast
//!   channel of [`ParameterEvent`][server::ParameterEvent]s.

pub mod cell;
pub mod registry;
pub mod server;

pub use cell::{ParamCell, ParamType};
pub use registry::{ChangeCallback, Parameter, ParameterRegistry, SetHandler, bind};
pub use server::{ParameterEvent, ParameterServer};
