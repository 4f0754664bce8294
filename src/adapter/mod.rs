//! The transport-facing end of the action chain.
//!
//! A [`RestAdapter`] either runs a custom adapter handler or falls back to the default
//! router, which POSTs to `<resource or collection URL>/<dasherized action name>`.

pub mod inflector;
pub mod rest;

pub use inflector::{dasherize, path_for_type, pluralize};
pub use rest::*;
