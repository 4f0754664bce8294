//! Generic action plumbing shared by every layer.
//!
//! # Main Components
//!
//! - [`BoundAction`] - A resolved action, waiting for its payload
//! - [`ActionMap`] - Custom handlers keyed by action name
//! - [`ActionFor`] - Resolution by name, implemented by records and model classes
//! - [`computed_action`] - Turns an action name into a callable function
//! - [`ActionError`] - Common error type
//!
//! # Testing
//!
//! See [`mock`] module for a spy transport to test dispatch without a network.

pub mod computed;
pub mod core;
pub mod mock;

// Re-export core types for convenience
pub use computed::computed_action;
pub use self::core::*;
