//! # Core Action Types
//!
//! The building blocks shared by every layer of the dispatch chain.
//!
//! ## Key Types
//!
//! - [`BoundAction`]: A resolved action, ready to be invoked with a payload.
//! - [`ActionMap`]: A per-layer table of custom handlers, keyed by action name.
//! - [`ActionFor`]: The trait implemented by anything that can resolve actions by name.
//! - [`ActionError`]: Errors surfaced by lookups, handlers and the transport.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};
use serde_json::Value;

use crate::transport::TransportError;

// =============================================================================
// 1. ERRORS & RESULTS
// =============================================================================

/// Errors that can occur while resolving or invoking an action.
///
/// None of the layers translate these: an error raised by a lookup, a custom handler
/// or the transport reaches the caller exactly as it was produced.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ActionError {
    #[error("No model registered for type '{0}'")]
    UnknownModel(String),
    #[error("No adapter registered for type '{0}'")]
    NoAdapter(String),
    #[error("Attributes for '{0}' must be a JSON object")]
    InvalidAttributes(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("Custom error: {0}")]
    Custom(String),
}

/// The outcome of an invoked action: the raw response body, or the error that stopped it.
pub type ActionOutcome = Result<Value, ActionError>;

/// The future returned when an action is invoked.
///
/// Nothing happens until it is polled, which is what keeps resolution free of network traffic.
pub type ActionFuture = BoxFuture<'static, ActionOutcome>;

/// Wraps an already known failure as an [`ActionFuture`].
pub fn failed(error: ActionError) -> ActionFuture {
    future::ready(Err(error)).boxed()
}

// =============================================================================
// 2. BOUND ACTIONS
// =============================================================================

/// An action that has been resolved against a handler and its context.
///
/// Calling it starts the invocation. The closure has already captured everything the
/// handler needs (model, store, snapshot source, next layer), so only the payload is left.
#[derive(Clone)]
pub struct BoundAction {
    name: Arc<str>,
    call: Arc<dyn Fn(Value) -> ActionFuture + Send + Sync>,
}

impl BoundAction {
    pub fn new(
        name: impl Into<Arc<str>>,
        call: impl Fn(Value) -> ActionFuture + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            call: Arc::new(call),
        }
    }

    /// The action name this closure was resolved for.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invokes the action with `params`.
    pub fn call(&self, params: Value) -> ActionFuture {
        (self.call)(params)
    }
}

impl fmt::Debug for BoundAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundAction").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Hands an action over to the adapter layer.
///
/// Collection and record handlers receive one of these so that they can run the
/// adapter-level action themselves, before or after their own work.
pub type InvokeAdapterAction = BoundAction;

// =============================================================================
// 3. HANDLER TABLES
// =============================================================================

/// A custom action handler taking a layer-specific context `C` and the payload.
pub type Handler<C> = Arc<dyn Fn(C, Value) -> ActionFuture + Send + Sync>;

/// Custom handlers for one layer, keyed by action name.
///
/// A missing entry means "use the default handler" for that layer.
pub struct ActionMap<C> {
    handlers: HashMap<String, Handler<C>>,
}

impl<C> ActionMap<C> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registers `handler` for `name`, replacing any previous handler.
    pub fn insert<F, Fut>(&mut self, name: impl Into<String>, handler: F)
    where
        C: 'static,
        F: Fn(C, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ActionOutcome> + Send + 'static,
    {
        let handler: Handler<C> =
            Arc::new(move |cx: C, params: Value| -> ActionFuture { handler(cx, params).boxed() });
        self.handlers.insert(name.into(), handler);
    }

    pub fn get(&self, name: &str) -> Option<&Handler<C>> {
        self.handlers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<C> Default for ActionMap<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for ActionMap<C> {
    fn clone(&self) -> Self {
        Self {
            handlers: self.handlers.clone(),
        }
    }
}

impl<C> fmt::Debug for ActionMap<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_set().entries(names).finish()
    }
}

// =============================================================================
// 4. THE RESOLVER TRAIT
// =============================================================================

/// Anything that can look up an action by name and bind it.
///
/// Implemented by [`Record`](crate::model::Record) (instance scope) and
/// [`ModelClass`](crate::model::ModelClass) (type scope). Application types such as
/// controllers can implement it by delegating to one of those.
pub trait ActionFor {
    /// Resolves `action_name` to a bound action. Never performs I/O.
    fn action_for(&self, action_name: &str) -> Result<BoundAction, ActionError>;

    /// Resolves `action_name` and invokes it with `params` straight away.
    fn invoke(&self, action_name: &str, params: Value) -> ActionFuture {
        match self.action_for(action_name) {
            Ok(action) => action.call(params),
            Err(e) => failed(e),
        }
    }
}
