//! Type-level (collection) actions.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};

use super::record::ResourceContext;
use crate::framework::{
    ActionError, ActionFor, ActionFuture, ActionMap, ActionOutcome, BoundAction,
    InvokeAdapterAction,
};
use crate::store::Store;

/// What a collection-level handler gets to work with.
#[derive(Clone)]
pub struct CollectionContext {
    pub model: Arc<ModelType>,
    pub store: Store,
    /// Runs the adapter-level action for this type and action name.
    pub invoke_adapter_action: InvokeAdapterAction,
}

/// The definition of an entity type: its key and its custom action handlers.
///
/// # Example
/// ```
/// use model_actions::model::ModelType;
/// use serde_json::json;
///
/// let post = ModelType::new("post")
///     .collection_action("archiveAll", |cx, params| async move {
///         // do some work, then let the adapter POST as usual
///         cx.invoke_adapter_action.call(params).await
///     })
///     .resource_action("preview", |_cx, _params| async move { Ok(json!({"preview": true})) });
///
/// assert!(post.collection_actions().contains("archiveAll"));
/// assert!(post.resource_actions().contains("preview"));
/// ```
pub struct ModelType {
    type_key: String,
    collection_actions: ActionMap<CollectionContext>,
    resource_actions: ActionMap<ResourceContext>,
}

impl ModelType {
    pub fn new(type_key: impl Into<String>) -> Self {
        Self {
            type_key: type_key.into(),
            collection_actions: ActionMap::new(),
            resource_actions: ActionMap::new(),
        }
    }

    /// Registers a type-level handler for `name`.
    pub fn collection_action<F, Fut>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(CollectionContext, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ActionOutcome> + Send + 'static,
    {
        self.collection_actions.insert(name, handler);
        self
    }

    /// Registers an instance-level handler for `name`, shared by every record of this type.
    pub fn resource_action<F, Fut>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(ResourceContext, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ActionOutcome> + Send + 'static,
    {
        self.resource_actions.insert(name, handler);
        self
    }

    pub fn type_key(&self) -> &str {
        &self.type_key
    }

    pub fn collection_actions(&self) -> &ActionMap<CollectionContext> {
        &self.collection_actions
    }

    pub fn resource_actions(&self) -> &ActionMap<ResourceContext> {
        &self.resource_actions
    }

    pub(crate) fn set_type_key(&mut self, type_key: String) {
        self.type_key = type_key;
    }

    /// Resolves a collection action against `store`.
    ///
    /// Uses the custom handler when one is registered, [`default_action`] otherwise.
    /// Fails only if the store has no adapter for this type.
    #[instrument(skip(self, store), fields(type_key = %self.type_key))]
    pub fn action_for(
        self: &Arc<Self>,
        store: &Store,
        action_name: &str,
    ) -> Result<BoundAction, ActionError> {
        let handler = self.collection_actions.get(action_name).cloned();
        let adapter = store.adapter_for(self)?;

        let invoke_adapter_action = {
            let model = Arc::clone(self);
            let name = action_name.to_owned();
            BoundAction::new(action_name, move |params| {
                adapter.action_for(&model, &name, None).call(params)
            })
        };
        let cx = CollectionContext {
            model: Arc::clone(self),
            store: store.clone(),
            invoke_adapter_action,
        };

        Ok(match handler {
            Some(handler) => {
                debug!("Custom collection handler");
                BoundAction::new(action_name, move |params| handler(cx.clone(), params))
            }
            None => {
                debug!("Default collection handler");
                let name = action_name.to_owned();
                BoundAction::new(action_name, move |params| {
                    default_action(cx.clone(), &name, params)
                })
            }
        })
    }
}

impl fmt::Debug for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelType")
            .field("type_key", &self.type_key)
            .field("collection_actions", &self.collection_actions)
            .field("resource_actions", &self.resource_actions)
            .finish()
    }
}

/// The default collection handler: hand straight over to the adapter.
pub fn default_action(cx: CollectionContext, _action_name: &str, params: Value) -> ActionFuture {
    cx.invoke_adapter_action.call(params)
}

/// A model bound to the store it lives in, so it can resolve actions by name alone.
#[derive(Clone, Debug)]
pub struct ModelClass {
    store: Store,
    model: Arc<ModelType>,
}

impl ModelClass {
    pub fn new(store: Store, model: Arc<ModelType>) -> Self {
        Self { store, model }
    }

    pub fn model(&self) -> &Arc<ModelType> {
        &self.model
    }

    pub fn store(&self) -> &Store {
        &self.store
    }
}

impl ActionFor for ModelClass {
    fn action_for(&self, action_name: &str) -> Result<BoundAction, ActionError> {
        self.model.action_for(&self.store, action_name)
    }
}
