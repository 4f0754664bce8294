//! Instance-level (resource) actions, and the snapshots handed to adapters.

use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use super::model_type::ModelType;
use crate::framework::{ActionError, ActionFor, ActionFuture, BoundAction, InvokeAdapterAction};
use crate::store::Store;

/// An immutable capture of a record's attributes, taken when a resource action reaches the
/// adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    id: String,
    type_key: String,
    attributes: Map<String, Value>,
}

impl Snapshot {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn type_key(&self) -> &str {
        &self.type_key
    }

    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }
}

/// What an instance-level handler gets to work with.
#[derive(Clone)]
pub struct ResourceContext {
    pub record: Record,
    pub model: Arc<ModelType>,
    /// Runs the adapter-level action for this record and action name.
    pub invoke_adapter_action: InvokeAdapterAction,
}

/// One entity instance. Cheap to clone; clones share the same attributes.
#[derive(Clone)]
pub struct Record {
    inner: Arc<RecordInner>,
}

struct RecordInner {
    store: Store,
    model: Arc<ModelType>,
    id: String,
    attributes: RwLock<Map<String, Value>>,
}

impl Record {
    pub(crate) fn new(
        store: Store,
        model: Arc<ModelType>,
        id: String,
        attributes: Map<String, Value>,
    ) -> Self {
        Self {
            inner: Arc::new(RecordInner {
                store,
                model,
                id,
                attributes: RwLock::new(attributes),
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn model(&self) -> &Arc<ModelType> {
        &self.inner.model
    }

    pub fn store(&self) -> &Store {
        &self.inner.store
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.read().get(key).cloned()
    }

    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.write().insert(key.into(), value);
    }

    /// Captures the current attributes. Later `set` calls do not affect the snapshot.
    pub fn create_snapshot(&self) -> Snapshot {
        Snapshot {
            id: self.inner.id.clone(),
            type_key: self.inner.model.type_key().to_owned(),
            attributes: self.read().clone(),
        }
    }

    // Writers only insert whole values, so a poisoned map is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, Map<String, Value>> {
        self.inner.attributes.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Map<String, Value>> {
        self.inner.attributes.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl ActionFor for Record {
    /// Resolves a resource action for this record.
    ///
    /// Uses the model's instance-level handler when there is one, [`default_action`]
    /// otherwise. The snapshot is only taken once the bound action runs.
    #[instrument(skip(self), fields(type_key = self.model().type_key(), id = %self.id()))]
    fn action_for(&self, action_name: &str) -> Result<BoundAction, ActionError> {
        let model = self.model();
        let adapter = self.store().adapter_for(model)?;
        let handler = model.resource_actions().get(action_name).cloned();

        let invoke_adapter_action = {
            let record = self.clone();
            let name = action_name.to_owned();
            BoundAction::new(action_name, move |params| {
                adapter
                    .action_for(record.model(), &name, Some(&record))
                    .call(params)
            })
        };
        let cx = ResourceContext {
            record: self.clone(),
            model: Arc::clone(model),
            invoke_adapter_action,
        };

        Ok(match handler {
            Some(handler) => {
                debug!("Custom resource handler");
                BoundAction::new(action_name, move |params| handler(cx.clone(), params))
            }
            None => {
                debug!("Default resource handler");
                let name = action_name.to_owned();
                BoundAction::new(action_name, move |params| {
                    default_action(cx.clone(), &name, params)
                })
            }
        })
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("type_key", &self.model().type_key())
            .field("id", &self.id())
            .field("attributes", &*self.read())
            .finish()
    }
}

/// The default resource handler: hand straight over to the adapter.
pub fn default_action(cx: ResourceContext, _action_name: &str, params: Value) -> ActionFuture {
    cx.invoke_adapter_action.call(params)
}
