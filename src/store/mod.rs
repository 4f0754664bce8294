//! The central registry of models and adapters, and the type-key entry point for actions.
//!
//! Everything is wired once through [`StoreBuilder`]; after [`StoreBuilder::build`] the
//! store is immutable and cheap to clone.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::adapter::{dasherize, RestAdapter};
use crate::framework::{failed, ActionError, ActionFor, ActionFuture};
use crate::model::{ModelClass, ModelType, Record};

/// Canonical form of a type key: `blogPost`, `blog_post` and `blog-post` are one type.
pub fn normalize_type_key(type_key: &str) -> String {
    dasherize(type_key)
}

/// Handle to the model and adapter registry.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    models: HashMap<String, Arc<ModelType>>,
    adapters: HashMap<String, Arc<RestAdapter>>,
    application_adapter: Option<Arc<RestAdapter>>,
}

impl Store {
    pub fn builder() -> StoreBuilder {
        StoreBuilder::default()
    }

    /// Looks up the model registered for `type_key`.
    pub fn model_for(&self, type_key: &str) -> Result<Arc<ModelType>, ActionError> {
        let key = normalize_type_key(type_key);
        self.inner
            .models
            .get(&key)
            .cloned()
            .ok_or(ActionError::UnknownModel(key))
    }

    /// The adapter registered for `model`'s type, else the application adapter.
    pub fn adapter_for(&self, model: &ModelType) -> Result<Arc<RestAdapter>, ActionError> {
        let key = normalize_type_key(model.type_key());
        self.inner
            .adapters
            .get(&key)
            .or(self.inner.application_adapter.as_ref())
            .cloned()
            .ok_or(ActionError::NoAdapter(key))
    }

    /// The model for `type_key`, bound to this store.
    pub fn model_class(&self, type_key: &str) -> Result<ModelClass, ActionError> {
        Ok(ModelClass::new(self.clone(), self.model_for(type_key)?))
    }

    /// Materializes a record of `type_key`. `attributes` must be a JSON object or `null`.
    pub fn record(
        &self,
        type_key: &str,
        id: impl Into<String>,
        attributes: Value,
    ) -> Result<Record, ActionError> {
        let model = self.model_for(type_key)?;
        let attributes = match attributes {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            _ => return Err(ActionError::InvalidAttributes(model.type_key().to_owned())),
        };
        Ok(Record::new(self.clone(), model, id.into(), attributes))
    }

    /// Triggers a collection-level action on the type registered for `type_key`.
    ///
    /// Resolution happens now; the request is only sent once the returned future is polled.
    /// Lookup failures come back as an already failed future.
    #[instrument(skip(self, params))]
    pub fn action(&self, type_key: &str, action_name: &str, params: Value) -> ActionFuture {
        match self
            .model_class(type_key)
            .and_then(|class| class.action_for(action_name))
        {
            Ok(action) => {
                debug!("Resolved");
                action.call(params)
            }
            Err(e) => failed(e),
        }
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut models: Vec<&str> = self.inner.models.keys().map(String::as_str).collect();
        models.sort_unstable();
        f.debug_struct("Store")
            .field("models", &models)
            .field("adapters", &self.inner.adapters.len())
            .field("application_adapter", &self.inner.application_adapter.is_some())
            .finish()
    }
}

/// Collects models and adapters before the store starts serving actions.
#[derive(Default)]
pub struct StoreBuilder {
    models: HashMap<String, Arc<ModelType>>,
    adapters: HashMap<String, Arc<RestAdapter>>,
    application_adapter: Option<Arc<RestAdapter>>,
}

impl StoreBuilder {
    /// Registers a model under its normalized type key.
    pub fn model(mut self, mut model: ModelType) -> Self {
        let key = normalize_type_key(model.type_key());
        model.set_type_key(key.clone());
        self.models.insert(key, Arc::new(model));
        self
    }

    /// Registers an adapter used only for `type_key`.
    pub fn adapter(mut self, type_key: &str, adapter: RestAdapter) -> Self {
        self.adapters
            .insert(normalize_type_key(type_key), Arc::new(adapter));
        self
    }

    /// Registers the fallback adapter for types without their own.
    pub fn application_adapter(mut self, adapter: RestAdapter) -> Self {
        self.application_adapter = Some(Arc::new(adapter));
        self
    }

    pub fn build(self) -> Store {
        debug!(
            models = self.models.len(),
            adapters = self.adapters.len(),
            application_adapter = self.application_adapter.is_some(),
            "Store ready"
        );
        Store {
            inner: Arc::new(StoreInner {
                models: self.models,
                adapters: self.adapters,
                application_adapter: self.application_adapter,
            }),
        }
    }
}
