use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use super::inflector::{dasherize, path_for_type};
use crate::framework::{ActionError, ActionFuture, ActionMap, ActionOutcome, BoundAction};
use crate::model::{ModelType, Record, Snapshot};
use crate::transport::{AjaxOptions, Method, Transport, TransportError};

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Where an adapter sends its requests and which headers it adds to each of them.
///
/// # Example
/// ```
/// use model_actions::adapter::AdapterConfig;
///
/// let config = AdapterConfig::from_json(r#"{ "host": "https://api.example.com", "namespace": "v1" }"#).unwrap();
/// assert_eq!(config.namespace.as_deref(), Some("v1"));
/// assert!(config.headers.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Scheme and authority, e.g. `https://api.example.com`. `None` means same-origin paths.
    pub host: Option<String>,
    /// Path prefix inserted before the resource path, e.g. `api/v1`.
    pub namespace: Option<String>,
    /// Headers added to every request sent through this adapter.
    pub headers: BTreeMap<String, String>,
}

impl AdapterConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

// =============================================================================
// HANDLER CONTEXT
// =============================================================================

/// What an adapter-level handler gets to work with.
#[derive(Clone)]
pub struct AdapterContext {
    /// The adapter the action was resolved on, for `build_url` and `ajax`.
    pub adapter: Arc<RestAdapter>,
    pub model: Arc<ModelType>,
    /// Present for record actions, `None` for collection actions.
    pub snapshot: Option<Snapshot>,
}

// =============================================================================
// THE ADAPTER
// =============================================================================

/// Turns actions into HTTP requests.
///
/// Always used behind an `Arc`: bound actions keep the adapter alive until they complete.
pub struct RestAdapter {
    config: AdapterConfig,
    transport: Arc<dyn Transport>,
    actions: ActionMap<AdapterContext>,
}

impl RestAdapter {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            config: AdapterConfig::default(),
            transport,
            actions: ActionMap::new(),
        }
    }

    pub fn with_config(mut self, config: AdapterConfig) -> Self {
        self.config = config;
        self
    }

    /// Registers a custom handler for `name`, taking over from the default POST.
    pub fn action<F, Fut>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(AdapterContext, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ActionOutcome> + Send + 'static,
    {
        self.actions.insert(name, handler);
        self
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn actions(&self) -> &ActionMap<AdapterContext> {
        &self.actions
    }

    /// The host and namespace joined by `/`, or an empty string when neither is set.
    pub fn url_prefix(&self) -> String {
        let host = self
            .config
            .host
            .as_deref()
            .map(|h| h.trim_end_matches('/'))
            .filter(|h| !h.is_empty());
        let namespace = self
            .config
            .namespace
            .as_deref()
            .map(|n| n.trim_matches('/'))
            .filter(|n| !n.is_empty());

        let parts: Vec<&str> = host.into_iter().chain(namespace).collect();
        parts.join("/")
    }

    /// Builds the collection URL for `type_key`, or the resource URL when `id` is given.
    ///
    /// The id is percent-encoded. Without a host the URL is always rooted at `/`.
    pub fn build_url(&self, type_key: &str, id: Option<&str>) -> String {
        let prefix = self.url_prefix();
        let path = path_for_type(type_key);

        let mut segments: Vec<String> = Vec::with_capacity(3);
        if !prefix.is_empty() {
            segments.push(prefix);
        }
        if !path.is_empty() {
            segments.push(path);
        }
        if let Some(id) = id {
            segments.push(urlencoding::encode(id).into_owned());
        }

        let url = segments.join("/");
        if self.config.host.as_deref().map_or(true, |h| h.is_empty() || h == "/")
            && !url.starts_with('/')
        {
            format!("/{url}")
        } else {
            url
        }
    }

    /// Submits a request through the transport, adding the configured headers.
    ///
    /// Headers already present in `options` take precedence over the adapter's.
    pub async fn ajax(
        &self,
        url: &str,
        method: Method,
        mut options: AjaxOptions,
    ) -> Result<Value, TransportError> {
        for (name, value) in &self.config.headers {
            options
                .headers
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }
        debug!(url, %method, "Submitting action");
        self.transport.ajax(url, method, options).await
    }

    // =========================================================================
    // ACTION RESOLUTION
    // =========================================================================

    /// Looks up the handler for `action_name`, falling back to [`RestAdapter::default_action`].
    ///
    /// Passing a `record` makes this a resource action: the record is snapshotted now, and
    /// the snapshot travels with the bound action. Without one it is a collection action.
    #[instrument(skip(self, model, record), fields(type_key = model.type_key(), resource = record.is_some()))]
    pub fn action_for(
        self: &Arc<Self>,
        model: &Arc<ModelType>,
        action_name: &str,
        record: Option<&Record>,
    ) -> BoundAction {
        let snapshot = record.map(Record::create_snapshot);
        let cx = AdapterContext {
            adapter: Arc::clone(self),
            model: Arc::clone(model),
            snapshot,
        };

        match self.actions.get(action_name) {
            Some(handler) => {
                debug!("Custom adapter handler");
                let handler = Arc::clone(handler);
                BoundAction::new(action_name, move |params| handler(cx.clone(), params))
            }
            None => {
                debug!("Default adapter handler");
                let name = action_name.to_owned();
                BoundAction::new(action_name, move |params| {
                    Self::default_action(cx.clone(), &name, params)
                })
            }
        }
    }

    /// Routes to the resource action when there is a snapshot, to the collection action otherwise.
    pub fn default_action(cx: AdapterContext, action_name: &str, params: Value) -> ActionFuture {
        match &cx.snapshot {
            Some(snapshot) => {
                cx.adapter
                    .default_resource_action(&cx.model, action_name, snapshot, params)
            }
            None => cx
                .adapter
                .default_collection_action(&cx.model, action_name, params),
        }
    }

    /// POSTs `params` to `<resource URL>/<dasherized action>` and returns the raw body.
    pub fn default_resource_action(
        self: &Arc<Self>,
        model: &ModelType,
        action_name: &str,
        snapshot: &Snapshot,
        params: Value,
    ) -> ActionFuture {
        let url = format!(
            "{}/{}",
            self.build_url(model.type_key(), Some(snapshot.id())),
            dasherize(action_name)
        );
        self.post(url, params)
    }

    /// POSTs `params` to `<collection URL>/<dasherized action>` and returns the raw body.
    pub fn default_collection_action(
        self: &Arc<Self>,
        model: &ModelType,
        action_name: &str,
        params: Value,
    ) -> ActionFuture {
        let url = format!(
            "{}/{}",
            self.build_url(model.type_key(), None),
            dasherize(action_name)
        );
        self.post(url, params)
    }

    fn post(self: &Arc<Self>, url: String, params: Value) -> ActionFuture {
        let adapter = Arc::clone(self);
        async move {
            adapter
                .ajax(&url, Method::POST, AjaxOptions::with_data(params))
                .await
                .map_err(ActionError::from)
        }
        .boxed()
    }
}

impl fmt::Debug for RestAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestAdapter")
            .field("config", &self.config)
            .field("actions", &self.actions)
            .finish_non_exhaustive()
    }
}
