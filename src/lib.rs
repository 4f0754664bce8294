//! # Model Actions
//!
//! > **Custom server-side actions for models and records, beyond CRUD.**
//!
//! Applications declare named actions (`publish`, `markAsRead`, `bulkArchive`...) on their
//! entity types. Triggering one walks a short delegation chain, and any layer can take over
//! with a custom handler:
//!
//! ```text
//! Store::action ──► ModelClass / Record ──► RestAdapter ──► Transport
//!  (type key)        (type or instance)      (URL + POST)     (HTTP)
//! ```
//!
//! With no custom handlers anywhere, an action is a `POST` of its payload to
//! `<resource or collection URL>/<dasherized action name>`, and the raw response body
//! comes back.
//!
//! ## 🚀 Core Concepts
//!
//! ### Resolution vs. invocation
//! [`ActionFor::action_for`](framework::ActionFor::action_for) looks up a handler and binds
//! it into a [`BoundAction`](framework::BoundAction). Nothing touches the network until
//! the bound action is called and its future polled.
//!
//! ### Explicit context
//! Handlers receive a context struct instead of an implicit receiver:
//! - collection handlers get a [`CollectionContext`](model::CollectionContext) (model, store, next layer)
//! - resource handlers get a [`ResourceContext`](model::ResourceContext) (record, model, next layer)
//! - adapter handlers get an [`AdapterContext`](adapter::AdapterContext) (adapter, model, snapshot)
//!
//! ### Mocking
//! Use [`MockTransport`](framework::mock::MockTransport) to count and inspect requests in tests.
//!
//! ## 🗺️ Module Tour
//!
//! - [`framework`]: bound actions, handler tables, the `ActionFor` trait, `computed_action`
//! - [`model`]: entity types and records, with the collection and resource resolvers
//! - [`adapter`]: the REST adapter, URL building and the default actions
//! - [`store`]: model/adapter registry and the type-key entry point
//! - [`transport`]: the network seam and its `reqwest` implementation
//! - [`runtime`]: tracing setup
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use model_actions::prelude::*;
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), ActionError> {
//! let adapter = RestAdapter::new(Arc::new(HttpTransport::new()))
//!     .with_config(AdapterConfig::default().host("https://api.example.com"));
//! let store = Store::builder()
//!     .model(ModelType::new("post"))
//!     .application_adapter(adapter)
//!     .build();
//!
//! // POST https://api.example.com/posts/bulk-archive
//! store.action("post", "bulkArchive", json!({"ids": [1, 2, 3]})).await?;
//!
//! // POST https://api.example.com/posts/42/publish
//! let post = store.record("post", "42", json!({"title": "Hello"}))?;
//! post.invoke("publish", json!({"notify": true})).await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod framework;
pub mod model;
pub mod runtime;
pub mod store;
pub mod transport;

/// The types most applications need.
pub mod prelude {
    pub use crate::adapter::{AdapterConfig, AdapterContext, RestAdapter};
    pub use crate::framework::{
        computed_action, ActionError, ActionFor, ActionFuture, BoundAction,
    };
    pub use crate::model::{CollectionContext, ModelClass, ModelType, Record, ResourceContext};
    pub use crate::store::Store;
    pub use crate::transport::{HttpTransport, Transport};
}
