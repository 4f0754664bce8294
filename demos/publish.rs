//! Runs a few actions against a throwaway local server.
//!
//! ```bash
//! RUST_LOG=debug cargo run --example publish
//! ```

use std::sync::Arc;

use axum::extract::Path;
use axum::routing::post;
use axum::{Json, Router};
use model_actions::prelude::*;
use model_actions::runtime::setup_tracing;
use serde_json::{json, Value};
use tracing::{info, info_span, Instrument};

async fn spawn_server() -> std::io::Result<String> {
    let app = Router::new()
        .route(
            "/posts/:id/:action",
            post(
                |Path((id, action)): Path<(String, String)>, Json(body): Json<Value>| async move {
                    Json(json!({"scope": "resource", "id": id, "action": action, "body": body}))
                },
            ),
        )
        .route(
            "/posts/:action",
            post(|Path(action): Path<String>, Json(body): Json<Value>| async move {
                Json(json!({"scope": "collection", "action": action, "body": body}))
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "Server stopped");
        }
    });
    Ok(format!("http://{addr}"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let host = spawn_server().await?;
    let adapter = RestAdapter::new(Arc::new(HttpTransport::new()))
        .with_config(AdapterConfig::default().host(host))
        .action("preview", |cx: AdapterContext, _params| async move {
            // Answered locally, never sent
            let title = cx.snapshot.and_then(|s| s.attr("title").cloned());
            Ok(json!({"preview": title}))
        });

    let post_model = ModelType::new("post").collection_action("bulkArchive", |cx, params| async move {
        info!(type_key = cx.model.type_key(), "Archiving in bulk");
        cx.invoke_adapter_action.call(params).await
    });

    let store = Store::builder()
        .model(post_model)
        .application_adapter(adapter)
        .build();

    let archived = store
        .action("post", "bulkArchive", json!({"ids": [1, 2, 3]}))
        .instrument(info_span!("bulk_archive"))
        .await?;
    info!(%archived, "Collection action");

    let post = store.record("post", "42", json!({"title": "Hello, actions"}))?;
    let publish = computed_action::<Record>("markAsRead");
    let read = publish(&post, json!({"notify": true}))
        .instrument(info_span!("mark_as_read"))
        .await?;
    info!(%read, "Resource action");

    let preview = post.invoke("preview", Value::Null).await?;
    info!(%preview, "Adapter handler");

    Ok(())
}
