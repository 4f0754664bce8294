use std::sync::Arc;

use model_actions::adapter::{AdapterConfig, AdapterContext, RestAdapter};
use model_actions::framework::mock::MockTransport;
use model_actions::framework::{computed_action, ActionError, ActionFor, BoundAction};
use model_actions::model::{ModelType, Record};
use model_actions::store::Store;
use model_actions::transport::{Method, TransportError};
use serde_json::{json, Value};

fn store_with(model: ModelType, adapter: RestAdapter) -> Store {
    Store::builder()
        .model(model)
        .application_adapter(adapter)
        .build()
}

/// Resource action with no custom handlers: POST to the record URL.
#[tokio::test]
async fn test_publish_record_posts_to_resource_url() {
    let transport = Arc::new(MockTransport::new());
    let store = store_with(ModelType::new("post"), RestAdapter::new(transport.clone()));
    transport
        .expect_post("/posts/42/publish")
        .return_ok(json!({"published": true}));

    let post = store.record("post", "42", json!({"title": "Hello"})).unwrap();
    let body = post.invoke("publish", json!({"notify": true})).await.unwrap();

    assert_eq!(body, json!({"published": true}));
    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, "/posts/42/publish");
    assert_eq!(requests[0].method, Method::POST);
    assert_eq!(requests[0].options.data, Some(json!({"notify": true})));
    transport.verify();
}

/// Collection action with no custom handlers: POST to the collection URL.
#[tokio::test]
async fn test_bulk_archive_posts_to_collection_url() {
    let transport = Arc::new(MockTransport::new());
    let store = store_with(ModelType::new("post"), RestAdapter::new(transport.clone()));
    transport.expect_post("/posts/bulk-archive").return_ok(Value::Null);

    store
        .action("post", "bulkArchive", json!({"ids": [1, 2, 3]}))
        .await
        .unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].url, "/posts/bulk-archive");
    assert_eq!(requests[0].options.data, Some(json!({"ids": [1, 2, 3]})));
    transport.verify();
}

/// Store, model class and a controller-style helper all reach the same collection URL;
/// a record reaches the resource URL.
#[tokio::test]
async fn test_entry_points_agree_on_default_urls() {
    let transport = Arc::new(MockTransport::new());
    let store = store_with(
        ModelType::new("post"),
        RestAdapter::new(transport.clone())
            .with_config(AdapterConfig::default().host("https://api.example.com").namespace("v1")),
    );
    let class = store.model_class("post").unwrap();
    let post = store.record("post", "9", Value::Null).unwrap();
    let archive_all = computed_action::<model_actions::model::ModelClass>("archiveAll");

    store.action("post", "archiveAll", json!(1)).await.unwrap();
    class.invoke("archiveAll", json!(2)).await.unwrap();
    archive_all(&class, json!(3)).await.unwrap();
    post.invoke("archiveAll", json!(4)).await.unwrap();

    let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(
        urls,
        vec![
            "https://api.example.com/v1/posts/archive-all",
            "https://api.example.com/v1/posts/archive-all",
            "https://api.example.com/v1/posts/archive-all",
            "https://api.example.com/v1/posts/9/archive-all",
        ]
    );
}

#[tokio::test]
async fn test_resolution_never_hits_the_transport() {
    let transport = Arc::new(MockTransport::new());
    let store = store_with(ModelType::new("post"), RestAdapter::new(transport.clone()));
    let post = store.record("post", "42", Value::Null).unwrap();

    let resource_action = post.action_for("publish").unwrap();
    let collection_action = store.model_class("post").unwrap().action_for("reindex").unwrap();
    let pending = resource_action.call(json!({}));
    assert_eq!(transport.call_count(), 0);

    pending.await.unwrap();
    assert_eq!(transport.call_count(), 1);

    collection_action.call(json!({})).await.unwrap();
    assert_eq!(transport.call_count(), 2);
}

/// Custom adapter handler: every entry point gets its value and no request is sent.
#[tokio::test]
async fn test_custom_adapter_handler_short_circuits() {
    let transport = Arc::new(MockTransport::new());
    let adapter = RestAdapter::new(transport.clone())
        .action("publish", |_cx: AdapterContext, _params| async { Ok(json!({"ok": true})) });
    let store = store_with(ModelType::new("post"), adapter);
    let post = store.record("post", "42", Value::Null).unwrap();

    assert_eq!(store.action("post", "publish", json!({})).await, Ok(json!({"ok": true})));
    assert_eq!(
        store.model_class("post").unwrap().invoke("publish", json!({})).await,
        Ok(json!({"ok": true}))
    );
    assert_eq!(post.invoke("publish", json!({})).await, Ok(json!({"ok": true})));
    assert_eq!(transport.call_count(), 0);
}

/// Adapter handlers see a snapshot for record actions and none for collection actions.
#[tokio::test]
async fn test_adapter_handler_snapshot_presence() {
    let transport = Arc::new(MockTransport::new());
    let adapter = RestAdapter::new(transport).action(
        "inspect",
        |cx: AdapterContext, _params| async move {
            Ok(match cx.snapshot {
                Some(snapshot) => json!({"id": snapshot.id(), "title": snapshot.attr("title")}),
                None => Value::Null,
            })
        },
    );
    let store = store_with(ModelType::new("post"), adapter);
    let post = store.record("post", "5", json!({"title": "Snap"})).unwrap();

    let from_record = post.invoke("inspect", Value::Null).await.unwrap();
    let from_type = store.action("post", "inspect", Value::Null).await.unwrap();

    assert_eq!(from_record, json!({"id": "5", "title": "Snap"}));
    assert_eq!(from_type, Value::Null);
}

/// Type-level handler output is returned verbatim, and it can still reach the adapter.
#[tokio::test]
async fn test_collection_handler_overrides_default() {
    let transport = Arc::new(MockTransport::new());
    let model = ModelType::new("post").collection_action("latest", |cx, params| async move {
        let raw = cx.invoke_adapter_action.call(params).await?;
        let ids: Vec<Record> = raw["ids"]
            .as_array()
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
            .map(|id| cx.store.record("post", id, Value::Null))
            .collect::<Result<_, _>>()?;
        Ok(json!(ids.iter().map(|r| r.id().to_owned()).collect::<Vec<_>>()))
    });
    let store = store_with(model, RestAdapter::new(transport.clone()));
    transport.expect_post("/posts/latest").return_ok(json!({"ids": ["3", "4"]}));

    let result = store.action("post", "latest", json!({"limit": 2})).await;

    assert_eq!(result, Ok(json!(["3", "4"])));
    transport.verify();
}

/// Instance-level handler output is returned verbatim.
#[tokio::test]
async fn test_resource_handler_overrides_default() {
    let transport = Arc::new(MockTransport::new());
    let model = ModelType::new("post").resource_action("rename", |cx, params| async move {
        let title = params["title"].clone();
        cx.record.set("title", title.clone());
        Ok(json!({"model": cx.model.type_key(), "title": title}))
    });
    let store = store_with(model, RestAdapter::new(transport.clone()));
    let post = store.record("post", "1", json!({"title": "Old"})).unwrap();

    let result = post.invoke("rename", json!({"title": "New"})).await;

    assert_eq!(result, Ok(json!({"model": "post", "title": "New"})));
    assert_eq!(post.get("title"), Some(json!("New")));
    assert_eq!(transport.call_count(), 0);
}

/// Failures reach the caller untouched through every layer.
#[tokio::test]
async fn test_errors_propagate_unchanged() {
    let transport = Arc::new(MockTransport::new());
    let model = ModelType::new("post").resource_action("lock", |_cx, _params| async {
        Err(ActionError::Custom("locked elsewhere".into()))
    });
    let store = store_with(model, RestAdapter::new(transport.clone()));
    let post = store.record("post", "1", Value::Null).unwrap();

    let not_found = TransportError::Status {
        url: "/posts/1/publish".into(),
        status: 404,
        body: json!({"errors": ["missing"]}),
    };
    transport.expect_post("/posts/1/publish").return_err(not_found.clone());

    assert_eq!(
        post.invoke("publish", Value::Null).await,
        Err(ActionError::Transport(not_found))
    );
    assert_eq!(
        post.invoke("lock", Value::Null).await,
        Err(ActionError::Custom("locked elsewhere".into()))
    );
    assert_eq!(
        store.action("comment", "lock", Value::Null).await,
        Err(ActionError::UnknownModel("comment".into()))
    );
}

/// Actions can be resolved once and invoked concurrently from many tasks.
#[tokio::test]
async fn test_concurrent_invocations() {
    let transport = Arc::new(MockTransport::new());
    let store = store_with(ModelType::new("post"), RestAdapter::new(transport.clone()));
    let action: BoundAction = store.model_class("post").unwrap().action_for("touch").unwrap();

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let action = action.clone();
            tokio::spawn(async move { action.call(json!(i)).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(transport.call_count(), 10);
    assert!(transport.requests().iter().all(|r| r.url == "/posts/touch"));
}
