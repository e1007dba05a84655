//! Writes resolved from futures.

use pantry::{Store, StoreError};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::oneshot;

#[tokio::test]
async fn resolved_value_is_written() {
    let store = Store::new();
    let (tx, rx) = oneshot::channel::<Value>();

    let (handle, pending) = store.set_async("user", rx, &[]).unwrap();
    assert_eq!(handle.key(), "user");
    assert_eq!(store.get("user"), None);

    tx.send(json!({"name": "ada"})).unwrap();
    pending.await.unwrap();

    assert_eq!(store.get("user"), Some(json!({"name": "ada"})));
}

#[tokio::test]
async fn resolved_value_propagates_to_dependents() {
    let store = Store::new();
    store
        .derive("greeting", &["name"], |state| {
            let name = state.get("name").and_then(Value::as_str).unwrap_or("nobody");
            format!("hello {name}")
        })
        .unwrap();

    let (_, pending) = store
        .set_async("name", async { Ok::<_, anyhow::Error>(json!("ada")) }, &[])
        .unwrap();
    pending.await.unwrap();

    assert_eq!(store.get("greeting"), Some(json!("hello ada")));
}

#[tokio::test]
async fn rejected_future_surfaces_error_and_writes_nothing() {
    let store = Store::new();
    store.set("user", json!("previous")).unwrap();

    let (_, pending) = store
        .set_async(
            "user",
            async { Err::<Value, _>(anyhow::anyhow!("lookup failed")) },
            &[],
        )
        .unwrap();

    let err = pending.await.unwrap_err();
    assert!(matches!(err, StoreError::AsyncResolution { ref key, .. } if key == "user"));
    assert_eq!(store.get("user"), Some(json!("previous")));
}

#[tokio::test]
async fn aborted_write_never_lands() {
    let store = Store::new();
    let (_tx, rx) = oneshot::channel::<Value>();

    let (_, pending) = store.set_async("user", rx, &[]).unwrap();
    pending.abort();

    let err = pending.await.unwrap_err();
    assert!(matches!(err, StoreError::Cancelled { ref key } if key == "user"));
    assert_eq!(store.get("user"), None);
}

#[tokio::test]
async fn last_completion_wins() {
    let store = Store::new();

    let (_, slow) = store
        .set_async(
            "k",
            async {
                tokio::time::sleep(Duration::from_millis(30)).await;
                Ok::<_, anyhow::Error>(json!("slow"))
            },
            &[],
        )
        .unwrap();
    let (_, fast) = store
        .set_async("k", async { Ok::<_, anyhow::Error>(json!("fast")) }, &[])
        .unwrap();

    fast.await.unwrap();
    slow.await.unwrap();
    assert_eq!(store.get("k"), Some(json!("slow")));
}

#[test]
fn requires_a_runtime() {
    let store = Store::new();
    let result = store.set_async("k", async { Ok::<_, anyhow::Error>(json!(1)) }, &[]);
    assert!(matches!(result, Err(StoreError::NoRuntime)));
}
