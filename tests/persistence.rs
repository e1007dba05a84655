//! JSON file persistence plugin.

use pantry::{JsonFilePersistence, PersistenceConfig, Store};
use serde_json::json;
use std::fs;

fn persisted_store(config: PersistenceConfig) -> Store {
    Store::builder()
        .id("settings")
        .plugin(JsonFilePersistence::factory(config))
        .build()
        .unwrap()
}

#[test]
fn file_name_defaults_to_store_id() {
    let dir = tempfile::tempdir().unwrap();
    let store = persisted_store(PersistenceConfig::new(dir.path()));
    store.set("theme", json!("dark")).unwrap();

    let saved = fs::read_to_string(dir.path().join("settings.json")).unwrap();
    assert_eq!(saved, r#"{"theme":"dark"}"#);
}

#[test]
fn state_survives_reconstruction() {
    let dir = tempfile::tempdir().unwrap();
    let config = PersistenceConfig::new(dir.path()).file_name("state.json");

    {
        let store = persisted_store(config.clone());
        store.set("theme", json!("dark")).unwrap();
        store.set("volume", json!(7)).unwrap();
    }

    let restored = persisted_store(config);
    assert_eq!(restored.get("theme"), Some(json!("dark")));
    assert_eq!(restored.get("volume"), Some(json!(7)));
    assert_eq!(restored.plugin_names(), vec![JsonFilePersistence::NAME.to_string()]);
}

#[test]
fn restored_state_does_not_override_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = PersistenceConfig::new(dir.path());

    persisted_store(config.clone())
        .set("theme", json!("light"))
        .unwrap();

    let store = persisted_store(config);
    store.set_default("theme", json!("dark")).unwrap();
    assert_eq!(store.get("theme"), Some(json!("light")));
}

#[test]
fn without_auto_save_only_reset_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let store = persisted_store(PersistenceConfig::new(dir.path()).auto_save(false));

    store.set_default("theme", json!("dark")).unwrap();
    store.set("scratch", json!(1)).unwrap();
    assert!(!path.exists());

    store.reset().unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"theme":"dark"}"#);
}

#[test]
fn clear_empties_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let store = persisted_store(PersistenceConfig::new(dir.path()));
    store.set("theme", json!("dark")).unwrap();

    store.clear().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "");
    // An empty file restores nothing.
    let restored = persisted_store(PersistenceConfig::new(dir.path()));
    assert!(restored.keys().is_empty());
}

#[test]
fn malformed_file_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("settings.json"), "{not json").unwrap();

    let store = persisted_store(PersistenceConfig::new(dir.path()));
    assert!(store.keys().is_empty());
}
