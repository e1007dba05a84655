use super::{Plugin, PluginFactory};
use crate::error::{Result, StoreError};
use crate::store::{State, Store, StoreConfig};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

fn default_auto_save() -> bool {
    true
}

/// Settings for [`JsonFilePersistence`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Directory holding the state file.
    pub dir: PathBuf,
    /// File name; defaults to `<store id>.json`.
    #[serde(default)]
    pub file_name: Option<String>,
    /// Save after every write. Resets are always saved.
    #[serde(default = "default_auto_save")]
    pub auto_save: bool,
}

impl PersistenceConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            file_name: None,
            auto_save: default_auto_save(),
        }
    }

    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn auto_save(mut self, auto_save: bool) -> Self {
        self.auto_save = auto_save;
        self
    }
}

/// Keeps the store state in a JSON file.
///
/// - `init` restores the state from the file, if it holds any.
/// - `on_set` saves the full state when `auto_save` is on.
/// - `on_reset` always saves.
/// - `on_clear` empties the file.
///
/// Hook failures are logged and otherwise ignored.
#[derive(Debug)]
pub struct JsonFilePersistence {
    path: PathBuf,
    auto_save: bool,
}

impl JsonFilePersistence {
    pub const NAME: &'static str = "json-file";

    pub fn new(path: impl Into<PathBuf>, auto_save: bool) -> Self {
        Self {
            path: path.into(),
            auto_save,
        }
    }

    /// Factory resolving the file name from the store id when none is configured.
    pub fn factory(config: PersistenceConfig) -> impl PluginFactory {
        move |_: &Store, store_config: &StoreConfig| -> Vec<Arc<dyn Plugin>> {
            let file_name = config.file_name.clone().unwrap_or_else(|| {
                format!("{}.json", store_config.id.as_deref().unwrap_or("pantry"))
            });
            vec![Arc::new(JsonFilePersistence::new(
                config.dir.join(file_name),
                config.auto_save,
            ))]
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted state. `None` when the file is missing or empty.
    pub fn load(&self) -> Result<Option<State>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        if contents.trim().is_empty() {
            return Ok(None);
        }

        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(map)) => Ok(Some(map.into_iter().collect())),
            Ok(other) => Err(StoreError::Persistence(format!(
                "{} holds {}, expected an object",
                self.path.display(),
                type_name(&other)
            ))),
            Err(err) => Err(StoreError::Persistence(format!(
                "failed to parse {}: {}",
                self.path.display(),
                err
            ))),
        }
    }

    /// Write the full state of `store` to the file.
    pub fn save(&self, store: &Store) -> Result<()> {
        let json = serde_json::to_string(&store.state())
            .map_err(|e| StoreError::Persistence(format!("failed to encode state: {}", e)))?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), "state saved");
        Ok(())
    }

    /// Empty the file, leaving it in place.
    pub fn erase(&self) -> Result<()> {
        if self.path.exists() {
            fs::write(&self.path, "")?;
        }
        Ok(())
    }

    fn save_logged(&self, store: &Store) {
        if let Err(err) = self.save(store) {
            warn!(path = %self.path.display(), error = %err, "failed to save state");
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl Plugin for JsonFilePersistence {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn init(&self, store: &Store) {
        match self.load() {
            Ok(Some(state)) => {
                debug!(path = %self.path.display(), keys = state.len(), "state restored");
                store.replace_state(state);
            }
            Ok(None) => {}
            Err(err) => warn!(path = %self.path.display(), error = %err, "ignoring persisted state"),
        }
    }

    fn on_set(&self, store: &Store, _key: &str, _value: &Value) {
        if self.auto_save {
            self.save_logged(store);
        }
    }

    fn on_reset(&self, store: &Store) {
        self.save_logged(store);
    }

    fn on_clear(&self, _store: &Store) {
        if let Err(err) = self.erase() {
            warn!(path = %self.path.display(), error = %err, "failed to erase state");
        }
    }
}
