use serde::{Deserialize, Serialize};

/// Construction options for a [`Store`](crate::Store).
///
/// The same value is handed to every plugin factory, so plugins can derive
/// their own settings (such as a file name) from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Identifier for the store, used in log events and by plugins.
    pub id: Option<String>,
}

impl StoreConfig {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self { id: Some(id.into()) }
    }
}
