//! Error types for store operations.

use std::io;
use thiserror::Error;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while operating a [`Store`](crate::Store).
///
/// Reading an absent key is never an error; it yields `None`.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A dependent key was reached again while it was still being propagated.
    #[error("cyclic dependency on `{key}` (chain: {})", chain.join(" -> "))]
    CyclicDependency { key: String, chain: Vec<String> },

    /// A derivation function failed. Earlier steps of the write are not rolled back.
    #[error("derivation for `{key}` failed: {source}")]
    Derivation {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// The future behind a pending write resolved to an error.
    #[error("pending write for `{key}` failed: {source}")]
    AsyncResolution {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// The pending write was aborted before it completed.
    #[error("pending write for `{key}` was cancelled")]
    Cancelled { key: String },

    /// The task driving a pending write panicked.
    #[error("pending write for `{key}` panicked")]
    TaskPanicked { key: String },

    /// `set_async` was called outside of a tokio runtime.
    #[error("no tokio runtime available to resolve pending writes")]
    NoRuntime,

    /// Two plugins were registered under the same name.
    #[error("plugin `{0}` is already registered")]
    DuplicatePlugin(String),

    /// A stored value could not be decoded into the requested type.
    #[error("value for `{key}` could not be decoded: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Persisted state was malformed.
    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_lists_chain() {
        let err = StoreError::CyclicDependency {
            key: "a".to_string(),
            chain: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(err.to_string(), "cyclic dependency on `a` (chain: a -> b)");
    }

    #[test]
    fn derivation_error_keeps_source() {
        let err = StoreError::Derivation {
            key: "total".to_string(),
            source: anyhow::anyhow!("missing price"),
        };
        assert!(err.to_string().contains("missing price"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
