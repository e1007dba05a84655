//! Dependency bookkeeping between keys.
//!
//! The graph records which keys must be re-derived when another key changes.
//! Edges are append-only for the lifetime of the store.

mod dependencies;

pub(crate) use dependencies::DependencyGraph;
