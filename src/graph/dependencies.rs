use std::collections::HashMap;

/// Map from a dependency key to the keys derived from it.
///
/// Dependents are kept in declaration order, which is also the order in
/// which they are recomputed. Registering the same edge twice is allowed and
/// causes the dependent to be recomputed twice.
#[derive(Debug, Default)]
pub(crate) struct DependencyGraph {
    // dependency -> dependents
    dependents: HashMap<String, Vec<String>>,
}

impl DependencyGraph {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record that `dependent` must be recomputed whenever `dependency` changes.
    pub(crate) fn add_dependency(&mut self, dependency: &str, dependent: &str) {
        self.dependents
            .entry(dependency.to_string())
            .or_default()
            .push(dependent.to_string());
    }

    /// Ordered dependents of `key`, empty if none were declared.
    pub(crate) fn dependents_of(&self, key: &str) -> Vec<String> {
        self.dependents.get(key).cloned().unwrap_or_default()
    }
}
