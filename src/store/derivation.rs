use super::State;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

type DeriveFn = dyn Fn(&State) -> anyhow::Result<Value> + Send + Sync;

/// A function computing a key's value from the whole store state.
///
/// Passing a derivation to `set` registers it for the key; every later
/// re-derivation of that key calls the same function.
#[derive(Clone)]
pub struct Derivation {
    compute: Arc<DeriveFn>,
}

impl Derivation {
    /// Wrap an infallible derivation.
    pub fn new<F, V>(f: F) -> Self
    where
        F: Fn(&State) -> V + Send + Sync + 'static,
        V: Into<Value>,
    {
        Self {
            compute: Arc::new(move |state| Ok(f(state).into())),
        }
    }

    /// Wrap a derivation that may fail. A failure aborts the write that triggered it.
    pub fn fallible<F>(f: F) -> Self
    where
        F: Fn(&State) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self {
            compute: Arc::new(f),
        }
    }

    pub(crate) fn compute(&self, state: &State) -> anyhow::Result<Value> {
        (self.compute)(state)
    }
}

impl fmt::Debug for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Derivation(..)")
    }
}

/// What a write stores: a plain value, or a derivation evaluated against the state.
#[derive(Debug, Clone)]
pub enum Input {
    Value(Value),
    Derived(Derivation),
}

impl From<Value> for Input {
    fn from(value: Value) -> Self {
        Input::Value(value)
    }
}

impl From<Derivation> for Input {
    fn from(derivation: Derivation) -> Self {
        Input::Derived(derivation)
    }
}

impl From<&str> for Input {
    fn from(value: &str) -> Self {
        Input::Value(Value::from(value))
    }
}

impl From<String> for Input {
    fn from(value: String) -> Self {
        Input::Value(Value::from(value))
    }
}

impl From<i64> for Input {
    fn from(value: i64) -> Self {
        Input::Value(Value::from(value))
    }
}

impl From<f64> for Input {
    fn from(value: f64) -> Self {
        Input::Value(Value::from(value))
    }
}

impl From<bool> for Input {
    fn from(value: bool) -> Self {
        Input::Value(Value::from(value))
    }
}
