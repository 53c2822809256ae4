//! The cross-line variable scope.
//!
//! The only state that survives a line: an ordered map from defined
//! names to their values. A name defined on line *k* is visible from
//! line *k + 1* on; re-definitions shadow for later lines.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use tally_eval::{Value, VarScope};

/// Ordered variable bindings for one document run.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    values: IndexMap<String, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind or shadow a name.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// The defined names, for the pruner.
    pub fn names(&self) -> FxHashSet<String> {
        self.values.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl VarScope for Scope {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.values.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_lookup() {
        let mut scope = Scope::new();
        assert!(scope.lookup("x").is_none());
        scope.define("x", Value::number(1.0));
        assert_eq!(scope.lookup("x"), Some(Value::number(1.0)));
    }

    #[test]
    fn test_shadowing_keeps_order() {
        let mut scope = Scope::new();
        scope.define("x", Value::number(1.0));
        scope.define("y", Value::number(2.0));
        scope.define("x", Value::number(3.0));
        assert_eq!(scope.lookup("x"), Some(Value::number(3.0)));
        assert_eq!(scope.len(), 2);
    }

    #[test]
    fn test_names() {
        let mut scope = Scope::new();
        scope.define("width", Value::number(1.0));
        let names = scope.names();
        assert!(names.contains("width"));
        assert!(!names.contains("height"));
    }
}
