//! Property-based test generators using proptest.
//!
//! Strings are plain lowercase words so that no YAML scalar is ambiguous.
//! Floats are always finite.

use jsonstore_core::{Document, Map, Value};
use proptest::prelude::*;

/// Strategy for mapping keys.
pub fn key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,12}").expect("Invalid regex")
}

/// Strategy for scalar values.
pub fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        any::<f64>()
            .prop_filter("finite", |f| f.is_finite())
            .prop_map(Value::from),
        key_strategy().prop_map(Value::String),
    ]
}

/// Strategy for nested values up to a few levels deep.
pub fn value_strategy() -> impl Strategy<Value = Value> {
    scalar_strategy().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map(key_strategy(), inner, 0..4)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

/// Strategy for whole documents.
pub fn document_strategy() -> impl Strategy<Value = Document> {
    prop::collection::btree_map(key_strategy(), value_strategy(), 0..6)
        .prop_map(|entries| entries.into_iter().collect())
}

/// One edit applied to a document's top level.
#[derive(Debug, Clone)]
pub enum Mutation {
    /// Insert or overwrite a key
    Insert {
        /// Key
        key: String,
        /// New value
        value: Value,
    },
    /// Remove a key, if present
    Remove {
        /// Key
        key: String,
    },
    /// Set `outer.inner`, replacing `outer` if it is not a mapping
    SetNested {
        /// Top-level key
        outer: String,
        /// Nested key
        inner: String,
        /// New value
        value: Value,
    },
    /// Remove every key
    Clear,
}

impl Mutation {
    /// Applies the edit in place.
    pub fn apply(&self, doc: &mut Document) {
        match self {
            Self::Insert { key, value } => {
                doc.insert(key.clone(), value.clone());
            }
            Self::Remove { key } => {
                doc.remove(key);
            }
            Self::SetNested {
                outer,
                inner,
                value,
            } => {
                let slot = doc
                    .entry(outer.clone())
                    .or_insert_with(|| Value::Object(Map::new()));
                if !slot.is_object() {
                    *slot = Value::Object(Map::new());
                }
                if let Value::Object(map) = slot {
                    map.insert(inner.clone(), value.clone());
                }
            }
            Self::Clear => doc.clear(),
        }
    }
}

/// Applies every edit in order.
pub fn apply_all(doc: &mut Document, mutations: &[Mutation]) {
    for mutation in mutations {
        mutation.apply(doc);
    }
}

/// Strategy for a single edit.
pub fn mutation_strategy() -> impl Strategy<Value = Mutation> {
    prop_oneof![
        4 => (key_strategy(), value_strategy())
            .prop_map(|(key, value)| Mutation::Insert { key, value }),
        2 => key_strategy().prop_map(|key| Mutation::Remove { key }),
        2 => (key_strategy(), key_strategy(), scalar_strategy())
            .prop_map(|(outer, inner, value)| Mutation::SetNested { outer, inner, value }),
        1 => Just(Mutation::Clear),
    ]
}

/// Strategy for a sequence of edits.
pub fn mutation_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<Mutation>> {
    prop::collection::vec(mutation_strategy(), min_ops..max_ops)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 128,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
