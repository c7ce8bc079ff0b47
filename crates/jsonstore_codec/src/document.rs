//! The in-memory document.

use crate::error::CodecError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::ops::{Deref, DerefMut};

/// A mutable tree of JSON-like values rooted at a string-keyed mapping.
///
/// `Document` is a plain value: `clone` is a full deep copy that shares
/// nothing with the original, and `==` compares the whole tree. Callers
/// edit it through the map it derefs to.
///
/// ```
/// use jsonstore_codec::Document;
/// use serde_json::json;
///
/// let mut doc = Document::new();
/// doc.insert("nested".into(), json!({"baz": 123}));
/// doc["nested"]["baz"] = json!(321);
///
/// let snapshot = doc.clone();
/// doc.remove("nested");
/// assert_eq!(snapshot["nested"]["baz"], 321);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Converts the document into a `Value::Object`.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl Deref for Document {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Document {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Map<String, Value>> for Document {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        doc.into_value()
    }
}

impl TryFrom<Value> for Document {
    type Error = CodecError;

    /// A `null` root is the empty document; any other non-object is rejected.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::new()),
            other => Err(CodecError::NotAMapping {
                found: kind_of(&other),
            }),
        }
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
