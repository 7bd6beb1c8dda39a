//! The Value type - what an entry field can hold.

use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value as JsonValue};

use crate::EntryNode;

/// A field value inside an entry tree.
///
/// Scalars mirror JSON. Maps become either an [`AssetLeaf`] (opaque file
/// descriptor) or a nested [`EntryNode`]; list-shaped data becomes `List`.
/// See [`crate::shape`] for the classification rules.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// Stored file descriptor, never wrapped or recursed into.
    Asset(AssetLeaf),
    /// Nested entry with its own lazy-load state.
    Entry(EntryNode),
    /// Ordered sequence (collection of entries or plain scalar list).
    List(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_asset(&self) -> Option<&AssetLeaf> {
        match self {
            Value::Asset(asset) => Some(asset),
            _ => None,
        }
    }

    pub fn as_entry(&self) -> Option<&EntryNode> {
        match self {
            Value::Entry(node) => Some(node),
            _ => None,
        }
    }

    /// Mutable access to a nested entry; reading its fields needs `&mut`
    /// because the first `get` runs its on-load hooks.
    pub fn as_entry_mut(&mut self) -> Option<&mut EntryNode> {
        match self {
            Value::Entry(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Convert back to plain JSON.
    ///
    /// Walks the current contents without running any hooks, exactly like
    /// iteration does.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Number(n) => JsonValue::Number(n.clone()),
            Value::String(s) => JsonValue::String(s.clone()),
            Value::Asset(asset) => JsonValue::Object(asset.as_map().clone()),
            Value::Entry(node) => node.to_json(),
            Value::List(items) => JsonValue::Array(items.iter().map(Value::to_json).collect()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Asset(asset) => asset.as_map().serialize(serializer),
            Value::Entry(node) => node.serialize(serializer),
            Value::List(items) => items.serialize(serializer),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<AssetLeaf> for Value {
    fn from(asset: AssetLeaf) -> Self {
        Value::Asset(asset)
    }
}

impl From<EntryNode> for Value {
    fn from(node: EntryNode) -> Self {
        Value::Entry(node)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

/// A stored-file descriptor: at least `path` and `mime`, optionally a
/// `sizes` map of size name to `{ "path": ... }`.
///
/// Kept as the raw JSON object it arrived as.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AssetLeaf(Map<String, JsonValue>);

impl AssetLeaf {
    pub fn new(fields: Map<String, JsonValue>) -> Self {
        AssetLeaf(fields)
    }

    /// Base stored path, if present and a string.
    pub fn path(&self) -> Option<&str> {
        self.0.get("path").and_then(JsonValue::as_str)
    }

    pub fn mime(&self) -> Option<&str> {
        self.0.get("mime").and_then(JsonValue::as_str)
    }

    /// Path of a named size variant, if the descriptor lists it.
    pub fn size_path(&self, size: &str) -> Option<&str> {
        crate::asset::size_path(&self.0, size)
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, JsonValue> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, JsonValue> {
        self.0
    }
}
