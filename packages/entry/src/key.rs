//! Keys addressing one level of an entry tree.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::Error;

/// A key within an [`EntryNode`](crate::EntryNode): a field name or a list
/// position.
///
/// A name spelling a canonical non-negative integer (`"3"`, but not `"03"`)
/// and the index `3` are the same key. Every conversion below yields
/// `Index` for such names, so a node never holds both forms. Build keys with
/// [`Key::from`] or [`IntoKey`] rather than the `Name` variant directly.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// Named field, as found in CMS documents.
    Name(String),
    /// Non-negative position.
    Index(usize),
}

impl Key {
    /// The key for a field name, as an `Index` when the name is a canonical
    /// integer.
    pub fn name(name: impl Into<String>) -> Self {
        let name = name.into();
        match parse_index(&name) {
            Some(index) => Key::Index(index),
            None => Key::Name(name),
        }
    }

    /// The same key in canonical form.
    pub fn normalized(self) -> Self {
        match self {
            Key::Name(name) => Key::name(name),
            index => index,
        }
    }

    /// The field name, if this is a named key.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Key::Name(name) => Some(name),
            Key::Index(_) => None,
        }
    }

    /// The position, if this is an index key.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Key::Name(_) => None,
            Key::Index(index) => Some(*index),
        }
    }

    /// Whether this is a reserved (metadata) field such as `_id` or `_modified`.
    pub fn is_reserved(&self) -> bool {
        matches!(self, Key::Name(name) if name.starts_with('_'))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => write!(f, "{}", name),
            Key::Index(index) => write!(f, "{}", index),
        }
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Key::Name(name) => serializer.serialize_str(name),
            Key::Index(index) => serializer.serialize_u64(*index as u64),
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::name(name)
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::name(name)
    }
}

/// `"0"`, `"1"`, ... as positions; `"01"`, `"-1"` and out-of-range numbers
/// stay names.
pub(crate) fn parse_index(name: &str) -> Option<usize> {
    let canonical = !name.is_empty()
        && name.bytes().all(|b| b.is_ascii_digit())
        && (name == "0" || !name.starts_with('0'));
    if canonical {
        name.parse().ok()
    } else {
        None
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

/// Conversion into a [`Key`], failing with [`Error::InvalidKey`] for values
/// that are not scalar identifiers.
///
/// Every `EntryNode` operation that takes a key accepts `impl IntoKey`, so
/// callers can pass `"title"`, `3`, a `Key`, or a JSON value taken from some
/// other document.
pub trait IntoKey {
    fn into_key(self) -> Result<Key, Error>;
}

impl IntoKey for Key {
    fn into_key(self) -> Result<Key, Error> {
        Ok(self.normalized())
    }
}

impl IntoKey for &Key {
    fn into_key(self) -> Result<Key, Error> {
        Ok(self.clone().normalized())
    }
}

impl IntoKey for &str {
    fn into_key(self) -> Result<Key, Error> {
        Ok(Key::from(self))
    }
}

impl IntoKey for String {
    fn into_key(self) -> Result<Key, Error> {
        Ok(Key::name(self))
    }
}

impl IntoKey for &String {
    fn into_key(self) -> Result<Key, Error> {
        Ok(Key::name(self.as_str()))
    }
}

impl IntoKey for usize {
    fn into_key(self) -> Result<Key, Error> {
        Ok(Key::Index(self))
    }
}

impl IntoKey for &JsonValue {
    fn into_key(self) -> Result<Key, Error> {
        match self {
            JsonValue::String(name) => Ok(Key::name(name.as_str())),
            JsonValue::Number(n) => n
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .map(Key::Index)
                .ok_or_else(|| {
                    Error::invalid_key(format!("{} is not a non-negative integer", n))
                }),
            other => Err(Error::invalid_key(format!(
                "key must be either a string or an integer, {} given",
                json_type_name(other)
            ))),
        }
    }
}

impl IntoKey for JsonValue {
    fn into_key(self) -> Result<Key, Error> {
        (&self).into_key()
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
