//! EntryNode - one lazily enriched level of an entry tree.

use std::fmt;
use std::sync::Arc;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};

use crate::{build, prune, Error, Fields, HookRegistry, IntoKey, Key, Value};

/// A map-like view over one level of an entry.
///
/// Reading a field with [`get`](Self::get) drives the lazy-load protocol:
///
/// 1. on the first successful `get` of *this* node, every on-load hook runs
///    in registration order against the node's fields, then the node is
///    marked initialized and on-load never runs for it again;
/// 2. on every `get`, every on-access hook runs with the fields and the key;
/// 3. the value is returned, or [`Error::MissingKey`] if the key is absent.
///
/// Loading is per node: reading a parent never loads its children. If an
/// on-load hook fails, the error is returned as is and the node stays
/// uninitialized, so the next `get` runs the whole on-load list again.
///
/// Every other operation (`set`, `contains_key`, `remove`, `len`, iteration)
/// works on the fields directly and never runs hooks. In particular,
/// **iterating a node does not load it**: fields seen through `iter` are the
/// raw, not-yet-enriched values until some `get` has happened.
///
/// # Example
///
/// ```rust
/// use cockpit_entry::{EntryNode, HookRegistry, Key, Value};
/// use serde_json::json;
///
/// let hooks = HookRegistry::new()
///     .with_load_fn(|fields| {
///         fields.insert(Key::from("greeting"), Value::from("hi"));
///         Ok(())
///     })
///     .into_shared();
///
/// let mut node = EntryNode::from_document(json!({"title": "Hello"}), hooks).unwrap();
/// assert!(!node.contains_key("greeting"));
/// assert_eq!(node.get("greeting").unwrap(), &Value::from("hi"));
/// ```
#[derive(Clone)]
pub struct EntryNode {
    fields: Fields,
    initialized: bool,
    hooks: Arc<HookRegistry>,
}

impl EntryNode {
    /// Create an empty node.
    pub fn new(hooks: Arc<HookRegistry>) -> Self {
        Self::with_fields(Fields::new(), hooks)
    }

    /// Create a node over already-built fields.
    pub fn with_fields(fields: Fields, hooks: Arc<HookRegistry>) -> Self {
        Self {
            fields,
            initialized: false,
            hooks,
        }
    }

    /// Prune a raw CMS document and build it into a tree sharing `hooks`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDocument`] if the document is not a JSON object.
    pub fn from_document(mut document: JsonValue, hooks: Arc<HookRegistry>) -> Result<Self, Error> {
        prune::prune_document(&mut document);
        match document {
            JsonValue::Object(map) => Ok(build::build(map, hooks)),
            other => Err(Error::InvalidDocument {
                message: format!("expected an object, got {}", other),
            }),
        }
    }

    /// Build from an already pruned raw map.
    pub fn from_map(map: Map<String, JsonValue>, hooks: Arc<HookRegistry>) -> Self {
        build::build(map, hooks)
    }

    /// Read a field, running the lazy-load protocol.
    pub fn get(&mut self, key: impl IntoKey) -> Result<&Value, Error> {
        self.get_mut(key).map(|value| &*value)
    }

    /// Like [`get`](Self::get), but hands out a mutable reference, which is
    /// what reading into a nested entry needs.
    pub fn get_mut(&mut self, key: impl IntoKey) -> Result<&mut Value, Error> {
        let key = key.into_key()?;
        self.load()?;
        self.hooks.run_access(&self.fields, &key);
        self.fields
            .get_mut(&key)
            .ok_or_else(|| Error::missing_key(&key))
    }

    /// Follow a key path through nested entries and lists.
    ///
    /// Each entry passed through is read with `get`, so its hooks fire as if
    /// the caller had read it by hand. List positions are plain lookups.
    pub fn get_in<I>(&mut self, path: I) -> Result<&mut Value, Error>
    where
        I: IntoIterator,
        I::Item: IntoKey,
    {
        let mut keys = path.into_iter();
        let first = keys
            .next()
            .ok_or_else(|| Error::invalid_key("empty key path"))?;
        let mut current = self.get_mut(first)?;

        for key in keys {
            let key = key.into_key()?;
            current = match current {
                Value::Entry(node) => node.get_mut(key)?,
                Value::List(items) => match key {
                    Key::Index(index) => items
                        .get_mut(index)
                        .ok_or_else(|| Error::missing_key(index))?,
                    Key::Name(name) => return Err(Error::missing_key(name)),
                },
                _ => return Err(Error::NotAnEntry { key: key.to_string() }),
            };
        }

        Ok(current)
    }

    /// Run the on-load hooks if this node has not been loaded yet.
    ///
    /// This is the load step of `get` without the access hooks; it never
    /// loads nested nodes.
    pub fn load(&mut self) -> Result<(), Error> {
        if self.initialized {
            return Ok(());
        }
        if self.hooks.on_load_len() > 0 {
            log::debug!(
                "running {} on-load hook(s) over {} field(s)",
                self.hooks.on_load_len(),
                self.fields.len()
            );
        }
        self.hooks.run_load(&mut self.fields)?;
        self.initialized = true;
        Ok(())
    }

    /// Write a field directly, bypassing every hook.
    ///
    /// An existing key keeps its position; a new key is appended.
    pub fn set(&mut self, key: impl IntoKey, value: impl Into<Value>) -> Result<(), Error> {
        let key = key.into_key()?;
        self.fields.insert(key, value.into());
        Ok(())
    }

    /// Direct membership test. Invalid keys are simply absent.
    pub fn contains_key(&self, key: impl IntoKey) -> bool {
        matches!(key.into_key(), Ok(key) if self.fields.contains_key(&key))
    }

    /// Remove a field directly, keeping the order of the others.
    pub fn remove(&mut self, key: impl IntoKey) -> Result<Option<Value>, Error> {
        let key = key.into_key()?;
        Ok(self.fields.shift_remove(&key))
    }

    /// Number of fields at this level.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether on-load hooks have completed for this node.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Iterate over current fields in order. Does not load the node.
    pub fn iter(&self) -> indexmap::map::Iter<'_, Key, Value> {
        self.fields.iter()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, Key, Value> {
        self.fields.keys()
    }

    /// The current fields, without loading.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn into_fields(self) -> Fields {
        self.fields
    }

    pub fn hooks(&self) -> &Arc<HookRegistry> {
        &self.hooks
    }

    /// Plain JSON of the current contents, without loading anything.
    pub fn to_json(&self) -> JsonValue {
        let map = self
            .fields
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_json()))
            .collect();
        JsonValue::Object(map)
    }
}

impl<'a> IntoIterator for &'a EntryNode {
    type Item = (&'a Key, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Nodes compare by their fields only.
impl PartialEq for EntryNode {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl fmt::Debug for EntryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryNode")
            .field("initialized", &self.initialized)
            .field("fields", &self.fields)
            .finish()
    }
}

impl Serialize for EntryNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
