//! The query collaborator: where raw documents come from.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::{Map, Value as JsonValue};

use crate::Error;

/// Criteria for a collection query, forwarded verbatim to the CMS.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query {
    /// Field criteria, e.g. `{"_id": "42"}`.
    pub filter: Map<String, JsonValue>,
    /// Sort criteria, e.g. `{"_created": -1}`.
    pub sort: Map<String, JsonValue>,
    pub limit: Option<u64>,
    /// Ask the CMS to inline referenced entries.
    pub populate: bool,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.filter.insert(field.into(), value.into());
        self
    }

    pub fn with_sort(mut self, field: impl Into<String>, direction: i64) -> Self {
        self.sort.insert(field.into(), JsonValue::from(direction));
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_populate(mut self, populate: bool) -> Self {
        self.populate = populate;
        self
    }
}

/// Fetches raw CMS documents.
///
/// Implementations own everything about the transport: request building,
/// authentication and mapping of failures into [`Error::Transport`].
pub trait EntrySource: Send + Sync {
    /// Entries of `collection` matching `query`, in CMS order.
    fn fetch_entries(&self, collection: &str, query: &Query) -> Result<Vec<JsonValue>, Error>;

    /// The singleton document called `name`.
    fn fetch_singleton(&self, name: &str) -> Result<JsonValue, Error>;
}

impl<S: EntrySource + ?Sized> EntrySource for Arc<S> {
    fn fetch_entries(&self, collection: &str, query: &Query) -> Result<Vec<JsonValue>, Error> {
        (**self).fetch_entries(collection, query)
    }

    fn fetch_singleton(&self, name: &str) -> Result<JsonValue, Error> {
        (**self).fetch_singleton(name)
    }
}

/// An in-memory [`EntrySource`] for tests and offline use.
///
/// Filters match on top-level field equality; `limit` is honoured; `sort`
/// and `populate` are ignored. Every fetch is counted.
#[derive(Debug, Default)]
pub struct MemorySource {
    collections: HashMap<String, Vec<JsonValue>>,
    singletons: HashMap<String, JsonValue>,
    fetches: AtomicUsize,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, collection: impl Into<String>, entry: JsonValue) -> Self {
        self.collections
            .entry(collection.into())
            .or_default()
            .push(entry);
        self
    }

    pub fn with_singleton(mut self, name: impl Into<String>, document: JsonValue) -> Self {
        self.singletons.insert(name.into(), document);
        self
    }

    /// Number of fetches served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl EntrySource for MemorySource {
    fn fetch_entries(&self, collection: &str, query: &Query) -> Result<Vec<JsonValue>, Error> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let entries = self
            .collections
            .get(collection)
            .ok_or_else(|| Error::Transport {
                message: format!("unknown collection '{}'", collection),
            })?;

        let matching = entries
            .iter()
            .filter(|entry| {
                query
                    .filter
                    .iter()
                    .all(|(field, expected)| entry.get(field) == Some(expected))
            })
            .take(query.limit.map_or(usize::MAX, |n| n as usize))
            .cloned()
            .collect();
        Ok(matching)
    }

    fn fetch_singleton(&self, name: &str) -> Result<JsonValue, Error> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.singletons
            .get(name)
            .cloned()
            .ok_or_else(|| Error::Transport {
                message: format!("unknown singleton '{}'", name),
            })
    }
}
