//! Resolution of `collection://<name>/<id>` references.

use std::sync::Arc;

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde_json::Value as JsonValue;

use crate::{EntrySource, Error, Fields, OnLoadHook, Query, Value};

/// Field substituted for a reference unless configured otherwise.
pub const DEFAULT_LINK_FIELD: &str = "slug";

lazy_static! {
    static ref LINK_TOKEN: Regex =
        Regex::new(r"collection://([0-9A-Za-z]+)/([0-9A-Za-z]+)")
            .expect("link token pattern is valid");
}

/// On-load hook replacing cross-entry references in string fields.
///
/// Every token found in a string field of the loading node is looked up with
/// `{"_id": <id>}` against `<collection>` and replaced by the configured
/// field of the first match. Strings are scanned at the node's own level
/// only; nested entries resolve their references when they are loaded.
///
/// Nothing is cached: the same reference appearing twice is fetched twice.
pub struct LinkResolver {
    source: Arc<dyn EntrySource>,
    field: String,
}

impl LinkResolver {
    pub fn new(source: Arc<dyn EntrySource>) -> Self {
        Self {
            source,
            field: DEFAULT_LINK_FIELD.to_string(),
        }
    }

    /// Substitute `field` of the referenced entry instead of its slug.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Replace every reference token in `text`.
    ///
    /// Returns `None` when `text` contains no token.
    pub fn resolve_text(&self, text: &str) -> Result<Option<String>, Error> {
        if !LINK_TOKEN.is_match(text) {
            return Ok(None);
        }

        let mut failure = None;
        let replaced = LINK_TOKEN.replace_all(text, |caps: &Captures| {
            if failure.is_some() {
                return caps[0].to_string();
            }
            match self.resolve_token(&caps[1], &caps[2]) {
                Ok(replacement) => replacement,
                Err(e) => {
                    failure = Some(e);
                    caps[0].to_string()
                }
            }
        });

        match failure {
            Some(e) => Err(e),
            None => Ok(Some(replaced.into_owned())),
        }
    }

    fn resolve_token(&self, collection: &str, id: &str) -> Result<String, Error> {
        let lookup_failed = |message: String| Error::LookupFailed {
            collection: collection.to_string(),
            id: id.to_string(),
            message,
        };

        log::debug!("resolving collection://{}/{}", collection, id);
        let query = Query::new().with_filter("_id", id).with_limit(1);
        let entries = self
            .source
            .fetch_entries(collection, &query)
            .map_err(|e| lookup_failed(e.to_string()))?;
        let entry = entries
            .first()
            .ok_or_else(|| lookup_failed("no such entry".to_string()))?;

        match entry.get(&self.field) {
            Some(JsonValue::String(s)) => Ok(s.clone()),
            Some(JsonValue::Number(n)) => Ok(n.to_string()),
            Some(_) => Err(lookup_failed(format!("field '{}' is not a string", self.field))),
            None => Err(lookup_failed(format!("entry has no '{}' field", self.field))),
        }
    }
}

impl OnLoadHook for LinkResolver {
    fn on_load(&self, fields: &mut Fields) -> Result<(), Error> {
        for value in fields.values_mut() {
            let Value::String(text) = value else {
                continue;
            };
            if let Some(resolved) = self.resolve_text(text)? {
                *text = resolved;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EntryNode, HookRegistry, Key, MemorySource};
    use serde_json::json;

    fn pages() -> Arc<MemorySource> {
        Arc::new(
            MemorySource::new()
                .with_entry("pages", json!({"_id": "42", "slug": "about", "siteName": "About us"}))
                .with_entry("pages", json!({"_id": "7", "slug": "contact"})),
        )
    }

    #[test]
    fn replaces_every_token_in_a_string() {
        let source = pages();
        let resolver = LinkResolver::new(source.clone());
        let text = "see collection://pages/42 or collection://pages/7, thanks";
        assert_eq!(
            resolver.resolve_text(text).unwrap().as_deref(),
            Some("see about or contact, thanks")
        );
        assert_eq!(source.fetch_count(), 2);
    }

    #[test]
    fn plain_text_is_untouched() {
        let source = pages();
        let resolver = LinkResolver::new(source.clone());
        assert_eq!(resolver.resolve_text("nothing here").unwrap(), None);
        assert_eq!(source.fetch_count(), 0);
    }

    #[test]
    fn repeated_reference_is_fetched_each_time() {
        let source = pages();
        let resolver = LinkResolver::new(source.clone());
        resolver
            .resolve_text("collection://pages/42 collection://pages/42")
            .unwrap();
        assert_eq!(source.fetch_count(), 2);
    }

    #[test]
    fn configurable_field() {
        let resolver = LinkResolver::new(pages()).with_field("siteName");
        assert_eq!(
            resolver.resolve_text("collection://pages/42").unwrap().as_deref(),
            Some("About us")
        );
    }

    #[test]
    fn missing_entry_fails_lookup() {
        let resolver = LinkResolver::new(pages());
        let err = resolver.resolve_text("collection://pages/999").unwrap_err();
        assert_eq!(
            err,
            Error::LookupFailed {
                collection: "pages".to_string(),
                id: "999".to_string(),
                message: "no such entry".to_string(),
            }
        );
    }

    #[test]
    fn token_ends_at_the_id() {
        let source = pages();
        let resolver = LinkResolver::new(source.clone());
        assert_eq!(
            resolver
                .resolve_text("collection://pages/42/ and collection://pages/7/extra")
                .unwrap()
                .as_deref(),
            Some("about/ and contact/extra")
        );
        assert_eq!(source.fetch_count(), 2);

        assert_eq!(resolver.resolve_text("collection://pages").unwrap(), None);
        assert_eq!(source.fetch_count(), 2);
    }

    #[test]
    fn transport_failure_becomes_lookup_failure() {
        let resolver = LinkResolver::new(pages());
        let err = resolver.resolve_text("collection://posts/1").unwrap_err();
        assert!(matches!(err, Error::LookupFailed { ref collection, .. } if collection == "posts"));
    }

    #[test]
    fn resolves_on_first_get_only() {
        let source = pages();
        let hooks = HookRegistry::new()
            .with_on_load(LinkResolver::new(source.clone()))
            .into_shared();
        let mut entry = EntryNode::from_document(
            json!({"title": "Hi", "ref": "collection://pages/42", "n": 3}),
            hooks,
        )
        .unwrap();

        assert_eq!(
            entry.fields()[&Key::from("ref")],
            Value::from("collection://pages/42")
        );
        assert_eq!(source.fetch_count(), 0);

        assert_eq!(entry.get("ref").unwrap(), &Value::from("about"));
        entry.get("title").unwrap();
        assert_eq!(source.fetch_count(), 1);
    }

    #[test]
    fn failed_resolution_leaves_node_unloaded() {
        let hooks = HookRegistry::new()
            .with_on_load(LinkResolver::new(pages()))
            .into_shared();
        let mut entry =
            EntryNode::from_document(json!({"ref": "collection://pages/999"}), hooks).unwrap();

        assert!(matches!(entry.get("ref"), Err(Error::LookupFailed { .. })));
        assert!(!entry.is_initialized());
    }
}
