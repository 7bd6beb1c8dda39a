//! Cockpit CMS client.
//!
//! [`Cockpit`] fetches documents through an [`EntrySource`] (normally a
//! [`CockpitClient`]) and hands them out as lazy [`EntryNode`] trees with
//! link resolution, locale overlay and caller-supplied access hooks wired in.
//!
//! # Example
//!
//! ```ignore
//! use cockpit::{Cockpit, Query};
//!
//! let cms = cockpit::connect("https://cms.example.com", "token")?
//!     .with_locale("de", "en");
//!
//! for mut post in cms.entries("posts", &Query::new().with_limit(10))? {
//!     println!("{}", post.get("title")?.to_json());
//! }
//! ```

use std::sync::Arc;

use serde_json::Value as JsonValue;

pub use cockpit_entry::{
    AssetLeaf, AssetPaths, EntryNode, EntrySource, Error, Fields, HookRegistry, IntoKey, Key,
    LinkResolver, LocaleOverlay, MemorySource, OnAccessHook, OnLoadHook, Query, SizePolicy,
    Value, DEFAULT_LINK_FIELD,
};
pub use cockpit_http::{ClientConfig, CockpitClient};

/// Connect to the Cockpit site at `base_url` with default options.
pub fn connect(base_url: &str, token: &str) -> Result<Cockpit, cockpit_http::Error> {
    Ok(Cockpit::new(Arc::new(CockpitClient::new(base_url, token)?)))
}

/// Connect using deserialized [`ClientConfig`] settings.
pub fn from_config(config: &ClientConfig) -> Result<Cockpit, cockpit_http::Error> {
    Ok(Cockpit::new(Arc::new(CockpitClient::from_config(config)?)))
}

/// Entry point for reading collections and singletons as entry trees.
///
/// Every fetched document gets its own [`HookRegistry`], assembled in a fixed
/// order: the link resolver (unless disabled), then the locale overlay (when
/// a locale is set), then the access hooks in registration order.
pub struct Cockpit {
    source: Arc<dyn EntrySource>,
    locale: Option<LocaleOverlay>,
    link_field: String,
    resolve_links: bool,
    access_hooks: Vec<Arc<dyn OnAccessHook>>,
    assets: AssetPaths,
}

impl Cockpit {
    pub fn new(source: Arc<dyn EntrySource>) -> Self {
        Self {
            source,
            locale: None,
            link_field: DEFAULT_LINK_FIELD.to_string(),
            resolve_links: true,
            access_hooks: Vec::new(),
            assets: AssetPaths::new(),
        }
    }

    /// Overlay `<field>_<requested>` values onto `<field>` when loading.
    pub fn with_locale(mut self, requested: impl Into<String>, default: impl Into<String>) -> Self {
        self.locale = Some(LocaleOverlay::new(requested, default));
        self
    }

    /// Field of a referenced entry substituted for its `collection://` token.
    pub fn with_link_field(mut self, field: impl Into<String>) -> Self {
        self.link_field = field.into();
        self
    }

    pub fn with_link_resolution(mut self, enabled: bool) -> Self {
        self.resolve_links = enabled;
        self
    }

    /// Add an on-access hook to every tree handed out from now on.
    pub fn with_access_hook(mut self, hook: impl OnAccessHook + 'static) -> Self {
        self.access_hooks.push(Arc::new(hook));
        self
    }

    pub fn with_assets(mut self, assets: AssetPaths) -> Self {
        self.assets = assets;
        self
    }

    pub fn locale(&self) -> Option<&LocaleOverlay> {
        self.locale.as_ref()
    }

    pub fn link_field(&self) -> &str {
        &self.link_field
    }

    pub fn assets(&self) -> &AssetPaths {
        &self.assets
    }

    /// Stored path of an asset or image field, optionally for one of its
    /// size variants.
    pub fn asset_path(&self, field: &Value, size: Option<&str>) -> Result<String, Error> {
        self.assets.resolve_value(field, size)
    }

    /// A fresh hook registry for one document.
    pub fn hooks(&self) -> Arc<HookRegistry> {
        let mut hooks = HookRegistry::new();
        if self.resolve_links {
            hooks = hooks.with_on_load(
                LinkResolver::new(Arc::clone(&self.source)).with_field(self.link_field.as_str()),
            );
        }
        if let Some(locale) = &self.locale {
            hooks = hooks.with_on_load(locale.clone());
        }
        for hook in &self.access_hooks {
            hooks = hooks.with_on_access(Arc::clone(hook));
        }
        hooks.into_shared()
    }

    /// Entries of `collection` matching `query`, one tree each.
    pub fn entries(&self, collection: &str, query: &Query) -> Result<Vec<EntryNode>, Error> {
        let documents = self.source.fetch_entries(collection, query)?;
        log::debug!(
            "building {} entries of collection '{}'",
            documents.len(),
            collection
        );
        documents
            .into_iter()
            .map(|document| self.tree(document))
            .collect()
    }

    /// The first entry of `collection` matching `query`.
    pub fn entry(&self, collection: &str, query: &Query) -> Result<Option<EntryNode>, Error> {
        let first = self
            .source
            .fetch_entries(collection, query)?
            .into_iter()
            .next();
        first.map(|document| self.tree(document)).transpose()
    }

    pub fn singleton(&self, name: &str) -> Result<EntryNode, Error> {
        let document = self.source.fetch_singleton(name)?;
        self.tree(document)
    }

    fn tree(&self, document: JsonValue) -> Result<EntryNode, Error> {
        EntryNode::from_document(document, self.hooks())
    }
}
