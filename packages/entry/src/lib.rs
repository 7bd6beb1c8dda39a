//! Cockpit entry trees.
//!
//! Raw JSON documents from the Cockpit CMS become trees of [`EntryNode`]s:
//!
//! - `shape`: classification of raw values (asset, list, entry, scalar)
//! - `prune`: removal of metadata-only collection items
//! - `build`: wrapping of pruned documents into nodes sharing one
//!   [`HookRegistry`]
//! - [`EntryNode`]: the map-like view whose first `get` runs on-load hooks
//! - [`LinkResolver`], [`LocaleOverlay`]: the stock on-load hooks
//! - [`AssetPaths`]: stored paths of assets and their size variants
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use cockpit_entry::{EntryNode, HookRegistry, LinkResolver, MemorySource, Value};
//! use serde_json::json;
//!
//! let source = Arc::new(
//!     MemorySource::new().with_entry("pages", json!({"_id": "42", "slug": "about"})),
//! );
//! let hooks = HookRegistry::new()
//!     .with_on_load(LinkResolver::new(source))
//!     .into_shared();
//!
//! let mut entry = EntryNode::from_document(
//!     json!({"title": "Hello", "ref": "collection://pages/42"}),
//!     hooks,
//! )?;
//! assert_eq!(entry.get("ref")?, &Value::from("about"));
//! # Ok::<(), cockpit_entry::Error>(())
//! ```

mod asset;
pub mod build;
mod error;
mod hooks;
mod key;
mod link;
mod locale;
mod node;
pub mod prune;
pub mod shape;
mod source;
mod value;

pub use asset::{
    AssetPaths, SizePolicy, SIZE_FULL, SIZE_HEADER_IMG, SIZE_SMALL, SIZE_THUMBS,
};
pub use error::Error;
pub use hooks::{Fields, HookRegistry, OnAccessHook, OnLoadHook};
pub use key::{IntoKey, Key};
pub use link::{LinkResolver, DEFAULT_LINK_FIELD};
pub use locale::LocaleOverlay;
pub use node::EntryNode;
pub use source::{EntrySource, MemorySource, Query};
pub use value::{AssetLeaf, Value};
