//! Hook registry shared by every node of one entry tree.
//!
//! Two kinds of hooks exist:
//!
//! - [`OnLoadHook`]: enrichment, run once per node on its first `get`, with
//!   mutable access to the node's fields.
//! - [`OnAccessHook`]: instrumentation, run on every `get` with read-only
//!   access to the fields and the requested key.
//!
//! Both lists are fixed once the registry is frozen into an `Arc` and handed
//! to the tree builder.
//!
//! # Re-entrancy
//!
//! A hook only ever sees the [`Fields`] of the node being read, never the
//! node itself, and `EntryNode::get` holds `&mut self` while hooks run. A hook
//! therefore cannot read the node it is loading; it may read *nested* nodes
//! found in the fields, which run their own hooks.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::{Error, Key, Value};

/// The fields of one entry level, in document order.
pub type Fields = IndexMap<Key, Value>;

/// Enrichment hook fired once per node, before the first read completes.
///
/// Implementations may add, overwrite or remove fields. Returning an error
/// aborts the read; the node stays unloaded and the whole on-load list runs
/// again on the next `get`.
pub trait OnLoadHook: Send + Sync {
    fn on_load(&self, fields: &mut Fields) -> Result<(), Error>;
}

/// Instrumentation hook fired on every read, after the load step.
pub trait OnAccessHook: Send + Sync {
    fn on_access(&self, fields: &Fields, key: &Key);
}

impl<H: OnLoadHook + ?Sized> OnLoadHook for Arc<H> {
    fn on_load(&self, fields: &mut Fields) -> Result<(), Error> {
        (**self).on_load(fields)
    }
}

impl<H: OnAccessHook + ?Sized> OnAccessHook for Arc<H> {
    fn on_access(&self, fields: &Fields, key: &Key) {
        (**self).on_access(fields, key)
    }
}

struct LoadFn<F>(F);

impl<F> OnLoadHook for LoadFn<F>
where
    F: Fn(&mut Fields) -> Result<(), Error> + Send + Sync,
{
    fn on_load(&self, fields: &mut Fields) -> Result<(), Error> {
        (self.0)(fields)
    }
}

struct AccessFn<F>(F);

impl<F> OnAccessHook for AccessFn<F>
where
    F: Fn(&Fields, &Key) + Send + Sync,
{
    fn on_access(&self, fields: &Fields, key: &Key) {
        (self.0)(fields, key)
    }
}

/// Ordered on-load and on-access hook lists.
///
/// # Example
///
/// ```rust
/// use cockpit_entry::{HookRegistry, Key, Value};
///
/// let hooks = HookRegistry::new()
///     .with_load_fn(|fields| {
///         fields.insert(Key::from("loaded"), Value::Bool(true));
///         Ok(())
///     })
///     .with_access_fn(|_fields, key| println!("read {}", key))
///     .into_shared();
/// assert_eq!(hooks.on_load_len(), 1);
/// ```
#[derive(Default)]
pub struct HookRegistry {
    on_load: Vec<Box<dyn OnLoadHook>>,
    on_access: Vec<Box<dyn OnAccessHook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an on-load hook.
    pub fn with_on_load(mut self, hook: impl OnLoadHook + 'static) -> Self {
        self.on_load.push(Box::new(hook));
        self
    }

    /// Append an on-access hook.
    pub fn with_on_access(mut self, hook: impl OnAccessHook + 'static) -> Self {
        self.on_access.push(Box::new(hook));
        self
    }

    /// Append a closure as an on-load hook.
    pub fn with_load_fn<F>(self, f: F) -> Self
    where
        F: Fn(&mut Fields) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.with_on_load(LoadFn(f))
    }

    /// Append a closure as an on-access hook.
    pub fn with_access_fn<F>(self, f: F) -> Self
    where
        F: Fn(&Fields, &Key) + Send + Sync + 'static,
    {
        self.with_on_access(AccessFn(f))
    }

    /// Freeze the registry so it can be shared by every node of a tree.
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn on_load_len(&self) -> usize {
        self.on_load.len()
    }

    pub fn on_access_len(&self) -> usize {
        self.on_access.len()
    }

    pub fn is_empty(&self) -> bool {
        self.on_load.is_empty() && self.on_access.is_empty()
    }

    /// Run every on-load hook in registration order, stopping at the first
    /// failure.
    pub(crate) fn run_load(&self, fields: &mut Fields) -> Result<(), Error> {
        for hook in &self.on_load {
            hook.on_load(fields)?;
        }
        Ok(())
    }

    pub(crate) fn run_access(&self, fields: &Fields, key: &Key) {
        for hook in &self.on_access {
            hook.on_access(fields, key);
        }
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("on_load", &self.on_load.len())
            .field("on_access", &self.on_access.len())
            .finish()
    }
}
