//! Stored paths of assets and their size variants.

use serde_json::{Map, Value as JsonValue};

use crate::{AssetLeaf, Error, Value};

/// Small preview.
pub const SIZE_SMALL: &str = "small";
/// Thumbnail grid.
pub const SIZE_THUMBS: &str = "thumbs";
/// Page header image.
pub const SIZE_HEADER_IMG: &str = "headerimage";
/// Full resolution.
pub const SIZE_FULL: &str = "full";

/// What to do when a requested size is not listed in the descriptor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SizePolicy {
    /// Guess `<root>/<size>/<file name>`. The file may not exist.
    #[default]
    Fallback,
    /// Fail with [`Error::SizeNotFound`].
    Strict,
}

/// Computes asset paths relative to an uploads root.
///
/// # Example
///
/// ```rust
/// use cockpit_entry::{AssetLeaf, AssetPaths};
/// use serde_json::json;
///
/// let asset = match json!({"path": "/a/b/c.jpg", "mime": "image/jpeg"}) {
///     serde_json::Value::Object(map) => AssetLeaf::new(map),
///     _ => unreachable!(),
/// };
/// let paths = AssetPaths::new();
/// assert_eq!(paths.resolve(&asset, None).unwrap(), "/a/b/c.jpg");
/// assert_eq!(paths.resolve(&asset, Some("thumbs")).unwrap(), "/thumbs/c.jpg");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssetPaths {
    uploads_root: String,
    policy: SizePolicy,
}

impl AssetPaths {
    /// Resolver with an empty uploads root and the fallback policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix prepended to base paths and guessed variant paths.
    pub fn with_uploads_root(mut self, root: impl Into<String>) -> Self {
        let root: String = root.into();
        self.uploads_root = root.trim_end_matches('/').to_string();
        self
    }

    pub fn with_policy(mut self, policy: SizePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn uploads_root(&self) -> &str {
        &self.uploads_root
    }

    pub fn policy(&self) -> SizePolicy {
        self.policy
    }

    /// Resolve the stored path of `asset`, or of one of its size variants.
    ///
    /// - no size: the uploads root joined with the base `path`;
    /// - a size listed under `sizes`: that variant's `path`, verbatim;
    /// - any other size: per [`SizePolicy`].
    ///
    /// # Errors
    ///
    /// [`Error::MissingKey`] when the descriptor has no string `path`;
    /// [`Error::SizeNotFound`] under the strict policy.
    pub fn resolve(&self, asset: &AssetLeaf, size: Option<&str>) -> Result<String, Error> {
        self.resolve_map(asset.as_map(), size)
    }

    /// Resolve a field of a built tree.
    ///
    /// Image and gallery fields carry `path` and `meta` but no `mime`, so
    /// they are built as entries rather than asset-leaves; both are accepted.
    /// Entries are read as they are, without running their hooks.
    pub fn resolve_value(&self, value: &Value, size: Option<&str>) -> Result<String, Error> {
        match value {
            Value::Asset(asset) => self.resolve(asset, size),
            Value::Entry(node) => match node.to_json() {
                JsonValue::Object(map) => self.resolve_map(&map, size),
                _ => Err(Error::missing_key("path")),
            },
            _ => Err(Error::missing_key("path")),
        }
    }

    /// Resolve a raw descriptor: any object with a string `path`.
    pub fn resolve_map(
        &self,
        descriptor: &Map<String, JsonValue>,
        size: Option<&str>,
    ) -> Result<String, Error> {
        let path = descriptor
            .get("path")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| Error::missing_key("path"))?;

        let Some(size) = size else {
            return Ok(self.rooted(path));
        };

        if let Some(variant) = size_path(descriptor, size) {
            return Ok(variant.to_string());
        }

        match self.policy {
            SizePolicy::Strict => Err(Error::SizeNotFound {
                size: size.to_string(),
            }),
            SizePolicy::Fallback => {
                let file_name = path.rsplit('/').next().unwrap_or(path);
                Ok(format!("{}/{}/{}", self.uploads_root, size, file_name))
            }
        }
    }

    fn rooted(&self, path: &str) -> String {
        if self.uploads_root.is_empty() {
            return path.to_string();
        }
        format!("{}/{}", self.uploads_root, path.trim_start_matches('/'))
    }
}

/// `sizes.<size>.path` of a descriptor.
pub(crate) fn size_path<'a>(descriptor: &'a Map<String, JsonValue>, size: &str) -> Option<&'a str> {
    descriptor.get("sizes")?.get(size)?.get("path")?.as_str()
}
