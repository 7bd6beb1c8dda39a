//! Structural classification of raw JSON values.
//!
//! The CMS emits four shapes: scalars, asset descriptors, lists of entries and
//! entry maps. Both the pruner and the tree builder decide what to do with a
//! value through these predicates, never by inspecting it ad hoc.

use serde_json::{Map, Value as JsonValue};

use crate::key::parse_index;

/// The structural kind of a raw JSON value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    /// String, number, boolean or null.
    Scalar,
    /// Object carrying both `path` and `mime`.
    Asset,
    /// Array, or an object whose keys are all list positions.
    List,
    /// Any other object.
    Entry,
}

/// Classify a raw value. Asset detection takes precedence over everything
/// else so file descriptors are never treated as entries.
pub fn classify(value: &JsonValue) -> Shape {
    match value {
        JsonValue::Array(_) => Shape::List,
        JsonValue::Object(map) if is_asset_map(map) => Shape::Asset,
        JsonValue::Object(map) if is_positional_map(map) => Shape::List,
        JsonValue::Object(_) => Shape::Entry,
        _ => Shape::Scalar,
    }
}

pub fn is_asset_leaf(value: &JsonValue) -> bool {
    classify(value) == Shape::Asset
}

pub fn is_list_shaped(value: &JsonValue) -> bool {
    classify(value) == Shape::List
}

pub fn is_entry_map(value: &JsonValue) -> bool {
    classify(value) == Shape::Entry
}

/// A map or a list, i.e. anything that is not a scalar.
pub fn is_container(value: &JsonValue) -> bool {
    classify(value) != Shape::Scalar
}

/// An array or object with nothing left in it.
pub fn is_empty_container(value: &JsonValue) -> bool {
    match value {
        JsonValue::Array(items) => items.is_empty(),
        JsonValue::Object(map) => map.is_empty(),
        _ => false,
    }
}

pub(crate) fn is_asset_map(map: &Map<String, JsonValue>) -> bool {
    map.contains_key("path") && map.contains_key("mime")
}

/// Non-empty object keyed only by canonical non-negative integers
/// (`"0"`, `"1"`, ... but not `"01"`).
pub(crate) fn is_positional_map(map: &Map<String, JsonValue>) -> bool {
    !map.is_empty() && map.keys().all(|k| parse_index(k).is_some())
}
