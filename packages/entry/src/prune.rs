//! Removal of metadata-only items from collections.
//!
//! Cockpit repeater and collection-link fields come back as lists whose items
//! may carry nothing but reserved `_`-prefixed fields (`_id`, `_by`, ...)
//! once their own empty sub-lists are gone. Pruning drops those husks so
//! callers never see them.

use serde_json::{Map, Value as JsonValue};

use crate::shape::{self, Shape};

enum ItemOutcome {
    Keep,
    Drop,
    /// Not a container: the rest of the list is plain data.
    Stop,
}

/// Prune a collection in place.
///
/// Entry maps and scalars are left untouched. For list-shaped values every
/// item is inspected in order:
///
/// - a scalar item ends processing; it and everything after it are kept;
/// - a map item first has its list-shaped fields pruned recursively, and any
///   such field left empty is deleted; the item is then dropped if every
///   remaining key starts with `_` (so an item with no keys is dropped);
/// - a list-shaped item (an array, or an object keyed `"0"`, `"1"`, ...) is
///   pruned recursively as a collection and dropped if it ends up empty;
/// - asset descriptors are kept as they are.
///
/// Survivors keep their relative order.
///
/// Pruning recurses natively, one frame per nesting level.
pub fn prune_collection(value: &mut JsonValue) {
    if shape::classify(value) != Shape::List {
        return;
    }

    let mut stopped = false;
    let mut visit = |item: &mut JsonValue| -> bool {
        if stopped {
            return true;
        }
        match prune_item(item) {
            ItemOutcome::Keep => true,
            ItemOutcome::Drop => false,
            ItemOutcome::Stop => {
                stopped = true;
                true
            }
        }
    };

    match value {
        JsonValue::Array(items) => items.retain_mut(|item| visit(item)),
        JsonValue::Object(map) => map.retain(|_, item| visit(item)),
        _ => {}
    }
}

/// Prune every collection reachable from a document through entry maps.
///
/// The document's own fields are never deleted, even when the list they
/// hold ends up empty. A list-shaped document is pruned as a collection.
pub fn prune_document(document: &mut JsonValue) {
    match shape::classify(document) {
        Shape::List => prune_collection(document),
        Shape::Entry => {
            if let JsonValue::Object(fields) = document {
                for field in fields.values_mut() {
                    prune_document(field);
                }
            }
        }
        Shape::Asset | Shape::Scalar => {}
    }
}

fn prune_item(item: &mut JsonValue) -> ItemOutcome {
    match shape::classify(item) {
        Shape::Scalar => ItemOutcome::Stop,
        Shape::Asset => ItemOutcome::Keep,
        Shape::List => {
            prune_collection(item);
            if shape::is_empty_container(item) {
                ItemOutcome::Drop
            } else {
                ItemOutcome::Keep
            }
        }
        Shape::Entry => match item {
            JsonValue::Object(fields) => {
                prune_fields(fields);
                if fields.keys().all(|k| k.starts_with('_')) {
                    ItemOutcome::Drop
                } else {
                    ItemOutcome::Keep
                }
            }
            _ => ItemOutcome::Keep,
        },
    }
}

fn prune_fields(fields: &mut Map<String, JsonValue>) {
    fields.retain(|_, field| {
        if !shape::is_list_shaped(field) {
            return true;
        }
        prune_collection(field);
        !shape::is_empty_container(field)
    });
}
