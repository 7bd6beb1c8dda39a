//! Wrapping pruned documents into entry trees.
//!
//! The builder walks the document with an explicit work stack instead of
//! native recursion. Pruning, `to_json`, serialization, `Clone` and `Drop`
//! of the built tree still recurse natively, so this bounds the builder only,
//! not the whole `EntryNode::from_document` path.

use std::sync::Arc;

use serde_json::{Map, Value as JsonValue};

use crate::shape::{self, Shape};
use crate::{AssetLeaf, EntryNode, Fields, HookRegistry, Key, Value};

/// Build an [`EntryNode`] from a raw entry map.
///
/// The root is always exposed as a node, whatever its keys look like. Every
/// nested node receives the same `hooks`.
pub fn build(raw: Map<String, JsonValue>, hooks: Arc<HookRegistry>) -> EntryNode {
    match drive(vec![Frame::entry(raw)], None, &hooks) {
        Value::Entry(node) => node,
        _ => EntryNode::new(hooks),
    }
}

/// Build any raw value into a tree value.
///
/// - asset descriptors become [`Value::Asset`] untouched;
/// - list-shaped values become [`Value::List`], items built by these rules;
/// - entry maps become [`Value::Entry`];
/// - scalars pass through.
pub fn build_value(value: JsonValue, hooks: &Arc<HookRegistry>) -> Value {
    drive(Vec::new(), Some(value), hooks)
}

fn drive(mut stack: Vec<Frame>, mut pending: Option<JsonValue>, hooks: &Arc<HookRegistry>) -> Value {
    loop {
        let mut finished = match pending.take() {
            Some(raw) => match open(raw) {
                Opened::Leaf(value) => Some(value),
                Opened::Frame(frame) => {
                    stack.push(frame);
                    None
                }
            },
            None => None,
        };

        loop {
            let Some(top) = stack.last_mut() else {
                return finished.unwrap_or_default();
            };
            if let Some(value) = finished.take() {
                top.attach(value);
            }
            if let Some(child) = top.next_child() {
                pending = Some(child);
                break;
            }
            if let Some(frame) = stack.pop() {
                finished = Some(frame.finish(hooks));
            }
        }
    }
}

enum Opened {
    Leaf(Value),
    Frame(Frame),
}

fn open(raw: JsonValue) -> Opened {
    match shape::classify(&raw) {
        Shape::Scalar => Opened::Leaf(scalar(raw)),
        Shape::Asset => match raw {
            JsonValue::Object(map) => Opened::Leaf(Value::Asset(AssetLeaf::new(map))),
            other => Opened::Leaf(scalar(other)),
        },
        Shape::List => {
            let items: Vec<JsonValue> = match raw {
                JsonValue::Array(items) => items,
                JsonValue::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
                _ => Vec::new(),
            };
            Opened::Frame(Frame::List {
                built: Vec::with_capacity(items.len()),
                pending: items.into_iter(),
            })
        }
        Shape::Entry => match raw {
            JsonValue::Object(map) => Opened::Frame(Frame::entry(map)),
            other => Opened::Leaf(scalar(other)),
        },
    }
}

fn scalar(raw: JsonValue) -> Value {
    match raw {
        JsonValue::Bool(b) => Value::Bool(b),
        JsonValue::Number(n) => Value::Number(n),
        JsonValue::String(s) => Value::String(s),
        _ => Value::Null,
    }
}

/// A container whose children are still being built.
enum Frame {
    Entry {
        built: Fields,
        pending: serde_json::map::IntoIter,
        /// Key of the child currently being built.
        key: Option<Key>,
    },
    List {
        built: Vec<Value>,
        pending: std::vec::IntoIter<JsonValue>,
    },
}

impl Frame {
    fn entry(map: Map<String, JsonValue>) -> Self {
        Frame::Entry {
            built: Fields::with_capacity(map.len()),
            pending: map.into_iter(),
            key: None,
        }
    }

    fn next_child(&mut self) -> Option<JsonValue> {
        match self {
            Frame::Entry { pending, key, .. } => {
                let (name, child) = pending.next()?;
                *key = Some(Key::name(name));
                Some(child)
            }
            Frame::List { pending, .. } => pending.next(),
        }
    }

    fn attach(&mut self, value: Value) {
        match self {
            Frame::Entry { built, key, .. } => {
                if let Some(key) = key.take() {
                    built.insert(key, value);
                }
            }
            Frame::List { built, .. } => built.push(value),
        }
    }

    fn finish(self, hooks: &Arc<HookRegistry>) -> Value {
        match self {
            Frame::Entry { built, .. } => {
                Value::Entry(EntryNode::with_fields(built, Arc::clone(hooks)))
            }
            Frame::List { built, .. } => Value::List(built),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hooks() -> Arc<HookRegistry> {
        HookRegistry::new().into_shared()
    }

    fn object(value: JsonValue) -> Map<String, JsonValue> {
        match value {
            JsonValue::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn wraps_nested_entries() {
        let node = build(
            object(json!({"title": "Hello", "author": {"name": "Ann"}})),
            hooks(),
        );
        assert_eq!(node.len(), 2);
        let author = node.fields()[&Key::from("author")].as_entry().unwrap();
        assert_eq!(author.fields()[&Key::from("name")], Value::from("Ann"));
    }

    #[test]
    fn assets_stay_leaves() {
        let node = build(
            object(json!({"image": {"path": "/a.jpg", "mime": "image/jpeg", "meta": {"x": 1}}})),
            hooks(),
        );
        let image = node.fields()[&Key::from("image")].as_asset().unwrap();
        assert_eq!(image.path(), Some("/a.jpg"));
        assert_eq!(image.get("meta"), Some(&json!({"x": 1})));
    }

    #[test]
    fn collections_become_lists_of_entries() {
        let node = build(
            object(json!({"tags": ["a", "b"], "items": [{"t": 1}, 2, [3]]})),
            hooks(),
        );
        let tags = node.fields()[&Key::from("tags")].as_list().unwrap();
        assert_eq!(tags, &[Value::from("a"), Value::from("b")]);

        let items = node.fields()[&Key::from("items")].as_list().unwrap();
        assert!(items[0].as_entry().is_some());
        assert_eq!(items[1].as_i64(), Some(2));
        assert_eq!(items[2].as_list().map(|l| l.len()), Some(1));
    }

    #[test]
    fn positional_objects_become_lists() {
        let value = build_value(json!({"0": {"a": 1}, "1": {"a": 2}}), &hooks());
        let items = value.as_list().unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|v| v.as_entry().is_some()));
    }

    #[test]
    fn nodes_share_one_registry() {
        let shared = hooks();
        let node = build(object(json!({"a": {"b": {"c": 1}}})), Arc::clone(&shared));
        let a = node.fields()[&Key::from("a")].as_entry().unwrap();
        let b = a.fields()[&Key::from("b")].as_entry().unwrap();
        assert!(Arc::ptr_eq(node.hooks(), &shared));
        assert!(Arc::ptr_eq(b.hooks(), &shared));
    }

    #[test]
    fn preserves_document_order() {
        let node = build(object(json!({"z": 1, "a": 2, "m": 3})), hooks());
        let keys: Vec<String> = node.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn builder_handles_deep_nesting() {
        let mut raw = json!("leaf");
        for _ in 0..2_000 {
            let mut map = Map::new();
            map.insert("child".to_string(), raw);
            raw = JsonValue::Object(map);
        }
        let mut value = build_value(raw, &hooks());
        let mut depth = 0;
        while let Value::Entry(node) = value {
            value = node.into_fields().shift_remove(&Key::from("child")).unwrap();
            depth += 1;
        }
        assert_eq!(depth, 2_000);
        assert_eq!(value, Value::from("leaf"));
    }
}
