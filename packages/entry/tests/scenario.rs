use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::{json, Value as JsonValue};

use cockpit_entry::prune::prune_document;
use cockpit_entry::{
    EntryNode, HookRegistry, Key, LinkResolver, LocaleOverlay, MemorySource, Value,
};

fn page_document() -> JsonValue {
    json!({
        "title": "Hello",
        "ref": "collection://pages/42",
        "gallery": [{"_id": "1"}, {"_id": "2", "caption": "x"}]
    })
}

#[test]
fn link_resolution_and_gallery_pruning() {
    let source = Arc::new(
        MemorySource::new().with_entry("pages", json!({"_id": "42", "slug": "about"})),
    );
    let hooks = HookRegistry::new()
        .with_on_load(LinkResolver::new(source.clone()))
        .into_shared();

    let mut entry = EntryNode::from_document(page_document(), hooks).unwrap();

    let gallery = entry.fields()[&Key::from("gallery")].as_list().unwrap();
    assert_eq!(gallery.len(), 1);
    let item = gallery[0].as_entry().unwrap();
    assert_eq!(item.fields()[&Key::from("caption")], Value::from("x"));

    assert_eq!(entry.get("ref").unwrap(), &Value::from("about"));
    assert_eq!(entry.get("title").unwrap(), &Value::from("Hello"));
    assert_eq!(source.fetch_count(), 1);
}

#[test]
fn prune_and_build_is_idempotent() {
    let hooks = HookRegistry::new().into_shared();
    let document = json!({
        "title": "Hello",
        "blocks": [
            {"_id": "a", "items": [{"_id": "x"}]},
            {"_id": "b", "text": "kept", "items": [{"_id": "y"}, {"label": "z"}]},
            {"path": "/a.jpg", "mime": "image/jpeg", "sizes": []}
        ],
        "tags": ["one", "two"]
    });

    let first = EntryNode::from_document(document.clone(), Arc::clone(&hooks)).unwrap();
    let second = EntryNode::from_document(document.clone(), Arc::clone(&hooks)).unwrap();
    assert_eq!(first, second);

    let mut pruned = document;
    prune_document(&mut pruned);
    let again = EntryNode::from_document(pruned, hooks).unwrap();
    assert_eq!(first, again);
    assert_eq!(
        first.to_json(),
        json!({
            "title": "Hello",
            "blocks": [
                {"_id": "b", "text": "kept", "items": [{"label": "z"}]},
                {"path": "/a.jpg", "mime": "image/jpeg", "sizes": []}
            ],
            "tags": ["one", "two"]
        })
    );
}

#[test]
fn link_then_locale_on_nested_entries() {
    let source = Arc::new(
        MemorySource::new()
            .with_entry("pages", json!({"_id": "42", "slug": "about"}))
            .with_entry("pages", json!({"_id": "43", "slug": "ueber-uns"})),
    );
    let reads = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&reads);
    let hooks = HookRegistry::new()
        .with_on_load(LinkResolver::new(source.clone()))
        .with_on_load(LocaleOverlay::new("de", "en"))
        .with_access_fn(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .into_shared();

    let mut entry = EntryNode::from_document(
        json!({
            "menu": [
                {"label": "About", "label_de": "Über uns", "link": "collection://pages/42", "link_de": "collection://pages/43"},
                {"label": "Blog", "link": "/blog"}
            ]
        }),
        hooks,
    )
    .unwrap();

    let first = entry
        .get_in([Key::from("menu"), Key::Index(0)])
        .unwrap()
        .as_entry_mut()
        .unwrap();
    assert_eq!(first.get("label").unwrap(), &Value::from("Über uns"));
    assert_eq!(first.get("link").unwrap(), &Value::from("ueber-uns"));
    assert_eq!(source.fetch_count(), 2);

    let second = entry.get_in([Key::from("menu"), Key::Index(1), Key::from("link")]).unwrap();
    assert_eq!(second, &Value::from("/blog"));
    assert_eq!(reads.load(Ordering::SeqCst), 5);
}
