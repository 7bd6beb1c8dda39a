use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cockpit::{Error, Query, Value};

#[tokio::test]
async fn test_page_with_reference_and_gallery() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/collections/get/posts"))
        .and(header("Cockpit-Token", "secret"))
        .and(body_json(json!({"filter": {}, "sort": {}, "limit": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": [{
                "title": "Hello",
                "title_de": "Hallo",
                "ref": "collection://pages/42",
                "gallery": [{"_id": "1"}, {"_id": "2", "caption": "x"}]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/collections/get/pages"))
        .and(body_json(json!({"filter": {"_id": "42"}, "sort": {}, "limit": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": [{"_id": "42", "slug": "about"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();

    let (title, reference, gallery) = tokio::task::spawn_blocking(move || {
        let cms = cockpit::connect(&uri, "secret")
            .unwrap()
            .with_locale("de", "en");
        let mut post = cms
            .entry("posts", &Query::new().with_limit(1))
            .unwrap()
            .unwrap();

        let title = post.get("title").unwrap().clone();
        let reference = post.get("ref").unwrap().clone();
        // A second read must not fetch the reference again.
        post.get("ref").unwrap();
        let gallery = post.get("gallery").unwrap().as_list().unwrap().len();
        (title, reference, gallery)
    })
    .await
    .unwrap();

    assert_eq!(title, Value::from("Hallo"));
    assert_eq!(reference, Value::from("about"));
    assert_eq!(gallery, 1);
}

#[tokio::test]
async fn test_unresolvable_reference() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/singletons/get/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "home": "collection://pages/404"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/collections/get/pages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"entries": []})))
        .mount(&server)
        .await;

    let uri = server.uri();

    let (result, initialized) = tokio::task::spawn_blocking(move || {
        let cms = cockpit::connect(&uri, "secret").unwrap();
        let mut settings = cms.singleton("settings").unwrap();
        let result = settings.get("home").map(Value::clone);
        (result, settings.is_initialized())
    })
    .await
    .unwrap();

    match result {
        Err(Error::LookupFailed { collection, id, .. }) => {
            assert_eq!(collection, "pages");
            assert_eq!(id, "404");
        }
        other => panic!("expected lookup failure, got {:?}", other),
    }
    assert!(!initialized);
}
