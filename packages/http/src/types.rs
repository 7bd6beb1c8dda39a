use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use cockpit_entry::Query;

/// JSON body sent with collection requests.
///
/// `filter` and `sort` are always present; `limit` and `populate` only when
/// set.
#[derive(Debug, Clone, Serialize)]
pub struct QueryBody<'a> {
    pub filter: &'a Map<String, JsonValue>,
    pub sort: &'a Map<String, JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub populate: Option<u8>,
}

impl<'a> From<&'a Query> for QueryBody<'a> {
    fn from(query: &'a Query) -> Self {
        Self {
            filter: &query.filter,
            sort: &query.sort,
            limit: query.limit,
            populate: query.populate.then_some(1),
        }
    }
}

/// Body of `collections/get/<name>`.
#[derive(Debug, Clone, Deserialize)]
pub struct EntriesResponse {
    pub entries: Vec<JsonValue>,
}

/// HTTP response from the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,

    /// Status text (e.g., "OK", "Not Found")
    pub status_text: String,

    /// Response body as JSON; null if the body was empty or not JSON
    pub body: JsonValue,

    /// Raw body
    pub body_text: String,
}

impl ApiResponse {
    /// Check if the response status indicates success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Try to deserialize the body into a specific type
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.body.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minimal_body() {
        let query = Query::new();
        let body = serde_json::to_value(QueryBody::from(&query)).unwrap();
        assert_eq!(body, json!({"filter": {}, "sort": {}}));
    }

    #[test]
    fn full_body() {
        let query = Query::new()
            .with_filter("_id", "42")
            .with_sort("_created", -1)
            .with_limit(1)
            .with_populate(true);
        let body = serde_json::to_value(QueryBody::from(&query)).unwrap();
        assert_eq!(
            body,
            json!({"filter": {"_id": "42"}, "sort": {"_created": -1}, "limit": 1, "populate": 1})
        );
    }

    #[test]
    fn entries_response_ignores_extra_fields() {
        let response: EntriesResponse =
            serde_json::from_value(json!({"entries": [{"a": 1}], "total": 1})).unwrap();
        assert_eq!(response.entries, vec![json!({"a": 1})]);
    }

    #[test]
    fn success_range() {
        let mut response = ApiResponse {
            status: 204,
            status_text: "No Content".to_string(),
            body: JsonValue::Null,
            body_text: String::new(),
        };
        assert!(response.is_success());
        response.status = 404;
        assert!(!response.is_success());
    }
}
