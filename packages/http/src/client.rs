use http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value as JsonValue;
use url::Url;

use cockpit_entry::{EntrySource, Error as EntryError, Query};

use crate::config::ClientConfig;
use crate::error::Error;
use crate::types::{ApiResponse, EntriesResponse, QueryBody};

/// Header carrying the API token.
pub const TOKEN_HEADER: &str = "cockpit-token";

/// A blocking client for the Cockpit REST API.
///
/// Every request is a `GET` below `<base_url>/api/`, authenticated with the
/// `Cockpit-Token` header; query criteria travel as a JSON body.
///
/// # Example
///
/// ```ignore
/// use cockpit_http::CockpitClient;
/// use cockpit_entry::Query;
///
/// let client = CockpitClient::new("https://cms.example.com", "token")?;
/// let posts = client.entries("posts", &Query::new().with_limit(10))?;
/// let settings = client.singleton("settings")?;
/// ```
pub struct CockpitClient {
    client: Client,
    api_url: Url,
    headers: HeaderMap,
}

impl CockpitClient {
    /// Create a client for the site at `base_url`.
    pub fn new(base_url: &str, token: &str) -> Result<Self, Error> {
        Self::with_client(Client::new(), base_url, token)
    }

    /// Create a client with a custom reqwest client
    pub fn with_client(client: Client, base_url: &str, token: &str) -> Result<Self, Error> {
        let api_url = Self::api_url(base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static(TOKEN_HEADER),
            HeaderValue::from_str(token)?,
        );

        Ok(Self {
            client,
            api_url,
            headers,
        })
    }

    /// Create a client from deserialized settings.
    pub fn from_config(config: &ClientConfig) -> Result<Self, Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Self::with_client(builder.build()?, &config.base_url, &config.token)
    }

    fn api_url(base_url: &str) -> Result<Url, Error> {
        let url = Url::parse(&format!("{}/api/", base_url.trim_end_matches('/')))?;
        if url.cannot_be_a_base() {
            return Err(Error::InvalidUrl {
                message: format!("{} cannot be a base URL", base_url),
            });
        }
        Ok(url)
    }

    /// The API root every endpoint is resolved against.
    pub fn api_root(&self) -> &Url {
        &self.api_url
    }

    fn endpoint(&self, kind: &str, name: &str) -> Result<Url, Error> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidUrl {
                message: format!("{} cannot be a base URL", self.api_url),
            })?
            .pop_if_empty()
            .extend([kind, "get", name]);
        Ok(url)
    }

    /// Execute a `GET` with an optional JSON body.
    fn execute<B: Serialize>(&self, url: Url, body: Option<&B>) -> Result<ApiResponse, Error> {
        log::debug!("GET {}", url);

        let mut request = self.client.get(url).headers(self.headers.clone());
        if let Some(body) = body {
            request = request.body(serde_json::to_vec(body)?);
        }
        let response = request.send()?;

        let status = response.status().as_u16();
        let status_text = response
            .status()
            .canonical_reason()
            .unwrap_or("Unknown")
            .to_string();

        let body_text = response.text()?;
        let body = serde_json::from_str(&body_text).unwrap_or(JsonValue::Null);

        let response = ApiResponse {
            status,
            status_text,
            body,
            body_text,
        };

        if !response.is_success() {
            log::debug!("HTTP {} {}", response.status, response.status_text);
            return Err(Error::Status {
                status: response.status,
                status_text: response.status_text,
                body: response.body_text,
            });
        }

        Ok(response)
    }

    /// Entries of `collection` matching `query`.
    pub fn entries(&self, collection: &str, query: &Query) -> Result<Vec<JsonValue>, Error> {
        let url = self.endpoint("collections", collection)?;
        let response = self.execute(url, Some(&QueryBody::from(query)))?;

        let entries: EntriesResponse = response.json().map_err(|e| Error::UnexpectedBody {
            message: format!("collection '{}': {}", collection, e),
        })?;
        log::debug!(
            "collection '{}' returned {} entries",
            collection,
            entries.entries.len()
        );
        Ok(entries.entries)
    }

    /// The first entry of `collection` matching `query`, if any.
    pub fn entry(&self, collection: &str, query: &Query) -> Result<Option<JsonValue>, Error> {
        Ok(self.entries(collection, query)?.into_iter().next())
    }

    /// The singleton document `name`.
    pub fn singleton(&self, name: &str) -> Result<JsonValue, Error> {
        let url = self.endpoint("singletons", name)?;
        let response = self.execute::<JsonValue>(url, None)?;

        match response.body {
            JsonValue::Object(_) => Ok(response.body),
            other => Err(Error::UnexpectedBody {
                message: format!("singleton '{}' is not an object: {}", name, other),
            }),
        }
    }
}

impl EntrySource for CockpitClient {
    fn fetch_entries(&self, collection: &str, query: &Query) -> Result<Vec<JsonValue>, EntryError> {
        self.entries(collection, query).map_err(EntryError::from)
    }

    fn fetch_singleton(&self, name: &str) -> Result<JsonValue, EntryError> {
        self.singleton(name).map_err(EntryError::from)
    }
}
