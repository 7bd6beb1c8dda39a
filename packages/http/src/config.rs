use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Connection settings for a [`CockpitClient`](crate::CockpitClient).
///
/// Deserializable so applications can keep it in their own config files:
///
/// ```toml
/// base_url = "https://cms.example.com"
/// token = "account-token"
/// timeout_secs = 10
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Site root; `/api` is appended.
    pub base_url: String,

    /// API token sent as `Cockpit-Token`.
    pub token: String,

    /// Whole-request timeout. No timeout when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            timeout_secs: None,
        }
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_without_timeout() {
        let config: ClientConfig = serde_json::from_value(json!({
            "base_url": "https://cms.example.com",
            "token": "abc"
        }))
        .unwrap();
        assert_eq!(config, ClientConfig::new("https://cms.example.com", "abc"));
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn timeout_in_seconds() {
        let config = ClientConfig::new("https://cms.example.com", "abc").with_timeout_secs(5);
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
    }
}
