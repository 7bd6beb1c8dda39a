use cockpit_entry::Error as EntryError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid URL: {message}")]
    InvalidUrl { message: String },

    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP {status} {status_text}: {body}")]
    Status {
        status: u16,
        status_text: String,
        body: String,
    },

    #[error("Unexpected response body: {message}")]
    UnexpectedBody { message: String },
}

impl From<Error> for EntryError {
    fn from(error: Error) -> Self {
        EntryError::Transport {
            message: error.to_string(),
        }
    }
}
