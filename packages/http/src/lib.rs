//! # cockpit-http
//!
//! Blocking HTTP transport for the Cockpit CMS REST API.
//!
//! [`CockpitClient`] implements [`cockpit_entry::EntrySource`], so it can be
//! handed to a [`cockpit_entry::LinkResolver`] or to the `cockpit` facade:
//!
//! ```ignore
//! use cockpit_http::{ClientConfig, CockpitClient};
//!
//! let client = CockpitClient::from_config(&ClientConfig::new(
//!     "https://cms.example.com",
//!     "account-token",
//! ))?;
//! let entries = client.entries("posts", &cockpit_entry::Query::new())?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::{CockpitClient, TOKEN_HEADER};
pub use config::ClientConfig;
pub use error::Error;
pub use types::{ApiResponse, EntriesResponse, QueryBody};
