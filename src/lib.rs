//! Client-side library to manage an Outline VPN server through its management API.
//!
//! The management API exposes server settings, access keys, data limits and transfer metrics
//! over HTTPS. It is addressed through a secret URL and authenticated by pinning the SHA-256
//! fingerprint of the server's self-signed certificate, both printed by the server installer.
//!
//! Every request and response body is checked against a fixed record schema ([`schema`]),
//! so malformed payloads never reach calling code.
//!
//! ```no_run
//! # async fn run() -> Result<(), outline_client::error::OutlineError> {
//! use outline_client::client::OutlineClient;
//! use outline_client::config::ClientConfig;
//! use outline_client::types::{CreateAccessKeyRequest, DataLimit};
//!
//! let config = ClientConfig::new(
//! 	"https://1.2.3.4:1234/3pQ4jf6qSr5WVeMO0XOo4z",
//! 	"EA2BB3E2D7A9F30A1C3DEBBA7D74BD8BE0D4A6E16C0E0C1A0F2C1D9E5B3C1A08",
//! )?;
//! let client = OutlineClient::new(config)?;
//! let key = client.create_access_key(&CreateAccessKeyRequest::new().name("laptop")).await?;
//! client.set_access_key_data_limit(&key.id, DataLimit::new(10_000_000_000)).await?;
//! # Ok(())
//! # }
//! ```

#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(missing_docs)]

// Crate re-exports
pub use reqwest;

/// Implements a thin-client ([`client::OutlineClient`]) for the Outline management API.
pub mod client;

/// Contains the client configuration ([`config::ClientConfig`]).
pub mod config;

/// Implements the error types ([`error::OutlineError`], [`error::ValidationError`]).
pub mod error;

/// Selects whether the client returns typed records or raw response text.
pub mod format;

/// Declarative record schemas and the validator enforcing them.
pub mod schema;

/// Certificate pinning for the management API's self-signed certificate.
pub mod tls;

/// Contains the request/response records of the management API.
pub mod types;

/// Contains utils for request payloads.
pub mod util;

mod routes;
