//! Typed client for the m3ter billing API.
//!
//! The client is an explicit context object: construct an [`ApiClient`] once
//! (this performs the credential exchange) and hand it to whatever needs the
//! API. Every resource type gets the same operations through
//! [`ResourceClient`]: `create`, `get`, `list`, `update`, `delete`, `load`
//! (all pages), `code_get` and `name_get`.
//!
//! # Example
//!
//! ```no_run
//! use m3ter_client::{ApiClient, ClientConfig};
//! use m3ter_core::Account;
//!
//! # async fn example() -> Result<(), m3ter_client::ClientError> {
//! let config = ClientConfig::new("org-id", "api-key", "api-secret");
//! let api = ApiClient::connect(config).await?;
//!
//! let accounts = api.resource::<Account>().load().await?;
//! println!("{} accounts", accounts.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Transport
//!
//! HTTP goes through the [`Transport`] trait. [`HttpTransport`] is the
//! `reqwest` implementation; tests plug in a fake.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod auth;
mod client;
mod config;
mod error;
mod ingest;
mod resource;
mod retry;
mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use auth::fetch_token;
pub use client::ApiClient;
pub use config::{ClientConfig, PRODUCTION};
pub use error::{ClientError, Result};
pub use resource::ResourceClient;
pub use retry::{retry_with_policy, RetryPolicy};
pub use transport::{ApiRequest, ApiResponse, Auth, HttpTransport, Transport};

/// Re-exported so callers can build [`ApiRequest`]s without depending on
/// `reqwest` directly.
pub use reqwest::Method;
