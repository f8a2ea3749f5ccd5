//! Synchronous client core for the update client web service.
//!
//! # Overview
//! Resolves an update identifier into a download URL by sending one
//! `GetExtendedUpdateInfo2` SOAP request. The core builds the request
//! envelope and decodes the response without touching the network
//! (host-does-IO pattern); the caller supplies a `Transport` that performs
//! the HTTP POST.
//!
//! # Design
//! - `UpdateClient` is stateless. It holds only a `ServiceConfig`.
//! - `build_*` produces an `HttpRequest`, `parse_*` consumes an
//!   `HttpResponse`, and `resolve_download_url` chains them around a
//!   `Transport`.
//! - Request and response trees are explicit serde structs so element names
//!   and namespace prefixes are spelled out once.
//! - "No eligible URL" is `Ok(None)`; every fault is an `ApiError`.

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod response;

pub use client::UpdateClient;
pub use config::ServiceConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use response::{extract_download_url, FileLocation};
