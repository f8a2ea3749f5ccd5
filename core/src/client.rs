//! Stateless request builder and response parser for the client web service.
//!
//! # Design
//! `UpdateClient` holds only a `ServiceConfig` and carries no mutable state
//! between calls. The single operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. `resolve_download_url` chains the two around a caller
//! supplied `Transport`; it adds no retries and swallows no errors.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::{ServiceConfig, CONTENT_TYPE};
use crate::envelope::build_request_xml;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::response::{parse_response, select_url};

/// Synchronous, stateless client for `GetExtendedUpdateInfo2`.
#[derive(Debug, Clone, Default)]
pub struct UpdateClient {
    config: ServiceConfig,
}

impl UpdateClient {
    pub fn new(config: ServiceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Request for the file URLs of `update_id`, timestamped with the
    /// current UTC time. The identifier is embedded as-is.
    pub fn build_get_extended_update_info(&self, update_id: &str) -> Result<HttpRequest, ApiError> {
        self.build_get_extended_update_info_at(update_id, Utc::now())
    }

    /// Same as `build_get_extended_update_info` with an explicit clock value.
    pub fn build_get_extended_update_info_at(
        &self,
        update_id: &str,
        now: DateTime<Utc>,
    ) -> Result<HttpRequest, ApiError> {
        let body = build_request_xml(&self.config, update_id, now)?;
        debug!(update_id, bytes = body.len(), "built GetExtendedUpdateInfo2 request");
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.config.endpoint.clone(),
            headers: vec![("content-type".to_string(), CONTENT_TYPE.to_string())],
            body,
        })
    }

    /// Download URL on the accepted CDN host, or `None` if the server
    /// offered none.
    pub fn parse_get_extended_update_info(&self, response: HttpResponse) -> Result<Option<String>, ApiError> {
        check_status(&response)?;
        let envelope = parse_response(&response.body)?;
        let locations = envelope.file_locations();
        let url = select_url(locations, &self.config.host_filter).map(str::to_string);
        if url.is_none() && !locations.is_empty() {
            warn!(
                offered = locations.len(),
                host_filter = %self.config.host_filter,
                "no file location on the accepted host"
            );
        }
        Ok(url)
    }

    /// Build, send through `transport`, and parse. `Ok(None)` is the
    /// "not found" outcome.
    pub fn resolve_download_url<T: Transport + ?Sized>(
        &self,
        update_id: &str,
        transport: &T,
    ) -> Result<Option<String>, ApiError> {
        let request = self.build_get_extended_update_info(update_id)?;
        let response = transport.execute(request)?;
        let url = self.parse_get_extended_update_info(response)?;
        match &url {
            Some(url) => info!(update_id, %url, "resolved download link"),
            None => info!(update_id, "no download link"),
        }
        Ok(url)
    }
}

/// Map non-2xx status codes to `ApiError::Http`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Http {
        status: response.status,
        body: String::from_utf8_lossy(&response.body).into_owned(),
    })
}
