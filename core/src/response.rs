//! Response envelope for `GetExtendedUpdateInfo2` and URL selection.
//!
//! # Design
//! Only the path down to `FileLocations` is modelled. Everything else in the
//! reply (header, namespace declarations, other result fragments) is ignored
//! by serde. `quick-xml` matches elements by local name, so the server's
//! choice of prefixes does not affect decoding.
//!
//! A present-but-empty or absent `FileLocations` decodes to an empty list.
//! A missing `Body`, response or result element is a decoding fault.

use serde::Deserialize;
use tracing::debug;

use crate::error::ApiError;

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(rename = "Body")]
    pub body: ResponseBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseBody {
    #[serde(rename = "GetExtendedUpdateInfo2Response")]
    pub response: GetExtendedUpdateInfo2Response,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetExtendedUpdateInfo2Response {
    #[serde(rename = "GetExtendedUpdateInfo2Result")]
    pub result: GetExtendedUpdateInfo2Result,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetExtendedUpdateInfo2Result {
    #[serde(rename = "FileLocations", default)]
    pub file_locations: FileLocations,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileLocations {
    #[serde(rename = "FileLocation", default)]
    pub entries: Vec<FileLocation>,
}

/// One downloadable file offered by the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileLocation {
    #[serde(rename = "FileDigest", default)]
    pub file_digest: String,
    #[serde(rename = "Url")]
    pub url: String,
}

impl ResponseEnvelope {
    pub fn file_locations(&self) -> &[FileLocation] {
        &self.body.response.result.file_locations.entries
    }
}

/// Decode raw response bytes.
pub fn parse_response(bytes: &[u8]) -> Result<ResponseEnvelope, ApiError> {
    let xml = std::str::from_utf8(bytes).map_err(|e| ApiError::Decoding(e.to_string()))?;
    quick_xml::de::from_str(xml).map_err(|e| ApiError::Decoding(e.to_string()))
}

/// First location whose URL contains `host_filter`, in document order.
pub fn select_url<'a>(locations: &'a [FileLocation], host_filter: &str) -> Option<&'a str> {
    locations
        .iter()
        .map(|location| location.url.as_str())
        .find(|url| url.contains(host_filter))
}

/// Decode `bytes` and pick the download URL. `Ok(None)` means the reply was
/// valid but offered no URL on the accepted host.
pub fn extract_download_url(bytes: &[u8], host_filter: &str) -> Result<Option<String>, ApiError> {
    let envelope = parse_response(bytes)?;
    let locations = envelope.file_locations();
    debug!(count = locations.len(), "decoded file locations");
    Ok(select_url(locations, host_filter).map(str::to_string))
}
