//! Request envelope for `GetExtendedUpdateInfo2`.
//!
//! # Design
//! The document is modelled as one struct per element so every element name,
//! prefix and namespace declaration is spelled out once, in a `serde(rename)`.
//! `quick-xml` turns `@name` fields into attributes and `$text` fields into
//! character data. Prefixed names are emitted literally; the prefixes bound
//! on the root (`s`, `a`) and on `o:Security` (`o`) are the ones the server
//! expects.
//!
//! Field order is wire order. Attributes come before child elements.

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde::Serialize;

use crate::config::{
    ServiceConfig, ADDRESSING_NS, AUTHORIZATION_NS, CLIENT_SERVICE_NS, DEVICE_ATTRIBUTES,
    EXPIRY_WINDOW_SECS, FRAGMENT_TYPE, MESSAGE_ID, MUST_UNDERSTAND, REVISION_NUMBER, SECEXT_NS,
    SECUTIL_NS, SOAP_NS, TICKET_ID, TICKET_TYPES,
};
use crate::error::ApiError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename = "s:Envelope")]
pub struct Envelope {
    #[serde(rename = "@xmlns:a")]
    pub xmlns_a: &'static str,
    #[serde(rename = "@xmlns:s")]
    pub xmlns_s: &'static str,
    #[serde(rename = "s:Header")]
    pub header: Header,
    #[serde(rename = "s:Body")]
    pub body: Body,
}

#[derive(Debug, Clone, Serialize)]
pub struct Header {
    #[serde(rename = "a:Action")]
    pub action: MandatoryHeader,
    #[serde(rename = "a:MessageID")]
    pub message_id: &'static str,
    #[serde(rename = "a:To")]
    pub to: MandatoryHeader,
    #[serde(rename = "o:Security")]
    pub security: Security,
}

/// A header element carrying `s:mustUnderstand="1"` and a text value.
#[derive(Debug, Clone, Serialize)]
pub struct MandatoryHeader {
    #[serde(rename = "@s:mustUnderstand")]
    pub must_understand: &'static str,
    #[serde(rename = "$text")]
    pub value: String,
}

impl MandatoryHeader {
    fn new(value: String) -> Self {
        Self {
            must_understand: MUST_UNDERSTAND,
            value,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Security {
    #[serde(rename = "@s:mustUnderstand")]
    pub must_understand: &'static str,
    #[serde(rename = "@xmlns:o")]
    pub xmlns_o: &'static str,
    #[serde(rename = "Timestamp")]
    pub timestamp: Timestamp,
    #[serde(rename = "wuws:WindowsUpdateTicketsToken")]
    pub tickets: TicketsToken,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timestamp {
    #[serde(rename = "@xmlns")]
    pub xmlns: &'static str,
    #[serde(rename = "Created")]
    pub created: String,
    #[serde(rename = "Expires")]
    pub expires: String,
}

impl Timestamp {
    /// Created at `now`, expiring `EXPIRY_WINDOW_SECS` later. Both instants
    /// are derived from the same clock reading.
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        let expires = now + TimeDelta::seconds(EXPIRY_WINDOW_SECS);
        Self {
            xmlns: SECUTIL_NS,
            created: format_instant(now),
            expires: format_instant(expires),
        }
    }
}

/// RFC 3339 with nanoseconds and a `Z` suffix.
fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketsToken {
    #[serde(rename = "@wsu:id")]
    pub id: &'static str,
    #[serde(rename = "@xmlns:wsu")]
    pub xmlns_wsu: &'static str,
    #[serde(rename = "@xmlns:wuws")]
    pub xmlns_wuws: &'static str,
    #[serde(rename = "TicketType")]
    pub ticket_types: Vec<TicketType>,
}

impl TicketsToken {
    /// The anonymous ticket accepted for this operation. Same on every call.
    pub fn anonymous() -> Self {
        Self {
            id: TICKET_ID,
            xmlns_wsu: SECUTIL_NS,
            xmlns_wuws: AUTHORIZATION_NS,
            ticket_types: TICKET_TYPES
                .iter()
                .map(|&(name, version, policy)| TicketType {
                    name,
                    version,
                    policy,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketType {
    #[serde(rename = "@Name")]
    pub name: &'static str,
    #[serde(rename = "@Version")]
    pub version: &'static str,
    #[serde(rename = "@Policy")]
    pub policy: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Body {
    #[serde(rename = "GetExtendedUpdateInfo2")]
    pub request: GetExtendedUpdateInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetExtendedUpdateInfo {
    #[serde(rename = "@xmlns")]
    pub xmlns: &'static str,
    #[serde(rename = "updateIDs")]
    pub update_ids: UpdateIds,
    #[serde(rename = "infoTypes")]
    pub info_types: InfoTypes,
    #[serde(rename = "deviceAttributes")]
    pub device_attributes: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateIds {
    #[serde(rename = "UpdateIdentity")]
    pub identity: UpdateIdentity,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateIdentity {
    #[serde(rename = "UpdateID")]
    pub update_id: String,
    #[serde(rename = "RevisionNumber")]
    pub revision_number: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct InfoTypes {
    #[serde(rename = "XmlUpdateFragmentType")]
    pub fragment_type: &'static str,
}

impl Envelope {
    /// Full request for the file URLs of `update_id`, timestamped at `now`.
    pub fn get_extended_update_info(config: &ServiceConfig, update_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            xmlns_a: ADDRESSING_NS,
            xmlns_s: SOAP_NS,
            header: Header {
                action: MandatoryHeader::new(config.action()),
                message_id: MESSAGE_ID,
                to: MandatoryHeader::new(config.endpoint.clone()),
                security: Security {
                    must_understand: MUST_UNDERSTAND,
                    xmlns_o: SECEXT_NS,
                    timestamp: Timestamp::starting_at(now),
                    tickets: TicketsToken::anonymous(),
                },
            },
            body: Body {
                request: GetExtendedUpdateInfo {
                    xmlns: CLIENT_SERVICE_NS,
                    update_ids: UpdateIds {
                        identity: UpdateIdentity {
                            update_id: update_id.to_string(),
                            revision_number: REVISION_NUMBER,
                        },
                    },
                    info_types: InfoTypes {
                        fragment_type: FRAGMENT_TYPE,
                    },
                    device_attributes: DEVICE_ATTRIBUTES,
                },
            },
        }
    }

    /// Serialize to an indented XML document.
    pub fn to_xml(&self) -> Result<String, ApiError> {
        let mut xml = String::new();
        let mut ser = quick_xml::se::Serializer::new(&mut xml);
        ser.indent(' ', 2);
        self.serialize(ser)
            .map_err(|e| ApiError::Encoding(e.to_string()))?;
        Ok(xml)
    }
}

/// Request document bytes for `update_id`, timestamped at `now`.
pub fn build_request_xml(
    config: &ServiceConfig,
    update_id: &str,
    now: DateTime<Utc>,
) -> Result<Vec<u8>, ApiError> {
    let xml = Envelope::get_extended_update_info(config, update_id, now).to_xml()?;
    Ok(xml.into_bytes())
}
