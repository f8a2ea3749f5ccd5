use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{post, put},
    Json, Router,
};
use quick_xml::escape::escape;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub const SECURED_PATH: &str = "/ClientWebService/client.asmx/secured";

const OPERATION: &str = "GetExtendedUpdateInfo2";

/// A file the mock service offers for an update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileLocationEntry {
    pub digest: String,
    pub url: String,
}

pub type Db = Arc<RwLock<HashMap<Uuid, Vec<FileLocationEntry>>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route(SECURED_PATH, post(get_extended_update_info))
        .route(
            "/updates/{id}",
            put(register_update).get(get_update).delete(delete_update),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// Incoming envelope, matched by local name. Only what the handler checks.

#[derive(Deserialize)]
struct SoapRequest {
    #[serde(rename = "Header")]
    header: SoapHeader,
    #[serde(rename = "Body")]
    body: SoapBody,
}

#[derive(Deserialize)]
struct SoapHeader {
    #[serde(rename = "Action")]
    action: Action,
}

#[derive(Deserialize)]
struct Action {
    #[serde(rename = "$text")]
    value: String,
}

#[derive(Deserialize)]
struct SoapBody {
    #[serde(rename = "GetExtendedUpdateInfo2")]
    request: ExtendedInfoRequest,
}

#[derive(Deserialize)]
struct ExtendedInfoRequest {
    #[serde(rename = "updateIDs")]
    update_ids: UpdateIds,
}

#[derive(Deserialize)]
struct UpdateIds {
    #[serde(rename = "UpdateIdentity")]
    identity: UpdateIdentity,
}

#[derive(Deserialize)]
struct UpdateIdentity {
    #[serde(rename = "UpdateID")]
    update_id: String,
}

async fn get_extended_update_info(
    State(db): State<Db>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let is_soap = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/soap+xml"));
    if !is_soap {
        return StatusCode::UNSUPPORTED_MEDIA_TYPE.into_response();
    }

    let request: SoapRequest = match quick_xml::de::from_str(&body) {
        Ok(request) => request,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };
    if !request.header.action.value.trim().ends_with(OPERATION) {
        return (StatusCode::BAD_REQUEST, "unsupported action").into_response();
    }

    let update_id = request.body.request.update_ids.identity.update_id;
    let locations = match Uuid::parse_str(update_id.trim()) {
        Ok(id) => db.read().await.get(&id).cloned().unwrap_or_default(),
        Err(_) => Vec::new(),
    };
    debug!(%update_id, count = locations.len(), "answering GetExtendedUpdateInfo2");

    (
        [(header::CONTENT_TYPE, "application/soap+xml; charset=utf-8")],
        render_response(&locations),
    )
        .into_response()
}

/// SOAP reply in the shape the real service uses, header noise included.
pub fn render_response(locations: &[FileLocationEntry]) -> String {
    let mut entries = String::new();
    for location in locations {
        entries.push_str(&format!(
            "<FileLocation><FileDigest>{}</FileDigest><Url>{}</Url></FileLocation>",
            escape(location.digest.as_str()),
            escape(location.url.as_str()),
        ));
    }
    format!(
        concat!(
            r#"<s:Envelope xmlns:s="http://www.w3.org/2003/05/soap-envelope" xmlns:a="http://www.w3.org/2005/08/addressing" xmlns:u="http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-utility-1.0.xsd">"#,
            r#"<s:Header><a:Action s:mustUnderstand="1">http://www.microsoft.com/SoftwareDistribution/Server/ClientWebService/GetExtendedUpdateInfo2Response</a:Action>"#,
            r#"<a:RelatesTo>urn:uuid:5754a03d-d8d5-489f-b24d-efc31b3fd32d</a:RelatesTo>"#,
            r#"<o:Security s:mustUnderstand="1" xmlns:o="http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-secext-1.0.xsd">"#,
            r#"<u:Timestamp u:Id="_0"><u:Created>2024-01-01T00:00:00.000Z</u:Created><u:Expires>2024-01-01T00:05:00.000Z</u:Expires></u:Timestamp>"#,
            r#"</o:Security></s:Header>"#,
            r#"<s:Body xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:xsd="http://www.w3.org/2001/XMLSchema">"#,
            r#"<GetExtendedUpdateInfo2Response xmlns="http://www.microsoft.com/SoftwareDistribution/Server/ClientWebService">"#,
            r#"<GetExtendedUpdateInfo2Result><FileLocations>{}</FileLocations></GetExtendedUpdateInfo2Result>"#,
            r#"</GetExtendedUpdateInfo2Response></s:Body></s:Envelope>"#,
        ),
        entries
    )
}

async fn register_update(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(locations): Json<Vec<FileLocationEntry>>,
) -> StatusCode {
    info!(%id, count = locations.len(), "registered update");
    db.write().await.insert(id, locations);
    StatusCode::NO_CONTENT
}

async fn get_update(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<FileLocationEntry>>, StatusCode> {
    let updates = db.read().await;
    updates.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn delete_update(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    let mut updates = db.write().await;
    updates.remove(&id).map(|_| StatusCode::NO_CONTENT).ok_or(StatusCode::NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_deserializes_from_json() {
        let location: FileLocationEntry =
            serde_json::from_str(r#"{"digest":"AAA=","url":"http://tlu.dl.delivery.mp.microsoft.com/a"}"#).unwrap();
        assert_eq!(location.digest, "AAA=");
        assert_eq!(location.url, "http://tlu.dl.delivery.mp.microsoft.com/a");
    }

    #[test]
    fn location_rejects_missing_url() {
        let result: Result<FileLocationEntry, _> = serde_json::from_str(r#"{"digest":"AAA="}"#);
        assert!(result.is_err());
    }

    #[test]
    fn render_lists_locations_in_order() {
        let xml = render_response(&[
            FileLocationEntry {
                digest: "AAA=".to_string(),
                url: "http://one.example.com/a".to_string(),
            },
            FileLocationEntry {
                digest: "BBB=".to_string(),
                url: "http://two.example.com/b".to_string(),
            },
        ]);
        let first = xml.find("http://one.example.com/a").unwrap();
        let second = xml.find("http://two.example.com/b").unwrap();
        assert!(first < second);
    }

    #[test]
    fn render_escapes_urls() {
        let xml = render_response(&[FileLocationEntry {
            digest: "AAA=".to_string(),
            url: "http://one.example.com/a?x=1&y=2".to_string(),
        }]);
        assert!(xml.contains("<Url>http://one.example.com/a?x=1&amp;y=2</Url>"));
    }

    #[test]
    fn render_empty_has_empty_file_locations() {
        assert!(render_response(&[]).contains("<FileLocations></FileLocations>"));
    }

    #[test]
    fn request_envelope_requires_update_id() {
        let xml = r#"<s:Envelope><s:Header><a:Action>x/GetExtendedUpdateInfo2</a:Action></s:Header><s:Body><GetExtendedUpdateInfo2><updateIDs><UpdateIdentity><RevisionNumber>1</RevisionNumber></UpdateIdentity></updateIDs></GetExtendedUpdateInfo2></s:Body></s:Envelope>"#;
        let result: Result<SoapRequest, _> = quick_xml::de::from_str(xml);
        assert!(result.is_err());
    }
}
