//! Verify response decoding against captured-shape SOAP replies stored in
//! `test-vectors/`.
//!
//! Each fixture is a full envelope with the header and namespace noise the
//! service sends. The expected outcome per file is listed in the table below.

use wu_core::config::CDN_HOST_FILTER;
use wu_core::response::parse_response;
use wu_core::{extract_download_url, ApiError, HttpResponse, UpdateClient};

const CDN_MATCH: &str = include_str!("../../test-vectors/cdn_match.xml");
const EMPTY_LOCATIONS: &str = include_str!("../../test-vectors/empty_locations.xml");
const OTHER_HOSTS: &str = include_str!("../../test-vectors/other_hosts.xml");
const SOAP_FAULT: &str = include_str!("../../test-vectors/soap_fault.xml");

fn ok(body: &str) -> HttpResponse {
    HttpResponse {
        status: 200,
        headers: vec![(
            "content-type".to_string(),
            "application/soap+xml; charset=utf-8".to_string(),
        )],
        body: body.as_bytes().to_vec(),
    }
}

#[test]
fn expected_outcomes() {
    let cases: [(&str, &str, Option<&str>); 3] = [
        (
            "cdn_match",
            CDN_MATCH,
            Some("http://tlu.dl.delivery.mp.microsoft.com/filestreamingservice/files/7d3f2c1e-5a4b-4c9d-8e0f-1a2b3c4d5e6f?P1=1710000000&P2=404&P3=2&P4=abc%3d"),
        ),
        ("empty_locations", EMPTY_LOCATIONS, None),
        ("other_hosts", OTHER_HOSTS, None),
    ];

    let client = UpdateClient::default();
    for (name, xml, expected) in cases {
        let extracted = extract_download_url(xml.as_bytes(), CDN_HOST_FILTER).unwrap();
        assert_eq!(extracted.as_deref(), expected, "{name}: extract");

        let parsed = client.parse_get_extended_update_info(ok(xml)).unwrap();
        assert_eq!(parsed.as_deref(), expected, "{name}: client parse");
    }
}

#[test]
fn cdn_match_keeps_digests_and_order() {
    let envelope = parse_response(CDN_MATCH.as_bytes()).unwrap();
    let locations = envelope.file_locations();
    assert_eq!(locations.len(), 3);
    assert_eq!(locations[0].file_digest, "2Wq3mTrf8bXk0V5bPjZJ6h2cBTM=");
    assert!(locations[0].url.starts_with("http://download.windowsupdate.com/"));
    assert_eq!(locations[1].file_digest, locations[0].file_digest);
    assert!(locations[2].url.ends_with("00000000-0000-0000-0000-000000000002"));
}

#[test]
fn other_hosts_decodes_entries_but_selects_none() {
    let envelope = parse_response(OTHER_HOSTS.as_bytes()).unwrap();
    assert_eq!(envelope.file_locations().len(), 2);
}

#[test]
fn soap_fault_is_a_decoding_fault() {
    let err = extract_download_url(SOAP_FAULT.as_bytes(), CDN_HOST_FILTER).unwrap_err();
    assert!(matches!(err, ApiError::Decoding(_)), "{err}");
}

#[test]
fn soap_fault_with_error_status_is_http_fault() {
    let response = HttpResponse {
        status: 500,
        headers: Vec::new(),
        body: SOAP_FAULT.as_bytes().to_vec(),
    };
    let err = UpdateClient::default()
        .parse_get_extended_update_info(response)
        .unwrap_err();
    match err {
        ApiError::Http { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("InvalidParameters"));
        }
        other => panic!("expected HTTP fault, got {other}"),
    }
}

#[test]
fn truncated_vector_is_a_decoding_fault() {
    let truncated = &CDN_MATCH[..CDN_MATCH.len() / 2];
    let err = extract_download_url(truncated.as_bytes(), CDN_HOST_FILTER).unwrap_err();
    assert!(matches!(err, ApiError::Decoding(_)), "{err}");
}
