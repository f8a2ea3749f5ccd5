//! ureq-backed `Transport` used by the binary.

use std::time::Duration;

use wu_core::{ApiError, HttpMethod, HttpRequest, HttpResponse, Transport};

/// Blocking HTTP transport with a whole-call timeout.
///
/// Non-2xx replies come back as `HttpResponse` values so the core decides
/// what they mean.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        let content_type = req
            .header("content-type")
            .unwrap_or(wu_core::config::CONTENT_TYPE)
            .to_string();
        let builder = match req.method {
            HttpMethod::Post => self.agent.post(&req.url),
        };
        tracing::debug!(url = %req.url, bytes = req.body.len(), "sending request");

        let mut response = builder
            .content_type(content_type)
            .send(&req.body[..])
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        tracing::debug!(status, bytes = body.len(), "received response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refused_connection_is_transport_error() {
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let transport = UreqTransport::new(Duration::from_secs(5));
        let err = transport
            .execute(HttpRequest {
                method: HttpMethod::Post,
                url: format!("http://{addr}/secured"),
                headers: Vec::new(),
                body: b"<s:Envelope/>".to_vec(),
            })
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
