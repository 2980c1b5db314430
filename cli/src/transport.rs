use std::time::Duration;

use todo_core::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};

/// Requests that take longer than this fail with a `TransportError`.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Blocking transport over ureq.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        // 4xx/5xx come back as data; TodoClient interprets the status.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&mut self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        log::debug!("event=http status=start method={} url={}", req.method.as_str(), req.path);
        let agent = &self.agent;
        let result = match (req.method, req.body) {
            (HttpMethod::Get, _) => agent.get(&req.path).call(),
            (HttpMethod::Delete, _) => agent.delete(&req.path).call(),
            (HttpMethod::Post, body) => send(agent.post(&req.path), body),
            (HttpMethod::Put, body) => send(agent.put(&req.path), body),
            (HttpMethod::Patch, body) => send(agent.patch(&req.path), body),
        };
        let mut response = result.map_err(|e| TransportError(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                Some((name.as_str().to_string(), value.to_str().ok()?.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn send(
    builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    body: Option<String>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder
            .content_type("application/json")
            .send(body.as_bytes()),
        None => builder.send_empty(),
    }
}
