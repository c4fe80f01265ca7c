//! HTTP session used to reach the sink

use crate::error::TransportError;
use std::time::Duration;

/// Fully built outbound request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl SinkRequest {
    /// Value of the first header named `name` (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A single-caller session that POSTs requests to the sink
pub trait Transport {
    /// Send one request; non-success responses are errors
    fn send(&mut self, request: &SinkRequest) -> Result<(), TransportError>;

    /// Release the session. Calling it more than once is harmless.
    fn close(&mut self);
}

/// Blocking HTTP transport backed by reqwest
#[derive(Debug)]
pub struct HttpTransport {
    client: Option<reqwest::blocking::Client>,
}

impl HttpTransport {
    /// Open a session; `timeout` of `None` keeps reqwest's default
    ///
    /// Proxies are bypassed; the sink is always local.
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = reqwest::blocking::Client::builder().no_proxy();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: Some(builder.build()?),
        })
    }

    pub fn is_open(&self) -> bool {
        self.client.is_some()
    }
}

impl Transport for HttpTransport {
    fn send(&mut self, request: &SinkRequest) -> Result<(), TransportError> {
        let client = self.client.as_ref().ok_or(TransportError::Closed)?;

        let mut req_builder = client.post(&request.url);
        for (key, value) in &request.headers {
            req_builder = req_builder.header(key.as_str(), value.as_str());
        }

        let response = req_builder.body(request.body.clone()).send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            log::warn!("ResultSink rejected report with HTTP {}: {}", status, body);
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }

    fn close(&mut self) {
        self.client = None;
    }
}
