//! ResultSink reporting client
//!
//! The client resolves the sink once, at construction. Without a sink it is
//! inert and every report succeeds without doing anything.

use crate::error::{Result, SinkError};
use crate::record::{compose, Tags, TestResult};
use crate::transport::{HttpTransport, SinkRequest, Transport};
use resultsink_config::{resolve, ClientSettings, SinkEndpoint};
use serde::Serialize;
use std::mem;

/// pRPC method receiving result batches
pub const REPORT_TEST_RESULTS_PATH: &str = "/prpc/luci.resultsink.v1.Sink/ReportTestResults";

/// Body of a `ReportTestResults` call
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportTestResultsRequest<'a> {
    test_results: &'a [TestResult],
}

enum State<T> {
    /// No sink configured; reporting is a no-op
    Unconfigured,
    Ready {
        endpoint: SinkEndpoint,
        transport: T,
    },
    /// Session released; the transport is gone
    Closed { endpoint: SinkEndpoint },
}

/// Client reporting test results to a local ResultSink
///
/// One session per client. `post` takes `&mut self`; concurrent reporters
/// need their own clients. The session is released by [`close`](Self::close)
/// or on drop.
pub struct ResultSinkClient<T: Transport = HttpTransport> {
    state: State<T>,
}

impl ResultSinkClient<HttpTransport> {
    /// Build a client from `RESULTSINK_*` settings and the LUCI context
    ///
    /// Invalid settings are logged and replaced by defaults.
    pub fn new() -> Result<Self> {
        let settings = ClientSettings::from_env().unwrap_or_else(|e| {
            log::warn!("Ignoring invalid ResultSink settings: {}", e);
            ClientSettings::default()
        });
        Self::with_settings(&settings)
    }

    pub fn with_settings(settings: &ClientSettings) -> Result<Self> {
        Self::with_resolver(settings, resolve)
    }

    /// Build a client whose endpoint comes from `resolver`
    ///
    /// The resolver receives the name of the context environment variable and
    /// is called exactly once.
    pub fn with_resolver<F>(settings: &ClientSettings, resolver: F) -> Result<Self>
    where
        F: FnOnce(&str) -> Option<SinkEndpoint>,
    {
        Self::from_endpoint(resolver(settings.context_var()), settings)
    }

    /// Build a client for an already resolved endpoint
    ///
    /// No HTTP session is opened when `endpoint` is `None`.
    pub fn from_endpoint(endpoint: Option<SinkEndpoint>, settings: &ClientSettings) -> Result<Self> {
        match endpoint {
            Some(endpoint) => {
                let transport = HttpTransport::new(settings.timeout())?;
                Ok(Self::with_transport(Some(endpoint), transport))
            }
            None => Ok(Self::unconfigured()),
        }
    }
}

impl<T: Transport> ResultSinkClient<T> {
    /// Client that never reports
    pub fn unconfigured() -> Self {
        Self {
            state: State::Unconfigured,
        }
    }

    /// Build a client over a caller-provided transport
    pub fn with_transport(endpoint: Option<SinkEndpoint>, transport: T) -> Self {
        let state = match endpoint {
            Some(endpoint) => State::Ready {
                endpoint,
                transport,
            },
            None => State::Unconfigured,
        };
        Self { state }
    }

    pub fn is_configured(&self) -> bool {
        !matches!(self.state, State::Unconfigured)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, State::Closed { .. })
    }

    pub fn endpoint(&self) -> Option<&SinkEndpoint> {
        match &self.state {
            State::Unconfigured => None,
            State::Ready { endpoint, .. } | State::Closed { endpoint } => Some(endpoint),
        }
    }

    /// Compose and report one test result
    ///
    /// Does nothing when no sink is configured; composition is skipped too.
    pub fn post(
        &mut self,
        test_id: &str,
        status: &str,
        expected: bool,
        log: Option<&str>,
        tags: Option<Tags>,
    ) -> Result<()> {
        match self.state {
            State::Unconfigured => Ok(()),
            State::Closed { .. } => Err(SinkError::Closed),
            State::Ready { .. } => {
                let result = compose(test_id, status, expected, log, tags)?;
                self.post_composed_result(&result)
            }
        }
    }

    /// Report a pre-built result as a single-element batch
    pub fn post_composed_result(&mut self, result: &TestResult) -> Result<()> {
        let (endpoint, transport) = match &mut self.state {
            State::Unconfigured => return Ok(()),
            State::Closed { .. } => return Err(SinkError::Closed),
            State::Ready {
                endpoint,
                transport,
            } => (endpoint, transport),
        };

        let request = build_request(endpoint, result)?;
        log::debug!(
            "Reporting {} ({}) to {}",
            result.test_id(),
            result.status(),
            request.url
        );
        transport.send(&request)?;
        Ok(())
    }

    /// Release the HTTP session
    ///
    /// Idempotent. Reports on a closed client fail with [`SinkError::Closed`];
    /// an unconfigured client stays a no-op.
    pub fn close(&mut self) {
        let state = mem::replace(&mut self.state, State::Unconfigured);
        self.state = match state {
            State::Ready {
                endpoint,
                mut transport,
            } => {
                transport.close();
                log::debug!("Closed ResultSink session to {}", endpoint.address());
                State::Closed { endpoint }
            }
            other => other,
        };
    }
}

impl<T: Transport> Drop for ResultSinkClient<T> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Build the `ReportTestResults` request for one result
pub fn build_request(endpoint: &SinkEndpoint, result: &TestResult) -> Result<SinkRequest> {
    let body = serde_json::to_string(&ReportTestResultsRequest {
        test_results: std::slice::from_ref(result),
    })?;

    Ok(SinkRequest {
        url: format!("http://{}{}", endpoint.address(), REPORT_TEST_RESULTS_PATH),
        headers: vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
            (
                "Authorization".to_string(),
                format!("ResultSink {}", endpoint.auth_token()),
            ),
        ],
        body,
    })
}
