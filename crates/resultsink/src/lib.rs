//! ResultSink Reporting Client
//!
//! Formats test outcomes into the ResultSink JSON schema and reports them to
//! the local sink over authenticated HTTP.
//!
//! # Example
//!
//! ```no_run
//! use resultsink::{ResultSinkClient, Tags};
//!
//! let mut client = ResultSinkClient::new()?;
//! client.post(
//!     "TestCase/testSomething",
//!     "SKIP",
//!     true,
//!     None,
//!     Some(Tags::from_pairs([("disabled_test", "true")])),
//! )?;
//! client.close();
//! # Ok::<(), resultsink::SinkError>(())
//! ```

pub mod client;
pub mod error;
pub mod plugin;
pub mod record;
pub mod transport;

pub use client::{build_request, ResultSinkClient, REPORT_TEST_RESULTS_PATH};
pub use error::{Result, SinkError, TransportError};
pub use record::{
    compose, compose_with_log_bytes, compose_with_status, Artifact, Status, Tag, Tags,
    TestMetadata, TestResult, TEST_LOG_ARTIFACT, TEST_LOG_SUMMARY,
};
pub use resultsink_config::{ClientSettings, SinkEndpoint};
pub use transport::{HttpTransport, SinkRequest, Transport};
