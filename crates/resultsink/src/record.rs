//! Test result records
//!
//! A [`TestResult`] is the canonical JSON shape accepted by the sink's
//! `ReportTestResults` method. Records are built by [`compose`], which
//! enforces the schema invariants, and are immutable afterwards.

use crate::error::{Result, SinkError};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Artifact name under which a test log is attached
pub const TEST_LOG_ARTIFACT: &str = "Test Log";

/// Summary snippet embedding the test log artifact
pub const TEST_LOG_SUMMARY: &str = r#"<text-artifact artifact-id="Test Log" />"#;

/// Test outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Pass,
    Fail,
    Crash,
    Abort,
    Skip,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Pass,
        Status::Fail,
        Status::Crash,
        Status::Abort,
        Status::Skip,
    ];

    /// Wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pass => "PASS",
            Status::Fail => "FAIL",
            Status::Crash => "CRASH",
            Status::Abort => "ABORT",
            Status::Skip => "SKIP",
        }
    }
}

impl FromStr for Status {
    type Err = SinkError;

    fn from_str(s: &str) -> Result<Self> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| SinkError::InvalidArgument(format!("invalid test status '{}'", s)))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key/value tag attached to a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Ordered tag list
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tags(Vec<Tag>);

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build tags from string pairs, keeping their order
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        pairs.into_iter().collect()
    }

    /// Build tags from loosely typed JSON
    ///
    /// The value must be an array whose elements are each an array of exactly
    /// two strings, e.g. `[["disabled_test", "true"]]`.
    pub fn from_json(value: &Value) -> Result<Self> {
        let pairs = value.as_array().ok_or_else(|| {
            SinkError::InvalidArgument(format!("tags must be a list of pairs, got {}", value))
        })?;

        pairs
            .iter()
            .enumerate()
            .map(|(index, pair)| match pair.as_array().map(Vec::as_slice) {
                Some([Value::String(key), Value::String(value)]) => Ok(Tag::new(key, value)),
                Some([_, _]) => Err(SinkError::InvalidArgument(format!(
                    "tag {} must contain two strings, got {}",
                    index, pair
                ))),
                Some(items) => Err(SinkError::InvalidArgument(format!(
                    "tag {} must have exactly 2 elements, got {}",
                    index,
                    items.len()
                ))),
                None => Err(SinkError::InvalidArgument(format!(
                    "tag {} must be a pair, got {}",
                    index, pair
                ))),
            })
            .collect::<Result<Vec<_>>>()
            .map(Tags)
    }

    /// Parse a `key=value` tag as written on a command line
    pub fn parse_pair(raw: &str) -> Result<Tag> {
        raw.split_once('=')
            .map(|(key, value)| Tag::new(key, value))
            .ok_or_else(|| {
                SinkError::InvalidArgument(format!("tag '{}' is not in key=value form", raw))
            })
    }

    pub fn push(&mut self, tag: Tag) {
        self.0.push(tag);
    }

    pub fn extend(&mut self, other: Tags) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<Tag> {
        self.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Tags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Tags(iter.into_iter().map(|(k, v)| Tag::new(k, v)).collect())
    }
}

/// Named artifact carried inline in a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Base64 (standard alphabet, padded) of the raw bytes
    pub contents: String,
}

impl Artifact {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            contents: BASE64.encode(bytes),
        }
    }

    /// Decode the artifact back to its raw bytes
    pub fn decode(&self) -> std::result::Result<Vec<u8>, base64::DecodeError> {
        BASE64.decode(&self.contents)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestMetadata {
    pub name: String,
}

/// One test's outcome as reported to the sink
///
/// Deserialized records go through the same checks as [`compose`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawTestResult")]
pub struct TestResult {
    test_id: String,
    status: Status,
    expected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary_html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    artifacts: Option<BTreeMap<String, Artifact>>,
    tags: Vec<Tag>,
    test_metadata: TestMetadata,
}

/// Unchecked wire form of [`TestResult`]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTestResult {
    test_id: String,
    status: Status,
    expected: bool,
    #[serde(default)]
    summary_html: Option<String>,
    #[serde(default)]
    artifacts: Option<BTreeMap<String, Artifact>>,
    #[serde(default)]
    tags: Vec<Tag>,
    test_metadata: TestMetadata,
}

impl TryFrom<RawTestResult> for TestResult {
    type Error = SinkError;

    fn try_from(raw: RawTestResult) -> Result<Self> {
        check_test_id(&raw.test_id)?;
        if raw.test_metadata.name != raw.test_id {
            return Err(SinkError::InvalidArgument(format!(
                "testMetadata.name '{}' does not match testId '{}'",
                raw.test_metadata.name, raw.test_id
            )));
        }

        match (&raw.summary_html, &raw.artifacts) {
            (None, None) => {}
            (Some(summary), Some(artifacts)) => {
                if summary != TEST_LOG_SUMMARY {
                    return Err(SinkError::InvalidArgument(format!(
                        "unexpected summaryHtml '{}'",
                        summary
                    )));
                }
                let log = match artifacts.get(TEST_LOG_ARTIFACT) {
                    Some(log) if artifacts.len() == 1 => log,
                    _ => {
                        return Err(SinkError::InvalidArgument(format!(
                            "artifacts must hold exactly the '{}' artifact",
                            TEST_LOG_ARTIFACT
                        )))
                    }
                };
                log.decode().map_err(|e| {
                    SinkError::InvalidArgument(format!("test log is not valid base64: {}", e))
                })?;
            }
            _ => {
                return Err(SinkError::InvalidArgument(
                    "summaryHtml and artifacts must be both present or both absent".to_string(),
                ))
            }
        }

        Ok(TestResult {
            test_id: raw.test_id,
            status: raw.status,
            expected: raw.expected,
            summary_html: raw.summary_html,
            artifacts: raw.artifacts,
            tags: raw.tags,
            test_metadata: raw.test_metadata,
        })
    }
}

fn check_test_id(test_id: &str) -> Result<()> {
    if test_id.is_empty() {
        return Err(SinkError::InvalidArgument(
            "test id must not be empty".to_string(),
        ));
    }
    Ok(())
}

impl TestResult {
    pub fn test_id(&self) -> &str {
        &self.test_id
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn expected(&self) -> bool {
        self.expected
    }

    pub fn summary_html(&self) -> Option<&str> {
        self.summary_html.as_deref()
    }

    pub fn artifacts(&self) -> Option<&BTreeMap<String, Artifact>> {
        self.artifacts.as_ref()
    }

    /// The embedded test log artifact, if a log was supplied
    pub fn test_log(&self) -> Option<&Artifact> {
        self.artifacts.as_ref()?.get(TEST_LOG_ARTIFACT)
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn test_metadata(&self) -> &TestMetadata {
        &self.test_metadata
    }

    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Compose a result record from a wire status string
///
/// Fails with [`SinkError::InvalidArgument`] when `status` is not one of
/// PASS, FAIL, CRASH, ABORT or SKIP.
pub fn compose(
    test_id: &str,
    status: &str,
    expected: bool,
    log: Option<&str>,
    tags: Option<Tags>,
) -> Result<TestResult> {
    compose_with_status(test_id, status.parse()?, expected, log, tags)
}

/// Compose a result record from a typed status
///
/// The log, when present, is attached verbatim as the "Test Log" artifact and
/// referenced from the summary. No truncation happens here.
pub fn compose_with_status(
    test_id: &str,
    status: Status,
    expected: bool,
    log: Option<&str>,
    tags: Option<Tags>,
) -> Result<TestResult> {
    build(test_id, status, expected, log.map(str::as_bytes), tags)
}

/// Compose a result record whose log is raw bytes
///
/// Logs that are not valid UTF-8 are kept byte for byte.
pub fn compose_with_log_bytes(
    test_id: &str,
    status: &str,
    expected: bool,
    log: Option<&[u8]>,
    tags: Option<Tags>,
) -> Result<TestResult> {
    build(test_id, status.parse()?, expected, log, tags)
}

fn build(
    test_id: &str,
    status: Status,
    expected: bool,
    log: Option<&[u8]>,
    tags: Option<Tags>,
) -> Result<TestResult> {
    check_test_id(test_id)?;

    let (summary_html, artifacts) = match log {
        Some(log) => {
            let artifacts =
                BTreeMap::from([(TEST_LOG_ARTIFACT.to_string(), Artifact::from_bytes(log))]);
            (Some(TEST_LOG_SUMMARY.to_string()), Some(artifacts))
        }
        None => (None, None),
    };

    Ok(TestResult {
        test_id: test_id.to_string(),
        status,
        expected,
        summary_html,
        artifacts,
        tags: tags.map(Tags::into_vec).unwrap_or_default(),
        test_metadata: TestMetadata {
            name: test_id.to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("PASS", Status::Pass)]
    #[case("FAIL", Status::Fail)]
    #[case("CRASH", Status::Crash)]
    #[case("ABORT", Status::Abort)]
    #[case("SKIP", Status::Skip)]
    fn test_parse_status(#[case] raw: &str, #[case] expected: Status) {
        assert_eq!(raw.parse::<Status>().unwrap(), expected);
        assert_eq!(expected.to_string(), raw);
    }

    #[rstest]
    #[case("SOME_INVALID_STATUS")]
    #[case("pass")]
    #[case("")]
    #[case("PASS ")]
    fn test_parse_invalid_status(#[case] raw: &str) {
        assert!(matches!(
            raw.parse::<Status>(),
            Err(SinkError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_compose_without_log() {
        let result = compose("TestCase/testSomething", "PASS", true, None, None).unwrap();
        assert_eq!(
            result.to_json().unwrap(),
            json!({
                "testId": "TestCase/testSomething",
                "status": "PASS",
                "expected": true,
                "tags": [],
                "testMetadata": {"name": "TestCase/testSomething"},
            })
        );
    }

    #[test]
    fn test_compose_with_log() {
        let result =
            compose("TestCase/testSomething", "PASS", true, Some("Some logs."), None).unwrap();
        assert_eq!(
            result.to_json().unwrap(),
            json!({
                "testId": "TestCase/testSomething",
                "status": "PASS",
                "expected": true,
                "summaryHtml": "<text-artifact artifact-id=\"Test Log\" />",
                "artifacts": {"Test Log": {"contents": "U29tZSBsb2dzLg=="}},
                "tags": [],
                "testMetadata": {"name": "TestCase/testSomething"},
            })
        );
    }

    #[test]
    fn test_compose_with_tags() {
        let tags = Tags::from_pairs([("disabled_test", "true")]);
        let result = compose("TestCase/testSomething", "SKIP", true, None, Some(tags)).unwrap();
        assert_eq!(
            result.to_json().unwrap()["tags"],
            json!([{"key": "disabled_test", "value": "true"}])
        );
    }

    #[test]
    fn test_compose_empty_test_id() {
        assert!(matches!(
            compose("", "PASS", true, None, None),
            Err(SinkError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_tags_from_json() {
        let tags = Tags::from_json(&json!([["a", "b"], ["c", "d"]])).unwrap();
        assert_eq!(tags.into_vec(), vec![Tag::new("a", "b"), Tag::new("c", "d")]);
    }

    #[rstest]
    #[case::bare_pair(json!(["a", "b"]))]
    #[case::triple(json!([["a", "b", "c"], ["d", "e"]]))]
    #[case::non_string(json!([["a", "b"], ["c", 3]]))]
    #[case::single(json!([["a"]]))]
    #[case::object(json!({"a": "b"}))]
    fn test_tags_from_json_rejects_bad_shapes(#[case] value: Value) {
        assert!(matches!(
            Tags::from_json(&value),
            Err(SinkError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_parse_pair() {
        assert_eq!(
            Tags::parse_pair("tag key=tag value").unwrap(),
            Tag::new("tag key", "tag value")
        );
        assert_eq!(Tags::parse_pair("k=a=b").unwrap(), Tag::new("k", "a=b"));
        assert!(Tags::parse_pair("novalue").is_err());
    }

    #[test]
    fn test_deserialize_round_trip() {
        let tags = Tags::from_pairs([("k", "v")]);
        let result = compose("a/b", "FAIL", false, Some("log"), Some(tags)).unwrap();
        let text = serde_json::to_string(&result).unwrap();
        let parsed: TestResult = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, result);
    }

    #[rstest]
    #[case::empty_test_id(json!({
        "testId": "", "status": "PASS", "expected": true,
        "testMetadata": {"name": ""},
    }))]
    #[case::metadata_mismatch(json!({
        "testId": "a/b", "status": "PASS", "expected": true,
        "testMetadata": {"name": "other"},
    }))]
    #[case::summary_without_artifacts(json!({
        "testId": "a/b", "status": "PASS", "expected": true,
        "summaryHtml": TEST_LOG_SUMMARY,
        "testMetadata": {"name": "a/b"},
    }))]
    #[case::artifacts_without_summary(json!({
        "testId": "a/b", "status": "PASS", "expected": true,
        "artifacts": {"Test Log": {"contents": "bG9n"}},
        "testMetadata": {"name": "a/b"},
    }))]
    #[case::bad_base64(json!({
        "testId": "a/b", "status": "PASS", "expected": true,
        "summaryHtml": TEST_LOG_SUMMARY,
        "artifacts": {"Test Log": {"contents": "not base64!"}},
        "testMetadata": {"name": "a/b"},
    }))]
    #[case::foreign_artifact(json!({
        "testId": "a/b", "status": "PASS", "expected": true,
        "summaryHtml": TEST_LOG_SUMMARY,
        "artifacts": {"Screenshot": {"contents": "bG9n"}},
        "testMetadata": {"name": "a/b"},
    }))]
    fn test_deserialize_rejects_partial_records(#[case] value: Value) {
        let err = serde_json::from_value::<TestResult>(value).unwrap_err();
        assert!(err.to_string().contains("Invalid argument"), "{}", err);
    }

    #[test]
    fn test_compose_with_log_bytes_keeps_invalid_utf8() {
        let bytes = [102, 255, 254, 0, 128];
        let result = compose_with_log_bytes("a/b", "PASS", true, Some(&bytes[..]), None).unwrap();
        assert_eq!(result.test_log().unwrap().decode().unwrap(), bytes);
        assert_eq!(result.summary_html(), Some(TEST_LOG_SUMMARY));
    }
}
