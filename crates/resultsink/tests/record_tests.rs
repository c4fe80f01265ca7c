//! Result composition tests
//!
//! Covers the canonical record shape, log artifact encoding and tag handling.

use proptest::prelude::*;
use resultsink::{
    compose, compose_with_log_bytes, compose_with_status, SinkError, Status, Tag, Tags,
    TestResult, TEST_LOG_ARTIFACT,
};
use rstest::rstest;
use serde_json::json;

const LEN_32_STR: &str = "This is a string in length of 32";

// ============================================================================
// Canonical Shape
// ============================================================================

#[test]
fn test_minimal_record_snapshot() {
    let result = compose("TestCase/testSomething", "PASS", true, None, None).unwrap();
    insta::assert_json_snapshot!(result, @r###"
    {
      "testId": "TestCase/testSomething",
      "status": "PASS",
      "expected": true,
      "tags": [],
      "testMetadata": {
        "name": "TestCase/testSomething"
      }
    }
    "###);
}

#[test]
fn test_full_record_snapshot() {
    let tags = Tags::from_pairs([("disabled_test", "true"), ("platform", "ios")]);
    let result = compose(
        "TestCase/testSomething",
        "CRASH",
        false,
        Some("Some logs."),
        Some(tags),
    )
    .unwrap();
    insta::assert_json_snapshot!(result, @r###"
    {
      "testId": "TestCase/testSomething",
      "status": "CRASH",
      "expected": false,
      "summaryHtml": "<text-artifact artifact-id=\"Test Log\" />",
      "artifacts": {
        "Test Log": {
          "contents": "U29tZSBsb2dzLg=="
        }
      },
      "tags": [
        {
          "key": "disabled_test",
          "value": "true"
        },
        {
          "key": "platform",
          "value": "ios"
        }
      ],
      "testMetadata": {
        "name": "TestCase/testSomething"
      }
    }
    "###);
}

#[rstest]
#[case(Status::Pass)]
#[case(Status::Fail)]
#[case(Status::Crash)]
#[case(Status::Abort)]
#[case(Status::Skip)]
fn test_every_status_composes(#[case] status: Status) {
    let from_str = compose("a/b", status.as_str(), true, None, None).unwrap();
    let typed = compose_with_status("a/b", status, true, None, None).unwrap();

    assert_eq!(from_str, typed);
    assert_eq!(from_str.to_json().unwrap()["status"], json!(status.as_str()));
}

#[test]
fn test_metadata_mirrors_test_id() {
    let result = compose("Suite/testName", "FAIL", false, None, None).unwrap();
    assert_eq!(result.test_metadata().name, "Suite/testName");
    assert_eq!(result.test_id(), "Suite/testName");
}

// ============================================================================
// Log Artifacts
// ============================================================================

#[test]
fn test_no_log_omits_summary_and_artifacts() {
    let value = compose("a/b", "PASS", true, None, None)
        .unwrap()
        .to_json()
        .unwrap();
    let object = value.as_object().unwrap();

    assert!(!object.contains_key("summaryHtml"));
    assert!(!object.contains_key("artifacts"));
}

#[rstest]
#[case::empty(String::new())]
#[case::len_32(LEN_32_STR.to_string())]
#[case::len_4128(LEN_32_STR.repeat(4 * 32 + 1))]
#[case::multibyte("ログ ✓\n\ttab".to_string())]
fn test_log_round_trips(#[case] log: String) {
    let result = compose("TestCase/testSomething", "PASS", true, Some(&log), None).unwrap();

    assert!(result.summary_html().is_some());
    let artifact = result.test_log().unwrap();
    assert_eq!(artifact.decode().unwrap(), log.as_bytes());
}

#[test]
fn test_binary_log_is_kept_byte_for_byte() {
    let bytes = [102, 255, 254, 0, 128];
    let result = compose_with_log_bytes("a/b", "FAIL", false, Some(&bytes[..]), None).unwrap();

    assert_eq!(result.test_log().unwrap().decode().unwrap(), bytes);
}

#[test]
fn test_long_log_is_not_truncated() {
    let log = LEN_32_STR.repeat(4 * 32 + 1);
    assert_eq!(log.len(), 4128);

    let result = compose("TestCase/testSomething", "PASS", true, Some(&log), None).unwrap();
    let artifacts = result.artifacts().unwrap();

    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[TEST_LOG_ARTIFACT].contents.len(), 5504);
}

#[test]
fn test_decoded_record_keeps_composed_shape() {
    let composed = compose("a/b", "CRASH", false, Some("Some logs."), None).unwrap();
    let decoded: TestResult = serde_json::from_value(composed.to_json().unwrap()).unwrap();
    assert_eq!(decoded, composed);
}

#[test]
fn test_decoding_partial_record_fails() {
    let partial = json!({
        "testId": "",
        "status": "PASS",
        "expected": true,
        "summaryHtml": "<text-artifact artifact-id=\"Test Log\" />",
        "tags": [],
        "testMetadata": {"name": "other"},
    });
    assert!(serde_json::from_value::<TestResult>(partial).is_err());
}

// ============================================================================
// Tags
// ============================================================================

#[test]
fn test_tags_from_json_compose() {
    let tags = Tags::from_json(&json!([["disabled_test", "true"]])).unwrap();
    let result = compose("TestCase/testSomething", "SKIP", true, None, Some(tags)).unwrap();

    assert_eq!(result.tags(), &[Tag::new("disabled_test", "true")]);
}

#[rstest]
#[case::tuple_not_list(json!(["a", "b"]))]
#[case::three_elements(json!([["a", "b", "c"], ["d", "e"]]))]
#[case::non_string_value(json!([["a", "b"], ["c", 3]]))]
#[case::null(json!(null))]
fn test_malformed_tags_rejected(#[case] value: serde_json::Value) {
    let err = Tags::from_json(&value).unwrap_err();
    assert!(matches!(err, SinkError::InvalidArgument(_)));
}

#[test]
fn test_explicit_empty_tags() {
    let result = compose("a/b", "PASS", true, None, Some(Tags::new())).unwrap();
    assert_eq!(result.to_json().unwrap()["tags"], json!([]));
}

proptest! {
    #[test]
    fn prop_log_base64_round_trip(log in ".*") {
        let result = compose("a/b", "PASS", true, Some(&log), None).unwrap();
        let decoded = result.test_log().unwrap().decode().unwrap();
        prop_assert_eq!(decoded, log.into_bytes());
    }

    #[test]
    fn prop_tags_preserve_order(pairs in proptest::collection::vec((".*", ".*"), 0..8)) {
        let result = compose("a/b", "PASS", true, None, Some(Tags::from_pairs(pairs.clone()))).unwrap();
        let got: Vec<(String, String)> = result
            .tags()
            .iter()
            .map(|tag| (tag.key.clone(), tag.value.clone()))
            .collect();
        prop_assert_eq!(got, pairs);
    }

    #[test]
    fn prop_unknown_status_rejected(status in "[A-Za-z_]{1,12}") {
        prop_assume!(!Status::ALL.iter().any(|s| s.as_str() == status));
        prop_assert!(matches!(
            compose("a/b", &status, true, None, None),
            Err(SinkError::InvalidArgument(_))
        ));
    }
}
