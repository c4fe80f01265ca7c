//! Test plugin service
//!
//! Test runners notify plugins about test case lifecycle events. No plugins
//! are implemented yet: every call is logged and acknowledged with an empty
//! response.

use serde::{Deserialize, Serialize};

/// Address the plugin service listens on
pub const PLUGIN_SERVICE_ADDRESS: &str = "localhost:32279";

/// Worker threads serving plugin requests
pub const PLUGIN_SERVICE_WORKER_COUNT: usize = 10;

/// Identifies a test case in plugin requests
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TestCaseWillStartRequest {
    pub test_case: TestCase,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TestCaseWillStartResponse {}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TestCaseDidFinishRequest {
    pub test_case: TestCase,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TestCaseDidFinishResponse {}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TestCaseDidFailRequest {
    pub test_case: TestCase,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TestCaseDidFailResponse {}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListEnabledPluginsRequest {}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListEnabledPluginsResponse {}

/// Operations a test runner may invoke on the plugin service
pub trait TestPluginService {
    fn test_case_will_start(&self, request: &TestCaseWillStartRequest)
        -> TestCaseWillStartResponse;

    fn test_case_did_finish(&self, request: &TestCaseDidFinishRequest)
        -> TestCaseDidFinishResponse;

    fn test_case_did_fail(&self, request: &TestCaseDidFailRequest) -> TestCaseDidFailResponse;

    fn list_enabled_plugins(&self, request: &ListEnabledPluginsRequest)
        -> ListEnabledPluginsResponse;
}

/// Servicer that acknowledges every request
#[derive(Debug, Clone, Copy, Default)]
pub struct TestPluginServicer;

impl TestPluginService for TestPluginServicer {
    fn test_case_will_start(
        &self,
        request: &TestCaseWillStartRequest,
    ) -> TestCaseWillStartResponse {
        log::info!("Received request for TestCaseWillStart {:?}", request);
        TestCaseWillStartResponse::default()
    }

    fn test_case_did_finish(
        &self,
        request: &TestCaseDidFinishRequest,
    ) -> TestCaseDidFinishResponse {
        log::info!("Received request for TestCaseDidFinish {:?}", request);
        TestCaseDidFinishResponse::default()
    }

    fn test_case_did_fail(&self, request: &TestCaseDidFailRequest) -> TestCaseDidFailResponse {
        log::info!("Received request for TestCaseDidFail {:?}", request);
        TestCaseDidFailResponse::default()
    }

    fn list_enabled_plugins(
        &self,
        request: &ListEnabledPluginsRequest,
    ) -> ListEnabledPluginsResponse {
        log::info!("Received request for ListEnabledPlugins {:?}", request);
        ListEnabledPluginsResponse::default()
    }
}

/// Where and how the plugin service is served
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginServerConfig {
    pub address: String,
    pub worker_count: usize,
}

impl Default for PluginServerConfig {
    fn default() -> Self {
        Self {
            address: PLUGIN_SERVICE_ADDRESS.to_string(),
            worker_count: PLUGIN_SERVICE_WORKER_COUNT,
        }
    }
}
