use chrono::{DateTime, Local};
use serde_json::Value;

use crate::model::{Collection, Constrained};
use crate::time::from_wire;

domain!(
    /// Why the agent captured a snapshot.
    DeepDivePolicy,
    "deep_dive_policy",
    [
        "SLA_FAILURE",
        "TIME_SAMPLING",
        "ERROR_SAMPLING",
        "OCCURRENCE_SAMPLING",
        "ON_DEMAND",
        "HOTSPOT",
        "HOTSPOT_LEARN",
        "APPLICATION_STARTUP",
        "DIAGNOSTIC_SESSION",
        "SLOW_DIAGNOSTIC_SESSION",
        "ERROR_DIAGNOSTIC_SESSION",
        "POLICY_FAILURE_DIAGNOSTIC_SESSION",
        "INFLIGHT_SLOW_SESSION",
    ]
);

domain!(
    /// How the end user experienced the request.
    UserExperience,
    "user_experience",
    ["NORMAL", "SLOW", "VERY_SLOW", "STALL", "BUSINESS_ERROR"]
);

domain!(
    CollectorType,
    "data_collector_type",
    [
        "ERROR_IDS",
        "STACK_TRACES",
        "ERROR_DETAIL",
        "HTTP_PARAMETER",
        "BUSINESS_DATA",
        "COOKIE",
        "HTTP_HEADER",
        "SESSION_KEY",
        "RESPONSE_HEADER",
        "LOG_MESSAGE",
        "TRANSACTION_PROPERTY",
        "TRANSACTION_EVENT",
        "DOTNET_PROPS",
        "DOTNET_SET",
    ]
);

field_mapped! {
    /// A captured request snapshot.
    ///
    /// Collector payloads (headers, parameters, cookies, error details and
    /// so on) differ per agent and are kept as raw JSON.
    pub struct Snapshot {
        pub id: i64 = "",
        pub local_id: i64 = "localID",
        pub request_guid: String = "requestGUID",
        pub summary: Option<String> = "",
        pub bt_id: i64 = "businessTransactionId",
        pub app_id: i64 = "applicationId",
        pub url: Option<String> = "URL",
        pub archived: bool = "",
        pub is_async: bool = "async",
        pub stall_dump: Option<String> = "stallDump",
        pub call_chain: Option<String> = "callChain",
        pub is_first_in_chain: bool = "firstInChain",
        pub diag_session_guid: Option<String> = "diagnosticSessionGUID",
        pub exit_sequence: Option<String> = "snapshotExitSequence",
        pub exit_calls_truncated: bool = "exitCallsDataTruncated",
        pub exit_calls_truncated_msg: Option<String> = "exitCallsDataTruncationMessage",
        pub app_component_id: i64 = "applicationComponentId",
        pub app_component_node_id: i64 = "applicationComponentNodeId",
        pub local_start_time_ms: i64 = "localStartTime",
        pub server_start_time_ms: i64 = "serverStartTime",
        pub thread_id: Value = "threadID",
        pub thread_name: Option<String> = "threadName",
        pub http_headers: Value = "httpHeaders",
        pub response_headers: Value = "responseHeaders",
        pub http_params: Value = "httpParameters",
        pub cookies: Value = "",
        pub http_session_id: Option<String> = "httpSessionID",
        pub session_keys: Value = "sessionKeys",
        pub business_data: Value = "businessData",
        pub error_ids: Value = "errorIDs",
        pub error_occurred: bool = "errorOccured",
        pub error_summary: Option<String> = "errorSummary",
        pub error_details: Value = "errorDetails",
        pub log_messages: Value = "logMessages",
        pub bt_events: Value = "transactionEvents",
        pub bt_properties: Value = "transactionProperties",
        pub dotnet_properties: Value = "dotnetProperty",
        pub has_deep_dive_data: bool = "hasDeepDiveData",
        pub deep_dive_policy: Constrained<DeepDivePolicy> = "deepDivePolicy",
        pub is_delayed_deep_dive: bool = "delayedDeepDive",
        pub delayed_deep_dive_offset: Value = "delayedDeepDiveOffSet",
        pub has_unresolved_calls: bool = "unresolvedCallInCallChain",
        pub time_taken_ms: i64 = "timeTakenInMilliSecs",
        pub cpu_time_taken_ms: i64 = "cpuTimeTakenInMilliSecs",
        pub warning_threshold: Value = "warningThreshold",
        pub critical_threshold: Value = "criticalThreshold",
        pub user_experience: Constrained<UserExperience> = "userExperience",
    }
}

impl Snapshot {
    pub fn local_start_time(&self) -> Option<DateTime<Local>> {
        from_wire(self.local_start_time_ms)
    }

    pub fn server_start_time(&self) -> Option<DateTime<Local>> {
        from_wire(self.server_start_time_ms)
    }
}

pub type Snapshots = Collection<Snapshot>;
