//! Request query parameters, time ranges and snapshot search criteria.

use crate::error::{Error, ValidationError};
use crate::model::{validate_enum, CollectorType, Constrained, DeepDivePolicy, Domain, UserExperience};

/// Time range kinds understood by the controller.
pub const TIME_RANGE_TYPES: [&str; 4] = ["BEFORE_NOW", "BEFORE_TIME", "AFTER_TIME", "BETWEEN_TIMES"];

/// Ordered query parameters. A `None` value is kept in the map but never sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, Option<String>)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing an earlier value in place.
    pub fn insert(&mut self, key: &str, value: impl ToString) {
        self.insert_opt(key, Some(value));
    }

    /// Set `key` to a value that may be absent.
    pub fn insert_opt<V: ToString>(&mut self, key: &str, value: Option<V>) {
        let value = value.map(|v| v.to_string());
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    /// `None` when the key was never set, `Some(None)` when it is set but absent.
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_deref())
    }

    pub fn extend(&mut self, other: QueryParams) {
        for (key, value) in other.entries {
            self.insert_opt(&key, value);
        }
    }

    /// Parameters that will actually be sent, in insertion order.
    pub fn present(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (k.as_str(), v)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Percent-encoded `k=v&...` of the present parameters.
    pub fn to_query_string(&self) -> String {
        self.present()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            let key: String = k.into();
            params.insert(&key, v);
        }
        params
    }
}

/// Check a time range combination and build its four query parameters.
///
/// Zero durations and timestamps count as missing. An empty or absent
/// `range_type` skips every check. All four keys are always returned;
/// the unused ones are absent and dropped when the request is sent.
pub fn validate_time_range(
    range_type: Option<&str>,
    duration_in_mins: Option<u64>,
    start_time: Option<i64>,
    end_time: Option<i64>,
) -> Result<QueryParams, Error> {
    let range_type = range_type.filter(|t| !t.is_empty());
    let has_duration = duration_in_mins.is_some_and(|d| d != 0);
    let has_start = start_time.is_some_and(|t| t != 0);
    let has_end = end_time.is_some_and(|t| t != 0);

    let problem = match range_type {
        None => None,
        Some(t) if !TIME_RANGE_TYPES.contains(&t) => Some(format!(
            "time_range_type must be one of: {}",
            TIME_RANGE_TYPES.join(", ")
        )),
        Some("BEFORE_NOW") if !has_duration => {
            Some("when using BEFORE_NOW, you must specify duration_in_mins".to_string())
        }
        Some("BEFORE_TIME") if !(has_duration && has_end) => Some(
            "when using BEFORE_TIME, you must specify duration_in_mins and end_time".to_string(),
        ),
        Some("AFTER_TIME") if !(has_duration && has_start) => Some(
            "when using AFTER_TIME, you must specify duration_in_mins and start_time".to_string(),
        ),
        Some("BETWEEN_TIMES") if !(has_start && has_end) => {
            Some("when using BETWEEN_TIMES, you must specify start_time and end_time".to_string())
        }
        Some(_) => None,
    };
    if let Some(message) = problem {
        return Err(ValidationError::TimeRange(message).into());
    }

    let mut params = QueryParams::new();
    params.insert_opt("time-range-type", range_type);
    params.insert_opt("duration-in-mins", duration_in_mins);
    params.insert_opt("start-time", start_time);
    params.insert_opt("end-time", end_time);
    Ok(params)
}

/// A time window for metric, violation, event and snapshot queries.
///
/// Times are controller timestamps (see [`crate::time::to_wire`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRange {
    pub range_type: Option<String>,
    pub duration_in_mins: Option<u64>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
}

impl TimeRange {
    /// Any combination; checked only when turned into parameters.
    pub fn new(
        range_type: Option<&str>,
        duration_in_mins: Option<u64>,
        start_time: Option<i64>,
        end_time: Option<i64>,
    ) -> Self {
        Self {
            range_type: range_type.map(String::from),
            duration_in_mins,
            start_time,
            end_time,
        }
    }

    pub fn before_now(duration_in_mins: u64) -> Self {
        Self::new(Some("BEFORE_NOW"), Some(duration_in_mins), None, None)
    }

    pub fn before_time(duration_in_mins: u64, end_time: i64) -> Self {
        Self::new(Some("BEFORE_TIME"), Some(duration_in_mins), None, Some(end_time))
    }

    pub fn after_time(duration_in_mins: u64, start_time: i64) -> Self {
        Self::new(Some("AFTER_TIME"), Some(duration_in_mins), Some(start_time), None)
    }

    pub fn between(start_time: i64, end_time: i64) -> Self {
        Self::new(Some("BETWEEN_TIMES"), None, Some(start_time), Some(end_time))
    }

    pub fn to_params(&self) -> Result<QueryParams, Error> {
        validate_time_range(
            self.range_type.as_deref(),
            self.duration_in_mins,
            self.start_time,
            self.end_time,
        )
    }
}

impl Default for TimeRange {
    /// The last 15 minutes.
    fn default() -> Self {
        Self::before_now(15)
    }
}

/// Search criteria for request snapshots. Empty lists and `None` are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotQuery {
    pub guids: Vec<String>,
    pub archived: Option<bool>,
    pub deep_dive_policy: Vec<String>,
    pub application_component_ids: Vec<i64>,
    pub application_component_node_ids: Vec<i64>,
    pub business_transaction_ids: Vec<i64>,
    pub user_experience: Vec<String>,
    pub first_in_chain: Option<bool>,
    pub need_props: Option<bool>,
    pub need_exit_calls: Option<bool>,
    pub execution_time_in_millis: Option<i64>,
    pub session_id: Option<String>,
    pub user_principal_id: Option<String>,
    pub error_ids: Vec<i64>,
    pub error_occurred: Option<bool>,
    pub bad_request: Option<bool>,
    pub diagnostic_snapshot: Option<bool>,
    pub diagnostic_session_guid: Vec<String>,
    pub starting_request_id: Option<i64>,
    pub ending_request_id: Option<i64>,
    pub data_collector_name: Option<String>,
    pub data_collector_type: Option<String>,
    pub data_collector_value: Option<String>,
}

fn join<T: ToString>(values: &[T]) -> Option<String> {
    if values.is_empty() {
        None
    } else {
        Some(
            values
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}

fn check_all<D: Domain>(values: &[String]) -> Result<(), ValidationError> {
    for v in values {
        validate_enum(D::ATTRIBUTE, Some(v.as_str()), D::ALLOWED)?;
    }
    Ok(())
}

impl SnapshotQuery {
    /// Validate the constrained criteria and build the query parameters.
    pub fn to_params(&self) -> Result<QueryParams, Error> {
        check_all::<DeepDivePolicy>(&self.deep_dive_policy)?;
        check_all::<UserExperience>(&self.user_experience)?;
        let collector_type = match self.data_collector_type.as_deref() {
            Some(t) => Constrained::<CollectorType>::try_new(t)?.get().map(String::from),
            None => None,
        };

        let mut p = QueryParams::new();
        p.insert_opt("guids", join(&self.guids));
        p.insert_opt("archived", self.archived);
        p.insert_opt("deep-dive-policy", join(&self.deep_dive_policy));
        p.insert_opt("application-component-ids", join(&self.application_component_ids));
        p.insert_opt(
            "application-component-node-ids",
            join(&self.application_component_node_ids),
        );
        p.insert_opt("business-transaction-ids", join(&self.business_transaction_ids));
        p.insert_opt("user-experience", join(&self.user_experience));
        p.insert_opt("first-in-chain", self.first_in_chain);
        p.insert_opt("need-props", self.need_props);
        p.insert_opt("need-exit-calls", self.need_exit_calls);
        p.insert_opt("execution-time-in-millis", self.execution_time_in_millis);
        p.insert_opt("session-id", self.session_id.as_deref());
        p.insert_opt("user-principal-id", self.user_principal_id.as_deref());
        p.insert_opt("error-ids", join(&self.error_ids));
        p.insert_opt("error-occurred", self.error_occurred);
        p.insert_opt("bad-request", self.bad_request);
        p.insert_opt("diagnostic-snapshot", self.diagnostic_snapshot);
        p.insert_opt("diagnostic-session-guid", join(&self.diagnostic_session_guid));
        p.insert_opt("starting-request-id", self.starting_request_id);
        p.insert_opt("ending-request-id", self.ending_request_id);
        p.insert_opt("data-collector-name", self.data_collector_name.as_deref());
        p.insert_opt("data-collector-type", collector_type);
        p.insert_opt("data-collector-value", self.data_collector_value.as_deref());
        Ok(p)
    }
}
