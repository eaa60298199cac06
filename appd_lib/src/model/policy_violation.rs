use chrono::{DateTime, Local};

use crate::model::{Collection, Constrained, EntityDefinition};
use crate::time::from_wire;

domain!(
    /// Lifecycle state of a violation.
    ViolationStatus,
    "status",
    ["NOT_APPLICABLE", "OPEN", "RESOLVED"]
);

domain!(
    ViolationSeverity,
    "severity",
    ["INFO", "WARNING", "CRITICAL"]
);

field_mapped! {
    /// A policy or health rule violation.
    pub struct PolicyViolation {
        pub id: i64 = "",
        pub name: String = "",
        pub description: Option<String> = "",
        pub status: Constrained<ViolationStatus> = "incidentStatus",
        pub severity: Constrained<ViolationSeverity> = "",
        pub start_time_ms: i64 = "startTimeInMillis",
        pub end_time_ms: i64 = "endTimeInMillis",
        pub detected_time_ms: i64 = "detectedTimeInMillis",
        pub deep_link_url: String = "deepLinkUrl",
        pub affected_entity: EntityDefinition = "affectedEntityDefinition",
        pub triggered_entity: EntityDefinition = "triggeredEntityDefinition",
    }
}

impl PolicyViolation {
    pub fn start_time(&self) -> Option<DateTime<Local>> {
        from_wire(self.start_time_ms)
    }

    /// When the violation was resolved; an open violation reports the epoch or a negative value.
    pub fn end_time(&self) -> Option<DateTime<Local>> {
        from_wire(self.end_time_ms)
    }

    pub fn detected_time(&self) -> Option<DateTime<Local>> {
        from_wire(self.detected_time_ms)
    }
}

pub type PolicyViolations = Collection<PolicyViolation>;

impl Collection<PolicyViolation> {
    pub fn by_status(&self, status: &str) -> PolicyViolations {
        self.filter(|v| v.status == status)
    }

    pub fn by_severity(&self, severity: &str) -> PolicyViolations {
        self.filter(|v| v.severity == severity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn violation(id: i64, status: &str, severity: &str) -> Value {
        json!({
            "id": id,
            "name": "CPU utilization is too high",
            "description": null,
            "incidentStatus": status,
            "severity": severity,
            "startTimeInMillis": 1_420_000_000_000_i64,
            "endTimeInMillis": 1_420_000_600_000_i64,
            "detectedTimeInMillis": 1_420_000_000_000_i64,
            "deepLinkUrl": "http://localhost:8090/#location=APP_INCIDENT_DETAIL",
            "affectedEntityDefinition": {"entityId": 12, "entityType": "APPLICATION_COMPONENT_NODE", "name": "web1"},
            "triggeredEntityDefinition": {"entityId": 3, "entityType": "POLICY", "name": "CPU"}
        })
    }

    #[test]
    fn decodes_nested_entities() {
        let list = PolicyViolations::from_json(&json!([violation(1, "OPEN", "CRITICAL")])).unwrap();
        let v = &list[0];
        assert_eq!(v.affected_entity.entity_id, 12);
        assert_eq!(v.affected_entity.entity_type, "APPLICATION_COMPONENT_NODE");
        assert_eq!(v.triggered_entity.entity_type, "POLICY");
        assert_eq!(
            (v.end_time().unwrap() - v.start_time().unwrap()).num_minutes(),
            10
        );
        assert_eq!(v.detected_time(), v.start_time());
    }

    #[test]
    fn missing_nested_entity_fails() {
        let mut raw = violation(1, "OPEN", "INFO");
        raw.as_object_mut().unwrap().remove("triggeredEntityDefinition");
        assert!(PolicyViolations::from_json(&json!([raw])).is_err());
    }

    #[test]
    fn invalid_status_and_filters() {
        assert!(PolicyViolations::from_json(&json!([violation(1, "CLOSED", "INFO")])).is_err());

        let list = PolicyViolations::from_json(&json!([
            violation(1, "OPEN", "CRITICAL"),
            violation(2, "RESOLVED", "WARNING"),
            violation(3, "OPEN", "WARNING"),
        ]))
        .unwrap();
        assert_eq!(list.by_status("OPEN").len(), 2);
        assert_eq!(list.by_severity("WARNING")[0].id, 2);
        assert!(list.by_severity("INFO").is_empty());
    }
}
