use chrono::{DateTime, Local};
use serde_json::{Map, Value};

use crate::model::{Collection, Constrained, EntityDefinition, FromWire};
use crate::time::from_wire;
use crate::Error;

domain!(
    EventType,
    "event_type",
    [
        "APPLICATION_ERROR",
        "STALL",
        "DEADLOCK",
        "MEMORY_LEAK",
        "MEMORY_LEAK_DIAGNOSTICS",
        "LOW_HEAP_MEMORY",
        "CUSTOM",
        "APP_SERVER_RESTART",
        "SYSTEM_LOG",
        "INFO_INSTRUMENTATION_VISIBILITY",
        "AGENT_EVENT",
        "AGENT_STATUS",
        "ACTIVITY_TRACE",
        "OBJECT_CONTENT_SUMMARY",
        "DIAGNOSTIC_SESSION",
        "HIGH_END_TO_END_LATENCY",
        "APPLICATION_CONFIG_CHANGE",
        "APPLICATION_DEPLOYMENT",
        "AGENT_DIAGNOSTICS",
        "MEMORY",
        "LICENSE",
        "CONTROLLER_AGENT_VERSION_INCOMPATIBILITY",
        "DISK_SPACE",
        "APPDYNAMICS_DATA",
        "APPDYNAMICS_CONFIGURATION_WARNINGS",
        "POLICY_OPEN",
        "POLICY_CLOSE",
        "POLICY_UPGRADED",
        "POLICY_DOWNGRADED",
        "RESOURCE_POOL_LIMIT",
    ]
);

field_mapped! {
    /// A controller event.
    pub struct Event {
        pub id: i64 = "",
        pub summary: String = "",
        pub event_type: Constrained<EventType> = "type",
        pub archived: bool = "",
        pub deep_link_url: String = "deepLinkUrl",
        pub event_time_ms: i64 = "eventTime",
        pub is_read: bool = "markedAsRead",
        pub is_resolved: bool = "markedAsResolved",
        pub severity: String = "",
        pub sub_type: Option<String> = "subType",
    }
    extra {
        pub triggered_entity: Option<EntityDefinition>,
        pub affected_entities: Collection<EntityDefinition>,
    }
    hook = Event::decode_entities;
}

impl Event {
    pub fn event_time(&self) -> Option<DateTime<Local>> {
        from_wire(self.event_time_ms)
    }

    // Entity references are optional on the wire, unlike the mapped fields.
    fn decode_entities(&mut self, object: &Map<String, Value>) -> Result<(), Error> {
        if let Some(raw) = object.get("triggeredEntity") {
            self.triggered_entity = FromWire::from_wire("triggered_entity", raw)?;
        }
        if let Some(raw) = object.get("affectedEntities").filter(|v| !v.is_null()) {
            self.affected_entities = Collection::from_json(raw)?;
        }
        Ok(())
    }
}

pub type Events = Collection<Event>;

impl Collection<Event> {
    pub fn by_type(&self, event_type: &str) -> Events {
        self.filter(|e| e.event_type == event_type)
    }
}
