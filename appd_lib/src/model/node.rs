use crate::error::Error;
use crate::model::Collection;

field_mapped! {
    /// An application server instance (a JVM, CLR, PHP process, ...).
    pub struct Node {
        pub id: i64 = "",
        pub name: String = "",
        pub node_type: String = "type",
        pub machine_id: i64 = "machineId",
        pub machine_name: String = "machineName",
        pub tier_id: i64 = "tierId",
        pub tier_name: String = "tierName",
        pub unique_local_id: String = "nodeUniqueLocalId",
        pub os_type: String = "machineOSType",
        pub has_app_agent: bool = "appAgentPresent",
        pub app_agent_version: String = "appAgentVersion",
        pub has_machine_agent: bool = "machineAgentPresent",
        pub machine_agent_version: String = "machineAgentVersion",
    }
}

pub type Nodes = Collection<Node>;

impl Collection<Node> {
    /// Nodes running on the given host.
    pub fn by_machine_name(&self, name: &str) -> Nodes {
        self.filter(|n| n.machine_name == name)
    }

    pub fn by_machine_id(&self, machine_id: i64) -> Nodes {
        self.filter(|n| n.machine_id == machine_id)
    }

    pub fn by_tier_name(&self, name: &str) -> Nodes {
        self.filter(|n| n.tier_name == name)
    }

    pub fn by_tier_id(&self, tier_id: i64) -> Nodes {
        self.filter(|n| n.tier_id == tier_id)
    }

    pub fn by_name(&self, name: &str) -> Result<&Node, Error> {
        self.find_unique(name, |n| n.name == name)
    }
}
