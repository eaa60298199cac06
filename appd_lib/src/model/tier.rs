use crate::error::Error;
use crate::model::{Collection, Constrained};

domain!(
    /// Agent types a tier can report.
    TierAgentType,
    "agent_type",
    [
        "APP_AGENT",
        "MACHINE_AGENT",
        "DOT_NET_APP_AGENT",
        "DOT_NET_MACHINE_AGENT",
        "PHP_APP_AGENT",
        "PHP_MACHINE_AGENT",
    ]
);

field_mapped! {
    /// A group of nodes performing the same role in an application.
    pub struct Tier {
        pub id: i64 = "",
        pub name: String = "",
        pub description: Option<String> = "",
        pub tier_type: String = "type",
        pub node_count: i64 = "numberOfNodes",
        pub agent_type: Constrained<TierAgentType> = "agentType",
    }
}

pub type Tiers = Collection<Tier>;

impl Collection<Tier> {
    /// Tiers whose agent type matches, e.g. `"APP_AGENT"` for app-server tiers.
    pub fn by_agent_type(&self, agent_type: &str) -> Tiers {
        self.filter(|t| t.agent_type == agent_type)
    }

    pub fn by_name(&self, name: &str) -> Result<&Tier, Error> {
        self.find_unique(name, |t| t.name == name)
    }
}
