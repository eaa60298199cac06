use crate::model::Collection;

field_mapped! {
    /// A registered business transaction definition.
    pub struct BusinessTransaction {
        pub id: i64 = "",
        pub name: String = "",
        pub bt_type: String = "entryPointType",
        pub internal_name: String = "internalName",
        pub is_background: bool = "background",
        pub tier_id: i64 = "tierId",
        pub tier_name: String = "tierName",
    }
}

pub type BusinessTransactions = Collection<BusinessTransaction>;

impl Collection<BusinessTransaction> {
    /// All transactions with this name; different tiers may reuse a name.
    pub fn by_name(&self, name: &str) -> BusinessTransactions {
        self.filter(|bt| bt.name == name)
    }

    pub fn by_tier_and_name(&self, name: &str, tier_name: &str) -> BusinessTransactions {
        self.filter(|bt| bt.name == name && bt.tier_name == tier_name)
    }
}
