use chrono::{DateTime, Local};

use crate::model::Collection;
use crate::time::from_wire;
use crate::Error;

field_mapped! {
    /// A licensed product module, such as `java` or `machine-agent`.
    pub struct LicenseModule {
        pub name: String = "",
    }
}

pub type LicenseModuleList = Collection<LicenseModule>;

impl Collection<LicenseModule> {
    pub fn by_name(&self, name: &str) -> Result<&LicenseModule, Error> {
        self.find_unique(name, |m| m.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.iter().any(|m| m.name == name)
    }
}

field_mapped! {
    /// Envelope of the license modules endpoint.
    pub struct LicenseModules {
        pub modules: LicenseModuleList = "",
    }
}

field_mapped! {
    /// License consumption of one module at five minute resolution.
    pub struct LicenseUsage {
        pub id: i64 = "",
        pub account_id: i64 = "accountId",
        pub units_used: i64 = "unitsUsed",
        pub units_allowed: i64 = "unitsAllowed",
        pub units_provisioned: Option<i64> = "unitsProvisioned",
        pub license_module: String = "agentType",
        pub created_on_ms: i64 = "createdOn",
    }
}

impl LicenseUsage {
    pub fn created_on(&self) -> Option<DateTime<Local>> {
        from_wire(self.created_on_ms)
    }
}

field_mapped! {
    /// License consumption of one module aggregated over an hour.
    pub struct HourlyLicenseUsage {
        pub id: i64 = "",
        pub account_id: i64 = "accountId",
        pub max_units_used: i64 = "maxUnitsUsed",
        pub min_units_used: i64 = "minUnitsUsed",
        pub avg_units_used: f64 = "avgUnitsUsed",
        pub total_units_used: i64 = "totalUnitsUsed",
        pub sample_count: i64 = "sampleCount",
        pub avg_units_allowed: f64 = "avgUnitsAllowed",
        pub avg_units_provisioned: Option<f64> = "avgUnitsProvisioned",
        pub license_module: String = "agentType",
        pub created_on_ms: i64 = "createdOn",
    }
}

impl HourlyLicenseUsage {
    pub fn created_on(&self) -> Option<DateTime<Local>> {
        from_wire(self.created_on_ms)
    }
}

pub type LicenseUsageList = Collection<LicenseUsage>;
pub type HourlyLicenseUsageList = Collection<HourlyLicenseUsage>;

// Both usage flavours filter the same way.
macro_rules! impl_usage_filters {
    ($($item:ty),*) => {
        $(
            impl Collection<$item> {
                pub fn by_account_id(&self, account_id: i64) -> Self {
                    self.filter(|u| u.account_id == account_id)
                }

                pub fn by_license_module(&self, license_module: &str) -> Self {
                    self.filter(|u| u.license_module == license_module)
                }
            }
        )*
    };
}

impl_usage_filters!(LicenseUsage, HourlyLicenseUsage);

field_mapped! {
    /// Envelope of the five minute usage endpoint.
    pub struct LicenseUsages {
        pub usages: LicenseUsageList = "",
    }
}

field_mapped! {
    /// Envelope of the hourly usage endpoint.
    pub struct HourlyLicenseUsages {
        pub usages: HourlyLicenseUsageList = "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldMapped;
    use serde_json::json;

    #[test]
    fn module_envelope() {
        let mods = LicenseModules::from_json(&json!({
            "modules": [{"name": "java", "link": "x"}, {"name": "machine-agent"}]
        }))
        .unwrap();
        assert!(mods.modules.contains("java"));
        assert!(!mods.modules.contains("php"));
        assert_eq!(mods.modules.by_name("machine-agent").unwrap().name, "machine-agent");
        assert!(mods.modules.by_name("php").is_err());
    }

    #[test]
    fn hourly_usage_filters() {
        let usage = HourlyLicenseUsages::from_json(&json!({
            "usages": [
                {"id": 1, "accountId": 2, "maxUnitsUsed": 5, "minUnitsUsed": 1, "avgUnitsUsed": 2.5,
                 "totalUnitsUsed": 30, "sampleCount": 12, "avgUnitsAllowed": 10,
                 "avgUnitsProvisioned": null, "agentType": "java", "createdOn": 1_450_000_000_000_i64},
                {"id": 2, "accountId": 3, "maxUnitsUsed": 2, "minUnitsUsed": 2, "avgUnitsUsed": 2,
                 "totalUnitsUsed": 24, "sampleCount": 12, "avgUnitsAllowed": 4.0,
                 "avgUnitsProvisioned": 4.0, "agentType": "machine-agent", "createdOn": 1_450_000_000_000_i64}
            ]
        }))
        .unwrap();
        assert_eq!(usage.usages.by_account_id(2).len(), 1);
        let machine = usage.usages.by_license_module("machine-agent");
        assert_eq!(machine[0].avg_units_provisioned, Some(4.0));
        assert_eq!(usage.usages[0].avg_units_allowed, 10.0);
        assert_eq!(usage.usages[0].created_on().unwrap().timestamp(), 1_450_000_000);
    }

    #[test]
    fn five_minute_usage_requires_envelope_key() {
        assert!(LicenseUsages::from_json(&json!({"data": []})).is_err());
        let usage = LicenseUsages::from_json(&json!({
            "usages": [{"id": 9, "accountId": 2, "unitsUsed": 3, "unitsAllowed": 10,
                        "unitsProvisioned": null, "agentType": "java", "createdOn": 0}]
        }))
        .unwrap();
        assert_eq!(usage.usages.by_license_module("java")[0].units_used, 3);
    }
}
