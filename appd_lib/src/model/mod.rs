//! Typed models for controller JSON payloads.
//!
//! Every resource type declares a static field map (attribute name to wire
//! key) and is decoded by [`decode`], which walks the table and assigns each
//! attribute from the matching JSON key. A missing key fails the decode;
//! unmapped keys are ignored. Types needing more than the table (optional
//! nested objects, tree links) add a decode hook.

/// Declares a field-mapped struct: its fields, their wire keys (`""` means
/// "same as the attribute name"), optional extra attributes that are not
/// read from the table, and an optional decode hook for those extras.
macro_rules! field_mapped {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                pub $field:ident : $ty:ty = $wire:literal
            ),* $(,)?
        }
        $(
            extra {
                $(
                    $(#[$emeta:meta])*
                    pub $efield:ident : $ety:ty
                ),* $(,)?
            }
        )?
        $( hook = $hook:path; )?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
        pub struct $name {
            $( $(#[$fmeta])* pub $field: $ty, )*
            $( $( $(#[$emeta])* pub $efield: $ety, )* )?
        }

        impl $crate::model::FieldMapped for $name {
            const TYPE_NAME: &'static str = stringify!($name);
            const FIELDS: &'static [$crate::model::Field] = &[
                $( $crate::model::Field::new(stringify!($field), $wire), )*
            ];

            fn assign(
                &mut self,
                attr: &'static str,
                value: &serde_json::Value,
            ) -> Result<(), $crate::Error> {
                match attr {
                    $( stringify!($field) => {
                        self.$field = $crate::model::FromWire::from_wire(attr, value)?;
                    } )*
                    _ => {
                        return Err($crate::error::DecodeError::UnknownAttribute {
                            type_name: stringify!($name),
                            attribute: attr,
                        }
                        .into())
                    }
                }
                Ok(())
            }

            $(
                fn decode_extra(
                    &mut self,
                    object: &serde_json::Map<String, serde_json::Value>,
                ) -> Result<(), $crate::Error> {
                    $hook(self, object)
                }
            )?
        }

        impl $crate::model::FromWire for $name {
            fn from_wire(
                _attr: &'static str,
                value: &serde_json::Value,
            ) -> Result<Self, $crate::Error> {
                $crate::model::decode(value)
            }
        }
    };
}

/// Declares an enumeration domain for a [`Constrained`] attribute.
macro_rules! domain {
    (
        $(#[$meta:meta])*
        $name:ident, $attr:literal, [$($value:literal),* $(,)?]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name;

        impl $crate::model::Domain for $name {
            const ATTRIBUTE: &'static str = $attr;
            const ALLOWED: &'static [&'static str] = &[$($value),*];
        }
    };
}

mod collection;
mod constrained;
mod mapping;

pub mod account;
pub mod application;
pub mod business_transaction;
pub mod config_variable;
pub mod entity;
pub mod event;
pub mod license;
pub mod metric_data;
pub mod metric_tree;
pub mod node;
pub mod policy_violation;
pub mod snapshot;
pub mod tier;

pub use collection::{Collection, Element};
pub use constrained::{validate_enum, Constrained, Domain};
pub use mapping::{decode, json_kind, Field, FieldMapped, FromWire};

pub use account::{Account, Accounts};
pub use application::{Application, Applications};
pub use business_transaction::{BusinessTransaction, BusinessTransactions};
pub use config_variable::{ConfigVariable, ConfigVariables};
pub use entity::{EntityDefinition, EntityType};
pub use event::{Event, EventType, Events};
pub use license::{
    HourlyLicenseUsage, HourlyLicenseUsageList, HourlyLicenseUsages, LicenseModule,
    LicenseModuleList, LicenseModules, LicenseUsage, LicenseUsageList, LicenseUsages,
};
pub use metric_data::{MetricData, MetricDataSingle, MetricFrequency, MetricValue, MetricValues};
pub use metric_tree::{Level, MetricTree, MetricTreeNode, MetricTreeNodeType, NodeId, NodeRef};
pub use node::{Node, Nodes};
pub use policy_violation::{PolicyViolation, PolicyViolations, ViolationSeverity, ViolationStatus};
pub use snapshot::{CollectorType, DeepDivePolicy, Snapshot, Snapshots, UserExperience};
pub use tier::{Tier, TierAgentType, Tiers};
