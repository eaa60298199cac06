//! AppDynamics controller REST API client library.
//!
//! Provides a typed client for the controller's REST and account APIs:
//! applications, tiers, nodes, business transactions, metrics, the metric
//! tree, snapshots, violations, events, configuration and license usage.

pub mod client;
pub mod config;
pub mod error;
pub mod helpers;
pub mod model;
pub mod params;
pub mod secret;
pub mod time;

pub use client::{Body, Client, Method};
pub use config::ClientConfig;
pub use error::{DecodeError, Error, HttpError, ValidationError};
pub use helpers::{get_password, normalize_base_url, BasicAuth, PasswordSource};
pub use params::{validate_time_range, QueryParams, SnapshotQuery, TimeRange};
pub use secret::{bitwarden, keepassxc, one_password};

/// Library version for User-Agent and diagnostics.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
