//! Connection settings, from code or from the environment.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::Error;
use crate::helpers::get_password;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8090";
pub const DEFAULT_USERNAME: &str = "user1";
pub const DEFAULT_PASSWORD: &str = "welcome";
/// Account of a single-tenant controller.
pub const DEFAULT_ACCOUNT: &str = "customer1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything needed to build a [`Client`](crate::Client).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub username: String,
    pub password: SecretString,
    pub account: String,
    /// Default application for application-scoped calls.
    pub app_id: Option<u64>,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            password: SecretString::from(DEFAULT_PASSWORD),
            account: DEFAULT_ACCOUNT.to_string(),
            app_id: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Read settings from the process environment and the password from a secret backend.
    ///
    /// - `APPD_CONTROLLER_URL` (required)
    /// - `APPD_USERNAME` (required)
    /// - `APPD_ACCOUNT` (default `customer1`)
    /// - `APPD_APP_ID` (optional numeric default application)
    /// - `APPD_TIMEOUT_SECS` (default 30)
    pub fn from_env() -> Result<Self, Error> {
        let (password, source) = get_password().map_err(Error::Configuration)?;
        tracing::debug!(?source, "controller password resolved");
        Self::from_lookup(|name| std::env::var(name).ok(), SecretString::from(password))
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable lookup and password.
    pub fn from_lookup<F>(lookup: F, password: SecretString) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |name: &str| {
            var(name).ok_or_else(|| Error::Configuration(format!("{} is not set", name)))
        };

        let app_id = var("APPD_APP_ID")
            .map(|v| {
                v.parse::<u64>()
                    .map_err(|_| Error::Configuration(format!("APPD_APP_ID must be numeric, got {}", v)))
            })
            .transpose()?;
        let timeout = match var("APPD_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(v.parse().map_err(|_| {
                Error::Configuration(format!("APPD_TIMEOUT_SECS must be a number of seconds, got {}", v))
            })?),
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            base_url: required("APPD_CONTROLLER_URL")?,
            username: required("APPD_USERNAME")?,
            password,
            account: var("APPD_ACCOUNT").unwrap_or_else(|| DEFAULT_ACCOUNT.to_string()),
            app_id,
            timeout,
        })
    }
}
