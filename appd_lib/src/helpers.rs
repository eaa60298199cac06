//! Helpers for password resolution, base URL normalization and basic auth.

use base64::Engine;
use secrecy::{ExposeSecret, SecretString};

/// Source from which the password was obtained (for diagnostics).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordSource {
    OnePassword,
    Bitwarden,
    Keepassxc,
}

/// Get the controller password from a secret backend only (1Password, Bitwarden, KeePassXC).
///
/// Plain-text passwords in env vars are not supported.
/// Configure one backend via its env vars (see [secret](crate::secret) module):
/// - 1Password: `APPD_OP_ENTRY_PATH` (op://Vault/Item) or `APPD_OP_VAULT` + `APPD_OP_ITEM`; optional `APPD_OP_FIELD` (default password).
/// - Bitwarden: `APPD_BW_ITEM_ID` (login item UUID); optional `APPD_BW_SESSION`.
/// - KeePassXC: `APPD_KPXC_DB`, `APPD_KPXC_ENTRY`; optional `APPD_KPXC_ATTRIBUTE` (default Password).
pub fn get_password() -> Result<(String, PasswordSource), String> {
    let backends: [(fn() -> Option<String>, PasswordSource); 3] = [
        (crate::secret::one_password, PasswordSource::OnePassword),
        (crate::secret::bitwarden, PasswordSource::Bitwarden),
        (crate::secret::keepassxc, PasswordSource::Keepassxc),
    ];
    for (read, source) in backends {
        if let Some(p) = read().filter(|p| !p.is_empty()) {
            return Ok((p, source));
        }
    }
    Err(
        "Controller password not found. Configure a secret backend: APPD_OP_ENTRY_PATH (1Password), \
         APPD_BW_ITEM_ID (Bitwarden), or APPD_KPXC_DB+APPD_KPXC_ENTRY (KeePassXC)."
            .to_string(),
    )
}

/// Prepend `http://` when no scheme is given and drop trailing slashes.
pub fn normalize_base_url(url: &str) -> String {
    let url = url.trim();
    let url = if url.contains("://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    };
    url.trim_end_matches('/').to_string()
}

/// Credentials sent with every request: `username@account` and the password.
#[derive(Debug, Clone)]
pub struct BasicAuth {
    principal: String,
    password: SecretString,
}

impl BasicAuth {
    pub fn new(username: &str, account: &str, password: SecretString) -> Self {
        Self {
            principal: format!("{}@{}", username, account),
            password,
        }
    }

    pub fn principal(&self) -> &str {
        &self.principal
    }

    /// Value of the `Authorization` header.
    pub fn header_value(&self) -> String {
        let raw = format!("{}:{}", self.principal, self.password.expose_secret());
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(raw.as_bytes())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("ctrl.example.com:8090"), "http://ctrl.example.com:8090");
        assert_eq!(normalize_base_url("https://ctrl.example.com///"), "https://ctrl.example.com");
        assert_eq!(normalize_base_url("http://localhost:8090"), "http://localhost:8090");
    }

    #[test]
    fn test_basic_auth_header() {
        let auth = BasicAuth::new("user1", "customer1", SecretString::from("welcome"));
        assert_eq!(auth.principal(), "user1@customer1");
        assert_eq!(auth.header_value(), "Basic dXNlcjFAY3VzdG9tZXIxOndlbGNvbWU=");
        assert!(!format!("{:?}", auth).contains("welcome"));
    }
}
