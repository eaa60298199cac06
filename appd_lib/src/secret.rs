//! Secret backends for reading the controller password.
//!
//! Resolution is via secret backends only (1Password, Bitwarden, KeePassXC).
//! Passwords in plain env vars are intentionally not read.

use std::process::{Command, Stdio};

/// Read secret from a subprocess; stderr is discarded to avoid leaking into output.
fn run_cmd(args: &[&str], env_extra: &[(&str, &str)]) -> Option<String> {
    let (bin, rest) = args.split_first()?;
    let mut cmd = Command::new(bin);
    cmd.args(rest)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());
    for (k, v) in env_extra {
        cmd.env(k, v);
    }
    let out = cmd.output().ok()?;
    if !out.status.success() {
        tracing::debug!(bin = *bin, status = %out.status, "secret backend failed");
        return None;
    }
    String::from_utf8(out.stdout)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Non-empty, trimmed env var.
fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// 1Password CLI (`op read`).
///
/// Configure via:
/// - `APPD_OP_ENTRY_PATH`: `op://Vault/Item` (field name from `APPD_OP_FIELD`, default `password`)
/// - Or `APPD_OP_VAULT` + `APPD_OP_ITEM` + optional `APPD_OP_FIELD`
pub fn one_password() -> Option<String> {
    let field = env_value("APPD_OP_FIELD").unwrap_or_else(|| "password".to_string());
    let uri = match env_value("APPD_OP_ENTRY_PATH") {
        Some(path) => format!("{}/{}", path.trim_end_matches('/'), field),
        None => {
            let vault = env_value("APPD_OP_VAULT")?;
            let item = env_value("APPD_OP_ITEM")?;
            format!("op://{}/{}/{}", vault, item, field)
        }
    };
    run_cmd(&["op", "read", &uri], &[])
}

/// Bitwarden CLI (`bw get password`).
///
/// `APPD_BW_ITEM_ID` names the login item; `APPD_BW_SESSION` is passed on as
/// `BW_SESSION` when the vault is locked.
pub fn bitwarden() -> Option<String> {
    let id = env_value("APPD_BW_ITEM_ID")?;
    let session = env_value("APPD_BW_SESSION");
    let env_extra: Vec<(&str, &str)> = session
        .as_deref()
        .map(|s| ("BW_SESSION", s))
        .into_iter()
        .collect();
    run_cmd(&["bw", "get", "password", &id], &env_extra)
}

/// KeePassXC CLI (`keepassxc-cli show`).
///
/// Configure via:
/// - `APPD_KPXC_DB`: path to the .kdbx database file
/// - `APPD_KPXC_ENTRY`: entry title or path (e.g. "Controller" or "Ops/Controller")
/// - `APPD_KPXC_ATTRIBUTE`: attribute name (default `Password`)
pub fn keepassxc() -> Option<String> {
    let db = env_value("APPD_KPXC_DB")?;
    let entry = env_value("APPD_KPXC_ENTRY")?;
    let attr = env_value("APPD_KPXC_ATTRIBUTE").unwrap_or_else(|| "Password".to_string());
    run_cmd(&["keepassxc-cli", "show", "-a", &attr, &db, &entry], &[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_password_not_configured() {
        // No env set -> None
        assert!(one_password().is_none());
    }

    #[test]
    fn bitwarden_not_configured() {
        assert!(bitwarden().is_none());
    }

    #[test]
    fn keepassxc_not_configured() {
        assert!(keepassxc().is_none());
    }

    #[test]
    fn missing_binary_is_none() {
        assert!(run_cmd(&["appd-no-such-binary-here"], &[]).is_none());
        assert!(run_cmd(&[], &[]).is_none());
    }
}
