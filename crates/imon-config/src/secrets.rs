//! Runtime secret resolution.
//!
//! # Contract
//! - Config YAML stores only **env var NAMES** (e.g. `"IMON_API_ACCESS_KEY"`).
//! - Callers invoke [`resolve_secrets`] once at startup and pass the result
//!   into constructors; `std::env::var` is not called anywhere else.
//! - `Debug` on [`ResolvedSecrets`] redacts values.
//! - Error messages reference the env var **NAME**, never the value.

use anyhow::{bail, Result};
use serde_json::Value;

pub const DEFAULT_ACCESS_KEY_ENV: &str = "IMON_API_ACCESS_KEY";

/// Secrets resolved from the environment for one process.
#[derive(Clone)]
pub struct ResolvedSecrets {
    /// Shared company access key for the inventory API.
    pub api_access_key: String,
    /// Name of the env var the key was read from (safe to print).
    pub api_access_key_var: String,
}

impl std::fmt::Debug for ResolvedSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedSecrets")
            .field("api_access_key", &"<REDACTED>")
            .field("api_access_key_var", &self.api_access_key_var)
            .finish()
    }
}

/// Read a non-empty string value at `pointer`.
fn read_str_at(config: &Value, pointer: &str) -> Option<String> {
    let s = config.pointer(pointer)?.as_str()?;
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Resolve a named environment variable; blank counts as unset.
fn resolve_env(var_name: &str) -> Option<String> {
    match std::env::var(var_name) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

/// Name of the env var holding the API access key.
pub fn access_key_env_name(config_json: &Value) -> String {
    read_str_at(config_json, "/api/keys_env/access_key")
        .unwrap_or_else(|| DEFAULT_ACCESS_KEY_ENV.to_string())
}

/// Resolve every secret the monitor needs.
///
/// # Errors
/// `SECRETS_MISSING` naming the env var when the access key is unset or blank.
pub fn resolve_secrets(config_json: &Value) -> Result<ResolvedSecrets> {
    let var = access_key_env_name(config_json);
    let Some(api_access_key) = resolve_env(&var) else {
        bail!(
            "SECRETS_MISSING: required env var '{}' (api access key) is not set or empty",
            var
        );
    };
    Ok(ResolvedSecrets {
        api_access_key,
        api_access_key_var: var,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_name_defaults_when_absent() {
        let cfg = serde_json::json!({});
        assert_eq!(access_key_env_name(&cfg), DEFAULT_ACCESS_KEY_ENV);
    }

    #[test]
    fn debug_redacts_value() {
        let s = ResolvedSecrets {
            api_access_key: "super-secret-value".to_string(),
            api_access_key_var: "X".to_string(),
        };
        let dbg = format!("{s:?}");
        assert!(!dbg.contains("super-secret-value"));
        assert!(dbg.contains("<REDACTED>"));
    }
}
