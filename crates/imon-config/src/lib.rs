//! imon-config
//!
//! Layered YAML configuration for the inventory monitor.
//!
//! - Documents are merged in order: earlier docs are base, later docs override.
//! - The merged document is rendered to canonical JSON and hashed (SHA-256) so
//!   a run can report exactly which configuration it used.
//! - Literal secrets are refused. YAML stores env var NAMES only; values are
//!   resolved once by [`secrets::resolve_secrets`].
//!
//! [`MonitorConfig`] is the typed view every other crate consumes.

pub mod secrets;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Known secret-like prefixes. If any leaf string value in the effective
/// config starts with one of these, loading aborts with CONFIG_SECRET_DETECTED.
const SECRET_PREFIXES: &[&str] = &[
    "sk-",        // Stripe / OpenAI style
    "sk_live",    // Stripe live
    "sk_test",    // Stripe test
    "AKIA",       // AWS access key ID
    "-----BEGIN", // PEM private keys
    "ghp_",       // GitHub PAT
    "gho_",       // GitHub OAuth
    "glpat-",     // GitLab PAT
    "xoxb-",      // Slack bot token
    "xoxp-",      // Slack user token
];

pub const DEFAULT_API_BASE_URL: &str = "https://api.siigo.com";
pub const DEFAULT_PARTNER_ID: &str = "InventoryMonitor";
pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_CATALOG_MAX_AGE_HOURS: i64 = 24;
pub const DEFAULT_CACHE_DIR: &str = "./cache";
pub const DEFAULT_EXPORTS_DIR: &str = "./exports";

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
}

impl LoadedConfig {
    /// Configuration with no documents: every typed field takes its default.
    pub fn empty() -> Result<Self> {
        load_layered_yaml_from_strings(&[])
    }

    pub fn monitor(&self) -> Result<MonitorConfig> {
        MonitorConfig::from_config_json(&self.config_json)
    }
}

pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedConfig> {
    let mut docs: Vec<String> = Vec::new();
    for p in paths {
        let raw =
            fs::read_to_string(p).with_context(|| format!("failed to read yaml path: {p}"))?;
        docs.push(raw);
    }

    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let mut merged = serde_json::json!({});
    for raw in yaml_docs {
        let v_yaml: serde_yaml::Value = serde_yaml::from_str(raw).context("invalid yaml")?;
        // An empty document parses to null; treat it as "no overrides".
        if v_yaml.is_null() {
            continue;
        }
        let v_json = serde_json::to_value(v_yaml).context("yaml->json conversion failed")?;
        merged = deep_merge(merged, v_json);
    }

    enforce_no_secret_literals(&merged)?;

    let canonical_json = canonicalize_json(&merged)?;
    let config_hash = sha256_hex(canonical_json.as_bytes());
    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config_json: merged,
    })
}

// ---------------------------------------------------------------------------
// Typed view
// ---------------------------------------------------------------------------

/// Remote inventory API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// Sent as the `Partner-Id` header on every call.
    pub partner_id: String,
    pub page_size: usize,
    pub auth_timeout: Duration,
    pub fetch_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    pub dir: PathBuf,
    /// Freshness window for the shared catalog snapshot, in hours.
    pub catalog_max_age_hours: i64,
}

impl CacheConfig {
    /// Freshness window as a duration. Out-of-range hours saturate; values
    /// loaded through [`MonitorConfig::from_config_json`] are already checked.
    pub fn catalog_max_age(&self) -> chrono::Duration {
        chrono::Duration::try_hours(self.catalog_max_age_hours)
            .unwrap_or_else(chrono::Duration::max_value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    pub api: ApiConfig,
    pub cache: CacheConfig,
    pub exports_dir: PathBuf,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: DEFAULT_API_BASE_URL.to_string(),
                partner_id: DEFAULT_PARTNER_ID.to_string(),
                page_size: DEFAULT_PAGE_SIZE,
                auth_timeout: Duration::from_secs(DEFAULT_AUTH_TIMEOUT_SECS),
                fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            },
            cache: CacheConfig {
                dir: PathBuf::from(DEFAULT_CACHE_DIR),
                catalog_max_age_hours: DEFAULT_CATALOG_MAX_AGE_HOURS,
            },
            exports_dir: PathBuf::from(DEFAULT_EXPORTS_DIR),
        }
    }
}

impl MonitorConfig {
    /// Read the typed view out of a merged config document.
    ///
    /// Absent keys fall back to defaults; present keys of the wrong type or
    /// out of range are errors.
    pub fn from_config_json(v: &Value) -> Result<Self> {
        let mut cfg = MonitorConfig::default();

        if let Some(s) = read_string(v, "/api/base_url")? {
            cfg.api.base_url = s;
        }
        if let Some(s) = read_string(v, "/api/partner_id")? {
            cfg.api.partner_id = s;
        }
        if let Some(n) = read_u64(v, "/api/page_size")? {
            if n == 0 {
                bail!("CONFIG_INVALID /api/page_size must be > 0");
            }
            cfg.api.page_size = n as usize;
        }
        if let Some(n) = read_u64(v, "/api/auth_timeout_secs")? {
            cfg.api.auth_timeout = Duration::from_secs(n);
        }
        if let Some(n) = read_u64(v, "/api/fetch_timeout_secs")? {
            cfg.api.fetch_timeout = Duration::from_secs(n);
        }
        if let Some(s) = read_string(v, "/cache/dir")? {
            cfg.cache.dir = PathBuf::from(s);
        }
        if let Some(n) = read_u64(v, "/cache/catalog_max_age_hours")? {
            let hours = i64::try_from(n)
                .ok()
                .filter(|h| chrono::Duration::try_hours(*h).is_some());
            let Some(hours) = hours else {
                bail!("CONFIG_INVALID /cache/catalog_max_age_hours out of range");
            };
            cfg.cache.catalog_max_age_hours = hours;
        }
        if let Some(s) = read_string(v, "/exports/dir")? {
            cfg.exports_dir = PathBuf::from(s);
        }

        Ok(cfg)
    }
}

fn read_string(v: &Value, pointer: &str) -> Result<Option<String>> {
    match v.pointer(pointer) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(other) => bail!("CONFIG_INVALID {pointer} must be a string, got {other}"),
    }
}

fn read_u64(v: &Value, pointer: &str) -> Result<Option<u64>> {
    match v.pointer(pointer) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(Some)
            .with_context(|| format!("CONFIG_INVALID {pointer} must be a non-negative integer")),
        Some(other) => bail!("CONFIG_INVALID {pointer} must be an integer, got {other}"),
    }
}

// ---------------------------------------------------------------------------
// Merge / canonicalize / guard
// ---------------------------------------------------------------------------

fn deep_merge(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Object(mut a_map), Value::Object(b_map)) => {
            for (k, b_val) in b_map {
                let a_val = a_map.remove(&k).unwrap_or(Value::Null);
                a_map.insert(k, deep_merge(a_val, b_val));
            }
            Value::Object(a_map)
        }
        (_, b_other) => b_other,
    }
}

fn canonicalize_json(v: &Value) -> Result<String> {
    // serde_json's default Map is ordered by key, so serialization is stable
    // for the same merged document.
    let s = serde_json::to_string(v).context("canonical json serialize failed")?;
    Ok(s)
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let out = hasher.finalize();
    hex::encode(out)
}

fn enforce_no_secret_literals(v: &Value) -> Result<()> {
    let mut leaves = Vec::new();
    collect_leaf_pointers(v, "", &mut leaves);

    for ptr in leaves {
        if let Some(val) = v.pointer(&ptr) {
            if let Some(s) = val.as_str() {
                if looks_like_secret(s) {
                    bail!("CONFIG_SECRET_DETECTED leaf={} value=REDACTED", ptr);
                }
            }
        }
    }
    Ok(())
}

fn collect_leaf_pointers(v: &Value, prefix: &str, out: &mut Vec<String>) {
    match v {
        Value::Object(map) => {
            for (k, vv) in map.iter() {
                let next = format!("{}/{}", prefix, escape_pointer_token(k));
                collect_leaf_pointers(vv, &next, out);
            }
        }
        Value::Array(arr) => {
            for (i, vv) in arr.iter().enumerate() {
                let next = format!("{}/{}", prefix, i);
                collect_leaf_pointers(vv, &next, out);
            }
        }
        _ => {
            if !prefix.is_empty() {
                out.push(prefix.to_string());
            }
        }
    }
}

fn escape_pointer_token(s: &str) -> String {
    s.replace('~', "~0").replace('/', "~1")
}

fn looks_like_secret(s: &str) -> bool {
    let t = s.trim();
    if t.len() < 8 {
        return false;
    }
    SECRET_PREFIXES.iter().any(|p| t.starts_with(p))
}
