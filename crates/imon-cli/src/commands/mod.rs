//! Command handler modules for imon-cli.
//!
//! Shared wiring (config, store, API client, session) lives here.
//! Command-specific logic lives in the submodules.

pub mod cache;
pub mod check;

use std::sync::Arc;

use anyhow::{Context, Result};
use imon_catalog::HttpCatalogApi;
use imon_config::secrets::resolve_secrets;
use imon_config::{LoadedConfig, MonitorConfig};
use imon_runtime::{login, SessionContext};
use imon_schemas::StockStatus;
use imon_store::{FsDocumentStore, SharedCache};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Merge `--config` layers in order. No layers means built-in defaults.
pub fn load_config(paths: &[String]) -> Result<(LoadedConfig, MonitorConfig)> {
    let loaded = if paths.is_empty() {
        LoadedConfig::empty()?
    } else {
        let refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
        imon_config::load_layered_yaml(&refs)?
    };
    let monitor = loaded.monitor()?;
    Ok((loaded, monitor))
}

pub fn open_cache(cfg: &MonitorConfig) -> SharedCache {
    SharedCache::new(Arc::new(FsDocumentStore::new(cfg.cache.dir.clone())))
}

pub fn http_api(cfg: &MonitorConfig) -> HttpCatalogApi {
    HttpCatalogApi::new(
        cfg.api.base_url.clone(),
        cfg.api.partner_id.clone(),
        cfg.api.auth_timeout,
        cfg.api.fetch_timeout,
    )
}

/// Resolve the access key and authenticate `user`.
pub async fn open_session(
    loaded: &LoadedConfig,
    cfg: &MonitorConfig,
    api: &HttpCatalogApi,
    user: &str,
) -> Result<SessionContext> {
    let secrets = resolve_secrets(&loaded.config_json)?;
    let ctx = login(api, user, &secrets.api_access_key)
        .await
        .with_context(|| format!("login failed for '{user}'"))?;
    Ok(ctx
        .with_page_size(cfg.api.page_size)
        .with_catalog_max_age(cfg.cache.catalog_max_age()))
}

/// Parse `--status` values. Empty means the default shortage list.
pub fn parse_statuses(raw: &[String]) -> Result<Vec<StockStatus>> {
    let mut out = Vec::new();
    for s in raw {
        let Some(st) = StockStatus::parse(s) else {
            anyhow::bail!(
                "invalid --status '{}'. expected one of: critical | low | ok | not_found",
                s
            );
        };
        if !out.contains(&st) {
            out.push(st);
        }
    }
    Ok(out)
}
