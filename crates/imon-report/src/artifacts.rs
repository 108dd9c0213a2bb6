use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use imon_reconcile::StatusSummary;
use imon_schemas::{ReconciledRow, StockStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{render_csv, render_html};

pub const REPORT_SCHEMA_VERSION: i32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportManifest {
    pub schema_version: i32,
    pub run_id: Uuid,
    pub user: String,
    pub config_hash: String,
    pub created_at_utc: DateTime<Utc>,
    /// Statuses included in the listing (`CRITICAL`, `LOW`, ...).
    pub statuses: Vec<String>,
    pub search: Option<String>,
    pub listed: usize,
    /// Counts over the whole reconciled table, not only the listed rows.
    pub summary: StatusSummary,
    pub files: ReportFiles,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportFiles {
    pub manifest_json: String,
    pub shortage_csv: String,
    pub shortage_html: String,
}

impl Default for ReportFiles {
    fn default() -> Self {
        Self {
            manifest_json: "manifest.json".to_string(),
            shortage_csv: "shortage.csv".to_string(),
            shortage_html: "shortage.html".to_string(),
        }
    }
}

pub struct ExportArgs<'a> {
    pub exports_root: &'a Path,
    pub run_id: Uuid,
    pub user: &'a str,
    pub config_hash: &'a str,
    pub title: &'a str,
    pub statuses: &'a [StockStatus],
    pub search: Option<&'a str>,
    pub summary: StatusSummary,
    pub generated_at: DateTime<Utc>,
}

pub struct ExportResult {
    pub run_dir: PathBuf,
    pub csv_path: PathBuf,
    pub html_path: PathBuf,
    pub manifest_path: PathBuf,
}

/// Write CSV, HTML and manifest for `rows` under `exports/<run_id>/`.
///
/// Re-running with the same run id overwrites the three files.
pub fn write_report(args: ExportArgs<'_>, rows: &[&ReconciledRow]) -> Result<ExportResult> {
    let run_dir = args.exports_root.join(args.run_id.to_string());
    fs::create_dir_all(&run_dir)
        .with_context(|| format!("create exports dir failed: {}", run_dir.display()))?;

    let files = ReportFiles::default();

    let csv_path = run_dir.join(&files.shortage_csv);
    fs::write(&csv_path, render_csv(rows)?)
        .with_context(|| format!("write csv failed: {}", csv_path.display()))?;

    let html_path = run_dir.join(&files.shortage_html);
    fs::write(&html_path, render_html(args.title, args.generated_at, rows))
        .with_context(|| format!("write html failed: {}", html_path.display()))?;

    let manifest = ReportManifest {
        schema_version: REPORT_SCHEMA_VERSION,
        run_id: args.run_id,
        user: args.user.to_string(),
        config_hash: args.config_hash.to_string(),
        created_at_utc: args.generated_at,
        statuses: args.statuses.iter().map(|s| s.as_str().to_string()).collect(),
        search: args.search.map(str::to_string),
        listed: rows.len(),
        summary: args.summary,
        files,
    };

    let manifest_path = run_dir.join(&manifest.files.manifest_json);
    let json = serde_json::to_string_pretty(&manifest).context("serialize manifest failed")?;
    fs::write(&manifest_path, format!("{json}\n"))
        .with_context(|| format!("write manifest failed: {}", manifest_path.display()))?;

    Ok(ExportResult {
        run_dir,
        csv_path,
        html_path,
        manifest_path,
    })
}
