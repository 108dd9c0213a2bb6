//! imon-report
//!
//! Export artifacts for a reconciled table:
//!
//! | file            | contents                                   |
//! |-----------------|--------------------------------------------|
//! | `shortage.csv`  | the listed rows, machine-readable          |
//! | `shortage.html` | printable document with per-status colours |
//! | `manifest.json` | run id, user, config hash, summary counts  |
//!
//! Everything lands in `exports/<run_id>/`.

mod artifacts;
mod html;
mod table;

pub use artifacts::{
    write_report, ExportArgs, ExportResult, ReportFiles, ReportManifest, REPORT_SCHEMA_VERSION,
};
pub use html::{escape_html, render_html, DEFAULT_TITLE};
pub use table::{render_csv, CSV_HEADER};
