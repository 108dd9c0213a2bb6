use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use imon_reconcile::{filter_rows, RowFilter};
use imon_report::{write_report, ExportArgs};
use imon_runtime::{run_check, upload_minimum_stock, CatalogSource, CheckOutcome, SessionContext};
use imon_schemas::{format_delta, format_quantity};
use imon_schemas::table::TableRow;
use imon_store::SharedCache;
use imon_upload::{read_csv_file, HeaderAliases};
use uuid::Uuid;

use super::{http_api, load_config, open_cache, open_session, parse_statuses};

pub struct CheckArgs {
    pub config_paths: Vec<String>,
    pub user: String,
    pub file: Option<PathBuf>,
    pub refresh: bool,
    pub statuses: Vec<String>,
    pub all: bool,
    pub search: Option<String>,
    pub export: bool,
    pub export_dir: Option<PathBuf>,
    pub title: String,
    pub raw_sample: bool,
}

fn upload_rows(ctx: &mut SessionContext, cache: &SharedCache, rows: &[TableRow]) -> Result<()> {
    let out = upload_minimum_stock(ctx, cache, rows, &HeaderAliases::standard())?;
    println!(
        "uploaded=true records={} skipped_blank_keys={} duplicate_keys={}",
        out.records,
        out.skipped_blank_keys,
        out.duplicate_keys.len()
    );
    if let Some(w) = out.warning {
        println!("warning={w}");
    }
    Ok(())
}

/// `imon upload`: authenticate, then store the user's list.
pub async fn upload(config_paths: &[String], user: &str, file: &Path) -> Result<()> {
    // Read before login so a bad sheet fails without touching the network.
    let rows = read_csv_file(file)?;
    imon_upload::normalize_minimum_stock(&rows, &HeaderAliases::standard())
        .map_err(imon_upload::UploadError::from)?;

    let (loaded, cfg) = load_config(config_paths)?;
    let api = http_api(&cfg);
    let cache = open_cache(&cfg);
    let mut ctx = open_session(&loaded, &cfg, &api, user).await?;
    upload_rows(&mut ctx, &cache, &rows)?;
    println!("namespace={}", ctx.minimum_stock_ns);
    Ok(())
}

fn print_source(outcome: &CheckOutcome, raw_sample: bool) -> Result<()> {
    match &outcome.catalog_source {
        CatalogSource::Session => println!("catalog_source=session"),
        CatalogSource::Cached {
            last_updated,
            total_products,
        } => {
            println!(
                "catalog_source=cache last_updated={} total_products={}",
                last_updated.to_rfc3339(),
                total_products.map(|n| n.to_string()).unwrap_or_else(|| "unknown".into())
            );
            if raw_sample {
                println!("raw_sample=unavailable reason=catalog_loaded_from_cache");
            }
        }
        CatalogSource::Fetched {
            raw_total,
            pages,
            raw_sample: sample,
        } => {
            println!("catalog_source=api raw_total={raw_total} pages={pages}");
            if raw_sample {
                match sample {
                    Some(v) => println!(
                        "raw_sample={}",
                        serde_json::to_string(v).context("serialize raw sample failed")?
                    ),
                    None => println!("raw_sample=unavailable reason=empty_catalog"),
                }
            }
        }
    }
    println!("catalog_records={}", outcome.catalog_records);
    Ok(())
}

/// `imon check`: optional upload, reconcile, print, optional export.
pub async fn check(args: CheckArgs) -> Result<()> {
    let mut filter = if args.all {
        RowFilter::all()
    } else {
        let statuses = parse_statuses(&args.statuses)?;
        let mut f = RowFilter::default();
        if !statuses.is_empty() {
            f.statuses = statuses.into_iter().collect();
        }
        f
    };
    if let Some(q) = &args.search {
        filter = filter.with_search(q.clone());
    }

    let (loaded, cfg) = load_config(&args.config_paths)?;
    let api = http_api(&cfg);
    let cache = open_cache(&cfg);
    let mut ctx = open_session(&loaded, &cfg, &api, &args.user).await?;

    if let Some(file) = &args.file {
        let rows = read_csv_file(file)?;
        upload_rows(&mut ctx, &cache, &rows)?;
    }
    if args.refresh {
        ctx.request_refresh();
    }

    let outcome = run_check(&mut ctx, &api, &cache).await?;
    for w in &outcome.warnings {
        println!("warning={w}");
    }

    print_source(&outcome, args.raw_sample)?;
    let s = outcome.summary;
    println!(
        "summary total={} critical={} low={} ok={} not_found={}",
        s.total, s.critical, s.low, s.ok, s.not_found
    );

    let listed = filter_rows(&outcome.rows, &filter);
    for r in &listed {
        println!(
            "row key={} status={} minimum={} current={} delta={} name={}",
            r.key,
            r.status.as_str(),
            format_quantity(r.minimum_quantity),
            format_quantity(r.current_quantity),
            format_delta(r.delta),
            r.display_name
        );
    }
    println!("listed={}", listed.len());

    if args.export {
        let exports_root = args.export_dir.unwrap_or_else(|| cfg.exports_dir.clone());
        let statuses: Vec<_> = filter.statuses.iter().copied().collect();
        let run_id = Uuid::new_v4();
        let out = write_report(
            ExportArgs {
                exports_root: &exports_root,
                run_id,
                user: &ctx.user,
                config_hash: &loaded.config_hash,
                title: &args.title,
                statuses: &statuses,
                search: filter.search.as_deref(),
                summary: outcome.summary,
                generated_at: Utc::now(),
            },
            &listed,
        )?;
        println!("run_id={run_id}");
        println!("export_dir={}", out.run_dir.display());
        println!("csv={}", out.csv_path.display());
        println!("html={}", out.html_path.display());
        println!("manifest={}", out.manifest_path.display());
    }

    Ok(())
}
