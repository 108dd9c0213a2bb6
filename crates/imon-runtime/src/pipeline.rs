use chrono::{DateTime, Utc};
use imon_catalog::{fetch_all, normalize_remote, CatalogApi, RawRecord};
use imon_reconcile::{reconcile, summarize, StatusSummary};
use imon_schemas::table::{minimum_stock_to_rows, remote_stock_from_rows, remote_stock_to_rows, TableRow};
use imon_schemas::{MinimumStockRecord, ReconciledRow, RemoteStockRecord};
use imon_store::{CacheUnavailable, SharedCache, TOTAL_PRODUCTS_KEY};
use imon_upload::{normalize_minimum_stock, HeaderAliases};
use tracing::{info, warn};

use crate::{PipelineError, SessionContext};

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    pub records: usize,
    pub skipped_blank_keys: usize,
    pub duplicate_keys: Vec<String>,
    /// Set when the list is in the session but could not be persisted.
    pub warning: Option<CacheUnavailable>,
}

/// Normalize an uploaded sheet and make it the session's list.
///
/// A sheet that fails the column contract is rejected wholesale and leaves
/// the session and the store untouched.
pub fn upload_minimum_stock(
    ctx: &mut SessionContext,
    cache: &SharedCache,
    rows: &[TableRow],
    aliases: &HeaderAliases,
) -> Result<UploadOutcome, PipelineError> {
    let upload = normalize_minimum_stock(rows, aliases)?;

    let warning = cache
        .save(&ctx.minimum_stock_ns, &minimum_stock_to_rows(&upload.records), &[])
        .err();

    info!(
        user = %ctx.user,
        records = upload.records.len(),
        skipped = upload.skipped_blank_keys,
        duplicates = upload.duplicate_keys.len(),
        "minimum-stock list uploaded"
    );

    let outcome = UploadOutcome {
        records: upload.records.len(),
        skipped_blank_keys: upload.skipped_blank_keys,
        duplicate_keys: upload.duplicate_keys,
        warning,
    };
    ctx.minimum_stock = Some(upload.records);
    Ok(outcome)
}

/// The session's list, falling back to the user's stored list.
///
/// Stored lists never expire. A list with no data rows counts as absent.
pub fn load_minimum_stock<'a>(
    ctx: &'a mut SessionContext,
    cache: &SharedCache,
) -> Option<&'a [MinimumStockRecord]> {
    if ctx.minimum_stock.is_none() {
        let entry = cache.load(&ctx.minimum_stock_ns, None)?;
        let upload = match normalize_minimum_stock(&entry.rows, &HeaderAliases::standard()) {
            Ok(u) => u,
            Err(e) => {
                warn!(namespace = %ctx.minimum_stock_ns, error = %e, "stored list unreadable");
                return None;
            }
        };
        if upload.records.is_empty() {
            return None;
        }
        ctx.minimum_stock = Some(upload.records);
    }
    ctx.minimum_stock.as_deref().filter(|r| !r.is_empty())
}

// ---------------------------------------------------------------------------
// Check
// ---------------------------------------------------------------------------

/// Where the catalog used by a check came from.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogSource {
    /// Already in this session.
    Session,
    /// Shared snapshot. Raw records are not persisted, so none are available.
    Cached {
        last_updated: DateTime<Utc>,
        total_products: Option<usize>,
    },
    /// Full fetch from the remote API.
    Fetched {
        raw_total: usize,
        pages: u32,
        /// First raw record, for diagnosing normalization drops.
        raw_sample: Option<RawRecord>,
    },
}

#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub rows: Vec<ReconciledRow>,
    pub summary: StatusSummary,
    pub catalog_source: CatalogSource,
    /// Normalized catalog size.
    pub catalog_records: usize,
    pub warnings: Vec<CacheUnavailable>,
}

fn cached_catalog(ctx: &SessionContext, cache: &SharedCache) -> Option<(Vec<RemoteStockRecord>, CatalogSource)> {
    let entry = cache.load(&ctx.catalog_ns, Some(ctx.catalog_max_age))?;
    let records = remote_stock_from_rows(&entry.rows)?;
    if records.is_empty() {
        return None;
    }
    let total_products = entry
        .extra_metadata
        .get(TOTAL_PRODUCTS_KEY)
        .and_then(|v| v.parse().ok());
    Some((
        records,
        CatalogSource::Cached {
            last_updated: entry.last_updated,
            total_products,
        },
    ))
}

async fn fetched_catalog(
    ctx: &SessionContext,
    api: &dyn CatalogApi,
    cache: &SharedCache,
    warnings: &mut Vec<CacheUnavailable>,
) -> Result<(Vec<RemoteStockRecord>, CatalogSource), PipelineError> {
    let fetched = fetch_all(api, &ctx.token, ctx.page_size).await?;
    let raw_total = fetched.records.len();
    let records = normalize_remote(&fetched.records);

    info!(
        source = api.name(),
        pages = fetched.pages_requested,
        raw = raw_total,
        normalized = records.len(),
        "catalog fetched"
    );

    // An empty catalog is never cached.
    if !records.is_empty() {
        let meta = [(TOTAL_PRODUCTS_KEY, raw_total.to_string())];
        if let Err(e) = cache.save(&ctx.catalog_ns, &remote_stock_to_rows(&records), &meta) {
            warnings.push(e);
        }
    }

    let source = CatalogSource::Fetched {
        raw_total,
        pages: fetched.pages_requested,
        raw_sample: fetched.records.into_iter().next(),
    };
    Ok((records, source))
}

/// Reconcile the user's list against the catalog.
///
/// Catalog resolution order, unless `force_refresh` is set: session memory,
/// then the shared snapshot if fresher than `catalog_max_age`, then a full
/// fetch. With `force_refresh` it always fetches, and the flag is cleared
/// once a catalog is in hand. A failed fetch leaves the flag set.
pub async fn run_check(
    ctx: &mut SessionContext,
    api: &dyn CatalogApi,
    cache: &SharedCache,
) -> Result<CheckOutcome, PipelineError> {
    if load_minimum_stock(ctx, cache).is_none() {
        return Err(PipelineError::NoMinimumStockList {
            user: ctx.user.clone(),
        });
    }

    let mut warnings = Vec::new();

    let session_hit = if ctx.force_refresh {
        None
    } else {
        ctx.catalog.take().map(|c| (c, CatalogSource::Session))
    };
    let cache_hit = match session_hit {
        Some(hit) => Some(hit),
        None if !ctx.force_refresh => cached_catalog(ctx, cache),
        None => None,
    };
    let (catalog, catalog_source) = match cache_hit {
        Some(hit) => hit,
        None => fetched_catalog(ctx, api, cache, &mut warnings).await?,
    };
    ctx.force_refresh = false;

    let minimum = ctx.minimum_stock.as_deref().unwrap_or(&[]);
    let rows = reconcile(minimum, &catalog);
    let summary = summarize(&rows);

    info!(
        user = %ctx.user,
        total = summary.total,
        critical = summary.critical,
        low = summary.low,
        not_found = summary.not_found,
        "check complete"
    );

    let catalog_records = catalog.len();
    ctx.catalog = Some(catalog);

    Ok(CheckOutcome {
        rows,
        summary,
        catalog_source,
        catalog_records,
        warnings,
    })
}
