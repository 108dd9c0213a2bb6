//! scenario_check_pipeline
//!
//! End-to-end session flow against a scripted API and an in-memory store:
//! upload, check, catalog resolution order, forced refresh, failure rules.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use imon_catalog::{AuthError, AuthToken, CatalogApi, FetchError};
use imon_runtime::*;
use imon_schemas::table::{remote_stock_to_rows, TableRow};
use imon_schemas::{RemoteStockRecord, StockStatus};
use imon_store::{
    DocumentStore, MemoryDocumentStore, SharedCache, StoreError, StoredDocument, CATALOG_NAMESPACE,
};
use imon_upload::{HeaderAliases, LogicalColumn};
use serde_json::{json, Value};

struct ScriptedApi {
    products: Mutex<Vec<Value>>,
    fail_with: Mutex<Option<FetchError>>,
    list_calls: AtomicUsize,
}

impl ScriptedApi {
    fn new(products: Vec<Value>) -> Self {
        Self {
            products: Mutex::new(products),
            fail_with: Mutex::new(None),
            list_calls: AtomicUsize::new(0),
        }
    }

    fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn set_products(&self, products: Vec<Value>) {
        *self.products.lock().unwrap() = products;
    }

    fn fail_next(&self, e: FetchError) {
        *self.fail_with.lock().unwrap() = Some(e);
    }
}

#[async_trait::async_trait]
impl CatalogApi for ScriptedApi {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn authenticate(&self, principal: &str, secret: &str) -> Result<AuthToken, AuthError> {
        if secret == "good-secret" {
            Ok(AuthToken::new(format!("token-for-{principal}")))
        } else {
            Err(AuthError::Rejected {
                status: 401,
                message: "invalid credentials".into(),
            })
        }
    }

    async fn list_products(
        &self,
        _token: &AuthToken,
        page: u32,
        page_size: usize,
    ) -> Result<Value, FetchError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(e) = self.fail_with.lock().unwrap().take() {
            return Err(e);
        }
        let all = self.products.lock().unwrap().clone();
        let start = (page as usize - 1) * page_size;
        let items: Vec<Value> = all.into_iter().skip(start).take(page_size).collect();
        Ok(json!({ "results": items }))
    }
}

struct OfflineStore;

impl DocumentStore for OfflineStore {
    fn write(&self, _: &str, _: &StoredDocument) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("store offline".into()))
    }

    fn read(&self, _: &str) -> Result<Option<StoredDocument>, StoreError> {
        Err(StoreError::Unavailable("store offline".into()))
    }
}

fn sheet(lines: &[&[&str]]) -> Vec<TableRow> {
    lines
        .iter()
        .map(|l| l.iter().map(|c| c.to_string()).collect())
        .collect()
}

fn standard_sheet() -> Vec<TableRow> {
    sheet(&[
        &["Referencia", "Nombre", "Inventario Mínimo"],
        &["A", "Cacao", "100"],
        &["B", "Sal", "100"],
        &["C", "Azúcar", "100"],
        &["D", "Vainilla", "100"],
    ])
}

fn catalog() -> Vec<Value> {
    vec![
        json!({"code": "A", "name": "Cacao", "available_quantity": 99}),
        json!({"code": "B", "name": "Sal", "stock": 120}),
        json!({"code": "C", "name": "Azúcar", "warehouses": [{"quantity": 100}, {"quantity": 21}]}),
        json!({"code": "EXTRA", "name": "Not tracked", "stock": 5}),
        json!({"name": "no code, dropped"}),
    ]
}

async fn session(api: &ScriptedApi) -> SessionContext {
    login(api, "ana@example.com", "good-secret")
        .await
        .unwrap()
        .with_page_size(2)
}

#[tokio::test]
async fn bad_credentials_are_fatal_to_login() {
    let api = ScriptedApi::new(catalog());
    let err = login(&api, "ana@example.com", "nope").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "authentication rejected: 401 - invalid credentials"
    );
}

#[tokio::test]
async fn check_without_a_list_is_refused() {
    let api = ScriptedApi::new(catalog());
    let cache = SharedCache::new(Arc::new(MemoryDocumentStore::new()));
    let mut ctx = session(&api).await;

    let err = run_check(&mut ctx, &api, &cache).await.unwrap_err();
    assert!(matches!(err, PipelineError::NoMinimumStockList { .. }));
    assert_eq!(api.list_calls(), 0);
}

#[tokio::test]
async fn upload_then_check_fetches_and_classifies() {
    let api = ScriptedApi::new(catalog());
    let cache = SharedCache::new(Arc::new(MemoryDocumentStore::new()));
    let mut ctx = session(&api).await;

    let up = upload_minimum_stock(&mut ctx, &cache, &standard_sheet(), &HeaderAliases::standard())
        .unwrap();
    assert_eq!(up.records, 4);
    assert!(up.warning.is_none());

    let out = run_check(&mut ctx, &api, &cache).await.unwrap();

    // 5 raw products at page size 2: pages of 2, 2, 1.
    assert_eq!(api.list_calls(), 3);
    match &out.catalog_source {
        CatalogSource::Fetched {
            raw_total,
            pages,
            raw_sample,
        } => {
            assert_eq!(*raw_total, 5);
            assert_eq!(*pages, 3);
            assert_eq!(raw_sample.as_ref().unwrap()["code"], "A");
        }
        other => panic!("expected a fetch, got {other:?}"),
    }
    assert_eq!(out.catalog_records, 4);

    let statuses: Vec<StockStatus> = out.rows.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![
            StockStatus::Critical,
            StockStatus::Low,
            StockStatus::Ok,
            StockStatus::NotFound
        ]
    );
    assert_eq!(out.summary.total, 4);
    assert!(out.warnings.is_empty());

    let snapshot = cache.load(CATALOG_NAMESPACE, None).unwrap();
    assert_eq!(snapshot.data_len(), 4);
    assert_eq!(
        snapshot.extra_metadata.get("total_products").map(String::as_str),
        Some("5")
    );
}

#[tokio::test]
async fn second_check_uses_session_memory() {
    let api = ScriptedApi::new(catalog());
    let cache = SharedCache::new(Arc::new(MemoryDocumentStore::new()));
    let mut ctx = session(&api).await;
    upload_minimum_stock(&mut ctx, &cache, &standard_sheet(), &HeaderAliases::standard()).unwrap();

    run_check(&mut ctx, &api, &cache).await.unwrap();
    let calls = api.list_calls();
    let out = run_check(&mut ctx, &api, &cache).await.unwrap();

    assert_eq!(api.list_calls(), calls);
    assert_eq!(out.catalog_source, CatalogSource::Session);
}

#[tokio::test]
async fn new_session_reuses_fresh_snapshot_and_stored_list() {
    let api = ScriptedApi::new(catalog());
    let cache = SharedCache::new(Arc::new(MemoryDocumentStore::new()));

    let mut first = session(&api).await;
    upload_minimum_stock(&mut first, &cache, &standard_sheet(), &HeaderAliases::standard())
        .unwrap();
    run_check(&mut first, &api, &cache).await.unwrap();
    let calls = api.list_calls();

    // Same user, new session: list comes from the store, catalog from the snapshot.
    let mut second = session(&api).await;
    let out = run_check(&mut second, &api, &cache).await.unwrap();

    assert_eq!(api.list_calls(), calls);
    assert!(matches!(
        out.catalog_source,
        CatalogSource::Cached {
            total_products: Some(5),
            ..
        }
    ));
    assert_eq!(out.rows.len(), 4);
    assert_eq!(out.rows[0].status, StockStatus::Critical);
}

#[tokio::test]
async fn stale_snapshot_triggers_a_fetch() {
    let api = ScriptedApi::new(catalog());
    let cache = SharedCache::new(Arc::new(MemoryDocumentStore::new()));

    let old = vec![RemoteStockRecord::new("A", "Cacao", 1000.0)];
    cache
        .save_at(
            CATALOG_NAMESPACE,
            &remote_stock_to_rows(&old),
            &[],
            Utc::now() - Duration::hours(25),
        )
        .unwrap();

    let mut ctx = session(&api).await;
    upload_minimum_stock(&mut ctx, &cache, &standard_sheet(), &HeaderAliases::standard()).unwrap();
    let out = run_check(&mut ctx, &api, &cache).await.unwrap();

    assert!(matches!(out.catalog_source, CatalogSource::Fetched { .. }));
    assert_eq!(out.rows[0].current_quantity, 99.0);
}

#[tokio::test]
async fn force_refresh_bypasses_memory_once() {
    let api = ScriptedApi::new(catalog());
    let cache = SharedCache::new(Arc::new(MemoryDocumentStore::new()));
    let mut ctx = session(&api).await;
    upload_minimum_stock(&mut ctx, &cache, &standard_sheet(), &HeaderAliases::standard()).unwrap();
    run_check(&mut ctx, &api, &cache).await.unwrap();

    api.set_products(vec![json!({"code": "A", "name": "Cacao", "stock": 500})]);
    ctx.request_refresh();
    let out = run_check(&mut ctx, &api, &cache).await.unwrap();

    assert!(matches!(out.catalog_source, CatalogSource::Fetched { raw_total: 1, .. }));
    assert_eq!(out.rows[0].status, StockStatus::Ok);
    assert_eq!(out.rows[1].status, StockStatus::NotFound);
    assert!(!ctx.force_refresh);

    let calls = api.list_calls();
    let out = run_check(&mut ctx, &api, &cache).await.unwrap();
    assert_eq!(out.catalog_source, CatalogSource::Session);
    assert_eq!(api.list_calls(), calls);
}

#[tokio::test]
async fn fetch_error_aborts_and_keeps_refresh_pending() {
    let api = ScriptedApi::new(catalog());
    let cache = SharedCache::new(Arc::new(MemoryDocumentStore::new()));
    let mut ctx = session(&api).await;
    upload_minimum_stock(&mut ctx, &cache, &standard_sheet(), &HeaderAliases::standard()).unwrap();

    ctx.request_refresh();
    api.fail_next(FetchError::Http {
        status: 500,
        message: "upstream down".into(),
    });
    let err = run_check(&mut ctx, &api, &cache).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "error fetching products: 500 - upstream down"
    );
    assert!(ctx.force_refresh);
    assert!(ctx.catalog().is_none());
    assert!(cache.load(CATALOG_NAMESPACE, None).is_none());
}

#[tokio::test]
async fn offline_store_still_completes_with_warnings() {
    let api = ScriptedApi::new(catalog());
    let cache = SharedCache::new(Arc::new(OfflineStore));
    let mut ctx = session(&api).await;

    let up = upload_minimum_stock(&mut ctx, &cache, &standard_sheet(), &HeaderAliases::standard())
        .unwrap();
    assert!(up.warning.is_some());

    let out = run_check(&mut ctx, &api, &cache).await.unwrap();
    assert_eq!(out.rows.len(), 4);
    assert_eq!(out.warnings.len(), 1);
    assert!(out.warnings[0].message.contains("store offline"));
}

#[tokio::test]
async fn rejected_upload_leaves_previous_list_in_place() {
    let api = ScriptedApi::new(catalog());
    let cache = SharedCache::new(Arc::new(MemoryDocumentStore::new()));
    let mut ctx = session(&api).await;
    upload_minimum_stock(&mut ctx, &cache, &standard_sheet(), &HeaderAliases::standard()).unwrap();

    let bad = sheet(&[&["Referencia", "Producto"], &["X", "Otro"]]);
    match upload_minimum_stock(&mut ctx, &cache, &bad, &HeaderAliases::standard()) {
        Err(PipelineError::MissingColumns(e)) => {
            assert_eq!(e.missing, vec![LogicalColumn::MinimumQuantity]);
        }
        other => panic!("expected MissingColumns, got {other:?}"),
    }
    assert_eq!(ctx.minimum_stock().unwrap().len(), 4);
}

#[tokio::test]
async fn stored_list_without_rows_counts_as_absent() {
    let api = ScriptedApi::new(catalog());
    let cache = SharedCache::new(Arc::new(MemoryDocumentStore::new()));
    let mut ctx = session(&api).await;

    let header_only = sheet(&[&["Referencia", "Nombre", "Inventario Mínimo"]]);
    upload_minimum_stock(&mut ctx, &cache, &header_only, &HeaderAliases::standard()).unwrap();

    let mut fresh = session(&api).await;
    assert!(load_minimum_stock(&mut fresh, &cache).is_none());
}
