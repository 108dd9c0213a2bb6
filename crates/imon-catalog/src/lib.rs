//! imon-catalog
//!
//! Remote product catalog: the API boundary, its HTTP implementation, full
//! paginated retrieval and normalization of raw product records.
//!
//! This crate does **not** cache anything; callers decide whether a fetch is
//! needed and persist the normalized result through `imon-store`.

pub mod api;
pub mod fetcher;
pub mod http;
pub mod normalizer;

pub use api::{AuthError, AuthToken, CatalogApi, FetchError, RawRecord};
pub use fetcher::{fetch_all, page_items, FetchedCatalog, MAX_PAGES};
pub use http::HttpCatalogApi;
pub use normalizer::{current_quantity, normalize_remote};
