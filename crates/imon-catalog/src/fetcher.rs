//! Full-catalog retrieval by page-number pagination.
//!
//! One pass either returns every record or fails; there is no retry and no
//! partial result. Retry policy belongs to the caller.

use serde_json::Value;
use tracing::debug;

use crate::api::{AuthToken, CatalogApi, FetchError, RawRecord};

/// Hard stop for APIs that ignore the `page` parameter and keep returning
/// full pages.
pub const MAX_PAGES: u32 = 10_000;

/// Object fields that may wrap the list of records, checked in order.
const LIST_FIELDS: &[&str] = &["results", "data", "items"];

/// Every raw record of the remote catalog, in remote order.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedCatalog {
    pub records: Vec<RawRecord>,
    /// Number of page requests issued, including the final short page.
    pub pages_requested: u32,
}

/// Extract the records of one page body.
///
/// Accepts a bare JSON list, or an object carrying the list under one of
/// [`LIST_FIELDS`]. Anything else is an empty page.
pub fn page_items(body: Value) -> Vec<RawRecord> {
    match body {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            for field in LIST_FIELDS {
                if let Some(Value::Array(items)) = map.remove(*field) {
                    return items;
                }
            }
            Vec::new()
        }
        _ => Vec::new(),
    }
}

/// Retrieve the whole catalog starting at page 1.
///
/// Stop rule: a page with fewer than `page_size` items (including an empty
/// page) is the last one. Any error on any page aborts the fetch.
pub async fn fetch_all<A>(
    api: &A,
    token: &AuthToken,
    page_size: usize,
) -> Result<FetchedCatalog, FetchError>
where
    A: CatalogApi + ?Sized,
{
    let page_size = page_size.max(1);
    let mut records: Vec<RawRecord> = Vec::new();
    let mut page: u32 = 1;

    loop {
        if page > MAX_PAGES {
            return Err(FetchError::TooManyPages(MAX_PAGES));
        }

        let body = api.list_products(token, page, page_size).await?;
        let items = page_items(body);
        let n = items.len();
        debug!(source = api.name(), page, items = n, "catalog page received");

        records.extend(items);

        if n < page_size {
            return Ok(FetchedCatalog {
                records,
                pages_requested: page,
            });
        }
        page += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_list_is_a_page() {
        let items = page_items(json!([{"code": "A"}, {"code": "B"}]));
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn wrapped_results_is_a_page() {
        let items = page_items(json!({"pagination": {"page": 1}, "results": [{"code": "A"}]}));
        assert_eq!(items, vec![json!({"code": "A"})]);
    }

    #[test]
    fn unrecognised_shape_is_empty() {
        assert!(page_items(json!({"message": "nothing here"})).is_empty());
        assert!(page_items(json!("text")).is_empty());
        assert!(page_items(json!({"results": "not a list"})).is_empty());
    }
}
