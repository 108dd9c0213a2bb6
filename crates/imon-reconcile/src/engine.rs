use std::collections::HashMap;

use imon_schemas::{MinimumStockRecord, ReconciledRow, RemoteStockRecord};

use crate::rules::classify;

fn index_remote(remote: &[RemoteStockRecord]) -> HashMap<&str, &RemoteStockRecord> {
    let mut index = HashMap::with_capacity(remote.len());
    for r in remote {
        // First occurrence wins on duplicate keys.
        index.entry(r.key.as_str()).or_insert(r);
    }
    index
}

/// Left-outer join of `minimum` onto `remote` by key.
///
/// One output row per minimum-stock record, in input order. Unmatched rows
/// carry `current_quantity = 0` and `NotFound`.
pub fn reconcile(minimum: &[MinimumStockRecord], remote: &[RemoteStockRecord]) -> Vec<ReconciledRow> {
    let index = index_remote(remote);

    minimum
        .iter()
        .map(|m| {
            let matched = index.get(m.key.as_str());
            let found = matched.is_some();
            let current_quantity = matched.map(|r| r.current_quantity).unwrap_or(0.0);

            ReconciledRow {
                key: m.key.clone(),
                display_name: m.display_name.clone(),
                minimum_quantity: m.minimum_quantity,
                current_quantity,
                delta: current_quantity - m.minimum_quantity,
                found,
                status: classify(found, m.minimum_quantity, current_quantity),
            }
        })
        .collect()
}
