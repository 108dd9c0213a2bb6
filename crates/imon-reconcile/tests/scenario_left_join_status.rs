use imon_reconcile::*;
use imon_schemas::{MinimumStockRecord, RemoteStockRecord, StockStatus};

fn minimum(key: &str, qty: f64) -> MinimumStockRecord {
    MinimumStockRecord::new(key, format!("item {key}"), qty)
}

fn remote(key: &str, qty: f64) -> RemoteStockRecord {
    RemoteStockRecord::new(key, format!("remote {key}"), qty)
}

#[test]
fn scenario_boundaries_at_minimum_100() {
    let mins = vec![
        minimum("A", 100.0),
        minimum("B", 100.0),
        minimum("C", 100.0),
        minimum("D", 100.0),
    ];
    let remote = vec![
        remote("D", 121.0),
        remote("C", 120.0),
        remote("B", 100.0),
        remote("A", 99.0),
    ];

    let rows = reconcile(&mins, &remote);
    let statuses: Vec<StockStatus> = rows.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![
            StockStatus::Critical,
            StockStatus::Low,
            StockStatus::Low,
            StockStatus::Ok
        ]
    );
    assert_eq!(rows[0].delta, -1.0);
    assert_eq!(rows[3].delta, 21.0);
}

#[test]
fn scenario_unmatched_key_is_not_found_with_zero_stock() {
    let rows = reconcile(&[minimum("X-404", 5.0)], &[remote("A", 7.0)]);
    assert_eq!(rows.len(), 1);
    let r = &rows[0];
    assert!(!r.found);
    assert_eq!(r.current_quantity, 0.0);
    assert_eq!(r.delta, -5.0);
    assert_eq!(r.status, StockStatus::NotFound);
}

#[test]
fn scenario_output_length_and_order_follow_the_minimum_list() {
    let mins: Vec<MinimumStockRecord> = ["Z", "M", "A", "Q", "B"]
        .iter()
        .map(|k| minimum(k, 10.0))
        .collect();
    // Catalog-only products ("EXTRA") must not leak into the output.
    let remote = vec![remote("A", 1.0), remote("EXTRA", 1.0), remote("Z", 50.0)];

    let rows = reconcile(&mins, &remote);
    assert_eq!(rows.len(), mins.len());
    let keys: Vec<&str> = rows.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["Z", "M", "A", "Q", "B"]);

    let s = summarize(&rows);
    assert_eq!(s.total, 5);
    assert_eq!(s.ok, 1);
    assert_eq!(s.critical, 1);
    assert_eq!(s.not_found, 3);
}

#[test]
fn scenario_shortage_list_with_search() {
    let mins = vec![
        MinimumStockRecord::new("CAC-1", "Cacao", 100.0),
        MinimumStockRecord::new("CAC-2", "Cacao amargo", 100.0),
        MinimumStockRecord::new("AZU-1", "Azúcar", 100.0),
    ];
    let remote = vec![
        remote("CAC-1", 50.0),
        remote("CAC-2", 500.0),
        remote("AZU-1", 110.0),
    ];
    let rows = reconcile(&mins, &remote);

    let shortage = filter_rows(&rows, &RowFilter::default());
    assert_eq!(shortage.len(), 2);

    let cacao = filter_rows(&rows, &RowFilter::default().with_search("cacao"));
    assert_eq!(cacao.len(), 1);
    assert_eq!(cacao[0].key, "CAC-1");
}
