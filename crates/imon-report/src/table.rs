use anyhow::{anyhow, Context, Result};
use imon_schemas::{format_delta, format_quantity, ReconciledRow};

pub const CSV_HEADER: [&str; 7] = [
    "key",
    "display_name",
    "minimum_quantity",
    "current_quantity",
    "delta",
    "found",
    "status",
];

/// Render rows as CSV, header first. `delta` keeps its sign.
pub fn render_csv(rows: &[&ReconciledRow]) -> Result<String> {
    let mut w = csv::Writer::from_writer(Vec::new());
    w.write_record(CSV_HEADER).context("write csv header failed")?;

    for r in rows {
        let min = format_quantity(r.minimum_quantity);
        let cur = format_quantity(r.current_quantity);
        let delta = format_delta(r.delta);
        let found = if r.found { "true" } else { "false" };
        w.write_record([
            r.key.as_str(),
            r.display_name.as_str(),
            min.as_str(),
            cur.as_str(),
            delta.as_str(),
            found,
            r.status.as_str(),
        ])
        .with_context(|| format!("write csv row failed: {}", r.key))?;
    }

    let bytes = w
        .into_inner()
        .map_err(|e| anyhow!("flush csv failed: {}", e.error()))?;
    String::from_utf8(bytes).context("csv output is not utf-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use imon_schemas::StockStatus;

    #[test]
    fn csv_quotes_names_with_commas_and_keeps_negative_delta() {
        let row = ReconciledRow {
            key: "A-1".into(),
            display_name: "Sal, fina".into(),
            minimum_quantity: 100.0,
            current_quantity: 40.5,
            delta: -59.5,
            found: true,
            status: StockStatus::Critical,
        };
        let out = render_csv(&[&row]).unwrap();
        let mut lines = out.lines();
        assert_eq!(
            lines.next(),
            Some("key,display_name,minimum_quantity,current_quantity,delta,found,status")
        );
        assert_eq!(lines.next(), Some("A-1,\"Sal, fina\",100,40.5,-59.5,true,CRITICAL"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn csv_delta_has_no_float_noise() {
        let row = ReconciledRow {
            key: "B".into(),
            display_name: "Salt".into(),
            minimum_quantity: 1.0,
            current_quantity: 1.1,
            delta: 1.1 - 1.0,
            found: true,
            status: StockStatus::Low,
        };
        let out = render_csv(&[&row]).unwrap();
        assert!(out.contains("B,Salt,1,1.1,0.1,true,LOW"), "{out}");
    }
}
