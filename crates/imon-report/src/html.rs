use chrono::{DateTime, Utc};
use imon_schemas::{format_delta, format_quantity, ReconciledRow, StockStatus};

pub const DEFAULT_TITLE: &str = "Shortage list";

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn row_style(status: StockStatus) -> &'static str {
    match status {
        StockStatus::Critical => " style=\"background-color: #ffcccc;\"",
        StockStatus::Low => " style=\"background-color: #fff3cd;\"",
        StockStatus::Ok | StockStatus::NotFound => "",
    }
}

const STYLE: &str = "\
body { font-family: Arial, sans-serif; margin: 20px; font-size: 12px; }
h1 { color: #1E88E5; text-align: center; margin-bottom: 5px; }
.generated { text-align: center; color: #666; margin-bottom: 20px; }
table { width: 100%; border-collapse: collapse; margin-top: 20px; }
th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }
th { background-color: #1E88E5; color: white; }
td.num { text-align: right; }
.footer { margin-top: 20px; text-align: center; color: #666; font-size: 10px; }
@media print { body { margin: 0; } }
";

/// Standalone printable document for `rows`.
pub fn render_html(title: &str, generated_at: DateTime<Utc>, rows: &[&ReconciledRow]) -> String {
    let title = escape_html(title);
    let mut body = String::new();
    for r in rows {
        body.push_str(&format!(
            "<tr{style}><td>{key}</td><td>{name}</td><td class=\"num\">{min}</td>\
             <td class=\"num\">{cur}</td><td class=\"num\">{delta}</td><td>{status}</td></tr>\n",
            style = row_style(r.status),
            key = escape_html(&r.key),
            name = escape_html(&r.display_name),
            min = format_quantity(r.minimum_quantity),
            cur = format_quantity(r.current_quantity),
            delta = format_delta(r.delta),
            status = r.status.label(),
        ));
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n<title>{title}</title>\n\
         <style>\n{STYLE}</style>\n</head>\n<body>\n<h1>{title}</h1>\n\
         <p class=\"generated\">Generated {generated}</p>\n<table>\n<thead>\n\
         <tr><th>Key</th><th>Name</th><th>Minimum</th><th>Current</th><th>Difference</th><th>Status</th></tr>\n\
         </thead>\n<tbody>\n{body}</tbody>\n</table>\n\
         <div class=\"footer\"><p>Total products listed: {total}</p></div>\n</body>\n</html>\n",
        generated = generated_at.format("%Y-%m-%d %H:%M UTC"),
        total = rows.len(),
    )
}
