//! imon-reconcile
//!
//! Joins a user's minimum-stock list against the remote catalog and
//! classifies every line.
//!
//! - Left-outer join on key: the minimum-stock list defines the universe,
//!   catalog-only products never appear.
//! - Output order is the input order of the minimum-stock list.
//! - Status comes from an ordered decision table (first match wins).
//!
//! Deterministic, pure logic. No IO.

mod engine;
mod review;
mod rules;

pub use engine::reconcile;
pub use review::{filter_rows, summarize, RowFilter, StatusSummary};
pub use rules::{classify, RuleInput, StatusRule, LOW_STOCK_FACTOR, STATUS_RULES};
