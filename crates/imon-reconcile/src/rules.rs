use imon_schemas::StockStatus;

/// Stock up to this multiple of the minimum is still reported as `Low`.
pub const LOW_STOCK_FACTOR: f64 = 1.2;

/// Inputs a rule is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleInput {
    pub found: bool,
    pub minimum_quantity: f64,
    pub current_quantity: f64,
}

/// One row of the decision table.
#[derive(Debug, Clone, Copy)]
pub struct StatusRule {
    pub status: StockStatus,
    pub matches: fn(&RuleInput) -> bool,
}

fn not_found(i: &RuleInput) -> bool {
    !i.found
}

fn below_minimum(i: &RuleInput) -> bool {
    i.current_quantity < i.minimum_quantity
}

fn within_low_band(i: &RuleInput) -> bool {
    i.current_quantity <= i.minimum_quantity * LOW_STOCK_FACTOR
}

fn always(_: &RuleInput) -> bool {
    true
}

/// Evaluated top to bottom; the first matching rule decides.
pub const STATUS_RULES: [StatusRule; 4] = [
    StatusRule {
        status: StockStatus::NotFound,
        matches: not_found,
    },
    StatusRule {
        status: StockStatus::Critical,
        matches: below_minimum,
    },
    StatusRule {
        status: StockStatus::Low,
        matches: within_low_band,
    },
    StatusRule {
        status: StockStatus::Ok,
        matches: always,
    },
];

pub fn classify(found: bool, minimum_quantity: f64, current_quantity: f64) -> StockStatus {
    let input = RuleInput {
        found,
        minimum_quantity,
        current_quantity,
    };
    STATUS_RULES
        .iter()
        .find(|r| (r.matches)(&input))
        .map(|r| r.status)
        .unwrap_or(StockStatus::Ok)
}
