//! Fan-in of per-statement views into totals across all loaded statements.

use std::collections::BTreeMap;

use ibkr_flex::FlexStatement;
use models::{AccountTotals, DepositsWithdrawals, FeeSummary, SummaryView, SymbolSummary};

pub const UNKNOWN_ACCOUNT: &str = "unknown";

/// Symbol-wise sum of `view` over all statements.
///
/// `Total` is derived from the measure columns, so dropping and recomputing
/// it happens implicitly. A symbol missing from a statement contributes zero.
pub fn rollup_statements(statements: &[FlexStatement], view: SummaryView) -> SymbolSummary {
    let mut result = SymbolSummary::new();
    for stmt in statements {
        for (symbol, row) in stmt.view(view).iter() {
            *result.row_mut(symbol) += *row;
        }
    }
    result.fill_undefined();
    result
}

/// Category-wise fee sums across statements.
pub fn total_fees(statements: &[FlexStatement]) -> FeeSummary {
    let mut fees = FeeSummary::default();
    for stmt in statements {
        fees += stmt.fees;
    }
    fees
}

pub fn total_in_out(statements: &[FlexStatement]) -> DepositsWithdrawals {
    let mut totals = DepositsWithdrawals::default();
    for stmt in statements {
        totals += stmt.in_out;
    }
    totals
}

pub fn dividends_by_symbol(statements: &[FlexStatement]) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for stmt in statements {
        for (symbol, amount) in &stmt.dividends_by_symbol {
            *totals.entry(symbol.clone()).or_insert(0.0) += amount;
        }
    }
    totals
}

/// Sum of the aggregated mark-to-market `Total` column plus every fee category.
pub fn grand_total(mtm_ytd: &SymbolSummary, fees: &FeeSummary) -> f64 {
    mtm_ytd.total() + fees.total()
}

/// Per-account totals. Statements without an account id share one bucket.
pub fn account_totals(statements: &[FlexStatement]) -> BTreeMap<String, AccountTotals> {
    let mut accounts: BTreeMap<String, AccountTotals> = BTreeMap::new();
    for stmt in statements {
        let key = stmt.account_id.as_deref().unwrap_or(UNKNOWN_ACCOUNT);
        let acc = accounts.entry(key.to_string()).or_default();
        acc.statements += 1;
        acc.mtm_ytd += stmt.mtm_ytd.total();
        acc.realized += stmt.realized.total();
        acc.fees += stmt.fees.total();
        acc.deposit += stmt.in_out.deposit;
        acc.withdrawal += stmt.in_out.withdrawal;
    }
    accounts
}
