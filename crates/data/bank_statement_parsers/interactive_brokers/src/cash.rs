use std::collections::BTreeMap;

use models::{CashTransactionRow, DepositsWithdrawals, DividendRow, FeeSummary};

use crate::error::{FlexError, Result};

/// Substring that marks a cash transaction as dividend income
/// ("Dividends", "Payment In Lieu Of Dividends", ...).
pub const DIVIDENDS: &str = "Dividends";
pub const DEPOSITS_WITHDRAWALS: &str = "Deposits & Withdrawals";

pub const BROKER_INTEREST_PAID: &str = "Broker Interest Paid";
pub const BROKER_INTEREST_RECEIVED: &str = "Broker Interest Received";
pub const OTHER_FEES: &str = "Other Fees";

pub fn dividends(cash: &[CashTransactionRow]) -> Vec<DividendRow> {
    cash.iter()
        .filter(|txn| txn.kind.contains(DIVIDENDS))
        .map(DividendRow::from)
        .collect()
}

/// Dividend sums per symbol. Rows without a symbol are left out.
pub fn dividends_by_symbol(dividends: &[DividendRow]) -> BTreeMap<String, f64> {
    let mut by_symbol = BTreeMap::new();
    for div in dividends.iter().filter(|div| !div.symbol.is_empty()) {
        *by_symbol.entry(div.symbol.clone()).or_insert(0.0) += div.amount;
    }
    by_symbol
}

pub fn cash_by_type(cash: &[CashTransactionRow]) -> BTreeMap<String, f64> {
    let mut by_type = BTreeMap::new();
    for txn in cash {
        *by_type.entry(txn.kind.clone()).or_insert(0.0) += txn.amount;
    }
    by_type
}

/// Picks the three fee categories out of the per-type sums.
/// A category missing from the statement is an error, not a zero.
pub fn fees(cash_by_type: &BTreeMap<String, f64>) -> Result<FeeSummary> {
    let lookup = |category: &str| {
        cash_by_type
            .get(category)
            .copied()
            .ok_or_else(|| FlexError::MissingCategory(category.to_string()))
    };

    Ok(FeeSummary {
        broker_interest_paid: lookup(BROKER_INTEREST_PAID)?,
        broker_interest_received: lookup(BROKER_INTEREST_RECEIVED)?,
        other_fees: lookup(OTHER_FEES)?,
    })
}

pub fn in_out(cash: &[CashTransactionRow]) -> DepositsWithdrawals {
    let mut totals = DepositsWithdrawals::default();
    for txn in cash.iter().filter(|txn| txn.kind == DEPOSITS_WITHDRAWALS) {
        if txn.amount > 0.0 {
            totals.deposit += txn.amount;
        } else if txn.amount < 0.0 {
            totals.withdrawal += txn.amount;
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use models::RawRecord;

    fn txn(kind: &str, symbol: &str, amount: f64) -> CashTransactionRow {
        CashTransactionRow {
            kind: kind.to_string(),
            amount,
            date_time: NaiveDate::from_ymd_opt(2021, 6, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            symbol: symbol.to_string(),
            underlying_symbol: symbol.to_string(),
            asset_category: "STK".to_string(),
            description: format!("{symbol} {kind}"),
            account_id: "U1".to_string(),
            attributes: RawRecord::new(),
        }
    }

    #[test]
    fn test_dividends_match_by_substring() {
        let cash = vec![
            txn("Dividends", "KO", 10.0),
            txn("Payment In Lieu Of Dividends", "T", 2.5),
            txn("Commission", "KO", -1.0),
        ];

        let divs = dividends(&cash);
        assert_eq!(divs.len(), 2);
        assert_eq!(divs[0].symbol, "KO");
        assert_eq!(divs[1].symbol, "T");
        assert_eq!(divs[1].description, "T Payment In Lieu Of Dividends");
    }

    #[test]
    fn test_dividends_by_symbol_sums_amounts() {
        let cash = vec![
            txn("Dividends", "KO", 10.0),
            txn("Dividends", "KO", 11.0),
            txn("Dividends", "PEP", 3.0),
        ];
        let by_symbol = dividends_by_symbol(&dividends(&cash));
        assert_eq!(by_symbol["KO"], 21.0);
        assert_eq!(by_symbol["PEP"], 3.0);
    }

    #[test]
    fn test_dividends_without_symbol_are_not_grouped() {
        let cash = vec![txn("Dividends", "KO", 1.0), txn("Dividends", "", 5.0)];
        let by_symbol = dividends_by_symbol(&dividends(&cash));
        assert_eq!(by_symbol.len(), 1);
        assert!(!by_symbol.contains_key(""));
    }

    #[test]
    fn test_fees_extracts_three_categories() {
        let cash = vec![
            txn(BROKER_INTEREST_PAID, "", -4.0),
            txn(BROKER_INTEREST_PAID, "", -1.0),
            txn(BROKER_INTEREST_RECEIVED, "", 2.0),
            txn(OTHER_FEES, "", -10.0),
            txn("Dividends", "KO", 7.0),
        ];

        let summary = fees(&cash_by_type(&cash)).unwrap();
        assert_eq!(summary.broker_interest_paid, -5.0);
        assert_eq!(summary.broker_interest_received, 2.0);
        assert_eq!(summary.other_fees, -10.0);
    }

    #[test]
    fn test_fees_missing_category_is_error() {
        let cash = vec![
            txn(BROKER_INTEREST_PAID, "", -4.0),
            txn(BROKER_INTEREST_RECEIVED, "", 2.0),
        ];

        let err = fees(&cash_by_type(&cash)).unwrap_err();
        assert!(matches!(err, FlexError::MissingCategory(ref c) if c == OTHER_FEES));
    }

    #[test]
    fn test_in_out_splits_by_sign() {
        let mut cash: Vec<_> = [1000.0, -200.0, 500.0, -50.0]
            .into_iter()
            .map(|amount| txn(DEPOSITS_WITHDRAWALS, "", amount))
            .collect();
        cash.push(txn("Other Fees", "", -99.0));

        let totals = in_out(&cash);
        assert_eq!(totals.deposit, 1500.0);
        assert_eq!(totals.withdrawal, -250.0);
    }

    #[test]
    fn test_in_out_without_rows_is_zero() {
        let totals = in_out(&[txn("Dividends", "KO", 1.0)]);
        assert_eq!(totals, DepositsWithdrawals::default());
    }
}
