use chrono::{NaiveDate, NaiveDateTime};
use models::{CashTransactionRow, PerformanceRow, RawRecord};

use crate::error::{FlexError, Result};
use crate::table::{CASH_TRANSACTIONS, PERFORMANCE_SUMMARY};

/// Performance columns coerced to `f64`.
pub const PERFORMANCE_NUMERIC_COLUMNS: [&str; 6] = [
    "mtmYTD",
    "mtmMTD",
    "realSTMTD",
    "realSTYTD",
    "realLTMTD",
    "realLTYTD",
];

const DATE_FORMATS: [&str; 3] = ["%Y%m%d", "%Y-%m-%d", "%m/%d/%Y"];

const DATE_TIME_FORMATS: [&str; 5] = [
    "%Y%m%d;%H%M%S",
    "%Y-%m-%d;%H:%M:%S",
    "%Y-%m-%d, %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y%m%d %H%M%S",
];

/// Moves typed columns out of a raw record. Whatever is not taken stays in
/// the record and ends up as the row's untyped attributes.
pub struct RecordReader {
    table: &'static str,
    row: usize,
    record: RawRecord,
}

impl RecordReader {
    pub fn new(table: &'static str, row: usize, record: RawRecord) -> Self {
        Self { table, row, record }
    }

    fn take_raw(&mut self, column: &str) -> Result<String> {
        self.record
            .remove(column)
            .ok_or_else(|| FlexError::MissingColumn {
                table: self.table,
                column: column.to_string(),
                row: self.row,
            })
    }

    /// Required text column.
    pub fn take_required(&mut self, column: &str) -> Result<String> {
        self.take_raw(column)
    }

    /// Optional text column, empty when absent.
    pub fn take_text(&mut self, column: &str) -> String {
        self.record.remove(column).unwrap_or_default()
    }

    pub fn take_number(&mut self, column: &str) -> Result<f64> {
        let value = self.take_raw(column)?;
        parse_number(column, &value)
    }

    /// Absent column reads as NaN; present but non-numeric text is still an error.
    pub fn take_optional_number(&mut self, column: &str) -> Result<f64> {
        match self.record.remove(column) {
            Some(value) => parse_number(column, &value),
            None => Ok(f64::NAN),
        }
    }

    /// Absent or blank column reads as `None`.
    pub fn take_optional_date(&mut self, column: &str) -> Result<Option<NaiveDate>> {
        match self.record.remove(column) {
            Some(value) if !value.trim().is_empty() => parse_flex_date(&value)
                .map(Some)
                .ok_or_else(|| FlexError::InvalidDate {
                    column: column.to_string(),
                    value,
                }),
            _ => Ok(None),
        }
    }

    pub fn take_timestamp(&mut self, column: &str) -> Result<NaiveDateTime> {
        let value = self.take_raw(column)?;
        parse_flex_timestamp(&value).ok_or_else(|| FlexError::InvalidDate {
            column: column.to_string(),
            value,
        })
    }

    pub fn into_remaining(self) -> RawRecord {
        self.record
    }
}

pub fn parse_number(column: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| FlexError::InvalidNumber {
            column: column.to_string(),
            value: value.to_string(),
        })
}

pub fn parse_flex_date(value: &str) -> Option<NaiveDate> {
    let text = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// Date-times as Flex writes them; a bare date is taken as midnight.
pub fn parse_flex_timestamp(value: &str) -> Option<NaiveDateTime> {
    let text = value.trim();
    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| parse_flex_date(text).and_then(|d| d.and_hms_opt(0, 0, 0)))
}

/// Types the `MTDYTDPerformanceSummary` table. A measure missing from a
/// row is NaN and gets zero-filled when the summaries are built.
pub fn build_performance_table(raw: Vec<RawRecord>) -> Result<Vec<PerformanceRow>> {
    raw.into_iter()
        .enumerate()
        .map(|(i, record)| -> Result<PerformanceRow> {
            let mut r = RecordReader::new(PERFORMANCE_SUMMARY, i, record);
            let [mtm_ytd, mtm_mtd, real_st_mtd, real_st_ytd, real_lt_mtd, real_lt_ytd] =
                PERFORMANCE_NUMERIC_COLUMNS;

            Ok(PerformanceRow {
                asset_category: r.take_required("assetCategory")?,
                symbol: r.take_text("symbol"),
                underlying_symbol: r.take_text("underlyingSymbol"),
                mtm_ytd: r.take_optional_number(mtm_ytd)?,
                mtm_mtd: r.take_optional_number(mtm_mtd)?,
                real_st_mtd: r.take_optional_number(real_st_mtd)?,
                real_st_ytd: r.take_optional_number(real_st_ytd)?,
                real_lt_mtd: r.take_optional_number(real_lt_mtd)?,
                real_lt_ytd: r.take_optional_number(real_lt_ytd)?,
                attributes: r.into_remaining(),
            })
        })
        .collect()
}

/// Types the `CashTransactions` table: `amount` as f64, `dateTime` as a timestamp.
pub fn build_cash_table(raw: Vec<RawRecord>) -> Result<Vec<CashTransactionRow>> {
    raw.into_iter()
        .enumerate()
        .map(|(i, record)| -> Result<CashTransactionRow> {
            let mut r = RecordReader::new(CASH_TRANSACTIONS, i, record);
            Ok(CashTransactionRow {
                kind: r.take_required("type")?,
                amount: r.take_number("amount")?,
                date_time: r.take_timestamp("dateTime")?,
                symbol: r.take_text("symbol"),
                underlying_symbol: r.take_text("underlyingSymbol"),
                asset_category: r.take_text("assetCategory"),
                description: r.take_text("description"),
                account_id: r.take_text("accountId"),
                attributes: r.into_remaining(),
            })
        })
        .collect()
}
