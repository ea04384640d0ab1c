use std::collections::BTreeMap;

use models::{OptionPerformance, PerformanceRow, StockPerformance, UnderlyingPerformance};

use crate::error::Result;
use crate::table::PERFORMANCE_SUMMARY;
use crate::typed::RecordReader;

pub const OPTION: &str = "OPT";
pub const STOCK: &str = "STK";

/// Option-specific and bookkeeping columns that make no sense in the stock view.
pub const STOCK_DROPPED_COLUMNS: [&str; 10] = [
    "acctAlias",
    "assetCategory",
    "expiry",
    "multiplier",
    "putCall",
    "strike",
    "securityID",
    "securityIDType",
    "underlyingSymbol",
    "underlyingConid",
];

/// Option rows with `expiry` parsed to a date; a blank expiry stays `None`.
pub fn option_view(perf: &[PerformanceRow]) -> Result<Vec<OptionPerformance>> {
    perf.iter()
        .enumerate()
        .filter(|(_, row)| row.asset_category == OPTION)
        .map(|(i, row)| -> Result<OptionPerformance> {
            let mut reader = RecordReader::new(PERFORMANCE_SUMMARY, i, row.attributes.clone());
            let expiry = reader.take_optional_date("expiry")?;

            let mut row = row.clone();
            row.attributes = reader.into_remaining();
            Ok(OptionPerformance { row, expiry })
        })
        .collect()
}

/// Stock rows keyed by symbol. A repeated symbol overwrites the earlier row.
pub fn stock_view(perf: &[PerformanceRow]) -> BTreeMap<String, StockPerformance> {
    let mut stocks = BTreeMap::new();
    for row in perf.iter().filter(|row| row.asset_category == STOCK) {
        let mut attributes = row.attributes.clone();
        for column in STOCK_DROPPED_COLUMNS {
            attributes.remove(column);
        }

        stocks.insert(
            row.symbol.clone(),
            StockPerformance {
                mtm_ytd: row.mtm_ytd,
                mtm_mtd: row.mtm_mtd,
                real_st_mtd: row.real_st_mtd,
                real_st_ytd: row.real_st_ytd,
                real_lt_mtd: row.real_lt_mtd,
                real_lt_ytd: row.real_lt_ytd,
                attributes,
            },
        );
    }
    stocks
}

/// Sums `mtmYTD`, `realSTYTD` and `realLTYTD` per underlying symbol.
/// Undefined measures add nothing; rows without an underlying are skipped.
pub fn rollup_by_underlying(options: &[OptionPerformance]) -> BTreeMap<String, UnderlyingPerformance> {
    let mut rolled: BTreeMap<String, UnderlyingPerformance> = BTreeMap::new();
    for option in options.iter().filter(|o| !o.row.underlying_symbol.is_empty()) {
        let acc = rolled.entry(option.row.underlying_symbol.clone()).or_default();
        acc.mtm_ytd += defined(option.row.mtm_ytd);
        acc.real_st_ytd += defined(option.row.real_st_ytd);
        acc.real_lt_ytd += defined(option.row.real_lt_ytd);
        acc.contracts += 1;
    }
    rolled
}

fn defined(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value }
}
