use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use models::{
    CashTransactionRow, DepositsWithdrawals, DividendRow, FeeSummary, OptionPerformance,
    PerformanceRow, StockPerformance, SummaryView, SymbolSummary, UnderlyingPerformance,
};
use tracing::info;

use crate::cash;
use crate::error::Result;
use crate::perf;
use crate::table::{self, RawStatement};
use crate::typed::{self, parse_flex_date};

/// Everything derived from one Flex statement file. Built once by the
/// constructors; aggregation only ever borrows it.
#[derive(Debug, Clone)]
pub struct FlexStatement {
    pub path: Option<PathBuf>,
    pub account_id: Option<String>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,

    pub perf: Vec<PerformanceRow>,
    pub option_perf: Vec<OptionPerformance>,
    pub stock_perf: BTreeMap<String, StockPerformance>,
    pub option_perf_underlying: BTreeMap<String, UnderlyingPerformance>,

    pub cash_transactions: Vec<CashTransactionRow>,
    pub dividends: Vec<DividendRow>,
    pub dividends_by_symbol: BTreeMap<String, f64>,

    pub mtm_ytd: SymbolSummary,
    pub realized: SymbolSummary,

    pub cash_by_type: BTreeMap<String, f64>,
    pub fees: FeeSummary,
    pub in_out: DepositsWithdrawals,
}

impl FlexStatement {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let mut statement = Self::from_reader(file)?;
        statement.path = Some(path.to_path_buf());
        info!(
            path = %path.display(),
            account = statement.account_id.as_deref().unwrap_or("unknown"),
            symbols = statement.mtm_ytd.len(),
            "loaded flex statement"
        );
        Ok(statement)
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        // The buffer and the parsed document stay inside this block; only
        // owned records come out.
        let raw = {
            let mut buf = String::new();
            reader.read_to_string(&mut buf)?;
            table::read_raw_statement(&buf)?
        };
        Self::from_raw(raw)
    }

    pub fn from_xml(xml: &str) -> Result<Self> {
        Self::from_raw(table::read_raw_statement(xml)?)
    }

    fn from_raw(raw: RawStatement) -> Result<Self> {
        let perf = typed::build_performance_table(raw.performance)?;
        let option_perf = perf::option_view(&perf)?;
        let option_perf_underlying = perf::rollup_by_underlying(&option_perf);
        let stock_perf = perf::stock_view(&perf);

        let cash_transactions = typed::build_cash_table(raw.cash_transactions)?;
        let dividends = cash::dividends(&cash_transactions);
        let dividends_by_symbol = cash::dividends_by_symbol(&dividends);

        let mtm_ytd = symbol_summary(
            stock_perf.iter().map(|(s, p)| (s, p.mtm_ytd)),
            option_perf_underlying.iter().map(|(s, p)| (s, p.mtm_ytd)),
            &dividends_by_symbol,
        );
        let realized = symbol_summary(
            stock_perf.iter().map(|(s, p)| (s, p.real_st_ytd)),
            option_perf_underlying.iter().map(|(s, p)| (s, p.real_st_ytd)),
            &dividends_by_symbol,
        );

        let cash_by_type = cash::cash_by_type(&cash_transactions);
        let fees = cash::fees(&cash_by_type)?;
        let in_out = cash::in_out(&cash_transactions);

        Ok(Self {
            path: None,
            account_id: raw.account_id.filter(|id| !id.is_empty()),
            from_date: raw.from_date.as_deref().and_then(parse_flex_date),
            to_date: raw.to_date.as_deref().and_then(parse_flex_date),
            perf,
            option_perf,
            stock_perf,
            option_perf_underlying,
            cash_transactions,
            dividends,
            dividends_by_symbol,
            mtm_ytd,
            realized,
            cash_by_type,
            fees,
            in_out,
        })
    }

    pub fn view(&self, view: SummaryView) -> &SymbolSummary {
        match view {
            SummaryView::MtmYtd => &self.mtm_ytd,
            SummaryView::Realized => &self.realized,
        }
    }
}

/// Union of the three measure columns by symbol; a symbol missing from a
/// column gets zero there, and so does an undefined measure.
fn symbol_summary<'a>(
    stocks: impl Iterator<Item = (&'a String, f64)>,
    options: impl Iterator<Item = (&'a String, f64)>,
    dividends: &BTreeMap<String, f64>,
) -> SymbolSummary {
    let mut summary = SymbolSummary::new();
    for (symbol, value) in stocks {
        summary.row_mut(symbol).stocks = value;
    }
    for (symbol, value) in options {
        summary.row_mut(symbol).options = value;
    }
    for (symbol, value) in dividends {
        summary.row_mut(symbol).dividends = *value;
    }
    summary.fill_undefined();
    summary
}
