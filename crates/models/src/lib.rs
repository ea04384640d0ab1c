use chrono::{NaiveDate, NaiveDateTime};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::AddAssign;
use std::path::PathBuf;
use std::str::FromStr;

/// One XML child element flattened to attribute name -> attribute value.
pub type RawRecord = BTreeMap<String, String>;

// Settings models
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
	#[serde(default = "default_input_dir")]
	pub input_dir: PathBuf,
	#[serde(default)]
	pub output_file: Option<PathBuf>,
	#[serde(default = "default_pretty")]
	pub pretty: bool,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

fn default_input_dir() -> PathBuf {
	PathBuf::from("statements")
}

fn default_pretty() -> bool {
	true
}

fn default_log_level() -> String {
	"info".to_string()
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			input_dir: default_input_dir(),
			output_file: None,
			pretty: default_pretty(),
			log_level: default_log_level(),
		}
	}
}

// Typed statement tables
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceRow {
	pub asset_category: String,
	pub symbol: String,
	pub underlying_symbol: String,
	pub mtm_ytd: f64,
	pub mtm_mtd: f64,
	pub real_st_mtd: f64,
	pub real_st_ytd: f64,
	pub real_lt_mtd: f64,
	pub real_lt_ytd: f64,
	/// Every attribute of the source element that was not lifted into a typed field.
	pub attributes: RawRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionPerformance {
	#[serde(flatten)]
	pub row: PerformanceRow,
	/// `None` when the export leaves `expiry` blank.
	pub expiry: Option<NaiveDate>,
}

/// Stock view of a performance row; option and bookkeeping columns are gone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockPerformance {
	pub mtm_ytd: f64,
	pub mtm_mtd: f64,
	pub real_st_mtd: f64,
	pub real_st_ytd: f64,
	pub real_lt_mtd: f64,
	pub real_lt_ytd: f64,
	pub attributes: RawRecord,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct UnderlyingPerformance {
	pub mtm_ytd: f64,
	pub real_st_ytd: f64,
	pub real_lt_ytd: f64,
	/// Number of option rows rolled into this underlying.
	pub contracts: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashTransactionRow {
	#[serde(rename = "type")]
	pub kind: String,
	pub amount: f64,
	pub date_time: NaiveDateTime,
	pub symbol: String,
	pub underlying_symbol: String,
	pub asset_category: String,
	pub description: String,
	pub account_id: String,
	pub attributes: RawRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DividendRow {
	pub account_id: String,
	pub asset_category: String,
	pub underlying_symbol: String,
	pub symbol: String,
	pub date_time: NaiveDateTime,
	pub description: String,
	pub amount: f64,
}

impl From<&CashTransactionRow> for DividendRow {
	fn from(txn: &CashTransactionRow) -> Self {
		Self {
			account_id: txn.account_id.clone(),
			asset_category: txn.asset_category.clone(),
			underlying_symbol: txn.underlying_symbol.clone(),
			symbol: txn.symbol.clone(),
			date_time: txn.date_time,
			description: txn.description.clone(),
			amount: txn.amount,
		}
	}
}

// Summary views

/// Per-symbol measures. `total()` is derived, never stored, so it always
/// equals the sum of the three measure columns.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SummaryRow {
	pub stocks: f64,
	pub options: f64,
	pub dividends: f64,
}

impl SummaryRow {
	pub fn new(stocks: f64, options: f64, dividends: f64) -> Self {
		Self { stocks, options, dividends }
	}

	pub fn total(&self) -> f64 {
		self.stocks + self.options + self.dividends
	}
}

impl AddAssign for SummaryRow {
	fn add_assign(&mut self, rhs: Self) {
		self.stocks += rhs.stocks;
		self.options += rhs.options;
		self.dividends += rhs.dividends;
	}
}

impl Serialize for SummaryRow {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut s = serializer.serialize_struct("SummaryRow", 4)?;
		s.serialize_field("Stocks", &self.stocks)?;
		s.serialize_field("Options", &self.options)?;
		s.serialize_field("Dividends", &self.dividends)?;
		s.serialize_field("Total", &self.total())?;
		s.end()
	}
}

/// Symbol (or underlying symbol) -> measures, ordered by symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SymbolSummary {
	pub rows: BTreeMap<String, SummaryRow>,
}

impl SymbolSummary {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self, symbol: &str) -> Option<&SummaryRow> {
		self.rows.get(symbol)
	}

	/// Row for `symbol`, inserting an all-zero row when absent.
	pub fn row_mut(&mut self, symbol: &str) -> &mut SummaryRow {
		self.rows.entry(symbol.to_string()).or_default()
	}

	pub fn len(&self) -> usize {
		self.rows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&String, &SummaryRow)> {
		self.rows.iter()
	}

	/// Column-wise sums across all symbols.
	pub fn column_totals(&self) -> SummaryRow {
		let mut acc = SummaryRow::default();
		for row in self.rows.values() {
			acc += *row;
		}
		acc
	}

	/// Sum of the `Total` column.
	pub fn total(&self) -> f64 {
		self.rows.values().map(SummaryRow::total).sum()
	}

	/// Undefined (NaN) cells become zero.
	pub fn fill_undefined(&mut self) {
		for row in self.rows.values_mut() {
			for cell in [&mut row.stocks, &mut row.options, &mut row.dividends] {
				if cell.is_nan() {
					*cell = 0.0;
				}
			}
		}
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FeeSummary {
	#[serde(rename = "Broker Interest Paid")]
	pub broker_interest_paid: f64,
	#[serde(rename = "Broker Interest Received")]
	pub broker_interest_received: f64,
	#[serde(rename = "Other Fees")]
	pub other_fees: f64,
}

impl FeeSummary {
	pub fn total(&self) -> f64 {
		self.broker_interest_paid + self.broker_interest_received + self.other_fees
	}
}

impl AddAssign for FeeSummary {
	fn add_assign(&mut self, rhs: Self) {
		self.broker_interest_paid += rhs.broker_interest_paid;
		self.broker_interest_received += rhs.broker_interest_received;
		self.other_fees += rhs.other_fees;
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DepositsWithdrawals {
	#[serde(rename = "Deposit")]
	pub deposit: f64,
	#[serde(rename = "Withdrawal")]
	pub withdrawal: f64,
}

impl AddAssign for DepositsWithdrawals {
	fn add_assign(&mut self, rhs: Self) {
		self.deposit += rhs.deposit;
		self.withdrawal += rhs.withdrawal;
	}
}

/// Named per-statement symbol views that can be rolled up across statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryView {
	MtmYtd,
	Realized,
}

impl SummaryView {
	pub fn as_str(&self) -> &'static str {
		match self {
			SummaryView::MtmYtd => "mtm_ytd",
			SummaryView::Realized => "realized",
		}
	}
}

impl fmt::Display for SummaryView {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for SummaryView {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"mtm_ytd" => Ok(SummaryView::MtmYtd),
			"realized" => Ok(SummaryView::Realized),
			other => Err(format!("unknown summary view: {other}")),
		}
	}
}

// Output models
#[derive(Debug, Clone, Serialize)]
pub struct StatementOverview {
	pub path: String,
	pub account_id: Option<String>,
	pub from_date: Option<NaiveDate>,
	pub to_date: Option<NaiveDate>,
	pub symbols: usize,
	pub mtm_ytd_total: f64,
	pub realized_total: f64,
	pub fees_total: f64,
	pub in_out: DepositsWithdrawals,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AccountTotals {
	pub statements: usize,
	pub mtm_ytd: f64,
	pub realized: f64,
	pub fees: f64,
	pub deposit: f64,
	pub withdrawal: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlexReport {
	pub generated_at: String,
	pub statement_count: usize,
	pub statements: Vec<StatementOverview>,
	pub accounts: BTreeMap<String, AccountTotals>,
	pub mtm_ytd: SymbolSummary,
	pub realized: SymbolSummary,
	pub fees: FeeSummary,
	pub in_out: DepositsWithdrawals,
	pub dividends_by_symbol: BTreeMap<String, f64>,
	pub grand_total: f64,
}
