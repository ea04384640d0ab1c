//! Interactive Brokers Flex Statement parser.
//!
//! Reads a Flex query XML export, flattens the `MTDYTDPerformanceSummary`
//! and `CashTransactions` sections into typed tables and derives the
//! per-statement summaries (mark-to-market and realized gains by symbol,
//! dividends, fees, deposits and withdrawals).
//!
//! ```rust,no_run
//! use ibkr_flex::FlexStatement;
//!
//! let stmt = FlexStatement::from_path("statements/U1234567_2021.xml")?;
//! for (symbol, row) in stmt.mtm_ytd.iter() {
//!     println!("{symbol}: {:.2}", row.total());
//! }
//! # Ok::<(), ibkr_flex::FlexError>(())
//! ```

pub mod cash;
pub mod error;
pub mod perf;
pub mod statement;
pub mod table;
pub mod typed;

pub use crate::error::{FlexError, Result};
pub use crate::statement::FlexStatement;

pub const PARSER_NAME: &str = "ibkr_flex";
