use anyhow::{Context, Result};
use std::{env, fs, path::PathBuf};

use ibkr_flex::{FlexStatement, PARSER_NAME};

fn find_xml_file() -> Option<PathBuf> {
    let current_dir = env::current_dir().ok()?;
    let mut candidates: Vec<PathBuf> = fs::read_dir(&current_dir)
        .ok()?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|s| s.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
        })
        .collect();
    candidates.sort();
    candidates.into_iter().next()
}

fn main() -> Result<()> {
    // Usage:
    //   ibkr_flex [statement.xml]
    //
    // Without an argument the first .xml file in the current directory is used.
    logger::init("info");

    let args: Vec<String> = env::args().collect();

    let xml_path = if let Some(arg) = args.get(1) {
        PathBuf::from(arg)
    } else if let Some(found) = find_xml_file() {
        found
    } else {
        anyhow::bail!("No XML file found in current directory. Please provide a Flex statement path as the first argument.");
    };

    println!("📖 Parsing Flex statement ({}): {}", PARSER_NAME, xml_path.display());

    let stmt = FlexStatement::from_path(&xml_path)
        .with_context(|| format!("Cannot load {}", xml_path.display()))?;

    println!(
        "✓ Parsed: {} performance rows ({} stocks, {} options on {} underlyings), {} cash txns",
        stmt.perf.len(),
        stmt.stock_perf.len(),
        stmt.option_perf.len(),
        stmt.option_perf_underlying.len(),
        stmt.cash_transactions.len(),
    );
    println!(
        "  Account: {}  Period: {} .. {}",
        stmt.account_id.as_deref().unwrap_or("unknown"),
        stmt.from_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "?".to_string()),
        stmt.to_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "?".to_string()),
    );

    println!("\n📊 Mark-to-market YTD:");
    println!(
        "{:<12} {:>12} {:>12} {:>12} {:>12}",
        "Symbol", "Stocks", "Options", "Dividends", "Total"
    );
    for (symbol, row) in stmt.mtm_ytd.iter() {
        println!(
            "{:<12} {:>12.2} {:>12.2} {:>12.2} {:>12.2}",
            symbol,
            row.stocks,
            row.options,
            row.dividends,
            row.total()
        );
    }
    println!("{:<12} {:>51.2}", "Total", stmt.mtm_ytd.total());
    println!("✓ Realized YTD total: {:.2}", stmt.realized.total());

    println!("\n💸 Fees:");
    println!("  Broker Interest Paid:     {:>12.2}", stmt.fees.broker_interest_paid);
    println!("  Broker Interest Received: {:>12.2}", stmt.fees.broker_interest_received);
    println!("  Other Fees:               {:>12.2}", stmt.fees.other_fees);

    println!("\n🏦 Deposits & Withdrawals:");
    println!("  Deposit:    {:>12.2}", stmt.in_out.deposit);
    println!("  Withdrawal: {:>12.2}", stmt.in_out.withdrawal);

    Ok(())
}
