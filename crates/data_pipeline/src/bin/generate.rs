use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use data_pipeline::{Config, run};
use models::FlexReport;

#[derive(Parser, Debug)]
#[command(
    name = "flex-report",
    about = "Roll up Interactive Brokers Flex statements into per-symbol totals."
)]
struct Args {
    /// Directory holding the Flex statement XML files
    #[arg(short, long)]
    input_dir: Option<PathBuf>,

    /// Optional JSON output path for the full report
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Settings file; defaults to settings.json when present
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Pretty-print the JSON report (true/false)
    #[arg(long)]
    pretty: Option<bool>,

    /// Fallback log level when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,
}

fn print_report(report: &FlexReport) {
    println!(
        "\n📊 Mark-to-market YTD across {} statement(s):",
        report.statement_count
    );
    println!(
        "{:<12} {:>12} {:>12} {:>12} {:>12}",
        "Symbol", "Stocks", "Options", "Dividends", "Total"
    );
    for (symbol, row) in report.mtm_ytd.iter() {
        println!(
            "{:<12} {:>12.2} {:>12.2} {:>12.2} {:>12.2}",
            symbol,
            row.stocks,
            row.options,
            row.dividends,
            row.total()
        );
    }
    let columns = report.mtm_ytd.column_totals();
    println!(
        "{:<12} {:>12.2} {:>12.2} {:>12.2} {:>12.2}",
        "Total",
        columns.stocks,
        columns.options,
        columns.dividends,
        report.mtm_ytd.total()
    );

    println!("\n✓ Realized YTD total: {:.2}", report.realized.total());

    println!("\n💸 Fees:");
    println!("  Broker Interest Paid:     {:>12.2}", report.fees.broker_interest_paid);
    println!("  Broker Interest Received: {:>12.2}", report.fees.broker_interest_received);
    println!("  Other Fees:               {:>12.2}", report.fees.other_fees);

    println!("\n🏦 Deposits & Withdrawals:");
    println!("  Deposit:    {:>12.2}", report.in_out.deposit);
    println!("  Withdrawal: {:>12.2}", report.in_out.withdrawal);

    if report.accounts.len() > 1 {
        println!("\n👤 Accounts:");
        for (account, totals) in &report.accounts {
            println!(
                "  {:<12} statements: {:>3}  mtm: {:>12.2}  realized: {:>12.2}  fees: {:>10.2}",
                account, totals.statements, totals.mtm_ytd, totals.realized, totals.fees
            );
        }
    }

    println!("\n💰 Grand total: {:.2}", report.grand_total);
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut settings = settings_loader::load_settings_with_fallback(args.settings.as_ref())
        .context("Loading settings")?;
    if let Some(input_dir) = args.input_dir {
        settings.input_dir = input_dir;
    }
    if let Some(output) = args.output {
        settings.output_file = Some(output);
    }
    if let Some(pretty) = args.pretty {
        settings.pretty = pretty;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }

    logger::init(&settings.log_level);

    println!("📖 Reading Flex statements from {}", settings.input_dir.display());
    let report = run(&Config::from(&settings))?;
    print_report(&report);

    if let Some(output_file) = &settings.output_file {
        println!("\n✓ Report written to {}", output_file.display());
    }
    Ok(())
}
