use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use tracing::info;

use ibkr_flex::FlexStatement;
use models::{FlexReport, Settings, StatementOverview, SummaryView};

pub mod aggregate;

#[cfg(test)]
mod fixtures;

pub struct Config {
    pub input_dir: PathBuf,
    pub output_file: Option<PathBuf>,
    pub pretty: bool,
}

impl From<&Settings> for Config {
    fn from(settings: &Settings) -> Self {
        Self {
            input_dir: settings.input_dir.clone(),
            output_file: settings.output_file.clone(),
            pretty: settings.pretty,
        }
    }
}

/// Loads every Flex statement in the input directory, rolls them up and
/// optionally writes the report as JSON.
pub fn run(cfg: &Config) -> Result<FlexReport> {
    let paths = discover_statements(&cfg.input_dir)?;
    if paths.is_empty() {
        return Err(anyhow!(
            "No Flex statements (*.xml) found in {}",
            cfg.input_dir.display()
        ));
    }

    let statements = load_statements(&paths)?;
    let report = build_report(&statements);
    info!(
        statements = report.statement_count,
        symbols = report.mtm_ytd.len(),
        grand_total = report.grand_total,
        "rolled up flex statements"
    );

    if let Some(output_file) = &cfg.output_file {
        write_report(output_file, &report, cfg.pretty)?;
        info!(path = %output_file.display(), "report written");
    }
    Ok(report)
}

/// Lists the `*.xml` files directly inside `dir`, sorted by path.
pub fn discover_statements(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    let entries =
        fs::read_dir(dir).with_context(|| format!("Reading input dir: {}", dir.display()))?;

    for entry in entries {
        let entry = entry?;
        let path = entry.path();

        // Skip directories
        if path.is_dir() {
            continue;
        }

        if !path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
        {
            continue;
        }

        // Skip hidden files (editor swap files, macOS metadata)
        if path
            .file_name()
            .and_then(|s| s.to_str())
            .is_some_and(|name| name.starts_with('.'))
        {
            continue;
        }

        paths.push(path);
    }

    paths.sort();
    Ok(paths)
}

/// Loads statements in order. The first file that fails aborts the run.
pub fn load_statements(paths: &[PathBuf]) -> Result<Vec<FlexStatement>> {
    paths
        .iter()
        .map(|path| {
            FlexStatement::from_path(path)
                .with_context(|| format!("Loading Flex statement {}", path.display()))
        })
        .collect()
}

pub fn build_report(statements: &[FlexStatement]) -> FlexReport {
    let mtm_ytd = aggregate::rollup_statements(statements, SummaryView::MtmYtd);
    let realized = aggregate::rollup_statements(statements, SummaryView::Realized);
    let fees = aggregate::total_fees(statements);
    let grand_total = aggregate::grand_total(&mtm_ytd, &fees);

    FlexReport {
        generated_at: Utc::now().to_rfc3339(),
        statement_count: statements.len(),
        statements: statements.iter().map(overview).collect(),
        accounts: aggregate::account_totals(statements),
        mtm_ytd,
        realized,
        fees,
        in_out: aggregate::total_in_out(statements),
        dividends_by_symbol: aggregate::dividends_by_symbol(statements),
        grand_total,
    }
}

fn overview(stmt: &FlexStatement) -> StatementOverview {
    StatementOverview {
        path: stmt
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
        account_id: stmt.account_id.clone(),
        from_date: stmt.from_date,
        to_date: stmt.to_date,
        symbols: stmt.mtm_ytd.len(),
        mtm_ytd_total: stmt.mtm_ytd.total(),
        realized_total: stmt.realized.total(),
        fees_total: stmt.fees.total(),
        in_out: stmt.in_out,
    }
}

/// Writes the report as JSON, creating parent directories as needed
pub fn write_report(path: &Path, report: &FlexReport, pretty: bool) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Creating output dir: {}", parent.display()))?;
    }

    let json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };

    fs::write(path, json).with_context(|| format!("Writing output file: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{cash, fees, option, statement_xml, stock};

    fn write_statement(dir: &Path, name: &str, account: &str, perf: &[String], extra_cash: &[String]) {
        let mut cash_rows = fees(-1.0, 0.25, -2.0);
        cash_rows.extend_from_slice(extra_cash);
        fs::write(dir.join(name), statement_xml(account, perf, &cash_rows)).unwrap();
    }

    #[test]
    fn test_discover_statements_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.xml"), "").unwrap();
        fs::write(dir.path().join("a.XML"), "").unwrap();
        fs::write(dir.path().join(".hidden.xml"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("nested.xml")).unwrap();

        let paths = discover_statements(dir.path()).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.XML", "b.xml"]);
    }

    #[test]
    fn test_discover_missing_dir_is_error() {
        let err = discover_statements(Path::new("no/such/flex/dir")).unwrap_err();
        assert!(err.to_string().contains("Reading input dir"));
    }

    #[test]
    fn test_run_builds_and_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        write_statement(
            dir.path(),
            "U1_2021.xml",
            "U1",
            &[stock("AAPL", 100.0, 10.0), option("AAPL 1C", "AAPL", -20.0, -5.0)],
            &[cash("Deposits & Withdrawals", "", 5000.0)],
        );
        write_statement(
            dir.path(),
            "U2_2021.xml",
            "U2",
            &[stock("MSFT", 50.0, 0.0)],
            &[cash("Dividends", "MSFT", 4.0), cash("Deposits & Withdrawals", "", -100.0)],
        );

        let output_file = dir.path().join("out").join("report.json");
        let cfg = Config {
            input_dir: dir.path().to_path_buf(),
            output_file: Some(output_file.clone()),
            pretty: true,
        };

        let report = run(&cfg).unwrap();
        assert_eq!(report.statement_count, 2);
        assert_eq!(report.mtm_ytd.total(), 134.0);
        assert_eq!(report.realized.total(), 9.0);
        assert_eq!(report.fees.total(), -5.5);
        assert_eq!(report.grand_total, 134.0 - 5.5);
        assert_eq!(report.in_out.deposit, 5000.0);
        assert_eq!(report.in_out.withdrawal, -100.0);
        assert_eq!(report.accounts.len(), 2);
        assert_eq!(report.statements[0].account_id.as_deref(), Some("U1"));
        assert!(report.statements[0].path.ends_with("U1_2021.xml"));

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output_file).unwrap()).unwrap();
        assert_eq!(written["mtm_ytd"]["AAPL"]["Total"], 80.0);
        assert_eq!(written["mtm_ytd"]["MSFT"]["Dividends"], 4.0);
        assert_eq!(written["fees"]["Other Fees"], -4.0);
        assert_eq!(written["in_out"]["Deposit"], 5000.0);
    }

    #[test]
    fn test_run_on_empty_dir_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config {
            input_dir: dir.path().to_path_buf(),
            output_file: None,
            pretty: false,
        };
        let err = run(&cfg).unwrap_err();
        assert!(err.to_string().contains("No Flex statements"));
    }

    #[test]
    fn test_bad_statement_aborts_run_with_path() {
        let dir = tempfile::tempdir().unwrap();
        write_statement(dir.path(), "good.xml", "U1", &[stock("AAPL", 1.0, 0.0)], &[]);
        // no fee rows at all: strict fee lookup fails
        fs::write(
            dir.path().join("missing_fees.xml"),
            statement_xml("U1", &[stock("AAPL", 1.0, 0.0)], &[]),
        )
        .unwrap();

        let cfg = Config {
            input_dir: dir.path().to_path_buf(),
            output_file: None,
            pretty: false,
        };
        let err = run(&cfg).unwrap_err();
        assert!(format!("{err:#}").contains("missing_fees.xml"));
        assert!(format!("{err:#}").contains("Broker Interest Paid"));
    }

    #[test]
    fn test_config_from_settings() {
        let settings = Settings {
            input_dir: PathBuf::from("ib"),
            output_file: Some(PathBuf::from("report.json")),
            pretty: false,
            log_level: "warn".to_string(),
        };
        let cfg = Config::from(&settings);
        assert_eq!(cfg.input_dir, PathBuf::from("ib"));
        assert_eq!(cfg.output_file, Some(PathBuf::from("report.json")));
        assert!(!cfg.pretty);
    }
}
