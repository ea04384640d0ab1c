//! Flex XML builders shared by the pipeline tests.

use ibkr_flex::FlexStatement;

pub fn stock(symbol: &str, mtm_ytd: f64, real_st_ytd: f64) -> String {
    format!(
        r#"<MTDYTDPerformanceSummaryUnderlying acctAlias="" assetCategory="STK" symbol="{symbol}" underlyingSymbol="{symbol}" expiry="" putCall="" strike="" multiplier="1" mtmYTD="{mtm_ytd}" mtmMTD="0" realSTMTD="0" realSTYTD="{real_st_ytd}" realLTMTD="0" realLTYTD="0" />"#
    )
}

pub fn option(symbol: &str, underlying: &str, mtm_ytd: f64, real_st_ytd: f64) -> String {
    format!(
        r#"<MTDYTDPerformanceSummaryUnderlying acctAlias="" assetCategory="OPT" symbol="{symbol}" underlyingSymbol="{underlying}" expiry="20211217" putCall="C" strike="100" multiplier="100" mtmYTD="{mtm_ytd}" mtmMTD="0" realSTMTD="0" realSTYTD="{real_st_ytd}" realLTMTD="0" realLTYTD="0" />"#
    )
}

pub fn cash(kind: &str, symbol: &str, amount: f64) -> String {
    let kind = kind.replace('&', "&amp;");
    format!(
        r#"<CashTransaction accountId="" assetCategory="STK" symbol="{symbol}" underlyingSymbol="{symbol}" description="{kind}" dateTime="20210601;120000" amount="{amount}" type="{kind}" />"#
    )
}

pub fn fees(paid: f64, received: f64, other: f64) -> Vec<String> {
    vec![
        cash("Broker Interest Paid", "", paid),
        cash("Broker Interest Received", "", received),
        cash("Other Fees", "", other),
    ]
}

pub fn statement_xml(account: &str, perf: &[String], cash: &[String]) -> String {
    format!(
        r#"<FlexQueryResponse queryName="test" type="AF">
<FlexStatements count="1">
<FlexStatement accountId="{account}" fromDate="20210101" toDate="20211231">
<MTDYTDPerformanceSummary>
{}
</MTDYTDPerformanceSummary>
<CashTransactions>
{}
</CashTransactions>
</FlexStatement>
</FlexStatements>
</FlexQueryResponse>"#,
        perf.join("\n"),
        cash.join("\n")
    )
}

pub fn load(account: &str, perf: &[String], cash: &[String]) -> FlexStatement {
    FlexStatement::from_xml(&statement_xml(account, perf, cash)).unwrap()
}
