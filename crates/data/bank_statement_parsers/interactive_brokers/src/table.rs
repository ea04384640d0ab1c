use models::RawRecord;
use roxmltree::{Document, Node};
use tracing::{debug, warn};

use crate::error::{FlexError, Result};

pub const FLEX_STATEMENTS: &str = "FlexStatements";
pub const FLEX_STATEMENT: &str = "FlexStatement";
pub const PERFORMANCE_SUMMARY: &str = "MTDYTDPerformanceSummary";
pub const CASH_TRANSACTIONS: &str = "CashTransactions";

/// Owned copy of the parts of a Flex document the summarizer needs.
/// Nothing in here borrows from the XML buffer.
#[derive(Debug, Clone, Default)]
pub struct RawStatement {
    pub account_id: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub performance: Vec<RawRecord>,
    pub cash_transactions: Vec<RawRecord>,
}

/// Flattens the element children of `node` into one record each.
/// Text and comment nodes are skipped; attribute sets may differ per child.
pub fn extract_table(node: Node<'_, '_>) -> Vec<RawRecord> {
    node.children()
        .filter(|child| child.is_element())
        .map(|child| {
            child
                .attributes()
                .map(|attr| (attr.name().to_string(), attr.value().to_string()))
                .collect::<RawRecord>()
        })
        .collect()
}

/// Parses a Flex query response and copies out the statement tables.
/// The parsed document is dropped when this returns.
pub fn read_raw_statement(xml: &str) -> Result<RawStatement> {
    let doc = Document::parse(xml)?;
    let statement = locate_statement(doc.root_element())?;

    let performance = extract_table(child_element(statement, PERFORMANCE_SUMMARY)?);
    let cash_transactions = extract_table(child_element(statement, CASH_TRANSACTIONS)?);
    debug!(
        performance_rows = performance.len(),
        cash_rows = cash_transactions.len(),
        "extracted statement tables"
    );

    Ok(RawStatement {
        account_id: statement.attribute("accountId").map(str::to_string),
        from_date: statement.attribute("fromDate").map(str::to_string),
        to_date: statement.attribute("toDate").map(str::to_string),
        performance,
        cash_transactions,
    })
}

fn locate_statement<'a, 'input>(root: Node<'a, 'input>) -> Result<Node<'a, 'input>> {
    let statements = child_element(root, FLEX_STATEMENTS)?;
    let mut found = statements
        .children()
        .filter(|child| child.has_tag_name(FLEX_STATEMENT));
    let first = found
        .next()
        .ok_or_else(|| FlexError::MissingElement(FLEX_STATEMENT.to_string()))?;

    let ignored = found.count();
    if ignored > 0 {
        warn!(ignored, "document holds several statements, summarizing the first");
    }
    Ok(first)
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Result<Node<'a, 'input>> {
    node.children()
        .find(|child| child.has_tag_name(name))
        .ok_or_else(|| FlexError::MissingElement(name.to_string()))
}
