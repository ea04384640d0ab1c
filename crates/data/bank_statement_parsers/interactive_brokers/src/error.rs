use thiserror::Error;

pub type Result<T> = std::result::Result<T, FlexError>;

#[derive(Debug, Error)]
pub enum FlexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parsing error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Missing element <{0}>")]
    MissingElement(String),

    #[error("Missing column '{column}' in {table} row {row}")]
    MissingColumn {
        table: &'static str,
        column: String,
        row: usize,
    },

    #[error("Invalid number '{value}' in column '{column}'")]
    InvalidNumber { column: String, value: String },

    #[error("Invalid date '{value}' in column '{column}'")]
    InvalidDate { column: String, value: String },

    #[error("Missing cash transaction category '{0}'")]
    MissingCategory(String),
}
