use planner::error::PlanError;
use thiserror::Error;

/// Problems with a request that are detected before the warehouse is modified.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No columns selected")]
    EmptySelection,

    #[error("Column '{0}' is selected more than once")]
    DuplicateColumn(String),

    #[error("Columns {names} both sanitize to '{sanitized}'", names = quoted(.originals))]
    NameCollision {
        sanitized: String,
        originals: Vec<String>,
    },

    #[error("CSV file is empty")]
    EmptyFile,

    #[error("Column '{0}' is not present in the CSV header")]
    MissingSourceColumn(String),

    #[error("Table '{database}.{table}' does not exist")]
    UnknownTable { database: String, table: String },

    #[error("Column '{column}' does not exist in table '{table}'")]
    UnknownColumn { table: String, column: String },

    #[error("No tables provided for join operation")]
    NoTables,

    #[error("Not enough join conditions provided. Need {required} but got {supplied}")]
    NotEnoughJoinConditions { required: usize, supplied: usize },

    #[error(transparent)]
    Plan(#[from] PlanError),
}

fn quoted(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("'{n}'"))
        .collect::<Vec<_>>()
        .join(" and ")
}
