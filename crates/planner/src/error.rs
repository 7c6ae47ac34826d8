use thiserror::Error;

/// Errors raised while building or validating SQL statements.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    /// A table or column name cannot be used as an identifier.
    #[error("Invalid identifier '{0}': {1}")]
    InvalidIdentifier(String, String),

    /// A join condition is not a conjunction of column equalities.
    #[error("Invalid join condition '{condition}': {reason}")]
    InvalidJoinCondition { condition: String, reason: String },
}
