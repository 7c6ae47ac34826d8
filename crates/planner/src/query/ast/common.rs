//! Defines common, reusable AST nodes for building SQL queries.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRef {
    pub database: Option<String>,
    pub name: String,
}

impl TableRef {
    pub fn new(database: &str, name: &str) -> Self {
        TableRef {
            database: Some(database.to_string()),
            name: name.to_string(),
        }
    }
}

/// Join strictness and direction.
///
/// `AllLeft` keeps every row of the left side, so unmatched anchor rows are
/// never dropped from an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    AllLeft,
    AllInner,
}
