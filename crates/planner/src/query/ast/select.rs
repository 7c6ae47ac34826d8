//! Defines the Abstract Syntax Tree (AST) for a SELECT query.

use crate::query::ast::{
    common::{JoinKind, TableRef},
    expr::Expr,
};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Select {
    /// The list of columns or expressions to be returned.
    pub columns: Vec<Expr>,

    /// The primary table for the query.
    pub from: Option<TableRef>,

    /// A list of JOIN clauses, applied in order.
    pub joins: Vec<JoinClause>,

    /// The WHERE clause condition.
    pub where_clause: Option<Expr>,

    /// The ORDER BY clause, by column expression.
    pub order_by: Vec<Expr>,

    /// The LIMIT clause.
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub kind: JoinKind,
    pub table: TableRef,
    /// The join condition, e.g., `ON users.id = posts.user_id`.
    pub on: Expr,
}
