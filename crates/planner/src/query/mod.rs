use crate::query::ast::expr::{ColumnName, Expr};
use model::core::value::Value;

pub mod ast;
pub mod catalog;
pub mod dialect;
pub mod ident;
pub mod join;
pub mod renderer;

pub fn column(table: Option<&str>, name: &str) -> Expr {
    Expr::Column(ColumnName {
        table: table.map(str::to_string),
        name: name.to_string(),
    })
}

pub fn value(val: Value) -> Expr {
    Expr::Value(val)
}
