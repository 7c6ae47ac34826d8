//! Statements that read the server catalog. Every user-supplied name is
//! bound as a parameter, never interpolated.

use crate::query::{
    ast::{
        common::TableRef,
        expr::{BinaryOperator, Expr},
        select::Select,
    },
    column,
    dialect::ClickHouse,
    renderer::Statement,
    value,
};
use model::core::value::Value;

fn eq_param(name: &str, val: &str) -> Expr {
    Expr::binary(
        column(None, name),
        BinaryOperator::Eq,
        value(Value::from(val)),
    )
}

pub fn list_tables(database: &str) -> Statement {
    let select = Select {
        columns: vec![column(None, "name")],
        from: Some(TableRef::new("system", "tables")),
        where_clause: Some(eq_param("database", database)),
        order_by: vec![column(None, "name")],
        ..Default::default()
    };
    Statement::render(&select, &ClickHouse)
}

pub fn table_exists(database: &str, table: &str) -> Statement {
    let select = Select {
        columns: vec![column(None, "name")],
        from: Some(TableRef::new("system", "tables")),
        where_clause: Expr::and_all(vec![
            eq_param("database", database),
            eq_param("name", table),
        ]),
        limit: Some(1),
        ..Default::default()
    };
    Statement::render(&select, &ClickHouse)
}

pub fn list_columns(database: &str, table: &str) -> Statement {
    let select = Select {
        columns: vec![column(None, "name"), column(None, "type")],
        from: Some(TableRef::new("system", "columns")),
        where_clause: Expr::and_all(vec![
            eq_param("database", database),
            eq_param("table", table),
        ]),
        order_by: vec![column(None, "position")],
        ..Default::default()
    };
    Statement::render(&select, &ClickHouse)
}
