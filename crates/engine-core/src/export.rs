//! SELECT construction for table exports, previews and join exports.

use crate::{catalog::CatalogSnapshot, error::ValidationError};
use model::core::identifiers::{ColumnRef, Selection};
use planner::query::{
    ast::{
        common::{JoinKind, TableRef},
        expr::Expr,
        select::{JoinClause, Select},
    },
    column,
    dialect::ClickHouse,
    join::parse_join_condition,
    renderer::Statement,
};

pub const DEFAULT_PREVIEW_LIMIT: u64 = 100;

/// Checks the table count against the number of join conditions supplied.
/// Blank conditions count as supplied here and are skipped when joining.
pub fn check_join_arity(tables: &[String], conditions: &[String]) -> Result<(), ValidationError> {
    if tables.is_empty() {
        return Err(ValidationError::NoTables);
    }
    let required = tables.len() - 1;
    if conditions.len() < required {
        return Err(ValidationError::NotEnoughJoinConditions {
            required,
            supplied: conditions.len(),
        });
    }
    Ok(())
}

/// `SELECT <cols> FROM <db>.<table> [LIMIT n]`, with every table prefix
/// stripped from the selected names.
pub fn table_query(
    catalog: &CatalogSnapshot,
    table: &str,
    selection: &Selection,
    limit: Option<u64>,
) -> Result<Statement, ValidationError> {
    require_selection(selection)?;
    catalog.require_table(table)?;

    let mut columns = Vec::with_capacity(selection.len());
    for name in selection.iter() {
        let col = ColumnRef::parse(name).column;
        catalog.require_column(table, col)?;
        columns.push(column(None, col));
    }

    Ok(render(Select {
        columns,
        from: Some(TableRef::new(catalog.database(), table)),
        limit,
        ..Default::default()
    }))
}

/// Like [`table_query`], but names prefixed with `table` itself keep the prefix.
pub fn preview_query(
    catalog: &CatalogSnapshot,
    table: &str,
    selection: &Selection,
    limit: u64,
) -> Result<Statement, ValidationError> {
    require_selection(selection)?;
    catalog.require_table(table)?;

    let mut columns = Vec::with_capacity(selection.len());
    for name in selection.iter() {
        let col = ColumnRef::parse(name);
        catalog.require_column(table, col.column)?;
        let prefix = col.belongs_to(table).then_some(table);
        columns.push(column(prefix, col.column));
    }

    Ok(render(Select {
        columns,
        from: Some(TableRef::new(catalog.database(), table)),
        limit: Some(limit),
        ..Default::default()
    }))
}

/// Anchors on the first table and appends one `ALL LEFT JOIN` per following
/// table whose condition is not blank.
///
/// Selected names qualified with a joined table keep the prefix; any other
/// prefix is dropped and the column must exist in one of the joined tables.
pub fn join_query(
    catalog: &CatalogSnapshot,
    tables: &[String],
    conditions: &[String],
    selection: &Selection,
    limit: Option<u64>,
) -> Result<Statement, ValidationError> {
    check_join_arity(tables, conditions)?;
    require_selection(selection)?;
    for table in tables {
        catalog.require_table(table)?;
    }

    let anchor = &tables[0];
    let mut joined: Vec<&str> = vec![anchor.as_str()];
    let mut pending = Vec::new();
    for (table, condition) in tables.iter().skip(1).zip(conditions) {
        if condition.trim().is_empty() {
            continue;
        }
        joined.push(table.as_str());
        pending.push((table, parse_join_condition(condition)?));
    }

    let mut joins = Vec::with_capacity(pending.len());
    for (table, on) in pending {
        require_columns(catalog, &joined, &on)?;
        joins.push(JoinClause {
            kind: JoinKind::AllLeft,
            table: TableRef::new(catalog.database(), table),
            on,
        });
    }

    let mut columns = Vec::with_capacity(selection.len());
    for name in selection.iter() {
        let col = ColumnRef::parse(name);
        match col.table.filter(|t| joined.contains(t)) {
            Some(table) => {
                catalog.require_column(table, col.column)?;
                columns.push(column(Some(table), col.column));
            }
            None => {
                catalog.require_column_in_any(&joined, col.column)?;
                columns.push(column(None, col.column));
            }
        }
    }

    Ok(render(Select {
        columns,
        from: Some(TableRef::new(catalog.database(), anchor)),
        joins,
        limit,
        ..Default::default()
    }))
}

fn require_selection(selection: &Selection) -> Result<(), ValidationError> {
    if selection.is_empty() {
        return Err(ValidationError::EmptySelection);
    }
    Ok(())
}

/// Every column referenced by a join condition must belong to a joined table.
fn require_columns(
    catalog: &CatalogSnapshot,
    joined: &[&str],
    condition: &Expr,
) -> Result<(), ValidationError> {
    for col in condition.columns() {
        match &col.table {
            Some(table) if joined.contains(&table.as_str()) => {
                catalog.require_column(table, &col.name)?
            }
            Some(table) => {
                return Err(ValidationError::UnknownTable {
                    database: catalog.database().to_string(),
                    table: table.clone(),
                });
            }
            None => catalog.require_column_in_any(joined, &col.name)?,
        }
    }
    Ok(())
}

fn render(select: Select) -> Statement {
    Statement::render(&select, &ClickHouse)
}
