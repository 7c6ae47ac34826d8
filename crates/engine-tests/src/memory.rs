//! In-memory `Warehouse` used by the end-to-end scenarios.

use async_trait::async_trait;
use connectors::warehouse::{adapter::Warehouse, error::DbError};
use model::{
    core::{column::ColumnDescriptor, value::Value},
    records::row::RowData,
};
use planner::query::{
    ast::{common::TableRef, create_table::CreateTable},
    dialect::ClickHouse,
    renderer::Statement,
};
use std::{
    collections::{BTreeMap, VecDeque},
    sync::Mutex,
};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryTable {
    pub columns: Vec<ColumnDescriptor>,
    pub rows: Vec<RowData>,
}

#[derive(Debug, Default)]
struct State {
    tables: BTreeMap<String, MemoryTable>,
    results: VecDeque<Vec<RowData>>,
    calls: Vec<String>,
    queries: Vec<Statement>,
    inserts_attempted: usize,
}

/// A single-database warehouse held in memory.
///
/// Queries other than `SELECT 1` are answered from results queued with
/// [`MemoryWarehouse::push_result`], in order.
#[derive(Debug)]
pub struct MemoryWarehouse {
    database: String,
    state: Mutex<State>,
    /// 1-based insert attempt that is rejected.
    fail_insert_at: Option<usize>,
    reject_create: bool,
    unreachable: bool,
}

impl MemoryWarehouse {
    pub fn new(database: &str) -> Self {
        MemoryWarehouse {
            database: database.to_string(),
            state: Mutex::new(State::default()),
            fail_insert_at: None,
            reject_create: false,
            unreachable: false,
        }
    }

    pub fn with_table(self, name: &str, columns: Vec<ColumnDescriptor>, rows: Vec<RowData>) -> Self {
        self.lock()
            .tables
            .insert(name.to_string(), MemoryTable { columns, rows });
        self
    }

    pub fn failing_insert_at(mut self, attempt: usize) -> Self {
        self.fail_insert_at = Some(attempt);
        self
    }

    pub fn rejecting_create(mut self) -> Self {
        self.reject_create = true;
        self
    }

    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    pub fn push_result(&self, rows: Vec<RowData>) {
        self.lock().results.push_back(rows);
    }

    pub fn table(&self, name: &str) -> Option<MemoryTable> {
        self.lock().tables.get(name).cloned()
    }

    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// SQL of every statement sent through `execute_query` or `create_table`.
    pub fn queries(&self) -> Vec<Statement> {
        self.lock().queries.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn enter(&self, call: String) -> Result<std::sync::MutexGuard<'_, State>, DbError> {
        debug!(call = %call, "Memory warehouse call");
        let mut state = self.lock();
        state.calls.push(call);
        if self.unreachable {
            return Err(DbError::Authentication("connection refused".into()));
        }
        Ok(state)
    }
}

#[async_trait]
impl Warehouse for MemoryWarehouse {
    fn database(&self) -> &str {
        &self.database
    }

    async fn ping(&self) -> Result<(), DbError> {
        drop(self.enter("ping".into())?);
        Ok(())
    }

    async fn execute_query(&self, statement: &Statement) -> Result<Vec<RowData>, DbError> {
        let mut state = self.enter(format!("query {}", statement.sql))?;
        state.queries.push(statement.clone());

        if statement.sql.trim() == "SELECT 1" {
            return Ok(vec![RowData::from_pairs([("1", Value::Int(1))])]);
        }
        Ok(state.results.pop_front().unwrap_or_default())
    }

    async fn create_table(&self, table: &CreateTable) -> Result<(), DbError> {
        let statement = Statement::render(table, &ClickHouse);
        let mut state = self.enter(format!("create_table {}", table.table.name))?;
        state.queries.push(statement);

        if self.reject_create {
            return Err(DbError::Server {
                status: 500,
                message: "Code: 44. DB::Exception: Cannot create table".into(),
            });
        }
        if state.tables.contains_key(&table.table.name) {
            return Err(DbError::Server {
                status: 500,
                message: format!("Table {} already exists", table.table.name),
            });
        }

        let columns = table
            .columns
            .iter()
            .map(|c| ColumnDescriptor::new(c.name.clone(), c.data_type))
            .collect();
        state.tables.insert(
            table.table.name.clone(),
            MemoryTable {
                columns,
                rows: Vec::new(),
            },
        );
        Ok(())
    }

    async fn insert_rows(&self, table: &TableRef, rows: &[RowData]) -> Result<(), DbError> {
        let mut state = self.enter(format!("insert {}", table.name))?;

        for row in rows {
            state.inserts_attempted += 1;
            if self.fail_insert_at == Some(state.inserts_attempted) {
                return Err(DbError::Server {
                    status: 400,
                    message: "Code: 27. DB::Exception: Cannot parse input".into(),
                });
            }

            let target = state.tables.get_mut(&table.name).ok_or_else(|| DbError::Server {
                status: 404,
                message: format!("Table {} doesn't exist", table.name),
            })?;
            if let Some(unknown) = row
                .names()
                .find(|name| !target.columns.iter().any(|c| c.name == *name))
            {
                return Err(DbError::Server {
                    status: 400,
                    message: format!("Unknown field found while parsing JSONEachRow format: {unknown}"),
                });
            }
            target.rows.push(row.clone());
        }
        Ok(())
    }

    async fn table_exists(&self, database: &str, table: &str) -> Result<bool, DbError> {
        let state = self.enter(format!("table_exists {database}.{table}"))?;
        Ok(database == self.database && state.tables.contains_key(table))
    }

    async fn list_tables(&self, database: &str) -> Result<Vec<String>, DbError> {
        let state = self.enter(format!("list_tables {database}"))?;
        if database != self.database {
            return Ok(Vec::new());
        }
        Ok(state.tables.keys().cloned().collect())
    }

    async fn list_columns(
        &self,
        database: &str,
        table: &str,
    ) -> Result<Vec<ColumnDescriptor>, DbError> {
        let state = self.enter(format!("list_columns {database}.{table}"))?;
        Ok(state
            .tables
            .get(table)
            .filter(|_| database == self.database)
            .map(|t| t.columns.clone())
            .unwrap_or_default())
    }
}
