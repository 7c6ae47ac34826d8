//! ClickHouse over its HTTP interface.

use crate::warehouse::{
    adapter::Warehouse,
    config::{ConnectionConfig, Credentials},
    error::DbError,
};
use async_trait::async_trait;
use model::{core::column::ColumnDescriptor, records::row::RowData};
use planner::query::{
    ast::{
        common::TableRef,
        create_table::CreateTable,
        insert::{Insert, InsertFormat},
    },
    catalog,
    dialect::ClickHouse,
    renderer::Statement,
};
use reqwest::{RequestBuilder, StatusCode};
use std::time::Duration;
use tracing::{debug, info};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
pub struct ClickHouseAdapter {
    client: reqwest::Client,
    config: ConnectionConfig,
    base_url: String,
}

impl ClickHouseAdapter {
    pub fn connect(config: ConnectionConfig) -> Result<Self, DbError> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        info!(
            url = %config.base_url(),
            database = %config.database,
            "Configured ClickHouse connection"
        );

        Ok(ClickHouseAdapter {
            client,
            base_url: config.base_url(),
            config,
        })
    }

    fn request(&self) -> RequestBuilder {
        let builder = self.client.post(&self.base_url).query(&[
            ("database", self.config.database.as_str()),
            ("default_format", "JSONEachRow"),
            ("output_format_json_quote_64bit_integers", "0"),
        ]);

        match &self.config.credentials {
            Credentials::Anonymous => builder,
            Credentials::Password { username, password } => builder
                .header("X-ClickHouse-User", username)
                .header("X-ClickHouse-Key", password),
            Credentials::Bearer(token) => builder.bearer_auth(token),
        }
    }

    fn bind_params(builder: RequestBuilder, statement: &Statement) -> RequestBuilder {
        let params: Vec<(String, String)> = statement
            .params
            .iter()
            .map(|p| (format!("param_{}", p.name), p.encoded_value()))
            .collect();
        builder.query(&params)
    }

    async fn send(builder: RequestBuilder) -> Result<String, DbError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(body);
        }

        let message = body.trim().to_string();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(DbError::Authentication(message))
            }
            _ => Err(DbError::Server {
                status: status.as_u16(),
                message,
            }),
        }
    }

    /// Executes a statement that returns no rows.
    async fn execute(&self, statement: &Statement) -> Result<(), DbError> {
        debug!(sql = %statement.sql, "Executing statement");
        let builder = Self::bind_params(self.request(), statement).body(statement.sql.clone());
        Self::send(builder).await?;
        Ok(())
    }
}

/// Parses a `JSONEachRow` response body, one object per non-empty line.
pub fn parse_rows(body: &str) -> Result<Vec<RowData>, DbError> {
    body.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| match serde_json::from_str::<serde_json::Value>(line) {
            Ok(serde_json::Value::Object(object)) => Ok(RowData::from_json_object(object)),
            Ok(other) => Err(DbError::Decode(format!("expected a JSON object, got {other}"))),
            Err(e) => Err(DbError::Decode(e.to_string())),
        })
        .collect()
}

/// Serializes rows as a `JSONEachRow` request body.
pub fn encode_rows(rows: &[RowData]) -> Result<String, DbError> {
    let mut body = String::new();
    for row in rows {
        let line = serde_json::to_string(row).map_err(|e| DbError::Decode(e.to_string()))?;
        body.push_str(&line);
        body.push('\n');
    }
    Ok(body)
}

fn string_field(row: &RowData, field: &str) -> Result<String, DbError> {
    row.value(field)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| DbError::Decode(format!("catalog row is missing '{field}'")))
}

#[async_trait]
impl Warehouse for ClickHouseAdapter {
    fn database(&self) -> &str {
        &self.config.database
    }

    async fn ping(&self) -> Result<(), DbError> {
        self.execute_query(&Statement::raw("SELECT 1")).await?;
        Ok(())
    }

    async fn execute_query(&self, statement: &Statement) -> Result<Vec<RowData>, DbError> {
        debug!(sql = %statement.sql, params = statement.params.len(), "Running query");
        let builder = Self::bind_params(self.request(), statement).body(statement.sql.clone());
        let body = Self::send(builder).await?;
        parse_rows(&body)
    }

    async fn create_table(&self, table: &CreateTable) -> Result<(), DbError> {
        let statement = Statement::render(table, &ClickHouse);
        info!(table = %table.table.name, sql = %statement.sql, "Creating table");
        self.execute(&statement).await
    }

    async fn insert_rows(&self, table: &TableRef, rows: &[RowData]) -> Result<(), DbError> {
        let Some(first) = rows.first() else {
            return Ok(());
        };

        let insert = Insert {
            table: table.clone(),
            columns: first.names().map(str::to_string).collect(),
            format: InsertFormat::JsonEachRow,
        };
        let statement = Statement::render(&insert, &ClickHouse);

        let builder = self
            .request()
            .query(&[
                ("query", statement.sql.as_str()),
                ("date_time_input_format", "best_effort"),
            ])
            .body(encode_rows(rows)?);
        Self::send(builder).await?;
        Ok(())
    }

    async fn table_exists(&self, database: &str, table: &str) -> Result<bool, DbError> {
        let rows = self
            .execute_query(&catalog::table_exists(database, table))
            .await?;
        Ok(!rows.is_empty())
    }

    async fn list_tables(&self, database: &str) -> Result<Vec<String>, DbError> {
        let rows = self.execute_query(&catalog::list_tables(database)).await?;
        rows.iter().map(|row| string_field(row, "name")).collect()
    }

    async fn list_columns(
        &self,
        database: &str,
        table: &str,
    ) -> Result<Vec<ColumnDescriptor>, DbError> {
        let rows = self
            .execute_query(&catalog::list_columns(database, table))
            .await?;
        rows.iter()
            .map(|row| {
                Ok(ColumnDescriptor::from_catalog(
                    string_field(row, "name")?,
                    string_field(row, "type")?,
                ))
            })
            .collect()
    }
}
