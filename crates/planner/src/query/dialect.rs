//! Defines the `Dialect` trait for database-specific SQL syntax.

use model::core::{data_type::TypeTag, value::Value};

pub trait Dialect: Send + Sync {
    /// Wraps an identifier (like a table or column name) in the correct
    /// quotation marks for the dialect, escaping anything that could close
    /// the quote early.
    fn quote_identifier(&self, ident: &str) -> String;

    /// Returns the placeholder for a named, server-side bound parameter.
    fn get_placeholder(&self, name: &str, value: &Value) -> String;

    /// Renders a `TypeTag` into a database-specific SQL type string.
    fn render_data_type(&self, data_type: &TypeTag) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ClickHouse;

impl Dialect for ClickHouse {
    fn quote_identifier(&self, ident: &str) -> String {
        let mut quoted = String::with_capacity(ident.len() + 2);
        quoted.push('`');
        for ch in ident.chars() {
            if ch == '`' || ch == '\\' {
                quoted.push('\\');
            }
            quoted.push(ch);
        }
        quoted.push('`');
        quoted
    }

    fn get_placeholder(&self, name: &str, value: &Value) -> String {
        let ty = match value {
            Value::Null => "Nullable(String)",
            Value::Boolean(_) => "Bool",
            Value::Int(_) => "Int64",
            Value::Float(_) => "Float64",
            Value::String(_) => "String",
        };
        format!("{{{name}:{ty}}}")
    }

    fn render_data_type(&self, data_type: &TypeTag) -> String {
        data_type.clickhouse_name().to_string()
    }
}
