//! Defines the core rendering trait and context for converting AST to SQL.

use crate::query::{ast::common::TableRef, dialect::Dialect};
use model::core::value::Value;

pub mod create_table;
pub mod expr;
pub mod insert;
pub mod select;

/// A trait for any AST node that can be rendered into a SQL string.
pub trait Render {
    fn render(&self, renderer: &mut Renderer);
}

/// A named parameter bound on the server side.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParam {
    pub name: String,
    pub value: Value,
}

impl QueryParam {
    /// The value in the escaped text form the server parses parameters from.
    pub fn encoded_value(&self) -> String {
        match &self.value {
            Value::Null => "\\N".to_string(),
            Value::String(s) => {
                let mut out = String::with_capacity(s.len());
                for ch in s.chars() {
                    match ch {
                        '\\' => out.push_str("\\\\"),
                        '\t' => out.push_str("\\t"),
                        '\n' => out.push_str("\\n"),
                        '\r' => out.push_str("\\r"),
                        other => out.push(other),
                    }
                }
                out
            }
            other => other.to_string(),
        }
    }
}

/// A rendered statement together with the parameters it binds.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<QueryParam>,
}

impl Statement {
    pub fn raw(sql: impl Into<String>) -> Self {
        Statement {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    pub fn render<T: Render + ?Sized>(node: &T, dialect: &dyn Dialect) -> Self {
        let mut renderer = Renderer::new(dialect);
        node.render(&mut renderer);
        renderer.finish()
    }
}

/// A context that holds the state during the rendering process.
///
/// It accumulates the SQL string and the parameters, and provides
/// access to the dialect for syntax-specific details.
pub struct Renderer<'a> {
    pub sql: String,
    pub params: Vec<QueryParam>,
    pub dialect: &'a dyn Dialect,
}

impl<'a> Renderer<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self {
            sql: String::new(),
            params: Vec::new(),
            dialect,
        }
    }

    /// Consumes the renderer and returns the final statement.
    pub fn finish(self) -> Statement {
        Statement {
            sql: self.sql,
            params: self.params,
        }
    }

    pub fn add_param(&mut self, value: Value) {
        let name = format!("p{}", self.params.len());
        let placeholder = self.dialect.get_placeholder(&name, &value);
        self.sql.push_str(&placeholder);
        self.params.push(QueryParam { name, value });
    }

    pub fn render_table_ref(&mut self, table: &TableRef) {
        if let Some(database) = &table.database {
            self.sql.push_str(&self.dialect.quote_identifier(database));
            self.sql.push('.');
        }
        self.sql.push_str(&self.dialect.quote_identifier(&table.name));
    }
}
