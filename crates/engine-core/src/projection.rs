//! Re-keying of rows between source names and destination names.

use crate::sanitize::NameMapping;
use model::{
    core::identifiers::{ColumnRef, Selection},
    records::row::{FieldValue, RowData},
};

/// Projects parsed CSV rows onto the destination columns of an import.
///
/// With a mapping (the create path) each destination column is read from its
/// original name; without one the destination name is read directly.
#[derive(Debug, Clone, Copy)]
pub struct ImportProjector<'a> {
    columns: &'a [String],
    mapping: Option<&'a NameMapping>,
}

impl<'a> ImportProjector<'a> {
    pub fn new(columns: &'a [String], mapping: Option<&'a NameMapping>) -> Self {
        ImportProjector { columns, mapping }
    }

    /// A new row keyed exactly by the destination columns, in order.
    /// Fields absent from `row` become null.
    pub fn project(&self, row: &RowData) -> RowData {
        let fields = self
            .columns
            .iter()
            .map(|column| {
                let source = self
                    .mapping
                    .and_then(|m| m.original(column))
                    .unwrap_or(column.as_str());
                FieldValue::new(column.clone(), row.get_value(source))
            })
            .collect();
        RowData::new(fields)
    }

    pub fn project_all(&self, rows: &[RowData]) -> Vec<RowData> {
        rows.iter().map(|row| self.project(row)).collect()
    }
}

/// Name used for a result key that matches no selected column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback<'a> {
    /// Keep the key as returned.
    Raw,
    /// Prefix the key with this table name.
    Qualify(&'a str),
}

/// Re-keys warehouse result rows by the names the user selected.
#[derive(Debug, Clone, Copy)]
pub struct ExportProjector<'a> {
    selection: &'a Selection,
    fallback: Fallback<'a>,
}

impl<'a> ExportProjector<'a> {
    pub fn new(selection: &'a Selection, fallback: Fallback<'a>) -> Self {
        ExportProjector {
            selection,
            fallback,
        }
    }

    /// The selected name a result key corresponds to.
    ///
    /// A qualified key only matches the identical selected name. An unqualified
    /// key matches a selected name equal to it or whose column part equals it.
    pub fn resolve_key(&self, key: &str) -> String {
        self.resolve_unclaimed(key, &[])
    }

    fn resolve_unclaimed(&self, key: &str, claimed: &[&str]) -> String {
        let key_is_qualified = ColumnRef::parse(key).is_qualified();
        let found = self
            .selection
            .iter()
            .filter(|selected| !claimed.contains(selected))
            .find(|selected| {
                if key_is_qualified {
                    *selected == key
                } else {
                    *selected == key || ColumnRef::parse(selected).column == key
                }
            });

        match (found, self.fallback) {
            (Some(selected), _) => selected.to_string(),
            (None, Fallback::Raw) => key.to_string(),
            (None, Fallback::Qualify(table)) => format!("{table}.{key}"),
        }
    }

    /// Keys equal to a selected name claim it first, so a suffix match never
    /// lands on a name another field of the same row already carries.
    pub fn project(&self, row: &RowData) -> RowData {
        let claimed: Vec<&str> = row
            .names()
            .filter(|name| self.selection.contains(name))
            .collect();

        RowData::new(
            row.field_values
                .iter()
                .map(|f| {
                    let name = if self.selection.contains(&f.name) {
                        f.name.clone()
                    } else {
                        self.resolve_unclaimed(&f.name, &claimed)
                    };
                    FieldValue::new(name, f.value.clone())
                })
                .collect(),
        )
    }

    pub fn project_all(&self, rows: &[RowData]) -> Vec<RowData> {
        rows.iter().map(|row| self.project(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::core::value::Value;

    fn csv_row() -> RowData {
        RowData::from_pairs([
            ("User Name", Value::from("Alice")),
            ("Amount", Value::from("10")),
            ("Ignored", Value::from("x")),
        ])
    }

    #[test]
    fn test_import_with_mapping_reads_original_names() {
        let selection = Selection::new(["User Name", "Amount"]);
        let mapping = NameMapping::build(&selection).unwrap();
        let columns = vec!["User_Name".to_string(), "Amount".to_string()];

        let projected = ImportProjector::new(&columns, Some(&mapping)).project(&csv_row());
        assert_eq!(
            projected,
            RowData::from_pairs([
                ("User_Name", Value::from("Alice")),
                ("Amount", Value::from("10")),
            ])
        );
    }

    #[test]
    fn test_import_without_mapping_reads_verbatim() {
        let columns = vec!["Amount".to_string(), "Missing".to_string()];
        let projected = ImportProjector::new(&columns, None).project(&csv_row());
        assert_eq!(projected.names().collect::<Vec<_>>(), vec!["Amount", "Missing"]);
        assert_eq!(projected.get_value("Missing"), Value::Null);
    }

    #[test]
    fn test_export_requalifies_keys() {
        let selection = Selection::new(["t.id", "t.name"]);
        let row = RowData::from_pairs([("id", Value::Int(1)), ("name", Value::from("a"))]);
        let projected = ExportProjector::new(&selection, Fallback::Raw).project(&row);
        assert_eq!(projected.names().collect::<Vec<_>>(), vec!["t.id", "t.name"]);
    }

    #[test]
    fn test_export_qualified_key_needs_exact_match() {
        let selection = Selection::new(["users.id", "orders.total"]);
        let projector = ExportProjector::new(&selection, Fallback::Raw);
        assert_eq!(projector.resolve_key("id"), "users.id");
        assert_eq!(projector.resolve_key("orders.total"), "orders.total");
        assert_eq!(projector.resolve_key("orders.id"), "orders.id");
        assert_eq!(projector.resolve_key("extra"), "extra");
    }

    #[test]
    fn test_export_preview_fallback_qualifies() {
        let selection = Selection::new(["id"]);
        let projector = ExportProjector::new(&selection, Fallback::Qualify("events"));
        assert_eq!(projector.resolve_key("id"), "id");
        assert_eq!(projector.resolve_key("ts"), "events.ts");
    }

    #[test]
    fn test_export_shared_suffix_keeps_both_columns() {
        let selection = Selection::new(["orders.id", "users.id"]);
        let row = RowData::from_pairs([("orders.id", Value::Int(7)), ("id", Value::Int(1))]);
        let projected = ExportProjector::new(&selection, Fallback::Raw).project(&row);
        assert_eq!(
            projected.names().collect::<Vec<_>>(),
            vec!["orders.id", "users.id"]
        );
        assert_eq!(projected.get_value("users.id"), Value::Int(1));
    }
}
