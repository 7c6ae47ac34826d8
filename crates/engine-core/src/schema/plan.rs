use crate::{
    error::ValidationError,
    sanitize::{NameMapping, sanitize_identifier},
};
use model::core::{column::ColumnDescriptor, data_type::TypeTag, identifiers::Selection};
use planner::query::{
    ast::{
        common::TableRef,
        create_table::{ColumnDef, CreateTable, TableEngine},
    },
    ident::validate_identifier,
};
use std::collections::HashMap;
use tracing::debug;

/// Destination table layout derived from a CSV selection: sanitized column
/// names in selection order, each with its inferred type.
#[derive(Debug, Clone)]
pub struct SchemaPlan {
    table: TableRef,
    columns: Vec<ColumnDescriptor>,
    mapping: NameMapping,
}

impl SchemaPlan {
    /// Combines the selection, the inferred types (keyed by original name) and
    /// the sanitization mapping. Columns without an inferred type become `String`.
    pub fn new(
        table: TableRef,
        selection: &Selection,
        types: &HashMap<String, TypeTag>,
        mapping: NameMapping,
    ) -> Result<Self, ValidationError> {
        if selection.is_empty() {
            return Err(ValidationError::EmptySelection);
        }
        if let Some(database) = &table.database {
            validate_identifier(database)?;
        }
        validate_identifier(&table.name)?;

        let mut columns = Vec::with_capacity(selection.len());
        for original in selection.iter() {
            let name = mapping
                .sanitized(original)
                .map(str::to_string)
                .unwrap_or_else(|| sanitize_identifier(original));
            validate_identifier(&name)?;

            let data_type = types.get(original).copied().unwrap_or_default();
            debug!(column = %original, sanitized = %name, data_type = %data_type, "Planned column");
            columns.push(ColumnDescriptor::new(name, data_type));
        }

        Ok(SchemaPlan {
            table,
            columns,
            mapping,
        })
    }

    pub fn table(&self) -> &TableRef {
        &self.table
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn mapping(&self) -> &NameMapping {
        &self.mapping
    }

    /// The creation directive: no primary key, no sorting key.
    pub fn create_table(&self) -> CreateTable {
        CreateTable {
            table: self.table.clone(),
            columns: self
                .columns
                .iter()
                .map(|c| ColumnDef {
                    name: c.name.clone(),
                    data_type: c.data_type,
                })
                .collect(),
            engine: TableEngine::default(),
            if_not_exists: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner::query::{dialect::ClickHouse, renderer::Statement};

    #[test]
    fn test_plan_uses_sanitized_names_in_selection_order() {
        let selection = Selection::new(["User Name", "Amount"]);
        let types = HashMap::from([
            ("User Name".to_string(), TypeTag::String),
            ("Amount".to_string(), TypeTag::Int64),
        ]);
        let mapping = NameMapping::build(&selection).unwrap();
        let plan =
            SchemaPlan::new(TableRef::new("default", "payments"), &selection, &types, mapping)
                .unwrap();

        let layout: Vec<_> = plan
            .columns()
            .iter()
            .map(|c| (c.name.as_str(), c.data_type))
            .collect();
        assert_eq!(
            layout,
            vec![("User_Name", TypeTag::String), ("Amount", TypeTag::Int64)]
        );

        let sql = Statement::render(&plan.create_table(), &ClickHouse).sql;
        assert_eq!(
            sql,
            "CREATE TABLE `default`.`payments` (`User_Name` String, `Amount` Int64) \
             ENGINE = MergeTree() ORDER BY tuple()"
        );
    }

    #[test]
    fn test_missing_types_default_to_string() {
        let selection = Selection::new(["note"]);
        let mapping = NameMapping::build(&selection).unwrap();
        let plan = SchemaPlan::new(
            TableRef::new("default", "t"),
            &selection,
            &HashMap::new(),
            mapping,
        )
        .unwrap();
        assert_eq!(plan.columns()[0].data_type, TypeTag::String);
    }

    #[test]
    fn test_empty_selection_and_bad_table_name() {
        let empty = Selection::default();
        assert_eq!(
            SchemaPlan::new(
                TableRef::new("default", "t"),
                &empty,
                &HashMap::new(),
                NameMapping::default()
            )
            .unwrap_err(),
            ValidationError::EmptySelection
        );

        let selection = Selection::new(["a"]);
        let mapping = NameMapping::build(&selection).unwrap();
        assert!(matches!(
            SchemaPlan::new(TableRef::new("default", ""), &selection, &HashMap::new(), mapping),
            Err(ValidationError::Plan(_))
        ));
    }
}
