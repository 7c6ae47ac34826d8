use crate::query::{
    ast::create_table::{ColumnDef, CreateTable, TableEngine},
    renderer::{Render, Renderer},
};

impl Render for CreateTable {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str("CREATE TABLE ");
        if self.if_not_exists {
            r.sql.push_str("IF NOT EXISTS ");
        }
        r.render_table_ref(&self.table);
        r.sql.push_str(" (");

        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                r.sql.push_str(", ");
            }
            col.render(r);
        }
        r.sql.push_str(") ");

        self.engine.render(r);
    }
}

impl Render for ColumnDef {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str(&r.dialect.quote_identifier(&self.name));
        r.sql.push(' ');
        r.sql.push_str(&r.dialect.render_data_type(&self.data_type));
    }
}

impl Render for TableEngine {
    fn render(&self, r: &mut Renderer) {
        match self {
            TableEngine::MergeTree { order_by } => {
                r.sql.push_str("ENGINE = MergeTree() ORDER BY ");
                if order_by.is_empty() {
                    r.sql.push_str("tuple()");
                    return;
                }
                let quoted: Vec<String> = order_by
                    .iter()
                    .map(|c| r.dialect.quote_identifier(c))
                    .collect();
                r.sql.push('(');
                r.sql.push_str(&quoted.join(", "));
                r.sql.push(')');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::query::{
        ast::{
            common::TableRef,
            create_table::{ColumnDef, CreateTable, TableEngine},
        },
        dialect::ClickHouse,
        renderer::Statement,
    };
    use model::core::data_type::TypeTag;

    fn columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef {
                name: "User_Name".to_string(),
                data_type: TypeTag::String,
            },
            ColumnDef {
                name: "Amount".to_string(),
                data_type: TypeTag::Int64,
            },
        ]
    }

    #[test]
    fn test_render_create_table_without_sorting_key() {
        let ast = CreateTable {
            table: TableRef::new("default", "payments"),
            columns: columns(),
            ..Default::default()
        };

        let stmt = Statement::render(&ast, &ClickHouse);
        assert_eq!(
            stmt.sql,
            "CREATE TABLE `default`.`payments` (`User_Name` String, `Amount` Int64) \
             ENGINE = MergeTree() ORDER BY tuple()"
        );
        assert!(stmt.params.is_empty());
    }

    #[test]
    fn test_render_create_table_with_sorting_key() {
        let ast = CreateTable {
            table: TableRef {
                database: None,
                name: "payments".into(),
            },
            columns: columns(),
            engine: TableEngine::MergeTree {
                order_by: vec!["Amount".to_string()],
            },
            if_not_exists: true,
        };

        let stmt = Statement::render(&ast, &ClickHouse);
        assert_eq!(
            stmt.sql,
            "CREATE TABLE IF NOT EXISTS `payments` (`User_Name` String, `Amount` Int64) \
             ENGINE = MergeTree() ORDER BY (`Amount`)"
        );
    }
}
