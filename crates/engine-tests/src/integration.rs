#[cfg(test)]
mod tests {
    use crate::{
        memory::MemoryWarehouse,
        utils::{TEST_DATABASE, columns, numbered_csv, read_csv, row, strings, write_csv},
    };
    use connectors::{
        file::csv::settings::CsvSettings,
        warehouse::adapter::Warehouse,
    };
    use engine_core::{catalog::CatalogSnapshot, error::ValidationError};
    use engine_processing::{
        error::{ErrorKind, LoadError, TransferError},
        export::{ExportRequest, JoinExportRequest, export_join, export_table, preview_table},
        import::{ImportRequest, import_csv},
        outcome::TransferOutcome,
    };
    use model::core::{data_type::TypeTag, identifiers::Selection, value::Value};
    use tempfile::tempdir;
    use tokio_util::sync::CancellationToken;
    use tracing_test::traced_test;

    fn create_request(path: std::path::PathBuf, table: &str, selection: &[&str]) -> ImportRequest {
        let mut request = ImportRequest::new(path, table, Selection::new(selection.iter().copied()));
        request.create_table = true;
        request
    }

    // Scenario: CSV with a punctuated header imported into a table that does not exist,
    // with table creation requested.
    // Expected Outcome:
    // - The table is created with sanitized names and inferred types.
    // - Rows are keyed by the sanitized names and keep the CSV values.
    #[traced_test]
    #[tokio::test]
    async fn tc01() {
        let dir = tempdir().unwrap();
        let path = write_csv(&dir, "payments.csv", "User Name,Amount\nAlice,10\nBob,-3\n");
        let warehouse = MemoryWarehouse::new(TEST_DATABASE);

        let summary = import_csv(
            &warehouse,
            &create_request(path, "payments", &["User Name", "Amount"]),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert!(summary.created);
        assert_eq!(summary.rows_inserted, 2);

        let table = warehouse.table("payments").unwrap();
        assert_eq!(
            table.columns,
            columns(&[("User_Name", TypeTag::String), ("Amount", TypeTag::Int64)])
        );
        assert_eq!(
            table.rows,
            vec![
                row(&[("User_Name", Value::from("Alice")), ("Amount", Value::from("10"))]),
                row(&[("User_Name", Value::from("Bob")), ("Amount", Value::from("-3"))]),
            ]
        );

        let create = warehouse
            .queries()
            .into_iter()
            .find(|q| q.sql.starts_with("CREATE TABLE"))
            .unwrap();
        assert_eq!(
            create.sql,
            "CREATE TABLE `default`.`payments` (`User_Name` String, `Amount` Int64) \
             ENGINE = MergeTree() ORDER BY tuple()"
        );
    }

    // Scenario: 23 rows imported with the default batch size.
    // Expected Outcome: three batches of 10, 10 and 3 rows; 23 rows reported and stored.
    #[traced_test]
    #[tokio::test]
    async fn tc02() {
        let dir = tempdir().unwrap();
        let warehouse = MemoryWarehouse::new(TEST_DATABASE);

        let summary = import_csv(
            &warehouse,
            &create_request(numbered_csv(&dir, 23), "numbers", &["id", "label"]),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(summary.batches, vec![10, 10, 3]);
        assert_eq!(summary.rows_inserted, 23);
        assert_eq!(warehouse.table("numbers").unwrap().rows.len(), 23);
        assert!(logs_contain("Inserting batch"));
    }

    // Scenario: the 15th of 23 rows is rejected by the warehouse.
    // Expected Outcome:
    // - The import fails with a row error naming row 15 in batch 2.
    // - 14 rows are reported as inserted and remain in the table.
    #[traced_test]
    #[tokio::test]
    async fn tc03() {
        let dir = tempdir().unwrap();
        let warehouse = MemoryWarehouse::new(TEST_DATABASE).failing_insert_at(15);

        let err = import_csv(
            &warehouse,
            &create_request(numbered_csv(&dir, 23), "numbers", &["id", "label"]),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Row);
        assert_eq!(err.partial_count(), Some(14));
        match &err {
            TransferError::Load(LoadError::Row {
                row_number,
                batch,
                row,
                ..
            }) => {
                assert_eq!(*row_number, 15);
                assert_eq!(*batch, 2);
                assert_eq!(row.get_value("id"), Value::from("15"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(warehouse.table("numbers").unwrap().rows.len(), 14);

        let outcome = TransferOutcome::failure(&err);
        assert!(!outcome.success);
        assert_eq!(outcome.count, Some(14));
    }

    // Scenario: two selected columns sanitize to the same identifier.
    // Expected Outcome: a validation error naming both columns; no table is created.
    #[traced_test]
    #[tokio::test]
    async fn tc04() {
        let dir = tempdir().unwrap();
        let path = write_csv(&dir, "clash.csv", "a-b,a.b\n1,2\n");
        let warehouse = MemoryWarehouse::new(TEST_DATABASE);

        let err = import_csv(
            &warehouse,
            &create_request(path, "clash", &["a-b", "a.b"]),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            TransferError::Validation(ValidationError::NameCollision { .. })
        ));
        assert!(err.to_string().contains("'a-b' and 'a.b'"));
        assert!(warehouse.table("clash").is_none());
        assert!(!warehouse.calls().iter().any(|c| c.starts_with("create_table")));
    }

    // Scenario: the destination table already exists and creation is requested.
    // Expected Outcome: creation is skipped and the selected names are used verbatim.
    #[traced_test]
    #[tokio::test]
    async fn tc05() {
        let dir = tempdir().unwrap();
        let path = write_csv(&dir, "people.csv", "name,age,city\nAda,36,London\n");
        let warehouse = MemoryWarehouse::new(TEST_DATABASE).with_table(
            "people",
            columns(&[("age", TypeTag::Int64), ("name", TypeTag::String)]),
            Vec::new(),
        );

        let summary = import_csv(
            &warehouse,
            &create_request(path, "people", &["age", "name"]),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert!(!summary.created);
        assert!(!warehouse.calls().iter().any(|c| c.starts_with("create_table")));
        assert_eq!(
            warehouse.table("people").unwrap().rows,
            vec![row(&[("age", Value::from("36")), ("name", Value::from("Ada"))])]
        );
    }

    // Scenario: importing into an existing table a column it does not have.
    // Expected Outcome: a validation error before any row is written.
    #[traced_test]
    #[tokio::test]
    async fn tc06() {
        let dir = tempdir().unwrap();
        let path = write_csv(&dir, "people.csv", "name,city\nAda,London\n");
        let warehouse = MemoryWarehouse::new(TEST_DATABASE).with_table(
            "people",
            columns(&[("name", TypeTag::String)]),
            Vec::new(),
        );

        let mut request = ImportRequest::new(path, "people", Selection::new(["name", "city"]));
        request.create_table = false;
        let err = import_csv(&warehouse, &request, &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Column 'city' does not exist in table 'people'"
        );
        assert!(warehouse.table("people").unwrap().rows.is_empty());
        assert!(!warehouse.calls().iter().any(|c| c.starts_with("insert")));
    }

    // Scenario: the table does not exist and creation is not requested.
    // Expected Outcome: a validation error for the unknown table.
    #[traced_test]
    #[tokio::test]
    async fn tc07() {
        let dir = tempdir().unwrap();
        let warehouse = MemoryWarehouse::new(TEST_DATABASE);
        let request = ImportRequest::new(numbered_csv(&dir, 3), "missing", Selection::new(["id"]));

        let err = import_csv(&warehouse, &request, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TransferError::Validation(ValidationError::UnknownTable { .. })
        ));
    }

    // Scenario: CSV with a header but no data rows, and a CSV path that does not exist.
    // Expected Outcome: an empty-file validation error and a file-not-found error;
    // neither reaches the destination table.
    #[traced_test]
    #[tokio::test]
    async fn tc08() {
        let dir = tempdir().unwrap();
        let path = write_csv(&dir, "empty.csv", "id,label\n");
        let warehouse = MemoryWarehouse::new(TEST_DATABASE);

        let err = import_csv(
            &warehouse,
            &create_request(path, "t", &["id"]),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "CSV file is empty");
        assert_eq!(warehouse.calls(), vec!["ping".to_string()]);

        let missing = dir.path().join("nope.csv");
        let err = import_csv(
            &warehouse,
            &create_request(missing, "t", &["id"]),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileNotFound);
        assert_eq!(warehouse.calls().len(), 1);
    }

    // Scenario: the warehouse refuses the connection.
    // Expected Outcome: a connection error and no attempt to create or insert.
    #[traced_test]
    #[tokio::test]
    async fn tc09() {
        let dir = tempdir().unwrap();
        let warehouse = MemoryWarehouse::new(TEST_DATABASE).unreachable();

        let err = import_csv(
            &warehouse,
            &create_request(numbered_csv(&dir, 3), "t", &["id"]),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Connection);
        assert_eq!(warehouse.calls(), vec!["ping".to_string()]);
    }

    // Scenario: three tables joined with a single condition.
    // Expected Outcome: a validation error stating that 2 conditions are required,
    // raised before the warehouse is contacted.
    #[traced_test]
    #[tokio::test]
    async fn tc10() {
        let dir = tempdir().unwrap();
        let warehouse = MemoryWarehouse::new(TEST_DATABASE);
        let request = JoinExportRequest {
            tables: strings(&["users", "orders", "items"]),
            conditions: strings(&["users.id = orders.user_id"]),
            selection: Selection::new(["users.email"]),
            limit: None,
            output: dir.path().join("out.csv"),
            settings: CsvSettings::default(),
        };

        let err = export_join(&warehouse, &request).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Not enough join conditions provided. Need 2 but got 1"
        );
        assert!(warehouse.calls().is_empty());
        assert!(!request.output.exists());
    }

    // Scenario: single-table export with table-qualified selected names.
    // Expected Outcome: the query strips the prefixes and the CSV header keeps them.
    #[traced_test]
    #[tokio::test]
    async fn tc11() {
        let dir = tempdir().unwrap();
        let warehouse = MemoryWarehouse::new(TEST_DATABASE).with_table(
            "t",
            columns(&[("id", TypeTag::Int64), ("name", TypeTag::String)]),
            Vec::new(),
        );
        warehouse.push_result(vec![
            row(&[("id", Value::Int(1)), ("name", Value::from("a"))]),
            row(&[("id", Value::Int(2)), ("name", Value::Null)]),
        ]);

        let request = ExportRequest {
            table: "t".into(),
            selection: Selection::new(["t.id", "t.name"]),
            limit: Some(50),
            output: dir.path().join("exports/t.csv"),
            settings: CsvSettings::default(),
        };
        let summary = export_table(&warehouse, &request).await.unwrap();

        assert_eq!(summary.rows, 2);
        assert_eq!(
            warehouse.queries().last().unwrap().sql,
            "SELECT `id`, `name` FROM `default`.`t` LIMIT 50"
        );

        let (headers, rows) = read_csv(&summary.file_path);
        assert_eq!(headers, strings(&["t.id", "t.name"]));
        assert_eq!(rows[0].get_value("t.name"), Value::from("a"));
        assert_eq!(rows[1].get_value("t.name"), Value::Null);
    }

    // Scenario: export a table to CSV and import the file into a new table.
    // Expected Outcome: the new table holds the same values, as strings.
    #[traced_test]
    #[tokio::test]
    async fn tc12() {
        let dir = tempdir().unwrap();
        let source_rows = vec![
            row(&[("id", Value::Int(7)), ("score", Value::Float(1.5)), ("note", Value::from("x, y"))]),
            row(&[("id", Value::Int(8)), ("score", Value::Float(-2.0)), ("note", Value::from("z"))]),
        ];
        let warehouse = MemoryWarehouse::new(TEST_DATABASE).with_table(
            "src",
            columns(&[
                ("id", TypeTag::Int64),
                ("score", TypeTag::Float64),
                ("note", TypeTag::String),
            ]),
            source_rows.clone(),
        );
        warehouse.push_result(source_rows.clone());

        let export = ExportRequest {
            table: "src".into(),
            selection: Selection::new(["id", "score", "note"]),
            limit: None,
            output: dir.path().join("src.csv"),
            settings: CsvSettings::default(),
        };
        let summary = export_table(&warehouse, &export).await.unwrap();

        let import = create_request(summary.file_path, "copy", &["id", "score", "note"]);
        import_csv(&warehouse, &import, &CancellationToken::new())
            .await
            .unwrap();

        let copy = warehouse.table("copy").unwrap();
        assert_eq!(
            copy.columns,
            columns(&[
                ("id", TypeTag::Int64),
                ("score", TypeTag::Float64),
                ("note", TypeTag::String),
            ])
        );
        for (original, copied) in source_rows.iter().zip(&copy.rows) {
            for name in ["id", "score", "note"] {
                assert_eq!(
                    original.get_value(name).to_csv_field(),
                    copied.get_value(name).to_csv_field()
                );
            }
        }
    }

    // Scenario: join export with a single table.
    // Expected Outcome: the plain table export runs; no JOIN is issued.
    #[traced_test]
    #[tokio::test]
    async fn tc13() {
        let dir = tempdir().unwrap();
        let warehouse = MemoryWarehouse::new(TEST_DATABASE).with_table(
            "users",
            columns(&[("id", TypeTag::Int64)]),
            Vec::new(),
        );
        warehouse.push_result(vec![row(&[("id", Value::Int(1))])]);

        let request = JoinExportRequest {
            tables: strings(&["users"]),
            conditions: Vec::new(),
            selection: Selection::new(["users.id"]),
            limit: None,
            output: dir.path().join("users.csv"),
            settings: CsvSettings::default(),
        };
        let summary = export_join(&warehouse, &request).await.unwrap();

        assert_eq!(summary.rows, 1);
        let queries = warehouse.queries();
        let sql = &queries.last().unwrap().sql;
        assert_eq!(sql, "SELECT `id` FROM `default`.`users`");
    }

    // Scenario: two tables joined on one condition, result keys partly unqualified.
    // Expected Outcome: an ALL LEFT JOIN query; every CSV header is a selected name.
    #[traced_test]
    #[tokio::test]
    async fn tc14() {
        let dir = tempdir().unwrap();
        let warehouse = MemoryWarehouse::new(TEST_DATABASE)
            .with_table(
                "users",
                columns(&[("id", TypeTag::Int64), ("email", TypeTag::String)]),
                Vec::new(),
            )
            .with_table(
                "orders",
                columns(&[("user_id", TypeTag::Int64), ("total", TypeTag::Float64)]),
                Vec::new(),
            );
        warehouse.push_result(vec![
            row(&[("email", Value::from("a@x.io")), ("orders.total", Value::Float(9.5))]),
            row(&[("email", Value::from("b@x.io")), ("orders.total", Value::Null)]),
        ]);

        let request = JoinExportRequest {
            tables: strings(&["users", "orders"]),
            conditions: strings(&["users.id = orders.user_id"]),
            selection: Selection::new(["users.email", "orders.total"]),
            limit: Some(10),
            output: dir.path().join("joined.csv"),
            settings: CsvSettings::new(";").unwrap(),
        };
        let summary = export_join(&warehouse, &request).await.unwrap();

        assert_eq!(
            warehouse.queries().last().unwrap().sql,
            "SELECT `users`.`email`, `orders`.`total` FROM `default`.`users` \
             ALL LEFT JOIN `default`.`orders` ON `users`.`id` = `orders`.`user_id` LIMIT 10"
        );

        let content = std::fs::read_to_string(&summary.file_path).unwrap();
        assert_eq!(
            content,
            "users.email;orders.total\na@x.io;9.5\nb@x.io;\n"
        );
    }

    // Scenario: preview of a table where a result key matches no selected name.
    // Expected Outcome: matching keys use the selected name, others are prefixed with the table.
    #[traced_test]
    #[tokio::test]
    async fn tc15() {
        let warehouse = MemoryWarehouse::new(TEST_DATABASE).with_table(
            "events",
            columns(&[("id", TypeTag::Int64), ("ts", TypeTag::DateTime)]),
            Vec::new(),
        );
        warehouse.push_result(vec![row(&[
            ("id", Value::Int(1)),
            ("ts", Value::from("2024-01-01 00:00:00")),
            ("extra", Value::Int(0)),
        ])]);

        let rows = preview_table(
            &warehouse,
            "events",
            &Selection::new(["events.id", "ts"]),
            100,
        )
        .await
        .unwrap();

        assert_eq!(
            rows[0].names().collect::<Vec<_>>(),
            vec!["events.id", "ts", "events.extra"]
        );
        assert!(warehouse.queries().last().unwrap().sql.ends_with("LIMIT 100"));
    }

    // Scenario: the load is cancelled before the first batch.
    // Expected Outcome: a cancellation error with zero rows committed.
    #[traced_test]
    #[tokio::test]
    async fn tc16() {
        let dir = tempdir().unwrap();
        let warehouse = MemoryWarehouse::new(TEST_DATABASE);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = import_csv(
            &warehouse,
            &create_request(numbered_csv(&dir, 5), "numbers", &["id"]),
            &cancel,
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert_eq!(err.partial_count(), Some(0));
        assert!(warehouse.table("numbers").unwrap().rows.is_empty());
    }

    // Scenario: the warehouse rejects the CREATE TABLE statement.
    // Expected Outcome: a schema error and no rows written.
    #[traced_test]
    #[tokio::test]
    async fn tc17() {
        let dir = tempdir().unwrap();
        let warehouse = MemoryWarehouse::new(TEST_DATABASE).rejecting_create();

        let err = import_csv(
            &warehouse,
            &create_request(numbered_csv(&dir, 5), "numbers", &["id"]),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Schema);
        assert!(!warehouse.calls().iter().any(|c| c.starts_with("insert")));
    }

    // Scenario: catalog snapshot over a warehouse holding two tables.
    // Expected Outcome: only the requested, existing tables have their columns loaded.
    #[traced_test]
    #[tokio::test]
    async fn tc18() {
        let warehouse = MemoryWarehouse::new(TEST_DATABASE)
            .with_table("a", columns(&[("x", TypeTag::String)]), Vec::new())
            .with_table("b", columns(&[("y", TypeTag::String)]), Vec::new());

        let catalog = CatalogSnapshot::load(&warehouse, TEST_DATABASE, &strings(&["a", "zzz"]))
            .await
            .unwrap();

        assert!(catalog.has_column("a", "x"));
        assert!(catalog.has_table("b"));
        assert!(catalog.columns("b").is_none());
        assert!(catalog.require_table("zzz").is_err());
        assert_eq!(warehouse.database(), TEST_DATABASE);
    }
}
