use connectors::file::csv::{adapter::CsvAdapter, settings::CsvSettings};
use model::{
    core::{column::ColumnDescriptor, data_type::TypeTag, value::Value},
    records::row::RowData,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const TEST_DATABASE: &str = "default";

/// Writes `content` to `name` inside `dir` and returns the path.
pub fn write_csv(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write csv fixture");
    path
}

/// A CSV with an `id` column counting from 1 to `rows`, and a `label` column.
pub fn numbered_csv(dir: &TempDir, rows: usize) -> PathBuf {
    let mut content = String::from("id,label\n");
    for i in 1..=rows {
        content.push_str(&format!("{i},row {i}\n"));
    }
    write_csv(dir, "numbered.csv", &content)
}

pub fn read_csv(path: &Path) -> (Vec<String>, Vec<RowData>) {
    let table = CsvAdapter::new(path, CsvSettings::default())
        .and_then(|a| a.read_all())
        .expect("read csv output");
    (table.headers, table.rows)
}

pub fn columns(defs: &[(&str, TypeTag)]) -> Vec<ColumnDescriptor> {
    defs.iter()
        .map(|(name, ty)| ColumnDescriptor::new(*name, *ty))
        .collect()
}

pub fn row(pairs: &[(&str, Value)]) -> RowData {
    RowData::from_pairs(pairs.iter().map(|(k, v)| (*k, v.clone())))
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
