use crate::file::csv::{error::FileError, settings::CsvSettings};
use model::{
    core::value::Value,
    records::row::{FieldValue, RowData},
};
use std::{
    collections::HashSet,
    fs::File,
    path::{Path, PathBuf},
};
use tracing::debug;

/// A CSV file loaded into memory: its header row and every data row.
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<RowData>,
}

impl CsvTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }
}

/// Reads delimited files. The whole file is buffered; there is no streaming.
#[derive(Debug, Clone)]
pub struct CsvAdapter {
    path: PathBuf,
    settings: CsvSettings,
}

impl CsvAdapter {
    pub fn new(path: impl AsRef<Path>, settings: CsvSettings) -> Result<Self, FileError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(FileError::NotFound(path.display().to_string()));
        }

        Ok(CsvAdapter {
            path: path.to_path_buf(),
            settings,
        })
    }

    pub fn read_headers(&self) -> Result<Vec<String>, FileError> {
        let mut reader = self.open()?;
        Self::headers_of(&mut reader)
    }

    pub fn read_all(&self) -> Result<CsvTable, FileError> {
        self.read(None)
    }

    /// Reads at most `limit` data rows.
    pub fn read_limit(&self, limit: usize) -> Result<CsvTable, FileError> {
        self.read(Some(limit))
    }

    fn read(&self, limit: Option<usize>) -> Result<CsvTable, FileError> {
        let mut reader = self.open()?;
        let headers = Self::headers_of(&mut reader)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            if limit.is_some_and(|l| rows.len() >= l) {
                break;
            }
            let record = record?;
            let fields = headers
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let value = match record.get(i) {
                        Some(cell) if !cell.is_empty() => Value::String(cell.to_string()),
                        _ => Value::Null,
                    };
                    FieldValue::new(name.clone(), value)
                })
                .collect();
            rows.push(RowData::new(fields));
        }

        debug!(
            path = %self.path.display(),
            columns = headers.len(),
            rows = rows.len(),
            "Read CSV file"
        );

        Ok(CsvTable { headers, rows })
    }

    fn open(&self) -> Result<csv::Reader<File>, FileError> {
        let file = File::open(&self.path)
            .map_err(|e| FileError::from_io(&self.path.display().to_string(), e))?;
        Ok(self.settings.reader_builder().from_reader(file))
    }

    fn headers_of(reader: &mut csv::Reader<File>) -> Result<Vec<String>, FileError> {
        let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();

        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(FileError::InvalidFormat("missing header row".into()));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = headers.iter().find(|h| !seen.insert(h.as_str())) {
            return Err(FileError::InvalidFormat(format!(
                "duplicate column '{dup}' in header row"
            )));
        }

        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_all_with_nulls_and_short_records() {
        let file = csv_file("User Name,Amount,Note\nAlice,10,\nBob,-3\n");
        let adapter = CsvAdapter::new(file.path(), CsvSettings::default()).unwrap();
        let table = adapter.read_all().unwrap();

        assert_eq!(table.headers, vec!["User Name", "Amount", "Note"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].get_value("User Name"), Value::from("Alice"));
        assert_eq!(table.rows[0].get_value("Note"), Value::Null);
        assert_eq!(table.rows[1].get_value("Amount"), Value::from("-3"));
        assert_eq!(table.rows[1].get_value("Note"), Value::Null);
    }

    #[test]
    fn test_custom_delimiter_and_limit() {
        let file = csv_file("a;b\n1;2\n3;4\n5;6\n");
        let adapter = CsvAdapter::new(file.path(), CsvSettings::new(";").unwrap()).unwrap();
        let table = adapter.read_limit(2).unwrap();

        assert_eq!(table.headers, vec!["a", "b"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].get_value("b"), Value::from("4"));
    }

    #[test]
    fn test_quoted_fields() {
        let file = csv_file("name,comment\n\"Smith, J\",\"said \"\"hi\"\"\"\n");
        let adapter = CsvAdapter::new(file.path(), CsvSettings::default()).unwrap();
        let table = adapter.read_all().unwrap();
        assert_eq!(table.rows[0].get_value("name"), Value::from("Smith, J"));
        assert_eq!(table.rows[0].get_value("comment"), Value::from("said \"hi\""));
    }

    #[test]
    fn test_missing_file() {
        let err = CsvAdapter::new("/definitely/not/here.csv", CsvSettings::default()).unwrap_err();
        assert!(matches!(err, FileError::NotFound(_)));
    }

    #[test]
    fn test_duplicate_headers_rejected() {
        let file = csv_file("id,id\n1,2\n");
        let adapter = CsvAdapter::new(file.path(), CsvSettings::default()).unwrap();
        assert!(matches!(
            adapter.read_headers(),
            Err(FileError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_headers_only_file_is_empty() {
        let file = csv_file("a,b\n");
        let adapter = CsvAdapter::new(file.path(), CsvSettings::default()).unwrap();
        let table = adapter.read_all().unwrap();
        assert!(table.is_empty());
        assert!(table.has_column("b"));
    }
}
