use crate::file::csv::{error::FileError, settings::CsvSettings};
use model::records::row::RowData;
use std::path::Path;
use tracing::debug;

/// Writes `rows` to `path`, one column per entry of `headers`, in that order.
///
/// Cells are looked up by header name; fields a row lacks are written empty.
/// Returns the number of data rows written.
pub fn write_all(
    path: &Path,
    rows: &[RowData],
    headers: &[String],
    settings: CsvSettings,
) -> Result<usize, FileError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(settings.delimiter)
        .from_path(path)?;

    writer.write_record(headers)?;
    for row in rows {
        let record = headers.iter().map(|h| {
            row.value(h)
                .map(|v| v.to_csv_field())
                .unwrap_or_default()
        });
        writer.write_record(record)?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = rows.len(), "Wrote CSV file");
    Ok(rows.len())
}
