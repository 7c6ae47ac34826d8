use crate::file::csv::error::FileError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvSettings {
    pub delimiter: u8,
}

impl CsvSettings {
    /// Builds settings from a user-supplied delimiter, which must be exactly
    /// one ASCII character. `\t` is accepted as a spelling of the tab character.
    pub fn new(delimiter: &str) -> Result<Self, FileError> {
        if delimiter == "\\t" {
            return Ok(CsvSettings { delimiter: b'\t' });
        }

        let mut chars = delimiter.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii() && c != '\n' && c != '\r' && c != '"' => {
                Ok(CsvSettings {
                    delimiter: c as u8,
                })
            }
            _ => Err(FileError::InvalidDelimiter(delimiter.to_string())),
        }
    }

    pub fn reader_builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true);
        builder
    }
}

impl Default for CsvSettings {
    fn default() -> Self {
        CsvSettings { delimiter: b',' }
    }
}
