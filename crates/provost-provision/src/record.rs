//! Bulk-load input records.
//!
//! One [`InputRecord`] is one data row of the source CSV: an ordered list of
//! `(column, value)` pairs where a blank or absent cell is `None`. Missing
//! is deliberately distinct from the empty string; downstream dispatch only
//! ever sees populated values.

use std::fs;
use std::path::Path;

use crate::error::ProvisionResult;

/// UTF-8 byte order mark, stripped before parsing.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// A single parsed input row.
#[derive(Debug, Clone)]
pub struct InputRecord {
    /// 1-based line number in the source file (header = 1, first row = 2).
    line_number: u64,
    fields: Vec<(String, Option<String>)>,
}

impl InputRecord {
    /// Builds a record from already-split pairs. Blank values become `None`.
    #[must_use]
    pub fn from_pairs<I, K, V>(line_number: u64, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: Into<String>,
        V: Into<String>,
    {
        let fields = pairs
            .into_iter()
            .map(|(column, value)| {
                let value = value
                    .map(Into::into)
                    .map(|v: String| v.trim().to_string())
                    .filter(|v| !v.is_empty());
                (column.into(), value)
            })
            .collect();
        Self {
            line_number,
            fields,
        }
    }

    /// Line this row came from in the source file.
    #[must_use]
    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    /// Populated value of a column, if the column exists and is non-blank.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, value)| value.as_deref())
    }

    /// All fields in source-column order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }
}

/// Reads every data row of the bulk-load file.
///
/// The header row names the columns; cells that are empty after trimming
/// are recorded as missing. Short rows are tolerated, the absent trailing
/// columns simply have no value.
///
/// # Errors
///
/// Fails on unreadable files and on malformed CSV.
pub fn read_records(path: &Path) -> ProvisionResult<Vec<InputRecord>> {
    let raw = fs::read(path)?;
    let data = raw.strip_prefix(UTF8_BOM).unwrap_or(&raw);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let row = result?;
        let line_number = (idx + 2) as u64;
        let pairs = headers
            .iter()
            .enumerate()
            .map(|(col, name)| (name.clone(), row.get(col).map(str::to_string)));
        records.push(InputRecord::from_pairs(line_number, pairs));
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file
    }

    #[test]
    fn test_read_records_basic() {
        let file = write_temp(b"firstName,lastName,companyAbbreviation\nJane,Roe,ACME\n");
        let records = read_records(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].line_number(), 2);
        assert_eq!(records[0].get("firstName"), Some("Jane"));
        assert_eq!(records[0].get("companyAbbreviation"), Some("ACME"));
    }

    #[test]
    fn test_blank_cell_is_missing() {
        let file = write_temp(b"firstName,lastName,manager\nJane,Roe,\n");
        let records = read_records(file.path()).unwrap();
        assert_eq!(records[0].get("manager"), None);
    }

    #[test]
    fn test_whitespace_only_cell_is_missing() {
        let file = write_temp(b"firstName,notes\nJane,   \n");
        let records = read_records(file.path()).unwrap();
        assert_eq!(records[0].get("notes"), None);
    }

    #[test]
    fn test_short_row_missing_trailing_columns() {
        let file = write_temp(b"firstName,lastName,department\nJane,Roe\n");
        let records = read_records(file.path()).unwrap();
        assert_eq!(records[0].get("lastName"), Some("Roe"));
        assert_eq!(records[0].get("department"), None);
    }

    #[test]
    fn test_bom_is_stripped() {
        let mut contents = UTF8_BOM.to_vec();
        contents.extend_from_slice(b"firstName,lastName\nJane,Roe\n");
        let file = write_temp(&contents);
        let records = read_records(file.path()).unwrap();
        assert_eq!(records[0].get("firstName"), Some("Jane"));
    }

    #[test]
    fn test_fields_preserve_column_order() {
        let file = write_temp(b"b,a,c\n1,2,3\n");
        let records = read_records(file.path()).unwrap();
        let names: Vec<&str> = records[0].fields().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }
}
