//! CSV ingest.
//!
//! Turns a customer survey export into a lazy stream of [`CustomerRecord`]s.
//!
//! Design goals:
//! - **Strict schema**: required columns are checked against the header before any
//!   row is read (clear errors + exit code 2)
//! - **Row-level faults** are reported per row; the batch processor decides what to do
//! - **Separation of concerns**: no classification logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::CustomerRecord;
use crate::error::{ProfileError, RowFault};

/// Column aliases accepted for each required field (matched case-insensitively).
const NAME_COLUMNS: &[&str] = &["name"];
const EMAIL_COLUMNS: &[&str] = &["username", "email"];
const CONTACT_COLUMNS: &[&str] = &["contact no", "contact", "phone"];
const SCORE_COLUMNS: &[&str] = &["total score", "score"];

/// Resolved column indices for the required fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub name: usize,
    pub email: usize,
    pub contact: usize,
    pub score: usize,
}

impl ColumnMap {
    /// Resolve required columns from a header row.
    pub fn from_headers(headers: &StringRecord) -> Result<Self, ProfileError> {
        let header_map = build_header_map(headers);
        Ok(Self {
            name: resolve_column(&header_map, NAME_COLUMNS, "Name")?,
            email: resolve_column(&header_map, EMAIL_COLUMNS, "Username")?,
            contact: resolve_column(&header_map, CONTACT_COLUMNS, "Contact No")?,
            score: resolve_column(&header_map, SCORE_COLUMNS, "Total score")?,
        })
    }
}

/// Lazy reader over customer rows.
///
/// Yields one item per data row; faults do not stop iteration.
pub struct CustomerReader<R: Read> {
    records: csv::StringRecordsIntoIter<R>,
    columns: ColumnMap,
}

impl<R: Read> CustomerReader<R> {
    /// Wrap a reader, consuming and validating its header row.
    pub fn new(rdr: R) -> Result<Self, ProfileError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(rdr);

        let headers = reader
            .headers()
            .map_err(|e| ProfileError::io("Failed to read CSV headers", csv_to_io(e)))?
            .clone();

        let columns = ColumnMap::from_headers(&headers)?;

        Ok(Self {
            records: reader.into_records(),
            columns,
        })
    }
}

impl<R: Read> Iterator for CustomerReader<R> {
    type Item = Result<CustomerRecord, RowFault>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.records.next()?;
        Some(match result {
            Ok(record) => parse_row(&record, &self.columns),
            Err(e) => Err(RowFault::Csv(e.to_string())),
        })
    }
}

/// Open a customer CSV on disk.
pub fn open_customer_csv(path: &Path) -> Result<CustomerReader<File>, ProfileError> {
    if !path.exists() || path.is_dir() {
        return Err(ProfileError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path)
        .map_err(|e| ProfileError::io(format!("Failed to open CSV '{}'", path.display()), e))?;

    CustomerReader::new(file)
}

fn parse_row(record: &StringRecord, columns: &ColumnMap) -> Result<CustomerRecord, RowFault> {
    let name = get_required(record, columns.name, "Name")?;
    let email = get_required(record, columns.email, "Username")?;
    let contact = get_required(record, columns.contact, "Contact No")?;
    let raw_score = get_required(record, columns.score, "Total score")?;

    if raw_score.is_empty() {
        return Err(RowFault::EmptyScore);
    }

    Ok(CustomerRecord {
        name: name.to_string(),
        email: email.to_string(),
        contact: contact.to_string(),
        raw_score: raw_score.to_string(),
    })
}

/// A cell that exists but is blank is fine here; a cell missing from a short
/// row is a fault.
fn get_required<'a>(record: &'a StringRecord, idx: usize, name: &'static str) -> Result<&'a str, RowFault> {
    record
        .get(idx)
        .map(str::trim)
        .ok_or(RowFault::MissingField(name))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        // First occurrence wins for duplicated headers.
        map.entry(normalize_header_name(name)).or_insert(idx);
    }
    map
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, schema validation will incorrectly
    // report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}').trim();
    name.to_ascii_lowercase()
}

fn resolve_column(
    header_map: &HashMap<String, usize>,
    aliases: &[&str],
    column: &'static str,
) -> Result<usize, ProfileError> {
    aliases
        .iter()
        .find_map(|alias| header_map.get(*alias).copied())
        .ok_or(ProfileError::MissingColumn { column })
}

fn csv_to_io(err: csv::Error) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidData, err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(input: &str) -> Vec<Result<CustomerRecord, RowFault>> {
        CustomerReader::new(input.as_bytes()).unwrap().collect()
    }

    #[test]
    fn reads_rows_in_order() {
        let rows = read_all(
            "Name,Username,Contact No,Total score\n\
             Alice,alice@x.com,555-1234,27 pts\n\
             Bob,bob@x.com,555-9876,5\n",
        );
        assert_eq!(rows.len(), 2);
        let alice = rows[0].as_ref().unwrap();
        assert_eq!(alice.name, "Alice");
        assert_eq!(alice.email, "alice@x.com");
        assert_eq!(alice.contact, "555-1234");
        assert_eq!(alice.raw_score, "27 pts");
        assert_eq!(rows[1].as_ref().unwrap().name, "Bob");
    }

    #[test]
    fn headers_match_case_insensitively_with_bom_and_aliases() {
        let rows = read_all(
            "\u{feff}NAME, email ,Phone,SCORE\n\
             Carol,carol@x.com,1,12\n",
        );
        let carol = rows[0].as_ref().unwrap();
        assert_eq!(carol.email, "carol@x.com");
        assert_eq!(carol.raw_score, "12");
    }

    #[test]
    fn extra_columns_are_ignored() {
        let rows = read_all(
            "Timestamp,Name,Username,Contact No,Q1,Total score\n\
             2024-01-01,Dan,dan@x.com,2,yes,33 (Aggressive)\n",
        );
        let dan = rows[0].as_ref().unwrap();
        assert_eq!(dan.name, "Dan");
        assert_eq!(dan.raw_score, "33 (Aggressive)");
    }

    #[test]
    fn missing_header_column_fails_up_front() {
        let err = CustomerReader::new("Name,Username,Contact No\nA,a,1\n".as_bytes())
            .err()
            .unwrap();
        assert!(matches!(err, ProfileError::MissingColumn { column: "Total score" }));
    }

    #[test]
    fn short_row_is_a_missing_field() {
        let rows = read_all(
            "Name,Username,Contact No,Total score\n\
             Eve,eve@x.com,3\n",
        );
        assert_eq!(rows[0], Err(RowFault::MissingField("Total score")));
    }

    #[test]
    fn blank_score_is_a_fault_but_blank_name_is_not() {
        let rows = read_all(
            "Name,Username,Contact No,Total score\n\
             Fay,fay@x.com,4,\n\
             ,anon@x.com,5,8\n",
        );
        assert_eq!(rows[0], Err(RowFault::EmptyScore));
        assert_eq!(rows[1].as_ref().unwrap().name, "");
    }

    #[test]
    fn padded_score_cells_are_trimmed() {
        let rows = read_all(
            "Name,Username,Contact No,Total score\n\
             Gus,gus@x.com,6,  42 pts \n",
        );
        let gus = rows[0].as_ref().unwrap();
        assert_eq!(gus.raw_score, "42 pts");
        assert_eq!(crate::classify::parse_score(&gus.raw_score), 42);
    }

    #[test]
    fn open_reports_missing_file() {
        let err = open_customer_csv(Path::new("definitely/not/here.csv")).err().unwrap();
        assert!(matches!(err, ProfileError::InputNotFound { .. }));
    }
}
