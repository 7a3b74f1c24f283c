//! Export portfolio rows to CSV.
//!
//! Output is written to a temporary sibling file and renamed into place, so a
//! failed run never leaves a truncated destination behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::PortfolioRecord;
use crate::error::ProfileError;

pub const OUTPUT_HEADERS: [&str; 4] = ["Name", "Email", "Contact No", "Portfolio"];

/// Default output file name, relative to the working directory.
pub const DEFAULT_OUTPUT_FILE: &str = "customer_riskprofile_outcomes.csv";

/// Write portfolio rows to `path`, replacing it atomically.
pub fn write_portfolio_csv(path: &Path, records: &[PortfolioRecord]) -> Result<(), ProfileError> {
    let tmp = temp_path_for(path);

    let result = write_rows(fs::File::create(&tmp), &tmp, records).and_then(|()| {
        fs::rename(&tmp, path).map_err(|e| {
            ProfileError::io(format!("Failed to move output into place at '{}'", path.display()), e)
        })
    });

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

/// Render the same CSV bytes that [`write_portfolio_csv`] would write.
pub fn portfolio_csv_bytes(records: &[PortfolioRecord]) -> Result<Vec<u8>, ProfileError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    write_records(&mut writer, records)
        .map_err(|e| ProfileError::io("Failed to render output CSV", csv_to_io(e)))?;
    writer
        .into_inner()
        .map_err(|e| ProfileError::io("Failed to render output CSV", e.into_error()))
}

fn write_rows(
    file: std::io::Result<fs::File>,
    tmp: &Path,
    records: &[PortfolioRecord],
) -> Result<(), ProfileError> {
    let file = file.map_err(|e| ProfileError::io(format!("Failed to create output CSV '{}'", tmp.display()), e))?;

    let mut writer = csv::Writer::from_writer(file);
    write_records(&mut writer, records)
        .map_err(|e| ProfileError::io("Failed to write output CSV row", csv_to_io(e)))?;

    let mut file = writer
        .into_inner()
        .map_err(|e| ProfileError::io("Failed to flush output CSV", e.into_error()))?;
    file.flush()
        .and_then(|()| file.sync_all())
        .map_err(|e| ProfileError::io("Failed to flush output CSV", e))
}

fn write_records<W: Write>(writer: &mut csv::Writer<W>, records: &[PortfolioRecord]) -> csv::Result<()> {
    writer.write_record(OUTPUT_HEADERS)?;
    for r in records {
        writer.write_record([&r.name, &r.email, &r.contact, &r.portfolio])?;
    }
    writer.flush()?;
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| DEFAULT_OUTPUT_FILE.into());
    name.push(".tmp");
    path.with_file_name(name)
}

fn csv_to_io(err: csv::Error) -> std::io::Error {
    std::io::Error::other(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, portfolio: &str) -> PortfolioRecord {
        PortfolioRecord {
            name: name.to_string(),
            email: format!("{}@x.com", name.to_lowercase()),
            contact: "555".to_string(),
            portfolio: portfolio.to_string(),
        }
    }

    #[test]
    fn renders_header_and_rows() {
        let bytes = portfolio_csv_bytes(&[record("Alice", "moderate"), record("Zed", "")]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "Name,Email,Contact No,Portfolio\nAlice,alice@x.com,555,moderate\nZed,zed@x.com,555,\n"
        );
    }

    #[test]
    fn quotes_fields_containing_commas() {
        let mut r = record("Alice", "balanced");
        r.name = "Smith, Alice".to_string();
        let text = String::from_utf8(portfolio_csv_bytes(&[r]).unwrap()).unwrap();
        assert!(text.contains("\"Smith, Alice\""));
    }

    #[test]
    fn file_output_matches_in_memory_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let records = [record("Alice", "moderate")];

        write_portfolio_csv(&path, &records).unwrap();

        assert_eq!(fs::read(&path).unwrap(), portfolio_csv_bytes(&records).unwrap());
        assert!(!dir.path().join("out.csv.tmp").exists());
    }

    #[test]
    fn unwritable_destination_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("out.csv");
        let err = write_portfolio_csv(&path, &[record("Alice", "moderate")]).unwrap_err();
        assert!(matches!(err, ProfileError::Io { .. }));
    }
}
