//! CSV export of the full training history.
//!
//! # Responsibility
//! - Encode already-fetched view rows as CSV bytes.
//! - Produce the dated download file name.
//!
//! # Invariants
//! - The header row is exactly `Date/Time, Exercise, Weight (kg), Reps`.
//! - Encoding is a pure function of its input; repeated calls over the
//!   same rows produce identical bytes.

use crate::model::log::LogEntryView;
use csv::Writer;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;

/// Column headers of the exported file, in output order.
pub const CSV_HEADER: [&str; 4] = ["Date/Time", "Exercise", "Weight (kg)", "Reps"];

pub type ExportResult<T> = Result<T, ExportError>;

/// Export-layer error for CSV encoding and sink flushing.
#[derive(Debug)]
pub enum ExportError {
    Csv(csv::Error),
    Io(std::io::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Csv(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<csv::Error> for ExportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Writes the header row plus one record per view row into `sink`.
pub fn write_csv<W: Write>(rows: &[LogEntryView], sink: W) -> ExportResult<()> {
    let mut writer = Writer::from_writer(sink);
    writer.write_record(CSV_HEADER)?;

    for row in rows {
        let weight = row.weight.to_string();
        let reps = row.reps.to_string();
        writer.write_record([
            row.timestamp.as_str(),
            row.exercise_name.as_str(),
            weight.as_str(),
            reps.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Builds the download file name for a compact `YYYYMMDD` date.
pub fn file_name_for_date(compact_date: &str) -> String {
    format!("training_log_{compact_date}.csv")
}
