//! CSV import pipeline for personnel records.
//!
//! The pipeline takes a filename and the uploaded bytes, applies zero or
//! more inserts to the [`RecordStore`], and returns an [`ImportOutcome`]
//! with imported/skipped counts and ordered per-line messages.
//!
//! Only structural problems abort the whole import: an empty upload, a
//! non-`.csv` filename, or a missing header line. Everything that goes
//! wrong on a single row is converted into a line message and the batch
//! carries on with the next row.

use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::dates::parse_date;
use crate::error::{CsvError, ImportError, ImportResult, StoreError};
use crate::models::NewPersonnelRecord;
use crate::parser::{column_value, decode_bytes, header_map, split_line};
use crate::store::RecordStore;

/// Column names of the CSV import contract.
pub mod columns {
    pub const PAYROLL_NUMBER: &str = "Personnel_Records.Payroll_Number";
    pub const FORENAMES: &str = "Personnel_Records.Forenames";
    pub const SURNAME: &str = "Personnel_Records.Surname";
    pub const DATE_OF_BIRTH: &str = "Personnel_Records.Date_of_Birth";
    pub const TELEPHONE: &str = "Personnel_Records.Telephone";
    pub const MOBILE: &str = "Personnel_Records.Mobile";
    pub const ADDRESS: &str = "Personnel_Records.Address";
    pub const ADDRESS_2: &str = "Personnel_Records.Address_2";
    pub const POSTCODE: &str = "Personnel_Records.Postcode";
    pub const EMAIL_HOME: &str = "Personnel_Records.EMail_Home";
    pub const START_DATE: &str = "Personnel_Records.Start_Date";
}

/// How many line messages are surfaced verbatim before the rest collapse
/// into a count.
pub const MAX_SHOWN_MESSAGES: usize = 10;

// =============================================================================
// Import Outcome
// =============================================================================

/// Result of a completed import: counts plus ordered per-line messages.
///
/// This is an explicit return value; the pipeline carries no out-of-band
/// state, so any presentation layer can render it however it likes.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    /// Rows inserted.
    pub imported: usize,
    /// Rows skipped as duplicates.
    pub skipped: usize,
    /// Per-line messages, in file order.
    pub messages: Vec<String>,
}

impl ImportOutcome {
    /// Batch summary line.
    pub fn summary(&self) -> String {
        let mut message = format!("Successfully imported {} record(s).", self.imported);
        if self.skipped > 0 {
            message.push_str(&format!(" {} duplicate(s) skipped.", self.skipped));
        }
        message
    }

    /// Line messages capped at [`MAX_SHOWN_MESSAGES`], with an overflow
    /// count appended when more exist. `None` when the batch was clean.
    pub fn issues(&self) -> Option<String> {
        if self.messages.is_empty() {
            return None;
        }

        let mut text = String::from("Some issues occurred:\n");
        text.push_str(
            &self
                .messages
                .iter()
                .take(MAX_SHOWN_MESSAGES)
                .cloned()
                .collect::<Vec<_>>()
                .join("\n"),
        );
        if self.messages.len() > MAX_SHOWN_MESSAGES {
            text.push_str(&format!(
                "\n... and {} more errors.",
                self.messages.len() - MAX_SHOWN_MESSAGES
            ));
        }
        Some(text)
    }
}

/// What happened to one data row.
enum RowStatus {
    Imported,
    Duplicate(String),
}

// =============================================================================
// Pipeline entry points
// =============================================================================

/// Import a CSV file from disk. CLI convenience wrapper around
/// [`import_bytes`].
pub async fn import_file(store: &RecordStore, path: &Path) -> ImportResult<ImportOutcome> {
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();
    let bytes = tokio::fs::read(path).await.map_err(CsvError::IoError)?;
    import_bytes(store, &file_name, &bytes).await
}

/// Import uploaded CSV bytes.
///
/// Rows are processed strictly in file order, one store round-trip per
/// existence check and insert. A partially-completed import leaves
/// already-inserted rows committed.
pub async fn import_bytes(
    store: &RecordStore,
    file_name: &str,
    bytes: &[u8],
) -> ImportResult<ImportOutcome> {
    if bytes.is_empty() {
        return Err(ImportError::NoFile);
    }
    if !file_name.to_lowercase().ends_with(".csv") {
        return Err(ImportError::NotCsv);
    }

    let content = decode_bytes(bytes)?;
    let mut lines = content.lines();

    let header_line = lines.next().ok_or(CsvError::EmptyFile)?;
    let map = header_map(header_line)?;
    // Count from the raw header line: duplicate header names collapse in
    // the map but still occupy a column.
    let header_count = split_line(header_line).len();

    let mut outcome = ImportOutcome::default();

    // Header is line 1; data starts at 2.
    for (idx, line) in lines.enumerate() {
        let line_number = idx + 2;

        if line.trim().is_empty() {
            continue;
        }

        match process_row(store, line, header_count, &map).await {
            Ok(RowStatus::Imported) => outcome.imported += 1,
            Ok(RowStatus::Duplicate(payroll)) => {
                outcome.skipped += 1;
                outcome.messages.push(format!(
                    "Line {}: Payroll Number '{}' already exists - skipped.",
                    line_number, payroll
                ));
            }
            Err(message) => {
                outcome
                    .messages
                    .push(format!("Line {}: {}", line_number, message));
            }
        }
    }

    info!(
        file = file_name,
        imported = outcome.imported,
        skipped = outcome.skipped,
        issues = outcome.messages.len(),
        "import finished"
    );

    Ok(outcome)
}

/// Process one data row: parse, validate, deduplicate, insert.
///
/// Every failure path returns a message instead of aborting the batch; the
/// caller attaches the line number.
async fn process_row(
    store: &RecordStore,
    line: &str,
    header_count: usize,
    map: &HashMap<String, usize>,
) -> Result<RowStatus, String> {
    let values = split_line(line);
    if values.len() < header_count {
        return Err("Insufficient columns".to_string());
    }

    let candidate = build_candidate(&values, map).map_err(|e| e.to_string())?;

    if !candidate.is_complete() {
        return Err("Invalid or incomplete data".to_string());
    }

    let exists = store
        .exists_by_payroll_number(&candidate.payroll_number)
        .await
        .map_err(|e| e.to_string())?;
    if exists {
        return Ok(RowStatus::Duplicate(candidate.payroll_number));
    }

    match store.insert(&candidate).await {
        Ok(_) => Ok(RowStatus::Imported),
        // Lost the race between check and insert; the unique index is the
        // final word, and the loser is reported as a duplicate line.
        Err(StoreError::Duplicate(payroll)) => Ok(RowStatus::Duplicate(payroll)),
        Err(e) => Err(e.to_string()),
    }
}

/// Build a candidate record from named columns. Missing columns map to the
/// empty string; date columns must parse.
fn build_candidate(
    values: &[String],
    map: &HashMap<String, usize>,
) -> crate::error::DateResult<NewPersonnelRecord> {
    Ok(NewPersonnelRecord {
        payroll_number: column_value(values, map, columns::PAYROLL_NUMBER),
        forenames: column_value(values, map, columns::FORENAMES),
        surname: column_value(values, map, columns::SURNAME),
        date_of_birth: parse_date(&column_value(values, map, columns::DATE_OF_BIRTH))?,
        start_date: parse_date(&column_value(values, map, columns::START_DATE))?,
        telephone: column_value(values, map, columns::TELEPHONE),
        mobile: column_value(values, map, columns::MOBILE),
        address: column_value(values, map, columns::ADDRESS),
        address2: column_value(values, map, columns::ADDRESS_2),
        postcode: column_value(values, map, columns::POSTCODE),
        email_home: column_value(values, map, columns::EMAIL_HOME),
    })
}

// =============================================================================
// Tests
// =============================================================================
