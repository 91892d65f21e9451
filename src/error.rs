//! Error types for the rosterload import pipeline.
//!
//! This module defines a hierarchy of error types, one per concern:
//!
//! - [`CsvError`] - CSV structure and decoding errors
//! - [`DateError`] - date parsing errors
//! - [`StoreError`] - record store errors
//! - [`ImportError`] - top-level import orchestration errors
//! - [`ServerError`] - HTTP server errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// CSV Errors
// =============================================================================

/// Errors affecting the CSV file as a whole.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read the upload.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to decode the uploaded bytes.
    #[error("Failed to decode file content: {0}")]
    EncodingError(String),

    /// Empty file.
    #[error("CSV file is empty or invalid")]
    EmptyFile,

    /// Header line missing or blank.
    #[error("CSV file has no header line")]
    NoHeaders,
}

// =============================================================================
// Date Errors
// =============================================================================

/// Errors from the multi-format date parser.
///
/// Blank input is deliberately distinct from input that matched no format;
/// callers may report them differently.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
    /// The input was blank after trimming.
    #[error("Date cannot be empty")]
    Empty,

    /// The input matched none of the accepted formats.
    #[error("Invalid date format: {0}")]
    InvalidFormat(String),
}

// =============================================================================
// Store Errors
// =============================================================================

/// Errors from the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique constraint on the payroll number rejected an insert.
    #[error("Payroll number '{0}' already exists")]
    Duplicate(String),

    /// No record with the requested id.
    #[error("Record {0} not found")]
    NotFound(i64),

    /// An update raced a concurrent modification and could not be applied.
    #[error("Concurrent update conflict on record {0}")]
    Conflict(i64),

    /// Underlying database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

// =============================================================================
// Import Errors (top-level)
// =============================================================================

/// Structural failures that abort a whole import.
///
/// Row-level problems never appear here; they are collected into the
/// [`crate::import::ImportOutcome`] message list instead.
#[derive(Debug, Error)]
pub enum ImportError {
    /// No file was provided, or the upload was empty.
    #[error("Please select a valid file")]
    NoFile,

    /// The filename does not end in `.csv`.
    #[error("Please upload a CSV file only")]
    NotCsv,

    /// CSV structure error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Store error outside row processing.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Import error.
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Store error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for date parsing.
pub type DateResult<T> = Result<T, DateError>;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
