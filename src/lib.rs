//! # Rosterload - personnel roster with CSV bulk import
//!
//! Rosterload manages a roster of personnel records: list them, edit them
//! individually, and bulk-import them from uploaded CSV files with
//! line-level success/failure reporting.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV Upload │────▶│   Parser    │────▶│   Import    │────▶│ RecordStore │
//! │ (any enc.)  │     │ (quote scan)│     │ (row fold)  │     │  (SQLite)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rosterload::{import_bytes, RecordStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = RecordStore::new("sqlite:roster.db").await.unwrap();
//!     let bytes = std::fs::read("people.csv").unwrap();
//!     let outcome = import_bytes(&store, "people.csv", &bytes).await.unwrap();
//!     println!("{}", outcome.summary());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain models (PersonnelRecord, NewPersonnelRecord)
//! - [`parser`] - CSV line parsing with encoding auto-detection
//! - [`dates`] - Multi-format strict date parsing
//! - [`store`] - SQLite record store
//! - [`import`] - The CSV import pipeline
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod dates;
pub mod parser;

// Persistence
pub mod store;

// Import pipeline
pub mod import;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{CsvError, DateError, ImportError, ServerError, StoreError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{NewPersonnelRecord, PersonnelRecord};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use dates::parse_date;
pub use parser::{column_value, decode_bytes, detect_encoding, header_map, split_line};

// =============================================================================
// Re-exports - Store
// =============================================================================

pub use store::{RecordStore, DEFAULT_DATABASE_URL};

// =============================================================================
// Re-exports - Import pipeline
// =============================================================================

pub use import::{import_bytes, import_file, ImportOutcome, MAX_SHOWN_MESSAGES};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{error_response, ImportResponse};

// Server
pub mod server {
    pub use crate::api::server::start_server;
}
