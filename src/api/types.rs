//! REST API types for frontend integration.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::import::{ImportOutcome, MAX_SHOWN_MESSAGES};

/// Response sent after a CSV upload has been processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    /// "ok" when every row imported cleanly, "warning" when line messages
    /// were collected.
    pub status: String,

    /// Rows inserted.
    pub imported: usize,

    /// Rows skipped as duplicates.
    pub skipped: usize,

    /// Batch summary, e.g. "Successfully imported 3 record(s)."
    pub message: String,

    /// Per-line messages, capped at the first ten; a trailing entry counts
    /// the remainder.
    pub line_messages: Vec<String>,
}

impl From<ImportOutcome> for ImportResponse {
    fn from(outcome: ImportOutcome) -> Self {
        let mut line_messages: Vec<String> = outcome
            .messages
            .iter()
            .take(MAX_SHOWN_MESSAGES)
            .cloned()
            .collect();
        if outcome.messages.len() > MAX_SHOWN_MESSAGES {
            line_messages.push(format!(
                "... and {} more errors.",
                outcome.messages.len() - MAX_SHOWN_MESSAGES
            ));
        }

        ImportResponse {
            status: if outcome.messages.is_empty() { "ok" } else { "warning" }.to_string(),
            imported: outcome.imported,
            skipped: outcome.skipped,
            message: outcome.summary(),
            line_messages,
        }
    }
}

/// Create an error response body.
pub fn error_response(error: &str) -> Value {
    json!({
        "status": "error",
        "error": error,
    })
}
