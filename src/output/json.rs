//! JSON output formatter
//!
//! @module output/json

use super::{NamedPath, ViewFormatter};
use crate::explore::{Transaction, ViewSnapshot};
use crate::graph::model::ModelStats;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter with pretty printing
    pub fn new() -> Self {
        Self { pretty: true }
    }

    /// One document per line, for streaming command results
    pub fn compact() -> Self {
        Self { pretty: false }
    }

    fn to_json<T: serde::Serialize>(&self, value: &T) -> String {
        let encoded = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        encoded.unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewFormatter for JsonFormatter {
    fn format_view(&self, view: &ViewSnapshot) -> String {
        self.to_json(view)
    }

    fn format_stats(&self, stats: &ModelStats) -> String {
        self.to_json(stats)
    }

    fn format_paths(&self, paths: &[NamedPath]) -> String {
        self.to_json(&paths)
    }

    fn format_transaction(&self, transaction: &Transaction) -> String {
        self.to_json(transaction)
    }
}
