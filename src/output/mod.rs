//! Output formatters for exploration results
//!
//! Provides multiple output formats:
//! - Plain: indented tree of visible parts (terminal, logs)
//! - JSON: machine-readable snapshot (tooling integration)
//! - DOT: Graphviz clusters per visible group
//!
//! @module output

pub mod json;
pub mod plain;

use serde::Serialize;

use crate::core::error::Result;
use crate::explore::{Transaction, ViewSnapshot};
use crate::graph::model::{GraphModel, ModelStats};

// =============================================================================
// TYPES
// =============================================================================

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Indented plain text
    #[default]
    Plain,
    /// JSON for machine consumption
    Json,
    /// DOT for graph visualization
    Dot,
}

/// A recommended path spelled out with node names
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedPath {
    pub index: usize,
    pub nodes: Vec<String>,
}

/// Recommended paths of a model, fields already removed
pub fn named_paths(model: &GraphModel) -> Result<Vec<NamedPath>> {
    model
        .recommended_paths()
        .iter()
        .enumerate()
        .map(|(index, path)| {
            let nodes = path
                .iter()
                .map(|&id| model.var_name(id).map(str::to_string))
                .collect::<Result<Vec<_>>>()?;
            Ok(NamedPath { index, nodes })
        })
        .collect()
}

// =============================================================================
// FORMATTER TRAIT
// =============================================================================

/// Trait for formatting exploration output
pub trait ViewFormatter {
    /// Format the currently visible parts and links
    fn format_view(&self, view: &ViewSnapshot) -> String;

    /// Format model statistics
    fn format_stats(&self, stats: &ModelStats) -> String;

    /// Format the recommended paths
    fn format_paths(&self, paths: &[NamedPath]) -> String;

    /// Format the changes one command made
    fn format_transaction(&self, transaction: &Transaction) -> String;
}

// =============================================================================
// FACTORY FUNCTION
// =============================================================================

/// Create a formatter for the given output format
pub fn create_formatter(format: OutputFormat) -> Box<dyn ViewFormatter> {
    match format {
        OutputFormat::Plain => Box::new(plain::PlainFormatter::new()),
        OutputFormat::Json => Box::new(json::JsonFormatter::new()),
        OutputFormat::Dot => Box::new(plain::DotFormatter::new()),
    }
}

pub use json::JsonFormatter;
pub use plain::{DotFormatter, PlainFormatter};
