//! flowview Graph - Document Model Construction
//!
//! Turns an analysis result document into an in-memory model:
//! - Symbol tables for packages, classes, methods and variables
//! - Containment relations and field classification
//! - Field-inlined dependency graph
//! - Materialized groups and leaves for the diagram
//!
//! @module graph

pub mod builder;
pub mod document;
pub mod model;
pub mod relation;
pub mod symbols;
pub mod types;

#[cfg(test)]
pub(crate) mod fixtures;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use builder::{DependencyGraph, DependencyGraphBuilder, InlineStats};
pub use document::{load_document, parse_document, Document, DocumentFormat, IdKey, IdMap};
pub use model::{filter_fields, GraphModel, GroupSpec, LeafSpec, ModelStats};
pub use relation::RelationIndex;
pub use symbols::SymbolTable;
pub use types::{Layer, NodeRole, SymbolKind};
