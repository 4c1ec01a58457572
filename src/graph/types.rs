//! Core Data Types for the Dependency Graph Model
//!
//! Symbol kinds, grouping layers and node roles shared by the model,
//! the exploration engine and the output formatters.
//!
//! @module graph/types

use serde::{Deserialize, Serialize};

// =============================================================================
// SYMBOL KIND ENUM
// =============================================================================

/// The four symbol tables of a document, outermost first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum SymbolKind {
    Package = 0,
    Class = 1,
    Method = 2,
    /// Local variable or class field
    VarOrField = 3,
}

impl SymbolKind {
    pub const ALL: [SymbolKind; 4] = [
        SymbolKind::Package,
        SymbolKind::Class,
        SymbolKind::Method,
        SymbolKind::VarOrField,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Package => "package",
            SymbolKind::Class => "class",
            SymbolKind::Method => "method",
            SymbolKind::VarOrField => "variable",
        }
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// LAYER ENUM
// =============================================================================

/// A grouping level that can be removed from and restored to the diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Package,
    Class,
    Method,
}

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::Package, Layer::Class, Layer::Method];

    /// Symbol table holding this layer's group names
    pub fn kind(&self) -> SymbolKind {
        match self {
            Layer::Package => SymbolKind::Package,
            Layer::Class => SymbolKind::Class,
            Layer::Method => SymbolKind::Method,
        }
    }

    /// The layer whose groups are this layer's members, if they are groups at all
    pub fn inner(&self) -> Option<Layer> {
        match self {
            Layer::Package => Some(Layer::Class),
            Layer::Class => Some(Layer::Method),
            Layer::Method => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.kind().as_str()
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Layer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "package" | "packages" | "p" => Ok(Layer::Package),
            "class" | "classes" | "c" => Ok(Layer::Class),
            "method" | "methods" | "m" => Ok(Layer::Method),
            other => Err(format!("unknown layer '{}'", other)),
        }
    }
}

// =============================================================================
// NODE ROLE
// =============================================================================

/// Role of a leaf node in the flow, drives its color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    /// Entry point of a flow
    Source,
    /// Exit point of a flow
    Sink,
    #[default]
    Plain,
}
