//! Error types for flowview

use thiserror::Error;

use crate::graph::types::SymbolKind;

/// Result type alias using flowview's Error
pub type Result<T> = std::result::Result<T, Error>;

/// flowview error types
#[derive(Error, Debug)]
pub enum Error {
    /// The document is malformed or violates the schema
    #[error("Schema error: {message}")]
    SchemaError { message: String },

    /// A symbol id does not exist in its table
    #[error("{kind} id {id} out of range (table has {len} entries)")]
    OutOfRange { kind: SymbolKind, id: u32, len: usize },

    /// The rendering collaborator does not know a key
    #[error("Node not found: {key}")]
    NodeNotFound { key: String },

    /// An internal invariant was broken
    #[error("Consistency violation: {message}")]
    ConsistencyViolation { message: String },

    /// A recommended path index beyond the document's list
    #[error("Recommended path {index} not found ({count} paths)")]
    PathNotFound { index: usize, count: usize },

    #[error("No document loaded")]
    NoDocument,

    #[error("Invalid command: {input}")]
    InvalidCommand { input: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl Error {
    pub fn schema(message: impl Into<String>) -> Self {
        Self::SchemaError {
            message: message.into(),
        }
    }

    pub fn node_not_found(key: impl Into<String>) -> Self {
        Self::NodeNotFound { key: key.into() }
    }

    /// Short status text shown to the user
    pub fn status_message(&self) -> String {
        match self {
            Error::SchemaError { .. } | Error::Io(_) => "file not recognized".to_string(),
            Error::NodeNotFound { .. } | Error::OutOfRange { .. } => "node not found".to_string(),
            Error::PathNotFound { .. } => "path not found".to_string(),
            Error::NoDocument => "no document loaded".to_string(),
            Error::InvalidCommand { input } => format!("unknown command: {}", input),
            other => other.to_string(),
        }
    }

    /// Lookup failures abort only the enclosing operation
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            Error::NodeNotFound { .. } | Error::OutOfRange { .. } | Error::PathNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_messages() {
        assert_eq!(
            Error::schema("missing field `graph`").status_message(),
            "file not recognized"
        );
        assert_eq!(
            Error::node_not_found("Foo.bar").status_message(),
            "node not found"
        );
        let out_of_range = Error::OutOfRange {
            kind: SymbolKind::Method,
            id: 9,
            len: 2,
        };
        assert!(out_of_range.is_lookup());
        assert_eq!(
            out_of_range.to_string(),
            "method id 9 out of range (table has 2 entries)"
        );
    }
}
