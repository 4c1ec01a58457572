//! Input Document Schema
//!
//! Serde model of the document produced by the analysis engine. Object keys
//! carry integer ids as strings (JSON) or plain scalars (YAML); both decode
//! into `IdKey`. Structural validation beyond shape happens in the model.
//!
//! @module graph/document

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::core::error::{Error, Result};

// =============================================================================
// ID KEYS
// =============================================================================

/// An integer id used as a map key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IdKey(pub u32);

impl Serialize for IdKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for IdKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct IdKeyVisitor;

        impl<'de> Visitor<'de> for IdKeyVisitor {
            type Value = IdKey;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a non-negative integer id")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<IdKey, E> {
                u32::try_from(v)
                    .map(IdKey)
                    .map_err(|_| E::custom(format!("id {} too large", v)))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<IdKey, E> {
                u64::try_from(v)
                    .map_err(|_| E::custom(format!("negative id {}", v)))
                    .and_then(|v| self.visit_u64(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<IdKey, E> {
                v.trim()
                    .parse::<u32>()
                    .map(IdKey)
                    .map_err(|_| E::custom(format!("invalid id key '{}'", v)))
            }
        }

        deserializer.deserialize_any(IdKeyVisitor)
    }
}

/// Map from an id to a list of ids, ordered by key
pub type IdMap = BTreeMap<IdKey, Vec<u32>>;

// =============================================================================
// DOCUMENT
// =============================================================================

/// Parsed input document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub metadata: Metadata,
    pub relation: RawRelation,
    /// Raw adjacency over variable/field ids
    pub graph: IdMap,
    pub source_nodes: Vec<u32>,
    pub sink_nodes: Vec<u32>,
    pub recommended_paths: Vec<Vec<u32>>,
}

/// Names of every symbol, one table per kind
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub packages: Vec<String>,
    pub classes: Vec<String>,
    pub methods: Vec<String>,
    pub vars_and_fields: Vec<String>,
}

/// Containment maps as they appear in the document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRelation {
    pub package_to_classes: IdMap,
    pub class_to_methods: IdMap,
    pub class_to_fields: IdMap,
    pub method_to_vars: IdMap,
}

// =============================================================================
// LOADING
// =============================================================================

/// Serialization format of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Some(Self::Json),
            Some("yaml") | Some("yml") => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Parse a document from text
pub fn parse_document(content: &str, format: DocumentFormat) -> Result<Document> {
    match format {
        DocumentFormat::Json => serde_json::from_str(content).map_err(|e| Error::schema(e.to_string())),
        DocumentFormat::Yaml => serde_yaml::from_str(content).map_err(|e| Error::schema(e.to_string())),
    }
}

/// Read and parse a document from disk
///
/// Files without a known extension are tried as JSON first, then YAML.
pub fn load_document(path: &Path) -> Result<Document> {
    let content = std::fs::read_to_string(path)?;

    match DocumentFormat::from_path(path) {
        Some(format) => parse_document(&content, format),
        None => parse_document(&content, DocumentFormat::Json).or_else(|json_err| {
            debug!(path = %path.display(), error = %json_err, "Not JSON, trying YAML");
            parse_document(&content, DocumentFormat::Yaml)
        }),
    }
}
