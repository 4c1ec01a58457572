//! Symbol Table
//!
//! Four parallel name tables (package, class, method, variable/field) indexed
//! by dense zero-based ids.
//!
//! @module graph/symbols

use compact_str::CompactString;

use super::document::Metadata;
use super::types::SymbolKind;
use crate::core::error::{Error, Result};

/// Name tables for every symbol kind
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    packages: Vec<CompactString>,
    classes: Vec<CompactString>,
    methods: Vec<CompactString>,
    vars_and_fields: Vec<CompactString>,
}

impl SymbolTable {
    /// Build the tables from document metadata
    ///
    /// Class names without a package qualifier get a leading `.` so they never
    /// collide with a package name of the same spelling.
    pub fn from_metadata(metadata: &Metadata) -> Self {
        let intern = |names: &[String]| names.iter().map(CompactString::new).collect::<Vec<_>>();

        let classes = metadata
            .classes
            .iter()
            .map(|name| {
                if name.contains('.') {
                    CompactString::new(name)
                } else {
                    CompactString::new(format!(".{}", name))
                }
            })
            .collect();

        Self {
            packages: intern(&metadata.packages),
            classes,
            methods: intern(&metadata.methods),
            vars_and_fields: intern(&metadata.vars_and_fields),
        }
    }

    fn table(&self, kind: SymbolKind) -> &[CompactString] {
        match kind {
            SymbolKind::Package => &self.packages,
            SymbolKind::Class => &self.classes,
            SymbolKind::Method => &self.methods,
            SymbolKind::VarOrField => &self.vars_and_fields,
        }
    }

    /// Name of a symbol
    pub fn name_of(&self, kind: SymbolKind, id: u32) -> Result<&str> {
        let table = self.table(kind);
        table
            .get(id as usize)
            .map(|name| name.as_str())
            .ok_or(Error::OutOfRange {
                kind,
                id,
                len: table.len(),
            })
    }

    /// Number of symbols of a kind
    pub fn len(&self, kind: SymbolKind) -> usize {
        self.table(kind).len()
    }

    pub fn is_empty(&self) -> bool {
        SymbolKind::ALL.iter().all(|&kind| self.len(kind) == 0)
    }

    /// Check that an id exists in its table
    #[inline]
    pub fn contains(&self, kind: SymbolKind, id: u32) -> bool {
        (id as usize) < self.len(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> Metadata {
        Metadata {
            packages: vec!["com.acme".into()],
            classes: vec!["com.acme.Shop".into(), "Main".into()],
            methods: vec!["buy".into()],
            vars_and_fields: vec!["order".into(), "price".into()],
        }
    }

    #[test]
    fn test_unqualified_class_is_prefixed() {
        let table = SymbolTable::from_metadata(&metadata());

        assert_eq!(table.name_of(SymbolKind::Class, 0).unwrap(), "com.acme.Shop");
        assert_eq!(table.name_of(SymbolKind::Class, 1).unwrap(), ".Main");
    }

    #[test]
    fn test_name_of_out_of_range() {
        let table = SymbolTable::from_metadata(&metadata());

        assert_eq!(table.name_of(SymbolKind::VarOrField, 1).unwrap(), "price");
        match table.name_of(SymbolKind::VarOrField, 2) {
            Err(Error::OutOfRange { kind, id, len }) => {
                assert_eq!(kind, SymbolKind::VarOrField);
                assert_eq!(id, 2);
                assert_eq!(len, 2);
            }
            other => panic!("expected OutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_lengths() {
        let table = SymbolTable::from_metadata(&metadata());

        assert_eq!(table.len(SymbolKind::Package), 1);
        assert_eq!(table.len(SymbolKind::Method), 1);
        assert!(table.contains(SymbolKind::Class, 1));
        assert!(!table.contains(SymbolKind::Class, 2));
        assert!(!table.is_empty());
        assert!(SymbolTable::default().is_empty());
    }
}
