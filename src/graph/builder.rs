//! Dependency Graph Builder
//!
//! Turns the raw variable/field adjacency into the inlined graph shown to the
//! user: every field appearing as a target is replaced by that field's own
//! raw targets. Substitution is a single hop, so a field reached through
//! another field is dropped rather than expanded again.
//!
//! @module graph/builder

use std::collections::{BTreeMap, HashSet};

use smallvec::SmallVec;
use tracing::{debug, error};

use super::document::{IdKey, IdMap};
use super::relation::RelationIndex;
use super::symbols::SymbolTable;
use super::types::SymbolKind;
use crate::core::error::{Error, Result};

/// Adjacency list of one node
pub type Targets = SmallVec<[u32; 8]>;

// =============================================================================
// DEPENDENCY GRAPH
// =============================================================================

/// Field-inlined adjacency over variable ids
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    outgoing: BTreeMap<u32, Targets>,
    stats: InlineStats,
}

/// Counters collected while inlining
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineStats {
    /// Edges in the raw graph
    pub raw_edges: usize,
    /// Edges after inlining and deduplication
    pub inlined_edges: usize,
    /// Raw edges whose field target was substituted
    pub substituted: usize,
    /// Field targets reached through a field, dropped
    pub dropped_field_chains: usize,
}

impl DependencyGraph {
    /// Outgoing targets of a node
    pub fn targets(&self, source: u32) -> &[u32] {
        self.outgoing
            .get(&source)
            .map(|t| t.as_slice())
            .unwrap_or(&[])
    }

    /// Every edge as (source, target)
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.outgoing
            .iter()
            .flat_map(|(&from, targets)| targets.iter().map(move |&to| (from, to)))
    }

    pub fn edge_count(&self) -> usize {
        self.stats.inlined_edges
    }

    pub fn stats(&self) -> InlineStats {
        self.stats
    }

    /// Check that no field is the target of an edge
    pub fn verify(&self, relation: &RelationIndex) -> Result<()> {
        if let Some((from, to)) = self.edges().find(|&(_, to)| relation.is_field(to)) {
            error!(from, to, "Field id left as an inlined edge target");
            return Err(Error::ConsistencyViolation {
                message: format!("field {} is the target of inlined edge {} -> {}", to, from, to),
            });
        }
        Ok(())
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Builds a `DependencyGraph` from the raw adjacency map
pub struct DependencyGraphBuilder<'a> {
    symbols: &'a SymbolTable,
    relation: &'a RelationIndex,
}

impl<'a> DependencyGraphBuilder<'a> {
    pub fn new(symbols: &'a SymbolTable, relation: &'a RelationIndex) -> Self {
        Self { symbols, relation }
    }

    /// Inline fields out of the raw graph
    ///
    /// Every key of the raw graph stays a source, fields included. Targets
    /// keep first-seen order after deduplication.
    pub fn build(&self, raw: &IdMap) -> Result<DependencyGraph> {
        self.validate(raw)?;

        let mut stats = InlineStats::default();
        let mut outgoing = BTreeMap::new();

        for (key, raw_targets) in raw {
            let source = key.0;
            let mut seen = HashSet::with_capacity(raw_targets.len());
            let mut targets = Targets::new();
            stats.raw_edges += raw_targets.len();

            for &target in raw_targets {
                if !self.relation.is_field(target) {
                    if seen.insert(target) {
                        targets.push(target);
                    }
                    continue;
                }

                stats.substituted += 1;
                let field_targets = raw.get(&IdKey(target));
                for &inlined in field_targets.into_iter().flatten() {
                    if self.relation.is_field(inlined) {
                        stats.dropped_field_chains += 1;
                        continue;
                    }
                    if seen.insert(inlined) {
                        targets.push(inlined);
                    }
                }
            }

            stats.inlined_edges += targets.len();
            outgoing.insert(source, targets);
        }

        if stats.dropped_field_chains > 0 {
            debug!(
                dropped = stats.dropped_field_chains,
                "Dropped field targets reached through another field"
            );
        }

        let graph = DependencyGraph {
            outgoing,
            stats,
        };
        debug_assert!(graph.verify(self.relation).is_ok());
        Ok(graph)
    }

    fn validate(&self, raw: &IdMap) -> Result<()> {
        let len = self.symbols.len(SymbolKind::VarOrField);
        for (key, targets) in raw {
            if let Some(bad) = std::iter::once(&key.0)
                .chain(targets.iter())
                .find(|&&id| !self.symbols.contains(SymbolKind::VarOrField, id))
            {
                return Err(Error::schema(format!(
                    "graph: variable id {} out of range (table has {} entries)",
                    bad, len
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::document::IdKey;
    use crate::graph::fixtures;

    fn raw_graph(edges: &[(u32, &[u32])]) -> IdMap {
        edges
            .iter()
            .map(|(k, v)| (IdKey(*k), v.to_vec()))
            .collect()
    }

    #[test]
    fn test_field_is_inlined() {
        // v1 -> f -> v2
        let doc = fixtures::scenario_document();
        let symbols = SymbolTable::from_metadata(&doc.metadata);
        let relation = RelationIndex::from_raw(&doc.relation, &symbols).unwrap();

        let graph = DependencyGraphBuilder::new(&symbols, &relation)
            .build(&doc.graph)
            .unwrap();

        assert_eq!(graph.targets(fixtures::V1), &[fixtures::V2]);
        assert!(graph.edges().all(|(_, to)| to != fixtures::F));
        // fields stay as sources
        assert_eq!(graph.targets(fixtures::F), &[fixtures::V2]);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.verify(&relation).is_ok());
    }

    #[test]
    fn test_inlining_covers_every_field_target() {
        let doc = fixtures::scenario_document();
        let symbols = SymbolTable::from_metadata(&doc.metadata);
        let relation = RelationIndex::from_raw(&doc.relation, &symbols).unwrap();

        // v1 -> f, v1 -> v2, f -> v2, f -> v3, v3 -> f
        let raw = raw_graph(&[
            (fixtures::V1, &[fixtures::F, fixtures::V2]),
            (fixtures::F, &[fixtures::V2, fixtures::V3]),
            (fixtures::V3, &[fixtures::F]),
        ]);
        let graph = DependencyGraphBuilder::new(&symbols, &relation)
            .build(&raw)
            .unwrap();

        for (from, targets) in &raw {
            for &to in targets {
                if relation.is_field(to) {
                    for &t in &raw[&IdKey(to)] {
                        assert!(graph.targets(from.0).contains(&t), "missing {} -> {}", from.0, t);
                    }
                }
            }
        }
        // first-seen order, deduplicated
        assert_eq!(graph.targets(fixtures::V1), &[fixtures::V2, fixtures::V3]);
        // v3 -> f -> v3 becomes a self loop
        assert_eq!(graph.targets(fixtures::V3), &[fixtures::V2, fixtures::V3]);
        assert_eq!(graph.stats().raw_edges, 5);
        assert_eq!(graph.stats().substituted, 2);
        assert_eq!(graph.edge_count(), 6);
    }

    #[test]
    fn test_field_chain_is_one_hop() {
        let doc = fixtures::field_chain_document();
        let symbols = SymbolTable::from_metadata(&doc.metadata);
        let relation = RelationIndex::from_raw(&doc.relation, &symbols).unwrap();

        // a -> f -> g -> b, with f and g fields
        let graph = DependencyGraphBuilder::new(&symbols, &relation)
            .build(&doc.graph)
            .unwrap();

        assert!(graph.targets(0).is_empty());
        assert_eq!(graph.targets(1), &[3]);
        assert_eq!(graph.stats().dropped_field_chains, 1);
        assert!(graph.verify(&relation).is_ok());
    }

    #[test]
    fn test_out_of_range_target_is_schema_error() {
        let doc = fixtures::scenario_document();
        let symbols = SymbolTable::from_metadata(&doc.metadata);
        let relation = RelationIndex::from_raw(&doc.relation, &symbols).unwrap();

        let raw = raw_graph(&[(fixtures::V1, &[42])]);
        let err = DependencyGraphBuilder::new(&symbols, &relation)
            .build(&raw)
            .unwrap_err();
        assert!(matches!(err, Error::SchemaError { .. }));
    }
}
