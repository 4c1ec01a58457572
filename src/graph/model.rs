//! Graph Model
//!
//! Composes the symbol table, relation index and inlined dependency graph of
//! one document, and precomputes which groups and leaves the diagram
//! materializes.
//!
//! @module graph/model

use std::collections::HashSet;

use compact_str::CompactString;
use serde::Serialize;
use tracing::info;

use super::builder::{DependencyGraph, DependencyGraphBuilder};
use super::document::Document;
use super::relation::RelationIndex;
use super::symbols::SymbolTable;
use super::types::{Layer, NodeRole, SymbolKind};
use crate::core::error::{Error, Result};

// =============================================================================
// MATERIALIZED PARTS
// =============================================================================

/// A group shown in the diagram at one layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSpec {
    pub layer: Layer,
    pub id: u32,
    pub name: CompactString,
    /// Enclosing group one layer up, when that group is materialized
    pub parent: Option<CompactString>,
    /// Materialized direct children
    pub members: Vec<CompactString>,
}

/// A variable/field node shown in the diagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafSpec {
    pub id: u32,
    pub name: CompactString,
    pub role: NodeRole,
    /// Enclosing method group
    pub parent: CompactString,
}

// =============================================================================
// GRAPH MODEL
// =============================================================================

/// Everything known about one loaded document
#[derive(Debug, Clone)]
pub struct GraphModel {
    symbols: SymbolTable,
    relation: RelationIndex,
    graph: DependencyGraph,
    sources: Vec<u32>,
    sinks: Vec<u32>,
    source_set: HashSet<u32>,
    sink_set: HashSet<u32>,
    recommended_paths: Vec<Vec<u32>>,
    groups: [Vec<GroupSpec>; 3],
    leaves: Vec<LeafSpec>,
}

impl GraphModel {
    /// Validate a parsed document and build the model
    pub fn from_document(doc: &Document) -> Result<Self> {
        let symbols = SymbolTable::from_metadata(&doc.metadata);
        let relation = RelationIndex::from_raw(&doc.relation, &symbols)?;
        let graph = DependencyGraphBuilder::new(&symbols, &relation).build(&doc.graph)?;
        graph.verify(&relation)?;

        for (list, ids) in [("sourceNodes", &doc.source_nodes), ("sinkNodes", &doc.sink_nodes)] {
            check_vars(&symbols, list, ids)?;
        }
        for path in &doc.recommended_paths {
            check_vars(&symbols, "recommendedPaths", path)?;
        }

        let recommended_paths = doc
            .recommended_paths
            .iter()
            .map(|path| filter_fields(&relation, path))
            .collect();

        let mut model = Self {
            source_set: doc.source_nodes.iter().copied().collect(),
            sink_set: doc.sink_nodes.iter().copied().collect(),
            sources: doc.source_nodes.clone(),
            sinks: doc.sink_nodes.clone(),
            recommended_paths,
            groups: Default::default(),
            leaves: Vec::new(),
            symbols,
            relation,
            graph,
        };
        model.materialize()?;

        let stats = model.stats();
        info!(
            packages = stats.packages,
            classes = stats.classes,
            methods = stats.methods,
            variables = stats.variables,
            fields = stats.fields,
            edges = stats.edges,
            "Built graph model"
        );
        Ok(model)
    }

    /// Precompute groups and leaves in containment order
    fn materialize(&mut self) -> Result<()> {
        for layer in Layer::ALL {
            let mut specs = Vec::new();
            for (id, children) in self.relation.entries(layer) {
                let parent = match layer {
                    Layer::Package => None,
                    Layer::Class => self.group_name(Layer::Package, self.relation.parent(Layer::Package, id))?,
                    Layer::Method => self.group_name(Layer::Class, self.relation.parent(Layer::Class, id))?,
                };
                let members = children
                    .iter()
                    .filter(|&&child| match layer.inner() {
                        Some(inner) => self.relation.has_entry(inner, child),
                        None => true,
                    })
                    .map(|&child| {
                        let kind = layer.inner().map_or(SymbolKind::VarOrField, |l| l.kind());
                        self.symbols.name_of(kind, child).map(CompactString::new)
                    })
                    .collect::<Result<Vec<_>>>()?;

                specs.push(GroupSpec {
                    layer,
                    id,
                    name: CompactString::new(self.symbols.name_of(layer.kind(), id)?),
                    parent,
                    members,
                });
            }
            self.groups[layer as usize] = specs;
        }

        let mut leaves = Vec::new();
        for (method, vars) in self.relation.entries(Layer::Method) {
            let parent = CompactString::new(self.symbols.name_of(SymbolKind::Method, method)?);
            for &var in vars {
                leaves.push(LeafSpec {
                    id: var,
                    name: CompactString::new(self.var_name(var)?),
                    role: self.role(var),
                    parent: parent.clone(),
                });
            }
        }
        self.leaves = leaves;
        Ok(())
    }

    fn group_name(&self, layer: Layer, id: Option<u32>) -> Result<Option<CompactString>> {
        match id {
            Some(id) if self.relation.has_entry(layer, id) => Ok(Some(CompactString::new(
                self.symbols.name_of(layer.kind(), id)?,
            ))),
            _ => Ok(None),
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn relation(&self) -> &RelationIndex {
        &self.relation
    }

    /// The field-inlined dependency graph
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    #[inline]
    pub fn is_field(&self, id: u32) -> bool {
        self.relation.is_field(id)
    }

    #[inline]
    pub fn is_source(&self, id: u32) -> bool {
        self.source_set.contains(&id)
    }

    #[inline]
    pub fn is_sink(&self, id: u32) -> bool {
        self.sink_set.contains(&id)
    }

    /// Role of a variable; a node listed as both source and sink is a source
    pub fn role(&self, id: u32) -> NodeRole {
        if self.is_source(id) {
            NodeRole::Source
        } else if self.is_sink(id) {
            NodeRole::Sink
        } else {
            NodeRole::Plain
        }
    }

    /// Entry points, in document order
    pub fn sources(&self) -> &[u32] {
        &self.sources
    }

    pub fn sinks(&self) -> &[u32] {
        &self.sinks
    }

    /// Recommended paths with field ids removed
    pub fn recommended_paths(&self) -> &[Vec<u32>] {
        &self.recommended_paths
    }

    #[cfg(test)]
    pub(crate) fn recommended_paths_mut(&mut self) -> &mut Vec<Vec<u32>> {
        &mut self.recommended_paths
    }

    /// Name of a variable/field, used as its diagram key
    pub fn var_name(&self, id: u32) -> Result<&str> {
        self.symbols.name_of(SymbolKind::VarOrField, id)
    }

    /// Materialized groups of a layer, ordered by id
    pub fn groups(&self, layer: Layer) -> &[GroupSpec] {
        &self.groups[layer as usize]
    }

    /// Materialized leaves, grouped by method
    pub fn leaves(&self) -> &[LeafSpec] {
        &self.leaves
    }

    pub fn stats(&self) -> ModelStats {
        ModelStats {
            packages: self.symbols.len(SymbolKind::Package),
            classes: self.symbols.len(SymbolKind::Class),
            methods: self.symbols.len(SymbolKind::Method),
            variables: self.symbols.len(SymbolKind::VarOrField),
            fields: self.relation.field_count(),
            raw_edges: self.graph.stats().raw_edges,
            edges: self.graph.edge_count(),
            sources: self.sources.len(),
            sinks: self.sinks.len(),
            recommended_paths: self.recommended_paths.len(),
        }
    }
}

/// Drop field ids from a path, keeping order
pub fn filter_fields(relation: &RelationIndex, path: &[u32]) -> Vec<u32> {
    path.iter().copied().filter(|&id| !relation.is_field(id)).collect()
}

fn check_vars(symbols: &SymbolTable, list: &str, ids: &[u32]) -> Result<()> {
    match ids
        .iter()
        .find(|&&id| !symbols.contains(SymbolKind::VarOrField, id))
    {
        Some(bad) => Err(Error::schema(format!(
            "{}: variable id {} out of range (table has {} entries)",
            list,
            bad,
            symbols.len(SymbolKind::VarOrField)
        ))),
        None => Ok(()),
    }
}

// =============================================================================
// STATISTICS
// =============================================================================

/// Size of a loaded model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelStats {
    pub packages: usize,
    pub classes: usize,
    pub methods: usize,
    pub variables: usize,
    pub fields: usize,
    pub raw_edges: usize,
    pub edges: usize,
    pub sources: usize,
    pub sinks: usize,
    pub recommended_paths: usize,
}

impl std::fmt::Display for ModelStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Graph Model Statistics:")?;
        writeln!(f, "  Packages:     {:>8}", self.packages)?;
        writeln!(f, "  Classes:      {:>8}", self.classes)?;
        writeln!(f, "  Methods:      {:>8}", self.methods)?;
        writeln!(f, "  Variables:    {:>8}", self.variables)?;
        writeln!(f, "  Fields:       {:>8}", self.fields)?;
        writeln!(f, "  Raw Edges:    {:>8}", self.raw_edges)?;
        writeln!(f, "  Edges:        {:>8}", self.edges)?;
        writeln!(f, "  Sources:      {:>8}", self.sources)?;
        writeln!(f, "  Sinks:        {:>8}", self.sinks)?;
        writeln!(f, "  Paths:        {:>8}", self.recommended_paths)?;
        Ok(())
    }
}
