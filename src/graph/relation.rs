//! Relation Index
//!
//! Containment maps between adjacent levels (package → class → method →
//! variable) plus the set of variable ids that are class fields. Each
//! containment map is validated to be a forest at load time.
//!
//! @module graph/relation

use std::collections::{BTreeMap, HashMap, HashSet};

use smallvec::SmallVec;

use super::document::{IdMap, RawRelation};
use super::symbols::SymbolTable;
use super::types::{Layer, SymbolKind};
use crate::core::error::{Error, Result};

/// Children of one parent
pub type Children = SmallVec<[u32; 8]>;

/// One validated containment map with its inverse
#[derive(Debug, Clone, Default)]
struct Containment {
    children: BTreeMap<u32, Children>,
    parent: HashMap<u32, u32>,
}

impl Containment {
    fn build(
        name: &str,
        raw: &IdMap,
        symbols: &SymbolTable,
        parent_kind: SymbolKind,
        child_kind: SymbolKind,
    ) -> Result<Self> {
        let mut containment = Containment::default();

        for (key, values) in raw {
            let parent = key.0;
            if !symbols.contains(parent_kind, parent) {
                return Err(Error::schema(format!(
                    "{}: {} id {} out of range",
                    name, parent_kind, parent
                )));
            }

            let mut children = Children::with_capacity(values.len());
            for &child in values {
                if !symbols.contains(child_kind, child) {
                    return Err(Error::schema(format!(
                        "{}: {} id {} out of range",
                        name, child_kind, child
                    )));
                }
                match containment.parent.insert(child, parent) {
                    Some(other) if other != parent => {
                        return Err(Error::schema(format!(
                            "{}: {} {} listed under both {} and {}",
                            name, child_kind, child, other, parent
                        )));
                    }
                    Some(_) => continue,
                    None => children.push(child),
                }
            }
            containment.children.insert(parent, children);
        }

        Ok(containment)
    }
}

/// Containment relations and field classification
#[derive(Debug, Clone, Default)]
pub struct RelationIndex {
    package_to_classes: Containment,
    class_to_methods: Containment,
    method_to_vars: Containment,
    fields: HashSet<u32>,
}

impl RelationIndex {
    /// Validate the raw relation against the symbol tables
    pub fn from_raw(raw: &RawRelation, symbols: &SymbolTable) -> Result<Self> {
        use SymbolKind::*;

        let package_to_classes = Containment::build(
            "packageToClasses",
            &raw.package_to_classes,
            symbols,
            Package,
            Class,
        )?;
        let class_to_methods =
            Containment::build("classToMethods", &raw.class_to_methods, symbols, Class, Method)?;
        let class_to_fields =
            Containment::build("classToFields", &raw.class_to_fields, symbols, Class, VarOrField)?;
        let method_to_vars =
            Containment::build("methodToVars", &raw.method_to_vars, symbols, Method, VarOrField)?;

        let fields = class_to_fields.parent.keys().copied().collect();

        Ok(Self {
            package_to_classes,
            class_to_methods,
            method_to_vars,
            fields,
        })
    }

    fn containment(&self, layer: Layer) -> &Containment {
        match layer {
            Layer::Package => &self.package_to_classes,
            Layer::Class => &self.class_to_methods,
            Layer::Method => &self.method_to_vars,
        }
    }

    /// Whether a variable id is a class field
    #[inline]
    pub fn is_field(&self, id: u32) -> bool {
        self.fields.contains(&id)
    }

    /// Number of ids classified as fields
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Direct children of a group at `layer`
    pub fn children(&self, layer: Layer, parent: u32) -> &[u32] {
        self.containment(layer)
            .children
            .get(&parent)
            .map(|c| c.as_slice())
            .unwrap_or(&[])
    }

    /// Every parent listed at `layer` with its children, ordered by id
    pub fn entries(&self, layer: Layer) -> impl Iterator<Item = (u32, &[u32])> + '_ {
        self.containment(layer)
            .children
            .iter()
            .map(|(&parent, children)| (parent, children.as_slice()))
    }

    /// Whether `id` is listed as a parent at `layer`
    pub fn has_entry(&self, layer: Layer, id: u32) -> bool {
        self.containment(layer).children.contains_key(&id)
    }

    /// Enclosing group at `layer` of one of its children
    pub fn parent(&self, layer: Layer, child: u32) -> Option<u32> {
        self.containment(layer).parent.get(&child).copied()
    }
}
