//! Layer Removal and Restoration
//!
//! Removing a layer dissolves every group at that level: its members move up
//! to the group's own parent and the group is deleted. Restoring brings the
//! groups back and moves their members in again. A layer can only be
//! restored on top of the next inner layer, so restoring `package` without
//! `class` (or `class` without `method`) transiently restores the inner
//! layer and removes it again afterwards.
//!
//! @module explore/layers

use compact_str::CompactString;
use tracing::{debug, warn};

use super::diagram::{Diagram, PartData, PartFlags, Property};
use super::engine::ExplorationEngine;
use crate::core::error::Result;
use crate::graph::model::GroupSpec;
use crate::graph::types::Layer;

impl<D: Diagram> ExplorationEngine<D> {
    /// Dissolve every group of `layer`
    pub fn remove_layer(&mut self, layer: Layer) -> Result<()> {
        let name = format!("remove {}", layer);
        self.transact(&name, |engine| engine.remove_layer_groups(layer))
    }

    /// Re-materialize every group of `layer`
    pub fn restore_layer(&mut self, layer: Layer) -> Result<()> {
        let name = format!("restore {}", layer);
        self.transact(&name, |engine| engine.restore_layer_groups(layer))
    }

    fn remove_layer_groups(&mut self, layer: Layer) -> Result<()> {
        if !self.layers.is_present(layer) {
            debug!(%layer, "Layer already removed");
            return Ok(());
        }
        let names: Vec<CompactString> = self
            .model
            .groups(layer)
            .iter()
            .map(|g| g.name.clone())
            .collect();
        for name in &names {
            self.remove_group(name);
        }
        self.layers.set(layer, false);
        debug!(%layer, groups = names.len(), "Removed layer");
        Ok(())
    }

    fn remove_group(&mut self, key: &str) {
        if !self.diagram.is_group(key) {
            return;
        }
        self.diagram
            .set_property(key, Property::IsSubGraphExpanded, true);
        let parent = self.diagram.containing_group(key);
        for member in self.diagram.member_parts(key) {
            self.diagram.set_group(&member, parent.as_deref());
        }
        self.diagram.remove_part(key);
    }

    fn restore_layer_groups(&mut self, layer: Layer) -> Result<()> {
        if self.layers.is_present(layer) {
            debug!(%layer, "Layer already present");
            return Ok(());
        }
        match layer.inner().filter(|inner| !self.layers.is_present(*inner)) {
            Some(inner) => {
                debug!(%layer, %inner, "Restoring through a transient inner layer");
                self.restore_layer_groups(inner)?;
                self.restore_groups(layer)?;
                self.remove_layer_groups(inner)
            }
            None => self.restore_groups(layer),
        }
    }

    fn restore_groups(&mut self, layer: Layer) -> Result<()> {
        let specs = self.model.groups(layer).to_vec();
        for spec in &specs {
            self.restore_group(spec)?;
        }
        self.layers.set(layer, true);
        debug!(%layer, groups = specs.len(), "Restored layer");
        Ok(())
    }

    /// Re-add one group and pull its members back in.
    ///
    /// The group lands where its last member was; a group left without a
    /// visible member is folded and hidden.
    fn restore_group(&mut self, spec: &GroupSpec) -> Result<()> {
        let part = PartData::group(spec.name.clone())
            .with(PartFlags::VISIBLE | PartFlags::SUBGRAPH_EXPANDED);
        if !self.diagram.add_part(part) {
            warn!(key = %spec.name, "Group key already taken, not restored");
            return Ok(());
        }

        let mut former = None;
        for member in &spec.members {
            self.require(member)?;
            former = self.diagram.containing_group(member);
            self.diagram.set_group(member, Some(&spec.name));
        }

        if !self.diagram.any_member_visible(&spec.name) {
            self.diagram
                .set_property(&spec.name, Property::IsSubGraphExpanded, false);
            self.diagram.set_property(&spec.name, Property::Visible, false);
        }

        let parent = former.or_else(|| {
            spec.parent
                .clone()
                .filter(|p| self.diagram.contains(p))
        });
        self.diagram.set_group(&spec.name, parent.as_deref());
        Ok(())
    }
}
