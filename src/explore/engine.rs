//! Exploration Engine
//!
//! Owns the exploration state of one loaded document: the graph model, the
//! rendering collaborator holding per-part and per-link flags, and the three
//! layer-presence booleans. Every public operation runs through `transact`,
//! which opens one named transaction on the collaborator and rolls it back
//! (together with the layer flags) when the operation fails, so a failed
//! operation leaves no trace.
//!
//! The operations themselves live next to this file:
//! `collapse` (collapse/expand/toggle), `layers` (remove/restore),
//! `highlight` (paths, trace, reset).
//!
//! @module explore/engine

use compact_str::CompactString;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::diagram::{Diagram, PartData, PartFlags, Property};
use super::scene::Scene;
use crate::core::config::{InitialView, ViewConfig};
use crate::core::error::{Error, Result};
use crate::graph::model::GraphModel;
use crate::graph::types::Layer;

// =============================================================================
// LAYER STATE
// =============================================================================

/// Which abstraction layers are currently materialized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayerState {
    pub package: bool,
    pub class: bool,
    pub method: bool,
}

impl Default for LayerState {
    fn default() -> Self {
        Self {
            package: true,
            class: true,
            method: true,
        }
    }
}

impl LayerState {
    #[inline]
    pub fn is_present(&self, layer: Layer) -> bool {
        match layer {
            Layer::Package => self.package,
            Layer::Class => self.class,
            Layer::Method => self.method,
        }
    }

    pub fn set(&mut self, layer: Layer, present: bool) {
        match layer {
            Layer::Package => self.package = present,
            Layer::Class => self.class = present,
            Layer::Method => self.method = present,
        }
    }

    /// Present layers, outermost first
    pub fn present(&self) -> Vec<Layer> {
        Layer::ALL
            .into_iter()
            .filter(|l| self.is_present(*l))
            .collect()
    }
}

// =============================================================================
// ENGINE
// =============================================================================

/// Exploration state machine over one document
pub struct ExplorationEngine<D: Diagram = Scene> {
    pub(crate) model: GraphModel,
    pub(crate) diagram: D,
    pub(crate) layers: LayerState,
    pub(crate) view: ViewConfig,
}

impl ExplorationEngine<Scene> {
    /// Build an engine backed by an in-memory `Scene`
    pub fn new(model: GraphModel, view: ViewConfig) -> Result<Self> {
        Self::with_diagram(model, Scene::new(), view)
    }
}

impl<D: Diagram> ExplorationEngine<D> {
    /// Materialize `model` into `diagram` and apply the initial view
    pub fn with_diagram(model: GraphModel, diagram: D, view: ViewConfig) -> Result<Self> {
        let mut engine = Self {
            model,
            diagram,
            layers: LayerState::default(),
            view,
        };
        engine.materialize();

        match engine.view.initial_view {
            InitialView::Roots => engine.show_roots(),
            InitialView::Sources => engine.reset_view()?,
        }

        let hidden = engine.view.hidden_layers.clone();
        for layer in hidden {
            engine.remove_layer(layer)?;
        }

        info!(
            parts = engine.diagram.part_keys().len(),
            links = engine.diagram.link_ids().len(),
            initial_view = ?engine.view.initial_view,
            "Exploration engine ready"
        );
        Ok(engine)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn model(&self) -> &GraphModel {
        &self.model
    }

    pub fn diagram(&self) -> &D {
        &self.diagram
    }

    pub fn layers(&self) -> LayerState {
        self.layers
    }

    pub fn view_config(&self) -> &ViewConfig {
        &self.view
    }

    // -------------------------------------------------------------------------
    // Setup
    // -------------------------------------------------------------------------

    /// Add every group, leaf and link; everything starts hidden and collapsed
    fn materialize(&mut self) {
        for layer in Layer::ALL {
            for group in self.model.groups(layer) {
                let part = PartData::group(group.name.clone())
                    .in_group(group.parent.clone())
                    .with(PartFlags::COLLAPSED);
                if !self.diagram.add_part(part) {
                    warn!(key = %group.name, %layer, "Duplicate group key, keeping the first");
                }
            }
        }

        for leaf in self.model.leaves() {
            let part = PartData::leaf(leaf.name.clone(), leaf.role)
                .in_group(Some(leaf.parent.clone()))
                .with(PartFlags::COLLAPSED);
            if !self.diagram.add_part(part) {
                debug!(key = %leaf.name, "Duplicate leaf key, keeping the first");
            }
        }

        let mut skipped = 0usize;
        for (from, to) in self.model.graph().edges() {
            let (Ok(from), Ok(to)) = (self.model.var_name(from), self.model.var_name(to)) else {
                skipped += 1;
                continue;
            };
            if self.diagram.add_link(from, to).is_none() {
                skipped += 1;
            }
        }
        if skipped > 0 {
            debug!(skipped, "Skipped links with endpoints outside any method");
        }
    }

    /// Show every leaf without incoming links, plus its groups
    fn show_roots(&mut self) {
        for key in self.diagram.part_keys() {
            if self.diagram.is_group(&key) || !self.diagram.links_into(&key).is_empty() {
                continue;
            }
            self.diagram.set_property(&key, Property::Visible, true);
            let mut group = self.diagram.containing_group(&key);
            while let Some(g) = group {
                self.diagram.set_property(&g, Property::Visible, true);
                group = self.diagram.containing_group(&g);
            }
        }
        for link in self.diagram.link_ids() {
            self.diagram.set_link_property(link, Property::Visible, false);
        }
    }

    // -------------------------------------------------------------------------
    // Transactions
    // -------------------------------------------------------------------------

    /// Run `op` as one named transaction; on failure nothing changes
    pub(crate) fn transact<T>(
        &mut self,
        name: &str,
        op: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let layers = self.layers;
        self.diagram.start_transaction(name);
        match op(self) {
            Ok(value) => {
                self.diagram.commit_transaction(name);
                debug!(operation = name, "Committed");
                Ok(value)
            }
            Err(e) => {
                self.diagram.rollback_transaction();
                self.layers = layers;
                warn!(operation = name, error = %e, "Operation aborted and rolled back");
                Err(e)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Shared helpers
    // -------------------------------------------------------------------------

    /// Fail with `NodeNotFound` unless the diagram knows `key`
    pub(crate) fn require(&self, key: &str) -> Result<()> {
        if self.diagram.contains(key) {
            Ok(())
        } else {
            Err(Error::node_not_found(key))
        }
    }

    /// Diagram key of a variable id, which must be present
    pub(crate) fn leaf_key(&self, id: u32) -> Result<CompactString> {
        let key = CompactString::new(self.model.var_name(id)?);
        self.require(&key)?;
        Ok(key)
    }

    /// Show `key` and its enclosing groups up to the first visible one
    pub(crate) fn reveal(&mut self, key: &str) {
        self.diagram.set_property(key, Property::Visible, true);
        let mut group = self.diagram.containing_group(key);
        while let Some(g) = group {
            if self.diagram.is_visible(&g) {
                break;
            }
            self.diagram.set_property(&g, Property::Visible, true);
            group = self.diagram.containing_group(&g);
        }
    }

    /// Hide `key`, then every enclosing group left without a visible member
    pub(crate) fn conceal(&mut self, key: &str, fold: bool) {
        self.diagram.set_property(key, Property::Visible, false);
        let mut group = self.diagram.containing_group(key);
        while let Some(g) = group {
            if self.diagram.any_member_visible(&g) {
                break;
            }
            if fold {
                self.diagram.set_property(&g, Property::IsSubGraphExpanded, false);
            }
            self.diagram.set_property(&g, Property::Visible, false);
            group = self.diagram.containing_group(&g);
        }
    }

    /// Fold or unfold a group's member view
    pub fn toggle_group(&mut self, key: &str) -> Result<bool> {
        self.transact("toggle group", |engine| {
            engine.require(key)?;
            if !engine.diagram.is_group(key) {
                return Err(Error::node_not_found(key));
            }
            let expanded = engine
                .diagram
                .property(key, Property::IsSubGraphExpanded)
                .unwrap_or(false);
            engine
                .diagram
                .set_property(key, Property::IsSubGraphExpanded, !expanded);
            Ok(!expanded)
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::config::ColorConfig;
    use crate::graph::document::Document;
    use crate::graph::fixtures::{flow_document, scenario_document};
    use crate::graph::types::NodeRole;

    pub(crate) fn engine_for(doc: &Document, view: ViewConfig) -> ExplorationEngine {
        let model = GraphModel::from_document(doc).unwrap();
        ExplorationEngine::new(model, view).unwrap()
    }

    pub(crate) fn scenario_engine() -> ExplorationEngine {
        engine_for(&scenario_document(), ViewConfig::default())
    }

    pub(crate) fn flow_engine() -> ExplorationEngine {
        engine_for(&flow_document(), ViewConfig::default())
    }

    pub(crate) fn visible(engine: &ExplorationEngine, key: &str) -> bool {
        engine.diagram().is_visible(key)
    }

    pub(crate) fn collapsed(engine: &ExplorationEngine, key: &str) -> bool {
        engine
            .diagram()
            .property(key, Property::IsCollapsed)
            .unwrap()
    }

    /// Every visible part sits inside a chain of visible groups
    pub(crate) fn assert_ancestors_visible(engine: &ExplorationEngine) {
        let scene = engine.diagram();
        for key in scene.part_keys() {
            if !scene.is_visible(&key) {
                continue;
            }
            let mut group = scene.containing_group(&key);
            while let Some(g) = group {
                assert!(scene.is_visible(&g), "{key} is visible inside hidden {g}");
                group = scene.containing_group(&g);
            }
        }
    }

    #[test]
    fn test_materializes_every_part() {
        let engine = scenario_engine();
        let scene = engine.diagram();
        assert_eq!(scene.part_count(), 7);
        assert_eq!(scene.containing_group("p.C").as_deref(), Some("p"));
        assert_eq!(scene.containing_group("p.C.m").as_deref(), Some("p.C"));
        assert_eq!(scene.member_parts("p.C.m"), vec!["v1", "v2", "f", "v3"]);
        // v1 -> v2 and f -> v2 after inlining
        assert_eq!(scene.link_count(), 2);
        assert!(scene.links_into("f").is_empty());
    }

    #[test]
    fn test_leaf_colors_follow_roles() {
        let engine = scenario_engine();
        let colors = ColorConfig::default();
        let color = |key: &str| colors.color_for(engine.diagram().role(key).unwrap()).to_string();

        assert_eq!(color("v1"), "gold");
        assert_eq!(color("v2"), "aquamarine");
        assert_eq!(color("f"), "lightblue");
        assert_eq!(color("v3"), "lightblue");
        assert_eq!(engine.diagram().role("p"), None);
    }

    #[test]
    fn test_initial_view_shows_roots() {
        let engine = scenario_engine();
        for key in ["v1", "f", "v3", "p", "p.C", "p.C.m"] {
            assert!(visible(&engine, key), "{key} should be visible");
        }
        assert!(!visible(&engine, "v2"));
        for link in engine.diagram().link_ids() {
            assert_eq!(engine.diagram().link_property(link, Property::Visible), Some(false));
        }
        for key in engine.diagram().part_keys() {
            assert!(collapsed(&engine, &key));
        }
        assert_eq!(
            engine.diagram().property("p", Property::IsSubGraphExpanded),
            Some(false)
        );
    }

    #[test]
    fn test_initial_view_sources() {
        let view = ViewConfig {
            initial_view: InitialView::Sources,
            ..ViewConfig::default()
        };
        let engine = engine_for(&flow_document(), view);
        assert!(visible(&engine, "input"));
        assert!(visible(&engine, "app.Main.main"));
        assert!(!visible(&engine, "x"));
        assert!(!visible(&engine, "lib"));
        assert!(!visible(&engine, ".Loose"));
    }

    #[test]
    fn test_hidden_layers_removed_after_load() {
        let view = ViewConfig {
            hidden_layers: vec![Layer::Class],
            ..ViewConfig::default()
        };
        let engine = engine_for(&flow_document(), view);
        assert!(!engine.layers().class);
        assert!(!engine.diagram().contains("lib.Util"));
        assert_eq!(
            engine.diagram().containing_group("lib.Util.clean").as_deref(),
            Some("lib")
        );
    }

    #[test]
    fn test_transact_rolls_back_on_error() {
        let mut engine = scenario_engine();
        let before = engine.diagram().history().len();
        let result: Result<()> = engine.transact("broken", |e| {
            e.diagram.set_property("v2", Property::Visible, true);
            e.layers.set(Layer::Class, false);
            Err(Error::node_not_found("missing"))
        });

        assert!(result.unwrap_err().is_lookup());
        assert!(!visible(&engine, "v2"));
        assert!(engine.layers().class);
        assert_eq!(engine.diagram().history().len(), before);
        assert_eq!(engine.diagram().depth(), 0);
    }

    #[test]
    fn test_toggle_group() {
        let mut engine = scenario_engine();
        assert!(engine.toggle_group("p.C").unwrap());
        assert!(!engine.toggle_group("p.C").unwrap());
        assert!(engine.toggle_group("v1").is_err());
        assert!(engine.toggle_group("nope").is_err());
        assert_eq!(engine.diagram().role("v1"), Some(NodeRole::Source));
    }
}
