//! Highlighting and Reset
//!
//! Path highlighting is purely additive: it marks nodes and links and makes
//! them visible, never hiding anything. Reset goes the other way and brings
//! the view back to just the source nodes and their enclosing groups.
//!
//! @module explore/highlight

use compact_str::CompactString;
use tracing::{debug, warn};

use super::diagram::{Diagram, Property};
use super::engine::ExplorationEngine;
use crate::core::error::{Error, Result};
use crate::graph::model::filter_fields;

impl<D: Diagram> ExplorationEngine<D> {
    // -------------------------------------------------------------------------
    // Paths
    // -------------------------------------------------------------------------

    /// Highlight one path of variable ids; field ids are skipped
    pub fn highlight_path(&mut self, path: &[u32]) -> Result<()> {
        self.transact("highlight path", |engine| engine.mark_path(path))
    }

    /// Highlight the recommended path at `index`
    pub fn highlight_recommended_path(&mut self, index: usize) -> Result<()> {
        let count = self.model.recommended_paths().len();
        let path = self
            .model
            .recommended_paths()
            .get(index)
            .cloned()
            .ok_or(Error::PathNotFound { index, count })?;
        self.transact("highlight path", |engine| engine.mark_path(&path))
    }

    /// Highlight every recommended path.
    ///
    /// Each path is its own nested transaction; a path naming an unknown
    /// node is rolled back and skipped. Returns how many paths were marked.
    pub fn highlight_recommended(&mut self) -> Result<usize> {
        self.transact("highlight recommended paths", |engine| {
            let paths = engine.model.recommended_paths().to_vec();
            let mut marked = 0;
            for (index, path) in paths.iter().enumerate() {
                engine.diagram.start_transaction("highlight path");
                match engine.mark_path(path) {
                    Ok(()) => {
                        engine.diagram.commit_transaction("highlight path");
                        marked += 1;
                    }
                    Err(e) => {
                        engine.diagram.rollback_transaction();
                        warn!(index, error = %e, "Skipped recommended path");
                    }
                }
            }
            debug!(marked, total = paths.len(), "Highlighted recommended paths");
            Ok(marked)
        })
    }

    fn mark_path(&mut self, path: &[u32]) -> Result<()> {
        let path = filter_fields(self.model.relation(), path);
        let keys = path
            .iter()
            .map(|&id| self.leaf_key(id))
            .collect::<Result<Vec<_>>>()?;

        for pair in keys.windows(2) {
            self.mark_on_path(&pair[0]);
            for link in self.diagram.links_between(&pair[0], &pair[1]) {
                self.diagram
                    .set_link_property(link, Property::IsHighlighted, true);
                self.diagram.set_link_property(link, Property::Visible, true);
            }
        }
        if let Some(last) = keys.last() {
            self.mark_on_path(last);
        }
        Ok(())
    }

    fn mark_on_path(&mut self, key: &str) {
        self.diagram.set_property(key, Property::IsHighlighted, true);
        self.diagram.set_property(key, Property::IsCollapsed, false);
        self.reveal(key);
    }

    // -------------------------------------------------------------------------
    // Trace
    // -------------------------------------------------------------------------

    /// Highlight `key` and what it reaches, `trace_depth` levels deep
    pub fn trace_from(&mut self, key: &str) -> Result<()> {
        let depth = self.view.trace_depth;
        self.trace_to_depth(key, depth)
    }

    /// Clear highlights, then mark `key`, its outgoing links and successors.
    ///
    /// Nodes `depth` levels away are reached by a highlighted link but are
    /// not highlighted themselves.
    pub fn trace_to_depth(&mut self, key: &str, depth: usize) -> Result<()> {
        self.transact("highlight", |engine| {
            engine.require(key)?;
            engine.diagram.clear_highlights();

            let mut stack: Vec<(CompactString, usize)> = vec![(CompactString::new(key), depth)];
            while let Some((node, remaining)) = stack.pop() {
                if remaining == 0 {
                    continue;
                }
                engine
                    .diagram
                    .set_property(&node, Property::IsHighlighted, true);
                for link in engine.diagram.links_out_of(&node) {
                    engine
                        .diagram
                        .set_link_property(link, Property::IsHighlighted, true);
                }
                for next in engine.diagram.nodes_out_of(&node) {
                    stack.push((next, remaining - 1));
                }
            }
            Ok(())
        })
    }

    /// Drop every highlight, leaving visibility alone
    pub fn clear_highlights(&mut self) -> Result<()> {
        self.transact("clear highlights", |engine| {
            engine.diagram.clear_highlights();
            Ok(())
        })
    }

    // -------------------------------------------------------------------------
    // Reset
    // -------------------------------------------------------------------------

    /// Collapse and hide everything, then show the sources
    pub fn reset(&mut self) -> Result<()> {
        self.transact("hide all", |engine| engine.reset_view())
    }

    pub(crate) fn reset_view(&mut self) -> Result<()> {
        for key in self.diagram.part_keys() {
            self.diagram.set_property(&key, Property::IsCollapsed, true);
            self.conceal(&key, true);
        }
        for link in self.diagram.link_ids() {
            self.diagram.set_link_property(link, Property::Visible, false);
        }

        let sources = self.model.sources().to_vec();
        for id in sources {
            let key = CompactString::new(self.model.var_name(id)?);
            if !self.diagram.contains(&key) {
                warn!(source = %key, "Source has no node in the diagram, skipped");
                continue;
            }
            self.diagram.set_property(&key, Property::Visible, true);
            let mut group = self.diagram.containing_group(&key);
            while let Some(g) = group {
                self.diagram
                    .set_property(&g, Property::IsSubGraphExpanded, false);
                self.diagram.set_property(&g, Property::Visible, true);
                group = self.diagram.containing_group(&g);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{InitialView, ViewConfig};
    use crate::explore::engine::tests::{
        collapsed, engine_for, flow_engine, scenario_engine, visible,
    };
    use crate::graph::document::{Document, IdKey};
    use crate::graph::fixtures::flow::*;
    use crate::graph::fixtures::{flow_document, F, V1, V2};

    /// `fld` listed only under its class and marked as a source
    fn field_source_document() -> Document {
        let mut doc = flow_document();
        doc.relation.method_to_vars.insert(IdKey(1), vec![JOINED]);
        doc.source_nodes.push(FLD);
        doc
    }

    fn highlighted(engine: &ExplorationEngine, key: &str) -> bool {
        engine
            .diagram()
            .property(key, Property::IsHighlighted)
            .unwrap()
    }

    fn link_highlighted(engine: &ExplorationEngine, from: &str, to: &str) -> bool {
        let links = engine.diagram().links_between(from, to);
        !links.is_empty()
            && links
                .into_iter()
                .all(|l| engine.diagram().link_property(l, Property::IsHighlighted) == Some(true))
    }

    #[test]
    fn test_highlight_skips_fields() {
        let mut engine = scenario_engine();
        engine.highlight_path(&[V1, F, V2]).unwrap();

        assert!(highlighted(&engine, "v1"));
        assert!(highlighted(&engine, "v2"));
        assert!(visible(&engine, "v2"));
        assert!(!collapsed(&engine, "v1"));
        assert!(link_highlighted(&engine, "v1", "v2"));
        assert!(!highlighted(&engine, "f"));
        assert!(!link_highlighted(&engine, "f", "v2"));
    }

    #[test]
    fn test_highlight_is_additive() {
        let mut engine = flow_engine();
        let shown: Vec<_> = engine
            .diagram()
            .part_keys()
            .into_iter()
            .filter(|k| visible(&engine, k))
            .collect();

        engine.highlight_recommended().unwrap();
        for key in &shown {
            assert!(visible(&engine, key), "{key} was hidden by a highlight");
        }
        for key in ["input", "a", "joined", "out", "lib.Util.sink"] {
            assert!(visible(&engine, key), "{key} should be visible");
        }
        assert!(link_highlighted(&engine, "joined", "out"));
        assert!(!highlighted(&engine, "fld"));
        assert!(!highlighted(&engine, "b"));
    }

    #[test]
    fn test_highlight_unknown_path_index() {
        let mut engine = flow_engine();
        let err = engine.highlight_recommended_path(3).unwrap_err();
        assert_eq!(err.status_message(), "path not found");
        engine.highlight_recommended_path(0).unwrap();
        assert!(highlighted(&engine, "out"));
    }

    #[test]
    fn test_bad_path_rolls_back_alone() {
        let mut engine = flow_engine();
        engine.model.recommended_paths_mut().push(vec![INPUT, 42]);

        let marked = engine.highlight_recommended().unwrap();
        assert_eq!(marked, 1);
        assert!(highlighted(&engine, "joined"));

        let err = engine.highlight_path(&[X, 42]).unwrap_err();
        assert!(err.is_lookup());
        assert!(!highlighted(&engine, "x"));
    }

    #[test]
    fn test_trace_marks_successors_to_depth() {
        let mut engine = flow_engine();
        engine.highlight_path(&[X]).unwrap();
        engine.trace_to_depth("input", 2).unwrap();

        assert!(!highlighted(&engine, "x"));
        assert!(highlighted(&engine, "input"));
        assert!(highlighted(&engine, "a"));
        assert!(highlighted(&engine, "b"));
        assert!(link_highlighted(&engine, "a", "joined"));
        assert!(!highlighted(&engine, "joined"));
        // tracing does not change visibility
        assert!(!visible(&engine, "a"));
    }

    #[test]
    fn test_clear_highlights_keeps_visibility() {
        let mut engine = flow_engine();
        engine.highlight_recommended().unwrap();
        engine.clear_highlights().unwrap();
        assert!(!highlighted(&engine, "input"));
        assert!(!link_highlighted(&engine, "a", "joined"));
        assert!(visible(&engine, "joined"));
    }

    #[test]
    fn test_reset_shows_only_sources() {
        let mut engine = flow_engine();
        engine.expand("input").unwrap();
        engine.highlight_recommended().unwrap();
        engine.reset().unwrap();

        let shown: Vec<String> = engine
            .diagram()
            .part_keys()
            .into_iter()
            .filter(|k| visible(&engine, k))
            .map(|k| k.to_string())
            .collect();
        assert_eq!(shown, vec!["app", "app.Main", "app.Main.main", "input"]);

        for key in engine.diagram().part_keys() {
            assert!(collapsed(&engine, &key), "{key} should be collapsed");
        }
        for link in engine.diagram().link_ids() {
            assert_eq!(engine.diagram().link_property(link, Property::Visible), Some(false));
        }
        assert_eq!(
            engine.diagram().property("app", Property::IsSubGraphExpanded),
            Some(false)
        );
    }

    #[test]
    fn test_reset_skips_source_without_node() {
        let mut engine = engine_for(&field_source_document(), ViewConfig::default());
        assert!(!engine.diagram().contains("fld"));
        engine.expand("input").unwrap();
        assert!(visible(&engine, "a"));

        engine.reset().unwrap();
        assert!(visible(&engine, "input"));
        assert!(!visible(&engine, "a"));
        assert!(!visible(&engine, "lib"));
    }

    #[test]
    fn test_sources_view_loads_with_field_source() {
        let view = ViewConfig {
            initial_view: InitialView::Sources,
            ..ViewConfig::default()
        };
        let engine = engine_for(&field_source_document(), view);
        assert!(visible(&engine, "input"));
        assert!(visible(&engine, "app.Main.main"));
        assert!(!visible(&engine, "joined"));
    }
}
