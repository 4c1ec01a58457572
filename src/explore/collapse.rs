//! Collapse and Expand
//!
//! Collapsing a node folds away everything reachable from it that has no
//! other visible way in. A node that still has a visible incoming link from
//! outside the collapsed region stays put, which keeps diamond join points
//! reachable from an expanded sibling. Expanding is one level deep.
//!
//! @module explore/collapse

use compact_str::CompactString;
use tracing::debug;

use super::diagram::{Diagram, Property};
use super::engine::ExplorationEngine;
use crate::core::error::Result;

impl<D: Diagram> ExplorationEngine<D> {
    /// Collapse everything downstream of `key`
    pub fn collapse(&mut self, key: &str) -> Result<()> {
        self.transact("collapse", |engine| {
            engine.require(key)?;
            engine.collapse_from(key);
            Ok(())
        })
    }

    /// Show the direct successors of `key`
    pub fn expand(&mut self, key: &str) -> Result<()> {
        self.transact("expand", |engine| {
            engine.require(key)?;
            engine.expand_from(key);
            Ok(())
        })
    }

    /// Expand a collapsed node, collapse an expanded one.
    ///
    /// Returns `true` when the node ends up expanded.
    pub fn toggle(&mut self, key: &str) -> Result<bool> {
        self.transact("toggled visibility of dependencies", |engine| {
            engine.require(key)?;
            if engine.is_collapsed(key) {
                engine.expand_from(key);
                Ok(true)
            } else {
                engine.collapse_from(key);
                Ok(false)
            }
        })
    }

    pub(crate) fn is_collapsed(&self, key: &str) -> bool {
        self.diagram
            .property(key, Property::IsCollapsed)
            .unwrap_or(false)
    }

    fn has_visible_inbound(&self, key: &str) -> bool {
        self.diagram
            .links_into(key)
            .into_iter()
            .any(|link| self.diagram.link_property(link, Property::Visible) == Some(true))
    }

    /// Depth-first collapse rooted at `start`.
    ///
    /// A node that was already collapsed is hidden but not walked through,
    /// so cycles terminate.
    pub(crate) fn collapse_from(&mut self, start: &str) {
        let mut stack: Vec<CompactString> = vec![CompactString::new(start)];
        let mut visited = 0usize;

        while let Some(node) = stack.pop() {
            let is_start = node == start;
            if !is_start && self.has_visible_inbound(&node) {
                continue;
            }
            if self.is_collapsed(&node) {
                if !is_start {
                    self.conceal(&node, false);
                }
                continue;
            }

            visited += 1;
            self.diagram.set_property(&node, Property::IsCollapsed, true);
            if !is_start {
                self.conceal(&node, false);
            }
            for link in self.diagram.links_out_of(&node) {
                self.diagram.set_link_property(link, Property::Visible, false);
            }
            let successors = self.diagram.nodes_out_of(&node);
            stack.extend(successors.into_iter().rev());
        }

        debug!(start, collapsed = visited, "Collapsed subgraph");
    }

    /// Mark `node` expanded and reveal its direct successors
    pub(crate) fn expand_from(&mut self, node: &str) {
        if !self.is_collapsed(node) {
            return;
        }
        self.diagram.set_property(node, Property::IsCollapsed, false);
        for successor in self.diagram.nodes_out_of(node) {
            self.reveal(&successor);
        }
        for link in self.diagram.links_out_of(node) {
            self.diagram.set_link_property(link, Property::Visible, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ViewConfig;
    use crate::explore::engine::tests::{collapsed, engine_for, flow_engine, visible};
    use crate::graph::fixtures::cycle_document;

    fn link_visible(engine: &ExplorationEngine, from: &str, to: &str) -> bool {
        engine
            .diagram()
            .links_between(from, to)
            .into_iter()
            .all(|l| engine.diagram().link_property(l, Property::Visible) == Some(true))
    }

    #[test]
    fn test_expand_reveals_successors() {
        let mut engine = flow_engine();
        assert!(!visible(&engine, "a"));

        engine.expand("input").unwrap();
        assert!(!collapsed(&engine, "input"));
        assert!(visible(&engine, "a"));
        assert!(visible(&engine, "b"));
        assert!(link_visible(&engine, "input", "a"));
        // one level only
        assert!(!visible(&engine, "joined"));
    }

    #[test]
    fn test_expand_reveals_hidden_groups() {
        let mut engine = flow_engine();
        engine.expand("input").unwrap();
        engine.expand("a").unwrap();
        engine.expand("joined").unwrap();
        assert!(visible(&engine, "out"));
        assert!(visible(&engine, "lib.Util.sink"));
        assert!(visible(&engine, "lib.Util"));
    }

    #[test]
    fn test_expand_twice_is_noop() {
        let mut engine = flow_engine();
        engine.expand("input").unwrap();
        engine.expand("input").unwrap();
        let tx = engine.diagram().last_transaction().unwrap();
        assert!(tx.mutations.is_empty());
    }

    #[test]
    fn test_collapse_keeps_join_point_with_visible_inbound() {
        let mut engine = flow_engine();
        engine.expand("input").unwrap();
        engine.expand("a").unwrap();
        engine.expand("b").unwrap();
        assert!(visible(&engine, "joined"));

        engine.collapse("a").unwrap();
        assert!(collapsed(&engine, "a"));
        assert!(visible(&engine, "a"));
        assert!(visible(&engine, "joined"));
        assert!(!link_visible(&engine, "a", "joined"));
        assert!(link_visible(&engine, "b", "joined"));
    }

    #[test]
    fn test_collapse_from_root_hides_subgraph() {
        let mut engine = flow_engine();
        engine.expand("input").unwrap();
        engine.expand("a").unwrap();
        engine.expand("b").unwrap();

        engine.collapse("input").unwrap();
        assert!(visible(&engine, "input"));
        for key in ["a", "b", "joined"] {
            assert!(!visible(&engine, key), "{key} should be hidden");
            assert!(collapsed(&engine, key));
        }
        // fld is still a visible root of lib.Util.clean
        assert!(visible(&engine, "lib.Util.clean"));
    }

    #[test]
    fn test_collapse_hides_emptied_groups() {
        let mut engine = flow_engine();
        engine.expand("input").unwrap();
        engine.expand("a").unwrap();
        engine.expand("joined").unwrap();
        assert!(visible(&engine, "lib.Util.sink"));

        engine.collapse("joined").unwrap();
        assert!(!visible(&engine, "out"));
        assert!(!visible(&engine, "lib.Util.sink"));
        assert!(visible(&engine, "lib.Util"));
    }

    #[test]
    fn test_toggle_alternates() {
        let mut engine = flow_engine();
        assert!(engine.toggle("input").unwrap());
        assert!(visible(&engine, "a"));
        assert!(!engine.toggle("input").unwrap());
        assert!(!visible(&engine, "a"));
    }

    #[test]
    fn test_collapse_terminates_on_cycle() {
        let mut engine = engine_for(&cycle_document(), ViewConfig::default());
        engine.expand("s").unwrap();
        engine.expand("c1").unwrap();
        engine.expand("c2").unwrap();

        // c1 -> c2 -> c1: the walk reaches c1 again after marking it
        // collapsed and stops there instead of going around the loop
        engine.collapse("c1").unwrap();
        assert!(visible(&engine, "c1"));
        assert!(collapsed(&engine, "c1"));
        assert!(!visible(&engine, "c2"));
        assert!(collapsed(&engine, "c2"));
        for (from, to) in [("c1", "c2"), ("c2", "c1")] {
            for link in engine.diagram().links_between(from, to) {
                assert_eq!(engine.diagram().link_property(link, Property::Visible), Some(false));
            }
        }
        assert!(visible(&engine, "s"));
    }

    #[test]
    fn test_unknown_node_leaves_state_untouched() {
        let mut engine = flow_engine();
        let before = engine.diagram().history().len();
        let err = engine.toggle("nowhere").unwrap_err();
        assert_eq!(err.status_message(), "node not found");
        assert_eq!(engine.diagram().history().len(), before);
    }
}
