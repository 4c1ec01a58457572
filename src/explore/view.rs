//! View Snapshot
//!
//! A serializable picture of what is currently on screen: the tree of
//! visible parts (descending only through visible groups), the visible links
//! and the layer flags. Formatters render this, never the diagram directly.
//!
//! @module explore/view

use compact_str::CompactString;
use serde::Serialize;

use super::diagram::{Diagram, Property};
use super::engine::{ExplorationEngine, LayerState};
use crate::core::config::ColorConfig;
use crate::graph::types::NodeRole;

/// One visible part and its visible members
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartView {
    pub key: CompactString,
    pub is_group: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<NodeRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub collapsed: bool,
    pub highlighted: bool,
    /// Groups only: members are unfolded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<PartView>,
}

/// A visible link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkView {
    pub from: CompactString,
    pub to: CompactString,
    pub highlighted: bool,
}

/// What is currently shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewSnapshot {
    pub layers: LayerState,
    pub parts: Vec<PartView>,
    pub links: Vec<LinkView>,
}

impl ViewSnapshot {
    /// Capture the visible state of a diagram
    pub fn capture<D: Diagram>(diagram: &D, layers: LayerState, colors: &ColorConfig) -> Self {
        let parts = diagram
            .part_keys()
            .into_iter()
            .filter(|key| diagram.containing_group(key).is_none())
            .filter_map(|key| part_view(diagram, &key, colors))
            .collect();

        let links = diagram
            .link_ids()
            .into_iter()
            .filter(|&link| diagram.link_property(link, Property::Visible) == Some(true))
            .filter_map(|link| {
                let (from, to) = diagram.link_endpoints(link)?;
                Some(LinkView {
                    from,
                    to,
                    highlighted: diagram.link_property(link, Property::IsHighlighted) == Some(true),
                })
            })
            .collect();

        Self {
            layers,
            parts,
            links,
        }
    }

    /// Keys of every part in the tree, depth first
    pub fn visible_keys(&self) -> Vec<&str> {
        fn walk<'a>(parts: &'a [PartView], out: &mut Vec<&'a str>) {
            for part in parts {
                out.push(part.key.as_str());
                walk(&part.members, out);
            }
        }
        let mut keys = Vec::new();
        walk(&self.parts, &mut keys);
        keys
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

fn part_view<D: Diagram>(diagram: &D, key: &str, colors: &ColorConfig) -> Option<PartView> {
    if !diagram.is_visible(key) {
        return None;
    }
    let flag = |property| diagram.property(key, property).unwrap_or(false);
    let is_group = diagram.is_group(key);
    let role = diagram.role(key);

    let members = if is_group {
        diagram
            .member_parts(key)
            .iter()
            .filter_map(|member| part_view(diagram, member, colors))
            .collect()
    } else {
        Vec::new()
    };

    Some(PartView {
        key: CompactString::new(key),
        is_group,
        role,
        color: role.map(|r| colors.color_for(r).to_string()),
        collapsed: flag(Property::IsCollapsed),
        highlighted: flag(Property::IsHighlighted),
        expanded: is_group.then(|| flag(Property::IsSubGraphExpanded)),
        members,
    })
}

impl<D: Diagram> ExplorationEngine<D> {
    /// Snapshot of the current view
    pub fn snapshot(&self, colors: &ColorConfig) -> ViewSnapshot {
        ViewSnapshot::capture(&self.diagram, self.layers, colors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explore::engine::tests::scenario_engine;

    #[test]
    fn test_snapshot_of_initial_view() {
        let engine = scenario_engine();
        let view = engine.snapshot(&ColorConfig::default());

        assert_eq!(view.visible_keys(), vec!["p", "p.C", "p.C.m", "v1", "f", "v3"]);
        assert!(view.links.is_empty());
        let method = &view.parts[0].members[0].members[0];
        assert_eq!(method.expanded, Some(false));
        assert_eq!(method.members[0].color.as_deref(), Some("gold"));
        assert_eq!(method.members[1].color.as_deref(), Some("lightblue"));
    }

    #[test]
    fn test_snapshot_lists_visible_links() {
        let mut engine = scenario_engine();
        engine.expand("v1").unwrap();
        let view = engine.snapshot(&ColorConfig::default());
        assert_eq!(
            view.links,
            vec![LinkView {
                from: "v1".into(),
                to: "v2".into(),
                highlighted: false
            }]
        );
        assert!(view.visible_keys().contains(&"v2"));
    }
}
