//! Rendering Collaborator Interface
//!
//! The exploration engine never draws anything itself. It issues structural
//! and property commands against a `Diagram`: add or remove parts, move a
//! part between groups, flip visibility/collapse/highlight flags, and query
//! group membership and link adjacency. Every public engine operation runs
//! inside one named transaction so the collaborator can present it as a
//! single undoable unit.
//!
//! @module explore/diagram

use bitflags::bitflags;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::graph::types::NodeRole;

// =============================================================================
// PART FLAGS
// =============================================================================

bitflags! {
    /// Boolean state of a part or link
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[repr(transparent)]
    pub struct PartFlags: u8 {
        /// Part is a group (package, class or method)
        const IS_GROUP = 0b0000_0001;
        const VISIBLE = 0b0000_0010;
        /// Outgoing dependencies are folded away
        const COLLAPSED = 0b0000_0100;
        const HIGHLIGHTED = 0b0000_1000;
        /// Group shows its members rather than a folded box
        const SUBGRAPH_EXPANDED = 0b0001_0000;
    }
}

impl Default for PartFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// A settable boolean property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Property {
    Visible,
    IsCollapsed,
    IsHighlighted,
    IsSubGraphExpanded,
}

impl Property {
    #[inline]
    pub fn flag(self) -> PartFlags {
        match self {
            Property::Visible => PartFlags::VISIBLE,
            Property::IsCollapsed => PartFlags::COLLAPSED,
            Property::IsHighlighted => PartFlags::HIGHLIGHTED,
            Property::IsSubGraphExpanded => PartFlags::SUBGRAPH_EXPANDED,
        }
    }
}

// =============================================================================
// PART DATA
// =============================================================================

/// Description of a part to add
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartData {
    pub key: CompactString,
    /// Enclosing group key
    pub group: Option<CompactString>,
    /// Leaf role, `None` for groups
    pub role: Option<NodeRole>,
    pub flags: PartFlags,
}

impl PartData {
    /// A group part
    pub fn group(key: impl Into<CompactString>) -> Self {
        Self {
            key: key.into(),
            group: None,
            role: None,
            flags: PartFlags::IS_GROUP,
        }
    }

    /// A leaf node
    pub fn leaf(key: impl Into<CompactString>, role: NodeRole) -> Self {
        Self {
            key: key.into(),
            group: None,
            role: Some(role),
            flags: PartFlags::empty(),
        }
    }

    pub fn in_group(mut self, group: Option<CompactString>) -> Self {
        self.group = group;
        self
    }

    pub fn with(mut self, flags: PartFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn is_group(&self) -> bool {
        self.flags.contains(PartFlags::IS_GROUP)
    }
}

/// Handle of a link between two leaves
pub type LinkId = usize;

// =============================================================================
// DIAGRAM TRAIT
// =============================================================================

/// Command surface of the rendering collaborator
pub trait Diagram {
    // -------------------------------------------------------------------------
    // Transactions
    // -------------------------------------------------------------------------

    /// Open a (possibly nested) transaction
    fn start_transaction(&mut self, name: &str);

    /// Close the innermost transaction, keeping its changes
    fn commit_transaction(&mut self, name: &str);

    /// Close the innermost transaction, discarding its changes
    fn rollback_transaction(&mut self);

    // -------------------------------------------------------------------------
    // Structure
    // -------------------------------------------------------------------------

    /// Add a part; `false` if the key is taken
    fn add_part(&mut self, part: PartData) -> bool;

    /// Remove a part; its members become top-level
    fn remove_part(&mut self, key: &str) -> bool;

    fn contains(&self, key: &str) -> bool;

    fn is_group(&self, key: &str) -> bool;

    fn role(&self, key: &str) -> Option<NodeRole>;

    fn containing_group(&self, key: &str) -> Option<CompactString>;

    /// Move a part under `group`, or to the top level
    fn set_group(&mut self, key: &str, group: Option<&str>) -> bool;

    fn member_parts(&self, group: &str) -> Vec<CompactString>;

    /// Keys of every live part in insertion order
    fn part_keys(&self) -> Vec<CompactString>;

    // -------------------------------------------------------------------------
    // Properties
    // -------------------------------------------------------------------------

    fn property(&self, key: &str, property: Property) -> Option<bool>;

    fn set_property(&mut self, key: &str, property: Property, value: bool) -> bool;

    // -------------------------------------------------------------------------
    // Links
    // -------------------------------------------------------------------------

    /// Add a link between two existing parts
    fn add_link(&mut self, from: &str, to: &str) -> Option<LinkId>;

    fn link_ids(&self) -> Vec<LinkId>;

    fn links_into(&self, key: &str) -> Vec<LinkId>;

    fn links_out_of(&self, key: &str) -> Vec<LinkId>;

    fn link_endpoints(&self, link: LinkId) -> Option<(CompactString, CompactString)>;

    fn link_property(&self, link: LinkId, property: Property) -> Option<bool>;

    fn set_link_property(&mut self, link: LinkId, property: Property, value: bool) -> bool;

    // -------------------------------------------------------------------------
    // Provided queries
    // -------------------------------------------------------------------------

    #[inline]
    fn is_visible(&self, key: &str) -> bool {
        self.property(key, Property::Visible).unwrap_or(false)
    }

    /// Distinct targets of a node's outgoing links
    fn nodes_out_of(&self, key: &str) -> Vec<CompactString> {
        let mut nodes: Vec<CompactString> = Vec::new();
        for link in self.links_out_of(key) {
            if let Some((_, to)) = self.link_endpoints(link) {
                if !nodes.contains(&to) {
                    nodes.push(to);
                }
            }
        }
        nodes
    }

    /// Outgoing links of `from` ending at `to`
    fn links_between(&self, from: &str, to: &str) -> Vec<LinkId> {
        self.links_out_of(from)
            .into_iter()
            .filter(|&link| {
                self.link_endpoints(link)
                    .map_or(false, |(_, target)| target == to)
            })
            .collect()
    }

    fn any_member_visible(&self, group: &str) -> bool {
        self.member_parts(group).iter().any(|m| self.is_visible(m))
    }

    /// Drop every highlight on parts and links
    fn clear_highlights(&mut self) {
        for key in self.part_keys() {
            self.set_property(&key, Property::IsHighlighted, false);
        }
        for link in self.link_ids() {
            self.set_link_property(link, Property::IsHighlighted, false);
        }
    }
}
