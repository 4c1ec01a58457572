//! In-Memory Diagram
//!
//! `Scene` is the reference `Diagram` implementation used by the CLI and the
//! tests. Parts live in an arena indexed by slot; group membership and link
//! adjacency are slot lists so moving a part or walking its links never
//! touches the key map. Nested transactions snapshot the whole state and
//! roll back by restoring the snapshot. Every effective change inside a
//! transaction is recorded as a `Mutation`, and committed top-level
//! transactions are kept as history.
//!
//! @module explore/scene

use std::collections::{BTreeSet, HashMap};

use compact_str::CompactString;
use serde::Serialize;
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use super::diagram::{Diagram, LinkId, PartData, PartFlags, Property};
use crate::graph::types::NodeRole;

type Slots = SmallVec<[usize; 8]>;

// =============================================================================
// CHANGE LOG
// =============================================================================

/// One effective change to the scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Mutation {
    AddPart {
        key: CompactString,
        group: Option<CompactString>,
    },
    RemovePart {
        key: CompactString,
    },
    SetGroup {
        key: CompactString,
        group: Option<CompactString>,
    },
    SetProperty {
        key: CompactString,
        property: Property,
        value: bool,
    },
    SetLinkProperty {
        from: CompactString,
        to: CompactString,
        property: Property,
        value: bool,
    },
}

/// A committed top-level transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub name: String,
    pub mutations: Vec<Mutation>,
}

struct OpenTransaction {
    name: String,
    snapshot: SceneState,
    log_mark: usize,
}

// =============================================================================
// STATE
// =============================================================================

#[derive(Debug, Clone)]
struct Part {
    key: CompactString,
    group: Option<usize>,
    role: Option<NodeRole>,
    flags: PartFlags,
}

#[derive(Debug, Clone)]
struct Link {
    from: usize,
    to: usize,
    flags: PartFlags,
    removed: bool,
}

#[derive(Debug, Clone, Default)]
struct SceneState {
    parts: Vec<Option<Part>>,
    by_key: HashMap<CompactString, usize>,
    members: Vec<Slots>,
    links: Vec<Link>,
    outgoing: Vec<SmallVec<[LinkId; 4]>>,
    incoming: Vec<SmallVec<[LinkId; 4]>>,
    /// Slots of removed parts, reused lowest first
    free: BTreeSet<usize>,
}

impl SceneState {
    #[inline]
    fn slot(&self, key: &str) -> Option<usize> {
        self.by_key.get(key).copied()
    }

    #[inline]
    fn part(&self, key: &str) -> Option<&Part> {
        self.slot(key).and_then(|s| self.parts[s].as_ref())
    }

    #[inline]
    fn key_of(&self, slot: usize) -> Option<&CompactString> {
        self.parts.get(slot).and_then(|p| p.as_ref()).map(|p| &p.key)
    }

    fn detach(&mut self, slot: usize) {
        let parent = self.parts[slot].as_ref().and_then(|p| p.group);
        if let Some(parent) = parent {
            self.members[parent].retain(|m| *m != slot);
        }
    }

    fn attach(&mut self, slot: usize, group: Option<usize>) {
        if let Some(part) = self.parts[slot].as_mut() {
            part.group = group;
        }
        if let Some(group) = group {
            self.members[group].push(slot);
        }
    }

    fn is_ancestor(&self, candidate: usize, slot: usize) -> bool {
        let mut current = Some(candidate);
        while let Some(c) = current {
            if c == slot {
                return true;
            }
            current = self.parts[c].as_ref().and_then(|p| p.group);
        }
        false
    }

    fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(id).filter(|l| !l.removed)
    }

    /// Store `part` in a free slot or a new one
    fn allocate(&mut self, part: Part) -> usize {
        if let Some(slot) = self.free.pop_first() {
            self.parts[slot] = Some(part);
            return slot;
        }
        self.parts.push(Some(part));
        self.members.push(Slots::new());
        self.outgoing.push(SmallVec::new());
        self.incoming.push(SmallVec::new());
        self.parts.len() - 1
    }
}

// =============================================================================
// SCENE
// =============================================================================

/// Arena-backed diagram with nested transactions
#[derive(Default)]
pub struct Scene {
    state: SceneState,
    open: Vec<OpenTransaction>,
    log: Vec<Mutation>,
    history: Vec<Transaction>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed top-level transactions, oldest first
    pub fn history(&self) -> &[Transaction] {
        &self.history
    }

    pub fn last_transaction(&self) -> Option<&Transaction> {
        self.history.last()
    }

    /// Number of currently open transactions
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    pub fn part_count(&self) -> usize {
        self.state.by_key.len()
    }

    pub fn link_count(&self) -> usize {
        self.state.links.iter().filter(|l| !l.removed).count()
    }

    /// Flags of a part
    pub fn flags(&self, key: &str) -> Option<PartFlags> {
        self.state.part(key).map(|p| p.flags)
    }

    fn record(&mut self, mutation: Mutation) {
        if !self.open.is_empty() {
            trace!(?mutation, "Recorded mutation");
            self.log.push(mutation);
        }
    }

    fn link_keys(&self, link: &Link) -> (CompactString, CompactString) {
        let key = |slot| self.state.key_of(slot).cloned().unwrap_or_default();
        (key(link.from), key(link.to))
    }
}

impl Diagram for Scene {
    fn start_transaction(&mut self, name: &str) {
        trace!(name, depth = self.open.len(), "Start transaction");
        self.open.push(OpenTransaction {
            name: name.to_string(),
            snapshot: self.state.clone(),
            log_mark: self.log.len(),
        });
    }

    fn commit_transaction(&mut self, name: &str) {
        let Some(tx) = self.open.pop() else {
            warn!(name, "Commit without an open transaction");
            return;
        };
        if tx.name != name {
            debug!(open = %tx.name, name, "Committing transaction under a different name");
        }
        if self.open.is_empty() {
            let mutations = std::mem::take(&mut self.log);
            debug!(name = %tx.name, changes = mutations.len(), "Committed transaction");
            self.history.push(Transaction {
                name: tx.name,
                mutations,
            });
        }
    }

    fn rollback_transaction(&mut self) {
        let Some(tx) = self.open.pop() else {
            warn!("Rollback without an open transaction");
            return;
        };
        debug!(name = %tx.name, "Rolled back transaction");
        self.state = tx.snapshot;
        self.log.truncate(tx.log_mark);
    }

    fn add_part(&mut self, part: PartData) -> bool {
        if self.state.by_key.contains_key(&part.key) {
            debug!(key = %part.key, "Part already present");
            return false;
        }
        let group = part.group.as_deref().and_then(|g| {
            let slot = self.state.slot(g);
            if slot.is_none() {
                debug!(key = %part.key, group = g, "Unknown group, adding at top level");
            }
            slot
        });

        let slot = self.state.allocate(Part {
            key: part.key.clone(),
            group: None,
            role: part.role,
            flags: part.flags,
        });
        self.state.by_key.insert(part.key.clone(), slot);
        self.state.attach(slot, group);

        let group = group.and_then(|g| self.state.key_of(g).cloned());
        self.record(Mutation::AddPart {
            key: part.key,
            group,
        });
        true
    }

    fn remove_part(&mut self, key: &str) -> bool {
        let Some(slot) = self.state.slot(key) else {
            return false;
        };
        self.state.detach(slot);
        for member in std::mem::take(&mut self.state.members[slot]) {
            if let Some(p) = self.state.parts[member].as_mut() {
                p.group = None;
            }
        }

        let touching: Vec<LinkId> = self.state.outgoing[slot]
            .iter()
            .chain(self.state.incoming[slot].iter())
            .copied()
            .collect();
        for id in touching {
            let (from, to) = {
                let link = &mut self.state.links[id];
                link.removed = true;
                (link.from, link.to)
            };
            self.state.outgoing[from].retain(|l| *l != id);
            self.state.incoming[to].retain(|l| *l != id);
        }

        self.state.parts[slot] = None;
        self.state.free.insert(slot);
        self.state.by_key.remove(key);
        self.record(Mutation::RemovePart { key: key.into() });
        true
    }

    fn contains(&self, key: &str) -> bool {
        self.state.by_key.contains_key(key)
    }

    fn is_group(&self, key: &str) -> bool {
        self.state
            .part(key)
            .map_or(false, |p| p.flags.contains(PartFlags::IS_GROUP))
    }

    fn role(&self, key: &str) -> Option<NodeRole> {
        self.state.part(key).and_then(|p| p.role)
    }

    fn containing_group(&self, key: &str) -> Option<CompactString> {
        let group = self.state.part(key)?.group?;
        self.state.key_of(group).cloned()
    }

    fn set_group(&mut self, key: &str, group: Option<&str>) -> bool {
        let Some(slot) = self.state.slot(key) else {
            return false;
        };
        let target = match group {
            Some(g) => match self.state.slot(g) {
                Some(t) if !self.state.is_ancestor(t, slot) => Some(t),
                Some(_) => {
                    warn!(key, group = g, "Refusing to nest a part inside itself");
                    return false;
                }
                None => return false,
            },
            None => None,
        };
        if self.state.parts[slot].as_ref().and_then(|p| p.group) == target {
            return true;
        }
        self.state.detach(slot);
        self.state.attach(slot, target);
        self.record(Mutation::SetGroup {
            key: key.into(),
            group: group.map(CompactString::from),
        });
        true
    }

    fn member_parts(&self, group: &str) -> Vec<CompactString> {
        match self.state.slot(group) {
            Some(slot) => self.state.members[slot]
                .iter()
                .filter_map(|&m| self.state.key_of(m).cloned())
                .collect(),
            None => Vec::new(),
        }
    }

    fn part_keys(&self) -> Vec<CompactString> {
        self.state
            .parts
            .iter()
            .flatten()
            .map(|p| p.key.clone())
            .collect()
    }

    fn property(&self, key: &str, property: Property) -> Option<bool> {
        self.state
            .part(key)
            .map(|p| p.flags.contains(property.flag()))
    }

    fn set_property(&mut self, key: &str, property: Property, value: bool) -> bool {
        let Some(slot) = self.state.slot(key) else {
            return false;
        };
        let Some(part) = self.state.parts[slot].as_mut() else {
            return false;
        };
        if part.flags.contains(property.flag()) == value {
            return true;
        }
        part.flags.set(property.flag(), value);
        self.record(Mutation::SetProperty {
            key: key.into(),
            property,
            value,
        });
        true
    }

    fn add_link(&mut self, from: &str, to: &str) -> Option<LinkId> {
        let from = self.state.slot(from)?;
        let to = self.state.slot(to)?;
        let id = self.state.links.len();
        self.state.links.push(Link {
            from,
            to,
            flags: PartFlags::empty(),
            removed: false,
        });
        self.state.outgoing[from].push(id);
        self.state.incoming[to].push(id);
        Some(id)
    }

    fn link_ids(&self) -> Vec<LinkId> {
        self.state
            .links
            .iter()
            .enumerate()
            .filter(|(_, l)| !l.removed)
            .map(|(id, _)| id)
            .collect()
    }

    fn links_into(&self, key: &str) -> Vec<LinkId> {
        self.state
            .slot(key)
            .map(|s| self.state.incoming[s].to_vec())
            .unwrap_or_default()
    }

    fn links_out_of(&self, key: &str) -> Vec<LinkId> {
        self.state
            .slot(key)
            .map(|s| self.state.outgoing[s].to_vec())
            .unwrap_or_default()
    }

    fn link_endpoints(&self, link: LinkId) -> Option<(CompactString, CompactString)> {
        self.state.link(link).map(|l| self.link_keys(l))
    }

    fn link_property(&self, link: LinkId, property: Property) -> Option<bool> {
        self.state
            .link(link)
            .map(|l| l.flags.contains(property.flag()))
    }

    fn set_link_property(&mut self, link: LinkId, property: Property, value: bool) -> bool {
        let Some(current) = self.state.link(link) else {
            return false;
        };
        if current.flags.contains(property.flag()) == value {
            return true;
        }
        let (from, to) = self.link_keys(current);
        self.state.links[link].flags.set(property.flag(), value);
        self.record(Mutation::SetLinkProperty {
            from,
            to,
            property,
            value,
        });
        true
    }
}

// =============================================================================
// TESTS
// =============================================================================
