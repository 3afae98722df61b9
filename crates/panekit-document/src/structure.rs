#![forbid(unsafe_code)]

//! Binary split/tab tree.
//!
//! Leaves are [`PaneData`] tab groups; inner nodes are [`SplitData`] with
//! exactly two children. Nodes live in an arena keyed by [`StructureId`]
//! and store their parent.
//!
//! # Invariants
//!
//! 1. The root has no parent and every other node is reachable from it.
//! 2. A split always has both `first` and `last` populated, and both point
//!    back to it.
//! 3. Document ids are unique across the whole tree.
//! 4. A non-empty pane always has a selected document.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use panekit_core::{CompassDirection, UnknownDirection};
use serde::{Deserialize, Serialize};

use crate::document::DocumentData;
use crate::error::DocumentError;

/// Stable arena identifier for panes and splits. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructureId(u64);

impl StructureId {
    pub const MIN: Self = Self(1);

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    pub fn checked_next(self) -> Result<Self, DocumentError> {
        match self.0.checked_add(1) {
            Some(next) => Ok(Self(next)),
            None => Err(DocumentError::StructureIdOverflow),
        }
    }
}

impl Default for StructureId {
    fn default() -> Self {
        Self::MIN
    }
}

/// Divider orientation of a split.
///
/// A `Vertical` divider puts the two sides next to each other (left and
/// right); a `Horizontal` divider stacks them (top and bottom).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitOrientation {
    Horizontal,
    Vertical,
}

impl SplitOrientation {
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

/// Side of a pane a new pane is split off towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitDirection {
    Left,
    Right,
    Top,
    Bottom,
}

impl SplitDirection {
    pub const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Top, Self::Bottom];

    #[must_use]
    pub const fn orientation(self) -> SplitOrientation {
        match self {
            Self::Left | Self::Right => SplitOrientation::Vertical,
            Self::Top | Self::Bottom => SplitOrientation::Horizontal,
        }
    }

    /// Whether the new pane takes the `last` side of the split.
    #[must_use]
    pub const fn new_pane_last(self) -> bool {
        matches!(self, Self::Right | Self::Bottom)
    }
}

impl From<CompassDirection> for SplitDirection {
    fn from(direction: CompassDirection) -> Self {
        match direction {
            CompassDirection::West => Self::Left,
            CompassDirection::East => Self::Right,
            CompassDirection::North => Self::Top,
            CompassDirection::South => Self::Bottom,
        }
    }
}

impl FromStr for SplitDirection {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<CompassDirection>().map(Self::from)
    }
}

/// Tab group: ordered documents plus the selected tab.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaneData {
    documents: Vec<DocumentData>,
    selected: Option<usize>,
}

impl PaneData {
    #[must_use]
    pub fn documents(&self) -> &[DocumentData] {
        &self.documents
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    #[must_use]
    pub const fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn selected(&self) -> Option<&DocumentData> {
        self.selected.and_then(|index| self.documents.get(index))
    }

    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.documents.iter().position(|document| document.id == id)
    }

    #[must_use]
    pub fn document(&self, id: &str) -> Option<&DocumentData> {
        self.documents.iter().find(|document| document.id == id)
    }

    pub(crate) fn document_mut(&mut self, id: &str) -> Option<&mut DocumentData> {
        self.documents.iter_mut().find(|document| document.id == id)
    }

    /// Insert at `index` (clamped to the end). The first document of an
    /// empty pane becomes selected. Returns the actual index.
    pub(crate) fn insert(&mut self, index: usize, document: DocumentData) -> usize {
        let index = index.min(self.documents.len());
        self.documents.insert(index, document);
        self.selected = match self.selected {
            Some(selected) if index <= selected => Some(selected + 1),
            Some(selected) => Some(selected),
            None => Some(index),
        };
        index
    }

    pub(crate) fn push(&mut self, document: DocumentData) -> usize {
        self.insert(self.documents.len(), document)
    }

    /// Remove the document at `index`. Removing the selected tab selects the
    /// tab that slides into its place, or the new last tab.
    pub(crate) fn remove(&mut self, index: usize) -> Option<DocumentData> {
        if index >= self.documents.len() {
            return None;
        }
        let removed = self.documents.remove(index);
        let len = self.documents.len();
        self.selected = match self.selected {
            _ if len == 0 => None,
            Some(selected) if selected > index => Some(selected - 1),
            Some(selected) => Some(selected.min(len - 1)),
            None => Some(0),
        };
        Some(removed)
    }

    /// Select the tab at `index`. Returns whether the selection changed.
    pub(crate) fn select(&mut self, index: usize) -> bool {
        if index >= self.documents.len() || self.selected == Some(index) {
            return false;
        }
        self.selected = Some(index);
        true
    }

    pub(crate) fn take_all(&mut self) -> Vec<DocumentData> {
        self.selected = None;
        std::mem::take(&mut self.documents)
    }
}

/// Two-sided split with a divider at `divider_location` (ratio 0..=1 of
/// the space given to `first`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitData {
    pub orientation: SplitOrientation,
    pub divider_location: f64,
    pub first: StructureId,
    pub last: StructureId,
}

impl SplitData {
    /// The side that is not `child`.
    #[must_use]
    pub fn other(&self, child: StructureId) -> Option<StructureId> {
        if self.first == child {
            Some(self.last)
        } else if self.last == child {
            Some(self.first)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn children(&self) -> [StructureId; 2] {
        [self.first, self.last]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StructureNode {
    Pane(PaneData),
    Split(SplitData),
}

impl StructureNode {
    #[must_use]
    pub const fn is_pane(&self) -> bool {
        matches!(self, Self::Pane(_))
    }

    #[must_use]
    pub const fn pane(&self) -> Option<&PaneData> {
        match self {
            Self::Pane(pane) => Some(pane),
            Self::Split(_) => None,
        }
    }

    #[must_use]
    pub const fn split(&self) -> Option<&SplitData> {
        match self {
            Self::Split(split) => Some(split),
            Self::Pane(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Slot {
    parent: Option<StructureId>,
    node: StructureNode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructureTree {
    root: StructureId,
    next_id: StructureId,
    slots: BTreeMap<StructureId, Slot>,
}

impl Default for StructureTree {
    fn default() -> Self {
        Self::new()
    }
}

impl StructureTree {
    /// Tree holding a single empty root pane.
    #[must_use]
    pub fn new() -> Self {
        let root = StructureId::MIN;
        let mut slots = BTreeMap::new();
        slots.insert(
            root,
            Slot {
                parent: None,
                node: StructureNode::Pane(PaneData::default()),
            },
        );
        Self {
            root,
            next_id: StructureId(2),
            slots,
        }
    }

    #[must_use]
    pub const fn root(&self) -> StructureId {
        self.root
    }

    #[must_use]
    pub fn get(&self, node: StructureId) -> Option<&StructureNode> {
        self.slots.get(&node).map(|slot| &slot.node)
    }

    #[must_use]
    pub fn parent(&self, node: StructureId) -> Option<StructureId> {
        self.slots.get(&node).and_then(|slot| slot.parent)
    }

    #[must_use]
    pub fn is_pane(&self, node: StructureId) -> bool {
        self.get(node).is_some_and(StructureNode::is_pane)
    }

    pub fn pane(&self, node: StructureId) -> Result<&PaneData, DocumentError> {
        self.get(node)
            .and_then(StructureNode::pane)
            .ok_or(DocumentError::MissingPane { node })
    }

    pub(crate) fn pane_mut(&mut self, node: StructureId) -> Result<&mut PaneData, DocumentError> {
        match self.slots.get_mut(&node).map(|slot| &mut slot.node) {
            Some(StructureNode::Pane(pane)) => Ok(pane),
            _ => Err(DocumentError::MissingPane { node }),
        }
    }

    pub fn split(&self, node: StructureId) -> Result<&SplitData, DocumentError> {
        self.get(node)
            .and_then(StructureNode::split)
            .ok_or(DocumentError::MissingSplit { node })
    }

    pub(crate) fn split_mut(
        &mut self,
        node: StructureId,
    ) -> Result<&mut SplitData, DocumentError> {
        match self.slots.get_mut(&node).map(|slot| &mut slot.node) {
            Some(StructureNode::Split(split)) => Ok(split),
            _ => Err(DocumentError::MissingSplit { node }),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Nodes in pre-order, `first` side before `last` side.
    #[must_use]
    pub fn nodes(&self) -> Vec<StructureId> {
        let mut order = Vec::with_capacity(self.slots.len());
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            if order.len() > self.slots.len() {
                break;
            }
            order.push(node);
            if let Some(split) = self.get(node).and_then(StructureNode::split) {
                stack.push(split.last);
                stack.push(split.first);
            }
        }
        order
    }

    /// Panes in visual order.
    #[must_use]
    pub fn panes(&self) -> Vec<StructureId> {
        self.nodes()
            .into_iter()
            .filter(|node| self.is_pane(*node))
            .collect()
    }

    #[must_use]
    pub fn splits(&self) -> Vec<StructureId> {
        self.nodes()
            .into_iter()
            .filter(|node| !self.is_pane(*node))
            .collect()
    }

    /// The pane itself, or the first pane down the `first` sides of a split.
    #[must_use]
    pub fn find_closest_pane(&self, node: StructureId) -> Option<StructureId> {
        let mut cursor = node;
        for _ in 0..=self.slots.len() {
            match self.get(cursor)? {
                StructureNode::Pane(_) => return Some(cursor),
                StructureNode::Split(split) => cursor = split.first,
            }
        }
        None
    }

    /// Whether `node` is `ancestor` or lies in its subtree.
    #[must_use]
    pub fn contains(&self, ancestor: StructureId, node: StructureId) -> bool {
        let mut cursor = Some(node);
        let mut steps = 0;
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            steps += 1;
            if steps > self.slots.len() {
                return false;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Pane holding the document `id`.
    #[must_use]
    pub fn pane_of(&self, id: &str) -> Option<StructureId> {
        self.panes()
            .into_iter()
            .find(|pane| self.pane(*pane).is_ok_and(|data| data.index_of(id).is_some()))
    }

    /// Every document with its pane, in visual order.
    #[must_use]
    pub fn documents(&self) -> Vec<(StructureId, &DocumentData)> {
        self.panes()
            .into_iter()
            .filter_map(|node| self.pane(node).ok().map(|pane| (node, pane)))
            .flat_map(|(node, pane)| pane.documents().iter().map(move |document| (node, document)))
            .collect()
    }

    #[must_use]
    pub fn document_count(&self) -> usize {
        self.slots
            .values()
            .filter_map(|slot| slot.node.pane())
            .map(PaneData::len)
            .sum()
    }

    pub(crate) fn alloc(
        &mut self,
        parent: Option<StructureId>,
        node: StructureNode,
    ) -> Result<StructureId, DocumentError> {
        let id = self.next_id;
        self.next_id = self.next_id.checked_next()?;
        self.slots.insert(id, Slot { parent, node });
        Ok(id)
    }

    pub(crate) fn set_root(&mut self, root: StructureId) {
        self.root = root;
        if let Some(slot) = self.slots.get_mut(&root) {
            slot.parent = None;
        }
    }

    pub(crate) fn set_parent(&mut self, node: StructureId, parent: Option<StructureId>) {
        if let Some(slot) = self.slots.get_mut(&node) {
            slot.parent = parent;
        }
    }

    pub(crate) fn remove(&mut self, node: StructureId) -> Option<StructureNode> {
        self.slots.remove(&node).map(|slot| slot.node)
    }

    /// Put `new` where `old` sits: in `old`'s parent split, or at the root.
    /// `old` stays in the arena, detached.
    pub(crate) fn replace(
        &mut self,
        old: StructureId,
        new: StructureId,
    ) -> Result<(), DocumentError> {
        let parent = self.parent(old);
        match parent {
            Some(parent) => {
                let split = self.split_mut(parent)?;
                if split.first == old {
                    split.first = new;
                } else if split.last == old {
                    split.last = new;
                } else {
                    return Err(DocumentError::BrokenInvariant {
                        reason: format!(
                            "split {} does not hold child {}",
                            parent.get(),
                            old.get()
                        ),
                    });
                }
            }
            None => self.root = new,
        }
        if let Some(slot) = self.slots.get_mut(&new) {
            slot.parent = parent;
        }
        if let Some(slot) = self.slots.get_mut(&old) {
            slot.parent = None;
        }
        Ok(())
    }

    /// Replace `target` with a new split holding `target` and `added`.
    pub(crate) fn wrap(
        &mut self,
        target: StructureId,
        added: StructureId,
        orientation: SplitOrientation,
        added_last: bool,
        divider_location: f64,
    ) -> Result<StructureId, DocumentError> {
        let (first, last) = if added_last {
            (target, added)
        } else {
            (added, target)
        };
        let split = self.alloc(
            None,
            StructureNode::Split(SplitData {
                orientation,
                divider_location,
                first,
                last,
            }),
        )?;
        self.replace(target, split)?;
        for child in [target, added] {
            if let Some(slot) = self.slots.get_mut(&child) {
                slot.parent = Some(split);
            }
        }
        Ok(split)
    }

    /// Check every structural invariant.
    pub fn validate(&self) -> Result<(), DocumentError> {
        let broken = |reason: String| Err(DocumentError::BrokenInvariant { reason });

        let Some(root) = self.slots.get(&self.root) else {
            return broken(format!("root {} missing", self.root.get()));
        };
        if root.parent.is_some() {
            return broken(format!("root {} has a parent", self.root.get()));
        }

        let mut seen = BTreeSet::new();
        let mut ids = BTreeSet::new();
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            if !seen.insert(node) {
                return broken(format!("node {} reached twice", node.get()));
            }
            let Some(slot) = self.slots.get(&node) else {
                return broken(format!("node {} missing", node.get()));
            };
            match &slot.node {
                StructureNode::Split(split) => {
                    if split.first == split.last {
                        return broken(format!("split {} holds one child twice", node.get()));
                    }
                    if !split.divider_location.is_finite()
                        || !(0.0..=1.0).contains(&split.divider_location)
                    {
                        return broken(format!(
                            "split {} has divider location {}",
                            node.get(),
                            split.divider_location
                        ));
                    }
                    for child in split.children() {
                        if self.parent(child) != Some(node) {
                            return broken(format!(
                                "child {} of split {} does not point back",
                                child.get(),
                                node.get()
                            ));
                        }
                        stack.push(child);
                    }
                }
                StructureNode::Pane(pane) => {
                    for document in pane.documents() {
                        if !ids.insert(document.id.as_str()) {
                            return broken(format!("document {:?} appears twice", document.id));
                        }
                    }
                    let selection_ok = match pane.selected_index() {
                        Some(index) => index < pane.len(),
                        None => pane.is_empty(),
                    };
                    if !selection_ok {
                        return broken(format!("pane {} has a stale selection", node.get()));
                    }
                }
            }
        }
        if seen.len() != self.slots.len() {
            return broken(format!(
                "{} nodes unreachable from the root",
                self.slots.len() - seen.len()
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str) -> DocumentData {
        DocumentData::new(id, id.to_uppercase())
    }

    #[test]
    fn direction_mapping() {
        assert_eq!(SplitDirection::Left.orientation(), SplitOrientation::Vertical);
        assert_eq!(SplitDirection::Right.orientation(), SplitOrientation::Vertical);
        assert_eq!(SplitDirection::Top.orientation(), SplitOrientation::Horizontal);
        assert!(SplitDirection::Right.new_pane_last());
        assert!(SplitDirection::Bottom.new_pane_last());
        assert!(!SplitDirection::Left.new_pane_last());
        assert_eq!("bottom".parse::<SplitDirection>().ok(), Some(SplitDirection::Bottom));
        assert_eq!("west".parse::<SplitDirection>().ok(), Some(SplitDirection::Left));
        assert!("diagonal".parse::<SplitDirection>().is_err());
    }

    #[test]
    fn pane_selection_follows_inserts_and_removals() {
        let mut pane = PaneData::default();
        assert_eq!(pane.push(doc("a")), 0);
        assert_eq!(pane.selected_index(), Some(0));
        pane.push(doc("b"));
        pane.push(doc("c"));
        assert!(pane.select(2));
        assert!(!pane.select(2));

        pane.insert(0, doc("z"));
        assert_eq!(pane.selected().map(|d| d.id.as_str()), Some("c"));

        pane.remove(3);
        assert_eq!(pane.selected().map(|d| d.id.as_str()), Some("b"));
        pane.remove(0);
        assert_eq!(pane.selected().map(|d| d.id.as_str()), Some("b"));
        pane.remove(1);
        pane.remove(0);
        assert_eq!(pane.selected_index(), None);
        assert!(pane.remove(0).is_none());
    }

    #[test]
    fn wrap_and_replace_keep_links() {
        let mut tree = StructureTree::new();
        let root = tree.root();
        let added = tree
            .alloc(None, StructureNode::Pane(PaneData::default()))
            .expect("alloc");
        let split = tree
            .wrap(root, added, SplitOrientation::Vertical, true, 0.5)
            .expect("wrap");
        assert_eq!(tree.root(), split);
        assert_eq!(tree.split(split).expect("split").children(), [root, added]);
        tree.validate().expect("valid");

        let inner = tree
            .alloc(None, StructureNode::Pane(PaneData::default()))
            .expect("alloc");
        let nested = tree
            .wrap(added, inner, SplitOrientation::Horizontal, false, 0.5)
            .expect("wrap");
        assert_eq!(tree.parent(nested), Some(split));
        assert_eq!(tree.split(nested).expect("nested").children(), [inner, added]);
        assert_eq!(tree.panes(), vec![root, inner, added]);
        assert_eq!(tree.splits(), vec![split, nested]);
        assert_eq!(tree.find_closest_pane(nested), Some(inner));
        assert!(tree.contains(split, inner));
        assert!(!tree.contains(nested, root));
        tree.validate().expect("valid");
    }

    #[test]
    fn validate_catches_duplicate_documents() {
        let mut tree = StructureTree::new();
        let root = tree.root();
        tree.pane_mut(root).expect("pane").push(doc("a"));
        let other = tree
            .alloc(None, StructureNode::Pane(PaneData::default()))
            .expect("alloc");
        tree.pane_mut(other).expect("pane").push(doc("a"));
        tree.wrap(root, other, SplitOrientation::Horizontal, true, 0.5)
            .expect("wrap");
        assert!(matches!(
            tree.validate(),
            Err(DocumentError::BrokenInvariant { .. })
        ));
        assert_eq!(tree.document_count(), 2);
        assert_eq!(tree.pane_of("a"), Some(root));
    }
}
