#![forbid(unsafe_code)]

//! Splitting, merging, rotating and swapping tab groups.

use crate::error::DocumentError;
use crate::events::DocumentPaneEvent;
use crate::pane::DocumentPane;
use crate::structure::{
    PaneData, SplitDirection, SplitOrientation, StructureId, StructureNode,
};

/// Divider ratio of a freshly created split.
pub const INITIAL_DIVIDER_LOCATION: f64 = 0.5;

impl DocumentPane {
    /// Split `pane` towards `direction` and return the pane on the new side.
    ///
    /// When `pane` already sits in a split of the same orientation whose
    /// other side is a pane in exactly the requested slot, that pane is
    /// reused instead of nesting another split. `document`, if given, moves
    /// from `pane` into the returned pane, which becomes active.
    pub fn split(
        &mut self,
        pane: StructureId,
        document: Option<&str>,
        direction: SplitDirection,
    ) -> Result<StructureId, DocumentError> {
        #[cfg(feature = "tracing")]
        let _span =
            tracing::debug_span!("document_split", pane = pane.get(), ?direction).entered();

        let source = self.tree.pane(pane)?;
        let moved_index = match document {
            Some(id) => Some(
                source
                    .index_of(id)
                    .ok_or_else(|| DocumentError::MissingDocument { id: id.to_string() })?,
            ),
            None => None,
        };

        let target = self.split_target(pane, direction)?;
        if let Some(index) = moved_index {
            let moved = self
                .tree
                .pane_mut(pane)?
                .remove(index)
                .ok_or_else(|| DocumentError::MissingDocument {
                    id: document.unwrap_or_default().to_string(),
                })?;
            let data = self.tree.pane_mut(target)?;
            let index = data.push(moved);
            data.select(index);
            self.active = target;
        }
        self.notify_selection();
        Ok(target)
    }

    /// Pane that receives documents split off `pane` towards `direction`.
    pub(crate) fn split_target(
        &mut self,
        pane: StructureId,
        direction: SplitDirection,
    ) -> Result<StructureId, DocumentError> {
        let orientation = direction.orientation();
        let new_last = direction.new_pane_last();

        if let Some(parent) = self.tree.parent(pane) {
            let split = *self.tree.split(parent)?;
            let (own_slot, sibling) = if new_last {
                (split.first, split.last)
            } else {
                (split.last, split.first)
            };
            if split.orientation == orientation && own_slot == pane && self.tree.is_pane(sibling) {
                return Ok(sibling);
            }
        }

        let new_pane = self
            .tree
            .alloc(None, StructureNode::Pane(PaneData::default()))?;
        let split = self.tree.wrap(
            pane,
            new_pane,
            orientation,
            new_last,
            INITIAL_DIVIDER_LOCATION,
        )?;
        #[cfg(feature = "tracing")]
        tracing::debug!(split = split.get(), new_pane = new_pane.get(), "pane split");
        self.events.push(DocumentPaneEvent::Split {
            pane,
            new_pane,
            split,
        });
        Ok(new_pane)
    }

    /// Merge `target` away.
    ///
    /// A pane merges its parent split; the root pane cannot be merged and
    /// yields `None`. Returns the node that took the split's place.
    pub fn merge(&mut self, target: StructureId) -> Result<Option<StructureId>, DocumentError> {
        match self.tree.get(target) {
            None => Err(DocumentError::MissingPane { node: target }),
            Some(StructureNode::Pane(_)) => match self.tree.parent(target) {
                None => Ok(None),
                Some(parent) => self.merge_split(parent).map(Some),
            },
            Some(StructureNode::Split(_)) => self.merge_split(target).map(Some),
        }
    }

    /// Collapse the whole tree into a single pane.
    pub fn merge_all(&mut self) -> Result<StructureId, DocumentError> {
        let root = self.tree.root();
        if self.tree.is_pane(root) {
            return Ok(root);
        }
        self.merge_split(root)
    }

    fn merge_split(&mut self, split: StructureId) -> Result<StructureId, DocumentError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("document_merge", split = split.get()).entered();

        let selected = self.selected_document().map(|document| document.id.clone());
        let survivor = self.merge_impl(split)?;

        if !self.tree.is_pane(self.active) {
            let fallback = self.tree.find_closest_pane(survivor).ok_or_else(|| {
                DocumentError::BrokenInvariant {
                    reason: format!("merge result {} holds no pane", survivor.get()),
                }
            })?;
            self.active = fallback;
            // Keep the document that was selected in the vanished pane.
            if let Some(id) = selected {
                if let Some(pane) = self.tree.pane_of(&id) {
                    let data = self.tree.pane_mut(pane)?;
                    if let Some(index) = data.index_of(&id) {
                        data.select(index);
                    }
                    self.active = pane;
                }
            }
        }
        self.notify_selection();
        Ok(survivor)
    }

    /// Nested splits on both sides are merged first. Then an empty side
    /// gives way to the other one; otherwise the documents of the smaller
    /// pane move to the end of the larger one, and on a tie `first`
    /// receives them.
    fn merge_impl(&mut self, split_id: StructureId) -> Result<StructureId, DocumentError> {
        let split = *self.tree.split(split_id)?;
        let first = self.collapse_to_pane(split.first)?;
        let last = self.collapse_to_pane(split.last)?;
        let first_len = self.tree.pane(first)?.len();
        let last_len = self.tree.pane(last)?.len();

        let (survivor, discarded) = if first_len == 0 {
            (last, first)
        } else if last_len == 0 {
            (first, last)
        } else {
            let (from, into) = if last_len > first_len {
                (first, last)
            } else {
                (last, first)
            };
            let moved = self.tree.pane_mut(from)?.take_all();
            let receiver = self.tree.pane_mut(into)?;
            for document in moved {
                receiver.push(document);
            }
            (into, from)
        };

        self.tree.replace(split_id, survivor)?;
        self.tree.remove(split_id);
        self.tree.remove(discarded);
        #[cfg(feature = "tracing")]
        tracing::debug!(split = split_id.get(), into = survivor.get(), "split merged");
        self.events.push(DocumentPaneEvent::Merged {
            split: split_id,
            into: survivor,
        });
        Ok(survivor)
    }

    /// Merge `node` until a single pane is left in its place.
    fn collapse_to_pane(&mut self, mut node: StructureId) -> Result<StructureId, DocumentError> {
        while !self.tree.is_pane(node) {
            node = self.merge_impl(node)?;
        }
        Ok(node)
    }

    /// Toggle a split between side-by-side and stacked.
    pub fn rotate(&mut self, split: StructureId) -> Result<SplitOrientation, DocumentError> {
        let data = self.tree.split_mut(split)?;
        data.orientation = data.orientation.flip();
        Ok(data.orientation)
    }

    /// Exchange the two sides of a split, mirroring the divider.
    pub fn swap(&mut self, split: StructureId) -> Result<(), DocumentError> {
        let data = self.tree.split_mut(split)?;
        std::mem::swap(&mut data.first, &mut data.last);
        data.divider_location = 1.0 - data.divider_location;
        Ok(())
    }

    /// Set the divider ratio, clamped to `0.0..=1.0`.
    pub fn set_divider_location(
        &mut self,
        split: StructureId,
        location: f64,
    ) -> Result<(), DocumentError> {
        if !location.is_finite() {
            return Err(DocumentError::InvalidDividerLocation { value: location });
        }
        self.tree.split_mut(split)?.divider_location = location.clamp(0.0, 1.0);
        Ok(())
    }
}
