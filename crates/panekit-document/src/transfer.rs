#![forbid(unsafe_code)]

//! Moving documents by drag and drop.
//!
//! Dragging exports a document: it leaves its pane at once and travels in a
//! [`DocumentExport`]. Importing places it by pointer location: before or
//! after the hovered tab, into a new split near a pane edge, or at the end
//! of the pane. [`DocumentPane::export_done`] closes the transfer on the
//! source side. A document nobody took goes back to its old pane and index;
//! a source pane left empty by a successful move is merged away.

use panekit_core::{DragPayload, InstanceId, PayloadKind, Point, Rect};

use crate::document::DocumentData;
use crate::error::DocumentError;
use crate::events::DocumentPaneEvent;
use crate::pane::DocumentPane;
use crate::structure::{SplitDirection, StructureId};

/// Host geometry of the pane under the pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTarget {
    pub pane: StructureId,
    pub bounds: Rect,
    /// Tab bounds in document order.
    pub tabs: Vec<Rect>,
}

impl DropTarget {
    #[must_use]
    pub fn new(pane: StructureId, bounds: Rect) -> Self {
        Self {
            pane,
            bounds,
            tabs: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_tabs(mut self, tabs: Vec<Rect>) -> Self {
        self.tabs = tabs;
        self
    }
}

/// Where a dropped document goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropLocation {
    Tab {
        pane: StructureId,
        index: usize,
    },
    /// Split `pane` towards `direction`; the document lands on the new side.
    Split {
        pane: StructureId,
        direction: SplitDirection,
    },
    Append {
        pane: StructureId,
    },
}

/// Resolve a drop over `target`.
///
/// A hovered tab wins: the left half inserts before it, the right half
/// after. Otherwise a point within `drop_size` of an edge splits towards the
/// nearest edge, if splitting is allowed and the pane shows at least one
/// tab. Anything else appends.
#[must_use]
pub fn resolve_drop(
    target: &DropTarget,
    point: Point,
    drop_size: i32,
    split_allowed: bool,
    tab_count: usize,
) -> DropLocation {
    for (index, tab) in target.tabs.iter().enumerate() {
        if tab.contains(point) {
            let after = point.x >= tab.x + tab.width / 2;
            return DropLocation::Tab {
                pane: target.pane,
                index: (index + usize::from(after)).min(tab_count),
            };
        }
    }
    if split_allowed && tab_count > 0 {
        if let Some(direction) = edge_direction(target.bounds, point, drop_size) {
            return DropLocation::Split {
                pane: target.pane,
                direction,
            };
        }
    }
    DropLocation::Append { pane: target.pane }
}

/// Nearest edge closer than `drop_size`; ties go left, right, top, bottom.
fn edge_direction(bounds: Rect, point: Point, drop_size: i32) -> Option<SplitDirection> {
    if !bounds.contains(point) {
        return None;
    }
    [
        (SplitDirection::Left, point.x - bounds.x),
        (SplitDirection::Right, bounds.right() - 1 - point.x),
        (SplitDirection::Top, point.y - bounds.y),
        (SplitDirection::Bottom, bounds.bottom() - 1 - point.y),
    ]
    .into_iter()
    .filter(|(_, distance)| *distance < drop_size)
    .min_by_key(|(_, distance)| *distance)
    .map(|(direction, _)| direction)
}

/// A document in flight between export and [`DocumentPane::export_done`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentExport {
    payload: String,
    document_id: String,
    document: Option<DocumentData>,
    source_pane: StructureId,
    source_index: usize,
    source_instance: InstanceId,
    moved_out: bool,
}

impl DocumentExport {
    /// Encoded payload for the host's transfer mechanism.
    #[must_use]
    pub fn payload(&self) -> &str {
        &self.payload
    }

    #[must_use]
    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// The document, until an import takes it.
    #[must_use]
    pub const fn document(&self) -> Option<&DocumentData> {
        self.document.as_ref()
    }

    #[must_use]
    pub const fn source_pane(&self) -> StructureId {
        self.source_pane
    }

    #[must_use]
    pub const fn source_index(&self) -> usize {
        self.source_index
    }

    #[must_use]
    pub const fn is_placed(&self) -> bool {
        self.document.is_none()
    }
}

/// How a transfer ended on the source side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Nobody took the document; it is back in `pane`.
    Restored { pane: StructureId },
    Moved,
}

impl DocumentPane {
    /// Encoded drag payload for document `id`.
    pub fn create_drag_payload(&self, id: &str) -> Result<String, DocumentError> {
        let pane = self
            .tree
            .pane_of(id)
            .ok_or_else(|| DocumentError::MissingDocument { id: id.to_string() })?;
        let payload = DragPayload::new(
            PayloadKind::Document,
            id,
            pane.get().to_string(),
            self.instance(),
        )
        .allow_cross_pane_drag(self.config().drag_between_panes_enabled);
        Ok(payload.encode()?)
    }

    /// Start a transfer: the document leaves its pane immediately.
    pub fn export_document(&mut self, id: &str) -> Result<DocumentExport, DocumentError> {
        let document = self
            .document(id)
            .ok_or_else(|| DocumentError::MissingDocument { id: id.to_string() })?;
        if !self.config().drag_enabled || !document.draggable {
            return Err(DocumentError::NotDraggable { id: id.to_string() });
        }
        let payload = self.create_drag_payload(id)?;
        let (source_pane, source_index, document) = self.detach_document(id)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(document = id, pane = source_pane.get(), "document exported");
        self.notify_selection();
        Ok(DocumentExport {
            payload,
            document_id: id.to_string(),
            document: Some(document),
            source_pane,
            source_index,
            source_instance: self.instance(),
            moved_out: false,
        })
    }

    fn accepts(&self, payload: &DragPayload) -> bool {
        payload.source_instance == self.instance()
            || (payload.accepted_by(self.instance()) && self.config().drag_between_panes_enabled)
    }

    /// Where a drop at `point` over `target` would place the document, or
    /// `None` when this document pane does not accept the payload.
    pub fn drop_location(
        &self,
        payload: &str,
        target: &DropTarget,
        point: Point,
    ) -> Result<Option<DropLocation>, DocumentError> {
        let payload = DragPayload::decode(payload, PayloadKind::Document)?;
        if !self.accepts(&payload) {
            return Ok(None);
        }
        let tab_count = self.tree.pane(target.pane)?.len();
        Ok(Some(resolve_drop(
            target,
            point,
            self.config().drop_size,
            self.config().split_enabled,
            tab_count,
        )))
    }

    /// Place an exported document. On success the export no longer holds
    /// the document and the receiving pane is active.
    pub fn import_document(
        &mut self,
        export: &mut DocumentExport,
        target: &DropTarget,
        point: Point,
    ) -> Result<StructureId, DocumentError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "document_import",
            document = %export.document_id,
            pane = target.pane.get()
        )
        .entered();

        let payload = DragPayload::decode(&export.payload, PayloadKind::Document)?;
        if !self.accepts(&payload) {
            return Err(DocumentError::CrossPaneDragRejected {
                document: export.document_id.clone(),
            });
        }
        if export.document.is_none() {
            return Err(DocumentError::ExportConsumed {
                document: export.document_id.clone(),
            });
        }
        let foreign = payload.source_instance != self.instance();
        if foreign && self.tree.pane_of(&export.document_id).is_some() {
            return Err(DocumentError::DuplicateDocument {
                id: export.document_id.clone(),
            });
        }

        let tab_count = self.tree.pane(target.pane)?.len();
        let location = resolve_drop(
            target,
            point,
            self.config().drop_size,
            self.config().split_enabled,
            tab_count,
        );
        let (pane, index) = match location {
            DropLocation::Tab { pane, index } => (pane, index),
            DropLocation::Split { pane, direction } => (self.split_target(pane, direction)?, usize::MAX),
            DropLocation::Append { pane } => (pane, usize::MAX),
        };

        let data = self.tree.pane_mut(pane)?;
        let Some(document) = export.document.take() else {
            return Err(DocumentError::ExportConsumed {
                document: export.document_id.clone(),
            });
        };
        let index = data.insert(index, document);
        data.select(index);
        self.active = pane;
        if foreign {
            export.moved_out = true;
            self.events.push(DocumentPaneEvent::Opened {
                document: export.document_id.clone(),
                pane,
            });
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(?location, "document imported");
        self.notify_selection();
        Ok(pane)
    }

    /// Finish a transfer this document pane exported.
    pub fn export_done(
        &mut self,
        mut export: DocumentExport,
    ) -> Result<ExportOutcome, DocumentError> {
        if export.source_instance != self.instance() {
            return Err(DocumentError::CrossPaneDragRejected {
                document: export.document_id,
            });
        }
        let outcome = match export.document.take() {
            Some(document) => {
                let pane = if self.tree.is_pane(export.source_pane) {
                    export.source_pane
                } else {
                    self.active
                };
                let data = self.tree.pane_mut(pane)?;
                let index = data.insert(export.source_index, document);
                data.select(index);
                self.active = pane;
                #[cfg(feature = "tracing")]
                tracing::debug!(document = %export.document_id, pane = pane.get(), "export restored");
                ExportOutcome::Restored { pane }
            }
            None => {
                if export.moved_out {
                    self.events.push(DocumentPaneEvent::Closed {
                        document: export.document_id,
                        pane: export.source_pane,
                    });
                }
                self.merge_if_emptied(export.source_pane)?;
                ExportOutcome::Moved
            }
        };
        self.notify_selection();
        Ok(outcome)
    }
}
