#![forbid(unsafe_code)]

//! Pointer handling for tab drags inside one document pane.
//!
//! Pressing a tab arms a drag. Crossing the threshold exports the document,
//! so previews are computed against the tree without it. Releasing drops it
//! at the resolved location; canceling or releasing over nothing puts it
//! back where it came from. Releasing before the threshold selects the tab.

use panekit_core::{DragEffect, DragMachine, Point, PointerEvent};

use crate::error::DocumentError;
use crate::pane::DocumentPane;
use crate::structure::StructureId;
use crate::transfer::{DocumentExport, DropLocation, DropTarget, ExportOutcome};

/// The tab a drag started from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSource {
    pub document: String,
    pub pane: StructureId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentDragEffect {
    None,
    Armed { document: String },
    /// Where a release at the current pointer location would drop.
    DropPreview(Option<DropLocation>),
    Dropped { pane: StructureId },
    /// Released over nothing; the document is back at its old place.
    Restored { document: String },
    /// Tab pressed and released without dragging.
    Selected { document: String },
    Canceled,
}

#[derive(Debug, Clone)]
pub struct DocumentDragHandler {
    machine: DragMachine<DragSource>,
    exported: Option<DocumentExport>,
}

impl DocumentDragHandler {
    #[must_use]
    pub fn new(threshold: u16) -> Self {
        Self {
            machine: DragMachine::new(threshold),
            exported: None,
        }
    }

    #[must_use]
    pub fn for_pane(pane: &DocumentPane) -> Self {
        Self::new(pane.config().drag_threshold)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.machine.is_active()
    }

    /// The document currently travelling, once the drag has started.
    #[must_use]
    pub fn exported(&self) -> Option<&DocumentExport> {
        self.exported.as_ref()
    }

    /// Pointer pressed at `point`; `tab_document` names the tab under it.
    pub fn press(
        &mut self,
        pane: &DocumentPane,
        point: Point,
        tab_document: Option<&str>,
    ) -> DocumentDragEffect {
        if self.machine.is_active() {
            return DocumentDragEffect::None;
        }
        let Some(document) = tab_document else {
            return DocumentDragEffect::None;
        };
        let Some(source) = pane.pane_of(document) else {
            return DocumentDragEffect::None;
        };
        self.machine.arm(
            DragSource {
                document: document.to_string(),
                pane: source,
            },
            point,
        );
        DocumentDragEffect::Armed {
            document: document.to_string(),
        }
    }

    /// Feed one pointer event; `target` is the pane the host found under
    /// the pointer, if any.
    pub fn pointer(
        &mut self,
        pane: &mut DocumentPane,
        event: PointerEvent,
        target: Option<&DropTarget>,
    ) -> Result<DocumentDragEffect, DocumentError> {
        match self.machine.apply(event) {
            DragEffect::Started { kind, current, .. } => {
                match pane.export_document(&kind.document) {
                    Ok(export) => self.exported = Some(export),
                    Err(DocumentError::NotDraggable { .. }) => {
                        self.machine.force_cancel();
                        return Ok(DocumentDragEffect::None);
                    }
                    Err(err) => {
                        self.machine.force_cancel();
                        return Err(err);
                    }
                }
                self.preview(pane, target, current)
            }
            DragEffect::Updated { current, .. } => self.preview(pane, target, current),
            DragEffect::Committed { kind, end, .. } => {
                let Some(mut export) = self.exported.take() else {
                    return Ok(DocumentDragEffect::None);
                };
                if let Some(target) = target {
                    // The export still holds the document; hand it back before failing.
                    let imported = pane
                        .drop_location(export.payload(), target, end)
                        .and_then(|location| match location {
                            Some(_) => pane.import_document(&mut export, target, end).map(|_| ()),
                            None => Ok(()),
                        });
                    if let Err(err) = imported {
                        pane.export_done(export)?;
                        return Err(err);
                    }
                }
                let placed = pane.pane_of(&kind.document);
                match pane.export_done(export)? {
                    ExportOutcome::Moved => Ok(DocumentDragEffect::Dropped {
                        pane: placed.unwrap_or_else(|| pane.active_pane()),
                    }),
                    ExportOutcome::Restored { .. } => Ok(DocumentDragEffect::Restored {
                        document: kind.document,
                    }),
                }
            }
            DragEffect::Clicked { kind, .. } => {
                pane.select_document(&kind.document)?;
                Ok(DocumentDragEffect::Selected {
                    document: kind.document,
                })
            }
            DragEffect::Canceled { .. } => {
                if let Some(export) = self.exported.take() {
                    pane.export_done(export)?;
                }
                Ok(DocumentDragEffect::Canceled)
            }
            DragEffect::Armed { .. } | DragEffect::Noop { .. } => Ok(DocumentDragEffect::None),
        }
    }

    /// Abort the drag, returning any exported document to its old place.
    pub fn reset(&mut self, pane: &mut DocumentPane) -> Result<(), DocumentError> {
        self.machine.force_cancel();
        if let Some(export) = self.exported.take() {
            pane.export_done(export)?;
        }
        Ok(())
    }

    fn preview(
        &self,
        pane: &DocumentPane,
        target: Option<&DropTarget>,
        current: Point,
    ) -> Result<DocumentDragEffect, DocumentError> {
        let (Some(export), Some(target)) = (self.exported.as_ref(), target) else {
            return Ok(DocumentDragEffect::DropPreview(None));
        };
        Ok(DocumentDragEffect::DropPreview(pane.drop_location(
            export.payload(),
            target,
            current,
        )?))
    }
}
