#![forbid(unsafe_code)]

//! Structural and selection notifications.
//!
//! The document pane queues events in the order changes happen; the host
//! drains them with [`crate::DocumentPane::take_events`] and refreshes its
//! tab views. Document edits post [`DocumentPaneEvent::DocumentChanged`] for
//! the owning pane instead of calling back into stored listeners.

use crate::structure::StructureId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentPaneEvent {
    Opened {
        document: String,
        pane: StructureId,
    },
    Closed {
        document: String,
        pane: StructureId,
    },
    /// Fired once per actual change of the pane-wide selected document.
    SelectionChanged {
        previous: Option<String>,
        current: Option<String>,
    },
    /// Title, icon, colors or content of a document changed.
    DocumentChanged {
        document: String,
        pane: StructureId,
    },
    /// `pane` was split; `new_pane` sits on the other side of `split`.
    Split {
        pane: StructureId,
        new_pane: StructureId,
        split: StructureId,
    },
    /// `split` collapsed into `into`.
    Merged {
        split: StructureId,
        into: StructureId,
    },
}
