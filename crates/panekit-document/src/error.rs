#![forbid(unsafe_code)]

//! Error type for the document split/tab engine.

use std::fmt;

use panekit_core::TransferError;

use crate::structure::StructureId;

#[derive(Debug)]
pub enum DocumentError {
    /// The node does not exist or is a split where a pane was expected.
    MissingPane {
        node: StructureId,
    },
    /// The node does not exist or is a pane where a split was expected.
    MissingSplit {
        node: StructureId,
    },
    MissingDocument {
        id: String,
    },
    /// Document ids are unique across the whole document pane.
    DuplicateDocument {
        id: String,
    },
    NotClosable {
        id: String,
    },
    /// Dragging is disabled for the pane or the document.
    NotDraggable {
        id: String,
    },
    /// Corrupted or mistyped drag payload.
    DropFailed(TransferError),
    /// Drop from another document pane while cross-pane dragging is off.
    CrossPaneDragRejected {
        document: String,
    },
    /// The exported document was already placed or restored.
    ExportConsumed {
        document: String,
    },
    InvalidDividerLocation {
        value: f64,
    },
    InvalidSnapshot {
        reason: String,
    },
    /// Structural invariant found broken by [`crate::StructureTree::validate`].
    BrokenInvariant {
        reason: String,
    },
    StructureIdOverflow,
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPane { node } => write!(f, "node {} is not a pane", node.get()),
            Self::MissingSplit { node } => write!(f, "node {} is not a split", node.get()),
            Self::MissingDocument { id } => write!(f, "no open document with id {id:?}"),
            Self::DuplicateDocument { id } => write!(f, "document {id:?} is already open"),
            Self::NotClosable { id } => write!(f, "document {id:?} cannot be closed"),
            Self::NotDraggable { id } => write!(f, "document {id:?} cannot be dragged"),
            Self::DropFailed(err) => write!(f, "drop failed: {err}"),
            Self::CrossPaneDragRejected { document } => {
                write!(f, "document {document:?} cannot be dropped into another document pane")
            }
            Self::ExportConsumed { document } => {
                write!(f, "exported document {document:?} was already consumed")
            }
            Self::InvalidDividerLocation { value } => {
                write!(f, "divider location must be a finite ratio, got {value}")
            }
            Self::InvalidSnapshot { reason } => write!(f, "invalid document snapshot: {reason}"),
            Self::BrokenInvariant { reason } => {
                write!(f, "document tree invariant broken: {reason}")
            }
            Self::StructureIdOverflow => write!(f, "structure id overflow"),
        }
    }
}

impl std::error::Error for DocumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DropFailed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TransferError> for DocumentError {
    fn from(err: TransferError) -> Self {
        Self::DropFailed(err)
    }
}
