#![forbid(unsafe_code)]

//! Error type for the dock engine.
//!
//! Every variant is an invariant or contract violation: a caller or
//! algorithm bug, or a host that handed over a broken drag payload. None of
//! them is a recoverable user error, and none may be ignored.

use std::fmt;

use panekit_core::{TransferError, UnknownDirection};

use crate::element::NodeId;

#[derive(Debug)]
pub enum DockError {
    /// The root container can never be removed.
    CannotRemoveRoot {
        id: String,
    },
    /// The content element can never be removed.
    CannotRemoveContent,
    /// A direction name matching none of the four compass values.
    UnknownElementPosition {
        value: String,
    },
    /// The upward walk from the content never met the frame.
    UnknownFramePosition {
        id: String,
    },
    MissingElement {
        id: String,
    },
    MissingNode {
        node: NodeId,
    },
    DuplicateElementId {
        id: String,
    },
    NotAFrame {
        id: String,
    },
    NotAContainer {
        id: String,
    },
    /// The element is expected to be part of the structure but is detached.
    NotAttached {
        id: String,
    },
    /// The element must be detached before it is inserted again.
    AlreadyAttached {
        id: String,
    },
    /// Corrupted or mistyped drag payload during drop resolution.
    DropFailed(TransferError),
    InvalidSnapshot {
        reason: String,
    },
    /// Structural invariant found broken by [`crate::DockTree::validate`].
    BrokenInvariant {
        reason: String,
    },
    NodeIdOverflow,
}

impl fmt::Display for DockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CannotRemoveRoot { id } => write!(f, "root element {id:?} cannot be removed"),
            Self::CannotRemoveContent => write!(f, "content element cannot be removed"),
            Self::UnknownElementPosition { value } => {
                write!(f, "Unknown element position specified: {value:?}")
            }
            Self::UnknownFramePosition { id } => {
                write!(f, "unable to determine position of frame {id:?}")
            }
            Self::MissingElement { id } => write!(f, "no element with id {id:?}"),
            Self::MissingNode { node } => write!(f, "dock node {} not found", node.get()),
            Self::DuplicateElementId { id } => write!(f, "element id {id:?} is already in use"),
            Self::NotAFrame { id } => write!(f, "element {id:?} is not a frame"),
            Self::NotAContainer { id } => write!(f, "element {id:?} is not a container"),
            Self::NotAttached { id } => write!(f, "element {id:?} is not part of the structure"),
            Self::AlreadyAttached { id } => {
                write!(f, "element {id:?} is already part of the structure")
            }
            Self::DropFailed(err) => write!(f, "drop failed: {err}"),
            Self::InvalidSnapshot { reason } => write!(f, "invalid dock snapshot: {reason}"),
            Self::BrokenInvariant { reason } => write!(f, "dock tree invariant broken: {reason}"),
            Self::NodeIdOverflow => write!(f, "dock node id overflow"),
        }
    }
}

impl std::error::Error for DockError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DropFailed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TransferError> for DockError {
    fn from(err: TransferError) -> Self {
        Self::DropFailed(err)
    }
}

impl From<UnknownDirection> for DockError {
    fn from(err: UnknownDirection) -> Self {
        Self::UnknownElementPosition { value: err.value }
    }
}
