#![forbid(unsafe_code)]

//! Drag payload contract shared by dock frames and documents.
//!
//! The host's drag subsystem carries the payload as opaque text; both
//! engines encode it with [`DragPayload::encode`] when a drag starts and
//! decode it with [`DragPayload::decode`] on every drag-over/drop. A payload
//! that cannot be decoded, or that carries the wrong kind, is a contract
//! violation by the host and surfaces as a [`TransferError`].

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Identity of one dockable pane or document pane instance.
///
/// Drop targets compare it with the payload's source instance to decide
/// whether a drag crosses pane boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(u64);

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

impl InstanceId {
    /// Allocate a process-unique instance id.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// What is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadKind {
    DockableFrame,
    Document,
}

/// Drag payload carried between drag source and drop target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragPayload {
    pub kind: PayloadKind,
    /// Frame id or document id.
    pub dragged_id: String,
    /// Frame id or source pane id, rendered by the source engine.
    pub source_id: String,
    pub source_instance: InstanceId,
    #[serde(default)]
    pub allow_cross_pane_drag: bool,
}

impl DragPayload {
    #[must_use]
    pub fn new(
        kind: PayloadKind,
        dragged_id: impl Into<String>,
        source_id: impl Into<String>,
        source_instance: InstanceId,
    ) -> Self {
        Self {
            kind,
            dragged_id: dragged_id.into(),
            source_id: source_id.into(),
            source_instance,
            allow_cross_pane_drag: false,
        }
    }

    #[must_use]
    pub fn allow_cross_pane_drag(mut self, allow: bool) -> Self {
        self.allow_cross_pane_drag = allow;
        self
    }

    /// Serialize for the host's transfer mechanism.
    pub fn encode(&self) -> Result<String, TransferError> {
        serde_json::to_string(self).map_err(TransferError::Corrupted)
    }

    /// Decode and check the payload kind.
    pub fn decode(data: &str, expected: PayloadKind) -> Result<Self, TransferError> {
        if data.trim().is_empty() {
            return Err(TransferError::Missing);
        }
        let payload: Self = serde_json::from_str(data).map_err(TransferError::Corrupted)?;
        payload.expect_kind(expected)?;
        Ok(payload)
    }

    /// Check the payload kind of an already-typed payload.
    pub fn expect_kind(&self, expected: PayloadKind) -> Result<(), TransferError> {
        if self.kind != expected {
            return Err(TransferError::WrongKind {
                expected,
                actual: self.kind,
            });
        }
        if self.dragged_id.is_empty() {
            return Err(TransferError::Missing);
        }
        Ok(())
    }

    /// Whether a drop into `target` is permitted.
    #[must_use]
    pub fn accepted_by(&self, target: InstanceId) -> bool {
        self.source_instance == target || self.allow_cross_pane_drag
    }
}

/// Payload decoding failures.
#[derive(Debug)]
pub enum TransferError {
    /// No payload data, or no dragged id.
    Missing,
    Corrupted(serde_json::Error),
    WrongKind {
        expected: PayloadKind,
        actual: PayloadKind,
    },
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "drag payload is missing"),
            Self::Corrupted(err) => write!(f, "drag payload is corrupted: {err}"),
            Self::WrongKind { expected, actual } => {
                write!(f, "drag payload kind {actual:?} where {expected:?} was expected")
            }
        }
    }
}

impl std::error::Error for TransferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Corrupted(err) => Some(err),
            Self::Missing | Self::WrongKind { .. } => None,
        }
    }
}
