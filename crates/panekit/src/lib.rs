#![forbid(unsafe_code)]

//! panekit public facade crate.
//!
//! Re-exports the dockable-pane engine, the document split/tab engine and
//! their shared primitives, with a prelude for day-to-day usage. A single
//! [`PanekitConfig`] file can configure both engines:
//!
//! ```toml
//! [dock]
//! drop_side = 48
//!
//! [document]
//! drag_between_panes_enabled = true
//! ```

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

// --- Core re-exports -------------------------------------------------------

pub use panekit_core::{
    CompassDirection, ConfigError, DragEffect, DragMachine, DragPayload, DragState, Insets,
    InstanceId, Orientation, PayloadKind, Point, PointerEvent, Rect, Size, TransferError,
    ValidateConfig,
};

// --- Dock re-exports -------------------------------------------------------

pub use panekit_dock::{
    DockError, DockInteraction, DockLayout, DockTree, DockablePaneConfig, DockablePaneModel,
    DockablePaneSnapshot, DropData, FrameState, InteractionEffect, PaneGeometry, ResizeData,
    SidebarVisibility,
};

// --- Document re-exports ---------------------------------------------------

pub use panekit_document::{
    DocumentData, DocumentDragEffect, DocumentDragHandler, DocumentError, DocumentExport,
    DocumentPane, DocumentPaneConfig, DocumentPaneEvent, DocumentPaneSnapshot, DropLocation,
    DropTarget, ExportOutcome, SplitDirection, SplitOrientation, StructureId,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for panekit hosts.
#[derive(Debug)]
pub enum Error {
    Dock(DockError),
    Document(DocumentError),
    Config(ConfigError),
    /// Drag payload could not be decoded.
    Transfer(TransferError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dock(err) => write!(f, "{err}"),
            Self::Document(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
            Self::Transfer(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Dock(err) => Some(err),
            Self::Document(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::Transfer(err) => Some(err),
        }
    }
}

impl From<DockError> for Error {
    fn from(err: DockError) -> Self {
        Self::Dock(err)
    }
}

impl From<DocumentError> for Error {
    fn from(err: DocumentError) -> Self {
        Self::Document(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<TransferError> for Error {
    fn from(err: TransferError) -> Self {
        Self::Transfer(err)
    }
}

/// Standard result type for panekit APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Configuration --------------------------------------------------------

/// Configuration for both engines, one table each.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanekitConfig {
    pub dock: DockablePaneConfig,
    pub document: DocumentPaneConfig,
}

impl PanekitConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(panekit_core::config::from_toml_str(s)?)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(panekit_core::config::from_toml_file(path)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(panekit_core::config::from_json_str(s)?)
    }

    /// A fresh dockable pane using the `[dock]` table.
    #[must_use]
    pub fn dockable_pane(&self) -> DockablePaneModel {
        DockablePaneModel::new(self.dock.clone())
    }

    /// A fresh document pane using the `[document]` table.
    #[must_use]
    pub fn document_pane(&self) -> DocumentPane {
        DocumentPane::new(self.document.clone())
    }
}

impl ValidateConfig for PanekitConfig {
    fn validate(&self) -> Vec<String> {
        let dock = self.dock.validate().into_iter().map(|e| format!("dock: {e}"));
        let document = self
            .document
            .validate()
            .into_iter()
            .map(|e| format!("document: {e}"));
        dock.chain(document).collect()
    }
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        CompassDirection, DockInteraction, DockablePaneModel, DocumentData, DocumentDragHandler,
        DocumentPane, Error, PaneGeometry, PanekitConfig, Point, PointerEvent, Rect, Result,
        Size, SplitDirection,
    };

    pub use crate::{core, dock, document};
}

pub use panekit_core as core;
pub use panekit_dock as dock;
pub use panekit_document as document;
