#![forbid(unsafe_code)]

//! Document split/tab engine.
//!
//! A [`DocumentPane`] holds documents in tab groups arranged by a binary
//! [`StructureTree`] of splits. The host drives it:
//!
//! - documents: [`DocumentPane::open_document`],
//!   [`DocumentPane::close_document`], [`DocumentPane::select_document`];
//! - structure: [`DocumentPane::split`], [`DocumentPane::merge`],
//!   [`DocumentPane::rotate`], [`DocumentPane::swap`];
//! - transfer: export a document, import it at a drop location, then finish
//!   with [`DocumentPane::export_done`], or let a [`DocumentDragHandler`]
//!   run the whole gesture;
//! - notifications: [`DocumentPane::take_events`].
//!
//! # Example
//!
//! ```
//! use panekit_document::{DocumentData, DocumentPane, SplitDirection};
//!
//! let mut pane = DocumentPane::default();
//! pane.open_document(DocumentData::new("main.rs", "main.rs")).unwrap();
//! pane.open_document(DocumentData::new("lib.rs", "lib.rs")).unwrap();
//!
//! let root = pane.root();
//! let right = pane.split(root, Some("lib.rs"), SplitDirection::Right).unwrap();
//! assert_eq!(pane.pane_of("lib.rs"), Some(right));
//!
//! pane.merge(right).unwrap();
//! assert_eq!(pane.panes().len(), 1);
//! assert_eq!(pane.document_count(), 2);
//! ```

pub mod config;
pub mod document;
pub mod drag;
pub mod error;
pub mod events;
pub mod pane;
pub mod snapshot;
pub mod split;
pub mod structure;
pub mod transfer;

pub use config::DocumentPaneConfig;
pub use document::{Color, DocumentData};
pub use drag::{DocumentDragEffect, DocumentDragHandler, DragSource};
pub use error::DocumentError;
pub use events::DocumentPaneEvent;
pub use pane::DocumentPane;
pub use snapshot::{DOCUMENT_SNAPSHOT_SCHEMA_VERSION, DocumentPaneSnapshot, StructureRecord};
pub use split::INITIAL_DIVIDER_LOCATION;
pub use structure::{
    PaneData, SplitData, SplitDirection, SplitOrientation, StructureId, StructureNode,
    StructureTree,
};
pub use transfer::{DocumentExport, DropLocation, DropTarget, ExportOutcome, resolve_drop};
