#![forbid(unsafe_code)]

//! Dockable pane layout engine.
//!
//! A [`DockablePaneModel`] owns a [`DockTree`] of frames arranged around a
//! single content element. The host drives it:
//!
//! - structural edits: [`DockablePaneModel::add_frame`],
//!   [`DockablePaneModel::remove_frame`] and the frame state transitions;
//! - the layout pass: [`DockablePaneModel::layout_container`] turns host
//!   geometry into a [`DockLayout`] with bounds, sidebars and resize areas;
//! - drag and drop: [`DockablePaneModel::drop_data`] resolves a target
//!   without mutating, [`DockablePaneModel::drop`] commits it;
//! - pointer input on the glass layer through [`DockInteraction`].
//!
//! # Example
//!
//! ```
//! use panekit_core::{CompassDirection, Rect, Size};
//! use panekit_dock::{DockablePaneModel, PaneGeometry};
//!
//! let mut model = DockablePaneModel::default();
//! model
//!     .add_frame("project", CompassDirection::West, Size::new(200, 0))
//!     .unwrap();
//! let layout = model
//!     .layout_container(&PaneGeometry::new(Rect::from_size(800, 600)))
//!     .unwrap();
//! assert_eq!(layout.bounds_of("project"), Some(Rect::new(0, 0, 200, 600)));
//! ```

pub mod config;
pub mod drop;
pub mod element;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod model;
pub mod resize;
pub mod snapshot;
pub mod tree;

pub use config::{DockablePaneConfig, SidebarVisibility};
pub use drop::{DropData, create_drop_data, highlight_area, resolve_direction};
pub use element::{
    CONTENT_ID, ContainerElement, DockElement, DockElementKind, FrameElement, FrameState, NodeId,
};
pub use error::DockError;
pub use interaction::{DockGesture, DockInteraction, InteractionEffect};
pub use layout::{
    DockLayout, PaneGeometry, ResizeData, SidebarButton, SidebarLayout, has_sidebar_button,
    sidebar_extent,
};
pub use model::DockablePaneModel;
pub use resize::ResizeOrigin;
pub use snapshot::{DOCK_SNAPSHOT_SCHEMA_VERSION, DockRecord, DockablePaneSnapshot};
pub use tree::DockTree;
