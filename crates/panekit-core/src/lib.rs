#![forbid(unsafe_code)]

//! Shared primitives for the panekit layout engines.
//!
//! - [`geometry`]: points, sizes, rectangles and insets in host pixels.
//! - [`direction`]: container orientation and compass directions.
//! - [`drag`]: the single-flight pointer drag state machine.
//! - [`payload`]: the drag payload contract between drag source and target.
//! - [`config`]: TOML/JSON loading for engine configuration.

pub mod config;
pub mod direction;
pub mod drag;
pub mod geometry;
pub mod payload;

pub use config::{ConfigError, ValidateConfig};
pub use direction::{CompassDirection, Orientation, UnknownDirection};
pub use drag::{DragEffect, DragMachine, DragNoopReason, DragState, PointerEvent};
pub use geometry::{Insets, Point, Rect, Size};
pub use payload::{DragPayload, InstanceId, PayloadKind, TransferError};
