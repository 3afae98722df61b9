#![forbid(unsafe_code)]

//! Dock tree node types.
//!
//! Nodes are a sum type: a [`DockElementKind::Frame`] leaf, the singleton
//! [`DockElementKind::Content`] leaf, or a [`DockElementKind::Container`]
//! holding ordered children. They live in the [`crate::DockTree`] arena and
//! reference each other through [`NodeId`].

use panekit_core::{CompassDirection, Orientation, Rect, Size};
use serde::{Deserialize, Serialize};

use crate::error::DockError;

/// Fixed id of the content element.
pub const CONTENT_ID: &str = "content";

/// Stable arena identifier for dock nodes.
///
/// `0` is reserved so ids are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// Lowest valid node id.
    pub const MIN: Self = Self(1);

    // A fresh tree holds the content first, then the root container.
    pub(crate) const FIRST_CONTENT: Self = Self(1);
    pub(crate) const FIRST_ROOT: Self = Self(2);
    pub(crate) const FIRST_FREE: Self = Self(3);

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Return the next id, or an error on overflow.
    pub fn checked_next(self) -> Result<Self, DockError> {
        match self.0.checked_add(1) {
            Some(next) => Ok(Self(next)),
            None => Err(DockError::NodeIdOverflow),
        }
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::MIN
    }
}

/// Lifecycle state of a dockable frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameState {
    Closed,
    Minimized,
    /// Shown temporarily as an overlay strip along its docked edge.
    Preview,
    #[default]
    Docked,
    /// Detached into its own window at `floating_bounds`.
    Floating,
}

impl FrameState {
    /// States a frame returns to on restore.
    #[must_use]
    pub const fn is_restorable(self) -> bool {
        matches!(self, Self::Docked | Self::Floating)
    }
}

/// Leaf wrapping one dockable frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameElement {
    pub state: FrameState,
    pub restore_state: FrameState,
    pub floating_bounds: Option<Rect>,
    pub maximized: bool,
    /// Registration order, used to sort sidebar buttons.
    pub order: u64,
    /// Cached position relative to the content.
    pub position: CompassDirection,
}

impl FrameElement {
    #[must_use]
    pub fn new(order: u64, position: CompassDirection) -> Self {
        Self {
            state: FrameState::Docked,
            restore_state: FrameState::Docked,
            floating_bounds: None,
            maximized: false,
            order,
            position,
        }
    }

    /// Whether the frame takes part in the tree layout.
    #[must_use]
    pub const fn is_docked(&self) -> bool {
        matches!(self.state, FrameState::Docked)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerElement {
    pub orientation: Orientation,
    pub children: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DockElementKind {
    Frame(FrameElement),
    Content,
    Container(ContainerElement),
}

/// One node of the dock tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockElement {
    pub id: String,
    /// `None` for the root and for detached elements.
    pub parent: Option<NodeId>,
    /// Last computed layout bounds.
    pub bounds: Rect,
    /// Saved preferred size, kept across layout passes.
    pub size: Size,
    pub kind: DockElementKind,
}

impl DockElement {
    #[must_use]
    pub fn new(id: impl Into<String>, size: Size, kind: DockElementKind) -> Self {
        Self {
            id: id.into(),
            parent: None,
            bounds: Rect::EMPTY,
            size,
            kind,
        }
    }

    #[must_use]
    pub const fn is_frame(&self) -> bool {
        matches!(self.kind, DockElementKind::Frame(_))
    }

    #[must_use]
    pub const fn is_content(&self) -> bool {
        matches!(self.kind, DockElementKind::Content)
    }

    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self.kind, DockElementKind::Container(_))
    }

    #[must_use]
    pub const fn frame(&self) -> Option<&FrameElement> {
        match &self.kind {
            DockElementKind::Frame(frame) => Some(frame),
            _ => None,
        }
    }

    pub fn frame_mut(&mut self) -> Option<&mut FrameElement> {
        match &mut self.kind {
            DockElementKind::Frame(frame) => Some(frame),
            _ => None,
        }
    }

    #[must_use]
    pub const fn container(&self) -> Option<&ContainerElement> {
        match &self.kind {
            DockElementKind::Container(container) => Some(container),
            _ => None,
        }
    }

    pub fn container_mut(&mut self) -> Option<&mut ContainerElement> {
        match &mut self.kind {
            DockElementKind::Container(container) => Some(container),
            _ => None,
        }
    }

    /// Children in order; leaves have none.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            DockElementKind::Container(container) => &container.children,
            _ => &[],
        }
    }
}
