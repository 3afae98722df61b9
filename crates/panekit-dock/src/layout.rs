#![forbid(unsafe_code)]

//! The dock layout pass.
//!
//! One pass turns the current tree plus host geometry into a [`DockLayout`]:
//!
//! 1. outer bounds are the component bounds minus insets;
//! 2. each of the four sidebars collects its buttons, sorted by frame
//!    registration order, and is as wide as its widest button across the
//!    flow;
//! 3. inner bounds are the outer bounds minus the four sidebar widths;
//! 4. at most one preview and one maximized frame are picked (last wins);
//! 5. without a maximized frame the tree is laid out recursively inside the
//!    inner bounds, otherwise the maximized frame takes the inner bounds and
//!    every other frame is zeroed;
//! 6. a preview frame gets a strip along its edge above the docked frames;
//! 7. the glass layer covers the whole component.
//!
//! The pass only writes element bounds, never saved sizes, so running it
//! twice on an unchanged tree yields identical output.

use std::collections::BTreeMap;

use panekit_core::{CompassDirection, Insets, Orientation, Point, Rect, Size};
use serde::{Deserialize, Serialize};

use crate::config::{DockablePaneConfig, SidebarVisibility};
use crate::element::{DockElementKind, FrameElement, FrameState, NodeId};
use crate::error::DockError;
use crate::tree::DockTree;

/// Geometry the host supplies for one layout pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaneGeometry {
    /// Component bounds, usually anchored at the origin.
    pub bounds: Rect,
    pub insets: Insets,
    /// Preferred sidebar button size per frame id.
    pub sidebar_buttons: BTreeMap<String, Size>,
}

impl PaneGeometry {
    #[must_use]
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_insets(mut self, insets: impl Into<Insets>) -> Self {
        self.insets = insets.into();
        self
    }

    #[must_use]
    pub fn with_button(mut self, frame_id: impl Into<String>, size: Size) -> Self {
        self.sidebar_buttons.insert(frame_id.into(), size);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarButton {
    pub frame: String,
    pub bounds: Rect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarLayout {
    pub bar: Rect,
    /// Extent across the button flow.
    pub width: i32,
    /// Extent along the button flow, spacing included.
    pub length: i32,
    pub buttons: Vec<SidebarButton>,
}

/// A draggable boundary between two adjacent visible elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeData {
    pub bounds: Rect,
    /// Orientation of the container both elements belong to.
    pub orientation: Orientation,
    pub leading: NodeId,
    pub trailing: NodeId,
}

/// Result of one layout pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DockLayout {
    pub outer: Rect,
    pub inner: Rect,
    pub glass: Rect,
    pub sidebars: BTreeMap<CompassDirection, SidebarLayout>,
    /// Bounds per element id.
    pub bounds: BTreeMap<String, Rect>,
    pub resize_areas: Vec<ResizeData>,
    /// Visible frame ids, bottom to top.
    pub z_order: Vec<String>,
    pub preview: Option<String>,
    pub maximized: Option<String>,
}

impl DockLayout {
    #[must_use]
    pub fn bounds_of(&self, id: &str) -> Option<Rect> {
        self.bounds.get(id).copied()
    }

    /// Resize area under `point`.
    #[must_use]
    pub fn resize_area_at(&self, point: Point) -> Option<&ResizeData> {
        self.resize_areas.iter().find(|area| area.bounds.contains(point))
    }
}

/// Whether a frame in `state` gets a sidebar button.
#[must_use]
pub fn has_sidebar_button(visibility: SidebarVisibility, state: FrameState) -> bool {
    match visibility {
        SidebarVisibility::None => false,
        SidebarVisibility::Minimized => {
            matches!(state, FrameState::Minimized | FrameState::Preview)
        }
        SidebarVisibility::All => !matches!(state, FrameState::Closed),
    }
}

/// Bar width and flow length for buttons laid out along `direction`'s edge.
///
/// North/south bars flow left to right and are as tall as the tallest
/// button; west/east bars flow top to bottom and are as wide as the widest.
#[must_use]
pub fn sidebar_extent(direction: CompassDirection, buttons: &[Size], spacing: i32) -> (i32, i32) {
    let flow = direction.orientation().flip();
    let across = direction.orientation();
    let width = buttons
        .iter()
        .map(|size| size.along(across))
        .max()
        .unwrap_or(0)
        .max(0);
    let gaps = i32::try_from(buttons.len().saturating_sub(1)).unwrap_or(i32::MAX);
    let length = buttons
        .iter()
        .map(|size| size.along(flow).max(0))
        .fold(0, i32::saturating_add)
        .saturating_add(spacing.max(0).saturating_mul(gaps));
    (width, length)
}

pub(crate) fn compute(
    tree: &mut DockTree,
    config: &DockablePaneConfig,
    geometry: &PaneGeometry,
) -> Result<DockLayout, DockError> {
    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!(
        "dock_layout",
        width = geometry.bounds.width,
        height = geometry.bounds.height
    )
    .entered();

    let outer = geometry.bounds.inner(geometry.insets);

    // Sidebar buttons per edge, sorted by registration order.
    let mut collected: BTreeMap<CompassDirection, Vec<(String, Size)>> = BTreeMap::new();
    let mut frames: Vec<(&FrameElement, &str)> = tree
        .frames()
        .filter(|(_, _, frame)| has_sidebar_button(config.sidebar_visibility, frame.state))
        .map(|(_, element, frame)| (frame, element.id.as_str()))
        .collect();
    frames.sort_by_key(|(frame, _)| frame.order);
    for (frame, id) in frames {
        let size = geometry
            .sidebar_buttons
            .get(id)
            .copied()
            .unwrap_or_default();
        collected
            .entry(frame.position)
            .or_default()
            .push((id.to_string(), size));
    }

    let mut extents: BTreeMap<CompassDirection, (i32, i32)> = BTreeMap::new();
    for (direction, buttons) in &collected {
        let sizes: Vec<Size> = buttons.iter().map(|(_, size)| *size).collect();
        extents.insert(
            *direction,
            sidebar_extent(*direction, &sizes, config.sidebar_button_spacing),
        );
    }
    let width_of = |direction: CompassDirection| extents.get(&direction).map_or(0, |(width, _)| *width);
    let north = width_of(CompassDirection::North);
    let south = width_of(CompassDirection::South);
    let west = width_of(CompassDirection::West);
    let east = width_of(CompassDirection::East);

    let inner = Rect::new(
        outer.x + west,
        outer.y + north,
        (outer.width - west - east).max(0),
        (outer.height - north - south).max(0),
    );

    let mut sidebars = BTreeMap::new();
    for (direction, buttons) in collected {
        let (width, length) = extents.get(&direction).copied().unwrap_or((0, 0));
        let bar = match direction {
            CompassDirection::North => Rect::new(inner.x, outer.y, inner.width, width),
            CompassDirection::South => Rect::new(inner.x, inner.bottom(), inner.width, width),
            CompassDirection::West => Rect::new(outer.x, inner.y, width, inner.height),
            CompassDirection::East => Rect::new(inner.right(), inner.y, width, inner.height),
        };
        let mut cursor = match direction.orientation() {
            Orientation::Vertical => bar.x,
            Orientation::Horizontal => bar.y,
        };
        let mut placed = Vec::with_capacity(buttons.len());
        for (frame, size) in buttons {
            let bounds = match direction.orientation() {
                Orientation::Vertical => {
                    let rect = Rect::new(cursor, bar.y, size.width.max(0), bar.height);
                    cursor += rect.width + config.sidebar_button_spacing;
                    rect
                }
                Orientation::Horizontal => {
                    let rect = Rect::new(bar.x, cursor, bar.width, size.height.max(0));
                    cursor += rect.height + config.sidebar_button_spacing;
                    rect
                }
            };
            placed.push(SidebarButton { frame, bounds });
        }
        sidebars.insert(
            direction,
            SidebarLayout {
                bar,
                width,
                length,
                buttons: placed,
            },
        );
    }

    let mut preview = None;
    let mut maximized = None;
    for (node, _, frame) in tree.frames() {
        if frame.state == FrameState::Preview {
            preview = Some(node);
        }
        if frame.maximized && frame.is_docked() {
            maximized = Some(node);
        }
    }

    let all: Vec<NodeId> = tree.nodes().map(|(node, _)| node).collect();
    for node in all {
        tree.node_mut(node)?.bounds = Rect::EMPTY;
    }

    let mut resize_areas = Vec::new();
    let root = tree.root();
    match maximized {
        None => layout_node(tree, root, inner, config, &mut resize_areas)?,
        Some(frame) => {
            let content = tree.content();
            tree.node_mut(content)?.bounds = inner;
            tree.node_mut(frame)?.bounds = inner;
        }
    }

    if let Some(frame) = preview {
        let element = tree.node(frame)?;
        let position = element.frame().map_or(CompassDirection::West, |f| f.position);
        let strip = preview_strip(inner, position, element.size);
        tree.node_mut(frame)?.bounds = strip;
    }

    let mut z_order = Vec::new();
    collect_docked_frames(tree, root, &mut z_order)?;
    let id_of = |node: NodeId| tree.node(node).map(|element| element.id.clone());
    let preview_id = preview.map(id_of).transpose()?;
    let maximized_id = maximized.map(id_of).transpose()?;
    if let Some(maximized_id) = &maximized_id {
        z_order.retain(|id| id == maximized_id);
    }
    if let Some(id) = &preview_id {
        z_order.retain(|other| other != id);
        match &maximized_id {
            Some(_) => z_order.insert(0, id.clone()),
            None => z_order.push(id.clone()),
        }
    }

    let bounds = tree
        .nodes()
        .map(|(_, element)| (element.id.clone(), element.bounds))
        .collect();

    #[cfg(feature = "tracing")]
    tracing::debug!(
        resize_areas = resize_areas.len(),
        sidebars = sidebars.len(),
        "dock layout computed"
    );

    Ok(DockLayout {
        outer,
        inner,
        glass: geometry.bounds,
        sidebars,
        bounds,
        resize_areas,
        z_order,
        preview: preview_id,
        maximized: maximized_id,
    })
}

fn preview_strip(inner: Rect, position: CompassDirection, size: Size) -> Rect {
    match position {
        CompassDirection::West => {
            Rect::new(inner.x, inner.y, size.width.clamp(0, inner.width), inner.height)
        }
        CompassDirection::East => {
            let width = size.width.clamp(0, inner.width);
            Rect::new(inner.right() - width, inner.y, width, inner.height)
        }
        CompassDirection::North => {
            Rect::new(inner.x, inner.y, inner.width, size.height.clamp(0, inner.height))
        }
        CompassDirection::South => {
            let height = size.height.clamp(0, inner.height);
            Rect::new(inner.x, inner.bottom() - height, inner.width, height)
        }
    }
}

fn collect_docked_frames(
    tree: &DockTree,
    node: NodeId,
    out: &mut Vec<String>,
) -> Result<(), DockError> {
    let element = tree.node(node)?;
    match &element.kind {
        DockElementKind::Frame(frame) if frame.is_docked() && !element.bounds.is_empty() => {
            out.push(element.id.clone());
        }
        DockElementKind::Container(container) => {
            for child in &container.children {
                collect_docked_frames(tree, *child, out)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Whether the element takes part in the tree layout.
pub(crate) fn is_visible(tree: &DockTree, node: NodeId) -> bool {
    match tree.get(node).map(|element| &element.kind) {
        Some(DockElementKind::Frame(frame)) => frame.is_docked(),
        Some(DockElementKind::Content) => true,
        Some(DockElementKind::Container(container)) => container
            .children
            .iter()
            .any(|child| is_visible(tree, *child)),
        None => false,
    }
}

fn layout_node(
    tree: &mut DockTree,
    node: NodeId,
    bounds: Rect,
    config: &DockablePaneConfig,
    areas: &mut Vec<ResizeData>,
) -> Result<(), DockError> {
    tree.node_mut(node)?.bounds = bounds;
    let Some(container) = tree.node(node)?.container() else {
        return Ok(());
    };
    let orientation = container.orientation;
    let visible: Vec<NodeId> = container
        .children
        .iter()
        .copied()
        .filter(|child| is_visible(tree, *child))
        .collect();
    if visible.is_empty() {
        return Ok(());
    }

    let desired = visible
        .iter()
        .map(|child| tree.node(*child).map(|element| element.size.along(orientation)))
        .collect::<Result<Vec<_>, _>>()?;
    let flexible = visible.iter().position(|child| tree.contains_content(*child));
    let lengths = distribute(
        bounds.extent(orientation),
        &desired,
        flexible,
        config.min_element_size,
    );

    let gripper = config.resize_gripper_width.max(0);
    let mut offset = match orientation {
        Orientation::Horizontal => bounds.x,
        Orientation::Vertical => bounds.y,
    };
    for (index, (child, length)) in visible.iter().zip(lengths).enumerate() {
        let child_bounds = match orientation {
            Orientation::Horizontal => Rect::new(offset, bounds.y, length, bounds.height),
            Orientation::Vertical => Rect::new(bounds.x, offset, bounds.width, length),
        };
        offset += length;
        if let Some(next) = visible.get(index + 1) {
            let area = match orientation {
                Orientation::Horizontal => {
                    Rect::new(offset - gripper / 2, bounds.y, gripper, bounds.height)
                }
                Orientation::Vertical => {
                    Rect::new(bounds.x, offset - gripper / 2, bounds.width, gripper)
                }
            };
            areas.push(ResizeData {
                bounds: area,
                orientation,
                leading: *child,
                trailing: *next,
            });
        }
        layout_node(tree, *child, child_bounds, config, areas)?;
    }
    Ok(())
}

/// Split `available` pixels between children wanting `desired` each.
///
/// With a `flexible` child (the one holding the content) every other child
/// gets its desired length, at least `min`, and the flexible child takes the
/// rest; when the others do not fit they shrink proportionally down to
/// `min`. Without one, lengths are proportional to `desired`. `min` is
/// lowered when `available` cannot give every child that much.
pub(crate) fn distribute(
    available: i32,
    desired: &[i32],
    flexible: Option<usize>,
    min: i32,
) -> Vec<i32> {
    let count = desired.len();
    if count == 0 {
        return Vec::new();
    }
    let available = available.max(0);
    let slots = i32::try_from(count).unwrap_or(i32::MAX);
    let min = min.max(0).min(available / slots);

    match flexible.filter(|index| *index < count) {
        Some(flexible) => {
            let mut lengths: Vec<i32> = desired.iter().map(|length| (*length).max(min)).collect();
            lengths[flexible] = 0;
            let budget = available - min;
            let fixed: i64 = lengths.iter().map(|length| i64::from(*length)).sum();
            if fixed > i64::from(budget) {
                shrink_to_budget(&mut lengths, flexible, budget, min);
            }
            let taken: i32 = lengths.iter().sum();
            lengths[flexible] = available - taken;
            lengths
        }
        None => {
            let weights: Vec<i64> = desired.iter().map(|length| i64::from((*length).max(1))).collect();
            let total: i64 = weights.iter().sum();
            let mut lengths: Vec<i32> = weights
                .iter()
                .map(|weight| {
                    i32::try_from(i64::from(available) * weight / total).unwrap_or(available)
                })
                .collect();
            let assigned: i32 = lengths.iter().sum();
            if let Some(last) = lengths.last_mut() {
                *last += available - assigned;
            }
            raise_to_min(&mut lengths, min);
            lengths
        }
    }
}

fn shrink_to_budget(lengths: &mut [i32], skip: usize, budget: i32, min: i32) {
    let others = i64::try_from(lengths.len().saturating_sub(1)).unwrap_or(i64::MAX);
    let excess_budget = (i64::from(budget) - others * i64::from(min)).max(0);
    let excess_total: i64 = lengths
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != skip)
        .map(|(_, length)| i64::from(*length - min))
        .sum();
    if excess_total <= 0 {
        return;
    }
    for (index, length) in lengths.iter_mut().enumerate() {
        if index == skip {
            continue;
        }
        let excess = i64::from(*length - min) * excess_budget / excess_total;
        *length = min + i32::try_from(excess).unwrap_or(0);
    }
}

fn raise_to_min(lengths: &mut [i32], min: i32) {
    for index in 0..lengths.len() {
        while lengths[index] < min {
            let need = min - lengths[index];
            let donor = lengths
                .iter()
                .enumerate()
                .filter(|(other, length)| *other != index && **length > min)
                .max_by_key(|(_, length)| **length)
                .map(|(other, _)| other);
            let Some(donor) = donor else {
                break;
            };
            let take = need.min(lengths[donor] - min);
            lengths[donor] -= take;
            lengths[index] += take;
        }
    }
}
