#![forbid(unsafe_code)]

//! The dockable pane model: frame lifecycle, layout, drop and resize.

use panekit_core::{
    CompassDirection, DragPayload, InstanceId, PayloadKind, Point, Rect, Size,
};

use crate::config::DockablePaneConfig;
use crate::drop::{DropData, create_drop_data};
use crate::element::{DockElement, FrameElement, FrameState, NodeId};
use crate::error::DockError;
use crate::layout::{self, DockLayout, PaneGeometry, ResizeData};
use crate::resize::{self, ResizeOrigin};
use crate::tree::DockTree;

/// Owns one dock tree and the result of its last layout pass.
#[derive(Debug, Clone)]
pub struct DockablePaneModel {
    instance: InstanceId,
    config: DockablePaneConfig,
    tree: DockTree,
    layout: DockLayout,
    next_order: u64,
}

impl Default for DockablePaneModel {
    fn default() -> Self {
        Self::new(DockablePaneConfig::default())
    }
}

impl DockablePaneModel {
    #[must_use]
    pub fn new(config: DockablePaneConfig) -> Self {
        Self::with_tree(config, DockTree::new())
    }

    pub(crate) fn with_tree(config: DockablePaneConfig, tree: DockTree) -> Self {
        let next_order = tree
            .frames()
            .map(|(_, _, frame)| frame.order + 1)
            .max()
            .unwrap_or(0);
        Self {
            instance: InstanceId::next(),
            config,
            tree,
            layout: DockLayout::default(),
            next_order,
        }
    }

    #[must_use]
    pub const fn instance(&self) -> InstanceId {
        self.instance
    }

    #[must_use]
    pub const fn config(&self) -> &DockablePaneConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: DockablePaneConfig) {
        self.config = config;
    }

    #[must_use]
    pub const fn tree(&self) -> &DockTree {
        &self.tree
    }

    #[must_use]
    pub fn root(&self) -> Option<&DockElement> {
        self.tree.get(self.tree.root())
    }

    #[must_use]
    pub fn get_element(&self, id: &str) -> Option<&DockElement> {
        self.tree.find(id).and_then(|node| self.tree.get(node))
    }

    /// Last computed layout.
    #[must_use]
    pub const fn layout(&self) -> &DockLayout {
        &self.layout
    }

    fn frame_node(&self, id: &str) -> Result<NodeId, DockError> {
        let node = self
            .tree
            .find(id)
            .ok_or_else(|| DockError::MissingElement { id: id.to_string() })?;
        if self.tree.get(node).is_some_and(DockElement::is_frame) {
            Ok(node)
        } else {
            Err(DockError::NotAFrame { id: id.to_string() })
        }
    }

    /// Frame data by id.
    pub fn frame(&self, id: &str) -> Result<&FrameElement, DockError> {
        let node = self.frame_node(id)?;
        self.tree
            .get(node)
            .and_then(DockElement::frame)
            .ok_or_else(|| DockError::NotAFrame { id: id.to_string() })
    }

    /// Register a frame and dock it next to the content.
    pub fn add_frame(
        &mut self,
        id: impl Into<String>,
        position: CompassDirection,
        size: Size,
    ) -> Result<NodeId, DockError> {
        let id = id.into();
        let order = self.next_order;
        let node = self
            .tree
            .create_frame(id, size, FrameElement::new(order, position))?;
        self.next_order += 1;
        let content = self.tree.content();
        self.tree.add_structure_element(content, node, position)?;
        self.refresh_positions()?;
        #[cfg(feature = "tracing")]
        tracing::debug!(frame = node.get(), %position, "frame added");
        Ok(node)
    }

    /// Same as [`Self::add_frame`] with a position name such as `"west"`.
    pub fn add_frame_at(
        &mut self,
        id: impl Into<String>,
        position: &str,
        size: Size,
    ) -> Result<NodeId, DockError> {
        let position: CompassDirection = position.parse()?;
        self.add_frame(id, position, size)
    }

    /// Associate a frame with the pane: create it on first sight, otherwise
    /// make sure it is part of the structure again.
    pub fn update_frame(
        &mut self,
        id: &str,
        position: CompassDirection,
        size: Size,
    ) -> Result<NodeId, DockError> {
        let Some(node) = self.tree.find(id) else {
            return self.add_frame(id, position, size);
        };
        if !self.tree.get(node).is_some_and(DockElement::is_frame) {
            return Err(DockError::NotAFrame { id: id.to_string() });
        }
        if !self.tree.is_attached(node) {
            let content = self.tree.content();
            self.tree.add_structure_element(content, node, position)?;
            self.refresh_positions()?;
        }
        Ok(node)
    }

    /// Remove a frame from the structure and forget it.
    pub fn remove_frame(&mut self, id: &str) -> Result<DockElement, DockError> {
        let node = self.frame_node(id)?;
        if self.tree.is_attached(node) {
            self.tree.remove_structure_element(node)?;
        }
        let removed = self.tree.discard(node)?;
        self.refresh_positions()?;
        #[cfg(feature = "tracing")]
        tracing::debug!(frame = id, "frame removed");
        Ok(removed)
    }

    pub fn set_frame_size(&mut self, id: &str, size: Size) -> Result<(), DockError> {
        let node = self.frame_node(id)?;
        self.tree.node_mut(node)?.size = size;
        Ok(())
    }

    #[must_use]
    pub fn frame_position(&self, id: &str) -> Option<CompassDirection> {
        self.frame(id).ok().map(|frame| frame.position)
    }

    fn set_state(&mut self, node: NodeId, state: FrameState) -> Result<(), DockError> {
        let frame = self.tree.frame_mut(node)?;
        if frame.state.is_restorable() {
            frame.restore_state = frame.state;
        }
        if state != FrameState::Docked {
            frame.maximized = false;
        }
        frame.state = state;
        Ok(())
    }

    pub fn dock(&mut self, id: &str) -> Result<(), DockError> {
        let node = self.frame_node(id)?;
        if !self.tree.is_attached(node) {
            let position = self.frame(id)?.position;
            let content = self.tree.content();
            self.tree.add_structure_element(content, node, position)?;
            self.refresh_positions()?;
        }
        self.set_state(node, FrameState::Docked)
    }

    pub fn minimize(&mut self, id: &str) -> Result<(), DockError> {
        let node = self.frame_node(id)?;
        self.set_state(node, FrameState::Minimized)
    }

    /// Show a minimized frame as an overlay strip. A frame already in
    /// preview goes back to minimized.
    pub fn preview(&mut self, id: &str) -> Result<(), DockError> {
        let node = self.frame_node(id)?;
        let previous: Vec<NodeId> = self
            .tree
            .frames()
            .filter(|(other, _, frame)| *other != node && frame.state == FrameState::Preview)
            .map(|(other, _, _)| other)
            .collect();
        for other in previous {
            self.tree.frame_mut(other)?.state = FrameState::Minimized;
        }
        self.set_state(node, FrameState::Preview)
    }

    /// Return to the state held before minimizing, previewing or closing.
    pub fn restore(&mut self, id: &str) -> Result<(), DockError> {
        let node = self.frame_node(id)?;
        let target = self.tree.frame_mut(node)?.restore_state;
        match target {
            FrameState::Docked => self.dock(id),
            other => self.set_state(node, other),
        }
    }

    pub fn float(&mut self, id: &str, bounds: Rect) -> Result<(), DockError> {
        let node = self.frame_node(id)?;
        self.set_state(node, FrameState::Floating)?;
        self.tree.frame_mut(node)?.floating_bounds = Some(bounds);
        Ok(())
    }

    pub fn close(&mut self, id: &str) -> Result<(), DockError> {
        let node = self.frame_node(id)?;
        self.set_state(node, FrameState::Closed)
    }

    /// Maximize or un-maximize a frame. At most one frame is maximized; a
    /// frame that is not docked gets docked first.
    pub fn set_maximized(&mut self, id: &str, maximized: bool) -> Result<(), DockError> {
        let node = self.frame_node(id)?;
        if !maximized {
            self.tree.frame_mut(node)?.maximized = false;
            return Ok(());
        }
        if !self.tree.frame_mut(node)?.is_docked() {
            self.dock(id)?;
        }
        let others: Vec<NodeId> = self
            .tree
            .frames()
            .filter(|(_, _, frame)| frame.maximized)
            .map(|(other, _, _)| other)
            .collect();
        for other in others {
            self.tree.frame_mut(other)?.maximized = false;
        }
        self.tree.frame_mut(node)?.maximized = true;
        Ok(())
    }

    pub(crate) fn refresh_positions(&mut self) -> Result<(), DockError> {
        let attached: Vec<NodeId> = self
            .tree
            .frames()
            .map(|(node, _, _)| node)
            .filter(|node| self.tree.is_attached(*node))
            .collect();
        for node in attached {
            let position = self.tree.frame_position(node)?;
            self.tree.frame_mut(node)?.position = position;
        }
        Ok(())
    }

    /// Run the layout pass and keep its result.
    pub fn layout_container(&mut self, geometry: &PaneGeometry) -> Result<&DockLayout, DockError> {
        self.layout = layout::compute(&mut self.tree, &self.config, geometry)?;
        Ok(&self.layout)
    }

    /// Resize gripper under `point`, unless a preview strip covers it.
    #[must_use]
    pub fn get_resize_data(&self, point: Point) -> Option<ResizeData> {
        let covered = self
            .layout
            .preview
            .as_deref()
            .and_then(|id| self.layout.bounds_of(id))
            .is_some_and(|bounds| bounds.contains(point));
        if covered {
            return None;
        }
        self.layout.resize_area_at(point).copied()
    }

    /// Move a gripper by `delta` pixels from its last laid-out position.
    pub fn apply_resize(&mut self, data: &ResizeData, delta: i32) -> Result<i32, DockError> {
        let origin = ResizeOrigin::capture(&self.tree, data)?;
        self.resize_from(data, &origin, delta)
    }

    pub(crate) fn resize_from(
        &mut self,
        data: &ResizeData,
        origin: &ResizeOrigin,
        delta: i32,
    ) -> Result<i32, DockError> {
        resize::resize(
            &mut self.tree,
            data,
            origin,
            delta,
            self.config.min_element_size,
        )
    }

    /// Undo a gripper drag: saved sizes go back to their press-time values.
    pub(crate) fn cancel_resize(&mut self, origin: &ResizeOrigin) -> Result<(), DockError> {
        resize::restore(&mut self.tree, origin)
    }

    /// Encoded drag payload for dragging frame `id`.
    pub fn create_drag_payload(&self, id: &str) -> Result<String, DockError> {
        self.frame_node(id)?;
        let payload = DragPayload::new(PayloadKind::DockableFrame, id, id, self.instance);
        Ok(payload.encode()?)
    }

    /// Where the dragged frame would land if released at `point`.
    pub fn drop_data(&self, payload: &str, point: Point) -> Result<Option<DropData>, DockError> {
        let payload = DragPayload::decode(payload, PayloadKind::DockableFrame)?;
        if !payload.accepted_by(self.instance) {
            return Ok(None);
        }
        let dragged = self.frame_node(&payload.dragged_id)?;
        let dragged_size = self.tree.node(dragged)?.size;
        let drop_side = self.config.drop_side;

        let root = self.tree.root();
        if let Some(data) =
            create_drop_data(root, self.layout.outer, point, drop_side, dragged, dragged_size)
        {
            return Ok(Some(data));
        }

        let content = self.tree.content();
        let content_bounds = self.tree.node(content)?.bounds;
        if let Some(data) = create_drop_data(
            content,
            content_bounds,
            point,
            drop_side * 2,
            dragged,
            dragged_size,
        ) {
            return Ok(Some(data));
        }

        for (node, element, frame) in self.tree.frames() {
            if node == dragged || !frame.is_docked() || !self.tree.is_attached(node) {
                continue;
            }
            if let Some(data) = create_drop_data(
                node,
                element.bounds,
                point,
                drop_side * 2,
                dragged,
                dragged_size,
            ) {
                return Ok(Some(data));
            }
        }
        Ok(None)
    }

    /// Move the dragged frame to where [`Self::drop_data`] resolves.
    ///
    /// Returns `false` when the point has no drop target.
    pub fn drop(&mut self, payload: &str, point: Point) -> Result<bool, DockError> {
        let Some(data) = self.drop_data(payload, point)? else {
            return Ok(false);
        };
        self.commit_drop(&data)?;
        Ok(true)
    }

    pub(crate) fn commit_drop(&mut self, data: &DropData) -> Result<(), DockError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "dock_drop",
            dragged = data.dragged.get(),
            target = data.target.get(),
            direction = %data.direction
        )
        .entered();

        if self.tree.is_attached(data.dragged) {
            self.tree.remove_structure_element(data.dragged)?;
        }
        // The drop target may have been the root that just collapsed.
        let target = if self.tree.get(data.target).is_some() {
            data.target
        } else {
            self.tree.root()
        };
        self.tree
            .add_structure_element(target, data.dragged, data.direction)?;
        self.set_state(data.dragged, FrameState::Docked)?;
        self.refresh_positions()?;
        #[cfg(feature = "tracing")]
        tracing::debug!(position = ?self.tree.frame_position(data.dragged).ok(), "frame dropped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::CONTENT_ID;

    fn geometry() -> PaneGeometry {
        PaneGeometry::new(Rect::from_size(800, 600))
    }

    fn model_with_frames() -> DockablePaneModel {
        let mut model = DockablePaneModel::default();
        model
            .add_frame("project", CompassDirection::West, Size::new(200, 200))
            .expect("add project");
        model
            .add_frame("console", CompassDirection::South, Size::new(200, 150))
            .expect("add console");
        model
            .add_frame("outline", CompassDirection::East, Size::new(180, 200))
            .expect("add outline");
        model.layout_container(&geometry()).expect("layout");
        model
    }

    #[test]
    fn frames_dock_around_the_content() {
        let model = model_with_frames();
        assert_eq!(model.frame_position("project"), Some(CompassDirection::West));
        assert_eq!(model.frame_position("console"), Some(CompassDirection::South));
        assert_eq!(model.frame_position("outline"), Some(CompassDirection::East));
        let layout = model.layout();
        assert_eq!(layout.bounds_of("project"), Some(Rect::new(0, 0, 200, 600)));
        assert_eq!(layout.bounds_of("console"), Some(Rect::new(200, 450, 600, 150)));
        assert_eq!(layout.bounds_of(CONTENT_ID), Some(Rect::new(200, 0, 420, 450)));
        assert_eq!(layout.bounds_of("outline"), Some(Rect::new(620, 0, 180, 450)));
        assert_eq!(layout.resize_areas.len(), 3);
        model.tree().validate().expect("valid tree");
    }

    #[test]
    fn unknown_position_name_is_rejected() {
        let mut model = DockablePaneModel::default();
        assert!(matches!(
            model.add_frame_at("x", "upwards", Size::new(10, 10)),
            Err(DockError::UnknownElementPosition { .. })
        ));
        model
            .add_frame_at("y", "left", Size::new(10, 10))
            .expect("left is west");
        assert_eq!(model.frame_position("y"), Some(CompassDirection::West));
    }

    #[test]
    fn drop_on_outer_edge_moves_frame_to_that_side() {
        let mut model = model_with_frames();
        let payload = model.create_drag_payload("console").expect("payload");

        let data = model
            .drop_data(&payload, Point::new(400, 10))
            .expect("resolves")
            .expect("north edge");
        assert_eq!(data.target, model.tree().root());
        assert_eq!(data.direction, CompassDirection::North);

        assert!(model.drop(&payload, Point::new(400, 10)).expect("drop"));
        assert_eq!(model.frame_position("console"), Some(CompassDirection::North));
        model.tree().validate().expect("valid tree");
        let layout = model.layout_container(&geometry()).expect("relayout");
        assert_eq!(layout.bounds_of("console"), Some(Rect::new(0, 0, 800, 150)));
    }

    #[test]
    fn drop_near_content_edge_targets_content() {
        let mut model = model_with_frames();
        let payload = model.create_drag_payload("outline").expect("payload");
        let data = model
            .drop_data(&payload, Point::new(250, 200))
            .expect("resolves")
            .expect("content west band");
        assert_eq!(data.target, model.tree().content());
        assert_eq!(data.direction, CompassDirection::West);
        assert!(model.drop(&payload, Point::new(250, 200)).expect("drop"));
        assert_eq!(model.frame_position("outline"), Some(CompassDirection::West));
        model.tree().validate().expect("valid tree");
    }

    #[test]
    fn drop_in_content_center_is_not_a_target() {
        let mut model = model_with_frames();
        let payload = model.create_drag_payload("project").expect("payload");
        assert!(
            model
                .drop_data(&payload, Point::new(410, 225))
                .expect("resolves")
                .is_none()
        );
        assert!(!model.drop(&payload, Point::new(410, 225)).expect("drop"));
    }

    #[test]
    fn corrupted_payload_fails_the_drop() {
        let mut model = model_with_frames();
        assert!(matches!(
            model.drop("{broken", Point::new(1, 1)),
            Err(DockError::DropFailed(_))
        ));
        let foreign = DragPayload::new(PayloadKind::Document, "d", "p", model.instance())
            .encode()
            .expect("encode");
        assert!(matches!(
            model.drop_data(&foreign, Point::new(1, 1)),
            Err(DockError::DropFailed(_))
        ));
    }

    #[test]
    fn payload_from_another_pane_is_ignored() {
        let model = model_with_frames();
        let other = model_with_frames();
        let payload = other.create_drag_payload("project").expect("payload");
        assert!(
            model
                .drop_data(&payload, Point::new(400, 5))
                .expect("resolves")
                .is_none()
        );
    }

    #[test]
    fn state_transitions_keep_restore_state() {
        let mut model = model_with_frames();
        model.float("outline", Rect::new(50, 50, 300, 200)).expect("float");
        model.minimize("outline").expect("minimize");
        let frame = model.frame("outline").expect("frame");
        assert_eq!(frame.state, FrameState::Minimized);
        assert_eq!(frame.restore_state, FrameState::Floating);
        model.restore("outline").expect("restore");
        assert_eq!(model.frame("outline").expect("frame").state, FrameState::Floating);

        model.close("project").expect("close");
        model.restore("project").expect("restore");
        assert_eq!(model.frame("project").expect("frame").state, FrameState::Docked);
    }

    #[test]
    fn only_one_preview_frame_at_a_time() {
        let mut model = model_with_frames();
        model.minimize("project").expect("minimize");
        model.minimize("outline").expect("minimize");
        model.preview("project").expect("preview");
        model.preview("outline").expect("preview");
        assert_eq!(model.frame("project").expect("frame").state, FrameState::Minimized);
        assert_eq!(model.frame("outline").expect("frame").state, FrameState::Preview);
    }

    #[test]
    fn only_one_maximized_frame_at_a_time() {
        let mut model = model_with_frames();
        model.minimize("console").expect("minimize");
        model.set_maximized("project", true).expect("maximize");
        model.set_maximized("console", true).expect("maximize");
        assert!(!model.frame("project").expect("frame").maximized);
        let console = model.frame("console").expect("frame");
        assert!(console.maximized);
        assert_eq!(console.state, FrameState::Docked);
        let layout = model.layout_container(&geometry()).expect("layout");
        assert_eq!(layout.maximized.as_deref(), Some("console"));
    }

    #[test]
    fn resize_is_suppressed_under_preview_strip() {
        let mut model = model_with_frames();
        let gripper = Point::new(200, 100);
        assert!(model.get_resize_data(gripper).is_some());

        model.minimize("project").expect("minimize");
        model.preview("project").expect("preview");
        model.layout_container(&geometry()).expect("layout");
        assert!(model.get_resize_data(Point::new(30, 100)).is_none());
        assert!(model.get_resize_data(Point::new(620, 100)).is_some());
    }

    #[test]
    fn apply_resize_grows_frame() {
        let mut model = model_with_frames();
        let data = model
            .get_resize_data(Point::new(200, 100))
            .expect("gripper between project and content");
        assert_eq!(model.apply_resize(&data, 30).expect("resize"), 30);
        let layout = model.layout_container(&geometry()).expect("layout");
        assert_eq!(layout.bounds_of("project"), Some(Rect::new(0, 0, 230, 600)));
    }

    #[test]
    fn removing_a_frame_forgets_it() {
        let mut model = model_with_frames();
        let removed = model.remove_frame("console").expect("remove");
        assert_eq!(removed.id, "console");
        assert!(model.get_element("console").is_none());
        assert!(matches!(
            model.remove_frame("console"),
            Err(DockError::MissingElement { .. })
        ));
        assert!(matches!(
            model.remove_frame(CONTENT_ID),
            Err(DockError::NotAFrame { .. })
        ));
        model.tree().validate().expect("valid tree");
    }

    #[test]
    fn update_frame_creates_once() {
        let mut model = DockablePaneModel::default();
        let first = model
            .update_frame("a", CompassDirection::North, Size::new(100, 100))
            .expect("create");
        let second = model
            .update_frame("a", CompassDirection::South, Size::new(100, 100))
            .expect("update");
        assert_eq!(first, second);
        assert_eq!(model.frame_position("a"), Some(CompassDirection::North));
    }
}
