#![forbid(unsafe_code)]

//! Glass-layer pointer handling for one dockable pane.
//!
//! A press either grabs a resize gripper (dragging starts immediately) or
//! arms a frame drag from a title area the host hit-tested (dragging starts
//! past the threshold). All later pointer events run through one
//! [`DragMachine`], so only one resize or drag is ever in flight.

use panekit_core::{DragEffect, DragMachine, Point, PointerEvent};

use crate::drop::DropData;
use crate::error::DockError;
use crate::layout::ResizeData;
use crate::model::DockablePaneModel;
use crate::resize::ResizeOrigin;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DockGesture {
    Resize {
        data: ResizeData,
        origin: ResizeOrigin,
    },
    /// Frame drag carrying the encoded payload.
    Frame { frame: String, payload: String },
}

/// What the host should do after one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionEffect {
    None,
    ResizeStarted(ResizeData),
    /// Saved sizes changed; lay out again.
    Resized { applied: i32 },
    FrameArmed { frame: String },
    /// Drop preview for the current pointer location.
    DropPreview(Option<DropData>),
    Dropped { placed: bool },
    /// Frame title pressed and released without dragging.
    FrameClicked { frame: String },
    Canceled,
}

#[derive(Debug, Clone)]
pub struct DockInteraction {
    machine: DragMachine<DockGesture>,
}

impl DockInteraction {
    #[must_use]
    pub fn new(threshold: u16) -> Self {
        Self {
            machine: DragMachine::new(threshold),
        }
    }

    #[must_use]
    pub fn for_model(model: &DockablePaneModel) -> Self {
        Self::new(model.config().drag_threshold)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.machine.is_active()
    }

    #[must_use]
    pub fn gesture(&self) -> Option<&DockGesture> {
        self.machine.kind()
    }

    /// Pointer pressed at `point`; `frame_title` names the frame whose title
    /// area the host found under the pointer.
    pub fn press(
        &mut self,
        model: &DockablePaneModel,
        point: Point,
        frame_title: Option<&str>,
    ) -> Result<InteractionEffect, DockError> {
        if self.machine.is_active() {
            return Ok(InteractionEffect::None);
        }
        if let Some(data) = model.get_resize_data(point) {
            let origin = ResizeOrigin::capture(model.tree(), &data)?;
            self.machine
                .start_immediately(DockGesture::Resize { data, origin }, point);
            return Ok(InteractionEffect::ResizeStarted(data));
        }
        if let Some(frame) = frame_title {
            let payload = model.create_drag_payload(frame)?;
            self.machine.arm(
                DockGesture::Frame {
                    frame: frame.to_string(),
                    payload,
                },
                point,
            );
            return Ok(InteractionEffect::FrameArmed {
                frame: frame.to_string(),
            });
        }
        Ok(InteractionEffect::None)
    }

    /// Feed one pointer event after the press.
    pub fn pointer(
        &mut self,
        model: &mut DockablePaneModel,
        event: PointerEvent,
    ) -> Result<InteractionEffect, DockError> {
        match self.machine.apply(event) {
            DragEffect::Started {
                kind,
                anchor,
                current,
            }
            | DragEffect::Updated {
                kind,
                anchor,
                current,
                ..
            } => match kind {
                DockGesture::Resize { data, origin } => {
                    let applied = model.resize_from(&data, &origin, along(&data, anchor, current))?;
                    Ok(InteractionEffect::Resized { applied })
                }
                DockGesture::Frame { payload, .. } => Ok(InteractionEffect::DropPreview(
                    model.drop_data(&payload, current)?,
                )),
            },
            DragEffect::Committed { kind, anchor, end } => match kind {
                DockGesture::Resize { data, origin } => {
                    let applied = model.resize_from(&data, &origin, along(&data, anchor, end))?;
                    Ok(InteractionEffect::Resized { applied })
                }
                DockGesture::Frame { payload, .. } => Ok(InteractionEffect::Dropped {
                    placed: model.drop(&payload, end)?,
                }),
            },
            DragEffect::Clicked { kind, .. } => match kind {
                DockGesture::Frame { frame, .. } => Ok(InteractionEffect::FrameClicked { frame }),
                DockGesture::Resize { .. } => Ok(InteractionEffect::None),
            },
            DragEffect::Canceled { kind } => {
                // Drops only mutate on release, so only a resize has anything to undo.
                if let DockGesture::Resize { origin, .. } = kind {
                    model.cancel_resize(&origin)?;
                }
                Ok(InteractionEffect::Canceled)
            }
            DragEffect::Armed { .. } | DragEffect::Noop { .. } => Ok(InteractionEffect::None),
        }
    }

    /// Abort whatever is in flight without touching the model.
    pub fn reset(&mut self) {
        self.machine.force_cancel();
    }
}

fn along(data: &ResizeData, anchor: Point, current: Point) -> i32 {
    let (dx, dy) = current.delta_from(anchor);
    if data.orientation.is_horizontal() { dx } else { dy }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::PaneGeometry;
    use panekit_core::{CompassDirection, Rect, Size};

    fn model() -> DockablePaneModel {
        let mut model = DockablePaneModel::default();
        model
            .add_frame("tree", CompassDirection::West, Size::new(200, 100))
            .expect("add tree");
        model
            .add_frame("log", CompassDirection::South, Size::new(100, 120))
            .expect("add log");
        model
            .layout_container(&PaneGeometry::new(Rect::from_size(800, 600)))
            .expect("layout");
        model
    }

    #[test]
    fn gripper_drag_resizes_from_press_origin() {
        let mut model = model();
        let mut interaction = DockInteraction::for_model(&model);
        let effect = interaction
            .press(&model, Point::new(200, 300), None)
            .expect("press");
        assert!(matches!(effect, InteractionEffect::ResizeStarted(_)));

        let moved = interaction
            .pointer(&mut model, PointerEvent::Moved { position: Point::new(230, 310) })
            .expect("move");
        assert_eq!(moved, InteractionEffect::Resized { applied: 30 });
        let moved = interaction
            .pointer(&mut model, PointerEvent::Moved { position: Point::new(250, 310) })
            .expect("move");
        assert_eq!(moved, InteractionEffect::Resized { applied: 50 });
        interaction
            .pointer(&mut model, PointerEvent::Released { position: Point::new(250, 310) })
            .expect("release");
        assert!(!interaction.is_active());
        assert_eq!(model.get_element("tree").expect("tree").size.width, 250);
    }

    #[test]
    fn canceled_resize_restores_sizes() {
        let mut model = model();
        let mut interaction = DockInteraction::for_model(&model);
        interaction
            .press(&model, Point::new(200, 300), None)
            .expect("press");
        interaction
            .pointer(&mut model, PointerEvent::Moved { position: Point::new(260, 300) })
            .expect("move");
        assert_eq!(
            interaction
                .pointer(&mut model, PointerEvent::Canceled)
                .expect("cancel"),
            InteractionEffect::Canceled
        );
        assert_eq!(model.get_element("tree").expect("tree").size.width, 200);
    }

    #[test]
    fn canceled_resize_keeps_oversized_saved_sizes() {
        let mut model = DockablePaneModel::default();
        model
            .add_frame("tree", CompassDirection::West, Size::new(900, 100))
            .expect("add tree");
        model
            .add_frame("outline", CompassDirection::East, Size::new(900, 100))
            .expect("add outline");
        let gripper = model
            .layout_container(&PaneGeometry::new(Rect::from_size(800, 600)))
            .expect("layout")
            .resize_areas[0];
        let press = Point::new(gripper.bounds.x + 1, gripper.bounds.y + 1);

        let mut interaction = DockInteraction::for_model(&model);
        let effect = interaction.press(&model, press, None).expect("press");
        assert!(matches!(effect, InteractionEffect::ResizeStarted(_)));
        interaction
            .pointer(
                &mut model,
                PointerEvent::Moved { position: Point::new(press.x + 30, press.y) },
            )
            .expect("move");
        interaction
            .pointer(&mut model, PointerEvent::Canceled)
            .expect("cancel");

        assert_eq!(model.get_element("tree").expect("tree").size.width, 900);
        assert_eq!(model.get_element("outline").expect("outline").size.width, 900);
    }

    #[test]
    fn frame_drag_previews_then_drops() {
        let mut model = model();
        let mut interaction = DockInteraction::for_model(&model);
        let effect = interaction
            .press(&model, Point::new(300, 500), Some("log"))
            .expect("press");
        assert_eq!(effect, InteractionEffect::FrameArmed { frame: "log".into() });
        assert_eq!(
            interaction
                .press(&model, Point::new(0, 0), Some("tree"))
                .expect("second press"),
            InteractionEffect::None
        );

        let preview = interaction
            .pointer(&mut model, PointerEvent::Moved { position: Point::new(780, 300) })
            .expect("move");
        match preview {
            InteractionEffect::DropPreview(Some(data)) => {
                assert_eq!(data.direction, CompassDirection::East);
            }
            other => panic!("unexpected effect {other:?}"),
        }
        let dropped = interaction
            .pointer(&mut model, PointerEvent::Released { position: Point::new(780, 300) })
            .expect("release");
        assert_eq!(dropped, InteractionEffect::Dropped { placed: true });
        assert_eq!(model.frame_position("log"), Some(CompassDirection::East));
    }

    #[test]
    fn short_press_on_title_is_a_click() {
        let mut model = model();
        let mut interaction = DockInteraction::for_model(&model);
        interaction
            .press(&model, Point::new(300, 500), Some("log"))
            .expect("press");
        let effect = interaction
            .pointer(&mut model, PointerEvent::Released { position: Point::new(302, 501) })
            .expect("release");
        assert_eq!(effect, InteractionEffect::FrameClicked { frame: "log".into() });
        assert_eq!(model.frame_position("log"), Some(CompassDirection::South));
    }
}
