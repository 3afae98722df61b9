#![forbid(unsafe_code)]

//! Single-flight pointer drag lifecycle.
//!
//! ```text
//! Idle -> Armed -> Dragging -> Idle
//!    \------> Idle (release/cancel from Armed)
//! ```
//!
//! The host hit-tests a press and calls [`DragMachine::arm`] with what was
//! hit (`K`); every later pointer event goes through [`DragMachine::apply`],
//! which returns exactly one [`DragEffect`]. Only one gesture can be active:
//! arming while armed or dragging is a no-op.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Default pointer travel (in pixels) that must be exceeded before a press
/// turns into a drag.
pub const DEFAULT_DRAG_THRESHOLD: u16 = 5;

/// Lifecycle state. `anchor` is always the press location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DragState<K> {
    Idle,
    Armed {
        kind: K,
        anchor: Point,
    },
    Dragging {
        kind: K,
        anchor: Point,
        current: Point,
    },
}

/// Pointer input after the initial press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PointerEvent {
    Moved { position: Point },
    Released { position: Point },
    Canceled,
}

/// Why an event was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragNoopReason {
    IdleWithoutActiveDrag,
    ActiveDragAlreadyInProgress,
    ThresholdNotReached,
}

/// Effect emitted by one transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum DragEffect<K> {
    Armed {
        kind: K,
        anchor: Point,
    },
    Started {
        kind: K,
        anchor: Point,
        current: Point,
    },
    Updated {
        kind: K,
        anchor: Point,
        previous: Point,
        current: Point,
    },
    /// Released before the threshold was crossed (a click).
    Clicked {
        kind: K,
        anchor: Point,
    },
    Committed {
        kind: K,
        anchor: Point,
        end: Point,
    },
    Canceled {
        kind: K,
    },
    Noop {
        reason: DragNoopReason,
    },
}

/// Runtime lifecycle machine for one drag/resize gesture at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragMachine<K> {
    state: DragState<K>,
    threshold: u16,
}

impl<K> Default for DragMachine<K> {
    fn default() -> Self {
        Self {
            state: DragState::Idle,
            threshold: DEFAULT_DRAG_THRESHOLD,
        }
    }
}

impl<K: Clone> DragMachine<K> {
    /// Machine with an explicit drag-start threshold. A zero threshold
    /// starts the drag on the first move.
    #[must_use]
    pub fn new(threshold: u16) -> Self {
        Self {
            state: DragState::Idle,
            threshold,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &DragState<K> {
        &self.state
    }

    #[must_use]
    pub const fn threshold(&self) -> u16 {
        self.threshold
    }

    /// Whether the machine is Armed or Dragging.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self.state, DragState::Idle)
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// What the active gesture is about, if any.
    #[must_use]
    pub fn kind(&self) -> Option<&K> {
        match &self.state {
            DragState::Idle => None,
            DragState::Armed { kind, .. } | DragState::Dragging { kind, .. } => Some(kind),
        }
    }

    /// Begin a gesture at `anchor`.
    pub fn arm(&mut self, kind: K, anchor: Point) -> DragEffect<K> {
        if self.is_active() {
            return DragEffect::Noop {
                reason: DragNoopReason::ActiveDragAlreadyInProgress,
            };
        }
        self.state = DragState::Armed {
            kind: kind.clone(),
            anchor,
        };
        DragEffect::Armed { kind, anchor }
    }

    /// Arm and immediately enter the dragging state (resize grippers react
    /// without a threshold).
    pub fn start_immediately(&mut self, kind: K, anchor: Point) -> DragEffect<K> {
        if self.is_active() {
            return DragEffect::Noop {
                reason: DragNoopReason::ActiveDragAlreadyInProgress,
            };
        }
        self.state = DragState::Dragging {
            kind: kind.clone(),
            anchor,
            current: anchor,
        };
        DragEffect::Started {
            kind,
            anchor,
            current: anchor,
        }
    }

    /// Apply one pointer event.
    pub fn apply(&mut self, event: PointerEvent) -> DragEffect<K> {
        let state = std::mem::replace(&mut self.state, DragState::Idle);
        let (next, effect) = match (state, event) {
            (DragState::Idle, _) => (
                DragState::Idle,
                DragEffect::Noop {
                    reason: DragNoopReason::IdleWithoutActiveDrag,
                },
            ),
            (DragState::Armed { kind, anchor }, PointerEvent::Moved { position }) => {
                if crossed_threshold(anchor, position, self.threshold) {
                    (
                        DragState::Dragging {
                            kind: kind.clone(),
                            anchor,
                            current: position,
                        },
                        DragEffect::Started {
                            kind,
                            anchor,
                            current: position,
                        },
                    )
                } else {
                    (
                        DragState::Armed { kind, anchor },
                        DragEffect::Noop {
                            reason: DragNoopReason::ThresholdNotReached,
                        },
                    )
                }
            }
            (DragState::Armed { kind, anchor }, PointerEvent::Released { .. }) => {
                (DragState::Idle, DragEffect::Clicked { kind, anchor })
            }
            (DragState::Armed { kind, .. } | DragState::Dragging { kind, .. }, PointerEvent::Canceled) => {
                (DragState::Idle, DragEffect::Canceled { kind })
            }
            (
                DragState::Dragging {
                    kind,
                    anchor,
                    current,
                },
                PointerEvent::Moved { position },
            ) => (
                DragState::Dragging {
                    kind: kind.clone(),
                    anchor,
                    current: position,
                },
                DragEffect::Updated {
                    kind,
                    anchor,
                    previous: current,
                    current: position,
                },
            ),
            (DragState::Dragging { kind, anchor, .. }, PointerEvent::Released { position }) => (
                DragState::Idle,
                DragEffect::Committed {
                    kind,
                    anchor,
                    end: position,
                },
            ),
        };
        self.state = next;
        #[cfg(feature = "tracing")]
        tracing::trace!(active = self.is_active(), "drag machine transition");
        effect
    }

    /// Unconditionally return to Idle. Returns the canceled kind when a
    /// gesture was active.
    pub fn force_cancel(&mut self) -> Option<K> {
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Idle => None,
            DragState::Armed { kind, .. } | DragState::Dragging { kind, .. } => Some(kind),
        }
    }
}

fn crossed_threshold(anchor: Point, current: Point, threshold: u16) -> bool {
    let (dx, dy) = current.delta_from(anchor);
    let threshold = i64::from(threshold);
    let squared_distance = i64::from(dx) * i64::from(dx) + i64::from(dy) * i64::from(dy);
    squared_distance > threshold * threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn moved(x: i32, y: i32) -> PointerEvent {
        PointerEvent::Moved {
            position: Point::new(x, y),
        }
    }

    #[test]
    fn press_move_release_commits() {
        let mut machine = DragMachine::new(5);
        machine.arm("tab", Point::new(10, 10));
        assert_eq!(
            machine.apply(moved(13, 10)),
            DragEffect::Noop {
                reason: DragNoopReason::ThresholdNotReached
            }
        );
        assert!(matches!(
            machine.apply(moved(20, 10)),
            DragEffect::Started { kind: "tab", .. }
        ));
        assert!(matches!(
            machine.apply(moved(25, 12)),
            DragEffect::Updated {
                previous: Point { x: 20, y: 10 },
                ..
            }
        ));
        assert_eq!(
            machine.apply(PointerEvent::Released {
                position: Point::new(30, 12)
            }),
            DragEffect::Committed {
                kind: "tab",
                anchor: Point::new(10, 10),
                end: Point::new(30, 12),
            }
        );
        assert!(!machine.is_active());
    }

    #[test]
    fn threshold_must_be_exceeded() {
        let mut machine = DragMachine::new(5);
        machine.arm(1_u8, Point::new(0, 0));
        assert!(matches!(machine.apply(moved(5, 0)), DragEffect::Noop { .. }));
        assert!(matches!(machine.apply(moved(6, 0)), DragEffect::Started { .. }));
    }

    #[test]
    fn release_before_threshold_is_click() {
        let mut machine = DragMachine::new(5);
        machine.arm(7_u32, Point::new(1, 1));
        assert_eq!(
            machine.apply(PointerEvent::Released {
                position: Point::new(2, 2)
            }),
            DragEffect::Clicked {
                kind: 7,
                anchor: Point::new(1, 1)
            }
        );
    }

    #[test]
    fn second_arm_is_rejected_while_active() {
        let mut machine = DragMachine::new(5);
        machine.arm('a', Point::new(0, 0));
        assert_eq!(
            machine.arm('b', Point::new(0, 0)),
            DragEffect::Noop {
                reason: DragNoopReason::ActiveDragAlreadyInProgress
            }
        );
        assert_eq!(machine.kind(), Some(&'a'));
    }

    #[test]
    fn cancel_and_force_cancel_return_to_idle() {
        let mut machine = DragMachine::new(0);
        machine.start_immediately("grip", Point::new(3, 3));
        assert_eq!(
            machine.apply(PointerEvent::Canceled),
            DragEffect::Canceled { kind: "grip" }
        );
        assert!(machine.force_cancel().is_none());
        machine.arm("grip", Point::new(0, 0));
        assert_eq!(machine.force_cancel(), Some("grip"));
        assert_eq!(machine.state(), &DragState::Idle);
    }

    #[test]
    fn idle_events_are_noops() {
        let mut machine: DragMachine<()> = DragMachine::default();
        assert_eq!(
            machine.apply(moved(1, 1)),
            DragEffect::Noop {
                reason: DragNoopReason::IdleWithoutActiveDrag
            }
        );
    }

    fn event_strategy() -> impl Strategy<Value = PointerEvent> {
        prop_oneof![
            (-50_i32..50, -50_i32..50).prop_map(|(x, y)| moved(x, y)),
            (-50_i32..50, -50_i32..50).prop_map(|(x, y)| PointerEvent::Released {
                position: Point::new(x, y)
            }),
            Just(PointerEvent::Canceled),
        ]
    }

    proptest! {
        #[test]
        fn terminal_effects_always_return_to_idle(events in proptest::collection::vec(event_strategy(), 0..24)) {
            let mut machine = DragMachine::new(DEFAULT_DRAG_THRESHOLD);
            machine.arm(0_u8, Point::new(0, 0));
            for event in events {
                let effect = machine.apply(event);
                match effect {
                    DragEffect::Clicked { .. }
                    | DragEffect::Committed { .. }
                    | DragEffect::Canceled { .. } => prop_assert!(!machine.is_active()),
                    DragEffect::Started { .. } | DragEffect::Updated { .. } => {
                        prop_assert!(machine.is_dragging());
                    }
                    DragEffect::Armed { .. } | DragEffect::Noop { .. } => {}
                }
            }
        }
    }
}
