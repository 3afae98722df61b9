#![forbid(unsafe_code)]

//! Persisted dock state.
//!
//! The snapshot mirrors the live structure: nested containers with their
//! orientation and saved size, frames with state, restore state and
//! floating bounds. Layout bounds and cached positions are not stored; they
//! are recomputed on restore.

use std::collections::BTreeMap;

use panekit_core::{CompassDirection, Orientation, Rect, Size};
use serde::{Deserialize, Serialize};

use crate::config::DockablePaneConfig;
use crate::element::{
    CONTENT_ID, ContainerElement, DockElement, DockElementKind, FrameElement, FrameState, NodeId,
};
use crate::error::DockError;
use crate::model::DockablePaneModel;
use crate::tree::DockTree;

/// Current schema version for dock snapshots.
pub const DOCK_SNAPSHOT_SCHEMA_VERSION: u16 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DockRecord {
    Container {
        id: String,
        orientation: Orientation,
        size: Size,
        children: Vec<DockRecord>,
    },
    Frame {
        id: String,
        size: Size,
        state: FrameState,
        restore_state: FrameState,
        #[serde(default)]
        floating_bounds: Option<Rect>,
        #[serde(default)]
        maximized: bool,
        /// Registration order; sidebars list their buttons by it.
        #[serde(default)]
        order: Option<u64>,
    },
    Content {
        size: Size,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockablePaneSnapshot {
    pub schema_version: u16,
    pub root: DockRecord,
}

impl DockablePaneSnapshot {
    pub fn to_json(&self) -> Result<String, DockError> {
        serde_json::to_string_pretty(self).map_err(|err| DockError::InvalidSnapshot {
            reason: err.to_string(),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, DockError> {
        serde_json::from_str(json).map_err(|err| DockError::InvalidSnapshot {
            reason: err.to_string(),
        })
    }
}

impl DockablePaneModel {
    /// Capture the attached structure. Frames are written in tree order.
    pub fn to_snapshot(&self) -> Result<DockablePaneSnapshot, DockError> {
        Ok(DockablePaneSnapshot {
            schema_version: DOCK_SNAPSHOT_SCHEMA_VERSION,
            root: record(self.tree(), self.tree().root())?,
        })
    }

    /// Rebuild a model from a snapshot, validating its structure.
    pub fn from_snapshot(
        config: DockablePaneConfig,
        snapshot: &DockablePaneSnapshot,
    ) -> Result<Self, DockError> {
        if snapshot.schema_version != DOCK_SNAPSHOT_SCHEMA_VERSION {
            return Err(DockError::InvalidSnapshot {
                reason: format!("unsupported schema version {}", snapshot.schema_version),
            });
        }
        if !matches!(snapshot.root, DockRecord::Container { .. }) {
            return Err(DockError::InvalidSnapshot {
                reason: "root must be a container".to_string(),
            });
        }

        let mut builder = Builder::default();
        let root = builder.build(&snapshot.root, None)?;
        let Some(content) = builder.content else {
            return Err(DockError::InvalidSnapshot {
                reason: "snapshot has no content element".to_string(),
            });
        };
        let tree = DockTree::from_parts(root, content, builder.nodes)?;
        let mut model = Self::with_tree(config, tree);
        model.refresh_positions()?;
        Ok(model)
    }
}

fn record(tree: &DockTree, node: NodeId) -> Result<DockRecord, DockError> {
    let element = tree.node(node)?;
    Ok(match &element.kind {
        DockElementKind::Container(container) => DockRecord::Container {
            id: element.id.clone(),
            orientation: container.orientation,
            size: element.size,
            children: container
                .children
                .iter()
                .map(|child| record(tree, *child))
                .collect::<Result<_, _>>()?,
        },
        DockElementKind::Frame(frame) => DockRecord::Frame {
            id: element.id.clone(),
            size: element.size,
            state: frame.state,
            restore_state: frame.restore_state,
            floating_bounds: frame.floating_bounds,
            maximized: frame.maximized,
            order: Some(frame.order),
        },
        DockElementKind::Content => DockRecord::Content { size: element.size },
    })
}

#[derive(Default)]
struct Builder {
    next: NodeId,
    next_order: u64,
    content: Option<NodeId>,
    nodes: BTreeMap<NodeId, DockElement>,
}

impl Builder {
    fn build(&mut self, record: &DockRecord, parent: Option<NodeId>) -> Result<NodeId, DockError> {
        let node = self.next;
        self.next = self.next.checked_next()?;
        let mut element = match record {
            DockRecord::Container {
                id,
                orientation,
                size,
                ..
            } => DockElement::new(
                id.clone(),
                *size,
                DockElementKind::Container(ContainerElement {
                    orientation: *orientation,
                    children: Vec::new(),
                }),
            ),
            DockRecord::Frame {
                id,
                size,
                state,
                restore_state,
                floating_bounds,
                maximized,
                order,
            } => {
                if id == CONTENT_ID {
                    return Err(DockError::DuplicateElementId { id: id.clone() });
                }
                let order = order.unwrap_or(self.next_order);
                self.next_order = self.next_order.max(order.saturating_add(1));
                let mut frame = FrameElement::new(order, CompassDirection::West);
                frame.state = *state;
                frame.restore_state = *restore_state;
                frame.floating_bounds = *floating_bounds;
                frame.maximized = *maximized;
                DockElement::new(id.clone(), *size, DockElementKind::Frame(frame))
            }
            DockRecord::Content { size } => {
                if self.content.is_some() {
                    return Err(DockError::InvalidSnapshot {
                        reason: "more than one content element".to_string(),
                    });
                }
                self.content = Some(node);
                DockElement::new(CONTENT_ID, *size, DockElementKind::Content)
            }
        };
        element.parent = parent;
        self.nodes.insert(node, element);

        if let DockRecord::Container { children, .. } = record {
            let mut ids = Vec::with_capacity(children.len());
            for child in children {
                ids.push(self.build(child, Some(node))?);
            }
            if let Some(container) = self.nodes.get_mut(&node).and_then(DockElement::container_mut) {
                container.children = ids;
            }
        }
        Ok(node)
    }
}
