#![forbid(unsafe_code)]

//! Moving a resize gripper between two adjacent elements.

use panekit_core::Size;

use crate::element::NodeId;
use crate::error::DockError;
use crate::layout::ResizeData;
use crate::tree::DockTree;

/// Both sides of a gripper at the moment it was grabbed: their laid-out
/// extents, plus the saved size of every sibling so a cancel can put them
/// back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeOrigin {
    pub leading: i32,
    pub trailing: i32,
    pub saved: Vec<(NodeId, Size)>,
}

impl ResizeOrigin {
    pub fn capture(tree: &DockTree, data: &ResizeData) -> Result<Self, DockError> {
        let extent = |node: NodeId| {
            tree.get(node)
                .map(|element| element.bounds.extent(data.orientation))
                .ok_or(DockError::MissingNode { node })
        };
        let saved = match tree.node(data.leading)?.parent {
            Some(parent) => tree
                .node(parent)?
                .children()
                .iter()
                .map(|child| tree.node(*child).map(|element| (*child, element.size)))
                .collect::<Result<_, _>>()?,
            None => Vec::new(),
        };
        Ok(Self {
            leading: extent(data.leading)?,
            trailing: extent(data.trailing)?,
            saved,
        })
    }
}

/// Put back the saved sizes recorded in `origin`.
pub(crate) fn restore(tree: &mut DockTree, origin: &ResizeOrigin) -> Result<(), DockError> {
    for (node, size) in &origin.saved {
        tree.node_mut(*node)?.size = *size;
    }
    #[cfg(feature = "tracing")]
    tracing::trace!(elements = origin.saved.len(), "resize canceled");
    Ok(())
}

/// Move the gripper by `delta` pixels from `origin`, clamped so neither
/// side drops below `min`. Returns the delta actually applied.
///
/// Every visible sibling's saved size is pinned to its current extent first
/// so the next layout reproduces the dragged boundary exactly.
pub(crate) fn resize(
    tree: &mut DockTree,
    data: &ResizeData,
    origin: &ResizeOrigin,
    delta: i32,
    min: i32,
) -> Result<i32, DockError> {
    let parent = tree.node(data.leading)?.parent;
    if parent.is_none() || parent != tree.node(data.trailing)?.parent {
        return Err(DockError::NotAttached {
            id: tree.node(data.trailing)?.id.clone(),
        });
    }
    let min = min.max(0);
    let lowest = (min - origin.leading).min(0);
    let highest = (origin.trailing - min).max(0);
    let delta = delta.clamp(lowest, highest);

    let orientation = data.orientation;
    let siblings = parent
        .map(|parent| tree.node(parent).map(|element| element.children().to_vec()))
        .transpose()?
        .unwrap_or_default();
    for sibling in siblings {
        let element = tree.node_mut(sibling)?;
        if !element.bounds.is_empty() {
            element.size = element
                .size
                .with_along(orientation, element.bounds.extent(orientation));
        }
    }

    let leading = tree.node_mut(data.leading)?;
    leading.size = leading.size.with_along(orientation, origin.leading + delta);
    let trailing = tree.node_mut(data.trailing)?;
    trailing.size = trailing
        .size
        .with_along(orientation, origin.trailing - delta);

    #[cfg(feature = "tracing")]
    tracing::trace!(delta, "resize gripper moved");
    Ok(delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DockablePaneConfig;
    use crate::element::FrameElement;
    use crate::layout::{PaneGeometry, compute};
    use panekit_core::{CompassDirection, Rect, Size};

    fn two_frames() -> (DockTree, NodeId, NodeId) {
        let mut tree = DockTree::new();
        let content = tree.content();
        let left = tree
            .create_frame("left", Size::new(200, 0), FrameElement::new(0, CompassDirection::West))
            .expect("fresh");
        let right = tree
            .create_frame("right", Size::new(100, 0), FrameElement::new(1, CompassDirection::East))
            .expect("fresh");
        tree.add_structure_element(content, left, CompassDirection::West)
            .expect("insert left");
        tree.add_structure_element(content, right, CompassDirection::East)
            .expect("insert right");
        (tree, left, right)
    }

    #[test]
    fn dragging_the_gripper_moves_pixels_between_neighbours() {
        let (mut tree, left, _) = two_frames();
        let config = DockablePaneConfig::default();
        let geometry = PaneGeometry::new(Rect::from_size(800, 400));
        let layout = compute(&mut tree, &config, &geometry).expect("layout");
        let data = layout.resize_areas[0];
        assert_eq!(data.leading, left);

        let origin = ResizeOrigin::capture(&tree, &data).expect("capture");
        assert_eq!((origin.leading, origin.trailing), (200, 500));
        let applied = resize(&mut tree, &data, &origin, 40, config.min_element_size)
            .expect("resize");
        assert_eq!(applied, 40);

        let layout = compute(&mut tree, &config, &geometry).expect("relayout");
        assert_eq!(layout.bounds_of("left"), Some(Rect::new(0, 0, 240, 400)));
        assert_eq!(layout.bounds_of("content"), Some(Rect::new(240, 0, 460, 400)));
    }

    #[test]
    fn delta_is_clamped_to_minimum_size() {
        let (mut tree, _, _) = two_frames();
        let config = DockablePaneConfig::default();
        let geometry = PaneGeometry::new(Rect::from_size(800, 400));
        let layout = compute(&mut tree, &config, &geometry).expect("layout");
        let data = layout.resize_areas[0];
        let origin = ResizeOrigin::capture(&tree, &data).expect("capture");

        let applied = resize(&mut tree, &data, &origin, -500, 64).expect("resize");
        assert_eq!(applied, -136);
        let applied = resize(&mut tree, &data, &origin, 900, 64).expect("resize");
        assert_eq!(applied, 436);
    }
}
