#![forbid(unsafe_code)]

//! Drop target resolution for dragged frames.
//!
//! Resolution is pure: it reads the bounds of the last layout pass and
//! never touches the tree. Candidates are tried in priority order:
//!
//! 1. the pane's outer edges, against the root, with `drop_side` bands;
//! 2. the content edges, with `2 * drop_side` bands;
//! 3. the edges of every other docked frame, with `2 * drop_side` bands.
//!
//! The first candidate whose bands contain the pointer wins.

use panekit_core::{CompassDirection, Orientation, Point, Rect, Size};
use serde::{Deserialize, Serialize};

use crate::element::NodeId;

/// Where a dragged frame would land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropData {
    /// Element the frame is inserted next to.
    pub target: NodeId,
    pub direction: CompassDirection,
    /// Area to paint as the drop preview.
    pub highlight: Rect,
    pub dragged: NodeId,
}

/// Which edge band of `bounds` the pointer falls in.
///
/// Bands are `min(drop_side, dimension / 2)` deep. A point in two bands
/// (a corner) is settled by:
///
/// 1. west/east when the rectangle is narrower than two full bands;
/// 2. else north/south when it is shorter than two full bands;
/// 3. else whichever edge is proportionally closer, west/east on a tie.
#[must_use]
pub fn resolve_direction(bounds: Rect, point: Point, drop_side: i32) -> Option<CompassDirection> {
    if bounds.is_empty() || !bounds.contains(point) {
        return None;
    }
    let band_w = drop_side.min(bounds.width / 2);
    let band_h = drop_side.min(bounds.height / 2);

    let w = point.x < bounds.x + band_w;
    let e = point.x >= bounds.right() - band_w;
    let n = point.y < bounds.y + band_h;
    let s = point.y >= bounds.bottom() - band_h;

    let horizontal = if w {
        Some(CompassDirection::West)
    } else if e {
        Some(CompassDirection::East)
    } else {
        None
    };
    let vertical = if n {
        Some(CompassDirection::North)
    } else if s {
        Some(CompassDirection::South)
    } else {
        None
    };

    match (horizontal, vertical) {
        (None, None) => None,
        (Some(direction), None) | (None, Some(direction)) => Some(direction),
        (Some(horizontal), Some(vertical)) => {
            let w_small = bounds.width < drop_side * 2;
            let h_small = bounds.height < drop_side * 2;
            if w_small {
                Some(horizontal)
            } else if h_small {
                Some(vertical)
            } else {
                let dx = if w {
                    point.x - bounds.x
                } else {
                    bounds.right() - 1 - point.x
                };
                let dy = if n {
                    point.y - bounds.y
                } else {
                    bounds.bottom() - 1 - point.y
                };
                // dx / width against dy / height without division.
                let x_share = i64::from(dx) * i64::from(bounds.height);
                let y_share = i64::from(dy) * i64::from(bounds.width);
                if x_share <= y_share {
                    Some(horizontal)
                } else {
                    Some(vertical)
                }
            }
        }
    }
}

/// Strip along `direction`'s edge of `bounds` as thick as the dragged
/// frame's saved size, at most half of `bounds`.
#[must_use]
pub fn highlight_area(bounds: Rect, direction: CompassDirection, dragged_size: Size) -> Rect {
    let orientation = direction.orientation();
    let half = bounds.extent(orientation) / 2;
    let thickness = dragged_size.along(orientation).clamp(0, half.max(0));
    match (orientation, direction.is_leading()) {
        (Orientation::Horizontal, true) => Rect::new(bounds.x, bounds.y, thickness, bounds.height),
        (Orientation::Horizontal, false) => Rect::new(
            bounds.right() - thickness,
            bounds.y,
            thickness,
            bounds.height,
        ),
        (Orientation::Vertical, true) => Rect::new(bounds.x, bounds.y, bounds.width, thickness),
        (Orientation::Vertical, false) => Rect::new(
            bounds.x,
            bounds.bottom() - thickness,
            bounds.width,
            thickness,
        ),
    }
}

/// Drop descriptor for one candidate, if the pointer is in an edge band.
#[must_use]
pub fn create_drop_data(
    target: NodeId,
    bounds: Rect,
    point: Point,
    drop_side: i32,
    dragged: NodeId,
    dragged_size: Size,
) -> Option<DropData> {
    let direction = resolve_direction(bounds, point, drop_side)?;
    Some(DropData {
        target,
        direction,
        highlight: highlight_area(bounds, direction, dragged_size),
        dragged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: Rect = Rect::new(0, 0, 100, 100);

    #[test]
    fn dead_center_has_no_direction() {
        assert_eq!(resolve_direction(SQUARE, Point::new(50, 50), 40), None);
        assert_eq!(
            create_drop_data(
                NodeId::MIN,
                SQUARE,
                Point::new(50, 50),
                40,
                NodeId::MIN,
                Size::new(10, 10)
            ),
            None
        );
    }

    #[test]
    fn edge_bands_resolve_to_their_side() {
        let bounds = Rect::new(0, 0, 400, 300);
        assert_eq!(
            resolve_direction(bounds, Point::new(10, 150), 40),
            Some(CompassDirection::West)
        );
        assert_eq!(
            resolve_direction(bounds, Point::new(390, 150), 40),
            Some(CompassDirection::East)
        );
        assert_eq!(
            resolve_direction(bounds, Point::new(200, 5), 40),
            Some(CompassDirection::North)
        );
        assert_eq!(
            resolve_direction(bounds, Point::new(200, 280), 40),
            Some(CompassDirection::South)
        );
        assert_eq!(resolve_direction(bounds, Point::new(500, 150), 40), None);
    }

    #[test]
    fn corners_prefer_the_proportionally_closer_edge() {
        let bounds = Rect::new(0, 0, 400, 200);
        // 30/400 from the west, 10/200 from the north.
        assert_eq!(
            resolve_direction(bounds, Point::new(30, 10), 40),
            Some(CompassDirection::North)
        );
        // 5/400 from the west, 35/200 from the north.
        assert_eq!(
            resolve_direction(bounds, Point::new(5, 35), 40),
            Some(CompassDirection::West)
        );
    }

    #[test]
    fn narrow_rectangles_favor_west_east_first() {
        // Both axes too small: width-constrained axis wins.
        let tiny = Rect::new(0, 0, 60, 60);
        assert_eq!(
            resolve_direction(tiny, Point::new(5, 2), 40),
            Some(CompassDirection::West)
        );
        // Only the height is too small: north/south wins.
        let flat = Rect::new(0, 0, 400, 60);
        assert_eq!(
            resolve_direction(flat, Point::new(2, 20), 40),
            Some(CompassDirection::North)
        );
    }

    #[test]
    fn highlight_is_capped_at_half_the_target() {
        let bounds = Rect::new(10, 10, 200, 100);
        assert_eq!(
            highlight_area(bounds, CompassDirection::West, Size::new(60, 0)),
            Rect::new(10, 10, 60, 100)
        );
        assert_eq!(
            highlight_area(bounds, CompassDirection::East, Size::new(500, 0)),
            Rect::new(110, 10, 100, 100)
        );
        assert_eq!(
            highlight_area(bounds, CompassDirection::South, Size::new(0, 30)),
            Rect::new(10, 80, 200, 30)
        );
    }
}
