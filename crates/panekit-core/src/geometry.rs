#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All values are host pixels. Coordinates are signed because floating
//! bounds and pointer locations may lie left of or above the pane origin.

use serde::{Deserialize, Serialize};

/// A pointer or component location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - other`.
    #[inline]
    pub const fn delta_from(self, other: Point) -> (i32, i32) {
        (self.x - other.x, self.y - other.y)
    }
}

/// A width/height pair (the host's preferred or saved dimension).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Extent along the given orientation: width for horizontal, height for vertical.
    #[inline]
    pub const fn along(self, orientation: crate::Orientation) -> i32 {
        match orientation {
            crate::Orientation::Horizontal => self.width,
            crate::Orientation::Vertical => self.height,
        }
    }

    /// Return a copy with the extent along `orientation` replaced.
    #[inline]
    pub const fn with_along(self, orientation: crate::Orientation, value: i32) -> Self {
        match orientation {
            crate::Orientation::Horizontal => Self::new(value, self.height),
            crate::Orientation::Vertical => Self::new(self.width, value),
        }
    }
}

/// A rectangle for layout bounds, drop highlights and hit testing.
///
/// Origin is top-left; `right()`/`bottom()` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// The zero rectangle used for hidden elements.
    pub const EMPTY: Rect = Rect::new(0, 0, 0, 0);

    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Check if the rectangle has no area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Extent along the given orientation.
    #[inline]
    pub const fn extent(&self, orientation: crate::Orientation) -> i32 {
        self.size().along(orientation)
    }

    /// Compute the intersection with another rectangle.
    ///
    /// Returns an empty rectangle if the rectangles don't overlap.
    #[inline]
    pub fn intersection(&self, other: &Rect) -> Rect {
        self.intersection_opt(other).unwrap_or_default()
    }

    /// Compute the intersection with another rectangle, returning `None` if no overlap.
    #[inline]
    pub fn intersection_opt(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Create a new rectangle inside the current one with the given insets.
    ///
    /// Width and height never go negative.
    pub fn inner(&self, insets: Insets) -> Rect {
        Rect {
            x: self.x.saturating_add(insets.left),
            y: self.y.saturating_add(insets.top),
            width: (self.width - insets.horizontal_sum()).max(0),
            height: (self.height - insets.vertical_sum()).max(0),
        }
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }
}

/// Insets (component border / margin), in host pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Insets {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl Insets {
    /// Create new insets with equal values.
    pub const fn all(val: i32) -> Self {
        Self {
            top: val,
            right: val,
            bottom: val,
            left: val,
        }
    }

    /// Create new insets with specific values.
    pub const fn new(top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Sum of left and right.
    #[inline]
    pub const fn horizontal_sum(&self) -> i32 {
        self.left.saturating_add(self.right)
    }

    /// Sum of top and bottom.
    #[inline]
    pub const fn vertical_sum(&self) -> i32 {
        self.top.saturating_add(self.bottom)
    }
}

impl From<i32> for Insets {
    fn from(val: i32) -> Self {
        Self::all(val)
    }
}

#[cfg(test)]
mod tests {
    use super::{Insets, Point, Rect, Size};
    use crate::Orientation;

    #[test]
    fn rect_contains_edges() {
        let rect = Rect::new(2, 3, 4, 5);
        assert!(rect.contains(Point::new(2, 3)));
        assert!(rect.contains(Point::new(5, 7)));
        assert!(!rect.contains(Point::new(6, 3)));
        assert!(!rect.contains(Point::new(2, 8)));
        assert!(!rect.contains(Point::new(1, 3)));
    }

    #[test]
    fn rect_intersection_overlaps() {
        let a = Rect::new(0, 0, 4, 4);
        let b = Rect::new(2, 2, 4, 4);
        assert_eq!(a.intersection(&b), Rect::new(2, 2, 2, 2));
    }

    #[test]
    fn rect_intersection_disjoint_is_empty() {
        let a = Rect::new(0, 0, 2, 2);
        let b = Rect::new(5, 5, 2, 2);
        assert!(a.intersection_opt(&b).is_none());
        assert!(a.intersection(&b).is_empty());
    }

    #[test]
    fn inner_never_goes_negative() {
        let rect = Rect::new(10, 10, 6, 4);
        assert_eq!(rect.inner(Insets::all(1)), Rect::new(11, 11, 4, 2));
        assert_eq!(rect.inner(Insets::all(5)), Rect::new(15, 15, 0, 0));
    }

    #[test]
    fn union_covers_both() {
        let a = Rect::new(-5, 0, 5, 5);
        let b = Rect::new(10, 10, 2, 2);
        assert_eq!(a.union(&b), Rect::new(-5, 0, 17, 12));
    }

    #[test]
    fn size_along_orientation() {
        let size = Size::new(30, 12);
        assert_eq!(size.along(Orientation::Horizontal), 30);
        assert_eq!(size.along(Orientation::Vertical), 12);
        assert_eq!(size.with_along(Orientation::Vertical, 7), Size::new(30, 7));
    }
}
