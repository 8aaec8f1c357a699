//! Axis-aligned geometry and grid snapping.

use serde::{Deserialize, Serialize};

/// Smallest width or height an element can be resized to with snapping off.
pub const MIN_SIZE: f32 = 1.0;

/// Tolerance used when comparing derived coordinates.
pub const GEOMETRY_EPSILON: f32 = 1e-3;

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// Create a rectangle from origin and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from its min and max corners.
    #[must_use]
    pub fn from_corners(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// Right edge.
    #[must_use]
    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    /// Horizontal center.
    #[must_use]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Vertical center.
    #[must_use]
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// The same rectangle shifted by `(dx, dy)`.
    #[must_use]
    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Smallest rectangle containing both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self::from_corners(
            self.x.min(other.x),
            self.y.min(other.y),
            self.max_x().max(other.max_x()),
            self.max_y().max(other.max_y()),
        )
    }

    /// Whether the point lies inside or on the edge.
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.max_x() && y >= self.y && y <= self.max_y()
    }

    /// Component-wise comparison within [`GEOMETRY_EPSILON`].
    #[must_use]
    pub fn approx_eq(&self, other: &Self) -> bool {
        approx_eq(self.x, other.x)
            && approx_eq(self.y, other.y)
            && approx_eq(self.width, other.width)
            && approx_eq(self.height, other.height)
    }
}

/// Union of all rectangles, or `None` for an empty iterator.
pub fn union_all(rects: impl IntoIterator<Item = Rect>) -> Option<Rect> {
    rects.into_iter().reduce(|acc, rect| acc.union(&rect))
}

/// Compare two coordinates within [`GEOMETRY_EPSILON`].
#[must_use]
pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() <= GEOMETRY_EPSILON
}

/// Round `value` to the nearest multiple of `grid_size` when enabled.
#[must_use]
pub fn snap(value: f32, grid_size: f32, enabled: bool) -> f32 {
    if !enabled || grid_size <= 0.0 {
        return value;
    }
    (value / grid_size).round() * grid_size
}

/// Snap a width or height, never going below one grid unit.
#[must_use]
pub fn snap_size(value: f32, grid_size: f32, enabled: bool) -> f32 {
    let snapped = snap(value, grid_size, enabled);
    let floor = if enabled && grid_size > 0.0 {
        grid_size
    } else {
        MIN_SIZE
    };
    snapped.max(floor)
}

/// Edge or center to line elements up against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    /// Left edges.
    Left,
    /// Horizontal centers.
    Center,
    /// Right edges.
    Right,
    /// Top edges.
    Top,
    /// Vertical centers.
    Middle,
    /// Bottom edges.
    Bottom,
}

impl Alignment {
    /// Offset that moves `rect` into alignment with `target`.
    #[must_use]
    pub fn offset(self, rect: &Rect, target: &Rect) -> (f32, f32) {
        match self {
            Self::Left => (target.x - rect.x, 0.0),
            Self::Center => (target.center_x() - rect.center_x(), 0.0),
            Self::Right => (target.max_x() - rect.max_x(), 0.0),
            Self::Top => (0.0, target.y - rect.y),
            Self::Middle => (0.0, target.center_y() - rect.center_y()),
            Self::Bottom => (0.0, target.max_y() - rect.max_y()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_rounds_to_nearest_multiple() {
        assert!((snap(5.0, 8.0, true) - 8.0).abs() < f32::EPSILON);
        assert!((snap(3.0, 8.0, true) - 0.0).abs() < f32::EPSILON);
        assert!((snap(-5.0, 8.0, true) + 8.0).abs() < f32::EPSILON);
        assert!((snap(13.0, 10.0, true) - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_snap_disabled_or_degenerate_grid() {
        assert!((snap(5.3, 8.0, false) - 5.3).abs() < f32::EPSILON);
        assert!((snap(5.3, 0.0, true) - 5.3).abs() < f32::EPSILON);
    }

    #[test]
    fn test_snap_size_floor() {
        assert!((snap_size(3.0, 8.0, true) - 8.0).abs() < f32::EPSILON);
        assert!((snap_size(0.2, 8.0, false) - MIN_SIZE).abs() < f32::EPSILON);
        assert!((snap_size(21.0, 8.0, true) - 24.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_union_all() {
        let rects = [
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(100.0, 0.0, 10.0, 10.0),
            Rect::new(20.0, -5.0, 1.0, 1.0),
        ];
        let union = union_all(rects).expect("non-empty");
        assert_eq!(union, Rect::new(0.0, -5.0, 110.0, 15.0));
        assert!(union_all(std::iter::empty()).is_none());
    }

    #[test]
    fn test_alignment_offsets() {
        let target = Rect::new(0.0, 0.0, 100.0, 50.0);
        let rect = Rect::new(40.0, 10.0, 20.0, 10.0);
        assert_eq!(Alignment::Left.offset(&rect, &target), (-40.0, 0.0));
        assert_eq!(Alignment::Center.offset(&rect, &target), (0.0, 0.0));
        assert_eq!(Alignment::Right.offset(&rect, &target), (40.0, 0.0));
        assert_eq!(Alignment::Bottom.offset(&rect, &target), (0.0, 30.0));
    }
}
