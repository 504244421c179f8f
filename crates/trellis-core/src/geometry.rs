//! Geometric primitives for node positioning.
//!
//! # Coordinate System
//!
//! Trellis uses a coordinate system consistent with SVG:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! - **Origin**: Top-left corner at `(0, 0)`
//! - **X-axis**: Increases rightward
//! - **Y-axis**: Increases downward
//!
//! Node positions denote the *center* of the node's measured bounding box.

use serde::{Deserialize, Serialize};

/// A 2D point in canvas coordinate space.
///
/// Points use `f32` coordinates; see the [module documentation](self) for the
/// coordinate conventions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point.
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point.
    pub fn y(self) -> f32 {
        self.y
    }

    /// Creates a new point with the specified x-coordinate.
    pub fn with_x(mut self, x: f32) -> Self {
        self.x = x;
        self
    }

    /// Creates a new point with the specified y-coordinate.
    pub fn with_y(mut self, y: f32) -> Self {
        self.y = y;
        self
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Euclidean distance between two points.
    pub fn distance(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Width and height dimensions of a node's rendered bounding box.
///
/// Measured sizes are supplied by the rendering collaborator after a node is
/// drawn; the engine never measures anything itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    /// Creates a new size with the specified dimensions.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width.
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height.
    pub fn height(self) -> f32 {
        self.height
    }

    /// Half of the width.
    pub fn half_width(self) -> f32 {
        self.width / 2.0
    }

    /// Half of the height.
    pub fn half_height(self) -> f32 {
        self.height / 2.0
    }

    /// The larger of the two dimensions.
    ///
    /// Radial packing treats nodes as discs of this diameter.
    pub fn max_extent(self) -> f32 {
        self.width.max(self.height)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_point_accessors() {
        let p = Point::new(3.0, -4.0);
        assert_approx_eq!(f32, p.x(), 3.0);
        assert_approx_eq!(f32, p.y(), -4.0);
    }

    #[test]
    fn test_point_with_coordinates() {
        let p = Point::new(1.0, 2.0).with_x(5.0).with_y(6.0);
        assert_approx_eq!(f32, p.x(), 5.0);
        assert_approx_eq!(f32, p.y(), 6.0);
    }

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_approx_eq!(f32, a.distance(b), 5.0);
    }

    #[test]
    fn test_size_extents() {
        let size = Size::new(120.0, 40.0);
        assert_approx_eq!(f32, size.half_width(), 60.0);
        assert_approx_eq!(f32, size.half_height(), 20.0);
        assert_approx_eq!(f32, size.max_extent(), 120.0);
    }
}
