use crate::error::{Error, Result};
use crate::math::vec2::Vec2;
use crate::shapes::Polygon;

/// An axis-aligned rectangle given by its corners relative to the owner's position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    min: Vec2,
    max: Vec2,
}

impl Rectangle {
    /// Creates a rectangle from its lower-left and upper-right corners.
    ///
    /// Both extents must be strictly positive; a flat rectangle has no
    /// usable edge normals.
    pub fn new(min: Vec2, max: Vec2) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(Error::InvalidShape(format!(
                "rectangle corners must be finite, got {min:?} / {max:?}"
            )));
        }
        if min.x >= max.x || min.y >= max.y {
            return Err(Error::DegenerateGeometry(format!(
                "rectangle min {min:?} must be strictly below max {max:?}"
            )));
        }
        Ok(Self { min, max })
    }

    /// Creates a rectangle centered on the owner's position.
    pub fn from_half_extents(half_width: f64, half_height: f64) -> Result<Self> {
        Self::new(
            Vec2::new(-half_width, -half_height),
            Vec2::new(half_width, half_height),
        )
    }

    pub fn min(&self) -> Vec2 {
        self.min
    }

    pub fn max(&self) -> Vec2 {
        self.max
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// The equivalent 4-vertex convex polygon, counter-clockwise from `min`.
    pub fn to_polygon(&self) -> Polygon {
        Polygon::from_rectangle(self.min, self.max)
    }
}
