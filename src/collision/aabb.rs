// Defines an Axis-Aligned Bounding Box

use crate::math::vec2::Vec2;

/// A world-space axis-aligned bounding box given by its minimum and maximum corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    pub min: Vec2,
    pub max: Vec2,
}

impl AABB {
    /// Creates a new AABB, sorting the corner coordinates.
    pub fn new(min: Vec2, max: Vec2) -> Self {
        AABB {
            min: Vec2::new(min.x.min(max.x), min.y.min(max.y)),
            max: Vec2::new(min.x.max(max.x), min.y.max(max.y)),
        }
    }

    /// Box of half-size `radius` around `center`.
    pub fn around(center: Vec2, radius: f64) -> Self {
        let half = Vec2::new(radius, radius);
        AABB::new(center - half, center + half)
    }

    /// Checks if this AABB overlaps with another. Touching boxes overlap.
    pub fn overlaps(&self, other: &AABB) -> bool {
        let x_overlap = self.max.x >= other.min.x && self.min.x <= other.max.x;
        let y_overlap = self.max.y >= other.min.y && self.min.y <= other.max.y;
        x_overlap && y_overlap
    }

    /// Merges another AABB into this one, expanding this AABB to contain both.
    pub fn merge(&mut self, other: &AABB) {
        self.min.x = self.min.x.min(other.min.x);
        self.min.y = self.min.y.min(other.min.y);
        self.max.x = self.max.x.max(other.max.x);
        self.max.y = self.max.y.max(other.max.y);
    }

    /// Moves the box by `offset`.
    pub fn translated(&self, offset: Vec2) -> Self {
        AABB {
            min: Vec2::new(self.min.x + offset.x, self.min.y + offset.y),
            max: Vec2::new(self.max.x + offset.x, self.max.y + offset.y),
        }
    }

    /// Whether `point` lies inside or on the boundary.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}
