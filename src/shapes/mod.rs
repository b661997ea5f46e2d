pub mod circle;
pub mod compound;
pub mod polygon;
pub mod rectangle;

pub use circle::Circle;
pub use compound::CompoundShape;
pub use polygon::Polygon;
pub use rectangle::Rectangle;

use crate::collision::{sat, AABB};
use crate::math::vec2::Vec2;

/// The collision geometry of a being.
///
/// A shape stores geometry relative to a position it does not own. The owning
/// [`Body`](crate::objects::Body) holds the position; collision queries go
/// through [`PlacedShape`], which pairs the shape with that position at the
/// moment of the query.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rectangle(Rectangle),
    Circle(Circle),
    Polygon(Polygon),
    Compound(CompoundShape),
}

impl Shape {
    /// Places the shape at `position` for a query.
    pub fn at(&self, position: Vec2) -> PlacedShape<'_> {
        PlacedShape { shape: self, position }
    }
}

impl From<Rectangle> for Shape {
    fn from(rect: Rectangle) -> Self {
        Shape::Rectangle(rect)
    }
}

impl From<Circle> for Shape {
    fn from(circle: Circle) -> Self {
        Shape::Circle(circle)
    }
}

impl From<Polygon> for Shape {
    fn from(polygon: Polygon) -> Self {
        Shape::Polygon(polygon)
    }
}

impl From<CompoundShape> for Shape {
    fn from(compound: CompoundShape) -> Self {
        Shape::Compound(compound)
    }
}

/// A shape read at its owner's current position.
#[derive(Debug, Clone, Copy)]
pub struct PlacedShape<'a> {
    pub shape: &'a Shape,
    pub position: Vec2,
}

impl<'a> PlacedShape<'a> {
    /// Whether the two shapes overlap or touch.
    pub fn collide(&self, other: &PlacedShape<'_>) -> bool {
        self.projection_vector(other).is_some()
    }

    /// Smallest displacement that moves `other` out of `self`, or `None` if
    /// they do not overlap.
    pub fn projection_vector(&self, other: &PlacedShape<'_>) -> Option<Vec2> {
        sat::projection_vector(*self, *other)
    }

    /// Whether `point` (world coordinates) lies inside or on the boundary.
    pub fn contains(&self, point: Vec2) -> bool {
        let local = point - self.position;
        match self.shape {
            Shape::Rectangle(rect) => {
                local.x >= rect.min().x
                    && local.x <= rect.max().x
                    && local.y >= rect.min().y
                    && local.y <= rect.max().y
            }
            Shape::Circle(circle) => local.magnitude_squared() <= circle.radius() * circle.radius(),
            Shape::Polygon(polygon) => polygon.contains_local(local),
            Shape::Compound(compound) => compound
                .parts()
                .iter()
                .any(|(offset, part)| part.at(self.position + *offset).contains(point)),
        }
    }

    /// World-space bounding box.
    pub fn bounding_box(&self) -> AABB {
        match self.shape {
            Shape::Rectangle(rect) => AABB::new(rect.min(), rect.max()).translated(self.position),
            Shape::Circle(circle) => AABB::around(self.position, circle.radius()),
            Shape::Polygon(polygon) => {
                let (min, max) = polygon.local_bounds();
                AABB::new(min, max).translated(self.position)
            }
            Shape::Compound(compound) => {
                let mut parts = compound
                    .parts()
                    .iter()
                    .map(|(offset, part)| part.at(self.position + *offset).bounding_box());
                // Compounds are never empty.
                let first = parts.next().unwrap_or_else(|| AABB::around(self.position, 0.0));
                parts.fold(first, |mut acc, next| {
                    acc.merge(&next);
                    acc
                })
            }
        }
    }
}
