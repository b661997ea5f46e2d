use crate::error::{Error, Result};
use crate::math::vec2::Vec2;
use crate::shapes::Shape;

/// A union of convex parts, each offset from the owner's position.
///
/// This is how concave outlines are approximated: decompose them into convex
/// polygons, circles, or rectangles and collide against the union.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundShape {
    parts: Vec<(Vec2, Shape)>,
}

impl CompoundShape {
    pub fn new(parts: Vec<(Vec2, Shape)>) -> Result<Self> {
        if parts.is_empty() {
            return Err(Error::InvalidShape(
                "compound shape needs at least one part".to_string(),
            ));
        }
        if let Some((offset, _)) = parts.iter().find(|(offset, _)| !offset.is_finite()) {
            return Err(Error::InvalidShape(format!(
                "compound part offset {offset:?} is not finite"
            )));
        }
        Ok(Self { parts })
    }

    /// Parts as `(offset, shape)` pairs, in insertion order.
    pub fn parts(&self) -> &[(Vec2, Shape)] {
        &self.parts
    }

    pub fn push(&mut self, offset: Vec2, shape: Shape) {
        self.parts.push((offset, shape));
    }
}
