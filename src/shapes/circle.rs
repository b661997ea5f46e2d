use crate::error::{Error, Result};

/// A circle centered on its owner's position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    radius: f64,
}

impl Circle {
    pub fn new(radius: f64) -> Result<Self> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(Error::InvalidShape(format!(
                "circle radius must be finite and non-negative, got {radius}"
            )));
        }
        Ok(Self { radius })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}
