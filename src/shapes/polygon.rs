use crate::error::{Error, Result};
use crate::math::vec2::Vec2;

/// A strictly convex polygon with vertices relative to its owner's position.
///
/// Each vertex is joined to its neighbours in list order and the last vertex
/// closes back onto the first. Either winding is accepted, but it must be
/// consistent: self-intersecting, concave, or collinear outlines are rejected
/// at construction. Concave outlines belong in a [`CompoundShape`] made of
/// convex parts.
///
/// [`CompoundShape`]: crate::shapes::CompoundShape
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    points: Vec<Vec2>,
    // One outward unit normal per edge; axes[i] belongs to points[i] -> points[i + 1].
    axes: Vec<Vec2>,
}

impl Polygon {
    /// Creates a polygon from an ordered list of vertices.
    pub fn new(points: Vec<Vec2>) -> Result<Self> {
        let axes = compute_axes(&points)?;
        Ok(Polygon { points, axes })
    }

    /// Builds the counter-clockwise outline of an axis-aligned box.
    /// The caller guarantees `min < max` on both axes.
    pub(crate) fn from_rectangle(min: Vec2, max: Vec2) -> Self {
        Polygon {
            points: vec![min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)],
            axes: vec![
                Vec2::new(0.0, -1.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(0.0, 1.0),
                Vec2::new(-1.0, 0.0),
            ],
        }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Outward unit edge normals, one per edge, in vertex order.
    pub fn axes(&self) -> &[Vec2] {
        &self.axes
    }

    /// Appends a vertex between the current last and first vertices.
    ///
    /// The polygon is left unchanged if the new outline is not strictly convex.
    pub fn add_point(&mut self, point: Vec2) -> Result<()> {
        let mut points = self.points.clone();
        points.push(point);
        self.axes = compute_axes(&points)?;
        self.points = points;
        Ok(())
    }

    /// Rotates the polygon counter-clockwise about its owner's position.
    pub fn rotate(&mut self, theta: f64) {
        self.rotate_about(Vec2::ZERO, theta);
    }

    /// Rotates the polygon counter-clockwise about `pivot`, given in polygon coordinates.
    pub fn rotate_about(&mut self, pivot: Vec2, theta: f64) {
        for p in &mut self.points {
            *p = pivot + (*p - pivot).rotate(theta);
        }
        for axis in &mut self.axes {
            *axis = axis.rotate(theta);
        }
    }

    /// Rotates the polygon counter-clockwise about a world-space `pivot`,
    /// for a polygon placed at `owner`.
    pub fn rotate_in_world(&mut self, owner: Vec2, pivot: Vec2, theta: f64) {
        self.rotate_about(pivot - owner, theta);
    }

    /// Projects the vertices (in polygon coordinates) onto `axis`, returning `(min, max)`.
    pub fn project(&self, axis: Vec2) -> (f64, f64) {
        let mut min_proj = f64::INFINITY;
        let mut max_proj = f64::NEG_INFINITY;
        for p in &self.points {
            let projection = p.dot(axis);
            min_proj = min_proj.min(projection);
            max_proj = max_proj.max(projection);
        }
        (min_proj, max_proj)
    }

    /// Whether `point` (in polygon coordinates) is inside or on the boundary.
    pub fn contains_local(&self, point: Vec2) -> bool {
        self.points
            .iter()
            .zip(&self.axes)
            .all(|(vertex, axis)| (point - *vertex).dot(*axis) <= 0.0)
    }

    /// Smallest `(min, max)` box around the vertices, in polygon coordinates.
    pub fn local_bounds(&self) -> (Vec2, Vec2) {
        let mut min = Vec2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Vec2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in &self.points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        (min, max)
    }
}

/// Validates the outline and derives its outward edge normals.
fn compute_axes(points: &[Vec2]) -> Result<Vec<Vec2>> {
    let n = points.len();
    if n < 3 {
        return Err(Error::InvalidShape(format!(
            "polygon needs at least 3 points, got {n}"
        )));
    }
    if let Some(p) = points.iter().find(|p| !p.is_finite()) {
        return Err(Error::InvalidShape(format!("polygon point {p:?} is not finite")));
    }

    for i in 0..n {
        let edge = points[(i + 1) % n] - points[i];
        if edge.magnitude_squared() == 0.0 {
            return Err(Error::DegenerateGeometry(format!(
                "polygon points {} and {} coincide at {:?}",
                i,
                (i + 1) % n,
                points[i]
            )));
        }
    }

    // Shoelace: positive for counter-clockwise outlines.
    let signed_area: f64 = (0..n).map(|i| points[i].cross(points[(i + 1) % n])).sum();
    if signed_area == 0.0 {
        return Err(Error::DegenerateGeometry("polygon has zero area".to_string()));
    }
    let winding = signed_area.signum();

    // Every vertex off an edge must lie strictly on the inner side of it. This
    // rejects concave, collinear, and self-intersecting outlines alike.
    for i in 0..n {
        let start = points[i];
        let edge = points[(i + 1) % n] - start;
        for (j, p) in points.iter().enumerate() {
            if j == i || j == (i + 1) % n {
                continue;
            }
            if edge.cross(*p - start) * winding <= 0.0 {
                return Err(Error::InvalidShape(format!(
                    "polygon must be convex with consistent winding: point {j} {p:?} is not inside edge {i}"
                )));
            }
        }
    }

    Ok((0..n)
        .map(|i| {
            let edge = points[(i + 1) % n] - points[i];
            (edge.perpendicular() * -winding).normalize()
        })
        .collect())
}
