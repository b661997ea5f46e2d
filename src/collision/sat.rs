//! Separating-axis collision between placed shapes.
//!
//! Every routine answers the same question: the smallest displacement that
//! moves the second shape out of the first. Each unordered pair is computed
//! in one order only and the other order negates it, so
//! `projection_vector(b, a)` is exactly `-projection_vector(a, b)`.
//!
//! Same-kind pairs are ordered by position, then by geometry. Two identical
//! shapes at the same position have no such order; both calls then return
//! the same vector.

use std::cmp::Ordering;

use crate::math::vec2::Vec2;
use crate::shapes::{Circle, PlacedShape, Polygon, Shape};

/// Smallest vector that displaces `b` out of `a`, or `None` if they are apart.
///
/// Touching shapes collide and yield a zero-length (or negligible) vector.
pub fn projection_vector(a: PlacedShape<'_>, b: PlacedShape<'_>) -> Option<Vec2> {
    match (a.shape, b.shape) {
        (Shape::Compound(compound), _) => {
            let mut best = None;
            for (offset, part) in compound.parts() {
                if let Some(candidate) = projection_vector(part.at(a.position + *offset), b) {
                    keep_smaller(&mut best, candidate);
                }
            }
            best
        }
        (_, Shape::Compound(_)) => projection_vector(b, a).map(|v| -v),

        (Shape::Circle(ca), Shape::Circle(cb)) => {
            if precedes(a.position, b.position, || ca.radius().total_cmp(&cb.radius())) {
                circle_circle(ca, a.position, cb, b.position)
            } else {
                circle_circle(cb, b.position, ca, a.position).map(|v| -v)
            }
        }

        (Shape::Polygon(pa), Shape::Polygon(pb)) => polygons(pa, a.position, pb, b.position),
        (Shape::Polygon(pa), Shape::Rectangle(rb)) => {
            polygons(pa, a.position, &rb.to_polygon(), b.position)
        }
        (Shape::Rectangle(ra), Shape::Polygon(pb)) => {
            polygons(&ra.to_polygon(), a.position, pb, b.position)
        }
        (Shape::Rectangle(ra), Shape::Rectangle(rb)) => {
            polygons(&ra.to_polygon(), a.position, &rb.to_polygon(), b.position)
        }

        (Shape::Polygon(pa), Shape::Circle(cb)) => polygon_circle(pa, a.position, cb, b.position),
        (Shape::Rectangle(ra), Shape::Circle(cb)) => {
            polygon_circle(&ra.to_polygon(), a.position, cb, b.position)
        }
        (Shape::Circle(_), Shape::Polygon(_) | Shape::Rectangle(_)) => {
            projection_vector(b, a).map(|v| -v)
        }
    }
}

/// Whether the placed shapes overlap or touch.
pub fn collide(a: PlacedShape<'_>, b: PlacedShape<'_>) -> bool {
    projection_vector(a, b).is_some()
}

// --- Pair ordering ---

/// Whether a placement at `pos_a` is computed before one at `pos_b`.
/// `geometry` breaks ties between equal positions.
fn precedes(pos_a: Vec2, pos_b: Vec2, geometry: impl FnOnce() -> Ordering) -> bool {
    pos_a
        .x
        .total_cmp(&pos_b.x)
        .then(pos_a.y.total_cmp(&pos_b.y))
        .then_with(geometry)
        != Ordering::Greater
}

/// Lexicographic order on vertex lists.
fn compare_outlines(a: &Polygon, b: &Polygon) -> Ordering {
    a.points()
        .iter()
        .zip(b.points())
        .map(|(p, q)| p.x.total_cmp(&q.x).then(p.y.total_cmp(&q.y)))
        .find(|o| o.is_ne())
        .unwrap_or_else(|| a.points().len().cmp(&b.points().len()))
}

fn polygons(a: &Polygon, pos_a: Vec2, b: &Polygon, pos_b: Vec2) -> Option<Vec2> {
    if precedes(pos_a, pos_b, || compare_outlines(a, b)) {
        polygon_polygon(a, pos_a, b, pos_b)
    } else {
        polygon_polygon(b, pos_b, a, pos_a).map(|v| -v)
    }
}

// --- Candidate bookkeeping ---

/// Keeps the shorter of `best` and `candidate`; the earlier one wins ties.
fn keep_smaller(best: &mut Option<Vec2>, candidate: Vec2) {
    let shorter = best.map_or(true, |current| {
        candidate.magnitude_squared() < current.magnitude_squared()
    });
    if shorter {
        *best = Some(candidate);
    }
}

/// Push along `axis` that moves interval `b` clear of interval `a`.
///
/// Returns `None` when the intervals are disjoint. Touching intervals
/// overlap by zero.
fn axis_push(axis: Vec2, (a_min, a_max): (f64, f64), (b_min, b_max): (f64, f64)) -> Option<Vec2> {
    if a_max < b_min || b_max < a_min {
        return None;
    }
    let forward = a_max - b_min;
    let backward = a_min - b_max;
    let depth = if forward <= -backward { forward } else { backward };
    Some(Vec2::new(axis.x * depth, axis.y * depth))
}

fn polygon_interval(polygon: &Polygon, position: Vec2, axis: Vec2) -> (f64, f64) {
    let offset = position.dot(axis);
    let (min, max) = polygon.project(axis);
    (min + offset, max + offset)
}

fn circle_interval(circle: &Circle, center: Vec2, axis: Vec2) -> (f64, f64) {
    let c = center.dot(axis);
    (c - circle.radius(), c + circle.radius())
}

// --- Pairwise routines ---

fn circle_circle(a: &Circle, pos_a: Vec2, b: &Circle, pos_b: Vec2) -> Option<Vec2> {
    let delta = Vec2::new(pos_b.x - pos_a.x, pos_b.y - pos_a.y);
    let radii = a.radius() + b.radius();
    let dist_sq = delta.magnitude_squared();
    if dist_sq > radii * radii {
        return None;
    }
    let distance = dist_sq.sqrt();
    if distance == 0.0 {
        // Concentric: any direction resolves, pick +y.
        return Some(Vec2::UP * radii);
    }
    Some(delta.normalize() * (radii - distance))
}

fn polygon_polygon(a: &Polygon, pos_a: Vec2, b: &Polygon, pos_b: Vec2) -> Option<Vec2> {
    let mut best = None;
    for &axis in a.axes().iter().chain(b.axes()) {
        let candidate = axis_push(
            axis,
            polygon_interval(a, pos_a, axis),
            polygon_interval(b, pos_b, axis),
        )?;
        keep_smaller(&mut best, candidate);
    }
    best
}

fn polygon_circle(polygon: &Polygon, pos_p: Vec2, circle: &Circle, center: Vec2) -> Option<Vec2> {
    let mut best = None;
    for &axis in polygon.axes() {
        let candidate = axis_push(
            axis,
            polygon_interval(polygon, pos_p, axis),
            circle_interval(circle, center, axis),
        )?;
        keep_smaller(&mut best, candidate);
    }

    // Edge axes cannot see a circle sitting off a corner. Find the vertex
    // whose Voronoi region holds the center, if any, and test that axis too.
    let local = Vec2::new(center.x - pos_p.x, center.y - pos_p.y);
    let points = polygon.points();
    let n = points.len();
    for i in 0..n {
        let vertex = points[i];
        let incoming = vertex - points[(i + n - 1) % n];
        let outgoing = points[(i + 1) % n] - vertex;
        let to_center = local - vertex;
        if to_center.dot(incoming) > 0.0 && to_center.dot(outgoing) < 0.0 {
            let distance = to_center.magnitude();
            if distance > circle.radius() {
                return None;
            }
            let direction = to_center.normalize();
            keep_smaller(
                &mut best,
                Vec2::new(direction.x, direction.y) * (circle.radius() - distance),
            );
            break;
        }
    }
    best
}
