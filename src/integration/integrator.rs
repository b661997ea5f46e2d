use crate::objects::Body;

/// Advances the body's position by one explicit Euler step.
///
/// Bodies at rest are skipped entirely; their position is never rewritten.
pub fn integrate(body: &mut Body, dt: f64) {
    if body.velocity.is_zero() {
        return;
    }
    // p = p + v*dt, planar only; z is a draw depth and does not move.
    body.position.x += body.velocity.x * dt;
    body.position.y += body.velocity.y * dt;
}
