use std::sync::atomic::{AtomicU64, Ordering};

use crate::collision::AABB;
use crate::groups::membership::Membership;
use crate::groups::GroupId;
use crate::math::vec2::Vec2;
use crate::shapes::{PlacedShape, Shape};

static NEXT_BEING_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a being, fixed when its [`Body`] is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BeingId(u64);

impl BeingId {
    fn next() -> Self {
        BeingId(NEXT_BEING_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Simulation state shared by every being: where it is, how it moves, what
/// it looks like to the collision code, and which groups hold it.
///
/// The shape carries no position of its own. It is placed at `position`
/// whenever it is queried, so moving the body moves the shape.
#[derive(Debug)]
pub struct Body {
    id: BeingId,
    pub position: Vec2,
    /// Units per second. A zero velocity is never integrated.
    pub velocity: Vec2,
    pub shape: Shape,
    memberships: Vec<Membership>,
}

impl Body {
    /// Creates a resting body at `position`.
    pub fn new(position: Vec2, shape: impl Into<Shape>) -> Self {
        Body {
            id: BeingId::next(),
            position,
            velocity: Vec2::ZERO,
            shape: shape.into(),
            memberships: Vec::new(),
        }
    }

    /// Builder-style velocity for freshly created bodies.
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn id(&self) -> BeingId {
        self.id
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn set_x(&mut self, x: f64) {
        self.position.x = x;
    }

    pub fn set_y(&mut self, y: f64) {
        self.position.y = y;
    }

    /// Sets the draw depth. Collision ignores `z`.
    pub fn set_z(&mut self, z: f64) {
        self.position.z = z;
    }

    pub fn translate(&mut self, offset: Vec2) {
        self.position += offset;
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// The shape placed at the current position.
    pub fn placed_shape(&self) -> PlacedShape<'_> {
        self.shape.at(self.position)
    }

    pub fn bounding_box(&self) -> AABB {
        self.placed_shape().bounding_box()
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.placed_shape().contains(point)
    }

    pub fn collides_with(&self, other: &Body) -> bool {
        self.placed_shape().collide(&other.placed_shape())
    }

    /// Smallest displacement that moves `other` out of this body.
    pub fn projection_vector(&self, other: &Body) -> Option<Vec2> {
        self.placed_shape().projection_vector(&other.placed_shape())
    }

    /// Ids of the groups currently holding this body. Groups that have
    /// since been dropped are not reported.
    pub fn groups(&self) -> Vec<GroupId> {
        self.live_memberships().map(|m| m.group).collect()
    }

    pub fn is_member_of(&self, group: GroupId) -> bool {
        self.live_memberships().any(|m| m.group == group)
    }

    fn live_memberships(&self) -> impl Iterator<Item = &Membership> {
        self.memberships.iter().filter(|m| m.link.strong_count() > 0)
    }

    pub(crate) fn memberships(&self) -> &[Membership] {
        &self.memberships
    }

    pub(crate) fn push_membership(&mut self, membership: Membership) {
        self.prune_memberships();
        self.memberships.push(membership);
    }

    pub(crate) fn drop_membership(&mut self, group: GroupId) {
        self.memberships
            .retain(|m| m.group != group && m.link.strong_count() > 0);
    }

    /// Forgets links to groups that have been dropped.
    pub(crate) fn prune_memberships(&mut self) {
        self.memberships.retain(|m| m.link.strong_count() > 0);
    }
}
