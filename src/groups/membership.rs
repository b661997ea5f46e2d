//! The being-side half of group membership.

use std::collections::HashSet;
use std::fmt;
use std::sync::Weak;

use crate::error::Result;
use crate::groups::GroupId;
use crate::objects::BeingId;

/// Type-erased view of a group, so a [`Body`](crate::objects::Body) can point
/// back at groups of any being type and the world can drive them uniformly.
pub(crate) trait GroupLink: Send + Sync {
    fn id(&self) -> GroupId;

    /// Removes the being from the group and the group from the being.
    /// Returns whether the being was a member.
    fn detach(&self, being: BeingId) -> Result<bool>;

    /// Runs `update` and motion integration for every member not yet in
    /// `seen`, adding each visited id to it.
    fn step_members(&self, dt: f64, seen: &mut HashSet<BeingId>) -> Result<()>;
}

/// One entry of a body's group list.
#[derive(Clone)]
pub(crate) struct Membership {
    pub(crate) group: GroupId,
    pub(crate) link: Weak<dyn GroupLink>,
}

impl fmt::Debug for Membership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Membership").field("group", &self.group).finish()
    }
}
