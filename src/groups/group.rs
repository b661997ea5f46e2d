use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use log::trace;

use crate::error::{Error, Result};
use crate::groups::membership::{GroupLink, Membership};
use crate::integration::integrator;
use crate::objects::{Being, BeingId, Handle, Message};

static NEXT_GROUP_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(u64);

impl GroupId {
    fn next() -> Self {
        GroupId(NEXT_GROUP_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

struct GroupInner<T> {
    id: GroupId,
    members: Mutex<Vec<Handle<T>>>,
}

impl<T: Being> GroupInner<T> {
    fn lock_members(&self) -> Result<MutexGuard<'_, Vec<Handle<T>>>> {
        self.members.lock().map_err(|_| Error::LockPoisoned("group"))
    }
}

impl<T: Being> GroupLink for GroupInner<T> {
    fn id(&self) -> GroupId {
        self.id
    }

    fn detach(&self, being: BeingId) -> Result<bool> {
        let mut members = self.lock_members()?;
        let Some(pos) = members.iter().position(|h| h.id() == being) else {
            return Ok(false);
        };
        members[pos].lock()?.body_mut().drop_membership(self.id);
        members.remove(pos);
        Ok(true)
    }

    fn step_members(&self, dt: f64, seen: &mut HashSet<BeingId>) -> Result<()> {
        let snapshot = self.lock_members()?.clone();
        for handle in snapshot {
            if !seen.insert(handle.id()) {
                continue;
            }
            let mut being = handle.lock()?;
            being.update()?;
            integrator::integrate(being.body_mut(), dt);
        }
        Ok(())
    }
}

/// An ordered collection of beings of one type.
///
/// Cloning a group yields another reference to the same collection. Each
/// group has its own mutex; changes go through [`add_to_group`],
/// [`remove_from_group`] and [`delete_from_all_groups`], which keep the
/// group's member list and each member's group list in step.
pub struct Group<T> {
    inner: Arc<GroupInner<T>>,
}

impl<T: Being> Group<T> {
    pub fn new() -> Self {
        Group {
            inner: Arc::new(GroupInner {
                id: GroupId::next(),
                members: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn id(&self) -> GroupId {
        self.inner.id
    }

    /// Snapshot of the current members, in insertion order.
    pub fn members(&self) -> Result<Vec<Handle<T>>> {
        Ok(self.inner.lock_members()?.clone())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.inner.lock_members()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.inner.lock_members()?.is_empty())
    }

    pub fn contains(&self, being: BeingId) -> Result<bool> {
        Ok(self.inner.lock_members()?.iter().any(|h| h.id() == being))
    }

    /// Delivers `message` to every current member, stopping at the first error.
    pub fn broadcast(&self, message: &Message) -> Result<()> {
        for handle in self.members()? {
            handle.lock()?.receive(message)?;
        }
        Ok(())
    }

    pub(crate) fn link(&self) -> Arc<dyn GroupLink> {
        self.inner.clone()
    }
}

impl<T: Being> Default for Group<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Group<T> {
    fn clone(&self) -> Self {
        Group {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Group<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group").field("id", &self.inner.id).finish()
    }
}

// Lock order is always group, then being. None of these may be called while
// the caller holds the being's lock; handlers running inside a frame should
// go through the world's command queue instead.

/// Adds `handle` to `group`. Returns `false` if it was already a member.
pub fn add_to_group<T: Being>(handle: &Handle<T>, group: &Group<T>) -> Result<bool> {
    let mut members = group.inner.lock_members()?;
    if members.iter().any(|h| h.id() == handle.id()) {
        return Ok(false);
    }
    let weak = Arc::downgrade(&group.inner);
    let link: Weak<dyn GroupLink> = weak;
    handle.lock()?.body_mut().push_membership(Membership {
        group: group.id(),
        link,
    });
    members.push(handle.clone());
    trace!("being {:?} joined group {:?}", handle.id(), group.id());
    Ok(true)
}

/// Removes `handle` from `group`. Returns `false` if it was not a member.
pub fn remove_from_group<T: Being>(handle: &Handle<T>, group: &Group<T>) -> Result<bool> {
    let removed = group.inner.detach(handle.id())?;
    if removed {
        trace!("being {:?} left group {:?}", handle.id(), group.id());
    }
    Ok(removed)
}

/// Removes `handle` from every group holding it. Returns how many it left.
pub fn delete_from_all_groups<T: Being>(handle: &Handle<T>) -> Result<usize> {
    let links: Vec<Weak<dyn GroupLink>> = handle
        .lock()?
        .body()
        .memberships()
        .iter()
        .map(|m| m.link.clone())
        .collect();

    let mut removed = 0;
    for link in links {
        // A dropped group has no member list left to fix.
        let Some(group) = link.upgrade() else {
            continue;
        };
        if group.detach(handle.id())? {
            removed += 1;
        }
    }
    handle.lock()?.body_mut().prune_memberships();
    if removed > 0 {
        trace!("being {:?} deleted from {} group(s)", handle.id(), removed);
    }
    Ok(removed)
}
