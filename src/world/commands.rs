use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::groups::{add_to_group, delete_from_all_groups, remove_from_group, Group};
use crate::objects::{Being, Handle};

type Command = Box<dyn FnOnce() -> Result<()> + Send>;

/// Membership changes waiting for the end of the frame.
///
/// Clones share one queue, so interactors and other threads can hold a
/// clone and request changes while the world is iterating groups. Requests
/// are applied in the order they were made, once per frame, after every
/// registration and the motion step have run.
#[derive(Clone, Default)]
pub struct CommandQueue {
    pending: Arc<Mutex<VecDeque<Command>>>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `handle` to join `group`.
    pub fn add<T: Being>(&self, handle: &Handle<T>, group: &Group<T>) -> Result<()> {
        let (handle, group) = (handle.clone(), group.clone());
        self.push(Box::new(move || add_to_group(&handle, &group).map(|_| ())))
    }

    /// Queues `handle` to leave `group`.
    pub fn remove<T: Being>(&self, handle: &Handle<T>, group: &Group<T>) -> Result<()> {
        let (handle, group) = (handle.clone(), group.clone());
        self.push(Box::new(move || remove_from_group(&handle, &group).map(|_| ())))
    }

    /// Queues `handle` to leave every group it is in at drain time.
    pub fn delete<T: Being>(&self, handle: &Handle<T>) -> Result<()> {
        let handle = handle.clone();
        self.push(Box::new(move || delete_from_all_groups(&handle).map(|_| ())))
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn push(&self, command: Command) -> Result<()> {
        self.lock()?.push_back(command);
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, VecDeque<Command>>> {
        self.pending.lock().map_err(|_| Error::LockPoisoned("command queue"))
    }

    /// Applies everything queued so far. Requests made while draining wait
    /// for the next drain.
    ///
    /// Every taken request is applied even if an earlier one fails; the
    /// first failure is returned.
    pub(crate) fn drain(&self) -> Result<usize> {
        let batch = std::mem::take(&mut *self.lock()?);
        let count = batch.len();
        let mut first_error = None;
        for command in batch {
            if let Err(err) = command() {
                warn!("queued membership change failed: {}", err);
                first_error.get_or_insert(err);
            }
        }
        if count > 0 {
            debug!("drained {} membership change(s)", count);
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(count),
        }
    }
}

impl fmt::Debug for CommandQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("CommandQueue");
        match self.pending.try_lock() {
            Ok(pending) => s.field("pending", &pending.len()),
            Err(_) => s.field("pending", &"<locked>"),
        };
        s.finish()
    }
}
