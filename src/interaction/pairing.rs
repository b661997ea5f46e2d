use crate::error::Result;
use crate::interaction::Interactor;
use crate::objects::{Being, Handle};

/// One registration's view of a dispatch pass.
///
/// Optimizers receive a `Pairing` and drive it: for every candidate pair
/// they find, they call [`detect`](Pairing::detect) and then
/// [`handle`](Pairing::handle), or [`interact`](Pairing::interact) for both.
/// Whether `handle` runs immediately or after the pass is decided by the
/// registration, not by the caller.
pub struct Pairing<'p, A: Being, B: Being> {
    interactor: &'p mut dyn Interactor<A, B>,
    candidates: &'p [Handle<B>],
    apply_immediately: bool,
    deferred: &'p mut Vec<(Handle<A>, Handle<B>)>,
    tested: usize,
    detected: usize,
}

impl<'p, A: Being, B: Being> Pairing<'p, A, B> {
    pub(crate) fn new(
        interactor: &'p mut dyn Interactor<A, B>,
        candidates: &'p [Handle<B>],
        apply_immediately: bool,
        deferred: &'p mut Vec<(Handle<A>, Handle<B>)>,
    ) -> Self {
        Pairing {
            interactor,
            candidates,
            apply_immediately,
            deferred,
            tested: 0,
            detected: 0,
        }
    }

    /// This frame's snapshot of the second group, in group order.
    pub fn candidates(&self) -> &'p [Handle<B>] {
        self.candidates
    }

    /// Runs the interactor's `detect` on the pair. A being is never paired
    /// with itself; such pairs report `false` without being tested.
    pub fn detect(&mut self, a: &Handle<A>, b: &Handle<B>) -> Result<bool> {
        if a.id() == b.id() {
            return Ok(false);
        }
        self.tested += 1;
        let being_a = a.lock()?;
        let being_b = b.lock()?;
        let hit = self.interactor.detect(&being_a, &being_b)?;
        if hit {
            self.detected += 1;
        }
        Ok(hit)
    }

    /// Runs the interactor's `handle` on the pair, now or at the end of the
    /// pass.
    pub fn handle(&mut self, a: &Handle<A>, b: &Handle<B>) -> Result<()> {
        if a.id() == b.id() {
            return Ok(());
        }
        if self.apply_immediately {
            let mut being_a = a.lock()?;
            let mut being_b = b.lock()?;
            self.interactor.handle(&mut being_a, &mut being_b)
        } else {
            self.deferred.push((a.clone(), b.clone()));
            Ok(())
        }
    }

    /// `detect`, then `handle` if it matched. Returns whether it matched.
    pub fn interact(&mut self, a: &Handle<A>, b: &Handle<B>) -> Result<bool> {
        let hit = self.detect(a, b)?;
        if hit {
            self.handle(a, b)?;
        }
        Ok(hit)
    }

    /// `(pairs tested, pairs detected)` so far.
    pub fn counts(&self) -> (usize, usize) {
        (self.tested, self.detected)
    }
}
