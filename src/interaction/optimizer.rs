use crate::error::Result;
use crate::interaction::Pairing;
use crate::objects::{Being, Handle};

/// A strategy for finding the members of the second group that interact
/// with a given member of the first, faster than trying all of them.
///
/// The optimizer drives the interactor, not the other way round: `detect`
/// must itself call [`Pairing::detect`]/[`Pairing::handle`] (or
/// [`Pairing::interact`]) for every candidate it finds. It never returns a
/// list of matches.
///
/// Per frame and registration, `prepare` is called once with the snapshot of
/// the second group, then `detect` once per member of the first group. The
/// same snapshot is available from [`Pairing::candidates`], and indices into
/// the two agree.
pub trait Optimizer<A: Being, B: Being>: Send {
    fn prepare(&mut self, _candidates: &[Handle<B>]) -> Result<()> {
        Ok(())
    }

    fn detect(&mut self, body: &Handle<A>, pairing: &mut Pairing<'_, A, B>) -> Result<()>;
}

/// Tries every candidate, in group order.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaiveOptimizer;

impl<A: Being, B: Being> Optimizer<A, B> for NaiveOptimizer {
    fn detect(&mut self, body: &Handle<A>, pairing: &mut Pairing<'_, A, B>) -> Result<()> {
        for candidate in pairing.candidates() {
            pairing.interact(body, candidate)?;
        }
        Ok(())
    }
}
