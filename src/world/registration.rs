use log::trace;

use crate::error::Result;
use crate::groups::Group;
use crate::interaction::{Interactor, Optimizer, Pairing};
use crate::objects::{Being, Handle};

/// A registration with its being types erased, as the world stores it.
pub(crate) trait Registration: Send {
    /// Runs one dispatch pass over the current members of both groups.
    fn run(&mut self) -> Result<()>;
}

pub(crate) struct InteractionRegistration<A: Being, B: Being> {
    pub(crate) group_a: Group<A>,
    pub(crate) group_b: Group<B>,
    pub(crate) interactor: Box<dyn Interactor<A, B>>,
    pub(crate) optimizer: Option<Box<dyn Optimizer<A, B>>>,
    pub(crate) apply_immediately: bool,
}

impl<A: Being, B: Being> Registration for InteractionRegistration<A, B> {
    fn run(&mut self) -> Result<()> {
        let members_a = self.group_a.members()?;
        let members_b = self.group_b.members()?;
        let mut deferred: Vec<(Handle<A>, Handle<B>)> = Vec::new();

        let (tested, detected) = {
            let mut pairing = Pairing::new(
                self.interactor.as_mut(),
                &members_b,
                self.apply_immediately,
                &mut deferred,
            );
            match self.optimizer.as_mut() {
                Some(optimizer) => {
                    optimizer.prepare(&members_b)?;
                    for a in &members_a {
                        optimizer.detect(a, &mut pairing)?;
                    }
                }
                None => {
                    for a in &members_a {
                        for b in &members_b {
                            pairing.interact(a, b)?;
                        }
                    }
                }
            }
            pairing.counts()
        };

        for (a, b) in &deferred {
            let mut being_a = a.lock()?;
            let mut being_b = b.lock()?;
            self.interactor.handle(&mut being_a, &mut being_b)?;
        }

        trace!(
            "groups {:?} x {:?}: {} pair(s) tested, {} detected",
            self.group_a.id(),
            self.group_b.id(),
            tested,
            detected
        );
        Ok(())
    }
}
