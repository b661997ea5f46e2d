use crate::error::Result;
use crate::objects::Being;

/// One kind of interaction between beings of type `A` and type `B`.
///
/// `detect` decides whether a pair interacts this frame; `handle` applies the
/// consequences. `handle` is only ever called for a pair `detect` accepted in
/// the same pass.
///
/// Both beings are locked while either method runs. Membership changes from
/// inside a handler must be queued on [`World::commands`](crate::World::commands)
/// rather than made with [`add_to_group`](crate::add_to_group) and friends.
pub trait Interactor<A: Being, B: Being>: Send {
    fn detect(&mut self, a: &A, b: &B) -> Result<bool>;
    fn handle(&mut self, a: &mut A, b: &mut B) -> Result<()>;
}

/// An interactor whose detection is shape collision.
///
/// Every `Collider` is an [`Interactor`]; `detect` is answered by the
/// separating-axis test on the two bodies' shapes.
pub trait Collider<A: Being, B: Being>: Send {
    fn handle(&mut self, a: &mut A, b: &mut B) -> Result<()>;
}

impl<A, B, C> Interactor<A, B> for C
where
    A: Being,
    B: Being,
    C: Collider<A, B>,
{
    fn detect(&mut self, a: &A, b: &B) -> Result<bool> {
        Ok(a.body().collides_with(b.body()))
    }

    fn handle(&mut self, a: &mut A, b: &mut B) -> Result<()> {
        Collider::handle(self, a, b)
    }
}

/// Adapts a closure into a [`Collider`].
pub struct ColliderFn<F>(pub F);

impl<A, B, F> Collider<A, B> for ColliderFn<F>
where
    A: Being,
    B: Being,
    F: FnMut(&mut A, &mut B) -> Result<()> + Send,
{
    fn handle(&mut self, a: &mut A, b: &mut B) -> Result<()> {
        (self.0)(a, b)
    }
}
