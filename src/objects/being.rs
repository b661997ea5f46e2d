use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{Error, Result};
use crate::objects::body::{BeingId, Body};
use crate::objects::message::Message;

/// A simulation object: user data wrapped around a [`Body`].
///
/// Implementors only need to expose their body. `update` runs once per frame
/// before motion is integrated; `receive` is called when a message is
/// delivered. Both default to doing nothing.
pub trait Being: Send + 'static {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;

    fn update(&mut self) -> Result<()> {
        Ok(())
    }

    fn receive(&mut self, _message: &Message) -> Result<()> {
        Ok(())
    }
}

impl Being for Body {
    fn body(&self) -> &Body {
        self
    }

    fn body_mut(&mut self) -> &mut Body {
        self
    }
}

/// Shared, lockable reference to a being.
///
/// Groups, the world, and the application all hold clones of the same
/// handle. The id is captured at creation and identifies the being for
/// membership and self-pair checks.
pub struct Handle<T> {
    id: BeingId,
    inner: Arc<Mutex<T>>,
}

impl<T: Being> Handle<T> {
    pub fn new(being: T) -> Self {
        Handle {
            id: being.body().id(),
            inner: Arc::new(Mutex::new(being)),
        }
    }

    pub fn lock(&self) -> Result<MutexGuard<'_, T>> {
        self.inner.lock().map_err(|_| Error::LockPoisoned("being"))
    }
}

impl<T> Handle<T> {
    pub fn id(&self) -> BeingId {
        self.id
    }

    /// Whether both handles point at the same being.
    pub fn ptr_eq(&self, other: &Handle<T>) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Handle {
            id: self.id,
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle").field("id", &self.id).finish()
    }
}

/// Locks `handle` and hands it `message`.
pub fn deliver<T: Being>(handle: &Handle<T>, message: &Message) -> Result<()> {
    handle.lock()?.receive(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec2::Vec2;
    use crate::shapes::Circle;

    struct Listener {
        body: Body,
        keys: Vec<char>,
    }

    impl Being for Listener {
        fn body(&self) -> &Body {
            &self.body
        }

        fn body_mut(&mut self) -> &mut Body {
            &mut self.body
        }

        fn receive(&mut self, message: &Message) -> Result<()> {
            match message {
                Message::Key { key, pressed: true } => self.keys.push(*key),
                Message::Custom { address, .. } if address == "/fail" => {
                    return Err(Error::handler("refused"));
                }
                _ => {}
            }
            Ok(())
        }
    }

    fn listener() -> Handle<Listener> {
        Handle::new(Listener {
            body: Body::new(Vec2::ZERO, Circle::new(1.0).unwrap()),
            keys: Vec::new(),
        })
    }

    #[test]
    fn test_handle_shares_state() {
        let handle = listener();
        let other = handle.clone();
        assert!(handle.ptr_eq(&other));
        assert_eq!(handle.id(), other.id());

        other.lock().unwrap().body_mut().set_x(3.0);
        assert_eq!(handle.lock().unwrap().body().position.x, 3.0);
    }

    #[test]
    fn test_deliver_reaches_receive() {
        let handle = listener();
        deliver(&handle, &Message::key('a', true)).unwrap();
        deliver(&handle, &Message::key('b', false)).unwrap();
        deliver(&handle, &Message::MouseWheel { amount: 2 }).unwrap();
        assert_eq!(handle.lock().unwrap().keys, vec!['a']);
    }

    #[test]
    fn test_deliver_propagates_errors() {
        let handle = listener();
        let err = deliver(&handle, &Message::custom("/fail", vec![1.0])).unwrap_err();
        assert!(matches!(err, Error::Handler(_)));
    }

    #[test]
    fn test_plain_body_ignores_messages() {
        let handle = Handle::new(Body::new(Vec2::ZERO, Circle::new(1.0).unwrap()));
        deliver(&handle, &Message::key('x', true)).unwrap();
        assert!(handle.lock().unwrap().update().is_ok());
    }

    #[test]
    fn test_poisoned_lock_is_an_error() {
        let handle = listener();
        let poisoner = handle.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison the being");
        })
        .join();
        assert!(matches!(handle.lock(), Err(Error::LockPoisoned(_))));
    }
}
