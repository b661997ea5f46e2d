pub mod being;
pub mod body;
pub mod message;

pub use being::{deliver, Being, Handle};
pub use body::{BeingId, Body};
pub use message::{Message, MouseAction, MouseButton};
