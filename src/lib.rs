//! A 2D simulation core: convex shape collision with the separating axis
//! theorem, and a frame loop that dispatches interactions between groups of
//! beings.

pub mod collision;
pub mod config;
pub mod error;
pub mod groups;
pub mod integration;
pub mod interaction;
pub mod math;
pub mod objects;
pub mod shapes;
pub mod world;

// Re-export key types for easier use
pub use collision::AABB;
pub use config::{ConfigError, WorldConfig};
pub use error::{Error, Result};
pub use groups::{add_to_group, delete_from_all_groups, remove_from_group, Group, GroupId};
pub use interaction::{
    Collider, ColliderFn, GridOptimizer, Interactor, NaiveOptimizer, Optimizer, Pairing,
};
pub use math::vec2::Vec2;
pub use objects::{deliver, Being, BeingId, Body, Handle, Message, MouseAction, MouseButton};
pub use shapes::{Circle, CompoundShape, PlacedShape, Polygon, Rectangle, Shape};
pub use world::{CommandQueue, FramePhase, World};
