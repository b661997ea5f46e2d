pub mod commands;
pub(crate) mod registration;
pub mod sim_world;

pub use commands::CommandQueue;
pub use sim_world::{FramePhase, World};
