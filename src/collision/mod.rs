pub mod aabb;
pub mod sat;
pub mod spatial_grid;

// Re-export key types
pub use aabb::AABB;
pub use sat::{collide, projection_vector};
pub use spatial_grid::SpatialGrid;
