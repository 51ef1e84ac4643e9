// Re-export glam for convenience
pub use glam::*;

// Kino math types
mod aabb;
mod interval;
mod ray;
mod rotor;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
pub use rotor::Rotor;
