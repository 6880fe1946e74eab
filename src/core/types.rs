//! Core type aliases and re-exports

pub use glam::{IVec3, UVec3, Vec3};

/// A cell coordinate in the tile grid
pub type Position = IVec3;

/// Standard Result type for the crate
pub type Result<T> = std::result::Result<T, crate::core::error::Error>;
