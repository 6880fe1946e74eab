//! Dense tile grid used as the read oracle for decomposition.
//!
//! The grid is edited through bulk designations (dig, ramp, channel, stairs)
//! and read point-wise by the decomposer through [`TileLookup`](crate::decompose::TileLookup).

pub mod snapshot;
pub mod tile;
pub mod tilemap;

pub use snapshot::TilemapState;
pub use tile::Tile;
pub use tilemap::{DEFAULT_VOLUME, TilePiece, Tilemap};
