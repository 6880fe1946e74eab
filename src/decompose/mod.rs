//! Greedy cuboid decomposition of a tile region into covers.
//!
//! A cover pairs a value with a qube in which every cell holds that value.
//! The covers of one decomposition never overlap and together claim exactly
//! the non-empty cells of the queried region.

pub mod config;
pub mod greedy;
pub mod policy;

pub use config::{CoverShape, DecomposeConfig};
pub use greedy::{Cover, TileLookup, decompose};
pub use policy::{Axis, Balanced, GrowthPolicy, Shuffled, Vertical, Wide};

use crate::grid::{Tile, Tilemap};

/// Decompose a whole tilemap, using its bounding qube as the region
pub fn decompose_tilemap(tilemap: &Tilemap, config: &DecomposeConfig) -> Vec<Cover<Tile>> {
    match tilemap.bounding_qube() {
        Some(region) => decompose(tilemap, region, &tilemap.default_tile(), &mut config.policy()),
        None => Vec::new(),
    }
}
