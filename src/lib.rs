//! Tilecover - greedy cuboid decomposition of tile grids and route planning
//! over the resulting covers

pub mod core;
pub mod decompose;
pub mod grid;
pub mod math;
pub mod route;
