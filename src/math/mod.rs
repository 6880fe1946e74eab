//! Integer geometry for the tile grid

pub mod qube;

pub use qube::Qube;
