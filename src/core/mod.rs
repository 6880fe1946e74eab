//! Core types and utilities shared by every subsystem

pub mod error;
pub mod logging;
pub mod types;

pub use error::Error;
pub use types::*;
