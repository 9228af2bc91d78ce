//! Core types and constants shared across the crate

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
