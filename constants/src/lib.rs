//! Shared lookup tables and layout constants for particle generation.

pub mod alphabet;
pub mod layout;
pub mod streaming;
