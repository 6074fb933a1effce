//! Protocol definitions and structures

pub mod constants;
pub mod flags;

pub use constants::*;
pub use flags::{ChatFlags, FacetBits};
