//! Identifier types shared by the preset, kernel and protocol crates.

mod types;

pub use types::{BlockPos, DimensionId, RequesterId};
