//! Dimension Kernel: per-dimension generation settings and the registry that
//! says which settings apply to which dimension.
//!
//! # Invariants
//! - A `DimensionConfig` never holds an out-of-range value.
//! - Registry readers never observe a partially applied write.
//! - Allow-lists are only ever replaced wholesale.

pub mod allow_lists;
pub mod dimension;
pub mod registry;
pub mod settings;
pub mod state;

pub use allow_lists::SharedAllowLists;
pub use dimension::{DEFAULT_SKY_COLOR, DimensionConfig, MAX_SKY_COLOR};
pub use registry::{Registry, RegistrySnapshot};
pub use settings::{ServerSettings, SettingsError};
pub use state::ReplicatedState;
