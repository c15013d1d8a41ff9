//! Administrator settings, read once at startup.
//!
//! ```yaml
//! default_presets:
//!   - ""
//!   - "minecraft:bedrock;minecraft:dirt*3;minecraft:grass"
//! allowed_blocks: [minecraft:bedrock, minecraft:dirt]
//! allowed_biomes: []
//! first_dimension_id: 180
//! ```
//!
//! Missing keys take their defaults.

use personalspace_common::DimensionId;
use personalspace_preset::{AllowLists, BUILTIN_PRESETS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

const DEFAULT_ALLOWED_BLOCKS: [&str; 7] = [
    "minecraft:bedrock",
    "minecraft:stone",
    "minecraft:cobblestone",
    "minecraft:dirt",
    "minecraft:grass",
    "minecraft:double_stone_slab",
    "minecraft:netherrack",
];

const DEFAULT_FIRST_DIMENSION_ID: i32 = 180;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Presets offered when a new dimension is created.
    pub default_presets: Vec<String>,
    /// Materials user-authored presets may use. These are placed by world
    /// generation, so players get them in unlimited quantity.
    pub allowed_blocks: Vec<String>,
    /// Biomes a dimension may be set to.
    pub allowed_biomes: Vec<String>,
    /// First id handed to a newly created dimension.
    pub first_dimension_id: i32,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            default_presets: BUILTIN_PRESETS.iter().map(|p| p.to_string()).collect(),
            allowed_blocks: DEFAULT_ALLOWED_BLOCKS.iter().map(|b| b.to_string()).collect(),
            allowed_biomes: Vec::new(),
            first_dimension_id: DEFAULT_FIRST_DIMENSION_ID,
        }
    }
}

impl ServerSettings {
    /// Parse settings from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, SettingsError> {
        let mut settings: Self = serde_yaml::from_str(text)?;
        settings.normalize();
        Ok(settings)
    }

    /// Load settings from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_yaml_str(&text)?;
        tracing::info!(
            path = %path.as_ref().display(),
            allowed_blocks = settings.allowed_blocks.len(),
            "settings loaded"
        );
        Ok(settings)
    }

    /// Write settings as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        std::fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    pub fn first_dimension_id(&self) -> DimensionId {
        DimensionId(self.first_dimension_id)
    }

    /// The allow-lists an authority publishes.
    pub fn allow_lists(&self) -> AllowLists {
        AllowLists::new(
            self.allowed_blocks.iter().cloned().collect(),
            self.allowed_biomes.iter().cloned().collect(),
        )
    }

    fn normalize(&mut self) {
        self.first_dimension_id = self.first_dimension_id.max(0);
    }
}
