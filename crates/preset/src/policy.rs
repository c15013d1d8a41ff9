use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::grammar::parse_layers;
use crate::resolver::{AnyMaterial, MaterialResolver};

/// Built-in preset: no layers at all.
pub const PRESET_VOID: &str = "";
/// Built-in preset: a thin grass-topped floor.
pub const PRESET_GARDEN: &str = "minecraft:bedrock;minecraft:dirt*3;minecraft:grass";
/// Built-in preset: a deep stone column for mining.
pub const PRESET_MINING: &str =
    "minecraft:bedrock*4;minecraft:stone*58;minecraft:dirt;minecraft:grass";

/// The three trusted presets, in menu order.
pub const BUILTIN_PRESETS: [&str; 3] = [PRESET_VOID, PRESET_GARDEN, PRESET_MINING];

/// True for the exact text of a built-in preset.
pub fn is_builtin(preset: &str) -> bool {
    BUILTIN_PRESETS.contains(&preset)
}

/// Ordered set of identifiers. Keeps insertion order for replication and a
/// hash index for membership tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct AllowList {
    entries: Vec<String>,
    index: HashSet<String>,
}

impl AllowList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an identifier. Duplicates are ignored.
    pub fn insert(&mut self, entry: impl Into<String>) -> bool {
        let entry = entry.into();
        if !self.index.insert(entry.clone()) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.index.contains(entry)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for AllowList {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for AllowList {}

impl<S: Into<String>> FromIterator<S> for AllowList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = Self::new();
        for entry in iter {
            list.insert(entry);
        }
        list
    }
}

impl From<Vec<String>> for AllowList {
    fn from(entries: Vec<String>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<AllowList> for Vec<String> {
    fn from(list: AllowList) -> Self {
        list.entries
    }
}

/// The administrator-controlled filters replicated alongside dimension data.
///
/// Only biomes are carried for observers; admissibility looks at materials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowLists {
    pub materials: AllowList,
    pub biomes: AllowList,
}

impl AllowLists {
    pub fn new(materials: AllowList, biomes: AllowList) -> Self {
        Self { materials, biomes }
    }

    /// See [`is_selectable`].
    pub fn admits(&self, preset: &str, resolver: &dyn MaterialResolver) -> bool {
        is_selectable(preset, &self.materials, resolver)
    }
}

/// Whether a preset passes the allow-list, taking material identifiers as
/// written.
///
/// Built-in presets are not exempt here: the garden preset fails a list
/// without `minecraft:grass`. Use [`is_selectable`] to vet a user's choice.
pub fn is_admissible(preset: &str, allowed: &AllowList) -> bool {
    is_admissible_with(preset, allowed, &AnyMaterial)
}

/// Whether every resolved material of a preset is on `allowed`.
///
/// The blank preset always passes. A non-blank preset that parses to nothing
/// is malformed and rejected. One disallowed material rejects the preset.
/// Like [`is_admissible`], built-ins get no bypass.
pub fn is_admissible_with(
    preset: &str,
    allowed: &AllowList,
    resolver: &dyn MaterialResolver,
) -> bool {
    let layers = parse_layers(preset, resolver);
    if layers.is_empty() {
        return preset.chars().all(char::is_whitespace);
    }
    layers
        .iter()
        .all(|layer| allowed.contains(&layer.material().to_string()))
}

/// Whether a user may pick this preset: built-in presets are trusted,
/// anything else goes through [`is_admissible_with`].
pub fn is_selectable(preset: &str, allowed: &AllowList, resolver: &dyn MaterialResolver) -> bool {
    is_builtin(preset) || is_admissible_with(preset, allowed, resolver)
}
