use personalspace_common::DimensionId;
use personalspace_preset::{
    LayerStack, MaterialResolver, PRESET_GARDEN, PRESET_MINING, PRESET_VOID, layers_to_string,
    parse_layers,
};
use serde::Serialize;

/// Sky color of a freshly created dimension.
pub const DEFAULT_SKY_COLOR: u32 = 0xC0_D8FF;
/// Largest 24-bit RGB value.
pub const MAX_SKY_COLOR: u32 = 0xFF_FFFF;

/// Folder-name prefix used by worlds converted from the legacy mod.
const LEGACY_PREFIX: &str = "UW_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LegacyKind {
    Mining,
    Garden,
    Void,
}

/// World generation settings for one dimension.
///
/// # Invariants
/// - `sky_color` is within `0..=0xFFFFFF`.
/// - `star_brightness` is within `0.0..=1.0` and never NaN.
///
/// Every mutator clamps its input, so no instance ever holds an out-of-range
/// value. Presets are stored as given; callers handling user input must run
/// the allow-list policy first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionConfig {
    save_dir_override: Option<String>,
    sky_color: u32,
    star_brightness: f32,
    layers: LayerStack,
    generating_vegetation: bool,
    generating_trees: bool,
    generating_meteors: bool,
}

impl Default for DimensionConfig {
    fn default() -> Self {
        Self {
            save_dir_override: None,
            sky_color: DEFAULT_SKY_COLOR,
            star_brightness: 1.0,
            layers: LayerStack::new(),
            generating_vegetation: false,
            generating_trees: false,
            generating_meteors: false,
        }
    }
}

impl DimensionConfig {
    /// Default settings with a void layer stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Default settings with layers parsed from `preset`.
    pub fn from_preset(preset: &str, resolver: &dyn MaterialResolver) -> Self {
        let mut config = Self::default();
        config.set_layers(preset, resolver);
        config
    }

    /// Infer settings for a world folder left behind by the legacy mod.
    ///
    /// Recognises `UW_MINING_<id>`, `UW_GARDEN_<id>` and `UW_VOID_<id>` (the
    /// `UW_` prefix is optional). Returns the config and the dimension id the
    /// world lived in, or `None` if the name is not a legacy folder. A
    /// recognised prefix with an unparsable id is logged and yields `None`.
    pub fn from_legacy_folder(
        name: &str,
        resolver: &dyn MaterialResolver,
    ) -> Option<(Self, DimensionId)> {
        let rest = name.strip_prefix(LEGACY_PREFIX).unwrap_or(name);
        let (kind, id_text) = [
            ("MINING_", LegacyKind::Mining),
            ("GARDEN_", LegacyKind::Garden),
            ("VOID_", LegacyKind::Void),
        ]
        .into_iter()
        .find_map(|(prefix, kind)| rest.strip_prefix(prefix).map(|id| (kind, id)))?;

        let dim = match id_text.parse::<i32>() {
            Ok(id) => DimensionId(id),
            Err(err) => {
                tracing::warn!(folder = name, %err, "couldn't parse dimension id from folder name");
                return None;
            }
        };

        let mut config = Self {
            save_dir_override: Some(name.to_string()),
            ..Self::default()
        };
        match kind {
            LegacyKind::Mining => config.set_layers(PRESET_MINING, resolver),
            LegacyKind::Garden => {
                config.set_layers(PRESET_GARDEN, resolver);
                config.generating_vegetation = true;
            }
            LegacyKind::Void => {
                config.set_layers(PRESET_VOID, resolver);
                config.sky_color = 0;
                config.star_brightness = 0.0;
            }
        }
        Some((config, dim))
    }

    /// Folder the dimension is saved under: the override if set, otherwise
    /// `PERSONAL_DIM_<id>`.
    pub fn save_location(&self, dim: DimensionId) -> String {
        match self.save_dir_override.as_deref() {
            Some(dir) if !dir.is_empty() => dir.to_string(),
            _ => format!("PERSONAL_DIM_{dim}"),
        }
    }

    pub fn save_dir_override(&self) -> Option<&str> {
        self.save_dir_override.as_deref()
    }

    pub fn set_save_dir_override(&mut self, dir: Option<String>) {
        self.save_dir_override = dir.filter(|d| !d.is_empty());
    }

    pub fn sky_color(&self) -> u32 {
        self.sky_color
    }

    /// Set the sky color, clamped into `0..=0xFFFFFF`.
    pub fn set_sky_color(&mut self, color: i64) {
        self.sky_color = color.clamp(0, i64::from(MAX_SKY_COLOR)) as u32;
    }

    pub fn star_brightness(&self) -> f32 {
        self.star_brightness
    }

    /// Set the star brightness, clamped into `0.0..=1.0`. NaN becomes `0.0`.
    pub fn set_star_brightness(&mut self, brightness: f32) {
        self.star_brightness = if brightness.is_nan() {
            0.0
        } else {
            brightness.clamp(0.0, 1.0)
        };
    }

    pub fn generating_vegetation(&self) -> bool {
        self.generating_vegetation
    }

    pub fn set_generating_vegetation(&mut self, enabled: bool) {
        self.generating_vegetation = enabled;
    }

    pub fn generating_trees(&self) -> bool {
        self.generating_trees
    }

    pub fn set_generating_trees(&mut self, enabled: bool) {
        self.generating_trees = enabled;
    }

    /// Whether mod-provided meteor structures are generated.
    pub fn generating_meteors(&self) -> bool {
        self.generating_meteors
    }

    pub fn set_generating_meteors(&mut self, enabled: bool) {
        self.generating_meteors = enabled;
    }

    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    /// Replace the layers with `preset`. Does not check the allow-list.
    pub fn set_layers(&mut self, preset: &str, resolver: &dyn MaterialResolver) {
        self.layers = parse_layers(preset, resolver);
    }

    pub fn set_layer_stack(&mut self, layers: LayerStack) {
        self.layers = layers;
    }

    /// Height of the topmost layer, within `0..=255`.
    pub fn ground_level(&self) -> u32 {
        self.layers.ground_level()
    }

    pub fn layers_as_text(&self) -> String {
        layers_to_string(&self.layers)
    }

    /// Take every generation setting from `desired`, keeping this config's
    /// save location.
    pub fn apply_settings(&mut self, desired: &DimensionConfig) {
        self.set_sky_color(i64::from(desired.sky_color));
        self.set_star_brightness(desired.star_brightness);
        self.layers = desired.layers.clone();
        self.generating_vegetation = desired.generating_vegetation;
        self.generating_trees = desired.generating_trees;
        self.generating_meteors = desired.generating_meteors;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use personalspace_preset::AnyMaterial;

    #[test]
    fn defaults() {
        let c = DimensionConfig::new();
        assert_eq!(c.sky_color(), DEFAULT_SKY_COLOR);
        assert_eq!(c.star_brightness(), 1.0);
        assert!(c.layers().is_empty());
        assert_eq!(c.ground_level(), 0);
        assert!(!c.generating_vegetation() && !c.generating_trees() && !c.generating_meteors());
    }

    #[test]
    fn star_brightness_is_clamped() {
        let mut c = DimensionConfig::new();
        c.set_star_brightness(-5.0);
        assert_eq!(c.star_brightness(), 0.0);
        c.set_star_brightness(10.0);
        assert_eq!(c.star_brightness(), 1.0);
        c.set_star_brightness(0.25);
        assert_eq!(c.star_brightness(), 0.25);
        c.set_star_brightness(f32::NAN);
        assert_eq!(c.star_brightness(), 0.0);
    }

    #[test]
    fn sky_color_is_clamped() {
        let mut c = DimensionConfig::new();
        c.set_sky_color(-1);
        assert_eq!(c.sky_color(), 0);
        c.set_sky_color(0x1FF_FFFF);
        assert_eq!(c.sky_color(), 0xFF_FFFF);
        c.set_sky_color(0x12_3456);
        assert_eq!(c.sky_color(), 0x12_3456);
    }

    #[test]
    fn preset_derived_queries() {
        let c = DimensionConfig::from_preset(PRESET_GARDEN, &AnyMaterial);
        assert_eq!(c.ground_level(), 5);
        assert_eq!(c.layers_as_text(), PRESET_GARDEN);

        let mining = DimensionConfig::from_preset(PRESET_MINING, &AnyMaterial);
        assert_eq!(mining.ground_level(), 64);
    }

    #[test]
    fn save_location_prefers_override() {
        let mut c = DimensionConfig::new();
        assert_eq!(c.save_location(DimensionId(180)), "PERSONAL_DIM_180");
        c.set_save_dir_override(Some("custom".into()));
        assert_eq!(c.save_location(DimensionId(180)), "custom");
        c.set_save_dir_override(Some(String::new()));
        assert_eq!(c.save_location(DimensionId(7)), "PERSONAL_DIM_7");
    }

    #[test]
    fn legacy_folders() {
        let (mining, dim) = DimensionConfig::from_legacy_folder("UW_MINING_12", &AnyMaterial).unwrap();
        assert_eq!(dim, DimensionId(12));
        assert_eq!(mining.layers_as_text(), PRESET_MINING);
        assert_eq!(mining.save_location(dim), "UW_MINING_12");
        assert_eq!(mining.sky_color(), DEFAULT_SKY_COLOR);

        let (garden, _) = DimensionConfig::from_legacy_folder("GARDEN_-3", &AnyMaterial).unwrap();
        assert!(garden.generating_vegetation());
        assert_eq!(garden.ground_level(), 5);

        let (void, dim) = DimensionConfig::from_legacy_folder("UW_VOID_40", &AnyMaterial).unwrap();
        assert_eq!(dim, DimensionId(40));
        assert!(void.layers().is_empty());
        assert_eq!(void.sky_color(), 0);
        assert_eq!(void.star_brightness(), 0.0);
    }

    #[test]
    fn unrecognised_or_bad_legacy_names() {
        assert!(DimensionConfig::from_legacy_folder("DIM-1", &AnyMaterial).is_none());
        assert!(DimensionConfig::from_legacy_folder("UW_NETHER_3", &AnyMaterial).is_none());
        assert!(DimensionConfig::from_legacy_folder("UW_MINING_abc", &AnyMaterial).is_none());
        assert!(DimensionConfig::from_legacy_folder("VOID_", &AnyMaterial).is_none());
    }

    #[test]
    fn apply_settings_keeps_save_location() {
        let (mut current, dim) =
            DimensionConfig::from_legacy_folder("UW_GARDEN_5", &AnyMaterial).unwrap();
        let mut desired = DimensionConfig::from_preset("minecraft:stone*10", &AnyMaterial);
        desired.set_sky_color(0x00_00FF);
        desired.set_generating_trees(true);
        current.apply_settings(&desired);
        assert_eq!(current.save_location(dim), "UW_GARDEN_5");
        assert_eq!(current.ground_level(), 10);
        assert_eq!(current.sky_color(), 0xFF);
        assert!(current.generating_trees());
        assert!(!current.generating_vegetation());
    }
}
