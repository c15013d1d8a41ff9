//! Layer presets: the text grammar for flat-world layer stacks and the
//! allow-list policy that gates user-authored presets.
//!
//! # Invariants
//! - A malformed preset parses to the empty stack; it is never a fault.
//! - Every layer count is in `1..=255`; the stack stops growing once its
//!   height passes 255.
//! - `layers_to_string(parse_layers(s))` is a fixed point after one round.

mod grammar;
mod layer;
mod policy;
mod resolver;

pub use grammar::{PresetError, layers_to_string, parse_layers, try_parse_layers};
pub use layer::{LayerRecord, LayerStack, MAX_HEIGHT, MaterialName};
pub use policy::{
    AllowList, AllowLists, BUILTIN_PRESETS, PRESET_GARDEN, PRESET_MINING, PRESET_VOID,
    is_admissible, is_admissible_with, is_builtin, is_selectable,
};
pub use resolver::{
    AnyMaterial, KnownMaterials, MaterialResolver, fallback_material, resolve_or_fallback,
};
