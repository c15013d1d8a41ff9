//! Wire form of one [`DimensionConfig`].
//!
//! ```text
//! varint  sky_color
//! varint  star_brightness as IEEE-754 single bits
//! u8      flags: bit0 vegetation, bit1 trees, bit2 meteors
//! varint  layer_count
//! layer_count x (string material, varint height)
//! ```
//!
//! The save-location override stays on the authority and is not sent.

use personalspace_kernel::DimensionConfig;
use personalspace_preset::{LayerRecord, LayerStack, MaterialName};

use crate::codec::{DecodeError, PacketReader, PacketWriter};

const FLAG_VEGETATION: u8 = 1 << 0;
const FLAG_TREES: u8 = 1 << 1;
const FLAG_METEORS: u8 = 1 << 2;

/// Smallest encoded layer: empty string length plus a one-byte height.
const MIN_LAYER_LEN: usize = 2;

pub fn write_config(w: &mut PacketWriter, config: &DimensionConfig) {
    w.write_var_u32(config.sky_color());
    w.write_var_u32(config.star_brightness().to_bits());

    let mut flags = 0;
    if config.generating_vegetation() {
        flags |= FLAG_VEGETATION;
    }
    if config.generating_trees() {
        flags |= FLAG_TREES;
    }
    if config.generating_meteors() {
        flags |= FLAG_METEORS;
    }
    w.write_u8(flags);

    let layers = config.layers();
    w.write_count(layers.len());
    for layer in layers {
        w.write_string(&layer.material().to_string());
        w.write_var_u32(layer.count());
    }
}

/// Decode one record into a fresh config. Values are clamped exactly as the
/// config's own mutators clamp them; unknown flag bits are ignored.
pub fn read_config(r: &mut PacketReader<'_>) -> Result<DimensionConfig, DecodeError> {
    let mut config = DimensionConfig::new();
    config.set_sky_color(i64::from(r.read_var_u32()?));
    config.set_star_brightness(f32::from_bits(r.read_var_u32()?));

    let flags = r.read_u8()?;
    config.set_generating_vegetation(flags & FLAG_VEGETATION != 0);
    config.set_generating_trees(flags & FLAG_TREES != 0);
    config.set_generating_meteors(flags & FLAG_METEORS != 0);

    let count = r.read_count(MIN_LAYER_LEN)?;
    let mut layers = LayerStack::new();
    for _ in 0..count {
        let identifier = r.read_string()?;
        let height = r.read_var_u32()?;
        let material =
            MaterialName::parse(&identifier).ok_or(DecodeError::InvalidMaterial(identifier))?;
        // keep reading past a full stack so the message stays aligned
        layers.push(LayerRecord::new(material, height));
    }
    config.set_layer_stack(layers);

    Ok(config)
}
