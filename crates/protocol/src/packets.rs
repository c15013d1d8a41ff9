use personalspace_common::{BlockPos, DimensionId};
use personalspace_kernel::DimensionConfig;
use personalspace_preset::{AllowList, AllowLists};
use serde::Serialize;

use crate::codec::{DecodeError, PacketReader, PacketWriter};
use crate::record::{read_config, write_config};

/// Message kinds, numbered as carried in the envelope tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketId {
    /// Placeholder keeping tag 0 unused.
    Reserved = 0,
    /// Authority to observer: allow-lists and every dimension config.
    WorldList = 1,
    /// Either direction: desired settings for the dimension behind a structure.
    ChangeSettings = 2,
}

impl PacketId {
    pub const fn tag(self) -> u32 {
        self as u32
    }

    pub const fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            0 => Some(Self::Reserved),
            1 => Some(Self::WorldList),
            2 => Some(Self::ChangeSettings),
            _ => None,
        }
    }
}

/// Full replicated state, as sent to observers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorldList {
    pub allow_lists: AllowLists,
    pub dimensions: Vec<(DimensionId, DimensionConfig)>,
}

/// Request to change the settings of the dimension a structure leads to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeSettings {
    /// Dimension the structure stands in.
    pub dimension: DimensionId,
    pub pos: BlockPos,
    pub desired: DimensionConfig,
}

/// A decoded message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Packet {
    Reserved,
    WorldList(WorldList),
    ChangeSettings(ChangeSettings),
    /// A tag this build does not know; decoders skip it.
    Unrecognized { tag: u32 },
}

impl Packet {
    pub fn tag(&self) -> u32 {
        match self {
            Self::Reserved => PacketId::Reserved.tag(),
            Self::WorldList(_) => PacketId::WorldList.tag(),
            Self::ChangeSettings(_) => PacketId::ChangeSettings.tag(),
            Self::Unrecognized { tag } => *tag,
        }
    }

    /// Payload bytes for this message; the envelope carries [`Packet::tag`].
    pub fn encode(&self) -> Vec<u8> {
        let mut w = PacketWriter::new();
        match self {
            Self::Reserved | Self::Unrecognized { .. } => {}
            Self::WorldList(list) => list.write(&mut w),
            Self::ChangeSettings(change) => change.write(&mut w),
        }
        w.into_bytes()
    }

    /// Decode a payload for `tag`.
    ///
    /// Unknown tags become [`Packet::Unrecognized`] and the reserved tag
    /// ignores its payload. For known tags the payload is read completely
    /// into fresh values; any error leaves nothing half-built behind.
    pub fn decode(tag: u32, payload: &[u8]) -> Result<Self, DecodeError> {
        let Some(id) = PacketId::from_tag(tag) else {
            tracing::debug!(tag, len = payload.len(), "skipping unrecognized packet tag");
            return Ok(Self::Unrecognized { tag });
        };
        let mut r = PacketReader::new(payload);
        let packet = match id {
            PacketId::Reserved => return Ok(Self::Reserved),
            PacketId::WorldList => Self::WorldList(WorldList::read(&mut r)?),
            PacketId::ChangeSettings => Self::ChangeSettings(ChangeSettings::read(&mut r)?),
        };
        r.finish()?;
        Ok(packet)
    }
}

impl WorldList {
    pub fn write(&self, w: &mut PacketWriter) {
        write_world_list(
            w,
            &self.allow_lists,
            self.dimensions.iter().map(|(dim, config)| (*dim, config)),
        );
    }

    pub fn read(r: &mut PacketReader<'_>) -> Result<Self, DecodeError> {
        let materials = read_allow_list(r)?;
        let biomes = read_allow_list(r)?;
        // id varint + sky + brightness + flags + layer count
        let count = r.read_count(5)?;
        let mut dimensions = Vec::with_capacity(count);
        for _ in 0..count {
            let dim = DimensionId(r.read_var_i32()?);
            dimensions.push((dim, read_config(r)?));
        }
        Ok(Self {
            allow_lists: AllowLists::new(materials, biomes),
            dimensions,
        })
    }
}

/// Write a world list straight from borrowed parts, without collecting the
/// configs first.
pub fn write_world_list<'a>(
    w: &mut PacketWriter,
    allow_lists: &AllowLists,
    dimensions: impl ExactSizeIterator<Item = (DimensionId, &'a DimensionConfig)>,
) {
    write_allow_list(w, &allow_lists.materials);
    write_allow_list(w, &allow_lists.biomes);
    w.write_count(dimensions.len());
    for (dim, config) in dimensions {
        w.write_var_i32(dim.0);
        write_config(w, config);
    }
}

impl ChangeSettings {
    pub fn new(dimension: DimensionId, pos: BlockPos, desired: DimensionConfig) -> Self {
        Self {
            dimension,
            pos,
            desired,
        }
    }

    pub fn write(&self, w: &mut PacketWriter) {
        w.write_var_i32(self.dimension.0);
        w.write_var_i32(self.pos.x);
        w.write_var_i32(self.pos.y);
        w.write_var_i32(self.pos.z);
        write_config(w, &self.desired);
    }

    pub fn read(r: &mut PacketReader<'_>) -> Result<Self, DecodeError> {
        let dimension = DimensionId(r.read_var_i32()?);
        let x = r.read_var_i32()?;
        let y = r.read_var_i32()?;
        let z = r.read_var_i32()?;
        let desired = read_config(r)?;
        Ok(Self::new(dimension, BlockPos::new(x, y, z), desired))
    }
}

fn write_allow_list(w: &mut PacketWriter, list: &AllowList) {
    w.write_count(list.len());
    for entry in list.entries() {
        w.write_string(entry);
    }
}

fn read_allow_list(r: &mut PacketReader<'_>) -> Result<AllowList, DecodeError> {
    let count = r.read_count(1)?;
    let mut list = AllowList::new();
    for _ in 0..count {
        list.insert(r.read_string()?);
    }
    Ok(list)
}
