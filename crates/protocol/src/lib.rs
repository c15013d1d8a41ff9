//! Replication protocol between the authority and its observers.
//!
//! Messages travel inside an envelope owned by the transport, which carries a
//! numeric tag (see [`PacketId`]) and the payload bytes. This crate encodes and
//! decodes payloads and applies them to a [`ReplicatedState`].
//!
//! # Invariants
//! - A payload is decoded completely before anything is published; a bad
//!   payload changes nothing.
//! - Decoded configs are clamped exactly as local mutators clamp them.
//! - A world list is encoded from one registry snapshot.
//!
//! [`ReplicatedState`]: personalspace_kernel::ReplicatedState

pub mod codec;
pub mod handler;
pub mod packets;
pub mod record;
pub mod snapshot;

pub use codec::{DecodeError, MAX_STRING_LEN, MAX_VARINT_LEN, PacketReader, PacketWriter};
pub use handler::{Authority, ChangeOutcome, DropReason, Observer, StructureRef, WorldAccess};
pub use packets::{ChangeSettings, Packet, PacketId, WorldList, write_world_list};
pub use record::{read_config, write_config};
pub use snapshot::encode_world_list;
