//! Applying received messages to replicated state.
//!
//! The transport demultiplexes the channel and calls [`Observer::handle`] or
//! [`Authority::handle`] with the envelope tag and payload. Handlers never
//! fail the channel: a bad payload aborts that one message only.

use personalspace_common::{BlockPos, DimensionId, RequesterId};
use personalspace_kernel::{DimensionConfig, ReplicatedState};
use personalspace_preset::{MaterialResolver, parse_layers};

use crate::codec::DecodeError;
use crate::packets::{ChangeSettings, Packet};
use crate::snapshot::encode_world_list;

/// A structure found at a coordinate, naming the dimension whose settings it
/// controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructureRef {
    pub target: DimensionId,
}

/// Host-world queries the authority needs to vet a change request.
pub trait WorldAccess {
    /// Dimension the requester currently stands in, if they are online.
    fn requester_dimension(&self, requester: RequesterId) -> Option<DimensionId>;

    /// Settings structure at `pos` in `dim`, if one is there right now.
    fn find_structure_at(&self, dim: DimensionId, pos: BlockPos) -> Option<StructureRef>;

    /// Ownership check: may `requester` change what `structure` controls.
    fn may_modify(&self, requester: RequesterId, structure: &StructureRef) -> bool;
}

/// Why a change request was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The requester is not in the dimension the request names.
    WrongDimension,
    /// Nothing controls settings at those coordinates any more.
    NoStructure,
    Unauthorized,
    /// The desired layers fail the allow-list.
    Disallowed,
}

/// What an authority did with a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// Settings were published; `broadcast` is a fresh world-list payload.
    Applied {
        target: DimensionId,
        broadcast: Vec<u8>,
    },
    Dropped(DropReason),
    /// Not a message the authority acts on.
    Ignored,
}

/// Receiving side of an observer.
pub struct Observer<'a> {
    state: &'a ReplicatedState,
}

impl<'a> Observer<'a> {
    pub fn new(state: &'a ReplicatedState) -> Self {
        Self { state }
    }

    /// Decode and apply one message. Only world lists change observer state.
    pub fn handle(&self, tag: u32, payload: &[u8]) -> Result<(), DecodeError> {
        let packet = Packet::decode(tag, payload).inspect_err(|err| {
            tracing::warn!(tag, %err, "dropping undecodable packet");
        })?;
        match packet {
            Packet::WorldList(list) => list.install(self.state),
            Packet::ChangeSettings(_) | Packet::Reserved | Packet::Unrecognized { .. } => {}
        }
        Ok(())
    }

    /// Payload asking the authority to change the settings behind the
    /// structure at `pos`.
    pub fn request_change(dim: DimensionId, pos: BlockPos, desired: DimensionConfig) -> Vec<u8> {
        Packet::ChangeSettings(ChangeSettings::new(dim, pos, desired)).encode()
    }
}

/// Receiving side of the authority.
pub struct Authority<'a> {
    state: &'a ReplicatedState,
    world: &'a dyn WorldAccess,
    resolver: &'a dyn MaterialResolver,
}

impl<'a> Authority<'a> {
    pub fn new(
        state: &'a ReplicatedState,
        world: &'a dyn WorldAccess,
        resolver: &'a dyn MaterialResolver,
    ) -> Self {
        Self {
            state,
            world,
            resolver,
        }
    }

    /// Decode and apply one message from `requester`.
    pub fn handle(
        &self,
        requester: RequesterId,
        tag: u32,
        payload: &[u8],
    ) -> Result<ChangeOutcome, DecodeError> {
        let packet = Packet::decode(tag, payload).inspect_err(|err| {
            tracing::warn!(tag, requester = requester.0, %err, "dropping undecodable packet");
        })?;
        Ok(match packet {
            Packet::ChangeSettings(change) => self.apply_change(requester, change),
            Packet::WorldList(_) | Packet::Reserved | Packet::Unrecognized { .. } => {
                ChangeOutcome::Ignored
            }
        })
    }

    /// Vet and apply a change request.
    ///
    /// The requester must stand in the named dimension, a structure must
    /// still be at the coordinates, the requester must own it and the desired
    /// layers must pass the allow-list. Otherwise the request is dropped.
    pub fn apply_change(&self, requester: RequesterId, change: ChangeSettings) -> ChangeOutcome {
        match self.vet(requester, &change) {
            Ok(structure) => {
                let target = structure.target;
                self.publish(target, &change.desired);
                tracing::info!(requester = requester.0, %target, "dimension settings changed");
                ChangeOutcome::Applied {
                    target,
                    broadcast: encode_world_list(self.state),
                }
            }
            Err(reason) => {
                tracing::debug!(
                    requester = requester.0,
                    dim = %change.dimension,
                    pos = %change.pos,
                    ?reason,
                    "dropping change request"
                );
                ChangeOutcome::Dropped(reason)
            }
        }
    }

    fn vet(&self, requester: RequesterId, change: &ChangeSettings) -> Result<StructureRef, DropReason> {
        if self.world.requester_dimension(requester) != Some(change.dimension) {
            return Err(DropReason::WrongDimension);
        }
        let structure = self
            .world
            .find_structure_at(change.dimension, change.pos)
            .ok_or(DropReason::NoStructure)?;
        if !self.world.may_modify(requester, &structure) {
            return Err(DropReason::Unauthorized);
        }
        let preset = change.desired.layers_as_text();
        if !self.state.allow_lists.current().admits(&preset, self.resolver) {
            return Err(DropReason::Disallowed);
        }
        Ok(structure)
    }

    fn publish(&self, target: DimensionId, desired: &DimensionConfig) {
        // resolve before taking the registry lock
        let layers = parse_layers(&desired.layers_as_text(), self.resolver);
        self.state.registry.upsert_with(target, |config| {
            config.apply_settings(desired);
            config.set_layer_stack(layers);
        });
    }
}
