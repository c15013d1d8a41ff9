use personalspace_kernel::{DimensionConfig, ReplicatedState};

use crate::codec::PacketWriter;
use crate::packets::{WorldList, write_world_list};

impl WorldList {
    /// Copy the allow-lists and every registered config out of `state`.
    ///
    /// Both come from one immutable view each, so a concurrent
    /// `replace_all` cannot interleave with the copy.
    pub fn capture(state: &ReplicatedState) -> Self {
        let allow_lists = state.allow_lists.current();
        let registry = state.registry.snapshot();
        Self {
            allow_lists: (*allow_lists).clone(),
            dimensions: registry
                .iter()
                .map(|(dim, config)| (dim, DimensionConfig::clone(config)))
                .collect(),
        }
    }

    /// Publish a fully decoded list on an observer.
    ///
    /// The allow-lists are swapped as one unit and every config is registered
    /// in a single registry write. Dimensions the list does not mention keep
    /// their entries; retiring them is the host's decision.
    ///
    /// The two publications are separate: the allow-lists go first, so a
    /// concurrent reader may briefly pair the new allow-lists with the old
    /// registry. Each side on its own is always whole.
    pub fn install(self, state: &ReplicatedState) {
        let dimensions = self.dimensions.len();
        let materials = self.allow_lists.materials.len();
        let biomes = self.allow_lists.biomes.len();
        state.allow_lists.replace(self.allow_lists);
        state.registry.register_all(self.dimensions);
        tracing::info!(dimensions, materials, biomes, "world list installed");
    }
}

/// Encode the authority's current state as a world-list payload, reading the
/// registry through one snapshot.
pub fn encode_world_list(state: &ReplicatedState) -> Vec<u8> {
    let allow_lists = state.allow_lists.current();
    let registry = state.registry.snapshot();
    let mut w = PacketWriter::new();
    write_world_list(
        &mut w,
        &allow_lists,
        registry.iter().map(|(dim, config)| (dim, &**config)),
    );
    w.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packets::Packet;
    use personalspace_common::DimensionId;
    use personalspace_kernel::ServerSettings;
    use personalspace_preset::{AnyMaterial, PRESET_GARDEN, PRESET_MINING};
    use std::sync::Arc;
    use std::thread;

    fn authority() -> ReplicatedState {
        let state = ReplicatedState::with_allow_lists(ServerSettings::default().allow_lists());
        state.registry.register(
            DimensionId(180),
            DimensionConfig::from_preset(PRESET_GARDEN, &AnyMaterial),
        );
        state.registry.register(
            DimensionId(181),
            DimensionConfig::from_preset(PRESET_MINING, &AnyMaterial),
        );
        state
    }

    #[test]
    fn encode_matches_captured_list() {
        let state = authority();
        let direct = encode_world_list(&state);
        let captured = Packet::WorldList(WorldList::capture(&state)).encode();
        assert_eq!(direct, captured);
    }

    #[test]
    fn authority_to_observer() {
        let authority = authority();
        let observer = ReplicatedState::new();
        observer
            .registry
            .register(DimensionId(7), DimensionConfig::new());

        let payload = encode_world_list(&authority);
        let Packet::WorldList(list) = Packet::decode(1, &payload).unwrap() else {
            panic!("expected a world list");
        };
        list.install(&observer);

        assert_eq!(*observer.allow_lists.current(), *authority.allow_lists.current());
        for (dim, config) in authority.registry.snapshot_all() {
            assert_eq!(observer.registry.get(dim).unwrap(), config);
        }
        assert!(observer.registry.contains(DimensionId(7)));
    }

    #[test]
    fn install_leaves_earlier_snapshots_alone() {
        let authority = authority();
        let observer = ReplicatedState::new();
        let list = WorldList::capture(&authority);
        let before = observer.registry.snapshot();
        list.install(&observer);

        assert!(before.is_empty());
        assert_eq!(*observer.allow_lists.current(), *authority.allow_lists.current());
        assert_eq!(observer.registry.len(), 2);
    }

    #[test]
    fn encoding_during_replace_sees_one_generation() {
        let state = Arc::new(ReplicatedState::new());
        let gen_config = |sky: i64| {
            let mut c = DimensionConfig::new();
            c.set_sky_color(sky);
            c
        };
        state
            .registry
            .replace_all((0..8).map(|id| (DimensionId(id), gen_config(0))));

        let writer = {
            let state = Arc::clone(&state);
            thread::spawn(move || {
                for round in 1..200 {
                    state
                        .registry
                        .replace_all((0..8).map(|id| (DimensionId(id), gen_config(round))));
                }
            })
        };

        for _ in 0..200 {
            let Packet::WorldList(list) = Packet::decode(1, &encode_world_list(&state)).unwrap()
            else {
                panic!("expected a world list");
            };
            let first = list.dimensions[0].1.sky_color();
            assert!(list.dimensions.iter().all(|(_, c)| c.sky_color() == first));
        }
        writer.join().unwrap();
    }
}
