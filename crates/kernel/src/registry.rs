use parking_lot::RwLock;
use personalspace_common::DimensionId;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::dimension::DimensionConfig;

type Entries = BTreeMap<DimensionId, Arc<DimensionConfig>>;

/// Which configuration applies to which dimension.
///
/// The map is published behind an `Arc`: readers take the lock only long
/// enough to clone a pointer, writers either mutate the map they exclusively
/// own or build a fresh one and swap it in. A reader therefore always sees a
/// whole map from before or after a write, and configs are never edited in
/// place once published.
#[derive(Debug, Default)]
pub struct Registry {
    current: RwLock<Arc<Entries>>,
}

/// Immutable point-in-time view of a [`Registry`].
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    entries: Arc<Entries>,
}

impl RegistrySnapshot {
    pub fn get(&self, dim: DimensionId) -> Option<&Arc<DimensionConfig>> {
        self.entries.get(&dim)
    }

    /// Entries in ascending dimension id order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (DimensionId, &Arc<DimensionConfig>)> {
        self.entries.iter().map(|(dim, config)| (*dim, config))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Config currently registered for `dim`.
    pub fn get(&self, dim: DimensionId) -> Option<Arc<DimensionConfig>> {
        self.current.read().get(&dim).cloned()
    }

    pub fn contains(&self, dim: DimensionId) -> bool {
        self.current.read().contains_key(&dim)
    }

    pub fn len(&self) -> usize {
        self.current.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.read().is_empty()
    }

    /// Consistent view of every entry. Later writes do not affect it.
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            entries: Arc::clone(&*self.current.read()),
        }
    }

    /// Every `(id, config)` pair in ascending id order, from one snapshot.
    pub fn snapshot_all(&self) -> Vec<(DimensionId, Arc<DimensionConfig>)> {
        self.snapshot()
            .iter()
            .map(|(dim, config)| (dim, Arc::clone(config)))
            .collect()
    }

    /// Insert or replace the config for `dim`. Returns the previous one.
    pub fn register(
        &self,
        dim: DimensionId,
        config: DimensionConfig,
    ) -> Option<Arc<DimensionConfig>> {
        let config = Arc::new(config);
        let mut current = self.current.write();
        Arc::make_mut(&mut *current).insert(dim, config)
    }

    /// Insert or replace several configs in one step; ids not mentioned keep
    /// their entries.
    pub fn register_all(&self, entries: impl IntoIterator<Item = (DimensionId, DimensionConfig)>) {
        let staged: Vec<_> = entries
            .into_iter()
            .map(|(dim, config)| (dim, Arc::new(config)))
            .collect();
        let mut current = self.current.write();
        Arc::make_mut(&mut *current).extend(staged);
    }

    /// Install a whole new set of entries, discarding the old set.
    pub fn replace_all(&self, entries: impl IntoIterator<Item = (DimensionId, DimensionConfig)>) {
        let fresh: Entries = entries
            .into_iter()
            .map(|(dim, config)| (dim, Arc::new(config)))
            .collect();
        *self.current.write() = Arc::new(fresh);
    }

    /// Copy the config for `dim`, let `edit` change the copy, then publish
    /// it. Returns the published config, or `None` if `dim` has no entry.
    pub fn update(
        &self,
        dim: DimensionId,
        edit: impl FnOnce(&mut DimensionConfig),
    ) -> Option<Arc<DimensionConfig>> {
        let mut current = self.current.write();
        let mut config = DimensionConfig::clone(current.get(&dim)?);
        edit(&mut config);
        let config = Arc::new(config);
        Arc::make_mut(&mut *current).insert(dim, Arc::clone(&config));
        Some(config)
    }

    /// Like [`Registry::update`], but an absent `dim` starts from
    /// [`DimensionConfig::new`]. Lookup, edit and publish share one write
    /// section; keep `edit` free of host callbacks.
    pub fn upsert_with(
        &self,
        dim: DimensionId,
        edit: impl FnOnce(&mut DimensionConfig),
    ) -> Arc<DimensionConfig> {
        let mut current = self.current.write();
        let mut config = current
            .get(&dim)
            .map(|existing| DimensionConfig::clone(existing))
            .unwrap_or_default();
        edit(&mut config);
        let config = Arc::new(config);
        Arc::make_mut(&mut *current).insert(dim, Arc::clone(&config));
        config
    }

    /// Smallest id at or above `first` with no entry.
    pub fn next_free_id(&self, first: DimensionId) -> DimensionId {
        let current = self.current.read();
        let mut candidate = first.0;
        for dim in current.range(first..).map(|(dim, _)| dim.0) {
            if dim != candidate {
                break;
            }
            candidate = candidate.saturating_add(1);
        }
        DimensionId(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use personalspace_preset::{AnyMaterial, PRESET_GARDEN, PRESET_MINING};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    fn config(sky: i64) -> DimensionConfig {
        let mut c = DimensionConfig::new();
        c.set_sky_color(sky);
        c
    }

    #[test]
    fn register_and_get() {
        let r = Registry::new();
        assert!(r.get(DimensionId(1)).is_none());
        assert!(r.register(DimensionId(1), config(1)).is_none());
        let previous = r.register(DimensionId(1), config(2)).unwrap();
        assert_eq!(previous.sky_color(), 1);
        assert_eq!(r.get(DimensionId(1)).unwrap().sky_color(), 2);
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn snapshot_is_unaffected_by_later_writes() {
        let r = Registry::new();
        r.register(DimensionId(1), config(1));
        let snap = r.snapshot();
        r.register(DimensionId(2), config(2));
        r.replace_all([(DimensionId(3), config(3))]);
        assert_eq!(snap.len(), 1);
        assert_eq!(snap.get(DimensionId(1)).unwrap().sky_color(), 1);
        assert_eq!(r.snapshot_all().len(), 1);
        assert!(r.get(DimensionId(1)).is_none());
    }

    #[test]
    fn snapshot_all_is_ordered() {
        let r = Registry::new();
        for id in [5, -2, 9, 0] {
            r.register(DimensionId(id), config(id.into()));
        }
        let ids: Vec<i32> = r.snapshot_all().iter().map(|(d, _)| d.0).collect();
        assert_eq!(ids, vec![-2, 0, 5, 9]);
    }

    #[test]
    fn register_all_keeps_other_ids() {
        let r = Registry::new();
        r.register(DimensionId(1), config(1));
        r.register_all([(DimensionId(2), config(2)), (DimensionId(1), config(10))]);
        assert_eq!(r.len(), 2);
        assert_eq!(r.get(DimensionId(1)).unwrap().sky_color(), 10);
    }

    #[test]
    fn update_publishes_a_copy() {
        let r = Registry::new();
        r.register(DimensionId(4), config(1));
        let before = r.get(DimensionId(4)).unwrap();
        let after = r
            .update(DimensionId(4), |c| c.set_generating_trees(true))
            .unwrap();
        assert!(!before.generating_trees());
        assert!(after.generating_trees());
        assert!(r.update(DimensionId(5), |_| {}).is_none());
    }

    #[test]
    fn upsert_with_edits_or_creates() {
        let r = Registry::new();
        r.register(DimensionId(4), config(7));
        let edited = r.upsert_with(DimensionId(4), |c| c.set_generating_meteors(true));
        assert_eq!(edited.sky_color(), 7);
        assert!(edited.generating_meteors());

        let created = r.upsert_with(DimensionId(5), |c| c.set_sky_color(3));
        assert_eq!(created.sky_color(), 3);
        assert_eq!(created.star_brightness(), DimensionConfig::new().star_brightness());
        assert_eq!(r.get(DimensionId(5)).unwrap(), created);
        assert_eq!(r.len(), 2);
    }

    #[test]
    fn next_free_id_skips_taken() {
        let r = Registry::new();
        assert_eq!(r.next_free_id(DimensionId(180)), DimensionId(180));
        r.register(DimensionId(180), config(0));
        r.register(DimensionId(181), config(0));
        r.register(DimensionId(183), config(0));
        r.register(DimensionId(10), config(0));
        assert_eq!(r.next_free_id(DimensionId(180)), DimensionId(182));
    }

    #[test]
    fn concurrent_readers_see_whole_configs() {
        let r = Arc::new(Registry::new());
        let garden = DimensionConfig::from_preset(PRESET_GARDEN, &AnyMaterial);
        let mut mining = DimensionConfig::from_preset(PRESET_MINING, &AnyMaterial);
        mining.set_sky_color(0);
        mining.set_generating_trees(true);
        r.register(DimensionId(1), garden.clone());

        let done = Arc::new(AtomicBool::new(false));
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let r = Arc::clone(&r);
                let done = Arc::clone(&done);
                let (garden, mining) = (garden.clone(), mining.clone());
                thread::spawn(move || {
                    while !done.load(Ordering::Relaxed) {
                        let seen = r.get(DimensionId(1)).unwrap();
                        assert!(*seen == garden || *seen == mining);
                        let snap = r.snapshot();
                        let one = snap.get(DimensionId(1)).unwrap();
                        if let Some(two) = snap.get(DimensionId(2)) {
                            // both ids come from the same replace
                            assert_eq!(one.sky_color(), two.sky_color());
                        }
                    }
                })
            })
            .collect();

        for i in 0..500 {
            let next = if i % 2 == 0 { &mining } else { &garden };
            r.replace_all([
                (DimensionId(1), next.clone()),
                (DimensionId(2), next.clone()),
            ]);
        }
        done.store(true, Ordering::Relaxed);
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
