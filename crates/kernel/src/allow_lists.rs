use parking_lot::RwLock;
use personalspace_preset::AllowLists;
use std::sync::Arc;

/// The replicated allow-lists, swapped wholesale.
///
/// Readers get an `Arc` to one complete set; [`SharedAllowLists::replace`]
/// publishes a new set in a single pointer swap, so no reader ever sees the
/// materials of one snapshot paired with the biomes of another.
#[derive(Debug, Default)]
pub struct SharedAllowLists {
    current: RwLock<Arc<AllowLists>>,
}

impl SharedAllowLists {
    pub fn new(lists: AllowLists) -> Self {
        Self {
            current: RwLock::new(Arc::new(lists)),
        }
    }

    pub fn current(&self) -> Arc<AllowLists> {
        Arc::clone(&*self.current.read())
    }

    pub fn replace(&self, lists: AllowLists) {
        *self.current.write() = Arc::new(lists);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use personalspace_preset::AllowList;

    #[test]
    fn replace_swaps_both_lists() {
        let shared = SharedAllowLists::default();
        let before = shared.current();
        assert!(before.materials.is_empty());

        shared.replace(AllowLists::new(
            ["minecraft:dirt"].into_iter().collect(),
            ["Plains"].into_iter().collect::<AllowList>(),
        ));
        let after = shared.current();
        assert!(after.materials.contains("minecraft:dirt"));
        assert!(after.biomes.contains("Plains"));
        // earlier readers keep their set
        assert!(before.biomes.is_empty());
    }
}
