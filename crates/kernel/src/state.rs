use personalspace_preset::AllowLists;

use crate::allow_lists::SharedAllowLists;
use crate::registry::Registry;

/// Everything one peer replicates: its dimension registry and the allow-lists.
///
/// Built once at startup and handed by reference to whichever component needs
/// it; there is no global instance.
#[derive(Debug, Default)]
pub struct ReplicatedState {
    pub registry: Registry,
    pub allow_lists: SharedAllowLists,
}

impl ReplicatedState {
    /// Empty registry and empty allow-lists, as an observer starts out.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty registry with the given allow-lists, as an authority starts out.
    pub fn with_allow_lists(lists: AllowLists) -> Self {
        Self {
            registry: Registry::new(),
            allow_lists: SharedAllowLists::new(lists),
        }
    }
}
