use std::collections::HashSet;

use crate::layer::MaterialName;

/// Material substituted for identifiers the resolver does not know.
pub fn fallback_material() -> MaterialName {
    MaterialName::new("minecraft", "dirt")
}

/// Maps a material identifier written in a preset to the canonical material
/// the host world generator will place.
///
/// The host runtime owns the block registry; this seam is how the grammar
/// asks it. Returning `None` makes the caller substitute
/// [`fallback_material`].
pub trait MaterialResolver {
    fn resolve(&self, name: &MaterialName) -> Option<MaterialName>;
}

/// Resolve through `resolver`, falling back to [`fallback_material`].
pub fn resolve_or_fallback(resolver: &dyn MaterialResolver, name: &MaterialName) -> MaterialName {
    match resolver.resolve(name) {
        Some(resolved) => resolved,
        None => {
            tracing::debug!(material = %name, "unknown material, substituting fallback");
            fallback_material()
        }
    }
}

/// Resolver that trusts every identifier as written.
///
/// Used on observers, which replicate whatever the authority sent.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyMaterial;

impl MaterialResolver for AnyMaterial {
    fn resolve(&self, name: &MaterialName) -> Option<MaterialName> {
        Some(name.clone())
    }
}

/// Resolver backed by a fixed set of known identifiers.
#[derive(Debug, Clone, Default)]
pub struct KnownMaterials {
    known: HashSet<MaterialName>,
}

impl KnownMaterials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: MaterialName) {
        self.known.insert(name);
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }
}

impl FromIterator<MaterialName> for KnownMaterials {
    fn from_iter<I: IntoIterator<Item = MaterialName>>(iter: I) -> Self {
        Self {
            known: iter.into_iter().collect(),
        }
    }
}

impl MaterialResolver for KnownMaterials {
    fn resolve(&self, name: &MaterialName) -> Option<MaterialName> {
        self.known.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_materials_fall_back_to_dirt() {
        let known: KnownMaterials = [MaterialName::new("minecraft", "stone")]
            .into_iter()
            .collect();
        let stone = MaterialName::new("minecraft", "stone");
        let missing = MaterialName::new("othermod", "ore");
        assert_eq!(resolve_or_fallback(&known, &stone), stone);
        assert_eq!(resolve_or_fallback(&known, &missing), fallback_material());
    }

    #[test]
    fn any_material_is_identity() {
        let name = MaterialName::new("othermod", "ore");
        assert_eq!(AnyMaterial.resolve(&name), Some(name));
    }
}
