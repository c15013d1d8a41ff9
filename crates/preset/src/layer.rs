use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum world height a layer stack may fill.
pub const MAX_HEIGHT: u32 = 255;

/// A namespaced material identifier, `namespace:path` (e.g. `minecraft:dirt`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct MaterialName {
    namespace: String,
    path: String,
}

impl MaterialName {
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            path: path.into(),
        }
    }

    /// Split `namespace:path`. Returns `None` unless there are exactly two
    /// non-empty components.
    pub fn parse(identifier: &str) -> Option<Self> {
        let mut parts = identifier.split(':');
        let namespace = parts.next().filter(|s| !s.is_empty())?;
        let path = parts.next().filter(|s| !s.is_empty())?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self::new(namespace, path))
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for MaterialName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl From<MaterialName> for String {
    fn from(name: MaterialName) -> Self {
        name.to_string()
    }
}

impl TryFrom<String> for MaterialName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid material identifier `{value}`"))
    }
}

/// One horizontal band of a flat world: `count` blocks of `material`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawLayerRecord")]
pub struct LayerRecord {
    material: MaterialName,
    count: u8,
}

/// Unchecked serialized form; goes through [`LayerRecord::new`] to clamp.
#[derive(Deserialize)]
struct RawLayerRecord {
    material: MaterialName,
    count: u32,
}

impl From<RawLayerRecord> for LayerRecord {
    fn from(raw: RawLayerRecord) -> Self {
        Self::new(raw.material, raw.count)
    }
}

impl LayerRecord {
    /// Build a record, clamping `count` into `1..=255`.
    pub fn new(material: MaterialName, count: u32) -> Self {
        Self {
            material,
            count: count.clamp(1, MAX_HEIGHT) as u8,
        }
    }

    pub fn material(&self) -> &MaterialName {
        &self.material
    }

    pub fn count(&self) -> u32 {
        u32::from(self.count)
    }
}

/// Bottom-up sequence of layers.
///
/// # Invariants
/// - Every record has `count >= 1`.
/// - Once the running height exceeds [`MAX_HEIGHT`] the stack is full and
///   further pushes are dropped. The record that crossed the limit is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<LayerRecord>", into = "Vec<LayerRecord>")]
pub struct LayerStack {
    layers: Vec<LayerRecord>,
    height: u32,
}

impl LayerStack {
    /// The void stack: no layers at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record on top. Returns `false` when the stack is already full
    /// and the record was dropped.
    pub fn push(&mut self, record: LayerRecord) -> bool {
        if self.is_full() {
            return false;
        }
        self.height += record.count();
        self.layers.push(record);
        true
    }

    /// True once the running height has gone past [`MAX_HEIGHT`].
    pub fn is_full(&self) -> bool {
        self.height > MAX_HEIGHT
    }

    /// Sum of all layer counts, clamped to [`MAX_HEIGHT`].
    pub fn ground_level(&self) -> u32 {
        self.height.min(MAX_HEIGHT)
    }

    pub fn layers(&self) -> &[LayerRecord] {
        &self.layers
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LayerRecord> {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl<'a> IntoIterator for &'a LayerStack {
    type Item = &'a LayerRecord;
    type IntoIter = std::slice::Iter<'a, LayerRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}

impl FromIterator<LayerRecord> for LayerStack {
    fn from_iter<I: IntoIterator<Item = LayerRecord>>(iter: I) -> Self {
        let mut stack = Self::new();
        for record in iter {
            if !stack.push(record) {
                break;
            }
        }
        stack
    }
}

impl From<Vec<LayerRecord>> for LayerStack {
    fn from(layers: Vec<LayerRecord>) -> Self {
        layers.into_iter().collect()
    }
}

impl From<LayerStack> for Vec<LayerRecord> {
    fn from(stack: LayerStack) -> Self {
        stack.layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dirt(count: u32) -> LayerRecord {
        LayerRecord::new(MaterialName::new("minecraft", "dirt"), count)
    }

    #[test]
    fn material_name_requires_two_components() {
        assert!(MaterialName::parse("minecraft:dirt").is_some());
        assert!(MaterialName::parse("dirt").is_none());
        assert!(MaterialName::parse("a:b:c").is_none());
        assert!(MaterialName::parse(":dirt").is_none());
        assert!(MaterialName::parse("minecraft:").is_none());
    }

    #[test]
    fn record_count_is_clamped() {
        assert_eq!(dirt(0).count(), 1);
        assert_eq!(dirt(999).count(), 255);
        assert_eq!(dirt(17).count(), 17);
    }

    #[test]
    fn crossing_record_is_last_admitted() {
        let mut stack = LayerStack::new();
        assert!(stack.push(dirt(200)));
        assert!(stack.push(dirt(100)));
        assert!(!stack.push(dirt(1)));
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.ground_level(), 255);
    }

    #[test]
    fn deserialized_counts_are_clamped() {
        let record: LayerRecord =
            serde_json::from_str(r#"{"material":"minecraft:dirt","count":0}"#).unwrap();
        assert_eq!(record, dirt(1));

        let stack: LayerStack = serde_json::from_str(
            r#"[{"material":"minecraft:dirt","count":0},{"material":"minecraft:stone","count":4000}]"#,
        )
        .unwrap();
        assert!(stack.iter().all(|layer| layer.count() >= 1));
        assert_eq!(stack.ground_level(), 255);
        assert_eq!(stack.to_string(), "minecraft:dirt;minecraft:stone*255");
    }

    #[test]
    fn exactly_full_still_accepts_one_more() {
        let stack: LayerStack = vec![dirt(255), dirt(3), dirt(1)].into();
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.ground_level(), 255);
    }
}
