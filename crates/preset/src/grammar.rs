//! Text form of a layer stack.
//!
//! ```text
//! preset := layer (';' layer)*
//! layer  := namespace ':' path ('*' count)?
//! ```
//!
//! `namespace` and `path` are non-empty and exclude `:`, `*` and `;`;
//! `count` is base-10 digits. Whitespace anywhere is ignored. The empty
//! string is the void preset.

use std::fmt;

use crate::layer::{LayerRecord, LayerStack, MaterialName};
use crate::resolver::{MaterialResolver, resolve_or_fallback};

/// Why a preset string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PresetError {
    #[error("layer {index} `{clause}` does not match `namespace:path[*count]`")]
    MalformedClause { index: usize, clause: String },
    #[error("layer {index} has {found} `:`-separated components, expected 2")]
    ComponentCount { index: usize, found: usize },
    #[error("layer {index} count `{count}` is not a valid integer")]
    BadCount { index: usize, count: String },
}

/// Parse a preset, reporting why it is malformed.
///
/// The whole string is validated before any layer is built; one bad clause
/// rejects the preset. Counts are clamped into `1..=255` and layers past the
/// height limit are dropped.
pub fn try_parse_layers(
    preset: &str,
    resolver: &dyn MaterialResolver,
) -> Result<LayerStack, PresetError> {
    let compact: String = preset.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Ok(LayerStack::new());
    }

    let clauses = compact
        .split(';')
        .enumerate()
        .map(|(index, clause)| parse_clause(index, clause))
        .collect::<Result<Vec<_>, _>>()?;

    let mut stack = LayerStack::new();
    for (name, count) in clauses {
        let material = resolve_or_fallback(resolver, &name);
        if !stack.push(LayerRecord::new(material, count)) {
            break;
        }
    }
    Ok(stack)
}

/// Parse a preset; a malformed preset yields the empty stack.
pub fn parse_layers(preset: &str, resolver: &dyn MaterialResolver) -> LayerStack {
    try_parse_layers(preset, resolver).unwrap_or_else(|err| {
        tracing::debug!(%err, preset, "rejecting malformed preset");
        LayerStack::new()
    })
}

/// Inverse of [`parse_layers`]: `namespace:path[*count]` joined by `;`.
///
/// `*count` is only written for counts above one.
pub fn layers_to_string(stack: &LayerStack) -> String {
    stack
        .iter()
        .map(|layer| {
            if layer.count() > 1 {
                format!("{}*{}", layer.material(), layer.count())
            } else {
                layer.material().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(";")
}

impl fmt::Display for LayerStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&layers_to_string(self))
    }
}

fn parse_clause(index: usize, clause: &str) -> Result<(MaterialName, u32), PresetError> {
    let malformed = || PresetError::MalformedClause {
        index,
        clause: clause.to_string(),
    };

    let (name, count) = match clause.split_once('*') {
        Some((name, count)) => (name, Some(count)),
        None => (clause, None),
    };

    let found = name.split(':').count();
    if found != 2 {
        return Err(PresetError::ComponentCount { index, found });
    }
    let material = MaterialName::parse(name).ok_or_else(malformed)?;

    let count = match count {
        None => 1,
        Some(digits) => {
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed());
            }
            // counts past i32::MAX reject the preset
            let count = digits.parse::<i32>().map_err(|_| PresetError::BadCount {
                index,
                count: digits.to_string(),
            })?;
            count.unsigned_abs()
        }
    };

    Ok((material, count))
}
