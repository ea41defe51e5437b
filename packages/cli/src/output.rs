//! Text rendering for the subcommands.

use std::fmt::Write as _;

use openblock_address::AddressField;
use openblock_address::Location;
use openblock_address::combinations::ShapeIndex;

/// Renders parse candidates as one pretty JSON array, or one compact JSON
/// object per line.
pub fn render_candidates(candidates: &[Location], compact: bool) -> serde_json::Result<String> {
    if !compact {
        return serde_json::to_string_pretty(candidates);
    }
    let lines = candidates
        .iter()
        .map(serde_json::to_string)
        .collect::<serde_json::Result<Vec<_>>>()?;
    Ok(lines.join("\n"))
}

/// `TOKEN: field, field` or `TOKEN: (none)`.
pub fn render_classes(token: &str, fields: &[AddressField]) -> String {
    if fields.is_empty() {
        return format!("{token}: (none)");
    }
    let names: Vec<&str> = fields.iter().map(AsRef::as_ref).collect();
    format!("{token}: {}", names.join(", "))
}

/// Shape counts per length, or every shape of one length.
pub fn render_shapes(shapes: &ShapeIndex, len: Option<usize>) -> String {
    if let Some(len) = len {
        return shapes
            .with_len(len)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
    }

    let mut out = format!("{} shapes\n", shapes.total());
    for len in 1..=shapes.max_len() {
        let _ = writeln!(out, "{len:>4} {}", shapes.with_len(len).len());
    }
    out
}
