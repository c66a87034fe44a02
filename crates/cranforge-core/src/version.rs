//! Version string ordering.
//!
//! R package versions are loosely formatted (`1.0-6`, `7.3-51.4`, `0.2.1`).
//! They are compared by their numeric components only: the string is split
//! on runs of non-digit characters and the resulting integer sequences are
//! compared lexicographically, with a shorter sequence ranking lower when all
//! shared components are equal.

use std::cmp::Ordering;

/// Compare two version strings by their numeric components.
#[must_use]
pub fn compare_versions(x: &str, y: &str) -> Ordering {
    let xs = numeric_components(x);
    let ys = numeric_components(y);

    for (a, b) in xs.iter().zip(ys.iter()) {
        match a.cmp(b) {
            Ordering::Equal => {}
            other => return other,
        }
    }
    xs.len().cmp(&ys.len())
}

fn numeric_components(version: &str) -> Vec<u64> {
    version
        .split(|c: char| !c.is_ascii_digit())
        .filter(|part| !part.is_empty())
        // Components too large for u64 still sort after every smaller one.
        .map(|part| part.parse::<u64>().unwrap_or(u64::MAX))
        .collect()
}
