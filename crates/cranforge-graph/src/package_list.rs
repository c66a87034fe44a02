//! The `packages.list` file: one versioned id per line, sorted.
//!
//! Packages built by a replacement are written with the replacement version
//! and a trailing `*`, marking them as prebuilt.

use crate::error::Result;
use crate::graph::PackageGraph;
use cranforge_core::{Error, PackageVersionId};
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;
use tracing::info;

/// Marker for prebuilt packages.
pub const PREBUILT_MARKER: char = '*';

/// One line of the package list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageListEntry {
    /// Package version.
    pub id: PackageVersionId,
    /// True if a replacement provides the build.
    pub prebuilt: bool,
}

/// Render `graph` as package list text.
#[must_use]
pub fn render(graph: &PackageGraph) -> String {
    let mut out = String::new();
    for node in graph.nodes() {
        if node.is_replaced() {
            let version = node.replacement_version().unwrap_or(node.id().version());
            let _ = writeln!(out, "{}:{version}{PREBUILT_MARKER}", node.package_id());
        } else {
            let _ = writeln!(out, "{}", node.id());
        }
    }
    out
}

/// Write `graph` to `path`, replacing any previous list.
///
/// Returns the number of packages written.
///
/// # Errors
/// Returns error if the file cannot be written.
pub fn write(graph: &PackageGraph, path: &Path) -> Result<usize> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;

    let mut file = tempfile::NamedTempFile::new_in(parent).map_err(|e| Error::io(parent, e))?;
    file.write_all(render(graph).as_bytes())
        .map_err(|e| Error::io(file.path(), e))?;
    file.persist(path).map_err(|e| Error::io(path, e.error))?;

    info!(path = %path.display(), count = graph.len(), "wrote package list");
    Ok(graph.len())
}

/// Parse package list text. Blank lines are skipped.
///
/// # Errors
/// Returns error if a line is not a valid versioned id.
pub fn parse(text: &str) -> Result<Vec<PackageListEntry>> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let (triplet, prebuilt) = match line.strip_suffix(PREBUILT_MARKER) {
                Some(rest) => (rest, true),
                None => (line, false),
            };
            Ok(PackageListEntry {
                id: PackageVersionId::from_triplet(triplet)?,
                prebuilt,
            })
        })
        .collect()
}

/// Read the package list at `path`.
///
/// # Errors
/// Returns error if the file cannot be read or parsed.
pub fn read(path: &Path) -> Result<Vec<PackageListEntry>> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse(&text)
}
