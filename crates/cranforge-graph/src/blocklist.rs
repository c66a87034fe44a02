//! Blocked and certified package lists.
//!
//! Both files are line oriented: everything from `#` to the end of a line is
//! a comment, surrounding whitespace is trimmed, and empty lines are skipped.

use crate::error::Result;
use ahash::AHashSet;
use cranforge_core::{Error, PackageId, PackageVersionId};
use std::path::Path;
use tracing::debug;

/// File listing packages known to be broken.
pub const BLOCKLIST_FILE: &str = "packages.blocklist";
/// File listing packages certified to build.
pub const CERTIFIED_FILE: &str = "packages.certified";

/// Name sets of blocked and certified packages.
#[derive(Debug, Clone, Default)]
pub struct Blocklist {
    blocked: AHashSet<String>,
    certified: AHashSet<String>,
}

impl Blocklist {
    /// Load both lists from a package root directory.
    ///
    /// # Errors
    /// Returns error if either file is missing or unreadable.
    pub fn load(package_root: &Path) -> Result<Self> {
        let blocked = parse_package_list_file(&package_root.join(BLOCKLIST_FILE))?;
        let certified = parse_package_list_file(&package_root.join(CERTIFIED_FILE))?;
        debug!(
            blocked = blocked.len(),
            certified = certified.len(),
            "loaded package lists"
        );
        Ok(Self { blocked, certified })
    }

    /// Build from in-memory name lists.
    #[must_use]
    pub fn from_names<B, C>(blocked: B, certified: C) -> Self
    where
        B: IntoIterator,
        B::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            blocked: blocked.into_iter().map(Into::into).collect(),
            certified: certified.into_iter().map(Into::into).collect(),
        }
    }

    /// True if `name` is on the blocklist, regardless of group.
    #[must_use]
    pub fn is_blocked_name(&self, name: &str) -> bool {
        self.blocked.contains(name)
    }

    /// True if `id` is a CRAN package whose name is on the blocklist.
    ///
    /// Packages from other groups never match by name collision.
    #[must_use]
    pub fn is_blocked(&self, id: &PackageId) -> bool {
        id.is_cran() && self.blocked.contains(id.name())
    }

    /// True if compilation of `id` is disabled.
    #[must_use]
    pub fn is_compilation_disabled(&self, id: &PackageVersionId) -> bool {
        self.is_blocked(id.package_id())
    }

    /// True if `id`'s name is on the certified list.
    #[must_use]
    pub fn is_certified(&self, id: &PackageVersionId) -> bool {
        self.certified.contains(id.name())
    }

    /// Number of blocked names.
    #[must_use]
    pub fn blocked_count(&self) -> usize {
        self.blocked.len()
    }
}

/// Parse a package list file into its set of names.
///
/// # Errors
/// Returns error if the file cannot be read.
pub fn parse_package_list_file(path: &Path) -> Result<AHashSet<String>> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(parse_package_list(&text))
}

/// Parse package list text into its set of names.
#[must_use]
pub fn parse_package_list(text: &str) -> AHashSet<String> {
    text.lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cranforge_test_utils::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("rJava\n", &["rJava"])]
    #[case("# header\n\nrJava  # needs a JVM\n  Rmpi\n#gone\n", &["Rmpi", "rJava"])]
    #[case("\t Rmpi\t\r\n", &["Rmpi"])]
    #[case("# only comments\n\n", &[])]
    fn test_parse_lines(#[case] text: &str, #[case] expected: &[&str]) {
        let mut names: Vec<_> = parse_package_list(text).into_iter().collect();
        names.sort();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_group_must_be_canonical() {
        let blocklist = Blocklist::from_names(["rJava"], Vec::<String>::new());
        assert!(blocklist.is_blocked_name("rJava"));
        assert!(blocklist.is_blocked(&PackageId::cran("rJava")));
        assert!(!blocklist.is_blocked(&PackageId::new(PackageId::BIOC_GROUP, "rJava")));
        assert!(!blocklist.is_blocked(&PackageId::github("s-u", "rJava")));
        assert!(blocklist.is_compilation_disabled(&cran("rJava", "0.9")));
        assert!(!blocklist.is_compilation_disabled(&cran("MASS", "7.3")));
    }

    #[test]
    fn test_load_from_universe() {
        let universe = TempUniverse::builder()
            .blocklist(&["# broken", "rJava"])
            .certified(&["MASS"])
            .build()
            .unwrap();
        let blocklist = Blocklist::load(&universe.config().packages_dir()).unwrap();
        assert_eq!(blocklist.blocked_count(), 1);
        assert!(blocklist.is_certified(&cran("MASS", "7.3-51.4")));
        assert!(!blocklist.is_certified(&cran("rJava", "0.9")));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Blocklist::load(dir.path()).is_err());
    }
}
