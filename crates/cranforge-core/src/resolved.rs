//! Resolved dependency sets as returned by the package database.

use crate::PackageVersionId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry of a resolved dependency set.
///
/// An entry without `package_version_id` names a dependency the database
/// could not pin to a concrete version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedDependency {
    /// Declared dependency name.
    pub name: String,
    /// True for `Suggests`-style dependencies.
    #[serde(default)]
    pub optional: bool,
    /// Concrete identity, if the database could resolve one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_version_id: Option<PackageVersionId>,
    /// Build number of the resolved version, if one was built.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_number: Option<u64>,
    /// Version of the externally maintained replacement, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement_version: Option<String>,
}

impl ResolvedDependency {
    /// A dependency resolved to `id`.
    #[must_use]
    pub fn resolved(id: PackageVersionId, optional: bool) -> Self {
        Self {
            name: id.name().to_string(),
            optional,
            package_version_id: Some(id),
            build_number: None,
            replacement_version: None,
        }
    }

    /// A dependency the database could not resolve.
    #[must_use]
    pub fn unresolved(name: impl Into<String>, optional: bool) -> Self {
        Self {
            name: name.into(),
            optional,
            package_version_id: None,
            build_number: None,
            replacement_version: None,
        }
    }

    /// Attach a build number.
    #[must_use]
    pub const fn with_build(mut self, build_number: u64) -> Self {
        self.build_number = Some(build_number);
        self
    }

    /// Mark as replaced by an external build at `version`.
    #[must_use]
    pub fn with_replacement(mut self, version: impl Into<String>) -> Self {
        self.replacement_version = Some(version.into());
        self
    }

    /// True if the database pinned this dependency to a version.
    #[must_use]
    pub const fn is_version_resolved(&self) -> bool {
        self.package_version_id.is_some()
    }

    /// True if the dependency is provided by a replacement build.
    #[must_use]
    pub const fn is_replaced(&self) -> bool {
        self.replacement_version.is_some()
    }

    /// True if a build number is known.
    #[must_use]
    pub const fn has_build(&self) -> bool {
        self.build_number.is_some()
    }
}

impl fmt::Display for ResolvedDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.package_version_id {
            Some(id) => write!(f, "{id}")?,
            None => write!(f, "{}", self.name)?,
        }
        if let Some(build) = self.build_number {
            write!(f, "-b{build}")?;
        }
        Ok(())
    }
}

/// The full resolved dependency set of one package version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDependencySet {
    /// Resolved entries.
    #[serde(default)]
    pub dependencies: Vec<ResolvedDependency>,
}

impl ResolvedDependencySet {
    /// Create from entries.
    #[must_use]
    pub const fn new(dependencies: Vec<ResolvedDependency>) -> Self {
        Self { dependencies }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    /// True if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    /// Iterate over entries.
    pub fn iter(&self) -> std::slice::Iter<'_, ResolvedDependency> {
        self.dependencies.iter()
    }
}

impl FromIterator<ResolvedDependency> for ResolvedDependencySet {
    fn from_iter<I: IntoIterator<Item = ResolvedDependency>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ResolvedDependencySet {
    type Item = &'a ResolvedDependency;
    type IntoIter = std::slice::Iter<'a, ResolvedDependency>;

    fn into_iter(self) -> Self::IntoIter {
        self.dependencies.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_service_document() {
        let json = r#"{
            "dependencies": [
                {"name": "MASS", "optional": false,
                 "packageVersionId": "org.renjin.cran:MASS:7.3-51.4",
                 "buildNumber": 12, "extra": "ignored"},
                {"name": "ggplot2", "optional": true},
                {"name": "Matrix", "packageVersionId": "org.renjin.cran:Matrix:1.2-6",
                 "replacementVersion": "1.2-6-renjin-8"}
            ]
        }"#;
        let set: ResolvedDependencySet = sonic_rs::from_str(json).unwrap();
        assert_eq!(set.len(), 3);

        let mass = &set.dependencies[0];
        assert!(mass.is_version_resolved());
        assert!(mass.has_build());
        assert_eq!(mass.to_string(), "org.renjin.cran:MASS:7.3-51.4-b12");

        let ggplot = &set.dependencies[1];
        assert!(ggplot.optional);
        assert!(!ggplot.is_version_resolved());
        assert_eq!(ggplot.to_string(), "ggplot2");

        let matrix = &set.dependencies[2];
        assert!(!matrix.optional);
        assert!(matrix.is_replaced());
    }

    #[test]
    fn test_missing_dependencies_field() {
        let set: ResolvedDependencySet = sonic_rs::from_str("{}").unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_serializes_camel_case() {
        let set = ResolvedDependencySet::new(vec![
            ResolvedDependency::resolved(PackageVersionId::new("g", "a", "1"), true).with_build(3),
        ]);
        let json = sonic_rs::to_string(&set).unwrap();
        assert!(json.contains("\"packageVersionId\":\"g:a:1\""));
        assert!(json.contains("\"buildNumber\":3"));
        assert!(!json.contains("replacementVersion"));
    }
}
