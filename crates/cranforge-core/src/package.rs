//! Package identity types.

use crate::version::compare_versions;
use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Version-independent package identity: `group:name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageId {
    group: Arc<str>,
    name: Arc<str>,
}

impl PackageId {
    /// Group of packages mirrored from CRAN.
    pub const CRAN_GROUP: &'static str = "org.renjin.cran";
    /// Group of packages mirrored from Bioconductor.
    pub const BIOC_GROUP: &'static str = "org.renjin.bioconductor";
    /// Reserved group for placeholders of unresolvable dependencies.
    pub const MISSING_GROUP: &'static str = "missing";

    /// Create a new package id.
    #[must_use]
    pub fn new(group: impl Into<Arc<str>>, name: impl Into<Arc<str>>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
        }
    }

    /// A package in the CRAN group.
    #[must_use]
    pub fn cran(name: impl Into<Arc<str>>) -> Self {
        Self::new(Self::CRAN_GROUP, name)
    }

    /// A package hosted on GitHub under `owner`.
    #[must_use]
    pub fn github(owner: &str, repo: impl Into<Arc<str>>) -> Self {
        Self::new(format!("org.renjin.github.{owner}"), repo)
    }

    /// Placeholder identity for a dependency that could not be resolved.
    #[must_use]
    pub fn missing(name: impl Into<Arc<str>>) -> Self {
        Self::new(Self::MISSING_GROUP, name)
    }

    /// Group id.
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Package name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True for packages in the canonical CRAN group.
    #[must_use]
    pub fn is_cran(&self) -> bool {
        &*self.group == Self::CRAN_GROUP
    }

    /// Service path, e.g. `/package/org.renjin.cran/MASS`.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/package/{}/{}", self.group, self.name)
    }

    /// Attach a version.
    #[must_use]
    pub fn with_version(&self, version: impl Into<Arc<str>>) -> PackageVersionId {
        PackageVersionId {
            id: self.clone(),
            version: version.into(),
        }
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.name)
    }
}

impl FromStr for PackageId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split(':').collect::<Vec<_>>().as_slice() {
            [group, name] if !group.is_empty() && !name.is_empty() => Ok(Self::new(*group, *name)),
            _ => Err(Error::invalid_package_id(s)),
        }
    }
}

/// A package identity at a concrete version: `group:name:version`.
///
/// Ordering sorts by [`PackageId`] first and then by numeric version
/// components (see [`compare_versions`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageVersionId {
    id: PackageId,
    version: Arc<str>,
}

impl PackageVersionId {
    /// Create a new versioned id.
    #[must_use]
    pub fn new(
        group: impl Into<Arc<str>>,
        name: impl Into<Arc<str>>,
        version: impl Into<Arc<str>>,
    ) -> Self {
        PackageId::new(group, name).with_version(version)
    }

    /// Parse `group:name:version`. All three parts must be non-empty.
    pub fn from_triplet(triplet: &str) -> Result<Self> {
        match triplet.split(':').collect::<Vec<_>>().as_slice() {
            [group, name, version]
                if !group.is_empty() && !name.is_empty() && !version.is_empty() =>
            {
                Ok(Self::new(*group, *name, *version))
            }
            _ => Err(Error::invalid_package_id(triplet)),
        }
    }

    /// The version-independent identity.
    #[must_use]
    pub const fn package_id(&self) -> &PackageId {
        &self.id
    }

    /// Group id.
    #[must_use]
    pub fn group(&self) -> &str {
        self.id.group()
    }

    /// Package name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.id.name()
    }

    /// Version string.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// True if this version sorts after `other`'s.
    #[must_use]
    pub fn is_newer(&self, other: &Self) -> bool {
        compare_versions(&self.version, &other.version) == Ordering::Greater
    }

    /// Service path, e.g. `/package/org.renjin.cran/MASS/7.3-51.4`.
    #[must_use]
    pub fn path(&self) -> String {
        format!("{}/{}", self.id.path(), self.version)
    }
}

impl Ord for PackageVersionId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id
            .cmp(&other.id)
            .then_with(|| compare_versions(&self.version, &other.version))
            // "1.0-6" and "1.0.6" are numerically equal but distinct ids
            .then_with(|| self.version.cmp(&other.version))
    }
}

impl PartialOrd for PackageVersionId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PackageVersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.id, self.version)
    }
}

impl FromStr for PackageVersionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_triplet(s)
    }
}

impl Serialize for PackageVersionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PackageVersionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_triplet(&s).map_err(serde::de::Error::custom)
    }
}
