//! Declared dependency specs as written in package descriptors.
//!
//! A spec is a name optionally followed by a parenthesised constraint,
//! e.g. `MASS (>= 7.3)`. Constraints are rendered as Maven-style ranges
//! because that is what the package database accepts.

use crate::{Error, Result};
use std::fmt;

const ANY_VERSION: &str = "[0,)";

/// A declared dependency on another package.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageDependency {
    name: String,
    version_range: String,
    version: Option<String>,
    optional: bool,
}

impl PackageDependency {
    /// A dependency on any version of `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version_range: ANY_VERSION.to_string(),
            version: None,
            optional: false,
        }
    }

    /// Parse a single spec such as `Rcpp (>= 0.12.0)`.
    pub fn parse(spec: &str) -> Result<Self> {
        let spec = spec.trim();
        let (name, constraint) = match spec.find('(') {
            None => (spec, None),
            Some(open) => {
                let close = spec[open..]
                    .find(')')
                    .map(|i| open + i)
                    .ok_or_else(|| Error::invalid_dependency(spec, "unterminated version"))?;
                (spec[..open].trim(), Some(spec[open + 1..close].trim()))
            }
        };
        if name.is_empty() {
            return Err(Error::invalid_dependency(spec, "missing package name"));
        }

        let mut dependency = Self::new(name);
        if let Some(constraint) = constraint {
            if let Some(v) = constraint.strip_prefix(">=") {
                dependency.version_range = format!("[{},)", v.trim());
            } else if let Some(v) = constraint.strip_prefix('>') {
                dependency.version_range = format!("({},)", v.trim());
            } else {
                let v = constraint.trim_start_matches(['=', ' ']).trim();
                dependency.version_range = v.to_string();
                dependency.version = Some(v.to_string());
            }
        }
        Ok(dependency)
    }

    /// Parse a comma-separated field like `Depends` or `Suggests`.
    ///
    /// Entries are optional iff `scope` is `Suggests`.
    pub fn parse_list(scope: &str, list: &str) -> Result<Vec<Self>> {
        let optional = scope.eq_ignore_ascii_case("suggests");
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                Self::parse(s).map(|mut d| {
                    d.optional = optional;
                    d
                })
            })
            .collect()
    }

    /// Package name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Maven-style version range, `[0,)` when unconstrained.
    #[must_use]
    pub fn version_range(&self) -> &str {
        &self.version_range
    }

    /// Exact version, when the spec pins one.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// True for `Suggests` entries.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.optional
    }
}

impl fmt::Display for PackageDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version_range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("MASS", "MASS", "[0,)")]
    #[case("Rcpp (>= 0.12.0)", "Rcpp", "[0.12.0,)")]
    #[case("Rcpp(>=0.12.0)", "Rcpp", "[0.12.0,)")]
    #[case("survival (> 2.37)", "survival", "(2.37,)")]
    #[case("  Matrix  ", "Matrix", "[0,)")]
    fn test_parse_ranges(#[case] spec: &str, #[case] name: &str, #[case] range: &str) {
        let dep = PackageDependency::parse(spec).unwrap();
        assert_eq!(dep.name(), name);
        assert_eq!(dep.version_range(), range);
        assert_eq!(dep.version(), None);
    }

    #[test]
    fn test_exact_version() {
        let dep = PackageDependency::parse("lattice (== 0.20-35)").unwrap();
        assert_eq!(dep.version(), Some("0.20-35"));
        assert_eq!(dep.version_range(), "0.20-35");
    }

    #[rstest]
    #[case("MASS (>= 7.3")]
    #[case("(>= 1.0)")]
    #[case("")]
    fn test_invalid_specs(#[case] spec: &str) {
        assert!(PackageDependency::parse(spec).is_err());
    }

    #[test]
    fn test_parse_list_marks_suggests_optional() {
        let deps = PackageDependency::parse_list("Suggests", "testthat, knitr (>= 1.5),").unwrap();
        assert_eq!(deps.len(), 2);
        assert!(deps.iter().all(PackageDependency::is_optional));

        let deps = PackageDependency::parse_list("Imports", "stats, methods").unwrap();
        assert_eq!(
            deps.iter().map(PackageDependency::name).collect::<Vec<_>>(),
            vec!["stats", "methods"]
        );
        assert!(!deps[0].is_optional());
    }
}
