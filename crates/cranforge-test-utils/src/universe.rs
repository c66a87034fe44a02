//! Temporary package universes on disk.

use anyhow::{Context, Result};
use cranforge_config::Config;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A universe root with `packages/` lists and a `replacements/` directory.
#[derive(Debug)]
pub struct TempUniverse {
    dir: TempDir,
}

impl TempUniverse {
    /// Start building a universe.
    #[must_use]
    pub fn builder() -> TempUniverseBuilder {
        TempUniverseBuilder::default()
    }

    /// An empty universe: no blocklisted, certified or replaced packages.
    ///
    /// # Errors
    /// Returns error if the directory cannot be created.
    pub fn empty() -> Result<Self> {
        Self::builder().build()
    }

    /// Root path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Default configuration rooted here.
    #[must_use]
    pub fn config(&self) -> Config {
        Config::with_root(self.path())
    }

    /// Path of `relative` inside the universe.
    #[must_use]
    pub fn join(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }
}

/// Builder for [`TempUniverse`].
#[derive(Debug, Default)]
pub struct TempUniverseBuilder {
    blocklist: Vec<String>,
    certified: Vec<String>,
    replacements: Vec<String>,
    stray_dirs: Vec<String>,
}

impl TempUniverseBuilder {
    /// Lines of `packages.blocklist`, comments allowed.
    #[must_use]
    pub fn blocklist(mut self, lines: &[&str]) -> Self {
        self.blocklist.extend(lines.iter().map(|s| (*s).to_string()));
        self
    }

    /// Lines of `packages.certified`.
    #[must_use]
    pub fn certified(mut self, lines: &[&str]) -> Self {
        self.certified.extend(lines.iter().map(|s| (*s).to_string()));
        self
    }

    /// A replacement build for `name`, with a `build.gradle`.
    #[must_use]
    pub fn replacement(mut self, name: &str) -> Self {
        self.replacements.push(name.to_string());
        self
    }

    /// A directory under `replacements/` without a build descriptor.
    #[must_use]
    pub fn stray_replacement_dir(mut self, name: &str) -> Self {
        self.stray_dirs.push(name.to_string());
        self
    }

    /// Write the universe to a fresh temporary directory.
    ///
    /// # Errors
    /// Returns error if any file cannot be written.
    pub fn build(self) -> Result<TempUniverse> {
        let dir = tempfile::tempdir().context("creating universe root")?;
        let config = Config::with_root(dir.path());

        std::fs::create_dir_all(config.packages_dir())?;
        std::fs::write(config.blocklist_file(), lines(&self.blocklist))
            .context("writing blocklist")?;
        std::fs::write(config.certified_file(), lines(&self.certified))
            .context("writing certified list")?;

        let replacements = config.replacements_dir();
        std::fs::create_dir_all(&replacements)?;
        for name in &self.replacements {
            let pkg = replacements.join(name);
            std::fs::create_dir_all(&pkg)?;
            std::fs::write(pkg.join("build.gradle"), "apply plugin: 'java'\n")?;
        }
        for name in &self.stray_dirs {
            std::fs::create_dir_all(replacements.join(name))?;
        }

        Ok(TempUniverse { dir })
    }
}

fn lines(entries: &[String]) -> String {
    entries.iter().map(|l| format!("{l}\n")).collect()
}
