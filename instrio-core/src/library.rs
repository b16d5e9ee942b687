use crate::arch::{probe_architecture, ArchitectureSet, Bitness};
use crate::config::{library_path_from_env, read_user_library_path};
use crate::error::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// How a library path was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FoundBy {
    Auto,
    User,
    Environment,
    Explicit,
}

impl fmt::Display for FoundBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FoundBy::Auto => "auto",
            FoundBy::User => "user",
            FoundBy::Environment => "environment",
            FoundBy::Explicit => "explicit",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryPath {
    pub path: PathBuf,
    pub found_by: FoundBy,
    /// `None` until probed.
    pub architecture: Option<ArchitectureSet>,
}

impl LibraryPath {
    pub fn new<P: Into<PathBuf>>(path: P, found_by: FoundBy) -> Self {
        Self {
            path: path.into(),
            found_by,
            architecture: None,
        }
    }

    /// Builds a `LibraryPath` and probes its architecture immediately.
    ///
    /// A failed probe is logged and recorded as the empty set.
    pub fn probe<P: Into<PathBuf>>(path: P, found_by: FoundBy) -> Self {
        Self::new(path, found_by).with_architecture()
    }

    pub fn with_architecture(mut self) -> Self {
        let architecture = probe_or_empty(&self.path);
        self.architecture = Some(architecture);
        self
    }

    pub fn with_cached_architecture(mut self, cache: &mut ArchitectureCache) -> Self {
        self.architecture = Some(cache.get_or_probe(&self.path).clone());
        self
    }

    fn has(&self, bitness: Bitness) -> Option<bool> {
        self.architecture
            .as_ref()
            .filter(|arch| !arch.is_empty())
            .map(|arch| arch.contains(bitness))
    }

    /// `None` when the architecture is unknown.
    pub fn is_32bit(&self) -> Option<bool> {
        self.has(Bitness::Bits32)
    }

    /// `None` when the architecture is unknown.
    pub fn is_64bit(&self) -> Option<bool> {
        self.has(Bitness::Bits64)
    }

    /// e.g. `"32, 64"`, or `"n/a"` when unknown.
    pub fn bitness(&self) -> String {
        match &self.architecture {
            Some(arch) if !arch.is_empty() => arch.to_string(),
            _ => "n/a".to_string(),
        }
    }
}

impl fmt::Display for LibraryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

fn probe_or_empty(path: &Path) -> ArchitectureSet {
    match probe_architecture(path) {
        Ok(arch) => arch,
        Err(e) => {
            log::warn!("Could not determine architecture of {}: {}", path.display(), e);
            ArchitectureSet::empty()
        }
    }
}

/// Architecture sets keyed by path. An entry never changes once computed.
#[derive(Debug, Default)]
pub struct ArchitectureCache {
    entries: HashMap<PathBuf, ArchitectureSet>,
}

impl ArchitectureCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &Path) -> Option<&ArchitectureSet> {
        self.entries.get(path)
    }

    pub fn get_or_probe(&mut self, path: &Path) -> &ArchitectureSet {
        self.get_or_insert_with(path, probe_or_empty)
    }

    pub fn get_or_insert_with<F>(&mut self, path: &Path, probe: F) -> &ArchitectureSet
    where
        F: FnOnce(&Path) -> ArchitectureSet,
    {
        self.entries
            .entry(path.to_path_buf())
            .or_insert_with(|| probe(path))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Library path from `INSTRIO_LIBRARY`, falling back to the user
/// configuration files. The result is not probed.
pub fn discover_library() -> Result<Option<LibraryPath>> {
    if let Some(path) = library_path_from_env() {
        log::debug!("Library path from environment: {}", path.display());
        return Ok(Some(LibraryPath::new(path, FoundBy::Environment)));
    }

    Ok(read_user_library_path()?.map(|path| {
        log::debug!("Library path from user configuration: {}", path.display());
        LibraryPath::new(path, FoundBy::User)
    }))
}
