//! Location of persisted contexts and curated inputs.

use anyhow::{Context as _, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "PREFIXMAPS_DATA_DIR";

/// Directory holding `<context>.csv` snapshots and curated source files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The `data/` directory shipped with the workspace.
    pub fn bundled() -> Self {
        Self::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data"))
    }

    /// Explicit path, else `$PREFIXMAPS_DATA_DIR`, else [`DataDir::bundled`].
    pub fn resolve(explicit: Option<&Path>) -> Self {
        if let Some(path) = explicit {
            return Self::new(path);
        }
        match std::env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Self::new(PathBuf::from(dir)),
            _ => Self::bundled(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the persisted snapshot for `name`.
    pub fn context_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.csv"))
    }

    /// Path of a curated (hand-maintained) source file.
    pub fn curated_path(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    /// Every persisted context in the directory, by name.
    pub fn context_paths(&self) -> Result<BTreeMap<String, PathBuf>> {
        let mut out = BTreeMap::new();
        let entries = std::fs::read_dir(&self.root)
            .with_context(|| format!("failed to read data directory {}", self.root.display()))?;
        for entry in entries {
            let path = entry?.path();
            if path.extension().map_or(true, |ext| ext != "csv") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                out.insert(stem.to_string(), path.clone());
            }
        }
        Ok(out)
    }
}

impl Default for DataDir {
    fn default() -> Self {
        Self::resolve(None)
    }
}
