//! Indexer configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Include roots treated as system paths when nothing else is configured.
pub const DEFAULT_SYSTEM_PATHS: &[&str] = &[
    "/usr/include",
    "/usr/local/include",
    "/usr/lib",
    "/opt/local/include",
];

/// Settings shared by every index job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Directory holding PCH artifacts and store snapshots.
    pub store_dir: PathBuf,

    /// Arguments appended to every job's user arguments.
    pub default_args: Vec<String>,

    /// Prefixes under which includes are ignored entirely (no dependency
    /// edges, no PCH dependency entries).
    pub system_paths: Vec<PathBuf>,

    /// Drop symbol records whose spelling is empty instead of keeping them
    /// with a zero length.
    pub drop_empty_symbols: bool,
}

impl IndexConfig {
    pub fn new(store_dir: PathBuf) -> Self {
        Self {
            store_dir,
            default_args: Vec::new(),
            system_paths: DEFAULT_SYSTEM_PATHS.iter().map(PathBuf::from).collect(),
            drop_empty_symbols: false,
        }
    }

    pub fn with_default_args(mut self, args: Vec<String>) -> Self {
        self.default_args = args;
        self
    }

    pub fn with_system_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.system_paths = paths;
        self
    }

    /// Pure predicate over canonicalized paths; prefix match against the
    /// configured system roots.
    pub fn is_system_path(&self, path: &Path) -> bool {
        self.system_paths.iter().any(|root| path.starts_with(root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_path_predicate() {
        let config = IndexConfig::new(PathBuf::from("/store"));
        assert!(config.is_system_path(Path::new("/usr/include/stdio.h")));
        assert!(config.is_system_path(Path::new("/usr/local/include/boost/any.hpp")));
        assert!(!config.is_system_path(Path::new("/home/dev/project/a.h")));
        // Prefix match is per component, not per byte.
        assert!(!config.is_system_path(Path::new("/usr/includex/a.h")));
    }

    #[test]
    fn test_system_paths_are_configurable() {
        let config = IndexConfig::new(PathBuf::from("/store"))
            .with_system_paths(vec![PathBuf::from("/sysroot")]);
        assert!(config.is_system_path(Path::new("/sysroot/stdio.h")));
        assert!(!config.is_system_path(Path::new("/usr/include/stdio.h")));
    }
}
