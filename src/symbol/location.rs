use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A point in source code: a canonicalized file path plus a byte offset.
///
/// The offset addresses a byte within the file, not a line/column pair, so a
/// location can be compared and stored without reading the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub path: PathBuf,
    pub offset: u32,
}

impl Location {
    pub fn new(path: PathBuf, offset: u32) -> Self {
        Self { path, offset }
    }

    /// Location addressing a file as a whole (offset 0).
    pub fn file(path: PathBuf) -> Self {
        Self { path, offset: 0 }
    }

    /// A location is null when it carries no path. Null locations are never
    /// stored in any of the index maps.
    pub fn is_null(&self) -> bool {
        self.path.as_os_str().is_empty()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path.display(), self.offset)
    }
}

/// Canonicalize a path for use as a map key.
///
/// Falls back to lexical resolution when the file does not exist on disk
/// (unsaved buffers, tests), so equal inputs always produce equal keys.
pub fn canonical_path(path: &Path) -> PathBuf {
    if let Ok(resolved) = path.canonicalize() {
        return resolved;
    }

    let absolute = if path.is_relative() {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    } else {
        path.to_path_buf()
    };

    let mut cleaned = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                cleaned.pop();
            }
            other => cleaned.push(other),
        }
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_location() {
        assert!(Location::default().is_null());
        assert!(!Location::new(PathBuf::from("/src/a.cpp"), 12).is_null());
    }

    #[test]
    fn test_display() {
        let loc = Location::new(PathBuf::from("/src/a.cpp"), 42);
        assert_eq!(loc.to_string(), "/src/a.cpp:42");
    }

    #[test]
    fn test_canonical_path_lexical_fallback() {
        // Nonexistent paths are cleaned lexically instead of erroring.
        assert_eq!(
            canonical_path(Path::new("/src/sub/../a.cpp")),
            PathBuf::from("/src/a.cpp")
        );
        assert_eq!(
            canonical_path(Path::new("/src/./b/./c.h")),
            PathBuf::from("/src/b/c.h")
        );
    }

    #[test]
    fn test_canonical_path_uses_filesystem_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("real.cpp");
        std::fs::write(&file, "int x;").unwrap();

        let via_dot = dir.path().join(".").join("real.cpp");
        assert_eq!(canonical_path(&via_dot), file.canonicalize().unwrap());
    }
}
