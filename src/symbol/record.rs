//! Symbol, reference, and dependency records produced by index jobs.
//!
//! These are the fact families an index job accumulates while visiting a
//! translation unit and hands to the syncer when it finishes.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::clang::CursorKind;
use crate::symbol::Location;

/// How a reference site relates to its target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceType {
    #[default]
    NormalReference,
    /// Constructor, destructor, or method referring to another declaration of
    /// the same member.
    MemberFunction,
    /// Free function declaration referring to another declaration of the same
    /// function.
    GlobalFunction,
}

/// Per-location symbol record.
///
/// `symbol_length` is the byte length of the symbol's spelling at the
/// location, used for query-time highlighting. Zero means the record has not
/// been filled yet (or the spelling was empty, which is retained).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorInfo {
    pub kind: CursorKind,
    pub symbol_length: u32,
    /// Location of the referenced definition or declaration, when one exists
    /// and differs from the record's own location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<Location>,
}

impl Default for CursorInfo {
    fn default() -> Self {
        Self {
            kind: CursorKind::InvalidFile,
            symbol_length: 0,
            target: None,
        }
    }
}

/// Location → symbol record; at most one entry per location.
pub type SymbolMap = HashMap<Location, CursorInfo>;

/// Qualified-name permutation → locations answering to that name.
pub type SymbolNameMap = HashMap<String, HashSet<Location>>;

/// Reference site → (target, reference type).
pub type ReferenceMap = HashMap<Location, (Location, ReferenceType)>;

/// Included file → every file above it in some include stack.
pub type DependencyMap = HashMap<PathBuf, HashSet<PathBuf>>;

/// USR → location of the declaration it identifies. Keys are owned copies;
/// they outlive the translation unit they were harvested from.
pub type UsrMap = HashMap<String, Location>;

/// Arguments and parse timestamp recorded per indexed file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInformation {
    pub args: Vec<String>,
    /// Seconds since the Unix epoch at parse time.
    pub parse_time: u64,
}
