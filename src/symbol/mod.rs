//! Core symbol and location model shared by the index job and the store.

pub mod location;
pub mod record;

pub use location::{Location, canonical_path};
pub use record::{
    CursorInfo, DependencyMap, FileInformation, ReferenceMap, ReferenceType, SymbolMap,
    SymbolNameMap, UsrMap,
};
