//! Parser front-end abstraction.
//!
//! The index job is written against these traits so the cursor logic can be
//! exercised with an in-memory tree; the production backend in [`ffi`] binds
//! libclang. Handles are cheap to clone and only valid while their owning
//! translation unit is alive.

pub mod ffi;
pub mod kind;
#[cfg(test)]
pub mod testing;

pub use kind::CursorKind;

use std::path::{Path, PathBuf};

/// Control value returned by the cursor visitor, mirroring libclang's child
/// visit result. `Recurse` descends into the cursor's children; `Break` stops
/// the entire traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    Break,
    Recurse,
}

/// One file pulled in by the preprocessor, with the stack of files that led
/// to it (most immediate includer first). An empty stack marks the
/// translation unit's own input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inclusion {
    pub file: PathBuf,
    pub include_stack: Vec<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("could not save translation unit to {path}: {reason}")]
    Failed { path: PathBuf, reason: String },
}

/// A handle to one AST node.
pub trait CursorHandle: Clone + PartialEq + Sized {
    fn kind(&self) -> CursorKind;

    /// `(file, byte offset)` of the cursor, or `None` for cursors without a
    /// spelling location (the translation unit itself, builtins).
    fn location(&self) -> Option<(PathBuf, u32)>;

    fn spelling(&self) -> String;

    /// Display name: the spelling plus disambiguating extras such as a
    /// function's parameter list.
    fn display_name(&self) -> String;

    /// Unified Symbol Resolution string, empty when the cursor has none.
    fn usr(&self) -> String;

    /// The cursor this cursor refers to. Declarations refer to themselves;
    /// cursors without a referent return `None`.
    fn referenced(&self) -> Option<Self>;

    /// The definition of the entity this cursor names, if one is visible.
    fn definition(&self) -> Option<Self>;

    fn is_definition(&self) -> bool;

    fn semantic_parent(&self) -> Option<Self>;

    /// For inclusion directives, the file being included.
    fn included_file(&self) -> Option<PathBuf>;

    /// Pre-order walk over this cursor's subtree. The callback decides per
    /// cursor whether to descend; a `Break` return aborts the whole walk and
    /// is propagated back to the caller.
    fn visit_children(&self, visitor: &mut dyn FnMut(Self) -> Visit) -> Visit;
}

/// A parsed translation unit.
pub trait TranslationUnitHandle {
    type Cursor: CursorHandle;

    fn cursor(&self) -> Self::Cursor;

    /// Every file included while preprocessing, in inclusion order.
    fn inclusions(&self) -> Vec<Inclusion>;

    /// Serialize the unit (PCH production) with the parser's default save
    /// options.
    fn save(&self, path: &Path) -> Result<(), SaveError>;
}

/// Entry point: parses translation units. Returns `None` when the parser
/// cannot produce a unit at all; diagnostics inside an otherwise parsed unit
/// do not count as failure.
pub trait ParserFrontEnd {
    type Unit: TranslationUnitHandle;

    fn parse(&self, input: &Path, args: &[String]) -> Option<Self::Unit>;
}
