//! Persistence behind the syncer.
//!
//! The syncer batches facts in memory and hands them to a [`SymbolStore`] on
//! flush. Stores merge batches instead of replacing state: symbol and
//! reference records are last-writer-wins, name and file sets are unioned, so
//! repeated writes of identical facts are idempotent.

pub mod json_file;

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use crate::symbol::{FileInformation, ReferenceMap, SymbolMap, SymbolNameMap};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One flush worth of facts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreBatch {
    pub symbols: SymbolMap,
    pub symbol_names: SymbolNameMap,
    pub references: ReferenceMap,
    pub file_informations: HashMap<PathBuf, FileInformation>,
    /// Files seen while indexing, recorded even before they get arguments of
    /// their own.
    pub known_files: HashSet<PathBuf>,
}

impl StoreBatch {
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
            && self.symbol_names.is_empty()
            && self.references.is_empty()
            && self.file_informations.is_empty()
            && self.known_files.is_empty()
    }

    /// Merge `other` into `self` with the store's union/last-writer-wins
    /// semantics.
    pub fn merge(&mut self, other: &StoreBatch) {
        self.symbols
            .extend(other.symbols.iter().map(|(k, v)| (k.clone(), v.clone())));
        for (name, locations) in &other.symbol_names {
            self.symbol_names
                .entry(name.clone())
                .or_default()
                .extend(locations.iter().cloned());
        }
        self.references
            .extend(other.references.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.file_informations.extend(
            other
                .file_informations
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        self.known_files.extend(other.known_files.iter().cloned());
    }
}

/// The single mutator of the persistent symbol database.
pub trait SymbolStore: Send + Sync {
    fn write_batch(&self, batch: &StoreBatch) -> Result<(), StoreError>;
}
