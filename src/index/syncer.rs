//! The shared batching sink.
//!
//! Jobs push fact families here as they finish; nothing reaches the store
//! until `flush`. The syncer is the single mutator of the persistent store,
//! so concurrent jobs only contend on the in-memory batch lock. Interleaved
//! writes across jobs are tolerated by construction: set-valued facts union,
//! per-file information is last-writer-wins.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing::debug;

use super::storage::{StoreBatch, StoreError, SymbolStore};
use crate::symbol::{FileInformation, ReferenceMap, SymbolMap, SymbolNameMap};

pub struct Syncer {
    store: Arc<dyn SymbolStore>,
    pending: Mutex<StoreBatch>,
}

impl Syncer {
    pub fn new(store: Arc<dyn SymbolStore>) -> Self {
        Self {
            store,
            pending: Mutex::new(StoreBatch::default()),
        }
    }

    pub fn add_symbols(&self, symbols: SymbolMap) {
        self.pending.lock().unwrap().symbols.extend(symbols);
    }

    pub fn add_symbol_names(&self, names: SymbolNameMap) {
        let mut pending = self.pending.lock().unwrap();
        for (name, locations) in names {
            pending.symbol_names.entry(name).or_default().extend(locations);
        }
    }

    pub fn add_references(&self, references: ReferenceMap) {
        self.pending.lock().unwrap().references.extend(references);
    }

    pub fn add_file_information(&self, path: PathBuf, args: Vec<String>, parse_time: u64) {
        let mut pending = self.pending.lock().unwrap();
        pending.known_files.insert(path.clone());
        pending
            .file_informations
            .insert(path, FileInformation { args, parse_time });
    }

    /// Record files seen while indexing, without arguments of their own.
    pub fn add_file_informations(&self, files: &HashSet<PathBuf>) {
        self.pending
            .lock()
            .unwrap()
            .known_files
            .extend(files.iter().cloned());
    }

    /// Hand the pending batch to the store. Facts stay pending if the write
    /// fails, so a later flush retries them.
    pub fn flush(&self) -> Result<(), StoreError> {
        let batch = std::mem::take(&mut *self.pending.lock().unwrap());
        if batch.is_empty() {
            return Ok(());
        }
        debug!(
            symbols = batch.symbols.len(),
            names = batch.symbol_names.len(),
            references = batch.references.len(),
            files = batch.known_files.len(),
            "flushing batch"
        );
        if let Err(err) = self.store.write_batch(&batch) {
            self.pending.lock().unwrap().merge(&batch);
            return Err(err);
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn pending(&self) -> StoreBatch {
        self.pending.lock().unwrap().clone()
    }
}
