//! JSON snapshot store.
//!
//! Keeps the whole database as one JSON document under the store directory.
//! Each flush reads the previous snapshot, merges the batch into it, and
//! rewrites the file through a temporary so readers never observe a torn
//! snapshot.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{StoreBatch, StoreError, SymbolStore};
use crate::symbol::{CursorInfo, FileInformation, Location, ReferenceType};

const SNAPSHOT_FILE: &str = "index.json";

pub struct JsonFileStore {
    directory: PathBuf,
}

impl JsonFileStore {
    pub fn new(directory: PathBuf) -> Self {
        Self { directory }
    }

    fn snapshot_path(&self) -> PathBuf {
        self.directory.join(SNAPSHOT_FILE)
    }

    fn load(&self) -> Result<Snapshot, StoreError> {
        let path = self.snapshot_path();
        if !path.exists() {
            return Ok(Snapshot::default());
        }
        let data = fs::read(&path)?;
        Ok(serde_json::from_slice(&data)?)
    }
}

impl SymbolStore for JsonFileStore {
    fn write_batch(&self, batch: &StoreBatch) -> Result<(), StoreError> {
        let mut merged: StoreBatch = self.load()?.into();
        merged.merge(batch);
        let snapshot = Snapshot::from(&merged);

        fs::create_dir_all(&self.directory)?;
        let tmp = self.directory.join(format!("{SNAPSHOT_FILE}.tmp"));
        fs::write(&tmp, serde_json::to_vec_pretty(&snapshot)?)?;
        fs::rename(&tmp, self.snapshot_path())?;

        debug!(
            symbols = snapshot.symbols.len(),
            names = snapshot.symbol_names.len(),
            references = snapshot.references.len(),
            "wrote store snapshot"
        );
        Ok(())
    }
}

/// Serialized form: location-keyed maps become sorted entry lists, since JSON
/// object keys must be strings.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    symbols: Vec<(Location, CursorInfo)>,
    symbol_names: Vec<(String, Vec<Location>)>,
    references: Vec<(Location, Location, ReferenceType)>,
    file_informations: Vec<(PathBuf, FileInformation)>,
    known_files: Vec<PathBuf>,
}

impl From<&StoreBatch> for Snapshot {
    fn from(batch: &StoreBatch) -> Self {
        let mut symbols: Vec<_> = batch
            .symbols
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        symbols.sort_by(|a, b| a.0.cmp(&b.0));

        let mut symbol_names: Vec<_> = batch
            .symbol_names
            .iter()
            .map(|(name, locations)| {
                let mut locations: Vec<_> = locations.iter().cloned().collect();
                locations.sort();
                (name.clone(), locations)
            })
            .collect();
        symbol_names.sort_by(|a, b| a.0.cmp(&b.0));

        let mut references: Vec<_> = batch
            .references
            .iter()
            .map(|(k, (target, reftype))| (k.clone(), target.clone(), *reftype))
            .collect();
        references.sort_by(|a, b| a.0.cmp(&b.0));

        let mut file_informations: Vec<_> = batch
            .file_informations
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        file_informations.sort_by(|a, b| a.0.cmp(&b.0));

        let mut known_files: Vec<_> = batch.known_files.iter().cloned().collect();
        known_files.sort();

        Self {
            symbols,
            symbol_names,
            references,
            file_informations,
            known_files,
        }
    }
}

impl From<Snapshot> for StoreBatch {
    fn from(snapshot: Snapshot) -> Self {
        StoreBatch {
            symbols: snapshot.symbols.into_iter().collect(),
            symbol_names: snapshot
                .symbol_names
                .into_iter()
                .map(|(name, locations)| (name, locations.into_iter().collect::<HashSet<_>>()))
                .collect(),
            references: snapshot
                .references
                .into_iter()
                .map(|(site, target, reftype)| (site, (target, reftype)))
                .collect(),
            file_informations: snapshot
                .file_informations
                .into_iter()
                .collect::<HashMap<_, _>>(),
            known_files: snapshot.known_files.into_iter().collect(),
        }
    }
}

impl JsonFileStore {
    /// Read the persisted state back; used by queries and tests.
    #[allow(dead_code)]
    pub fn read_state(&self) -> Result<StoreBatch, StoreError> {
        Ok(self.load()?.into())
    }
}
