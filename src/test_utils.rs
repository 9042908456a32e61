//! Shared fixtures for index job tests.
//!
//! A harness wires an [`IndexerState`] to an in-memory store and a captured
//! event channel, with the store directory on a tempdir so PCH saves have
//! somewhere real to land.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use tokio::sync::mpsc;

use crate::clang::testing::FakeFrontEnd;
use crate::config::IndexConfig;
use crate::index::IndexJob;
use crate::index::events::IndexEvent;
use crate::index::indexer::IndexerState;
use crate::index::storage::memory::MemoryStore;
use crate::symbol::{DependencyMap, Location};

pub struct JobHarness {
    pub state: Arc<IndexerState>,
    pub store: Arc<MemoryStore>,
    pub events: mpsc::UnboundedReceiver<IndexEvent>,
    store_dir: tempfile::TempDir,
}

impl JobHarness {
    pub fn new() -> Self {
        Self::with_config(|config| config)
    }

    pub fn with_config(adjust: impl FnOnce(IndexConfig) -> IndexConfig) -> Self {
        let store_dir = tempfile::tempdir().unwrap();
        let config = adjust(IndexConfig::new(store_dir.path().to_path_buf()));
        let store = Arc::new(MemoryStore::new());
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let state = Arc::new(IndexerState::new(config, store.clone(), events_tx));
        Self {
            state,
            store,
            events: events_rx,
            store_dir,
        }
    }

    pub fn store_dir(&self) -> PathBuf {
        self.store_dir.path().to_path_buf()
    }

    /// Run one job to completion and flush the sink.
    pub fn run_job(&self, id: u32, input: &str, args: &[&str], front_end: &FakeFrontEnd) {
        self.job(id, input, args).run(front_end);
        self.state.syncer().flush().unwrap();
    }

    /// Run one job with the abort flag already set.
    pub fn run_aborted_job(&self, id: u32, input: &str, args: &[&str], front_end: &FakeFrontEnd) {
        let job = self.job(id, input, args);
        job.abort_handle().store(true, Ordering::Relaxed);
        job.run(front_end);
        self.state.syncer().flush().unwrap();
    }

    fn job(&self, id: u32, input: &str, args: &[&str]) -> IndexJob {
        IndexJob::new(
            id,
            PathBuf::from(input),
            args.iter().map(|arg| arg.to_string()).collect(),
            self.state.clone(),
        )
    }

    /// Every event posted so far, in order.
    pub fn drain_events(&mut self) -> Vec<IndexEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }

    /// Just the dependency maps, in posting order.
    pub fn dependency_events(&mut self) -> Vec<DependencyMap> {
        self.drain_events()
            .into_iter()
            .filter_map(|event| match event {
                IndexEvent::Dependencies(edges) => Some(edges),
                IndexEvent::Done { .. } => None,
            })
            .collect()
    }
}

pub fn location(path: &str, offset: u32) -> Location {
    Location::new(PathBuf::from(path), offset)
}
