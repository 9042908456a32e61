//! The outer coordinator.
//!
//! Owns the configuration, the syncer, and the cross-job PCH state, and runs
//! jobs on the runtime's blocking pool. Jobs talk back through an event
//! channel: dependency maps are merged into a global graph by the pump task,
//! completions are logged and surfaced to `wait_idle`.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::clang::ParserFrontEnd;
use crate::config::IndexConfig;
use crate::index::events::IndexEvent;
use crate::index::job::IndexJob;
use crate::index::storage::SymbolStore;
use crate::index::syncer::Syncer;
use crate::symbol::{DependencyMap, UsrMap, canonical_path};

/// State shared between the indexer and its jobs.
pub struct IndexerState {
    config: IndexConfig,
    syncer: Syncer,
    pch_usr: RwLock<HashMap<PathBuf, UsrMap>>,
    pch_dependencies: RwLock<HashMap<PathBuf, HashSet<PathBuf>>>,
    events: mpsc::UnboundedSender<IndexEvent>,
}

impl IndexerState {
    pub fn new(
        config: IndexConfig,
        store: Arc<dyn SymbolStore>,
        events: mpsc::UnboundedSender<IndexEvent>,
    ) -> Self {
        Self {
            config,
            syncer: Syncer::new(store),
            pch_usr: RwLock::new(HashMap::new()),
            pch_dependencies: RwLock::new(HashMap::new()),
            events,
        }
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn syncer(&self) -> &Syncer {
        &self.syncer
    }

    /// Merged USR index of the given PCH headers; later headers overwrite
    /// earlier keys.
    pub fn pch_usr_map(&self, headers: &[PathBuf]) -> UsrMap {
        let maps = self.pch_usr.read().unwrap();
        let mut merged = UsrMap::new();
        for header in headers {
            if let Some(map) = maps.get(header) {
                merged.extend(map.iter().map(|(usr, loc)| (usr.clone(), loc.clone())));
            }
        }
        merged
    }

    /// Publish a PCH producer's USR index after its artifact is on disk.
    pub fn set_pch_usr_map(&self, header: PathBuf, map: UsrMap) {
        self.pch_usr.write().unwrap().insert(header, map);
    }

    pub fn pch_dependencies(&self, header: &Path) -> HashSet<PathBuf> {
        self.pch_dependencies
            .read()
            .unwrap()
            .get(header)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_pch_dependencies(&self, header: PathBuf, dependencies: HashSet<PathBuf>) {
        self.pch_dependencies
            .write()
            .unwrap()
            .insert(header, dependencies);
    }

    /// Best-effort event post; a pump that has gone away is tolerated.
    pub fn post(&self, event: IndexEvent) {
        let _ = self.events.send(event);
    }
}

struct JobHandle {
    abort: Arc<AtomicBool>,
    task: tokio::task::JoinHandle<()>,
}

pub struct Indexer<F: ParserFrontEnd> {
    state: Arc<IndexerState>,
    front_end: Arc<F>,
    next_id: AtomicU32,
    jobs: Mutex<HashMap<u32, JobHandle>>,
    dependencies: Arc<Mutex<DependencyMap>>,
}

impl<F> Indexer<F>
where
    F: ParserFrontEnd + Send + Sync + 'static,
{
    /// Creates the store directory and starts the event pump; must run inside
    /// a tokio runtime.
    pub fn new(
        config: IndexConfig,
        store: Arc<dyn SymbolStore>,
        front_end: F,
    ) -> std::io::Result<Self> {
        fs::create_dir_all(&config.store_dir)?;

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let dependencies = Arc::new(Mutex::new(DependencyMap::new()));
        tokio::spawn(pump(events_rx, dependencies.clone()));

        Ok(Self {
            state: Arc::new(IndexerState::new(config, store, events_tx)),
            front_end: Arc::new(front_end),
            next_id: AtomicU32::new(0),
            jobs: Mutex::new(HashMap::new()),
            dependencies,
        })
    }

    /// Submit one translation unit; returns the job id.
    pub fn index(&self, input: &Path, args: Vec<String>) -> u32 {
        let input = canonical_path(input);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let job = IndexJob::new(id, input.clone(), args, self.state.clone());
        let abort = job.abort_handle();

        let front_end = self.front_end.clone();
        let task = tokio::task::spawn_blocking(move || job.run(front_end.as_ref()));
        self.jobs.lock().unwrap().insert(id, JobHandle { abort, task });

        debug!(job = id, "queued {}", input.display());
        id
    }

    /// Cooperative cancellation: parsing runs to completion, visiting stops
    /// at the next cursor, sink writes are skipped.
    #[allow(dead_code)]
    pub fn abort(&self, id: u32) {
        if let Some(handle) = self.jobs.lock().unwrap().get(&id) {
            handle.abort.store(true, Ordering::Relaxed);
        }
    }

    /// Abort every outstanding job (shutdown path).
    pub fn abort_all(&self) {
        for handle in self.jobs.lock().unwrap().values() {
            handle.abort.store(true, Ordering::Relaxed);
        }
    }

    /// Wait for every submitted job to finish.
    pub async fn wait_idle(&self) {
        loop {
            let pending: Vec<JobHandle> = {
                let mut jobs = self.jobs.lock().unwrap();
                jobs.drain().map(|(_, handle)| handle).collect()
            };
            if pending.is_empty() {
                return;
            }
            for handle in pending {
                let _ = handle.task.await;
            }
        }
    }

    pub fn syncer(&self) -> &Syncer {
        self.state.syncer()
    }

    /// Snapshot of the merged dependency graph built from job events.
    pub fn dependencies(&self) -> DependencyMap {
        self.dependencies.lock().unwrap().clone()
    }
}

async fn pump(
    mut events: mpsc::UnboundedReceiver<IndexEvent>,
    dependencies: Arc<Mutex<DependencyMap>>,
) {
    while let Some(event) = events.recv().await {
        match event {
            IndexEvent::Dependencies(edges) => {
                let mut graph = dependencies.lock().unwrap();
                for (file, dependents) in edges {
                    graph.entry(file).or_default().extend(dependents);
                }
            }
            IndexEvent::Done { id, input, is_pch } => {
                info!(job = id, is_pch, "done {}", input.display());
            }
        }
    }
}
