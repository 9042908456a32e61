//! Translation-unit indexing: jobs, the coordinator, and the sink.
//!
//! The module is split into focused components:
//! - `args`: compile-argument rewriting and PCH header extraction
//! - `hash`: content-addressed PCH artifact naming
//! - `job`: the per-translation-unit indexing job
//! - `indexer`: the coordinator owning shared PCH state and the event pump
//! - `syncer`: the batching sink
//! - `storage`: store trait and implementations behind the syncer

pub mod args;
pub mod events;
pub mod hash;
pub mod indexer;
pub mod job;
pub mod storage;
pub mod syncer;


pub use indexer::{Indexer, IndexerState};
pub use job::IndexJob;
pub use syncer::Syncer;
