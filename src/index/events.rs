//! Events posted by index jobs to the indexer's pump.

use std::path::PathBuf;

use crate::symbol::DependencyMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexEvent {
    /// A job's dependency edges. Posted before any sink writes so consumers
    /// see edges before facts, and posted even by aborted and parse-failed
    /// jobs.
    Dependencies(DependencyMap),

    /// A job finished (successfully, degenerately, or aborted).
    Done {
        id: u32,
        input: PathBuf,
        is_pch: bool,
    },
}
