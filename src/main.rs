mod clang;
mod config;
mod index;
mod logging;
mod symbol;

#[cfg(test)]
mod test_utils;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use json_compilation_db::Entry;
use tracing::info;

use clang::ffi::LibclangFrontEnd;
use config::IndexConfig;
use index::Indexer;
use index::storage::json_file::JsonFileStore;
use logging::{LogConfig, init_logging};

/// CLI arguments for the indexer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory for PCH artifacts and the store snapshot
    #[arg(long, value_name = "DIR", default_value = ".cxindex")]
    store_dir: PathBuf,

    /// compile_commands.json to take translation units and arguments from
    #[arg(long, value_name = "FILE")]
    compile_commands: Option<PathBuf>,

    /// Argument appended to every job's compile arguments (repeatable)
    #[arg(long = "clang-arg", value_name = "ARG")]
    clang_args: Vec<String>,

    /// System include root to exclude from dependency tracking (repeatable,
    /// replaces the built-in defaults when given)
    #[arg(long = "system-path", value_name = "DIR")]
    system_paths: Vec<PathBuf>,

    /// Log level (overrides RUST_LOG env var)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Log file path (overrides CXINDEX_LOG_FILE env var)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Translation units to index with only the default arguments
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,
}

fn load_compile_commands(path: &Path) -> Result<Vec<Entry>, Box<dyn std::error::Error>> {
    let file = File::open(path)
        .map_err(|err| format!("could not open {}: {err}", path.display()))?;
    let entries: Vec<Entry> = serde_json::from_reader(BufReader::new(file))
        .map_err(|err| format!("could not parse {}: {err}", path.display()))?;
    Ok(entries)
}

/// The compile arguments a job gets from a database entry: everything except
/// the compiler executable and the input file itself.
fn job_arguments(entry: &Entry) -> Vec<String> {
    entry
        .arguments
        .iter()
        .skip(1)
        .filter(|arg| Path::new(arg) != entry.file)
        .cloned()
        .collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_config = LogConfig::from_env().with_overrides(args.log_level.clone(), args.log_file.clone());
    if let Err(e) = init_logging(log_config) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    let mut config = IndexConfig::new(args.store_dir.clone()).with_default_args(args.clang_args.clone());
    if !args.system_paths.is_empty() {
        config = config.with_system_paths(args.system_paths.clone());
    }

    let front_end = match LibclangFrontEnd::new() {
        Ok(front_end) => front_end,
        Err(e) => {
            eprintln!("Failed to set up the parser: {e}");
            std::process::exit(1);
        }
    };

    let store = Arc::new(JsonFileStore::new(config.store_dir.clone()));
    let indexer = Indexer::new(config, store, front_end)?;

    let mut submitted = 0u32;
    if let Some(db_path) = &args.compile_commands {
        let entries = load_compile_commands(db_path)?;
        info!(
            "indexing {} entries from {}",
            entries.len(),
            db_path.display()
        );
        for entry in &entries {
            let input = if entry.file.is_relative() {
                entry.directory.join(&entry.file)
            } else {
                entry.file.clone()
            };
            indexer.index(&input, job_arguments(entry));
            submitted += 1;
        }
    }
    for file in &args.files {
        indexer.index(file, Vec::new());
        submitted += 1;
    }

    tokio::select! {
        _ = indexer.wait_idle() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted, aborting outstanding jobs");
            indexer.abort_all();
            indexer.wait_idle().await;
        }
    }
    indexer.syncer().flush()?;
    info!(
        "indexed {submitted} translation units, dependency graph covers {} files",
        indexer.dependencies().len()
    );

    Ok(())
}
