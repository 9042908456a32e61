//! Compile-argument rewriting for index jobs.
//!
//! Two flags get special treatment while the vector is copied for the parser:
//! the header after `-include-pch` is swapped for its on-disk PCH artifact,
//! and `-x c-header`/`-x c++-header` marks the job as a PCH producer.
//! Malformed sequences (a trailing `-include-pch`, an empty argument) are
//! accepted silently, matching the parser's own leniency.

use std::path::{Path, PathBuf};

use crate::index::hash::pch_artifact_path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenArgs {
    /// Arguments handed to the parser; the input file is passed separately.
    pub clang_args: Vec<String>,
    /// Human-readable invocation for diagnostics, input included.
    pub command_line: String,
    /// True when some `-x` was followed by `c-header` or `c++-header`.
    pub is_pch: bool,
}

/// The headers named by `-include-pch`, with their original paths. Taken from
/// the raw user arguments so the PCH USR preload sees the headers, not the
/// artifacts substituted for them.
pub fn extract_pch_headers(args: &[String]) -> Vec<PathBuf> {
    let mut headers = Vec::new();
    let mut next_is_pch = false;
    for arg in args {
        if arg.is_empty() {
            continue;
        }
        if next_is_pch {
            next_is_pch = false;
            headers.push(PathBuf::from(arg));
        } else if arg == "-include-pch" {
            next_is_pch = true;
        }
    }
    headers
}

pub fn rewrite_args(args: &[String], store_dir: &Path, input: &Path) -> RewrittenArgs {
    let mut clang_args = Vec::with_capacity(args.len());
    let mut command_line = String::from("clang ");
    let mut is_pch = false;
    let mut next_is_pch = false;
    let mut next_is_x = false;

    for arg in args {
        if arg.is_empty() {
            continue;
        }

        if next_is_pch {
            next_is_pch = false;
            let artifact = pch_artifact_path(store_dir, Path::new(arg));
            let artifact = artifact.to_string_lossy().into_owned();
            command_line.push_str(&artifact);
            command_line.push(' ');
            clang_args.push(artifact);
            continue;
        }

        if next_is_x {
            next_is_x = false;
            if arg == "c++-header" || arg == "c-header" {
                is_pch = true;
            }
        }
        command_line.push_str(arg);
        command_line.push(' ');
        clang_args.push(arg.clone());

        if arg == "-include-pch" {
            next_is_pch = true;
        } else if arg == "-x" {
            next_is_x = true;
        }
    }

    command_line.push_str(&input.to_string_lossy());
    RewrittenArgs {
        clang_args,
        command_line,
        is_pch,
    }
}
