//! The per-translation-unit indexing job.
//!
//! One job parses one input, walks its inclusion graph and cursor tree, and
//! ships the derived facts to the syncer. Jobs run synchronously on a worker
//! thread; cancellation is cooperative through a shared abort flag checked at
//! every visitor entry.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use tracing::{debug, error, info};

use crate::clang::{
    CursorHandle, CursorKind, Inclusion, ParserFrontEnd, TranslationUnitHandle, Visit,
};
use crate::index::args::{extract_pch_headers, rewrite_args};
use crate::index::events::IndexEvent;
use crate::index::hash::pch_artifact_path;
use crate::index::indexer::IndexerState;
use crate::symbol::{
    DependencyMap, Location, ReferenceMap, ReferenceType, SymbolMap, SymbolNameMap, UsrMap,
    canonical_path,
};

pub struct IndexJob {
    id: u32,
    input: PathBuf,
    args: Vec<String>,
    pch_headers: Vec<PathBuf>,
    is_pch: bool,
    pch_saved: bool,
    aborted: Arc<AtomicBool>,
    state: Arc<IndexerState>,

    dependencies: DependencyMap,
    pch_dependencies: HashSet<PathBuf>,
    symbols: SymbolMap,
    symbol_names: SymbolNameMap,
    references: ReferenceMap,
    /// USR → location harvested while producing a PCH; published on save.
    pch_usr_map: UsrMap,
    /// Preloaded USR index of every PCH this unit includes.
    pch_usr_lookup: UsrMap,
    paths: HashSet<PathBuf>,
}

/// Kinds that never anchor a symbol lookup; their children are still visited.
fn skips_symbol(kind: CursorKind) -> bool {
    use CursorKind::*;
    matches!(
        kind,
        CxxThisExpr
            | CxxTypeidExpr
            | CxxReinterpretCastExpr
            | CxxStaticCastExpr
            | CxxDynamicCastExpr
            | CxxNullPtrLiteralExpr
            | CxxNewExpr
            | CxxDeleteExpr
            | CompoundAssignOperator
            | CompoundStmt
            | ParenExpr
            | StringLiteral
            | IntegerLiteral
            | InitListExpr
            | BreakStmt
            | DefaultStmt
            | BinaryOperator
            | CaseStmt
            | ConditionalOperator
            | CStyleCastExpr
            | ForStmt
            | WhileStmt
            | DoStmt
            | IfStmt
            | CxxBoolLiteralExpr
            | CharacterLiteral
            | UnaryOperator
            | ReturnStmt
            | CxxAccessSpecifier
    )
}

impl IndexJob {
    /// `input` must already be canonicalized; the indexer does this at
    /// submission.
    pub fn new(id: u32, input: PathBuf, args: Vec<String>, state: Arc<IndexerState>) -> Self {
        let pch_headers = extract_pch_headers(&args);
        Self {
            id,
            input,
            args,
            pch_headers,
            is_pch: false,
            pch_saved: false,
            aborted: Arc::new(AtomicBool::new(false)),
            state,
            dependencies: DependencyMap::new(),
            pch_dependencies: HashSet::new(),
            symbols: SymbolMap::new(),
            symbol_names: SymbolNameMap::new(),
            references: ReferenceMap::new(),
            pch_usr_map: UsrMap::new(),
            pch_usr_lookup: UsrMap::new(),
            paths: HashSet::new(),
        }
    }

    /// Flag shared with the controller; one writer, relaxed ordering.
    /// Staleness only costs one extra cursor of work.
    pub fn abort_handle(&self) -> Arc<AtomicBool> {
        self.aborted.clone()
    }

    fn aborted(&self) -> bool {
        self.aborted.load(Ordering::Relaxed)
    }

    pub fn run<F: ParserFrontEnd>(mut self, front_end: &F) {
        let started = Instant::now();

        let mut args = self.args.clone();
        args.extend(self.state.config().default_args.iter().cloned());

        if !self.pch_headers.is_empty() {
            self.pch_usr_lookup = self.state.pch_usr_map(&self.pch_headers);
        }
        let pch_wait = started.elapsed();

        let rewritten = rewrite_args(&args, &self.state.config().store_dir, &self.input);
        self.is_pch = rewritten.is_pch;

        let unit = front_end.parse(&self.input, &rewritten.clang_args);
        let parse_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0);
        debug!(job = self.id, loaded = unit.is_some(), "{}", rewritten.command_line);

        match unit {
            None => {
                error!(job = self.id, "no translation unit for {}", rewritten.command_line);
                self.dependencies
                    .entry(self.input.clone())
                    .or_default()
                    .insert(self.input.clone());
                self.post_dependencies();
                self.state.syncer().add_file_information(
                    self.input.clone(),
                    self.args.clone(),
                    parse_time,
                );
            }
            Some(unit) => {
                self.visit_unit(&unit);
                // Release the parser's unit and index before touching the
                // sink.
                drop(unit);
                self.publish(parse_time);
            }
        }

        info!(
            job = self.id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            pch_wait_ms = pch_wait.as_millis() as u64,
            "visited {}",
            self.input.display()
        );
        self.state.post(IndexEvent::Done {
            id: self.id,
            input: self.input,
            is_pch: self.is_pch,
        });
    }

    /// Inclusion graph, dependency event, cursor walk, and (for PCH units)
    /// serialization, in that order. The dependency event goes out before the
    /// cursor walk so consumers see edges before facts.
    fn visit_unit<U: TranslationUnitHandle>(&mut self, unit: &U) {
        for inclusion in unit.inclusions() {
            self.visit_inclusion(&inclusion);
        }
        for header in &self.pch_headers {
            for dep in self.state.pch_dependencies(header) {
                self.dependencies
                    .entry(dep)
                    .or_default()
                    .insert(self.input.clone());
            }
        }
        self.post_dependencies();

        unit.cursor()
            .visit_children(&mut |cursor| self.visit_cursor(&cursor));

        if self.is_pch {
            let artifact = pch_artifact_path(&self.state.config().store_dir, &self.input);
            match unit.save(&artifact) {
                Ok(()) => {
                    self.pch_saved = true;
                    self.state
                        .set_pch_usr_map(self.input.clone(), self.pch_usr_map.clone());
                }
                Err(err) => {
                    // The job still succeeds; consumers of this header will
                    // parse it from source.
                    error!(job = self.id, "{err}");
                }
            }
        }
    }

    /// Per-file name entries and sink writes. Aborted jobs skip the sink
    /// entirely.
    fn publish(&mut self, parse_time: u64) {
        for path in &self.paths {
            let location = Location::file(path.clone());
            self.symbol_names
                .entry(path.to_string_lossy().into_owned())
                .or_default()
                .insert(location.clone());
            if let Some(basename) = path.file_name() {
                self.symbol_names
                    .entry(basename.to_string_lossy().into_owned())
                    .or_default()
                    .insert(location);
            }
        }

        if self.aborted() {
            return;
        }
        let syncer = self.state.syncer();
        syncer.add_file_informations(&self.paths);
        syncer.add_symbols(std::mem::take(&mut self.symbols));
        syncer.add_symbol_names(std::mem::take(&mut self.symbol_names));
        syncer.add_file_information(self.input.clone(), self.args.clone(), parse_time);
        syncer.add_references(std::mem::take(&mut self.references));
        // A failed save means the artifact is missing or truncated; consumers
        // must parse the header from source, so nothing is published for it.
        if self.is_pch && self.pch_saved {
            self.state.set_pch_dependencies(
                self.input.clone(),
                std::mem::take(&mut self.pch_dependencies),
            );
        }
    }

    fn post_dependencies(&self) {
        self.state
            .post(IndexEvent::Dependencies(self.dependencies.clone()));
    }

    fn visit_inclusion(&mut self, inclusion: &Inclusion) {
        if self.aborted() {
            return;
        }
        let path = canonical_path(&inclusion.file);
        if self.state.config().is_system_path(&path) {
            return;
        }
        for origin in &inclusion.include_stack {
            let origin = canonical_path(origin);
            self.dependencies
                .entry(path.clone())
                .or_default()
                .insert(origin);
        }
        if inclusion.include_stack.is_empty() {
            // The unit's own input file depends on itself.
            self.dependencies
                .entry(path.clone())
                .or_default()
                .insert(path.clone());
        }
        if self.is_pch {
            self.pch_dependencies.insert(path);
        }
    }

    /// Canonicalized location of a cursor; every location seen lands in the
    /// visited-paths set.
    fn create_location<C: CursorHandle>(&mut self, cursor: &C) -> Option<Location> {
        let (path, offset) = cursor.location()?;
        let path = canonical_path(&path);
        self.paths.insert(path.clone());
        Some(Location::new(path, offset))
    }

    fn visit_cursor<C: CursorHandle>(&mut self, cursor: &C) -> Visit {
        if self.aborted() {
            return Visit::Break;
        }
        let kind = cursor.kind();
        if kind.is_invalid() || skips_symbol(kind) {
            return Visit::Recurse;
        }
        let Some(location) = self.create_location(cursor) else {
            return Visit::Recurse;
        };

        // A declaration that refers to itself but is not the definition
        // stands for the definition when one is visible.
        let mut referent = cursor.referenced();
        if let Some(r) = &referent {
            if r == cursor && !r.is_definition() {
                referent = r.definition();
            }
        }
        let referent_kind = referent.as_ref().map(CursorHandle::kind);

        // The child naming the method records the callee site.
        if kind == CursorKind::CallExpr && referent_kind == Some(CursorKind::CxxMethod) {
            return Visit::Recurse;
        }

        let referent_location = if referent.as_ref() == Some(cursor) {
            // Self-reference: the target may live in a PCH this unit
            // includes. A PCH producer never consults its own lookup.
            if self.is_pch {
                None
            } else {
                let usr = cursor.usr();
                if usr.is_empty() {
                    None
                } else {
                    self.pch_usr_lookup.get(&usr).cloned()
                }
            }
        } else {
            referent.as_ref().and_then(|r| self.create_location(r))
        };

        let spelling = if kind.is_reference() {
            referent.as_ref().map(|r| r.spelling()).unwrap_or_default()
        } else {
            cursor.spelling()
        };

        let info = self.symbols.entry(location.clone()).or_default();
        if info.symbol_length == 0 {
            if self.is_pch {
                let usr = cursor.usr();
                if !usr.is_empty() {
                    self.pch_usr_map.insert(usr, location.clone());
                }
            }
            info.kind = kind;
            info.symbol_length = spelling.len() as u32;
            if self.state.config().drop_empty_symbols && spelling.is_empty() {
                self.symbols.remove(&location);
                return Visit::Recurse;
            }
        } else if info.kind == CursorKind::Constructor && kind == CursorKind::TypeRef {
            // The constructor site already owns this location.
            return Visit::Recurse;
        }

        if cursor.is_definition() || kind == CursorKind::FunctionDecl {
            self.add_name_permutations(cursor, &location);
        }

        let referent_valid = referent_kind.is_some_and(|k| !k.is_invalid());
        if referent_valid && referent_location.as_ref().is_some_and(|l| !l.is_null()) {
            let target = referent_location.unwrap();
            if target != location {
                if let Some(info) = self.symbols.get_mut(&location) {
                    info.target = Some(target.clone());
                }
            }
            let mut reference_type = ReferenceType::NormalReference;
            if referent_kind == Some(kind) {
                reference_type = match kind {
                    CursorKind::Constructor | CursorKind::Destructor | CursorKind::CxxMethod => {
                        ReferenceType::MemberFunction
                    }
                    CursorKind::FunctionDecl => ReferenceType::GlobalFunction,
                    _ => ReferenceType::NormalReference,
                };
            }
            self.references.insert(location, (target, reference_type));
        } else if kind == CursorKind::InclusionDirective {
            if let Some(included) = cursor.included_file() {
                let target = Location::file(canonical_path(&included));
                if let Some(info) = self.symbols.get_mut(&location) {
                    info.target = Some(target.clone());
                }
                self.references
                    .insert(location, (target, ReferenceType::NormalReference));
            }
        }
        Visit::Recurse
    }

    /// Qualified-name permutations for a definition, walking semantic
    /// parents inner to outer. Each prefix is recorded with and (when
    /// distinct) without the leaf's parameter list.
    fn add_name_permutations<C: CursorHandle>(&mut self, cursor: &C, location: &Location) {
        let mut qparam = String::new();
        let mut qnoparam = String::new();

        let mut current = Some(cursor.clone());
        while let Some(cur) = current {
            if cur.kind().is_translation_unit() {
                break;
            }
            let name = cur.display_name();
            if name.is_empty() {
                break;
            }
            if qparam.is_empty() {
                qparam = name.clone();
                qnoparam = match name.find('(') {
                    Some(paren) => name[..paren].to_string(),
                    None => name.clone(),
                };
            } else {
                qparam = format!("{name}::{qparam}");
                qnoparam = format!("{name}::{qnoparam}");
            }
            self.symbol_names
                .entry(qparam.clone())
                .or_default()
                .insert(location.clone());
            if qparam != qnoparam {
                self.symbol_names
                    .entry(qnoparam.clone())
                    .or_default()
                    .insert(location.clone());
            }
            current = cur.semantic_parent();
        }
    }
}
