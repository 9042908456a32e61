//! In-memory fake front end for exercising the index job without libclang.
//!
//! Tests script a cursor tree and an inclusion list per input file; behavior
//! toggles cover parse failure (no unit registered) and save failure.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::{
    CursorHandle, CursorKind, Inclusion, ParserFrontEnd, SaveError, TranslationUnitHandle, Visit,
};

/// What a fake cursor's `referenced`/`definition` lookup resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefTarget {
    None,
    SelfRef,
    Node(usize),
}

#[derive(Debug, Clone)]
pub struct FakeNode {
    pub kind: CursorKind,
    pub spelling: String,
    pub display_name: String,
    pub usr: String,
    pub location: Option<(PathBuf, u32)>,
    pub is_definition: bool,
    pub referenced: RefTarget,
    pub definition: RefTarget,
    pub included_file: Option<PathBuf>,
    semantic_parent_override: Option<usize>,
    structural_parent: Option<usize>,
    children: Vec<usize>,
}

impl FakeNode {
    pub fn new(kind: CursorKind) -> Self {
        Self {
            kind,
            spelling: String::new(),
            display_name: String::new(),
            usr: String::new(),
            location: None,
            is_definition: false,
            // Declarations refer to themselves, like libclang.
            referenced: if kind.is_declaration() {
                RefTarget::SelfRef
            } else {
                RefTarget::None
            },
            definition: RefTarget::None,
            included_file: None,
            semantic_parent_override: None,
            structural_parent: None,
            children: Vec::new(),
        }
    }

    pub fn named(kind: CursorKind, name: &str) -> Self {
        let mut node = Self::new(kind);
        node.spelling = name.to_string();
        node.display_name = name.to_string();
        node
    }

    pub fn at(mut self, path: &str, offset: u32) -> Self {
        self.location = Some((PathBuf::from(path), offset));
        self
    }

    /// Display name with extras (e.g. a parameter list) differing from the
    /// spelling.
    pub fn display(mut self, display_name: &str) -> Self {
        self.display_name = display_name.to_string();
        self
    }

    pub fn usr(mut self, usr: &str) -> Self {
        self.usr = usr.to_string();
        self
    }

    /// Mark the node as a definition (it then defines itself).
    pub fn definition(mut self) -> Self {
        self.is_definition = true;
        self.definition = RefTarget::SelfRef;
        self
    }

    pub fn refers_to(mut self, node: usize) -> Self {
        self.referenced = RefTarget::Node(node);
        self
    }

    pub fn defined_at(mut self, node: usize) -> Self {
        self.definition = RefTarget::Node(node);
        self
    }

    pub fn includes(mut self, file: &str) -> Self {
        self.included_file = Some(PathBuf::from(file));
        self
    }

    /// Override the semantic parent (defaults to the structural parent).
    pub fn semantic_parent(mut self, node: usize) -> Self {
        self.semantic_parent_override = Some(node);
        self
    }
}

pub struct FakeUnitBuilder {
    nodes: Vec<FakeNode>,
    inclusions: Vec<Inclusion>,
    save_fails: bool,
}

impl FakeUnitBuilder {
    pub const ROOT: usize = 0;

    pub fn new() -> Self {
        Self {
            nodes: vec![FakeNode::new(CursorKind::TranslationUnit)],
            inclusions: Vec::new(),
            save_fails: false,
        }
    }

    pub fn add(&mut self, parent: usize, mut node: FakeNode) -> usize {
        let id = self.nodes.len();
        node.structural_parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent].children.push(id);
        id
    }

    /// Register an inclusion callback: `file` was included through `stack`
    /// (most immediate includer first).
    pub fn include(&mut self, file: &str, stack: &[&str]) {
        self.inclusions.push(Inclusion {
            file: PathBuf::from(file),
            include_stack: stack.iter().map(PathBuf::from).collect(),
        });
    }

    pub fn fail_save(&mut self) {
        self.save_fails = true;
    }

    pub fn build(self) -> FakeTranslationUnit {
        FakeTranslationUnit {
            data: Arc::new(UnitData {
                nodes: self.nodes,
                inclusions: self.inclusions,
                save_fails: self.save_fails,
                saved_to: Mutex::new(Vec::new()),
            }),
        }
    }
}

struct UnitData {
    nodes: Vec<FakeNode>,
    inclusions: Vec<Inclusion>,
    save_fails: bool,
    saved_to: Mutex<Vec<PathBuf>>,
}

#[derive(Clone)]
pub struct FakeTranslationUnit {
    data: Arc<UnitData>,
}

impl FakeTranslationUnit {
    pub fn saved_paths(&self) -> Vec<PathBuf> {
        self.data.saved_to.lock().unwrap().clone()
    }
}

impl TranslationUnitHandle for FakeTranslationUnit {
    type Cursor = FakeCursor;

    fn cursor(&self) -> FakeCursor {
        FakeCursor {
            data: Arc::clone(&self.data),
            id: FakeUnitBuilder::ROOT,
        }
    }

    fn inclusions(&self) -> Vec<Inclusion> {
        self.data.inclusions.clone()
    }

    fn save(&self, path: &Path) -> Result<(), SaveError> {
        if self.data.save_fails {
            return Err(SaveError::Failed {
                path: path.to_path_buf(),
                reason: "scripted save failure".into(),
            });
        }
        std::fs::write(path, b"fake serialized translation unit\n").map_err(|err| {
            SaveError::Failed {
                path: path.to_path_buf(),
                reason: err.to_string(),
            }
        })?;
        self.data.saved_to.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

#[derive(Clone)]
pub struct FakeCursor {
    data: Arc<UnitData>,
    id: usize,
}

impl PartialEq for FakeCursor {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data) && self.id == other.id
    }
}

impl FakeCursor {
    fn node(&self) -> &FakeNode {
        &self.data.nodes[self.id]
    }

    fn at_id(&self, id: usize) -> FakeCursor {
        FakeCursor {
            data: Arc::clone(&self.data),
            id,
        }
    }

    fn resolve(&self, target: RefTarget) -> Option<FakeCursor> {
        match target {
            RefTarget::None => None,
            RefTarget::SelfRef => Some(self.clone()),
            RefTarget::Node(id) => Some(self.at_id(id)),
        }
    }
}

impl CursorHandle for FakeCursor {
    fn kind(&self) -> CursorKind {
        self.node().kind
    }

    fn location(&self) -> Option<(PathBuf, u32)> {
        self.node().location.clone()
    }

    fn spelling(&self) -> String {
        self.node().spelling.clone()
    }

    fn display_name(&self) -> String {
        self.node().display_name.clone()
    }

    fn usr(&self) -> String {
        self.node().usr.clone()
    }

    fn referenced(&self) -> Option<Self> {
        self.resolve(self.node().referenced)
    }

    fn definition(&self) -> Option<Self> {
        self.resolve(self.node().definition)
    }

    fn is_definition(&self) -> bool {
        self.node().is_definition
    }

    fn semantic_parent(&self) -> Option<Self> {
        self.node()
            .semantic_parent_override
            .or(self.node().structural_parent)
            .map(|id| self.at_id(id))
    }

    fn included_file(&self) -> Option<PathBuf> {
        self.node().included_file.clone()
    }

    fn visit_children(&self, visitor: &mut dyn FnMut(Self) -> Visit) -> Visit {
        for &child_id in &self.node().children {
            let child = self.at_id(child_id);
            match visitor(child.clone()) {
                Visit::Break => return Visit::Break,
                Visit::Recurse => {
                    if child.visit_children(visitor) == Visit::Break {
                        return Visit::Break;
                    }
                }
            }
        }
        Visit::Recurse
    }
}

/// Fake parser: hands out pre-built units by input path; an unregistered
/// input is a parse failure.
pub struct FakeFrontEnd {
    units: Mutex<HashMap<PathBuf, FakeTranslationUnit>>,
    parses: Mutex<Vec<(PathBuf, Vec<String>)>>,
}

impl FakeFrontEnd {
    pub fn new() -> Self {
        Self {
            units: Mutex::new(HashMap::new()),
            parses: Mutex::new(Vec::new()),
        }
    }

    pub fn add_unit(&self, input: &str, unit: FakeTranslationUnit) {
        self.units
            .lock()
            .unwrap()
            .insert(PathBuf::from(input), unit);
    }

    /// Every `(input, args)` pair the parser was invoked with.
    pub fn parsed(&self) -> Vec<(PathBuf, Vec<String>)> {
        self.parses.lock().unwrap().clone()
    }
}

impl ParserFrontEnd for FakeFrontEnd {
    type Unit = FakeTranslationUnit;

    fn parse(&self, input: &Path, args: &[String]) -> Option<FakeTranslationUnit> {
        self.parses
            .lock()
            .unwrap()
            .push((input.to_path_buf(), args.to_vec()));
        self.units.lock().unwrap().get(input).cloned()
    }
}
