//! libclang backend for the parser front-end traits.
//!
//! Binds through `clang-sys` with its runtime loader, so the crate builds and
//! unit-tests without a libclang installation; the library is loaded on first
//! front-end construction. Every libclang object with a dispose function is
//! wrapped in an owning guard so all exit paths release it.

use std::ffi::{CStr, CString};
use std::os::raw::c_uint;
use std::path::{Path, PathBuf};
use std::ptr;

use clang_sys::*;

use super::{CursorHandle, CursorKind, Inclusion, ParserFrontEnd, SaveError, TranslationUnitHandle, Visit};

#[derive(Debug, thiserror::Error)]
pub enum ClangError {
    #[error("could not load libclang: {0}")]
    Load(String),
}

/// Scoped guard for a `CXString`; disposal is paired with creation on every
/// exit path.
struct CxString(CXString);

impl CxString {
    /// Safety: `raw` must be a `CXString` owned by the caller and not
    /// disposed elsewhere.
    unsafe fn new(raw: CXString) -> Self {
        Self(raw)
    }

    fn to_string(&self) -> String {
        unsafe {
            let cstr = clang_getCString(self.0);
            if cstr.is_null() {
                return String::new();
            }
            CStr::from_ptr(cstr).to_string_lossy().into_owned()
        }
    }
}

impl Drop for CxString {
    fn drop(&mut self) {
        unsafe { clang_disposeString(self.0) };
    }
}

struct OwnedIndex(CXIndex);

impl Drop for OwnedIndex {
    fn drop(&mut self) {
        unsafe { clang_disposeIndex(self.0) };
    }
}

// CXIndex and CXTranslationUnit are plain pointers into libclang; the unit is
// only touched from the thread that owns the job.
unsafe impl Send for ClangTranslationUnit {}

/// A parsed translation unit plus the index it was parsed under. The unit is
/// disposed first, then the index (field order).
pub struct ClangTranslationUnit {
    unit: CXTranslationUnit,
    _index: OwnedIndex,
}

impl Drop for ClangTranslationUnit {
    fn drop(&mut self) {
        unsafe { clang_disposeTranslationUnit(self.unit) };
    }
}

impl TranslationUnitHandle for ClangTranslationUnit {
    type Cursor = ClangCursor;

    fn cursor(&self) -> ClangCursor {
        ClangCursor {
            raw: unsafe { clang_getTranslationUnitCursor(self.unit) },
        }
    }

    fn inclusions(&self) -> Vec<Inclusion> {
        let mut out: Vec<Inclusion> = Vec::new();
        let data = &mut out as *mut Vec<Inclusion> as CXClientData;
        unsafe { clang_getInclusions(self.unit, inclusion_trampoline, data) };
        out
    }

    fn save(&self, path: &Path) -> Result<(), SaveError> {
        let c_path = path_to_cstring(path).ok_or_else(|| SaveError::Failed {
            path: path.to_path_buf(),
            reason: "path is not representable as a C string".into(),
        })?;
        let status = unsafe {
            clang_saveTranslationUnit(self.unit, c_path.as_ptr(), clang_defaultSaveOptions(self.unit))
        };
        if status == CXSaveError_None {
            Ok(())
        } else {
            Err(SaveError::Failed {
                path: path.to_path_buf(),
                reason: format!("libclang save error {status}"),
            })
        }
    }
}

/// Parses translation units through libclang.
pub struct LibclangFrontEnd(());

impl LibclangFrontEnd {
    pub fn new() -> Result<Self, ClangError> {
        if !clang_sys::is_loaded() {
            clang_sys::load().map_err(ClangError::Load)?;
        }
        Ok(Self(()))
    }
}

impl ParserFrontEnd for LibclangFrontEnd {
    type Unit = ClangTranslationUnit;

    fn parse(&self, input: &Path, args: &[String]) -> Option<ClangTranslationUnit> {
        let c_input = path_to_cstring(input)?;
        let c_args: Vec<CString> = args
            .iter()
            .filter_map(|arg| CString::new(arg.as_str()).ok())
            .collect();
        let arg_ptrs: Vec<*const std::os::raw::c_char> =
            c_args.iter().map(|arg| arg.as_ptr()).collect();

        // excludeDeclarationsFromPCH=1, displayDiagnostics=1: consumers of a
        // PCH see its declarations through the USR index, not re-parsed.
        let index = OwnedIndex(unsafe { clang_createIndex(1, 1) });
        let unit = unsafe {
            clang_parseTranslationUnit(
                index.0,
                c_input.as_ptr(),
                arg_ptrs.as_ptr(),
                arg_ptrs.len() as _,
                ptr::null_mut(),
                0,
                (CXTranslationUnit_Incomplete | CXTranslationUnit_DetailedPreprocessingRecord)
                    as _,
            )
        };
        if unit.is_null() {
            return None;
        }
        Some(ClangTranslationUnit { unit, _index: index })
    }
}

/// A libclang cursor. Copyable by value; equality is libclang's cursor
/// equality.
#[derive(Clone, Copy)]
pub struct ClangCursor {
    raw: CXCursor,
}

impl PartialEq for ClangCursor {
    fn eq(&self, other: &Self) -> bool {
        unsafe { clang_equalCursors(self.raw, other.raw) != 0 }
    }
}

impl ClangCursor {
    fn non_null(raw: CXCursor) -> Option<Self> {
        if unsafe { clang_Cursor_isNull(raw) } != 0 {
            None
        } else {
            Some(Self { raw })
        }
    }
}

impl CursorHandle for ClangCursor {
    fn kind(&self) -> CursorKind {
        CursorKind::from_raw(unsafe { clang_getCursorKind(self.raw) } as u32)
    }

    fn location(&self) -> Option<(PathBuf, u32)> {
        unsafe {
            let location = clang_getCursorLocation(self.raw);
            if clang_equalLocations(location, clang_getNullLocation()) != 0 {
                return None;
            }
            let mut file: CXFile = ptr::null_mut();
            let mut offset: c_uint = 0;
            clang_getSpellingLocation(
                location,
                &mut file,
                ptr::null_mut(),
                ptr::null_mut(),
                &mut offset,
            );
            file_path(file).map(|path| (path, offset))
        }
    }

    fn spelling(&self) -> String {
        unsafe { CxString::new(clang_getCursorSpelling(self.raw)) }.to_string()
    }

    fn display_name(&self) -> String {
        unsafe { CxString::new(clang_getCursorDisplayName(self.raw)) }.to_string()
    }

    fn usr(&self) -> String {
        // Owned copy; USR keys outlive the translation unit.
        unsafe { CxString::new(clang_getCursorUSR(self.raw)) }.to_string()
    }

    fn referenced(&self) -> Option<Self> {
        Self::non_null(unsafe { clang_getCursorReferenced(self.raw) })
    }

    fn definition(&self) -> Option<Self> {
        Self::non_null(unsafe { clang_getCursorDefinition(self.raw) })
    }

    fn is_definition(&self) -> bool {
        unsafe { clang_isCursorDefinition(self.raw) != 0 }
    }

    fn semantic_parent(&self) -> Option<Self> {
        Self::non_null(unsafe { clang_getCursorSemanticParent(self.raw) })
    }

    fn included_file(&self) -> Option<PathBuf> {
        unsafe { file_path(clang_getIncludedFile(self.raw)) }
    }

    fn visit_children(&self, visitor: &mut dyn FnMut(Self) -> Visit) -> Visit {
        let mut payload: &mut dyn FnMut(ClangCursor) -> Visit = visitor;
        let data = &mut payload as *mut &mut dyn FnMut(ClangCursor) -> Visit as CXClientData;
        let broke = unsafe { clang_visitChildren(self.raw, visit_trampoline, data) };
        if broke != 0 { Visit::Break } else { Visit::Recurse }
    }
}

extern "C" fn visit_trampoline(
    cursor: CXCursor,
    _parent: CXCursor,
    data: CXClientData,
) -> CXChildVisitResult {
    // The client pointer is the job's exclusive borrow, threaded through
    // libclang for the duration of the walk.
    let callback = unsafe { &mut *(data as *mut &mut dyn FnMut(ClangCursor) -> Visit) };
    match callback(ClangCursor { raw: cursor }) {
        Visit::Break => CXChildVisit_Break,
        Visit::Recurse => CXChildVisit_Recurse,
    }
}

extern "C" fn inclusion_trampoline(
    file: CXFile,
    include_stack: *mut CXSourceLocation,
    stack_len: c_uint,
    data: CXClientData,
) {
    let out = unsafe { &mut *(data as *mut Vec<Inclusion>) };
    let Some(path) = (unsafe { file_path(file) }) else {
        return;
    };
    let mut stack = Vec::with_capacity(stack_len as usize);
    for i in 0..stack_len as isize {
        unsafe {
            let location = *include_stack.offset(i);
            let mut origin: CXFile = ptr::null_mut();
            clang_getSpellingLocation(
                location,
                &mut origin,
                ptr::null_mut(),
                ptr::null_mut(),
                ptr::null_mut(),
            );
            if let Some(origin_path) = file_path(origin) {
                stack.push(origin_path);
            }
        }
    }
    out.push(Inclusion {
        file: path,
        include_stack: stack,
    });
}

/// Safety: `file` must be a live `CXFile` or null.
unsafe fn file_path(file: CXFile) -> Option<PathBuf> {
    if file.is_null() {
        return None;
    }
    let name = unsafe { CxString::new(clang_getFileName(file)) }.to_string();
    if name.is_empty() {
        None
    } else {
        Some(PathBuf::from(name))
    }
}

fn path_to_cstring(path: &Path) -> Option<CString> {
    CString::new(path.to_string_lossy().into_owned()).ok()
}
