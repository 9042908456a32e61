//! Closed enumeration over libclang cursor kinds.
//!
//! Variants carry the libclang `CXCursorKind` numbering so the FFI backend
//! converts by value, and the category predicates mirror libclang's
//! `clang_is*` range checks.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CursorKind {
    // Declarations.
    UnexposedDecl,
    StructDecl,
    UnionDecl,
    ClassDecl,
    EnumDecl,
    FieldDecl,
    EnumConstantDecl,
    FunctionDecl,
    VarDecl,
    ParmDecl,
    TypedefDecl,
    CxxMethod,
    Namespace,
    LinkageSpec,
    Constructor,
    Destructor,
    ConversionFunction,
    TemplateTypeParameter,
    NonTypeTemplateParameter,
    FunctionTemplate,
    ClassTemplate,
    ClassTemplatePartialSpecialization,
    NamespaceAlias,
    UsingDirective,
    UsingDeclaration,
    TypeAliasDecl,
    CxxAccessSpecifier,

    // References.
    TypeRef,
    CxxBaseSpecifier,
    TemplateRef,
    NamespaceRef,
    MemberRef,
    LabelRef,
    OverloadedDeclRef,
    VariableRef,

    // Invalid.
    InvalidFile,
    NoDeclFound,
    NotImplemented,
    InvalidCode,

    // Expressions.
    UnexposedExpr,
    DeclRefExpr,
    MemberRefExpr,
    CallExpr,
    BlockExpr,
    IntegerLiteral,
    FloatingLiteral,
    StringLiteral,
    CharacterLiteral,
    ParenExpr,
    UnaryOperator,
    ArraySubscriptExpr,
    BinaryOperator,
    CompoundAssignOperator,
    ConditionalOperator,
    CStyleCastExpr,
    InitListExpr,
    CxxStaticCastExpr,
    CxxDynamicCastExpr,
    CxxReinterpretCastExpr,
    CxxConstCastExpr,
    CxxFunctionalCastExpr,
    CxxTypeidExpr,
    CxxBoolLiteralExpr,
    CxxNullPtrLiteralExpr,
    CxxThisExpr,
    CxxThrowExpr,
    CxxNewExpr,
    CxxDeleteExpr,
    LambdaExpr,

    // Statements.
    UnexposedStmt,
    LabelStmt,
    CompoundStmt,
    CaseStmt,
    DefaultStmt,
    IfStmt,
    SwitchStmt,
    WhileStmt,
    DoStmt,
    ForStmt,
    GotoStmt,
    ContinueStmt,
    BreakStmt,
    ReturnStmt,
    AsmStmt,
    NullStmt,
    DeclStmt,

    TranslationUnit,

    // Preprocessing record.
    PreprocessingDirective,
    MacroDefinition,
    MacroExpansion,
    InclusionDirective,

    /// Any kind this enumeration does not name, kept by raw value.
    Other(u32),
}

impl CursorKind {
    pub fn from_raw(raw: u32) -> Self {
        use CursorKind::*;
        match raw {
            1 => UnexposedDecl,
            2 => StructDecl,
            3 => UnionDecl,
            4 => ClassDecl,
            5 => EnumDecl,
            6 => FieldDecl,
            7 => EnumConstantDecl,
            8 => FunctionDecl,
            9 => VarDecl,
            10 => ParmDecl,
            20 => TypedefDecl,
            21 => CxxMethod,
            22 => Namespace,
            23 => LinkageSpec,
            24 => Constructor,
            25 => Destructor,
            26 => ConversionFunction,
            27 => TemplateTypeParameter,
            28 => NonTypeTemplateParameter,
            30 => FunctionTemplate,
            31 => ClassTemplate,
            32 => ClassTemplatePartialSpecialization,
            33 => NamespaceAlias,
            34 => UsingDirective,
            35 => UsingDeclaration,
            36 => TypeAliasDecl,
            39 => CxxAccessSpecifier,
            43 => TypeRef,
            44 => CxxBaseSpecifier,
            45 => TemplateRef,
            46 => NamespaceRef,
            47 => MemberRef,
            48 => LabelRef,
            49 => OverloadedDeclRef,
            50 => VariableRef,
            70 => InvalidFile,
            71 => NoDeclFound,
            72 => NotImplemented,
            73 => InvalidCode,
            100 => UnexposedExpr,
            101 => DeclRefExpr,
            102 => MemberRefExpr,
            103 => CallExpr,
            105 => BlockExpr,
            106 => IntegerLiteral,
            107 => FloatingLiteral,
            109 => StringLiteral,
            110 => CharacterLiteral,
            111 => ParenExpr,
            112 => UnaryOperator,
            113 => ArraySubscriptExpr,
            114 => BinaryOperator,
            115 => CompoundAssignOperator,
            116 => ConditionalOperator,
            117 => CStyleCastExpr,
            119 => InitListExpr,
            124 => CxxStaticCastExpr,
            125 => CxxDynamicCastExpr,
            126 => CxxReinterpretCastExpr,
            127 => CxxConstCastExpr,
            128 => CxxFunctionalCastExpr,
            129 => CxxTypeidExpr,
            130 => CxxBoolLiteralExpr,
            131 => CxxNullPtrLiteralExpr,
            132 => CxxThisExpr,
            133 => CxxThrowExpr,
            134 => CxxNewExpr,
            135 => CxxDeleteExpr,
            144 => LambdaExpr,
            200 => UnexposedStmt,
            201 => LabelStmt,
            202 => CompoundStmt,
            203 => CaseStmt,
            204 => DefaultStmt,
            205 => IfStmt,
            206 => SwitchStmt,
            207 => WhileStmt,
            208 => DoStmt,
            209 => ForStmt,
            210 => GotoStmt,
            212 => ContinueStmt,
            213 => BreakStmt,
            214 => ReturnStmt,
            215 => AsmStmt,
            230 => NullStmt,
            231 => DeclStmt,
            300 => TranslationUnit,
            500 => PreprocessingDirective,
            501 => MacroDefinition,
            502 => MacroExpansion,
            503 => InclusionDirective,
            other => Other(other),
        }
    }

    pub fn as_raw(self) -> u32 {
        use CursorKind::*;
        match self {
            UnexposedDecl => 1,
            StructDecl => 2,
            UnionDecl => 3,
            ClassDecl => 4,
            EnumDecl => 5,
            FieldDecl => 6,
            EnumConstantDecl => 7,
            FunctionDecl => 8,
            VarDecl => 9,
            ParmDecl => 10,
            TypedefDecl => 20,
            CxxMethod => 21,
            Namespace => 22,
            LinkageSpec => 23,
            Constructor => 24,
            Destructor => 25,
            ConversionFunction => 26,
            TemplateTypeParameter => 27,
            NonTypeTemplateParameter => 28,
            FunctionTemplate => 30,
            ClassTemplate => 31,
            ClassTemplatePartialSpecialization => 32,
            NamespaceAlias => 33,
            UsingDirective => 34,
            UsingDeclaration => 35,
            TypeAliasDecl => 36,
            CxxAccessSpecifier => 39,
            TypeRef => 43,
            CxxBaseSpecifier => 44,
            TemplateRef => 45,
            NamespaceRef => 46,
            MemberRef => 47,
            LabelRef => 48,
            OverloadedDeclRef => 49,
            VariableRef => 50,
            InvalidFile => 70,
            NoDeclFound => 71,
            NotImplemented => 72,
            InvalidCode => 73,
            UnexposedExpr => 100,
            DeclRefExpr => 101,
            MemberRefExpr => 102,
            CallExpr => 103,
            BlockExpr => 105,
            IntegerLiteral => 106,
            FloatingLiteral => 107,
            StringLiteral => 109,
            CharacterLiteral => 110,
            ParenExpr => 111,
            UnaryOperator => 112,
            ArraySubscriptExpr => 113,
            BinaryOperator => 114,
            CompoundAssignOperator => 115,
            ConditionalOperator => 116,
            CStyleCastExpr => 117,
            InitListExpr => 119,
            CxxStaticCastExpr => 124,
            CxxDynamicCastExpr => 125,
            CxxReinterpretCastExpr => 126,
            CxxConstCastExpr => 127,
            CxxFunctionalCastExpr => 128,
            CxxTypeidExpr => 129,
            CxxBoolLiteralExpr => 130,
            CxxNullPtrLiteralExpr => 131,
            CxxThisExpr => 132,
            CxxThrowExpr => 133,
            CxxNewExpr => 134,
            CxxDeleteExpr => 135,
            LambdaExpr => 144,
            UnexposedStmt => 200,
            LabelStmt => 201,
            CompoundStmt => 202,
            CaseStmt => 203,
            DefaultStmt => 204,
            IfStmt => 205,
            SwitchStmt => 206,
            WhileStmt => 207,
            DoStmt => 208,
            ForStmt => 209,
            GotoStmt => 210,
            ContinueStmt => 212,
            BreakStmt => 213,
            ReturnStmt => 214,
            AsmStmt => 215,
            NullStmt => 230,
            DeclStmt => 231,
            TranslationUnit => 300,
            PreprocessingDirective => 500,
            MacroDefinition => 501,
            MacroExpansion => 502,
            InclusionDirective => 503,
            Other(raw) => raw,
        }
    }

    pub fn is_invalid(self) -> bool {
        (70..=73).contains(&self.as_raw())
    }

    #[allow(dead_code)]
    pub fn is_declaration(self) -> bool {
        (1..=39).contains(&self.as_raw())
    }

    pub fn is_reference(self) -> bool {
        (40..=50).contains(&self.as_raw())
    }

    #[allow(dead_code)]
    pub fn is_expression(self) -> bool {
        (100..=153).contains(&self.as_raw())
    }

    #[allow(dead_code)]
    pub fn is_statement(self) -> bool {
        (200..=247).contains(&self.as_raw())
    }

    pub fn is_translation_unit(self) -> bool {
        self.as_raw() == 300
    }
}
