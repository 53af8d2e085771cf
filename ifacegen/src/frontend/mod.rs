//! Owned snapshot of the compiler frontend's syntax tree.
//!
//! The frontend (libclang in practice) is queried once per file and its translation unit is
//! copied into the plain types below. Everything downstream of [`Frontend::parse`] works on
//! this snapshot, so no frontend handles or lifetimes leak into the collector.

use std::path::{Path, PathBuf};

use crate::error::Result;

#[cfg(feature = "libclang")]
pub(crate) mod libclang;
pub(crate) mod include_paths;
pub(crate) mod memory;

/// A compiler frontend able to parse a single file into a [`TranslationUnit`].
pub trait Frontend {
    /// Parse `path` with the given compiler arguments.
    ///
    /// A failure here is fatal for the run: no schema can be produced without the AST.
    fn parse(&self, path: &Path, args: &[String]) -> Result<TranslationUnit>;
}

/// Source location information for tracking where a declaration originated
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceLocation {
    /// The source file path
    pub file: String,
    /// The line number (1-based)
    pub line: usize,
    /// The column number (1-based)
    pub column: usize,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Kind tag of a native type, mirroring the frontend's type kinds that matter here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Void,
    Bool,
    CharS,
    CharU,
    SChar,
    UChar,
    WChar,
    Char16,
    Char32,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    LongLong,
    ULongLong,
    Int128,
    UInt128,
    Float,
    Double,
    LongDouble,
    Pointer,
    LValueReference,
    RValueReference,
    Record,
    Enum,
    Typedef,
    FunctionPrototype,
    /// Any kind the snapshot does not distinguish
    Other,
}

/// A native (C++) type as reported by the frontend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeType {
    pub kind: TypeKind,
    /// Declared spelling, e.g. `const std::string &`
    pub spelling: String,
    pub is_pod: bool,
    pub is_const: bool,
    /// Pointee of a pointer or reference type
    pub pointee: Option<Box<NativeType>>,
}

impl NativeType {
    pub fn new(kind: TypeKind, spelling: impl Into<String>) -> Self {
        Self {
            kind,
            spelling: spelling.into(),
            is_pod: false,
            is_const: false,
            pointee: None,
        }
    }

    /// A scalar type; scalars are always plain-old-data.
    pub fn scalar(kind: TypeKind, spelling: impl Into<String>) -> Self {
        Self::new(kind, spelling).with_pod(true)
    }

    /// A class or struct type named `spelling`.
    pub fn record(spelling: impl Into<String>) -> Self {
        Self::new(TypeKind::Record, spelling)
    }

    pub fn with_pod(mut self, is_pod: bool) -> Self {
        self.is_pod = is_pod;
        self
    }

    pub fn with_const(mut self, is_const: bool) -> Self {
        self.is_const = is_const;
        self
    }

    pub fn with_pointee(mut self, pointee: NativeType) -> Self {
        self.pointee = Some(Box::new(pointee));
        self
    }
}

/// Accessibility of a class member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    Public,
    Protected,
    Private,
}

/// Declaration kinds distinguished by the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    TranslationUnit,
    Namespace,
    StructDecl,
    ClassDecl,
    ClassTemplate,
    TypedefDecl,
    Constructor,
    Destructor,
    Method,
    FunctionDecl,
    FieldDecl,
    ParmDecl,
    InclusionDirective,
    Other,
}

impl DeclKind {
    /// Declaration kinds the extraction looks at; everything else is traversed but ignored.
    pub fn is_concerned(&self) -> bool {
        matches!(
            self,
            DeclKind::StructDecl
                | DeclKind::TypedefDecl
                | DeclKind::ClassDecl
                | DeclKind::Constructor
                | DeclKind::Destructor
                | DeclKind::Method
                | DeclKind::ClassTemplate
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeclKind::TranslationUnit => "TRANSLATION_UNIT",
            DeclKind::Namespace => "NAMESPACE",
            DeclKind::StructDecl => "STRUCT_DECL",
            DeclKind::ClassDecl => "CLASS_DECL",
            DeclKind::ClassTemplate => "CLASS_TEMPLATE",
            DeclKind::TypedefDecl => "TYPEDEF_DECL",
            DeclKind::Constructor => "CONSTRUCTOR",
            DeclKind::Destructor => "DESTRUCTOR",
            DeclKind::Method => "CXX_METHOD",
            DeclKind::FunctionDecl => "FUNCTION_DECL",
            DeclKind::FieldDecl => "FIELD_DECL",
            DeclKind::ParmDecl => "PARM_DECL",
            DeclKind::InclusionDirective => "INCLUSION_DIRECTIVE",
            DeclKind::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for DeclKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name and type of the declaration enclosing another one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRef {
    pub name: String,
    pub ty: NativeType,
}

impl ParentRef {
    pub fn new(name: impl Into<String>, ty: NativeType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// The parent is the class or struct `name` itself.
    pub fn class(name: impl Into<String>) -> Self {
        let name = name.into();
        let ty = NativeType::record(name.clone());
        Self { name, ty }
    }
}

/// A function or method argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub name: String,
    pub ty: NativeType,
    /// Raw lexical tokens of the argument declaration
    pub tokens: Vec<String>,
    pub location: SourceLocation,
}

impl Argument {
    pub fn new(name: impl Into<String>, ty: NativeType) -> Self {
        Self {
            name: name.into(),
            ty,
            tokens: Vec::new(),
            location: SourceLocation::default(),
        }
    }

    pub fn with_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tokens = tokens.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }
}

/// One node of a translation unit's declaration tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decl {
    pub kind: DeclKind,
    /// Plain spelling of the declared name
    pub name: String,
    pub access: Option<Access>,
    pub ty: Option<NativeType>,
    pub result_type: Option<NativeType>,
    pub lexical_parent: Option<ParentRef>,
    pub semantic_parent: Option<ParentRef>,
    /// Arguments of constructors, methods and functions, in declaration order
    pub arguments: Vec<Argument>,
    pub brief_comment: Option<String>,
    pub location: SourceLocation,
    /// File of the translation unit this node was found in
    pub translation_unit: PathBuf,
    /// The frontend failed to make sense of this declaration
    pub invalid: bool,
    /// Written in a header included by `translation_unit` rather than in that file itself
    pub from_include: bool,
}

impl Decl {
    pub fn new(kind: DeclKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            access: None,
            ty: None,
            result_type: None,
            lexical_parent: None,
            semantic_parent: None,
            arguments: Vec::new(),
            brief_comment: None,
            location: SourceLocation::default(),
            translation_unit: PathBuf::new(),
            invalid: false,
            from_include: false,
        }
    }

    pub fn with_access(mut self, access: Access) -> Self {
        self.access = Some(access);
        self
    }

    pub fn with_type(mut self, ty: NativeType) -> Self {
        self.ty = Some(ty);
        self
    }

    pub fn with_result_type(mut self, ty: NativeType) -> Self {
        self.result_type = Some(ty);
        self
    }

    /// Set both lexical and semantic parent.
    pub fn with_parent(mut self, parent: ParentRef) -> Self {
        self.semantic_parent = Some(parent.clone());
        self.lexical_parent = Some(parent);
        self
    }

    pub fn with_argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn with_brief_comment(mut self, comment: impl Into<String>) -> Self {
        self.brief_comment = Some(comment.into());
        self
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    pub fn with_from_include(mut self, from_include: bool) -> Self {
        self.from_include = from_include;
        self
    }
}

/// A parsed file: its direct includes in the order the frontend reports them, and its
/// declarations in preorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationUnit {
    pub path: PathBuf,
    pub includes: Vec<PathBuf>,
    pub decls: Vec<Decl>,
}

impl TranslationUnit {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            includes: Vec::new(),
            decls: Vec::new(),
        }
    }

    pub fn with_include(mut self, path: impl Into<PathBuf>) -> Self {
        self.includes.push(path.into());
        self
    }

    /// Append a declaration; its `translation_unit` is set to this unit's path.
    pub fn with_decl(mut self, mut decl: Decl) -> Self {
        decl.translation_unit = self.path.clone();
        self.decls.push(decl);
        self
    }
}
