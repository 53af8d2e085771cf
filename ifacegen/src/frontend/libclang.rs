//! libclang-backed frontend.
//!
//! libclang is loaded at runtime, so building the crate does not require it to be installed.
//! Only one [`ClangFrontend`] may be alive per thread (a libclang restriction).

use std::path::{Path, PathBuf};

use clang::{Accessibility, Clang, Entity, EntityKind, Index};

use crate::{
    error::{Error, Result},
    frontend::{
        Access, Argument, Decl, DeclKind, Frontend, NativeType, ParentRef, SourceLocation,
        TranslationUnit, TypeKind,
    },
};

pub struct ClangFrontend {
    clang: Clang,
}

impl ClangFrontend {
    /// Load libclang and create the frontend.
    pub fn new() -> Result<Self> {
        let clang = Clang::new().map_err(|message| Error::Frontend {
            path: PathBuf::new(),
            message: format!("cannot initialize libclang: {message}"),
        })?;
        Ok(Self { clang })
    }
}

impl Frontend for ClangFrontend {
    fn parse(&self, path: &Path, args: &[String]) -> Result<TranslationUnit> {
        let index = Index::new(&self.clang, false, false);
        let tu = index
            .parser(path)
            .arguments(args)
            .detailed_preprocessing_record(true)
            .skip_function_bodies(true)
            .parse()
            .map_err(|e| Error::Frontend {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        log::info!("Parsed {}", path.display());

        let root = tu.get_entity();
        let mut unit = TranslationUnit::new(path);
        unit.includes = direct_includes(&root);
        unit.decls.push(snapshot_decl(&root, path, false));
        for child in root.get_children() {
            let from_include = !in_main_file(&child);
            snapshot_entity(child, path, from_include, &mut unit.decls);
        }
        Ok(unit)
    }
}

/// Files included by inclusion directives of the main file itself, in source order.
fn direct_includes(root: &Entity<'_>) -> Vec<PathBuf> {
    root.get_children()
        .into_iter()
        .filter(|e| e.get_kind() == EntityKind::InclusionDirective)
        .filter(in_main_file)
        .filter_map(|e| e.get_file().map(|f| f.get_path()))
        .collect()
}

fn in_main_file(entity: &Entity<'_>) -> bool {
    entity
        .get_location()
        .is_some_and(|l| l.is_in_main_file())
}

/// Snapshot `entity` and its subtree in preorder. `from_include` marks a subtree written in
/// an included header.
fn snapshot_entity(entity: Entity<'_>, tu_path: &Path, from_include: bool, out: &mut Vec<Decl>) {
    out.push(snapshot_decl(&entity, tu_path, from_include));
    for child in entity.get_children() {
        snapshot_entity(child, tu_path, from_include, out);
    }
}

fn snapshot_decl(entity: &Entity<'_>, tu_path: &Path, from_include: bool) -> Decl {
    let kind = decl_kind(entity.get_kind());
    let arguments = match kind {
        DeclKind::Constructor | DeclKind::Method | DeclKind::FunctionDecl => entity
            .get_arguments()
            .unwrap_or_default()
            .iter()
            .map(snapshot_argument)
            .collect(),
        _ => Vec::new(),
    };
    Decl {
        kind,
        name: entity.get_name().unwrap_or_default(),
        access: entity.get_accessibility().map(|a| match a {
            Accessibility::Public => Access::Public,
            Accessibility::Protected => Access::Protected,
            Accessibility::Private => Access::Private,
        }),
        ty: entity.get_type().map(snapshot_type),
        result_type: entity.get_result_type().map(snapshot_type),
        lexical_parent: entity.get_lexical_parent().map(|p| parent_ref(&p)),
        semantic_parent: entity.get_semantic_parent().map(|p| parent_ref(&p)),
        arguments,
        brief_comment: entity.get_comment_brief(),
        location: source_location(entity),
        translation_unit: tu_path.to_path_buf(),
        invalid: matches!(
            entity.get_kind(),
            EntityKind::InvalidFile
                | EntityKind::NotImplemented
                | EntityKind::InvalidCode
        ),
        from_include,
    }
}

fn snapshot_argument(entity: &Entity<'_>) -> Argument {
    let ty = entity
        .get_type()
        .map(snapshot_type)
        .unwrap_or_else(|| NativeType::new(TypeKind::Other, ""));
    let tokens = entity
        .get_range()
        .map(|range| range.tokenize().iter().map(|t| t.get_spelling()).collect())
        .unwrap_or_default();
    Argument {
        name: entity.get_name().unwrap_or_default(),
        ty,
        tokens,
        location: source_location(entity),
    }
}

fn parent_ref(entity: &Entity<'_>) -> ParentRef {
    ParentRef {
        name: entity.get_name().unwrap_or_default(),
        ty: entity
            .get_type()
            .map(snapshot_type)
            .unwrap_or_else(|| NativeType::new(TypeKind::Other, "")),
    }
}

fn snapshot_type(ty: clang::Type<'_>) -> NativeType {
    NativeType {
        kind: type_kind(ty.get_kind()),
        spelling: ty.get_display_name(),
        is_pod: ty.is_pod(),
        is_const: ty.is_const_qualified(),
        pointee: ty.get_pointee_type().map(|p| Box::new(snapshot_type(p))),
    }
}

fn source_location(entity: &Entity<'_>) -> SourceLocation {
    entity
        .get_location()
        .map(|l| {
            let location = l.get_file_location();
            SourceLocation {
                file: location
                    .file
                    .map(|f| f.get_path().display().to_string())
                    .unwrap_or_default(),
                line: location.line as usize,
                column: location.column as usize,
            }
        })
        .unwrap_or_default()
}

fn decl_kind(kind: EntityKind) -> DeclKind {
    match kind {
        EntityKind::TranslationUnit => DeclKind::TranslationUnit,
        EntityKind::Namespace => DeclKind::Namespace,
        EntityKind::StructDecl => DeclKind::StructDecl,
        EntityKind::ClassDecl => DeclKind::ClassDecl,
        EntityKind::ClassTemplate => DeclKind::ClassTemplate,
        EntityKind::TypedefDecl => DeclKind::TypedefDecl,
        EntityKind::Constructor => DeclKind::Constructor,
        EntityKind::Destructor => DeclKind::Destructor,
        EntityKind::Method => DeclKind::Method,
        EntityKind::FunctionDecl => DeclKind::FunctionDecl,
        EntityKind::FieldDecl => DeclKind::FieldDecl,
        EntityKind::ParmDecl => DeclKind::ParmDecl,
        EntityKind::InclusionDirective => DeclKind::InclusionDirective,
        _ => DeclKind::Other,
    }
}

fn type_kind(kind: clang::TypeKind) -> TypeKind {
    use clang::TypeKind as K;
    match kind {
        K::Void => TypeKind::Void,
        K::Bool => TypeKind::Bool,
        K::CharS => TypeKind::CharS,
        K::CharU => TypeKind::CharU,
        K::SChar => TypeKind::SChar,
        K::UChar => TypeKind::UChar,
        K::WChar => TypeKind::WChar,
        K::Char16 => TypeKind::Char16,
        K::Char32 => TypeKind::Char32,
        K::Short => TypeKind::Short,
        K::UShort => TypeKind::UShort,
        K::Int => TypeKind::Int,
        K::UInt => TypeKind::UInt,
        K::Long => TypeKind::Long,
        K::ULong => TypeKind::ULong,
        K::LongLong => TypeKind::LongLong,
        K::ULongLong => TypeKind::ULongLong,
        K::Int128 => TypeKind::Int128,
        K::UInt128 => TypeKind::UInt128,
        K::Float => TypeKind::Float,
        K::Double => TypeKind::Double,
        K::LongDouble => TypeKind::LongDouble,
        K::Pointer => TypeKind::Pointer,
        K::LValueReference => TypeKind::LValueReference,
        K::RValueReference => TypeKind::RValueReference,
        K::Record => TypeKind::Record,
        K::Enum => TypeKind::Enum,
        K::Typedef => TypeKind::Typedef,
        K::FunctionPrototype => TypeKind::FunctionPrototype,
        _ => TypeKind::Other,
    }
}
