//! Turning walked declarations into method records of one target class.
//!
//! The collector only walks and stores; which declarations become methods is decided here.

use std::{io::Write, path::Path};

use regex::Regex;
use roxygen::roxygen;

use crate::{
    api::{
        collector::Collector,
        diagnostics::{DiagnosticKind, Diagnostics},
        record::{Method, MethodKind, MethodParam, ParamType, ReturnType},
        validate::{check_arg_valid, check_valid},
    },
    error::Result,
    frontend::{Access, Decl, Frontend, NativeType, ParentRef, SourceLocation, TypeKind},
    types::{
        conversion::{from_target_expr, to_target_expr, to_target_param_kind},
        naming::{to_target_method_name, to_target_type_name},
        primitive::is_unmapped_primitive,
    },
};

/// Which members of which class are extracted
///
/// # Example
///
/// ```
/// let options = ifacegen::ExtractOptions::builder("symbol")
///     .access(ifacegen::Access::Public)
///     .build();
/// assert_eq!(options.target_class(), "symbol");
/// ```
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    target_class: String,
    access: Access,
}

impl ExtractOptions {
    pub fn builder(target_class: impl Into<String>) -> ExtractOptionsBuilder {
        ExtractOptionsBuilder {
            target_class: target_class.into(),
            access: Access::Public,
        }
    }

    pub fn target_class(&self) -> &str {
        &self.target_class
    }

    pub fn access(&self) -> Access {
        self.access
    }
}

pub struct ExtractOptionsBuilder {
    target_class: String,
    access: Access,
}

impl ExtractOptionsBuilder {
    /// Accessibility a member must have to be extracted. Defaults to public.
    #[roxygen]
    pub fn access(
        mut self,
        /// Required accessibility
        access: Access,
    ) -> Self {
        self.access = access;
        self
    }

    pub fn build(self) -> ExtractOptions {
        ExtractOptions {
            target_class: self.target_class,
            access: self.access,
        }
    }
}

/// Parse `header`, walk it and add the target class's methods to the collector.
///
/// Frontend failures are fatal; everything else is reported to `diagnostics`.
pub fn extract_class<F: Frontend + ?Sized>(
    collector: &mut Collector,
    frontend: &F,
    header: &Path,
    options: &ExtractOptions,
    diagnostics: &mut Diagnostics,
) -> Result<()> {
    extract_classes(collector, frontend, header, std::slice::from_ref(options), diagnostics)
}

/// Walk `header` once and collect the methods of every class in `options`.
///
/// In recursive mode the classes are looked up in every declaration the collector has
/// walked so far, since headers visited by an earlier extraction are not walked again.
/// A header already visited is not parsed either.
pub fn extract_classes<F: Frontend + ?Sized>(
    collector: &mut Collector,
    frontend: &F,
    header: &Path,
    options: &[ExtractOptions],
    diagnostics: &mut Diagnostics,
) -> Result<()> {
    let decls = if collector.is_recursive() {
        if !collector.is_visited(header) {
            let tu = collector.parse(frontend, header)?;
            collector.walk(frontend, tu)?;
        }
        collector.walked_decls().to_vec()
    } else {
        let tu = collector.parse(frontend, header)?;
        collector.walk(frontend, tu)?
    };
    for options in options {
        if is_extracted(collector, &options.target_class) {
            log::warn!("`{}` already extracted", options.target_class);
            continue;
        }
        collect_methods(collector, &decls, options, diagnostics);
        if !is_extracted(collector, &options.target_class) {
            log::warn!(
                "No {:?} members of `{}` in {}",
                options.access,
                options.target_class,
                header.display()
            );
        }
    }
    Ok(())
}

fn is_extracted(collector: &Collector, class: &str) -> bool {
    collector
        .class_interfaces()
        .any(|i| i.class_type.native_name == class)
}

/// Add a method record for every constructor and method of the target class in `decls`.
pub fn collect_methods(
    collector: &mut Collector,
    decls: &[Decl],
    options: &ExtractOptions,
    diagnostics: &mut Diagnostics,
) {
    for decl in decls.iter().filter(|d| d.kind.is_concerned()) {
        check_valid(decl, diagnostics);
        if decl.access != Some(options.access) {
            continue;
        }
        let Some(parent) = decl
            .lexical_parent
            .as_ref()
            .filter(|p| p.name == options.target_class)
        else {
            continue;
        };
        let Ok(kind) = MethodKind::try_from(decl.kind) else {
            continue;
        };

        let method = build_method(kind, decl, parent, diagnostics);
        match collector.find_or_create_type(&parent.name, &parent.ty) {
            Ok(class_type) => class_type.methods.push(method),
            Err(e) => diagnostics.warn(
                DiagnosticKind::TargetNameCollision,
                e.to_string(),
                Some(&decl.location),
            ),
        }
    }
}

fn build_method(
    kind: MethodKind,
    decl: &Decl,
    parent: &ParentRef,
    diagnostics: &mut Diagnostics,
) -> Method {
    let params = decl
        .arguments
        .iter()
        .map(|arg| {
            check_arg_valid(arg, diagnostics);
            let target = to_target_param_kind(arg, diagnostics);
            report_unmapped(&target, &arg.location, diagnostics);
            MethodParam {
                name: arg.name.clone(),
                ty: ParamType {
                    target,
                    native: arg.ty.spelling.clone(),
                    from_target_expr: from_target_expr(&arg.ty.spelling, &arg.location, diagnostics),
                },
            }
        })
        .collect();

    // Constructors return the class itself
    let (native, native_type) = match kind {
        MethodKind::Constructor => (parent.name.clone(), parent.ty.clone()),
        MethodKind::CxxMethod => {
            let result = decl
                .result_type
                .clone()
                .unwrap_or_else(|| NativeType::new(TypeKind::Void, "void"));
            (result.spelling.clone(), result)
        }
    };
    let target = to_target_type_name(&native, &native_type);
    report_unmapped(&target, &decl.location, diagnostics);

    Method {
        kind,
        target_name: to_target_method_name(&decl.name, kind),
        native_name: decl.name.clone(),
        params,
        return_type: ReturnType {
            target,
            to_target_expr: to_target_expr(&native),
            native,
        },
    }
}

fn report_unmapped(target: &str, location: &SourceLocation, diagnostics: &mut Diagnostics) {
    if is_unmapped_primitive(target) {
        diagnostics.warn(
            DiagnosticKind::UnmappedPrimitive,
            format!("Unmapped primitive type {target}"),
            Some(location),
        );
    }
}

/// Options of [`dump_declarations`]
#[derive(Debug, Clone, Default)]
pub struct DumpOptions {
    /// Removed from file paths before printing, e.g. `.*/build/ginac-1.8.7/`
    pub path_root: Option<Regex>,
    /// Only members of this class are dumped when set
    pub target_class: Option<String>,
}

/// Write a listing of every public declaration of interest in `decls`.
///
/// One line per declaration with its file, kind, type and qualified names, its brief doc
/// comment if any, and one line per argument of constructors and methods. Arguments are
/// validated on the way, so the listing doubles as a survey of resolution failures.
pub fn dump_declarations<W: Write>(
    out: &mut W,
    decls: &[Decl],
    options: &DumpOptions,
    diagnostics: &mut Diagnostics,
) -> std::io::Result<()> {
    for decl in decls.iter().filter(|d| d.kind.is_concerned()) {
        check_valid(decl, diagnostics);
        if decl.access != Some(Access::Public) {
            continue;
        }
        let lexical = decl.lexical_parent.as_ref().map_or("", |p| p.name.as_str());
        if options
            .target_class
            .as_ref()
            .is_some_and(|target| target != lexical)
        {
            continue;
        }
        let semantic = decl.semantic_parent.as_ref().map_or("", |p| p.name.as_str());
        let file = decl.translation_unit.display().to_string();
        let file = match &options.path_root {
            Some(root) => root.replace(&file, "").into_owned(),
            None => file,
        };
        writeln!(
            out,
            "{} {} {} `{}::{}` `{}::{}`",
            file,
            decl.kind,
            decl.ty.as_ref().map_or("", |t| t.spelling.as_str()),
            lexical,
            decl.name,
            semantic,
            decl.name
        )?;
        if let Some(comment) = &decl.brief_comment {
            writeln!(out, "\tDOC: {comment}")?;
        }
        if MethodKind::try_from(decl.kind).is_err() {
            continue;
        }
        for arg in &decl.arguments {
            check_arg_valid(arg, diagnostics);
            let ty = &arg.ty;
            let pointee = ty.pointee.as_deref();
            let flags = [
                (ty.is_pod, "pod"),
                (ty.is_const, "const_qualified"),
                (pointee.is_some_and(|p| p.is_pod), "pointee_pod"),
                (pointee.is_some_and(|p| p.is_const), "pointee_const_qualified"),
            ];
            let flags: Vec<&str> = flags
                .iter()
                .filter(|(set, _)| *set)
                .map(|(_, name)| *name)
                .collect();
            writeln!(
                out,
                "\t{} {} ...... {} ...... {} ...... {:?}",
                ty.spelling,
                arg.name,
                pointee.map_or("", |p| p.spelling.as_str()),
                flags.join(" "),
                arg.tokens
            )?;
        }
    }
    Ok(())
}
