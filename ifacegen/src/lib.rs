//! # ifacegen
//!
//! Extracts the public interface of C++ classes from their headers and describes it as plain
//! nested data that text templates turn into Lean bindings.
//!
//! ## Problem
//!
//! Binding a C++ library to Lean means writing, for every constructor and method, a C shim
//! that converts Lean values to native ones and back, plus the matching `@[extern]`
//! declaration on the Lean side. For a library with hundreds of classes this is tedious and
//! drifts out of date with the headers.
//!
//! ## Solution
//!
//! `ifacegen` parses a header with libclang, walks its declarations (optionally through the
//! non-system headers it includes), and builds one [`ClassInterface`] per class: its methods,
//! their parameter and return types in native and target form, and the expressions that
//! convert values across the boundary. The records are written as JSON and rendered by
//! templates outside of this crate.
//!
//! Nothing in a class that cannot be mapped stops the run. The generated data gets a
//! recognizable sentinel such as `UNKNOWN_FROM_TARGET_EXPR` and a [`Diagnostic`] is reported,
//! so a single pass shows every case that needs attention.
//!
//! ## Usage example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use ifacegen::{ClangFrontend, Collector, Diagnostics, ExtractOptions};
//!
//! fn main() -> ifacegen::Result<()> {
//!     let frontend = ClangFrontend::new()?;
//!     let mut collector = Collector::builder()
//!         .system_include_paths(ifacegen::discover_system_include_paths("clang")?)
//!         .build();
//!     let mut diagnostics = Diagnostics::new();
//!
//!     ifacegen::extract_class(
//!         &mut collector,
//!         &frontend,
//!         Path::new("build/ginac-1.8.7/ginac/symbol.h"),
//!         &ExtractOptions::builder("symbol").build(),
//!         &mut diagnostics,
//!     )?;
//!
//!     // The namespace is chosen by the caller, not derived from the header
//!     let symbol = collector.class_interface_mut("Symbol").unwrap();
//!     symbol.namespace = "Ginac".to_string();
//!     ifacegen::write_schema(Path::new("codegen/data/Symbol.json"), symbol)?;
//!
//!     for line in diagnostics.summary() {
//!         eprintln!("{line}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Without libclang at hand, any [`Frontend`] can stand in, e.g. the [`MemoryFrontend`] used
//! by the tests.

pub(crate) mod api;
pub(crate) mod error;
pub(crate) mod frontend;
pub(crate) mod types;

pub use crate::api::collector::Collector;
pub use crate::api::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use crate::api::extract::{
    collect_methods, dump_declarations, extract_class, extract_classes, DumpOptions,
    ExtractOptions,
};
pub use crate::api::record::{
    ClassInterface, ClassType, Dependency, Method, MethodKind, MethodParam, ParamType,
    ReturnType,
};
pub use crate::api::schema::{read_schema, to_dict, write_schema, Schema};
pub use crate::api::validate::{check_arg_valid, check_valid};
pub use crate::error::{Error, Result};
pub use crate::frontend::include_paths::{
    discover_system_include_paths, parse_include_search_list, DEFAULT_COMPILER,
};
#[cfg(feature = "libclang")]
pub use crate::frontend::libclang::ClangFrontend;
pub use crate::frontend::memory::MemoryFrontend;
pub use crate::frontend::{
    Access, Argument, Decl, DeclKind, Frontend, NativeType, ParentRef, SourceLocation,
    TranslationUnit, TypeKind,
};

/// Configuration of the header walk
pub mod collector {
    pub use crate::api::collector::{Builder, BASE_COMPILE_ARGS};
}

/// Configuration of the method extraction
pub mod extract {
    pub use crate::api::extract::ExtractOptionsBuilder;
}

/// Native to target mapping of types, names and values
pub mod mapping {
    pub use crate::types::conversion::{
        from_target_expr, to_target_expr, to_target_param_kind, NativeSpelling,
        BORROWED_STRING, PLACEHOLDER, UNKNOWN_FROM_TARGET_EXPR, UNKNOWN_TARGET_PARAM_KIND,
    };
    pub use crate::types::naming::{
        to_target_method_name, to_target_type_name, CONSTRUCTOR_TARGET_NAME,
    };
    pub use crate::types::primitive::{
        is_primitive, is_unmapped_primitive, map_primitive, UNMAPPED_PRIMITIVE_PREFIX,
    };
}
