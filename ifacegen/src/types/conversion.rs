//! Expressions converting values across the native/target boundary.
//!
//! Each expression is a template with a single [`PLACEHOLDER`] standing for the value being
//! converted. Scalars pass through unchanged, which relies on native and target scalars
//! sharing a binary representation.

use crate::{
    api::diagnostics::{DiagnosticKind, Diagnostics},
    frontend::{Argument, SourceLocation},
    types::primitive::{is_primitive, map_primitive},
};

/// Stands for the converted value inside an expression template
pub const PLACEHOLDER: &str = "%s";

/// Parameter kind of a borrowed target string
pub const BORROWED_STRING: &str = "@&String";

pub const UNKNOWN_FROM_TARGET_EXPR: &str = "UNKNOWN_FROM_TARGET_EXPR";
pub const UNKNOWN_TARGET_PARAM_KIND: &str = "UNKNOWN_TARGET_PARAM_KIND";

/// Native type spellings with a known string conversion.
///
/// Matching is on the exact spelling reported by the frontend; `std::string const &` or a
/// typedef of `std::string` are not recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeSpelling {
    /// `const std::string &`
    ConstStdStringRef,
    /// `const char *`
    ConstCharPtr,
    Other,
}

impl NativeSpelling {
    pub fn classify(spelling: &str) -> Self {
        match spelling {
            "const std::string &" => NativeSpelling::ConstStdStringRef,
            "const char *" => NativeSpelling::ConstCharPtr,
            _ => NativeSpelling::Other,
        }
    }
}

/// Expression turning a native value into a target value.
pub fn to_target_expr(spelling: &str) -> String {
    match NativeSpelling::classify(spelling) {
        NativeSpelling::ConstStdStringRef => format!("lean_mk_string({PLACEHOLDER}.c_str())"),
        NativeSpelling::ConstCharPtr => format!("lean_mk_string({PLACEHOLDER})"),
        NativeSpelling::Other => {
            log::debug!("Passing {spelling} to the target as is");
            PLACEHOLDER.to_string()
        }
    }
}

/// Expression turning a target value into a native argument.
pub fn from_target_expr(
    spelling: &str,
    location: &SourceLocation,
    diagnostics: &mut Diagnostics,
) -> String {
    match NativeSpelling::classify(spelling) {
        NativeSpelling::ConstStdStringRef | NativeSpelling::ConstCharPtr => {
            format!("lean_string_cstr({PLACEHOLDER})")
        }
        NativeSpelling::Other => {
            diagnostics.warn(
                DiagnosticKind::UnknownFromTargetExpr,
                format!("Unknown from_target_expr for {spelling}"),
                Some(location),
            );
            UNKNOWN_FROM_TARGET_EXPR.to_string()
        }
    }
}

/// Kind under which an argument is declared in the target signature.
pub fn to_target_param_kind(argument: &Argument, diagnostics: &mut Diagnostics) -> String {
    let ty = &argument.ty;
    if ty.is_pod && is_primitive(ty.kind) {
        return map_primitive(&ty.spelling, ty);
    }
    match NativeSpelling::classify(&ty.spelling) {
        NativeSpelling::ConstStdStringRef => BORROWED_STRING.to_string(),
        NativeSpelling::ConstCharPtr | NativeSpelling::Other => {
            diagnostics.warn(
                DiagnosticKind::UnknownTargetParamKind,
                format!("Unknown target param kind for {}", ty.spelling),
                Some(&argument.location),
            );
            UNKNOWN_TARGET_PARAM_KIND.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::{NativeType, TypeKind};

    fn string_ref() -> NativeType {
        NativeType::new(TypeKind::LValueReference, "const std::string &")
            .with_pointee(NativeType::record("const std::string").with_const(true))
    }

    #[test]
    fn test_to_target_expr_strings() {
        for spelling in ["const std::string &", "const char *"] {
            let expr = to_target_expr(spelling);
            assert_eq!(expr.matches(PLACEHOLDER).count(), 1);
            assert!(expr.starts_with("lean_mk_string("));
        }
        assert_eq!(to_target_expr("const std::string &"), "lean_mk_string(%s.c_str())");
        assert_eq!(to_target_expr("const char *"), "lean_mk_string(%s)");
    }

    #[test]
    fn test_to_target_expr_identity() {
        for spelling in ["int", "unsigned int", "std::string", "symbol", "char *", ""] {
            assert_eq!(to_target_expr(spelling), PLACEHOLDER);
        }
    }

    #[test]
    fn test_from_target_expr() {
        let mut diagnostics = Diagnostics::new();
        let location = SourceLocation::default();
        for spelling in ["const std::string &", "const char *"] {
            assert_eq!(
                from_target_expr(spelling, &location, &mut diagnostics),
                "lean_string_cstr(%s)"
            );
        }
        assert!(diagnostics.is_empty());

        for spelling in ["int", "std::string", "const std::string"] {
            assert_eq!(
                from_target_expr(spelling, &location, &mut diagnostics),
                UNKNOWN_FROM_TARGET_EXPR
            );
        }
        assert_eq!(diagnostics.count(DiagnosticKind::UnknownFromTargetExpr), 3);
    }

    #[test]
    fn test_param_kind() {
        let mut diagnostics = Diagnostics::new();
        let int = Argument::new("n", NativeType::scalar(TypeKind::Int, "int"));
        assert_eq!(to_target_param_kind(&int, &mut diagnostics), "Int32");

        let name = Argument::new("name", string_ref());
        assert_eq!(to_target_param_kind(&name, &mut diagnostics), BORROWED_STRING);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_param_kind_unrecognized() {
        let mut diagnostics = Diagnostics::new();
        // `const char *` converts from a target string but has no declaration kind
        let cstr = Argument::new(
            "s",
            NativeType::new(TypeKind::Pointer, "const char *")
                .with_pointee(NativeType::scalar(TypeKind::CharS, "const char").with_const(true)),
        );
        assert_eq!(to_target_param_kind(&cstr, &mut diagnostics), UNKNOWN_TARGET_PARAM_KIND);

        // non-POD primitive kinds are not mapped either
        let odd = Argument::new("x", NativeType::new(TypeKind::Int, "int"));
        assert_eq!(to_target_param_kind(&odd, &mut diagnostics), UNKNOWN_TARGET_PARAM_KIND);
        assert_eq!(diagnostics.count(DiagnosticKind::UnknownTargetParamKind), 2);
    }
}
