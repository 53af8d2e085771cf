//! Heuristic detection of frontend type resolution failures.

use itertools::Itertools;

use crate::{
    api::diagnostics::{DiagnosticKind, Diagnostics},
    frontend::{Argument, Decl},
};

/// Report a declaration the frontend could not make sense of.
pub fn check_valid(decl: &Decl, diagnostics: &mut Diagnostics) {
    if decl.invalid {
        diagnostics.warn(
            DiagnosticKind::InvalidDeclaration,
            format!("Invalid declaration {} `{}`", decl.kind, decl.name),
            Some(&decl.location),
        );
    }
}

/// Report an argument whose resolved type looks like a silent fallback to `int`.
///
/// libclang resolves types it cannot find to `int`. An argument typed `int`-something whose
/// own tokens never mention `int` most likely refers to a type from a header the frontend
/// did not see. Spellings containing `unsigned int` are exempt: truncated identifiers such
/// as `unsigned inf` would otherwise be flagged.
pub fn check_arg_valid(argument: &Argument, diagnostics: &mut Diagnostics) {
    let spelling = &argument.ty.spelling;
    let tokens = argument.tokens.iter().join(" ");
    if spelling.contains("int") && !tokens.contains("int") && !spelling.contains("unsigned int") {
        diagnostics.warn(
            DiagnosticKind::InvalidArgumentType,
            format!("Invalid argument type detected: {spelling} != {tokens}"),
            Some(&argument.location),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::{DeclKind, NativeType, SourceLocation, TypeKind};

    fn argument(spelling: &str, tokens: &[&str]) -> Argument {
        Argument::new("arg", NativeType::new(TypeKind::LValueReference, spelling))
            .with_tokens(tokens.iter().copied())
            .with_location(SourceLocation::new("symbol.h", 43, 38))
    }

    #[test]
    fn test_mismatch_is_reported_once() {
        let mut diagnostics = Diagnostics::new();
        check_arg_valid(
            &argument("const int &", &["const", "std", "::", "string", "&", "initname"]),
            &mut diagnostics,
        );
        assert_eq!(diagnostics.len(), 1);
        let diagnostic = diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.kind, DiagnosticKind::InvalidArgumentType);
        assert_eq!(
            diagnostic.to_string(),
            "WARN Invalid argument type detected: const int & != const std :: string & initname at symbol.h:43:38"
        );
    }

    #[test]
    fn test_unsigned_int_is_exempt() {
        let mut diagnostics = Diagnostics::new();
        check_arg_valid(&argument("unsigned int", &["unsigned", "inf"]), &mut diagnostics);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_consistent_arguments_pass() {
        let mut diagnostics = Diagnostics::new();
        check_arg_valid(&argument("int", &["int", "n"]), &mut diagnostics);
        check_arg_valid(&argument("unsigned long", &["unsigned", "long", "n"]), &mut diagnostics);
        check_arg_valid(
            &argument("const std::string &", &["const", "std", "::", "string", "&", "s"]),
            &mut diagnostics,
        );
        // the word check is textual, `uint32_t` carries `int` in its token
        check_arg_valid(&argument("uint32_t", &["uint32_t", "n"]), &mut diagnostics);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_invalid_declaration() {
        let mut diagnostics = Diagnostics::new();
        check_valid(&Decl::new(DeclKind::Method, "ok"), &mut diagnostics);
        assert!(diagnostics.is_empty());

        let mut broken = Decl::new(DeclKind::Method, "broken");
        broken.invalid = true;
        check_valid(&broken, &mut diagnostics);
        assert_eq!(diagnostics.count(DiagnosticKind::InvalidDeclaration), 1);
    }
}
