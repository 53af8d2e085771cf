//! Native identifiers to target naming conventions.

use itertools::Itertools;

use crate::{
    api::record::MethodKind,
    frontend::NativeType,
    types::primitive::{is_primitive, map_primitive},
};

/// Target name of every constructor
pub const CONSTRUCTOR_TARGET_NAME: &str = "mk";

/// Derive the target type name of a native type.
///
/// Namespace qualification is dropped entirely (`GiNaC::symbol` and `symbol` both become
/// `Symbol`), so base names are assumed unique across namespaces.
pub fn to_target_type_name(spelling: &str, native_type: &NativeType) -> String {
    if is_primitive(native_type.kind) {
        return map_primitive(spelling, native_type);
    }
    if let Some((_, base)) = spelling.rsplit_once("::") {
        return to_target_type_name(base, native_type);
    }
    spelling.split('_').map(capitalize).join("")
}

// TODO: decide whether getters and setters get target-style names (get_name -> name)
pub fn to_target_method_name(native_name: &str, kind: MethodKind) -> String {
    match kind {
        MethodKind::Constructor => CONSTRUCTOR_TARGET_NAME.to_string(),
        MethodKind::CxxMethod => native_name.to_string(),
    }
}

/// Uppercase the first character and lowercase the rest.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::TypeKind;

    fn record(spelling: &str) -> NativeType {
        NativeType::record(spelling)
    }

    #[test]
    fn test_snake_case_to_pascal_case() {
        for (native, target) in [
            ("my_class_name", "MyClassName"),
            ("symbol", "Symbol"),
            ("ex", "Ex"),
            ("realsymbol", "Realsymbol"),
            ("a_b_c", "ABC"),
        ] {
            assert_eq!(to_target_type_name(native, &record(native)), target);
        }
    }

    #[test]
    fn test_namespace_is_stripped() {
        assert_eq!(
            to_target_type_name("GiNaC::symbol", &record("GiNaC::symbol")),
            to_target_type_name("symbol", &record("symbol"))
        );
        assert_eq!(
            to_target_type_name("a::b::possymbol", &record("a::b::possymbol")),
            "Possymbol"
        );
        assert_eq!(to_target_type_name("std::string", &record("std::string")), "String");
    }

    #[test]
    fn test_primitive_delegates_to_classifier() {
        let ty = NativeType::scalar(TypeKind::UInt, "unsigned int");
        assert_eq!(to_target_type_name("unsigned int", &ty), "UInt32");
    }

    #[test]
    fn test_rest_of_segment_is_lowercased() {
        assert_eq!(to_target_type_name("getName", &record("getName")), "Getname");
    }

    #[test]
    fn test_method_names() {
        assert_eq!(to_target_method_name("symbol", MethodKind::Constructor), "mk");
        assert_eq!(to_target_method_name("anything", MethodKind::Constructor), "mk");
        assert_eq!(to_target_method_name("get_name", MethodKind::CxxMethod), "get_name");
        assert_eq!(to_target_method_name("setName", MethodKind::CxxMethod), "setName");
    }
}
