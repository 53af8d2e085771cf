//! Native scalar types and their target primitive names.

use crate::frontend::{NativeType, TypeKind};

/// Prefix of the name returned for primitive kinds missing from [`PRIMITIVE_TARGET_NAMES`]
pub const UNMAPPED_PRIMITIVE_PREFIX: &str = "UNMAPPED_PRIMITIVE_";

// Character kinds are not primitive and have no entry.
const PRIMITIVE_TARGET_NAMES: &[(TypeKind, &str)] = &[
    (TypeKind::Bool, "Bool"),
    (TypeKind::UShort, "UInt16"),
    (TypeKind::UInt, "UInt32"),
    (TypeKind::ULong, "UInt64"),
    (TypeKind::ULongLong, "UInt64"),
    (TypeKind::UInt128, "UInt128"),
    (TypeKind::Short, "Int16"),
    (TypeKind::Int, "Int32"),
    (TypeKind::Long, "Int64"),
    (TypeKind::LongLong, "Int64"),
    (TypeKind::Int128, "Int128"),
    (TypeKind::Float, "Float"),
    (TypeKind::Double, "Float"),
    (TypeKind::LongDouble, "Float"),
];

pub fn is_primitive(kind: TypeKind) -> bool {
    matches!(
        kind,
        TypeKind::Bool
            | TypeKind::UShort
            | TypeKind::UInt
            | TypeKind::ULong
            | TypeKind::ULongLong
            | TypeKind::UInt128
            | TypeKind::Short
            | TypeKind::Int
            | TypeKind::Long
            | TypeKind::LongLong
            | TypeKind::Int128
            | TypeKind::Float
            | TypeKind::Double
            | TypeKind::LongDouble
    )
}

/// Map a native type to the target's fixed-width primitive by its kind.
///
/// Kinds without a table entry map to `UNMAPPED_PRIMITIVE_<spelling>` so that a reviewer can
/// grep the generated data for them.
pub fn map_primitive(spelling: &str, native_type: &NativeType) -> String {
    PRIMITIVE_TARGET_NAMES
        .iter()
        .find(|(kind, _)| *kind == native_type.kind)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| format!("{UNMAPPED_PRIMITIVE_PREFIX}{spelling}"))
}

pub fn is_unmapped_primitive(target_name: &str) -> bool {
    target_name.starts_with(UNMAPPED_PRIMITIVE_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_primitive_kind_is_mapped() {
        for (kind, _) in PRIMITIVE_TARGET_NAMES {
            assert!(is_primitive(*kind), "{kind:?}");
            let name = map_primitive("x", &NativeType::scalar(*kind, "x"));
            assert!(!is_unmapped_primitive(&name), "{kind:?}");
        }
    }

    #[test]
    fn test_fixed_width_names() {
        let cases = [
            (TypeKind::Bool, "bool", "Bool"),
            (TypeKind::Int, "int", "Int32"),
            (TypeKind::UInt, "unsigned int", "UInt32"),
            (TypeKind::Long, "long", "Int64"),
            (TypeKind::ULongLong, "unsigned long long", "UInt64"),
            (TypeKind::Double, "double", "Float"),
        ];
        for (kind, spelling, expected) in cases {
            assert_eq!(map_primitive(spelling, &NativeType::scalar(kind, spelling)), expected);
        }
    }

    #[test]
    fn test_characters_are_not_primitive() {
        assert!(!is_primitive(TypeKind::CharS));
        assert!(!is_primitive(TypeKind::WChar));
        assert!(!is_primitive(TypeKind::Record));
        assert!(!is_primitive(TypeKind::Pointer));
    }

    #[test]
    fn test_unmapped_sentinel_embeds_spelling() {
        let name = map_primitive("char", &NativeType::scalar(TypeKind::CharS, "char"));
        assert_eq!(name, "UNMAPPED_PRIMITIVE_char");
        assert!(is_unmapped_primitive(&name));
    }
}
