//! Interface records accumulated by the collector and turned into the schema.
//!
//! Field names on the serialized side are those the binding templates read.

use serde::{Deserialize, Serialize};

use crate::frontend::DeclKind;

/// Target-side description of a method parameter type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamType {
    /// Target parameter kind, e.g. `UInt32` or `@&String`
    pub target: String,
    /// Native type spelling
    pub native: String,
    /// Expression converting a target value into the native argument
    #[serde(rename = "from_native_expr")]
    pub from_target_expr: String,
}

/// Target-side description of a method return type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnType {
    pub target: String,
    pub native: String,
    /// Expression converting the native result into a target value
    #[serde(rename = "to_native_expr")]
    pub to_target_expr: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodParam {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ParamType,
}

/// The kind of method record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MethodKind {
    Constructor,
    CxxMethod,
}

impl MethodKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MethodKind::Constructor => "CONSTRUCTOR",
            MethodKind::CxxMethod => "CXX_METHOD",
        }
    }
}

impl std::fmt::Display for MethodKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<DeclKind> for MethodKind {
    type Error = DeclKind;

    fn try_from(kind: DeclKind) -> Result<Self, Self::Error> {
        match kind {
            DeclKind::Constructor => Ok(MethodKind::Constructor),
            DeclKind::Method => Ok(MethodKind::CxxMethod),
            other => Err(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub kind: MethodKind,
    pub target_name: String,
    pub native_name: String,
    /// Parameters in native declaration order
    pub params: Vec<MethodParam>,
    pub return_type: ReturnType,
}

/// A class and its methods in the order they were first encountered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassType {
    pub target_name: String,
    pub native_name: String,
    pub methods: Vec<Method>,
}

impl ClassType {
    pub fn new(target_name: impl Into<String>, native_name: impl Into<String>) -> Self {
        Self {
            target_name: target_name.into(),
            native_name: native_name.into(),
            methods: Vec::new(),
        }
    }
}

/// A native/target type name pair another class depends on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub native: String,
    pub target: String,
}

/// Everything the binding templates need to know about one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInterface {
    /// Target namespace the bindings are generated in; set by the caller after collection
    pub namespace: String,
    /// Reserved for transitive type dependencies, currently always empty
    pub deps: Vec<Dependency>,
    #[serde(rename = "type")]
    pub class_type: ClassType,
}

impl ClassInterface {
    pub fn new(namespace: impl Into<String>, class_type: ClassType) -> Self {
        Self {
            namespace: namespace.into(),
            deps: Vec::new(),
            class_type,
        }
    }
}
