//! Advisory diagnostics.
//!
//! Nothing reported here stops a run. Each problem gets a sentinel value in the generated
//! data plus one diagnostic, so all unresolved cases can be found in a single pass.

use crate::frontend::SourceLocation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A primitive type with no entry in the target primitive table
    UnmappedPrimitive,
    /// No known conversion from a target value to the native parameter type
    UnknownFromTargetExpr,
    /// A parameter type with no target declaration kind
    UnknownTargetParamKind,
    /// The resolved argument type disagrees with its source tokens
    InvalidArgumentType,
    /// The frontend marked a declaration invalid
    InvalidDeclaration,
    /// Two native classes derive the same target name
    TargetNameCollision,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub location: Option<SourceLocation>,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(location) => write!(f, "WARN {} at {}", self.message, location),
            None => write!(f, "WARN {}", self.message),
        }
    }
}

/// Collects diagnostics of one run. Every entry is also logged at warning level.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(
        &mut self,
        kind: DiagnosticKind,
        message: impl Into<String>,
        location: Option<&SourceLocation>,
    ) {
        let diagnostic = Diagnostic {
            kind,
            message: message.into(),
            location: location.cloned(),
        };
        log::warn!("{diagnostic}");
        self.entries.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    /// One line per diagnostic kind seen, followed by hints for the likely causes.
    pub fn summary(&self) -> Vec<String> {
        const KINDS: [(DiagnosticKind, &str); 6] = [
            (DiagnosticKind::UnmappedPrimitive, "unmapped primitive types"),
            (DiagnosticKind::UnknownFromTargetExpr, "unknown parameter conversions"),
            (DiagnosticKind::UnknownTargetParamKind, "unknown parameter kinds"),
            (DiagnosticKind::InvalidArgumentType, "suspicious argument types"),
            (DiagnosticKind::InvalidDeclaration, "invalid declarations"),
            (DiagnosticKind::TargetNameCollision, "target name collisions"),
        ];
        let mut lines: Vec<String> = KINDS
            .iter()
            .filter_map(|(kind, label)| match self.count(*kind) {
                0 => None,
                n => Some(format!("{n} {label}")),
            })
            .collect();
        if self.count(DiagnosticKind::InvalidArgumentType) > 0 {
            lines.push(
                "hint: types that fail to resolve default to `int`; check that the system include \
                 paths reach the frontend"
                    .to_string(),
            );
        }
        if self.count(DiagnosticKind::UnmappedPrimitive) > 0 {
            lines.push("hint: extend the primitive type table for the reported types".to_string());
        }
        lines
    }
}
