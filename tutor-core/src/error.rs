//! Errors returned when applying a primitive or resolving a step.

use thiserror::Error;
use tutor_parser::Path;

/// Formats the "did you mean" part of an unknown rule error.
fn fmt_suggestions(suggestions: &[&'static str]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!("; did you mean {}?", suggestions.iter()
            .map(|id| format!("`{}`", id))
            .collect::<Vec<_>>()
            .join(", "))
    }
}

/// An error that occurred while applying a primitive.
///
/// These errors carry no source spans, since they are about a tree rather than about text.
/// [`ApplyError::code`] gives the stable code reported to collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    /// The node at the target path does not have the shape the primitive requires, or the path
    /// does not lead to a node at all.
    #[error("the primitive does not apply to the node at `{path}`")]
    NotApplicable { path: Path },

    /// The primitive would divide by zero.
    #[error("division by zero at `{path}`")]
    DivisionByZero { path: Path },

    /// No rule with the given id exists.
    #[error("unknown rule `{rule_id}`{}", fmt_suggestions(.suggestions))]
    UnknownRule {
        rule_id: String,
        suggestions: Vec<&'static str>,
    },

    /// The rule only explains why the expression cannot be rewritten here.
    #[error("`{rule_id}` is a diagnostic and does not rewrite the expression")]
    DiagnosticOnly { rule_id: &'static str },

    /// A path string could not be parsed.
    #[error("invalid path `{path}`: {message}")]
    InvalidPath { path: String, message: String },

    /// A path computed from the tree no longer leads to a node of the same tree.
    #[error("internal inconsistency: `{rule_id}` targets `{path}`, which does not exist")]
    InternalInconsistency { rule_id: String, path: Path },
}

impl ApplyError {
    /// Returns the stable code of the error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotApplicable { .. } => "not-applicable",
            Self::DivisionByZero { .. } => "division-by-zero",
            Self::UnknownRule { .. } => "unknown-rule",
            Self::DiagnosticOnly { .. } => "diagnostic-only",
            Self::InvalidPath { .. } => "invalid-path",
            Self::InternalInconsistency { .. } => "internal-inconsistency",
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn messages_and_codes() {
        let err = ApplyError::UnknownRule {
            rule_id: "INT_AD".to_string(),
            suggestions: vec!["INT_ADD"],
        };
        assert_eq!(err.to_string(), "unknown rule `INT_AD`; did you mean `INT_ADD`?");
        assert_eq!(err.code(), "unknown-rule");

        let err = ApplyError::DivisionByZero { path: Path::root() };
        assert_eq!(err.to_string(), "division by zero at `root`");
        assert_eq!(err.code(), "division-by-zero");
    }
}
