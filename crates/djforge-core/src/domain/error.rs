// ============================================================================
// domain/error.rs - ANSWER, CONDITION AND TEMPLATE ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (for reporting the same failure in several places)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Answer Errors (400-level equivalent)
    // ========================================================================
    #[error("unknown question '{key}'")]
    UnknownQuestion { key: String },

    #[error("invalid value '{value}' for '{key}' (expected one of: {allowed})")]
    InvalidChoice {
        key: String,
        value: String,
        allowed: String,
    },

    #[error("invalid answer for '{key}': {reason}")]
    InvalidAnswer { key: String, reason: String },

    #[error("no answer for required question '{key}'")]
    MissingAnswer { key: String },

    // ========================================================================
    // Consistency Errors (409-level equivalent)
    // ========================================================================
    #[error("'{key}' conflicts with other answers: {reason}")]
    InconsistentAnswers { key: String, reason: String },

    // ========================================================================
    // Template Errors
    // ========================================================================
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Template '{template_id}' has no content")]
    EmptyTemplate { template_id: String },

    #[error("Duplicate path in template: {path}")]
    DuplicatePath { path: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Path escapes the project root: {path}")]
    PathEscapesRoot { path: String },

    #[error("condition '{expression}' is invalid at offset {offset}: {reason}")]
    InvalidCondition {
        expression: String,
        offset: usize,
        reason: String,
    },

    #[error("condition references unknown name '{name}'")]
    UnknownIdentifier { name: String },

    #[error("{file}:{line}: {reason}")]
    InvalidSection {
        file: String,
        line: usize,
        reason: String,
    },

    #[error("unresolved variable '{{{{{variable}}}}}' in {file}")]
    UnresolvedVariable { file: String, variable: String },

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnknownQuestion { key } => vec![
                format!("'{key}' is not a question of this template"),
                "Try: djforge questions".into(),
            ],
            Self::InvalidChoice { key, allowed, .. } => vec![
                format!("Valid values for {key}: {allowed}"),
                format!("Example: --set {key}=<value>"),
            ],
            Self::InvalidAnswer { key, reason } => {
                vec![format!("Fix the answer for {key}: {reason}")]
            }
            Self::MissingAnswer { key } => vec![
                format!("Provide it with --set {key}=<value>"),
                "Or add it to the answers file".into(),
            ],
            Self::InconsistentAnswers { key, .. } => vec![
                format!("Change '{key}' or the answer it depends on"),
                "Try: djforge questions to see which answers go together".into(),
            ],
            Self::InvalidCondition { expression, .. } => vec![
                format!("Check the condition syntax: {expression}"),
                "Conditions use and/or/not, ==, != and 'in'; negate a group with De Morgan".into(),
            ],
            Self::UnknownIdentifier { name } => vec![
                format!("'{name}' is neither a question nor a derived fact"),
                "Try: djforge questions".into(),
            ],
            Self::InvalidSection { file, .. } => vec![
                format!("Check the [% if %] / [% endif %] markers in {file}"),
            ],
            Self::UnresolvedVariable { variable, .. } => vec![
                format!("'{variable}' is not a known template variable"),
                "Known variables include PROJECT_NAME, PROJECT_SLUG and PYTHON_VERSION".into(),
            ],
            Self::EmptyTemplate { template_id } => vec![
                format!("Template '{}' is corrupted", template_id),
                "Please report this issue or use a different template".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownQuestion { .. }
            | Self::InvalidChoice { .. }
            | Self::InvalidAnswer { .. }
            | Self::MissingAnswer { .. } => ErrorCategory::Validation,
            Self::InconsistentAnswers { .. } => ErrorCategory::Compatibility,
            Self::InvalidTemplate(_)
            | Self::EmptyTemplate { .. }
            | Self::DuplicatePath { .. }
            | Self::AbsolutePathNotAllowed { .. }
            | Self::PathEscapesRoot { .. }
            | Self::InvalidCondition { .. }
            | Self::UnknownIdentifier { .. }
            | Self::InvalidSection { .. }
            | Self::UnresolvedVariable { .. } => ErrorCategory::Template,
            Self::MissingRequiredField { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    Template,
    Internal,
}
