//! Crate-level error type.
//!
//! [`ForgeError`] joins the domain and application layers so callers of
//! the services deal with one type, one set of suggestions and one
//! category scheme.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::{self, DomainError};

/// Any failure surfaced by a djforge-core operation.
#[derive(Debug, Error, Clone)]
pub enum ForgeError {
    /// Bad answers, conditions or templates.
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Orchestration failures: lookups, I/O, prompts.
    #[error("{0}")]
    Application(#[from] ApplicationError),
}

impl ForgeError {
    /// What the user can do about it.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => e.category().into(),
            Self::Application(e) => e.category(),
        }
    }
}

/// Coarse classification used by front ends to pick styling and exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    Template,
    NotFound,
    Internal,
}

impl From<domain::ErrorCategory> for ErrorCategory {
    fn from(category: domain::ErrorCategory) -> Self {
        match category {
            domain::ErrorCategory::Validation => Self::Validation,
            domain::ErrorCategory::Compatibility => Self::Compatibility,
            domain::ErrorCategory::Template => Self::Template,
            domain::ErrorCategory::Internal => Self::Internal,
        }
    }
}

pub type ForgeResult<T> = Result<T, ForgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_categories_map_through() {
        let err: ForgeError = DomainError::MissingAnswer {
            key: "project_name".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(
            err.to_string(),
            "no answer for required question 'project_name'"
        );
    }

    #[test]
    fn application_suggestions_pass_through() {
        let err: ForgeError = ApplicationError::TemplateNotFound {
            id: "flask@1.0.0".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(err.suggestions().iter().any(|s| s.contains("djforge list")));
    }
}
