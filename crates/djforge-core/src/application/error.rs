//! Failures of the use cases themselves: finding templates, talking to the
//! filesystem, reading answers files and prompting. Rule violations in
//! answers or templates are [`crate::domain::DomainError`].

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// No template with the requested id is registered.
    #[error("Template '{id}' not found")]
    TemplateNotFound { id: String },

    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Answers file could not be read or decoded.
    #[error("Answers file {path}: {reason}")]
    AnswersFile { path: PathBuf, reason: String },

    /// Asking the user failed (closed terminal, interrupted prompt).
    #[error("Prompt for '{key}' failed: {reason}")]
    PromptFailed { key: String, reason: String },

    /// The template store lock was poisoned.
    #[error("Template store error")]
    StoreLockError,

    /// Destination already exists and overwriting was not requested.
    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },
}

impl ApplicationError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TemplateNotFound { id } => vec![
                format!("No template registered as {id}"),
                "Try: djforge list to see available templates".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::AnswersFile { path, .. } => vec![
                format!("Check the contents of {}", path.display()),
                "Answers files may be YAML (.yml/.yaml), JSON (.json) or TOML (.toml)".into(),
            ],
            Self::PromptFailed { key, .. } => vec![
                format!("Pass the answer directly: --set {key}=<value>"),
                "Or use --defaults to skip prompts".into(),
            ],
            Self::StoreLockError => vec!["Run the command again".into()],
            Self::ProjectExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Use --force to write into it (existing files are overwritten)".into(),
                "Choose a different destination".into(),
            ],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TemplateNotFound { .. } => ErrorCategory::NotFound,
            Self::FilesystemError { .. } | Self::StoreLockError => ErrorCategory::Internal,
            Self::AnswersFile { .. } | Self::PromptFailed { .. } | Self::ProjectExists { .. } => {
                ErrorCategory::Validation
            }
        }
    }
}
