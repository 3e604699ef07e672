//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `djforge-adapters` crate provides implementations; the CLI provides
//! the interactive [`Prompter`].

use std::path::Path;

use serde::Serialize;

use crate::domain::{
    AnswerMap, AnswerSet, AnswerValue, ProjectStructure, QuestionDef, RenderContext, Template,
    TemplateId,
};
use crate::error::ForgeResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `djforge_adapters::filesystem::LocalFilesystem` (production)
/// - `djforge_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> ForgeResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> ForgeResult<()>;

    /// Set file permissions.
    fn set_permissions(&self, path: &Path, executable: bool) -> ForgeResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> ForgeResult<()>;
}

/// Port for template storage and retrieval.
///
/// Implemented by `djforge_adapters::template_store::InMemoryStore`, seeded
/// with the built-in blueprint and any templates loaded from disk.
#[cfg_attr(test, mockall::automock)]
pub trait TemplateStore: Send + Sync {
    /// Get a specific template by ID.
    fn get(&self, id: &TemplateId) -> ForgeResult<Template>;

    /// List all available templates.
    fn list(&self) -> ForgeResult<Vec<Template>>;

    /// Insert or update a template.
    fn insert(&self, template: Template) -> ForgeResult<()>;

    /// Remove a template.
    fn remove(&self, id: &TemplateId) -> ForgeResult<()>;
}

/// Port for template rendering.
///
/// Implemented by `djforge_adapters::renderer::SimpleRenderer`.
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    /// Render a template into a project structure.
    ///
    /// # Arguments
    ///
    /// * `template` - The template to render
    /// * `answers` - Answers that node and section conditions are evaluated against
    /// * `context` - Variable substitution context
    /// * `output_root` - Root directory for output paths
    fn render(
        &self,
        template: &Template,
        answers: &AnswerSet,
        context: &RenderContext,
        output_root: &Path,
    ) -> ForgeResult<ProjectStructure>;
}

/// Port for asking the user a question.
///
/// Implemented by the CLI (dialoguer) when running interactively.
#[cfg_attr(test, mockall::automock)]
pub trait Prompter {
    /// Ask `question`, offering `default`. The returned value is coerced and
    /// validated by the caller.
    fn ask(&self, question: &QuestionDef, default: Option<AnswerValue>) -> ForgeResult<AnswerValue>;
}

/// Serialization formats for answers files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswersFormat {
    Yaml,
    Json,
    Toml,
}

impl AnswersFormat {
    /// Pick a format from the file extension; YAML when unknown.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => Self::Json,
            Some("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }
}

/// Contents of the `.djforge-answers.yml` record written into each project.
///
/// Bookkeeping keys start with `_` so the record can be fed back in as an
/// answers file.
#[derive(Debug, Clone, Serialize)]
pub struct AnswersRecord {
    #[serde(rename = "_template")]
    pub template: String,
    #[serde(rename = "_generator_version")]
    pub generator_version: String,
    #[serde(flatten)]
    pub answers: AnswerSet,
}

/// Port for reading and writing answers files.
#[cfg_attr(test, mockall::automock)]
pub trait AnswersCodec: Send + Sync {
    /// Parse answers. Keys starting with `_` are ignored.
    fn decode(&self, source: &str, format: AnswersFormat) -> ForgeResult<AnswerMap>;

    /// Serialize the record written into generated projects (YAML).
    fn encode(&self, record: &AnswersRecord) -> ForgeResult<String>;
}
