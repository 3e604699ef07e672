//! Application layer for djforge.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (AnswerService, GenerateService, TemplateService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! generation rules itself. Those live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    ANSWERS_FILE, AnswerService, GenerateOptions, GenerateService, GenerationReport,
    TemplateInfo, // DTO for template metadata
    TemplateService,
};

pub use ports::{
    AnswersCodec, AnswersFormat, AnswersRecord, Filesystem, Prompter, TemplateRenderer,
    TemplateStore,
};

pub use error::ApplicationError;
