// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for djforge.
//!
//! This module contains pure generation logic with no I/O. Reading answers
//! files, prompting, rendering and writing are handled via ports (traits)
//! defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or terminal access
//! - **Immutable entities**: Domain objects are Clone + PartialEq
//! - **Rich domain model**: Answers validate themselves, conditions evaluate
//!   themselves, templates check their own conditions
//!
pub mod condition;
pub mod entities;
pub mod error;
pub mod questions;
pub mod sections;
pub mod value_objects;

mod validation;

pub use condition::{Condition, Predicate};

pub use entities::{
    answers::{AnswerLookup, AnswerMap, AnswerSet, AnswerValue, DERIVED_FACTS},
    project_structure::{DirectoryToCreate, FileToWrite, FsEntry, ProjectStructure},
    template::{
        DirectorySpec, FileSpec, RenderContext, Template, TemplateBuilder, TemplateContent,
        TemplateId, TemplateMetadata, TemplateNode, TemplateSource, TemplateTree,
    },
};

pub use error::{DomainError, ErrorCategory};

pub use questions::{
    QUESTION_REGISTRY, QuestionDef, QuestionDefault, QuestionKind, Validator, find_question,
    is_known_name, questions,
};

pub use sections::{Sections, has_section_markers, parse_sections};

pub use value_objects::{
    ApiStyle, AuthBackend, BackgroundTasks, Cache, CiProvider, Database, DependencyManager,
    DeploymentTarget, Frontend, License, MediaStorage, ObservabilityLevel, PythonVersion,
    SearchBackend, SecurityProfile, StripeMode,
};

pub use entities::common::{Permissions, RelativePath};
pub use validation::DomainValidator;
