//! djforge Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the djforge
//! Django project generator, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           djforge-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (AnswerService, GenerateService, ...)   │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Store, Filesystem, Render, Prompter)   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     djforge-adapters (Infrastructure)   │
//! │ (InMemoryStore, LocalFilesystem, etc)   │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (AnswerSet, Condition, Template, ...)   │
//! │         No External Dependencies        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use djforge_core::prelude::*;
//!
//! // 1. Resolve answers
//! let answers = AnswerService::new()
//!     .resolve(AnswerMap::new().with("project_name", "Shop"))?;
//!
//! // 2. Generate with injected adapters
//! let service = GenerateService::new(store, renderer, filesystem, codec);
//! let id = TemplateId::parse("django-project@1.0.0")?;
//! service.generate(&id, &answers, "./shop".as_ref(), GenerateOptions::default())?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ANSWERS_FILE, AnswerService, GenerateOptions, GenerateService, GenerationReport,
        TemplateInfo, TemplateService,
        ports::{
            AnswersCodec, AnswersFormat, AnswersRecord, Filesystem, Prompter, TemplateRenderer,
            TemplateStore,
        },
    };
    pub use crate::domain::{
        AnswerMap, AnswerSet, AnswerValue, Condition, ProjectStructure, QuestionDef,
        RenderContext, Template, TemplateId, TemplateMetadata, questions,
    };
    pub use crate::error::{ForgeError, ForgeResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
