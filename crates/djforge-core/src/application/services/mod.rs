//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "resolve answers" or "generate a project".

pub mod answer_service;
pub mod generate_service;
pub mod template_service;

pub use answer_service::AnswerService;
pub use generate_service::{ANSWERS_FILE, GenerateOptions, GenerateService, GenerationReport};
pub use template_service::{TemplateInfo, TemplateService};
