//! Infrastructure adapters for djforge.
//!
//! This crate implements the ports defined in `djforge-core::application::ports`
//! and carries the built-in Django blueprint. All filesystem access and
//! serialization formats live here.

pub mod answers_file;
pub mod builtin_templates;
pub mod filesystem;
pub mod renderer;
pub mod template_loader;
pub mod template_store;

pub use answers_file::AnswersFileCodec;
pub use builtin_templates::{DEFAULT_TEMPLATE, django_project, user_templates};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use renderer::SimpleRenderer;
pub use template_loader::FilesystemTemplateLoader;
pub use template_store::InMemoryStore;
