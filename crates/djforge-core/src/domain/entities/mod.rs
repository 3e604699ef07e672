pub mod answers;
pub mod common;
pub mod project_structure;
pub mod template;

pub use crate::domain::DomainError;
pub use answers::{AnswerMap, AnswerSet, AnswerValue};
pub use project_structure::ProjectStructure;
pub use template::Template;
