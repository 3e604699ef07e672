//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `djforge-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `TemplateStore`: Template storage/retrieval
//!   - `TemplateRenderer`: Template rendering
//!   - `AnswersCodec`: Answers files in and out
//!   - `Prompter`: Interactive questions
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    AnswersCodec, AnswersFormat, AnswersRecord, Filesystem, Prompter, TemplateRenderer,
    TemplateStore,
};

#[cfg(test)]
pub use output::{
    MockAnswersCodec, MockFilesystem, MockPrompter, MockTemplateRenderer, MockTemplateStore,
};
