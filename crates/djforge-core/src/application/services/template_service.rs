//! Template Service - template management operations.
//!
//! Handles template registration and metadata queries.
//! Separated from GenerateService for single responsibility.

use tracing::debug;

use crate::{
    application::ports::TemplateStore,
    domain::{DomainValidator as validator, Template, TemplateId},
    error::ForgeResult,
};

/// Information about a template for display purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub author: String,
    pub tags: Vec<String>,
    pub files: usize,
}

impl From<&Template> for TemplateInfo {
    fn from(t: &Template) -> Self {
        Self {
            id: t.id.to_string(),
            name: t.metadata.name.clone(),
            description: t.metadata.description.clone(),
            author: t.metadata.author.clone(),
            tags: t.metadata.tags.clone(),
            files: t.file_count(),
        }
    }
}

/// Service for template operations.
pub struct TemplateService {
    store: Box<dyn TemplateStore>,
}

impl TemplateService {
    /// Create a new template service.
    pub fn new(store: Box<dyn TemplateStore>) -> Self {
        Self { store }
    }

    /// Get a template by ID.
    pub fn get(&self, id: &TemplateId) -> ForgeResult<Template> {
        self.store.get(id)
    }

    /// Add or update a template. The template is validated first.
    pub fn save(&self, template: Template) -> ForgeResult<()> {
        validator::validate_template(&template)?;
        debug!(template = %template.id, "Registering template");
        self.store.insert(template)
    }

    /// Remove a template.
    pub fn remove(&self, id: &TemplateId) -> ForgeResult<()> {
        self.store.remove(id)
    }

    /// List all templates.
    pub fn list(&self) -> ForgeResult<Vec<Template>> {
        self.store.list()
    }

    /// Display info for every template, sorted by id.
    pub fn infos(&self) -> ForgeResult<Vec<TemplateInfo>> {
        let mut infos: Vec<TemplateInfo> = self.list()?.iter().map(TemplateInfo::from).collect();
        infos.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(infos)
    }
}
