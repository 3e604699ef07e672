//! In-memory template store with built-in templates.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use djforge_core::{
    application::{ApplicationError, ports::TemplateStore},
    domain::{DomainValidator as validator, Template, TemplateId},
    error::ForgeResult,
};
use tracing::debug;

use crate::builtin_templates;

/// Thread-safe in-memory template store. Clones share the same templates.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<HashMap<TemplateId, Template>>>,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the built-in blueprint.
    pub fn with_builtin() -> ForgeResult<Self> {
        let store = Self::new();
        store.insert(builtin_templates::django_project()?)?;
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.read().map_or(0, |inner| inner.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> ForgeResult<RwLockReadGuard<'_, HashMap<TemplateId, Template>>> {
        self.inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError.into())
    }

    fn write(&self) -> ForgeResult<RwLockWriteGuard<'_, HashMap<TemplateId, Template>>> {
        self.inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError.into())
    }
}

fn not_found(id: &TemplateId) -> djforge_core::error::ForgeError {
    ApplicationError::TemplateNotFound { id: id.to_string() }.into()
}

impl TemplateStore for InMemoryStore {
    fn get(&self, id: &TemplateId) -> ForgeResult<Template> {
        self.read()?.get(id).cloned().ok_or_else(|| not_found(id))
    }

    fn list(&self) -> ForgeResult<Vec<Template>> {
        Ok(self.read()?.values().cloned().collect())
    }

    fn insert(&self, template: Template) -> ForgeResult<()> {
        validator::validate_template(&template)?;
        debug!(template = %template.id, "Storing template");
        self.write()?.insert(template.id.clone(), template);
        Ok(())
    }

    fn remove(&self, id: &TemplateId) -> ForgeResult<()> {
        self.write()?
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }
}
