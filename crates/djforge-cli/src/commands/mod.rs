//! Command handlers, one module per subcommand.

pub mod completions;
pub mod config;
pub mod init;
pub mod list;
pub mod new;
pub mod questions;

use tracing::debug;

use djforge_adapters::{FilesystemTemplateLoader, InMemoryStore, user_templates};
use djforge_core::{application::ports::TemplateStore, error::ForgeError};

use crate::{config::AppConfig, error::CliResult};

/// Store with the built-in blueprint plus any user templates.
///
/// The configured `templates.dir` is loaded last so its templates replace
/// same-ID templates found on the search path.
pub(crate) fn template_store(config: &AppConfig) -> CliResult<InMemoryStore> {
    let store = InMemoryStore::with_builtin()?;

    let mut extra = user_templates().map_err(ForgeError::from)?;
    if let Some(dir) = &config.templates.dir {
        extra.extend(
            FilesystemTemplateLoader::new(dir)
                .load_all()
                .map_err(ForgeError::from)?,
        );
    }

    for template in extra {
        debug!(template = %template.id, "Registering user template");
        store.insert(template)?;
    }
    Ok(store)
}
