//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `DJFORGE_*` environment variables, `__` between sections
//!    (`DJFORGE_DEFAULTS__AUTHOR_NAME`)
//! 3. `--config FILE`, or else `.djforge.toml` in the working directory and
//!    then the platform config file
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use djforge_core::domain::AnswerMap;

/// Name of the per-directory config file.
pub const LOCAL_CONFIG_FILE: &str = ".djforge.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Defaults offered for new projects.
    pub defaults: Defaults,
    /// Output settings.
    pub output: OutputConfig,
    /// Template settings.
    pub templates: TemplateConfig,
    pub logging: LoggingConfig,
}

/// Answers used when the user gives none.  Unset fields fall back to the
/// questionnaire's own defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub author_name: Option<String>,
    pub author_email: Option<String>,
    pub license: Option<String>,
    pub python_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Template used by `new` when `--template` is absent.
    pub default: String,
    /// Extra directory of user templates.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Also write logs to this file.
    pub file: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "human".into(),
        }
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            default: djforge_adapters::DEFAULT_TEMPLATE.into(),
            dir: None,
        }
    }
}

impl Defaults {
    /// The configured defaults as answers.
    pub fn to_answers(&self) -> AnswerMap {
        let mut answers = AnswerMap::new();
        let fields = [
            ("author_name", &self.author_name),
            ("author_email", &self.author_email),
            ("license", &self.license),
            ("python_version", &self.python_version),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                answers.insert(key, value.as_str());
            }
        }
        answers
    }
}

impl AppConfig {
    /// Load configuration from files and the environment over the built-in
    /// defaults.
    ///
    /// `config_file` is the path the user passed via `--config`; it must
    /// exist.  Without it the local and platform files are optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let mut builder = Config::builder();

        builder = match config_file {
            Some(path) => builder.add_source(File::from(path.as_path()).required(true)),
            None => {
                if let Some(global) = Self::config_path() {
                    builder = builder.add_source(File::from(global).required(false));
                }
                builder.add_source(File::from(Path::new(LOCAL_CONFIG_FILE)).required(false))
            }
        };

        let config = builder
            .add_source(
                Environment::with_prefix("DJFORGE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?;

        config
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Path to the platform configuration file, e.g.
    /// `~/.config/djforge/config.toml` on Linux.
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "djforge", "djforge")
            .map(|d| d.config_dir().join("config.toml"))
    }

    /// Look up a dotted key, e.g. `defaults.author_name`.
    ///
    /// Returns `None` for unknown keys; unset optional values print as
    /// an empty string.
    pub fn get(&self, key: &str) -> Option<String> {
        let path = |p: &Option<PathBuf>| p.as_ref().map(|p| p.display().to_string());
        let value = match key {
            "defaults.author_name" => self.defaults.author_name.clone(),
            "defaults.author_email" => self.defaults.author_email.clone(),
            "defaults.license" => self.defaults.license.clone(),
            "defaults.python_version" => self.defaults.python_version.clone(),
            "output.no_color" => Some(self.output.no_color.to_string()),
            "output.format" => Some(self.output.format.clone()),
            "templates.default" => Some(self.templates.default.clone()),
            "templates.dir" => path(&self.templates.dir),
            "logging.file" => path(&self.logging.file),
            _ => return None,
        };
        Some(value.unwrap_or_default())
    }
}
