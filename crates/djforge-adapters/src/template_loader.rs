//! Filesystem-based template loader.
//!
//! Discovers and parses `template.toml` manifests from a directory tree,
//! converting them into domain [`Template`] objects that sit next to the
//! built-in blueprint in the store.
//!
//! # Directory layout expected
//!
//! ```text
//! templates/
//! ├── django-minimal/
//! │   ├── template.toml        ← manifest (required)
//! │   ├── manage.py.tmpl       ← `.tmpl` is stripped from output paths
//! │   └── config/
//! │       └── settings.py
//! └── django-api/
//!     ├── template.toml
//!     └── ...
//! ```
//!
//! # `template.toml` format
//!
//! ```toml
//! [template]
//! id      = "django-minimal"     # unique identifier
//! version = "1.0.0"
//!
//! [metadata]
//! name        = "Minimal Django"
//! description = "Settings and manage.py only."   # optional
//! author      = "Jane"                           # optional
//! tags        = ["django"]                       # optional
//!
//! # Optional per-file overrides. Without one, a file containing `[% ` is
//! # sectioned, one containing a `{{VARIABLE}}` marker is parameterized, and
//! # everything else is literal.
//! [[files]]
//! path       = "config/celery.py"
//! type       = "sectioned"        # literal | parameterized | sectioned
//! when       = "uses_celery"      # condition over answers and derived facts
//! executable = false
//!
//! [[directories]]
//! path = "deploy/render"
//! when = "deploy_render"         # hides everything below it when false
//! ```

use std::{
    collections::{HashMap, HashSet},
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use djforge_core::domain::{
    Condition, DirectorySpec, DomainError, FileSpec, RelativePath, Template, TemplateBuilder,
    TemplateContent, TemplateId, TemplateMetadata, TemplateNode, TemplateSource, TemplateTree,
    has_section_markers,
};

/// Suffix stripped from template file names.
pub const TEMPLATE_SUFFIX: &str = ".tmpl";

const MANIFEST: &str = "template.toml";

// ── Manifest types ────────────────────────────────────────────────────────────

/// Deserialised representation of a `template.toml` file.
#[derive(Debug, Deserialize, Clone)]
pub struct TemplateManifest {
    pub template: TemplateSection,
    pub metadata: MetadataSection,
    /// Per-file overrides, keyed by output path.
    pub files: Option<Vec<FileEntry>>,
    /// Directories that must exist even if empty, or that carry a condition.
    pub directories: Option<Vec<DirectoryEntry>>,
}

/// `[template]` section: identity of the template.
#[derive(Debug, Deserialize, Clone)]
pub struct TemplateSection {
    pub id: String,
    pub version: String,
}

/// `[metadata]` section: human-facing information about the template.
#[derive(Debug, Deserialize, Clone)]
pub struct MetadataSection {
    /// Display name shown in `djforge list`.
    pub name: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// One entry under `[[files]]`.
#[derive(Debug, Deserialize, Clone)]
pub struct FileEntry {
    /// Output path relative to the project root (no `.tmpl` suffix).
    pub path: String,
    #[serde(rename = "type")]
    pub file_type: Option<FileType>,
    pub when: Option<String>,
    #[serde(default)]
    pub executable: bool,
}

/// Controls how a file's content is treated during generation.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// Copied verbatim.
    Literal,
    /// `{{VARIABLE}}` placeholders are substituted.
    Parameterized,
    /// `[% if %]` sections are selected, then placeholders substituted.
    Sectioned,
}

/// One entry under `[[directories]]`.
#[derive(Debug, Deserialize, Clone)]
pub struct DirectoryEntry {
    pub path: String,
    pub when: Option<String>,
}

// ── Loader ────────────────────────────────────────────────────────────────────

/// Loads [`Template`] objects from a directory tree of `template.toml` manifests.
///
/// Each immediate subdirectory of `templates_dir` that contains a valid
/// `template.toml` is treated as one template. Subdirectories that are missing
/// `template.toml`, or whose manifest is invalid, emit a `WARN` log and are
/// skipped.
pub struct FilesystemTemplateLoader {
    templates_dir: PathBuf,
}

impl FilesystemTemplateLoader {
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
        }
    }

    /// Load every valid template found under the templates directory.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidTemplate`] if the directory is missing or
    /// cannot be read. Broken individual templates are skipped, not errors.
    #[instrument(skip(self), fields(dir = %self.templates_dir.display()))]
    pub fn load_all(&self) -> Result<Vec<Template>, DomainError> {
        if !self.templates_dir.exists() {
            return Err(DomainError::InvalidTemplate(format!(
                "templates directory not found: {}",
                self.templates_dir.display()
            )));
        }

        let read_dir = fs::read_dir(&self.templates_dir).map_err(|e| {
            DomainError::InvalidTemplate(format!(
                "failed to read templates directory '{}': {e}",
                self.templates_dir.display()
            ))
        })?;

        let mut dirs: Vec<PathBuf> = read_dir
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        dirs.sort();

        let mut templates = Vec::new();
        for path in dirs {
            match load_template_from_dir(&path) {
                Ok(template) => {
                    debug!(
                        id      = %template.id.name(),
                        version = %template.id.version(),
                        "loaded template"
                    );
                    templates.push(template);
                }
                Err(e) => {
                    warn!(
                        dir   = %path.display(),
                        error = %e,
                        "skipping template directory due to load error"
                    );
                }
            }
        }

        debug!(count = templates.len(), "finished loading templates");
        Ok(templates)
    }
}

/// Load a single template from one directory.
///
/// # Errors
///
/// Fails if `template.toml` is missing or unparseable, a condition does not
/// parse, a manifest entry names a file that does not exist, or the
/// resulting template does not validate.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn load_template_from_dir(dir: &Path) -> Result<Template, DomainError> {
    let manifest_path = dir.join(MANIFEST);
    if !manifest_path.exists() {
        return Err(DomainError::InvalidTemplate(format!(
            "missing {MANIFEST} in '{}'",
            dir.display()
        )));
    }

    let raw = fs::read_to_string(&manifest_path).map_err(|e| {
        DomainError::InvalidTemplate(format!("failed to read '{}': {e}", manifest_path.display()))
    })?;

    let manifest: TemplateManifest = toml::from_str(&raw).map_err(|e| {
        DomainError::InvalidTemplate(format!("failed to parse '{}': {e}", manifest_path.display()))
    })?;

    let id = TemplateId::parse(&format!(
        "{}@{}",
        manifest.template.id, manifest.template.version
    ))?;
    let tree = build_tree_from_dir(dir, &manifest)?;

    let metadata = TemplateMetadata::new(manifest.metadata.name)
        .description(manifest.metadata.description.unwrap_or_default())
        .version(manifest.template.version)
        .author(manifest.metadata.author.unwrap_or_else(|| "unknown".into()))
        .tags(manifest.metadata.tags.unwrap_or_default());

    TemplateBuilder::default()
        .id(id)
        .metadata(metadata)
        .tree(tree)
        .build()
}

/// Walk `dir` and build a [`TemplateTree`] according to the manifest.
///
/// Order: manifest directories first, then the walk in file-name order.
fn build_tree_from_dir(dir: &Path, manifest: &TemplateManifest) -> Result<TemplateTree, DomainError> {
    let mut tree = TemplateTree::new();
    let mut added_paths: HashSet<String> = HashSet::new();

    let dir_conditions: HashMap<String, Option<&str>> = manifest
        .directories
        .iter()
        .flatten()
        .map(|d| (normalize_path(&d.path), d.when.as_deref()))
        .collect();

    let manifest_files: HashMap<String, &FileEntry> = manifest
        .files
        .iter()
        .flatten()
        .map(|f| (normalize_path(&f.path), f))
        .collect();

    // ── 1. Manifest-declared directories ─────────────────────────────
    if let Some(dirs) = &manifest.directories {
        for entry in dirs {
            let path = normalize_path(&entry.path);
            if added_paths.insert(path.clone()) {
                tree.push(TemplateNode::Directory(directory(&path, entry.when.as_deref())?));
            }
        }
    }

    // ── 2. Walk the directory tree ────────────────────────────────────
    for walk_entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let walk_entry = walk_entry
            .map_err(|e| DomainError::InvalidTemplate(format!("directory walk error: {e}")))?;
        let abs_path = walk_entry.path();
        let rel_raw = abs_path.strip_prefix(dir).map_err(|_| {
            DomainError::InvalidTemplate(format!(
                "failed to relativise '{}' against '{}'",
                abs_path.display(),
                dir.display()
            ))
        })?;

        if rel_raw == Path::new(MANIFEST) {
            continue;
        }

        let raw_path = normalize_path(&rel_raw.to_string_lossy());

        if walk_entry.file_type().is_dir() {
            if added_paths.insert(raw_path.clone()) {
                let when = dir_conditions.get(&raw_path).copied().flatten();
                tree.push(TemplateNode::Directory(directory(&raw_path, when)?));
            }
            continue;
        }

        if !walk_entry.file_type().is_file() {
            continue;
        }

        let path_str = raw_path
            .strip_suffix(TEMPLATE_SUFFIX)
            .map(str::to_string)
            .unwrap_or(raw_path);

        let content = fs::read_to_string(abs_path).map_err(|e| {
            DomainError::InvalidTemplate(format!("failed to read file '{path_str}': {e}"))
        })?;

        let entry = manifest_files.get(&path_str).copied();
        if !added_paths.insert(path_str.clone()) {
            return Err(DomainError::DuplicatePath { path: path_str });
        }
        tree.push(TemplateNode::File(file(&path_str, content, entry)?));
    }

    // ── 3. Manifest entries with nothing on disk ──────────────────────
    if let Some(missing) = manifest_files.keys().find(|p| !added_paths.contains(*p)) {
        return Err(DomainError::InvalidTemplate(format!(
            "manifest lists '{missing}' but no such file exists"
        )));
    }

    Ok(tree)
}

fn directory(path: &str, when: Option<&str>) -> Result<DirectorySpec, DomainError> {
    Ok(DirectorySpec::new(RelativePath::try_new(path)?).when(parse_when(when)?))
}

fn file(path: &str, content: String, entry: Option<&FileEntry>) -> Result<FileSpec, DomainError> {
    let file_type = entry.and_then(|e| e.file_type);
    let mut spec = FileSpec::new(
        RelativePath::try_new(path)?,
        classify(TemplateSource::from(content), file_type),
    )
        .when(parse_when(entry.and_then(|e| e.when.as_deref()))?);
    if entry.is_some_and(|e| e.executable) {
        spec = spec.executable();
    }
    Ok(spec)
}

/// Pick the content kind: the manifest's `type` wins, otherwise auto-detect.
pub fn classify(source: TemplateSource, file_type: Option<FileType>) -> TemplateContent {
    let file_type = file_type.unwrap_or_else(|| {
        if has_section_markers(source.as_str()) {
            FileType::Sectioned
        } else if source.contains_placeholder() {
            FileType::Parameterized
        } else {
            FileType::Literal
        }
    });
    match file_type {
        FileType::Literal => TemplateContent::Literal(source),
        FileType::Parameterized => TemplateContent::Parameterized(source),
        FileType::Sectioned => TemplateContent::Sectioned(source),
    }
}

fn parse_when(when: Option<&str>) -> Result<Condition, DomainError> {
    when.map_or(Ok(Condition::Always), Condition::parse)
}

/// Normalise a filesystem path to forward slashes so Windows and Unix paths
/// compare identically throughout the loader.
fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
