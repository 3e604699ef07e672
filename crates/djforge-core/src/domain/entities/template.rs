//! Template domain aggregate and rendering context.
//!
//! A template is a blueprint tree whose nodes are gated by conditions over an
//! answer set. Rendering walks the tree once, keeps the nodes whose `when`
//! holds, selects content variants inside sectioned files and substitutes
//! `{{VARIABLE}}` markers.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Template Domain                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Template (Aggregate Root)                                  │
//! │  ├── TemplateId (Entity)                                    │
//! │  ├── TemplateMetadata (Value Object) - Human-readable info  │
//! │  └── TemplateTree (Value Object) - What to create           │
//! │       └── Vec<TemplateNode>                                 │
//! │            ├── FileSpec (path, content, permissions, when)  │
//! │            └── DirectorySpec (path, permissions, when)      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  RenderContext (Value Object)                               │
//! │  └── Variable substitution: {{PROJECT_SLUG}} -> "shop"      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Content Types
//!
//! - `Literal`: copied as-is. Used for files that contain `{{` for other
//!   tools (Helm charts, Jinja templates for Ansible).
//! - `Parameterized`: variable substitution only.
//! - `Sectioned`: `[% if %]` sections first, then variable substitution.
//!
//! ## Strict Variables
//!
//! A marker is `{{` immediately followed by an upper-case name and `}}`
//! (`{{PROJECT_NAME}}`). Any such marker without a value is an error rather
//! than being copied into the project. `{{ lower }}` and `{{ .Values.x }}`
//! are not markers.

use std::collections::{HashMap, HashSet};
use std::fmt;

use heck::{ToKebabCase, ToSnakeCase, ToUpperCamelCase};

use crate::domain::{
    condition::Condition,
    entities::{
        answers::AnswerSet,
        common::{Permissions, RelativePath},
    },
    error::DomainError,
    questions::is_known_name,
    sections::parse_sections,
};

/// Context for variable substitution.
///
/// ## Built-in Variables
///
/// | Variable | Example | Source |
/// |----------|---------|--------|
/// | `PROJECT_NAME` | "My Shop" | answer |
/// | `PROJECT_SLUG` | "my_shop" | answer |
/// | `PROJECT_NAME_KEBAB` | "my-shop" | computed |
/// | `PROJECT_NAME_PASCAL` | "MyShop" | computed |
/// | `PROJECT_DESCRIPTION` | "Sells things" | answer |
/// | `AUTHOR_NAME`, `AUTHOR_EMAIL` | | answers |
/// | `PYTHON_VERSION` | "3.12" | answer |
/// | `PYTHON_VERSION_NODOT` | "312" | computed |
/// | `LICENSE` | "MIT" | answer |
/// | `YEAR` | "2026" | generation time |
///
/// The generation service adds `SECRET_KEY` and `GENERATOR_VERSION`.
#[derive(Debug, Clone)]
pub struct RenderContext {
    project_name: String,
    variables: HashMap<String, String>,
}

impl RenderContext {
    /// Context with only the project-name family of variables.
    pub fn new(project_name: impl Into<String>) -> Self {
        let name = project_name.into();
        let mut vars = HashMap::new();

        vars.insert("PROJECT_NAME".to_string(), name.clone());
        vars.insert("PROJECT_SLUG".to_string(), name.to_snake_case());
        vars.insert("PROJECT_NAME_SNAKE".to_string(), name.to_snake_case());
        vars.insert("PROJECT_NAME_KEBAB".to_string(), name.to_kebab_case());
        vars.insert("PROJECT_NAME_PASCAL".to_string(), name.to_upper_camel_case());

        Self {
            project_name: name,
            variables: vars,
        }
    }

    /// Context carrying every answer-derived variable.
    pub fn from_answers(answers: &AnswerSet, year: i32) -> Self {
        Self::new(answers.project_name.as_str())
            .with_variable("PROJECT_SLUG", answers.project_slug.as_str())
            .with_variable("PROJECT_NAME_SNAKE", answers.project_slug.as_str())
            .with_variable("PROJECT_DESCRIPTION", answers.project_description.as_str())
            .with_variable("AUTHOR_NAME", answers.author_name.as_str())
            .with_variable("AUTHOR_EMAIL", answers.author_email.as_str())
            .with_variable("PYTHON_VERSION", answers.python_version.as_str())
            .with_variable("PYTHON_VERSION_NODOT", answers.python_version.nodot())
            .with_variable("LICENSE", answers.license.as_str())
            .with_variable("YEAR", year.to_string())
    }

    /// Add or override a variable.
    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(|s| s.as_str())
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Substitute `{{VARIABLE}}` markers in one pass.
    ///
    /// Substituted values are never re-scanned. `file` labels the error when
    /// a marker has no value.
    ///
    /// # Edge Cases
    ///
    /// - `{{PROJECT_NAME}}{{PROJECT_NAME}}` → both replaced
    /// - `{{{PROJECT_NAME}}}` → outer braces preserved, inner replaced
    /// - `{{ project_name }}` → not a marker, copied as-is
    pub fn render(&self, file: &str, template: &str) -> Result<String, DomainError> {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match marker_name(after) {
                Some(name) => {
                    let value = self.get(name).ok_or_else(|| DomainError::UnresolvedVariable {
                        file: file.to_string(),
                        variable: name.to_string(),
                    })?;
                    out.push_str(value);
                    rest = &after[name.len() + 2..];
                }
                None => {
                    out.push('{');
                    rest = &rest[start + 1..];
                }
            }
        }

        out.push_str(rest);
        Ok(out)
    }
}

/// Name of the marker starting right after `{{`, if it is one.
fn marker_name(after_open: &str) -> Option<&str> {
    let end = after_open.find("}}")?;
    let name = &after_open[..end];
    let mut chars = name.chars();
    let first = chars.next()?;
    let valid = first.is_ascii_uppercase()
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_');
    valid.then_some(name)
}

// ============================================================================
// Template Identity
// ============================================================================

/// Unique identifier for a template type.
///
/// ## Format
///
/// Human-readable: `name@version` (e.g., `django-project@1.0.0`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateId {
    name: String,
    version: String,
}

impl TemplateId {
    /// Create a new template ID.
    ///
    /// # Panics
    ///
    /// Panics if name contains `@`. Use [`TemplateId::parse`] for user input.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        let name = name.into();
        let version = version.into();
        assert!(
            !name.contains('@'),
            "Template name cannot contain @: {}",
            name
        );
        Self { name, version }
    }

    /// Parse from string format `name@version`.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s.split_once('@') {
            Some((name, version))
                if !name.is_empty() && !version.is_empty() && !version.contains('@') =>
            {
                Ok(Self::new(name, version))
            }
            _ => Err(DomainError::InvalidTemplate(format!(
                "Invalid template ID format: {}. Expected 'name@version'",
                s
            ))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

// ============================================================================
// Core Template Aggregate
// ============================================================================

/// The central domain aggregate: a conditional project blueprint.
///
/// ## Invariants (enforced by `validate()`)
///
/// 1. `id.name` and `metadata.name` are non-empty
/// 2. `tree` is non-empty
/// 3. All node paths are unique
/// 4. Every condition parses and names only questions or derived facts
/// 5. Every sectioned file has balanced markers
#[derive(Debug, Clone)]
pub struct Template {
    pub id: TemplateId,
    pub metadata: TemplateMetadata,
    pub tree: TemplateTree,
}

impl Template {
    pub fn builder() -> TemplateBuilder {
        TemplateBuilder::default()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.name().is_empty() {
            return Err(DomainError::InvalidTemplate(
                "Template name cannot be empty".into(),
            ));
        }

        if self.metadata.name.is_empty() {
            return Err(DomainError::InvalidTemplate(
                "Metadata name cannot be empty".into(),
            ));
        }

        if self.tree.is_empty() {
            return Err(DomainError::EmptyTemplate {
                template_id: self.id.to_string(),
            });
        }

        let mut seen = HashSet::new();
        for node in &self.tree.nodes {
            let path = node.path().as_str();
            if !seen.insert(path) {
                return Err(DomainError::DuplicatePath {
                    path: path.to_string(),
                });
            }

            check_names(node.when())?;

            if let TemplateNode::File(FileSpec {
                content: TemplateContent::Sectioned(source),
                ..
            }) = node
            {
                let sections = parse_sections(path, source.as_str())?;
                for condition in sections.conditions() {
                    check_names(condition)?;
                }
            }
        }

        Ok(())
    }

    /// Number of file nodes, regardless of conditions.
    pub fn file_count(&self) -> usize {
        self.tree
            .nodes
            .iter()
            .filter(|n| matches!(n, TemplateNode::File(_)))
            .count()
    }
}

fn check_names(condition: &Condition) -> Result<(), DomainError> {
    match condition.identifiers().into_iter().find(|n| !is_known_name(n)) {
        Some(name) => Err(DomainError::UnknownIdentifier {
            name: name.to_string(),
        }),
        None => Ok(()),
    }
}

/// Builder for constructing templates with validation.
///
/// `build()` requires `id` and `metadata` and a non-empty tree, then runs
/// [`Template::validate`].
#[derive(Default)]
pub struct TemplateBuilder {
    id: Option<TemplateId>,
    metadata: Option<TemplateMetadata>,
    tree: TemplateTree,
}

impl TemplateBuilder {
    pub fn id(mut self, id: TemplateId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn metadata(mut self, metadata: TemplateMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Set the entire tree at once (replaces any previous nodes).
    pub fn tree(mut self, tree: TemplateTree) -> Self {
        self.tree = tree;
        self
    }

    /// Add a single node to the tree (accumulates).
    pub fn add_node(mut self, node: TemplateNode) -> Self {
        self.tree.push(node);
        self
    }

    pub fn build(self) -> Result<Template, DomainError> {
        if self.tree.is_empty() {
            return Err(DomainError::InvalidTemplate(
                "Template tree cannot be empty".into(),
            ));
        }

        let template = Template {
            id: self
                .id
                .ok_or(DomainError::MissingRequiredField { field: "id" })?,
            metadata: self
                .metadata
                .ok_or(DomainError::MissingRequiredField { field: "metadata" })?,
            tree: self.tree,
        };
        template.validate()?;
        Ok(template)
    }
}

// ============================================================================
// Template Metadata
// ============================================================================

/// Human-readable information about a template.
#[derive(Debug, Clone)]
pub struct TemplateMetadata {
    pub name: String,
    pub description: String,
    pub version: String,
    pub author: String,
    pub tags: Vec<String>,
}

impl TemplateMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: "".into(),
            version: "0.1.0".to_string(),
            author: "djforge".to_string(),
            tags: Vec::new(),
        }
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn version(mut self, ver: impl Into<String>) -> Self {
        self.version = ver.into();
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

// ============================================================================
// Template Tree
// ============================================================================

/// Ordered filesystem nodes. Rendering preserves this order.
#[derive(Debug, Clone, Default)]
pub struct TemplateTree {
    pub nodes: Vec<TemplateNode>,
}

impl TemplateTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: TemplateNode) {
        self.nodes.push(node);
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// A single node in the template tree: either a file or directory.
#[derive(Debug, Clone)]
pub enum TemplateNode {
    File(FileSpec),
    Directory(DirectorySpec),
}

impl TemplateNode {
    pub fn path(&self) -> &RelativePath {
        match self {
            Self::File(f) => &f.path,
            Self::Directory(d) => &d.path,
        }
    }

    pub fn when(&self) -> &Condition {
        match self {
            Self::File(f) => &f.when,
            Self::Directory(d) => &d.when,
        }
    }
}

/// Specification for a file to create.
#[derive(Debug, Clone)]
pub struct FileSpec {
    /// Relative path from project root; may contain `{{VARIABLE}}` markers.
    pub path: RelativePath,
    pub content: TemplateContent,
    pub permissions: Permissions,
    /// Emit the file only when this holds.
    pub when: Condition,
}

impl FileSpec {
    pub fn new(path: impl Into<RelativePath>, content: TemplateContent) -> Self {
        Self {
            path: path.into(),
            content,
            permissions: Permissions::read_write(),
            when: Condition::Always,
        }
    }

    /// Mark this file as executable (e.g., `manage.py` or shell scripts).
    pub fn executable(mut self) -> Self {
        self.permissions = Permissions::executable();
        self
    }

    pub fn when(mut self, condition: Condition) -> Self {
        self.when = condition;
        self
    }
}

/// Specification for a directory to create, even if nothing is written into it.
#[derive(Debug, Clone)]
pub struct DirectorySpec {
    pub path: RelativePath,
    pub permissions: Permissions,
    pub when: Condition,
}

impl DirectorySpec {
    pub fn new(path: impl Into<RelativePath>) -> Self {
        Self {
            path: path.into(),
            permissions: Permissions::read_write(),
            when: Condition::Always,
        }
    }

    pub fn when(mut self, condition: Condition) -> Self {
        self.when = condition;
        self
    }
}

// ============================================================================
// Content Types
// ============================================================================

/// Content specification for a file.
#[derive(Debug, Clone)]
pub enum TemplateContent {
    /// Content used exactly as provided.
    Literal(TemplateSource),

    /// Content with `{{VARIABLE}}` placeholders to be substituted.
    Parameterized(TemplateSource),

    /// Content with `[% if %]` sections, then `{{VARIABLE}}` placeholders.
    Sectioned(TemplateSource),
}

impl TemplateContent {
    pub fn source(&self) -> &TemplateSource {
        match self {
            Self::Literal(s) | Self::Parameterized(s) | Self::Sectioned(s) => s,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Literal(_) => "literal",
            Self::Parameterized(_) => "parameterized",
            Self::Sectioned(_) => "sectioned",
        }
    }
}

/// Source of template content: either compile-time or runtime.
#[derive(Debug, Clone)]
pub enum TemplateSource {
    /// Compile-time string (e.g., `include_str!("settings/base.py.tmpl")`)
    Static(&'static str),

    /// Runtime-owned string (filesystem-loaded templates)
    Owned(String),
}

impl From<&'static str> for TemplateSource {
    fn from(s: &'static str) -> Self {
        Self::Static(s)
    }
}

impl From<String> for TemplateSource {
    fn from(s: String) -> Self {
        Self::Owned(s)
    }
}

impl TemplateSource {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Static(s) => s,
            Self::Owned(s) => s,
        }
    }

    /// Check if content contains placeholder syntax (quick heuristic).
    ///
    /// Used by loaders to pick `Parameterized` vs `Literal` when the manifest
    /// doesn't specify.
    pub fn contains_placeholder(&self) -> bool {
        let s = self.as_str();
        s.match_indices("{{")
            .any(|(i, _)| marker_name(&s[i + 2..]).is_some())
    }
}
