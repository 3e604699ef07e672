//! Question registry: the questionnaire that produces an answer set.
//!
//! # Design
//!
//! Every question is described exactly once by a [`QuestionDef`] in
//! [`QUESTION_REGISTRY`]. The registry order is the ask order, and a
//! question's `when` condition may only reference questions that come before
//! it. Parsing, validation and defaults all derive from the table.
//!
//! # Adding a New Question
//!
//! 1. Add a field to `AnswerSet` (and a `choice_enum!` if it is a choice)
//! 2. Add one [`QuestionDef`] entry to [`QUESTION_REGISTRY`]
//! 3. Reference the key from blueprint conditions

use heck::ToSnakeCase;

use crate::domain::{
    condition::Condition,
    entities::answers::{AnswerMap, AnswerValue, DERIVED_FACTS},
    error::DomainError,
    value_objects::{
        ApiStyle, AuthBackend, BackgroundTasks, Cache, CiProvider, Database, DependencyManager,
        DeploymentTarget, Frontend, License, MediaStorage, ObservabilityLevel, PythonVersion,
        SearchBackend, SecurityProfile, StripeMode,
    },
};

/// Shape of the answer a question expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    Text,
    Bool,
    /// Exactly one of `choices`.
    Choice,
    /// Any subset of `choices`, possibly empty.
    MultiChoice,
}

impl QuestionKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Bool => "bool",
            Self::Choice => "choice",
            Self::MultiChoice => "multi-choice",
        }
    }
}

/// Default answer for a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionDefault {
    /// The question must be answered.
    Required,
    Text(&'static str),
    Bool(bool),
    List(&'static [&'static str]),
    /// snake_case of an earlier text answer.
    SnakeCaseOf(&'static str),
}

/// Extra checks on top of the kind and the allowed choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    None,
    NonEmpty,
    PythonIdentifier,
    Email,
}

/// Describes one question.
#[derive(Debug, Clone, Copy)]
pub struct QuestionDef {
    pub key: &'static str,
    pub prompt: &'static str,
    pub help: &'static str,
    pub kind: QuestionKind,
    /// Allowed values for choice kinds; empty otherwise.
    pub choices: &'static [&'static str],
    pub default: QuestionDefault,
    /// Ask (and honour) the question only when this condition holds.
    pub when: Option<&'static str>,
    pub validator: Validator,
}

/// Single source of truth for the questionnaire.
pub static QUESTION_REGISTRY: &[QuestionDef] = &[
    // ── Project identity ─────────────────────────────────────────────────────
    QuestionDef {
        key: "project_name",
        prompt: "Project name",
        help: "Human-readable name, used in docs and page titles",
        kind: QuestionKind::Text,
        choices: &[],
        default: QuestionDefault::Required,
        when: None,
        validator: Validator::NonEmpty,
    },
    QuestionDef {
        key: "project_slug",
        prompt: "Project slug",
        help: "Python package name for the project",
        kind: QuestionKind::Text,
        choices: &[],
        default: QuestionDefault::SnakeCaseOf("project_name"),
        when: None,
        validator: Validator::PythonIdentifier,
    },
    QuestionDef {
        key: "project_description",
        prompt: "Short description",
        help: "One line shown in README and pyproject.toml",
        kind: QuestionKind::Text,
        choices: &[],
        default: QuestionDefault::Text("A Django project"),
        when: None,
        validator: Validator::NonEmpty,
    },
    QuestionDef {
        key: "author_name",
        prompt: "Author name",
        help: "Written to pyproject.toml and LICENSE",
        kind: QuestionKind::Text,
        choices: &[],
        default: QuestionDefault::Text("Your Name"),
        when: None,
        validator: Validator::NonEmpty,
    },
    QuestionDef {
        key: "author_email",
        prompt: "Author email",
        help: "Written to pyproject.toml and the Django ADMINS setting",
        kind: QuestionKind::Text,
        choices: &[],
        default: QuestionDefault::Text("you@example.com"),
        when: None,
        validator: Validator::Email,
    },
    QuestionDef {
        key: "python_version",
        prompt: "Python version",
        help: "Interpreter used by Docker images, CI and tool configs",
        kind: QuestionKind::Choice,
        choices: PythonVersion::VARIANTS,
        default: QuestionDefault::Text("3.12"),
        when: None,
        validator: Validator::None,
    },
    // ── Stack ────────────────────────────────────────────────────────────────
    QuestionDef {
        key: "dependency_manager",
        prompt: "Dependency manager",
        help: "uv writes a PEP 621 [project] table, poetry a [tool.poetry] table",
        kind: QuestionKind::Choice,
        choices: DependencyManager::VARIANTS,
        default: QuestionDefault::Text("uv"),
        when: None,
        validator: Validator::None,
    },
    QuestionDef {
        key: "database",
        prompt: "Database",
        help: "sqlite-dev-postgres-prod uses SQLite locally and PostgreSQL when deployed",
        kind: QuestionKind::Choice,
        choices: Database::VARIANTS,
        default: QuestionDefault::Text("postgresql"),
        when: None,
        validator: Validator::None,
    },
    QuestionDef {
        key: "cache",
        prompt: "Cache backend",
        help: "redis configures django-redis as the default cache",
        kind: QuestionKind::Choice,
        choices: Cache::VARIANTS,
        default: QuestionDefault::Text("redis"),
        when: None,
        validator: Validator::None,
    },
    QuestionDef {
        key: "api_style",
        prompt: "API style",
        help: "Django REST Framework, Strawberry GraphQL, both, or no API app",
        kind: QuestionKind::Choice,
        choices: ApiStyle::VARIANTS,
        default: QuestionDefault::Text("drf"),
        when: None,
        validator: Validator::None,
    },
    QuestionDef {
        key: "frontend",
        prompt: "Frontend",
        help: "Server-rendered HTMX + Tailwind templates, a Next.js app, or none",
        kind: QuestionKind::Choice,
        choices: Frontend::VARIANTS,
        default: QuestionDefault::Text("none"),
        when: None,
        validator: Validator::None,
    },
    QuestionDef {
        key: "background_tasks",
        prompt: "Background tasks",
        help: "celery adds a worker, beat scheduler and result backend",
        kind: QuestionKind::Choice,
        choices: BackgroundTasks::VARIANTS,
        default: QuestionDefault::Text("none"),
        when: None,
        validator: Validator::None,
    },
    QuestionDef {
        key: "use_channels",
        prompt: "Use Django Channels (WebSockets)?",
        help: "Switches the project to ASGI with a Redis channel layer",
        kind: QuestionKind::Bool,
        choices: &[],
        default: QuestionDefault::Bool(false),
        when: None,
        validator: Validator::None,
    },
    // ── Auth & security ──────────────────────────────────────────────────────
    QuestionDef {
        key: "auth_backend",
        prompt: "Authentication",
        help: "django-allauth sessions, SimpleJWT tokens, or both",
        kind: QuestionKind::Choice,
        choices: AuthBackend::VARIANTS,
        default: QuestionDefault::Text("allauth"),
        when: None,
        validator: Validator::None,
    },
    QuestionDef {
        key: "use_2fa",
        prompt: "Enable two-factor authentication?",
        help: "TOTP devices through django-otp",
        kind: QuestionKind::Bool,
        choices: &[],
        default: QuestionDefault::Bool(false),
        when: Some("auth_backend in [\"allauth\", \"both\"]"),
        validator: Validator::None,
    },
    QuestionDef {
        key: "observability_level",
        prompt: "Observability level",
        help: "minimal: console logs; standard: structured logs; full: metrics and tracing",
        kind: QuestionKind::Choice,
        choices: ObservabilityLevel::VARIANTS,
        default: QuestionDefault::Text("minimal"),
        when: None,
        validator: Validator::None,
    },
    QuestionDef {
        key: "use_sentry",
        prompt: "Report errors to Sentry?",
        help: "Initialises sentry-sdk in production settings",
        kind: QuestionKind::Bool,
        choices: &[],
        default: QuestionDefault::Bool(false),
        when: None,
        validator: Validator::None,
    },
    // ── Deployment ───────────────────────────────────────────────────────────
    QuestionDef {
        key: "deployment_targets",
        prompt: "Deployment targets",
        help: "Platforms to generate deployment files for (comma-separated)",
        kind: QuestionKind::MultiChoice,
        choices: DeploymentTarget::VARIANTS,
        default: QuestionDefault::List(&["kubernetes"]),
        when: None,
        validator: Validator::None,
    },
    QuestionDef {
        key: "media_storage",
        prompt: "Media storage",
        help: "WhiteNoise and local media, or S3 via django-storages",
        kind: QuestionKind::Choice,
        choices: MediaStorage::VARIANTS,
        default: QuestionDefault::Text("local-whitenoise"),
        when: None,
        validator: Validator::None,
    },
    QuestionDef {
        key: "security_profile",
        prompt: "Security profile",
        help: "strict adds HSTS preload, a content security policy and locked-down cookies",
        kind: QuestionKind::Choice,
        choices: SecurityProfile::VARIANTS,
        default: QuestionDefault::Text("standard"),
        when: None,
        validator: Validator::None,
    },
    QuestionDef {
        key: "use_sops",
        prompt: "Encrypt Kubernetes secrets with SOPS?",
        help: "Adds a .sops.yaml policy and an encrypted secrets manifest",
        kind: QuestionKind::Bool,
        choices: &[],
        default: QuestionDefault::Bool(false),
        when: Some("\"kubernetes\" in deployment_targets"),
        validator: Validator::None,
    },
    // ── Product features ─────────────────────────────────────────────────────
    QuestionDef {
        key: "use_stripe",
        prompt: "Add Stripe billing?",
        help: "Generates an apps/billing app",
        kind: QuestionKind::Bool,
        choices: &[],
        default: QuestionDefault::Bool(false),
        when: None,
        validator: Validator::None,
    },
    QuestionDef {
        key: "stripe_mode",
        prompt: "Stripe integration mode",
        help: "basic: customer model over the Stripe SDK; advanced: dj-stripe with plans and usage",
        kind: QuestionKind::Choice,
        choices: StripeMode::VARIANTS,
        default: QuestionDefault::Text("basic"),
        when: Some("use_stripe"),
        validator: Validator::None,
    },
    QuestionDef {
        key: "use_teams",
        prompt: "Add teams / organisations?",
        help: "Generates an apps/teams app with memberships and invitations",
        kind: QuestionKind::Bool,
        choices: &[],
        default: QuestionDefault::Bool(false),
        when: Some("auth_backend in [\"allauth\", \"both\"]"),
        validator: Validator::None,
    },
    QuestionDef {
        key: "use_search",
        prompt: "Search backend",
        help: "PostgreSQL full-text search or a Meilisearch index",
        kind: QuestionKind::Choice,
        choices: SearchBackend::VARIANTS,
        default: QuestionDefault::Text("none"),
        when: None,
        validator: Validator::None,
    },
    QuestionDef {
        key: "use_i18n",
        prompt: "Enable internationalisation?",
        help: "Turns on USE_I18N, locale middleware and django-parler",
        kind: QuestionKind::Bool,
        choices: &[],
        default: QuestionDefault::Bool(false),
        when: None,
        validator: Validator::None,
    },
    // ── Tooling ──────────────────────────────────────────────────────────────
    QuestionDef {
        key: "ci_provider",
        prompt: "CI provider",
        help: "Pipeline that runs lint and tests",
        kind: QuestionKind::Choice,
        choices: CiProvider::VARIANTS,
        default: QuestionDefault::Text("github-actions"),
        when: None,
        validator: Validator::None,
    },
    QuestionDef {
        key: "license",
        prompt: "License",
        help: "Proprietary skips the LICENSE file",
        kind: QuestionKind::Choice,
        choices: License::VARIANTS,
        default: QuestionDefault::Text("MIT"),
        when: None,
        validator: Validator::None,
    },
];

/// All questions in ask order.
pub fn questions() -> &'static [QuestionDef] {
    QUESTION_REGISTRY
}

pub fn find_question(key: &str) -> Option<&'static QuestionDef> {
    QUESTION_REGISTRY.iter().find(|q| q.key == key)
}

/// Whether a condition may reference `name`: a question key or a derived fact.
pub fn is_known_name(name: &str) -> bool {
    find_question(name).is_some() || DERIVED_FACTS.contains(&name)
}

impl QuestionDef {
    /// Parsed `when` condition; [`Condition::Always`] when unset.
    pub fn condition(&self) -> Result<Condition, DomainError> {
        self.when.map_or(Ok(Condition::Always), Condition::parse)
    }

    /// Whether the question applies given the answers resolved so far.
    pub fn is_asked(&self, resolved: &AnswerMap) -> Result<bool, DomainError> {
        self.condition()?.evaluate(resolved)
    }

    /// Default answer, given the answers resolved so far.
    pub fn default_value(&self, resolved: &AnswerMap) -> Option<AnswerValue> {
        match self.default {
            QuestionDefault::Required => None,
            QuestionDefault::Text(s) => Some(AnswerValue::Text(s.to_string())),
            QuestionDefault::Bool(b) => Some(AnswerValue::Bool(b)),
            QuestionDefault::List(items) => Some(AnswerValue::List(
                items.iter().map(|s| s.to_string()).collect(),
            )),
            QuestionDefault::SnakeCaseOf(source) => resolved
                .get(source)
                .and_then(AnswerValue::as_text)
                .map(|s| AnswerValue::Text(s.to_snake_case())),
        }
    }

    /// Parse a command-line string (`--set key=value`) into an answer.
    pub fn parse(&self, raw: &str) -> Result<AnswerValue, DomainError> {
        self.coerce(AnswerValue::Text(raw.to_string()))
    }

    /// Bring a raw answer into the question's shape and validate it.
    ///
    /// Text is accepted for booleans (`yes`, `no`, `1`, ...) and for
    /// multi-choice (comma-separated). Choices are matched case-insensitively
    /// and stored in their canonical spelling.
    pub fn coerce(&self, value: AnswerValue) -> Result<AnswerValue, DomainError> {
        let coerced = match (self.kind, value) {
            (QuestionKind::Bool, AnswerValue::Bool(b)) => AnswerValue::Bool(b),
            (QuestionKind::Bool, AnswerValue::Text(s)) => AnswerValue::Bool(parse_bool(&s).ok_or_else(|| {
                DomainError::InvalidAnswer {
                    key: self.key.into(),
                    reason: format!("'{s}' is not a yes/no value"),
                }
            })?),
            (QuestionKind::Text, AnswerValue::Text(s)) => AnswerValue::Text(s.trim().to_string()),
            (QuestionKind::Choice, AnswerValue::Text(s)) => AnswerValue::Text(self.canonical_choice(&s)?),
            (QuestionKind::MultiChoice, AnswerValue::List(items)) => AnswerValue::List(
                items
                    .iter()
                    .map(|s| self.canonical_choice(s))
                    .collect::<Result<_, _>>()?,
            ),
            (QuestionKind::MultiChoice, AnswerValue::Text(s)) => AnswerValue::List(
                s.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| self.canonical_choice(s))
                    .collect::<Result<_, _>>()?,
            ),
            (kind, other) => {
                return Err(DomainError::InvalidAnswer {
                    key: self.key.into(),
                    reason: format!("expected {}, found {}", kind.as_str(), other.kind_name()),
                });
            }
        };
        self.validate(&coerced)?;
        Ok(coerced)
    }

    /// Run the question's validator on an already-shaped answer.
    pub fn validate(&self, value: &AnswerValue) -> Result<(), DomainError> {
        let invalid = |reason: &str| DomainError::InvalidAnswer {
            key: self.key.into(),
            reason: reason.into(),
        };
        let text = value.as_text().unwrap_or_default();
        match self.validator {
            Validator::None => Ok(()),
            Validator::NonEmpty if text.trim().is_empty() => Err(invalid("must not be empty")),
            Validator::PythonIdentifier if !is_identifier(text) => Err(invalid(
                "must start with a letter or underscore and contain only letters, digits and underscores",
            )),
            Validator::Email if !looks_like_email(text) => {
                Err(invalid("must look like an email address"))
            }
            _ => Ok(()),
        }
    }

    fn canonical_choice(&self, raw: &str) -> Result<String, DomainError> {
        let needle = raw.trim();
        self.choices
            .iter()
            .find(|c| c.eq_ignore_ascii_case(needle))
            .map(|c| c.to_string())
            .ok_or_else(|| DomainError::InvalidChoice {
                key: self.key.into(),
                value: needle.into(),
                allowed: self.choices.join(", "),
            })
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "on" => Some(true),
        "false" | "no" | "n" | "0" | "off" => Some(false),
        _ => None,
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn looks_like_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !s.contains(' '),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::answers::AnswerSet;
    use std::collections::HashSet;

    /// The registry is the contract between answers and templates; keep it sane.
    #[test]
    fn assert_registry_integrity() {
        let mut seen = HashSet::new();
        for (index, q) in QUESTION_REGISTRY.iter().enumerate() {
            assert!(seen.insert(q.key), "duplicate question {}", q.key);

            let cond = q.condition().unwrap();
            for name in cond.identifiers() {
                let earlier = QUESTION_REGISTRY[..index].iter().any(|p| p.key == name);
                assert!(earlier, "{}: `when` references later or unknown {name}", q.key);
            }

            let is_choice = matches!(q.kind, QuestionKind::Choice | QuestionKind::MultiChoice);
            assert_eq!(is_choice, !q.choices.is_empty(), "{}: choices/kind mismatch", q.key);

            if let Some(default) = q.default_value(&AnswerMap::new()) {
                q.validate(&default).unwrap();
                if q.kind != QuestionKind::Text {
                    q.coerce(default).unwrap();
                }
            }
        }
    }

    #[test]
    fn registry_covers_every_answer_field() {
        let map = AnswerSet::defaults("x").to_map();
        let registry: HashSet<_> = QUESTION_REGISTRY.iter().map(|q| q.key).collect();
        let answers: HashSet<_> = map.keys().collect();
        assert_eq!(registry, answers);
    }

    #[test]
    fn registry_defaults_match_answer_set_defaults() {
        let mut resolved = AnswerMap::new().with("project_name", "Test Project");
        for q in QUESTION_REGISTRY.iter().skip(1) {
            let value = q.default_value(&resolved).unwrap();
            resolved.insert(q.key, value);
        }
        let expected = AnswerSet::defaults("Test Project");
        assert_eq!(AnswerSet::from_map(&resolved).unwrap(), expected);
    }

    #[test]
    fn parses_bools_and_lists() {
        let q = find_question("use_i18n").unwrap();
        assert_eq!(q.parse("yes").unwrap(), AnswerValue::Bool(true));
        assert_eq!(q.parse("0").unwrap(), AnswerValue::Bool(false));
        assert!(q.parse("maybe").is_err());

        let q = find_question("deployment_targets").unwrap();
        assert_eq!(
            q.parse("Render, docker").unwrap(),
            AnswerValue::List(vec!["render".into(), "docker".into()])
        );
        assert_eq!(q.parse("").unwrap(), AnswerValue::List(vec![]));
        assert!(q.parse("heroku").is_err());
    }

    #[test]
    fn choices_are_canonicalized() {
        let q = find_question("license").unwrap();
        assert_eq!(q.parse("apache-2.0").unwrap(), AnswerValue::Text("Apache-2.0".into()));
        assert!(matches!(
            q.parse("WTFPL"),
            Err(DomainError::InvalidChoice { .. })
        ));
    }

    #[test]
    fn validators_reject_bad_text() {
        assert!(find_question("project_name").unwrap().parse("  ").is_err());
        assert!(find_question("project_description").unwrap().parse("").is_err());
        assert!(find_question("project_slug").unwrap().parse("9lives").is_err());
        assert!(find_question("author_email").unwrap().parse("nobody").is_err());
        assert!(find_question("author_email").unwrap().parse("a@b.io").is_ok());
    }

    #[test]
    fn type_mismatch_is_reported() {
        let q = find_question("cache").unwrap();
        assert!(matches!(
            q.coerce(AnswerValue::Bool(true)),
            Err(DomainError::InvalidAnswer { .. })
        ));
    }

    #[test]
    fn slug_default_follows_project_name() {
        let q = find_question("project_slug").unwrap();
        let resolved = AnswerMap::new().with("project_name", "My Awesome App");
        assert_eq!(
            q.default_value(&resolved),
            Some(AnswerValue::Text("my_awesome_app".into()))
        );
    }

    #[test]
    fn conditional_questions() {
        let q = find_question("stripe_mode").unwrap();
        assert!(!q.is_asked(&AnswerMap::new().with("use_stripe", false)).unwrap());
        assert!(q.is_asked(&AnswerMap::new().with("use_stripe", true)).unwrap());

        let q = find_question("use_sops").unwrap();
        let resolved = AnswerMap::new().with(
            "deployment_targets",
            AnswerValue::List(vec!["render".into()]),
        );
        assert!(!q.is_asked(&resolved).unwrap());
    }

    #[test]
    fn known_names_include_facts() {
        assert!(is_known_name("use_stripe"));
        assert!(is_known_name("uses_celery"));
        assert!(!is_known_name("use_celery"));
    }
}
