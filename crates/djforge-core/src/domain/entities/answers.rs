//! Answer values, raw answer maps and the typed answer set.
//!
//! Answers arrive untyped (from YAML files, `--set key=value`, prompts) as an
//! [`AnswerMap`]. Once every question is resolved the map is converted into
//! an [`AnswerSet`], whose fields are the enums from `value_objects.rs` and
//! whose [`AnswerSet::validate`] enforces the cross-answer rules.
//!
//! Both types implement [`AnswerLookup`], the read interface conditions are
//! evaluated against. `AnswerSet` additionally exposes derived facts such as
//! `uses_celery` or `needs_container_image` so templates do not have to
//! repeat the same compound condition in twenty places.

use std::collections::BTreeMap;
use std::fmt;

use heck::ToSnakeCase;
use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    value_objects::{
        ApiStyle, AuthBackend, BackgroundTasks, Cache, CiProvider, Database, DependencyManager,
        DeploymentTarget, Frontend, License, MediaStorage, ObservabilityLevel, PythonVersion,
        SearchBackend, SecurityProfile, StripeMode,
    },
};

// ============================================================================
// AnswerValue
// ============================================================================

/// Raw form of a single answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Text(String),
    List(Vec<String>),
}

impl AnswerValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Short type name for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Text(_) => "text",
            Self::List(_) => "list",
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

impl From<bool> for AnswerValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

// ============================================================================
// Lookup
// ============================================================================

/// Read access to answers by name, as used by [`Condition`](crate::domain::Condition).
pub trait AnswerLookup {
    fn lookup(&self, name: &str) -> Option<AnswerValue>;
}

// ============================================================================
// AnswerMap
// ============================================================================

/// Untyped answers keyed by question key, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerMap(BTreeMap<String, AnswerValue>);

impl AnswerMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AnswerValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<AnswerValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&AnswerValue> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<AnswerValue> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Overlay `other` onto `self`; keys in `other` win.
    pub fn merge(&mut self, other: AnswerMap) {
        self.0.extend(other.0);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn text(&self, key: &'static str) -> Result<&str, DomainError> {
        match self.0.get(key) {
            Some(AnswerValue::Text(s)) => Ok(s),
            Some(other) => Err(wrong_kind(key, "text", other)),
            None => Err(DomainError::MissingAnswer { key: key.into() }),
        }
    }

    fn flag(&self, key: &'static str) -> Result<bool, DomainError> {
        match self.0.get(key) {
            Some(AnswerValue::Bool(b)) => Ok(*b),
            Some(other) => Err(wrong_kind(key, "boolean", other)),
            None => Err(DomainError::MissingAnswer { key: key.into() }),
        }
    }

    fn choice<T: std::str::FromStr<Err = DomainError>>(
        &self,
        key: &'static str,
    ) -> Result<T, DomainError> {
        self.text(key)?.parse()
    }

    fn list(&self, key: &'static str) -> Result<&[String], DomainError> {
        match self.0.get(key) {
            Some(AnswerValue::List(items)) => Ok(items),
            Some(other) => Err(wrong_kind(key, "list", other)),
            None => Err(DomainError::MissingAnswer { key: key.into() }),
        }
    }
}

fn wrong_kind(key: &str, expected: &str, found: &AnswerValue) -> DomainError {
    DomainError::InvalidAnswer {
        key: key.into(),
        reason: format!("expected {expected}, found {}", found.kind_name()),
    }
}

impl AnswerLookup for AnswerMap {
    fn lookup(&self, name: &str) -> Option<AnswerValue> {
        self.0.get(name).cloned()
    }
}

impl FromIterator<(String, AnswerValue)> for AnswerMap {
    fn from_iter<I: IntoIterator<Item = (String, AnswerValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ============================================================================
// AnswerSet
// ============================================================================

/// Names of the facts [`AnswerSet`] derives from its answers.
///
/// Conditions may reference these exactly like question keys.
pub const DERIVED_FACTS: &[&str] = &[
    "has_api",
    "uses_drf",
    "uses_graphql",
    "uses_allauth",
    "uses_jwt",
    "uses_celery",
    "uses_redis",
    "uses_s3",
    "uses_search",
    "uses_postgres_search",
    "uses_meilisearch",
    "has_frontend_templates",
    "uses_nextjs",
    "is_strict",
    "observability_standard",
    "observability_full",
    "needs_container_image",
    "has_license",
    "deploy_kubernetes",
    "deploy_render",
    "deploy_flyio",
    "deploy_aws_ecs_fargate",
    "deploy_aws_ec2_ansible",
    "deploy_docker",
];

/// Keys of the [`AnswerSet`] fields, in question order.
const ANSWER_KEYS: &[&str] = &[
    "project_name",
    "project_slug",
    "project_description",
    "author_name",
    "author_email",
    "python_version",
    "dependency_manager",
    "database",
    "cache",
    "api_style",
    "frontend",
    "background_tasks",
    "use_channels",
    "auth_backend",
    "use_2fa",
    "observability_level",
    "use_sentry",
    "deployment_targets",
    "media_storage",
    "security_profile",
    "use_sops",
    "use_stripe",
    "stripe_mode",
    "use_teams",
    "use_search",
    "use_i18n",
    "ci_provider",
    "license",
];

/// The resolved, typed configuration driving generation.
///
/// Field order is question order; serialization writes the answers record in
/// the same order the questions were asked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSet {
    pub project_name: String,
    pub project_slug: String,
    pub project_description: String,
    pub author_name: String,
    pub author_email: String,
    pub python_version: PythonVersion,
    pub dependency_manager: DependencyManager,
    pub database: Database,
    pub cache: Cache,
    pub api_style: ApiStyle,
    pub frontend: Frontend,
    pub background_tasks: BackgroundTasks,
    pub use_channels: bool,
    pub auth_backend: AuthBackend,
    pub use_2fa: bool,
    pub observability_level: ObservabilityLevel,
    pub use_sentry: bool,
    pub deployment_targets: Vec<DeploymentTarget>,
    pub media_storage: MediaStorage,
    pub security_profile: SecurityProfile,
    pub use_sops: bool,
    pub use_stripe: bool,
    pub stripe_mode: StripeMode,
    pub use_teams: bool,
    pub use_search: SearchBackend,
    pub use_i18n: bool,
    pub ci_provider: CiProvider,
    pub license: License,
}

impl AnswerSet {
    /// Every question answered with its default, for the given project name.
    pub fn defaults(project_name: impl Into<String>) -> Self {
        let project_name = project_name.into();
        Self {
            project_slug: project_name.to_snake_case(),
            project_name,
            project_description: "A Django project".into(),
            author_name: "Your Name".into(),
            author_email: "you@example.com".into(),
            python_version: PythonVersion::Py312,
            dependency_manager: DependencyManager::Uv,
            database: Database::Postgresql,
            cache: Cache::Redis,
            api_style: ApiStyle::Drf,
            frontend: Frontend::None,
            background_tasks: BackgroundTasks::None,
            use_channels: false,
            auth_backend: AuthBackend::Allauth,
            use_2fa: false,
            observability_level: ObservabilityLevel::Minimal,
            use_sentry: false,
            deployment_targets: vec![DeploymentTarget::Kubernetes],
            media_storage: MediaStorage::LocalWhitenoise,
            security_profile: SecurityProfile::Standard,
            use_sops: false,
            use_stripe: false,
            stripe_mode: StripeMode::Basic,
            use_teams: false,
            use_search: SearchBackend::None,
            use_i18n: false,
            ci_provider: CiProvider::GithubActions,
            license: License::Mit,
        }
    }

    /// Build from a fully resolved map. Every question key must be present.
    pub fn from_map(map: &AnswerMap) -> Result<Self, DomainError> {
        let deployment_targets = map
            .list("deployment_targets")?
            .iter()
            .map(|s| s.parse())
            .collect::<Result<Vec<DeploymentTarget>, _>>()?;

        let mut set = Self {
            project_name: map.text("project_name")?.to_string(),
            project_slug: map.text("project_slug")?.to_string(),
            project_description: map.text("project_description")?.to_string(),
            author_name: map.text("author_name")?.to_string(),
            author_email: map.text("author_email")?.to_string(),
            python_version: map.choice("python_version")?,
            dependency_manager: map.choice("dependency_manager")?,
            database: map.choice("database")?,
            cache: map.choice("cache")?,
            api_style: map.choice("api_style")?,
            frontend: map.choice("frontend")?,
            background_tasks: map.choice("background_tasks")?,
            use_channels: map.flag("use_channels")?,
            auth_backend: map.choice("auth_backend")?,
            use_2fa: map.flag("use_2fa")?,
            observability_level: map.choice("observability_level")?,
            use_sentry: map.flag("use_sentry")?,
            deployment_targets,
            media_storage: map.choice("media_storage")?,
            security_profile: map.choice("security_profile")?,
            use_sops: map.flag("use_sops")?,
            use_stripe: map.flag("use_stripe")?,
            stripe_mode: map.choice("stripe_mode")?,
            use_teams: map.flag("use_teams")?,
            use_search: map.choice("use_search")?,
            use_i18n: map.flag("use_i18n")?,
            ci_provider: map.choice("ci_provider")?,
            license: map.choice("license")?,
        };
        set.normalize();
        Ok(set)
    }

    /// Flatten back into raw answers (the form written to the answers record).
    pub fn to_map(&self) -> AnswerMap {
        ANSWER_KEYS
            .iter()
            .filter_map(|key| Some(((*key).to_string(), self.answer(key)?)))
            .collect()
    }

    /// Raw value of one answer field.
    fn answer(&self, key: &str) -> Option<AnswerValue> {
        let value = match key {
            "project_name" => self.project_name.as_str().into(),
            "project_slug" => self.project_slug.as_str().into(),
            "project_description" => self.project_description.as_str().into(),
            "author_name" => self.author_name.as_str().into(),
            "author_email" => self.author_email.as_str().into(),
            "python_version" => self.python_version.as_str().into(),
            "dependency_manager" => self.dependency_manager.as_str().into(),
            "database" => self.database.as_str().into(),
            "cache" => self.cache.as_str().into(),
            "api_style" => self.api_style.as_str().into(),
            "frontend" => self.frontend.as_str().into(),
            "background_tasks" => self.background_tasks.as_str().into(),
            "use_channels" => self.use_channels.into(),
            "auth_backend" => self.auth_backend.as_str().into(),
            "use_2fa" => self.use_2fa.into(),
            "observability_level" => self.observability_level.as_str().into(),
            "use_sentry" => self.use_sentry.into(),
            "deployment_targets" => AnswerValue::List(
                self.deployment_targets
                    .iter()
                    .map(|t| t.as_str().to_string())
                    .collect(),
            ),
            "media_storage" => self.media_storage.as_str().into(),
            "security_profile" => self.security_profile.as_str().into(),
            "use_sops" => self.use_sops.into(),
            "use_stripe" => self.use_stripe.into(),
            "stripe_mode" => self.stripe_mode.as_str().into(),
            "use_teams" => self.use_teams.into(),
            "use_search" => self.use_search.as_str().into(),
            "use_i18n" => self.use_i18n.into(),
            "ci_provider" => self.ci_provider.as_str().into(),
            "license" => self.license.as_str().into(),
            _ => return None,
        };
        Some(value)
    }

    /// Put dependent answers into canonical form.
    ///
    /// Deployment targets are de-duplicated and sorted by declaration order;
    /// `stripe_mode` falls back to its default when Stripe is off.
    pub fn normalize(&mut self) {
        self.deployment_targets.sort_by_key(|t| {
            DeploymentTarget::ALL
                .iter()
                .position(|candidate| candidate == t)
        });
        self.deployment_targets.dedup();
        if !self.use_stripe {
            self.stripe_mode = StripeMode::Basic;
        }
    }

    /// Check the rules that tie answers together.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.project_name.trim().is_empty() {
            return Err(DomainError::InvalidAnswer {
                key: "project_name".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.project_description.trim().is_empty() {
            return Err(DomainError::InvalidAnswer {
                key: "project_description".into(),
                reason: "must not be empty".into(),
            });
        }
        if !is_python_identifier(&self.project_slug) {
            return Err(DomainError::InvalidAnswer {
                key: "project_slug".into(),
                reason: format!("'{}' is not a valid Python package name", self.project_slug),
            });
        }

        for rule in CONSISTENCY_RULES {
            if (rule.applies)(self) && !(rule.holds)(self) {
                return Err(DomainError::InconsistentAnswers {
                    key: rule.key.into(),
                    reason: rule.reason.into(),
                });
            }
        }
        Ok(())
    }

    pub fn has_target(&self, target: DeploymentTarget) -> bool {
        self.deployment_targets.contains(&target)
    }

    pub fn uses_celery(&self) -> bool {
        self.background_tasks == BackgroundTasks::Celery
    }

    /// Redis is needed by the cache, the Celery broker or the channel layer.
    pub fn uses_redis(&self) -> bool {
        self.cache == Cache::Redis || self.uses_celery() || self.use_channels
    }

    pub fn needs_container_image(&self) -> bool {
        self.deployment_targets
            .iter()
            .any(|t| t.ships_container_image())
    }

    /// Evaluate a derived fact by name.
    pub fn fact(&self, name: &str) -> Option<bool> {
        let value = match name {
            "has_api" => self.api_style != ApiStyle::None,
            "uses_drf" => self.api_style.includes_drf(),
            "uses_graphql" => self.api_style.includes_graphql(),
            "uses_allauth" => self.auth_backend.includes_allauth(),
            "uses_jwt" => self.auth_backend.includes_jwt(),
            "uses_celery" => self.uses_celery(),
            "uses_redis" => self.uses_redis(),
            "uses_s3" => self.media_storage == MediaStorage::AwsS3,
            "uses_search" => self.use_search != SearchBackend::None,
            "uses_postgres_search" => self.use_search == SearchBackend::PostgresFts,
            "uses_meilisearch" => self.use_search == SearchBackend::Meilisearch,
            "has_frontend_templates" => self.frontend == Frontend::HtmxTailwind,
            "uses_nextjs" => self.frontend == Frontend::Nextjs,
            "is_strict" => self.security_profile == SecurityProfile::Strict,
            "observability_standard" => self.observability_level != ObservabilityLevel::Minimal,
            "observability_full" => self.observability_level == ObservabilityLevel::Full,
            "needs_container_image" => self.needs_container_image(),
            "has_license" => self.license.is_open_source(),
            other => {
                let target = DeploymentTarget::ALL.iter().find(|t| t.fact() == other)?;
                self.has_target(*target)
            }
        };
        Some(value)
    }
}

impl AnswerLookup for AnswerSet {
    fn lookup(&self, name: &str) -> Option<AnswerValue> {
        match self.fact(name) {
            Some(fact) => Some(AnswerValue::Bool(fact)),
            None => self.answer(name),
        }
    }
}

// ============================================================================
// Consistency rules
// ============================================================================

/// A simple implication between answers: whenever `applies`, `holds` must.
struct ConsistencyRule {
    key: &'static str,
    applies: fn(&AnswerSet) -> bool,
    holds: fn(&AnswerSet) -> bool,
    reason: &'static str,
}

static CONSISTENCY_RULES: &[ConsistencyRule] = &[
    ConsistencyRule {
        key: "use_2fa",
        applies: |a| a.use_2fa,
        holds: |a| a.auth_backend.includes_allauth(),
        reason: "two-factor authentication requires auth_backend 'allauth' or 'both'",
    },
    ConsistencyRule {
        key: "use_teams",
        applies: |a| a.use_teams,
        holds: |a| a.auth_backend.includes_allauth(),
        reason: "teams attach to allauth accounts; use auth_backend 'allauth' or 'both'",
    },
    ConsistencyRule {
        key: "auth_backend",
        applies: |a| a.auth_backend.includes_jwt(),
        holds: |a| a.api_style != ApiStyle::None,
        reason: "JWT tokens are issued by the API; choose an api_style other than 'none'",
    },
    ConsistencyRule {
        key: "use_sops",
        applies: |a| a.use_sops,
        holds: |a| a.has_target(DeploymentTarget::Kubernetes),
        reason: "SOPS secrets are only wired into the Kubernetes manifests",
    },
];

fn is_python_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // AnswerValue / AnswerMap
    // ========================================================================

    #[test]
    fn merge_overrides_existing_keys() {
        let mut base = AnswerMap::new().with("cache", "redis").with("use_i18n", false);
        base.merge(AnswerMap::new().with("cache", "none"));
        assert_eq!(base.get("cache"), Some(&AnswerValue::Text("none".into())));
        assert_eq!(base.get("use_i18n"), Some(&AnswerValue::Bool(false)));
    }

    #[test]
    fn untagged_serde_shapes() {
        let map: AnswerMap = serde_json::from_str(
            r#"{"use_i18n": true, "cache": "redis", "deployment_targets": ["docker"]}"#,
        )
        .unwrap();
        assert_eq!(map.get("use_i18n"), Some(&AnswerValue::Bool(true)));
        assert_eq!(
            map.get("deployment_targets"),
            Some(&AnswerValue::List(vec!["docker".into()]))
        );
    }

    // ========================================================================
    // AnswerSet
    // ========================================================================

    #[test]
    fn defaults_derive_slug_and_validate() {
        let set = AnswerSet::defaults("Test Project");
        assert_eq!(set.project_slug, "test_project");
        set.validate().unwrap();
    }

    #[test]
    fn map_round_trip_preserves_answers() {
        let mut set = AnswerSet::defaults("Shop");
        set.use_stripe = true;
        set.stripe_mode = StripeMode::Advanced;
        set.deployment_targets = vec![DeploymentTarget::Docker, DeploymentTarget::Render];

        let back = AnswerSet::from_map(&set.to_map()).unwrap();
        assert!(back.use_stripe);
        assert_eq!(back.stripe_mode, StripeMode::Advanced);
        // canonical order
        assert_eq!(
            back.deployment_targets,
            vec![DeploymentTarget::Render, DeploymentTarget::Docker]
        );
    }

    #[test]
    fn from_map_reports_wrong_kind_and_missing_keys() {
        let mut map = AnswerSet::defaults("Shop").to_map();
        map.insert("use_i18n", "yes");
        assert!(matches!(
            AnswerSet::from_map(&map),
            Err(DomainError::InvalidAnswer { key, .. }) if key == "use_i18n"
        ));

        let mut map = AnswerSet::defaults("Shop").to_map();
        map.remove("license");
        assert!(matches!(
            AnswerSet::from_map(&map),
            Err(DomainError::MissingAnswer { key }) if key == "license"
        ));
    }

    #[test]
    fn stripe_mode_resets_without_stripe() {
        let mut map = AnswerSet::defaults("Shop").to_map();
        map.insert("stripe_mode", "advanced");
        let set = AnswerSet::from_map(&map).unwrap();
        assert_eq!(set.stripe_mode, StripeMode::Basic);
    }

    #[test]
    fn two_factor_requires_allauth() {
        let mut set = AnswerSet::defaults("Shop");
        set.use_2fa = true;
        set.auth_backend = AuthBackend::Jwt;
        assert!(matches!(
            set.validate(),
            Err(DomainError::InconsistentAnswers { key, .. }) if key == "use_2fa"
        ));

        set.auth_backend = AuthBackend::Both;
        set.validate().unwrap();
    }

    #[test]
    fn jwt_requires_an_api() {
        let mut set = AnswerSet::defaults("Shop");
        set.api_style = ApiStyle::None;
        set.validate().unwrap();

        for backend in [AuthBackend::Jwt, AuthBackend::Both] {
            set.auth_backend = backend;
            assert!(matches!(
                set.validate(),
                Err(DomainError::InconsistentAnswers { key, .. }) if key == "auth_backend"
            ));
        }

        set.api_style = ApiStyle::GraphqlStrawberry;
        set.validate().unwrap();
    }

    #[test]
    fn sops_requires_kubernetes() {
        let mut set = AnswerSet::defaults("Shop");
        set.use_sops = true;
        set.deployment_targets = vec![DeploymentTarget::Render];
        assert!(set.validate().is_err());
    }

    #[test]
    fn rejects_bad_slug_and_empty_name() {
        let mut set = AnswerSet::defaults("Shop");
        set.project_slug = "my-shop".into();
        assert!(set.validate().is_err());

        let set = AnswerSet::defaults("   ");
        assert!(set.validate().is_err());
    }

    #[test]
    fn derived_facts() {
        let mut set = AnswerSet::defaults("Shop");
        set.api_style = ApiStyle::Both;
        set.background_tasks = BackgroundTasks::Celery;
        set.cache = Cache::None;
        set.deployment_targets = vec![DeploymentTarget::Render];

        assert_eq!(set.fact("uses_drf"), Some(true));
        assert_eq!(set.fact("uses_graphql"), Some(true));
        assert_eq!(set.fact("uses_redis"), Some(true));
        assert_eq!(set.fact("needs_container_image"), Some(false));
        assert_eq!(set.fact("deploy_render"), Some(true));
        assert_eq!(set.fact("deploy_kubernetes"), Some(false));
        assert_eq!(set.fact("project_name"), None);
    }

    #[test]
    fn every_derived_fact_is_answerable() {
        let set = AnswerSet::defaults("Shop");
        for name in DERIVED_FACTS {
            assert!(set.fact(name).is_some(), "fact {name} not implemented");
        }
    }

    #[test]
    fn lookup_falls_back_to_answers() {
        let set = AnswerSet::defaults("Shop");
        assert_eq!(
            set.lookup("cache"),
            Some(AnswerValue::Text("redis".into()))
        );
        assert_eq!(set.lookup("uses_redis"), Some(AnswerValue::Bool(true)));
        assert_eq!(set.lookup("nope"), None);
    }

    #[test]
    fn lookup_agrees_with_map_for_every_field() {
        let mut set = AnswerSet::defaults("Shop");
        set.use_stripe = true;
        set.deployment_targets = vec![DeploymentTarget::Render, DeploymentTarget::Docker];
        let map = set.to_map();

        assert_eq!(map.len(), ANSWER_KEYS.len());
        for (key, value) in map.iter() {
            assert_eq!(set.lookup(key).as_ref(), Some(value), "{key}");
        }
    }
}
