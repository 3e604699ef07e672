//! Domain value objects: the enumerated answers of the questionnaire.
//!
//! # Design
//!
//! These are pure value types: `Copy`, equality-by-value, no identity.
//! They hold NO question logic. Prompts, defaults and `when` conditions live
//! in `questions.rs`. This file's only job is to define the choice types,
//! their canonical string forms and their `FromStr` parsers.
//!
//! # Adding New Variants
//!
//! 1. Add the `Variant => "value"` line to the enum's `choice_enum!` block
//! 2. Reference the new value from blueprint conditions if it gates files
//! 3. Done: `as_str`, `Display`, `FromStr`, serde and `VARIANTS` follow

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declares an answer enum together with its canonical spelling.
///
/// The string on the right of `=>` is the value written in answers files, on
/// the command line, and inside template conditions.
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident, key = $key:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $value:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $value)] $variant, )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Canonical spellings, in declaration order.
            pub const VARIANTS: &'static [&'static str] = &[$($value),+];

            /// Question key this choice answers.
            pub const KEY: &'static str = $key;

            pub const fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $value, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(needle))
                    .ok_or_else(|| DomainError::InvalidChoice {
                        key: $key.to_string(),
                        value: needle.to_string(),
                        allowed: Self::VARIANTS.join(", "),
                    })
            }
        }
    };
}

// ── Toolchain ────────────────────────────────────────────────────────────────

choice_enum! {
    /// Python interpreter the generated project targets.
    PythonVersion, key = "python_version" {
        Py311 => "3.11",
        Py312 => "3.12",
        Py313 => "3.13",
    }
}

impl PythonVersion {
    /// Version without the dot, as used by tool configs (`py312`).
    pub fn nodot(self) -> String {
        self.as_str().replace('.', "")
    }
}

choice_enum! {
    /// Packaging tool that owns `pyproject.toml`.
    DependencyManager, key = "dependency_manager" {
        Uv => "uv",
        Poetry => "poetry",
    }
}

// ── Data layer ───────────────────────────────────────────────────────────────

choice_enum! {
    Database, key = "database" {
        Postgresql => "postgresql",
        SqliteDevPostgresProd => "sqlite-dev-postgres-prod",
    }
}

choice_enum! {
    Cache, key = "cache" {
        Redis => "redis",
        None => "none",
    }
}

choice_enum! {
    /// Full-text search backend.
    SearchBackend, key = "use_search" {
        None => "none",
        PostgresFts => "postgres-fts",
        Meilisearch => "meilisearch",
    }
}

choice_enum! {
    /// Where uploaded media and collected static files live.
    MediaStorage, key = "media_storage" {
        LocalWhitenoise => "local-whitenoise",
        AwsS3 => "aws-s3",
    }
}

// ── Web surface ──────────────────────────────────────────────────────────────

choice_enum! {
    /// API layer exposed by the project.
    ApiStyle, key = "api_style" {
        Drf => "drf",
        GraphqlStrawberry => "graphql-strawberry",
        Both => "both",
        None => "none",
    }
}

impl ApiStyle {
    pub const fn includes_drf(self) -> bool {
        matches!(self, Self::Drf | Self::Both)
    }

    pub const fn includes_graphql(self) -> bool {
        matches!(self, Self::GraphqlStrawberry | Self::Both)
    }
}

choice_enum! {
    Frontend, key = "frontend" {
        None => "none",
        HtmxTailwind => "htmx-tailwind",
        Nextjs => "nextjs",
    }
}

choice_enum! {
    AuthBackend, key = "auth_backend" {
        Allauth => "allauth",
        Jwt => "jwt",
        Both => "both",
    }
}

impl AuthBackend {
    pub const fn includes_allauth(self) -> bool {
        matches!(self, Self::Allauth | Self::Both)
    }

    pub const fn includes_jwt(self) -> bool {
        matches!(self, Self::Jwt | Self::Both)
    }
}

// ── Runtime features ─────────────────────────────────────────────────────────

choice_enum! {
    BackgroundTasks, key = "background_tasks" {
        None => "none",
        Celery => "celery",
    }
}

choice_enum! {
    StripeMode, key = "stripe_mode" {
        /// Hand-rolled customer model on top of the Stripe SDK.
        Basic => "basic",
        /// dj-stripe synced models plus plan and usage tracking.
        Advanced => "advanced",
    }
}

// ── Operations ───────────────────────────────────────────────────────────────

choice_enum! {
    /// How much logging, metrics and tracing the project ships with.
    ObservabilityLevel, key = "observability_level" {
        Minimal => "minimal",
        Standard => "standard",
        Full => "full",
    }
}

choice_enum! {
    SecurityProfile, key = "security_profile" {
        Standard => "standard",
        Strict => "strict",
    }
}

choice_enum! {
    /// A platform the project can be deployed to. Several may be selected.
    DeploymentTarget, key = "deployment_targets" {
        Kubernetes => "kubernetes",
        Render => "render",
        Flyio => "flyio",
        AwsEcsFargate => "aws-ecs-fargate",
        AwsEc2Ansible => "aws-ec2-ansible",
        Docker => "docker",
    }
}

impl DeploymentTarget {
    /// Whether the platform deploys the project as an OCI image.
    pub const fn ships_container_image(self) -> bool {
        matches!(
            self,
            Self::Kubernetes | Self::Flyio | Self::AwsEcsFargate | Self::Docker
        )
    }

    /// Name of the derived fact that is true when this target is selected.
    pub const fn fact(self) -> &'static str {
        match self {
            Self::Kubernetes => "deploy_kubernetes",
            Self::Render => "deploy_render",
            Self::Flyio => "deploy_flyio",
            Self::AwsEcsFargate => "deploy_aws_ecs_fargate",
            Self::AwsEc2Ansible => "deploy_aws_ec2_ansible",
            Self::Docker => "deploy_docker",
        }
    }
}

choice_enum! {
    CiProvider, key = "ci_provider" {
        GithubActions => "github-actions",
        GitlabCi => "gitlab-ci",
        None => "none",
    }
}

choice_enum! {
    License, key = "license" {
        Mit => "MIT",
        Bsd3 => "BSD-3-Clause",
        Apache2 => "Apache-2.0",
        Gpl3 => "GPL-3.0",
        Proprietary => "Proprietary",
    }
}

impl License {
    /// Whether a `LICENSE` file is emitted.
    pub const fn is_open_source(self) -> bool {
        !matches!(self, Self::Proprietary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choices_parse_case_insensitively() {
        assert_eq!("UV".parse::<DependencyManager>().unwrap(), DependencyManager::Uv);
        assert_eq!("mit".parse::<License>().unwrap(), License::Mit);
        assert_eq!(
            " aws-ecs-fargate ".parse::<DeploymentTarget>().unwrap(),
            DeploymentTarget::AwsEcsFargate
        );
    }

    #[test]
    fn unknown_choice_lists_allowed_values() {
        let err = "pip".parse::<DependencyManager>().unwrap_err();
        match err {
            DomainError::InvalidChoice {
                key,
                value,
                allowed,
            } => {
                assert_eq!(key, "dependency_manager");
                assert_eq!(value, "pip");
                assert_eq!(allowed, "uv, poetry");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn serde_uses_canonical_spelling() {
        let json = serde_json::to_string(&ApiStyle::GraphqlStrawberry).unwrap();
        assert_eq!(json, "\"graphql-strawberry\"");

        let parsed: License = serde_json::from_str("\"BSD-3-Clause\"").unwrap();
        assert_eq!(parsed, License::Bsd3);
    }

    #[test]
    fn feature_helpers() {
        assert!(ApiStyle::Both.includes_drf());
        assert!(ApiStyle::Both.includes_graphql());
        assert!(!ApiStyle::None.includes_drf());
        assert!(AuthBackend::Both.includes_jwt());
        assert!(!AuthBackend::Jwt.includes_allauth());
        assert!(DeploymentTarget::Docker.ships_container_image());
        assert!(!DeploymentTarget::Render.ships_container_image());
        assert!(!License::Proprietary.is_open_source());
        assert_eq!(PythonVersion::Py312.nodot(), "312");
    }

    #[test]
    fn every_target_has_a_distinct_fact() {
        let facts: std::collections::HashSet<_> =
            DeploymentTarget::ALL.iter().map(|t| t.fact()).collect();
        assert_eq!(facts.len(), DeploymentTarget::ALL.len());
    }
}
