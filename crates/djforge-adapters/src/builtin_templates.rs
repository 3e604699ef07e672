//! The built-in Django blueprint and user template discovery.
//!
//! The blueprint is embedded in the binary: every file lives under
//! `blueprint/django/` with a `.tmpl` suffix and is pulled in with
//! `include_str!`. Content kind is detected the same way the filesystem
//! loader does it, so a blueprint file and a user template file behave
//! identically.
//!
//! # User templates
//!
//! Additional templates are searched in this order, stopping at the first
//! directory that exists and yields at least one valid template:
//!
//! 1. **`$DJFORGE_TEMPLATES_DIR`**
//! 2. **`./templates`** relative to the working directory
//! 3. **`<executable-dir>/templates`**
//!
//! ```env
//! DJFORGE_TEMPLATES_DIR=./templates
//! ```

use std::path::PathBuf;

use tracing::{debug, info, instrument};

use djforge_core::domain::{
    Condition, DirectorySpec, DomainError, FileSpec, Template, TemplateId, TemplateMetadata,
    TemplateNode, TemplateSource, TemplateTree,
};

use crate::template_loader::{FilesystemTemplateLoader, classify};

/// Id of the built-in blueprint, used when `--template` is not given.
pub const DEFAULT_TEMPLATE: &str = "django-project@1.0.0";

macro_rules! blueprint {
    ($path:literal) => {
        include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/blueprint/django/",
            $path,
            ".tmpl"
        ))
    };
}

/// Blueprint file table entry: output path, condition, source.
macro_rules! entry {
    ($path:literal) => {
        ($path, "", blueprint!($path))
    };
    ($path:literal, $when:literal) => {
        ($path, $when, blueprint!($path))
    };
}

/// Directory nodes. They come first so a false condition hides the
/// whole subtree.
const DIRECTORIES: &[(&str, &str)] = &[
    ("static", ""),
    ("media", ""),
    ("templates", ""),
    ("locale", "use_i18n"),
    ("apps/api", "has_api"),
    ("apps/billing", "use_stripe"),
    ("apps/teams", "use_teams"),
    ("frontend", "uses_nextjs"),
    ("deploy/k8s", "deploy_kubernetes"),
    ("deploy/render", "deploy_render"),
    ("deploy/flyio", "deploy_flyio"),
    ("deploy/ecs", "deploy_aws_ecs_fargate"),
    ("deploy/ansible", "deploy_aws_ec2_ansible"),
    ("deploy/ansible/templates", ""),
    ("deploy/docker", "deploy_docker"),
    (".github", "ci_provider == \"github-actions\""),
];

const FILES: &[(&str, &str, &str)] = &[
    // Project root
    entry!("manage.py"),
    entry!("pyproject.toml"),
    entry!("README.md"),
    entry!(".gitignore"),
    entry!(".env.example"),
    entry!(".pre-commit-config.yaml"),
    entry!(".dockerignore"),
    entry!("Dockerfile"),
    entry!("docker-compose.yml"),
    entry!("conftest.py"),
    entry!("LICENSE", "has_license"),
    entry!(".sops.yaml", "use_sops"),
    entry!("render.yaml", "deploy_render"),
    entry!("fly.toml", "deploy_flyio"),
    entry!("docker-compose.prod.yml", "deploy_docker"),
    entry!(".gitlab-ci.yml", "ci_provider == \"gitlab-ci\""),
    entry!(".github/workflows/ci.yml"),
    // Django configuration
    entry!("config/__init__.py"),
    entry!("config/settings/__init__.py"),
    entry!("config/settings/base.py"),
    entry!("config/settings/dev.py"),
    entry!("config/settings/prod.py"),
    entry!("config/settings/test.py"),
    entry!("config/urls.py"),
    entry!("config/wsgi.py"),
    entry!("config/asgi.py"),
    entry!("config/celery.py", "uses_celery"),
    entry!("config/routing.py", "use_channels"),
    entry!("config/logging.py", "observability_standard"),
    entry!("config/telemetry.py", "observability_full"),
    // Core app
    entry!("apps/__init__.py"),
    entry!("apps/core/__init__.py"),
    entry!("apps/core/apps.py"),
    entry!("apps/core/models.py"),
    entry!("apps/core/views.py"),
    entry!("apps/core/urls.py"),
    entry!("apps/core/migrations/__init__.py"),
    entry!("apps/core/tests/__init__.py"),
    entry!("apps/core/tests/test_views.py"),
    entry!("apps/core/tasks.py", "uses_celery"),
    entry!("apps/core/consumers.py", "use_channels"),
    entry!("apps/core/search.py", "uses_search"),
    // Users
    entry!("apps/users/__init__.py"),
    entry!("apps/users/apps.py"),
    entry!("apps/users/models.py"),
    entry!("apps/users/admin.py"),
    entry!("apps/users/migrations/__init__.py"),
    entry!("apps/users/tests/__init__.py"),
    entry!("apps/users/tests/test_models.py"),
    // API
    entry!("apps/api/__init__.py"),
    entry!("apps/api/apps.py"),
    entry!("apps/api/urls.py"),
    entry!("apps/api/serializers.py", "uses_drf"),
    entry!("apps/api/views.py", "uses_drf"),
    entry!("apps/api/schema.py", "uses_graphql"),
    // Billing
    entry!("apps/billing/__init__.py"),
    entry!("apps/billing/apps.py"),
    entry!("apps/billing/models.py"),
    entry!("apps/billing/admin.py"),
    entry!("apps/billing/views.py"),
    entry!("apps/billing/urls.py"),
    entry!("apps/billing/migrations/__init__.py"),
    // Teams
    entry!("apps/teams/__init__.py"),
    entry!("apps/teams/apps.py"),
    entry!("apps/teams/models.py"),
    entry!("apps/teams/admin.py"),
    entry!("apps/teams/migrations/__init__.py"),
    // Server-rendered frontend
    entry!("templates/base.html", "has_frontend_templates"),
    entry!("templates/index.html", "has_frontend_templates"),
    // Next.js frontend
    entry!("frontend/package.json"),
    entry!("frontend/next.config.mjs"),
    entry!("frontend/tsconfig.json"),
    entry!("frontend/app/layout.tsx"),
    entry!("frontend/app/page.tsx"),
    entry!("frontend/lib/api.ts"),
    // Kubernetes
    entry!("deploy/k8s/README.md"),
    entry!("deploy/k8s/helm/Chart.yaml"),
    entry!("deploy/k8s/helm/values.yaml"),
    entry!("deploy/k8s/helm/templates/_helpers.tpl"),
    entry!("deploy/k8s/helm/templates/deployment.yaml"),
    entry!("deploy/k8s/helm/templates/service.yaml"),
    entry!("deploy/k8s/helm/templates/ingress.yaml"),
    entry!("deploy/k8s/helm/templates/worker-deployment.yaml", "uses_celery"),
    entry!("deploy/k8s/kustomize/base/kustomization.yaml"),
    entry!("deploy/k8s/kustomize/base/deployment.yaml"),
    entry!("deploy/k8s/kustomize/base/service.yaml"),
    entry!("deploy/k8s/kustomize/overlays/production/kustomization.yaml"),
    entry!("deploy/k8s/secrets.example.yaml", "use_sops"),
    // Render
    entry!("deploy/render/build.sh"),
    // Fly.io
    entry!("deploy/flyio/README.md"),
    entry!("deploy/flyio/release.sh"),
    // AWS ECS Fargate
    entry!("deploy/ecs/README.md"),
    entry!("deploy/ecs/task-definition.json"),
    // AWS EC2 + Ansible
    entry!("deploy/ansible/README.md"),
    entry!("deploy/ansible/ansible.cfg"),
    entry!("deploy/ansible/inventory/hosts.ini"),
    entry!("deploy/ansible/playbooks/deploy.yml"),
    entry!("deploy/ansible/templates/gunicorn.service.j2"),
    entry!("deploy/ansible/templates/nginx.conf.j2"),
    // Plain Docker host
    entry!("deploy/docker/README.md"),
];

fn is_executable(path: &str) -> bool {
    path == "manage.py" || path.ends_with(".sh")
}

fn condition(source: &str) -> Result<Condition, DomainError> {
    if source.is_empty() {
        Ok(Condition::Always)
    } else {
        Condition::parse(source)
    }
}

/// Build the built-in `django-project@1.0.0` template.
///
/// # Errors
///
/// Only fails if a table entry carries a malformed condition or a blueprint
/// file has unbalanced section markers; the tests below build it once.
pub fn django_project() -> Result<Template, DomainError> {
    let mut tree = TemplateTree::new();

    for (path, when) in DIRECTORIES {
        tree.push(TemplateNode::Directory(
            DirectorySpec::new(*path).when(condition(when)?),
        ));
    }

    for (path, when, source) in FILES {
        let mut spec = FileSpec::new(*path, classify(TemplateSource::Static(*source), None))
            .when(condition(when)?);
        if is_executable(path) {
            spec = spec.executable();
        }
        tree.push(TemplateNode::File(spec));
    }

    let id = TemplateId::parse(DEFAULT_TEMPLATE)?;
    let metadata = TemplateMetadata::new("Django project")
        .description(
            "Production-ready Django project: settings split per environment, \
             optional API, auth, Celery, Channels, billing and deployment targets.",
        )
        .version(id.version())
        .author("djforge")
        .tags(vec![
            "django".into(),
            "python".into(),
            "docker".into(),
            "deployment".into(),
        ]);

    Template::builder().id(id).metadata(metadata).tree(tree).build()
}

/// Load user templates using the search order in the module docs.
///
/// Returns an empty list when no directory holds a template; the built-in
/// blueprint is always available regardless.
#[instrument]
pub fn user_templates() -> Result<Vec<Template>, DomainError> {
    for candidate in candidate_paths() {
        if !candidate.is_dir() {
            debug!(path = %candidate.display(), "Templates path does not exist, skipping");
            continue;
        }

        let templates = FilesystemTemplateLoader::new(&candidate).load_all()?;
        if templates.is_empty() {
            debug!(path = %candidate.display(), "No templates in directory, trying next");
            continue;
        }

        info!(
            path = %candidate.display(),
            count = templates.len(),
            "Loaded user templates"
        );
        return Ok(templates);
    }

    debug!("No user templates found");
    Ok(Vec::new())
}

fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(3);

    if let Ok(dir) = std::env::var("DJFORGE_TEMPLATES_DIR") {
        paths.push(PathBuf::from(dir));
    }

    paths.push(PathBuf::from("templates"));

    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("templates")))
    {
        paths.push(dir);
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use djforge_core::domain::TemplateContent;
    use std::fs;
    use tempfile::TempDir;

    fn file_node<'a>(template: &'a Template, path: &str) -> &'a FileSpec {
        template
            .tree
            .nodes
            .iter()
            .find_map(|n| match n {
                TemplateNode::File(f) if f.path.as_str() == path => Some(f),
                _ => None,
            })
            .unwrap_or_else(|| panic!("no file node {path}"))
    }

    #[test]
    fn blueprint_builds_and_validates() {
        let template = django_project().unwrap();
        assert_eq!(template.id.to_string(), DEFAULT_TEMPLATE);
        assert_eq!(template.file_count(), FILES.len());
        template.validate().unwrap();
    }

    #[test]
    fn directories_precede_files() {
        let template = django_project().unwrap();
        let first_file = template
            .tree
            .nodes
            .iter()
            .position(|n| matches!(n, TemplateNode::File(_)))
            .unwrap();
        assert_eq!(first_file, DIRECTORIES.len());
    }

    #[test]
    fn scripts_are_executable() {
        let template = django_project().unwrap();
        assert!(file_node(&template, "manage.py").permissions.executable_flag());
        assert!(file_node(&template, "deploy/render/build.sh").permissions.executable_flag());
        assert!(!file_node(&template, "README.md").permissions.executable_flag());
    }

    #[test]
    fn settings_are_sectioned() {
        let template = django_project().unwrap();
        assert!(matches!(
            file_node(&template, "config/settings/base.py").content,
            TemplateContent::Sectioned(_)
        ));
        assert!(matches!(
            file_node(&template, "apps/core/__init__.py").content,
            TemplateContent::Literal(_)
        ));
    }

    #[test]
    fn loads_user_templates_from_env_dir() {
        let temp = TempDir::new().unwrap();
        let slot = temp.path().join("tiny");
        fs::create_dir_all(&slot).unwrap();
        fs::write(
            slot.join("template.toml"),
            "[template]\nid = \"tiny\"\nversion = \"0.1.0\"\n[metadata]\nname = \"Tiny\"\n",
        )
        .unwrap();
        fs::write(slot.join("README.md.tmpl"), "# {{PROJECT_NAME}}\n").unwrap();

        unsafe { std::env::set_var("DJFORGE_TEMPLATES_DIR", temp.path()) };
        let paths = candidate_paths();
        let templates = user_templates();
        unsafe { std::env::remove_var("DJFORGE_TEMPLATES_DIR") };

        assert_eq!(paths[0], temp.path());
        let templates = templates.unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].id.to_string(), "tiny@0.1.0");
    }
}
