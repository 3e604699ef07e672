//! Condition-aware renderer: `when` filtering, sections, then variable substitution.

use std::path::{Path, PathBuf};

use djforge_core::{
    application::ports::TemplateRenderer,
    domain::{
        AnswerSet, DomainValidator as validator, ProjectStructure, RenderContext, Template,
        TemplateContent, TemplateNode, parse_sections,
    },
    error::ForgeResult,
};
use tracing::{debug, instrument, trace};

/// Renders a [`Template`] for one answer set.
///
/// A node whose `when` is false is skipped, and so is everything below a
/// skipped directory node.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleRenderer;

impl SimpleRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateRenderer for SimpleRenderer {
    #[instrument(skip_all, fields(template = %template.id))]
    fn render(
        &self,
        template: &Template,
        answers: &AnswerSet,
        context: &RenderContext,
        output_root: &Path,
    ) -> ForgeResult<ProjectStructure> {
        validator::validate_template(template)?;

        let mut structure = ProjectStructure::new(output_root);
        let mut skipped_dirs: Vec<PathBuf> = Vec::new();
        let mut skipped = 0usize;

        for node in &template.tree.nodes {
            let source_path = node.path().as_path();
            let under_skipped = skipped_dirs.iter().any(|d| source_path.starts_with(d));

            if under_skipped || !node.when().evaluate(answers)? {
                trace!(path = %source_path.display(), "Skipping node");
                if let TemplateNode::Directory(_) = node {
                    skipped_dirs.push(source_path.to_path_buf());
                }
                skipped += 1;
                continue;
            }

            let label = node.path().as_str();
            let path = context.render(label, label)?;

            match node {
                TemplateNode::File(spec) => {
                    let content = render_content(&path, &spec.content, answers, context)?;
                    structure.add_file(path, content, spec.permissions);
                }
                TemplateNode::Directory(spec) => {
                    structure.add_directory(path, spec.permissions);
                }
            }
        }

        debug!(
            files = structure.file_count(),
            directories = structure.directory_count(),
            skipped,
            "Rendered template"
        );

        validator::validate_project_structure(&structure)?;
        Ok(structure)
    }
}

fn render_content(
    file: &str,
    content: &TemplateContent,
    answers: &AnswerSet,
    ctx: &RenderContext,
) -> ForgeResult<String> {
    match content {
        TemplateContent::Literal(source) => Ok(source.as_str().to_string()),
        TemplateContent::Parameterized(source) => Ok(ctx.render(file, source.as_str())?),
        TemplateContent::Sectioned(source) => {
            let selected = parse_sections(file, source.as_str())?.render(answers)?;
            Ok(ctx.render(file, &selected)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use djforge_core::domain::{
        Condition, DirectorySpec, DomainError, FileSpec, TemplateId, TemplateMetadata,
        TemplateSource,
    };
    use djforge_core::error::ForgeError;

    fn file(path: &str, content: TemplateContent) -> FileSpec {
        FileSpec::new(path, content)
    }

    fn cond(s: &str) -> Condition {
        Condition::parse(s).unwrap()
    }

    fn render(template: &Template, answers: &AnswerSet) -> ForgeResult<ProjectStructure> {
        let ctx = RenderContext::from_answers(answers, 2030);
        SimpleRenderer::new().render(template, answers, &ctx, Path::new("/out"))
    }

    fn template(nodes: Vec<TemplateNode>) -> Template {
        nodes
            .into_iter()
            .fold(
                Template::builder()
                    .id(TemplateId::new("t", "1.0.0"))
                    .metadata(TemplateMetadata::new("t")),
                |b, n| b.add_node(n),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn substitutes_paths_and_content() {
        let t = template(vec![TemplateNode::File(file(
            "{{PROJECT_SLUG}}/__init__.py",
            TemplateContent::Parameterized(TemplateSource::Static("# {{PROJECT_NAME}} ({{YEAR}})\n")),
        ))]);

        let s = render(&t, &AnswerSet::defaults("Blog Engine")).unwrap();
        let f = s.file("blog_engine/__init__.py").unwrap();
        assert_eq!(f.content, "# Blog Engine (2030)\n");
    }

    #[test]
    fn literal_content_is_untouched() {
        let t = template(vec![TemplateNode::File(file(
            "chart/templates/svc.yaml",
            TemplateContent::Literal(TemplateSource::Static("name: {{ .Release.Name }}-{{PROJECT_SLUG}}\n")),
        ))]);

        let s = render(&t, &AnswerSet::defaults("x")).unwrap();
        assert_eq!(
            s.file("chart/templates/svc.yaml").unwrap().content,
            "name: {{ .Release.Name }}-{{PROJECT_SLUG}}\n"
        );
    }

    #[test]
    fn when_false_skips_file() {
        let t = template(vec![
            TemplateNode::File(file(
                "README.md",
                TemplateContent::Literal(TemplateSource::Static("hi")),
            )),
            TemplateNode::File(
                file(
                    "config/celery.py",
                    TemplateContent::Literal(TemplateSource::Static("")),
                )
                .when(cond("uses_celery")),
            ),
        ]);

        let mut answers = AnswerSet::defaults("x");
        assert!(render(&t, &answers).unwrap().file("config/celery.py").is_none());

        answers.background_tasks = djforge_core::domain::BackgroundTasks::Celery;
        assert!(render(&t, &answers).unwrap().file("config/celery.py").is_some());
    }

    #[test]
    fn skipped_directory_hides_descendants() {
        let t = template(vec![
            TemplateNode::File(file(
                "README.md",
                TemplateContent::Literal(TemplateSource::Static("hi")),
            )),
            TemplateNode::Directory(DirectorySpec::new("deploy/render").when(cond("deploy_render"))),
            TemplateNode::File(
                file(
                    "deploy/render/build.sh",
                    TemplateContent::Literal(TemplateSource::Static("#!/bin/bash\n")),
                )
                .executable(),
            ),
        ]);

        let s = render(&t, &AnswerSet::defaults("x")).unwrap();
        assert_eq!(s.file_count(), 1);
        assert_eq!(s.directory_count(), 0);
    }

    #[test]
    fn sections_are_selected_before_substitution() {
        let t = template(vec![TemplateNode::File(file(
            "config/settings/base.py",
            TemplateContent::Sectioned(TemplateSource::Static(
                "APPS = [\n[% if uses_drf %]\n    \"rest_framework\",\n[% endif %]\n]\nNAME = \"{{PROJECT_SLUG}}\"\n",
            )),
        ))]);

        let mut answers = AnswerSet::defaults("Shop");
        let s = render(&t, &answers).unwrap();
        assert_eq!(
            s.file("config/settings/base.py").unwrap().content,
            "APPS = [\n    \"rest_framework\",\n]\nNAME = \"shop\"\n"
        );

        answers.api_style = djforge_core::domain::ApiStyle::None;
        let s = render(&t, &answers).unwrap();
        assert_eq!(
            s.file("config/settings/base.py").unwrap().content,
            "APPS = [\n]\nNAME = \"shop\"\n"
        );
    }

    #[test]
    fn unresolved_variable_names_file() {
        let t = template(vec![TemplateNode::File(file(
            "README.md",
            TemplateContent::Parameterized(TemplateSource::Static("{{NOT_A_VARIABLE}}")),
        ))]);

        let err = render(&t, &AnswerSet::defaults("x")).unwrap_err();
        assert!(matches!(
            err,
            ForgeError::Domain(DomainError::UnresolvedVariable { ref file, .. }) if file == "README.md"
        ));
    }

    #[test]
    fn empty_result_is_rejected() {
        let t = template(vec![TemplateNode::File(
            file("celery.py", TemplateContent::Literal(TemplateSource::Static("")))
                .when(cond("uses_celery")),
        )]);

        assert!(render(&t, &AnswerSet::defaults("x")).is_err());
    }
}
