//! Integration tests for djforge-core.
//!
//! Uses minimal hand-written port implementations; the adapters crate has
//! its own end-to-end tests against the real blueprint.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use djforge_core::{
    domain::{
        FileSpec, Permissions, TemplateContent, TemplateNode, TemplateSource, parse_sections,
    },
    prelude::*,
};

#[derive(Clone, Default)]
struct FakeFs {
    files: Arc<Mutex<BTreeMap<PathBuf, String>>>,
}

impl Filesystem for FakeFs {
    fn create_dir_all(&self, _path: &Path) -> ForgeResult<()> {
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> ForgeResult<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn set_permissions(&self, _path: &Path, _executable: bool) -> ForgeResult<()> {
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().keys().any(|p| p.starts_with(path))
    }

    fn remove_dir_all(&self, path: &Path) -> ForgeResult<()> {
        self.files.lock().unwrap().retain(|p, _| !p.starts_with(path));
        Ok(())
    }
}

struct OneTemplate(Template);

impl TemplateStore for OneTemplate {
    fn get(&self, _id: &TemplateId) -> ForgeResult<Template> {
        Ok(self.0.clone())
    }
    fn list(&self) -> ForgeResult<Vec<Template>> {
        Ok(vec![self.0.clone()])
    }
    fn insert(&self, _template: Template) -> ForgeResult<()> {
        Ok(())
    }
    fn remove(&self, _id: &TemplateId) -> ForgeResult<()> {
        Ok(())
    }
}

/// Evaluates `when` conditions and sections, then substitutes variables.
struct SectionRenderer;

impl TemplateRenderer for SectionRenderer {
    fn render(
        &self,
        template: &Template,
        answers: &AnswerSet,
        context: &RenderContext,
        output_root: &Path,
    ) -> ForgeResult<ProjectStructure> {
        let mut structure = ProjectStructure::new(output_root);
        for node in &template.tree.nodes {
            if !node.when().evaluate(answers)? {
                continue;
            }
            if let TemplateNode::File(file) = node {
                let path = file.path.as_str();
                let selected = parse_sections(path, file.content.source().as_str())?.render(answers)?;
                let body = context.render(path, &selected)?;
                structure.add_file(path, body, Permissions::read_write());
            }
        }
        Ok(structure)
    }
}

struct PlainCodec;

impl AnswersCodec for PlainCodec {
    fn decode(&self, _source: &str, _format: AnswersFormat) -> ForgeResult<AnswerMap> {
        Ok(AnswerMap::new())
    }
    fn encode(&self, record: &AnswersRecord) -> ForgeResult<String> {
        Ok(format!("_template: {}\n", record.template))
    }
}

fn template() -> Template {
    Template::builder()
        .id(TemplateId::new("mini", "1.0.0"))
        .metadata(TemplateMetadata::new("mini"))
        .add_node(TemplateNode::File(FileSpec::new(
            "README.md",
            TemplateContent::Sectioned(TemplateSource::Static(
                "# {{PROJECT_NAME}}\n[% if uses_celery %]\nRuns Celery.\n[% endif %]\n",
            )),
        )))
        .add_node(TemplateNode::File(
            FileSpec::new(
                "config/celery.py",
                TemplateContent::Parameterized(TemplateSource::Static(
                    "app = Celery(\"{{PROJECT_SLUG}}\")\n",
                )),
            )
            .when(Condition::parse("uses_celery").unwrap()),
        ))
        .build()
        .unwrap()
}

fn service(fs: FakeFs) -> GenerateService {
    GenerateService::new(
        Box::new(OneTemplate(template())),
        Box::new(SectionRenderer),
        Box::new(fs),
        Box::new(PlainCodec),
    )
}

#[test]
fn resolve_then_generate() {
    let answers = AnswerService::new()
        .resolve(
            AnswerMap::new()
                .with("project_name", "Task Board")
                .with("background_tasks", "celery"),
        )
        .unwrap();

    let fs = FakeFs::default();
    let report = service(fs.clone())
        .generate(
            &TemplateId::new("mini", "1.0.0"),
            &answers,
            Path::new("/out/task_board"),
            GenerateOptions::default(),
        )
        .unwrap();

    assert_eq!(report.files, 3);

    let files = fs.files.lock().unwrap();
    let readme = &files[Path::new("/out/task_board/README.md")];
    assert_eq!(readme, "# Task Board\nRuns Celery.\n");
    assert_eq!(
        files[Path::new("/out/task_board/config/celery.py")],
        "app = Celery(\"task_board\")\n"
    );
    assert!(files.contains_key(Path::new("/out/task_board").join(ANSWERS_FILE).as_path()));
}

#[test]
fn conditional_file_is_skipped() {
    let answers = AnswerService::new()
        .resolve(AnswerMap::new().with("project_name", "Task Board"))
        .unwrap();

    let structure = service(FakeFs::default())
        .plan(
            &TemplateId::new("mini", "1.0.0"),
            &answers,
            Path::new("/out/task_board"),
        )
        .unwrap();

    assert!(structure.file("config/celery.py").is_none());
    assert_eq!(
        structure.file("README.md").unwrap().content,
        "# Task Board\n"
    );
}

#[test]
fn second_generation_needs_force() {
    let answers = AnswerSet::defaults("Task Board");
    let fs = FakeFs::default();
    let service = service(fs.clone());
    let id = TemplateId::new("mini", "1.0.0");
    let dest = Path::new("/out/task_board");

    service
        .generate(&id, &answers, dest, GenerateOptions::default())
        .unwrap();
    let err = service
        .generate(&id, &answers, dest, GenerateOptions::default())
        .unwrap_err();
    assert!(err.to_string().contains("already exists"));

    service
        .generate(&id, &answers, dest, GenerateOptions { force: true })
        .unwrap();
}
