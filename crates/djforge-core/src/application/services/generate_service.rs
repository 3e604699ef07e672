//! Generate Service - main application orchestrator.
//!
//! This service coordinates the entire generation workflow:
//! 1. Validate the answer set
//! 2. Look up the template
//! 3. Render template with answers and context
//! 4. Write to filesystem, rolling back on failure

use std::path::{Path, PathBuf};

use chrono::Datelike;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{AnswersCodec, AnswersRecord, Filesystem, TemplateRenderer, TemplateStore},
    },
    domain::{
        AnswerSet, DomainValidator as validator, FsEntry, Permissions, ProjectStructure,
        RenderContext, TemplateId,
    },
    error::ForgeResult,
};

/// Name of the answers record written at the root of every generated project.
pub const ANSWERS_FILE: &str = ".djforge-answers.yml";

/// Knobs for [`GenerateService::generate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateOptions {
    /// Write into an existing destination, overwriting files it already has.
    pub force: bool,
}

/// Summary of a completed generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub root: PathBuf,
    pub template: TemplateId,
    pub files: usize,
    pub directories: usize,
    pub bytes: usize,
}

/// Main generation service.
///
/// Orchestrates template lookup, rendering, and the write-with-rollback step.
pub struct GenerateService {
    store: Box<dyn TemplateStore>,
    renderer: Box<dyn TemplateRenderer>,
    filesystem: Box<dyn Filesystem>,
    codec: Box<dyn AnswersCodec>,
}

impl GenerateService {
    /// Create a new generate service with the given adapters.
    pub fn new(
        store: Box<dyn TemplateStore>,
        renderer: Box<dyn TemplateRenderer>,
        filesystem: Box<dyn Filesystem>,
        codec: Box<dyn AnswersCodec>,
    ) -> Self {
        Self {
            store,
            renderer,
            filesystem,
            codec,
        }
    }

    /// Render a project without touching the filesystem.
    ///
    /// The returned structure includes the answers record.
    #[instrument(
        skip_all,
        fields(
            template = %template_id,
            project = %answers.project_slug,
            destination = %destination.display()
        )
    )]
    pub fn plan(
        &self,
        template_id: &TemplateId,
        answers: &AnswerSet,
        destination: &Path,
    ) -> ForgeResult<ProjectStructure> {
        // 1. Validate answers
        validator::validate_answers(answers)?;

        // 2. Look up template
        let template = self.store.get(template_id)?;
        info!(template_name = %template.metadata.name, "Template resolved");

        // 3. Render
        let context = Self::context(answers);
        let mut structure = self
            .renderer
            .render(&template, answers, &context, destination)?;

        // 4. Answers record
        let record = AnswersRecord {
            template: template_id.to_string(),
            generator_version: crate::VERSION.to_string(),
            answers: answers.clone(),
        };
        structure.add_file(
            ANSWERS_FILE,
            self.codec.encode(&record)?,
            Permissions::read_write(),
        );

        validator::validate_project_structure(&structure)?;
        debug!(
            files = structure.file_count(),
            directories = structure.directory_count(),
            "Template rendered"
        );
        Ok(structure)
    }

    /// Generate a project at `destination`.
    ///
    /// Fails with [`ApplicationError::ProjectExists`] when the destination
    /// exists and `options.force` is not set.
    pub fn generate(
        &self,
        template_id: &TemplateId,
        answers: &AnswerSet,
        destination: &Path,
        options: GenerateOptions,
    ) -> ForgeResult<GenerationReport> {
        info!(
            project = %answers.project_name,
            "Generating Django project"
        );

        let existed = self.filesystem.exists(destination);
        if existed && !options.force {
            return Err(ApplicationError::ProjectExists {
                path: destination.to_path_buf(),
            }
            .into());
        }

        let structure = self.plan(template_id, answers, destination)?;
        self.write_structure(&structure, existed)?;

        info!("Generation completed successfully");
        Ok(GenerationReport {
            root: structure.root().clone(),
            template: template_id.clone(),
            files: structure.file_count(),
            directories: structure.directory_count(),
            bytes: structure.total_bytes(),
        })
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn context(answers: &AnswerSet) -> RenderContext {
        let secret = format!(
            "{}{}",
            uuid::Uuid::new_v4().simple(),
            uuid::Uuid::new_v4().simple()
        );
        RenderContext::from_answers(answers, chrono::Local::now().year())
            .with_variable("SECRET_KEY", secret)
            .with_variable("GENERATOR_VERSION", crate::VERSION)
    }

    /// Write project structure to filesystem with rollback on failure.
    ///
    /// A destination that existed before is never removed.
    fn write_structure(&self, structure: &ProjectStructure, existed: bool) -> ForgeResult<()> {
        match self.write_all(structure) {
            Ok(()) => {
                info!(files = structure.file_count(), "Successfully wrote all files");
                Ok(())
            }
            Err(e) if existed => {
                warn!("Write failed inside an existing directory, leaving it in place");
                Err(e)
            }
            Err(e) => {
                warn!("Write failed, attempting rollback");
                self.rollback(structure.root());
                Err(e)
            }
        }
    }

    /// Write all entries in the structure.
    fn write_all(&self, structure: &ProjectStructure) -> ForgeResult<()> {
        let root = structure.root();
        self.filesystem.create_dir_all(root)?;

        for entry in structure.entries() {
            match entry {
                FsEntry::Directory(dir) => {
                    self.filesystem.create_dir_all(&root.join(&dir.path))?;
                }
                FsEntry::File(file) => {
                    let path = root.join(&file.path);

                    if let Some(parent) = path.parent() {
                        self.filesystem.create_dir_all(parent)?;
                    }

                    self.filesystem.write_file(&path, &file.content)?;

                    if file.permissions.executable_flag() {
                        self.filesystem.set_permissions(&path, true)?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Best-effort rollback on failure.
    fn rollback(&self, root: &Path) {
        if let Err(e) = self.filesystem.remove_dir_all(root) {
            warn!(
                error = %e,
                path = %root.display(),
                "Rollback failed"
            );
        } else {
            info!("Rollback successful");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        MockAnswersCodec, MockFilesystem, MockTemplateRenderer, MockTemplateStore,
    };
    use crate::domain::{
        FileSpec, Template, TemplateContent, TemplateMetadata, TemplateNode, TemplateSource,
    };
    use crate::error::ForgeError;

    fn template() -> Template {
        Template::builder()
            .id(TemplateId::new("django-project", "1.0.0"))
            .metadata(TemplateMetadata::new("django-project").description("Django"))
            .add_node(TemplateNode::File(FileSpec::new(
                "manage.py",
                TemplateContent::Literal(TemplateSource::Static("#!/usr/bin/env python\n")),
            )))
            .build()
            .unwrap()
    }

    fn store() -> MockTemplateStore {
        let mut store = MockTemplateStore::new();
        store.expect_get().returning(|_| Ok(template()));
        store
    }

    fn renderer() -> MockTemplateRenderer {
        let mut renderer = MockTemplateRenderer::new();
        renderer.expect_render().returning(|_, _, context, root| {
            let slug = context.get("PROJECT_SLUG").unwrap_or_default().to_string();
            Ok(ProjectStructure::new(root)
                .with_file(
                    "manage.py",
                    "#!/usr/bin/env python\n".into(),
                    Permissions::executable(),
                )
                .with_file(format!("{slug}/__init__.py"), String::new(), Permissions::default()))
        });
        renderer
    }

    fn codec() -> MockAnswersCodec {
        let mut codec = MockAnswersCodec::new();
        codec
            .expect_encode()
            .returning(|record| Ok(format!("_template: {}\n", record.template)));
        codec
    }

    fn id() -> TemplateId {
        TemplateId::new("django-project", "1.0.0")
    }

    fn fs_error() -> ForgeError {
        ApplicationError::FilesystemError {
            path: "/out".into(),
            reason: "disk full".into(),
        }
        .into()
    }

    // ========================================================================
    // Planning
    // ========================================================================

    #[test]
    fn plan_adds_answers_record() {
        let service = GenerateService::new(
            Box::new(store()),
            Box::new(renderer()),
            Box::new(MockFilesystem::new()),
            Box::new(codec()),
        );

        let structure = service
            .plan(&id(), &AnswerSet::defaults("Shop"), Path::new("/out/shop"))
            .unwrap();

        assert_eq!(structure.file_count(), 3);
        let record = structure.file(ANSWERS_FILE).unwrap();
        assert_eq!(record.content, "_template: django-project@1.0.0\n");
        assert!(structure.file("shop/__init__.py").is_some());
    }

    #[test]
    fn plan_rejects_invalid_answers_before_lookup() {
        let mut store = MockTemplateStore::new();
        store.expect_get().times(0);

        let service = GenerateService::new(
            Box::new(store),
            Box::new(MockTemplateRenderer::new()),
            Box::new(MockFilesystem::new()),
            Box::new(MockAnswersCodec::new()),
        );

        let mut answers = AnswerSet::defaults("Shop");
        answers.use_2fa = true;
        answers.auth_backend = crate::domain::AuthBackend::Jwt;

        let err = service
            .plan(&id(), &answers, Path::new("/out"))
            .unwrap_err();
        assert!(matches!(err, ForgeError::Domain(_)));
    }

    #[test]
    fn plan_propagates_missing_template() {
        let mut store = MockTemplateStore::new();
        store.expect_get().returning(|id| {
            Err(ApplicationError::TemplateNotFound { id: id.to_string() }.into())
        });

        let service = GenerateService::new(
            Box::new(store),
            Box::new(MockTemplateRenderer::new()),
            Box::new(MockFilesystem::new()),
            Box::new(MockAnswersCodec::new()),
        );

        let err = service
            .plan(&id(), &AnswerSet::defaults("Shop"), Path::new("/out"))
            .unwrap_err();
        assert_eq!(err.category(), crate::error::ErrorCategory::NotFound);
    }

    // ========================================================================
    // Writing
    // ========================================================================

    #[test]
    fn generate_writes_every_file() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().times(3).returning(|_, _| Ok(()));
        fs.expect_set_permissions()
            .withf(|path, executable| path.ends_with("manage.py") && *executable)
            .times(1)
            .returning(|_, _| Ok(()));
        fs.expect_remove_dir_all().times(0);

        let service = GenerateService::new(
            Box::new(store()),
            Box::new(renderer()),
            Box::new(fs),
            Box::new(codec()),
        );

        let report = service
            .generate(
                &id(),
                &AnswerSet::defaults("Shop"),
                Path::new("/out/shop"),
                GenerateOptions::default(),
            )
            .unwrap();

        assert_eq!(report.files, 3);
        assert_eq!(report.root, PathBuf::from("/out/shop"));
    }

    #[test]
    fn existing_destination_requires_force() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(true);
        fs.expect_write_file().times(0);

        let service = GenerateService::new(
            Box::new(store()),
            Box::new(renderer()),
            Box::new(fs),
            Box::new(codec()),
        );

        let err = service
            .generate(
                &id(),
                &AnswerSet::defaults("Shop"),
                Path::new("/out/shop"),
                GenerateOptions::default(),
            )
            .unwrap_err();

        assert!(matches!(
            err,
            ForgeError::Application(ApplicationError::ProjectExists { .. })
        ));
    }

    #[test]
    fn failed_write_rolls_back_new_destination() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().returning(|_, _| Err(fs_error()));
        fs.expect_remove_dir_all()
            .withf(|path| path == Path::new("/out/shop"))
            .times(1)
            .returning(|_| Ok(()));

        let service = GenerateService::new(
            Box::new(store()),
            Box::new(renderer()),
            Box::new(fs),
            Box::new(codec()),
        );

        let result = service.generate(
            &id(),
            &AnswerSet::defaults("Shop"),
            Path::new("/out/shop"),
            GenerateOptions::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn failed_write_keeps_existing_destination() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(true);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().returning(|_, _| Err(fs_error()));
        fs.expect_remove_dir_all().times(0);

        let service = GenerateService::new(
            Box::new(store()),
            Box::new(renderer()),
            Box::new(fs),
            Box::new(codec()),
        );

        let result = service.generate(
            &id(),
            &AnswerSet::defaults("Shop"),
            Path::new("/out/shop"),
            GenerateOptions { force: true },
        );
        assert!(result.is_err());
    }
}
