//! Implementation of the `djforge new` command.
//!
//! Responsibility: gather answers from the answers file, `--set` flags,
//! config defaults and prompts, then hand them to the generate service and
//! display results. No generation logic lives here.

use std::{
    io::IsTerminal,
    path::{Path, PathBuf},
};

use serde_json::json;
use tracing::{debug, info, instrument};

use djforge_adapters::{AnswersFileCodec, LocalFilesystem, SimpleRenderer};
use djforge_core::{
    application::{AnswerService, GenerateOptions, GenerateService, GenerationReport},
    domain::{AnswerMap, AnswerSet, DependencyManager, ProjectStructure, TemplateId},
    error::ForgeError,
};

use crate::{
    cli::{NewArgs, OutputFormat, global::GlobalArgs},
    commands::template_store,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Execute the `djforge new` command.
///
/// 1. Validate the destination
/// 2. Collect answers (file, then `--set`) and resolve them, prompting for
///    the rest unless `--defaults` or stdin is not a terminal
/// 3. Early-exit with a plan if `--dry-run`
/// 4. Confirm with the user unless `--yes`, `--quiet` or non-interactive
/// 5. Generate and print next steps
#[instrument(skip_all, fields(destination = %args.destination.display()))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    // 1. Destination
    let destination = args.destination.clone();
    check_destination(&destination, args.force || args.dry_run)?;

    let template_id = TemplateId::parse(
        args.template
            .as_deref()
            .unwrap_or(config.templates.default.as_str()),
    )
    .map_err(ForgeError::from)?;

    // 2. Answers
    let provided = collect_answers(&args)?;
    let tty = std::io::stdin().is_terminal();
    let interactive = tty && !args.defaults;
    debug!(provided = provided.len(), interactive, "Resolving answers");

    let answers = answer_service(default_answers(&config, &destination), interactive)
        .resolve(provided)
        .with_cli_context(|| "resolving answers")?;

    let store = template_store(&config)?;
    let generator = GenerateService::new(
        Box::new(store),
        Box::new(SimpleRenderer::new()),
        Box::new(LocalFilesystem::new()),
        Box::new(AnswersFileCodec::new()),
    );

    // 3. Dry run: describe but do not write.
    if args.dry_run {
        let plan = generator.plan(&template_id, &answers, &destination)?;
        return show_plan(&plan, &answers, &output);
    }

    // 4. Confirm
    if tty && !args.yes && !output.is_quiet() && output.format() != OutputFormat::Json {
        show_summary(&answers, &template_id, &destination, &output)?;
        if !confirm()? {
            return Err(CliError::Cancelled);
        }
    }

    // 5. Generate
    info!(template = %template_id, project = %answers.project_slug, "Generation started");
    let spinner = output.spinner(&format!("Generating {}...", answers.project_name));
    let result = generator.generate(
        &template_id,
        &answers,
        &destination,
        GenerateOptions { force: args.force },
    );
    spinner.finish_and_clear();
    let report = result?;

    show_report(&report, &answers, &global, &output)
}

// ── Answers ───────────────────────────────────────────────────────────────────

/// Answers from `--answers-file`, overridden by `--set`.
fn collect_answers(args: &NewArgs) -> CliResult<AnswerMap> {
    let mut answers = match &args.answers_file {
        Some(path) => AnswersFileCodec::new().read_file(path)?,
        None => AnswerMap::new(),
    };

    for raw in &args.set {
        let (key, value) = parse_assignment(raw)?;
        answers.insert(key, value);
    }
    Ok(answers)
}

/// Split `key=value`.  The value may be empty or contain `=`.
fn parse_assignment(raw: &str) -> CliResult<(&str, &str)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value.trim())),
        _ => Err(CliError::InvalidAssignment { raw: raw.into() }),
    }
}

/// Config defaults, plus the destination's directory name as project name.
fn default_answers(config: &AppConfig, destination: &Path) -> AnswerMap {
    let mut defaults = config.defaults.to_answers();
    let name = std::path::absolute(destination)
        .ok()
        .and_then(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_owned));
    if let Some(name) = name {
        defaults.insert("project_name", name);
    }
    defaults
}

fn answer_service(defaults: AnswerMap, interactive: bool) -> AnswerService {
    let service = AnswerService::new().with_defaults(defaults);
    if interactive {
        return with_prompter(service);
    }
    service
}

#[cfg(feature = "interactive")]
fn with_prompter(service: AnswerService) -> AnswerService {
    service.with_prompter(Box::new(crate::prompt::TerminalPrompter::new()))
}

#[cfg(not(feature = "interactive"))]
fn with_prompter(service: AnswerService) -> AnswerService {
    tracing::warn!("Built without the `interactive` feature; unanswered questions take defaults");
    service
}

// ── Destination ───────────────────────────────────────────────────────────────

fn check_destination(destination: &Path, allow_existing: bool) -> CliResult<()> {
    if destination.as_os_str().is_empty() {
        return Err(CliError::InvalidDestination {
            path: destination.to_path_buf(),
            reason: "path is empty".into(),
        });
    }
    if destination.is_file() {
        return Err(CliError::InvalidDestination {
            path: destination.to_path_buf(),
            reason: "a file with this name exists".into(),
        });
    }
    if destination.exists() && !allow_existing {
        return Err(CliError::ProjectExists {
            path: destination.to_path_buf(),
        });
    }
    Ok(())
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn show_summary(
    answers: &AnswerSet,
    template: &TemplateId,
    destination: &Path,
    out: &OutputManager,
) -> CliResult<()> {
    let targets = answers
        .deployment_targets
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    out.header("Configuration")?;
    out.print(&format!("  Project:      {} ({})", answers.project_name, answers.project_slug))?;
    out.print(&format!("  Template:     {template}"))?;
    out.print(&format!("  Python:       {}", answers.python_version))?;
    out.print(&format!("  API:          {}", answers.api_style))?;
    out.print(&format!("  Frontend:     {}", answers.frontend))?;
    out.print(&format!("  Tasks:        {}", answers.background_tasks))?;
    out.print(&format!(
        "  Deployment:   {}",
        if targets.is_empty() { "none" } else { &targets }
    ))?;
    out.print(&format!("  Location:     {}", destination.display()))?;
    out.print("")?;
    Ok(())
}

fn show_plan(plan: &ProjectStructure, answers: &AnswerSet, out: &OutputManager) -> CliResult<()> {
    let mut files: Vec<PathBuf> = plan.files().map(|f| f.path.clone()).collect();
    files.sort();

    if out.format() == OutputFormat::Json {
        let payload = json!({
            "root": plan.root(),
            "project": answers.project_slug,
            "files": files,
            "directories": plan.directory_count(),
            "bytes": plan.total_bytes(),
        });
        out.data(&serde_json::to_string_pretty(&payload).map_err(std::io::Error::from)?)?;
        return Ok(());
    }

    out.info(&format!(
        "Dry run: would create '{}' at {}",
        answers.project_name,
        plan.root().display()
    ))?;
    for file in &files {
        out.detail(&format!("  {}", file.display()))?;
    }
    out.info(&format!(
        "{} files, {} directories, {} bytes",
        plan.file_count(),
        plan.directory_count(),
        plan.total_bytes()
    ))?;
    Ok(())
}

fn show_report(
    report: &GenerationReport,
    answers: &AnswerSet,
    global: &GlobalArgs,
    out: &OutputManager,
) -> CliResult<()> {
    info!(files = report.files, bytes = report.bytes, "Generation completed");

    if out.format() == OutputFormat::Json {
        let payload = json!({
            "root": report.root,
            "template": report.template.to_string(),
            "project": answers.project_slug,
            "files": report.files,
            "directories": report.directories,
            "bytes": report.bytes,
        });
        out.data(&serde_json::to_string_pretty(&payload).map_err(std::io::Error::from)?)?;
        return Ok(());
    }

    out.success(&format!(
        "Project '{}' created at {} ({} files)",
        answers.project_name,
        report.root.display(),
        report.files
    ))?;

    if !global.quiet {
        out.print("")?;
        out.print("Next steps:")?;
        out.print(&format!("  cd {}", report.root.display()))?;
        out.print(&format!("  {}", install_command(answers.dependency_manager)))?;
        out.print("  cp .env.example .env")?;
        out.print("  python manage.py migrate")?;
        out.print("  python manage.py runserver")?;
    }

    Ok(())
}

fn install_command(manager: DependencyManager) -> &'static str {
    match manager {
        DependencyManager::Uv => "uv sync",
        DependencyManager::Poetry => "poetry install",
    }
}

fn confirm() -> CliResult<bool> {
    use std::io::{self, Write};

    print!("Continue? [Y/n] ");
    io::stdout()
        .flush()
        .with_cli_context(|| "failed to flush stdout")?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .with_cli_context(|| "failed to read confirmation input")?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input.is_empty() || input == "y" || input == "yes")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
