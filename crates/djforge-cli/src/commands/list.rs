//! Implementation of the `djforge list` command.

use serde_json::json;

use djforge_core::application::{TemplateInfo, TemplateService};

use crate::{
    cli::{ListArgs, ListFormat},
    commands::template_store,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let service = TemplateService::new(Box::new(template_store(&config)?));
    let mut templates = service.infos()?;
    templates.sort_by(|a, b| a.id.cmp(&b.id));

    for line in render(&templates, args.format, &config.templates.default) {
        output.data(&line)?;
    }
    Ok(())
}

/// Lines to print for `templates` in `format`.
fn render(templates: &[TemplateInfo], format: ListFormat, default: &str) -> Vec<String> {
    match format {
        ListFormat::Table => {
            let width = templates.iter().map(|t| t.id.len()).max().unwrap_or(0).max(2);
            let mut lines = vec![format!("  {:<width$}  {:>5}  NAME", "ID", "FILES")];
            for t in templates {
                let marker = if t.id == default { "*" } else { " " };
                lines.push(format!(
                    "{marker} {:<width$}  {:>5}  {}",
                    t.id, t.files, t.name
                ));
                if !t.description.is_empty() {
                    lines.push(format!("  {:<width$}         {}", "", t.description));
                }
            }
            lines
        }
        ListFormat::List => templates.iter().map(|t| t.id.clone()).collect(),
        ListFormat::Json => {
            let rows: Vec<_> = templates
                .iter()
                .map(|t| {
                    json!({
                        "id": t.id,
                        "name": t.name,
                        "description": t.description,
                        "author": t.author,
                        "tags": t.tags,
                        "files": t.files,
                        "default": t.id == default,
                    })
                })
                .collect();
            vec![serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".into())]
        }
        ListFormat::Csv => {
            let mut lines = vec!["id,name,author,files,tags".to_string()];
            for t in templates {
                lines.push(format!(
                    "{},{},{},{},{}",
                    csv_field(&t.id),
                    csv_field(&t.name),
                    csv_field(&t.author),
                    t.files,
                    csv_field(&t.tags.join(";"))
                ));
            }
            lines
        }
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(id: &str, name: &str) -> TemplateInfo {
        TemplateInfo {
            id: id.into(),
            name: name.into(),
            description: "Batteries-included Django".into(),
            author: "djforge".into(),
            tags: vec!["django".into(), "python".into()],
            files: 42,
        }
    }

    #[test]
    fn table_marks_default() {
        let rows = [info("django-project@1.0.0", "Django project"), info("mini@0.1.0", "Mini")];
        let lines = render(&rows, ListFormat::Table, "django-project@1.0.0");
        assert!(lines[0].contains("ID"));
        assert!(lines[1].starts_with("* django-project@1.0.0"));
        assert!(lines.iter().any(|l| l.starts_with("  mini@0.1.0")));
    }

    #[test]
    fn list_prints_ids() {
        let lines = render(&[info("a@1", "A")], ListFormat::List, "");
        assert_eq!(lines, vec!["a@1"]);
    }

    #[test]
    fn json_is_an_array() {
        let lines = render(&[info("a@1", "A")], ListFormat::Json, "a@1");
        let parsed: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(parsed[0]["id"], "a@1");
        assert_eq!(parsed[0]["files"], 42);
        assert_eq!(parsed[0]["default"], true);
    }

    #[test]
    fn csv_quotes_when_needed() {
        let lines = render(&[info("a@1", "Django, batteries")], ListFormat::Csv, "");
        assert_eq!(lines[0], "id,name,author,files,tags");
        assert_eq!(lines[1], "a@1,\"Django, batteries\",djforge,42,django;python");
    }
}
