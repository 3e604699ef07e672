//! Implementation of the `djforge questions` command.

use owo_colors::OwoColorize;
use serde_json::{Value, json};

use djforge_core::domain::{QuestionDef, QuestionDefault, questions};

use crate::{
    cli::{QuestionsArgs, QuestionsFormat},
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: QuestionsArgs, output: OutputManager) -> CliResult<()> {
    match args.format {
        QuestionsFormat::Table => {
            for q in questions() {
                let key = if output.supports_color() {
                    q.key.bold().to_string()
                } else {
                    q.key.to_owned()
                };
                output.print(&format!("{key} ({})", q.kind.as_str()))?;
                for line in describe(q) {
                    output.detail(&format!("    {line}"))?;
                }
            }
        }
        QuestionsFormat::Json => {
            let rows: Vec<Value> = questions().iter().map(to_json).collect();
            output.data(&serde_json::to_string_pretty(&rows).map_err(std::io::Error::from)?)?;
        }
    }
    Ok(())
}

fn default_text(default: QuestionDefault) -> String {
    match default {
        QuestionDefault::Required => "(required)".into(),
        QuestionDefault::Text(s) => s.into(),
        QuestionDefault::Bool(b) => if b { "yes" } else { "no" }.into(),
        QuestionDefault::List(items) if items.is_empty() => "(none)".into(),
        QuestionDefault::List(items) => items.join(","),
        QuestionDefault::SnakeCaseOf(source) => format!("snake_case of {source}"),
    }
}

fn describe(q: &QuestionDef) -> Vec<String> {
    let mut lines = vec![q.prompt.to_string()];
    if !q.choices.is_empty() {
        lines.push(format!("choices: {}", q.choices.join(", ")));
    }
    lines.push(format!("default: {}", default_text(q.default)));
    if let Some(when) = q.when {
        lines.push(format!("asked when: {when}"));
    }
    lines
}

fn to_json(q: &QuestionDef) -> Value {
    let default = match q.default {
        QuestionDefault::Required | QuestionDefault::SnakeCaseOf(_) => Value::Null,
        QuestionDefault::Text(s) => json!(s),
        QuestionDefault::Bool(b) => json!(b),
        QuestionDefault::List(items) => json!(items),
    };
    json!({
        "key": q.key,
        "prompt": q.prompt,
        "help": q.help,
        "kind": q.kind.as_str(),
        "choices": q.choices,
        "default": default,
        "when": q.when,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use djforge_core::domain::find_question;

    #[test]
    fn describes_choices_and_conditions() {
        let stripe_mode = find_question("stripe_mode").unwrap();
        let lines = describe(stripe_mode);
        assert!(lines.iter().any(|l| l.starts_with("choices: ") && l.contains("advanced")));
        assert!(lines.iter().any(|l| l == "default: basic"));
        assert!(lines.iter().any(|l| l.starts_with("asked when: ")));
    }

    #[test]
    fn default_texts() {
        assert_eq!(default_text(QuestionDefault::Required), "(required)");
        assert_eq!(default_text(QuestionDefault::Bool(false)), "no");
        assert_eq!(default_text(QuestionDefault::List(&[])), "(none)");
        assert_eq!(
            default_text(QuestionDefault::List(&["render", "docker"])),
            "render,docker"
        );
    }

    #[test]
    fn json_rows_cover_every_question() {
        let rows: Vec<Value> = questions().iter().map(to_json).collect();
        assert_eq!(rows.len(), questions().len());
        assert_eq!(rows[0]["key"], "project_name");
        assert!(rows[0]["default"].is_null());

        let targets = rows
            .iter()
            .find(|r| r["key"] == "deployment_targets")
            .unwrap();
        assert_eq!(targets["kind"], "multi-choice");
        assert_eq!(targets["default"], json!(["kubernetes"]));
    }
}
