//! Conditional sections inside a file.
//!
//! A file picks its content variants with marker lines:
//!
//! ```text
//! INSTALLED_APPS = [
//!     "django.contrib.admin",
//! [% if uses_drf %]
//!     "rest_framework",
//! [% endif %]
//! ]
//! ```
//!
//! A marker must be alone on its line (surrounding whitespace is ignored)
//! and the whole line, newline included, is dropped from the output.
//! Supported markers are `if EXPR`, `elif EXPR`, `else` and `endif`; blocks
//! nest.
//!
//! The markers are translated into a Tera template whose text runs are
//! context values, so the file body never goes through Tera's parser:
//! Django's `{% block %}` tags, Helm's `{{ .Values }}` and GitHub's `${{ }}`
//! need no escaping. Structure is checked here, line by line, so errors
//! name the file and line instead of a position in the generated template.

use std::fmt;

use tera::Tera;

use crate::domain::{
    condition::{Condition, engine, scope, tera_reason},
    entities::answers::AnswerLookup,
    error::DomainError,
};

const OPEN: &str = "[%";
const CLOSE: &str = "%]";

/// Context key holding the text runs.
const TEXT: &str = "__text";

/// A sectioned file compiled to a Tera template.
#[derive(Clone)]
pub struct Sections {
    file: String,
    tera: Tera,
    chunks: Vec<String>,
    names: Vec<String>,
    conditions: Vec<Condition>,
}

impl fmt::Debug for Sections {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sections")
            .field("file", &self.file)
            .field("chunks", &self.chunks.len())
            .field("conditions", &self.conditions)
            .finish()
    }
}

impl Sections {
    /// Select the branches that hold for `answers` and concatenate the text.
    pub fn render<L: AnswerLookup + ?Sized>(&self, answers: &L) -> Result<String, DomainError> {
        let mut context = scope(&self.names, answers);
        context.insert(TEXT, &self.chunks);
        self.tera.render(&self.file, &context).map_err(|e| {
            DomainError::InvalidTemplate(format!("{}: {}", self.file, tera_reason(&e)))
        })
    }

    /// Conditions used anywhere in the file, in order of appearance.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }
}

/// Quick check used by loaders to auto-detect sectioned content.
pub fn has_section_markers(source: &str) -> bool {
    source.lines().any(|line| marker_body(line).is_some())
}

/// Parse `source` and compile it. `file` labels errors and names the template.
pub fn parse_sections(file: &str, source: &str) -> Result<Sections, DomainError> {
    let mut body = String::new();
    let mut chunks: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut conditions: Vec<Condition> = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();

    for (index, line) in source.split_inclusive('\n').enumerate() {
        let line_no = index + 1;
        let err = |reason: String| DomainError::InvalidSection {
            file: file.to_string(),
            line: line_no,
            reason,
        };

        let Some(marker) = marker_body(line) else {
            text.push_str(line);
            continue;
        };

        if !text.is_empty() {
            body.push_str(&format!("{{{{ {TEXT}[{}] }}}}", chunks.len()));
            chunks.push(std::mem::take(&mut text));
        }

        let (keyword, rest) = marker
            .split_once(char::is_whitespace)
            .unwrap_or((marker, ""));
        let parse_condition = |expr: &str| {
            if expr.trim().is_empty() {
                return Err(err(format!("'{keyword}' needs a condition")));
            }
            Condition::parse(expr).map_err(|e| err(e.to_string()))
        };

        match keyword {
            "if" => {
                let condition = parse_condition(rest)?;
                body.push_str(&format!("{{% if {} %}}", condition.tera_expr()));
                conditions.push(condition);
                stack.push(Frame {
                    opened_at: line_no,
                    in_else: false,
                });
            }
            "elif" => {
                let condition = parse_condition(rest)?;
                let frame = stack
                    .last()
                    .ok_or_else(|| err("'elif' without a matching 'if'".into()))?;
                if frame.in_else {
                    return Err(err("'elif' after 'else'".into()));
                }
                body.push_str(&format!("{{% elif {} %}}", condition.tera_expr()));
                conditions.push(condition);
            }
            "else" => {
                if !rest.trim().is_empty() {
                    return Err(err("'else' takes no condition; use 'elif'".into()));
                }
                let frame = stack
                    .last_mut()
                    .ok_or_else(|| err("'else' without a matching 'if'".into()))?;
                if frame.in_else {
                    return Err(err("duplicate 'else'".into()));
                }
                frame.in_else = true;
                body.push_str("{% else %}");
            }
            "endif" => {
                stack
                    .pop()
                    .ok_or_else(|| err("'endif' without a matching 'if'".into()))?;
                body.push_str("{% endif %}");
            }
            other => return Err(err(format!("unknown section marker '{other}'"))),
        }
    }

    if let Some(frame) = stack.last() {
        return Err(DomainError::InvalidSection {
            file: file.to_string(),
            line: frame.opened_at,
            reason: "'if' is never closed with 'endif'".into(),
        });
    }

    if !text.is_empty() {
        body.push_str(&format!("{{{{ {TEXT}[{}] }}}}", chunks.len()));
        chunks.push(text);
    }

    let mut names: Vec<String> = Vec::new();
    for name in conditions.iter().flat_map(Condition::identifiers) {
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }

    let mut tera = engine();
    tera.add_raw_template(file, &body)
        .map_err(|e| DomainError::InvalidTemplate(format!("{file}: {}", tera_reason(&e))))?;

    Ok(Sections {
        file: file.to_string(),
        tera,
        chunks,
        names,
        conditions,
    })
}

struct Frame {
    opened_at: usize,
    in_else: bool,
}

fn marker_body(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    trimmed
        .strip_prefix(OPEN)?
        .strip_suffix(CLOSE)
        .map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::answers::{AnswerMap, AnswerValue};

    fn render(source: &str, answers: &AnswerMap) -> String {
        parse_sections("test.txt", source)
            .unwrap()
            .render(answers)
            .unwrap()
    }

    #[test]
    fn plain_text_passes_through() {
        let source = "{% block content %}\n{{ user.name }}\n${{ secrets.TOKEN }}\n{% endraw %}\n";
        assert_eq!(render(source, &AnswerMap::new()), source);
        assert!(!has_section_markers(source));
    }

    #[test]
    fn template_tags_inside_branches_are_not_interpreted() {
        let source = "\
[% if use_i18n %]
{% load i18n %}{% trans \"Hello\" %} {{ request.user }}
[% endif %]
";
        let on = AnswerMap::new().with("use_i18n", true);
        assert_eq!(
            render(source, &on),
            "{% load i18n %}{% trans \"Hello\" %} {{ request.user }}\n"
        );
    }

    #[test]
    fn selects_first_matching_branch() {
        let source = "\
start
[% if cache == \"redis\" %]
redis
[% elif cache == \"memcached\" %]
memcached
[% else %]
dummy
[% endif %]
end
";
        let redis = AnswerMap::new().with("cache", "redis");
        let none = AnswerMap::new().with("cache", "none");
        assert_eq!(render(source, &redis), "start\nredis\nend\n");
        assert_eq!(render(source, &none), "start\ndummy\nend\n");
    }

    #[test]
    fn nested_blocks() {
        let source = "\
[% if use_stripe %]
billing
  [% if stripe_mode == \"advanced\" %]
  djstripe
  [% endif %]
[% endif %]
";
        let basic = AnswerMap::new()
            .with("use_stripe", true)
            .with("stripe_mode", "basic");
        let advanced = AnswerMap::new()
            .with("use_stripe", true)
            .with("stripe_mode", "advanced");
        assert_eq!(render(source, &basic), "billing\n");
        assert_eq!(render(source, &advanced), "billing\n  djstripe\n");
        assert_eq!(render(source, &AnswerMap::new()), "");
    }

    #[test]
    fn last_line_without_newline() {
        let answers = AnswerMap::new().with("a", AnswerValue::Bool(true));
        assert_eq!(render("[% if a %]\nyes\n[% endif %]", &answers), "yes\n");
        assert_eq!(render("[% if a %]\nyes\n[% endif %]\ntail", &answers), "yes\ntail");
    }

    #[test]
    fn structural_errors_name_the_line() {
        let cases = [
            ("[% endif %]\n", 1),
            ("x\n[% else %]\n", 2),
            ("[% if a %]\n[% else %]\n[% elif b %]\n[% endif %]\n", 3),
            ("[% if a %]\n[% else %]\n[% else %]\n[% endif %]\n", 3),
            ("[% if %]\n", 1),
            ("[% for x in y %]\n", 1),
            ("a\n[% if a %]\nb\n", 2),
        ];
        for (source, expected_line) in cases {
            match parse_sections("f.py", source) {
                Err(DomainError::InvalidSection { file, line, .. }) => {
                    assert_eq!(file, "f.py");
                    assert_eq!(line, expected_line, "source: {source:?}");
                }
                other => panic!("expected section error for {source:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn condition_errors_are_section_errors() {
        let err = parse_sections("f.py", "x\n[% if a == %]\n[% endif %]\n").unwrap_err();
        assert!(matches!(err, DomainError::InvalidSection { line: 2, .. }));
    }

    #[test]
    fn collects_conditions_in_order() {
        let sections = parse_sections(
            "f",
            "[% if a %]\n[% if b %]\n[% endif %]\n[% else %]\n[% if c %]\n[% endif %]\n[% endif %]\n",
        )
        .unwrap();
        let names: Vec<String> = sections
            .conditions()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
