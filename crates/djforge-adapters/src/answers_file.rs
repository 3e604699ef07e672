//! Answers files: YAML, JSON or TOML in, YAML record out.
//!
//! All three formats are read through `serde_json::Value` so scalars are
//! converted the same way whatever the source: strings and numbers become
//! text (`python_version: 3.12` is the answer `"3.12"`), booleans stay
//! booleans, sequences of scalars become lists. Nulls are treated as
//! unanswered and keys beginning with `_` are bookkeeping, not answers.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, instrument};

use djforge_core::{
    application::{
        ApplicationError,
        ports::{AnswersCodec, AnswersFormat, AnswersRecord},
    },
    domain::{AnswerMap, AnswerValue},
    error::ForgeResult,
};

const RECORD_HEADER: &str = "# Answers used to generate this project.\n\
# Regenerate with: djforge new <dest> --answers-file .djforge-answers.yml\n";

#[derive(Debug, Clone, Copy, Default)]
pub struct AnswersFileCodec;

impl AnswersFileCodec {
    pub fn new() -> Self {
        Self
    }

    /// Read and decode an answers file, picking the format from its extension.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn read_file(&self, path: &Path) -> ForgeResult<AnswerMap> {
        let source = std::fs::read_to_string(path).map_err(|e| ApplicationError::AnswersFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let answers = decode(&source, AnswersFormat::from_path(path)).map_err(|reason| {
            ApplicationError::AnswersFile {
                path: path.to_path_buf(),
                reason,
            }
        })?;
        debug!(answers = answers.len(), "Read answers file");
        Ok(answers)
    }
}

impl AnswersCodec for AnswersFileCodec {
    fn decode(&self, source: &str, format: AnswersFormat) -> ForgeResult<AnswerMap> {
        decode(source, format).map_err(|reason| {
            ApplicationError::AnswersFile {
                path: PathBuf::from("<input>"),
                reason,
            }
            .into()
        })
    }

    fn encode(&self, record: &AnswersRecord) -> ForgeResult<String> {
        let body = serde_yaml::to_string(record).map_err(|e| ApplicationError::AnswersFile {
            path: PathBuf::from(djforge_core::application::ANSWERS_FILE),
            reason: e.to_string(),
        })?;
        Ok(format!("{RECORD_HEADER}{body}"))
    }
}

fn decode(source: &str, format: AnswersFormat) -> Result<AnswerMap, String> {
    let value: Value = match format {
        AnswersFormat::Yaml => serde_yaml::from_str(source).map_err(|e| e.to_string())?,
        AnswersFormat::Json => serde_json::from_str(source).map_err(|e| e.to_string())?,
        AnswersFormat::Toml => toml::from_str(source).map_err(|e| e.to_string())?,
    };

    let map = match value {
        Value::Object(map) => map,
        // An empty YAML document.
        Value::Null => return Ok(AnswerMap::new()),
        other => return Err(format!("expected a mapping of answers, found {}", kind(&other))),
    };

    let mut answers = AnswerMap::new();
    for (key, value) in map {
        if key.starts_with('_') {
            continue;
        }
        if let Some(answer) = convert(&key, value)? {
            answers.insert(key, answer);
        }
    }
    Ok(answers)
}

fn convert(key: &str, value: Value) -> Result<Option<AnswerValue>, String> {
    Ok(Some(match value {
        Value::Null => return Ok(None),
        Value::Bool(b) => AnswerValue::Bool(b),
        Value::Number(n) => AnswerValue::Text(n.to_string()),
        Value::String(s) => AnswerValue::Text(s),
        Value::Array(items) => AnswerValue::List(
            items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    Value::Number(n) => Ok(n.to_string()),
                    other => Err(format!(
                        "'{key}' must be a list of strings, found {}",
                        kind(&other)
                    )),
                })
                .collect::<Result<_, _>>()?,
        ),
        Value::Object(_) => return Err(format!("'{key}' must not be a mapping")),
    }))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use djforge_core::domain::{AnswerSet, DeploymentTarget, PythonVersion};
    use tempfile::TempDir;

    const YAML: &str = r#"
_template: django-project@1.0.0
project_name: Test Project
python_version: 3.12
use_channels: false
deployment_targets:
  - render
  - flyio
author_email: ~
"#;

    #[test]
    fn yaml_scalars_are_normalized() {
        let map = AnswersFileCodec.decode(YAML, AnswersFormat::Yaml).unwrap();

        assert_eq!(map.len(), 4);
        assert!(!map.contains_key("_template"));
        assert!(!map.contains_key("author_email"));
        assert_eq!(map.get("python_version"), Some(&AnswerValue::Text("3.12".into())));
        assert_eq!(map.get("use_channels"), Some(&AnswerValue::Bool(false)));
        assert_eq!(
            map.get("deployment_targets"),
            Some(&AnswerValue::List(vec!["render".into(), "flyio".into()]))
        );
    }

    #[test]
    fn json_and_toml_are_accepted() {
        let json = r#"{"project_name": "Shop", "use_stripe": true}"#;
        let map = AnswersFileCodec.decode(json, AnswersFormat::Json).unwrap();
        assert_eq!(map.get("use_stripe"), Some(&AnswerValue::Bool(true)));

        let toml = "project_name = \"Shop\"\ndeployment_targets = [\"docker\"]\n";
        let map = AnswersFileCodec.decode(toml, AnswersFormat::Toml).unwrap();
        assert_eq!(
            map.get("deployment_targets"),
            Some(&AnswerValue::List(vec!["docker".into()]))
        );
    }

    #[test]
    fn non_mapping_is_rejected() {
        let err = AnswersFileCodec
            .decode("- a\n- b\n", AnswersFormat::Yaml)
            .unwrap_err();
        assert!(err.to_string().contains("expected a mapping"));

        let err = AnswersFileCodec
            .decode("cache:\n  backend: redis\n", AnswersFormat::Yaml)
            .unwrap_err();
        assert!(err.to_string().contains("must not be a mapping"));
    }

    #[test]
    fn record_can_be_read_back() {
        let mut answers = AnswerSet::defaults("Shop Front");
        answers.python_version = PythonVersion::Py313;
        answers.deployment_targets = vec![DeploymentTarget::Render, DeploymentTarget::Docker];

        let record = AnswersRecord {
            template: "django-project@1.0.0".into(),
            generator_version: "0.1.0".into(),
            answers: answers.clone(),
        };
        let text = AnswersFileCodec.encode(&record).unwrap();
        assert!(text.starts_with("# Answers used"));
        assert!(text.contains("_template: django-project@1.0.0"));
        assert!(text.contains("license: MIT"));

        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".djforge-answers.yml");
        std::fs::write(&path, text).unwrap();

        let map = AnswersFileCodec.read_file(&path).unwrap();
        assert_eq!(AnswerSet::from_map(&map).unwrap(), answers);
    }

    #[test]
    fn read_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("answers.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = AnswersFileCodec.read_file(&path).unwrap_err();
        assert!(err.to_string().contains("answers.json"));
    }
}
