//! Answer Service - turns whatever the user supplied into a complete [`AnswerSet`].
//!
//! Questions are walked in registry order. For each one:
//! - a question whose `when` condition is false takes its registry default;
//!   a supplied value other than that default is an inconsistency
//! - otherwise the supplied value wins, then the prompter, then the default
//!
//! Configured defaults (from the user's config file) replace registry
//! defaults but are still coerced and validated like any other answer.

use tracing::{debug, instrument};

use crate::{
    application::ports::Prompter,
    domain::{AnswerMap, AnswerSet, AnswerValue, DomainError, QuestionDef, find_question, questions},
    error::ForgeResult,
};

#[derive(Default)]
pub struct AnswerService {
    prompter: Option<Box<dyn Prompter>>,
    defaults: AnswerMap,
}

impl AnswerService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask unanswered questions through `prompter`.
    pub fn with_prompter(mut self, prompter: Box<dyn Prompter>) -> Self {
        self.prompter = Some(prompter);
        self
    }

    /// Override registry defaults.
    pub fn with_defaults(mut self, defaults: AnswerMap) -> Self {
        self.defaults = defaults;
        self
    }

    /// Resolve `provided` answers against the question registry.
    #[instrument(skip_all, fields(provided = provided.len(), interactive = self.prompter.is_some()))]
    pub fn resolve(&self, mut provided: AnswerMap) -> ForgeResult<AnswerSet> {
        for key in provided.keys().chain(self.defaults.keys()) {
            if find_question(key).is_none() {
                return Err(DomainError::UnknownQuestion { key: key.into() }.into());
            }
        }

        let mut resolved = AnswerMap::new();
        for question in questions() {
            let supplied = provided.remove(question.key);

            if !question.is_asked(&resolved)? {
                let value = inapplicable(question, supplied, &resolved)?;
                resolved.insert(question.key, value);
                continue;
            }

            let default = self.default_for(question, &resolved)?;
            let value = if let Some(value) = supplied {
                Some(question.coerce(value)?)
            } else if let Some(prompter) = &self.prompter {
                Some(question.coerce(prompter.ask(question, default)?)?)
            } else {
                default
            };

            let value = value.ok_or_else(|| DomainError::MissingAnswer {
                key: question.key.into(),
            })?;
            resolved.insert(question.key, value);
        }

        let answers = AnswerSet::from_map(&resolved)?;
        answers.validate()?;
        debug!(project = %answers.project_slug, "Answers resolved");
        Ok(answers)
    }

    fn default_for(
        &self,
        question: &QuestionDef,
        resolved: &AnswerMap,
    ) -> ForgeResult<Option<AnswerValue>> {
        match self.defaults.get(question.key) {
            Some(configured) => Ok(Some(question.coerce(configured.clone())?)),
            None => Ok(question.default_value(resolved)),
        }
    }
}

/// Value of a question whose `when` is false: its registry default. A
/// supplied answer is accepted only when it equals that default.
fn inapplicable(
    question: &QuestionDef,
    supplied: Option<AnswerValue>,
    resolved: &AnswerMap,
) -> ForgeResult<AnswerValue> {
    let default = question
        .default_value(resolved)
        .ok_or_else(|| DomainError::MissingAnswer {
            key: question.key.into(),
        })?;

    if let Some(value) = supplied {
        if question.coerce(value)? != default {
            return Err(DomainError::InconsistentAnswers {
                key: question.key.into(),
                reason: format!("only applies when {}", question.condition()?),
            }
            .into());
        }
        debug!(key = question.key, "Answer for a question that does not apply equals its default");
    }
    Ok(default)
}
