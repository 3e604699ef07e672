//! Terminal prompts for unanswered questions.

use dialoguer::{Confirm, Input, MultiSelect, Select, theme::ColorfulTheme};

use djforge_core::{
    application::{ApplicationError, ports::Prompter},
    domain::{AnswerValue, QuestionDef, QuestionKind},
    error::{ForgeError, ForgeResult},
};

/// Asks questions on the terminal with dialoguer widgets.
#[derive(Default)]
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Prompter for TerminalPrompter {
    fn ask(&self, question: &QuestionDef, default: Option<AnswerValue>) -> ForgeResult<AnswerValue> {
        let failed = |e: dialoguer::Error| -> ForgeError {
            ApplicationError::PromptFailed {
                key: question.key.into(),
                reason: e.to_string(),
            }
            .into()
        };

        match question.kind {
            QuestionKind::Text => {
                let mut input = Input::<String>::with_theme(&self.theme).with_prompt(question.prompt);
                if let Some(text) = default.as_ref().and_then(AnswerValue::as_text) {
                    input = input.default(text.to_owned());
                }
                input.interact_text().map(AnswerValue::Text).map_err(failed)
            }
            QuestionKind::Bool => Confirm::with_theme(&self.theme)
                .with_prompt(question.prompt)
                .default(default.as_ref().and_then(AnswerValue::as_bool).unwrap_or(false))
                .interact()
                .map(AnswerValue::Bool)
                .map_err(failed),
            QuestionKind::Choice => {
                let current = default
                    .as_ref()
                    .and_then(AnswerValue::as_text)
                    .and_then(|d| question.choices.iter().position(|c| *c == d))
                    .unwrap_or(0);
                let index = Select::with_theme(&self.theme)
                    .with_prompt(question.prompt)
                    .items(question.choices)
                    .default(current)
                    .interact()
                    .map_err(failed)?;
                Ok(AnswerValue::Text(choice_at(question, index)))
            }
            QuestionKind::MultiChoice => {
                let selected = default.as_ref().and_then(AnswerValue::as_list).unwrap_or(&[]);
                let checked: Vec<bool> = question
                    .choices
                    .iter()
                    .map(|c| selected.iter().any(|s| s.as_str() == *c))
                    .collect();
                let indices = MultiSelect::with_theme(&self.theme)
                    .with_prompt(question.prompt)
                    .items(question.choices)
                    .defaults(&checked)
                    .interact()
                    .map_err(failed)?;
                Ok(AnswerValue::List(
                    indices.into_iter().map(|i| choice_at(question, i)).collect(),
                ))
            }
        }
    }
}

fn choice_at(question: &QuestionDef, index: usize) -> String {
    question
        .choices
        .get(index)
        .map(|c| c.to_string())
        .unwrap_or_default()
}
