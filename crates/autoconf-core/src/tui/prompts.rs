//! Charm-style CLI prompts using cliclack

use crate::config::Answers;
use crate::prompt::{Collector, PromptQuestion, QuestionKind};
use anyhow::{Context, Result};
use serde_json::{Number, Value};

/// Asks each question on the terminal, one after another
#[derive(Debug, Clone, Default)]
pub struct ClackCollector {
    /// Title shown before the first question
    pub intro: Option<String>,
}

impl ClackCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_intro(intro: impl Into<String>) -> Self {
        Self {
            intro: Some(intro.into()),
        }
    }
}

impl Collector for ClackCollector {
    fn collect(&mut self, questions: &[PromptQuestion]) -> Result<Answers> {
        if let Some(intro) = &self.intro {
            cliclack::intro(intro)?;
        }

        let mut answers = Answers::new();
        for question in questions {
            let value = ask(question)
                .with_context(|| format!("Prompt \"{}\" was not answered", question.message))?;
            answers.insert(question.name.clone(), value);
        }

        if self.intro.is_some() {
            cliclack::outro("Answers collected")?;
        }

        Ok(answers)
    }
}

fn ask(question: &PromptQuestion) -> Result<Value> {
    let default = question.default.as_ref();

    let value = match question.kind {
        QuestionKind::Input => {
            let mut input = cliclack::input(&question.message);
            input = match default.map(display_value) {
                Some(text) => input.placeholder(&text).default_input(&text),
                None => input.required(false),
            };
            Value::String(input.interact::<String>()?)
        }
        QuestionKind::Number => {
            let mut input = cliclack::input(&question.message).validate(|text: &String| {
                match parse_number(text) {
                    Some(_) => Ok(()),
                    None => Err("Please enter a number"),
                }
            });
            if let Some(text) = default.map(display_value) {
                input = input.placeholder(&text).default_input(&text);
            }
            let text: String = input.interact()?;
            parse_number(&text)
                .map(Value::Number)
                .with_context(|| format!("Invalid number: {}", text))?
        }
        QuestionKind::Confirm => {
            let initial = default.and_then(Value::as_bool).unwrap_or(false);
            Value::Bool(
                cliclack::confirm(&question.message)
                    .initial_value(initial)
                    .interact()?,
            )
        }
        QuestionKind::Password => {
            let mut password = cliclack::password(&question.message).mask('▪');
            if default.is_some() {
                password = password.allow_empty();
            }
            Value::String(or_default(password.interact()?, default))
        }
        QuestionKind::List => {
            if question.choices.is_empty() {
                anyhow::bail!("Question \"{}\" has no choices", question.name);
            }
            let mut select = cliclack::select(&question.message);
            for choice in &question.choices {
                select = select.item(choice.clone(), choice, "");
            }
            if let Some(initial) = default.and_then(Value::as_str) {
                if question.choices.iter().any(|c| c == initial) {
                    select = select.initial_value(initial.to_string());
                }
            }
            Value::String(select.interact()?)
        }
        QuestionKind::Checkbox => {
            let mut multi = cliclack::multiselect(&question.message);
            for choice in &question.choices {
                multi = multi.item(choice.clone(), choice, "");
            }
            let initial: Vec<String> = default
                .and_then(Value::as_array)
                .map(|values| {
                    values
                        .iter()
                        .filter_map(Value::as_str)
                        .filter(|v| question.choices.iter().any(|c| c == v))
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();
            let selected: Vec<String> = multi.initial_values(initial).required(false).interact()?;
            Value::Array(selected.into_iter().map(Value::String).collect())
        }
    };

    Ok(value)
}

/// Text form of a default value as the operator would type it
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Blank entries fall back to the default, if there is one
fn or_default(entered: String, default: Option<&Value>) -> String {
    match default {
        Some(value) if entered.is_empty() => display_value(value),
        _ => entered,
    }
}

/// Integers stay integers; anything else numeric becomes a float
fn parse_number(text: &str) -> Option<Number> {
    let text = text.trim();
    if let Ok(n) = text.parse::<i64>() {
        return Some(Number::from(n));
    }
    text.parse::<f64>().ok().and_then(Number::from_f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("3000"), Some(Number::from(3000)));
        assert_eq!(parse_number(" -2 "), Some(Number::from(-2)));
        assert_eq!(parse_number("0.5"), Number::from_f64(0.5));
        assert_eq!(parse_number("port"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!("localhost")), "localhost");
        assert_eq!(display_value(&json!(3000)), "3000");
        assert_eq!(display_value(&json!(true)), "true");
    }

    #[test]
    fn test_blank_password_falls_back_to_default() {
        assert_eq!(or_default(String::new(), Some(&json!("s3cret"))), "s3cret");
        assert_eq!(or_default("typed".into(), Some(&json!("s3cret"))), "typed");
        assert_eq!(or_default(String::new(), None), "");
    }
}
