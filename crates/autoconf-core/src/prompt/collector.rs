//! Answer collection boundary

use super::question::PromptQuestion;
use crate::config::Answers;
use anyhow::Result;
use serde_json::Value;

/// Presents questions to an operator and returns their answers keyed by
/// question name, in question order
pub trait Collector {
    fn collect(&mut self, questions: &[PromptQuestion]) -> Result<Answers>;
}

/// Non-interactive collector answering from a preset map, falling back to
/// each question's default. Questions with neither are left unanswered.
#[derive(Debug, Clone, Default)]
pub struct PresetCollector {
    presets: Answers,
    asked: Vec<String>,
}

impl PresetCollector {
    pub fn new(presets: Answers) -> Self {
        Self {
            presets,
            asked: Vec::new(),
        }
    }

    /// Names of every question this collector has been given
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl Collector for PresetCollector {
    fn collect(&mut self, questions: &[PromptQuestion]) -> Result<Answers> {
        let mut answers = Answers::new();
        for question in questions {
            self.asked.push(question.name.clone());
            let answer: Option<Value> = self
                .presets
                .get(&question.name)
                .or(question.default.as_ref())
                .cloned();
            if let Some(value) = answer {
                answers.insert(question.name.clone(), value);
            }
        }
        Ok(answers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::into_config;
    use serde_json::json;

    #[test]
    fn test_presets_then_defaults() {
        let mut collector = PresetCollector::new(into_config(json!({"port": 8080})));
        let questions = vec![
            PromptQuestion::input("host", "Host?").with_default("localhost"),
            PromptQuestion::number("port", "Port?").with_default(3000),
            PromptQuestion::input("token", "Token?"),
        ];

        let answers = collector.collect(&questions).unwrap();

        assert_eq!(
            Value::Object(answers),
            json!({"host": "localhost", "port": 8080})
        );
        assert_eq!(collector.asked(), ["host", "port", "token"]);
    }
}
