//! Drop questions whose precondition no longer holds

use super::question::{Precondition, PromptQuestion};
use std::path::PathBuf;

/// A question left out because its target already exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedQuestion {
    pub name: String,
    pub message: String,
    pub existing: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct FilteredQuestions {
    /// Questions to ask, in their original order
    pub kept: Vec<PromptQuestion>,
    pub skipped: Vec<SkippedQuestion>,
}

/// Split `questions` into those to ask and those whose file already exists.
/// The filesystem is checked on every call.
pub fn filter_questions(questions: &[PromptQuestion]) -> FilteredQuestions {
    let mut filtered = FilteredQuestions::default();

    for question in questions {
        match &question.precondition {
            Some(precondition @ Precondition::FileNotFound(path)) if !precondition.holds() => {
                filtered.skipped.push(SkippedQuestion {
                    name: question.name.clone(),
                    message: question.message.clone(),
                    existing: path.clone(),
                });
            }
            _ => filtered.kept.push(question.clone()),
        }
    }

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_questions_without_precondition_are_kept() {
        let questions = vec![
            PromptQuestion::input("host", "Host?"),
            PromptQuestion::number("port", "Port?"),
        ];
        let filtered = filter_questions(&questions);
        assert_eq!(filtered.kept, questions);
        assert!(filtered.skipped.is_empty());
    }

    #[test]
    fn test_existing_file_drops_question() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config/foo.yml");
        std::fs::create_dir_all(config.parent().unwrap()).unwrap();
        std::fs::write(&config, "x").unwrap();

        let questions = vec![
            PromptQuestion::input("host", "Host?"),
            PromptQuestion::number("port", "Port?").if_file_not_found(&config),
        ];
        let filtered = filter_questions(&questions);

        let names: Vec<_> = filtered.kept.iter().map(|q| q.name.as_str()).collect();
        assert_eq!(names, vec!["host"]);
        assert_eq!(
            filtered.skipped,
            vec![SkippedQuestion {
                name: "port".to_string(),
                message: "Port?".to_string(),
                existing: config,
            }]
        );
    }

    #[test]
    fn test_filter_is_reevaluated_each_call() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("foo.yml");
        let questions = vec![PromptQuestion::number("port", "Port?").if_file_not_found(&config)];

        assert_eq!(filter_questions(&questions).kept.len(), 1);

        std::fs::write(&config, "x").unwrap();
        assert!(filter_questions(&questions).kept.is_empty());

        std::fs::remove_file(&config).unwrap();
        assert_eq!(filter_questions(&questions).kept.len(), 1);
    }

    #[test]
    fn test_order_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let questions = vec![
            PromptQuestion::input("c", "C?"),
            PromptQuestion::input("a", "A?").if_file_not_found(dir.path().join("missing")),
            PromptQuestion::input("b", "B?"),
        ];
        let names: Vec<_> = filter_questions(&questions)
            .kept
            .into_iter()
            .map(|q| q.name)
            .collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }
}
