//! Prompt question types and parsing

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// How a question is asked and what kind of answer it produces
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// Free text, answered as a string
    #[default]
    Input,
    /// Numeric text, answered as a number
    Number,
    /// Yes/no, answered as a boolean
    Confirm,
    /// Masked free text, answered as a string
    Password,
    /// One of `choices`, answered as a string
    #[serde(alias = "select")]
    List,
    /// Any of `choices`, answered as an array of strings
    #[serde(alias = "multiselect")]
    Checkbox,
}

/// Condition that must hold for a question to be asked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Precondition {
    /// Ask only while nothing exists at this path
    FileNotFound(PathBuf),
}

impl Precondition {
    /// Evaluate against the live filesystem
    pub fn holds(&self) -> bool {
        match self {
            Precondition::FileNotFound(path) => !path.exists(),
        }
    }
}

/// A single question shown to the operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptQuestion {
    /// Key of the answer in the collected answers
    pub name: String,

    /// Text shown to the operator
    pub message: String,

    #[serde(rename = "type", default)]
    pub kind: QuestionKind,

    /// Initial value offered to the operator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Options for `list` and `checkbox` questions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,

    /// Written as a single-key map, e.g. `if: {fileNotFound: config/foo.yml}`
    #[serde(
        rename = "if",
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_yaml::with::singleton_map"
    )]
    pub precondition: Option<Precondition>,
}

impl PromptQuestion {
    pub fn new(kind: QuestionKind, name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            kind,
            default: None,
            choices: Vec::new(),
            precondition: None,
        }
    }

    pub fn input(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(QuestionKind::Input, name, message)
    }

    pub fn number(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(QuestionKind::Number, name, message)
    }

    pub fn confirm(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(QuestionKind::Confirm, name, message)
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    /// Only ask this question while `path` does not exist
    pub fn if_file_not_found(mut self, path: impl AsRef<Path>) -> Self {
        self.precondition = Some(Precondition::FileNotFound(path.as_ref().to_path_buf()));
        self
    }
}
