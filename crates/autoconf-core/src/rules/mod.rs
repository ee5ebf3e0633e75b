//! Declarative filesystem rules and their executor
//!
//! Rules are produced fresh by a generator on every run and applied once, in
//! order, by [`apply_rules`].

pub mod executor;

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

pub use executor::{apply_rules, RuleOutcome};

/// What to write into a file created by [`Rule::PutFileOnce`]
#[derive(Debug, Clone, PartialEq)]
pub enum FileContent {
    Yaml(Value),
    Json(Value),
    Raw(String),
    Empty,
}

impl FileContent {
    /// Serialize to the bytes written on disk
    pub fn encode(&self) -> Result<String> {
        match self {
            FileContent::Yaml(value) => {
                serde_yaml::to_string(value).context("Failed to encode YAML content")
            }
            FileContent::Json(value) => {
                serde_json::to_string(value).context("Failed to encode JSON content")
            }
            FileContent::Raw(text) => Ok(text.clone()),
            FileContent::Empty => Ok(String::new()),
        }
    }

    /// Human-readable rendering shown in the log before writing
    pub fn preview(&self) -> Result<String> {
        match self {
            FileContent::Json(value) => {
                serde_json::to_string_pretty(value).context("Failed to encode JSON content")
            }
            other => other.encode(),
        }
    }
}

/// A single filesystem action
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Ensure a directory and its ancestors exist
    Mkdir { path: PathBuf },
    /// Create a file unless something already exists at `path`
    PutFileOnce { path: PathBuf, content: FileContent },
}

impl Rule {
    pub fn mkdir(path: impl Into<PathBuf>) -> Self {
        Rule::Mkdir { path: path.into() }
    }

    pub fn put_file_once(path: impl Into<PathBuf>, content: FileContent) -> Self {
        Rule::PutFileOnce {
            path: path.into(),
            content,
        }
    }

    pub fn put_yaml(path: impl Into<PathBuf>, value: impl Into<Value>) -> Self {
        Self::put_file_once(path, FileContent::Yaml(value.into()))
    }

    pub fn put_json(path: impl Into<PathBuf>, value: impl Into<Value>) -> Self {
        Self::put_file_once(path, FileContent::Json(value.into()))
    }

    pub fn put_raw(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self::put_file_once(path, FileContent::Raw(text.into()))
    }

    pub fn put_empty(path: impl Into<PathBuf>) -> Self {
        Self::put_file_once(path, FileContent::Empty)
    }

    pub fn path(&self) -> &Path {
        match self {
            Rule::Mkdir { path } | Rule::PutFileOnce { path, .. } => path.as_path(),
        }
    }
}
