//! Prompt questions, precondition filtering and answer collection
//!
//! This module provides:
//! - The question model shared by library callers and YAML manifests
//! - File-existence filtering evaluated right before prompting
//! - The `Collector` boundary that turns questions into answers

pub mod collector;
pub mod filter;
pub mod question;

pub use collector::{Collector, PresetCollector};
pub use filter::{filter_questions, FilteredQuestions, SkippedQuestion};
pub use question::{Precondition, PromptQuestion, QuestionKind};
