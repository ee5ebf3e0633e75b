//! Autoconf Core - first-run configuration for installable services
//!
//! When a service module is installed into a project, this library decides
//! whether to configure it, optionally asks the operator a few questions, and
//! scaffolds the service's directories and config files. Files that already
//! exist are never modified, so re-installing is always safe.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Values** - Paths, gate flags, questions, config maps and rules
//! - **Layer 2: Engine** - Prompt filtering, config merging, rule execution and
//!   the [`Autoconf`] builder that sequences them
//! - **Layer 3: Surfaces** - YAML manifests for declarative services and an
//!   optional cliclack-based collector (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based interactive collector
//!
//! # Example Usage
//!
//! ```ignore
//! use autoconf_core::{Autoconf, PromptQuestion, Rule};
//! use serde_json::json;
//!
//! let outcome = Autoconf::new("koa")?
//!     .with_defaults(|_| Ok(autoconf_core::into_config(json!({"port": 3000}))))
//!     .with_prompts(|ac| {
//!         Ok(vec![PromptQuestion::number("port", "Port?")
//!             .with_default(3000)
//!             .if_file_not_found(&ac.paths().service_config_file)])
//!     })
//!     .with_generator(|ac| {
//!         Ok(vec![Rule::put_yaml(
//!             &ac.paths().service_config_file,
//!             serde_json::Value::Object(ac.config().clone()),
//!         )])
//!     })
//!     .run(&mut autoconf_core::tui::ClackCollector::new())
//!     .await;
//! ```

pub mod autoconf;
pub mod config;
pub mod error;
pub mod gate;
pub mod layout;
pub mod manifest;
pub mod paths;
pub mod prompt;
pub mod rules;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use autoconf::{Autoconf, RunOutcome};
pub use config::{into_config, merge_answers, Answers, Config};
pub use error::{AutoconfError, Stage};
pub use gate::{EnvSnapshot, GateFlags, RunMode};
pub use layout::{HostLayout, NpmLayout};
pub use manifest::AutoconfManifest;
pub use paths::{PathSet, ServiceIdentity};
pub use prompt::{
    filter_questions, Collector, Precondition, PresetCollector, PromptQuestion, QuestionKind,
};
pub use rules::{apply_rules, FileContent, Rule, RuleOutcome};
