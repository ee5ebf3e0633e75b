//! Autoconf builder and run orchestration
//!
//! An [`Autoconf`] is created once per service, configured through chained
//! `with_*` calls and consumed by [`Autoconf::run`]:
//!
//! ```text
//! gate check ─┬─ skip_autoconf ──────────────────────────────> Skipped
//!             ├─ skip_prompt ── config = defaults ──┐
//!             └─ prompt ── filter ── collect ── transform ──┴─ generate ── execute
//! ```

use crate::config::{merge_answers, Answers, Config};
use crate::error::{AutoconfError, Stage};
use crate::gate::{EnvSnapshot, GateFlags, RunMode};
use crate::layout::{HostLayout, NpmLayout};
use crate::paths::{PathSet, ServiceIdentity};
use crate::prompt::{filter_questions, Collector, PromptQuestion};
use crate::rules::{apply_rules, Rule, RuleOutcome};
use colored::Colorize;
use std::path::Path;

pub type DefaultsFn = Box<dyn Fn(&Autoconf) -> anyhow::Result<Config>>;
pub type PromptsFn = Box<dyn Fn(&Autoconf) -> anyhow::Result<Vec<PromptQuestion>>>;
pub type TransformFn = Box<dyn Fn(&Autoconf, &Answers) -> anyhow::Result<Config>>;
pub type GeneratorFn = Box<dyn Fn(&Autoconf) -> anyhow::Result<Vec<Rule>>>;

/// Result of a run that did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The gate disabled autoconfiguration; nothing was touched
    Skipped,
    Completed {
        /// Whether the operator was prompted
        prompted: bool,
        config: Config,
        applied: Vec<RuleOutcome>,
    },
}

/// First-run configuration for one service
pub struct Autoconf {
    identity: ServiceIdentity,
    paths: PathSet,
    flags: GateFlags,

    default_config: Config,
    prompt_questions: Vec<PromptQuestion>,
    answers: Answers,
    config: Config,

    defaults_fn: Option<DefaultsFn>,
    prompts_fn: Option<PromptsFn>,
    transform_fn: Option<TransformFn>,
    generator_fn: Option<GeneratorFn>,
}

impl Autoconf {
    /// Create an instance from the process environment and working directory,
    /// using npm conventions
    pub fn new(service_name: &str) -> Result<Self, AutoconfError> {
        let execution_root = std::env::current_dir()
            .map_err(|e| AutoconfError::fs("read current directory", ".", e))?;
        Self::from_env(service_name, &EnvSnapshot::capture(), &execution_root, &NpmLayout)
    }

    /// Create an instance from an explicit environment snapshot
    pub fn from_env<L: HostLayout>(
        service_name: &str,
        env: &EnvSnapshot,
        execution_root: &Path,
        layout: &L,
    ) -> Result<Self, AutoconfError> {
        let identity = ServiceIdentity::resolve(service_name, layout, execution_root)?;
        let project_root = env.project_root(layout, execution_root);
        let paths = PathSet::new(layout, &project_root, &identity.service_name);
        let flags = GateFlags::evaluate(env, layout, &project_root, execution_root);

        Ok(Self {
            identity,
            paths,
            flags,
            default_config: Config::new(),
            prompt_questions: Vec::new(),
            answers: Answers::new(),
            config: Config::new(),
            defaults_fn: None,
            prompts_fn: None,
            transform_fn: None,
            generator_fn: None,
        })
    }

    /// Register the producer of the default configuration
    pub fn with_defaults<F>(mut self, f: F) -> Self
    where
        F: Fn(&Autoconf) -> anyhow::Result<Config> + 'static,
    {
        self.defaults_fn = Some(Box::new(f));
        self
    }

    /// Register the producer of prompt questions
    pub fn with_prompts<F>(mut self, f: F) -> Self
    where
        F: Fn(&Autoconf) -> anyhow::Result<Vec<PromptQuestion>> + 'static,
    {
        self.prompts_fn = Some(Box::new(f));
        self
    }

    /// Replace the default answers-to-config merge
    pub fn with_transformer<F>(mut self, f: F) -> Self
    where
        F: Fn(&Autoconf, &Answers) -> anyhow::Result<Config> + 'static,
    {
        self.transform_fn = Some(Box::new(f));
        self
    }

    /// Register the rule generator
    pub fn with_generator<F>(mut self, f: F) -> Self
    where
        F: Fn(&Autoconf) -> anyhow::Result<Vec<Rule>> + 'static,
    {
        self.generator_fn = Some(Box::new(f));
        self
    }

    /// Override the gate decisions computed from the environment
    pub fn with_gate_flags(mut self, flags: GateFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn service_name(&self) -> &str {
        &self.identity.service_name
    }

    pub fn module_name(&self) -> &str {
        &self.identity.module_name
    }

    pub fn identity(&self) -> &ServiceIdentity {
        &self.identity
    }

    pub fn paths(&self) -> &PathSet {
        &self.paths
    }

    pub fn flags(&self) -> GateFlags {
        self.flags
    }

    /// Materialized defaults; empty until a run has started
    pub fn default_config(&self) -> &Config {
        &self.default_config
    }

    pub fn prompt_questions(&self) -> &[PromptQuestion] {
        &self.prompt_questions
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    /// Final configuration; populated before the generator runs
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the pipeline and report the result on stdout/stderr.
    ///
    /// Failures are logged and returned, never panicked on, so an installer
    /// configuring several services can decide whether one failure matters.
    pub async fn run<C: Collector>(self, collector: &mut C) -> Result<RunOutcome, AutoconfError> {
        let service = self.identity.service_name.clone();
        let module = self.identity.module_name.clone();

        let result = self.execute(collector).await;
        match &result {
            Ok(_) => println!(
                "{}",
                format!("success configuring {} service ({})", service, module).green()
            ),
            Err(e) => {
                println!(
                    "{}",
                    format!("error configuring {} service ({})", service, module).red()
                );
                eprintln!("{} {}", "Error:".red(), e);
            }
        }
        result
    }

    /// Run the pipeline without the final success/error report
    pub async fn execute<C: Collector>(
        mut self,
        collector: &mut C,
    ) -> Result<RunOutcome, AutoconfError> {
        let mode = self.flags.mode();
        if mode == RunMode::Skipped {
            println!("{}", "skip autoconf".dimmed());
            return Ok(RunOutcome::Skipped);
        }

        self.default_config = match &self.defaults_fn {
            Some(f) => f(&self).map_err(AutoconfError::callback(Stage::Defaults))?,
            None => Config::new(),
        };

        let prompted = mode == RunMode::Prompting;
        if prompted {
            println!("autoconf with prompt");
            self.prompt_questions = match &self.prompts_fn {
                Some(f) => f(&self).map_err(AutoconfError::callback(Stage::Prompts))?,
                None => Vec::new(),
            };

            let filtered = filter_questions(&self.prompt_questions);
            for skipped in &filtered.skipped {
                println!(
                    "skipping prompt \"{}\" because \"{}\" already exist",
                    skipped.message,
                    skipped.existing.display()
                );
            }
            self.prompt_questions = filtered.kept;

            self.answers = if self.prompt_questions.is_empty() {
                Answers::new()
            } else {
                collector
                    .collect(&self.prompt_questions)
                    .map_err(AutoconfError::Collector)?
            };

            self.config = match &self.transform_fn {
                Some(f) => f(&self, &self.answers)
                    .map_err(AutoconfError::callback(Stage::Transform))?,
                None => merge_answers(&self.default_config, &self.answers),
            };
        } else {
            println!("autoconf without prompt");
            self.config = self.default_config.clone();
        }

        let rules = match &self.generator_fn {
            Some(f) => f(&self).map_err(AutoconfError::callback(Stage::Generate))?,
            None => Vec::new(),
        };

        let applied = apply_rules(&rules).await?;

        Ok(RunOutcome::Completed {
            prompted,
            config: self.config,
            applied,
        })
    }
}

impl std::fmt::Debug for Autoconf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Autoconf")
            .field("identity", &self.identity)
            .field("paths", &self.paths)
            .field("flags", &self.flags)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
