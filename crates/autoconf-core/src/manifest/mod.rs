//! Declarative autoconf manifests
//!
//! A manifest describes a service's defaults, questions and rules in YAML so
//! the `autoconf` binary can configure services that do not link this
//! library. Strings may refer to paths, identity and config values with
//! `{{placeholders}}`; see [`RenderContext`].

pub mod render;

use crate::autoconf::Autoconf;
use crate::config::Config;
use crate::error::AutoconfError;
use crate::gate::EnvSnapshot;
use crate::layout::HostLayout;
use crate::prompt::{Precondition, PromptQuestion};
use crate::rules::{FileContent, Rule};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

pub use render::RenderContext;

/// Root manifest document (e.g. `autoconf.yaml`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoconfManifest {
    /// Service name; determines every derived path
    pub service: String,

    /// Default configuration, used as-is when prompting is skipped
    #[serde(default)]
    pub defaults: Config,

    /// Questions asked when prompting is enabled, in display order
    #[serde(default)]
    pub prompts: Vec<PromptQuestion>,

    /// Rules generated from the final configuration, applied in order
    #[serde(default)]
    pub rules: Vec<RuleTemplate>,
}

/// One rule entry. Exactly one of `mkdirp` and `putFileOnce` must be set;
/// file content comes from the first of `contentYml`, `contentJson` and
/// `content` that is present, or is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mkdirp: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put_file_once: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_yml: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_json: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl RuleTemplate {
    /// Render into a concrete rule; relative paths resolve against `base`
    pub fn render(&self, ctx: &RenderContext, base: &Path) -> Result<Rule> {
        match (&self.mkdirp, &self.put_file_once) {
            (Some(dir), None) => Ok(Rule::mkdir(resolve(base, &ctx.render_str(dir)?))),
            (None, Some(file)) => {
                let path = resolve(base, &ctx.render_str(file)?);
                let content = if let Some(value) = &self.content_yml {
                    FileContent::Yaml(ctx.render_value(value)?)
                } else if let Some(value) = &self.content_json {
                    FileContent::Json(ctx.render_value(value)?)
                } else if let Some(text) = &self.content {
                    FileContent::Raw(ctx.render_str(text)?)
                } else {
                    FileContent::Empty
                };
                Ok(Rule::put_file_once(path, content))
            }
            (Some(_), Some(_)) => anyhow::bail!("A rule cannot set both mkdirp and putFileOnce"),
            (None, None) => anyhow::bail!("A rule must set either mkdirp or putFileOnce"),
        }
    }
}

fn resolve(base: &Path, rendered: &str) -> PathBuf {
    base.join(rendered)
}

fn render_question(
    question: &PromptQuestion,
    ctx: &RenderContext,
    base: &Path,
) -> Result<PromptQuestion> {
    let mut rendered = question.clone();
    rendered.message = ctx.render_str(&question.message)?;
    if let Some(default) = &question.default {
        rendered.default = Some(ctx.render_value(default)?);
    }
    if let Some(Precondition::FileNotFound(path)) = &question.precondition {
        let path = ctx.render_str(&path.to_string_lossy())?;
        rendered.precondition = Some(Precondition::FileNotFound(resolve(base, &path)));
    }
    Ok(rendered)
}

impl AutoconfManifest {
    /// Read and parse a manifest file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Build an [`Autoconf`] whose callbacks render this manifest
    pub fn into_autoconf<L: HostLayout>(
        self,
        env: &EnvSnapshot,
        execution_root: &Path,
        layout: &L,
    ) -> Result<Autoconf, AutoconfError> {
        let AutoconfManifest {
            service,
            defaults,
            prompts,
            rules,
        } = self;

        let autoconf = Autoconf::from_env(&service, env, execution_root, layout)?
            .with_defaults(move |ac| {
                let ctx = RenderContext::new(ac);
                match ctx.render_value(&Value::Object(defaults.clone()))? {
                    Value::Object(map) => Ok(map),
                    _ => anyhow::bail!("Defaults must render to a mapping"),
                }
            })
            .with_prompts(move |ac| {
                let ctx = RenderContext::new(ac);
                let base = &ac.paths().project_root;
                prompts
                    .iter()
                    .map(|q| {
                        render_question(q, &ctx, base)
                            .with_context(|| format!("Invalid prompt \"{}\"", q.name))
                    })
                    .collect()
            })
            .with_generator(move |ac| {
                let ctx = RenderContext::new(ac);
                let base = &ac.paths().project_root;
                rules
                    .iter()
                    .enumerate()
                    .map(|(i, rule)| {
                        rule.render(&ctx, base)
                            .with_context(|| format!("Invalid rule #{}", i + 1))
                    })
                    .collect()
            });

        Ok(autoconf)
    }
}
