//! `{{placeholder}}` rendering for manifest strings and values

use crate::autoconf::Autoconf;
use crate::config::Config;
use anyhow::{Context, Result};
use serde_json::Value;

/// Values a manifest may refer to while a run is in progress
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    vars: Config,
    config: Config,
}

impl RenderContext {
    /// Identity, project paths and the current config of `ac`
    pub fn new(ac: &Autoconf) -> Self {
        let mut vars = Config::new();
        vars.insert("service_name".into(), Value::from(ac.service_name()));
        vars.insert("module_name".into(), Value::from(ac.module_name()));
        for (name, path) in ac.paths().entries() {
            vars.insert(name.into(), Value::from(path.to_string_lossy().into_owned()));
        }

        Self {
            vars,
            config: ac.config().clone(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_var(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    #[cfg(test)]
    pub(crate) fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Resolve `config`, `config.a.b` or a plain variable name
    fn lookup(&self, key: &str) -> Option<Value> {
        if key == "config" {
            return Some(Value::Object(self.config.clone()));
        }
        if let Some(path) = key.strip_prefix("config.") {
            let mut parts = path.split('.');
            let first = self.config.get(parts.next()?)?;
            return parts
                .try_fold(first, |value, part| value.get(part))
                .cloned();
        }
        self.vars.get(key).cloned()
    }

    fn require(&self, key: &str) -> Result<Value> {
        self.lookup(key)
            .with_context(|| format!("Unknown placeholder {{{{{}}}}}", key))
    }

    /// Interpolate every placeholder in `template` as text
    pub fn render_str(&self, template: &str) -> Result<String> {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after
                .find("}}")
                .with_context(|| format!("Unterminated placeholder in \"{}\"", template))?;
            let value = self.require(after[..end].trim())?;
            out.push_str(&as_text(&value));
            rest = &after[end + 2..];
        }
        out.push_str(rest);

        Ok(out)
    }

    /// Render strings inside `value`; a string that is exactly one placeholder
    /// is replaced by the referenced value itself, keeping its type
    pub fn render_value(&self, value: &Value) -> Result<Value> {
        match value {
            Value::String(s) => match sole_placeholder(s) {
                Some(key) => self.require(key),
                None => self.render_str(s).map(Value::String),
            },
            Value::Array(items) => items
                .iter()
                .map(|item| self.render_value(item))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            Value::Object(map) => {
                let mut rendered = Config::new();
                for (key, item) in map {
                    rendered.insert(key.clone(), self.render_value(item)?);
                }
                Ok(Value::Object(rendered))
            }
            other => Ok(other.clone()),
        }
    }
}

fn sole_placeholder(s: &str) -> Option<&str> {
    let inner = s.trim().strip_prefix("{{")?.strip_suffix("}}")?;
    if inner.contains("{{") || inner.contains("}}") {
        None
    } else {
        Some(inner.trim())
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
