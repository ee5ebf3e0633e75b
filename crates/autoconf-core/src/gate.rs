//! Environment gate: decides whether to prompt and whether to run at all

use crate::layout::HostLayout;
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Read-only snapshot of environment variables
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    /// Capture the current process environment. Variables whose name or
    /// value is not valid UTF-8 are left out.
    pub fn capture() -> Self {
        Self::from_os(std::env::vars_os())
    }

    fn from_os<I: IntoIterator<Item = (OsString, OsString)>>(vars: I) -> Self {
        vars.into_iter()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// A variable counts as set when present and non-empty
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| !v.is_empty())
    }

    /// Root of the project that triggered the install, falling back to
    /// `execution_root` when the host did not export one
    pub fn project_root<L: HostLayout>(&self, layout: &L, execution_root: &Path) -> PathBuf {
        match self.get(layout.project_root_var()) {
            Some(root) if !root.is_empty() => PathBuf::from(root),
            _ => execution_root.to_path_buf(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Gate decisions computed once per run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GateFlags {
    pub skip_prompt: bool,
    pub skip_autoconf: bool,
}

/// What the orchestrator does after the gate check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Skipped,
    Defaulting,
    Prompting,
}

impl GateFlags {
    /// Evaluate the gate from an explicit environment snapshot
    pub fn evaluate<L: HostLayout>(
        env: &EnvSnapshot,
        layout: &L,
        project_root: &Path,
        execution_root: &Path,
    ) -> Self {
        let non_interactive = layout
            .non_interactive_vars()
            .iter()
            .any(|name| env.is_set(name));
        let foreground = env.is_set(layout.foreground_scripts_var())
            && env.get(layout.foreground_scripts_var()) != Some("false");

        Self {
            skip_prompt: non_interactive || !foreground,
            skip_autoconf: env.is_set(layout.no_autoconf_var()) || project_root == execution_root,
        }
    }

    pub fn mode(&self) -> RunMode {
        if self.skip_autoconf {
            RunMode::Skipped
        } else if self.skip_prompt {
            RunMode::Defaulting
        } else {
            RunMode::Prompting
        }
    }
}
