//! Error types for an autoconf run

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which user-supplied callback was running when a run failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Defaults,
    Prompts,
    Transform,
    Generate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Defaults => "default config producer",
            Stage::Prompts => "prompt producer",
            Stage::Transform => "answers transformer",
            Stage::Generate => "rule generator",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Error)]
pub enum AutoconfError {
    #[error("Service name is required")]
    MissingServiceName,

    #[error("Failed to collect answers: {0:#}")]
    Collector(anyhow::Error),

    #[error("Failed to {action} {}: {source}", .path.display())]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("The {stage} failed: {source:#}")]
    Callback { stage: Stage, source: anyhow::Error },
}

impl AutoconfError {
    pub(crate) fn fs(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            action,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn callback(stage: Stage) -> impl FnOnce(anyhow::Error) -> Self {
        move |source| Self::Callback { stage, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filesystem_error_names_path_and_action() {
        let err = AutoconfError::fs(
            "create file",
            "/tmp/app/config/foo.yml",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("create file"));
        assert!(msg.contains("/tmp/app/config/foo.yml"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn test_callback_error_names_stage() {
        let err = AutoconfError::callback(Stage::Generate)(anyhow::anyhow!("boom"));
        assert_eq!(err.to_string(), "The rule generator failed: boom");
    }
}
