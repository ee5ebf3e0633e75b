//! Rule execution with write-once file creation

use super::{FileContent, Rule};
use crate::error::{AutoconfError, Stage};
use colored::Colorize;
use std::fs::File;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;

/// What applying a single rule did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    CreatedDir(PathBuf),
    DirExists(PathBuf),
    WroteFile(PathBuf),
    /// Something already existed at the target, left untouched
    FileExists(PathBuf),
}

impl RuleOutcome {
    /// Whether the rule changed the filesystem
    pub fn is_change(&self) -> bool {
        matches!(self, RuleOutcome::CreatedDir(_) | RuleOutcome::WroteFile(_))
    }
}

/// Apply rules in order, stopping at the first failure.
/// Effects of rules applied before a failure are kept.
pub async fn apply_rules(rules: &[Rule]) -> Result<Vec<RuleOutcome>, AutoconfError> {
    let mut outcomes = Vec::with_capacity(rules.len());

    for rule in rules {
        let outcome = match rule {
            Rule::Mkdir { path } => ensure_dir(path).await?,
            Rule::PutFileOnce { path, content } => put_file_once(path, content).await?,
        };
        outcomes.push(outcome);
    }

    Ok(outcomes)
}

async fn exists(path: &Path) -> Result<bool, AutoconfError> {
    fs::try_exists(path)
        .await
        .map_err(|e| AutoconfError::fs("inspect", path, e))
}

async fn ensure_dir(path: &Path) -> Result<RuleOutcome, AutoconfError> {
    if exists(path).await? {
        return Ok(RuleOutcome::DirExists(path.to_path_buf()));
    }

    fs::create_dir_all(path)
        .await
        .map_err(|e| AutoconfError::fs("create directory", path, e))?;

    Ok(RuleOutcome::CreatedDir(path.to_path_buf()))
}

async fn put_file_once(path: &Path, content: &FileContent) -> Result<RuleOutcome, AutoconfError> {
    if exists(path).await? {
        return Ok(RuleOutcome::FileExists(path.to_path_buf()));
    }

    let encoded = content
        .encode()
        .map_err(AutoconfError::callback(Stage::Generate))?;
    let preview = content
        .preview()
        .map_err(AutoconfError::callback(Stage::Generate))?;

    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    println!();
    println!("{} {}", "create dir".cyan(), parent.display());
    fs::create_dir_all(parent)
        .await
        .map_err(|e| AutoconfError::fs("create directory", parent, e))?;

    println!("{} {}", "create file".cyan(), path.display());
    match content {
        FileContent::Empty => println!(),
        _ => {
            println!("{}", "```".dimmed());
            println!("{}", preview.trim_end());
            println!("{}", "```".dimmed());
        }
    }

    let dir = parent.to_path_buf();
    let target = path.to_path_buf();
    let written = tokio::task::spawn_blocking(move || {
        write_new_file(&dir, &target, |file| file.write_all(encoded.as_bytes()))
    })
    .await
    .map_err(|e| AutoconfError::fs("write file", path, std::io::Error::other(e)))??;

    if written {
        Ok(RuleOutcome::WroteFile(path.to_path_buf()))
    } else {
        Ok(RuleOutcome::FileExists(path.to_path_buf()))
    }
}

/// Fill a temporary file next to `path` and move it into place only if
/// nothing exists there yet. Returns `false` when something appeared at
/// `path` in the meantime. On any failure the temporary file is removed and
/// `path` is left untouched.
fn write_new_file<F>(dir: &Path, path: &Path, fill: F) -> Result<bool, AutoconfError>
where
    F: FnOnce(&mut File) -> std::io::Result<()>,
{
    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| AutoconfError::fs("create temporary file in", dir, e))?;

    fill(tmp.as_file_mut()).map_err(|e| AutoconfError::fs("write file", path, e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| AutoconfError::fs("write file", path, e))?;

    match tmp.persist_noclobber(path) {
        Ok(_) => Ok(true),
        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(AutoconfError::fs("create file", path, e.error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mkdir_is_recursive_and_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("config/foo/deep");

        let first = apply_rules(&[Rule::mkdir(&nested)]).await.unwrap();
        assert_eq!(first, vec![RuleOutcome::CreatedDir(nested.clone())]);
        assert!(nested.is_dir());

        let second = apply_rules(&[Rule::mkdir(&nested)]).await.unwrap();
        assert_eq!(second, vec![RuleOutcome::DirExists(nested)]);
    }

    #[tokio::test]
    async fn test_put_file_once_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("config/foo/settings.json");

        let outcomes = apply_rules(&[Rule::put_json(&file, json!({"port": 3000}))])
            .await
            .unwrap();

        assert_eq!(outcomes, vec![RuleOutcome::WroteFile(file.clone())]);
        assert_eq!(std::fs::read_to_string(&file).unwrap(), r#"{"port":3000}"#);
    }

    #[tokio::test]
    async fn test_existing_file_is_never_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("foo.yml");
        std::fs::write(&file, "x").unwrap();

        let rules = [
            Rule::put_yaml(&file, json!({"a": 1})),
            Rule::put_raw(&file, "replaced"),
            Rule::put_empty(&file),
        ];
        let outcomes = apply_rules(&rules).await.unwrap();

        assert!(outcomes.iter().all(|o| *o == RuleOutcome::FileExists(file.clone())));
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "x");
    }

    #[tokio::test]
    async fn test_rules_apply_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let res = dir.path().join("res/foo");
        let keep = res.join(".keep");

        let outcomes = apply_rules(&[Rule::mkdir(&res), Rule::put_empty(&keep)])
            .await
            .unwrap();

        assert_eq!(
            outcomes,
            vec![RuleOutcome::CreatedDir(res), RuleOutcome::WroteFile(keep.clone())]
        );
        assert_eq!(std::fs::read_to_string(&keep).unwrap(), "");
    }

    #[tokio::test]
    async fn test_failure_aborts_remaining_rules() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let applied = dir.path().join("first.txt");
        let never = dir.path().join("never.txt");

        let result = apply_rules(&[
            Rule::put_raw(&applied, "kept"),
            Rule::put_raw(blocker.join("inner.txt"), "nope"),
            Rule::put_raw(&never, "nope"),
        ])
        .await;

        assert!(matches!(result, Err(AutoconfError::Filesystem { .. })));
        assert_eq!(std::fs::read_to_string(&applied).unwrap(), "kept");
        assert!(!never.exists());
    }

    #[test]
    fn test_interrupted_write_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("big.txt");

        let result = write_new_file(dir.path(), &target, |file| {
            file.write_all(&[b'x'; 4096])?;
            Err(std::io::Error::new(ErrorKind::StorageFull, "no space left"))
        });

        assert!(matches!(result, Err(AutoconfError::Filesystem { .. })));
        assert!(!target.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_retry_after_interrupted_write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("config/foo.yml");
        std::fs::create_dir_all(target.parent().unwrap()).unwrap();

        let _ = write_new_file(target.parent().unwrap(), &target, |_| {
            Err(std::io::Error::other("interrupted"))
        });
        let outcomes = apply_rules(&[Rule::put_raw(&target, "port: 3000\n")])
            .await
            .unwrap();

        assert_eq!(outcomes, vec![RuleOutcome::WroteFile(target.clone())]);
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "port: 3000\n");
    }

    #[test]
    fn test_appeared_file_is_not_clobbered() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("foo.yml");

        let written = write_new_file(dir.path(), &target, |file| {
            std::fs::write(dir.path().join("foo.yml"), "operator")?;
            file.write_all(b"generated")
        })
        .unwrap();

        assert!(!written);
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "operator");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_is_change() {
        assert!(RuleOutcome::WroteFile(PathBuf::from("a")).is_change());
        assert!(!RuleOutcome::FileExists(PathBuf::from("a")).is_change());
    }
}
