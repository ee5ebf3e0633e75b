//! Service identity and the project paths derived from it

use crate::error::AutoconfError;
use crate::layout::HostLayout;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Which service is being configured, and by which installed module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceIdentity {
    pub service_name: String,
    pub module_name: String,
}

#[derive(Deserialize)]
struct PackageManifest {
    name: Option<String>,
}

impl ServiceIdentity {
    /// Resolve the identity for `service_name`, reading the module name from the
    /// package manifest in `execution_root`
    pub fn resolve<L: HostLayout>(
        service_name: &str,
        layout: &L,
        execution_root: &Path,
    ) -> Result<Self, AutoconfError> {
        let service_name = service_name.trim();
        if service_name.is_empty() {
            return Err(AutoconfError::MissingServiceName);
        }

        Ok(Self {
            service_name: service_name.to_string(),
            module_name: module_name(layout, execution_root),
        })
    }
}

/// Name from the package manifest, or the directory name when there is none
fn module_name<L: HostLayout>(layout: &L, execution_root: &Path) -> String {
    let from_manifest = std::fs::read_to_string(layout.package_manifest_path(execution_root))
        .ok()
        .and_then(|content| serde_json::from_str::<PackageManifest>(&content).ok())
        .and_then(|manifest| manifest.name)
        .filter(|name| !name.is_empty());

    from_manifest.unwrap_or_else(|| {
        execution_root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    })
}

/// Fixed locations inside the invoking project for one service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSet {
    pub project_root: PathBuf,
    pub root_service_dir: PathBuf,
    pub root_config_dir: PathBuf,
    pub root_resource_dir: PathBuf,
    pub service_code_file: PathBuf,
    pub service_config_dir: PathBuf,
    pub service_config_file: PathBuf,
    pub service_resource_dir: PathBuf,
}

impl PathSet {
    pub fn new<L: HostLayout>(layout: &L, project_root: &Path, service_name: &str) -> Self {
        let root_service_dir = project_root.join(layout.services_dir());
        let root_config_dir = project_root.join(layout.config_dir());
        let root_resource_dir = project_root.join(layout.resource_dir());

        Self {
            project_root: project_root.to_path_buf(),
            service_code_file: root_service_dir
                .join(format!("{}.{}", service_name, layout.code_extension())),
            service_config_dir: root_config_dir.join(service_name),
            service_config_file: root_config_dir
                .join(format!("{}.{}", service_name, layout.config_extension())),
            service_resource_dir: root_resource_dir.join(service_name),
            root_service_dir,
            root_config_dir,
            root_resource_dir,
        }
    }

    /// Named entries, used for display and placeholder rendering
    pub fn entries(&self) -> [(&'static str, &Path); 8] {
        [
            ("project_root", self.project_root.as_path()),
            ("root_service_dir", self.root_service_dir.as_path()),
            ("root_config_dir", self.root_config_dir.as_path()),
            ("root_resource_dir", self.root_resource_dir.as_path()),
            ("service_code_file", self.service_code_file.as_path()),
            ("service_config_dir", self.service_config_dir.as_path()),
            ("service_config_file", self.service_config_file.as_path()),
            ("service_resource_dir", self.service_resource_dir.as_path()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::NpmLayout;

    #[test]
    fn test_paths_follow_layout() {
        let paths = PathSet::new(&NpmLayout, Path::new("/work/app"), "foo");
        assert_eq!(paths.root_config_dir, Path::new("/work/app/config"));
        assert_eq!(paths.service_config_dir, Path::new("/work/app/config/foo"));
        assert_eq!(
            paths.service_config_file,
            Path::new("/work/app/config/foo.yml")
        );
        assert_eq!(paths.service_code_file, Path::new("/work/app/services/foo.js"));
        assert_eq!(paths.service_resource_dir, Path::new("/work/app/res/foo"));
    }

    #[test]
    fn test_missing_service_name_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["", "   "] {
            let err = ServiceIdentity::resolve(name, &NpmLayout, dir.path()).unwrap_err();
            assert!(matches!(err, AutoconfError::MissingServiceName));
        }
    }

    #[test]
    fn test_module_name_from_package_manifest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("package.json"),
            r#"{"name": "@backkit/koa", "version": "1.0.0"}"#,
        )
        .unwrap();

        let identity = ServiceIdentity::resolve("koa", &NpmLayout, dir.path()).unwrap();
        assert_eq!(identity.service_name, "koa");
        assert_eq!(identity.module_name, "@backkit/koa");
    }

    #[test]
    fn test_module_name_falls_back_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let exec = dir.path().join("svc-mod");
        std::fs::create_dir(&exec).unwrap();

        let identity = ServiceIdentity::resolve("svc", &NpmLayout, &exec).unwrap();
        assert_eq!(identity.module_name, "svc-mod");
    }
}
