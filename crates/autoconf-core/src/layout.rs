//! Host layout conventions
//!
//! This trait defines the interface a host package manager implements to tell
//! the engine where services, config and resources live in the invoking
//! project, and which environment variables carry the install-time signals.

use std::path::Path;

/// Directory-layout and environment conventions of the host package manager
///
/// Each host implements this trait to define:
/// - Project sub-directories for service code, config and resources
/// - File extensions for generated service files
/// - Environment variable names consumed by the gate
/// - The package manifest that names the module being installed
pub trait HostLayout {
    /// Directory (relative to the project root) holding service code
    fn services_dir(&self) -> &'static str;

    /// Directory (relative to the project root) holding service config
    fn config_dir(&self) -> &'static str;

    /// Directory (relative to the project root) holding service resources
    fn resource_dir(&self) -> &'static str;

    /// Extension of the service entry file, without the dot
    fn code_extension(&self) -> &'static str;

    /// Extension of the main service config file, without the dot
    fn config_extension(&self) -> &'static str;

    /// Variables whose presence disables interactive prompting
    fn non_interactive_vars(&self) -> &'static [&'static str];

    /// Variable that must be set (and not `false`) to allow prompting
    fn foreground_scripts_var(&self) -> &'static str;

    /// Variable whose presence disables autoconfiguration entirely
    fn no_autoconf_var(&self) -> &'static str;

    /// Variable holding the root of the project that triggered the install
    fn project_root_var(&self) -> &'static str;

    /// Package manifest file in the execution root
    fn package_manifest(&self) -> &'static str;

    /// Path of the package manifest inside `execution_root`
    fn package_manifest_path(&self, execution_root: &Path) -> std::path::PathBuf {
        execution_root.join(self.package_manifest())
    }
}

/// npm install-script conventions
#[derive(Debug, Clone, Copy, Default)]
pub struct NpmLayout;

impl HostLayout for NpmLayout {
    fn services_dir(&self) -> &'static str {
        "services"
    }

    fn config_dir(&self) -> &'static str {
        "config"
    }

    fn resource_dir(&self) -> &'static str {
        "res"
    }

    fn code_extension(&self) -> &'static str {
        "js"
    }

    fn config_extension(&self) -> &'static str {
        "yml"
    }

    fn non_interactive_vars(&self) -> &'static [&'static str] {
        &["NO_INTERACTIVE", "NO_PROMPT"]
    }

    fn foreground_scripts_var(&self) -> &'static str {
        "npm_config_foreground_scripts"
    }

    fn no_autoconf_var(&self) -> &'static str {
        "NO_AUTOCONF"
    }

    fn project_root_var(&self) -> &'static str {
        "INIT_CWD"
    }

    fn package_manifest(&self) -> &'static str {
        "package.json"
    }
}
