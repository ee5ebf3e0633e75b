//! autoconf CLI - first-run configuration of installed services

use anyhow::{Context, Result};
use autoconf_core::tui::ClackCollector;
use autoconf_core::{Autoconf, AutoconfManifest, EnvSnapshot, GateFlags, NpmLayout, RunOutcome};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "autoconf")]
#[command(about = "First-run configuration of installed services")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Configure a service from a manifest file
    Run(RunArgs),
    /// Show the paths and gate decisions for a service
    Paths(PathsArgs),
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Manifest describing defaults, prompts and rules
    #[arg(default_value = "autoconf.yaml")]
    pub manifest: PathBuf,

    /// Override the service name from the manifest
    #[arg(short, long)]
    pub service: Option<String>,

    /// Use defaults without prompting (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,

    /// Exit with a non-zero status when configuration fails
    #[arg(long)]
    pub strict: bool,
}

#[derive(Parser, Debug)]
pub struct PathsArgs {
    /// Service name
    pub service: String,
}

async fn run(args: RunArgs) -> Result<()> {
    let mut manifest = AutoconfManifest::load(&args.manifest)?;
    if let Some(service) = args.service {
        manifest.service = service;
    }

    let execution_root = std::env::current_dir().context("Failed to read current directory")?;
    let mut autoconf =
        manifest.into_autoconf(&EnvSnapshot::capture(), &execution_root, &NpmLayout)?;
    if args.yes {
        let flags = GateFlags {
            skip_prompt: true,
            ..autoconf.flags()
        };
        autoconf = autoconf.with_gate_flags(flags);
    }

    let mut collector =
        ClackCollector::with_intro(format!("Configuring {}", autoconf.service_name()));
    match autoconf.run(&mut collector).await {
        Ok(RunOutcome::Completed { applied, .. }) => {
            let changed = applied.iter().filter(|o| o.is_change()).count();
            println!(
                "{} {} of {} rule(s) applied",
                "Done:".green().bold(),
                changed,
                applied.len()
            );
            Ok(())
        }
        Ok(RunOutcome::Skipped) => Ok(()),
        // already reported by the run itself
        Err(e) if args.strict => Err(e.into()),
        Err(_) => Ok(()),
    }
}

fn paths(args: PathsArgs) -> Result<()> {
    let autoconf = Autoconf::new(&args.service)?;

    println!(
        "{}",
        format!("{} ({})", autoconf.service_name(), autoconf.module_name())
            .cyan()
            .bold()
    );
    println!();
    for (name, path) in autoconf.paths().entries() {
        println!("  {:<22} {}", name.dimmed(), path.display());
    }
    println!();

    let flags = autoconf.flags();
    println!("  {:<22} {}", "skip_prompt".dimmed(), flags.skip_prompt);
    println!("  {:<22} {}", "skip_autoconf".dimmed(), flags.skip_autoconf);

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();

    let result = match args.command {
        Command::Run(run_args) => run(run_args).await,
        Command::Paths(paths_args) => paths(paths_args),
    };

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_run_defaults_to_local_manifest() {
        let args = Args::parse_from(["autoconf", "run"]);
        let Command::Run(run_args) = args.command else {
            panic!("expected run");
        };
        assert_eq!(run_args.manifest, PathBuf::from("autoconf.yaml"));
        assert!(!run_args.yes && !run_args.strict);
    }

    #[test]
    fn test_run_flags() {
        let args = Args::parse_from([
            "autoconf", "run", "svc.yaml", "-s", "koa", "--yes", "--strict",
        ]);
        let Command::Run(run_args) = args.command else {
            panic!("expected run");
        };
        assert_eq!(run_args.manifest, PathBuf::from("svc.yaml"));
        assert_eq!(run_args.service.as_deref(), Some("koa"));
        assert!(run_args.yes && run_args.strict);
    }

    #[tokio::test]
    async fn test_missing_manifest_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(RunArgs {
            manifest: dir.path().join("absent.yaml"),
            service: None,
            yes: true,
            strict: false,
        })
        .await;
        assert!(result.unwrap_err().to_string().contains("absent.yaml"));
    }
}
