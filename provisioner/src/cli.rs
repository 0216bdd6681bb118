//! Command-line interface.
//!
//! Subcommands mirror the console workflow: `create` and `clean` accept
//! an optional list of profile keys (none means the whole catalogue),
//! `list` shows what the catalogue offers, and `config` prints the
//! connection settings with the password masked.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use profile_catalog::Catalog;

use crate::engine::ProvisioningEngine;
use crate::settings::ConnectionSettings;

/// `provisioner` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "provisioner",
    about = "Create, seed, and drop PostgreSQL teaching databases",
    version
)]
pub struct Cli {
    /// Path to a JSON connection settings file. Defaults to
    /// `postgres.json` in the working directory when present.
    #[arg(long, value_name = "path", global = true)]
    pub settings: Option<PathBuf>,

    /// Root directory holding per-profile fixture subdirectories.
    #[arg(long, value_name = "dir", default_value = "fixtures", global = true)]
    pub fixtures: PathBuf,

    /// Emit the report as JSON instead of a text summary.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create and seed the given profiles (all profiles when none given).
    Create {
        /// Profile keys to provision.
        profiles: Vec<String>,
    },
    /// Drop the given profiles' databases (all profiles when none given).
    Clean {
        /// Profile keys to clean.
        profiles: Vec<String>,
    },
    /// List the available profiles.
    List,
    /// Show the connection settings with the password masked.
    Config,
}

/// Run a parsed command to completion.
///
/// # Errors
///
/// Returns an error for unusable settings files, unknown profile keys,
/// and report serialisation failures. Per-record and per-profile
/// failures are part of the report and map to the exit code instead.
pub fn run(cli: &Cli) -> Result<ExitCode> {
    let catalog = Catalog::builtin();

    match &cli.command {
        Command::List => {
            for profile in catalog.profiles() {
                println!("{}: {}", profile.key(), profile.description());
            }
            println!("\n{} profiles available", catalog.profiles().len());
            Ok(ExitCode::SUCCESS)
        }
        Command::Config => {
            let settings = load_settings(cli)?;
            println!("{}", settings.display_safe());
            Ok(ExitCode::SUCCESS)
        }
        Command::Create { profiles } => {
            let settings = load_settings(cli)?;
            let engine = ProvisioningEngine::new(settings.clone(), cli.fixtures.clone());
            let report = engine.provision(&catalog, profiles)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report.render(&settings));
            }
            Ok(exit_code(report.all_succeeded()))
        }
        Command::Clean { profiles } => {
            let settings = load_settings(cli)?;
            let engine = ProvisioningEngine::new(settings, cli.fixtures.clone());
            let report = engine.clean(&catalog, profiles)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report.render());
            }
            Ok(exit_code(report.all_succeeded()))
        }
    }
}

/// An explicitly supplied settings file must parse; the conventional
/// default file may be absent, falling back to defaults.
fn load_settings(cli: &Cli) -> Result<ConnectionSettings> {
    match &cli.settings {
        Some(path) => Ok(ConnectionSettings::from_file(path)?),
        None => Ok(ConnectionSettings::load_or_default(Path::new(
            ConnectionSettings::DEFAULT_FILE,
        ))),
    }
}

const fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("arguments parse")
    }

    #[test]
    fn create_without_keys_selects_the_whole_catalogue() {
        let cli = parse(&["provisioner", "create"]);

        match cli.command {
            Command::Create { profiles } => assert!(profiles.is_empty()),
            other => panic!("expected create, got {other:?}"),
        }
    }

    #[test]
    fn create_accepts_profile_keys() {
        let cli = parse(&["provisioner", "create", "games_easy", "school_world"]);

        match cli.command {
            Command::Create { profiles } => {
                assert_eq!(profiles, vec!["games_easy", "school_world"]);
            }
            other => panic!("expected create, got {other:?}"),
        }
    }

    #[test]
    fn global_flags_apply_after_the_subcommand() {
        let cli = parse(&[
            "provisioner",
            "clean",
            "--json",
            "--settings",
            "conn.json",
            "--fixtures",
            "seed-data",
        ]);

        assert!(cli.json);
        assert_eq!(cli.settings.as_deref(), Some(Path::new("conn.json")));
        assert_eq!(cli.fixtures, PathBuf::from("seed-data"));
        assert!(matches!(cli.command, Command::Clean { .. }));
    }

    #[test]
    fn a_subcommand_is_required() {
        assert!(Cli::try_parse_from(["provisioner"]).is_err());
    }

    #[test]
    fn explicit_settings_path_must_exist() {
        let cli = parse(&["provisioner", "--settings", "/definitely/absent.json", "config"]);

        assert!(load_settings(&cli).is_err());
    }
}
