// src/main.rs

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use kettle::installers::tokens::TokenValues;
use kettle::installers::{
    CommandRequest, ExitCodeOutcome, InstallDirection, InstallerCatalog, InstallerStrategy,
    InstallerType,
};
use kettle::manifest::PackageSpec;
use kettle::rules::{RuleEngine, RuleReport};
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "kettle")]
#[command(author, version, about = "Installer orchestration and package validation", long_about = None)]
struct Cli {
    /// Register additional installer profiles from a JSON file
    #[arg(long, global = true, value_name = "FILE")]
    profiles: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered installer profiles
    Profiles,
    /// Build installer command lines
    Args {
        #[command(subcommand)]
        action: ArgsAction,
    },
    /// Classify an installer exit code (exit status: 0 success, 2 reboot required, 3 installer error)
    ExitCode {
        /// Installer family (msi, nsis, innosetup, installshield, wise, custom, ...)
        installer: InstallerType,
        /// Raw exit code reported by the installer
        #[arg(allow_negative_numbers = true)]
        code: i64,
        /// Classify an uninstall instead of an install
        #[arg(long)]
        uninstall: bool,
    },
    /// Validate package manifests (exit status 1 if any report blocks)
    Validate {
        /// Manifest files (.nuspec)
        #[arg(required = true)]
        manifests: Vec<PathBuf>,
        /// Print reports as JSON
        #[arg(long)]
        json: bool,
        /// Rule identifier whose errors should not block (repeatable)
        #[arg(long = "suppress", value_name = "ID")]
        suppress: Vec<String>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ArgsAction {
    /// Build install arguments
    Install {
        /// Installer family
        installer: InstallerType,
        /// Include the log file fragment
        #[arg(long)]
        log_file: bool,
        /// Include the custom install location fragment
        #[arg(long)]
        custom_location: bool,
        /// Include the language fragment
        #[arg(long)]
        language: bool,
        /// Substitute an install token, e.g. INSTALL_LOCATION=C:\Tools (repeatable)
        #[arg(long = "token", value_name = "NAME=VALUE")]
        tokens: Vec<String>,
    },
    /// Build uninstall arguments
    Uninstall {
        /// Installer family
        installer: InstallerType,
        /// Substitute an install token (repeatable)
        #[arg(long = "token", value_name = "NAME=VALUE")]
        tokens: Vec<String>,
    },
}

/// One manifest's validation outcome for JSON output
#[derive(Serialize)]
struct ManifestReport<'a> {
    path: String,
    blocking: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a RuleReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Parse repeated `NAME=VALUE` token arguments
fn parse_tokens(assignments: &[String]) -> Result<TokenValues> {
    let mut values = TokenValues::new();
    for assignment in assignments {
        let (name, value) = TokenValues::parse_assignment(assignment)
            .ok_or_else(|| anyhow::anyhow!("Invalid token '{}', expected NAME=VALUE", assignment))?;
        values.set(&name, value);
    }
    Ok(values)
}

/// Process exit status for an exit-code classification
///
/// Status 1 stays reserved for kettle's own failures.
fn exit_status_for(outcome: ExitCodeOutcome) -> u8 {
    match outcome {
        ExitCodeOutcome::Success => 0,
        ExitCodeOutcome::SuccessRebootRequired => 2,
        ExitCodeOutcome::Error => 3,
    }
}

fn load_catalog(profiles: Option<&PathBuf>) -> Result<InstallerCatalog> {
    let mut catalog = InstallerCatalog::with_builtin_profiles();
    if let Some(path) = profiles {
        catalog.load_json(path)?;
    }
    Ok(catalog)
}

fn main() -> Result<ExitCode> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Profiles) => {
            let catalog = load_catalog(cli.profiles.as_ref())?;
            println!("Installer profiles:");
            for profile in catalog.profiles() {
                let mut codes: Vec<_> = profile.valid_install_exit_codes().iter().copied().collect();
                codes.sort_unstable();
                println!(
                    "  {:<14} {:<24} valid exit codes: {:?}",
                    profile.installer_type().as_str(),
                    profile.install_executable(),
                    codes
                );
            }
            println!("\nTotal: {} profile(s)", catalog.len());
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Args { action }) => {
            let catalog = load_catalog(cli.profiles.as_ref())?;
            match action {
                ArgsAction::Install {
                    installer,
                    log_file,
                    custom_location,
                    language,
                    tokens,
                } => {
                    let values = parse_tokens(&tokens)?;
                    let request = CommandRequest {
                        log_file,
                        custom_install_location: custom_location,
                        language_requested: language,
                    };
                    let command = catalog
                        .require(&installer)?
                        .install_command_with(&request, &values)?;
                    println!("{}", command);
                }
                ArgsAction::Uninstall { installer, tokens } => {
                    let values = parse_tokens(&tokens)?;
                    let command = catalog
                        .require(&installer)?
                        .uninstall_command_with(&values)?;
                    println!("{}", command);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::ExitCode {
            installer,
            code,
            uninstall,
        }) => {
            let catalog = load_catalog(cli.profiles.as_ref())?;
            let direction = if uninstall {
                InstallDirection::Uninstall
            } else {
                InstallDirection::Install
            };

            let outcome = catalog.require(&installer)?.classify_exit_code(direction, code);
            println!("{}", outcome);
            Ok(ExitCode::from(exit_status_for(outcome)))
        }
        Some(Commands::Validate {
            manifests,
            json,
            suppress,
        }) => {
            let engine = RuleEngine::with_builtin_rules();
            info!("Validating {} manifest(s)", manifests.len());

            // Manifests are independent; the engine is shared read-only
            let outcomes: Vec<_> = manifests
                .par_iter()
                .map(|path| {
                    let outcome = PackageSpec::from_file(path).map(|spec| engine.validate(&spec));
                    (path, outcome)
                })
                .collect();

            let mut any_blocking = false;
            let mut json_reports = Vec::new();

            for (path, outcome) in &outcomes {
                let blocking = match outcome {
                    Ok(report) => report.is_blocking_with(suppress.as_slice()),
                    Err(_) => true,
                };
                any_blocking |= blocking;
                debug!("{}: blocking={}", path.display(), blocking);

                if json {
                    json_reports.push(ManifestReport {
                        path: path.display().to_string(),
                        blocking,
                        report: outcome.as_ref().ok(),
                        error: outcome.as_ref().err().map(|e| e.to_string()),
                    });
                    continue;
                }

                println!("{}:", path.display());
                match outcome {
                    Ok(report) if report.is_empty() => println!("  no problems found"),
                    Ok(report) => {
                        for result in report {
                            println!("  {}", result.to_string().replace('\n', "\n  "));
                        }
                    }
                    Err(e) => println!("  {}", e),
                }
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&json_reports)?);
            }

            Ok(if any_blocking {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "kettle", &mut std::io::stdout());
            Ok(ExitCode::SUCCESS)
        }
        None => {
            // No command provided, show help
            println!("Kettle v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'kettle --help' for usage information");
            Ok(ExitCode::SUCCESS)
        }
    }
}
