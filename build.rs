// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn installer_arg() -> Arg {
    Arg::new("installer")
        .required(true)
        .help("Installer family (msi, nsis, innosetup, installshield, wise, custom, ...)")
}

fn token_arg() -> Arg {
    Arg::new("token")
        .long("token")
        .value_name("NAME=VALUE")
        .action(ArgAction::Append)
        .help("Substitute an install token (repeatable)")
}

fn build_cli() -> Command {
    Command::new("kettle")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Kettle Contributors")
        .about("Installer orchestration and package validation")
        .subcommand_required(false)
        .arg(
            Arg::new("profiles")
                .long("profiles")
                .value_name("FILE")
                .global(true)
                .help("Register additional installer profiles from a JSON file"),
        )
        .subcommand(Command::new("profiles").about("List registered installer profiles"))
        .subcommand(
            Command::new("args")
                .about("Build installer command lines")
                .subcommand(
                    Command::new("install")
                        .about("Build install arguments")
                        .arg(installer_arg())
                        .arg(
                            Arg::new("log_file")
                                .long("log-file")
                                .action(ArgAction::SetTrue)
                                .help("Include the log file fragment"),
                        )
                        .arg(
                            Arg::new("custom_location")
                                .long("custom-location")
                                .action(ArgAction::SetTrue)
                                .help("Include the custom install location fragment"),
                        )
                        .arg(
                            Arg::new("language")
                                .long("language")
                                .action(ArgAction::SetTrue)
                                .help("Include the language fragment"),
                        )
                        .arg(token_arg()),
                )
                .subcommand(
                    Command::new("uninstall")
                        .about("Build uninstall arguments")
                        .arg(installer_arg())
                        .arg(token_arg()),
                ),
        )
        .subcommand(
            Command::new("exit-code")
                .about("Classify an installer exit code (exit status: 0 success, 2 reboot required, 3 installer error)")
                .arg(installer_arg())
                .arg(
                    Arg::new("code")
                        .required(true)
                        .allow_negative_numbers(true)
                        .help("Raw exit code reported by the installer"),
                )
                .arg(
                    Arg::new("uninstall")
                        .long("uninstall")
                        .action(ArgAction::SetTrue)
                        .help("Classify an uninstall instead of an install"),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Validate package manifests (exit status 1 if any report blocks)")
                .arg(
                    Arg::new("manifests")
                        .required(true)
                        .num_args(1..)
                        .help("Manifest files (.nuspec)"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print reports as JSON"),
                )
                .arg(
                    Arg::new("suppress")
                        .long("suppress")
                        .value_name("ID")
                        .action(ArgAction::Append)
                        .help("Rule identifier whose errors should not block (repeatable)"),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "elvish", "fish", "powershell", "zsh"])
                        .help("Shell type"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory
    let out_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).expect("Failed to create man directory");

    // Generate main man page
    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();
    man.render(&mut buffer)
        .expect("Failed to render man page");

    let man_path = man_dir.join("kettle.1");
    fs::write(&man_path, buffer).expect("Failed to write man page");
}
