// src/installers/mod.rs

//! Installer technology support for Kettle
//!
//! Each installer family (MSI, NSIS, Inno Setup, ...) is described by an
//! immutable `InstallerProfile`: its executables, silent switches, optional
//! argument templates and the exit codes it reports on success. The
//! `InstallerStrategy` trait turns a profile plus a `CommandRequest` into
//! argument strings and classifies exit codes.

pub mod args;
pub mod builtin;
pub mod catalog;
pub mod exit_codes;
pub mod tokens;
pub mod traits;

pub use args::{ArgumentComposer, FlagTemplate, QuoteStyle};
pub use catalog::InstallerCatalog;
pub use exit_codes::ExitCodeOutcome;
pub use traits::InstallerStrategy;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Installer family tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InstallerType {
    Msi,
    Nsis,
    InnoSetup,
    InstallShield,
    Wise,
    Custom,
    /// A family registered at startup that Kettle has no built-in profile for
    Other(String),
}

impl InstallerType {
    pub fn as_str(&self) -> &str {
        match self {
            InstallerType::Msi => "msi",
            InstallerType::Nsis => "nsis",
            InstallerType::InnoSetup => "innosetup",
            InstallerType::InstallShield => "installshield",
            InstallerType::Wise => "wise",
            InstallerType::Custom => "custom",
            InstallerType::Other(name) => name,
        }
    }
}

impl FromStr for InstallerType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Ok(match normalized.as_str() {
            "msi" => InstallerType::Msi,
            "nsis" => InstallerType::Nsis,
            "innosetup" | "inno" => InstallerType::InnoSetup,
            "installshield" => InstallerType::InstallShield,
            "wise" => InstallerType::Wise,
            "custom" => InstallerType::Custom,
            _ => InstallerType::Other(normalized),
        })
    }
}

impl From<String> for InstallerType {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(t) => t,
            Err(never) => match never {},
        }
    }
}

impl From<InstallerType> for String {
    fn from(t: InstallerType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for InstallerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which way the installer is being run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstallDirection {
    Install,
    Uninstall,
}

impl fmt::Display for InstallDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallDirection::Install => f.write_str("install"),
            InstallDirection::Uninstall => f.write_str("uninstall"),
        }
    }
}

/// Optional fragments to include when building install arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommandRequest {
    pub log_file: bool,
    pub custom_install_location: bool,
    pub language_requested: bool,
}

impl CommandRequest {
    /// Request every optional fragment
    pub fn all() -> Self {
        Self {
            log_file: true,
            custom_install_location: true,
            language_requested: true,
        }
    }
}

/// Executable plus composed arguments, ready for the process runner
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallerCommand {
    pub executable: String,
    pub arguments: String,
}

/// Renders a single command line; an executable path with spaces or quotes
/// is wrapped in double quotes.
impl fmt::Display for InstallerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let executable = if self
            .executable
            .chars()
            .any(|c| c.is_whitespace() || c == '"')
        {
            QuoteStyle::Double.quote(&self.executable)
        } else {
            self.executable.clone()
        };

        if self.arguments.is_empty() {
            write!(f, "{}", executable)
        } else {
            write!(f, "{} {}", executable, self.arguments)
        }
    }
}

/// Command syntax and exit-code conventions of one installer family
///
/// Immutable once built. Both exit-code sets always contain 0.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "ProfileDefinition")]
pub struct InstallerProfile {
    installer_type: InstallerType,
    install_executable: String,
    silent_install: String,
    no_reboot: String,
    log_file: FlagTemplate,
    custom_install_location: FlagTemplate,
    language: FlagTemplate,
    other_install_options: String,
    uninstall_executable: String,
    silent_uninstall: String,
    other_uninstall_options: String,
    valid_install_exit_codes: HashSet<i64>,
    valid_uninstall_exit_codes: HashSet<i64>,
    quote: QuoteStyle,
}

impl InstallerProfile {
    /// Start building a profile for the given family
    pub fn builder(installer_type: InstallerType) -> ProfileBuilder {
        ProfileBuilder::new(installer_type)
    }

    pub fn installer_type(&self) -> &InstallerType {
        &self.installer_type
    }

    pub fn install_executable(&self) -> &str {
        &self.install_executable
    }

    pub fn silent_install(&self) -> &str {
        &self.silent_install
    }

    pub fn no_reboot(&self) -> &str {
        &self.no_reboot
    }

    pub fn log_file(&self) -> &FlagTemplate {
        &self.log_file
    }

    pub fn custom_install_location(&self) -> &FlagTemplate {
        &self.custom_install_location
    }

    pub fn language(&self) -> &FlagTemplate {
        &self.language
    }

    pub fn other_install_options(&self) -> &str {
        &self.other_install_options
    }

    pub fn uninstall_executable(&self) -> &str {
        &self.uninstall_executable
    }

    pub fn silent_uninstall(&self) -> &str {
        &self.silent_uninstall
    }

    pub fn other_uninstall_options(&self) -> &str {
        &self.other_uninstall_options
    }

    pub fn quote_style(&self) -> QuoteStyle {
        self.quote
    }

    pub fn valid_install_exit_codes(&self) -> &HashSet<i64> {
        &self.valid_install_exit_codes
    }

    pub fn valid_uninstall_exit_codes(&self) -> &HashSet<i64> {
        &self.valid_uninstall_exit_codes
    }

    /// Valid exit codes for the given direction
    pub fn valid_exit_codes(&self, direction: InstallDirection) -> &HashSet<i64> {
        match direction {
            InstallDirection::Install => &self.valid_install_exit_codes,
            InstallDirection::Uninstall => &self.valid_uninstall_exit_codes,
        }
    }
}

/// Builder for `InstallerProfile`
#[derive(Debug, Clone)]
pub struct ProfileBuilder {
    profile: InstallerProfile,
}

impl ProfileBuilder {
    fn new(installer_type: InstallerType) -> Self {
        Self {
            profile: InstallerProfile {
                installer_type,
                install_executable: String::new(),
                silent_install: String::new(),
                no_reboot: String::new(),
                log_file: FlagTemplate::default(),
                custom_install_location: FlagTemplate::default(),
                language: FlagTemplate::default(),
                other_install_options: String::new(),
                uninstall_executable: String::new(),
                silent_uninstall: String::new(),
                other_uninstall_options: String::new(),
                valid_install_exit_codes: HashSet::new(),
                valid_uninstall_exit_codes: HashSet::new(),
                quote: QuoteStyle::default(),
            },
        }
    }

    pub fn install_executable(mut self, executable: impl Into<String>) -> Self {
        self.profile.install_executable = executable.into();
        self
    }

    pub fn silent_install(mut self, switches: impl Into<String>) -> Self {
        self.profile.silent_install = switches.into();
        self
    }

    pub fn no_reboot(mut self, switches: impl Into<String>) -> Self {
        self.profile.no_reboot = switches.into();
        self
    }

    pub fn log_file(mut self, template: FlagTemplate) -> Self {
        self.profile.log_file = template;
        self
    }

    pub fn custom_install_location(mut self, template: FlagTemplate) -> Self {
        self.profile.custom_install_location = template;
        self
    }

    pub fn language(mut self, template: FlagTemplate) -> Self {
        self.profile.language = template;
        self
    }

    pub fn other_install_options(mut self, options: impl Into<String>) -> Self {
        self.profile.other_install_options = options.into();
        self
    }

    pub fn uninstall_executable(mut self, executable: impl Into<String>) -> Self {
        self.profile.uninstall_executable = executable.into();
        self
    }

    pub fn silent_uninstall(mut self, switches: impl Into<String>) -> Self {
        self.profile.silent_uninstall = switches.into();
        self
    }

    pub fn other_uninstall_options(mut self, options: impl Into<String>) -> Self {
        self.profile.other_uninstall_options = options.into();
        self
    }

    pub fn valid_install_exit_codes(mut self, codes: impl IntoIterator<Item = i64>) -> Self {
        self.profile.valid_install_exit_codes.extend(codes);
        self
    }

    pub fn valid_uninstall_exit_codes(mut self, codes: impl IntoIterator<Item = i64>) -> Self {
        self.profile.valid_uninstall_exit_codes.extend(codes);
        self
    }

    pub fn quote_style(mut self, quote: QuoteStyle) -> Self {
        self.profile.quote = quote;
        self
    }

    /// Finish the profile; 0 is added to both exit-code sets
    pub fn build(mut self) -> InstallerProfile {
        self.profile.valid_install_exit_codes.insert(0);
        self.profile.valid_uninstall_exit_codes.insert(0);
        self.profile
    }
}

/// JSON shape of a profile definition
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileDefinition {
    installer_type: InstallerType,
    #[serde(default)]
    install_executable: String,
    #[serde(default)]
    silent_install: String,
    #[serde(default)]
    no_reboot: String,
    #[serde(default)]
    log_file: FlagTemplate,
    #[serde(default)]
    custom_install_location: FlagTemplate,
    #[serde(default)]
    language: FlagTemplate,
    #[serde(default)]
    other_install_options: String,
    #[serde(default)]
    uninstall_executable: String,
    #[serde(default)]
    silent_uninstall: String,
    #[serde(default)]
    other_uninstall_options: String,
    #[serde(default)]
    valid_install_exit_codes: Vec<i64>,
    #[serde(default)]
    valid_uninstall_exit_codes: Vec<i64>,
    #[serde(default)]
    quote: QuoteStyle,
}

impl From<ProfileDefinition> for InstallerProfile {
    fn from(def: ProfileDefinition) -> Self {
        InstallerProfile::builder(def.installer_type)
            .install_executable(def.install_executable)
            .silent_install(def.silent_install)
            .no_reboot(def.no_reboot)
            .log_file(def.log_file)
            .custom_install_location(def.custom_install_location)
            .language(def.language)
            .other_install_options(def.other_install_options)
            .uninstall_executable(def.uninstall_executable)
            .silent_uninstall(def.silent_uninstall)
            .other_uninstall_options(def.other_uninstall_options)
            .valid_install_exit_codes(def.valid_install_exit_codes)
            .valid_uninstall_exit_codes(def.valid_uninstall_exit_codes)
            .quote_style(def.quote)
            .build()
    }
}
