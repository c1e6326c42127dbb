// src/installers/traits.rs

//! Common trait for building installer invocations

use super::args::ArgumentComposer;
use super::exit_codes::{self, ExitCodeOutcome};
use super::tokens::{self, TokenValues};
use super::{CommandRequest, InstallDirection, InstallerCommand, InstallerProfile};
use crate::error::{Error, Result};
use tracing::debug;

/// Turns an installer profile into command lines and classifies exit codes
///
/// Every method has a default built on `profile()`; an installer that needs
/// a different composition overrides only what differs. All methods are
/// pure and deterministic.
pub trait InstallerStrategy {
    /// The profile this strategy composes from
    fn profile(&self) -> &InstallerProfile;

    /// Build install arguments
    ///
    /// Fragment order is fixed: silent switches, log file, custom install
    /// location, language, trailing options. Some installers honour the
    /// first of two conflicting switches, so the order must not change.
    /// Install tokens are left as placeholders.
    fn build_install_arguments(&self, request: &CommandRequest) -> Result<String> {
        self.build_install_arguments_with(request, &TokenValues::new())
    }

    /// Build install arguments, resolving install tokens before quoting
    fn build_install_arguments_with(
        &self,
        request: &CommandRequest,
        values: &TokenValues,
    ) -> Result<String> {
        let profile = self.profile();
        if profile.install_executable().trim().is_empty() {
            return Err(Error::configuration(format!(
                "{} installer profile has no install executable",
                profile.installer_type()
            )));
        }

        let mut composer = ArgumentComposer::new(profile.quote_style()).with_tokens(values);
        composer.verbatim(profile.silent_install());

        if request.log_file && !profile.log_file().is_empty() {
            composer.template(profile.log_file());
        }
        if request.custom_install_location {
            composer.template(profile.custom_install_location());
        }
        if request.language_requested && !profile.language().is_empty() {
            composer.template(profile.language());
        }

        composer.verbatim(profile.other_install_options());

        let arguments = composer.finish();
        debug!(
            "Built {} install arguments: {}",
            profile.installer_type(),
            arguments
        );
        Ok(arguments)
    }

    /// Build uninstall arguments: silent switches, no-reboot switch, trailing options
    ///
    /// Works without an uninstall executable; callers that look the
    /// uninstaller up elsewhere only need the switches.
    fn build_uninstall_arguments(&self) -> Result<String> {
        self.build_uninstall_arguments_with(&TokenValues::new())
    }

    /// Build uninstall arguments, resolving install tokens
    fn build_uninstall_arguments_with(&self, values: &TokenValues) -> Result<String> {
        let profile = self.profile();
        let mut composer = ArgumentComposer::new(profile.quote_style()).with_tokens(values);
        composer
            .verbatim(profile.silent_uninstall())
            .verbatim(profile.no_reboot())
            .verbatim(profile.other_uninstall_options());

        let arguments = composer.finish();
        debug!(
            "Built {} uninstall arguments: {}",
            profile.installer_type(),
            arguments
        );
        Ok(arguments)
    }

    /// Classify a raw exit code; never fails
    fn classify_exit_code(&self, direction: InstallDirection, code: i64) -> ExitCodeOutcome {
        exit_codes::classify(self.profile(), direction, code)
    }

    /// Executable and install arguments for the process runner
    fn install_command(&self, request: &CommandRequest) -> Result<InstallerCommand> {
        self.install_command_with(request, &TokenValues::new())
    }

    /// Like `install_command`, with install tokens resolved
    fn install_command_with(
        &self,
        request: &CommandRequest,
        values: &TokenValues,
    ) -> Result<InstallerCommand> {
        let arguments = self.build_install_arguments_with(request, values)?;
        Ok(InstallerCommand {
            executable: tokens::replace_tokens(self.profile().install_executable(), values),
            arguments,
        })
    }

    /// Executable and uninstall arguments for the process runner
    fn uninstall_command(&self) -> Result<InstallerCommand> {
        self.uninstall_command_with(&TokenValues::new())
    }

    /// Like `uninstall_command`, with install tokens resolved
    ///
    /// Fails if the profile has no uninstall executable.
    fn uninstall_command_with(&self, values: &TokenValues) -> Result<InstallerCommand> {
        let profile = self.profile();
        if profile.uninstall_executable().trim().is_empty() {
            return Err(Error::configuration(format!(
                "{} installer profile has no uninstall executable",
                profile.installer_type()
            )));
        }

        let arguments = self.build_uninstall_arguments_with(values)?;
        Ok(InstallerCommand {
            executable: tokens::replace_tokens(profile.uninstall_executable(), values),
            arguments,
        })
    }
}

impl InstallerStrategy for InstallerProfile {
    fn profile(&self) -> &InstallerProfile {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installers::{FlagTemplate, InstallerType};

    fn full_profile() -> InstallerProfile {
        InstallerProfile::builder(InstallerType::InnoSetup)
            .install_executable("setup.exe")
            .silent_install("/VERYSILENT /NORESTART")
            .log_file(FlagTemplate::attached("/LOG=", "C:\\pkg\\install.log"))
            .custom_install_location(FlagTemplate::attached("/DIR=", "C:\\Apps"))
            .language(FlagTemplate::attached("/LANG=", "german"))
            .other_install_options("/NOICONS")
            .uninstall_executable("unins000.exe")
            .silent_uninstall("/VERYSILENT")
            .no_reboot("/NORESTART")
            .other_uninstall_options("/SUPPRESSMSGBOXES")
            .build()
    }

    #[test]
    fn test_fragment_order() {
        let args = full_profile()
            .build_install_arguments(&CommandRequest::all())
            .unwrap();
        assert_eq!(
            args,
            "/VERYSILENT /NORESTART /LOG=\"C:\\pkg\\install.log\" /DIR=\"C:\\Apps\" /LANG=german /NOICONS"
        );
    }

    #[test]
    fn test_unrequested_fragments_are_omitted() {
        let args = full_profile()
            .build_install_arguments(&CommandRequest::default())
            .unwrap();
        assert_eq!(args, "/VERYSILENT /NORESTART /NOICONS");
    }

    #[test]
    fn test_empty_log_template_is_skipped() {
        let profile = InstallerProfile::builder(InstallerType::Nsis)
            .install_executable("setup.exe")
            .silent_install("/S")
            .build();
        let request = CommandRequest {
            log_file: true,
            ..Default::default()
        };
        assert_eq!(profile.build_install_arguments(&request).unwrap(), "/S");
    }

    #[test]
    fn test_missing_install_executable_is_configuration_error() {
        let profile = InstallerProfile::builder(InstallerType::Custom)
            .silent_install("/S")
            .build();
        let result = profile.build_install_arguments(&CommandRequest::default());
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_uninstall_arguments() {
        let profile = full_profile();
        assert_eq!(
            profile.build_uninstall_arguments().unwrap(),
            "/VERYSILENT /NORESTART /SUPPRESSMSGBOXES"
        );

        let command = profile.uninstall_command().unwrap();
        assert_eq!(command.executable, "unins000.exe");
        assert_eq!(
            command.to_string(),
            "unins000.exe /VERYSILENT /NORESTART /SUPPRESSMSGBOXES"
        );
    }

    #[test]
    fn test_missing_uninstall_executable_only_fails_the_command() {
        let profile = InstallerProfile::builder(InstallerType::Nsis)
            .install_executable("setup.exe")
            .silent_uninstall("/S")
            .build();
        assert_eq!(profile.build_uninstall_arguments().unwrap(), "/S");
        assert!(matches!(
            profile.uninstall_command(),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_install_command_resolves_and_quotes_tokens() {
        let profile = InstallerProfile::builder(InstallerType::InnoSetup)
            .install_executable("{INSTALLER_LOCATION}")
            .silent_install("/VERYSILENT")
            .custom_install_location(FlagTemplate::attached("/DIR=", "{INSTALL_LOCATION}"))
            .build();
        let request = CommandRequest {
            custom_install_location: true,
            ..Default::default()
        };
        let mut values = TokenValues::new();
        values
            .set("INSTALLER_LOCATION", "C:\\Program Files\\Cache\\setup.exe")
            .set("INSTALL_LOCATION", "D:\\Apps\\");

        let command = profile.install_command_with(&request, &values).unwrap();
        assert_eq!(command.executable, "C:\\Program Files\\Cache\\setup.exe");
        assert_eq!(command.arguments, "/VERYSILENT /DIR=\"D:\\Apps\\\\\"");
        assert_eq!(
            command.to_string(),
            "\"C:\\Program Files\\Cache\\setup.exe\" /VERYSILENT /DIR=\"D:\\Apps\\\\\""
        );
    }
}
