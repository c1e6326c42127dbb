// src/installers/builtin.rs

//! Profiles for the installer families Kettle knows out of the box

use super::args::FlagTemplate;
use super::tokens::{INSTALL_LOCATION, INSTALLER_LOCATION, LANGUAGE, UNINSTALLER_LOCATION};
use super::{InstallerProfile, InstallerType};
use crate::installers::exit_codes::{REBOOT_INITIATED, REBOOT_REQUIRED};

/// ERROR_UNKNOWN_PRODUCT: uninstalling something that is already gone
const MSI_UNKNOWN_PRODUCT: i64 = 1605;

/// ERROR_PRODUCT_UNINSTALLED
const MSI_PRODUCT_UNINSTALLED: i64 = 1614;

fn package_log(file_name: &str) -> String {
    format!("{{PACKAGE_LOCATION}}\\{}", file_name)
}

/// Windows Installer packages run through msiexec
pub fn msi() -> InstallerProfile {
    InstallerProfile::builder(InstallerType::Msi)
        .install_executable("msiexec.exe")
        .silent_install("/quiet /qn /norestart")
        .no_reboot("/norestart")
        .log_file(FlagTemplate::spaced("/l*v", package_log("MSI.Install.log")))
        .custom_install_location(FlagTemplate::attached("TARGETDIR=", INSTALL_LOCATION))
        .language(FlagTemplate::attached("ProductLanguage=", LANGUAGE))
        .other_install_options("ALLUSERS=1 DISABLEDESKTOPSHORTCUT=1 ADDDESKTOPICON=0 ADDSTARTMENU=0")
        .uninstall_executable("msiexec.exe")
        .silent_uninstall("/qn")
        .valid_install_exit_codes([REBOOT_INITIATED, REBOOT_REQUIRED])
        .valid_uninstall_exit_codes([
            MSI_UNKNOWN_PRODUCT,
            MSI_PRODUCT_UNINSTALLED,
            REBOOT_INITIATED,
            REBOOT_REQUIRED,
        ])
        .build()
}

/// Nullsoft Scriptable Install System
pub fn nsis() -> InstallerProfile {
    InstallerProfile::builder(InstallerType::Nsis)
        .install_executable(INSTALLER_LOCATION)
        .silent_install("/S")
        .custom_install_location(FlagTemplate::attached("/D=", INSTALL_LOCATION))
        .uninstall_executable(UNINSTALLER_LOCATION)
        .silent_uninstall("/S")
        .build()
}

/// Inno Setup
pub fn inno_setup() -> InstallerProfile {
    InstallerProfile::builder(InstallerType::InnoSetup)
        .install_executable(INSTALLER_LOCATION)
        .silent_install("/VERYSILENT /SUPPRESSMSGBOXES /NORESTART /SP-")
        .no_reboot("/NORESTART")
        .log_file(FlagTemplate::attached("/LOG=", package_log("InnoSetup.Install.log")))
        .custom_install_location(FlagTemplate::attached("/DIR=", INSTALL_LOCATION))
        .language(FlagTemplate::attached("/LANG=", LANGUAGE))
        .other_install_options("/NOICONS")
        .uninstall_executable(UNINSTALLER_LOCATION)
        .silent_uninstall("/VERYSILENT /SUPPRESSMSGBOXES")
        .build()
}

/// InstallShield setup.exe wrappers around an MSI
pub fn install_shield() -> InstallerProfile {
    InstallerProfile::builder(InstallerType::InstallShield)
        .install_executable(INSTALLER_LOCATION)
        .silent_install("/s /v\"/qn\"")
        .no_reboot("/v\"REBOOT=ReallySuppress\"")
        .log_file(FlagTemplate::attached("/f2", package_log("InstallShield.Install.log")))
        .language(FlagTemplate::attached("/l", LANGUAGE))
        .uninstall_executable(UNINSTALLER_LOCATION)
        .silent_uninstall("/uninst /s")
        .valid_install_exit_codes([REBOOT_INITIATED, REBOOT_REQUIRED])
        .valid_uninstall_exit_codes([REBOOT_INITIATED, REBOOT_REQUIRED])
        .build()
}

/// Wise Installation System
pub fn wise() -> InstallerProfile {
    InstallerProfile::builder(InstallerType::Wise)
        .install_executable(INSTALLER_LOCATION)
        .silent_install("/s")
        .uninstall_executable(UNINSTALLER_LOCATION)
        .silent_uninstall("/s")
        .build()
}

/// Unknown setup.exe: throw every common silent switch at it
pub fn custom() -> InstallerProfile {
    const SILENT_GUESSES: &str = "/S /s /q /Q /quiet /silent /SILENT /VERYSILENT";

    InstallerProfile::builder(InstallerType::Custom)
        .install_executable(INSTALLER_LOCATION)
        .silent_install(SILENT_GUESSES)
        .uninstall_executable(UNINSTALLER_LOCATION)
        .silent_uninstall(SILENT_GUESSES)
        .build()
}

/// All built-in profiles in catalogue order
pub fn builtin_profiles() -> Vec<InstallerProfile> {
    vec![msi(), nsis(), inno_setup(), install_shield(), wise(), custom()]
}
