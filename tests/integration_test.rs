// tests/integration_test.rs

//! Integration tests for Kettle
//!
//! These tests verify end-to-end functionality across modules.

use kettle::installers::tokens::TokenValues;
use kettle::installers::{
    CommandRequest, ExitCodeOutcome, InstallDirection, InstallerCatalog, InstallerStrategy,
    InstallerType,
};
use kettle::manifest::PackageSpec;
use kettle::rules::identifiers;
use kettle::rules::metadata::UnsupportedElementRule;
use kettle::rules::{RuleEngine, RuleRegistry, Severity};
use std::io::Write;
use tempfile::NamedTempFile;

const GOOD_NUSPEC: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<package xmlns="http://schemas.microsoft.com/packaging/2015/06/nuspec.xsd">
  <metadata>
    <id>notepadplusplus.install</id>
    <version>8.6.2</version>
    <title>Notepad++ (Install)</title>
    <authors>Don Ho</authors>
    <description>Notepad++ is a free source code editor.</description>
    <packageSourceUrl>https://example.com/packages/notepadplusplus</packageSourceUrl>
    <licenseUrl>https://example.com/license</licenseUrl>
    <requireLicenseAcceptance>true</requireLicenseAcceptance>
  </metadata>
</package>"#;

fn write_manifest(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".nuspec").unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_clean_manifest_from_file_passes() {
    let file = write_manifest(GOOD_NUSPEC);
    let spec = PackageSpec::from_file(file.path()).unwrap();

    let report = RuleEngine::with_builtin_rules().validate(&spec);
    assert!(report.is_empty(), "unexpected results:\n{}", report);
    assert!(!report.is_blocking());
}

#[test]
fn test_repository_element_scenario() {
    let xml = GOOD_NUSPEC.replace(
        "<packageSourceUrl>",
        r#"<repository type="git" url="https://example.com/npp.git" /><packageSourceUrl>"#,
    );
    let spec = PackageSpec::from_xml(&xml).unwrap();

    let mut registry = RuleRegistry::new();
    registry.register_rule(UnsupportedElementRule::repository());
    let report = RuleEngine::new(registry).validate(&spec);

    assert_eq!(report.len(), 1);
    let result = &report.results()[0];
    assert_eq!(result.identifier(), identifiers::UNSUPPORTED_ELEMENT_USED);
    assert_eq!(result.severity(), Severity::Error);
    assert!(result.message().contains("<repository>"));
    assert!(result.message().contains("<packageSourceUrl>"));
    assert!(report.is_blocking());
    assert!(!report.is_blocking_with(&["KTLU0001"]));
}

#[test]
fn test_builtin_rules_report_in_registration_order() {
    let spec = PackageSpec::from_xml(
        r#"<package>
             <metadata>
               <id>broken</id>
               <version>one.two</version>
               <tags>a</tags>
               <tags>b</tags>
               <repository url="https://example.com/x.git" />
             </metadata>
           </package>"#,
    )
    .unwrap();

    let report = RuleEngine::with_builtin_rules().validate(&spec);
    let ids: Vec<_> = report.iter().map(|r| r.identifier()).collect();
    assert_eq!(
        ids,
        vec![
            identifiers::EMPTY_REQUIRED_ELEMENT, // authors
            identifiers::EMPTY_REQUIRED_ELEMENT, // description
            identifiers::INVALID_VERSION,
            identifiers::UNSUPPORTED_ELEMENT_USED,
            identifiers::DUPLICATE_ELEMENT,
            identifiers::MISSING_PACKAGE_SOURCE_URL,
        ]
    );
    assert_eq!(report.with_severity(Severity::Warning).count(), 1);
    assert_eq!(report.with_severity(Severity::Note).count(), 1);
}

#[test]
fn test_unreadable_manifest_is_parse_error() {
    let file = write_manifest("<package><metadata></package>");
    let result = PackageSpec::from_file(file.path());
    assert!(matches!(result, Err(kettle::Error::ParseError(_))));

    let missing = PackageSpec::from_file("/nonexistent/path/pkg.nuspec");
    assert!(matches!(missing, Err(kettle::Error::Io(_))));
}

#[test]
fn test_install_flow_for_inno_setup() {
    let catalog = InstallerCatalog::with_builtin_profiles();
    let profile = catalog.require(&InstallerType::InnoSetup).unwrap();

    let mut values = TokenValues::new();
    values
        .set("INSTALLER_LOCATION", "C:\\cache\\npp-setup.exe")
        .set("PACKAGE_LOCATION", "C:\\lib\\npp")
        .set("INSTALL_LOCATION", "D:\\Apps\\Notepad++")
        .set("LANGUAGE", "english");
    let command = profile
        .install_command_with(&CommandRequest::all(), &values)
        .unwrap();

    assert_eq!(
        command.to_string(),
        "C:\\cache\\npp-setup.exe /VERYSILENT /SUPPRESSMSGBOXES /NORESTART /SP- \
         /LOG=\"C:\\lib\\npp\\InnoSetup.Install.log\" /DIR=\"D:\\Apps\\Notepad++\" \
         /LANG=english /NOICONS"
    );

    assert_eq!(
        profile.classify_exit_code(InstallDirection::Install, 0),
        ExitCodeOutcome::Success
    );
    assert_eq!(
        profile.classify_exit_code(InstallDirection::Install, 3010),
        ExitCodeOutcome::SuccessRebootRequired
    );
    assert_eq!(
        profile.classify_exit_code(InstallDirection::Install, 2),
        ExitCodeOutcome::Error
    );
}

#[test]
fn test_token_values_are_escaped_like_template_values() {
    let profile = InstallerCatalog::with_builtin_profiles()
        .require(&InstallerType::InnoSetup)
        .unwrap()
        .clone();
    let request = CommandRequest {
        custom_install_location: true,
        ..Default::default()
    };

    let mut values = TokenValues::new();
    values
        .set("INSTALLER_LOCATION", "C:\\Program Files\\Cache\\setup.exe")
        .set("INSTALL_LOCATION", "D:\\Apps\\");
    assert_eq!(
        profile.install_command_with(&request, &values).unwrap().to_string(),
        "\"C:\\Program Files\\Cache\\setup.exe\" /VERYSILENT /SUPPRESSMSGBOXES \
         /NORESTART /SP- /DIR=\"D:\\Apps\\\\\" /NOICONS"
    );

    values.set("INSTALL_LOCATION", "D:\\My \"Apps\"");
    assert_eq!(
        profile.build_install_arguments_with(&request, &values).unwrap(),
        "/VERYSILENT /SUPPRESSMSGBOXES /NORESTART /SP- /DIR=\"D:\\My \\\"Apps\\\"\" /NOICONS"
    );
}

#[test]
fn test_profiles_loaded_from_json_file() {
    let file = write_manifest(
        r#"[{
            "installerType": "squirrel",
            "installExecutable": "{INSTALLER_LOCATION}",
            "silentInstall": "--silent",
            "customInstallLocation": { "flag": "--install-dir", "value": "{INSTALL_LOCATION}" },
            "uninstallExecutable": "{UNINSTALLER_LOCATION}",
            "silentUninstall": "--uninstall --silent",
            "validInstallExitCodes": [4]
        }]"#,
    );

    let mut catalog = InstallerCatalog::with_builtin_profiles();
    assert_eq!(catalog.load_json(file.path()).unwrap(), 1);

    let squirrel = catalog.require(&"Squirrel".parse().unwrap()).unwrap();
    let request = CommandRequest {
        custom_install_location: true,
        ..Default::default()
    };
    assert_eq!(
        squirrel.build_install_arguments(&request).unwrap(),
        "--silent --install-dir \"{INSTALL_LOCATION}\""
    );
    assert_eq!(
        squirrel.classify_exit_code(InstallDirection::Install, 4),
        ExitCodeOutcome::Success
    );
    assert_eq!(
        squirrel.build_uninstall_arguments().unwrap(),
        "--uninstall --silent"
    );
}

#[test]
fn test_engine_is_shareable_across_threads() {
    let engine = RuleEngine::with_builtin_rules();
    let spec = PackageSpec::from_xml(GOOD_NUSPEC).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| engine.validate(&spec)))
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap().is_empty());
        }
    });
}
