// src/rules/required.rs

//! Rules about required and well-formed metadata content

use super::identifiers::{EMPTY_REQUIRED_ELEMENT, INVALID_VERSION, LICENSE_URL_REQUIRED};
use super::{Rule, RuleResult};
use crate::error::Result;
use crate::manifest::{METADATA_ELEMENT, PackageSpec};

/// Metadata elements every package must fill in
pub const REQUIRED_ELEMENTS: &[&str] = &["id", "version", "authors", "description"];

/// Most numeric parts a package version may have (`1.2.3.4`)
const MAX_VERSION_PARTS: usize = 4;

/// Required metadata elements must be present and not blank
pub struct RequiredElementRule;

impl Rule for RequiredElementRule {
    fn name(&self) -> &'static str {
        "required-element"
    }

    fn validate(&self, spec: &PackageSpec) -> Result<Vec<RuleResult>> {
        if spec.metadata().is_none() {
            return Ok(vec![RuleResult::error(
                EMPTY_REQUIRED_ELEMENT,
                format!("The manifest has no <{}> element.", METADATA_ELEMENT),
            )
            .with_remediation(format!(
                "Add a <{}> element directly under the document root.",
                METADATA_ELEMENT
            ))]);
        }

        Ok(REQUIRED_ELEMENTS
            .iter()
            .filter(|name| spec.metadata_value(name).is_none_or(str::is_empty))
            .map(|name| {
                RuleResult::error(
                    EMPTY_REQUIRED_ELEMENT,
                    format!("<{}> is a required element and must not be empty.", name),
                )
                .with_remediation(format!("Provide a value for <{}>.", name))
            })
            .collect())
    }
}

/// Requiring license acceptance only makes sense with a license to accept
pub struct LicenseAcceptanceRule;

impl Rule for LicenseAcceptanceRule {
    fn name(&self) -> &'static str {
        "license-acceptance"
    }

    fn validate(&self, spec: &PackageSpec) -> Result<Vec<RuleResult>> {
        let requires_acceptance = spec
            .metadata_value("requireLicenseAcceptance")
            .is_some_and(|v| v.eq_ignore_ascii_case("true"));
        let has_license_url = spec
            .metadata_value("licenseUrl")
            .is_some_and(|v| !v.is_empty());

        if !requires_acceptance || has_license_url {
            return Ok(Vec::new());
        }

        Ok(vec![RuleResult::error(
            LICENSE_URL_REQUIRED,
            "<requireLicenseAcceptance> is true but no <licenseUrl> is set.",
        )
        .with_remediation("Add a <licenseUrl>, or set <requireLicenseAcceptance> to false.")])
    }
}

/// The version must be 1-4 numeric parts with an optional pre-release tag
pub struct VersionFormatRule;

impl Rule for VersionFormatRule {
    fn name(&self) -> &'static str {
        "version-format"
    }

    fn validate(&self, spec: &PackageSpec) -> Result<Vec<RuleResult>> {
        // A missing version is reported by RequiredElementRule
        let Some(version) = spec.version() else {
            return Ok(Vec::new());
        };

        if is_valid_package_version(version) {
            return Ok(Vec::new());
        }

        Ok(vec![RuleResult::error(
            INVALID_VERSION,
            format!("'{}' is not a valid package version.", version),
        )
        .with_remediation("Use up to four dot-separated numbers, optionally followed by -prerelease (e.g. 1.2.3-beta1).")])
    }
}

/// Check a package version string such as `1.2.3.4` or `2.0.0-rc.1`
pub fn is_valid_package_version(version: &str) -> bool {
    let (numbers, prerelease) = match version.split_once('-') {
        Some((numbers, prerelease)) => (numbers, Some(prerelease)),
        None => (version, None),
    };

    let parts: Vec<&str> = numbers.split('.').collect();
    if parts.len() > MAX_VERSION_PARTS
        || parts
            .iter()
            .any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_digit()))
    {
        return false;
    }

    match prerelease {
        None => true,
        Some(tag) => {
            !tag.is_empty()
                && tag.chars().next().is_some_and(|c| c.is_ascii_alphanumeric())
                && tag
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        }
    }
}
