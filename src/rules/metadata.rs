// src/rules/metadata.rs

//! Rules about the shape of the metadata node

use super::identifiers::{DUPLICATE_ELEMENT, MISSING_PACKAGE_SOURCE_URL, UNSUPPORTED_ELEMENT_USED};
use super::{Rule, RuleResult};
use crate::error::Result;
use crate::manifest::PackageSpec;

/// A metadata element that must not be used, and what to use instead
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeniedElement {
    pub element: String,
    pub replacement: Option<String>,
}

impl DeniedElement {
    pub fn replaced_by(element: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            replacement: Some(replacement.into()),
        }
    }

    pub fn removed(element: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            replacement: None,
        }
    }

    fn diagnose(&self) -> RuleResult {
        match &self.replacement {
            Some(replacement) => RuleResult::error(
                UNSUPPORTED_ELEMENT_USED,
                format!(
                    "<{}> elements are not supported, use <{}> instead.",
                    self.element, replacement
                ),
            )
            .with_remediation(format!("Replace <{}> with <{}>.", self.element, replacement)),
            None => RuleResult::error(
                UNSUPPORTED_ELEMENT_USED,
                format!("<{}> elements are not supported.", self.element),
            )
            .with_remediation(format!("Remove the <{}> element.", self.element)),
        }
    }
}

/// Flags direct metadata children whose element name is deny-listed
///
/// One error per offending element, in document order.
#[derive(Debug, Clone)]
pub struct UnsupportedElementRule {
    denied: Vec<DeniedElement>,
}

impl UnsupportedElementRule {
    pub fn new(denied: Vec<DeniedElement>) -> Self {
        Self { denied }
    }

    /// Only `<repository>`, which is replaced by `<packageSourceUrl>`
    pub fn repository() -> Self {
        Self::new(vec![DeniedElement::replaced_by("repository", "packageSourceUrl")])
    }

    pub fn denied(&self) -> &[DeniedElement] {
        &self.denied
    }
}

impl Default for UnsupportedElementRule {
    fn default() -> Self {
        Self::new(vec![
            DeniedElement::replaced_by("repository", "packageSourceUrl"),
            DeniedElement::replaced_by("license", "licenseUrl"),
            DeniedElement::replaced_by("frameworkReferences", "dependencies"),
            DeniedElement::replaced_by("frameworkAssemblies", "dependencies"),
            DeniedElement::removed("serviceable"),
            DeniedElement::removed("packageTypes"),
        ])
    }
}

impl Rule for UnsupportedElementRule {
    fn name(&self) -> &'static str {
        "unsupported-element"
    }

    fn validate(&self, spec: &PackageSpec) -> Result<Vec<RuleResult>> {
        let Some(metadata) = spec.metadata() else {
            return Ok(Vec::new());
        };

        Ok(metadata
            .children
            .iter()
            .filter_map(|child| self.denied.iter().find(|d| d.element == child.name))
            .map(DeniedElement::diagnose)
            .collect())
    }
}

/// Warns about metadata elements given more than once
pub struct DuplicateElementRule;

impl Rule for DuplicateElementRule {
    fn name(&self) -> &'static str {
        "duplicate-element"
    }

    fn validate(&self, spec: &PackageSpec) -> Result<Vec<RuleResult>> {
        let Some(metadata) = spec.metadata() else {
            return Ok(Vec::new());
        };

        // First-seen order keeps the output stable
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for child in &metadata.children {
            match counts.iter_mut().find(|(name, _)| *name == child.name) {
                Some((_, count)) => *count += 1,
                None => counts.push((child.name.as_str(), 1)),
            }
        }

        Ok(counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(name, count)| {
                RuleResult::warning(
                    DUPLICATE_ELEMENT,
                    format!(
                        "<{}> appears {} times in metadata.",
                        name, count
                    ),
                )
                .with_remediation(format!("Keep a single <{}> element.", name))
            })
            .collect())
    }
}

/// Notes when the manifest does not say where its packaging sources live
pub struct PackageSourceUrlRule;

impl Rule for PackageSourceUrlRule {
    fn name(&self) -> &'static str {
        "package-source-url"
    }

    fn validate(&self, spec: &PackageSpec) -> Result<Vec<RuleResult>> {
        if spec.metadata().is_none() {
            return Ok(Vec::new());
        }

        let has_url = spec
            .metadata_value("packageSourceUrl")
            .is_some_and(|url| !url.is_empty());
        if has_url {
            return Ok(Vec::new());
        }

        Ok(vec![RuleResult::note(
            MISSING_PACKAGE_SOURCE_URL,
            "No <packageSourceUrl> is set; reviewers cannot find the packaging sources.",
        )
        .with_remediation("Add <packageSourceUrl> pointing at the repository that builds this package.")])
    }
}
