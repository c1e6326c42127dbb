// src/rules/mod.rs

//! Package manifest validation
//!
//! A `Rule` inspects one `PackageSpec` and returns zero or more
//! `RuleResult` diagnostics. The `RuleEngine` runs every registered rule in
//! registration order and gathers their output into a single `RuleReport`.
//! Rules are independent: they share no mutable state and never modify the
//! manifest.

pub mod engine;
pub mod identifiers;
pub mod metadata;
pub mod required;

pub use engine::{RuleEngine, RuleRegistry};
pub use identifiers::RuleIdentifier;

use crate::error::Result;
use crate::manifest::{ManifestElement, PackageSpec};
use serde::Serialize;
use std::fmt;

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks install/publish
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
            Severity::Note => f.write_str("note"),
        }
    }
}

/// One diagnostic produced by a rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleResult {
    identifier: RuleIdentifier,
    severity: Severity,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    remediation: Option<String>,
}

impl RuleResult {
    pub fn new(identifier: RuleIdentifier, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            identifier,
            severity,
            message: message.into(),
            remediation: None,
        }
    }

    pub fn error(identifier: RuleIdentifier, message: impl Into<String>) -> Self {
        Self::new(identifier, Severity::Error, message)
    }

    pub fn warning(identifier: RuleIdentifier, message: impl Into<String>) -> Self {
        Self::new(identifier, Severity::Warning, message)
    }

    pub fn note(identifier: RuleIdentifier, message: impl Into<String>) -> Self {
        Self::new(identifier, Severity::Note, message)
    }

    /// Attach a hint on how to fix the problem
    pub fn with_remediation(mut self, hint: impl Into<String>) -> Self {
        self.remediation = Some(hint.into());
        self
    }

    pub fn identifier(&self) -> RuleIdentifier {
        self.identifier
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn remediation(&self) -> Option<&str> {
        self.remediation.as_deref()
    }
}

impl fmt::Display for RuleResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.severity, self.identifier, self.message)?;
        if let Some(hint) = &self.remediation {
            write!(f, "\n    hint: {}", hint)?;
        }
        Ok(())
    }
}

/// An independent manifest validator
pub trait Rule: Send + Sync {
    /// Short name used when reporting a failure of the rule itself
    fn name(&self) -> &'static str;

    /// Produce diagnostics for one manifest
    ///
    /// An `Err` means the rule itself broke; the engine reports it as an
    /// internal failure and carries on with the next rule.
    fn validate(&self, spec: &PackageSpec) -> Result<Vec<RuleResult>>;
}

/// Ordered diagnostics from one validation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RuleReport {
    results: Vec<RuleResult>,
}

impl RuleReport {
    pub(crate) fn new(results: Vec<RuleResult>) -> Self {
        Self { results }
    }

    pub fn results(&self) -> &[RuleResult] {
        &self.results
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RuleResult> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Results of one severity, in report order
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &RuleResult> {
        self.results.iter().filter(move |r| r.severity == severity)
    }

    /// True if any result is an error
    pub fn is_blocking(&self) -> bool {
        self.results.iter().any(|r| r.severity == Severity::Error)
    }

    /// Like `is_blocking`, ignoring errors whose identifier is suppressed
    ///
    /// Internal rule failures cannot be suppressed.
    pub fn is_blocking_with<S: AsRef<str>>(&self, suppressed: &[S]) -> bool {
        self.results.iter().any(|r| {
            r.severity == Severity::Error
                && (r.identifier == identifiers::INTERNAL_RULE_FAILURE
                    || !suppressed.iter().any(|s| r.identifier == *s.as_ref()))
        })
    }
}

impl<'a> IntoIterator for &'a RuleReport {
    type Item = &'a RuleResult;
    type IntoIter = std::slice::Iter<'a, RuleResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

impl fmt::Display for RuleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for result in &self.results {
            writeln!(f, "{}", result)?;
        }
        Ok(())
    }
}

/// Direct children of the metadata node with the given name
pub fn metadata_elements<'a>(
    spec: &'a PackageSpec,
    name: &'a str,
) -> impl Iterator<Item = &'a ManifestElement> + 'a {
    spec.metadata()
        .into_iter()
        .flat_map(move |metadata| metadata.children_named(name))
}

/// Whether the metadata node has a direct child with the given name
pub fn has_element(spec: &PackageSpec, name: &str) -> bool {
    metadata_elements(spec, name).next().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::identifiers::{INTERNAL_RULE_FAILURE, UNSUPPORTED_ELEMENT_USED};

    fn report() -> RuleReport {
        RuleReport::new(vec![
            RuleResult::note(identifiers::MISSING_PACKAGE_SOURCE_URL, "no source"),
            RuleResult::error(UNSUPPORTED_ELEMENT_USED, "bad element").with_remediation("remove it"),
            RuleResult::warning(identifiers::DUPLICATE_ELEMENT, "twice"),
        ])
    }

    #[test]
    fn test_blocking_follows_errors() {
        assert!(report().is_blocking());
        assert!(!RuleReport::new(vec![RuleResult::warning(identifiers::DUPLICATE_ELEMENT, "w")]).is_blocking());
        assert!(!RuleReport::default().is_blocking());
    }

    #[test]
    fn test_suppression() {
        let report = report();
        assert!(!report.is_blocking_with(&["KTLU0001"]));
        assert!(report.is_blocking_with(&["KTLR0001"]));

        let internal = RuleReport::new(vec![RuleResult::error(INTERNAL_RULE_FAILURE, "boom")]);
        assert!(internal.is_blocking_with(&["KTLI0001"]));
    }

    #[test]
    fn test_severity_filter_and_display() {
        let report = report();
        assert_eq!(report.with_severity(Severity::Error).count(), 1);
        assert_eq!(
            report.to_string(),
            "note KTLN0001: no source\nerror KTLU0001: bad element\n    hint: remove it\nwarning KTLW0001: twice\n"
        );
    }

    #[test]
    fn test_metadata_helpers() {
        let spec = PackageSpec::new(
            ManifestElement::new("package").with_child(
                ManifestElement::new("metadata")
                    .with_child(ManifestElement::new("tags"))
                    .with_child(ManifestElement::new("tags")),
            ),
        );
        assert!(has_element(&spec, "tags"));
        assert!(!has_element(&spec, "repository"));
        assert_eq!(metadata_elements(&spec, "tags").count(), 2);

        let empty = PackageSpec::new(ManifestElement::new("package"));
        assert!(!has_element(&empty, "tags"));
    }
}
