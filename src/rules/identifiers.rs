// src/rules/identifiers.rs

//! Published rule identifiers
//!
//! CI gates and suppression lists key off these exact strings. The list is
//! append-only: never renumber, never reuse an identifier for a different
//! problem, and never remove one that has shipped.
//!
//! Format is `KTL` + category + four digits:
//! - `I` internal failures of Kettle itself
//! - `R` required or invalid content
//! - `U` unsupported elements
//! - `W` style problems reported as warnings
//! - `N` informational notes

use serde::Serialize;
use std::fmt;

/// Stable tag naming one class of validation diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RuleIdentifier(&'static str);

impl RuleIdentifier {
    /// Declare an identifier; third-party rules use their own prefix
    pub const fn new(id: &'static str) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for RuleIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl PartialEq<str> for RuleIdentifier {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// A rule failed while producing diagnostics
pub const INTERNAL_RULE_FAILURE: RuleIdentifier = RuleIdentifier::new("KTLI0001");

/// A required metadata element is missing or empty
pub const EMPTY_REQUIRED_ELEMENT: RuleIdentifier = RuleIdentifier::new("KTLR0001");

/// License acceptance is required but no license URL is given
pub const LICENSE_URL_REQUIRED: RuleIdentifier = RuleIdentifier::new("KTLR0002");

/// The package version is not a valid package version
pub const INVALID_VERSION: RuleIdentifier = RuleIdentifier::new("KTLR0003");

/// A metadata element that Kettle does not support was used
pub const UNSUPPORTED_ELEMENT_USED: RuleIdentifier = RuleIdentifier::new("KTLU0001");

/// A metadata element appears more than once
pub const DUPLICATE_ELEMENT: RuleIdentifier = RuleIdentifier::new("KTLW0001");

/// No `packageSourceUrl` pointing at the packaging sources
pub const MISSING_PACKAGE_SOURCE_URL: RuleIdentifier = RuleIdentifier::new("KTLN0001");

/// Every identifier Kettle has published
pub const ALL: &[RuleIdentifier] = &[
    INTERNAL_RULE_FAILURE,
    EMPTY_REQUIRED_ELEMENT,
    LICENSE_URL_REQUIRED,
    INVALID_VERSION,
    UNSUPPORTED_ELEMENT_USED,
    DUPLICATE_ELEMENT,
    MISSING_PACKAGE_SOURCE_URL,
];
