// src/rules/engine.rs

//! Rule registration and execution

use super::identifiers::INTERNAL_RULE_FAILURE;
use super::metadata::{DuplicateElementRule, PackageSourceUrlRule, UnsupportedElementRule};
use super::required::{LicenseAcceptanceRule, RequiredElementRule, VersionFormatRule};
use super::{Rule, RuleReport, RuleResult};
use crate::manifest::PackageSpec;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, info, warn};

/// Ordered set of rules collected at startup
///
/// Registration order is the order results appear in every report.
#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding Kettle's built-in rules
    pub fn with_builtin_rules() -> Self {
        let mut registry = Self::new();
        registry
            .register_rule(RequiredElementRule)
            .register_rule(VersionFormatRule)
            .register_rule(LicenseAcceptanceRule)
            .register_rule(UnsupportedElementRule::default())
            .register_rule(DuplicateElementRule)
            .register_rule(PackageSourceUrlRule);
        registry
    }

    /// Append a rule after every rule registered so far
    pub fn register_rule<R: Rule + 'static>(&mut self, rule: R) -> &mut Self {
        debug!("Registering rule: {}", rule.name());
        self.rules.push(Box::new(rule));
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Runs a frozen set of rules against manifests
///
/// Built from a `RuleRegistry`, after which no rule can be added. The engine
/// keeps no state between calls, so one engine can serve many threads.
pub struct RuleEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleEngine {
    /// Freeze a registry into an engine
    pub fn new(registry: RuleRegistry) -> Self {
        info!("Rule engine ready with {} rules", registry.rules.len());
        Self {
            rules: registry.rules,
        }
    }

    /// Engine with the built-in rules
    pub fn with_builtin_rules() -> Self {
        Self::new(RuleRegistry::with_builtin_rules())
    }

    /// Rule names in execution order
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Validate one manifest
    ///
    /// Each rule runs to completion before the next starts. A rule that
    /// errors or panics contributes a single internal-failure error in its
    /// own position; the remaining rules still run.
    pub fn validate(&self, spec: &PackageSpec) -> RuleReport {
        let mut results = Vec::new();

        for rule in &self.rules {
            results.extend(run_rule(rule.as_ref(), spec));
        }

        debug!(
            "Validated {}: {} results",
            spec.id().unwrap_or("<unknown package>"),
            results.len()
        );
        RuleReport::new(results)
    }
}

fn run_rule(rule: &dyn Rule, spec: &PackageSpec) -> Vec<RuleResult> {
    match panic::catch_unwind(AssertUnwindSafe(|| rule.validate(spec))) {
        Ok(Ok(results)) => results,
        Ok(Err(e)) => {
            warn!("Rule {} failed: {}", rule.name(), e);
            vec![internal_failure(rule.name(), &e.to_string())]
        }
        Err(payload) => {
            let reason = panic_message(payload.as_ref());
            warn!("Rule {} panicked: {}", rule.name(), reason);
            vec![internal_failure(rule.name(), &reason)]
        }
    }
}

fn internal_failure(rule_name: &str, reason: &str) -> RuleResult {
    RuleResult::error(
        INTERNAL_RULE_FAILURE,
        format!("Rule '{}' could not validate this package: {}", rule_name, reason),
    )
    .with_remediation("This is a defect in the rule, not in the package. Report it to the rule's maintainers.")
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
