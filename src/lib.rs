// src/lib.rs

//! Kettle installer orchestration and package validation
//!
//! The deterministic core of a package manager that drives third-party
//! installers:
//!
//! - `installers`: turns an installer family's profile into safely quoted
//!   install/uninstall arguments and classifies the installer's exit code
//! - `rules`: validates a package manifest against an ordered set of
//!   independent rules, producing one report per call
//! - `manifest`: the read-only manifest view the rules query
//!
//! Nothing here spawns processes or talks to the user. Callers run the
//! installer themselves and decide what to do with a reboot request or a
//! blocking report.

mod error;
pub mod installers;
pub mod manifest;
pub mod rules;

pub use error::{Error, Result};
