// src/installers/catalog.rs

//! Installer profile catalogue
//!
//! Built once at startup and shared by reference afterward. Registration is
//! append-only: a family can be registered exactly once.

use super::builtin;
use super::{InstallerProfile, InstallerType};
use crate::error::{Error, Result};
use std::path::Path;
use tracing::{debug, info};

/// Registry of installer profiles keyed by installer family
#[derive(Debug, Clone, Default)]
pub struct InstallerCatalog {
    profiles: Vec<InstallerProfile>,
}

impl InstallerCatalog {
    /// Create an empty catalogue
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalogue holding every built-in profile
    pub fn with_builtin_profiles() -> Self {
        let catalog = Self {
            profiles: builtin::builtin_profiles(),
        };
        debug!("Registered {} built-in installer profiles", catalog.profiles.len());
        catalog
    }

    /// Register a profile for a family that has none yet
    pub fn register_profile(&mut self, profile: InstallerProfile) -> Result<()> {
        if self.get(profile.installer_type()).is_some() {
            return Err(Error::configuration(format!(
                "An installer profile for '{}' is already registered",
                profile.installer_type()
            )));
        }

        debug!("Registering installer profile: {}", profile.installer_type());
        self.profiles.push(profile);
        Ok(())
    }

    /// Register every profile in a JSON array of profile definitions
    ///
    /// Nothing is registered unless the whole document is valid.
    pub fn register_from_json(&mut self, json: &str) -> Result<usize> {
        let profiles: Vec<InstallerProfile> = serde_json::from_str(json)?;

        for (i, profile) in profiles.iter().enumerate() {
            let duplicate_in_document = profiles[..i]
                .iter()
                .any(|p| p.installer_type() == profile.installer_type());
            if duplicate_in_document || self.get(profile.installer_type()).is_some() {
                return Err(Error::configuration(format!(
                    "An installer profile for '{}' is already registered",
                    profile.installer_type()
                )));
            }
        }

        let count = profiles.len();
        self.profiles.extend(profiles);
        Ok(count)
    }

    /// Register profiles from a JSON file
    pub fn load_json<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let count = self.register_from_json(&content)?;
        info!("Loaded {} installer profiles from {}", count, path.display());
        Ok(count)
    }

    /// Look up the profile for an installer family
    pub fn get(&self, installer_type: &InstallerType) -> Option<&InstallerProfile> {
        self.profiles
            .iter()
            .find(|p| p.installer_type() == installer_type)
    }

    /// Look up a profile, failing with a configuration error if unknown
    pub fn require(&self, installer_type: &InstallerType) -> Result<&InstallerProfile> {
        self.get(installer_type).ok_or_else(|| {
            Error::configuration(format!("No installer profile registered for '{}'", installer_type))
        })
    }

    /// Profiles in registration order
    pub fn profiles(&self) -> &[InstallerProfile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_lookup() {
        let catalog = InstallerCatalog::with_builtin_profiles();
        assert_eq!(catalog.len(), 6);
        let msi = catalog.get(&InstallerType::Msi).unwrap();
        assert_eq!(msi.install_executable(), "msiexec.exe");
        assert!(catalog.get(&InstallerType::Other("zip".to_string())).is_none());
        assert!(matches!(
            catalog.require(&InstallerType::Other("zip".to_string())),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut catalog = InstallerCatalog::with_builtin_profiles();
        let result = catalog.register_profile(builtin::nsis());
        assert!(matches!(result, Err(Error::Configuration(_))));
        assert_eq!(catalog.len(), 6);
    }

    #[test]
    fn test_register_from_json() {
        let mut catalog = InstallerCatalog::new();
        let count = catalog
            .register_from_json(
                r#"[
                    { "installerType": "squirrel", "installExecutable": "Setup.exe", "silentInstall": "--silent" },
                    { "installerType": "nsis", "installExecutable": "setup.exe", "silentInstall": "/S" }
                ]"#,
            )
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(catalog.profiles()[0].installer_type().as_str(), "squirrel");
        assert_eq!(catalog.profiles()[1].installer_type(), &InstallerType::Nsis);
    }

    #[test]
    fn test_register_from_json_is_all_or_nothing() {
        let mut catalog = InstallerCatalog::new();
        catalog.register_profile(builtin::wise()).unwrap();

        let result = catalog.register_from_json(
            r#"[
                { "installerType": "squirrel", "installExecutable": "Setup.exe" },
                { "installerType": "wise", "installExecutable": "setup.exe" }
            ]"#,
        );
        assert!(matches!(result, Err(Error::Configuration(_))));
        assert_eq!(catalog.len(), 1);

        let malformed = catalog.register_from_json("{ not json");
        assert!(matches!(malformed, Err(Error::Json(_))));
    }
}
