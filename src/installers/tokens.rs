// src/installers/tokens.rs

//! Install token placeholders used inside profile templates

use std::collections::BTreeMap;

/// Directory the package was extracted to (logs land here)
pub const PACKAGE_LOCATION: &str = "{PACKAGE_LOCATION}";

/// Full path of the downloaded installer file
pub const INSTALLER_LOCATION: &str = "{INSTALLER_LOCATION}";

/// Directory the user asked the software to be installed into
pub const INSTALL_LOCATION: &str = "{INSTALL_LOCATION}";

/// Requested installer UI language
pub const LANGUAGE: &str = "{LANGUAGE}";

/// Full path of the uninstaller registered by the software
pub const UNINSTALLER_LOCATION: &str = "{UNINSTALLER_LOCATION}";

/// Every token the built-in profiles use
pub const ALL_TOKENS: &[&str] = &[
    PACKAGE_LOCATION,
    INSTALLER_LOCATION,
    INSTALL_LOCATION,
    LANGUAGE,
    UNINSTALLER_LOCATION,
];

/// Concrete values for install tokens, keyed by bare name (`INSTALL_LOCATION`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenValues {
    values: BTreeMap<String, String>,
}

impl TokenValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value; `name` may be given with or without braces
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        let name = name.trim().trim_start_matches('{').trim_end_matches('}');
        self.values.insert(name.to_ascii_uppercase(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parse a `NAME=VALUE` pair as given on the command line
    pub fn parse_assignment(assignment: &str) -> Option<(String, String)> {
        let (name, value) = assignment.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some((name.to_string(), value.to_string()))
    }
}

/// Substitute every `{NAME}` that has a value; unknown tokens stay as-is
///
/// Values are inserted raw. Build arguments through
/// `InstallerStrategy::install_command_with` so substituted values are
/// quoted by the composer.
pub fn replace_tokens(arguments: &str, values: &TokenValues) -> String {
    if values.is_empty() {
        return arguments.to_string();
    }

    let mut result = String::with_capacity(arguments.len());
    let mut rest = arguments;

    while let Some(start) = rest.find('{') {
        result.push_str(&rest[..start]);
        let candidate = &rest[start..];
        match candidate.find('}') {
            Some(end) => {
                let name = &candidate[1..end];
                match values.get(name) {
                    Some(value) => result.push_str(value),
                    None => result.push_str(&candidate[..=end]),
                }
                rest = &candidate[end + 1..];
            }
            None => {
                result.push_str(candidate);
                rest = "";
            }
        }
    }
    result.push_str(rest);

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_known_tokens() {
        let mut values = TokenValues::new();
        values
            .set("INSTALL_LOCATION", "C:\\Tools\\App")
            .set("{language}", "1033");

        let replaced = replace_tokens("/D=\"{INSTALL_LOCATION}\" /L={LANGUAGE}", &values);
        assert_eq!(replaced, "/D=\"C:\\Tools\\App\" /L=1033");
    }

    #[test]
    fn test_unknown_and_unterminated_tokens_are_kept() {
        let mut values = TokenValues::new();
        values.set("LANGUAGE", "de");

        assert_eq!(
            replace_tokens("{PACKAGE_LOCATION}\\x.log {LANGUAGE} {oops", &values),
            "{PACKAGE_LOCATION}\\x.log de {oops"
        );
    }

    #[test]
    fn test_values_are_inserted_raw() {
        let mut values = TokenValues::new();
        values.set("INSTALL_LOCATION", "D:\\Apps\\");
        assert_eq!(replace_tokens("{INSTALL_LOCATION}", &values), "D:\\Apps\\");
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            TokenValues::parse_assignment("LANGUAGE=en-US"),
            Some(("LANGUAGE".to_string(), "en-US".to_string()))
        );
        assert_eq!(TokenValues::parse_assignment("=x"), None);
        assert_eq!(TokenValues::parse_assignment("novalue"), None);
    }
}
