// src/installers/args.rs

//! Argument composition for installer command lines
//!
//! The composer owns all quoting: templates and callers hand over raw
//! values and get back one argument string with single-space separators.
//! Install tokens given to the composer are resolved before a value is
//! quoted, so substituted paths are escaped like any other value.

use super::tokens::{self, TokenValues};
use serde::{Deserialize, Serialize};

/// How values that need escaping are wrapped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuoteStyle {
    /// `"value"` using Windows command-line escaping rules
    #[default]
    Double,

    /// `\"value\"`, for values nested inside an already quoted argument
    /// (InstallShield's `/v"..."` passthrough)
    EscapedDouble,

    /// `'value'` for POSIX shells
    Single,
}

impl QuoteStyle {
    /// Wrap `value` in this quoting convention
    pub fn quote(self, value: &str) -> String {
        match self {
            QuoteStyle::Double => quote_windows(value, "\""),
            QuoteStyle::EscapedDouble => quote_windows(value, "\\\""),
            QuoteStyle::Single => format!("'{}'", value.replace('\'', "'\\''")),
        }
    }
}

/// Quote following CommandLineToArgvW rules: backslashes are literal unless
/// they precede a quote, in which case they are doubled.
fn quote_windows(value: &str, delimiter: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2 * delimiter.len());
    quoted.push_str(delimiter);

    let mut backslashes = 0usize;
    for c in value.chars() {
        match c {
            '\\' => backslashes += 1,
            '"' => {
                quoted.extend(std::iter::repeat_n('\\', backslashes * 2 + 1));
                quoted.push('"');
                backslashes = 0;
            }
            _ => {
                quoted.extend(std::iter::repeat_n('\\', backslashes));
                quoted.push(c);
                backslashes = 0;
            }
        }
    }
    // Trailing backslashes would escape the closing delimiter
    quoted.extend(std::iter::repeat_n('\\', backslashes * 2));

    quoted.push_str(delimiter);
    quoted
}

/// Whether a value must be quoted before it is placed on a command line
///
/// Unresolved `{TOKEN}` placeholders count as needing quotes because the
/// substituted value (usually a path) is not known yet.
pub fn needs_quoting(value: &str) -> bool {
    value.chars().any(|c| c.is_whitespace() || c == '/' || c == '\\' || c == '"')
        || contains_token(value)
}

fn contains_token(value: &str) -> bool {
    value
        .find('{')
        .is_some_and(|start| value[start..].contains('}'))
}

/// A `(flag, value)` template for one optional argument fragment
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagTemplate {
    /// Switch text, e.g. `/l*v` or `/LOG=`
    pub flag: String,

    /// Value placed after the flag; may contain install tokens
    pub value: String,

    /// Glue the value directly onto the flag instead of separating with a space
    pub attached: bool,
}

impl FlagTemplate {
    /// A flag whose value is separated by a space: `/l*v "path"`
    pub fn spaced(flag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            flag: flag.into(),
            value: value.into(),
            attached: false,
        }
    }

    /// A flag whose value is glued on: `/LOG="path"`
    pub fn attached(flag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            flag: flag.into(),
            value: value.into(),
            attached: true,
        }
    }

    /// A template without a flag contributes nothing
    pub fn is_empty(&self) -> bool {
        self.flag.trim().is_empty()
    }
}

/// Builds an argument string fragment by fragment
#[derive(Debug, Clone)]
pub struct ArgumentComposer {
    quote: QuoteStyle,
    tokens: TokenValues,
    parts: Vec<String>,
}

impl ArgumentComposer {
    /// Create an empty composer using the given quoting convention
    pub fn new(quote: QuoteStyle) -> Self {
        Self {
            quote,
            tokens: TokenValues::new(),
            parts: Vec::new(),
        }
    }

    /// Resolve these install tokens in everything appended afterwards
    ///
    /// Tokens without a value stay as placeholders.
    pub fn with_tokens(mut self, values: &TokenValues) -> Self {
        self.tokens = values.clone();
        self
    }

    /// Append a verbatim token (silent switches, trailing options)
    ///
    /// Blank tokens are skipped. Install tokens are resolved but the result
    /// is not quoted.
    pub fn verbatim(&mut self, token: &str) -> &mut Self {
        let token = token.trim();
        if !token.is_empty() {
            self.parts.push(tokens::replace_tokens(token, &self.tokens));
        }
        self
    }

    /// Append a flag followed by a space and its (quoted if needed) value
    pub fn flag_value(&mut self, flag: &str, value: &str) -> &mut Self {
        self.push_pair(flag, value, false)
    }

    /// Append a flag with its (quoted if needed) value glued on
    pub fn flag_attached(&mut self, flag: &str, value: &str) -> &mut Self {
        self.push_pair(flag, value, true)
    }

    /// Append a templated fragment
    pub fn template(&mut self, template: &FlagTemplate) -> &mut Self {
        self.push_pair(&template.flag, &template.value, template.attached)
    }

    fn push_pair(&mut self, flag: &str, value: &str, attached: bool) -> &mut Self {
        let flag = flag.trim();
        if flag.is_empty() {
            return self;
        }

        let value = tokens::replace_tokens(value.trim(), &self.tokens);
        let fragment = if value.is_empty() {
            flag.to_string()
        } else {
            let value = self.escape(&value);
            if attached {
                format!("{}{}", flag, value)
            } else {
                format!("{} {}", flag, value)
            }
        };
        self.parts.push(fragment);
        self
    }

    /// Quote a value if it needs it
    pub fn escape(&self, value: &str) -> String {
        if needs_quoting(value) {
            self.quote.quote(value)
        } else {
            value.to_string()
        }
    }

    /// Join everything appended so far with single spaces
    pub fn finish(&self) -> String {
        self.parts.join(" ")
    }
}

/// Compose an ordered list of `(flag, value)` pairs into one argument string
///
/// Pairs with an empty flag are skipped; an empty value yields the bare flag.
pub fn compose_arguments(pairs: &[(&str, &str)], quote: QuoteStyle) -> String {
    let mut composer = ArgumentComposer::new(quote);
    for (flag, value) in pairs {
        composer.flag_value(flag, value);
    }
    composer.finish()
}
