use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::{PslError, Result};
use crate::idn::{IdnaConverter, IdnaOptions, Uts46Converter};

/// Maximum length of a domain name, excluding the trailing root separator
pub const MAX_DOMAIN_LENGTH: usize = 253;

/// Maximum length of a single label
pub const MAX_LABEL_LENGTH: usize = 63;

/// Canonical domain value: lowercase ASCII labels, most-significant label last.
///
/// This is the only shape the resolution code sees. Any string input goes
/// through [`DomainName::parse`] (or [`DomainName::parse_with`]) first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DomainName {
    name: String,
    labels: Vec<String>,
    absolute: bool,
    options: IdnaOptions,
}

impl DomainName {
    /// Parse a domain with default IDNA options.
    pub fn parse(input: &str) -> Result<Self> {
        Self::parse_with(input, IdnaOptions::default(), &Uts46Converter)
    }

    /// Parse a domain, converting it to ASCII with the given converter.
    ///
    /// An empty input yields an empty domain, and a single trailing `.` is
    /// kept (see [`DomainName::is_absolute`]). Neither is resolvable, but both
    /// are valid values.
    pub fn parse_with(
        input: &str,
        options: IdnaOptions,
        converter: &dyn IdnaConverter,
    ) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(Self {
                options,
                ..Self::default()
            });
        }

        if input.chars().any(char::is_whitespace) {
            return Err(PslError::InvalidDomain(format!(
                "'{}' contains whitespace",
                input
            )));
        }

        let (body, absolute) = match input.strip_suffix('.') {
            Some(body) => (body, true),
            None => (input, false),
        };

        if body.is_empty() {
            return Ok(Self::root(options));
        }

        let mut ascii = converter.to_ascii(body, options.to_ascii)?;

        // UTS #46 maps U+3002, U+FF0E and U+FF61 to `.`
        let absolute = if !absolute && ascii.ends_with('.') {
            ascii.pop();
            true
        } else {
            absolute
        };
        if absolute && ascii.is_empty() {
            return Ok(Self::root(options));
        }

        if ascii.len() > MAX_DOMAIN_LENGTH {
            return Err(PslError::InvalidDomain(format!(
                "'{}' exceeds {} bytes",
                input, MAX_DOMAIN_LENGTH
            )));
        }

        let mut labels = Vec::new();
        for label in ascii.split('.') {
            if label.is_empty() {
                return Err(PslError::InvalidDomain(format!(
                    "'{}' contains an empty label",
                    input
                )));
            }
            if label.len() > MAX_LABEL_LENGTH {
                return Err(PslError::InvalidDomain(format!(
                    "label '{}' exceeds {} bytes",
                    label, MAX_LABEL_LENGTH
                )));
            }
            labels.push(label.to_string());
        }

        Ok(Self::from_parts(labels, absolute, options))
    }

    /// The bare root separator: absolute, without labels.
    fn root(options: IdnaOptions) -> Self {
        Self {
            name: ".".to_string(),
            labels: Vec::new(),
            absolute: true,
            options,
        }
    }

    /// Build from labels that are already lowercase ASCII.
    pub(crate) fn from_parts(labels: Vec<String>, absolute: bool, options: IdnaOptions) -> Self {
        let mut name = labels.join(".");
        if absolute {
            name.push('.');
        }
        Self {
            name,
            labels,
            absolute,
            options,
        }
    }

    /// Rendered ASCII form, including a trailing `.` if the input had one
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Labels from left to right (`["www", "example", "com"]`)
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Label by position: `0` is the rightmost label, `1` the next one in,
    /// and negative indexes count from the leftmost label (`-1`).
    pub fn label(&self, index: isize) -> Option<&str> {
        let len = self.labels.len() as isize;
        let pos = if index >= 0 {
            len - 1 - index
        } else {
            -index - 1
        };
        if pos < 0 || pos >= len {
            return None;
        }
        self.labels.get(pos as usize).map(String::as_str)
    }

    /// Rightmost label
    pub fn tld(&self) -> Option<&str> {
        self.labels.last().map(String::as_str)
    }

    /// Number of labels
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Whether the input ended with a trailing separator
    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    /// IDNA options this domain was parsed with
    pub fn idna_options(&self) -> IdnaOptions {
        self.options
    }

    /// Whether the domain can have a public suffix distinct from itself
    pub fn is_resolvable(&self) -> bool {
        !self.name.is_empty() && !self.absolute && self.labels.len() >= 2
    }

    /// Unicode rendering using the default converter
    pub fn to_unicode(&self) -> Result<String> {
        self.to_unicode_with(&Uts46Converter)
    }

    pub fn to_unicode_with(&self, converter: &dyn IdnaConverter) -> Result<String> {
        converter.to_unicode(&self.name, self.options.to_unicode)
    }
}

impl FromStr for DomainName {
    type Err = PslError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Serialize for DomainName {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}
