//! IDNA conversion boundary.
//!
//! Rule labels and domain names are converted to their ASCII form once, at
//! load or parse time. The engine never looks at the option bits; they are
//! handed to the [`IdnaConverter`] as-is.

use crate::error::{PslError, Result};

/// No conversion flags
pub const IDNA_DEFAULT: u32 = 0;

/// Apply STD3 ASCII rules (letters, digits and hyphen only) when converting to ASCII
pub const IDNA_USE_STD3_RULES: u32 = 0x02;

/// Conversion options: one opaque bitmask per direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IdnaOptions {
    pub to_ascii: u32,
    pub to_unicode: u32,
}

impl IdnaOptions {
    pub fn new(to_ascii: u32, to_unicode: u32) -> Self {
        Self {
            to_ascii,
            to_unicode,
        }
    }

    /// Set ASCII-direction flags
    pub fn with_ascii(mut self, flags: u32) -> Self {
        self.to_ascii = flags;
        self
    }

    /// Set Unicode-direction flags
    pub fn with_unicode(mut self, flags: u32) -> Self {
        self.to_unicode = flags;
        self
    }
}

/// Trait for two-way IDNA conversion
pub trait IdnaConverter: Send + Sync {
    /// Convert a domain (or single label) to its ASCII form
    fn to_ascii(&self, domain: &str, flags: u32) -> Result<String>;

    /// Convert a domain (or single label) to its Unicode form
    fn to_unicode(&self, domain: &str, flags: u32) -> Result<String>;
}

/// UTS #46 converter backed by the `idna` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct Uts46Converter;

impl IdnaConverter for Uts46Converter {
    fn to_ascii(&self, domain: &str, flags: u32) -> Result<String> {
        if domain.is_ascii() && flags & IDNA_USE_STD3_RULES == 0 {
            return Ok(domain.to_ascii_lowercase());
        }

        let converted = if flags & IDNA_USE_STD3_RULES != 0 {
            idna::domain_to_ascii_strict(domain)
        } else {
            idna::domain_to_ascii(domain)
        };

        converted.map_err(|e| {
            PslError::InvalidDomain(format!("IDNA conversion of '{}' failed: {:?}", domain, e))
        })
    }

    fn to_unicode(&self, domain: &str, _flags: u32) -> Result<String> {
        if !domain.contains("xn--") {
            return Ok(domain.to_string());
        }

        let (unicode, outcome) = idna::domain_to_unicode(domain);
        outcome.map_err(|e| {
            PslError::InvalidDomain(format!("IDNA conversion of '{}' failed: {:?}", domain, e))
        })?;
        Ok(unicode)
    }
}
