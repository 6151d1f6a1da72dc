use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::PslError;

/// Top-level key of the ICANN section in structured rule data
pub const ICANN_DOMAINS: &str = "ICANN_DOMAINS";

/// Top-level key of the PRIVATE section in structured rule data
pub const PRIVATE_DOMAINS: &str = "PRIVATE_DOMAINS";

/// One of the two independent partitions of a Public Suffix List
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListSection {
    Icann,
    Private,
}

impl ListSection {
    /// Key of this section in structured rule data
    pub fn key(&self) -> &'static str {
        match self {
            ListSection::Icann => ICANN_DOMAINS,
            ListSection::Private => PRIVATE_DOMAINS,
        }
    }

    /// Section for a structured rule data key, if recognized
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            ICANN_DOMAINS => Some(ListSection::Icann),
            PRIVATE_DOMAINS => Some(ListSection::Private),
            _ => None,
        }
    }
}

/// Which part of the list a resolution is allowed to trust
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Section {
    /// ICANN rules only
    Icann,
    /// PRIVATE rules only
    Private,
    /// Best match across both sections
    #[default]
    Effective,
}

impl FromStr for Section {
    type Err = PslError;

    /// Accepts the structured data keys, or an empty string for [`Section::Effective`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Section::Effective),
            ICANN_DOMAINS => Ok(Section::Icann),
            PRIVATE_DOMAINS => Ok(Section::Private),
            other => Err(PslError::UnresolvableDomain(format!(
                "unsupported section: {}",
                other
            ))),
        }
    }
}

/// Section that produced a public suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuffixSection {
    Icann,
    Private,
    /// No rule matched; the suffix is the rightmost label alone
    Unknown,
}

impl From<ListSection> for SuffixSection {
    fn from(section: ListSection) -> Self {
        match section {
            ListSection::Icann => SuffixSection::Icann,
            ListSection::Private => SuffixSection::Private,
        }
    }
}

impl fmt::Display for SuffixSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuffixSection::Icann => f.write_str(ICANN_DOMAINS),
            SuffixSection::Private => f.write_str(PRIVATE_DOMAINS),
            SuffixSection::Unknown => Ok(()),
        }
    }
}
