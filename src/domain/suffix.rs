use std::fmt;

use serde::Serialize;

use crate::types::{ListSection, SuffixSection};

/// Public suffix of a domain, and the section that produced it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PublicSuffix {
    labels: Vec<String>,
    section: SuffixSection,
}

impl PublicSuffix {
    /// Suffix matched by a rule in `section`. `labels` must not be empty.
    pub(crate) fn matched(labels: Vec<String>, section: ListSection) -> Self {
        debug_assert!(!labels.is_empty());
        Self {
            labels,
            section: section.into(),
        }
    }

    /// Fallback when no rule matched: the rightmost label alone
    pub(crate) fn unknown(tld: &str) -> Self {
        Self {
            labels: vec![tld.to_string()],
            section: SuffixSection::Unknown,
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn section(&self) -> SuffixSection {
        self.section
    }

    /// Whether the suffix is listed, as opposed to the rightmost-label fallback
    pub fn is_known(&self) -> bool {
        self.section != SuffixSection::Unknown
    }

    pub fn is_icann(&self) -> bool {
        self.section == SuffixSection::Icann
    }

    pub fn is_private(&self) -> bool {
        self.section == SuffixSection::Private
    }
}

impl fmt::Display for PublicSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.labels.join("."))
    }
}
