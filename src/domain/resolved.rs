use serde::Serialize;

use super::{DomainName, PublicSuffix};
use crate::types::SuffixSection;

/// A domain split around its public suffix.
///
/// For `www.example.co.uk` with suffix `co.uk` the registrable domain is
/// `example.co.uk` and the sub-domain is `www`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDomain {
    domain: DomainName,
    public_suffix: PublicSuffix,
    registrable_domain: Option<String>,
    sub_domain: Option<String>,
}

impl ResolvedDomain {
    /// `suffix` must be a trailing label sequence of `domain`.
    pub(crate) fn new(domain: DomainName, suffix: PublicSuffix) -> Self {
        let labels = domain.labels();
        debug_assert!(labels.ends_with(suffix.labels()));

        let total = labels.len();
        let suffix_len = suffix.len();

        let registrable_domain = (total > suffix_len)
            .then(|| labels[total - suffix_len - 1..].join("."));
        let sub_domain = (total > suffix_len + 1)
            .then(|| labels[..total - suffix_len - 1].join("."));

        Self {
            domain,
            public_suffix: suffix,
            registrable_domain,
            sub_domain,
        }
    }

    pub fn domain(&self) -> &DomainName {
        &self.domain
    }

    pub fn public_suffix(&self) -> &PublicSuffix {
        &self.public_suffix
    }

    /// Suffix plus one label, absent when the domain is itself a public suffix
    pub fn registrable_domain(&self) -> Option<&str> {
        self.registrable_domain.as_deref()
    }

    /// Labels above the registrable domain
    pub fn sub_domain(&self) -> Option<&str> {
        self.sub_domain.as_deref()
    }

    pub fn section(&self) -> SuffixSection {
        self.public_suffix.section()
    }

    pub fn is_known(&self) -> bool {
        self.public_suffix.is_known()
    }

    pub fn is_icann(&self) -> bool {
        self.public_suffix.is_icann()
    }

    pub fn is_private(&self) -> bool {
        self.public_suffix.is_private()
    }
}
