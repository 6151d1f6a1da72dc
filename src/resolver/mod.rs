//! Suffix resolver module.
//!
//! Applies the section policy on top of the rule tree: ICANN is the default
//! source of truth, and a PRIVATE rule only wins when it is strictly longer.

use std::sync::Arc;

use crate::domain::{DomainName, PublicSuffix, ResolvedDomain};
use crate::error::{PslError, Result};
use crate::idn::{IdnaOptions, Uts46Converter};
use crate::parser::parse_list;
use crate::rules::{RuleData, RuleTree};
use crate::types::{ListSection, Section};

/// A loaded Public Suffix List.
///
/// Cloning is cheap: the rule tree is built once and shared by reference.
#[derive(Debug, Clone)]
pub struct Rules {
    tree: Arc<RuleTree>,
    idna: IdnaOptions,
}

impl Rules {
    /// Create rules from an already-built tree.
    pub fn new(tree: RuleTree) -> Self {
        Self {
            tree: Arc::new(tree),
            idna: IdnaOptions::default(),
        }
    }

    /// Create rules from structured rule data.
    pub fn from_rule_data(data: &RuleData) -> Self {
        Self::new(RuleTree::build(data))
    }

    /// Create rules from Public Suffix List text.
    pub fn from_list(text: &str, options: IdnaOptions) -> Result<Self> {
        let data = parse_list(text, &options)?;
        Ok(Self::from_rule_data(&data).with_idna_options(options))
    }

    /// Set the IDNA options used when parsing string input.
    pub fn with_idna_options(mut self, options: IdnaOptions) -> Self {
        self.idna = options;
        self
    }

    pub fn idna_options(&self) -> IdnaOptions {
        self.idna
    }

    pub fn tree(&self) -> &RuleTree {
        &self.tree
    }

    /// Resolve a domain into public suffix, registrable domain and sub-domain.
    pub fn resolve(&self, domain: &DomainName, section: Section) -> Result<ResolvedDomain> {
        let suffix = self.public_suffix(domain, section)?;
        Ok(ResolvedDomain::new(domain.clone(), suffix))
    }

    /// Public suffix of a domain.
    pub fn public_suffix(&self, domain: &DomainName, section: Section) -> Result<PublicSuffix> {
        ensure_resolvable(domain)?;
        let suffix = self.find_public_suffix(domain, section);
        tracing::trace!(
            domain = domain.as_str(),
            suffix = %suffix,
            section = ?suffix.section(),
            "resolved public suffix"
        );
        Ok(suffix)
    }

    /// Parse `host` with this list's IDNA options, then resolve it.
    pub fn resolve_host(&self, host: &str, section: Section) -> Result<ResolvedDomain> {
        let domain = self.parse_host(host)?;
        self.resolve(&domain, section)
    }

    /// Parse `host` with this list's IDNA options, then find its public suffix.
    pub fn public_suffix_of(&self, host: &str, section: Section) -> Result<PublicSuffix> {
        let domain = self.parse_host(host)?;
        self.public_suffix(&domain, section)
    }

    fn parse_host(&self, host: &str) -> Result<DomainName> {
        DomainName::parse_with(host, self.idna, &Uts46Converter)
    }

    fn find_public_suffix(&self, domain: &DomainName, section: Section) -> PublicSuffix {
        let icann = self.find_in_section(domain, ListSection::Icann);
        if section == Section::Icann {
            return icann;
        }

        let private = self.find_in_section(domain, ListSection::Private);
        // Strictly longer: on a tie ICANN wins
        if private.len() > icann.len() {
            return private;
        }

        if section == Section::Private {
            return unknown_suffix(domain);
        }

        icann
    }

    fn find_in_section(&self, domain: &DomainName, section: ListSection) -> PublicSuffix {
        let matched = self.tree.lookup(domain.labels(), section);
        if matched.is_empty() {
            return unknown_suffix(domain);
        }
        PublicSuffix::matched(matched, section)
    }
}

/// Validation shared by every resolution entry point.
pub(crate) fn ensure_resolvable(domain: &DomainName) -> Result<()> {
    if domain.is_resolvable() {
        return Ok(());
    }

    let reason = if domain.as_str().is_empty() {
        "domain is empty".to_string()
    } else if domain.is_absolute() {
        format!("'{}' ends with a label separator", domain)
    } else {
        format!("'{}' has fewer than two labels", domain)
    };
    Err(PslError::UnresolvableDomain(reason))
}

fn unknown_suffix(domain: &DomainName) -> PublicSuffix {
    PublicSuffix::unknown(domain.tld().unwrap_or_default())
}
