//! IANA root zone top-level domain list (`tlds-alpha-by-domain.txt`).

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainName, PublicSuffix, ResolvedDomain};
use crate::error::{PslError, Result};
use crate::idn::{IdnaConverter, IdnaOptions, Uts46Converter, IDNA_DEFAULT};
use crate::resolver::ensure_resolvable;
use crate::types::ListSection;

/// Header of the IANA list
/// Format: # Version 2018082200, Last Updated Wed Aug 22 07:07:01 2018 UTC
static HEADER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#\s*Version\s+(?P<version>\d+),\s*Last Updated\s+(?P<date>.+?)\s*$")
        .expect("HEADER_PATTERN: hardcoded regex is invalid")
});

/// Set of delegated top-level domains
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopLevelDomains {
    version: String,
    last_updated: String,
    tlds: BTreeSet<String>,
}

impl TopLevelDomains {
    /// Parse the IANA text list.
    pub fn parse(text: &str, options: &IdnaOptions) -> Result<Self> {
        Self::parse_with(text, options, &Uts46Converter)
    }

    /// Parse the IANA text list with a custom IDNA converter.
    pub fn parse_with(
        text: &str,
        options: &IdnaOptions,
        converter: &dyn IdnaConverter,
    ) -> Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let (_, header) = lines
            .next()
            .ok_or_else(|| PslError::invalid_data("TLD list is empty"))?;
        let captures = HEADER_PATTERN
            .captures(header)
            .ok_or_else(|| PslError::invalid_data(format!("Invalid TLD list header: {}", header)))?;

        let version = captures["version"].to_string();
        let last_updated = captures["date"].to_string();

        let mut tlds = BTreeSet::new();
        for (line_num, line) in lines {
            if line.starts_with('#') {
                continue;
            }
            if line.contains('.') || line.contains(char::is_whitespace) {
                return Err(PslError::invalid_data(format!(
                    "line {}: '{}' is not a single label",
                    line_num, line
                )));
            }
            let tld = converter
                .to_ascii(&line.to_lowercase(), options.to_ascii)
                .map_err(|e| PslError::invalid_data(format!("line {}: {}", line_num, e)))?;
            tlds.insert(tld);
        }

        if tlds.is_empty() {
            return Err(PslError::invalid_data("TLD list contains no entries"));
        }

        tracing::debug!(version = %version, count = tlds.len(), "parsed TLD list");
        Ok(Self {
            version,
            last_updated,
            tlds,
        })
    }

    /// Decode a JSON snapshot
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| PslError::invalid_data(format!("Malformed TLD snapshot: {}", e)))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn last_updated(&self) -> &str {
        &self.last_updated
    }

    pub fn len(&self) -> usize {
        self.tlds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tlds.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tlds.iter().map(String::as_str)
    }

    /// Whether `tld` (ASCII or Unicode, any case) is delegated
    pub fn contains(&self, tld: &str) -> bool {
        self.contains_with(tld, &Uts46Converter)
    }

    /// Membership test converting `tld` with a custom IDNA converter
    pub fn contains_with(&self, tld: &str, converter: &dyn IdnaConverter) -> bool {
        match converter.to_ascii(tld, IDNA_DEFAULT) {
            Ok(ascii) => self.tlds.contains(&ascii),
            Err(_) => false,
        }
    }

    /// Resolve a domain against the root zone: the suffix is the rightmost
    /// label, tagged ICANN when it is delegated.
    pub fn resolve(&self, domain: &DomainName) -> Result<ResolvedDomain> {
        ensure_resolvable(domain)?;

        let tld = domain.tld().unwrap_or_default();
        let suffix = if self.tlds.contains(tld) {
            PublicSuffix::matched(vec![tld.to_string()], ListSection::Icann)
        } else {
            PublicSuffix::unknown(tld)
        };
        Ok(ResolvedDomain::new(domain.clone(), suffix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST: &str = "# Version 2018082200, Last Updated Wed Aug 22 07:07:01 2018 UTC
AAA
COM
UK
XN--55QX5D
";

    #[test]
    fn test_parse_header_and_entries() {
        let tlds = TopLevelDomains::parse(LIST, &IdnaOptions::default()).unwrap();
        assert_eq!(tlds.version(), "2018082200");
        assert_eq!(tlds.last_updated(), "Wed Aug 22 07:07:01 2018 UTC");
        assert_eq!(tlds.len(), 4);
        assert!(tlds.contains("com"));
        assert!(tlds.contains("COM"));
        assert!(tlds.contains("公司"));
        assert!(!tlds.contains("localhost"));
    }

    #[test]
    fn test_invalid_header() {
        let err = TopLevelDomains::parse("COM\nNET\n", &IdnaOptions::default()).unwrap_err();
        assert!(matches!(err, PslError::InvalidListSource { .. }));
        assert!(TopLevelDomains::parse("", &IdnaOptions::default()).is_err());
    }

    #[test]
    fn test_invalid_entry() {
        let text = "# Version 1, Last Updated today\nCO.UK\n";
        let err = TopLevelDomains::parse(text, &IdnaOptions::default()).unwrap_err();
        assert!(err.to_string().contains("line 2"), "got: {}", err);
    }

    #[test]
    fn test_header_only_is_invalid() {
        let text = "# Version 1, Last Updated today\n";
        assert!(TopLevelDomains::parse(text, &IdnaOptions::default()).is_err());
    }

    #[test]
    fn test_resolve() {
        let tlds = TopLevelDomains::parse(LIST, &IdnaOptions::default()).unwrap();

        let known = tlds
            .resolve(&DomainName::parse("www.example.com").unwrap())
            .unwrap();
        assert_eq!(known.public_suffix().to_string(), "com");
        assert!(known.is_icann());
        assert_eq!(known.registrable_domain(), Some("example.com"));

        let unknown = tlds
            .resolve(&DomainName::parse("www.example.localhost").unwrap())
            .unwrap();
        assert!(!unknown.is_known());

        assert!(tlds.resolve(&DomainName::parse("com").unwrap()).is_err());
    }

    /// Maps the label `local` to `com`, rejects anything non-ASCII
    struct AliasConverter;

    impl IdnaConverter for AliasConverter {
        fn to_ascii(&self, domain: &str, _flags: u32) -> Result<String> {
            match domain {
                "local" => Ok("com".to_string()),
                d if d.is_ascii() => Ok(d.to_ascii_lowercase()),
                d => Err(PslError::InvalidDomain(format!("'{}' is not ASCII", d))),
            }
        }

        fn to_unicode(&self, domain: &str, _flags: u32) -> Result<String> {
            Ok(domain.to_string())
        }
    }

    #[test]
    fn test_parse_with_custom_converter() {
        let text = "# Version 1, Last Updated today\nLOCAL\nUK\n";
        let tlds =
            TopLevelDomains::parse_with(text, &IdnaOptions::default(), &AliasConverter).unwrap();
        assert!(tlds.contains("com"));
        assert!(!tlds.contains("local"));
        assert!(tlds.contains_with("local", &AliasConverter));

        let text = "# Version 1, Last Updated today\nUK\n公司\n";
        let err = TopLevelDomains::parse_with(text, &IdnaOptions::default(), &AliasConverter)
            .unwrap_err();
        assert!(err.to_string().contains("line 3"), "got: {}", err);
    }

    #[test]
    fn test_json_snapshot() {
        let tlds = TopLevelDomains::parse(LIST, &IdnaOptions::default()).unwrap();
        let json = tlds.to_json().unwrap();
        assert_eq!(TopLevelDomains::from_json(&json).unwrap(), tlds);
    }
}
