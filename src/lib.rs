//! PSL Engine - Public Suffix List resolution for Rust
//!
//! This library determines the public suffix of a domain name (the part not
//! controlled by the registrant, such as `co.uk` or `com`) and splits the
//! domain into registrable domain and sub-domain. It supports:
//! - ICANN / PRIVATE section selection, or the best match across both
//! - Wildcard (`*.ck`) and exception (`!www.ck`) rules
//! - IDN domains and rules through UTS #46 conversion
//! - Snapshot caching of parsed lists (memory, LRU, directory)
//! - The IANA root zone TLD list
//!
//! # Example
//!
//! ```rust
//! use psl_engine_r::{IdnaOptions, Rules, Section};
//!
//! let list = "
//! // ===BEGIN ICANN DOMAINS===
//! uk
//! co.uk
//! *.ck
//! !www.ck
//! // ===END ICANN DOMAINS===
//! // ===BEGIN PRIVATE DOMAINS===
//! blogspot.co.uk
//! // ===END PRIVATE DOMAINS===
//! ";
//!
//! let rules = Rules::from_list(list, IdnaOptions::default()).unwrap();
//!
//! let resolved = rules.resolve_host("www.example.co.uk", Section::Effective).unwrap();
//! assert_eq!(resolved.public_suffix().to_string(), "co.uk");
//! assert_eq!(resolved.registrable_domain(), Some("example.co.uk"));
//! assert_eq!(resolved.sub_domain(), Some("www"));
//!
//! // A private rule wins only when it is strictly longer than the ICANN one
//! let blog = rules.public_suffix_of("foo.blogspot.co.uk", Section::Effective).unwrap();
//! assert!(blog.is_private());
//!
//! // ICANN-only resolution never returns a private rule
//! let icann = rules.public_suffix_of("foo.blogspot.co.uk", Section::Icann).unwrap();
//! assert_eq!(icann.to_string(), "co.uk");
//! ```
//!
//! # Sections
//!
//! | Section | Trusts | When no rule matches |
//! |---------|--------|----------------------|
//! | `Section::Icann` | ICANN rules | rightmost label, unknown |
//! | `Section::Private` | PRIVATE rules longer than any ICANN match | rightmost label, unknown |
//! | `Section::Effective` | both, longest wins, ICANN on ties | rightmost label, unknown |
//!
//! # Loading
//!
//! [`ListManager`] loads lists from files or text and stores a JSON snapshot
//! of the parsed rules in a [`ListCache`], keyed by URI.

pub mod cache;
pub mod domain;
pub mod error;
pub mod idn;
pub mod loader;
pub mod parser;
pub mod resolver;
pub mod rules;
pub mod tld;
pub mod types;

// Re-export commonly used items
pub use cache::{DirListCache, ListCache, LruListCache, MemoryListCache, NilListCache};
pub use domain::{DomainName, PublicSuffix, ResolvedDomain};
pub use error::{PslError, Result, SourceErrorKind};
pub use idn::{IdnaConverter, IdnaOptions, Uts46Converter, IDNA_DEFAULT, IDNA_USE_STD3_RULES};
pub use loader::{ListFormat, ListManager};
pub use parser::{parse_list, parse_list_from_file};
pub use resolver::Rules;
pub use rules::{RuleData, RuleNode, RuleTree};
pub use tld::TopLevelDomains;
pub use types::{ListSection, Section, SuffixSection, ICANN_DOMAINS, PRIVATE_DOMAINS};
