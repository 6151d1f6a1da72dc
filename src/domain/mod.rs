//! Domain value objects: the canonical parsed name, its public suffix, and
//! the resolved split between them.

mod name;
mod resolved;
mod suffix;

pub use name::{DomainName, MAX_DOMAIN_LENGTH, MAX_LABEL_LENGTH};
pub use resolved::ResolvedDomain;
pub use suffix::PublicSuffix;
