//! Rule storage: structured rule data and the immutable tree built from it.

mod data;
mod node;
mod tree;

pub use data::RuleData;
pub use node::{RuleNode, EXCEPTION_KEY, WILDCARD_KEY};
pub use tree::RuleTree;
