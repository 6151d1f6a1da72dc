use super::data::RuleData;
use super::node::RuleNode;
use crate::types::ListSection;

/// Immutable rule tree with one independent root per section.
///
/// Built once from [`RuleData`] and never mutated, so it can be shared
/// across threads behind an `Arc` without locking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTree {
    icann: RuleNode,
    private: RuleNode,
}

impl RuleTree {
    /// Build the tree. Top-level keys other than the two section keys are ignored.
    pub fn build(data: &RuleData) -> Self {
        let mut tree = Self::default();
        for (key, value) in data.entries() {
            match ListSection::from_key(key) {
                Some(ListSection::Icann) => tree.icann = RuleNode::from_value(value),
                Some(ListSection::Private) => tree.private = RuleNode::from_value(value),
                None => {}
            }
        }
        tree
    }

    pub fn root(&self, section: ListSection) -> &RuleNode {
        match section {
            ListSection::Icann => &self.icann,
            ListSection::Private => &self.private,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.icann.is_leaf() && self.private.is_leaf()
    }

    /// Longest suffix of `labels` matched by the rules of `section`.
    ///
    /// `labels` run left to right (`["www", "example", "com"]`); the walk
    /// starts at the rightmost one. The returned labels are in the same
    /// left-to-right order, and empty when no rule matched.
    pub fn lookup<S: AsRef<str>>(&self, labels: &[S], section: ListSection) -> Vec<String> {
        let mut node = self.root(section);
        let mut matched: Vec<String> = Vec::new();

        for label in labels.iter().rev() {
            let label = label.as_ref();
            let child = node.child(label);

            // Exception: this exact label is excluded from the suffix
            if child.is_some_and(RuleNode::is_exception) {
                break;
            }

            // Wildcard consumes exactly one label
            if node.is_wildcard() {
                matched.push(label.to_string());
                break;
            }

            match child {
                Some(child) => {
                    matched.push(label.to_string());
                    node = child;
                }
                None => break,
            }
        }

        matched.reverse();
        matched
    }
}
