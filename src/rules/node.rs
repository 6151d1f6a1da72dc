use std::collections::HashMap;

use serde_json::Value;

/// Key marking a wildcard rule in structured rule data
pub const WILDCARD_KEY: &str = "*";

/// Key marking an exception rule in structured rule data
pub const EXCEPTION_KEY: &str = "!";

/// A node of the rule tree.
///
/// `is_wildcard` means any single label below this node matches (`*.ck`).
/// `is_exception` means the label that led to this node is carved out of the
/// suffix (`!www.ck`). Both are explicit fields, so a real label named `*`
/// could never be confused with the wildcard marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleNode {
    children: HashMap<String, RuleNode>,
    is_wildcard: bool,
    is_exception: bool,
}

impl RuleNode {
    /// Build a node from one level of structured rule data.
    ///
    /// Anything that is not an object (an empty array, a string, null) is a
    /// node with no children and no markers.
    pub fn from_value(value: &Value) -> Self {
        let mut node = Self::default();
        let Value::Object(map) = value else {
            return node;
        };

        node.children.reserve(map.len());
        for (key, child) in map {
            match key.as_str() {
                WILDCARD_KEY => node.is_wildcard = true,
                EXCEPTION_KEY => node.is_exception = true,
                label => {
                    node.children
                        .insert(label.to_string(), RuleNode::from_value(child));
                }
            }
        }
        node
    }

    /// Exact child reached by `label`
    pub fn child(&self, label: &str) -> Option<&RuleNode> {
        self.children.get(label)
    }

    pub fn is_wildcard(&self) -> bool {
        self.is_wildcard
    }

    pub fn is_exception(&self) -> bool {
        self.is_exception
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, excluding this one
    pub fn descendant_count(&self) -> usize {
        self.children
            .values()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_values_are_leaves() {
        for value in [json!([]), json!({}), json!(""), json!(null)] {
            let node = RuleNode::from_value(&value);
            assert!(node.is_leaf());
            assert!(!node.is_wildcard());
            assert!(!node.is_exception());
        }
    }

    #[test]
    fn test_markers_become_fields() {
        let node = RuleNode::from_value(&json!({
            "ck": { "*": [], "www": { "!": "" } }
        }));

        let ck = node.child("ck").unwrap();
        assert!(ck.is_wildcard());
        assert!(ck.child("*").is_none());

        let www = ck.child("www").unwrap();
        assert!(www.is_exception());
        assert!(www.is_leaf());
    }

    #[test]
    fn test_descendant_count() {
        let node = RuleNode::from_value(&json!({
            "uk": { "co": {}, "org": {} },
            "com": {}
        }));
        assert_eq!(node.descendant_count(), 4);
    }
}
