//! # Composition Value Tree
//!
//! [`Composition`] is the in-memory representation of converted validation
//! output: a recursive, order-independent tree whose nodes are either a
//! scalar leaf or an interior node of named children.
//!
//! ## Invariants
//!
//! - A node is never both a leaf and an interior node — the enum makes the
//!   combined state unrepresentable.
//! - An empty interior node is distinct from a leaf without a value.
//! - Repeated [`put`](Composition::put) with the same key overwrites; last
//!   write wins, there is no merging.
//! - Children are keyed in a `BTreeMap`, so equality is order-independent
//!   and rendering is deterministic. Key order is a presentation detail,
//!   not a contract.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TreeError;

/// A recursive value tree: scalar leaf or named children, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Composition {
    /// A scalar leaf. `None` models a property that was present on the
    /// wire without a value.
    Leaf(Option<String>),
    /// An interior node holding named sub-trees.
    Tree(BTreeMap<String, Composition>),
}

impl Composition {
    /// Create an empty interior node.
    pub fn tree() -> Self {
        Self::Tree(BTreeMap::new())
    }

    /// Create a leaf holding a scalar value.
    pub fn leaf(value: impl Into<String>) -> Self {
        Self::Leaf(Some(value.into()))
    }

    /// Create a leaf without a value.
    pub fn null() -> Self {
        Self::Leaf(None)
    }

    /// Returns `true` if this node is a scalar leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// The scalar value of a leaf, if any. Interior nodes have none.
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Leaf(v) => v.as_deref(),
            Self::Tree(_) => None,
        }
    }

    /// Look up a direct child by exact key. Leaves have no children.
    pub fn get(&self, key: &str) -> Option<&Composition> {
        match self {
            Self::Leaf(_) => None,
            Self::Tree(children) => children.get(key),
        }
    }

    /// The child map of an interior node.
    pub fn children(&self) -> Option<&BTreeMap<String, Composition>> {
        match self {
            Self::Leaf(_) => None,
            Self::Tree(children) => Some(children),
        }
    }

    /// Insert or overwrite a child node. Last write wins.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::ChildOfLeaf`] when called on a leaf — a leaf
    /// never silently becomes an interior node.
    pub fn put(&mut self, key: impl Into<String>, node: Composition) -> Result<(), TreeError> {
        match self {
            Self::Leaf(_) => Err(TreeError::ChildOfLeaf { key: key.into() }),
            Self::Tree(children) => {
                children.insert(key.into(), node);
                Ok(())
            }
        }
    }

    /// Insert or overwrite a scalar child. Shorthand for
    /// `put(key, Composition::leaf(value))`.
    pub fn put_value(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), TreeError> {
        self.put(key, Composition::leaf(value))
    }

    /// The scalar children of an interior node as a name→value map.
    ///
    /// Valueless leaves and nested sub-trees are omitted. Mainly an
    /// assertion convenience for validation-result consumers.
    pub fn properties(&self) -> BTreeMap<&str, &str> {
        match self {
            Self::Leaf(_) => BTreeMap::new(),
            Self::Tree(children) => children
                .iter()
                .filter_map(|(k, v)| v.value().map(|val| (k.as_str(), val)))
                .collect(),
        }
    }
}

impl Default for Composition {
    fn default() -> Self {
        Self::tree()
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(Some(v)) => write!(f, "{v}"),
            Self::Leaf(None) => write!(f, "null"),
            Self::Tree(children) => {
                write!(f, "{{")?;
                for (i, (key, child)) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}={child}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_and_tree_are_distinct() {
        assert_ne!(Composition::null(), Composition::tree());
        assert!(Composition::null().is_leaf());
        assert!(!Composition::tree().is_leaf());
    }

    #[test]
    fn put_overwrites_last_write_wins() {
        let mut node = Composition::tree();
        node.put_value("valid", "true").unwrap();
        node.put_value("valid", "false").unwrap();
        assert_eq!(node.get("valid").and_then(|c| c.value()), Some("false"));
        assert_eq!(node.children().unwrap().len(), 1);
    }

    #[test]
    fn put_on_leaf_is_rejected() {
        let mut node = Composition::leaf("42");
        let err = node.put_value("child", "x").unwrap_err();
        assert!(format!("{err}").contains("child"));
        // The leaf is untouched.
        assert_eq!(node.value(), Some("42"));
    }

    #[test]
    fn nested_trees() {
        let mut thresholds = Composition::tree();
        thresholds.put_value("red", "3").unwrap();
        thresholds.put_value("yellow", "10").unwrap();

        let mut module = Composition::tree();
        module.put_value("valid", "false").unwrap();
        module.put("thresholds", thresholds).unwrap();

        let nested = module.get("thresholds").unwrap();
        assert_eq!(nested.get("red").and_then(|c| c.value()), Some("3"));
        assert!(module.get("missing").is_none());
    }

    #[test]
    fn equality_is_order_independent() {
        let mut a = Composition::tree();
        a.put_value("x", "1").unwrap();
        a.put_value("y", "2").unwrap();

        let mut b = Composition::tree();
        b.put_value("y", "2").unwrap();
        b.put_value("x", "1").unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn properties_skips_subtrees_and_null_leaves() {
        let mut node = Composition::tree();
        node.put_value("valid", "true").unwrap();
        node.put("empty", Composition::null()).unwrap();
        node.put("sub", Composition::tree()).unwrap();

        let props = node.properties();
        assert_eq!(props.len(), 1);
        assert_eq!(props.get("valid"), Some(&"true"));
    }

    #[test]
    fn display_renders_sorted_pairs() {
        let mut node = Composition::tree();
        node.put_value("b", "2").unwrap();
        node.put_value("a", "1").unwrap();
        node.put("n", Composition::null()).unwrap();
        assert_eq!(node.to_string(), "{a=1, b=2, n=null}");
        assert_eq!(Composition::leaf("raw").to_string(), "raw");
        assert_eq!(Composition::tree().to_string(), "{}");
    }

    proptest::proptest! {
        #[test]
        fn put_is_last_write_wins_for_any_key(key in ".{1,24}", first in ".{0,24}", second in ".{0,24}") {
            let mut node = Composition::tree();
            node.put_value(key.as_str(), first.as_str()).unwrap();
            node.put_value(key.as_str(), second.as_str()).unwrap();
            proptest::prop_assert_eq!(node.get(&key).and_then(|c| c.value()), Some(second.as_str()));
            proptest::prop_assert_eq!(node.children().unwrap().len(), 1);
        }
    }

    #[test]
    fn serde_shapes() {
        let mut node = Composition::tree();
        node.put_value("valid", "true").unwrap();
        node.put("gap", Composition::null()).unwrap();

        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["valid"], "true");
        assert!(json["gap"].is_null());

        let back: Composition = serde_json::from_value(json).unwrap();
        assert_eq!(back, node);
    }
}
