//! Navigation index for one category.
//!
//! Nodes live in a flat arena; branches reference their children by index.
//! The tree is built once by the walker and never mutated afterwards.

use std::collections::HashMap;

use serde::Serialize;

/// One entry of the navigation tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavNode {
    /// A markdown document.
    Leaf { label: String, key: String },
    /// A directory. `children` are arena indices in listing order.
    Branch {
        label: String,
        key: String,
        children: Vec<usize>,
    },
}

impl NavNode {
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Leaf { label, .. } | Self::Branch { label, .. } => label,
        }
    }

    /// Route path relative to the docs root.
    ///
    /// Leaves: `frontend/tools/vim`. Branches carry a trailing slash
    /// (`frontend/tools/`) so a directory never shares a key with a
    /// same-named document next to it.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Leaf { key, .. } | Self::Branch { key, .. } => key,
        }
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    #[must_use]
    pub fn children(&self) -> &[usize] {
        match self {
            Self::Leaf { .. } => &[],
            Self::Branch { children, .. } => children,
        }
    }
}

/// Serializable nested form of the tree, as sent to the menu.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub label: String,
    pub key: String,
    /// Absent for leaves, possibly empty for branches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NavItem>>,
}

/// Arena-backed navigation tree.
#[derive(Clone, Debug, Default)]
pub struct NavTree {
    nodes: Vec<NavNode>,
    roots: Vec<usize>,
    key_index: HashMap<String, usize>,
}

impl NavTree {
    pub(crate) fn new(nodes: Vec<NavNode>, roots: Vec<usize>) -> Self {
        let key_index = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.key().to_owned(), i))
            .collect();
        Self {
            nodes,
            roots,
            key_index,
        }
    }

    /// Top-level entries, in listing order.
    #[must_use]
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    #[must_use]
    pub fn node(&self, index: usize) -> Option<&NavNode> {
        self.nodes.get(index)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&NavNode> {
        self.key_index.get(key).and_then(|&i| self.nodes.get(i))
    }

    /// Total number of nodes, branches included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node indices in depth-first pre-order, which is menu order.
    fn preorder(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();
        while let Some(index) = stack.pop() {
            order.push(index);
            if let Some(node) = self.nodes.get(index) {
                stack.extend(node.children().iter().rev());
            }
        }
        order
    }

    /// Every document, in menu order.
    #[must_use]
    pub fn leaves(&self) -> Vec<&NavNode> {
        self.preorder()
            .into_iter()
            .filter_map(|i| self.nodes.get(i))
            .filter(|node| node.is_leaf())
            .collect()
    }

    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_leaf()).count()
    }

    #[must_use]
    pub fn first_leaf(&self) -> Option<&NavNode> {
        self.leaves().into_iter().next()
    }

    /// Documents before and after `key` in menu order.
    ///
    /// Both are `None` when `key` is not a document of this tree.
    #[must_use]
    pub fn neighbors(&self, key: &str) -> (Option<&NavNode>, Option<&NavNode>) {
        let leaves = self.leaves();
        let Some(pos) = leaves.iter().position(|node| node.key() == key) else {
            return (None, None);
        };
        let prev = pos.checked_sub(1).and_then(|i| leaves.get(i)).copied();
        let next = leaves.get(pos + 1).copied();
        (prev, next)
    }

    /// Nested items for serialization and templates.
    #[must_use]
    pub fn to_items(&self) -> Vec<NavItem> {
        self.roots.iter().filter_map(|&i| self.item(i)).collect()
    }

    fn item(&self, index: usize) -> Option<NavItem> {
        let node = self.nodes.get(index)?;
        let children = match node {
            NavNode::Leaf { .. } => None,
            NavNode::Branch { children, .. } => {
                Some(children.iter().filter_map(|&c| self.item(c)).collect())
            }
        };
        Some(NavItem {
            label: node.label().to_owned(),
            key: node.key().to_owned(),
            children,
        })
    }
}
