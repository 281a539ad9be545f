//! Navigation paths: immutable chains of views from a mounting root to a leaf.

use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use crate::node::ViewNodeId;

/// Ordered chain of nodes, root-most first, ending at the deepest active leaf.
///
/// Paths are immutable once built. Clones share the same backing slice, so
/// pushing a path onto history and keeping a copy costs a reference count.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct NavigationPath {
    nodes: Rc<[ViewNodeId]>,
}

impl NavigationPath {
    /// Build a path from its nodes. Returns `None` for an empty chain.
    pub fn from_nodes(nodes: Vec<ViewNodeId>) -> Option<Self> {
        if nodes.is_empty() {
            return None;
        }
        Some(Self {
            nodes: nodes.into(),
        })
    }

    /// Build `prefix ++ [target] ++ suffix`; never empty.
    pub fn from_parts(prefix: &[ViewNodeId], target: ViewNodeId, suffix: &[ViewNodeId]) -> Self {
        let mut nodes = Vec::with_capacity(prefix.len() + 1 + suffix.len());
        nodes.extend_from_slice(prefix);
        nodes.push(target);
        nodes.extend_from_slice(suffix);
        Self {
            nodes: nodes.into(),
        }
    }

    pub fn nodes(&self) -> &[ViewNodeId] {
        &self.nodes
    }

    /// Deepest node of the path.
    pub fn leaf(&self) -> ViewNodeId {
        self.nodes[self.nodes.len() - 1]
    }

    /// Root-most node of the path.
    pub fn first(&self) -> ViewNodeId {
        self.nodes[0]
    }

    pub fn get(&self, depth: usize) -> Option<ViewNodeId> {
        self.nodes.get(depth).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; kept for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: ViewNodeId) -> bool {
        self.nodes.contains(&id)
    }

    /// Whether both paths visit exactly the same nodes, ignoring order.
    pub fn same_nodes(&self, other: &NavigationPath) -> bool {
        if Rc::ptr_eq(&self.nodes, &other.nodes) {
            return true;
        }
        let ours: BTreeSet<_> = self.nodes.iter().collect();
        let theirs: BTreeSet<_> = other.nodes.iter().collect();
        ours == theirs
    }

    /// First depth, within the shared length, where the two paths differ.
    ///
    /// `None` when one path is a prefix of the other.
    pub fn divergence(&self, other: &NavigationPath) -> Option<usize> {
        self.nodes
            .iter()
            .zip(other.nodes.iter())
            .position(|(a, b)| a != b)
    }
}

impl fmt::Debug for NavigationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.nodes.iter()).finish()
    }
}

impl fmt::Display for NavigationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.nodes.iter().enumerate() {
            if i > 0 {
                f.write_str(" → ")?;
            }
            write!(f, "{id}")?;
        }
        Ok(())
    }
}
