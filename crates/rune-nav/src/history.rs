//! Back-navigable history of navigation paths.

use crate::node::ViewNodeId;
use crate::path::NavigationPath;

/// Last-in-first-out stack of [`NavigationPath`]s.
///
/// The leaf of the top path is the active view; an empty stack means no view
/// is active.
#[derive(Debug, Clone, Default)]
pub struct HistoryStack {
    entries: Vec<NavigationPath>,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: NavigationPath) {
        self.entries.push(path);
    }

    pub fn pop(&mut self) -> Option<NavigationPath> {
        self.entries.pop()
    }

    pub fn top(&self) -> Option<&NavigationPath> {
        self.entries.last()
    }

    /// Leaf of the top path: the currently visible deepest view.
    pub fn top_leaf(&self) -> Option<ViewNodeId> {
        self.top().map(NavigationPath::leaf)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry except the top one.
    pub fn retain_top(&mut self) {
        if self.entries.len() > 1 {
            let keep = self.entries.len() - 1;
            self.entries.drain(..keep);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &NavigationPath> {
        self.entries.iter()
    }
}
