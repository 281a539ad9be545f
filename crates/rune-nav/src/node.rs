//! View nodes and their identifiers.
//!
//! This module defines the fundamental types of the view tree:
//! - `ViewNodeId`: Stable arena index of a node
//! - `ViewKey`: Authored name identifying which screen a node represents
//! - `Capabilities`: Value bitset of navigation capabilities (modal, popup)
//! - `Slot`: A candidate slot holding either a prototype or its live instance
//! - `ViewNode`: A node in the tree

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable index of a node inside a [`ViewTree`](crate::ViewTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ViewNodeId(pub u32);

impl ViewNodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ViewNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Authored identity of a screen (e.g. `settings`, `pause_overlay`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewKey(pub String);

impl ViewKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ViewKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

/// Opaque handle the host returns when it instantiates a prototype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub u64);

/// Host-side surface that children of a container are mounted under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MountSurface(pub String);

impl MountSurface {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Navigation capabilities carried by a node, queried by value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Capabilities(u8);

impl Capabilities {
    pub const NONE: Self = Self(0);
    /// Blocks forward and back navigation while the node is the active leaf.
    pub const MODAL: Self = Self(1 << 0);
    /// Transient: dismissed before any new navigation evaluates.
    pub const POPUP: Self = Self(1 << 1);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for Capabilities {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        if self.contains(Self::MODAL) {
            set.entry(&"modal");
        }
        if self.contains(Self::POPUP) {
            set.entry(&"popup");
        }
        set.finish()
    }
}

/// A candidate slot under a container.
///
/// A slot starts as either a prototype or an already-live node. A prototype
/// slot becomes live exactly once, through
/// [`ViewTree::activate_slot`](crate::ViewTree::activate_slot).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Prototype(ViewNodeId),
    Live(ViewNodeId),
}

impl Slot {
    /// The node currently occupying this slot.
    pub fn id(self) -> ViewNodeId {
        match self {
            Self::Prototype(id) | Self::Live(id) => id,
        }
    }

    pub fn is_live(self) -> bool {
        matches!(self, Self::Live(_))
    }
}

/// Title and body pushed into an error view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewMessage {
    pub title: String,
    pub body: String,
}

/// A node in the authored view tree.
#[derive(Debug, Clone)]
pub struct ViewNode {
    pub(crate) id: ViewNodeId,
    pub(crate) key: ViewKey,
    /// Node whose candidates hold this one (none for the root).
    pub(crate) parent: Option<ViewNodeId>,
    /// Prototype this node was cloned from, for live copies.
    pub(crate) origin: Option<ViewNodeId>,
    pub(crate) container: Option<MountSurface>,
    pub(crate) candidates: Vec<Slot>,
    pub(crate) current_child: Option<ViewNodeId>,
    pub(crate) capabilities: Capabilities,
    pub(crate) live: bool,
    pub(crate) instance: Option<InstanceId>,
    pub(crate) message: Option<ViewMessage>,
}

impl ViewNode {
    pub fn id(&self) -> ViewNodeId {
        self.id
    }

    pub fn key(&self) -> &ViewKey {
        &self.key
    }

    pub fn parent(&self) -> Option<ViewNodeId> {
        self.parent
    }

    pub fn origin(&self) -> Option<ViewNodeId> {
        self.origin
    }

    pub fn container(&self) -> Option<&MountSurface> {
        self.container.as_ref()
    }

    pub fn candidates(&self) -> &[Slot] {
        &self.candidates
    }

    /// Last candidate activated under this node.
    pub fn current_child(&self) -> Option<ViewNodeId> {
        self.current_child
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn is_modal(&self) -> bool {
        self.capabilities.contains(Capabilities::MODAL)
    }

    pub fn is_popup(&self) -> bool {
        self.capabilities.contains(Capabilities::POPUP)
    }

    /// Whether this node is a live instance rather than a prototype.
    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn instance(&self) -> Option<InstanceId> {
        self.instance
    }

    pub fn message(&self) -> Option<&ViewMessage> {
        self.message.as_ref()
    }

    /// A container with at least one candidate; navigating to it descends.
    pub fn has_mountable_children(&self) -> bool {
        self.container.is_some() && !self.candidates.is_empty()
    }
}
