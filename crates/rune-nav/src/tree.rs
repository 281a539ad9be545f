//! Arena that owns every view node.
//!
//! Nodes are addressed by [`ViewNodeId`] indices, so back-references such as
//! `current_child` and `parent` are plain lookups. Nodes are never removed:
//! a live instance stays in the arena for the tree's lifetime, hidden but not
//! freed.

use crate::error::{Result, TreeError};
use crate::host::ViewInstantiator;
use crate::node::{Capabilities, MountSurface, Slot, ViewKey, ViewNode, ViewNodeId};

/// Authoring description of a node added with [`ViewTree::add_view`].
#[derive(Debug, Clone)]
pub struct ViewSpec {
    pub key: ViewKey,
    pub capabilities: Capabilities,
    pub container: Option<MountSurface>,
    /// Already live in the host (placed in the scene) rather than a prototype.
    pub live: bool,
}

impl ViewSpec {
    /// A prototype, instantiated by the host on first activation.
    pub fn prototype(key: impl Into<String>) -> Self {
        Self {
            key: ViewKey::new(key),
            capabilities: Capabilities::NONE,
            container: None,
            live: false,
        }
    }

    /// A node that already exists in the host.
    pub fn live(key: impl Into<String>) -> Self {
        Self {
            live: true,
            ..Self::prototype(key)
        }
    }

    pub fn modal(mut self) -> Self {
        self.capabilities.insert(Capabilities::MODAL);
        self
    }

    pub fn popup(mut self) -> Self {
        self.capabilities.insert(Capabilities::POPUP);
        self
    }

    /// Give the node a surface its own candidates mount under.
    pub fn container(mut self, surface: impl Into<String>) -> Self {
        self.container = Some(MountSurface::new(surface));
        self
    }
}

/// Result of activating a candidate slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activation {
    /// The live node now occupying the slot.
    pub node: ViewNodeId,
    /// Whether the host instantiated it during this call.
    pub instantiated: bool,
}

/// Arena of view nodes rooted at a single live mounting node.
#[derive(Debug, Clone)]
pub struct ViewTree {
    nodes: Vec<ViewNode>,
    root: ViewNodeId,
}

impl ViewTree {
    /// Create a tree whose root is a live container named `root_key`.
    pub fn new(root_key: impl Into<String>) -> Self {
        let key: String = root_key.into();
        let root = ViewNode {
            id: ViewNodeId(0),
            container: Some(MountSurface::new(key.clone())),
            key: ViewKey::new(key),
            parent: None,
            origin: None,
            candidates: Vec::new(),
            current_child: None,
            capabilities: Capabilities::NONE,
            live: true,
            instance: None,
            message: None,
        };
        Self {
            nodes: vec![root],
            root: ViewNodeId(0),
        }
    }

    pub fn root(&self) -> ViewNodeId {
        self.root
    }

    pub fn node(&self, id: ViewNodeId) -> Option<&ViewNode> {
        self.nodes.get(id.index())
    }

    pub(crate) fn node_mut(&mut self, id: ViewNodeId) -> Option<&mut ViewNode> {
        self.nodes.get_mut(id.index())
    }

    pub fn contains(&self, id: ViewNodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Number of nodes, prototypes and live copies included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ViewNode> {
        self.nodes.iter()
    }

    /// Register a new candidate under `parent`.
    ///
    /// Under a prototype the new node is a template child: it must itself be
    /// a prototype, and every live copy of `parent` gains a slot for it.
    pub fn add_view(&mut self, parent: ViewNodeId, spec: ViewSpec) -> Result<ViewNodeId> {
        let parent_node = self.node(parent).ok_or(TreeError::UnknownNode(parent))?;
        let template_child = !parent_node.live;
        if spec.live && template_child {
            return Err(TreeError::LiveUnderPrototype {
                key: spec.key,
                parent,
            });
        }
        let duplicate = parent_node
            .candidates
            .iter()
            .any(|slot| self.nodes[slot.id().index()].key == spec.key);
        if duplicate {
            return Err(TreeError::DuplicateKey {
                key: spec.key,
                parent,
            });
        }

        let id = self.next_id();
        self.nodes.push(ViewNode {
            id,
            key: spec.key,
            parent: Some(parent),
            origin: None,
            container: spec.container,
            candidates: Vec::new(),
            current_child: None,
            capabilities: spec.capabilities,
            live: spec.live,
            instance: None,
            message: None,
        });

        let slot = if spec.live {
            Slot::Live(id)
        } else {
            Slot::Prototype(id)
        };
        self.nodes[parent.index()].candidates.push(slot);
        if template_child {
            for copy in self
                .nodes
                .iter_mut()
                .filter(|node| node.origin == Some(parent))
            {
                copy.candidates.push(Slot::Prototype(id));
            }
        }
        Ok(id)
    }

    /// The live node standing for `id`: `id` itself when live, otherwise the
    /// most recent live copy of that prototype.
    pub fn live_instance(&self, id: ViewNodeId) -> Option<ViewNodeId> {
        let node = self.node(id)?;
        if node.live {
            return Some(id);
        }
        self.nodes
            .iter()
            .rev()
            .find(|candidate| candidate.origin == Some(id))
            .map(ViewNode::id)
    }

    /// Find the candidate slot of `container` addressed by `target`.
    ///
    /// A slot matches when it currently holds `target`, or when it holds a
    /// live copy of the prototype `target`.
    pub fn resolve_candidate(&self, container: ViewNodeId, target: ViewNodeId) -> Option<usize> {
        let node = self.node(container)?;
        node.candidates.iter().position(|slot| {
            slot.id() == target
                || (slot.is_live() && self.nodes[slot.id().index()].origin == Some(target))
        })
    }

    /// Find the candidate slot of `container` whose node carries `key`.
    pub fn resolve_key(&self, container: ViewNodeId, key: &ViewKey) -> Option<usize> {
        let node = self.node(container)?;
        node.candidates
            .iter()
            .position(|slot| self.nodes[slot.id().index()].key == *key)
    }

    /// Slot to descend into when `container` is shown: its current child if it
    /// still resolves, otherwise the first candidate.
    pub fn restore_slot(&self, container: ViewNodeId) -> Option<usize> {
        let node = self.node(container)?;
        if node.candidates.is_empty() {
            return None;
        }
        let current = node
            .current_child
            .and_then(|child| node.candidates.iter().position(|slot| slot.id() == child));
        Some(current.unwrap_or(0))
    }

    /// Make the slot at `index` under `container` live.
    ///
    /// This is the only place a prototype slot is replaced. The host is asked
    /// to instantiate the prototype; the tree clones the prototype into a new
    /// live node mounted under `container`, and the slot points at it from
    /// then on. A slot that is already live is returned unchanged.
    pub fn activate_slot<I>(
        &mut self,
        container: ViewNodeId,
        index: usize,
        host: &mut I,
    ) -> Option<Activation>
    where
        I: ViewInstantiator + ?Sized,
    {
        let slot = *self.node(container)?.candidates.get(index)?;
        let prototype = match slot {
            Slot::Live(node) => {
                return Some(Activation {
                    node,
                    instantiated: false,
                });
            }
            Slot::Prototype(prototype) => prototype,
        };

        let instance = {
            let parent_surface = self.nodes[container.index()].container.as_ref();
            host.instantiate(&self.nodes[prototype.index()], parent_surface)
        };

        let id = self.next_id();
        let template = &self.nodes[prototype.index()];
        // Everything under a prototype is template content; the copy gets
        // fresh slots so each instance activates its own children.
        let candidates = template
            .candidates
            .iter()
            .map(|slot| Slot::Prototype(slot.id()))
            .collect();
        let live = ViewNode {
            id,
            key: template.key.clone(),
            parent: Some(container),
            origin: Some(prototype),
            container: template.container.clone(),
            candidates,
            current_child: None,
            capabilities: template.capabilities,
            live: true,
            instance: Some(instance),
            message: None,
        };
        log::trace!(
            "instantiated '{}' {} -> {} under {}",
            live.key,
            prototype,
            id,
            container
        );
        self.nodes.push(live);
        self.nodes[container.index()].candidates[index] = Slot::Live(id);

        Some(Activation {
            node: id,
            instantiated: true,
        })
    }

    /// Nodes from the first child of root down to the parent of `id`.
    ///
    /// Neither the root nor `id` itself are included.
    pub fn ancestors(&self, id: ViewNodeId) -> Vec<ViewNodeId> {
        let mut chain = Vec::new();
        let mut cursor = self.node(id).and_then(|node| node.parent);
        while let Some(parent) = cursor {
            if parent == self.root {
                break;
            }
            chain.push(parent);
            cursor = self.nodes[parent.index()].parent;
        }
        chain.reverse();
        chain
    }

    pub(crate) fn set_current_child(&mut self, container: ViewNodeId, child: ViewNodeId) {
        if let Some(node) = self.node_mut(container) {
            node.current_child = Some(child);
        }
    }

    fn next_id(&self) -> ViewNodeId {
        ViewNodeId(self.nodes.len() as u32)
    }
}
