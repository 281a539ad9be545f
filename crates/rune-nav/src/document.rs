//! JSON authoring format for view trees.
//!
//! ```json
//! {
//!   "root": {
//!     "key": "ui",
//!     "kind": "live",
//!     "container": "ui",
//!     "children": [
//!       { "key": "menu", "kind": "live" },
//!       { "key": "confirm", "modal": true },
//!       { "key": "settings", "container": "settings.body", "children": [
//!         { "key": "audio" },
//!         { "key": "video" }
//!       ]}
//!     ]
//!   }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TreeError};
use crate::node::{MountSurface, ViewNodeId};
use crate::tree::{ViewSpec, ViewTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    #[default]
    Prototype,
    Live,
}

/// One authored node and its candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewNodeSpec {
    pub key: String,
    #[serde(default)]
    pub kind: NodeKind,
    #[serde(default)]
    pub modal: bool,
    #[serde(default)]
    pub popup: bool,
    /// Surface the node's own candidates mount under.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    #[serde(default)]
    pub children: Vec<ViewNodeSpec>,
}

impl ViewNodeSpec {
    fn to_view_spec(&self) -> ViewSpec {
        let mut spec = match self.kind {
            NodeKind::Prototype => ViewSpec::prototype(self.key.clone()),
            NodeKind::Live => ViewSpec::live(self.key.clone()),
        };
        if self.modal {
            spec = spec.modal();
        }
        if self.popup {
            spec = spec.popup();
        }
        if let Some(surface) = &self.container {
            spec = spec.container(surface.clone());
        }
        spec
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewDocument {
    pub root: ViewNodeSpec,
}

impl ViewDocument {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }
}

impl ViewTree {
    /// Build a tree from an authored document. The root must be live.
    pub fn from_document(document: &ViewDocument) -> Result<Self> {
        let root = &document.root;
        if root.kind != NodeKind::Live {
            return Err(TreeError::PrototypeRoot(root.key.as_str().into()));
        }
        if root.modal || root.popup {
            return Err(TreeError::RootCapabilities(root.key.as_str().into()));
        }
        let mut tree = ViewTree::new(root.key.clone());
        let root_id = tree.root();
        if let Some(surface) = &root.container {
            if let Some(node) = tree.node_mut(root_id) {
                node.container = Some(MountSurface::new(surface.clone()));
            }
        }

        let mut pending: Vec<(ViewNodeId, &ViewNodeSpec)> =
            root.children.iter().rev().map(|child| (root_id, child)).collect();
        while let Some((parent, spec)) = pending.pop() {
            let id = tree.add_view(parent, spec.to_view_spec())?;
            pending.extend(spec.children.iter().rev().map(|child| (id, child)));
        }
        log::debug!("built view tree '{}' with {} nodes", root.key, tree.len());
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Slot, ViewKey};

    const DOC: &str = r#"{
        "root": {
            "key": "ui",
            "kind": "live",
            "children": [
                { "key": "menu", "kind": "live" },
                { "key": "confirm", "modal": true },
                { "key": "tip", "popup": true },
                { "key": "settings", "container": "settings.body", "children": [
                    { "key": "audio" },
                    { "key": "video" }
                ]}
            ]
        }
    }"#;

    fn child(tree: &ViewTree, parent: ViewNodeId, key: &str) -> ViewNodeId {
        let index = tree.resolve_key(parent, &ViewKey::from(key)).unwrap();
        tree.node(parent).unwrap().candidates()[index].id()
    }

    #[test]
    fn test_from_document_builds_arena() {
        let doc = ViewDocument::from_json_str(DOC).unwrap();
        let tree = ViewTree::from_document(&doc).unwrap();
        assert_eq!(tree.len(), 7);

        let root = tree.root();
        let menu = child(&tree, root, "menu");
        let confirm = child(&tree, root, "confirm");
        let tip = child(&tree, root, "tip");
        let settings = child(&tree, root, "settings");

        assert!(tree.node(menu).unwrap().is_live());
        assert!(tree.node(confirm).unwrap().is_modal());
        assert!(tree.node(tip).unwrap().is_popup());
        assert!(!tree.node(settings).unwrap().is_live());
        assert!(tree.node(settings).unwrap().has_mountable_children());

        let children = tree.node(settings).unwrap().candidates();
        assert_eq!(children.len(), 2);
        assert!(matches!(children[0], Slot::Prototype(_)));
        assert_eq!(
            tree.node(children[1].id()).unwrap().key().as_str(),
            "video"
        );
    }

    #[test]
    fn test_prototype_root_rejected() {
        let doc = ViewDocument::from_json_str(r#"{ "root": { "key": "ui" } }"#).unwrap();
        let err = ViewTree::from_document(&doc).unwrap_err();
        assert!(matches!(err, TreeError::PrototypeRoot(_)));
    }

    #[test]
    fn test_root_capabilities_rejected() {
        let doc = ViewDocument::from_json_str(
            r#"{ "root": { "key": "ui", "kind": "live", "modal": true } }"#,
        )
        .unwrap();
        assert!(matches!(
            ViewTree::from_document(&doc),
            Err(TreeError::RootCapabilities(_))
        ));
    }

    #[test]
    fn test_live_child_of_prototype_rejected() {
        let doc = ViewDocument::from_json_str(
            r#"{ "root": { "key": "ui", "kind": "live", "children": [
                { "key": "settings", "container": "body", "children": [
                    { "key": "hud", "kind": "live" }
                ]}
            ] } }"#,
        )
        .unwrap();
        assert!(matches!(
            ViewTree::from_document(&doc),
            Err(TreeError::LiveUnderPrototype { .. })
        ));
    }

    #[test]
    fn test_duplicate_sibling_rejected() {
        let doc = ViewDocument::from_json_str(
            r#"{ "root": { "key": "ui", "kind": "live", "children": [
                { "key": "a" }, { "key": "a" }
            ] } }"#,
        )
        .unwrap();
        assert!(matches!(
            ViewTree::from_document(&doc),
            Err(TreeError::DuplicateKey { .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            ViewDocument::from_json_str("{ \"root\": "),
            Err(TreeError::Json(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("views.json");
        std::fs::write(&path, DOC).unwrap();
        let doc = ViewDocument::from_file(&path).unwrap();
        assert_eq!(doc.root.children.len(), 4);

        let missing = ViewDocument::from_file(dir.path().join("nope.json"));
        assert!(matches!(missing, Err(TreeError::Io(_))));
    }
}
