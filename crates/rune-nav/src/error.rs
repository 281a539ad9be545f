//! Error types for view navigation.

use std::fmt;

use thiserror::Error;

use crate::node::{ViewKey, ViewNodeId};

/// Result type for tree authoring operations.
pub type Result<T> = std::result::Result<T, TreeError>;

/// How a navigation request addressed its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavTarget {
    Node(ViewNodeId),
    Key(ViewKey),
}

impl fmt::Display for NavTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(id) => write!(f, "{id}"),
            Self::Key(key) => write!(f, "'{key}'"),
        }
    }
}

/// Reasons a navigation request became a no-op.
///
/// These are absorbed by the engine: they are logged, reported through
/// [`Navigation::result`](crate::Navigation) and the event queue, and always
/// paired with a well-formed inert transition handle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// Target is not a candidate of the addressed container.
    #[error("view {target} is not registered under {container}")]
    ViewNotRegistered {
        target: NavTarget,
        container: ViewNodeId,
    },

    /// A modal view is the active leaf.
    #[error("navigation blocked by modal view {modal}")]
    NavigationBlocked { modal: ViewNodeId },

    /// Back was requested with nothing to pop.
    #[error("navigation history is empty")]
    EmptyHistory,
}

/// Errors raised while authoring a view tree.
#[derive(Error, Debug)]
pub enum TreeError {
    /// Node id does not belong to this tree.
    #[error("unknown view node {0}")]
    UnknownNode(ViewNodeId),

    /// Two candidates of one container share a key.
    #[error("duplicate view key '{key}' under {parent}")]
    DuplicateKey { key: ViewKey, parent: ViewNodeId },

    /// The root of a document must be a live node.
    #[error("document root '{0}' must be live")]
    PrototypeRoot(ViewKey),

    /// The root is never part of a path, so it cannot be modal or a popup.
    #[error("document root '{0}' cannot be modal or a popup")]
    RootCapabilities(ViewKey),

    /// Children of a prototype are template content and are instantiated
    /// with each copy.
    #[error("live view '{key}' cannot be a child of prototype {parent}")]
    LiveUnderPrototype { key: ViewKey, parent: ViewNodeId },

    /// View document JSON could not be parsed.
    #[error("invalid view document: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
