//! Stack-based view navigation for Rune screen hierarchies.
//!
//! This crate decides, at every navigation request, which chain of views is
//! visible, how it got there and how to get back. It provides:
//! - `ViewTree`: arena of authored views with lazily instantiated candidate slots
//! - `NavigationPath` / `HistoryStack`: immutable back-navigable history
//! - `TransitionHandle`: composable show/hide effects driven by the host each frame
//! - `NavigationEngine`: pop, back, clear and reset operations over all of the above
//!
//! # Architecture
//!
//! ```text
//! NavigationEngine
//!   ├── ViewTree (arena: ViewNodeId → ViewNode, Slot = Prototype | Live)
//!   ├── HistoryStack (Vec<NavigationPath>, top leaf = active view)
//!   ├── ViewHost (instantiate / visibility / transitions, supplied by the app)
//!   └── EventQueue (AnyViewBecameActive, AllViewsBecameInactive, ...)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use rune_nav::{NavigationEngine, ViewSpec, ViewTree};
//!
//! let mut tree = ViewTree::new("ui");
//! let settings = tree.add_view(tree.root(), ViewSpec::prototype("settings"))?;
//! let mut engine = NavigationEngine::new(tree, host);
//!
//! let mut nav = engine.pop_view(settings, None, false);
//! while nav.handle.advance(16.0) {}
//! ```

pub mod document;
pub mod easing;
pub mod engine;
pub mod error;
pub mod events;
pub mod history;
pub mod host;
pub mod node;
pub mod path;
pub mod transition;
pub mod tree;

pub use document::{NodeKind, ViewDocument, ViewNodeSpec};
pub use easing::EasingFunction;
pub use engine::{Navigation, NavigationEngine};
pub use error::{NavTarget, NavigationError, TreeError};
pub use events::{EventQueue, NavigationEvent};
pub use history::HistoryStack;
pub use host::{
    MessagePresenter, TimedTransitions, TransitionProvider, ViewHost, ViewInstantiator,
    VisibilityToggle,
};
pub use node::{Capabilities, InstanceId, MountSurface, Slot, ViewKey, ViewMessage, ViewNode, ViewNodeId};
pub use path::NavigationPath;
pub use transition::{TransitionDirection, TransitionHandle, TransitionSpec, TransitionState};
pub use tree::{ViewSpec, ViewTree};
