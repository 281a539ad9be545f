//! Navigation events observable by the rest of the application.
//!
//! Events are collected in an [`EventQueue`] and polled after each engine call
//! (or after advancing a transition handle, since some events fire on
//! completion).
//!
//! # Usage
//!
//! ```ignore
//! let mut nav = engine.pop_view(settings, None, false);
//! for event in engine.drain_events() {
//!     match event {
//!         NavigationEvent::AnyViewBecameActive => resume_ui_input(),
//!         NavigationEvent::NavigationBlocked { modal } => flash(modal),
//!         _ => {}
//!     }
//! }
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::error::NavTarget;
use crate::node::ViewNodeId;

/// Signals emitted by the navigation engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    /// History went from empty to non-empty.
    AnyViewBecameActive,
    /// History went from non-empty to empty and the hide effect completed.
    AllViewsBecameInactive,
    /// A request was refused because a modal view is the active leaf.
    NavigationBlocked { modal: ViewNodeId },
    /// A request addressed a view its container does not hold.
    ViewNotRegistered {
        target: NavTarget,
        container: ViewNodeId,
    },
}

impl NavigationEvent {
    /// Whether this event marks a change of overall UI activity.
    pub fn is_activity_change(&self) -> bool {
        matches!(
            self,
            Self::AnyViewBecameActive | Self::AllViewsBecameInactive
        )
    }
}

/// Queue for collecting navigation events.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<NavigationEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: NavigationEvent) {
        self.events.push_back(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn pop(&mut self) -> Option<NavigationEvent> {
        self.events.pop_front()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = NavigationEvent> + '_ {
        self.events.drain(..)
    }

    pub fn peek(&self) -> Option<&NavigationEvent> {
        self.events.front()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

/// Queue shared between the engine and completion callbacks on handles.
pub(crate) type SharedEvents = Rc<RefCell<EventQueue>>;
