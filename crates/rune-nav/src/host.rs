//! Collaborators the engine drives but does not implement.
//!
//! The application supplies one value implementing all of these traits (a
//! [`ViewHost`]). The engine never renders, instantiates or animates anything
//! itself; it only decides what should happen and asks the host to do it.

use rune_config::TransitionsConfig;

use crate::easing::EasingFunction;
use crate::node::{InstanceId, MountSurface, ViewNode};
use crate::transition::{TransitionDirection, TransitionHandle, TransitionSpec};

/// Produces live view instances from prototypes.
pub trait ViewInstantiator {
    /// Instantiate `prototype` under `parent`. Called at most once per slot.
    fn instantiate(&mut self, prototype: &ViewNode, parent: Option<&MountSurface>) -> InstanceId;
}

/// Toggles whether a live node is presented.
pub trait VisibilityToggle {
    fn set_visible(&mut self, node: &ViewNode, visible: bool);

    fn bring_to_front(&mut self, node: &ViewNode);
}

/// Creates show/hide effects for nodes.
pub trait TransitionProvider {
    /// Effect bringing `node` in, replacing `from` if any.
    fn show_transition(
        &mut self,
        node: &ViewNode,
        from: Option<&ViewNode>,
        skip_animation: bool,
    ) -> TransitionHandle;

    /// Effect taking `node` out, revealing `to` if any.
    fn hide_transition(
        &mut self,
        node: &ViewNode,
        to: Option<&ViewNode>,
        skip_animation: bool,
    ) -> TransitionHandle;
}

/// Receives the title and body pushed into an error view.
pub trait MessagePresenter {
    fn present_message(&mut self, _node: &ViewNode, _title: &str, _body: &str) {}
}

/// Everything the engine needs from the application.
pub trait ViewHost: ViewInstantiator + VisibilityToggle + TransitionProvider + MessagePresenter {}

impl<T> ViewHost for T where
    T: ViewInstantiator + VisibilityToggle + TransitionProvider + MessagePresenter
{
}

/// Transition provider producing timed handles from configured specs.
///
/// Hosts that do not animate per view can delegate their
/// [`TransitionProvider`] impl to this type.
#[derive(Debug, Clone, Default)]
pub struct TimedTransitions {
    pub show: TransitionSpec,
    pub hide: TransitionSpec,
}

impl TimedTransitions {
    pub fn new(show: TransitionSpec, hide: TransitionSpec) -> Self {
        Self { show, hide }
    }

    /// Build from the `[transitions]` section of `rune.toml`.
    ///
    /// Unknown easing names fall back to `ease` with a warning.
    pub fn from_config(config: &TransitionsConfig) -> Self {
        let spec = |timing: &rune_config::TransitionTiming| {
            let easing = timing.easing.parse().unwrap_or_else(|err| {
                log::warn!("{err}; using ease");
                EasingFunction::Ease
            });
            TransitionSpec {
                duration_ms: timing.duration_ms.max(0.0),
                delay_ms: timing.delay_ms.max(0.0),
                easing,
            }
        };
        Self {
            show: spec(&config.show),
            hide: spec(&config.hide),
        }
    }

    fn resolve(&self, direction: TransitionDirection, skip_animation: bool) -> TransitionSpec {
        if skip_animation {
            return TransitionSpec::instant();
        }
        match direction {
            TransitionDirection::Show => self.show,
            TransitionDirection::Hide => self.hide,
        }
    }
}

impl TransitionProvider for TimedTransitions {
    fn show_transition(
        &mut self,
        node: &ViewNode,
        from: Option<&ViewNode>,
        skip_animation: bool,
    ) -> TransitionHandle {
        let spec = self.resolve(TransitionDirection::Show, skip_animation);
        TransitionHandle::timed(
            node.id(),
            from.map(ViewNode::id),
            TransitionDirection::Show,
            &spec,
        )
    }

    fn hide_transition(
        &mut self,
        node: &ViewNode,
        to: Option<&ViewNode>,
        skip_animation: bool,
    ) -> TransitionHandle {
        let spec = self.resolve(TransitionDirection::Hide, skip_animation);
        TransitionHandle::timed(
            node.id(),
            to.map(ViewNode::id),
            TransitionDirection::Hide,
            &spec,
        )
    }
}
