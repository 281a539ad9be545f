#![allow(dead_code)]

use rune_nav::{
    InstanceId, MessagePresenter, MountSurface, NavigationEngine, TimedTransitions,
    TransitionHandle, TransitionProvider, TransitionSpec, ViewInstantiator, ViewNode, ViewNodeId,
    VisibilityToggle, ViewTree,
};

/// Host that records every call the engine makes.
#[derive(Default)]
pub struct RecordingHost {
    pub instantiated: Vec<(ViewNodeId, Option<MountSurface>)>,
    pub visible: Vec<ViewNodeId>,
    pub fronted: Vec<ViewNodeId>,
    pub messages: Vec<(ViewNodeId, String, String)>,
    pub transitions: TimedTransitions,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self {
            transitions: TimedTransitions::new(TransitionSpec::new(100.0), TransitionSpec::new(80.0)),
            ..Self::default()
        }
    }

    pub fn instantiations_of(&self, prototype: ViewNodeId) -> usize {
        self.instantiated
            .iter()
            .filter(|(id, _)| *id == prototype)
            .count()
    }
}

impl ViewInstantiator for RecordingHost {
    fn instantiate(&mut self, prototype: &ViewNode, parent: Option<&MountSurface>) -> InstanceId {
        self.instantiated.push((prototype.id(), parent.cloned()));
        InstanceId(self.instantiated.len() as u64)
    }
}

impl VisibilityToggle for RecordingHost {
    fn set_visible(&mut self, node: &ViewNode, visible: bool) {
        if visible {
            self.visible.push(node.id());
        }
    }

    fn bring_to_front(&mut self, node: &ViewNode) {
        self.fronted.push(node.id());
    }
}

impl TransitionProvider for RecordingHost {
    fn show_transition(
        &mut self,
        node: &ViewNode,
        from: Option<&ViewNode>,
        skip_animation: bool,
    ) -> TransitionHandle {
        self.transitions.show_transition(node, from, skip_animation)
    }

    fn hide_transition(
        &mut self,
        node: &ViewNode,
        to: Option<&ViewNode>,
        skip_animation: bool,
    ) -> TransitionHandle {
        self.transitions.hide_transition(node, to, skip_animation)
    }
}

impl MessagePresenter for RecordingHost {
    fn present_message(&mut self, node: &ViewNode, title: &str, body: &str) {
        self.messages
            .push((node.id(), title.to_string(), body.to_string()));
    }
}

pub fn engine(tree: ViewTree) -> NavigationEngine<RecordingHost> {
    NavigationEngine::new(tree, RecordingHost::new())
}

/// Run a handle to completion at 60 fps.
pub fn play(handle: &mut TransitionHandle) {
    let mut guard = 0;
    while handle.advance(16.0) {
        guard += 1;
        assert!(guard < 10_000, "transition never finished");
    }
}

/// The active leaf always matches the top of history.
pub fn assert_consistent(engine: &NavigationEngine<RecordingHost>) {
    assert_eq!(engine.active_view(), engine.history().top_leaf());
    assert_eq!(engine.is_view_active(), !engine.history().is_empty());
    assert_eq!(engine.is_last_view(), engine.history_depth() == 1);
}
