//! The navigation engine: pop, back, clear and reset over a view tree.
//!
//! All state changes happen synchronously inside each call. The returned
//! [`TransitionHandle`] only carries the visual catch-up; callers may fire a
//! second navigation before the first handle finishes and both effects simply
//! run side by side.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rune_config::NavigationConfig;

use crate::error::{NavTarget, NavigationError};
use crate::events::{EventQueue, NavigationEvent, SharedEvents};
use crate::history::HistoryStack;
use crate::host::ViewHost;
use crate::node::{ViewKey, ViewMessage, ViewNode, ViewNodeId};
use crate::path::NavigationPath;
use crate::transition::TransitionHandle;
use crate::tree::ViewTree;

/// Outcome of a navigation request.
///
/// `handle` is always well-formed; it is inert when the request was refused.
#[derive(Debug)]
#[must_use]
pub struct Navigation {
    pub handle: TransitionHandle,
    /// The live node that became visible, or why nothing changed.
    pub result: Result<ViewNodeId, NavigationError>,
}

impl Navigation {
    fn refused(error: NavigationError) -> Self {
        Self {
            handle: TransitionHandle::inert(),
            result: Err(error),
        }
    }

    pub fn view(&self) -> Option<ViewNodeId> {
        self.result.as_ref().ok().copied()
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self.result, Err(NavigationError::NavigationBlocked { .. }))
    }

    pub fn into_handle(self) -> TransitionHandle {
        self.handle
    }
}

/// Stack-based history manager for one UI root.
pub struct NavigationEngine<H: ViewHost> {
    tree: ViewTree,
    history: HistoryStack,
    host: H,
    events: SharedEvents,
    /// Bumped each time history goes from empty to non-empty.
    activity_epoch: Rc<Cell<u64>>,
    force_skip_animation: bool,
}

impl<H: ViewHost> NavigationEngine<H> {
    pub fn new(tree: ViewTree, host: H) -> Self {
        Self {
            tree,
            history: HistoryStack::new(),
            host,
            events: Rc::new(RefCell::new(EventQueue::new())),
            activity_epoch: Rc::new(Cell::new(0)),
            force_skip_animation: false,
        }
    }

    /// Create an engine honouring the `[navigation]` section of `rune.toml`.
    pub fn with_config(tree: ViewTree, host: H, config: &NavigationConfig) -> Self {
        let mut engine = Self::new(tree, host);
        engine.force_skip_animation = config.skip_animations;
        engine
    }

    /// Skip every animation regardless of per-call flags.
    pub fn set_skip_animations(&mut self, skip: bool) {
        self.force_skip_animation = skip;
    }

    // ─── Queries ────────────────────────────────────────────────────────────

    /// Deepest visible view: the leaf of the top history entry.
    pub fn active_view(&self) -> Option<ViewNodeId> {
        self.history.top_leaf()
    }

    /// Whether any view is visible.
    pub fn is_view_active(&self) -> bool {
        !self.history.is_empty()
    }

    /// Whether exactly one entry is left, so the next back empties the UI.
    pub fn is_last_view(&self) -> bool {
        self.history.len() == 1
    }

    pub fn history_depth(&self) -> usize {
        self.history.len()
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn tree(&self) -> &ViewTree {
        &self.tree
    }

    /// Register views at runtime. Slots only ever change through activation,
    /// so adding nodes never disturbs history; views added under a prototype
    /// also appear in its live copies.
    pub fn tree_mut(&mut self) -> &mut ViewTree {
        &mut self.tree
    }

    pub fn node(&self, id: ViewNodeId) -> Option<&ViewNode> {
        self.tree.node(id)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Take every event emitted so far, oldest first.
    pub fn drain_events(&mut self) -> Vec<NavigationEvent> {
        self.events.borrow_mut().drain().collect()
    }

    // ─── Navigation ─────────────────────────────────────────────────────────

    /// Show `target`, a candidate of `mounting_point` (root when `None`).
    ///
    /// `target` may be the prototype or its live copy. If the target is a
    /// container, its remembered child (or first candidate) is shown too,
    /// recursively.
    pub fn pop_view(
        &mut self,
        target: ViewNodeId,
        mounting_point: Option<ViewNodeId>,
        skip_animation: bool,
    ) -> Navigation {
        let container = self.mount_container(mounting_point);
        let slot = container.and_then(|c| self.tree.resolve_candidate(c, target).map(|i| (c, i)));
        self.navigate(
            NavTarget::Node(target),
            mounting_point.unwrap_or(self.tree.root()),
            slot,
            skip_animation,
        )
    }

    /// Like [`pop_view`](Self::pop_view), addressing the target by key.
    pub fn pop_view_by_key(
        &mut self,
        key: impl Into<ViewKey>,
        mounting_point: Option<ViewNodeId>,
        skip_animation: bool,
    ) -> Navigation {
        let key = key.into();
        let container = self.mount_container(mounting_point);
        let slot = container.and_then(|c| self.tree.resolve_key(c, &key).map(|i| (c, i)));
        self.navigate(
            NavTarget::Key(key),
            mounting_point.unwrap_or(self.tree.root()),
            slot,
            skip_animation,
        )
    }

    /// Show the loading view and re-point `loading` at its live node.
    pub fn pop_loading_view(
        &mut self,
        loading: &mut ViewNodeId,
        skip_animation: bool,
    ) -> Navigation {
        let navigation = self.pop_view(*loading, None, skip_animation);
        if let Ok(live) = navigation.result {
            *loading = live;
        }
        navigation
    }

    /// Show the error view with `title` and `message`, re-pointing `error` at
    /// its live node.
    pub fn pop_error_view(
        &mut self,
        error: &mut ViewNodeId,
        title: &str,
        message: &str,
        skip_animation: bool,
    ) -> Navigation {
        let navigation = self.pop_view(*error, None, skip_animation);
        if let Ok(live) = navigation.result {
            *error = live;
            if let Some(node) = self.tree.node_mut(live) {
                node.message = Some(ViewMessage {
                    title: title.to_string(),
                    body: message.to_string(),
                });
            }
            if let Some(node) = self.tree.node(live) {
                self.host.present_message(node, title, message);
            }
        }
        navigation
    }

    /// Return to the previous history entry.
    ///
    /// No-op while the history is empty or a modal view is the active leaf.
    pub fn back(&mut self, skip_animation: bool) -> TransitionHandle {
        if self.history.is_empty() {
            log::debug!("back ignored: {}", NavigationError::EmptyHistory);
            return TransitionHandle::inert();
        }
        if let Some(modal) = self.blocking_modal() {
            self.report_blocked(modal);
            return TransitionHandle::inert();
        }
        self.pop_top(skip_animation)
    }

    /// Leave the active modal view, the one exit the modal guard allows.
    ///
    /// Inert when the active leaf is not modal.
    pub fn dismiss_modal(&mut self, skip_animation: bool) -> TransitionHandle {
        match self.blocking_modal() {
            Some(modal) => {
                log::info!("dismissing modal '{}'", self.key_of(modal));
                self.pop_top(skip_animation)
            }
            None => TransitionHandle::inert(),
        }
    }

    /// Keep only the top entry, so the next back empties the UI.
    pub fn clear_history(&mut self) {
        let dropped = self.history.len().saturating_sub(1);
        self.history.retain_top();
        if dropped > 0 {
            log::debug!("cleared {dropped} history entries");
        }
    }

    /// Hide the top entry and forget all history, whatever its depth.
    pub fn hide_and_reset(&mut self, skip_animation: bool) -> TransitionHandle {
        let Some(exiting) = self.history.pop() else {
            return TransitionHandle::inert();
        };
        self.history.clear();
        log::info!("reset navigation from {}", exiting);
        let skip = skip_animation || self.force_skip_animation;
        self.hide_all(&exiting, skip)
    }

    // ─── Internals ──────────────────────────────────────────────────────────

    fn navigate(
        &mut self,
        target: NavTarget,
        addressed: ViewNodeId,
        slot: Option<(ViewNodeId, usize)>,
        skip_animation: bool,
    ) -> Navigation {
        if let Some(modal) = self.blocking_modal() {
            self.report_blocked(modal);
            return Navigation::refused(NavigationError::NavigationBlocked { modal });
        }

        let Some((container, index)) = slot else {
            log::warn!("view {target} is not registered under {addressed}");
            self.emit(NavigationEvent::ViewNotRegistered {
                target: target.clone(),
                container: addressed,
            });
            return Navigation::refused(NavigationError::ViewNotRegistered {
                target,
                container: addressed,
            });
        };

        let skip = skip_animation || self.force_skip_animation;
        let was_empty = self.history.is_empty();
        let previous_leaf = self.history.top_leaf();

        if let Some(leaf) = previous_leaf.filter(|&leaf| self.is_popup(leaf)) {
            log::debug!("auto-dismissing popup '{}'", self.key_of(leaf));
            self.history.pop();
        }

        let Some(live) = self.mount(container, index) else {
            return Navigation::refused(NavigationError::ViewNotRegistered {
                target,
                container: addressed,
            });
        };
        self.tree.set_current_child(container, live);

        let mut chain = Vec::new();
        let mut child_handles = Vec::new();
        self.descend(live, &mut chain, &mut child_handles, skip);

        let mut prefix = self.tree.ancestors(container);
        if container != self.tree.root() {
            prefix.push(container);
        }
        let path = NavigationPath::from_parts(&prefix, live, &chain);

        let top_is_popup = self.history.top_leaf().is_some_and(|leaf| self.is_popup(leaf));
        let unchanged = !top_is_popup
            && self
                .history
                .top()
                .is_some_and(|top| top.same_nodes(&path));
        if unchanged {
            log::debug!("'{}' already showing; history unchanged", self.key_of(live));
        } else {
            log::info!("showing '{}' at {}", self.key_of(live), path);
            self.history.push(path);
        }

        if was_empty && !self.history.is_empty() {
            self.activity_epoch.set(self.activity_epoch.get() + 1);
            self.emit(NavigationEvent::AnyViewBecameActive);
        }

        let from = previous_leaf.filter(|&leaf| leaf != live);
        let handle = self
            .show(live, from, skip)
            .join(TransitionHandle::join_all(child_handles));

        Navigation {
            handle,
            result: Ok(live),
        }
    }

    /// Activate the slot, instantiating or re-showing its node.
    fn mount(&mut self, container: ViewNodeId, index: usize) -> Option<ViewNodeId> {
        let activation = self.tree.activate_slot(container, index, &mut self.host)?;
        if !activation.instantiated {
            if let Some(node) = self.tree.node(activation.node) {
                self.host.set_visible(node, true);
            }
        }
        Some(activation.node)
    }

    /// Show the remembered (or first) child of each container below `parent`.
    fn descend(
        &mut self,
        parent: ViewNodeId,
        chain: &mut Vec<ViewNodeId>,
        handles: &mut Vec<TransitionHandle>,
        skip: bool,
    ) {
        let mut cursor = parent;
        loop {
            let Some(node) = self.tree.node(cursor) else {
                return;
            };
            if !node.has_mountable_children() {
                return;
            }
            let previous = node.current_child();
            let Some(index) = self.tree.restore_slot(cursor) else {
                return;
            };
            let Some(child) = self.mount(cursor, index) else {
                return;
            };
            self.tree.set_current_child(cursor, child);
            log::trace!("descending into '{}'", self.key_of(child));

            let from = previous.filter(|&p| p != child);
            handles.push(self.show(child, from, skip));
            chain.push(child);
            cursor = child;
        }
    }

    fn pop_top(&mut self, skip_animation: bool) -> TransitionHandle {
        let skip = skip_animation || self.force_skip_animation;
        let Some(exiting) = self.history.pop() else {
            return TransitionHandle::inert();
        };

        match self.history.top().cloned() {
            Some(entering) => {
                self.reactivate(&entering);
                let (out, into) = match exiting.divergence(&entering) {
                    Some(depth) => (exiting.nodes()[depth], entering.nodes()[depth]),
                    None => (exiting.leaf(), entering.leaf()),
                };
                log::info!(
                    "back from '{}' to '{}'",
                    self.key_of(exiting.leaf()),
                    self.key_of(entering.leaf())
                );
                self.hide(out, Some(into), skip)
            }
            None => {
                log::info!("back from '{}'; no views left", self.key_of(exiting.leaf()));
                self.hide_all(&exiting, skip)
            }
        }
    }

    /// Bring every node of `path` back to the front, root-most first, and
    /// point each container at the child the path went through.
    fn reactivate(&mut self, path: &NavigationPath) {
        for &id in path.nodes() {
            let Some(node) = self.tree.node(id) else {
                continue;
            };
            self.host.set_visible(node, true);
            self.host.bring_to_front(node);
            if let Some(parent) = node.parent() {
                self.tree.set_current_child(parent, id);
            }
        }
    }

    fn show(&mut self, id: ViewNodeId, from: Option<ViewNodeId>, skip: bool) -> TransitionHandle {
        let Some(node) = self.tree.node(id) else {
            return TransitionHandle::inert();
        };
        let from = from.and_then(|f| self.tree.node(f));
        self.host.show_transition(node, from, skip)
    }

    fn hide(&mut self, id: ViewNodeId, to: Option<ViewNodeId>, skip: bool) -> TransitionHandle {
        let Some(node) = self.tree.node(id) else {
            return TransitionHandle::inert();
        };
        let to = to.and_then(|t| self.tree.node(t));
        self.host.hide_transition(node, to, skip)
    }

    /// Hide the last entry with nothing to reveal.
    ///
    /// Deliberately hides the path's root-most node rather than its leaf, so
    /// the whole exiting subtree leaves the screen in one effect.
    /// `AllViewsBecameInactive` fires when the effect completes, unless a view
    /// became active again in the meantime.
    fn hide_all(&mut self, exiting: &NavigationPath, skip: bool) -> TransitionHandle {
        let handle = self.hide(exiting.first(), None, skip);
        let events = Rc::clone(&self.events);
        let epoch = Rc::clone(&self.activity_epoch);
        let armed_at = epoch.get();
        handle.then(move || {
            if epoch.get() == armed_at {
                events
                    .borrow_mut()
                    .push(NavigationEvent::AllViewsBecameInactive);
            } else {
                log::debug!("views reactivated before hide completed; staying active");
            }
        })
    }

    fn mount_container(&self, mounting_point: Option<ViewNodeId>) -> Option<ViewNodeId> {
        match mounting_point {
            None => Some(self.tree.root()),
            Some(id) => self.tree.live_instance(id),
        }
    }

    fn blocking_modal(&self) -> Option<ViewNodeId> {
        self.history
            .top_leaf()
            .filter(|&leaf| self.tree.node(leaf).is_some_and(ViewNode::is_modal))
    }

    fn is_popup(&self, id: ViewNodeId) -> bool {
        self.tree.node(id).is_some_and(ViewNode::is_popup)
    }

    fn report_blocked(&mut self, modal: ViewNodeId) {
        log::warn!("navigation blocked by modal '{}'", self.key_of(modal));
        self.emit(NavigationEvent::NavigationBlocked { modal });
    }

    fn emit(&self, event: NavigationEvent) {
        self.events.borrow_mut().push(event);
    }

    fn key_of(&self, id: ViewNodeId) -> &str {
        self.tree.node(id).map_or("?", |node| node.key().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{
        MessagePresenter, TimedTransitions, TransitionProvider, ViewInstantiator, VisibilityToggle,
    };
    use crate::node::{InstanceId, MountSurface};
    use crate::transition::TransitionDirection;
    use crate::tree::ViewSpec;

    #[derive(Default)]
    struct TestHost {
        instantiated: Vec<ViewNodeId>,
        shown: Vec<ViewNodeId>,
        fronted: Vec<ViewNodeId>,
        messages: Vec<(String, String)>,
        transitions: TimedTransitions,
    }

    impl ViewInstantiator for TestHost {
        fn instantiate(&mut self, prototype: &ViewNode, _parent: Option<&MountSurface>) -> InstanceId {
            self.instantiated.push(prototype.id());
            InstanceId(self.instantiated.len() as u64)
        }
    }

    impl VisibilityToggle for TestHost {
        fn set_visible(&mut self, node: &ViewNode, visible: bool) {
            if visible {
                self.shown.push(node.id());
            }
        }

        fn bring_to_front(&mut self, node: &ViewNode) {
            self.fronted.push(node.id());
        }
    }

    impl TransitionProvider for TestHost {
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

    impl MessagePresenter for TestHost {
        fn present_message(&mut self, _node: &ViewNode, title: &str, body: &str) {
            self.messages.push((title.to_string(), body.to_string()));
        }
    }

    fn flat_tree() -> (ViewTree, ViewNodeId, ViewNodeId) {
        let mut tree = ViewTree::new("ui");
        let menu = tree.add_view(tree.root(), ViewSpec::live("menu")).unwrap();
        let settings = tree
            .add_view(tree.root(), ViewSpec::prototype("settings"))
            .unwrap();
        (tree, menu, settings)
    }

    #[test]
    fn test_pop_view_pushes_and_activates() {
        let (tree, menu, _) = flat_tree();
        let mut engine = NavigationEngine::new(tree, TestHost::default());
        assert!(!engine.is_view_active());

        let nav = engine.pop_view(menu, None, false);
        assert_eq!(nav.view(), Some(menu));
        assert_eq!(engine.active_view(), Some(menu));
        assert!(engine.is_last_view());
        assert_eq!(engine.host().shown, vec![menu]);
        assert_eq!(
            engine.drain_events(),
            vec![NavigationEvent::AnyViewBecameActive]
        );
    }

    #[test]
    fn test_prototype_resolves_to_live_copy() {
        let (tree, _, settings) = flat_tree();
        let mut engine = NavigationEngine::new(tree, TestHost::default());

        let live = engine.pop_view(settings, None, true).view().unwrap();
        assert_ne!(live, settings);
        assert_eq!(engine.node(live).unwrap().origin(), Some(settings));

        let again = engine.pop_view(settings, None, true).view().unwrap();
        assert_eq!(again, live);
        assert_eq!(engine.host().instantiated, vec![settings]);
        assert_eq!(engine.history_depth(), 1);
    }

    #[test]
    fn test_show_transition_comes_from_previous_leaf() {
        let (tree, menu, settings) = flat_tree();
        let mut engine = NavigationEngine::new(tree, TestHost::default());
        let _ = engine.pop_view(menu, None, false);

        let nav = engine.pop_view(settings, None, false);
        let live = nav.view().unwrap();
        let steps = nav.handle.steps();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].node, live);
        assert_eq!(steps[0].counterpart, Some(menu));
        assert_eq!(steps[0].direction, TransitionDirection::Show);
    }

    #[test]
    fn test_unknown_target_leaves_state_alone() {
        let (tree, menu, _) = flat_tree();
        let mut engine = NavigationEngine::new(tree, TestHost::default());
        let _ = engine.pop_view(menu, None, false);
        engine.drain_events();

        let nav = engine.pop_view_by_key("credits", None, false);
        assert!(nav.handle.is_inert());
        assert!(matches!(
            nav.result,
            Err(NavigationError::ViewNotRegistered { .. })
        ));
        assert_eq!(engine.history_depth(), 1);
        assert_eq!(engine.active_view(), Some(menu));
        assert_eq!(engine.drain_events().len(), 1);
    }

    #[test]
    fn test_error_view_receives_message() {
        let mut tree = ViewTree::new("ui");
        let mut error = tree
            .add_view(tree.root(), ViewSpec::prototype("error").modal())
            .unwrap();
        let prototype = error;
        let mut engine = NavigationEngine::new(tree, TestHost::default());

        let nav = engine.pop_error_view(&mut error, "Offline", "Check your connection", true);
        assert_eq!(nav.view(), Some(error));
        assert_ne!(error, prototype);
        let message = engine.node(error).unwrap().message().unwrap();
        assert_eq!(message.title, "Offline");
        assert_eq!(message.body, "Check your connection");
        assert_eq!(
            engine.host().messages,
            vec![("Offline".to_string(), "Check your connection".to_string())]
        );
    }

    #[test]
    fn test_dismiss_modal_is_the_exit() {
        let mut tree = ViewTree::new("ui");
        let menu = tree.add_view(tree.root(), ViewSpec::live("menu")).unwrap();
        let confirm = tree
            .add_view(tree.root(), ViewSpec::live("confirm").modal())
            .unwrap();
        let mut engine = NavigationEngine::new(tree, TestHost::default());
        let _ = engine.pop_view(menu, None, true);
        let _ = engine.pop_view(confirm, None, true);

        assert!(engine.back(true).is_inert());
        assert_eq!(engine.active_view(), Some(confirm));

        let handle = engine.dismiss_modal(true);
        assert_eq!(handle.steps()[0].node, confirm);
        assert_eq!(engine.active_view(), Some(menu));
        assert!(engine.dismiss_modal(true).is_inert());
    }

    #[test]
    fn test_forced_skip_from_config() {
        let (tree, menu, _) = flat_tree();
        let config = NavigationConfig {
            skip_animations: true,
            ..NavigationConfig::default()
        };
        let mut engine = NavigationEngine::with_config(tree, TestHost::default(), &config);
        let nav = engine.pop_view(menu, None, false);
        assert_eq!(nav.handle.total_duration_ms(), 0.0);
    }

    #[test]
    fn test_back_reactivates_entering_path() {
        let (tree, menu, settings) = flat_tree();
        let mut engine = NavigationEngine::new(tree, TestHost::default());
        let _ = engine.pop_view(menu, None, true);
        let live = engine.pop_view(settings, None, true).view().unwrap();

        let handle = engine.back(true);
        let steps = handle.steps();
        assert_eq!(steps[0].node, live);
        assert_eq!(steps[0].counterpart, Some(menu));
        assert_eq!(steps[0].direction, TransitionDirection::Hide);
        assert_eq!(engine.host().fronted, vec![menu]);
        assert_eq!(
            engine.node(engine.tree().root()).unwrap().current_child(),
            Some(menu)
        );
    }
}
