use anyhow::{Context, Result};
use rune_config::RuneConfig;
use rune_nav::{
    InstanceId, MessagePresenter, MountSurface, NavigationEngine, TimedTransitions,
    TransitionHandle, TransitionProvider, ViewDocument, ViewInstantiator, ViewNode, ViewNodeId,
    ViewTree, VisibilityToggle,
};

const FRAME_MS: f32 = 16.67;

const DEFAULT_DOCUMENT: &str = r#"{
    "root": {
        "key": "ui",
        "kind": "live",
        "container": "ui",
        "children": [
            { "key": "menu", "kind": "live" },
            { "key": "loading" },
            { "key": "error", "modal": true },
            { "key": "tip", "popup": true },
            { "key": "settings", "container": "settings.body", "children": [
                { "key": "audio" },
                { "key": "video" }
            ]}
        ]
    }
}"#;

/// Host that prints what a renderer would do.
struct ConsoleHost {
    next_instance: u64,
    transitions: TimedTransitions,
}

impl ViewInstantiator for ConsoleHost {
    fn instantiate(&mut self, prototype: &ViewNode, parent: Option<&MountSurface>) -> InstanceId {
        self.next_instance += 1;
        let parent = parent.map_or("-", |surface| surface.0.as_str());
        println!("  instantiate '{}' under {parent}", prototype.key());
        InstanceId(self.next_instance)
    }
}

impl VisibilityToggle for ConsoleHost {
    fn set_visible(&mut self, node: &ViewNode, visible: bool) {
        log::debug!("'{}' visible={visible}", node.key());
    }

    fn bring_to_front(&mut self, node: &ViewNode) {
        log::debug!("'{}' to front", node.key());
    }
}

impl TransitionProvider for ConsoleHost {
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

impl MessagePresenter for ConsoleHost {
    fn present_message(&mut self, node: &ViewNode, title: &str, body: &str) {
        println!("  '{}' shows \"{title}\": {body}", node.key());
    }
}

fn load_document(config: &RuneConfig) -> Result<ViewDocument> {
    match &config.navigation.document {
        Some(path) => ViewDocument::from_file(path)
            .with_context(|| format!("loading view document {}", path.display())),
        None => Ok(ViewDocument::from_json_str(DEFAULT_DOCUMENT)?),
    }
}

fn find(engine: &NavigationEngine<ConsoleHost>, key: &str) -> Result<ViewNodeId> {
    engine
        .tree()
        .iter()
        .find(|node| node.key().as_str() == key && node.origin().is_none())
        .map(ViewNode::id)
        .with_context(|| format!("view '{key}' missing from document"))
}

fn play(mut handle: TransitionHandle) -> usize {
    let mut frames = 0;
    while handle.advance(FRAME_MS) {
        frames += 1;
    }
    frames
}

fn report(step: &str, engine: &mut NavigationEngine<ConsoleHost>, frames: usize) {
    let active = engine
        .active_view()
        .and_then(|id| engine.node(id))
        .map_or("<none>".to_string(), |node| node.key().to_string());
    println!(
        "{step}: active={active} depth={} frames={frames}",
        engine.history_depth()
    );
    for event in engine.drain_events() {
        println!("  event {event:?}");
    }
}

fn main() -> Result<()> {
    let config = RuneConfig::load();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.filter.as_str()),
    )
    .init();

    let document = load_document(&config)?;
    let tree = ViewTree::from_document(&document)?;
    log::info!("loaded {} views", tree.len());

    let host = ConsoleHost {
        next_instance: 0,
        transitions: TimedTransitions::from_config(&config.transitions),
    };
    let mut engine = NavigationEngine::with_config(tree, host, &config.navigation);

    let menu = find(&engine, "menu")?;
    let settings = find(&engine, "settings")?;
    let video = find(&engine, "video")?;
    let tip = find(&engine, "tip")?;
    let mut loading = find(&engine, "loading")?;
    let mut error = find(&engine, "error")?;

    let nav = engine.pop_view(menu, None, false);
    report("pop menu", &mut engine, play(nav.handle));

    let nav = engine.pop_view(settings, None, false);
    report("pop settings", &mut engine, play(nav.handle));

    let nav = engine.pop_view(video, Some(settings), false);
    report("pop video", &mut engine, play(nav.handle));

    let nav = engine.pop_view(tip, None, false);
    report("pop tip", &mut engine, play(nav.handle));

    let nav = engine.pop_loading_view(&mut loading, false);
    report("pop loading (dismisses tip)", &mut engine, play(nav.handle));

    let nav = engine.pop_error_view(&mut error, "Offline", "Could not reach the server.", false);
    report("pop error", &mut engine, play(nav.handle));

    let nav = engine.pop_view(menu, None, false);
    report("pop menu under modal", &mut engine, play(nav.handle));

    let handle = engine.back(false);
    report("back under modal", &mut engine, play(handle));

    let handle = engine.dismiss_modal(false);
    report("dismiss error", &mut engine, play(handle));

    while engine.is_view_active() {
        let handle = engine.back(false);
        report("back", &mut engine, play(handle));
    }

    Ok(())
}
