//! Composable handles for in-flight show/hide transitions.
//!
//! This module provides:
//! - `TransitionSpec`: Timing for one effect (duration, delay, easing)
//! - `TransitionStep`: Which node animates, in which direction, against which counterpart
//! - `TransitionHandle`: Runtime state of an effect or a composition of effects
//!
//! Handles describe deferred *visual* completion only. Navigation state is
//! already final when a handle is returned; the host advances the handle each
//! frame and completion callbacks fire once it finishes.
//!
//! # Example
//!
//! ```ignore
//! let show = TransitionHandle::timed(menu, None, TransitionDirection::Show, &TransitionSpec::default());
//! let hide = TransitionHandle::timed(splash, Some(menu), TransitionDirection::Hide, &TransitionSpec::instant());
//! let mut handle = hide.sequence(show);
//! handle.on_complete(|| println!("menu visible"));
//!
//! while handle.advance(16.67) {}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::easing::EasingFunction;
use crate::node::ViewNodeId;

/// Whether an effect brings a node in or takes it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionDirection {
    Show,
    Hide,
}

/// Timing of a single show or hide effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionSpec {
    /// Duration of the effect in milliseconds.
    pub duration_ms: f32,
    /// Delay before the effect starts in milliseconds.
    pub delay_ms: f32,
    pub easing: EasingFunction,
}

impl Default for TransitionSpec {
    fn default() -> Self {
        Self {
            duration_ms: 300.0,
            delay_ms: 0.0,
            easing: EasingFunction::Ease,
        }
    }
}

impl TransitionSpec {
    pub fn new(duration_ms: f32) -> Self {
        Self {
            duration_ms,
            ..Self::default()
        }
    }

    /// Zero duration and delay; completes on the first advance.
    pub fn instant() -> Self {
        Self {
            duration_ms: 0.0,
            delay_ms: 0.0,
            easing: EasingFunction::Linear,
        }
    }

    pub fn with_delay(mut self, delay_ms: f32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }
}

/// Lifecycle of a timed effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionState {
    /// Waiting out its delay.
    Pending,
    Running,
    Finished,
}

/// One effect: `node` shows (from `counterpart`) or hides (to `counterpart`).
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionStep {
    pub node: ViewNodeId,
    pub counterpart: Option<ViewNodeId>,
    pub direction: TransitionDirection,
    pub spec: TransitionSpec,
}

#[derive(Debug)]
enum Body {
    Inert,
    Timed {
        step: TransitionStep,
        elapsed_ms: f32,
        state: TransitionState,
    },
    /// Children run concurrently from time zero.
    Join(Vec<TransitionHandle>),
    /// Children run one after another.
    Sequence {
        parts: Vec<TransitionHandle>,
        current: usize,
    },
}

/// Opaque, composable handle for an in-flight transition.
pub struct TransitionHandle {
    body: Body,
    on_complete: Vec<Box<dyn FnOnce()>>,
}

impl TransitionHandle {
    /// A handle that is already complete.
    pub fn inert() -> Self {
        Self::from_body(Body::Inert)
    }

    /// A single timed effect.
    pub fn timed(
        node: ViewNodeId,
        counterpart: Option<ViewNodeId>,
        direction: TransitionDirection,
        spec: &TransitionSpec,
    ) -> Self {
        let state = if spec.delay_ms > 0.0 {
            TransitionState::Pending
        } else {
            TransitionState::Running
        };
        Self::from_body(Body::Timed {
            step: TransitionStep {
                node,
                counterpart,
                direction,
                spec: *spec,
            },
            elapsed_ms: 0.0,
            state,
        })
    }

    fn from_body(body: Body) -> Self {
        Self {
            body,
            on_complete: Vec::new(),
        }
    }

    /// Run `self` and `other` concurrently; completes when both have.
    pub fn join(self, other: TransitionHandle) -> Self {
        if self.is_bare_inert() {
            return other;
        }
        if other.is_bare_inert() {
            return self;
        }
        let mut parts = self.into_join_parts();
        parts.extend(other.into_join_parts());
        Self::from_body(Body::Join(parts))
    }

    /// Join every handle in `handles`.
    pub fn join_all(handles: impl IntoIterator<Item = TransitionHandle>) -> Self {
        handles
            .into_iter()
            .fold(Self::inert(), |acc, handle| acc.join(handle))
    }

    /// Run `next` after `self` completes.
    pub fn sequence(self, next: TransitionHandle) -> Self {
        if self.is_bare_inert() {
            return next;
        }
        if next.is_bare_inert() {
            return self;
        }
        Self::from_body(Body::Sequence {
            parts: vec![self, next],
            current: 0,
        })
    }

    /// Register a callback fired once when the handle completes.
    ///
    /// Fires immediately if the handle is already complete.
    pub fn on_complete(&mut self, callback: impl FnOnce() + 'static) {
        if self.is_finished() {
            callback();
        } else {
            self.on_complete.push(Box::new(callback));
        }
    }

    /// Builder form of [`on_complete`](Self::on_complete).
    pub fn then(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.on_complete(callback);
        self
    }

    /// Advance by `delta_ms`. Returns `true` while still running.
    pub fn advance(&mut self, delta_ms: f32) -> bool {
        match &mut self.body {
            Body::Inert => {}
            Body::Timed {
                step,
                elapsed_ms,
                state,
            } => {
                if *state != TransitionState::Finished {
                    *elapsed_ms += delta_ms;
                    if *elapsed_ms >= step.spec.delay_ms {
                        *state = TransitionState::Running;
                    }
                    if *elapsed_ms - step.spec.delay_ms >= step.spec.duration_ms {
                        *state = TransitionState::Finished;
                    }
                }
            }
            Body::Join(parts) => {
                for part in parts.iter_mut() {
                    part.advance(delta_ms);
                }
            }
            Body::Sequence { parts, current } => {
                if let Some(part) = parts.get_mut(*current) {
                    if !part.advance(delta_ms) {
                        *current += 1;
                    }
                }
                // Skip parts that were complete before they started.
                while parts.get(*current).is_some_and(TransitionHandle::is_finished) {
                    *current += 1;
                }
            }
        }
        self.fire_if_finished();
        !self.is_finished()
    }

    /// Jump straight to the end, firing every pending callback.
    pub fn finish(&mut self) {
        match &mut self.body {
            Body::Inert => {}
            Body::Timed {
                step,
                elapsed_ms,
                state,
            } => {
                *elapsed_ms = step.spec.delay_ms + step.spec.duration_ms;
                *state = TransitionState::Finished;
            }
            Body::Join(parts) => parts.iter_mut().for_each(TransitionHandle::finish),
            Body::Sequence { parts, current } => {
                parts.iter_mut().for_each(TransitionHandle::finish);
                *current = parts.len();
            }
        }
        self.fire_if_finished();
    }

    pub fn is_finished(&self) -> bool {
        match &self.body {
            Body::Inert => true,
            Body::Timed { state, .. } => *state == TransitionState::Finished,
            Body::Join(parts) => parts.iter().all(TransitionHandle::is_finished),
            Body::Sequence { parts, current } => *current >= parts.len(),
        }
    }

    /// Whether the handle carries no effect at all.
    pub fn is_inert(&self) -> bool {
        matches!(self.body, Body::Inert)
    }

    /// Linear progress from 0.0 to 1.0.
    pub fn progress(&self) -> f32 {
        match &self.body {
            Body::Inert => 1.0,
            Body::Timed {
                step,
                elapsed_ms,
                state,
            } => {
                if *state == TransitionState::Finished {
                    return 1.0;
                }
                let active = (*elapsed_ms - step.spec.delay_ms).max(0.0);
                if step.spec.duration_ms > 0.0 {
                    (active / step.spec.duration_ms).clamp(0.0, 1.0)
                } else {
                    0.0
                }
            }
            Body::Join(parts) => parts
                .iter()
                .map(TransitionHandle::progress)
                .fold(1.0, f32::min),
            Body::Sequence { parts, current } => {
                if parts.is_empty() || *current >= parts.len() {
                    return 1.0;
                }
                (*current as f32 + parts[*current].progress()) / parts.len() as f32
            }
        }
    }

    /// Eased progress of a single timed effect; composites report linear progress.
    pub fn eased_progress(&self) -> f32 {
        match &self.body {
            Body::Timed { step, .. } => step.spec.easing.evaluate(self.progress()),
            _ => self.progress(),
        }
    }

    /// Longest wall time from start to completion, delays included.
    pub fn total_duration_ms(&self) -> f32 {
        match &self.body {
            Body::Inert => 0.0,
            Body::Timed { step, .. } => step.spec.delay_ms + step.spec.duration_ms,
            Body::Join(parts) => parts
                .iter()
                .map(TransitionHandle::total_duration_ms)
                .fold(0.0, f32::max),
            Body::Sequence { parts, .. } => {
                parts.iter().map(TransitionHandle::total_duration_ms).sum()
            }
        }
    }

    /// Every effect in the handle, in composition order.
    pub fn steps(&self) -> Vec<&TransitionStep> {
        let mut out = Vec::new();
        self.collect_steps(&mut out);
        out
    }

    fn collect_steps<'a>(&'a self, out: &mut Vec<&'a TransitionStep>) {
        match &self.body {
            Body::Inert => {}
            Body::Timed { step, .. } => out.push(step),
            Body::Join(parts) | Body::Sequence { parts, .. } => {
                for part in parts {
                    part.collect_steps(out);
                }
            }
        }
    }

    fn is_bare_inert(&self) -> bool {
        self.is_inert() && self.on_complete.is_empty()
    }

    fn into_join_parts(self) -> Vec<TransitionHandle> {
        match self {
            Self {
                body: Body::Join(parts),
                on_complete,
            } if on_complete.is_empty() => parts,
            other => vec![other],
        }
    }

    fn fire_if_finished(&mut self) {
        if !self.on_complete.is_empty() && self.is_finished() {
            for callback in std::mem::take(&mut self.on_complete) {
                callback();
            }
        }
    }
}

impl Default for TransitionHandle {
    fn default() -> Self {
        Self::inert()
    }
}

impl fmt::Debug for TransitionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionHandle")
            .field("body", &self.body)
            .field("pending_callbacks", &self.on_complete.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn show(node: u32, ms: f32) -> TransitionHandle {
        TransitionHandle::timed(
            ViewNodeId(node),
            None,
            TransitionDirection::Show,
            &TransitionSpec::new(ms).with_easing(EasingFunction::Linear),
        )
    }

    fn counter() -> (Rc<Cell<u32>>, impl FnOnce() + 'static) {
        let count = Rc::new(Cell::new(0));
        let handle = count.clone();
        (count, move || handle.set(handle.get() + 1))
    }

    #[test]
    fn test_inert_is_finished() {
        let mut handle = TransitionHandle::inert();
        assert!(handle.is_finished());
        assert!(handle.is_inert());
        assert!(!handle.advance(16.0));
        assert_eq!(handle.progress(), 1.0);
        assert!(handle.steps().is_empty());
    }

    #[test]
    fn test_timed_lifecycle() {
        let mut handle = show(1, 100.0);
        assert!(!handle.is_finished());

        assert!(handle.advance(50.0));
        assert!((handle.progress() - 0.5).abs() < 0.01);
        assert!((handle.eased_progress() - 0.5).abs() < 0.01);

        assert!(!handle.advance(60.0));
        assert!(handle.is_finished());
        assert_eq!(handle.progress(), 1.0);
    }

    #[test]
    fn test_delay_holds_progress() {
        let spec = TransitionSpec::new(100.0).with_delay(50.0);
        let mut handle =
            TransitionHandle::timed(ViewNodeId(1), None, TransitionDirection::Hide, &spec);
        handle.advance(25.0);
        assert_eq!(handle.progress(), 0.0);
        handle.advance(75.0);
        assert!((handle.progress() - 0.5).abs() < 0.01);
        assert_eq!(handle.total_duration_ms(), 150.0);
    }

    #[test]
    fn test_instant_completes_on_first_advance() {
        let mut handle = TransitionHandle::timed(
            ViewNodeId(1),
            None,
            TransitionDirection::Show,
            &TransitionSpec::instant(),
        );
        assert!(!handle.is_finished());
        assert!(!handle.advance(0.0));
        assert!(handle.is_finished());
    }

    #[test]
    fn test_join_runs_concurrently() {
        let mut handle = show(1, 100.0).join(show(2, 200.0));
        assert_eq!(handle.total_duration_ms(), 200.0);
        assert!(handle.advance(150.0));
        assert!(!handle.advance(50.0));
    }

    #[test]
    fn test_join_flattens_and_skips_inert() {
        let handle = TransitionHandle::join_all([
            show(1, 10.0),
            TransitionHandle::inert(),
            show(2, 10.0).join(show(3, 10.0)),
        ]);
        let nodes: Vec<_> = handle.steps().iter().map(|s| s.node).collect();
        assert_eq!(nodes, vec![ViewNodeId(1), ViewNodeId(2), ViewNodeId(3)]);

        let single = TransitionHandle::inert().join(show(4, 10.0));
        assert!(!single.is_inert());
        assert_eq!(single.steps().len(), 1);
    }

    #[test]
    fn test_sequence_orders_parts() {
        let mut handle = show(1, 100.0).sequence(show(2, 100.0));
        assert_eq!(handle.total_duration_ms(), 200.0);
        assert!(handle.advance(100.0));
        assert!((handle.progress() - 0.5).abs() < 0.01);
        assert!(handle.advance(50.0));
        assert!(!handle.advance(50.0));
    }

    #[test]
    fn test_callback_fires_once_on_completion() {
        let (count, callback) = counter();
        let mut handle = show(1, 100.0).then(callback);
        handle.advance(50.0);
        assert_eq!(count.get(), 0);
        handle.advance(50.0);
        assert_eq!(count.get(), 1);
        handle.advance(50.0);
        handle.finish();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_callback_on_finished_handle_fires_immediately() {
        let (count, callback) = counter();
        let mut handle = TransitionHandle::inert();
        handle.on_complete(callback);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_finish_fires_nested_callbacks() {
        let (inner, inner_cb) = counter();
        let (outer, outer_cb) = counter();
        let mut handle = show(1, 100.0)
            .then(inner_cb)
            .join(show(2, 500.0))
            .then(outer_cb);
        handle.finish();
        assert!(handle.is_finished());
        assert_eq!(inner.get(), 1);
        assert_eq!(outer.get(), 1);
    }
}
