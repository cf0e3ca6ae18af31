//! Frame-driven presentation helpers.
//!
//! Fades run as a small state machine re-scheduling themselves on the host
//! frame queue: each tick moves opacity one 0.1 step toward the bound, then
//! finalizes display state. A fade is not stoppable by default; the returned
//! [`AnimationHandle`] offers opt-in cancellation.

use std::cell::Cell;
use std::rc::Rc;

use crate::dom::{NodeId, format_float};
use crate::handle::ElementHandle;
use crate::host::Host;
use crate::observer::MutationRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadePhase {
    Idle,
    Running,
    Done,
}

/// Progress/cancellation handle for one fade. Dropping it changes nothing;
/// `cancel` forces the `Done` phase so the next tick drops the loop.
#[derive(Clone)]
pub struct AnimationHandle {
    phase: Rc<Cell<FadePhase>>,
}

impl AnimationHandle {
    pub(crate) fn new() -> Self {
        Self {
            phase: Rc::new(Cell::new(FadePhase::Idle)),
        }
    }

    pub fn phase(&self) -> FadePhase {
        self.phase.get()
    }

    pub fn is_running(&self) -> bool {
        self.phase.get() == FadePhase::Running
    }

    pub fn is_done(&self) -> bool {
        self.phase.get() == FadePhase::Done
    }

    pub fn cancel(&self) {
        self.phase.set(FadePhase::Done);
    }

    pub(crate) fn set_phase(&self, phase: FadePhase) {
        self.phase.set(phase);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FadeDirection {
    In,
    Out,
}

pub(crate) fn start_fade(host: &Host, node: NodeId, direction: FadeDirection) -> AnimationHandle {
    let anim = AnimationHandle::new();
    anim.set_phase(FadePhase::Running);

    if direction == FadeDirection::In {
        let mut inner = host.inner_mut();
        if inner.dom.style_get(node, "display") == "none" {
            inner.dom.style_set(node, "display", "");
            inner.dom.style_set(node, "opacity", "0");
            inner.record(MutationRecord::attributes(node, "style"));
        }
    }

    schedule_step(host, node, direction, anim.clone());
    anim
}

fn schedule_step(host: &Host, node: NodeId, direction: FadeDirection, anim: AnimationHandle) {
    host.schedule_frame(move |h| {
        if anim.phase() == FadePhase::Done {
            return;
        }

        let finished = {
            let mut inner = h.inner_mut();
            let raw = inner.dom.style_get(node, "opacity");
            let fallback = match direction {
                FadeDirection::In => 0.0,
                FadeDirection::Out => 1.0,
            };
            let current = raw.parse::<f64>().unwrap_or(fallback);
            // Step on a tenths grid so repeated increments stay exact.
            let tenths = (current * 10.0).round() as i64;
            let next = match direction {
                FadeDirection::In => (tenths + 1).min(10),
                FadeDirection::Out => (tenths - 1).max(0),
            };
            inner
                .dom
                .style_set(node, "opacity", &format_float(next as f64 / 10.0));
            let finished = match direction {
                FadeDirection::In => next >= 10,
                FadeDirection::Out => next <= 0,
            };
            if finished && direction == FadeDirection::Out {
                inner.dom.style_set(node, "display", "none");
            }
            inner.record(MutationRecord::attributes(node, "style"));
            finished
        };

        if finished {
            anim.set_phase(FadePhase::Done);
        } else {
            schedule_step(h, node, direction, anim.clone());
        }
    });
}

/// Height/line-height toggle configuration for [`ElementHandle::collapsible`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollapsibleOptions {
    pub duration_ms: u32,
    pub min_height: f64,
    /// Fixed expanded height. When absent, `expand` re-reads the node's
    /// current height at call time.
    pub height: Option<f64>,
}

impl Default for CollapsibleOptions {
    fn default() -> Self {
        Self {
            duration_ms: 300,
            min_height: 0.0,
            height: None,
        }
    }
}

/// The expand/collapse pair returned by [`ElementHandle::collapsible`].
pub struct Collapsible {
    handle: ElementHandle,
    options: CollapsibleOptions,
}

impl Collapsible {
    pub(crate) fn new(handle: ElementHandle, options: CollapsibleOptions) -> Self {
        Self { handle, options }
    }

    pub fn expand(&self) {
        let height = self
            .options
            .height
            .unwrap_or_else(|| self.handle.current_height());
        self.handle.css(&format!(
            "height: {}px; line-height: normal;",
            format_float(height)
        ));
    }

    pub fn collapse(&self) {
        let min = format_float(self.options.min_height);
        self.handle
            .css(&format!("height: {min}px; line-height: {min}px;"));
    }
}
