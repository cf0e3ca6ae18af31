//! The deterministic document host.
//!
//! A [`Host`] is a cheaply clonable shared handle to one document
//! environment: the arena DOM, the listener side-table, observer
//! subscriptions, the animation-frame queue, pending network requests, and
//! trace diagnostics. All asynchrony is pumped explicitly; nothing advances
//! between calls.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::dom::{Dom, NodeId};
use crate::events::{Event, ListenerStore, TouchPoint};
use crate::handle::ElementHandle;
use crate::net::{
    AjaxOptions, AjaxRequest, AjaxResponse, AjaxResult, PendingRequest, RequestHandlerBox, resolve,
};
use crate::observer::{MutationRecord, ObserverStore};
use crate::{Error, Result};

// Dispatch and serialization recurse over caller-shaped trees.
const GROWN_STACK_BYTES: usize = 32 * 1024 * 1024;

pub(crate) type FrameCallback = Box<dyn FnOnce(&Host)>;

#[derive(Clone)]
pub struct Host {
    inner: Rc<RefCell<HostInner>>,
}

pub(crate) struct HostInner {
    pub(crate) dom: Dom,
    pub(crate) listeners: ListenerStore,
    pub(crate) observers: ObserverStore,
    frame_queue: Vec<FrameCallback>,
    pending_requests: Vec<PendingRequest>,
    request_handler: Option<RequestHandlerBox>,
    flush_step_limit: usize,
    trace: bool,
    trace_logs: Vec<String>,
    trace_log_limit: usize,
    trace_to_stderr: bool,
}

impl HostInner {
    fn with_dom(dom: Dom) -> Self {
        Self {
            dom,
            listeners: ListenerStore::default(),
            observers: ObserverStore::default(),
            frame_queue: Vec::new(),
            pending_requests: Vec::new(),
            request_handler: None,
            flush_step_limit: 10_000,
            trace: false,
            trace_logs: Vec::new(),
            trace_log_limit: 10_000,
            trace_to_stderr: true,
        }
    }

    pub(crate) fn record(&mut self, record: MutationRecord) {
        self.observers.record(&self.dom, &record);
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new()
    }
}

impl Host {
    /// Empty document.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(HostInner::with_dom(Dom::new()))),
        }
    }

    /// Parses `html` into a fresh document.
    pub fn from_html(html: &str) -> Result<Self> {
        let dom = crate::html::parse_document(html)?;
        Ok(Self {
            inner: Rc::new(RefCell::new(HostInner::with_dom(dom))),
        })
    }

    pub(crate) fn inner(&self) -> Ref<'_, HostInner> {
        self.inner.borrow()
    }

    pub(crate) fn inner_mut(&self) -> RefMut<'_, HostInner> {
        self.inner.borrow_mut()
    }

    // ---- selection ----

    /// Wraps the first match of `selector`. A selector that matches nothing
    /// yields a handle around a detached placeholder fragment, so the chain
    /// stays callable; only malformed selector text fails.
    pub fn select(&self, selector: &str) -> Result<ElementHandle> {
        let resolved = self.inner().dom.query_selector(selector)?;
        match resolved {
            Some(node) => Ok(ElementHandle::from_node(self.clone(), node)),
            None => {
                self.trace_line(format!(
                    "[select] no match for {selector:?}, wrapping detached placeholder"
                ));
                let node = self.inner_mut().dom.create_fragment();
                Ok(ElementHandle::from_node(self.clone(), node))
            }
        }
    }

    /// Wraps an existing node without re-resolution. Text nodes are not a
    /// valid handle target.
    pub fn wrap(&self, node: NodeId) -> Result<ElementHandle> {
        {
            let inner = self.inner();
            if !inner.dom.is_valid_node(node) {
                return Err(Error::InvalidSelector("unknown node".into()));
            }
            if inner.dom.is_text(node) {
                return Err(Error::InvalidSelector("cannot wrap a text node".into()));
            }
        }
        Ok(ElementHandle::from_node(self.clone(), node))
    }

    /// Handle around the document root.
    pub fn document(&self) -> ElementHandle {
        let root = self.inner().dom.root;
        ElementHandle::from_node(self.clone(), root)
    }

    /// First match as a raw node id.
    pub fn get(&self, selector: &str) -> Result<Option<NodeId>> {
        self.inner().dom.query_selector(selector)
    }

    /// Every match, materialized in document order.
    pub fn all(&self, selector: &str) -> Result<Vec<NodeId>> {
        self.inner().dom.query_selector_all(selector)
    }

    /// Parses markup into an inert, disconnected fragment in this host's
    /// arena. Scripts inside stay unexecuted text.
    pub fn parse(&self, html: &str) -> Result<NodeId> {
        let fragment = crate::html::parse_document(html)?;
        let mut inner = self.inner_mut();
        let container = inner.dom.create_fragment();
        let children = fragment.nodes[fragment.root.0].children.clone();
        for child in children {
            inner.dom.adopt_subtree(&fragment, child, Some(container))?;
        }
        Ok(container)
    }

    /// Fresh disconnected `<img>` node.
    pub fn image(&self, path: &str, alt: Option<&str>) -> NodeId {
        let mut inner = self.inner_mut();
        let node = inner.dom.create_detached_element("img");
        inner.dom.set_attr(node, "src", path);
        inner.dom.set_attr(node, "alt", alt.unwrap_or(""));
        node
    }

    /// Serialized markup of the whole document.
    pub fn dump(&self) -> String {
        let inner = self.inner();
        stacker::grow(GROWN_STACK_BYTES, || inner.dom.serialize(inner.dom.root))
    }

    // ---- event dispatch ----

    pub fn dispatch(&self, selector: &str, event_type: &str) -> Result<Event> {
        let target = self.require(selector)?;
        Ok(self.dispatch_node(target, event_type, None))
    }

    pub fn dispatch_touch(
        &self,
        selector: &str,
        event_type: &str,
        x: f64,
        y: f64,
    ) -> Result<Event> {
        let target = self.require(selector)?;
        Ok(self.dispatch_node(target, event_type, Some(TouchPoint { x, y })))
    }

    pub fn click(&self, selector: &str) -> Result<Event> {
        self.dispatch(selector, "click")
    }

    fn require(&self, selector: &str) -> Result<NodeId> {
        self.get(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    pub(crate) fn dispatch_node(
        &self,
        target: NodeId,
        event_type: &str,
        touch: Option<TouchPoint>,
    ) -> Event {
        stacker::grow(GROWN_STACK_BYTES, || {
            self.dispatch_node_grown(target, event_type, touch)
        })
    }

    fn dispatch_node_grown(
        &self,
        target: NodeId,
        event_type: &str,
        touch: Option<TouchPoint>,
    ) -> Event {
        let event = Event::new(event_type, target, touch);

        let mut path = Vec::new();
        {
            let inner = self.inner();
            let mut cursor = Some(target);
            while let Some(node) = cursor {
                path.push(node);
                cursor = inner.dom.parent(node);
            }
        }
        path.reverse();

        // Capture phase, root toward target.
        if path.len() >= 2 {
            for node in &path[..path.len() - 1] {
                self.run_listeners(*node, &event, true);
                if event.propagation_stopped() {
                    self.trace_event(&event, "propagation_stopped");
                    return event;
                }
            }
        }

        // Target phase: capture listeners first.
        self.run_listeners(target, &event, true);
        if event.propagation_stopped() {
            self.trace_event(&event, "propagation_stopped");
            return event;
        }

        self.run_listeners(target, &event, false);
        if event.propagation_stopped() {
            self.trace_event(&event, "propagation_stopped");
            return event;
        }

        // Bubble phase, target toward root.
        if path.len() >= 2 {
            for node in path[..path.len() - 1].iter().rev() {
                self.run_listeners(*node, &event, false);
                if event.propagation_stopped() {
                    self.trace_event(&event, "propagation_stopped");
                    return event;
                }
            }
        }

        self.trace_event(&event, "completed");
        event
    }

    fn run_listeners(&self, node: NodeId, event: &Event, capture: bool) {
        event.set_current_target(node);
        let listeners = self.inner().listeners.get(node, event.event_type(), capture);
        for listener in listeners {
            if event.propagation_stopped() {
                break;
            }
            let handle = ElementHandle::from_node(self.clone(), node);
            (listener.callback.borrow_mut())(&handle, event);
        }
    }

    fn trace_event(&self, event: &Event, outcome: &str) {
        if !self.inner().trace {
            return;
        }
        let label = self.inner().dom.node_label(event.target());
        self.trace_line(format!(
            "[event] {} target={label} {outcome}",
            event.event_type()
        ));
    }

    // ---- pumping ----

    /// Runs every frame callback queued at call time. Callbacks scheduling
    /// follow-up frames land in the next tick.
    pub fn run_frame(&self) -> usize {
        let queue = std::mem::take(&mut self.inner_mut().frame_queue);
        let ran = queue.len();
        for frame in queue {
            frame(self);
        }
        if ran > 0 {
            self.trace_line(format!("[frame] ran={ran}"));
        }
        ran
    }

    /// Ticks frames until the queue stays empty.
    pub fn run_frames_to_idle(&self) -> Result<usize> {
        let limit = self.inner().flush_step_limit;
        let mut frames = 0usize;
        let mut steps = 0usize;
        loop {
            let ran = self.run_frame();
            if ran == 0 {
                return Ok(frames);
            }
            frames += ran;
            steps += 1;
            if steps > limit {
                return Err(self.flush_limit_error(limit, steps));
            }
        }
    }

    /// Delivers every queued observer batch.
    pub fn deliver_mutations(&self) -> usize {
        let batches = self.inner_mut().observers.take_batches();
        let mut delivered = 0usize;
        for (node, callback, records) in batches {
            delivered += records.len();
            let handle = ElementHandle::from_node(self.clone(), node);
            (callback.borrow_mut())(&handle, &records);
        }
        if delivered > 0 {
            self.trace_line(format!("[observe] delivered={delivered}"));
        }
        delivered
    }

    /// Resolves queued requests FIFO through the registered handler and
    /// invokes each callback exactly once.
    pub fn run_pending_requests(&self) -> usize {
        let mut completed = 0usize;
        loop {
            let pending = {
                let mut inner = self.inner_mut();
                if inner.pending_requests.is_empty() {
                    None
                } else {
                    Some(inner.pending_requests.remove(0))
                }
            };
            let Some(pending) = pending else {
                break;
            };

            let request = AjaxRequest {
                method: pending.options.method.clone(),
                url: pending.options.url.clone(),
            };

            // The handler runs unborrowed so it may drive this host itself.
            let mut handler = self.inner_mut().request_handler.take();
            let response = match handler.as_mut() {
                Some(handler) => handler(&request),
                None => AjaxResponse::status(0),
            };
            {
                let mut inner = self.inner_mut();
                if inner.request_handler.is_none() {
                    inner.request_handler = handler;
                }
            }

            self.trace_line(format!(
                "[net] {} {} status={}",
                request.method, request.url, response.status
            ));
            (pending.callback)(resolve(&pending.options, &response));
            completed += 1;
        }
        completed
    }

    /// Pumps requests, observer deliveries, and frames to quiescence.
    pub fn flush(&self) -> Result<usize> {
        let limit = self.inner().flush_step_limit;
        let mut steps = 0usize;
        loop {
            let requests = self.run_pending_requests();
            let delivered = self.deliver_mutations();
            let frames = self.run_frame();
            if requests == 0 && delivered == 0 && frames == 0 {
                return Ok(steps);
            }
            steps += 1;
            if steps > limit {
                return Err(self.flush_limit_error(limit, steps));
            }
        }
    }

    fn flush_limit_error(&self, limit: usize, steps: usize) -> Error {
        let inner = self.inner();
        let pending = format!(
            "frames={}, requests={}, observer_records={}",
            inner.frame_queue.len(),
            inner.pending_requests.len(),
            inner.observers.queued()
        );
        Error::FlushStepLimit {
            limit,
            steps,
            pending,
        }
    }

    // ---- network ----

    /// Queues a single-shot request. The outcome reaches `callback` when
    /// the host pumps, exactly once; there is no retry or timeout.
    pub fn ajax<F>(&self, options: AjaxOptions, callback: F)
    where
        F: FnOnce(AjaxResult) + 'static,
    {
        self.trace_line(format!("[net] queued {} {}", options.method, options.url));
        self.inner_mut().pending_requests.push(PendingRequest {
            options,
            callback: Box::new(callback),
        });
    }

    /// Installs the handler that resolves queued requests. Without one,
    /// every request completes with status 0.
    pub fn set_request_handler<F>(&self, handler: F)
    where
        F: FnMut(&AjaxRequest) -> AjaxResponse + 'static,
    {
        self.inner_mut().request_handler = Some(Box::new(handler));
    }

    /// Queues a callback for the next frame tick.
    pub fn schedule_frame<F>(&self, frame: F)
    where
        F: FnOnce(&Host) + 'static,
    {
        self.inner_mut().frame_queue.push(Box::new(frame));
    }

    // ---- configuration and diagnostics ----

    pub fn set_flush_step_limit(&self, max_steps: usize) -> Result<()> {
        if max_steps == 0 {
            return Err(Error::Structure(
                "set_flush_step_limit requires at least 1 step".into(),
            ));
        }
        self.inner_mut().flush_step_limit = max_steps;
        Ok(())
    }

    pub fn enable_trace(&self, enabled: bool) {
        self.inner_mut().trace = enabled;
    }

    pub fn set_trace_stderr(&self, enabled: bool) {
        self.inner_mut().trace_to_stderr = enabled;
    }

    pub fn set_trace_log_limit(&self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::Structure(
                "set_trace_log_limit requires at least 1 entry".into(),
            ));
        }
        let mut inner = self.inner_mut();
        inner.trace_log_limit = max_entries;
        while inner.trace_logs.len() > inner.trace_log_limit {
            inner.trace_logs.remove(0);
        }
        Ok(())
    }

    pub fn take_trace_logs(&self) -> Vec<String> {
        std::mem::take(&mut self.inner_mut().trace_logs)
    }

    pub(crate) fn trace_line(&self, line: String) {
        let mut inner = self.inner_mut();
        if !inner.trace {
            return;
        }
        if inner.trace_to_stderr {
            eprintln!("{line}");
        }
        inner.trace_logs.push(line);
        while inner.trace_logs.len() > inner.trace_log_limit {
            inner.trace_logs.remove(0);
        }
    }
}
