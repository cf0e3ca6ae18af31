//! Event values and the listener side-table.
//!
//! Listener state is keyed by node identity in [`ListenerStore`], never
//! stored on the nodes themselves. A listener's identity is the shared
//! callback allocation, so the same callback value can be registered and
//! later detached by reference.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::dom::NodeId;
use crate::handle::ElementHandle;

/// Shared event callback. The first argument is the handle wrapping the node
/// the listener fired on, the second the event being dispatched.
pub type EventCallback = Rc<RefCell<dyn FnMut(&ElementHandle, &Event)>>;

/// Wraps a closure as a shareable [`EventCallback`].
pub fn callback<F>(f: F) -> EventCallback
where
    F: FnMut(&ElementHandle, &Event) + 'static,
{
    Rc::new(RefCell::new(f))
}

/// Coordinates of a single touch contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
}

/// Gesture classification produced by `swipe`: the dominant displacement
/// axis picks the pair, the sign picks the direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
    Down,
}

/// One dispatched event. Flags are interior-mutable so listeners can stop
/// propagation or mark the default as prevented through a shared reference.
pub struct Event {
    event_type: String,
    target: NodeId,
    current_target: Cell<NodeId>,
    touch: Option<TouchPoint>,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
}

impl Event {
    pub(crate) fn new(event_type: &str, target: NodeId, touch: Option<TouchPoint>) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: Cell::new(target),
            touch,
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn current_target(&self) -> NodeId {
        self.current_target.get()
    }

    pub(crate) fn set_current_target(&self, node: NodeId) {
        self.current_target.set(node);
    }

    pub fn touch(&self) -> Option<TouchPoint> {
        self.touch
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }
}

#[derive(Clone)]
pub(crate) struct Listener {
    pub(crate) capture: bool,
    pub(crate) callback: EventCallback,
}

#[derive(Default)]
pub(crate) struct ListenerStore {
    map: HashMap<NodeId, HashMap<String, Vec<Listener>>>,
}

impl ListenerStore {
    pub(crate) fn add(&mut self, node_id: NodeId, event: &str, listener: Listener) {
        self.map
            .entry(node_id)
            .or_default()
            .entry(event.to_string())
            .or_default()
            .push(listener);
    }

    /// Detaches one listener by callback identity, whichever phase it was
    /// registered for.
    pub(crate) fn remove(&mut self, node_id: NodeId, event: &str, callback: &EventCallback) -> bool {
        let Some(events) = self.map.get_mut(&node_id) else {
            return false;
        };
        let Some(listeners) = events.get_mut(event) else {
            return false;
        };

        if let Some(pos) = listeners
            .iter()
            .position(|listener| Rc::ptr_eq(&listener.callback, callback))
        {
            listeners.remove(pos);
            if listeners.is_empty() {
                events.remove(event);
            }
            if events.is_empty() {
                self.map.remove(&node_id);
            }
            return true;
        }

        false
    }

    /// Drops every listener for `event` on `node_id`, in registration order,
    /// and clears the registry entry.
    pub(crate) fn remove_all(&mut self, node_id: NodeId, event: &str) -> usize {
        let Some(events) = self.map.get_mut(&node_id) else {
            return 0;
        };
        let removed = events.remove(event).map(|l| l.len()).unwrap_or(0);
        if events.is_empty() {
            self.map.remove(&node_id);
        }
        removed
    }

    /// Drops every entry for `node_id`, all event names at once.
    pub(crate) fn clear_node(&mut self, node_id: NodeId) {
        self.map.remove(&node_id);
    }

    pub(crate) fn get(&self, node_id: NodeId, event: &str, capture: bool) -> Vec<Listener> {
        self.map
            .get(&node_id)
            .and_then(|events| events.get(event))
            .map(|listeners| {
                listeners
                    .iter()
                    .filter(|listener| listener.capture == capture)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn count(&self, node_id: NodeId, event: &str) -> usize {
        self.map
            .get(&node_id)
            .and_then(|events| events.get(event))
            .map(|listeners| listeners.len())
            .unwrap_or(0)
    }
}
