//! The chainable element handle.
//!
//! An [`ElementHandle`] wraps exactly one node of one [`Host`]. Mutators
//! return `&Self` so calls chain; methods that naturally produce a node
//! return a new handle or a raw [`NodeId`]. A handle constructed from a
//! selector that matched nothing wraps a detached placeholder fragment, so
//! every operation stays callable and degrades to a no-op instead of
//! failing. Structural errors surfaced by the host (removing a detached
//! node, replacing a non-child) propagate as-is.

use std::cell::Cell;
use std::rc::Rc;

use crate::anim::{self, AnimationHandle, Collapsible, CollapsibleOptions, FadeDirection};
use crate::dom::NodeId;
use crate::events::{Event, EventCallback, Listener, SwipeDirection, TouchPoint, callback};
use crate::host::Host;
use crate::observer::{MutationRecord, ObserveOptions, ObserverCallback, ObserverId};
use crate::{Error, Result};

#[derive(Clone)]
pub struct ElementHandle {
    host: Host,
    node: Cell<NodeId>,
    observer: Cell<Option<ObserverId>>,
}

impl ElementHandle {
    pub(crate) fn from_node(host: Host, node: NodeId) -> Self {
        Self {
            host,
            node: Cell::new(node),
            observer: Cell::new(None),
        }
    }

    /// The wrapped node. Rebound only by [`ElementHandle::reset`].
    pub fn node(&self) -> NodeId {
        self.node.get()
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    // ---- structure ----

    /// New handle around the structural parent. A detached node has none.
    pub fn parent(&self) -> Result<ElementHandle> {
        let parent = self
            .host
            .inner()
            .dom
            .parent(self.node.get())
            .ok_or_else(|| Error::Structure("node has no parent".into()))?;
        Ok(ElementHandle::from_node(self.host.clone(), parent))
    }

    /// Detaches the node from its parent. Calling on an already-detached
    /// node is the host's error, not a no-op.
    pub fn remove(&self) -> Result<&Self> {
        let mut inner = self.host.inner_mut();
        let node = self.node.get();
        let parent = inner.dom.remove_node(node)?;
        inner.record(MutationRecord::child_list(parent, Vec::new(), vec![node]));
        Ok(self)
    }

    /// Substitutes `old` with `new` among this node's children. `old` must
    /// be a direct child.
    pub fn replace(&self, new: NodeId, old: NodeId) -> Result<&Self> {
        let mut inner = self.host.inner_mut();
        let node = self.node.get();
        let moved_from = inner.dom.replace_child(node, new, old)?;
        if new != old {
            if let Some(previous) = moved_from {
                inner.record(MutationRecord::child_list(previous, Vec::new(), vec![new]));
            }
            inner.record(MutationRecord::child_list(node, vec![new], vec![old]));
        }
        Ok(self)
    }

    /// Appends `child` as the last child.
    pub fn append(&self, child: NodeId) -> Result<&Self> {
        let mut inner = self.host.inner_mut();
        let node = self.node.get();
        let moved_from = inner.dom.append_child(node, child)?;
        if let Some(previous) = moved_from {
            inner.record(MutationRecord::child_list(previous, Vec::new(), vec![child]));
        }
        inner.record(MutationRecord::child_list(node, vec![child], Vec::new()));
        Ok(self)
    }

    /// Drains children one at a time, first child first. The host has no
    /// bulk clear with consistent semantics, so this is an explicit loop.
    pub fn remove_children(&self) -> &Self {
        let mut inner = self.host.inner_mut();
        let node = self.node.get();
        while let Some(first) = inner.dom.remove_first_child(node) {
            inner.record(MutationRecord::child_list(node, Vec::new(), vec![first]));
        }
        self
    }

    /// Disconnected duplicate of this node: attributes always, descendants
    /// only when `deep`. Returns the raw node for the caller to wrap or
    /// attach.
    pub fn clone_node(&self, deep: bool) -> NodeId {
        self.host.inner_mut().dom.clone_subtree(self.node.get(), deep)
    }

    /// Immediate element children as handles, a snapshot at call time.
    pub fn children(&self) -> Vec<ElementHandle> {
        let ids = self.host.inner().dom.element_children(self.node.get());
        ids.into_iter()
            .map(|id| ElementHandle::from_node(self.host.clone(), id))
            .collect()
    }

    /// Immediate children as raw node ids, text nodes included.
    pub fn children_raw(&self) -> Vec<NodeId> {
        self.host.inner().dom.child_nodes(self.node.get())
    }

    // ---- style and classes ----

    /// Applies a semicolon-delimited rule string, e.g.
    /// `"color: red; font-size: 1em;"`. Newlines, blank segments, and a
    /// trailing semicolon are tolerated; camel-cased property names are
    /// normalized to their hyphenated form. Each declaration is applied
    /// individually.
    pub fn css(&self, rules: &str) -> &Self {
        let mut inner = self.host.inner_mut();
        let node = self.node.get();
        let mut applied = false;
        let flattened = rules.replace(['\n', '\r'], " ");
        for segment in flattened.split(';') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            let Some((property, value)) = segment.split_once(':') else {
                continue;
            };
            let property = property.trim();
            if property.is_empty() {
                continue;
            }
            applied |= inner.dom.style_set(node, property, value.trim());
        }
        if applied {
            inner.record(MutationRecord::attributes(node, "style"));
        }
        self
    }

    /// Current value of one inline style property; hyphenated and
    /// camel-cased spellings are equivalent.
    pub fn style(&self, property: &str) -> String {
        self.host.inner().dom.style_get(self.node.get(), property)
    }

    pub fn add_class(&self, name: &str) -> &Self {
        let mut inner = self.host.inner_mut();
        let node = self.node.get();
        if inner.dom.class_add(node, name) {
            inner.record(MutationRecord::attributes(node, "class"));
        }
        self
    }

    pub fn remove_class(&self, name: &str) -> &Self {
        let mut inner = self.host.inner_mut();
        let node = self.node.get();
        if inner.dom.class_remove(node, name) {
            inner.record(MutationRecord::attributes(node, "class"));
        }
        self
    }

    pub fn toggle_class(&self, name: &str) -> &Self {
        let mut inner = self.host.inner_mut();
        let node = self.node.get();
        if inner.dom.class_toggle(node, name).is_some() {
            inner.record(MutationRecord::attributes(node, "class"));
        }
        self
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.host.inner().dom.class_contains(self.node.get(), name)
    }

    /// Current class names, materialized in order.
    pub fn class_list(&self) -> Vec<String> {
        self.host.inner().dom.class_list(self.node.get())
    }

    // ---- content and attributes ----
    //
    // Getters and setters are split methods: absence is expressed by not
    // calling the setter, so an empty-string set really clears content
    // instead of reading it back.

    pub fn text(&self) -> String {
        self.host.inner().dom.text_content(self.node.get())
    }

    pub fn set_text(&self, value: &str) -> &Self {
        let mut inner = self.host.inner_mut();
        let node = self.node.get();
        match inner.dom.set_text_content(node, value) {
            Some(crate::dom::TextEdit::InPlace { text_node }) => {
                inner.record(MutationRecord::character_data(text_node));
            }
            Some(crate::dom::TextEdit::Rebuilt { removed, added }) => {
                inner.record(MutationRecord::child_list(
                    node,
                    added.into_iter().collect(),
                    removed,
                ));
            }
            None => {}
        }
        self
    }

    pub fn html(&self) -> String {
        self.host.inner().dom.inner_html(self.node.get())
    }

    /// Replaces content with parsed markup. Scripts in `value` stay inert.
    pub fn set_html(&self, value: &str) -> Result<&Self> {
        let mut inner = self.host.inner_mut();
        let node = self.node.get();
        let edit = inner.dom.set_inner_html(node, value)?;
        inner.record(MutationRecord::child_list(node, edit.added, edit.removed));
        Ok(self)
    }

    pub fn value(&self) -> String {
        self.host.inner().dom.value(self.node.get())
    }

    pub fn set_value(&self, value: &str) -> &Self {
        self.host.inner_mut().dom.set_value(self.node.get(), value);
        self
    }

    pub fn attr(&self, name: &str) -> Option<String> {
        self.host.inner().dom.attr(self.node.get(), name)
    }

    pub fn set_attr(&self, name: &str, value: &str) -> &Self {
        let mut inner = self.host.inner_mut();
        let node = self.node.get();
        if inner.dom.set_attr(node, name, value) {
            inner.record(MutationRecord::attributes(node, name));
        }
        self
    }

    pub fn remove_attr(&self, name: &str) -> &Self {
        let mut inner = self.host.inner_mut();
        let node = self.node.get();
        if inner.dom.remove_attr(node, name) {
            inner.record(MutationRecord::attributes(node, name));
        }
        self
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.host.inner().dom.has_attr(self.node.get(), name)
    }

    /// Regex predicate over the node's current form value.
    pub fn test(&self, pattern: &str) -> Result<bool> {
        let value = self.value();
        let regex =
            fancy_regex::Regex::new(pattern).map_err(|err| Error::Regex(err.to_string()))?;
        regex
            .is_match(&value)
            .map_err(|err| Error::Regex(err.to_string()))
    }

    /// Named state predicate. Recognized checks: `checked`, `disabled`,
    /// `readonly`, `required`, `empty`, `connected`.
    pub fn is(&self, check: &str) -> Result<bool> {
        let inner = self.host.inner();
        let node = self.node.get();
        match check {
            "checked" => Ok(inner.dom.checked(node)),
            "disabled" => Ok(inner.dom.disabled(node)),
            "readonly" => Ok(inner.dom.readonly(node)),
            "required" => Ok(inner.dom.required(node)),
            "empty" => Ok(inner.dom.child_nodes(node).is_empty()),
            "connected" => Ok(inner.dom.is_connected(node)),
            other => Err(Error::UnsupportedCheck(other.to_string())),
        }
    }

    // ---- events ----

    /// Binds `callback` for `event` in the bubble phase. The callback
    /// receives the handle wrapping the listening node, not the raw node.
    pub fn on(&self, event: &str, callback: EventCallback) -> &Self {
        self.host.inner_mut().listeners.add(
            self.node.get(),
            event,
            Listener {
                capture: false,
                callback,
            },
        );
        self
    }

    /// Same as [`ElementHandle::on`], registered for the capture phase.
    pub fn on_capture(&self, event: &str, callback: EventCallback) -> &Self {
        self.host.inner_mut().listeners.add(
            self.node.get(),
            event,
            Listener {
                capture: true,
                callback,
            },
        );
        self
    }

    /// Detaches one specific callback for `event`, matched by identity.
    pub fn off(&self, event: &str, callback: &EventCallback) -> &Self {
        self.host
            .inner_mut()
            .listeners
            .remove(self.node.get(), event, callback);
        self
    }

    /// Detaches every callback registered for `event`, in registration
    /// order, and clears the registry entry.
    pub fn off_all(&self, event: &str) -> &Self {
        self.host
            .inner_mut()
            .listeners
            .remove_all(self.node.get(), event);
        self
    }

    /// All-or-nothing listener reset: replaces the node with a deep clone
    /// of itself under its parent (a structural clone carries no
    /// listeners) and rebinds this handle to the clone. Any other handle
    /// still referencing the old node goes stale.
    pub fn reset(&self) -> Result<&Self> {
        let clone = {
            let mut inner = self.host.inner_mut();
            let node = self.node.get();
            let Some(parent) = inner.dom.parent(node) else {
                return Err(Error::Structure("reset target has no parent".into()));
            };
            let clone = inner.dom.clone_subtree(node, true);
            inner.dom.replace_child(parent, clone, node)?;
            inner.listeners.clear_node(node);
            inner.record(MutationRecord::child_list(parent, vec![clone], vec![node]));
            clone
        };
        self.node.set(clone);
        Ok(self)
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.host.inner().listeners.count(self.node.get(), event)
    }

    /// Tracks touch-start/touch-move, classifies the dominant displacement
    /// axis into one of the four directions, and fires `f` at most once per
    /// touch-start-to-move sequence before re-arming on the next start.
    pub fn swipe<F>(&self, mut f: F) -> &Self
    where
        F: FnMut(&ElementHandle, SwipeDirection) + 'static,
    {
        let origin: Rc<Cell<Option<TouchPoint>>> = Rc::new(Cell::new(None));

        let start_origin = Rc::clone(&origin);
        let on_start = callback(move |_handle: &ElementHandle, event: &Event| {
            start_origin.set(event.touch());
        });

        let move_origin = Rc::clone(&origin);
        let on_move = callback(move |handle: &ElementHandle, event: &Event| {
            let Some(start) = move_origin.get() else {
                return;
            };
            let Some(point) = event.touch() else {
                return;
            };
            let dx = point.x - start.x;
            let dy = point.y - start.y;
            let direction = if dx.abs() > dy.abs() {
                if dx < 0.0 {
                    SwipeDirection::Left
                } else {
                    SwipeDirection::Right
                }
            } else if dy < 0.0 {
                SwipeDirection::Up
            } else {
                SwipeDirection::Down
            };
            move_origin.set(None);
            f(handle, direction);
        });

        self.on("touchstart", on_start).on("touchmove", on_move)
    }

    // ---- observation ----

    /// Establishes the single change subscription for this handle. A second
    /// call before [`ElementHandle::remove_observer`] replaces the first
    /// rather than stacking.
    pub fn observe(&self, options: ObserveOptions, callback: ObserverCallback) -> &Self {
        let mut inner = self.host.inner_mut();
        if let Some(previous) = self.observer.take() {
            inner.observers.disconnect(previous);
        }
        let id = inner.observers.register(self.node.get(), options, callback);
        self.observer.set(Some(id));
        self
    }

    /// [`ElementHandle::observe`] with empty options: the subscription
    /// exists but matches no record kind until replaced.
    pub fn observe_default(&self, callback: ObserverCallback) -> &Self {
        self.observe(ObserveOptions::default(), callback)
    }

    /// Cancels the active subscription; a no-op when none exists.
    pub fn remove_observer(&self) -> &Self {
        if let Some(id) = self.observer.take() {
            self.host.inner_mut().observers.disconnect(id);
        }
        self
    }

    // ---- presentation ----

    /// Raises opacity 0.1 per frame until 1. A node hidden with
    /// `display: none` is unhidden and restarted from 0.
    pub fn fade_in(&self) -> AnimationHandle {
        let label = { self.host.inner().dom.node_label(self.node.get()) };
        self.host.trace_line(format!("[frame] fade_in {label}"));
        anim::start_fade(&self.host, self.node.get(), FadeDirection::In)
    }

    /// Lowers opacity 0.1 per frame until 0, then finalizes
    /// `display: none`.
    pub fn fade_out(&self) -> AnimationHandle {
        let label = { self.host.inner().dom.node_label(self.node.get()) };
        self.host.trace_line(format!("[frame] fade_out {label}"));
        anim::start_fade(&self.host, self.node.get(), FadeDirection::Out)
    }

    /// Configures height/line-height transition styling and returns the
    /// expand/collapse pair toggling between the configured full height and
    /// the minimum height.
    pub fn collapsible(&self, options: CollapsibleOptions) -> Collapsible {
        self.css(&format!(
            "transition: height {0}ms ease, line-height {0}ms ease; overflow: hidden;",
            options.duration_ms
        ));
        Collapsible::new(self.clone(), options)
    }

    pub(crate) fn current_height(&self) -> f64 {
        let raw = self.host.inner().dom.style_get(self.node.get(), "height");
        raw.trim()
            .trim_end_matches("px")
            .trim()
            .parse::<f64>()
            .unwrap_or(0.0)
    }
}
