//! Batched mutation observation.
//!
//! Mutations are recorded into per-subscription queues as they happen and
//! delivered in batches when the host pumps [`crate::Host::deliver_mutations`].
//! A subscription watches one node, optionally with its whole subtree.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::dom::{Dom, NodeId};
use crate::handle::ElementHandle;

/// Shared observer callback, invoked with the observing handle and the
/// batch of records delivered for it.
pub type ObserverCallback = Rc<RefCell<dyn FnMut(&ElementHandle, &[MutationRecord])>>;

/// Wraps a closure as a shareable [`ObserverCallback`].
pub fn observer_callback<F>(f: F) -> ObserverCallback
where
    F: FnMut(&ElementHandle, &[MutationRecord]) + 'static,
{
    Rc::new(RefCell::new(f))
}

/// Which mutation kinds a subscription wants. The default observes nothing;
/// every field must be opted into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObserveOptions {
    pub child_list: bool,
    pub attributes: bool,
    pub character_data: bool,
    pub subtree: bool,
}

impl ObserveOptions {
    /// Everything on, subtree included.
    pub fn all() -> Self {
        Self {
            child_list: true,
            attributes: true,
            character_data: true,
            subtree: true,
        }
    }

    fn accepts(&self, kind: MutationKind) -> bool {
        match kind {
            MutationKind::ChildList => self.child_list,
            MutationKind::Attributes => self.attributes,
            MutationKind::CharacterData => self.character_data,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    ChildList,
    Attributes,
    CharacterData,
}

#[derive(Debug, Clone)]
pub struct MutationRecord {
    pub kind: MutationKind,
    pub target: NodeId,
    pub attribute_name: Option<String>,
    pub added: Vec<NodeId>,
    pub removed: Vec<NodeId>,
}

impl MutationRecord {
    pub(crate) fn attributes(target: NodeId, name: &str) -> Self {
        Self {
            kind: MutationKind::Attributes,
            target,
            attribute_name: Some(name.to_string()),
            added: Vec::new(),
            removed: Vec::new(),
        }
    }

    pub(crate) fn child_list(target: NodeId, added: Vec<NodeId>, removed: Vec<NodeId>) -> Self {
        Self {
            kind: MutationKind::ChildList,
            target,
            attribute_name: None,
            added,
            removed,
        }
    }

    pub(crate) fn character_data(target: NodeId) -> Self {
        Self {
            kind: MutationKind::CharacterData,
            target,
            attribute_name: None,
            added: Vec::new(),
            removed: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ObserverId(usize);

pub(crate) struct ObserverEntry {
    node: NodeId,
    options: ObserveOptions,
    callback: ObserverCallback,
    queue: Vec<MutationRecord>,
}

#[derive(Default)]
pub(crate) struct ObserverStore {
    entries: HashMap<usize, ObserverEntry>,
    order: Vec<usize>,
    next_id: usize,
}

impl ObserverStore {
    pub(crate) fn register(
        &mut self,
        node: NodeId,
        options: ObserveOptions,
        callback: ObserverCallback,
    ) -> ObserverId {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.insert(
            id,
            ObserverEntry {
                node,
                options,
                callback,
                queue: Vec::new(),
            },
        );
        self.order.push(id);
        ObserverId(id)
    }

    pub(crate) fn disconnect(&mut self, id: ObserverId) -> bool {
        let existed = self.entries.remove(&id.0).is_some();
        if existed {
            self.order.retain(|entry| *entry != id.0);
        }
        existed
    }

    /// Fans one record out to every subscription it matches.
    pub(crate) fn record(&mut self, dom: &Dom, record: &MutationRecord) {
        for id in &self.order {
            let Some(entry) = self.entries.get_mut(id) else {
                continue;
            };
            if !entry.options.accepts(record.kind) {
                continue;
            }
            let in_scope = record.target == entry.node
                || (entry.options.subtree && dom.is_descendant_of(record.target, entry.node));
            if in_scope {
                entry.queue.push(record.clone());
            }
        }
    }

    /// Drains every non-empty queue in registration order. Subscriptions
    /// stay registered.
    pub(crate) fn take_batches(&mut self) -> Vec<(NodeId, ObserverCallback, Vec<MutationRecord>)> {
        let mut batches = Vec::new();
        for id in &self.order {
            let Some(entry) = self.entries.get_mut(id) else {
                continue;
            };
            if entry.queue.is_empty() {
                continue;
            }
            batches.push((
                entry.node,
                Rc::clone(&entry.callback),
                std::mem::take(&mut entry.queue),
            ));
        }
        batches
    }

    pub(crate) fn queued(&self) -> usize {
        self.entries.values().map(|entry| entry.queue.len()).sum()
    }
}
