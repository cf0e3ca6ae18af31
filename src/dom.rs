//! Arena-backed document tree.
//!
//! Nodes live in a flat `Vec` and are addressed by copyable [`NodeId`]s, so
//! handles can refer to nodes without owning them. Detached subtrees stay in
//! the arena until the whole host is dropped; node lifetime is owned here,
//! never by a handle.

use std::collections::{HashMap, HashSet};

use crate::selector::{SelectorPart, matches_chain, parse_selector_groups};
use crate::{Error, Result};

/// Opaque identifier of one node in one host's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    Document,
    Fragment,
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct ElementData {
    pub(crate) tag_name: String,
    pub(crate) attrs: HashMap<String, String>,
    pub(crate) value: String,
    pub(crate) checked: bool,
    pub(crate) disabled: bool,
    pub(crate) readonly: bool,
    pub(crate) required: bool,
}

impl ElementData {
    pub(crate) fn new(tag_name: String, attrs: HashMap<String, String>) -> Self {
        let value = attrs.get("value").cloned().unwrap_or_default();
        let checked = attrs.contains_key("checked");
        let disabled = attrs.contains_key("disabled");
        let readonly = attrs.contains_key("readonly");
        let required = attrs.contains_key("required");
        Self {
            tag_name,
            attrs,
            value,
            checked,
            disabled,
            readonly,
            required,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) kind: NodeKind,
}

/// Outcome of a text-content write, so callers can report what changed.
pub(crate) enum TextEdit {
    InPlace { text_node: NodeId },
    Rebuilt { removed: Vec<NodeId>, added: Option<NodeId> },
}

pub(crate) struct HtmlEdit {
    pub(crate) removed: Vec<NodeId>,
    pub(crate) added: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub(crate) struct Dom {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
    pub(crate) id_index: HashMap<String, NodeId>,
}

impl Dom {
    pub(crate) fn new() -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            kind: NodeKind::Document,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            id_index: HashMap::new(),
        }
    }

    pub(crate) fn create_node(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            kind,
        });
        if let Some(parent_id) = parent {
            self.nodes[parent_id.0].children.push(id);
        }
        id
    }

    pub(crate) fn create_element(
        &mut self,
        parent: NodeId,
        tag_name: String,
        attrs: HashMap<String, String>,
    ) -> NodeId {
        let id = self.create_node(Some(parent), NodeKind::Element(ElementData::new(tag_name, attrs)));
        if let Some(id_attr) = self
            .element(id)
            .and_then(|element| element.attrs.get("id").cloned())
        {
            if !id_attr.is_empty() {
                self.id_index.insert(id_attr, id);
            }
        }
        id
    }

    pub(crate) fn create_detached_element(&mut self, tag_name: &str) -> NodeId {
        self.create_node(
            None,
            NodeKind::Element(ElementData::new(tag_name.to_string(), HashMap::new())),
        )
    }

    pub(crate) fn create_fragment(&mut self) -> NodeId {
        self.create_node(None, NodeKind::Fragment)
    }

    pub(crate) fn create_text(&mut self, parent: NodeId, text: String) -> NodeId {
        self.create_node(Some(parent), NodeKind::Text(text))
    }

    pub(crate) fn element(&self, node_id: NodeId) -> Option<&ElementData> {
        match &self.nodes[node_id.0].kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self, node_id: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes[node_id.0].kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn tag_name(&self, node_id: NodeId) -> Option<&str> {
        self.element(node_id).map(|e| e.tag_name.as_str())
    }

    pub(crate) fn is_text(&self, node_id: NodeId) -> bool {
        matches!(self.nodes[node_id.0].kind, NodeKind::Text(_))
    }

    pub(crate) fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.nodes[node_id.0].parent
    }

    pub(crate) fn child_nodes(&self, node_id: NodeId) -> Vec<NodeId> {
        self.nodes[node_id.0].children.clone()
    }

    pub(crate) fn element_children(&self, node_id: NodeId) -> Vec<NodeId> {
        self.nodes[node_id.0]
            .children
            .iter()
            .copied()
            .filter(|child| self.element(*child).is_some())
            .collect()
    }

    pub(crate) fn first_child(&self, node_id: NodeId) -> Option<NodeId> {
        self.nodes[node_id.0].children.first().copied()
    }

    pub(crate) fn by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    pub(crate) fn is_descendant_of(&self, node_id: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = self.parent(node_id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    pub(crate) fn is_connected(&self, node_id: NodeId) -> bool {
        let mut cursor = Some(node_id);
        while let Some(node) = cursor {
            if node == self.root {
                return true;
            }
            cursor = self.parent(node);
        }
        false
    }

    pub(crate) fn can_have_children(&self, node_id: NodeId) -> bool {
        matches!(
            self.nodes.get(node_id.0).map(|n| &n.kind),
            Some(NodeKind::Document | NodeKind::Fragment | NodeKind::Element(_))
        )
    }

    pub(crate) fn is_valid_node(&self, node_id: NodeId) -> bool {
        node_id.0 < self.nodes.len()
    }

    // ---- content ----

    pub(crate) fn text_content(&self, node_id: NodeId) -> String {
        match &self.nodes[node_id.0].kind {
            NodeKind::Document | NodeKind::Fragment | NodeKind::Element(_) => {
                let mut out = String::new();
                for child in &self.nodes[node_id.0].children {
                    out.push_str(&self.text_content(*child));
                }
                out
            }
            NodeKind::Text(text) => text.clone(),
        }
    }

    /// Rewrites text content. A sole existing text child is edited in place;
    /// anything else drops the children and grows a fresh text node.
    pub(crate) fn set_text_content(&mut self, node_id: NodeId, value: &str) -> Option<TextEdit> {
        if !self.can_have_children(node_id) {
            return None;
        }

        if !value.is_empty() && self.nodes[node_id.0].children.len() == 1 {
            let child = self.nodes[node_id.0].children[0];
            if let NodeKind::Text(text) = &mut self.nodes[child.0].kind {
                *text = value.to_string();
                return Some(TextEdit::InPlace { text_node: child });
            }
        }

        let removed = std::mem::take(&mut self.nodes[node_id.0].children);
        for child in &removed {
            self.nodes[child.0].parent = None;
        }
        let added = if value.is_empty() {
            None
        } else {
            Some(self.create_text(node_id, value.to_string()))
        };
        self.rebuild_id_index();
        Some(TextEdit::Rebuilt { removed, added })
    }

    pub(crate) fn inner_html(&self, node_id: NodeId) -> String {
        let mut out = String::new();
        for child in &self.nodes[node_id.0].children {
            out.push_str(&self.serialize(*child));
        }
        out
    }

    pub(crate) fn set_inner_html(&mut self, node_id: NodeId, html: &str) -> Result<HtmlEdit> {
        if !self.can_have_children(node_id) {
            return Err(Error::Structure(
                "markup target cannot have children".into(),
            ));
        }

        let fragment = crate::html::parse_document(html)?;

        let removed = std::mem::take(&mut self.nodes[node_id.0].children);
        for child in &removed {
            self.nodes[child.0].parent = None;
        }

        let mut added = Vec::new();
        let children = fragment.nodes[fragment.root.0].children.clone();
        for child in children {
            added.push(self.adopt_subtree(&fragment, child, Some(node_id))?);
        }

        self.rebuild_id_index();
        Ok(HtmlEdit { removed, added })
    }

    pub(crate) fn adopt_subtree(
        &mut self,
        source: &Dom,
        source_node: NodeId,
        parent: Option<NodeId>,
    ) -> Result<NodeId> {
        let kind = match &source.nodes[source_node.0].kind {
            NodeKind::Document => {
                return Err(Error::Structure(
                    "cannot adopt a document node as a child".into(),
                ));
            }
            NodeKind::Fragment => NodeKind::Fragment,
            NodeKind::Element(element) => NodeKind::Element(element.clone()),
            NodeKind::Text(text) => NodeKind::Text(text.clone()),
        };

        let node = self.create_node(parent, kind);
        for child in &source.nodes[source_node.0].children {
            let _ = self.adopt_subtree(source, *child, Some(node))?;
        }
        Ok(node)
    }

    /// Disconnected duplicate of `node` within this arena. Document roots
    /// duplicate as fragments so the copy is always attachable.
    pub(crate) fn clone_subtree(&mut self, node_id: NodeId, deep: bool) -> NodeId {
        let kind = match &self.nodes[node_id.0].kind {
            NodeKind::Document | NodeKind::Fragment => NodeKind::Fragment,
            NodeKind::Element(element) => NodeKind::Element(element.clone()),
            NodeKind::Text(text) => NodeKind::Text(text.clone()),
        };
        let copy = self.create_node(None, kind);
        if deep {
            let children = self.nodes[node_id.0].children.clone();
            for child in children {
                let child_copy = self.clone_subtree(child, true);
                self.nodes[child_copy.0].parent = Some(copy);
                self.nodes[copy.0].children.push(child_copy);
            }
        }
        copy
    }

    // ---- form state ----

    pub(crate) fn value(&self, node_id: NodeId) -> String {
        self.element(node_id)
            .map(|e| e.value.clone())
            .unwrap_or_default()
    }

    pub(crate) fn set_value(&mut self, node_id: NodeId, value: &str) -> bool {
        match self.element_mut(node_id) {
            Some(element) => {
                element.value = value.to_string();
                true
            }
            None => false,
        }
    }

    pub(crate) fn checked(&self, node_id: NodeId) -> bool {
        self.element(node_id).map(|e| e.checked).unwrap_or(false)
    }

    pub(crate) fn disabled(&self, node_id: NodeId) -> bool {
        self.element(node_id).map(|e| e.disabled).unwrap_or(false)
    }

    pub(crate) fn readonly(&self, node_id: NodeId) -> bool {
        self.element(node_id).map(|e| e.readonly).unwrap_or(false)
    }

    pub(crate) fn required(&self, node_id: NodeId) -> bool {
        self.element(node_id).map(|e| e.required).unwrap_or(false)
    }

    // ---- attributes ----

    pub(crate) fn attr(&self, node_id: NodeId, name: &str) -> Option<String> {
        let lowered = name.to_ascii_lowercase();
        self.element(node_id)
            .and_then(|e| e.attrs.get(&lowered).cloned())
    }

    pub(crate) fn has_attr(&self, node_id: NodeId, name: &str) -> bool {
        let lowered = name.to_ascii_lowercase();
        self.element(node_id)
            .map(|e| e.attrs.contains_key(&lowered))
            .unwrap_or(false)
    }

    pub(crate) fn set_attr(&mut self, node_id: NodeId, name: &str, value: &str) -> bool {
        let lowered = name.to_ascii_lowercase();
        let old_id = if lowered == "id" {
            self.element(node_id)
                .and_then(|element| element.attrs.get("id").cloned())
        } else {
            None
        };
        let connected = self.is_connected(node_id);

        let Some(element) = self.element_mut(node_id) else {
            return false;
        };
        element.attrs.insert(lowered.clone(), value.to_string());
        match lowered.as_str() {
            "value" => element.value = value.to_string(),
            "checked" => element.checked = true,
            "disabled" => element.disabled = true,
            "readonly" => element.readonly = true,
            "required" => element.required = true,
            _ => {}
        }

        if lowered == "id" && connected {
            if let Some(old) = old_id {
                self.id_index.remove(&old);
            }
            if !value.is_empty() {
                self.id_index.insert(value.to_string(), node_id);
            }
        }
        true
    }

    pub(crate) fn remove_attr(&mut self, node_id: NodeId, name: &str) -> bool {
        let lowered = name.to_ascii_lowercase();
        let old_id = if lowered == "id" {
            self.element(node_id)
                .and_then(|element| element.attrs.get("id").cloned())
        } else {
            None
        };
        let connected = self.is_connected(node_id);

        let Some(element) = self.element_mut(node_id) else {
            return false;
        };
        let existed = element.attrs.remove(&lowered).is_some();
        match lowered.as_str() {
            "value" => element.value.clear(),
            "checked" => element.checked = false,
            "disabled" => element.disabled = false,
            "readonly" => element.readonly = false,
            "required" => element.required = false,
            _ => {}
        }

        if existed && lowered == "id" && connected {
            if let Some(old) = old_id {
                self.id_index.remove(&old);
            }
        }
        existed
    }

    // ---- classes ----

    pub(crate) fn class_contains(&self, node_id: NodeId, class_name: &str) -> bool {
        self.element(node_id)
            .map(|element| has_class(element, class_name))
            .unwrap_or(false)
    }

    pub(crate) fn class_add(&mut self, node_id: NodeId, class_name: &str) -> bool {
        let Some(element) = self.element_mut(node_id) else {
            return false;
        };
        let mut classes = class_tokens(element.attrs.get("class").map(String::as_str));
        if classes.iter().any(|name| name == class_name) {
            return false;
        }
        classes.push(class_name.to_string());
        set_class_attr(element, &classes);
        true
    }

    pub(crate) fn class_remove(&mut self, node_id: NodeId, class_name: &str) -> bool {
        let Some(element) = self.element_mut(node_id) else {
            return false;
        };
        let mut classes = class_tokens(element.attrs.get("class").map(String::as_str));
        let before = classes.len();
        classes.retain(|name| name != class_name);
        if classes.len() == before {
            return false;
        }
        set_class_attr(element, &classes);
        true
    }

    pub(crate) fn class_toggle(&mut self, node_id: NodeId, class_name: &str) -> Option<bool> {
        if self.element(node_id).is_none() {
            return None;
        }
        if self.class_contains(node_id, class_name) {
            self.class_remove(node_id, class_name);
            Some(false)
        } else {
            self.class_add(node_id, class_name);
            Some(true)
        }
    }

    pub(crate) fn class_list(&self, node_id: NodeId) -> Vec<String> {
        self.element(node_id)
            .map(|element| class_tokens(element.attrs.get("class").map(String::as_str)))
            .unwrap_or_default()
    }

    // ---- inline style ----

    pub(crate) fn style_get(&self, node_id: NodeId, key: &str) -> String {
        let Some(element) = self.element(node_id) else {
            return String::new();
        };
        let name = css_property_name(key);
        let decls = parse_style_declarations(element.attrs.get("style").map(String::as_str));
        decls
            .iter()
            .find(|(prop, _)| prop == &name)
            .map(|(_, value)| value.clone())
            .unwrap_or_default()
    }

    pub(crate) fn style_set(&mut self, node_id: NodeId, key: &str, value: &str) -> bool {
        let name = css_property_name(key);
        let Some(element) = self.element_mut(node_id) else {
            return false;
        };

        let mut decls = parse_style_declarations(element.attrs.get("style").map(String::as_str));
        if let Some(pos) = decls.iter().position(|(prop, _)| prop == &name) {
            if value.is_empty() {
                decls.remove(pos);
            } else {
                decls[pos].1 = value.to_string();
            }
        } else if !value.is_empty() {
            decls.push((name, value.to_string()));
        }

        if decls.is_empty() {
            element.attrs.remove("style");
        } else {
            element
                .attrs
                .insert("style".to_string(), serialize_style_declarations(&decls));
        }
        true
    }

    // ---- structural mutation ----

    /// Appends `child` as the last child of `parent`. Returns the child's
    /// previous parent when the append was a move.
    pub(crate) fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<Option<NodeId>> {
        if !self.can_have_children(parent) {
            return Err(Error::Structure(
                "append target cannot have children".into(),
            ));
        }
        if child == self.root || child == parent {
            return Err(Error::Structure("invalid append node".into()));
        }
        if !self.is_valid_node(child) {
            return Err(Error::Structure("append node is invalid".into()));
        }

        let mut cursor = Some(parent);
        while let Some(node) = cursor {
            if node == child {
                return Err(Error::Structure("append would create a cycle".into()));
            }
            cursor = self.parent(node);
        }

        let old_parent = self.parent(child);
        if let Some(old) = old_parent {
            self.nodes[old.0].children.retain(|id| *id != child);
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        self.rebuild_id_index();
        Ok(old_parent)
    }

    /// Substitutes `new` for `old` among `parent`'s children, in `old`'s
    /// slot. `old` must be a direct child. Returns `new`'s previous parent
    /// when the replacement was a move.
    pub(crate) fn replace_child(
        &mut self,
        parent: NodeId,
        new: NodeId,
        old: NodeId,
    ) -> Result<Option<NodeId>> {
        if !self.can_have_children(parent) {
            return Err(Error::Structure(
                "replace target cannot have children".into(),
            ));
        }
        if new == self.root || new == parent {
            return Err(Error::Structure("invalid replacement node".into()));
        }
        if !self.is_valid_node(new) || !self.is_valid_node(old) {
            return Err(Error::Structure("replacement node is invalid".into()));
        }
        if self.parent(old) != Some(parent) {
            return Err(Error::Structure(
                "replace target is not a direct child".into(),
            ));
        }
        if new == old {
            return Ok(None);
        }

        let mut cursor = Some(parent);
        while let Some(node) = cursor {
            if node == new {
                return Err(Error::Structure("replace would create a cycle".into()));
            }
            cursor = self.parent(node);
        }

        let old_parent = self.parent(new);
        if let Some(op) = old_parent {
            self.nodes[op.0].children.retain(|id| *id != new);
        }

        let Some(index) = self.nodes[parent.0]
            .children
            .iter()
            .position(|id| *id == old)
        else {
            return Err(Error::Structure("replace target is missing".into()));
        };

        self.nodes[old.0].parent = None;
        self.nodes[new.0].parent = Some(parent);
        self.nodes[parent.0].children[index] = new;
        self.rebuild_id_index();
        Ok(old_parent)
    }

    pub(crate) fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if self.parent(child) != Some(parent) {
            return Err(Error::Structure(
                "remove target is not a direct child".into(),
            ));
        }
        self.nodes[parent.0].children.retain(|id| *id != child);
        self.nodes[child.0].parent = None;
        self.rebuild_id_index();
        Ok(())
    }

    /// Detaches and returns the first child, if any.
    pub(crate) fn remove_first_child(&mut self, node: NodeId) -> Option<NodeId> {
        let first = self.first_child(node)?;
        self.nodes[node.0].children.remove(0);
        self.nodes[first.0].parent = None;
        self.rebuild_id_index();
        Some(first)
    }

    /// Detaches `node` from its parent; an already-detached node is an error
    /// the caller sees as-is. Returns the former parent.
    pub(crate) fn remove_node(&mut self, node: NodeId) -> Result<NodeId> {
        if node == self.root {
            return Err(Error::Structure("cannot remove the document root".into()));
        }
        let Some(parent) = self.parent(node) else {
            return Err(Error::Structure("remove target is already detached".into()));
        };
        self.remove_child(parent, node)?;
        Ok(parent)
    }

    // ---- query ----

    pub(crate) fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        let all = self.query_selector_all(selector)?;
        Ok(all.into_iter().next())
    }

    pub(crate) fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let groups = parse_selector_groups(selector)?;

        if groups.len() == 1 && groups[0].len() == 1 {
            if let Some(id) = groups[0][0].step.id_only() {
                return Ok(self.by_id(id).into_iter().collect());
            }
        }

        let mut ids = Vec::new();
        self.collect_elements_dfs(self.root, &mut ids);

        let mut seen = HashSet::new();
        let mut matched = Vec::new();
        for candidate in ids {
            if groups
                .iter()
                .any(|steps: &Vec<SelectorPart>| matches_chain(self, candidate, steps))
                && seen.insert(candidate)
            {
                matched.push(candidate);
            }
        }
        Ok(matched)
    }

    pub(crate) fn collect_elements_dfs(&self, node_id: NodeId, out: &mut Vec<NodeId>) {
        if matches!(self.nodes[node_id.0].kind, NodeKind::Element(_)) {
            out.push(node_id);
        }
        for child in &self.nodes[node_id.0].children {
            self.collect_elements_dfs(*child, out);
        }
    }

    pub(crate) fn previous_element_sibling(&self, node_id: NodeId) -> Option<NodeId> {
        let parent = self.parent(node_id)?;
        let children = &self.nodes[parent.0].children;
        let pos = children.iter().position(|id| *id == node_id)?;
        for sibling in children[..pos].iter().rev() {
            if self.element(*sibling).is_some() {
                return Some(*sibling);
            }
        }
        None
    }

    pub(crate) fn rebuild_id_index(&mut self) {
        let mut next = HashMap::new();
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            if let NodeKind::Element(element) = &self.nodes[node.0].kind {
                if let Some(id) = element.attrs.get("id") {
                    if !id.is_empty() {
                        next.insert(id.clone(), node);
                    }
                }
            }
            for child in self.nodes[node.0].children.iter().rev() {
                stack.push(*child);
            }
        }
        self.id_index = next;
    }

    // ---- serialization ----

    pub(crate) fn serialize(&self, node_id: NodeId) -> String {
        match &self.nodes[node_id.0].kind {
            NodeKind::Document | NodeKind::Fragment => {
                let mut out = String::new();
                for child in &self.nodes[node_id.0].children {
                    out.push_str(&self.serialize(*child));
                }
                out
            }
            NodeKind::Text(text) => text.clone(),
            NodeKind::Element(element) => {
                let mut out = String::new();
                out.push('<');
                out.push_str(&element.tag_name);
                let mut attrs: Vec<(&String, &String)> = element.attrs.iter().collect();
                attrs.sort_by(|a, b| a.0.cmp(b.0));
                for (k, v) in attrs {
                    out.push(' ');
                    out.push_str(k);
                    out.push_str("=\"");
                    out.push_str(v);
                    out.push('"');
                }
                out.push('>');
                for child in &self.nodes[node_id.0].children {
                    out.push_str(&self.serialize(*child));
                }
                out.push_str("</");
                out.push_str(&element.tag_name);
                out.push('>');
                out
            }
        }
    }

    pub(crate) fn node_label(&self, node_id: NodeId) -> String {
        match &self.nodes[node_id.0].kind {
            NodeKind::Document => "#document".into(),
            NodeKind::Fragment => "#fragment".into(),
            NodeKind::Text(_) => "#text".into(),
            NodeKind::Element(element) => match element.attrs.get("id") {
                Some(id) if !id.is_empty() => format!("{}#{}", element.tag_name, id),
                _ => element.tag_name.clone(),
            },
        }
    }
}

pub(crate) fn has_class(element: &ElementData, class_name: &str) -> bool {
    element
        .attrs
        .get("class")
        .map(|classes| classes.split_whitespace().any(|c| c == class_name))
        .unwrap_or(false)
}

pub(crate) fn class_tokens(class_attr: Option<&str>) -> Vec<String> {
    class_attr
        .map(|value| {
            value
                .split_whitespace()
                .filter(|token| !token.is_empty())
                .map(ToOwned::to_owned)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default()
}

fn set_class_attr(element: &mut ElementData, classes: &[String]) {
    if classes.is_empty() {
        element.attrs.remove("class");
    } else {
        element.attrs.insert("class".to_string(), classes.join(" "));
    }
}

/// Normalizes a camel-cased property spelling to its hyphenated form.
/// Already-hyphenated names pass through unchanged.
pub(crate) fn css_property_name(prop: &str) -> String {
    let mut out = String::new();
    for ch in prop.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

pub(crate) fn parse_style_declarations(style_attr: Option<&str>) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let Some(style_attr) = style_attr else {
        return out;
    };

    for decl in style_attr.split(';') {
        let decl = decl.trim();
        if decl.is_empty() {
            continue;
        }
        let Some((name, value)) = decl.split_once(':') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        if name.is_empty() {
            continue;
        }
        let value = value.trim().to_string();
        if let Some(pos) = out.iter().position(|(existing, _)| existing == &name) {
            out[pos].1 = value;
        } else {
            out.push((name, value));
        }
    }

    out
}

pub(crate) fn serialize_style_declarations(decls: &[(String, String)]) -> String {
    let mut out = String::new();
    for (idx, (name, value)) in decls.iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        out.push_str(name);
        out.push_str(": ");
        out.push_str(value);
        out.push(';');
    }
    out
}

pub(crate) fn format_float(value: f64) -> String {
    let mut out = format!("{:.16}", value);
    while out.contains('.') && out.ends_with('0') {
        out.pop();
    }
    if out.ends_with('.') {
        out.pop();
    }
    out
}
