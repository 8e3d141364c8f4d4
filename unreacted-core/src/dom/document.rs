//! Live Document
//!
//! An in-memory, DOM-shaped presentation tree. This is the "live tree" the
//! reconciler mutates: element and text nodes, attributes, inline style,
//! live boolean properties (`disabled`, `checked`, ...), form values and
//! event listeners.
//!
//! # Implementation
//!
//! Nodes live in an arena owned by the document and are addressed by
//! [`NodeId`]. A detached subtree stays allocated until it is released with
//! [`Document::free_subtree`], which recycles its slots. Every id carries the
//! generation of its slot, so a stale id never aliases the node that later
//! reuses the slot: it fails with [`DomError::UnknownNode`] instead.
//!
//! The arena sits behind `Rc<RefCell<..>>`: a [`Document`] is a cheap handle
//! that can be cloned into event listeners. No borrow is held while a
//! listener runs, which is what allows a click handler to set state and
//! synchronously re-render into the same document.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::trace;

use super::event::{Event, Handler};
use super::snapshot::Snapshot;
use crate::error::DomError;

/// Identifier of a node inside one [`Document`]: an arena index plus the
/// generation of that slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl NodeId {
    /// Build a first-generation id from its raw index.
    pub fn from_raw(raw: usize) -> Self {
        Self {
            index: raw,
            generation: 0,
        }
    }

    /// Get the raw index.
    pub fn raw(&self) -> usize {
        self.index
    }

    /// How many times the slot was recycled before this id was handed out.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generation == 0 {
            write!(f, "#{}", self.index)
        } else {
            write!(f, "#{}v{}", self.index, self.generation)
        }
    }
}

/// Live boolean properties an element of the given tag exposes.
fn boolean_properties(tag: &str) -> &'static [&'static str] {
    match tag {
        "input" => &[
            "hidden",
            "disabled",
            "checked",
            "readOnly",
            "required",
            "multiple",
            "autofocus",
        ],
        "button" => &["hidden", "disabled", "autofocus"],
        "select" => &["hidden", "disabled", "required", "multiple", "autofocus"],
        "textarea" => &["hidden", "disabled", "readOnly", "required", "autofocus"],
        "option" => &["hidden", "disabled", "selected"],
        "fieldset" | "optgroup" => &["hidden", "disabled"],
        "details" | "dialog" => &["hidden", "open"],
        _ => &["hidden"],
    }
}

fn is_form_tag(tag: &str) -> bool {
    matches!(tag, "input" | "textarea" | "select")
}

/// `marginLeft` -> `margin-left`. Custom properties (`--x`) are kept as-is.
fn css_property_name(name: &str) -> String {
    if name.starts_with("--") {
        return name.to_string();
    }
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

struct Listener {
    event: String,
    handler: Handler,
}

struct ElementData {
    tag: String,
    attributes: IndexMap<String, String>,
    style: IndexMap<String, String>,
    booleans: IndexMap<&'static str, bool>,
    value: Option<String>,
    listeners: SmallVec<[Listener; 2]>,
}

enum NodeKind {
    Element(ElementData),
    Text(String),
}

struct NodeEntry {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

struct Slot {
    generation: u32,
    /// `None` once the node was freed; the index is then on the free list.
    entry: Option<NodeEntry>,
}

#[derive(Default)]
struct Arena {
    slots: Vec<Slot>,
    free: Vec<usize>,
    mutations: u64,
}

impl Arena {
    fn push(&mut self, kind: NodeKind) -> NodeId {
        let entry = NodeEntry {
            parent: None,
            children: Vec::new(),
            kind,
        };
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.entry = Some(entry);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len();
        self.slots.push(Slot {
            generation: 0,
            entry: Some(entry),
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    fn entry(&self, id: NodeId) -> Result<&NodeEntry, DomError> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_ref())
            .ok_or(DomError::UnknownNode(id))
    }

    fn entry_mut(&mut self, id: NodeId) -> Result<&mut NodeEntry, DomError> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_mut())
            .ok_or(DomError::UnknownNode(id))
    }

    /// Take `root` and all its descendants out of the arena, bumping the
    /// generation of every slot and putting it on the free list.
    ///
    /// The entries are handed back so the caller can drop them (and the
    /// listeners they own) after releasing its borrow.
    fn release(&mut self, root: NodeId) -> Result<Vec<NodeEntry>, DomError> {
        self.entry(root)?;
        let mut released = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(slot) = self
                .slots
                .get_mut(id.index)
                .filter(|slot| slot.generation == id.generation)
            else {
                continue;
            };
            let Some(entry) = slot.entry.take() else {
                continue;
            };
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(id.index);
            stack.extend(entry.children.iter().copied());
            released.push(entry);
        }
        Ok(released)
    }

    fn element(&self, id: NodeId) -> Result<&ElementData, DomError> {
        match &self.entry(id)?.kind {
            NodeKind::Element(element) => Ok(element),
            NodeKind::Text(_) => Err(DomError::NotAnElement(id)),
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData, DomError> {
        match &mut self.entry_mut(id)?.kind {
            NodeKind::Element(element) => Ok(element),
            NodeKind::Text(_) => Err(DomError::NotAnElement(id)),
        }
    }

    /// True if `ancestor` is `node` or one of its ancestors.
    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> Result<bool, DomError> {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return Ok(true);
            }
            current = self.entry(id)?.parent;
        }
        Ok(false)
    }

    /// Check that `child` may be inserted under `parent`.
    fn check_insert(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.element(parent)?;
        self.entry(child)?;
        if self.is_inclusive_ancestor(child, parent)? {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        Ok(())
    }

    /// Unlink a node from its current parent, if any.
    fn detach(&mut self, child: NodeId) -> Result<(), DomError> {
        if let Some(parent) = self.entry(child)?.parent {
            self.entry_mut(parent)?.children.retain(|c| *c != child);
            self.entry_mut(child)?.parent = None;
        }
        Ok(())
    }

    fn text_content(&self, id: NodeId, out: &mut String) -> Result<(), DomError> {
        let entry = self.entry(id)?;
        match &entry.kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element(_) => {
                for child in &entry.children {
                    self.text_content(*child, out)?;
                }
            }
        }
        Ok(())
    }

    fn snapshot(&self, id: NodeId) -> Result<Snapshot, DomError> {
        let entry = self.entry(id)?;
        match &entry.kind {
            NodeKind::Text(text) => Ok(Snapshot::Text { text: text.clone() }),
            NodeKind::Element(element) => Ok(Snapshot::Element {
                tag: element.tag.clone(),
                attributes: element.attributes.clone(),
                style: element.style.clone(),
                children: entry
                    .children
                    .iter()
                    .map(|child| self.snapshot(*child))
                    .collect::<Result<_, _>>()?,
            }),
        }
    }
}

/// Handle to an in-memory live tree.
///
/// Cloning the handle shares the underlying tree.
#[derive(Clone, Default)]
pub struct Document {
    inner: Rc<RefCell<Arena>>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of writes applied to attached or detached nodes so far.
    ///
    /// Every structural change, attribute, style, property, value or
    /// listener write bumps the counter. Reads, node creation and freeing
    /// do not.
    pub fn mutation_count(&self) -> u64 {
        self.inner.borrow().mutations
    }

    /// Number of allocated nodes, attached or not. Freed nodes are not
    /// counted.
    pub fn node_count(&self) -> usize {
        self.inner.borrow().live()
    }

    // ------------------------------------------------------------------
    // Node creation and structure
    // ------------------------------------------------------------------

    /// Create a detached element. The tag is lower-cased.
    pub fn create_element(&self, tag: &str) -> NodeId {
        let tag = tag.to_ascii_lowercase();
        let booleans = boolean_properties(&tag)
            .iter()
            .map(|name| (*name, false))
            .collect();
        let value = is_form_tag(&tag).then(String::new);
        self.inner.borrow_mut().push(NodeKind::Element(ElementData {
            tag,
            attributes: IndexMap::new(),
            style: IndexMap::new(),
            booleans,
            value,
            listeners: SmallVec::new(),
        }))
    }

    /// Create a detached text node.
    pub fn create_text(&self, text: &str) -> NodeId {
        self.inner
            .borrow_mut()
            .push(NodeKind::Text(text.to_string()))
    }

    /// Append `child` as the last child of `parent`, moving it if it is
    /// already attached elsewhere.
    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let mut arena = self.inner.borrow_mut();
        arena.check_insert(parent, child)?;
        arena.detach(child)?;
        arena.entry_mut(parent)?.children.push(child);
        arena.entry_mut(child)?.parent = Some(parent);
        arena.mutations += 1;
        trace!(%parent, %child, "append child");
        Ok(())
    }

    /// Remove `child` from `parent`.
    pub fn remove_child(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let mut arena = self.inner.borrow_mut();
        let children = &mut arena.entry_mut(parent)?.children;
        let position = children
            .iter()
            .position(|c| *c == child)
            .ok_or(DomError::NotAChild { parent, child })?;
        children.remove(position);
        arena.entry_mut(child)?.parent = None;
        arena.mutations += 1;
        trace!(%parent, %child, "remove child");
        Ok(())
    }

    /// Put `new_child` where `old_child` is, detaching `old_child`.
    pub fn replace_child(
        &self,
        parent: NodeId,
        new_child: NodeId,
        old_child: NodeId,
    ) -> Result<(), DomError> {
        let mut arena = self.inner.borrow_mut();
        if !arena.entry(parent)?.children.contains(&old_child) {
            return Err(DomError::NotAChild {
                parent,
                child: old_child,
            });
        }
        if new_child == old_child {
            return Ok(());
        }
        arena.check_insert(parent, new_child)?;
        arena.detach(new_child)?;

        let children = &mut arena.entry_mut(parent)?.children;
        let position = children
            .iter()
            .position(|c| *c == old_child)
            .ok_or(DomError::NotAChild {
                parent,
                child: old_child,
            })?;
        children[position] = new_child;
        arena.entry_mut(old_child)?.parent = None;
        arena.entry_mut(new_child)?.parent = Some(parent);
        arena.mutations += 1;
        trace!(%parent, %new_child, %old_child, "replace child");
        Ok(())
    }

    /// Free a detached node and all its descendants, returning how many
    /// nodes were released.
    ///
    /// Their slots are recycled by later `create_*` calls; every id into the
    /// freed subtree fails with [`DomError::UnknownNode`] from then on. The
    /// node must not have a parent.
    pub fn free_subtree(&self, node: NodeId) -> Result<usize, DomError> {
        let released = {
            let mut arena = self.inner.borrow_mut();
            if let Some(parent) = arena.entry(node)?.parent {
                return Err(DomError::StillAttached { node, parent });
            }
            arena.release(node)?
        };
        let freed = released.len();
        // Listener closures are dropped here, with the arena unborrowed.
        drop(released);
        trace!(%node, freed, "free subtree");
        Ok(freed)
    }

    /// Detach every child of `parent`. The children stay allocated.
    pub fn clear_children(&self, parent: NodeId) -> Result<(), DomError> {
        let mut arena = self.inner.borrow_mut();
        let children = std::mem::take(&mut arena.entry_mut(parent)?.children);
        if children.is_empty() {
            return Ok(());
        }
        for child in children {
            arena.entry_mut(child)?.parent = None;
        }
        arena.mutations += 1;
        Ok(())
    }

    /// The child at `index`, if there is one.
    pub fn child_at(&self, parent: NodeId, index: usize) -> Result<Option<NodeId>, DomError> {
        Ok(self.inner.borrow().entry(parent)?.children.get(index).copied())
    }

    /// Number of children of `parent`.
    pub fn child_count(&self, parent: NodeId) -> Result<usize, DomError> {
        Ok(self.inner.borrow().entry(parent)?.children.len())
    }

    /// Children of `parent`, in order. The list is a copy taken now.
    pub fn children(&self, parent: NodeId) -> Result<Vec<NodeId>, DomError> {
        Ok(self.inner.borrow().entry(parent)?.children.clone())
    }

    /// Parent of `node`, `None` while it is detached.
    pub fn parent(&self, node: NodeId) -> Result<Option<NodeId>, DomError> {
        Ok(self.inner.borrow().entry(node)?.parent)
    }

    /// Tag name of an element.
    pub fn tag(&self, node: NodeId) -> Result<String, DomError> {
        Ok(self.inner.borrow().element(node)?.tag.clone())
    }

    /// Data of a text node, `None` for elements.
    pub fn text(&self, node: NodeId) -> Result<Option<String>, DomError> {
        match &self.inner.borrow().entry(node)?.kind {
            NodeKind::Text(text) => Ok(Some(text.clone())),
            NodeKind::Element(_) => Ok(None),
        }
    }

    /// Concatenated text of the node and all its descendants.
    pub fn text_content(&self, node: NodeId) -> Result<String, DomError> {
        let mut out = String::new();
        self.inner.borrow().text_content(node, &mut out)?;
        Ok(out)
    }

    // ------------------------------------------------------------------
    // Attributes and inline style
    // ------------------------------------------------------------------

    /// Attribute names are ASCII case-insensitive, as in HTML documents.
    pub fn attribute(&self, node: NodeId, name: &str) -> Result<Option<String>, DomError> {
        let name = name.to_ascii_lowercase();
        Ok(self.inner.borrow().element(node)?.attributes.get(&name).cloned())
    }

    /// Whether the element carries the attribute, even with an empty value.
    pub fn has_attribute(&self, node: NodeId, name: &str) -> Result<bool, DomError> {
        Ok(self.attribute(node, name)?.is_some())
    }

    /// Set an attribute. The name is stored lower-cased.
    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let mut arena = self.inner.borrow_mut();
        arena
            .element_mut(node)?
            .attributes
            .insert(name.to_ascii_lowercase(), value.to_string());
        arena.mutations += 1;
        trace!(%node, name, value, "set attribute");
        Ok(())
    }

    /// Remove an attribute. Removing an absent attribute is not a mutation.
    pub fn remove_attribute(&self, node: NodeId, name: &str) -> Result<(), DomError> {
        let mut arena = self.inner.borrow_mut();
        let removed = arena
            .element_mut(node)?
            .attributes
            .shift_remove(&name.to_ascii_lowercase())
            .is_some();
        if removed {
            arena.mutations += 1;
            trace!(%node, name, "remove attribute");
        }
        Ok(())
    }

    /// Inline style property. Accepts camelCase or kebab-case names.
    pub fn style_property(&self, node: NodeId, name: &str) -> Result<Option<String>, DomError> {
        Ok(self
            .inner
            .borrow()
            .element(node)?
            .style
            .get(&css_property_name(name))
            .cloned())
    }

    /// Set an inline style property, normalizing the name to kebab-case.
    pub fn set_style_property(&self, node: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let mut arena = self.inner.borrow_mut();
        arena
            .element_mut(node)?
            .style
            .insert(css_property_name(name), value.to_string());
        arena.mutations += 1;
        Ok(())
    }

    /// Drop all inline style.
    pub fn clear_style(&self, node: NodeId) -> Result<(), DomError> {
        let mut arena = self.inner.borrow_mut();
        let style = &mut arena.element_mut(node)?.style;
        if !style.is_empty() {
            style.clear();
            arena.mutations += 1;
        }
        Ok(())
    }

    /// Inline style serialized as CSS text, e.g. `margin-left: 5px;`.
    pub fn style_text(&self, node: NodeId) -> Result<String, DomError> {
        let arena = self.inner.borrow();
        let style = &arena.element(node)?.style;
        Ok(style
            .iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect::<Vec<_>>()
            .join(" "))
    }

    // ------------------------------------------------------------------
    // Live properties
    // ------------------------------------------------------------------

    /// Whether the element exposes a live boolean property with this name.
    pub fn has_boolean_property(&self, node: NodeId, name: &str) -> Result<bool, DomError> {
        Ok(self.inner.borrow().element(node)?.booleans.contains_key(name))
    }

    /// Current value of a live boolean property, `None` if the element does
    /// not expose it.
    pub fn boolean_property(&self, node: NodeId, name: &str) -> Result<Option<bool>, DomError> {
        Ok(self.inner.borrow().element(node)?.booleans.get(name).copied())
    }

    /// Set a live boolean property. Unknown property names are ignored.
    pub fn set_boolean_property(&self, node: NodeId, name: &str, value: bool) -> Result<(), DomError> {
        let mut arena = self.inner.borrow_mut();
        if let Some(slot) = arena.element_mut(node)?.booleans.get_mut(name) {
            *slot = value;
            arena.mutations += 1;
            trace!(%node, name, value, "set boolean property");
        }
        Ok(())
    }

    /// Whether the element carries a live `value` (input, textarea, select).
    pub fn is_form_control(&self, node: NodeId) -> Result<bool, DomError> {
        Ok(self.inner.borrow().element(node)?.value.is_some())
    }

    /// Live value of a form control, `None` for other elements.
    pub fn value(&self, node: NodeId) -> Result<Option<String>, DomError> {
        Ok(self.inner.borrow().element(node)?.value.clone())
    }

    /// Set the live value of a form control.
    pub fn set_value(&self, node: NodeId, value: &str) -> Result<(), DomError> {
        let mut arena = self.inner.borrow_mut();
        match &mut arena.element_mut(node)?.value {
            Some(current) => {
                *current = value.to_string();
            }
            None => return Err(DomError::NotAFormControl(node)),
        }
        arena.mutations += 1;
        trace!(%node, value, "set value");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Register a listener. Returns `false` if the same handler is already
    /// registered for this event, in which case nothing changes.
    pub fn add_event_listener(&self, node: NodeId, event: &str, handler: Handler) -> Result<bool, DomError> {
        let mut arena = self.inner.borrow_mut();
        let listeners = &mut arena.element_mut(node)?.listeners;
        if listeners
            .iter()
            .any(|l| l.event == event && l.handler.ptr_eq(&handler))
        {
            return Ok(false);
        }
        listeners.push(Listener {
            event: event.to_string(),
            handler,
        });
        arena.mutations += 1;
        trace!(%node, event, "add event listener");
        Ok(true)
    }

    /// Unregister a listener. Returns `false` if it was not registered.
    pub fn remove_event_listener(&self, node: NodeId, event: &str, handler: &Handler) -> Result<bool, DomError> {
        let mut arena = self.inner.borrow_mut();
        let listeners = &mut arena.element_mut(node)?.listeners;
        let Some(position) = listeners
            .iter()
            .position(|l| l.event == event && l.handler.ptr_eq(handler))
        else {
            return Ok(false);
        };
        listeners.remove(position);
        arena.mutations += 1;
        trace!(%node, event, "remove event listener");
        Ok(true)
    }

    /// Number of listeners registered on the node for an event.
    pub fn listener_count(&self, node: NodeId, event: &str) -> Result<usize, DomError> {
        Ok(self
            .inner
            .borrow()
            .element(node)?
            .listeners
            .iter()
            .filter(|l| l.event == event)
            .count())
    }

    /// Dispatch an event at `target`, then bubble it through its ancestors.
    ///
    /// The propagation path is fixed before any listener runs. Each node's
    /// listeners are read when the event reaches that node, so a listener
    /// removed by an earlier one (for example by a re-render) is skipped and
    /// one added in its place runs. Nodes freed along the way are skipped.
    /// No borrow of the document is held during the calls. Returns the
    /// number of listeners invoked.
    pub fn dispatch_event(&self, target: NodeId, name: &str) -> Result<usize, DomError> {
        let path = {
            let arena = self.inner.borrow();
            let mut path: SmallVec<[NodeId; 8]> = SmallVec::new();
            let mut current = Some(target);
            while let Some(id) = current {
                path.push(id);
                current = arena.entry(id)?.parent;
            }
            path
        };

        let event = Event::new(name, target);
        let mut invoked = 0;
        for node in path {
            let handlers: SmallVec<[Handler; 2]> = match self.inner.borrow().element(node) {
                Ok(element) => element
                    .listeners
                    .iter()
                    .filter(|l| l.event == name)
                    .map(|l| l.handler.clone())
                    .collect(),
                Err(_) => continue,
            };
            let local = event.at(node);
            for handler in handlers {
                handler.call(&local);
                invoked += 1;
            }
        }
        Ok(invoked)
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    /// Serializable view of a subtree.
    pub fn snapshot(&self, node: NodeId) -> Result<Snapshot, DomError> {
        self.inner.borrow().snapshot(node)
    }

    /// HTML serialization of a subtree.
    pub fn outer_html(&self, node: NodeId) -> Result<String, DomError> {
        Ok(self.snapshot(node)?.to_html())
    }

    /// HTML serialization of a node's children.
    pub fn inner_html(&self, node: NodeId) -> Result<String, DomError> {
        let mut html = String::new();
        for child in self.children(node)? {
            html.push_str(&self.outer_html(child)?);
        }
        Ok(html)
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arena = self.inner.borrow();
        f.debug_struct("Document")
            .field("nodes", &arena.live())
            .field("free", &arena.free.len())
            .field("mutations", &arena.mutations)
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
