//! Component Contexts
//!
//! A component context is the per-container record the driver keeps
//! between renders: the component function, its hook slots, the previous
//! virtual tree and the live root that tree was rendered into.

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::dom::NodeId;
use crate::error::HookError;
use crate::hooks::{Hooks, SlotArray};
use crate::vdom::{Child, VNode};

/// Unique identifier for a component context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(u64);

impl ContextId {
    /// Generate a new unique context ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ctx{}", self.0)
    }
}

/// A component function: renders a virtual tree using its hooks.
pub type Component = Rc<dyn Fn(&mut Hooks<'_>) -> Result<VNode, HookError>>;

/// Callback that re-renders one mounted component.
///
/// Cloned into every state setter the component creates.
#[derive(Clone)]
pub struct Rerender(Rc<dyn Fn()>);

impl Rerender {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self(Rc::new(f))
    }

    /// Ask for the owning component to be rendered again.
    pub fn request(&self) {
        (self.0)()
    }
}

impl fmt::Debug for Rerender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Rerender(..)")
    }
}

/// Everything the driver remembers about one mounted component.
pub(crate) struct ComponentContext {
    pub id: ContextId,
    pub component: Component,
    pub slots: SlotArray,
    pub rerender: Rerender,
    /// The tree produced by the last successful render.
    pub vdom: Option<Child>,
    /// The live node that tree was materialized as.
    pub dom_node: Option<NodeId>,
    /// Hook calls made by the first render.
    pub hook_count: Option<usize>,
    pub renders: usize,
}

impl ComponentContext {
    pub fn new(component: Component, rerender: Rerender) -> Self {
        Self {
            id: ContextId::new(),
            component,
            slots: SlotArray::default(),
            rerender,
            vdom: None,
            dom_node: None,
            hook_count: None,
            renders: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn context_ids_are_unique() {
        let a = ContextId::new();
        let b = ContextId::new();
        assert_ne!(a, b);
        assert!(a.to_string().starts_with("ctx"));
    }

    #[test]
    fn rerender_invokes_callback() {
        let calls = Rc::new(Cell::new(0));
        let probe = calls.clone();
        let rerender = Rerender::new(move || probe.set(probe.get() + 1));
        let copy = rerender.clone();

        rerender.request();
        copy.request();
        assert_eq!(calls.get(), 2);
    }
}
