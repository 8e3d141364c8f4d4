//! Events and Listeners
//!
//! Listeners are reference-counted closures. Two [`Handler`]s are equal only
//! when they share the same allocation, which is what lets the property
//! reconciler tell "same listener" from "new closure with the same body".

use std::fmt;
use std::rc::Rc;

use super::NodeId;

/// An event delivered to a listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    name: String,
    target: NodeId,
    current_target: NodeId,
}

impl Event {
    pub(crate) fn new(name: impl Into<String>, target: NodeId) -> Self {
        Self {
            name: name.into(),
            target,
            current_target: target,
        }
    }

    pub(crate) fn at(&self, current_target: NodeId) -> Self {
        Self {
            current_target,
            ..self.clone()
        }
    }

    /// Event name, e.g. `click`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The node the event was dispatched on.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// The node whose listener is currently running.
    pub fn current_target(&self) -> NodeId {
        self.current_target
    }
}

/// A shared event listener.
#[derive(Clone)]
pub struct Handler(Rc<dyn Fn(&Event)>);

impl Handler {
    /// Wrap a closure. Every call creates a distinct handler identity.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Event) + 'static,
    {
        Self(Rc::new(f))
    }

    /// Invoke the listener.
    pub fn call(&self, event: &Event) {
        (self.0)(event);
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &Handler) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}
