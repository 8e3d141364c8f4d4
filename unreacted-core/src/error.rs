//! Error Types
//!
//! Every fallible operation in the crate returns one of the enums below.
//! Live-tree failures ([`DomError`]) and hook misuse ([`HookError`]) are
//! fatal to the render that hit them; [`RenderError`] is what the component
//! driver surfaces to its caller.

use thiserror::Error;

use crate::dom::NodeId;

/// Errors raised by the live document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The node id does not belong to this document.
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    /// An element-only operation was applied to a text node.
    #[error("node {0} is not an element")]
    NotAnElement(NodeId),

    /// The node is not a direct child of the given parent.
    #[error("node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },

    /// Inserting the node would make it its own ancestor.
    #[error("cannot insert {child} under {parent}: it is an ancestor of the parent")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    /// The element has no live `value` property.
    #[error("node {0} is not a form control")]
    NotAFormControl(NodeId),

    /// Only detached subtrees can be freed.
    #[error("cannot free {node}: it is still a child of {parent}")]
    StillAttached { node: NodeId, parent: NodeId },
}

/// Errors raised by the hook engine.
///
/// These always indicate that a component called its hooks in a different
/// order (or a different number of times) than on a previous render.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookError {
    /// The slot at this position holds a different hook kind or value type.
    #[error("hook slot {index} does not hold {expected}; hooks must be called in the same order on every render")]
    SlotMismatch { index: usize, expected: &'static str },

    /// The render made a different number of hook calls than the first one.
    #[error("component called {found} hooks but its first render called {expected}")]
    HookCountMismatch { expected: usize, found: usize },
}

/// Errors surfaced by [`Runtime::render_component`](crate::runtime::Runtime::render_component).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("live tree error: {0}")]
    Dom(#[from] DomError),

    #[error("hook error: {0}")]
    Hook(#[from] HookError),

    /// The component kept requesting re-renders of itself while rendering.
    #[error("container {container} re-rendered more than {limit} times in a row")]
    RerenderLimit { container: NodeId, limit: usize },
}

/// Errors raised while loading a [`RuntimeConfig`](crate::config::RuntimeConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse runtime config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("runtime config validation failed: {message}")]
    Invalid { message: String },
}
