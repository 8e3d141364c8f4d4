//! Render Tracking
//!
//! The runtime keeps a stack of the containers whose components are
//! currently rendering. A render pushes its container on entry and the
//! guard pops it when dropped, so the stack stays balanced even when the
//! render bails out early with an error.
//!
//! The stack is what lets the driver notice a re-render request for a
//! container that is already mid-render and queue it instead of
//! re-entering.

use std::cell::RefCell;

use crate::dom::NodeId;

/// Guard that pops the render stack when dropped.
pub(crate) struct RenderGuard<'a> {
    stack: &'a RefCell<Vec<NodeId>>,
    container: NodeId,
}

impl<'a> RenderGuard<'a> {
    /// Mark `container` as rendering.
    ///
    /// Returns `None` if it already is; the caller must not render it again
    /// until the outer render finishes.
    pub fn enter(stack: &'a RefCell<Vec<NodeId>>, container: NodeId) -> Option<Self> {
        let mut entries = stack.borrow_mut();
        if entries.contains(&container) {
            return None;
        }
        entries.push(container);
        Some(Self { stack, container })
    }

    /// Whether `container` is on the stack.
    pub fn is_rendering(stack: &RefCell<Vec<NodeId>>, container: NodeId) -> bool {
        stack.borrow().contains(&container)
    }

    /// Innermost container currently rendering.
    pub fn current(stack: &RefCell<Vec<NodeId>>) -> Option<NodeId> {
        stack.borrow().last().copied()
    }
}

impl Drop for RenderGuard<'_> {
    fn drop(&mut self) {
        let popped = self.stack.borrow_mut().pop();
        if let Some(container) = popped {
            debug_assert_eq!(
                container, self.container,
                "RenderGuard mismatch: expected {}, got {}",
                self.container, container
            );
        }
    }
}
