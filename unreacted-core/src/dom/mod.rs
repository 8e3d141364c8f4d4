//! Live Tree
//!
//! The presentation tree the reconciler writes to. [`Document`] is a
//! DOM-shaped, in-memory tree with the pieces the property reconciler
//! relies on: attributes, inline style, live boolean properties, form
//! values and event listeners with bubbling dispatch.

mod document;
mod event;
mod snapshot;

pub use document::{Document, NodeId};
pub use event::{Event, Handler};
pub use snapshot::Snapshot;
