//! Unreacted Core
//!
//! This crate provides the core runtime for the Unreacted UI library.
//! It implements:
//!
//! - Virtual tree construction (`create_element`, `h!`, `props!`)
//! - Property reconciliation and positional tree diffing
//! - Per-component state and effects (hooks)
//! - A component driver that mounts components and re-renders them when
//!   their state changes
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `vdom`: Immutable virtual nodes and their properties
//! - `dom`: The in-memory live tree the reconciler writes to
//! - `reconcile`: Property reconciler and tree differ
//! - `hooks`: Slot storage, `use_state` and `use_effect`
//! - `runtime`: Component contexts, the render driver and the effect queue
//! - `config`: Runtime configuration
//!
//! Everything is single-threaded: handles are `Rc`-based and not `Send`.
//!
//! # Example
//!
//! ```rust
//! use unreacted_core::{h, Document, Runtime, vdom::handler};
//!
//! let document = Document::new();
//! let root = document.create_element("div");
//! let runtime = Runtime::new(document.clone());
//!
//! runtime
//!     .render_component(
//!         |hooks| {
//!             let (count, set_count) = hooks.use_state(0)?;
//!             Ok(h!("div", {},
//!                 h!("h1", {}, format!("Count: {count}")),
//!                 h!("button", { "onclick" => handler(move |_| { set_count.set(count + 1); }) }, "Increment"),
//!             ))
//!         },
//!         root,
//!     )
//!     .unwrap();
//!
//! let button = document.child_at(document.child_at(root, 0).unwrap().unwrap(), 1).unwrap().unwrap();
//! document.dispatch_event(button, "click").unwrap();
//! assert!(document.inner_html(root).unwrap().contains("Count: 1"));
//! ```

pub mod config;
pub mod dom;
pub mod error;
pub mod hooks;
pub mod reconcile;
pub mod runtime;
pub mod vdom;

pub use config::{EffectDepsMode, RuntimeConfig};
pub use dom::{Document, NodeId};
pub use error::{ConfigError, DomError, HookError, RenderError};
pub use hooks::{Cleanup, Deps, Hooks, SetState};
pub use runtime::Runtime;
pub use vdom::{create_element, Child, PropValue, Props, VNode};
