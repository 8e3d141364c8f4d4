//! Hook Engine
//!
//! Per-component state and side effects, addressed by call position.
//!
//! Each mounted component owns an array of slots. During a render the
//! component receives a [`Hooks`] scope whose cursor starts at slot 0;
//! `use_state` and `use_effect` each claim the next slot.
//!
//! # Example
//!
//! ```rust
//! use unreacted_core::{deps, h, dom::Document, runtime::Runtime, vdom::handler};
//!
//! let document = Document::new();
//! let root = document.create_element("div");
//! let runtime = Runtime::new(document.clone());
//!
//! runtime
//!     .render_component(
//!         |hooks| {
//!             let (count, set_count) = hooks.use_state(0)?;
//!             hooks.use_effect(move || { println!("count is {count}"); None }, Some(deps![count]))?;
//!             Ok(h!("button", { "onclick" => handler(move |_| { set_count.set(count + 1); }) }, count))
//!         },
//!         root,
//!     )
//!     .unwrap();
//!
//! let button = document.child_at(root, 0).unwrap().unwrap();
//! document.dispatch_event(button, "click").unwrap();
//! assert_eq!(document.text_content(root).unwrap(), "1");
//! // The effect for count 0 was superseded before it ran.
//! assert_eq!(runtime.run_pending_effects(), 1);
//! ```

mod deps;
mod scope;
mod slot;
mod state;

pub use deps::{Dep, DepValue, Deps};
pub use scope::Hooks;
pub use slot::Cleanup;
pub use state::SetState;

pub(crate) use slot::SlotArray;
