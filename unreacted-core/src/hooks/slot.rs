//! Hook slots: the positional storage behind every hook call.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use super::deps::Deps;

/// Teardown returned by an effect, run before the effect runs again.
pub type Cleanup = Box<dyn FnOnce()>;

/// Shared cell an effect writes its cleanup into once it has run.
pub(crate) type CleanupCell = Rc<RefCell<Option<Cleanup>>>;

/// Bookkeeping for one `use_effect` call site.
#[derive(Default)]
pub(crate) struct EffectSlot {
    /// Dependencies the effect last ran with; `None` if it was declared
    /// without a list.
    pub deps: Option<Deps>,
    pub cleanup: CleanupCell,
}

/// One positional cell of a component's hook array.
pub(crate) enum Slot {
    State(Box<dyn Any>),
    Effect(EffectSlot),
}

impl Slot {
    pub fn kind(&self) -> &'static str {
        match self {
            Slot::State(_) => "state",
            Slot::Effect(_) => "effect",
        }
    }
}

/// The hook array of one component context, shared with state setters.
pub(crate) type SlotArray = Rc<RefCell<Vec<Slot>>>;

