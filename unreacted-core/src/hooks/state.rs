//! State Setters
//!
//! A [`SetState`] is bound to the slot array and slot index that were
//! current when `use_state` ran, not to whatever component happens to be
//! rendering when the setter is called. It can therefore be moved into
//! event handlers and effects and used long after the render returned.

use std::fmt;
use std::marker::PhantomData;

use tracing::{trace, warn};

use super::slot::{Slot, SlotArray};
use crate::runtime::Rerender;

/// Writes one state slot and re-renders the owning component on change.
pub struct SetState<T> {
    slots: SlotArray,
    index: usize,
    rerender: Rerender,
    _value: PhantomData<fn(T)>,
}

impl<T> SetState<T>
where
    T: PartialEq + 'static,
{
    pub(crate) fn new(slots: SlotArray, index: usize, rerender: Rerender) -> Self {
        Self {
            slots,
            index,
            rerender,
            _value: PhantomData,
        }
    }

    /// Store `value` and request a re-render, unless it equals the current
    /// value. Returns whether a re-render was requested.
    pub fn set(&self, value: T) -> bool {
        {
            let mut slots = self.slots.borrow_mut();
            let Some(current) = self.slot_value_mut(&mut slots) else {
                return false;
            };
            if *current == value {
                trace!(slot = self.index, "state unchanged; skipping re-render");
                return false;
            }
            *current = value;
        }
        trace!(slot = self.index, "state changed; requesting re-render");
        self.rerender.request();
        true
    }

    /// Compute the next value from the current one, then [`set`](Self::set) it.
    ///
    /// `f` runs on a copy with the slots released, so it may call this or
    /// any other setter of the same component.
    pub fn update<F>(&self, f: F) -> bool
    where
        T: Clone,
        F: FnOnce(&T) -> T,
    {
        let Some(current) = self.get() else {
            return false;
        };
        self.set(f(&current))
    }

    /// The value currently stored in the slot.
    pub fn get(&self) -> Option<T>
    where
        T: Clone,
    {
        let mut slots = self.slots.borrow_mut();
        self.slot_value_mut(&mut slots).map(|value| value.clone())
    }

    fn slot_value_mut<'s>(&self, slots: &'s mut [Slot]) -> Option<&'s mut T> {
        let value = match slots.get_mut(self.index) {
            Some(Slot::State(value)) => value.downcast_mut::<T>(),
            _ => None,
        };
        if value.is_none() {
            warn!(slot = self.index, "state slot no longer holds this setter's value; ignoring");
        }
        value
    }
}

impl<T> Clone for SetState<T> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            index: self.index,
            rerender: self.rerender.clone(),
            _value: PhantomData,
        }
    }
}

impl<T> fmt::Debug for SetState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetState")
            .field("slot", &self.index)
            .field("value_type", &std::any::type_name::<T>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn setter(initial: i32) -> (SetState<i32>, Rc<Cell<usize>>) {
        let slots: SlotArray = Rc::new(RefCell::new(vec![Slot::State(Box::new(initial))]));
        let requests = Rc::new(Cell::new(0));
        let requests_clone = requests.clone();
        let rerender = Rerender::new(move || requests_clone.set(requests_clone.get() + 1));
        (SetState::new(slots, 0, rerender), requests)
    }

    #[test]
    fn equal_value_is_a_no_op() {
        let (set, requests) = setter(0);
        assert!(!set.set(0));
        assert_eq!(requests.get(), 0);
    }

    #[test]
    fn changed_value_requests_one_rerender() {
        let (set, requests) = setter(0);
        assert!(set.set(5));
        assert!(!set.set(5));
        assert_eq!(requests.get(), 1);
        assert_eq!(set.get(), Some(5));
    }

    #[test]
    fn update_uses_current_value() {
        let (set, requests) = setter(1);
        set.update(|n| n + 1);
        set.update(|n| n * 10);
        assert_eq!(set.get(), Some(20));
        assert_eq!(requests.get(), 2);
    }

    #[test]
    fn update_closure_may_use_setters() {
        let (set, requests) = setter(3);
        let inner = set.clone();
        assert!(set.update(|n| {
            assert_eq!(inner.get(), Some(3));
            assert!(!inner.set(3));
            n * 2
        }));
        assert_eq!(set.get(), Some(6));
        assert_eq!(requests.get(), 1);
    }

    #[test]
    fn mismatched_slot_is_ignored() {
        let slots: SlotArray = Rc::new(RefCell::new(vec![Slot::State(Box::new("text"))]));
        let set = SetState::<i32>::new(slots, 0, Rerender::new(|| panic!("must not re-render")));
        assert!(!set.set(1));
        assert_eq!(set.get(), None);
    }
}
