//! Render Scope
//!
//! [`Hooks`] is handed to a component for the duration of one render. It
//! owns the slot cursor: every hook call claims the next slot, so a
//! component must call its hooks in the same order on every render.
//!
//! # Slot Identity
//!
//! A slot is identified purely by its position. The first render creates
//! the slots; later renders find them at the same index. A slot holding a
//! different hook kind or value type than the call expects fails with
//! [`HookError::SlotMismatch`].

use std::any::type_name;
use std::cell::RefCell;

use tracing::{debug, trace, warn};

use super::deps::{deps_changed, Deps};
use super::slot::{Cleanup, EffectSlot, Slot, SlotArray};
use super::state::SetState;
use crate::config::{EffectDepsMode, RuntimeConfig};
use crate::error::HookError;
use crate::runtime::scheduler::{EffectQueue, TaskKey};
use crate::runtime::{ContextId, Rerender};

/// The hook API available to a component while it renders.
pub struct Hooks<'r> {
    context: ContextId,
    slots: &'r SlotArray,
    rerender: &'r Rerender,
    effects: &'r RefCell<EffectQueue>,
    config: &'r RuntimeConfig,
    index: usize,
}

impl<'r> Hooks<'r> {
    pub(crate) fn new(
        context: ContextId,
        slots: &'r SlotArray,
        rerender: &'r Rerender,
        effects: &'r RefCell<EffectQueue>,
        config: &'r RuntimeConfig,
    ) -> Self {
        Self {
            context,
            slots,
            rerender,
            effects,
            config,
            index: 0,
        }
    }

    /// Number of hooks called so far in this render.
    pub(crate) fn calls(&self) -> usize {
        self.index
    }

    /// The component context this scope renders.
    pub fn context(&self) -> ContextId {
        self.context
    }

    fn next_index(&mut self) -> usize {
        let index = self.index;
        self.index += 1;
        index
    }

    /// Declare a piece of component state.
    ///
    /// Returns the current value and a setter. `initial` is only used on the
    /// render that creates the slot.
    ///
    /// ```rust,ignore
    /// let (count, set_count) = hooks.use_state(0)?;
    /// ```
    pub fn use_state<T>(&mut self, initial: T) -> Result<(T, SetState<T>), HookError>
    where
        T: PartialEq + Clone + 'static,
    {
        let index = self.next_index();
        let mut slots = self.slots.borrow_mut();
        if index >= slots.len() {
            trace!(context = %self.context, slot = index, "initializing state slot");
            slots.push(Slot::State(Box::new(initial)));
        }

        let value = match slots.get(index) {
            Some(Slot::State(value)) => value.downcast_ref::<T>().cloned(),
            _ => None,
        };
        let Some(value) = value else {
            debug!(
                context = %self.context,
                slot = index,
                found = slots.get(index).map_or("nothing", Slot::kind),
                "state hook found a mismatched slot"
            );
            return Err(HookError::SlotMismatch {
                index,
                expected: type_name::<T>(),
            });
        };
        drop(slots);

        Ok((value, SetState::new(self.slots.clone(), index, self.rerender.clone())))
    }

    /// Declare a side effect.
    ///
    /// The effect is scheduled to run after the render when its
    /// dependencies changed. Before it is scheduled again, the cleanup it
    /// returned last time runs. With `deps` of `None`, whether the effect
    /// counts as changed is decided by [`EffectDepsMode`].
    pub fn use_effect<F>(&mut self, effect: F, deps: Option<Deps>) -> Result<(), HookError>
    where
        F: FnOnce() -> Option<Cleanup> + 'static,
    {
        let index = self.next_index();
        let mut slots = self.slots.borrow_mut();
        let first = index >= slots.len();
        if first {
            slots.push(Slot::Effect(EffectSlot::default()));
        }

        let Some(Slot::Effect(slot)) = slots.get_mut(index) else {
            return Err(HookError::SlotMismatch {
                index,
                expected: "effect",
            });
        };

        let changed = match (&deps, &slot.deps) {
            (Some(new), Some(old)) => deps_changed(new, old),
            (Some(_), None) | (None, Some(_)) => true,
            (None, None) => first || self.config.effect_deps_mode == EffectDepsMode::EveryRender,
        };
        if !changed {
            trace!(context = %self.context, slot = index, "effect dependencies unchanged");
            return Ok(());
        }

        slot.deps = deps;
        let cell = slot.cleanup.clone();
        drop(slots);

        // Cleanups may call setters, which borrow the slot array.
        let previous = cell.borrow_mut().take();
        if let Some(cleanup) = previous {
            trace!(context = %self.context, slot = index, "running effect cleanup");
            cleanup();
        }

        let key = TaskKey::new(self.context, index);
        let replaced = self.effects.borrow_mut().schedule(
            key,
            Box::new(move || {
                let cleanup = effect();
                *cell.borrow_mut() = cleanup;
            }),
        );
        if replaced {
            warn!(context = %self.context, slot = index, "cancelled effect superseded before it ran");
        } else {
            trace!(context = %self.context, slot = index, "scheduled effect");
        }
        Ok(())
    }
}
