//! Effect Scheduler
//!
//! Effects never run inside the render that declared them. `use_effect`
//! queues a task here and the host drains the queue once per event-loop
//! turn through [`Runtime::run_pending_effects`](super::Runtime::run_pending_effects).
//!
//! # Cancellation
//!
//! Tasks are keyed by the component context and hook slot that scheduled
//! them. Scheduling a key that is still pending drops the pending task and
//! queues the new one at the back, so a slot never runs a stale effect.

use indexmap::IndexMap;

use super::context::ContextId;

/// A deferred effect body.
pub type EffectTask = Box<dyn FnOnce()>;

/// Identity of one `use_effect` call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskKey {
    pub context: ContextId,
    pub slot: usize,
}

impl TaskKey {
    pub fn new(context: ContextId, slot: usize) -> Self {
        Self { context, slot }
    }
}

/// FIFO queue of pending effect tasks with per-key cancellation.
#[derive(Default)]
pub struct EffectQueue {
    tasks: IndexMap<TaskKey, EffectTask>,
}

impl EffectQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `task` under `key`.
    ///
    /// Returns `true` if a pending task with the same key was cancelled.
    pub fn schedule(&mut self, key: TaskKey, task: EffectTask) -> bool {
        let replaced = self.tasks.shift_remove(&key).is_some();
        self.tasks.insert(key, task);
        replaced
    }

    /// Drop the pending task for `key`, if any.
    pub fn cancel(&mut self, key: TaskKey) -> bool {
        self.tasks.shift_remove(&key).is_some()
    }

    /// Remove and return every queued task in scheduling order.
    pub fn take_ready(&mut self) -> Vec<EffectTask> {
        self.tasks.drain(..).map(|(_, task)| task).collect()
    }

    /// Whether a task is pending for `key`.
    pub fn is_pending(&self, key: TaskKey) -> bool {
        self.tasks.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl std::fmt::Debug for EffectQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectQueue")
            .field("pending", &self.tasks.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(log: &Rc<RefCell<Vec<&'static str>>>, name: &'static str) -> EffectTask {
        let log = log.clone();
        Box::new(move || log.borrow_mut().push(name))
    }

    fn run_all(queue: &mut EffectQueue) {
        for task in queue.take_ready() {
            task();
        }
    }

    #[test]
    fn runs_in_scheduling_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut queue = EffectQueue::new();
        let ctx = ContextId::new();

        queue.schedule(TaskKey::new(ctx, 0), recorder(&log, "a"));
        queue.schedule(TaskKey::new(ctx, 1), recorder(&log, "b"));
        assert_eq!(queue.len(), 2);

        run_all(&mut queue);
        assert_eq!(*log.borrow(), vec!["a", "b"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn rescheduling_cancels_and_moves_to_back() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut queue = EffectQueue::new();
        let ctx = ContextId::new();

        assert!(!queue.schedule(TaskKey::new(ctx, 0), recorder(&log, "stale")));
        queue.schedule(TaskKey::new(ctx, 1), recorder(&log, "other"));
        assert!(queue.schedule(TaskKey::new(ctx, 0), recorder(&log, "fresh")));

        run_all(&mut queue);
        assert_eq!(*log.borrow(), vec!["other", "fresh"]);
    }

    #[test]
    fn cancel_by_key() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut queue = EffectQueue::new();
        let a = ContextId::new();
        let b = ContextId::new();

        queue.schedule(TaskKey::new(a, 0), recorder(&log, "a0"));
        queue.schedule(TaskKey::new(a, 1), recorder(&log, "a1"));
        queue.schedule(TaskKey::new(b, 0), recorder(&log, "b0"));

        assert!(queue.cancel(TaskKey::new(a, 1)));
        assert!(!queue.cancel(TaskKey::new(a, 1)));
        assert!(queue.is_pending(TaskKey::new(a, 0)));
        assert!(!queue.is_pending(TaskKey::new(a, 1)));

        run_all(&mut queue);
        assert_eq!(*log.borrow(), vec!["a0", "b0"]);
    }
}
