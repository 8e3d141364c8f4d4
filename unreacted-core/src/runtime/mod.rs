//! Component Runtime
//!
//! The runtime mounts components into containers of a [`Document`] and
//! keeps them up to date.
//!
//! # How It Works
//!
//! 1. `render_component` looks up (or creates) the component context for
//!    the container and renders it.
//!
//! 2. The first render clears the container and materializes the whole
//!    tree. Later renders diff the new tree against the previous one.
//!
//! 3. A state setter calls back into the runtime through a weak handle and
//!    re-renders its own container. A request for a container that is
//!    already rendering is queued and served as soon as that render ends.
//!
//! 4. Effects scheduled during a render wait in the effect queue until the
//!    host calls [`Runtime::run_pending_effects`].

mod context;
pub(crate) mod scheduler;
mod tracking;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use indexmap::IndexSet;
use tracing::{debug, error, trace, warn};

pub use context::{Component, ContextId, Rerender};
pub use scheduler::{EffectQueue, EffectTask, TaskKey};

use self::context::ComponentContext;
use self::tracking::RenderGuard;
use crate::config::RuntimeConfig;
use crate::dom::{Document, NodeId};
use crate::error::{HookError, RenderError};
use crate::hooks::Hooks;
use crate::reconcile::{create_dom, diff};
use crate::vdom::{Child, VNode};

struct RuntimeInner {
    document: Document,
    config: RuntimeConfig,
    contexts: RefCell<HashMap<NodeId, Rc<RefCell<ComponentContext>>>>,
    effects: RefCell<EffectQueue>,
    rendering: RefCell<Vec<NodeId>>,
    pending: RefCell<IndexSet<NodeId>>,
}

/// Mounts components and drives their re-renders.
///
/// Cloning is cheap and yields a handle to the same runtime.
#[derive(Clone)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    /// A runtime with the default configuration.
    pub fn new(document: Document) -> Self {
        Self::with_config(document, RuntimeConfig::default())
    }

    /// A runtime with the given configuration.
    pub fn with_config(document: Document, config: RuntimeConfig) -> Self {
        Self {
            inner: Rc::new(RuntimeInner {
                document,
                config,
                contexts: RefCell::new(HashMap::new()),
                effects: RefCell::new(EffectQueue::new()),
                rendering: RefCell::new(Vec::new()),
                pending: RefCell::new(IndexSet::new()),
            }),
        }
    }

    /// The live document this runtime renders into.
    pub fn document(&self) -> &Document {
        &self.inner.document
    }

    /// The configuration this runtime was built with.
    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    /// Render `component` into `container`.
    ///
    /// The first call for a container mounts the component. Later calls
    /// re-render it, replacing the component function but keeping its
    /// hook state. Calling this for a container that is currently rendering
    /// queues a render instead.
    pub fn render_component<F>(&self, component: F, container: NodeId) -> Result<(), RenderError>
    where
        F: Fn(&mut Hooks<'_>) -> Result<VNode, HookError> + 'static,
    {
        let component: Component = Rc::new(component);
        let context = {
            let mut contexts = self.inner.contexts.borrow_mut();
            match contexts.get(&container) {
                Some(context) => {
                    context.borrow_mut().component = component;
                    context.clone()
                }
                None => {
                    let context = ComponentContext::new(component, self.rerender_callback(container));
                    debug!(%container, context = %context.id, "created component context");
                    let context = Rc::new(RefCell::new(context));
                    contexts.insert(container, context.clone());
                    context
                }
            }
        };
        self.render_loop(container, &context)
    }

    /// Run every effect queued so far, in scheduling order.
    ///
    /// Effects scheduled while these run wait for the next call. Returns the
    /// number of effects run.
    pub fn run_pending_effects(&self) -> usize {
        let tasks = self.inner.effects.borrow_mut().take_ready();
        let count = tasks.len();
        for task in tasks {
            task();
        }
        if count > 0 {
            trace!(count, "ran pending effects");
        }
        count
    }

    /// Number of effects waiting for [`run_pending_effects`](Self::run_pending_effects).
    pub fn pending_effects(&self) -> usize {
        self.inner.effects.borrow().len()
    }

    /// Whether a component has been rendered into `container`.
    pub fn is_mounted(&self, container: NodeId) -> bool {
        self.inner
            .contexts
            .borrow()
            .get(&container)
            .is_some_and(|context| context.borrow().dom_node.is_some())
    }

    /// Whether the component in `container` is rendering right now.
    pub fn is_rendering(&self, container: NodeId) -> bool {
        RenderGuard::is_rendering(&self.inner.rendering, container)
    }

    /// How many times the component in `container` has rendered successfully.
    pub fn render_count(&self, container: NodeId) -> Option<usize> {
        self.inner
            .contexts
            .borrow()
            .get(&container)
            .map(|context| context.borrow().renders)
    }

    fn rerender_callback(&self, container: NodeId) -> Rerender {
        let runtime: Weak<RuntimeInner> = Rc::downgrade(&self.inner);
        Rerender::new(move || match runtime.upgrade() {
            Some(inner) => Runtime { inner }.rerender(container),
            None => trace!(%container, "runtime dropped; ignoring re-render request"),
        })
    }

    /// Re-render requested by a state setter. Nobody is waiting on the
    /// result, so failures are logged.
    fn rerender(&self, container: NodeId) {
        let context = self.inner.contexts.borrow().get(&container).cloned();
        let Some(context) = context else {
            warn!(%container, "re-render requested for an unmounted container");
            return;
        };
        if let Some(current) = RenderGuard::current(&self.inner.rendering) {
            trace!(%container, rendering = %current, "re-render requested during a render");
        }
        if let Err(error) = self.render_loop(container, &context) {
            error!(%container, %error, "re-render failed");
        }
    }

    fn render_loop(
        &self,
        container: NodeId,
        context: &Rc<RefCell<ComponentContext>>,
    ) -> Result<(), RenderError> {
        let Some(_guard) = RenderGuard::enter(&self.inner.rendering, container) else {
            self.inner.pending.borrow_mut().insert(container);
            debug!(%container, "container is rendering; queued re-render");
            return Ok(());
        };

        let limit = self.inner.config.max_rerenders;
        let mut passes = 0;
        loop {
            self.inner.pending.borrow_mut().shift_remove(&container);
            let result = self.render_once(container, context);
            passes += 1;

            let queued = self.inner.pending.borrow().contains(&container);
            if result.is_err() || !queued {
                self.inner.pending.borrow_mut().shift_remove(&container);
                return result;
            }
            if passes >= limit {
                self.inner.pending.borrow_mut().shift_remove(&container);
                warn!(%container, limit, "component keeps requesting re-renders of itself");
                return Err(RenderError::RerenderLimit { container, limit });
            }
            trace!(%container, pass = passes, "serving queued re-render");
        }
    }

    fn render_once(
        &self,
        container: NodeId,
        context: &Rc<RefCell<ComponentContext>>,
    ) -> Result<(), RenderError> {
        // Nothing may hold the context borrowed while the component runs:
        // it can call setters and `render_component` re-entrantly.
        let (id, component, slots, rerender, expected) = {
            let context = context.borrow();
            (
                context.id,
                context.component.clone(),
                context.slots.clone(),
                context.rerender.clone(),
                context.hook_count,
            )
        };

        let (tree, calls) = {
            let mut hooks = Hooks::new(id, &slots, &rerender, &self.inner.effects, &self.inner.config);
            let tree = component(&mut hooks)?;
            (tree, hooks.calls())
        };

        if let Some(expected) = expected {
            if expected != calls {
                if self.inner.config.strict_hook_order {
                    return Err(HookError::HookCountMismatch { expected, found: calls }.into());
                }
                warn!(%container, context = %id, expected, found = calls, "hook count changed between renders");
            }
        }

        let document = &self.inner.document;
        let tree = Child::from(tree);
        let previous = context.borrow_mut().vdom.take();

        let patched = match &previous {
            None => document
                .clear_children(container)
                .and_then(|()| create_dom(document, &tree))
                .and_then(|node| document.append_child(container, node).map(|()| Some(node))),
            Some(previous) => diff(document, container, Some(&tree), Some(previous), 0)
                .and_then(|()| document.child_at(container, 0)),
        };
        let dom_node = match patched {
            Ok(node) => node,
            Err(err) => {
                context.borrow_mut().vdom = previous;
                return Err(err.into());
            }
        };

        let mut context = context.borrow_mut();
        context.vdom = Some(tree);
        context.dom_node = dom_node;
        if context.hook_count.is_none() {
            context.hook_count = Some(calls);
        }
        context.renders += 1;
        if previous.is_none() {
            debug!(%container, context = %id, hooks = calls, "mounted component");
        } else {
            debug!(%container, context = %id, render = context.renders, "updated component");
        }
        Ok(())
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("config", &self.inner.config)
            .field("mounted", &self.inner.contexts.borrow().len())
            .field("pending_effects", &self.inner.effects.borrow().len())
            .finish()
    }
}
