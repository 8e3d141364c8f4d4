//! Integration Tests for the Component Runtime
//!
//! These tests mount components into a live document and verify that state,
//! effects and reconciliation work together correctly.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::json;
use unreacted_core::reconcile::reconcile_props;
use unreacted_core::vdom::{handler, Style};
use unreacted_core::{
    deps, h, props, Cleanup, Document, EffectDepsMode, HookError, NodeId, RenderError, Runtime,
    RuntimeConfig, SetState,
};

fn setup() -> (Document, NodeId, Runtime) {
    let document = Document::new();
    let root = document.create_element("div");
    let runtime = Runtime::new(document.clone());
    (document, root, runtime)
}

/// Walk a path of child indices from `node`.
fn child(document: &Document, node: NodeId, path: &[usize]) -> NodeId {
    path.iter().fold(node, |node, &index| {
        document.child_at(node, index).unwrap().unwrap()
    })
}

/// The canonical counter: clicking the button updates the heading in place.
#[test]
fn counter_updates_in_place() {
    let (document, root, runtime) = setup();

    runtime
        .render_component(
            |hooks| {
                let (count, set_count) = hooks.use_state(0)?;
                Ok(h!("div", {},
                    h!("h1", {}, format!("Count: {count}")),
                    h!("button", { "onclick" => handler(move |_| { set_count.set(count + 1); }) }, "Increment"),
                ))
            },
            root,
        )
        .unwrap();

    let div = child(&document, root, &[0]);
    let h1 = child(&document, div, &[0]);
    let button = child(&document, div, &[1]);
    assert_eq!(document.text_content(h1).unwrap(), "Count: 0");

    document.dispatch_event(button, "click").unwrap();

    // Same live nodes, new text.
    assert_eq!(document.text_content(h1).unwrap(), "Count: 1");
    assert_eq!(child(&document, root, &[0]), div);
    assert_eq!(child(&document, div, &[0]), h1);
    assert_eq!(child(&document, div, &[1]), button);
    assert_eq!(document.listener_count(button, "click").unwrap(), 1);

    document.dispatch_event(button, "click").unwrap();
    assert_eq!(document.text_content(h1).unwrap(), "Count: 2");
    assert_eq!(runtime.render_count(root), Some(3));
}

/// Nodes replaced by a re-render are recycled, so a long-running component
/// does not grow the document.
#[test]
fn repeated_updates_keep_node_count_bounded() {
    let (document, root, runtime) = setup();

    runtime
        .render_component(
            |hooks| {
                let (count, set_count) = hooks.use_state(0)?;
                Ok(h!("div", {},
                    h!("h1", {}, format!("Count: {count}")),
                    h!("button", { "onclick" => handler(move |_| { set_count.set(count + 1); }) }, "Increment"),
                ))
            },
            root,
        )
        .unwrap();

    let button = child(&document, root, &[0, 1]);
    let h1 = child(&document, root, &[0, 0]);
    let first_text = child(&document, h1, &[0]);
    // root, div, h1, its text, button, its text
    assert_eq!(document.node_count(), 6);

    for _ in 0..1000 {
        document.dispatch_event(button, "click").unwrap();
    }

    assert_eq!(document.text_content(h1).unwrap(), "Count: 1000");
    assert_eq!(document.node_count(), 6);
    assert!(document.text(first_text).is_err());
    assert_eq!(runtime.render_count(root), Some(1001));
}

/// An ancestor listener re-bound by a re-render is the one the bubbling
/// event reaches, so it sees the updated state.
#[test]
fn bubbling_reaches_rebound_ancestor_listener() {
    let (document, root, runtime) = setup();
    let seen = Rc::new(RefCell::new(Vec::new()));

    let log = seen.clone();
    runtime
        .render_component(
            move |hooks| {
                let (count, set_count) = hooks.use_state(0)?;
                let log = log.clone();
                Ok(h!("div", { "onclick" => handler(move |_| log.borrow_mut().push(count)) },
                    h!("button", { "onclick" => handler(move |_| { set_count.set(count + 1); }) }, "+"),
                ))
            },
            root,
        )
        .unwrap();

    let div = child(&document, root, &[0]);
    let button = child(&document, div, &[0]);

    assert_eq!(document.dispatch_event(button, "click").unwrap(), 2);
    assert_eq!(*seen.borrow(), vec![1]);
    document.dispatch_event(button, "click").unwrap();
    assert_eq!(*seen.borrow(), vec![1, 2]);
    assert_eq!(document.listener_count(div, "click").unwrap(), 1);
}

/// Mount a component into `container` that shows `label=value` and hands
/// its setter out through `out`.
fn mount_labelled(
    runtime: &Runtime,
    container: NodeId,
    label: &'static str,
    out: Rc<RefCell<Option<SetState<i32>>>>,
) {
    runtime
        .render_component(
            move |hooks| {
                let (value, set) = hooks.use_state(0)?;
                *out.borrow_mut() = Some(set);
                Ok(h!("span", {}, format!("{label}={value}")))
            },
            container,
        )
        .unwrap();
}

/// A's setter called while B renders updates A (through a nested render of
/// A) and leaves B's slot with the same index alone.
#[test]
fn setter_called_from_another_containers_render() {
    let document = Document::new();
    let (a, b) = (document.create_element("div"), document.create_element("div"));
    let runtime = Runtime::new(document.clone());

    let set_a = Rc::new(RefCell::new(None));
    mount_labelled(&runtime, a, "a", set_a.clone());

    let shared = set_a.clone();
    let component_b = move |hooks: &mut unreacted_core::Hooks<'_>| -> Result<_, HookError> {
        let (value, _set) = hooks.use_state(100)?;
        let setter = shared.borrow().clone();
        if let Some(setter) = setter {
            setter.update(|n| n + 1);
        }
        Ok(h!("span", {}, format!("b={value}")))
    };

    runtime.render_component(component_b.clone(), b).unwrap();
    assert_eq!(document.text_content(a).unwrap(), "a=1");
    assert_eq!(document.text_content(b).unwrap(), "b=100");
    assert_eq!(runtime.render_count(a), Some(2));
    assert_eq!(runtime.render_count(b), Some(1));

    runtime.render_component(component_b, b).unwrap();
    assert_eq!(document.text_content(a).unwrap(), "a=2");
    assert_eq!(document.text_content(b).unwrap(), "b=100");
    assert_eq!(runtime.render_count(a), Some(3));
    assert_eq!(runtime.render_count(b), Some(2));

    assert!(!runtime.is_rendering(a));
    assert!(!runtime.is_rendering(b));
    assert_eq!(runtime.pending_effects(), 0);
}

/// A's setter called from B's effect re-renders only A.
#[test]
fn setter_called_from_another_containers_effect() {
    let document = Document::new();
    let (a, b) = (document.create_element("div"), document.create_element("div"));
    let runtime = Runtime::new(document.clone());

    let set_a = Rc::new(RefCell::new(None));
    mount_labelled(&runtime, a, "a", set_a.clone());
    let set_b = Rc::new(RefCell::new(None));

    let (shared, own) = (set_a.clone(), set_b.clone());
    runtime
        .render_component(
            move |hooks| {
                let (value, set) = hooks.use_state(7)?;
                *own.borrow_mut() = Some(set);
                let shared = shared.clone();
                hooks.use_effect(
                    move || {
                        let setter = shared.borrow().clone();
                        if let Some(setter) = setter {
                            setter.set(42);
                        }
                        None
                    },
                    Some(deps![]),
                )?;
                Ok(h!("span", {}, format!("b={value}")))
            },
            b,
        )
        .unwrap();

    assert_eq!(document.text_content(a).unwrap(), "a=0");
    assert_eq!(runtime.run_pending_effects(), 1);

    assert_eq!(document.text_content(a).unwrap(), "a=42");
    assert_eq!(document.text_content(b).unwrap(), "b=7");
    assert_eq!(runtime.render_count(a), Some(2));
    assert_eq!(runtime.render_count(b), Some(1));
    let b_state = set_b.borrow().clone().unwrap();
    assert_eq!(b_state.get(), Some(7));
    assert!(!runtime.is_rendering(a));
    assert!(!runtime.is_rendering(b));
}

/// Setting a state slot to its current value does not re-render.
#[test]
fn equal_state_skips_rerender() {
    let (_document, root, runtime) = setup();
    let setter = Rc::new(RefCell::new(None));

    let slot = setter.clone();
    runtime
        .render_component(
            move |hooks| {
                let (value, set) = hooks.use_state(0)?;
                *slot.borrow_mut() = Some(set);
                Ok(h!("span", {}, value))
            },
            root,
        )
        .unwrap();

    let set = setter.borrow().clone().unwrap();
    assert!(!set.set(0));
    assert_eq!(runtime.render_count(root), Some(1));

    assert!(set.set(7));
    assert!(!set.set(7));
    assert_eq!(runtime.render_count(root), Some(2));
    assert_eq!(runtime.document().text_content(root).unwrap(), "7");
}

/// Two state slots keep their own values across re-renders.
#[test]
fn state_slots_are_independent() {
    let (document, root, runtime) = setup();

    runtime
        .render_component(
            |hooks| {
                let (name, set_name) = hooks.use_state("ada".to_string())?;
                let (age, set_age) = hooks.use_state(36)?;
                Ok(h!("p", {},
                    h!("b", { "onclick" => handler(move |_| { set_name.set("grace".to_string()); }) }, name),
                    h!("i", { "onclick" => handler(move |_| { set_age.update(|age| age + 1); }) }, age),
                ))
            },
            root,
        )
        .unwrap();

    let p = child(&document, root, &[0]);
    document.dispatch_event(child(&document, p, &[1]), "click").unwrap();
    assert_eq!(document.inner_html(p).unwrap(), "<b>ada</b><i>37</i>");

    document.dispatch_event(child(&document, p, &[0]), "click").unwrap();
    assert_eq!(document.inner_html(p).unwrap(), "<b>grace</b><i>37</i>");
}

/// Effects re-run only when their dependencies change, after the previous
/// cleanup.
#[test]
fn effect_dependencies_gate_reruns() {
    let (_document, root, runtime) = setup();
    let dep = Rc::new(Cell::new("a"));
    let log = Rc::new(RefCell::new(Vec::<String>::new()));

    let render = || {
        let dep = dep.clone();
        let log = log.clone();
        runtime
            .render_component(
                move |hooks| {
                    let value = dep.get();
                    let log = log.clone();
                    hooks.use_effect(
                        move || {
                            log.borrow_mut().push(format!("run {value}"));
                            Some(Box::new(move || log.borrow_mut().push(format!("cleanup {value}"))) as Cleanup)
                        },
                        Some(deps![value]),
                    )?;
                    Ok(h!("div"))
                },
                root,
            )
            .unwrap();
        runtime.run_pending_effects()
    };

    assert_eq!(render(), 1);
    assert_eq!(render(), 0);
    dep.set("b");
    assert_eq!(render(), 1);

    assert_eq!(*log.borrow(), vec!["run a", "cleanup a", "run b"]);
}

/// Effects never run during the render that scheduled them.
#[test]
fn effects_are_deferred_to_the_host() {
    let (document, root, runtime) = setup();
    let ran = Rc::new(Cell::new(false));

    let probe = ran.clone();
    runtime
        .render_component(
            move |hooks| {
                let probe = probe.clone();
                hooks.use_effect(move || { probe.set(true); None }, Some(deps![]))?;
                Ok(h!("div"))
            },
            root,
        )
        .unwrap();

    assert!(!ran.get());
    assert_eq!(runtime.pending_effects(), 1);
    assert_eq!(document.child_count(root).unwrap(), 1);

    assert_eq!(runtime.run_pending_effects(), 1);
    assert!(ran.get());
    assert_eq!(runtime.pending_effects(), 0);
}

/// A setter called from an effect re-renders, and the next effect waits
/// for the next turn.
#[test]
fn effect_can_update_state() {
    let (document, root, runtime) = setup();

    runtime
        .render_component(
            |hooks| {
                let (value, set_value) = hooks.use_state(0)?;
                hooks.use_effect(
                    move || {
                        if value == 0 {
                            set_value.set(10);
                        }
                        None
                    },
                    Some(deps![value]),
                )?;
                Ok(h!("output", {}, value))
            },
            root,
        )
        .unwrap();

    assert_eq!(document.text_content(root).unwrap(), "0");
    assert_eq!(runtime.run_pending_effects(), 1);
    assert_eq!(document.text_content(root).unwrap(), "10");
    assert_eq!(runtime.pending_effects(), 1);
    assert_eq!(runtime.run_pending_effects(), 1);
    assert_eq!(runtime.render_count(root), Some(2));
}

/// Without deps, effects follow the configured mode.
#[test]
fn effect_without_deps_modes() {
    for (mode, expected) in [(EffectDepsMode::EveryRender, 3), (EffectDepsMode::Once, 1)] {
        let document = Document::new();
        let root = document.create_element("div");
        let runtime = Runtime::with_config(document, RuntimeConfig::default().with_effect_deps_mode(mode));
        let runs = Rc::new(Cell::new(0));

        for _ in 0..3 {
            let runs = runs.clone();
            runtime
                .render_component(
                    move |hooks| {
                        let runs = runs.clone();
                        hooks.use_effect(move || { runs.set(runs.get() + 1); None }, None)?;
                        Ok(h!("div"))
                    },
                    root,
                )
                .unwrap();
            runtime.run_pending_effects();
        }

        assert_eq!(runs.get(), expected, "mode {mode:?}");
    }
}

/// Re-rendering an unchanged tree leaves the live tree untouched.
#[test]
fn unchanged_rerender_does_not_mutate() {
    let (document, root, runtime) = setup();
    let component = |_: &mut unreacted_core::Hooks<'_>| -> Result<_, HookError> {
        Ok(h!("section", { "id" => "main", "style" => Style::new().with("marginTop", "4px") },
            h!("input", { "type" => "checkbox", "checked" => true }),
            h!("p", { "className" => "note" }, "unchanged"),
        ))
    };

    runtime.render_component(component, root).unwrap();
    let before = document.mutation_count();
    let snapshot = document.snapshot(root).unwrap();

    runtime.render_component(component, root).unwrap();
    assert_eq!(document.mutation_count(), before);
    assert_eq!(document.snapshot(root).unwrap(), snapshot);
}

/// State set while a component renders is applied by a queued re-render,
/// never by a nested one.
#[test]
fn setter_during_render_is_queued() {
    let (document, root, runtime) = setup();
    let depth = Rc::new(Cell::new(0));
    let max_depth = Rc::new(Cell::new(0));

    let (d, m) = (depth.clone(), max_depth.clone());
    runtime
        .render_component(
            move |hooks| {
                d.set(d.get() + 1);
                m.set(m.get().max(d.get()));
                let (n, set_n) = hooks.use_state(0)?;
                if n < 3 {
                    set_n.set(n + 1);
                }
                d.set(d.get() - 1);
                Ok(h!("p", {}, n))
            },
            root,
        )
        .unwrap();

    assert_eq!(document.text_content(root).unwrap(), "3");
    assert_eq!(runtime.render_count(root), Some(4));
    assert_eq!(max_depth.get(), 1);
    assert!(!runtime.is_rendering(root));
}

/// A component that always changes its own state is cut off.
#[test]
fn runaway_rerender_hits_limit() {
    let document = Document::new();
    let root = document.create_element("div");
    let runtime = Runtime::with_config(document, RuntimeConfig::default().with_max_rerenders(5));

    let err = runtime
        .render_component(
            |hooks| {
                let (n, set_n) = hooks.use_state(0_u64)?;
                set_n.set(n + 1);
                Ok(h!("p", {}, n))
            },
            root,
        )
        .unwrap_err();

    assert_eq!(err, RenderError::RerenderLimit { container: root, limit: 5 });
    assert_eq!(runtime.render_count(root), Some(5));
    assert!(!runtime.is_rendering(root));
}

/// Changing the number of hook calls between renders is reported.
#[test]
fn hook_count_change_is_an_error() {
    let (_document, root, runtime) = setup();
    let extra = Rc::new(Cell::new(false));

    let flag = extra.clone();
    let component = move |hooks: &mut unreacted_core::Hooks<'_>| -> Result<_, HookError> {
        hooks.use_state(0)?;
        if flag.get() {
            hooks.use_effect(|| None, None)?;
        }
        Ok(h!("div"))
    };

    runtime.render_component(component.clone(), root).unwrap();
    extra.set(true);
    let err = runtime.render_component(component, root).unwrap_err();
    assert_eq!(
        err,
        RenderError::Hook(HookError::HookCountMismatch { expected: 1, found: 2 })
    );
}

/// An effect superseded before it ran is dropped.
#[test]
fn superseded_effect_never_runs() {
    let (_document, root, runtime) = setup();
    let seen = Rc::new(RefCell::new(Vec::new()));

    for value in 1..=3 {
        let seen = seen.clone();
        runtime
            .render_component(
                move |hooks| {
                    let seen = seen.clone();
                    hooks.use_effect(move || { seen.borrow_mut().push(value); None }, Some(deps![value]))?;
                    Ok(h!("div"))
                },
                root,
            )
            .unwrap();
    }

    assert_eq!(runtime.pending_effects(), 1);
    runtime.run_pending_effects();
    assert_eq!(*seen.borrow(), vec![3]);
}

/// Applying a property set and then removing it restores the element.
#[test]
fn props_round_trip() {
    let document = Document::new();
    let input = document.create_element("input");
    let clicks = Rc::new(Cell::new(0));

    let probe = clicks.clone();
    let full = props! {
        "className" => "field",
        "disabled" => true,
        "value" => "typed",
        "style" => Style::new().with("fontSize", "12px"),
        "onclick" => handler(move |_| probe.set(probe.get() + 1)),
        "data-id" => 7,
    };
    let empty = props! {};

    reconcile_props(&document, input, &full, &empty).unwrap();
    assert_eq!(document.attribute(input, "class").unwrap().as_deref(), Some("field"));
    assert_eq!(document.boolean_property(input, "disabled").unwrap(), Some(true));
    assert_eq!(document.value(input).unwrap().as_deref(), Some("typed"));
    document.dispatch_event(input, "click").unwrap();
    assert_eq!(clicks.get(), 1);

    reconcile_props(&document, input, &empty, &full).unwrap();
    assert_eq!(document.attribute(input, "class").unwrap(), None);
    assert_eq!(document.attribute(input, "data-id").unwrap(), None);
    assert_eq!(document.boolean_property(input, "disabled").unwrap(), Some(false));
    assert_eq!(document.style_text(input).unwrap(), "");
    assert_eq!(document.listener_count(input, "click").unwrap(), 0);
    document.dispatch_event(input, "click").unwrap();
    assert_eq!(clicks.get(), 1);
}

/// The live tree can be inspected as JSON.
#[test]
fn snapshot_serializes_rendered_tree() {
    let (document, root, runtime) = setup();

    runtime
        .render_component(|_| Ok(h!("ul", { "className" => "list" }, h!("li", {}, "one"))), root)
        .unwrap();

    let ul = child(&document, root, &[0]);
    assert_eq!(
        serde_json::to_value(document.snapshot(ul).unwrap()).unwrap(),
        json!({
            "kind": "element",
            "tag": "ul",
            "attributes": { "class": "list" },
            "children": [
                { "kind": "element", "tag": "li", "children": [{ "kind": "text", "text": "one" }] }
            ]
        })
    );
}

