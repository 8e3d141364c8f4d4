//! Starter app: a counter rendered into an in-memory document.
//!
//! Replace `counter` with your own component and render it the same way.

use unreacted_core::vdom::{handler, Style};
use unreacted_core::{h, Document, HookError, Hooks, Runtime, VNode};

fn counter(hooks: &mut Hooks<'_>) -> Result<VNode, HookError> {
    let (count, set_count) = hooks.use_state(0)?;
    tracing::debug!(count, "rendering counter");

    let decrement = set_count.clone();
    Ok(h!("div", {},
        h!("h1", {}, format!("Count: {count}")),
        h!("button", { "onclick" => handler(move |_| { set_count.set(count + 1); }) }, "Increment"),
        h!("button", {
            "onclick" => handler(move |_| { decrement.set(count - 1); }),
            "style" => Style::new().with("marginLeft", "5px"),
        }, "Decrement"),
    ))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let document = Document::new();
    let root = document.create_element("div");
    document.set_attribute(root, "id", "root")?;

    let runtime = Runtime::new(document.clone());
    runtime.render_component(counter, root)?;
    println!("{}", document.outer_html(root)?);

    let app = document.child_at(root, 0)?.ok_or("nothing rendered")?;
    let increment = document.child_at(app, 1)?.ok_or("missing button")?;
    for _ in 0..3 {
        document.dispatch_event(increment, "click")?;
    }
    println!("{}", document.outer_html(root)?);

    Ok(())
}
