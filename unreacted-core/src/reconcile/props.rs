//! Property Reconciler
//!
//! Patches one live element from an old property set to a new one. Two
//! passes run in order:
//!
//! 1. Removal: every key present in the old set and absent from the new one
//!    is undone (listener detached, attribute removed, style cleared, ...).
//! 2. Apply: every key of the new set whose value differs from the old value
//!    is written.
//!
//! A key is handled by at most one of the passes in a single call.

use tracing::{trace, warn};

use crate::dom::{Document, NodeId};
use crate::error::DomError;
use crate::vdom::{PropValue, Props};

/// `onclick` -> `click`. `None` if the key is not an event key.
fn event_name(key: &str) -> Option<String> {
    key.strip_prefix("on").map(str::to_ascii_lowercase)
}

/// Patch `node` so that it reflects `new_props` instead of `old_props`.
pub fn reconcile_props(
    document: &Document,
    node: NodeId,
    new_props: &Props,
    old_props: &Props,
) -> Result<(), DomError> {
    for (key, old_value) in old_props.iter() {
        if !new_props.contains_key(key) {
            remove_prop(document, node, key, old_value)?;
        }
    }

    for (key, new_value) in new_props.iter() {
        let old_value = old_props.get(key);
        if old_value != Some(new_value) {
            apply_prop(document, node, key, new_value, old_value)?;
        }
    }

    Ok(())
}

fn remove_prop(document: &Document, node: NodeId, key: &str, old_value: &PropValue) -> Result<(), DomError> {
    trace!(%node, key, "remove prop");

    if let Some(event) = event_name(key) {
        if let Some(handler) = old_value.as_handler() {
            document.remove_event_listener(node, &event, handler)?;
        }
        return Ok(());
    }

    match key {
        "children" => {}
        "style" => document.clear_style(node)?,
        "className" => document.remove_attribute(node, "class")?,
        _ if document.has_boolean_property(node, key)? => {
            document.set_boolean_property(node, key, false)?;
            document.remove_attribute(node, key)?;
        }
        _ => document.remove_attribute(node, key)?,
    }
    Ok(())
}

fn apply_prop(
    document: &Document,
    node: NodeId,
    key: &str,
    value: &PropValue,
    old_value: Option<&PropValue>,
) -> Result<(), DomError> {
    trace!(%node, key, %value, "apply prop");

    if let Some(event) = event_name(key) {
        if let Some(old) = old_value.and_then(PropValue::as_handler) {
            document.remove_event_listener(node, &event, old)?;
        }
        match value {
            PropValue::Handler(handler) => {
                document.add_event_listener(node, &event, handler.clone())?;
            }
            PropValue::Null => {}
            other => {
                warn!(%node, event = %event, value = %other, "invalid event handler; listener not attached");
            }
        }
        return Ok(());
    }

    match (key, value) {
        ("children", _) => {}
        ("style", PropValue::Style(style)) => {
            document.clear_style(node)?;
            for (property, declared) in style.iter() {
                document.set_style_property(node, property, declared)?;
            }
        }
        ("className", _) => document.set_attribute(node, "class", &value.to_attribute_string())?,
        _ if document.has_boolean_property(node, key)? => {
            let enabled = value.is_truthy();
            document.set_boolean_property(node, key, enabled)?;
            if enabled {
                document.set_attribute(node, key, "")?;
            } else {
                document.remove_attribute(node, key)?;
            }
        }
        ("value", _) if document.is_form_control(node)? => {
            let text = value.to_attribute_string();
            if document.value(node)?.as_deref() != Some(text.as_str()) {
                document.set_value(node, &text)?;
            }
            document.set_attribute(node, key, &text)?;
        }
        _ => document.set_attribute(node, key, &value.to_attribute_string())?,
    }
    Ok(())
}
