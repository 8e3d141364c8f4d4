//! Tree Differ
//!
//! Walks an old and a new virtual tree side by side and patches the live
//! tree so it matches the new one.
//!
//! # Algorithm
//!
//! For every position under a live parent, in pre-order:
//!
//! 1. Nothing old, something new: materialize the new subtree and append it.
//! 2. Something old, nothing new: remove the live child at that index.
//! 3. Text vs element, different text, or different tag: materialize the new
//!    subtree and swap it in for the live child.
//!
//! Live subtrees dropped by steps 2 and 3 are freed right away, so ids into
//! them stop resolving.
//! 4. Same tag: patch the live element's properties, then recurse into the
//!    child pairs produced by the [`MatchStrategy`].
//!
//! Equal text leaves are left alone, so diffing a tree against itself does
//! not touch the live tree.

use tracing::{debug, trace};

use super::props::reconcile_props;
use super::strategy::{MatchStrategy, Positional};
use crate::dom::{Document, NodeId};
use crate::error::DomError;
use crate::vdom::{Child, Props};

/// Whether the live child for `old` cannot be patched into `new`.
fn needs_replace(new: &Child, old: &Child) -> bool {
    match (new, old) {
        (Child::Text(a), Child::Text(b)) => a != b,
        (Child::Element(a), Child::Element(b)) => a.tag() != b.tag(),
        _ => true,
    }
}

/// Recursive differ bound to one live document.
#[derive(Debug, Clone)]
pub struct Differ<'d, M = Positional> {
    document: &'d Document,
    strategy: M,
}

impl<'d> Differ<'d, Positional> {
    /// A differ using positional child matching.
    pub fn new(document: &'d Document) -> Self {
        Self {
            document,
            strategy: Positional,
        }
    }
}

impl<'d, M: MatchStrategy> Differ<'d, M> {
    /// A differ using a custom child matching strategy.
    pub fn with_strategy(document: &'d Document, strategy: M) -> Self {
        Self { document, strategy }
    }

    /// Patch the live child of `parent` at `index` from `old` to `new`.
    pub fn diff(
        &self,
        parent: NodeId,
        new: Option<&Child>,
        old: Option<&Child>,
        index: usize,
    ) -> Result<(), DomError> {
        match (new, old) {
            (None, None) => Ok(()),

            (Some(new), None) => {
                let node = self.create_dom(new)?;
                self.document.append_child(parent, node)?;
                trace!(%parent, %node, "appended new subtree");
                Ok(())
            }

            (None, Some(_)) => {
                if let Some(target) = self.document.child_at(parent, index)? {
                    self.document.remove_child(parent, target)?;
                    let freed = self.document.free_subtree(target)?;
                    trace!(%parent, %target, index, freed, "removed subtree");
                }
                Ok(())
            }

            (Some(new), Some(old)) if needs_replace(new, old) => {
                if let Some(target) = self.document.child_at(parent, index)? {
                    let node = self.create_dom(new)?;
                    self.document.replace_child(parent, node, target)?;
                    let freed = self.document.free_subtree(target)?;
                    trace!(%parent, %node, %target, index, freed, "replaced subtree");
                }
                Ok(())
            }

            (Some(Child::Element(new)), Some(Child::Element(old))) => {
                let Some(target) = self.document.child_at(parent, index)? else {
                    debug!(%parent, index, "no live child to patch");
                    return Ok(());
                };
                reconcile_props(self.document, target, new.props(), old.props())?;
                for pair in self.strategy.pair(new.children(), old.children()) {
                    self.diff(target, pair.new, pair.old, pair.index)?;
                }
                Ok(())
            }

            // Identical text.
            (Some(_), Some(_)) => Ok(()),
        }
    }

    /// Materialize a virtual subtree as a detached live subtree.
    pub fn create_dom(&self, child: &Child) -> Result<NodeId, DomError> {
        match child {
            Child::Text(text) => Ok(self.document.create_text(text)),
            Child::Element(node) => {
                let element = self.document.create_element(node.tag());
                reconcile_props(self.document, element, node.props(), &Props::new())?;
                for child in node.children() {
                    let live = self.create_dom(child)?;
                    self.document.append_child(element, live)?;
                }
                Ok(element)
            }
        }
    }
}

/// Diff with positional matching. See [`Differ::diff`].
pub fn diff(
    document: &Document,
    parent: NodeId,
    new: Option<&Child>,
    old: Option<&Child>,
    index: usize,
) -> Result<(), DomError> {
    Differ::new(document).diff(parent, new, old, index)
}

/// Materialize a virtual subtree. See [`Differ::create_dom`].
pub fn create_dom(document: &Document, child: &Child) -> Result<NodeId, DomError> {
    Differ::new(document).create_dom(child)
}
