//! Reconciliation
//!
//! Turns "old virtual tree, new virtual tree" into the minimal set of writes
//! against the live document.
//!
//! - [`reconcile_props`] patches one element's properties.
//! - [`Differ`] walks two trees and creates, removes, replaces or patches
//!   live nodes position by position.
//! - [`MatchStrategy`] decides which old child a new child is compared with;
//!   [`Positional`] matches by index.

mod diff;
mod props;
mod strategy;

pub use diff::{create_dom, diff, Differ};
pub use props::reconcile_props;
pub use strategy::{ChildPair, ChildPairs, MatchStrategy, Positional};
