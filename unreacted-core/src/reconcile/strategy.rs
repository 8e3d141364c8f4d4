//! Child Matching
//!
//! Decides which old child each new child is compared with. The differ only
//! consumes the resulting pairs, so a keyed strategy can be dropped in
//! without touching the diff algorithm itself.

use smallvec::SmallVec;

use crate::vdom::Child;

/// One comparison the differ has to make under a parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChildPair<'a> {
    pub new: Option<&'a Child>,
    pub old: Option<&'a Child>,
    /// Position of the live child this pair addresses.
    pub index: usize,
}

pub type ChildPairs<'a> = SmallVec<[ChildPair<'a>; 8]>;

/// Pairs up the children of two versions of the same element.
pub trait MatchStrategy {
    /// Produce the pairs in the order the differ must process them.
    fn pair<'a>(&self, new: &'a [Child], old: &'a [Child]) -> ChildPairs<'a>;
}

/// Match children by index.
///
/// Pairs `0..new.len()` left to right, then lists the surplus old children
/// as removals from the last one backwards, so each removal addresses a
/// live child that is still at its original index. Inserting or removing in
/// the middle of a list makes every later sibling compare against the wrong
/// old child; that is inherent to index matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Positional;

impl MatchStrategy for Positional {
    fn pair<'a>(&self, new: &'a [Child], old: &'a [Child]) -> ChildPairs<'a> {
        let mut pairs: ChildPairs<'a> = new
            .iter()
            .enumerate()
            .map(|(index, child)| ChildPair {
                new: Some(child),
                old: old.get(index),
                index,
            })
            .collect();

        pairs.extend((new.len()..old.len()).rev().map(|index| ChildPair {
            new: None,
            old: Some(&old[index]),
            index,
        }));

        pairs
    }
}
