//! Order-statistic layer over [`Avl`]: a subtree-size summary plus
//! visitor-driven descents from the root.

use super::avl::{summary, Avl, Summary};

/// Subtree node count; the summary that turns a tree into an
/// order-statistic structure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SubtreeSize(pub u32);

impl Summary for SubtreeSize {
    fn combine(left: Option<Self>, right: Option<Self>) -> Self {
        SubtreeSize(1 + left.map_or(0, |s| s.0) + right.map_or(0, |s| s.0))
    }
}

/// A visitor's decision at each node of a rank descent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    Left,
    Right,
    Stop,
}

/// Tree of bare keys ranked by their subtree sizes.
pub(crate) type RankedAvl<K> = Avl<K, (), SubtreeSize>;

impl<K: Ord> Avl<K, (), SubtreeSize> {
    /// Walk down from the root, delegating the direction to `visitor`,
    /// which sees the current key and the summaries of both children.
    ///
    /// Returns the key the walk stopped at, or `None` when it stepped into
    /// an empty subtree.
    pub fn descend<F>(&self, mut visitor: F) -> Option<&K>
    where
        F: FnMut(&K, Option<SubtreeSize>, Option<SubtreeSize>) -> Step,
    {
        let mut current = self.root.as_deref()?;
        loop {
            match visitor(&current.k, summary(&current.l), summary(&current.r)) {
                Step::Stop => return Some(&current.k),
                Step::Left => current = current.l.as_deref()?,
                Step::Right => current = current.r.as_deref()?,
            }
        }
    }

    /// Select the 1-based `i`-th largest key.
    ///
    /// At every node, with `r` the size of the right subtree: the node
    /// itself is the answer when `r == i - 1`, the answer sits to the right
    /// when `r > i - 1`, and otherwise to the left with `i` shrunk past the
    /// right subtree and the node itself.
    pub fn select_from_top(&self, i: usize) -> Option<&K> {
        if i == 0 || i > self.len() {
            return None;
        }

        let mut remaining = i;
        self.descend(|_, _, right| {
            let r = right.map_or(0, |s| s.0 as usize);
            if r == remaining - 1 {
                Step::Stop
            } else if r > remaining - 1 {
                Step::Right
            } else {
                remaining -= r + 1;
                Step::Left
            }
        })
    }
}
