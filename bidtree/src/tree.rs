//! Node storage shared by both indexes.
//!
//! Parents own their children outright (`Option<Box<Node>>`), there are no
//! parent pointers. Structural edits walk a `&mut Link` cursor down to the
//! affected slot and write the subtree's new root back into it, so no
//! operation recurses per tree level.

use crate::types::Bid;
use std::iter::FusedIterator;
use std::sync::Arc;

pub(crate) type Link = Option<Box<Node>>;

pub(crate) struct Node {
    pub(crate) bid: Arc<Bid>,
    pub(crate) left: Link,
    pub(crate) right: Link,
}

impl Node {
    pub(crate) fn new(bid: Arc<Bid>) -> Box<Self> {
        Box::new(Self {
            bid,
            left: None,
            right: None,
        })
    }
}

/// Detaches the leftmost node of the subtree in `slot`.
///
/// Its right child (if any) moves into the emptied slot.
pub(crate) fn take_min(mut slot: &mut Link) -> Option<Arc<Bid>> {
    while slot.as_ref().is_some_and(|n| n.left.is_some()) {
        if let Some(node) = slot {
            slot = &mut node.left;
        }
    }
    let min = slot.take()?;
    let Node { bid, right, .. } = *min;
    *slot = right;
    Some(bid)
}

/// Splices the node in `slot` out, leaving the subtree's new root there.
///
/// A single child is promoted into the node's place whichever side it hangs
/// on. With two children the in-order successor is pulled out of the right
/// subtree and its bid takes over this node.
pub(crate) fn unlink(slot: &mut Link) -> Option<Arc<Bid>> {
    let node = slot.as_mut()?;
    if node.left.is_some() && node.right.is_some() {
        let successor = take_min(&mut node.right)?;
        return Some(std::mem::replace(&mut node.bid, successor));
    }
    let mut node = slot.take()?;
    *slot = node.left.take().or_else(|| node.right.take());
    Some(node.bid)
}

/// Number of nodes on the longest root-to-leaf path.
pub(crate) fn height(root: &Link) -> usize {
    let mut deepest = 0;
    let mut stack: Vec<(&Node, usize)> = root.as_deref().map(|n| (n, 1)).into_iter().collect();
    while let Some((node, depth)) = stack.pop() {
        deepest = deepest.max(depth);
        for child in [node.left.as_deref(), node.right.as_deref()].into_iter().flatten() {
            stack.push((child, depth + 1));
        }
    }
    deepest
}

/// Frees a whole subtree without recursing, children before parents.
pub(crate) fn dismantle(root: Link) {
    let mut stack: Vec<Box<Node>> = root.into_iter().collect();
    while let Some(mut node) = stack.pop() {
        stack.extend(node.left.take());
        stack.extend(node.right.take());
    }
}

/// Ascending in-order walk (left, node, right).
///
/// Holds at most one pending node per tree level.
pub struct InOrder<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> InOrder<'a> {
    pub(crate) fn new(root: &'a Link) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left(root.as_deref());
        iter
    }

    fn push_left(&mut self, mut node: Option<&'a Node>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a> Iterator for InOrder<'a> {
    type Item = &'a Bid;

    fn next(&mut self) -> Option<&'a Bid> {
        let node = self.stack.pop()?;
        self.push_left(node.right.as_deref());
        Some(node.bid.as_ref())
    }
}

impl FusedIterator for InOrder<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: &str) -> Box<Node> {
        Node::new(Arc::new(Bid::new(id, "", "", 0.0)))
    }

    // b
    //  \
    //   d
    //  / \
    // c   e
    fn sample() -> Box<Node> {
        let mut d = leaf("d");
        d.left = Some(leaf("c"));
        d.right = Some(leaf("e"));
        let mut b = leaf("b");
        b.right = Some(d);
        b
    }

    fn ids(root: &Link) -> Vec<String> {
        InOrder::new(root).map(|b| b.id.clone()).collect()
    }

    #[test]
    fn in_order_empty() {
        let root: Link = None;
        assert_eq!(InOrder::new(&root).next(), None);
    }

    #[test]
    fn in_order_walks_left_node_right() {
        let root = Some(sample());
        assert_eq!(ids(&root), vec!["b", "c", "d", "e"]);
    }

    #[test]
    fn take_min_detaches_leftmost() {
        let mut root = Some(sample());
        let min = take_min(&mut root).map(|b| b.id.clone());
        assert_eq!(min.as_deref(), Some("b"));
        assert_eq!(ids(&root), vec!["c", "d", "e"]);
        assert!(take_min(&mut None).is_none());
    }

    #[test]
    fn take_min_walks_long_left_chain() {
        let mut root: Link = None;
        for i in 0..200_000u32 {
            let mut n = leaf(&format!("{i:06}"));
            n.left = root.take();
            root = Some(n);
        }
        let min = take_min(&mut root).map(|b| b.id.clone());
        assert_eq!(min.as_deref(), Some("000000"));
        assert_eq!(height(&root), 199_999);
        dismantle(root);
    }

    #[test]
    fn unlink_leaf_empties_slot() {
        let mut root = Some(leaf("x"));
        assert_eq!(unlink(&mut root).map(|b| b.id.clone()).as_deref(), Some("x"));
        assert!(root.is_none());
        assert!(unlink(&mut root).is_none());
    }

    #[test]
    fn unlink_promotes_single_right_child() {
        let mut root = Some(sample());
        let removed = unlink(&mut root).map(|b| b.id.clone());
        assert_eq!(removed.as_deref(), Some("b"));
        assert_eq!(root.as_ref().map(|n| n.bid.id.as_str()), Some("d"));
        assert_eq!(ids(&root), vec!["c", "d", "e"]);
    }

    #[test]
    fn unlink_promotes_single_left_child() {
        let mut e = leaf("e");
        e.left = Some(sample());
        let mut root = Some(e);
        let removed = unlink(&mut root).map(|b| b.id.clone());
        assert_eq!(removed.as_deref(), Some("e"));
        assert_eq!(ids(&root), vec!["b", "c", "d"]);
    }

    #[test]
    fn unlink_two_children_uses_successor() {
        let mut a = leaf("a");
        a.left = Some(leaf("0"));
        a.right = Some(sample());
        let mut root = Some(a);
        let removed = unlink(&mut root).map(|b| b.id.clone());
        assert_eq!(removed.as_deref(), Some("a"));
        // successor "b" moved up into the old slot
        assert_eq!(root.as_ref().map(|n| n.bid.id.as_str()), Some("b"));
        assert_eq!(ids(&root), vec!["0", "b", "c", "d", "e"]);
    }

    #[test]
    fn height_counts_levels() {
        assert_eq!(height(&None), 0);
        assert_eq!(height(&Some(leaf("x"))), 1);
        assert_eq!(height(&Some(sample())), 3);
    }

    #[test]
    fn dismantle_handles_deep_chain() {
        let mut root: Link = None;
        for _ in 0..200_000 {
            let mut n = leaf("x");
            n.right = root.take();
            root = Some(n);
        }
        dismantle(root);
    }
}
