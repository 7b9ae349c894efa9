use crate::tree::{self, InOrder, Link, Node};
use crate::types::Bid;
use std::iter::FusedIterator;
use std::sync::Arc;

/// Unbalanced BST keyed by bid amount.
///
/// Many bids share an amount, ties go right so equal amounts come out in
/// insertion order. Amounts are assumed finite (the catalog checks).
pub(crate) struct AmountIndex {
    root: Link,
    len: usize,
}

impl AmountIndex {
    pub(crate) fn new() -> Self {
        Self { root: None, len: 0 }
    }

    pub(crate) fn insert(&mut self, bid: Arc<Bid>) {
        let mut slot = &mut self.root;
        while let Some(node) = slot {
            slot = if bid.amount < node.bid.amount {
                &mut node.left
            } else {
                &mut node.right
            };
        }
        *slot = Some(Node::new(bid));
        self.len += 1;
    }

    /// Bids with `low <= amount <= high`, ascending.
    ///
    /// Bounds must already be validated, an inverted range just yields
    /// nothing.
    pub(crate) fn range(&self, low: f64, high: f64) -> Range<'_> {
        Range::new(&self.root, low, high)
    }

    /// Removes the node for `(amount, id)`.
    ///
    /// Amount picks the path, id picks the node among equal amounts.
    pub(crate) fn remove(&mut self, amount: f64, id: &str) -> Option<Arc<Bid>> {
        let path = locate(&self.root, amount, id)?;
        let mut slot = &mut self.root;
        for branch in path {
            if let Some(node) = slot {
                slot = match branch {
                    Branch::Left => &mut node.left,
                    Branch::Right => &mut node.right,
                };
            }
        }
        let removed = tree::unlink(slot)?;
        self.len -= 1;
        Some(removed)
    }

    pub(crate) fn iter(&self) -> InOrder<'_> {
        InOrder::new(&self.root)
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn height(&self) -> usize {
        tree::height(&self.root)
    }
}

impl Drop for AmountIndex {
    fn drop(&mut self) {
        tree::dismantle(self.root.take());
    }
}

#[derive(Clone, Copy)]
enum Branch {
    Left,
    Right,
}

/// Turns from the root to the node holding `(amount, id)`.
///
/// Among equal amounts the right side is searched first, since inserts send
/// ties there. The ordering only promises `<=` on the left, so left subtrees
/// of tied nodes stay queued as a fallback.
fn locate(root: &Link, amount: f64, id: &str) -> Option<Vec<Branch>> {
    let mut path = Vec::new();
    let mut pending: Vec<(usize, Option<Branch>, &Node)> = Vec::new();
    pending.extend(root.as_deref().map(|n| (0, None, n)));

    while let Some((depth, branch, node)) = pending.pop() {
        path.truncate(depth);
        path.extend(branch);
        let depth = path.len();
        let left = node.left.as_deref().map(|n| (depth, Some(Branch::Left), n));
        let right = node.right.as_deref().map(|n| (depth, Some(Branch::Right), n));

        if amount < node.bid.amount {
            pending.extend(left);
        } else if amount > node.bid.amount {
            pending.extend(right);
        } else if node.bid.id == id {
            return Some(path);
        } else {
            pending.extend(left);
            pending.extend(right);
        }
    }
    None
}

/// In-order walk restricted to `[low, high]`.
///
/// Left subtrees of nodes below `low` are never entered, and the walk stops
/// at the first amount above `high`.
pub struct Range<'a> {
    stack: Vec<&'a Node>,
    low: f64,
    high: f64,
}

impl<'a> Range<'a> {
    fn new(root: &'a Link, low: f64, high: f64) -> Self {
        let mut range = Self {
            stack: Vec::new(),
            low,
            high,
        };
        range.descend(root.as_deref());
        range
    }

    fn descend(&mut self, mut node: Option<&'a Node>) {
        while let Some(n) = node {
            if n.bid.amount < self.low {
                node = n.right.as_deref();
            } else {
                self.stack.push(n);
                node = n.left.as_deref();
            }
        }
    }
}

impl<'a> Iterator for Range<'a> {
    type Item = &'a Bid;

    fn next(&mut self) -> Option<&'a Bid> {
        let node = self.stack.pop()?;
        if node.bid.amount > self.high {
            self.stack.clear();
            return None;
        }
        self.descend(node.right.as_deref());
        Some(node.bid.as_ref())
    }
}

impl FusedIterator for Range<'_> {}
