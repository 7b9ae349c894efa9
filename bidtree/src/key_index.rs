use crate::tree::{self, InOrder, Link, Node};
use crate::types::Bid;
use std::cmp::Ordering;
use std::sync::Arc;

/// Unbalanced BST keyed by bid id (byte-wise string order).
///
/// Equal ids route right. Uniqueness is the caller's job, so a shadowed
/// duplicate is never reported by `lookup`.
pub(crate) struct KeyIndex {
    root: Link,
    len: usize,
}

impl KeyIndex {
    pub(crate) fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Attaches `bid` as a new leaf.
    pub(crate) fn insert(&mut self, bid: Arc<Bid>) {
        let mut slot = &mut self.root;
        while let Some(node) = slot {
            slot = if bid.id < node.bid.id {
                &mut node.left
            } else {
                &mut node.right
            };
        }
        *slot = Some(Node::new(bid));
        self.len += 1;
    }

    /// First bid with this id met on the way down, if any.
    pub(crate) fn lookup(&self, id: &str) -> Option<&Arc<Bid>> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match id.cmp(node.bid.id.as_str()) {
                Ordering::Equal => return Some(&node.bid),
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
        }
        None
    }

    /// Removes the node holding `id`. Absent ids leave the tree untouched.
    pub(crate) fn remove(&mut self, id: &str) -> Option<Arc<Bid>> {
        let mut slot = &mut self.root;
        while let Some(ord) = slot.as_ref().map(|n| id.cmp(n.bid.id.as_str())) {
            if ord == Ordering::Equal {
                break;
            }
            if let Some(node) = slot {
                slot = if ord == Ordering::Less {
                    &mut node.left
                } else {
                    &mut node.right
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

impl Drop for KeyIndex {
    fn drop(&mut self) {
        tree::dismantle(self.root.take());
    }
}
