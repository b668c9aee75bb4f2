//! Bottom-up leaf cursor (spec.md §4.10's "iterator / stack cursor"):
//! a stack of ancestor frames plus the current leaf, advanced one leaf
//! at a time rather than re-descending from the root on every step.
//! Consumed by the list façade's iterators, which live outside this
//! crate's scope — this only exposes the stride primitive.

use std::rc::Rc;

use super::{full_size, radix_slot, Leaf, Node, SHIFT};

struct Frame<T> {
    node: Rc<Node<T>>,
    shift: usize,
    slot: usize,
}

/// Forward/backward traversal over the leaves of a trie plus its tail,
/// without re-walking the spine from the root for every element. Tied to
/// the `fork_id` it was built from: a caller holding a longer-lived
/// reference should compare that id against the container's current one
/// before trusting a cursor obtained earlier (spec.md §4.10,
/// concurrent-modification signaling).
pub struct LeafCursor<T> {
    stack: Vec<Frame<T>>,
    leaf: Option<Leaf<T>>,
    leaf_start: usize,
    tail: Leaf<T>,
    tail_offset: usize,
    size: usize,
    pos: usize,
    fork_id: u64,
}

impl<T: Clone> LeafCursor<T> {
    pub(crate) fn new(
        root: Option<Rc<Node<T>>>,
        root_shift: usize,
        tail: Leaf<T>,
        size: usize,
        fork_id: u64,
        start_index: usize,
    ) -> Self {
        let tail_offset = size - tail.len();
        let mut cursor = LeafCursor {
            stack: Vec::new(),
            leaf: None,
            leaf_start: tail_offset,
            tail,
            tail_offset,
            size,
            pos: start_index.min(size),
            fork_id,
        };
        cursor.rebuild_at(root, root_shift, cursor.pos);
        cursor
    }

    /// The `fork_id` this cursor was built against, for a caller to
    /// compare with the container's current one.
    pub fn fork_id(&self) -> u64 {
        self.fork_id
    }

    /// Current logical position, `0..=size`.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The element at the cursor's current position, or `None` at the end.
    pub fn current(&self) -> Option<&T> {
        if self.pos >= self.size {
            return None;
        }
        if self.pos >= self.tail_offset {
            return self.tail.get(self.pos - self.tail_offset);
        }
        self.leaf
            .as_ref()
            .and_then(|l| l.get(self.pos - self.leaf_start))
    }

    /// Moves one element forward. Returns `false` once the cursor is
    /// already at `size` (a no-op past the end).
    pub fn advance(&mut self) -> bool {
        if self.pos >= self.size {
            return false;
        }
        self.pos += 1;
        if self.pos >= self.size {
            return true;
        }
        if self.pos >= self.tail_offset {
            self.leaf = None;
            return true;
        }
        let in_current_leaf = self
            .leaf
            .as_ref()
            .is_some_and(|l| self.pos - self.leaf_start < l.len());
        if !in_current_leaf {
            self.advance_to_next_leaf();
        }
        true
    }

    /// Moves one element backward. Returns `false` at position `0`.
    pub fn retreat(&mut self) -> bool {
        if self.pos == 0 {
            return false;
        }
        self.pos -= 1;
        if self.pos >= self.tail_offset {
            self.leaf = None;
            return true;
        }
        let in_current_leaf = self.leaf.is_some() && self.pos >= self.leaf_start;
        if !in_current_leaf {
            self.retreat_to_prev_leaf();
        }
        true
    }

    fn advance_to_next_leaf(&mut self) {
        while let Some(top) = self.stack.last_mut() {
            let branch = top.node.as_branch();
            if top.slot + 1 < branch.children.len() {
                top.slot += 1;
                break;
            }
            self.stack.pop();
        }
        if self.stack.is_empty() {
            self.leaf = None;
            return;
        }
        self.leaf_start = self.frame_base();
        self.descend_leftmost();
    }

    fn retreat_to_prev_leaf(&mut self) {
        while let Some(top) = self.stack.last_mut() {
            if top.slot > 0 {
                top.slot -= 1;
                break;
            }
            self.stack.pop();
        }
        if self.stack.is_empty() {
            self.leaf = None;
            return;
        }
        self.leaf_start = self.frame_base();
        self.descend_rightmost();
    }

    /// Sum, over the stack, of elements addressed by sibling slots before
    /// the one each frame currently points at.
    fn frame_base(&self) -> usize {
        let mut base = 0usize;
        for frame in &self.stack {
            if frame.slot == 0 {
                continue;
            }
            let branch = frame.node.as_branch();
            let child_shift = frame.shift - SHIFT;
            base += match &branch.sizes {
                Some(table) => table.get(frame.slot - 1),
                None => frame.slot * full_size(child_shift),
            };
        }
        base
    }

    fn descend_leftmost(&mut self) {
        loop {
            let (child, child_shift) = {
                let top = self.stack.last().unwrap();
                let branch = top.node.as_branch();
                (branch.children[top.slot].clone(), top.shift - SHIFT)
            };
            match child.as_ref() {
                Node::Leaf(l) => {
                    self.leaf = Some(l.clone());
                    break;
                }
                Node::Branch(_) => {
                    self.stack.push(Frame {
                        node: child,
                        shift: child_shift,
                        slot: 0,
                    });
                }
            }
        }
    }

    fn descend_rightmost(&mut self) {
        loop {
            let (child, child_shift) = {
                let top = self.stack.last().unwrap();
                let branch = top.node.as_branch();
                (branch.children[top.slot].clone(), top.shift - SHIFT)
            };
            match child.as_ref() {
                Node::Leaf(l) => {
                    self.leaf = Some(l.clone());
                    break;
                }
                Node::Branch(b) => {
                    let last = b.children.len() - 1;
                    self.stack.push(Frame {
                        node: child,
                        shift: child_shift,
                        slot: last,
                    });
                }
            }
        }
        self.leaf_start = self.frame_base();
    }

    fn rebuild_at(&mut self, root: Option<Rc<Node<T>>>, root_shift: usize, index: usize) {
        self.stack.clear();
        self.leaf = None;
        self.leaf_start = self.tail_offset;
        if index >= self.tail_offset || root.is_none() {
            return;
        }
        let mut node = root.unwrap();
        let mut shift = root_shift;
        let mut base = 0usize;
        loop {
            match node.as_ref() {
                Node::Leaf(l) => {
                    self.leaf = Some(l.clone());
                    self.leaf_start = base;
                    return;
                }
                Node::Branch(b) => {
                    let local_index = index - base;
                    let guess = radix_slot(local_index, shift);
                    let slot = match &b.sizes {
                        Some(table) => table.locate(local_index, guess).0,
                        None => guess,
                    };
                    let child_shift = shift - SHIFT;
                    if slot > 0 {
                        base += match &b.sizes {
                            Some(table) => table.get(slot - 1),
                            None => slot * full_size(child_shift),
                        };
                    }
                    self.stack.push(Frame {
                        node: node.clone(),
                        shift,
                        slot,
                    });
                    node = b.children[slot].clone();
                    shift = child_shift;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::bulk::{bulk_append, SrcMode};

    #[test]
    fn forward_traversal_visits_every_element_in_order() {
        let src: Vec<i32> = (0..300).collect();
        let (root, shift, tail) = bulk_append(None, 0, Leaf::new(), &src, SrcMode::NeverEmptySrc);
        let size = root.as_ref().map_or(0, |r| r.len(shift)) + tail.len();
        let mut cursor = LeafCursor::new(root, shift, tail, size, 0, 0);
        let mut seen = Vec::with_capacity(size);
        loop {
            match cursor.current() {
                Some(v) => seen.push(*v),
                None => break,
            }
            if !cursor.advance() {
                break;
            }
        }
        assert_eq!(seen, src);
    }

    #[test]
    fn backward_traversal_from_end_visits_every_element_in_reverse() {
        let src: Vec<i32> = (0..130).collect();
        let (root, shift, tail) = bulk_append(None, 0, Leaf::new(), &src, SrcMode::NeverEmptySrc);
        let size = root.as_ref().map_or(0, |r| r.len(shift)) + tail.len();
        let mut cursor = LeafCursor::new(root, shift, tail, size, 0, size);
        let mut seen = Vec::with_capacity(size);
        while cursor.retreat() {
            if let Some(v) = cursor.current() {
                seen.push(*v);
            }
        }
        seen.reverse();
        assert_eq!(seen, src);
    }
}
