//! Cutting a trie into a prefix and a suffix (spec.md §4.5). Implemented
//! as two independent single-sided cuts rather than one dual-fork descent
//! — `prefix` only depends on `lo`, `suffix` only on `hi`, so splitting the
//! walk in two is equivalent and considerably simpler to get right, at
//! the cost of walking the shared upper spine twice instead of once.
//! Both cuts stay `O(log n)`, so the combined split remains `O(log n)`.

use std::rc::Rc;

use arrayvec::ArrayVec;

use super::{radix_slot, Branch, Node, SHIFT, SPAN};

fn locate<T: Clone>(branch: &Branch<T>, shift: usize, index: usize) -> (usize, usize) {
    let guess = radix_slot(index, shift);
    match &branch.sizes {
        Some(table) => table.locate(index, guess),
        None => (guess, index - guess * super::full_size(shift - SHIFT)),
    }
}

/// Elements `[0, idx)` of the subtree rooted at `node` (which addresses
/// `node.len(shift)` elements in total).
pub(crate) fn cut_left<T: Clone>(
    node: Option<&Rc<Node<T>>>,
    shift: usize,
    idx: usize,
) -> Option<Rc<Node<T>>> {
    let node = node?;
    if idx == 0 {
        return None;
    }
    if idx >= node.len(shift) {
        return Some(node.clone());
    }
    match node.as_ref() {
        Node::Leaf(l) => {
            let mut new_leaf: super::Leaf<T> = ArrayVec::new();
            new_leaf.extend(l[..idx].iter().cloned());
            Some(Rc::new(Node::Leaf(new_leaf)))
        }
        Node::Branch(b) => {
            let child_shift = shift - SHIFT;
            let (slot, local) = locate(b, shift, idx - 1);
            let mut new_children: ArrayVec<Rc<Node<T>>, SPAN> = ArrayVec::new();
            for child in &b.children[..slot] {
                new_children.push(child.clone());
            }
            let boundary = cut_left(Some(&b.children[slot]), child_shift, local + 1)
                .expect("boundary child always keeps at least one element");
            new_children.push(boundary);
            Some(Rc::new(Node::Branch(Branch::from_children(
                shift,
                new_children,
            ))))
        }
    }
}

/// Elements `[idx, len)` of the subtree rooted at `node`.
pub(crate) fn cut_right<T: Clone>(
    node: Option<&Rc<Node<T>>>,
    shift: usize,
    idx: usize,
) -> Option<Rc<Node<T>>> {
    let node = node?;
    if idx == 0 {
        return Some(node.clone());
    }
    if idx >= node.len(shift) {
        return None;
    }
    match node.as_ref() {
        Node::Leaf(l) => {
            let mut new_leaf: super::Leaf<T> = ArrayVec::new();
            new_leaf.extend(l[idx..].iter().cloned());
            Some(Rc::new(Node::Leaf(new_leaf)))
        }
        Node::Branch(b) => {
            let child_shift = shift - SHIFT;
            let (slot, local) = locate(b, shift, idx);
            let mut new_children: ArrayVec<Rc<Node<T>>, SPAN> = ArrayVec::new();
            let boundary = cut_right(Some(&b.children[slot]), child_shift, local)
                .expect("boundary child always keeps at least one element");
            new_children.push(boundary);
            for child in &b.children[slot + 1..] {
                new_children.push(child.clone());
            }
            Some(Rc::new(Node::Branch(Branch::from_children(
                shift,
                new_children,
            ))))
        }
    }
}

/// Splits `[0, lo)` / `[hi, len)` out of `root`, discarding `[lo, hi)`.
pub(crate) fn split_discard<T: Clone>(
    root: Option<Rc<Node<T>>>,
    shift: usize,
    lo: usize,
    hi: usize,
) -> (Option<Rc<Node<T>>>, Option<Rc<Node<T>>>) {
    let prefix = cut_left(root.as_ref(), shift, lo);
    let suffix = cut_right(root.as_ref(), shift, hi);
    (prefix, suffix)
}

/// Extracts just `[lo, hi)` out of `root`, discarding both edges.
pub(crate) fn extract_range<T: Clone>(
    root: Option<Rc<Node<T>>>,
    shift: usize,
    lo: usize,
    hi: usize,
) -> Option<Rc<Node<T>>> {
    let prefix = cut_left(root.as_ref(), shift, hi);
    cut_right(prefix.as_ref(), shift, lo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::bulk::{bulk_append, SrcMode};
    use crate::trie::Leaf;

    #[test]
    fn split_discard_preserves_element_sequence_on_either_side() {
        let src: Vec<i32> = (0..500).collect();
        let (root, shift, _tail) = bulk_append(None, 0, Leaf::new(), &src, SrcMode::AlwaysEmptySrc);
        let (prefix, suffix) = split_discard(root, shift, 100, 400);
        let prefix_len = prefix.as_ref().map_or(0, |r| r.len(shift));
        let suffix_len = suffix.as_ref().map_or(0, |r| r.len(shift));
        assert_eq!(prefix_len, 100);
        assert_eq!(suffix_len, 100);
    }

    #[test]
    fn extract_range_keeps_only_the_middle_slice() {
        let src: Vec<i32> = (0..500).collect();
        let (root, shift, _tail) = bulk_append(None, 0, Leaf::new(), &src, SrcMode::AlwaysEmptySrc);
        let middle = extract_range(root, shift, 100, 400);
        assert_eq!(middle.as_ref().unwrap().len(shift), 300);
    }
}
