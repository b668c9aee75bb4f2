//! Concatenating two tries with rebalancing (spec.md §4.7). The classic
//! RRB merge walks the rightmost spine of the left trie and the leftmost
//! spine of the right trie at matching heights, merges what meets in the
//! middle, and repacks any level left with more nodes than the
//! search-step invariant allows. This walks the same spines but rebuilds
//! each level from a flat list of already-built children rather than
//! shifting elements between nodes in place — easier to get right, same
//! `O(log n)` cost, same resulting invariant.

use std::rc::Rc;

use arrayvec::ArrayVec;

use super::node::collapse_singletons;
use super::{Branch, Node, SHIFT, SPAN};
use crate::trie::MARGIN;

/// Concatenates two (non-empty) trie roots at possibly different heights,
/// returning the new root and its shift. Either side may be `None` (an
/// empty trie contributes nothing).
pub(crate) fn concat_tries<T: Clone>(
    left: Option<Rc<Node<T>>>,
    left_shift: usize,
    right: Option<Rc<Node<T>>>,
    right_shift: usize,
) -> (Option<Rc<Node<T>>>, usize) {
    let (left, right) = match (left, right) {
        (None, None) => return (None, 0),
        (Some(l), None) => return (Some(l), left_shift),
        (None, Some(r)) => return (Some(r), right_shift),
        (Some(l), Some(r)) => (l, r),
    };

    let (mut parts, mut shift) = concat_rec(left, left_shift, right, right_shift);
    let root = if parts.len() == 1 {
        parts.pop().unwrap()
    } else {
        let mut children: ArrayVec<Rc<Node<T>>, SPAN> = ArrayVec::new();
        children.extend(parts.into_iter());
        shift += SHIFT;
        Rc::new(Node::Branch(Branch::from_children(shift, children)))
    };
    let (root, shift) = collapse_singletons(root, shift);
    (Some(root), shift)
}

/// Merges `left`/`right`, returning one or two nodes that both live at
/// `shift` (the higher of the two input shifts) along with that shift.
fn concat_rec<T: Clone>(
    left: Rc<Node<T>>,
    left_shift: usize,
    right: Rc<Node<T>>,
    right_shift: usize,
) -> (ArrayVec<Rc<Node<T>>, 2>, usize) {
    use std::cmp::Ordering;

    match left_shift.cmp(&right_shift) {
        Ordering::Greater => {
            let lb = left.as_branch();
            let last = lb.children.len() - 1;
            let child_shift = left_shift - SHIFT;
            let (merged, _) = concat_rec(lb.children[last].clone(), child_shift, right, right_shift);
            let mut combined: Vec<Rc<Node<T>>> = Vec::with_capacity(last + merged.len());
            combined.extend(lb.children[..last].iter().cloned());
            combined.extend(merged);
            (rebalance_pack(combined, left_shift), left_shift)
        }
        Ordering::Less => {
            let rb = right.as_branch();
            let child_shift = right_shift - SHIFT;
            let (merged, _) = concat_rec(left, left_shift, rb.children[0].clone(), child_shift);
            let mut combined: Vec<Rc<Node<T>>> = Vec::with_capacity(merged.len() + rb.children.len() - 1);
            combined.extend(merged);
            combined.extend(rb.children[1..].iter().cloned());
            (rebalance_pack(combined, right_shift), right_shift)
        }
        Ordering::Equal if left_shift == 0 => {
            let ll = left.as_leaf();
            let rl = right.as_leaf();
            let mut out: ArrayVec<Rc<Node<T>>, 2> = ArrayVec::new();
            if ll.len() + rl.len() <= SPAN {
                let mut merged = ll.clone();
                merged.extend(rl.iter().cloned());
                out.push(Rc::new(Node::Leaf(merged)));
            } else {
                out.push(Rc::new(Node::Leaf(ll.clone())));
                out.push(Rc::new(Node::Leaf(rl.clone())));
            }
            (out, 0)
        }
        Ordering::Equal => {
            let lb = left.as_branch();
            let rb = right.as_branch();
            let child_shift = left_shift - SHIFT;
            let (middle, _) = concat_rec(
                lb.children.last().unwrap().clone(),
                child_shift,
                rb.children[0].clone(),
                child_shift,
            );
            let mut combined: Vec<Rc<Node<T>>> =
                Vec::with_capacity(lb.children.len() - 1 + middle.len() + rb.children.len() - 1);
            combined.extend(lb.children[..lb.children.len() - 1].iter().cloned());
            combined.extend(middle);
            combined.extend(rb.children[1..].iter().cloned());
            (rebalance_pack(combined, left_shift), left_shift)
        }
    }
}

/// Number of grandchildren (elements for a leaf-level child, slots for a
/// branch-level one) that `child` — itself addressed with `child_shift`
/// — contributes.
fn grandchild_count<T: Clone>(child: &Rc<Node<T>>, child_shift: usize) -> usize {
    if child_shift == 0 {
        child.as_leaf().len()
    } else {
        child.as_branch().children.len()
    }
}

/// Packs `children` (all addressed with `shift - SHIFT`) into one or two
/// nodes addressed with `shift`, satisfying the search-step invariant: a
/// relaxed lookup may advance past at most `MARGIN` slots per level. If
/// the input already fits that bound in a single node, it is wrapped
/// as-is; otherwise the grandchildren are flattened and repacked into
/// densely-filled nodes (all but the last exactly `SPAN` wide).
fn rebalance_pack<T: Clone>(children: Vec<Rc<Node<T>>>, shift: usize) -> ArrayVec<Rc<Node<T>>, 2> {
    let mut out: ArrayVec<Rc<Node<T>>, 2> = ArrayVec::new();
    if children.is_empty() {
        return out;
    }
    let child_shift = shift - SHIFT;
    let n = children.len();
    let total: usize = children
        .iter()
        .map(|c| grandchild_count(c, child_shift))
        .sum();
    let min_nodes = total.div_ceil(SPAN).max(1);
    let max_tolerated = min_nodes + MARGIN;

    if n <= SPAN && n <= max_tolerated {
        let mut as_arrayvec: ArrayVec<Rc<Node<T>>, SPAN> = ArrayVec::new();
        as_arrayvec.extend(children);
        out.push(Rc::new(Node::Branch(Branch::from_children(
            shift,
            as_arrayvec,
        ))));
        return out;
    }

    let repacked = if child_shift == 0 {
        let mut elems: Vec<T> = Vec::with_capacity(total);
        for c in &children {
            elems.extend(c.as_leaf().iter().cloned());
        }
        elems
            .chunks(SPAN)
            .map(|chunk| {
                let mut leaf: super::Leaf<T> = ArrayVec::new();
                leaf.extend(chunk.iter().cloned());
                Rc::new(Node::Leaf(leaf))
            })
            .collect::<Vec<_>>()
    } else {
        let mut grandchildren: Vec<Rc<Node<T>>> = Vec::with_capacity(total);
        for c in &children {
            grandchildren.extend(c.as_branch().children.iter().cloned());
        }
        grandchildren
            .chunks(SPAN)
            .map(|chunk| {
                let mut group: ArrayVec<Rc<Node<T>>, SPAN> = ArrayVec::new();
                group.extend(chunk.iter().cloned());
                Rc::new(Node::Branch(Branch::from_children(child_shift, group)))
            })
            .collect::<Vec<_>>()
    };

    let k = repacked.len();
    if k <= SPAN {
        let mut as_arrayvec: ArrayVec<Rc<Node<T>>, SPAN> = ArrayVec::new();
        as_arrayvec.extend(repacked);
        out.push(Rc::new(Node::Branch(Branch::from_children(
            shift,
            as_arrayvec,
        ))));
    } else {
        let mid = k / 2;
        let mut first: ArrayVec<Rc<Node<T>>, SPAN> = ArrayVec::new();
        first.extend(repacked[..mid].iter().cloned());
        let mut second: ArrayVec<Rc<Node<T>>, SPAN> = ArrayVec::new();
        second.extend(repacked[mid..].iter().cloned());
        out.push(Rc::new(Node::Branch(Branch::from_children(shift, first))));
        out.push(Rc::new(Node::Branch(Branch::from_children(shift, second))));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::bulk::{bulk_append, SrcMode};
    use crate::trie::Leaf;

    fn build(n: usize) -> (Rc<Node<i32>>, usize) {
        let src: Vec<i32> = (0..n as i32).collect();
        let (root, shift, _) = bulk_append(None, 0, Leaf::new(), &src, SrcMode::AlwaysEmptySrc);
        (root.unwrap(), shift)
    }

    #[test]
    fn concat_preserves_total_length_small() {
        let (l, ls) = build(50);
        let (r, rs) = build(40);
        let (root, shift) = concat_tries(Some(l), ls, Some(r), rs);
        assert_eq!(root.unwrap().len(shift), 90);
    }

    #[test]
    fn concat_preserves_total_length_uneven_heights() {
        let (l, ls) = build(2000);
        let (r, rs) = build(5);
        let (root, shift) = concat_tries(Some(l), ls, Some(r), rs);
        assert_eq!(root.unwrap().len(shift), 2005);
    }

    #[test]
    fn concat_with_one_side_empty_returns_other_unchanged() {
        let (l, ls) = build(100);
        let (root, shift) = concat_tries(Some(l.clone()), ls, None, 0);
        assert_eq!(root.unwrap().len(shift), l.len(ls));
    }
}
