//! Tail pushdown (spec.md §4.2) and tail pullup (§4.3): the two
//! operations that move content between the tail buffer and the trie
//! proper, and the only places that grow or shrink the trie's height.

use std::rc::Rc;

use arrayvec::ArrayVec;

use super::node::collapse_singletons;
use super::{Branch, Leaf, Node, OwnershipBits, SHIFT, SPAN};

/// Pushes `tail` down into `root` as the new rightmost leaf, claiming
/// ownership along the right spine. Assumes (as the container invariant
/// guarantees) that the current rightmost leaf of `root`, if any, is full
/// — the only child strictness ever allows to be non-full is the very
/// last one, and pushdown only ever appends after it.
pub(crate) fn push_tail_into_trie<T: Clone>(
    root: Option<Rc<Node<T>>>,
    root_shift: usize,
    tail: Leaf<T>,
) -> (Rc<Node<T>>, usize) {
    let root = match root {
        None => return (Rc::new(Node::Leaf(tail)), 0),
        Some(root) => root,
    };

    if root_shift == 0 {
        // The trie is a single leaf; grow a branch above it.
        let mut children: ArrayVec<Rc<Node<T>>, SPAN> = ArrayVec::new();
        children.push(root);
        children.push(build_skinny_path(0, tail));
        return (
            Rc::new(Node::Branch(Branch::from_children(SHIFT, children))),
            SHIFT,
        );
    }

    match try_push(&root, root_shift, &tail) {
        Some(new_root) => (new_root, root_shift),
        None => {
            let mut children: ArrayVec<Rc<Node<T>>, SPAN> = ArrayVec::new();
            children.push(root);
            children.push(build_skinny_path(root_shift, tail));
            let new_shift = root_shift + SHIFT;
            (
                Rc::new(Node::Branch(Branch::from_children(new_shift, children))),
                new_shift,
            )
        }
    }
}

/// Finds the deepest non-full ancestor along the right spine of `node`
/// (spec.md §4.2, pass 1) and grafts `tail` on there (pass 2b), or returns
/// `None` if every node on the spine is already at width `SPAN` (pass 2a
/// must then grow the tree's height). `node`'s children are always
/// addressed with `child_shift = shift - SHIFT`.
///
/// Deepest-first: a node with spare width (`n < SPAN`) is only a
/// candidate once its *last* child's own subtree has been tried and found
/// completely full (recursion returns `None`) — otherwise the room found
/// deeper in the spine is always preferred, so the new leaf ends up as
/// close to the existing rightmost leaf as the trie's shape allows.
/// Every rebuilt node goes through `Branch::from_children`, which
/// recomputes strict-vs-relaxed and the size table from the full child
/// list rather than patching them incrementally — the previous last
/// child may have just stopped being the last child (and so may now need
/// a size table even though it didn't before), which an incremental
/// patch is easy to get wrong.
fn try_push<T: Clone>(node: &Rc<Node<T>>, shift: usize, tail: &Leaf<T>) -> Option<Rc<Node<T>>> {
    let branch = node.as_branch();
    let n = branch.children.len();
    let child_shift = shift - SHIFT;

    if child_shift == 0 {
        // Children are leaves: nothing deeper to descend into, so this is
        // the bottom of the search. Room here is final, not a fallback.
        if n == SPAN {
            return None;
        }
        let mut children = branch.children.clone();
        children.push(Rc::new(Node::Leaf(tail.clone())));
        return Some(graft(shift, children, branch.owned, n, n));
    }

    if let Some(new_last) = try_push(&branch.children[n - 1], child_shift, tail) {
        let mut children = branch.children.clone();
        children[n - 1] = new_last;
        return Some(graft(shift, children, branch.owned, n, n - 1));
    }

    if n == SPAN {
        return None;
    }
    let mut children = branch.children.clone();
    children.push(build_skinny_path(child_shift, tail.clone()));
    Some(graft(shift, children, branch.owned, n, n))
}

/// Rebuilds a branch from its (already updated) child list, carrying
/// forward ownership for every slot that was already owned and claiming
/// the one slot this pushdown just touched (`claimed`, an index into the
/// *new* child list; `old_len` is the child count before this update).
fn graft<T: Clone>(
    shift: usize,
    children: ArrayVec<Rc<Node<T>>, SPAN>,
    old_owned: OwnershipBits,
    old_len: usize,
    claimed: usize,
) -> Rc<Node<T>> {
    let mut new_branch = Branch::from_children(shift, children);
    let mut owned = OwnershipBits::none();
    for i in 0..old_len {
        if old_owned.is_owned(i) {
            owned.set_owned(i);
        }
    }
    owned.set_owned(claimed);
    new_branch.owned = owned;
    Rc::new(Node::Branch(new_branch))
}

fn build_skinny_path<T: Clone>(shift: usize, tail: Leaf<T>) -> Rc<Node<T>> {
    if shift == 0 {
        Rc::new(Node::Leaf(tail))
    } else {
        let child = build_skinny_path(shift - SHIFT, tail);
        let mut children: ArrayVec<Rc<Node<T>>, SPAN> = ArrayVec::new();
        children.push(child);
        Rc::new(Node::Branch(Branch::from_children(shift, children)))
    }
}

pub(crate) enum Pullup<T> {
    WholeConsumed(Leaf<T>),
    Remaining(Rc<Node<T>>, Leaf<T>),
}

/// Walks the right spine to find the deepest ancestor that remains
/// non-empty after its rightmost leaf is promoted to become the tail
/// (spec.md §4.3), then collapses any resulting chain of single-child
/// parents at the top.
pub(crate) fn promote_rightmost_to_tail<T: Clone>(
    root: Rc<Node<T>>,
    root_shift: usize,
) -> (Option<Rc<Node<T>>>, usize, Leaf<T>) {
    match pullup(&root, root_shift) {
        Pullup::WholeConsumed(tail) => (None, 0, tail),
        Pullup::Remaining(node, tail) => {
            let (node, shift) = collapse_singletons(node, root_shift);
            (Some(node), shift, tail)
        }
    }
}

fn pullup<T: Clone>(node: &Rc<Node<T>>, shift: usize) -> Pullup<T> {
    match node.as_ref() {
        Node::Leaf(l) => Pullup::WholeConsumed(l.clone()),
        Node::Branch(b) => {
            let n = b.children.len();
            let child_shift = shift - SHIFT;
            match pullup(&b.children[n - 1], child_shift) {
                Pullup::WholeConsumed(tail) => {
                    if n == 1 {
                        Pullup::WholeConsumed(tail)
                    } else {
                        let mut new_branch = Branch {
                            children: b.children.clone(),
                            owned: b.owned,
                            sizes: b.sizes.clone(),
                        };
                        new_branch.children.truncate(n - 1);
                        if let Some(table) = &mut new_branch.sizes {
                            table.truncate(n - 1);
                        }
                        Pullup::Remaining(Rc::new(Node::Branch(new_branch)), tail)
                    }
                }
                Pullup::Remaining(new_last, tail) => {
                    let mut new_branch = Branch {
                        children: b.children.clone(),
                        owned: b.owned,
                        sizes: b.sizes.clone(),
                    };
                    new_branch.children[n - 1] = new_last;
                    if let Some(table) = &mut new_branch.sizes {
                        let base = if n >= 2 { table.get(n - 2) } else { 0 };
                        let last_len = new_branch.children[n - 1].len(child_shift);
                        table.set(n - 1, base + last_len);
                    }
                    Pullup::Remaining(Rc::new(Node::Branch(new_branch)), tail)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_full(start: i32) -> Leaf<i32> {
        let mut l: Leaf<i32> = ArrayVec::new();
        for i in 0..SPAN as i32 {
            l.push(start + i);
        }
        l
    }

    #[test]
    fn pushdown_grows_height_from_leaf_root() {
        let root = Rc::new(Node::Leaf(leaf_full(0)));
        let mut new_tail: Leaf<i32> = ArrayVec::new();
        new_tail.push(9999);
        let (new_root, new_shift) = push_tail_into_trie(Some(root), 0, new_tail);
        assert_eq!(new_shift, SHIFT);
        assert_eq!(new_root.len(new_shift), SPAN + 1);
    }

    #[test]
    fn pushdown_then_pullup_round_trips() {
        let root = Rc::new(Node::Leaf(leaf_full(0)));
        let mut new_tail: Leaf<i32> = ArrayVec::new();
        new_tail.push(9999);
        let (new_root, new_shift) = push_tail_into_trie(Some(root), 0, new_tail.clone());
        let (root_after, shift_after, tail_after) = promote_rightmost_to_tail(new_root, new_shift);
        assert_eq!(tail_after.as_slice(), new_tail.as_slice());
        assert_eq!(shift_after, 0);
        assert_eq!(root_after.unwrap().len(0), SPAN);
    }

    /// Pins the exact scenario a node-count-only `n < SPAN` check got
    /// wrong: after the first height growth to `shift = 2 * SHIFT`, the
    /// root is `[C0_full(1024 elems), skinny(32 elems)]`. The next
    /// full-tail pushdown must descend into `skinny` (filling it to two
    /// leaves) rather than adding a third root child, or addressing past
    /// 1056 elements walks into a 1-child branch at the wrong slot.
    #[test]
    fn repeated_pushdown_addresses_correctly_across_height_growth() {
        let mut root: Option<Rc<Node<i32>>> = None;
        let mut shift = 0usize;
        let mut next = 0i32;
        let tails = 40;
        for _ in 0..tails {
            let mut tail: Leaf<i32> = ArrayVec::new();
            for _ in 0..SPAN {
                tail.push(next);
                next += 1;
            }
            let (r, s) = push_tail_into_trie(root, shift, tail);
            root = Some(r);
            shift = s;
        }
        let root = root.unwrap();
        let total = tails * SPAN;
        assert_eq!(root.len(shift), total);
        for i in 0..total {
            assert_eq!(*super::super::get(&root, shift, i), i as i32);
        }
    }
}
