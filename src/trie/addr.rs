//! Index to leaf descent: pure radix on strict nodes, radix plus a
//! bounded linear advance on relaxed ones (spec.md §4.1).

use std::rc::Rc;

use super::{radix_slot, Node};

pub(crate) fn get<T: Clone>(node: &Node<T>, shift: usize, index: usize) -> &T {
    match node {
        Node::Leaf(leaf) => &leaf[index],
        Node::Branch(branch) => {
            let guess = radix_slot(index, shift);
            let (slot, local) = match &branch.sizes {
                Some(table) => table.locate(index, guess),
                None => (guess, index - guess * super::full_size(shift - super::SHIFT)),
            };
            get(&branch.children[slot], shift - super::SHIFT, local)
        }
    }
}

/// Descends to the leaf holding `index`, claiming ownership (cloning any
/// unowned node along the way) so the caller can mutate it in place.
/// Returns the owned root (replacing `root` if a copy was made) and the
/// local leaf slot to write through.
pub(crate) fn get_mut_leaf_slot<T: Clone>(
    root: &mut Rc<Node<T>>,
    shift: usize,
    index: usize,
) -> &mut T {
    let node = Rc::make_mut(root);
    match node {
        Node::Leaf(leaf) => &mut leaf[index],
        Node::Branch(branch) => {
            let guess = radix_slot(index, shift);
            let (slot, local) = match &branch.sizes {
                Some(table) => table.locate(index, guess),
                None => (guess, index - guess * super::full_size(shift - super::SHIFT)),
            };
            branch.owned.set_owned(slot);
            get_mut_leaf_slot(&mut branch.children[slot], shift - super::SHIFT, local)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::node::{Branch, Leaf};
    use arrayvec::ArrayVec;

    fn leaf(vals: &[i32]) -> Rc<Node<i32>> {
        let mut l: Leaf<i32> = ArrayVec::new();
        l.extend(vals.iter().copied());
        Rc::new(Node::Leaf(l))
    }

    #[test]
    fn get_addresses_strict_tree() {
        let mut children: ArrayVec<Rc<Node<i32>>, { super::super::SPAN }> = ArrayVec::new();
        children.push(leaf(&(0..32).collect::<Vec<_>>()));
        children.push(leaf(&(32..64).collect::<Vec<_>>()));
        let root = Node::Branch(Branch::from_children(super::super::SHIFT, children));
        assert_eq!(*get(&root, super::super::SHIFT, 0), 0);
        assert_eq!(*get(&root, super::super::SHIFT, 35), 35);
    }

    #[test]
    fn get_addresses_relaxed_tree() {
        let mut children: ArrayVec<Rc<Node<i32>>, { super::super::SPAN }> = ArrayVec::new();
        children.push(leaf(&(0..10).collect::<Vec<_>>()));
        children.push(leaf(&(10..42).collect::<Vec<_>>()));
        let root = Node::Branch(Branch::from_children(super::super::SHIFT, children));
        assert_eq!(*get(&root, super::super::SHIFT, 0), 0);
        assert_eq!(*get(&root, super::super::SHIFT, 9), 9);
        assert_eq!(*get(&root, super::super::SHIFT, 10), 10);
        assert_eq!(*get(&root, super::super::SHIFT, 41), 41);
    }
}
