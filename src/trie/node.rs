//! The two node shapes of the trie: leaves and parents. A parent is a
//! single type carrying an `Option<SizeTable>` — `None` for a strict node
//! addressable by pure radix, `Some` for a relaxed one. This is the
//! "unified node with an optional size table" variant the design notes in
//! spec.md call out as equivalent to two distinct parent types.

use std::rc::Rc;

use arrayvec::ArrayVec;

use super::{full_size, OwnershipBits, SizeTable, SPAN};

pub(crate) type Leaf<T> = ArrayVec<T, SPAN>;

pub(crate) struct Branch<T> {
    pub(crate) children: ArrayVec<Rc<Node<T>>, SPAN>,
    pub(crate) owned: OwnershipBits,
    pub(crate) sizes: Option<SizeTable>,
}

pub(crate) enum Node<T> {
    Leaf(Leaf<T>),
    Branch(Branch<T>),
}

impl<T: Clone> Branch<T> {
    pub(crate) fn new() -> Self {
        Branch {
            children: ArrayVec::new(),
            owned: OwnershipBits::none(),
            sizes: None,
        }
    }

    /// Builds a branch from already-finished children, deciding for itself
    /// whether it must be relaxed (spec.md §3: relaxed if any descendant is
    /// relaxed, or if it has a non-full non-last child).
    pub(crate) fn from_children(shift: usize, children: ArrayVec<Rc<Node<T>>, SPAN>) -> Self {
        let child_shift = shift - super::SHIFT;
        let n = children.len();
        let needs_relaxed = children.iter().enumerate().any(|(i, c)| {
            c.is_relaxed() || (i + 1 < n && c.len(child_shift) != full_size(child_shift))
        });
        let sizes = if needs_relaxed {
            Some(SizeTable::build(
                shift,
                children.iter().map(|c| c.len(child_shift)),
            ))
        } else {
            None
        };
        let owned = OwnershipBits::all(n);
        Branch {
            children,
            owned,
            sizes,
        }
    }

    pub(crate) fn len(&self, shift: usize) -> usize {
        match &self.sizes {
            Some(table) => table.total(),
            None => {
                let child_shift = shift - super::SHIFT;
                let n = self.children.len();
                if n == 0 {
                    0
                } else {
                    (n - 1) * full_size(child_shift) + self.children[n - 1].len(child_shift)
                }
            }
        }
    }

    pub(crate) fn is_full(&self, shift: usize) -> bool {
        self.children.len() == SPAN && self.sizes.is_none() && self.len(shift) == full_size(shift)
    }
}

impl<T: Clone> Node<T> {
    pub(crate) fn len(&self, shift: usize) -> usize {
        match self {
            Node::Leaf(l) => l.len(),
            Node::Branch(b) => b.len(shift),
        }
    }

    pub(crate) fn is_relaxed(&self) -> bool {
        match self {
            Node::Leaf(_) => false,
            Node::Branch(b) => b.sizes.is_some(),
        }
    }

    pub(crate) fn as_branch(&self) -> &Branch<T> {
        match self {
            Node::Branch(b) => b,
            Node::Leaf(_) => panic!("expected a branch node"),
        }
    }

    pub(crate) fn as_leaf(&self) -> &Leaf<T> {
        match self {
            Node::Leaf(l) => l,
            Node::Branch(_) => panic!("expected a leaf node"),
        }
    }

    pub(crate) fn as_branch_mut(&mut self) -> &mut Branch<T> {
        match self {
            Node::Branch(b) => b,
            Node::Leaf(_) => panic!("expected a branch node"),
        }
    }

    pub(crate) fn as_leaf_mut(&mut self) -> &mut Leaf<T> {
        match self {
            Node::Leaf(l) => l,
            Node::Branch(_) => panic!("expected a leaf node"),
        }
    }

}

/// Collapses a chain of single-child parents down to the first branch
/// (or leaf) that actually holds more than one child, per the root
/// reduction spec.md §4.3/§4.7 both call for.
pub(crate) fn collapse_singletons<T: Clone>(
    mut node: Rc<Node<T>>,
    mut shift: usize,
) -> (Rc<Node<T>>, usize) {
    while shift > 0 {
        let single = matches!(node.as_ref(), Node::Branch(b) if b.children.len() == 1);
        if !single {
            break;
        }
        node = node.as_branch().children[0].clone();
        shift -= super::SHIFT;
    }
    (node, shift)
}

impl<T: Clone> Clone for Node<T> {
    /// `Rc::make_mut`'s copy-on-write path: children are `Rc`s, so cloning
    /// them is a refcount bump, not a deep copy. The freshly made copy no
    /// longer exclusively owns any child (another reference to this node's
    /// old body may still be alive), so the ownership bitmask resets.
    fn clone(&self) -> Node<T> {
        match self {
            Node::Leaf(l) => Node::Leaf(l.clone()),
            Node::Branch(b) => Node::Branch(Branch {
                children: b.children.clone(),
                owned: OwnershipBits::none(),
                sizes: b.sizes.clone(),
            }),
        }
    }
}
