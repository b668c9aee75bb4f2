#![doc = include_str!("../README.md")]

mod error;
mod trie;

use std::rc::Rc;

use trie::{
    bulk_append, concat_tries, extract_range, promote_rightmost_to_tail, push_tail_into_trie,
    split_discard, Leaf, Node, SrcMode, SPAN,
};

pub use error::Error;
pub use trie::LeafCursor;

/// A relaxed radix balanced trie: an ordered sequence with `O(1)` whole-
/// sequence fork, `O(log n)` range fork, `O(log n)` amortized join, and
/// `O(log n)` random-access get/set/insert/remove, backed by structural
/// sharing rather than copying.
///
/// Two lineages produced by [`RrbVector::fork`] never observe each
/// other's subsequent writes; nodes are shared read-only until a write
/// path needs to clone one (`Rc::make_mut`'s own uniqueness check, which
/// coincides with the ownership bitmask every parent also carries).
pub struct RrbVector<T> {
    root: Option<Rc<Node<T>>>,
    root_shift: usize,
    tail: Leaf<T>,
    size: usize,
    fork_id: u64,
    mod_count: u64,
}

impl<T: Clone> Default for RrbVector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for RrbVector<T> {
    /// Cheap: an `O(1)` structural fork, not a deep copy. Distinct from
    /// [`RrbVector::fork`] only in that it doesn't rotate `fork_id` — two
    /// values produced by `Clone` are the same lineage as far as cursor
    /// invalidation is concerned, since neither has been mutated yet.
    fn clone(&self) -> Self {
        RrbVector {
            root: self.root.clone(),
            root_shift: self.root_shift,
            tail: self.tail.clone(),
            size: self.size,
            fork_id: self.fork_id,
            mod_count: self.mod_count,
        }
    }
}

impl<T: Clone> RrbVector<T> {
    pub fn new() -> Self {
        RrbVector {
            root: None,
            root_shift: 0,
            tail: Leaf::new(),
            size: 0,
            fork_id: 0,
            mod_count: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Opaque lineage identity, rotated on every [`fork`](Self::fork). A
    /// [`LeafCursor`] taken before a fork compares stale against one taken
    /// after.
    pub fn fork_id(&self) -> u64 {
        self.fork_id
    }

    /// Monotonically increasing count of structural mutations, for a
    /// consumer's own fail-fast iteration.
    pub fn mod_count(&self) -> u64 {
        self.mod_count
    }

    fn check_index(&self, index: usize) -> Result<(), Error> {
        if index < self.size {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange {
                index,
                len: self.size,
            })
        }
    }

    fn check_bound(&self, index: usize) -> Result<(), Error> {
        if index <= self.size {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange {
                index,
                len: self.size,
            })
        }
    }

    fn tail_offset(&self) -> usize {
        self.size - self.tail.len()
    }

    pub fn get(&self, index: usize) -> Result<&T, Error> {
        self.check_index(index)?;
        let tail_offset = self.tail_offset();
        if index >= tail_offset {
            return Ok(&self.tail[index - tail_offset]);
        }
        Ok(trie::get(self.root.as_ref().unwrap(), self.root_shift, index))
    }

    /// Writes `value` at `index`, returning the element previously there.
    /// Only copies a node along the path if it wasn't already uniquely
    /// owned by this lineage.
    pub fn set(&mut self, index: usize, value: T) -> Result<T, Error> {
        self.check_index(index)?;
        let tail_offset = self.tail_offset();
        let slot = if index >= tail_offset {
            &mut self.tail[index - tail_offset]
        } else {
            trie::get_mut_leaf_slot(self.root.as_mut().unwrap(), self.root_shift, index)
        };
        self.mod_count += 1;
        Ok(std::mem::replace(slot, value))
    }

    /// Appends a single element. `O(1)` amortized: the common case writes
    /// into the tail buffer; only every `SPAN`th call pushes a full tail
    /// down into the trie.
    pub fn append(&mut self, value: T) -> Result<(), Error> {
        if self.size == usize::MAX {
            return Err(Error::CapacityExceeded { requested: self.size + 1 });
        }
        if self.tail.len() < SPAN {
            self.tail.push(value);
        } else {
            let full_tail = std::mem::replace(&mut self.tail, Leaf::new());
            let (root, shift) = push_tail_into_trie(self.root.take(), self.root_shift, full_tail);
            self.root = Some(root);
            self.root_shift = shift;
            self.tail.push(value);
        }
        self.size += 1;
        self.mod_count += 1;
        Ok(())
    }

    /// Appends every element of `src` in order. `O(src.len())`, avoiding
    /// the repeated spine re-descent of calling [`append`](Self::append)
    /// in a loop.
    pub fn bulk_append(&mut self, src: &[T]) -> Result<(), Error> {
        self.bulk_append_mode(src, SrcMode::NeverEmptySrc)
    }

    fn bulk_append_mode(&mut self, src: &[T], mode: SrcMode) -> Result<(), Error> {
        if src.is_empty() {
            return Ok(());
        }
        if self.size.checked_add(src.len()).is_none() {
            return Err(Error::CapacityExceeded {
                requested: self.size + src.len(),
            });
        }
        let tail = std::mem::replace(&mut self.tail, Leaf::new());
        let (root, shift, tail) = bulk_append(self.root.take(), self.root_shift, tail, src, mode);
        self.root = root;
        self.root_shift = shift;
        self.tail = tail;
        self.size += src.len();
        self.mod_count += 1;
        Ok(())
    }

    /// Inserts `value` at `index`, shifting later elements up by one.
    pub fn insert(&mut self, index: usize, value: T) -> Result<(), Error> {
        self.check_bound(index)?;
        if index == self.size {
            return self.append(value);
        }
        let tail_offset = self.tail_offset();
        if index >= tail_offset {
            let local = index - tail_offset;
            if self.tail.len() == SPAN {
                // The tail has no room for a 33rd element: shift right by
                // one, pushing the displaced last element out as the seed
                // of a new tail, and push the other SPAN down into the
                // trie (spec.md §4.4).
                let mut overflowing = std::mem::replace(&mut self.tail, Leaf::new());
                let displaced = overflowing.pop().expect("full tail holds SPAN elements");
                overflowing.insert(local, value);
                let (root, shift) =
                    push_tail_into_trie(self.root.take(), self.root_shift, overflowing);
                self.root = Some(root);
                self.root_shift = shift;
                self.tail.push(displaced);
            } else {
                self.tail.insert(local, value);
            }
            self.size += 1;
            self.mod_count += 1;
            return Ok(());
        }

        let this = std::mem::take(self);
        let (mut prefix, suffix) = this.into_two(index, index);
        prefix.append(value)?;
        prefix.join(&suffix)?;
        *self = prefix;
        Ok(())
    }

    /// Inserts every element of `src` at `index`, preserving their order.
    pub fn bulk_insert(&mut self, index: usize, src: &[T]) -> Result<(), Error> {
        self.check_bound(index)?;
        if src.is_empty() {
            return Ok(());
        }
        if index == self.size {
            return self.bulk_append(src);
        }
        let this = std::mem::take(self);
        let (mut prefix, suffix) = this.into_two(index, index);
        // Splicing `src` onto the split-off prefix's tail, ahead of the
        // join that reattaches `suffix` (spec.md §4.6's `EMPTY_SRC_TO_FILL`
        // mode: fill out the prefix's last leaf rather than the
        // plain-end-append mode `bulk_append` itself uses).
        prefix.bulk_append_mode(src, SrcMode::EmptySrcToFill)?;
        prefix.join(&suffix)?;
        *self = prefix;
        Ok(())
    }

    /// Removes and returns the element at `index`.
    pub fn remove(&mut self, index: usize) -> Result<T, Error> {
        self.check_index(index)?;
        let value = self.get(index)?.clone();
        if index == self.size - 1 {
            self.remove_last();
        } else {
            self.remove_range(index, index + 1)?;
        }
        Ok(value)
    }

    fn remove_last(&mut self) {
        self.tail.pop();
        if self.tail.is_empty() {
            if let Some(root) = self.root.take() {
                let (root, shift, tail) = promote_rightmost_to_tail(root, self.root_shift);
                self.root = root;
                self.root_shift = shift;
                self.tail = tail;
                self.fixup_nonfull_leaf_root();
            }
        }
        self.size -= 1;
        self.mod_count += 1;
    }

    /// Removes `[lo, hi)`, joining what remains on either side.
    pub fn remove_range(&mut self, lo: usize, hi: usize) -> Result<(), Error> {
        if lo > hi || hi > self.size {
            return Err(Error::IndexOutOfRange {
                index: hi,
                len: self.size,
            });
        }
        if lo == hi {
            return Ok(());
        }
        let this = std::mem::take(self);
        let (mut prefix, suffix) = this.into_two(lo, hi);
        prefix.join(&suffix)?;
        prefix.mod_count += 1;
        *self = prefix;
        Ok(())
    }

    /// Independent lineage sharing this container's current structure,
    /// `O(1)`: no node is copied until one lineage writes to it.
    pub fn fork(&mut self) -> Self {
        self.fork_id += 1;
        RrbVector {
            root: self.root.clone(),
            root_shift: self.root_shift,
            tail: self.tail.clone(),
            size: self.size,
            fork_id: self.fork_id,
            mod_count: self.mod_count,
        }
    }

    /// Independent lineage holding just `[lo, hi)`, `O(log n)`.
    pub fn fork_range(&self, lo: usize, hi: usize) -> Result<Self, Error> {
        if lo > hi || hi > self.size {
            return Err(Error::IndexOutOfRange {
                index: hi,
                len: self.size,
            });
        }
        if lo == hi {
            return Ok(Self::new());
        }
        let (uniform_root, uniform_shift) =
            push_tail_into_trie(self.root.clone(), self.root_shift, self.tail.clone());
        let middle = extract_range(Some(uniform_root), uniform_shift, lo, hi);
        Ok(Self::finish_half(middle, uniform_shift))
    }

    /// Appends `other`'s elements onto the end of this container,
    /// `O(log(len() + other.len()))` amortized. `other` is read, not
    /// consumed or mutated — concatenation never writes through a shared
    /// node, so no defensive fork of `other` is needed even if it shares
    /// structure with a third lineage.
    pub fn join(&mut self, other: &Self) -> Result<(), Error> {
        if other.size == 0 {
            return Ok(());
        }
        if self.size == 0 {
            *self = other.clone();
            self.fork_id = 0;
            return Ok(());
        }
        if self.size.checked_add(other.size).is_none() {
            return Err(Error::CapacityExceeded {
                requested: self.size + other.size,
            });
        }

        if other.root.is_none() {
            for value in other.tail.iter() {
                self.append(value.clone())?;
            }
            return Ok(());
        }

        let my_tail = std::mem::replace(&mut self.tail, Leaf::new());
        let (my_root, my_shift) = push_tail_into_trie(self.root.take(), self.root_shift, my_tail);
        let (new_root, new_shift) =
            concat_tries(Some(my_root), my_shift, other.root.clone(), other.root_shift);
        self.root = new_root;
        self.root_shift = new_shift;
        self.tail = other.tail.clone();
        self.size += other.size;
        self.mod_count += 1;
        Ok(())
    }

    /// Inserts `other` at `index`: `split(index); join; join`.
    pub fn join_at(&mut self, index: usize, other: &Self) -> Result<(), Error> {
        self.check_bound(index)?;
        if other.size == 0 {
            return Ok(());
        }
        if index == self.size {
            return self.join(other);
        }
        let this = std::mem::take(self);
        let (mut prefix, suffix) = this.into_two(index, index);
        prefix.join(other)?;
        prefix.join(&suffix)?;
        *self = prefix;
        Ok(())
    }

    /// A cursor positioned at `index`, for bulk forward/backward
    /// traversal without re-descending from the root at every step.
    pub fn leaf_cursor(&self, index: usize) -> Result<LeafCursor<T>, Error> {
        self.check_bound(index)?;
        Ok(LeafCursor::new(
            self.root.clone(),
            self.root_shift,
            self.tail.clone(),
            self.size,
            self.fork_id,
            index,
        ))
    }

    /// Consumes `self`, returning `[0, lo)` and `[hi, size)` as two fresh
    /// containers; `[lo, hi)` is discarded.
    fn into_two(self, lo: usize, hi: usize) -> (Self, Self) {
        if self.size == 0 {
            return (Self::new(), Self::new());
        }
        let RrbVector {
            root,
            root_shift,
            tail,
            ..
        } = self;
        let (uniform_root, uniform_shift) = push_tail_into_trie(root, root_shift, tail);
        let (prefix, suffix) = split_discard(Some(uniform_root), uniform_shift, lo, hi);
        (
            Self::finish_half(prefix, uniform_shift),
            Self::finish_half(suffix, uniform_shift),
        )
    }

    fn finish_half(node: Option<Rc<Node<T>>>, shift: usize) -> Self {
        match node {
            None => Self::new(),
            Some(n) => {
                let len = n.len(shift);
                let (root, shift, tail) = promote_rightmost_to_tail(n, shift);
                let mut out = RrbVector {
                    root,
                    root_shift: shift,
                    tail,
                    size: len,
                    fork_id: 0,
                    mod_count: 0,
                };
                out.fixup_nonfull_leaf_root();
                out
            }
        }
    }

    /// If the trie has collapsed to a single non-full leaf root, either
    /// retire it into the tail entirely or top it back up to `SPAN` from
    /// the tail (spec §4.9). Not required for correctness, but avoids
    /// forcing a size table onto the next append.
    fn fixup_nonfull_leaf_root(&mut self) {
        if self.root_shift != 0 {
            return;
        }
        let Some(root) = self.root.clone() else {
            return;
        };
        let leaf = root.as_leaf();
        if leaf.len() == SPAN {
            return;
        }
        if self.size <= SPAN {
            let mut combined = leaf.clone();
            combined.extend(self.tail.iter().cloned());
            self.tail = combined;
            self.root = None;
        } else {
            let mut new_leaf = leaf.clone();
            let room = SPAN - new_leaf.len();
            let take = room.min(self.tail.len());
            new_leaf.extend(self.tail.drain(..take));
            self.root = Some(Rc::new(Node::Leaf(new_leaf)));
        }
    }
}

impl<T: Clone> FromIterator<T> for RrbVector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut out = Self::new();
        let items: Vec<T> = iter.into_iter().collect();
        out.bulk_append(&items).expect("iterator length within capacity");
        out
    }
}
