//! Width-narrowed cumulative size tables for relaxed parent nodes.
//!
//! Entries store `size - 1` so the widest representable cumulative size
//! (`SPAN * 2^shift`) fits exactly. The backing width is picked per level:
//! a node one level above the leaves needs far fewer bits than one near the
//! root, so most relaxed nodes in a real trie carry a `u16` table rather
//! than a `u32` one.

use arrayvec::ArrayVec;

use super::SPAN;

#[derive(Clone, Debug)]
pub(crate) enum SizeTable {
    W8(ArrayVec<u8, SPAN>),
    W16(ArrayVec<u16, SPAN>),
    W32(ArrayVec<u32, SPAN>),
}

impl SizeTable {
    /// Width selected so that `SPAN * 2^shift - 1` (the largest cumulative
    /// sum a node at this shift could ever hold) fits the chosen integer.
    pub(crate) fn new_for_shift(shift: usize) -> Self {
        let max_value = (SPAN << shift) - 1;
        if max_value <= u8::MAX as usize {
            SizeTable::W8(ArrayVec::new())
        } else if max_value <= u16::MAX as usize {
            SizeTable::W16(ArrayVec::new())
        } else {
            SizeTable::W32(ArrayVec::new())
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            SizeTable::W8(v) => v.len(),
            SizeTable::W16(v) => v.len(),
            SizeTable::W32(v) => v.len(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cumulative element count of children `[0..=i]`.
    pub(crate) fn get(&self, i: usize) -> usize {
        match self {
            SizeTable::W8(v) => v[i] as usize + 1,
            SizeTable::W16(v) => v[i] as usize + 1,
            SizeTable::W32(v) => v[i] as usize + 1,
        }
    }

    pub(crate) fn set(&mut self, i: usize, cumulative: usize) {
        let stored = cumulative - 1;
        match self {
            SizeTable::W8(v) => v[i] = stored as u8,
            SizeTable::W16(v) => v[i] = stored as u16,
            SizeTable::W32(v) => v[i] = stored as u32,
        }
    }

    pub(crate) fn push(&mut self, cumulative: usize) {
        let stored = cumulative - 1;
        match self {
            SizeTable::W8(v) => v.push(stored as u8),
            SizeTable::W16(v) => v.push(stored as u16),
            SizeTable::W32(v) => v.push(stored as u32),
        }
    }

    pub(crate) fn pop(&mut self) {
        match self {
            SizeTable::W8(v) => {
                v.pop();
            }
            SizeTable::W16(v) => {
                v.pop();
            }
            SizeTable::W32(v) => {
                v.pop();
            }
        }
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        match self {
            SizeTable::W8(v) => v.truncate(len),
            SizeTable::W16(v) => v.truncate(len),
            SizeTable::W32(v) => v.truncate(len),
        }
    }

    /// Total element count covered by this table (last cumulative entry).
    pub(crate) fn total(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.get(self.len() - 1)
        }
    }

    /// Builds a fresh table for a branch at `shift` from each child's own
    /// element count.
    pub(crate) fn build(shift: usize, child_sizes: impl Iterator<Item = usize>) -> Self {
        let mut table = Self::new_for_shift(shift);
        let mut running = 0usize;
        for size in child_sizes {
            running += size;
            table.push(running);
        }
        table
    }

    /// The slot `idx` falls into, plus the index local to that slot.
    /// Bounded to at most `MARGIN` scan steps by the search-step invariant.
    pub(crate) fn locate(&self, idx: usize, radix_guess: usize) -> (usize, usize) {
        let mut slot = radix_guess;
        while self.get(slot) <= idx {
            slot += 1;
        }
        let local = if slot == 0 { idx } else { idx - self.get(slot - 1) };
        (slot, local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_selection_matches_shift() {
        assert!(matches!(SizeTable::new_for_shift(0), SizeTable::W8(_)));
        assert!(matches!(SizeTable::new_for_shift(5), SizeTable::W16(_)));
        assert!(matches!(SizeTable::new_for_shift(10), SizeTable::W16(_)));
        assert!(matches!(SizeTable::new_for_shift(15), SizeTable::W32(_)));
    }

    #[test]
    fn cumulative_round_trips() {
        let table = SizeTable::build(5, [32usize, 32, 17].into_iter());
        assert_eq!(table.get(0), 32);
        assert_eq!(table.get(1), 64);
        assert_eq!(table.get(2), 81);
        assert_eq!(table.total(), 81);
    }

    #[test]
    fn locate_finds_owning_slot() {
        let table = SizeTable::build(5, [32usize, 32, 17].into_iter());
        assert_eq!(table.locate(0, 0), (0, 0));
        assert_eq!(table.locate(31, 0), (0, 31));
        assert_eq!(table.locate(32, 1), (1, 0));
        assert_eq!(table.locate(80, 2), (2, 16));
    }
}
