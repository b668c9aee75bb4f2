//! Direct bulk append (spec.md §4.6): build whole `SPAN`-wide leaves from
//! a source slice and push them down one at a time, rather than growing
//! the trie one element per `append`. Node density is not guaranteed to
//! match repeated single-element appends (spec.md §9, Open Question a) —
//! only the resulting element sequence is.

use std::rc::Rc;

use arrayvec::ArrayVec;

use super::{promote_rightmost_to_tail, push_tail_into_trie, Leaf, Node, SPAN};

/// How the caller wants the leftover tail handled once `src` is consumed.
pub(crate) enum SrcMode {
    /// Prepend path: leave no tail; a subsequent concat supplies one.
    AlwaysEmptySrc,
    /// Insert-in-tail path: fill out the final partial leaf as the tail.
    EmptySrcToFill,
    /// Plain end-append: always leave at least one element for the tail.
    NeverEmptySrc,
}

pub(crate) fn bulk_append<T: Clone>(
    mut root: Option<Rc<Node<T>>>,
    mut shift: usize,
    mut tail: Leaf<T>,
    src: &[T],
    mode: SrcMode,
) -> (Option<Rc<Node<T>>>, usize, Leaf<T>) {
    let mut idx = 0usize;

    while tail.len() < SPAN && idx < src.len() {
        tail.push(src[idx].clone());
        idx += 1;
    }

    if tail.len() == SPAN && idx < src.len() {
        let (r, s) = push_tail_into_trie(root, shift, tail);
        root = Some(r);
        shift = s;
        tail = Leaf::new();
    }

    while src.len() - idx >= SPAN {
        let mut chunk: Leaf<T> = ArrayVec::new();
        chunk.extend(src[idx..idx + SPAN].iter().cloned());
        let (r, s) = push_tail_into_trie(root, shift, chunk);
        root = Some(r);
        shift = s;
        idx += SPAN;
    }

    let remainder = &src[idx..];
    match mode {
        // Both leave whatever didn't fill a whole leaf sitting in the
        // tail buffer; they differ only in which caller they document
        // (plain end-append vs. splicing into a split-off prefix ahead of
        // a join), not in behavior.
        SrcMode::NeverEmptySrc | SrcMode::EmptySrcToFill => {
            for e in remainder {
                tail.push(e.clone());
            }
            if tail.is_empty() {
                if let Some(r) = root.clone() {
                    let (r2, s2, t2) = promote_rightmost_to_tail(r, shift);
                    root = r2;
                    shift = s2;
                    tail = t2;
                }
            }
        }
        SrcMode::AlwaysEmptySrc => {
            if !remainder.is_empty() {
                let mut chunk: Leaf<T> = ArrayVec::new();
                chunk.extend(remainder.iter().cloned());
                let (r, s) = push_tail_into_trie(root, shift, chunk);
                root = Some(r);
                shift = s;
            }
            tail = Leaf::new();
        }
    }

    (root, shift, tail)
}
