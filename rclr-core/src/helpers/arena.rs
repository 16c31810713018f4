//! Retention of handles produced during one top-level conversion.
//!
//! The host and the interpreter reclaim memory independently. A freshly built
//! value that is only reachable from a local variable can be collected by either
//! side before the interpreter has linked it into its own object graph. The arena
//! preserves every handle produced during a call and releases them when the next
//! call starts.

use crate::engine::Engine;
use crate::types::{Sexp, SexpPtr};

#[derive(Debug, Default)]
pub struct RetentionArena {
    handles: Vec<Sexp>,
}

impl RetentionArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Release every retained handle. Only called at the start of a top-level call.
    pub fn reset<E: Engine + ?Sized>(&mut self, engine: &mut E) {
        if !self.handles.is_empty() {
            log::trace!("releasing {} retained handles", self.handles.len());
        }
        for sexp in self.handles.drain(..) {
            engine.release(sexp);
        }
    }

    /// Preserve `sexp` until the next [`reset`](Self::reset).
    pub fn retain<E: Engine + ?Sized>(&mut self, engine: &mut E, sexp: Sexp) {
        log::trace!("retaining {}", sexp.ptr());
        engine.preserve(sexp);
        self.handles.push(sexp);
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Retained handles in the order they were produced.
    pub fn handles(&self) -> &[Sexp] {
        &self.handles
    }

    pub fn contains(&self, ptr: SexpPtr) -> bool {
        self.handles.iter().any(|h| h.ptr() == ptr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryEngine;

    #[test]
    fn retained_handles_survive_collection_until_reset() {
        let mut engine = MemoryEngine::new();
        let mut arena = RetentionArena::new();
        assert!(arena.is_empty());

        let x = engine.numeric_vector(&[1.0]).unwrap();
        arena.retain(&mut engine, x);
        assert_eq!(arena.len(), 1);
        assert!(arena.contains(x.ptr()));

        engine.collect_garbage();
        assert!(engine.is_live(x.ptr()));

        arena.reset(&mut engine);
        assert!(arena.is_empty());
        engine.collect_garbage();
        assert!(!engine.is_live(x.ptr()));
    }

    #[test]
    fn reset_leaves_other_preserves_alone() {
        let mut engine = MemoryEngine::new();
        let mut arena = RetentionArena::new();
        let x = engine.numeric_vector(&[1.0]).unwrap();

        engine.preserve(x);
        arena.retain(&mut engine, x);
        arena.reset(&mut engine);
        assert!(engine.is_preserved(x.ptr()));
    }
}
