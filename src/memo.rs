//! Memoized values with explicit reset.
//!
//! [`Memo`] holds a lazily computed value that stays cached until someone
//! calls [`Memo::invalidate`]. Reads only need a shared reference, so a cached
//! value can live inside a component that systems access with `&T`.
//!
//! Whoever mutates an input of the cached value is responsible for
//! invalidating it, either directly in a setter or from a system reacting to
//! change detection.

use std::sync::OnceLock;

/// A value computed on first access after construction or invalidation.
#[derive(Debug, Default, Clone)]
pub struct Memo<T> {
    cell: OnceLock<T>,
}

impl<T> Memo<T> {
    pub fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Returns the cached value, computing it with `init` if needed.
    pub fn get_or_compute(&self, init: impl FnOnce() -> T) -> &T {
        self.cell.get_or_init(init)
    }

    /// Returns the cached value without computing it.
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    /// Drops the cached value. The next read recomputes it.
    pub fn invalidate(&mut self) {
        self.cell.take();
    }

    pub fn is_valid(&self) -> bool {
        self.cell.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn computes_once_until_invalidated() {
        let calls = Cell::new(0);
        let mut memo: Memo<i32> = Memo::new();
        let compute = || {
            calls.set(calls.get() + 1);
            42
        };

        assert_eq!(*memo.get_or_compute(compute), 42);
        assert_eq!(*memo.get_or_compute(compute), 42);
        assert_eq!(calls.get(), 1);

        memo.invalidate();
        assert!(!memo.is_valid());
        assert_eq!(*memo.get_or_compute(compute), 42);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn get_does_not_compute() {
        let memo: Memo<i32> = Memo::new();
        assert!(memo.get().is_none());
    }

    #[test]
    fn recomputes_with_new_inputs() {
        let mut memo: Memo<f32> = Memo::new();
        let mut input = 1.0;
        assert_eq!(*memo.get_or_compute(|| input * 2.0), 2.0);
        input = 5.0;
        // Stale until invalidated.
        assert_eq!(*memo.get_or_compute(|| input * 2.0), 2.0);
        memo.invalidate();
        assert_eq!(*memo.get_or_compute(|| input * 2.0), 10.0);
    }
}
