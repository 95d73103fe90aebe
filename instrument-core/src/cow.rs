//! Copy-on-write sharing for the overlay arrays views layer on top of a
//! shared `FlatTree`. Mirrors the source's custom reference-counted pointer
//! with a `copy()` hook invoked on every mutable access: a shared,
//! immutable array stays a cheap `Arc::clone` until something actually
//! writes to it, at which point it is made unique first.

use std::sync::Arc;

/// A reference-counted, copy-on-write array. Reads are a cheap dereference
/// through the `Arc`; a mutable borrow clones the backing `Vec` only if
/// another view currently shares it.
#[derive(Clone, Debug)]
pub struct CowSlice<T: Clone> {
    data: Arc<Vec<T>>,
}

impl<T: Clone> CowSlice<T> {
    /// Wraps an owned `Vec` for sharing.
    pub fn new(data: Vec<T>) -> Self {
        CowSlice { data: Arc::new(data) }
    }

    /// Immutable view of the backing data.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the array is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Mutable access to the backing data, cloning it first if it is
    /// currently shared with another view.
    pub fn make_mut(&mut self) -> &mut Vec<T> {
        Arc::make_mut(&mut self.data)
    }

    /// Whether this handle is the sole owner of its backing data.
    pub fn is_unique(&self) -> bool {
        Arc::strong_count(&self.data) == 1
    }
}

impl<T: Clone> std::ops::Index<usize> for CowSlice<T> {
    type Output = T;
    fn index(&self, i: usize) -> &T {
        &self.data[i]
    }
}
