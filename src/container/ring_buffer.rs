//! Fixed-size, overwrite-oldest ring buffer.
//!
//! The buffer always holds exactly `len()` elements. Pushing a value overwrites the
//! oldest element and shifts every logical index down by one. Logical index `0` is the
//! oldest element and `len() - 1` the most recently pushed one.

use std::iter::Chain;
use std::ops::{Index, IndexMut};
use std::slice;

/// Fixed-capacity circular window over the most recently pushed values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RingBuffer<T> {
    storage: Vec<T>,
    write_index: usize,
}

/// Oldest-to-newest iterator over a [`RingBuffer`].
pub type Iter<'a, T> = Chain<slice::Iter<'a, T>, slice::Iter<'a, T>>;

/// Mutable oldest-to-newest iterator over a [`RingBuffer`].
pub type IterMut<'a, T> = Chain<slice::IterMut<'a, T>, slice::IterMut<'a, T>>;

impl<T> RingBuffer<T> {
    /// Create an empty buffer. It must be resized before values can be pushed.
    pub const fn new() -> Self {
        Self {
            storage: Vec::new(),
            write_index: 0,
        }
    }

    /// Returns `true` if the buffer has zero capacity.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Window length. Equal to the capacity at all times.
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Overwrite the oldest element with `value`.
    ///
    /// After the call `self[self.len() - 1]` is `value` and the previous `self[0]` is gone.
    #[inline]
    pub fn push(&mut self, value: T) {
        debug_assert!(!self.is_empty(), "push into a zero-capacity ring buffer");
        self.storage[self.write_index] = value;
        self.write_index += 1;
        if self.write_index >= self.storage.len() {
            self.write_index = 0;
        }
    }

    /// The stored elements as two slices in logical order.
    ///
    /// The first slice starts at the oldest element; concatenated, the two slices are the
    /// whole window from oldest to newest.
    #[inline]
    pub fn as_slices(&self) -> (&[T], &[T]) {
        let (newer, older) = self.storage.split_at(self.write_index);
        (older, newer)
    }

    /// Mutable variant of [`as_slices`](Self::as_slices).
    #[inline]
    pub fn as_mut_slices(&mut self) -> (&mut [T], &mut [T]) {
        let (newer, older) = self.storage.split_at_mut(self.write_index);
        (older, newer)
    }

    /// Iterate from the oldest element to the newest. Use `.rev()` for the opposite order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        let (older, newer) = self.as_slices();
        older.iter().chain(newer.iter())
    }

    /// Mutably iterate from the oldest element to the newest.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let (older, newer) = self.as_mut_slices();
        older.iter_mut().chain(newer.iter_mut())
    }

    /// Drop all storage and reset the write cursor.
    pub fn clear(&mut self) {
        self.storage.clear();
        self.write_index = 0;
    }

    #[inline]
    fn physical_index(&self, index: usize) -> usize {
        debug_assert!(
            index < self.len(),
            "ring buffer index {index} out of range for length {}",
            self.len()
        );
        let i = self.write_index + index;
        if i >= self.storage.len() {
            i - self.storage.len()
        } else {
            i
        }
    }
}

impl<T: Clone> RingBuffer<T> {
    /// Create a buffer of `len` elements, each set to `value`.
    pub fn with_len(len: usize, value: T) -> Self {
        Self {
            storage: vec![value; len],
            write_index: 0,
        }
    }

    /// Replace the storage with `len` copies of `value` and reset the write cursor.
    ///
    /// Any previous contents and their logical ordering are discarded.
    pub fn resize(&mut self, len: usize, value: T) {
        self.storage.clear();
        self.storage.resize(len, value);
        self.write_index = 0;
    }

    /// Set every element to `value` without changing the length.
    pub fn fill(&mut self, value: T) {
        self.storage.fill(value);
    }
}

impl<T: Copy> RingBuffer<T> {
    /// Copy the oldest `dest.len()` elements into `dest`, oldest first.
    pub fn copy_to_slice(&self, dest: &mut [T]) {
        debug_assert!(
            dest.len() <= self.len(),
            "destination of {} samples exceeds ring length {}",
            dest.len(),
            self.len()
        );
        let (older, newer) = self.as_slices();
        if dest.len() <= older.len() {
            dest.copy_from_slice(&older[..dest.len()]);
        } else {
            let (head, tail) = dest.split_at_mut(older.len());
            head.copy_from_slice(older);
            tail.copy_from_slice(&newer[..tail.len()]);
        }
    }
}

impl<T> Index<usize> for RingBuffer<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.storage[self.physical_index(index)]
    }
}

impl<T> IndexMut<usize> for RingBuffer<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        let i = self.physical_index(index);
        &mut self.storage[i]
    }
}

impl<'a, T> IntoIterator for &'a RingBuffer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut RingBuffer<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
