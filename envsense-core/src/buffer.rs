//! Fixed-Size Circular Buffer for the Burn-In Gas Window
//!
//! ## Overview
//!
//! The gas baseline is the mean of the most recent burn-in samples. Samples
//! older than that window carry no meaning, so instead of letting the burn-in
//! history grow for the whole warm-up (500+ samples at the default settings)
//! the window is kept in a ring buffer whose capacity is fixed at compile time.
//!
//! - O(1) insertion (overwrites the oldest sample when full)
//! - O(n) iteration, oldest to newest
//! - Zero heap allocations
//!
//! ### Memory Layout
//!
//! ```text
//! CircularBuffer<f64, 5> after 7 pushes (s0..s6):
//! ┌────┬────┬────┬────┬────┐
//! │ s5 │ s6 │ s2 │ s3 │ s4 │  ← physical slots
//! └────┴────┴────┴────┴────┘
//!             ↑
//!             └── write_pos = 2, oldest sample
//! ```
//!
//! ## Usage Example
//!
//! ```rust
//! use envsense_core::buffer::CircularBuffer;
//!
//! let mut window: CircularBuffer<f64, 3> = CircularBuffer::new();
//! for sample in [1.0, 2.0, 3.0, 4.0] {
//!     window.push(sample);
//! }
//!
//! let kept: Vec<f64> = window.iter().copied().collect();
//! assert_eq!(kept, vec![2.0, 3.0, 4.0]);
//! ```

/// Fixed-size circular buffer
///
/// ## Internal Invariants
///
/// - `write_pos < N`
/// - `len <= N`
/// - iteration yields items in insertion order
///
/// Not thread-safe; the sampling engine owns its window exclusively.
#[derive(Debug, Clone)]
pub struct CircularBuffer<T: Copy, const N: usize> {
    /// Storage, `None` for slots never written
    data: [Option<T>; N],

    /// Index where the next write will occur
    write_pos: usize,

    /// Current number of valid items
    len: usize,
}

impl<T: Copy, const N: usize> CircularBuffer<T, N> {
    /// Creates a new empty circular buffer
    pub const fn new() -> Self {
        Self {
            data: [None; N],
            write_pos: 0,
            len: 0,
        }
    }

    /// Adds an item, overwriting the oldest one when full
    pub fn push(&mut self, item: T) {
        self.data[self.write_pos] = Some(item);
        self.write_pos = (self.write_pos + 1) % N;

        if self.len < N {
            self.len += 1;
        }
    }

    /// Number of stored items
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate over items from oldest to newest
    pub fn iter(&self) -> CircularBufferIter<'_, T, N> {
        CircularBufferIter {
            buffer: self,
            index: 0,
        }
    }

    /// Gets an item by its logical index (0 = oldest, len-1 = newest)
    ///
    /// Until the buffer wraps, logical and physical indices match. Once full,
    /// the oldest item sits at `write_pos`.
    fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }

        let actual_index = if self.len < N {
            index
        } else {
            (self.write_pos + index) % N
        };

        self.data[actual_index].as_ref()
    }
}

/// Iterator over circular buffer contents
pub struct CircularBufferIter<'a, T: Copy, const N: usize> {
    buffer: &'a CircularBuffer<T, N>,
    index: usize,
}

impl<'a, T: Copy, const N: usize> Iterator for CircularBufferIter<'a, T, N> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.buffer.get(self.index)?;
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buffer.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<T: Copy, const N: usize> Default for CircularBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer() {
        let buffer: CircularBuffer<f64, 5> = CircularBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
        assert_eq!(buffer.iter().count(), 0);
    }

    #[test]
    fn push_and_retrieve() {
        let mut buffer = CircularBuffer::<f64, 5>::new();
        buffer.push(1200.0);

        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), vec![1200.0]);
    }

    #[test]
    fn circular_overwrite() {
        let mut buffer = CircularBuffer::<u32, 3>::new();
        for i in 0..5 {
            buffer.push(i);
        }

        assert_eq!(buffer.len(), 3);

        let values: Vec<u32> = buffer.iter().copied().collect();
        assert_eq!(values, vec![2, 3, 4]);
        assert_eq!(buffer.iter().size_hint(), (3, Some(3)));
    }
}
