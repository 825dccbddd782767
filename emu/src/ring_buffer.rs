use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Keeps the most recent `capacity` elements, dropping the oldest on overflow.
///
/// Hosts use it to hold the last disassembled lines without growing forever.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct RingBuffer<T> {
    capacity: usize,
    buffer: VecDeque<T>,
}

impl<T> RingBuffer<T> {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            buffer: VecDeque::with_capacity(capacity),
        }
    }

    /// Pushes an element to the back. At capacity the front element goes first.
    /// A zero capacity buffer stays empty.
    pub fn push(&mut self, element: T) {
        if self.capacity == 0 {
            return;
        }
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(element);
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buffer.iter()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&T> {
        self.buffer.back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_buffer_is_empty() {
        let ring: RingBuffer<u8> = RingBuffer::new(10);
        assert!(ring.is_empty());
        assert_eq!(ring.len(), 0);
        assert_eq!(ring.latest(), None);
    }

    #[test]
    fn push_over_capacity_removes_oldest() {
        let mut ring: RingBuffer<u8> = RingBuffer::new(3);

        for i in 1..=3 {
            ring.push(i);
        }
        assert_eq!(ring.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);

        ring.push(4);
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(ring.latest(), Some(&4));
    }

    #[test]
    fn zero_capacity_stays_empty() {
        let mut ring = RingBuffer::new(0);
        ring.push("line".to_string());
        assert!(ring.is_empty());
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut ring = RingBuffer::new(2);
        ring.push(1);
        ring.clear();
        assert!(ring.is_empty());
        assert_eq!(ring.capacity(), 2);
    }
}
