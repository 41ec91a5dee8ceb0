//! Working buffer.

use log;

use crate::tape::{Tape, TapeError};

/// Buffer limited by elements count. Holds one chunk of tape data while it is being sorted.
pub struct WorkingBuffer<T> {
    limit: usize,
    inner: Vec<T>,
}

impl<T> WorkingBuffer<T> {
    pub fn new(limit: usize) -> Self {
        WorkingBuffer {
            limit,
            inner: Vec::with_capacity(limit),
        }
    }

    /// Adds a new element to the buffer.
    ///
    /// # Panics
    /// Panics if the buffer is already full.
    pub fn push(&mut self, item: T) {
        assert!(!self.is_full(), "working buffer overflow (limit: {})", self.limit);
        self.inner.push(item);
    }

    /// Returns buffer length
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Checks if the buffer reached the limit.
    pub fn is_full(&self) -> bool {
        self.inner.len() >= self.limit
    }

    pub fn capacity(&self) -> usize {
        self.limit
    }

    pub fn as_slice(&self) -> &[T] {
        self.inner.as_slice()
    }

    /// Replaces the buffer content with the next `count` items read from the tape.
    ///
    /// # Panics
    /// Panics if `count` exceeds the buffer limit.
    pub fn load(&mut self, tape: &mut impl Tape<T>, count: usize) -> Result<(), TapeError> {
        assert!(
            count <= self.limit,
            "chunk of {} items does not fit the working buffer (limit: {})",
            count,
            self.limit
        );

        self.inner.clear();
        for _ in 0..count {
            self.inner.push(tape.read()?);
        }

        return Ok(());
    }

    /// Writes the buffer content to the tape in buffer order leaving the buffer empty.
    pub fn drain(&mut self, tape: &mut impl Tape<T>) -> Result<(), TapeError> {
        log::trace!("draining {} items", self.inner.len());
        for item in self.inner.drain(..) {
            tape.write(item)?;
        }

        return Ok(());
    }
}

impl<T: Ord + Clone> WorkingBuffer<T> {
    /// Sorts the loaded items in ascending order. The sort is not stable.
    pub fn sort(&mut self) {
        let len = self.inner.len() as isize;
        if len > 1 {
            quicksort(&mut self.inner, 0, len - 1);
        }
    }
}

// Sorts `items[low..=high]`. Bounds are signed since `upper` may step below `low`.
// Only the smaller partition is sorted recursively, the larger one is handled by the loop,
// so the recursion depth stays logarithmic in the number of items.
fn quicksort<T: Ord + Clone>(items: &mut [T], mut low: isize, mut high: isize) {
    while low < high {
        let mut lower = low;
        let mut upper = high;
        let pivot = items[(low + (high - low) / 2) as usize].clone();

        while lower <= upper {
            while items[lower as usize] < pivot {
                lower += 1;
            }
            while items[upper as usize] > pivot {
                upper -= 1;
            }
            if lower <= upper {
                items.swap(lower as usize, upper as usize);
                lower += 1;
                upper -= 1;
            }
        }

        if upper - low < high - lower {
            if low < upper {
                quicksort(items, low, upper);
            }
            low = lower;
        } else {
            if lower < high {
                quicksort(items, lower, high);
            }
            high = upper;
        }
    }
}

#[cfg(test)]
mod test {
    use rand::seq::SliceRandom;
    use rstest::*;

    use super::WorkingBuffer;
    use crate::tape::{MemoryTape, Tape};

    #[test]
    fn test_working_buffer() {
        let mut buffer = WorkingBuffer::new(2);

        buffer.push(0);
        assert_eq!(buffer.is_full(), false);
        buffer.push(1);
        assert_eq!(buffer.is_full(), true);

        assert_eq!(buffer.as_slice(), &[0, 1]);
    }

    #[test]
    #[should_panic]
    fn test_working_buffer_overflow() {
        let mut tape = MemoryTape::with_items(vec![1, 2, 3]);
        let mut buffer = WorkingBuffer::new(2);

        buffer.load(&mut tape, 3).unwrap();
    }

    #[rstest]
    #[case(vec![])]
    #[case(vec![1])]
    #[case(vec![2, 1])]
    #[case(vec![81, 94, 11])]
    #[case(vec![5, 5, 5, 5])]
    #[case(vec![3, 1, 3, 1, 3, 1, 2])]
    #[case(vec![9, 8, 7, 6, 5, 4, 3, 2, 1, 0])]
    #[case(vec![i64::MAX, i64::MIN, 0, -1, 1])]
    fn test_sort(#[case] items: Vec<i64>) {
        let mut expected = items.clone();
        expected.sort();

        let capacity = items.len();
        let mut tape = MemoryTape::with_items(items);
        let mut buffer = WorkingBuffer::new(capacity);
        buffer.load(&mut tape, capacity).unwrap();
        buffer.sort();

        assert_eq!(buffer.as_slice(), expected.as_slice());
    }

    #[test]
    fn test_sort_shuffled() {
        let mut items = Vec::from_iter((0..200).map(|x| x / 3));
        let expected = items.clone();
        items.shuffle(&mut rand::thread_rng());

        let mut tape = MemoryTape::with_items(items);
        let mut buffer = WorkingBuffer::new(200);
        buffer.load(&mut tape, 200).unwrap();
        buffer.sort();

        assert_eq!(buffer.as_slice(), expected.as_slice());
    }

    // Places the smallest remaining item under the middle pivot of every partition.
    fn middle_pivot_adversary(len: usize) -> Vec<usize> {
        let mut slots = Vec::from_iter(0..len);
        let mut items = vec![0; len];
        for rank in 0..len {
            let middle = rank + (len - 1 - rank) / 2;
            items[slots[middle]] = rank;
            slots.swap(rank, middle);
        }

        return items;
    }

    #[test]
    fn test_sort_middle_pivot_adversary() {
        let len = 10_000;
        let items = middle_pivot_adversary(len);

        // a deep recursion would not fit into this stack
        let sorted = std::thread::Builder::new()
            .stack_size(64 * 1024)
            .spawn(move || {
                let mut tape = MemoryTape::with_items(items);
                let mut buffer = WorkingBuffer::new(len);
                buffer.load(&mut tape, len).unwrap();
                buffer.sort();
                buffer.as_slice().to_vec()
            })
            .unwrap()
            .join()
            .unwrap();

        assert_eq!(sorted, Vec::from_iter(0..len));
    }

    #[test]
    fn test_sort_idempotent() {
        let mut tape = MemoryTape::with_items(vec![6, 3, 8, 9, 3, 1, 0]);
        let mut buffer = WorkingBuffer::new(7);
        buffer.load(&mut tape, 7).unwrap();

        buffer.sort();
        let sorted = buffer.as_slice().to_vec();
        buffer.sort();

        assert_eq!(buffer.as_slice(), sorted.as_slice());
    }

    #[test]
    fn test_partial_chunk() {
        let mut source = MemoryTape::with_items(vec![9, 4, 7, 1, 8]);
        let mut destination = MemoryTape::new(5);
        let mut buffer = WorkingBuffer::new(3);

        buffer.load(&mut source, 3).unwrap();
        buffer.sort();
        buffer.drain(&mut destination).unwrap();
        assert!(buffer.is_empty());

        buffer.load(&mut source, 2).unwrap();
        buffer.sort();
        assert_eq!(buffer.len(), 2);
        buffer.drain(&mut destination).unwrap();

        assert_eq!(destination.as_slice(), &[4, 7, 9, 1, 8]);
        assert_eq!(destination.position(), 5);
    }
}
