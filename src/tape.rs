//! Sequential access tapes.

use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::io;

/// Tape operation error.
#[derive(Debug)]
pub enum TapeError {
    /// Write attempted while the cursor is at the tape capacity.
    OutOfSpace { capacity: usize },
    /// Read attempted at or past the logical end of the tape.
    OutOfBounds { position: usize },
    /// Common I/O error.
    IO(io::Error),
    /// Data serialization error.
    SerializationError(rmp_serde::encode::Error),
    /// Data deserialization error.
    DeserializationError(rmp_serde::decode::Error),
}

impl Error for TapeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self {
            TapeError::OutOfSpace { .. } | TapeError::OutOfBounds { .. } => None,
            TapeError::IO(err) => Some(err),
            TapeError::SerializationError(err) => Some(err),
            TapeError::DeserializationError(err) => Some(err),
        }
    }
}

impl Display for TapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self {
            TapeError::OutOfSpace { capacity } => write!(f, "tape is full (capacity: {})", capacity),
            TapeError::OutOfBounds { position } => write!(f, "read past the end of the tape (position: {})", position),
            TapeError::IO(err) => write!(f, "I/O operation failed: {}", err),
            TapeError::SerializationError(err) => write!(f, "data serialization error: {}", err),
            TapeError::DeserializationError(err) => write!(f, "data deserialization error: {}", err),
        }
    }
}

impl From<io::Error> for TapeError {
    fn from(err: io::Error) -> Self {
        TapeError::IO(err)
    }
}

/// Tape interface. A tape is a bounded storage device with a single cursor that only moves forward.
/// The only way back is [`Tape::reset`], which returns the cursor to the start.
///
/// Writing at the cursor makes the cursor position the new logical end of the tape: whatever
/// was recorded past it is gone, as on a physical tape.
pub trait Tape<T> {
    /// Returns the maximum number of items the tape can hold.
    fn capacity(&self) -> usize;

    /// Returns the current cursor position.
    fn position(&self) -> usize;

    /// Writes an item at the cursor and advances it.
    fn write(&mut self, item: T) -> Result<(), TapeError>;

    /// Reads the item at the cursor and advances it.
    fn read(&mut self) -> Result<T, TapeError>;

    /// Moves the cursor back to the start of the tape. Contents are kept.
    fn reset(&mut self) -> Result<(), TapeError>;
}

/// In-memory tape.
#[derive(Debug, Clone)]
pub struct MemoryTape<T> {
    capacity: usize,
    cursor: usize,
    items: Vec<T>,
}

impl<T> MemoryTape<T> {
    /// Creates an empty tape.
    pub fn new(capacity: usize) -> Self {
        MemoryTape {
            capacity,
            cursor: 0,
            items: Vec::with_capacity(capacity),
        }
    }

    /// Creates a tape filled to capacity with the provided items. The cursor is at the start.
    pub fn with_items(items: Vec<T>) -> Self {
        MemoryTape {
            capacity: items.len(),
            cursor: 0,
            items,
        }
    }

    /// Returns the number of items recorded on the tape.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the recorded items regardless of the cursor position.
    pub fn as_slice(&self) -> &[T] {
        self.items.as_slice()
    }

    pub fn into_inner(self) -> Vec<T> {
        self.items
    }
}

impl<T: Clone> Tape<T> for MemoryTape<T> {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn position(&self) -> usize {
        self.cursor
    }

    fn write(&mut self, item: T) -> Result<(), TapeError> {
        if self.cursor >= self.capacity {
            return Err(TapeError::OutOfSpace {
                capacity: self.capacity,
            });
        }

        self.items.truncate(self.cursor);
        self.items.push(item);
        self.cursor += 1;

        return Ok(());
    }

    fn read(&mut self) -> Result<T, TapeError> {
        let item = self
            .items
            .get(self.cursor)
            .cloned()
            .ok_or(TapeError::OutOfBounds { position: self.cursor })?;
        self.cursor += 1;

        return Ok(item);
    }

    fn reset(&mut self) -> Result<(), TapeError> {
        self.cursor = 0;
        return Ok(());
    }
}

#[cfg(test)]
mod test {
    use rstest::*;

    use super::{MemoryTape, Tape, TapeError};

    #[test]
    fn test_memory_tape() {
        let mut tape = MemoryTape::new(3);

        tape.write(5).unwrap();
        tape.write(1).unwrap();
        assert_eq!(tape.position(), 2);

        tape.reset().unwrap();
        assert_eq!(tape.read().unwrap(), 5);
        assert_eq!(tape.read().unwrap(), 1);
        assert!(matches!(tape.read(), Err(TapeError::OutOfBounds { position: 2 })));

        assert_eq!(tape.as_slice(), &[5, 1]);
    }

    #[test]
    fn test_memory_tape_out_of_space() {
        let mut tape = MemoryTape::with_items(vec![1, 2]);
        tape.read().unwrap();
        tape.read().unwrap();

        assert!(matches!(tape.write(3), Err(TapeError::OutOfSpace { capacity: 2 })));
    }

    #[rstest]
    #[case(0, vec![])]
    #[case(1, vec![7])]
    #[case(2, vec![7, 8])]
    fn test_memory_tape_write_discards_tail(#[case] skipped: usize, #[case] expected: Vec<i32>) {
        let mut tape = MemoryTape::with_items(vec![7, 8, 9]);
        for _ in 0..skipped {
            tape.read().unwrap();
        }
        tape.write(0).unwrap();

        let mut expected = expected;
        expected.push(0);
        assert_eq!(tape.into_inner(), expected);
    }
}
