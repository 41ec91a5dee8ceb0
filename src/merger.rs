//! Two-way run merger.

use crate::tape::{Tape, TapeError};

/// A sorted run being consumed from a tape, one pending item at a time.
struct Run<'a, T, D> {
    tape: &'a mut D,
    remaining: usize,
    head: Option<T>,
}

impl<'a, T, D> Run<'a, T, D>
where
    D: Tape<T>,
{
    fn open(tape: &'a mut D, len: usize) -> Result<Self, TapeError> {
        let mut run = Run {
            tape,
            remaining: len,
            head: None,
        };
        run.advance()?;

        return Ok(run);
    }

    fn advance(&mut self) -> Result<(), TapeError> {
        self.head = if self.remaining > 0 {
            self.remaining -= 1;
            Some(self.tape.read()?)
        } else {
            None
        };

        return Ok(());
    }
}

/// Merges the run of `size1` items at the cursor of `in1` with the run of `size2` items at the cursor of `in2`
/// and writes the resulting run of `size1 + size2` items to `out`.
/// Both runs should be sorted in ascending order otherwise the result is undefined.
///
/// Exactly `size1` and `size2` items are read from the inputs, so a zero-length run is never touched.
/// Equal items are taken from `in1` first.
///
/// # Example
///
/// ```text
/// (before) in1: [ ... 1 3 6 8 9 ... ]   in2: [ ... 2 4 5 7 8 ... ]   out: [ ... _ _ _ _ _ _ _ _ ... ]
///                     ^                            ^                            ^
/// size1: 4, size2: 4
///
/// (after)  in1: [ ... 1 3 6 8 9 ... ]   in2: [ ... 2 4 5 7 8 ... ]   out: [ ... 1 2 3 4 5 6 7 8 ... ]
///                             ^                            ^                                     ^
/// ```
pub fn merge_chunks<T, D>(in1: &mut D, in2: &mut D, out: &mut D, size1: usize, size2: usize) -> Result<(), TapeError>
where
    T: Ord,
    D: Tape<T>,
{
    let mut first = Run::open(in1, size1)?;
    let mut second = Run::open(in2, size2)?;

    loop {
        let take_first = match (&first.head, &second.head) {
            (Some(item1), Some(item2)) => item1 <= item2,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };

        let run = if take_first { &mut first } else { &mut second };
        if let Some(item) = run.head.take() {
            out.write(item)?;
        }
        run.advance()?;
    }

    return Ok(());
}
