//! Balanced merge pass.

use log;

use crate::merger::merge_chunks;
use crate::tape::{Tape, TapeError};

/// Two tapes playing the same role (source or destination) in a pass.
pub struct TapePair<'a, D> {
    pub first: &'a mut D,
    pub second: &'a mut D,
}

impl<'a, D> TapePair<'a, D> {
    pub fn new(first: &'a mut D, second: &'a mut D) -> Self {
        TapePair { first, second }
    }

    /// Resets both tapes.
    pub fn reset<T>(&mut self) -> Result<(), TapeError>
    where
        D: Tape<T>,
    {
        self.first.reset()?;
        self.second.reset()?;

        return Ok(());
    }
}

/// Run arithmetic of a single merge pass.
///
/// Runs of `chunk_size` items alternate between the two source tapes, the first source holding the even ones.
/// The pass merges `full_chunks` pairs of full runs and then whatever is left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassLayout {
    /// Length of the runs on the source tapes.
    pub chunk_size: usize,
    /// Number of complete run pairs.
    pub full_chunks: usize,
    /// Number of items remaining after the complete pairs.
    pub leftovers: usize,
}

impl PassLayout {
    pub fn new(tape_size: usize, chunk_size: usize) -> Self {
        let pair_size = chunk_size.saturating_mul(2);
        let full_chunks = tape_size / pair_size;
        PassLayout {
            chunk_size,
            full_chunks,
            leftovers: tape_size - pair_size * full_chunks,
        }
    }

    /// Returns the run sizes of the trailing merge that follows the complete pairs, if any.
    ///
    /// When the leftovers do not exceed a chunk they form a single run on the first source tape
    /// with nothing to pair it with, so it is merged with an empty run, i.e. copied.
    pub fn trailing_merge(&self) -> Option<(usize, usize)> {
        if self.leftovers == 0 {
            None
        } else if self.leftovers > self.chunk_size {
            Some((self.chunk_size, self.leftovers - self.chunk_size))
        } else {
            Some((self.leftovers, 0))
        }
    }

    /// Returns the number of runs the pass writes.
    pub fn output_runs(&self) -> usize {
        self.full_chunks + self.trailing_merge().map_or(0, |_| 1)
    }
}

/// Merges runs from the `input` tapes and writes the merged runs alternately to the `output` tapes,
/// starting with `output.first`. All four tapes are reset once the pass is done.
///
/// # Example
///
/// ```text
/// chunk size 4, tape size 14 (leftovers exceed the chunk size)
///
/// in1  -> { 1 3 5 6 } { 5 7 8 9 }
/// in2  -> { 2 3 4 7 } { 3 5 }
/// out1 -> { 1 2 3 3 4 5 6 7 }
/// out2 -> { 3 5 5 7 8 9 }
/// ```
pub fn run_pass<T, D>(
    mut input: TapePair<'_, D>,
    mut output: TapePair<'_, D>,
    layout: PassLayout,
) -> Result<(), TapeError>
where
    T: Ord,
    D: Tape<T>,
{
    log::debug!(
        "merge pass (chunk size: {}, full chunks: {}, leftovers: {}, output runs: {})",
        layout.chunk_size,
        layout.full_chunks,
        layout.leftovers,
        layout.output_runs()
    );

    let merges = std::iter::repeat((layout.chunk_size, layout.chunk_size))
        .take(layout.full_chunks)
        .chain(layout.trailing_merge());

    for (idx, (size1, size2)) in merges.enumerate() {
        let out = if idx % 2 == 0 {
            &mut *output.first
        } else {
            &mut *output.second
        };
        log::trace!("merging runs #{} (sizes: {}, {})", idx, size1, size2);
        merge_chunks(&mut *input.first, &mut *input.second, out, size1, size2)?;
    }

    input.reset()?;
    output.reset()?;

    return Ok(());
}

#[cfg(test)]
mod test {
    use rstest::*;

    use super::{run_pass, PassLayout, TapePair};
    use crate::tape::{MemoryTape, Tape};

    #[rstest]
    #[case(8, 2, PassLayout { chunk_size: 2, full_chunks: 2, leftovers: 0 }, None)]
    #[case(13, 3, PassLayout { chunk_size: 3, full_chunks: 2, leftovers: 1 }, Some((1, 0)))]
    #[case(14, 4, PassLayout { chunk_size: 4, full_chunks: 1, leftovers: 6 }, Some((4, 2)))]
    #[case(8, 5, PassLayout { chunk_size: 5, full_chunks: 0, leftovers: 8 }, Some((5, 3)))]
    #[case(6, 2, PassLayout { chunk_size: 2, full_chunks: 1, leftovers: 2 }, Some((2, 0)))]
    #[case(3, 4, PassLayout { chunk_size: 4, full_chunks: 0, leftovers: 3 }, Some((3, 0)))]
    #[case(10, usize::MAX, PassLayout { chunk_size: usize::MAX, full_chunks: 0, leftovers: 10 }, Some((10, 0)))]
    fn test_pass_layout(
        #[case] tape_size: usize,
        #[case] chunk_size: usize,
        #[case] expected: PassLayout,
        #[case] trailing: Option<(usize, usize)>,
    ) {
        let layout = PassLayout::new(tape_size, chunk_size);

        assert_eq!(layout, expected);
        assert_eq!(layout.trailing_merge(), trailing);
        assert_eq!(layout.output_runs(), expected.full_chunks + trailing.iter().count());
    }

    #[rstest]
    // even number of chunks
    #[case(
        4,
        vec![1, 3, 5, 6, 5, 7, 8, 9],
        vec![2, 3, 4, 7, 3, 5, 6, 9],
        vec![1, 2, 3, 3, 4, 5, 6, 7],
        vec![3, 5, 5, 6, 7, 8, 9, 9],
    )]
    // odd number of chunks
    #[case(
        3,
        vec![1, 3, 5, 6, 7, 9, 3, 4, 8],
        vec![2, 4, 6, 2, 7, 8, 0, 3, 9],
        vec![1, 2, 3, 4, 5, 6, 0, 3, 3, 4, 8, 9],
        vec![2, 6, 7, 7, 8, 9],
    )]
    // leftovers equal to the chunk size
    #[case(
        4,
        vec![1, 3, 5, 6, 5, 7, 8, 9],
        vec![2, 3, 4, 7],
        vec![1, 2, 3, 3, 4, 5, 6, 7],
        vec![5, 7, 8, 9],
    )]
    // leftovers below the chunk size
    #[case(
        4,
        vec![1, 3, 5, 6, 5, 7],
        vec![2, 3, 4, 7],
        vec![1, 2, 3, 3, 4, 5, 6, 7],
        vec![5, 7],
    )]
    // leftovers above the chunk size
    #[case(
        4,
        vec![1, 3, 5, 6, 5, 7, 8, 9],
        vec![2, 3, 4, 7, 3, 5],
        vec![1, 2, 3, 3, 4, 5, 6, 7],
        vec![3, 5, 5, 7, 8, 9],
    )]
    // no full chunks
    #[case(
        5,
        vec![2, 4, 5, 8, 9],
        vec![1, 5, 7],
        vec![1, 2, 4, 5, 5, 7, 8, 9],
        vec![],
    )]
    fn test_run_pass(
        #[case] chunk_size: usize,
        #[case] in1: Vec<i32>,
        #[case] in2: Vec<i32>,
        #[case] expected_out1: Vec<i32>,
        #[case] expected_out2: Vec<i32>,
    ) {
        let tape_size = in1.len() + in2.len();
        let mut in1 = MemoryTape::with_items(in1);
        let mut in2 = MemoryTape::with_items(in2);
        let mut out1 = MemoryTape::new(tape_size);
        let mut out2 = MemoryTape::new(tape_size);

        run_pass(
            TapePair::new(&mut in1, &mut in2),
            TapePair::new(&mut out1, &mut out2),
            PassLayout::new(tape_size, chunk_size),
        )
        .unwrap();

        assert_eq!(out1.as_slice(), expected_out1.as_slice());
        assert_eq!(out2.as_slice(), expected_out2.as_slice());
        for tape in [&in1, &in2, &out1, &out2] {
            assert_eq!(tape.position(), 0);
        }
    }
}
