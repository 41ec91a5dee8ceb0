//! Four-tape sorter.

use log;
use std::error::Error;
use std::fmt;
use std::fmt::Display;

use crate::buffer::WorkingBuffer;
use crate::merger;
use crate::pass::{self, PassLayout, TapePair};
use crate::tape::{Tape, TapeError};

/// Sorting error.
#[derive(Debug)]
pub enum SortError {
    /// Memory size is zero or exceeds the tape size.
    InvalidConfiguration { memory_size: usize, tape_size: usize },
    /// Tape operation error.
    Tape(TapeError),
}

impl Error for SortError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self {
            SortError::InvalidConfiguration { .. } => None,
            SortError::Tape(err) => Some(err),
        }
    }
}

impl Display for SortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self {
            SortError::InvalidConfiguration { memory_size, tape_size } => write!(
                f,
                "invalid configuration: memory size {} must be positive and not exceed tape size {}",
                memory_size, tape_size
            ),
            SortError::Tape(err) => write!(f, "tape operation failed: {}", err),
        }
    }
}

impl From<TapeError> for SortError {
    fn from(err: TapeError) -> Self {
        SortError::Tape(err)
    }
}

/// Tape sorter builder. Provides methods for [`TapeSorter`] initialization.
#[derive(Clone, Default)]
pub struct TapeSorterBuilder {
    /// Number of items fitting the working buffer.
    memory_size: usize,
    /// Number of items on the tape to be sorted.
    tape_size: usize,
}

impl TapeSorterBuilder {
    /// Creates an instance of a builder with default parameters.
    pub fn new() -> Self {
        TapeSorterBuilder::default()
    }

    /// Builds a [`TapeSorter`] instance using provided configuration.
    pub fn build(self) -> Result<TapeSorter, SortError> {
        TapeSorter::new(self.memory_size, self.tape_size)
    }

    /// Sets the number of items fitting the working buffer.
    pub fn with_memory_size(mut self, memory_size: usize) -> TapeSorterBuilder {
        self.memory_size = memory_size;
        return self;
    }

    /// Sets the number of items on the tape to be sorted.
    pub fn with_tape_size(mut self, tape_size: usize) -> TapeSorterBuilder {
        self.tape_size = tape_size;
        return self;
    }
}

/// Tape sorter. Sorts a tape using a bounded working buffer and three auxiliary tapes.
#[derive(Debug, Clone, Copy)]
pub struct TapeSorter {
    /// Number of items fitting the working buffer.
    memory_size: usize,
    /// Number of items on the tape to be sorted.
    tape_size: usize,
}

impl TapeSorter {
    /// Creates a new tape sorter instance.
    ///
    /// # Arguments
    /// * `memory_size` - Number of items fitting the working buffer, must be in range `1..=tape_size`
    /// * `tape_size` - Number of items on the tape to be sorted
    pub fn new(memory_size: usize, tape_size: usize) -> Result<Self, SortError> {
        if memory_size == 0 || memory_size > tape_size {
            return Err(SortError::InvalidConfiguration { memory_size, tape_size });
        }

        return Ok(TapeSorter { memory_size, tape_size });
    }

    pub fn memory_size(&self) -> usize {
        self.memory_size
    }

    pub fn tape_size(&self) -> usize {
        self.tape_size
    }

    /// Returns the number of merge passes needed to turn the initial runs into a single one,
    /// i.e. `ceil(log2(tape_size / memory_size))`.
    pub fn pass_count(&self) -> usize {
        let mut passes = 0;
        let mut run_size = self.memory_size;
        while run_size < self.tape_size {
            run_size = run_size.saturating_mul(2);
            passes += 1;
        }

        return passes;
    }

    /// Returns the run arithmetic of the merge pass `run_number` (starting with 0).
    pub fn layout(&self, run_number: usize) -> PassLayout {
        let chunk_size = self.memory_size.saturating_mul(1 << run_number.min(usize::BITS as usize - 1));
        PassLayout::new(self.tape_size, chunk_size)
    }

    /// Reads chunks of the working buffer size from `input`, sorts them, then writes them out
    /// alternately to `out1` and `out2`. The last chunk is shorter if the tape size is not a multiple
    /// of the memory size. All three tapes are reset afterwards.
    ///
    /// # Example
    ///
    /// ```text
    /// tape size 13, memory size 4
    ///
    /// (before) in:   6 3 8 9 3 1 0 7 3 5 9 2 4
    /// (after)  out1: 3 6 8 9 2 3 5 9
    ///          out2: 0 1 3 7 4
    /// ```
    pub fn initial_pass<T, D>(&self, input: &mut D, out1: &mut D, out2: &mut D) -> Result<(), SortError>
    where
        T: Ord + Clone,
        D: Tape<T>,
    {
        let full_chunks = self.tape_size / self.memory_size;
        let partial_chunk = self.tape_size % self.memory_size;
        log::debug!(
            "initial pass (full chunks: {}, partial chunk: {})",
            full_chunks,
            partial_chunk
        );

        let chunks = std::iter::repeat(self.memory_size)
            .take(full_chunks)
            .chain(Some(partial_chunk).filter(|&size| size > 0));

        let mut buffer = WorkingBuffer::new(self.memory_size);
        for (idx, size) in chunks.enumerate() {
            buffer.load(input, size)?;
            buffer.sort();
            if idx % 2 == 0 {
                buffer.drain(out1)?;
            } else {
                buffer.drain(out2)?;
            }
        }

        input.reset()?;
        out1.reset()?;
        out2.reset()?;

        return Ok(());
    }

    /// Merges the first `size1` items at the cursor of `in1` with the first `size2` items at the cursor of `in2`
    /// writing the merged run to `out`. See [`merger::merge_chunks`].
    pub fn merge_chunks<T, D>(
        &self,
        in1: &mut D,
        in2: &mut D,
        out: &mut D,
        size1: usize,
        size2: usize,
    ) -> Result<(), SortError>
    where
        T: Ord,
        D: Tape<T>,
    {
        return Ok(merger::merge_chunks(in1, in2, out, size1, size2)?);
    }

    /// Runs the merge pass `run_number` (starting with 0): merges runs of `memory_size * 2^run_number` items
    /// from the `input` tapes writing them alternately to the `output` tapes. See [`pass::run_pass`].
    pub fn run_pass<T, D>(
        &self,
        input: TapePair<'_, D>,
        output: TapePair<'_, D>,
        run_number: usize,
    ) -> Result<(), SortError>
    where
        T: Ord,
        D: Tape<T>,
    {
        return Ok(pass::run_pass(input, output, self.layout(run_number))?);
    }

    /// Sorts the data on tape `t1` in ascending order. The sorted data ends up on tape `t1`
    /// with the cursor at the start.
    ///
    /// Initially tape `t1` holds `tape_size` unsorted items, tapes `t2`, `t3` and `t4` are
    /// used as scratch space and their content is overwritten.
    pub fn sort<T, D>(&self, t1: &mut D, t2: &mut D, t3: &mut D, t4: &mut D) -> Result<(), SortError>
    where
        T: Ord + Clone,
        D: Tape<T>,
    {
        let pass_count = self.pass_count();
        log::info!(
            "sorting tape (tape size: {}, memory size: {}, passes: {})",
            self.tape_size,
            self.memory_size,
            pass_count
        );

        self.initial_pass(t1, t3, t4)?;

        for run_number in 0..pass_count {
            let (input, output) = if run_number % 2 == 0 {
                (TapePair::new(&mut *t3, &mut *t4), TapePair::new(&mut *t1, &mut *t2))
            } else {
                (TapePair::new(&mut *t1, &mut *t2), TapePair::new(&mut *t3, &mut *t4))
            };
            self.run_pass(input, output, run_number)?;
        }

        if pass_count % 2 == 0 {
            log::debug!("copying sorted data back to the first tape");
            for _ in 0..self.tape_size {
                t1.write(t3.read()?)?;
            }
            t1.reset()?;
            t3.reset()?;
        }

        log::info!("tape sorting done");

        return Ok(());
    }
}
