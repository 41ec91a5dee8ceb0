//! File-backed tape.

use std::fs;
use std::io;
use std::io::prelude::*;
use std::marker::PhantomData;
use std::path::Path;

use tempfile;

use crate::tape::{Tape, TapeError};

enum Mode {
    Idle,
    Reading(io::BufReader<fs::File>),
    Writing(io::BufWriter<fs::File>),
}

/// RMP (Rust MessagePack) file tape implementation.
/// Items are stored in an anonymous temporary file using MessagePack as a data serialization format.
/// For more information see https://msgpack.org/.
pub struct RmpFileTape<T> {
    file: fs::File,
    mode: Mode,
    rw_buf_size: Option<usize>,
    capacity: usize,
    cursor: usize,
    // logical end of the tape, items past it are unreadable
    end: usize,

    item_type: PhantomData<T>,
}

impl<T> RmpFileTape<T>
where
    T: serde::ser::Serialize + serde::de::DeserializeOwned,
{
    /// Creates an empty tape stored in the provided directory.
    ///
    /// # Arguments
    /// * `dir` - Directory the backing file is created in
    /// * `capacity` - Maximum number of items the tape can hold
    /// * `rw_buf_size` - File read/write buffer size. If the parameter is [`None`] default buffer size is used.
    pub fn new(dir: impl AsRef<Path>, capacity: usize, rw_buf_size: Option<usize>) -> Result<Self, TapeError> {
        let file = tempfile::tempfile_in(dir)?;

        return Ok(RmpFileTape {
            file,
            mode: Mode::Idle,
            rw_buf_size,
            capacity,
            cursor: 0,
            end: 0,
            item_type: PhantomData,
        });
    }

    /// Builds a tape filled with the provided items. The tape capacity is the number of items,
    /// the cursor is at the start.
    pub fn build(dir: impl AsRef<Path>, items: Vec<T>, rw_buf_size: Option<usize>) -> Result<Self, TapeError> {
        let mut tape = Self::new(dir, items.len(), rw_buf_size)?;
        for item in items {
            tape.write(item)?;
        }
        tape.reset()?;

        return Ok(tape);
    }

    fn reader(&mut self) -> Result<&mut io::BufReader<fs::File>, TapeError> {
        if !matches!(self.mode, Mode::Reading(_)) {
            self.finish_writing()?;
            let file = self.file.try_clone()?;
            self.mode = Mode::Reading(match self.rw_buf_size {
                Some(buf_size) => io::BufReader::with_capacity(buf_size, file),
                None => io::BufReader::new(file),
            });
        }

        match &mut self.mode {
            Mode::Reading(reader) => Ok(reader),
            _ => unreachable!("tape has just been switched to reading"),
        }
    }

    fn writer(&mut self) -> Result<&mut io::BufWriter<fs::File>, TapeError> {
        if !matches!(self.mode, Mode::Writing(_)) {
            let offset = match std::mem::replace(&mut self.mode, Mode::Idle) {
                Mode::Reading(mut reader) => reader.stream_position()?,
                _ => 0,
            };
            self.file.set_len(offset)?;
            self.file.seek(io::SeekFrom::Start(offset))?;

            let file = self.file.try_clone()?;
            self.mode = Mode::Writing(match self.rw_buf_size {
                Some(buf_size) => io::BufWriter::with_capacity(buf_size, file),
                None => io::BufWriter::new(file),
            });
        }

        match &mut self.mode {
            Mode::Writing(writer) => Ok(writer),
            _ => unreachable!("tape has just been switched to writing"),
        }
    }

    fn finish_writing(&mut self) -> Result<(), TapeError> {
        if let Mode::Writing(writer) = &mut self.mode {
            writer.flush()?;
        }
        self.mode = Mode::Idle;

        return Ok(());
    }
}

impl<T> Tape<T> for RmpFileTape<T>
where
    T: serde::ser::Serialize + serde::de::DeserializeOwned,
{
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

        let writer = self.writer()?;
        rmp_serde::encode::write(writer, &item).map_err(TapeError::SerializationError)?;

        self.cursor += 1;
        self.end = self.cursor;

        return Ok(());
    }

    fn read(&mut self) -> Result<T, TapeError> {
        if self.cursor >= self.end {
            return Err(TapeError::OutOfBounds { position: self.cursor });
        }

        let reader = self.reader()?;
        let item = rmp_serde::decode::from_read(reader).map_err(TapeError::DeserializationError)?;
        self.cursor += 1;

        return Ok(item);
    }

    fn reset(&mut self) -> Result<(), TapeError> {
        self.finish_writing()?;
        self.file.rewind()?;
        self.cursor = 0;

        return Ok(());
    }
}
