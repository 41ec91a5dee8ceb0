//! `tape-sort` is a rust four-tape balanced merge sort implementation.
//!
//! Tape sorting is the classic form of external sorting: the data does not fit into the main memory and lives on
//! sequential access devices which can only be read or written forward and rewound to the start. Sorting is
//! done in two phases. During the initial pass chunks of data that fit in memory are sorted and distributed
//! alternately over two tapes. Then balanced merge passes combine pairs of runs from two tapes into runs twice as
//! long written alternately to the other two tapes, until a single run spans the whole data set.
//! For more information see [External Sorting](https://en.wikipedia.org/wiki/External_sorting).
//!
//! # Overview
//!
//! `tape-sort` supports the following features:
//!
//! * **Tape agnostic:**
//!   the algorithm works with anything implementing the [`Tape`] trait. An in-memory tape ([`MemoryTape`]) and
//!   a file-backed one ([`RmpFileTape`]) are provided.
//! * **Data agnostic:**
//!   any totally ordered type can be sorted, file-backed tapes store items that implement `serde`
//!   serialization/deserialization using the `MessagePack` format.
//! * **Bounded memory:**
//!   no more than `memory_size` items are held in memory at any time.
//!
//! # Example
//!
//! ```no_run
//! use tape_sort::{RmpFileTape, Tape, TapeSorterBuilder};
//!
//! fn main() {
//!     let data: Vec<i64> = vec![81, 94, 11, 96, 12, 35, 17, 99, 28, 58, 41, 75, 15];
//!     let tape_size = data.len();
//!     let tmp_dir = tempfile::tempdir().unwrap();
//!
//!     let mut t1 = RmpFileTape::build(&tmp_dir, data, None).unwrap();
//!     let mut t2 = RmpFileTape::new(&tmp_dir, tape_size, None).unwrap();
//!     let mut t3 = RmpFileTape::new(&tmp_dir, tape_size, None).unwrap();
//!     let mut t4 = RmpFileTape::new(&tmp_dir, tape_size, None).unwrap();
//!
//!     let sorter = TapeSorterBuilder::new()
//!         .with_memory_size(3)
//!         .with_tape_size(tape_size)
//!         .build()
//!         .unwrap();
//!
//!     sorter.sort(&mut t1, &mut t2, &mut t3, &mut t4).unwrap();
//!
//!     for _ in 0..tape_size {
//!         println!("{}", t1.read().unwrap());
//!     }
//! }
//! ```

pub mod buffer;
pub mod file;
pub mod merger;
pub mod pass;
pub mod sort;
pub mod tape;

pub use buffer::WorkingBuffer;
pub use file::RmpFileTape;
pub use merger::merge_chunks;
pub use pass::{run_pass, PassLayout, TapePair};
pub use sort::{SortError, TapeSorter, TapeSorterBuilder};
pub use tape::{MemoryTape, Tape, TapeError};
