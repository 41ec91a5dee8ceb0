use env_logger;
use log;

use tape_sort::{MemoryTape, Tape, TapeSorterBuilder};

fn main() {
    env_logger::Builder::new().filter_level(log::LevelFilter::Debug).init();

    let data: Vec<i64> = vec![81, 94, 11, 96, 12, 35, 17, 99, 28, 58, 41, 75, 15];
    let tape_size = data.len();

    let mut t1 = MemoryTape::with_items(data);
    let mut t2 = MemoryTape::new(tape_size);
    let mut t3 = MemoryTape::new(tape_size);
    let mut t4 = MemoryTape::new(tape_size);

    let sorter = TapeSorterBuilder::new()
        .with_memory_size(3)
        .with_tape_size(tape_size)
        .build()
        .unwrap();

    sorter.sort(&mut t1, &mut t2, &mut t3, &mut t4).unwrap();

    let sorted: Vec<i64> = (0..tape_size).map(|_| t1.read().unwrap()).collect();
    println!("{:?}", sorted);
}
