use std::fs;
use std::io::{self, prelude::*};
use std::path::{Path, PathBuf};
use std::process;

use bytesize::ByteSize;
use clap::ArgEnum;
use env_logger;
use log;

use tape_sort::{RmpFileTape, Tape, TapeError, TapeSorter};

fn main() {
    let arg_parser = build_arg_parser();

    let log_level: LogLevel = arg_parser.value_of_t_or_exit("log_level");
    init_logger(log_level);

    let memory_size: usize = arg_parser.value_of_t_or_exit("memory_size");
    let rw_buf_size: Option<usize> = arg_parser.value_of("rw_buf_size").map(|v| {
        v.parse::<ByteSize>().expect("value is pre-validated").as_u64() as usize
    });
    let tmp_dir = match arg_parser.value_of("tmp_dir") {
        Some(tmp_dir) => tempfile::tempdir_in(tmp_dir),
        None => tempfile::tempdir(),
    };
    let tmp_dir = match tmp_dir {
        Ok(tmp_dir) => tmp_dir,
        Err(err) => {
            log::error!("temporary directory creation error: {}", err);
            process::exit(1);
        }
    };
    log::info!("using {} as a temporary directory", tmp_dir.path().display());

    let input = PathBuf::from(arg_parser.value_of("input").expect("value is required"));
    let tape_size = match count_lines(&input) {
        Ok(tape_size) => tape_size,
        Err(err) => {
            log::error!("input file reading error: {}", err);
            process::exit(1);
        }
    };

    let output = arg_parser.value_of("output").expect("value is required");
    let mut output_stream = match fs::File::create(output) {
        Ok(file) => io::BufWriter::new(file),
        Err(err) => {
            log::error!("output file creation error: {}", err);
            process::exit(1);
        }
    };

    if tape_size == 0 {
        log::warn!("input file is empty, nothing to sort");
        return;
    }

    let memory_size = if memory_size > tape_size {
        log::warn!(
            "memory size {} exceeds the number of items, using {} instead",
            memory_size,
            tape_size
        );
        tape_size
    } else {
        memory_size
    };

    let sorter = match TapeSorter::new(memory_size, tape_size) {
        Ok(sorter) => sorter,
        Err(err) => {
            log::error!("sorter initialization error: {}", err);
            process::exit(1);
        }
    };

    let [mut t1, mut t2, mut t3, mut t4] = match create_tapes(tmp_dir.path(), tape_size, rw_buf_size) {
        Ok(tapes) => tapes,
        Err(err) => {
            log::error!("tape creation error: {}", err);
            process::exit(1);
        }
    };

    if let Err(err) = load_tape(&input, &mut t1) {
        log::error!("input data loading error: {}", err);
        process::exit(1);
    }

    if let Err(err) = sorter.sort(&mut t1, &mut t2, &mut t3, &mut t4) {
        log::error!("data sorting error: {}", err);
        process::exit(1);
    }

    for _ in 0..tape_size {
        let item = match t1.read() {
            Ok(item) => item,
            Err(err) => {
                log::error!("sorted tape reading error: {}", err);
                process::exit(1);
            }
        };
        if let Err(err) = output_stream.write_all(format!("{}\n", item).as_bytes()) {
            log::error!("data saving error: {}", err);
            process::exit(1);
        };
    }

    if let Err(err) = output_stream.flush() {
        log::error!("data flushing error: {}", err);
        process::exit(1);
    }
}

fn count_lines(path: &Path) -> io::Result<usize> {
    let mut count = 0;
    for line in io::BufReader::new(fs::File::open(path)?).lines() {
        if !line?.trim().is_empty() {
            count += 1;
        }
    }

    return Ok(count);
}

fn create_tapes(dir: &Path, capacity: usize, rw_buf_size: Option<usize>) -> Result<[RmpFileTape<i64>; 4], TapeError> {
    return Ok([
        RmpFileTape::new(dir, capacity, rw_buf_size)?,
        RmpFileTape::new(dir, capacity, rw_buf_size)?,
        RmpFileTape::new(dir, capacity, rw_buf_size)?,
        RmpFileTape::new(dir, capacity, rw_buf_size)?,
    ]);
}

fn load_tape(path: &Path, tape: &mut RmpFileTape<i64>) -> Result<(), Box<dyn std::error::Error>> {
    for (idx, line) in io::BufReader::new(fs::File::open(path)?).lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let item = line
            .parse::<i64>()
            .map_err(|err| format!("line {}: {}: {:?}", idx + 1, err, line))?;
        tape.write(item)?;
    }
    tape.reset()?;

    return Ok(());
}

#[derive(Copy, Clone, clap::ArgEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn possible_values() -> impl Iterator<Item = clap::PossibleValue<'static>> {
        Self::value_variants().iter().filter_map(|v| v.to_possible_value())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <LogLevel as clap::ArgEnum>::from_str(s, false)
    }
}

fn build_arg_parser() -> clap::ArgMatches {
    clap::App::new("tape-sort")
        .about("four-tape balanced merge sorter for files of integers")
        .arg(
            clap::Arg::new("input")
                .short('i')
                .long("input")
                .help("file to be sorted, one integer per line")
                .required(true)
                .takes_value(true),
        )
        .arg(
            clap::Arg::new("output")
                .short('o')
                .long("output")
                .help("result file")
                .required(true)
                .takes_value(true),
        )
        .arg(
            clap::Arg::new("memory_size")
                .short('m')
                .long("memory-size")
                .help("number of items sorted in memory at once")
                .required(true)
                .takes_value(true)
                .validator(|v| match v.parse::<usize>() {
                    Ok(0) => Err(String::from("Memory size must be positive")),
                    Ok(_) => Ok(()),
                    Err(err) => Err(format!("Memory size format incorrect: {}", err)),
                }),
        )
        .arg(
            clap::Arg::new("log_level")
                .short('l')
                .long("loglevel")
                .help("logging level")
                .takes_value(true)
                .default_value("info")
                .possible_values(LogLevel::possible_values()),
        )
        .arg(
            clap::Arg::new("tmp_dir")
                .short('d')
                .long("tmp-dir")
                .help("directory to be used to store tape files")
                .takes_value(true),
        )
        .arg(
            clap::Arg::new("rw_buf_size")
                .short('b')
                .long("rw-buf-size")
                .help("tape file read/write buffer size")
                .takes_value(true)
                .validator(|v| match v.parse::<ByteSize>() {
                    Ok(_) => Ok(()),
                    Err(err) => Err(format!("Buffer size format incorrect: {}", err)),
                }),
        )
        .get_matches()
}

fn init_logger(log_level: LogLevel) {
    env_logger::Builder::new()
        .filter_level(match log_level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        })
        .format_timestamp_millis()
        .init();
}
