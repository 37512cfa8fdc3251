//! Counts the leaf nodes of the legal move tree from a given position. Defaults to the
//! standard starting position.
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
#![warn(missing_docs, missing_debug_implementations, unused_extern_crates)]

use std::fs::File;
use std::io::BufReader;
use std::io::prelude::*;
use std::path::PathBuf;
use std::time::Instant;
use clap::{App, Arg, crate_version};
use log::info;
use simplelog::{WriteLogger, LevelFilter, Config};
use chess::Board;

const STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn main() -> Result<(), Error> {
    let matches =
        App::new("morphy")
            .version(crate_version!())
            .about("Counts the leaf nodes of the legal move tree from a given position \
                    to a specified\ndepth. Defaults to the standard starting position.")
            .arg(Arg::with_name("file")
                .long("file")
                .short("f")
                .value_name("EPD_FILE")
                .takes_value(true)
                .conflicts_with("depth")
                .conflicts_with("fen")
                .help("An EPD file of positions with expected node counts"))
            .arg(Arg::with_name("fen")
                .value_name("FEN_STRING")
                .default_value(STARTPOS)
                .hide_default_value(true)
                .help("Position to search in Forsyth-Edwards Notation (FEN)"))
            .arg(Arg::with_name("depth")
                .long("depth")
                .short("d")
                .value_name("DEPTH")
                .takes_value(true)
                .default_value("6")
                .help("Depth to search the position"))
            .arg(Arg::with_name("log")
                .long("log")
                .short("l")
                .help("Turns on logging"))
            .arg(Arg::with_name("log-file")
                .long("log-file")
                .value_name("LOG_FILE")
                .takes_value(true)
                .default_value("morphy.log")
                .help("Sets the log file if logging is turned on"))
            .arg(Arg::with_name("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .takes_value(true)
                .default_value("info")
                .help("Sets the log level if logging is turned on"))
            .get_matches();

    let log_file = PathBuf::from(matches.value_of_os("log-file").expect("INFALLIBLE"));
    let log_level = match matches.value_of("log-level") {
        Some("off") => LevelFilter::Off,
        Some("error") => LevelFilter::Error,
        Some("warn") => LevelFilter::Warn,
        Some("info") => LevelFilter::Info,
        Some("debug") => LevelFilter::Debug,
        Some("trace") => LevelFilter::Trace,
        Some(level) => return Err(Error(format!("{}: invalid log level", level))),
        None => unreachable!(),
    };

    let _logger = if matches.is_present("log") {
        WriteLogger::init(
            log_level,
            Config::default(),
            File::create(&log_file).map_err(|err| {
                Error(format!("{}: {}", log_file.display(), err))
            })?)
    } else {
        WriteLogger::init(LevelFilter::Off, Config::default(), std::io::sink())
    };

    if let Some(file) = matches.value_of("file") {
        run_epd(file)
    } else {
        let depth = matches
            .value_of("depth")
            .expect("INFALLIBLE")
            .parse()
            .map_err(|_| Error("depth must be numeric".to_owned()))?;

        let fen = matches.value_of("fen").expect("INFALLIBLE");
        run_perft(fen, depth)
    }
}

/// Runs a split perft of `fen` to `depth` and prints the node count and speed.
fn run_perft(fen: &str, depth: u32) -> Result<(), Error> {
    let mut board: Board = fen.parse().map_err(|err| {
        Error(format!("{}: {}", fen, err))
    })?;

    let start = Instant::now();
    let nodes = board.perft::<true, true>(depth);
    let elapsed = start.elapsed().as_secs_f64();

    info!("{}: depth {}: {} nodes in {:.3}s", fen, depth, nodes, elapsed);
    println!("nodes {} nps {}", nodes, (nodes as f64 / elapsed / 1_000_000.0) as u64);

    Ok(())
}

/// Runs every test of an EPD perft suite and verifies the expected node counts.
fn run_epd(file: &str) -> Result<(), Error> {
    let epd = BufReader::new(File::open(file).map_err(|err| {
        Error(format!("{}: {}", file, err))
    })?);

    for (line_num, line) in epd.lines().enumerate() {
        let line = line.map_err(|err| {
            Error(format!("{}: line {}: {}", file, line_num + 1, err))
        })?;

        run_epd_line(&line).map_err(|err| {
            Error(format!("{}: line {}: {}", file, line_num + 1, err))
        })?;
    }

    Ok(())
}

/// Runs one EPD line of the form `fen ; D1 n1 ; D2 n2 ; ...`.
fn run_epd_line(line: &str) -> Result<(), String> {
    let mut fields = line.split(';');
    let fen = match fields.next() {
        Some(fen) => fen.trim(),
        None => return Ok(()),
    };
    if fen.is_empty() {
        return Ok(());
    }

    println!("\n{}", fen);
    let mut board: Board = fen.parse().map_err(|err| format!("{}", err))?;

    for field in fields {
        let nums: Vec<&str> = field.trim().trim_start_matches('D').split_whitespace().collect();
        if nums.len() != 2 {
            return Err(format!("\"{}\": malformed perft entry", field));
        }

        let depth: u32 = nums[0].parse().map_err(|err| {
            format!("\"{}\": {}", nums[0], err)
        })?;
        let expected: u64 = nums[1].parse().map_err(|err| {
            format!("\"{}\": {}", nums[1], err)
        })?;

        let count = board.perft::<true, false>(depth);
        println!("Depth {} result:\t{:12}", depth, count);
        info!("{}: depth {}: counted {}, expected {}", fen, depth, count, expected);

        if count != expected {
            return Err(format!("depth {}: expected {} but counted {}", depth, expected, count));
        }
    }

    Ok(())
}

struct Error(String);

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        self.0.fmt(f)
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for Error { }
