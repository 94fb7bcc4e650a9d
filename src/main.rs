// frametext - Video frame to text encoder.
// Copyright 2025 0verv0ltage
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! frametext - Video frame to text encoder.
//! Decodes a video frame by frame, shrinks every frame to a small grid
//! and writes its pixels as one line of text per frame.
//! NOTE: Needs ffmpeg and ffprobe installed.

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    clippy::missing_docs_in_private_items,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::pedantic,
    clippy::redundant_clone,
    clippy::needless_pass_by_value
)]
#![allow(clippy::cast_lossless)]

use std::time;

use anyhow::Result;
use clap::Parser;

use cli::Args;
use converter::{RunReport, StreamEnd};
use filesys::{check_output_path, file_len};
use sink::LineSink;
use source::VideoSource;
use utils::format_duration;

mod cli;
mod constants;
mod converter;
mod encoder;
mod filesys;
mod resize;
mod sink;
mod source;
mod utils;

/// Times the execution of `code` and
/// prints out the measured time.
macro_rules! timed_block {
    ($name:expr, $code:block) => {
        println!("Starting {}", $name);
        let start = std::time::Instant::now();
        $code
        println!(
            "Finished {} after: {}",
            $name,
            format_duration(start.elapsed())
        );
    };
}

/// Convert the video named in `args` and write the encoded frames.
///
/// Arguments are validated and the video is opened before
/// the output file is created or truncated.
fn execute_args(args: &Args) -> Result<RunReport> {
    let converter = args.to_converter_config()?;
    check_output_path(&args.output)?;

    let mut source = VideoSource::open(&args.video_file, &args.ffmpeg, &args.ffprobe)?;
    let geometry = source.geometry();
    println!(
        "Converting {:?} ({}x{}) to {:?} lines.",
        args.video_file,
        geometry.width,
        geometry.height,
        converter.format()
    );

    let mut sink = LineSink::create(&args.output)?;
    let report;
    timed_block!("frame conversion", {
        report = converter.run(&mut source, &mut sink)?;
    });
    sink.finish()?;
    source.release()?;

    println!(
        "Wrote {} lines ({} bytes) to {:?}.",
        report.frames_written,
        file_len(&args.output)?,
        args.output
    );
    if let StreamEnd::DecodeFailed(reason) = &report.end {
        eprintln!(
            "Warning: decoding stopped early after {} frames: {}",
            report.frames_written, reason
        );
    }
    Ok(report)
}

fn main() -> Result<()> {
    let main_start = time::Instant::now();

    let args = Args::parse();
    execute_args(&args)?;

    println!(
        "Total execution time: {}",
        format_duration(main_start.elapsed())
    );
    Ok(())
}
