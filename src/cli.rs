// frametext - Video frame to text encoder.
// Copyright 2025 0verv0ltage
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! cli - Command line interface tooling.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::{
    constants::{
        FFMPEG_EXECUTABLE_PATH, FFPROBE_EXECUTABLE_PATH, MAX_DIMENSION, OUTPUT_FILE,
        SCALE_MULTIPLIER,
    },
    converter::Converter,
    encoder::OutputFormat,
    resize::Resizer,
};

#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = None,
    override_usage = "frametext [OPTIONS] <VIDEO_FILE> <monochrome|hex|rgb>"
)]
/// Command line argument handler.
pub struct Args {
    /// Video file to convert.
    pub video_file: PathBuf,
    #[arg(
        value_enum,
        help = "Output format: monochrome (red intensity), hex (RRGGBB) or rgb (decimal triplets)"
    )]
    /// Output format: monochrome (red intensity), hex (RRGGBB) or rgb (decimal triplets)
    pub output_format: OutputFormat,
    #[arg(
        short,
        long,
        default_value = OUTPUT_FILE,
        help = "File the encoded frames are written to. Truncated if it exists."
    )]
    /// File the encoded frames are written to. Truncated if it exists.
    pub output: PathBuf,
    #[arg(
        short,
        long,
        default_value_t = MAX_DIMENSION,
        value_parser = clap::value_parser!(u32).range(1..=4096),
        help = "Edge length of the box frames are fitted into."
    )]
    /// Edge length of the box frames are fitted into.
    max_dimension: u32,
    #[arg(
        short,
        long,
        default_value_t = SCALE_MULTIPLIER,
        value_parser = clap::value_parser!(u32).range(1..=100),
        help = "Multiplier applied to the fitted frame size. max-dimension * scale may not exceed 4096."
    )]
    /// Multiplier applied to the fitted frame size.
    scale: u32,
    #[arg(
        short,
        long,
        default_value_t = false,
        help = "Do not print the render size of every frame."
    )]
    /// Do not print the render size of every frame.
    pub quiet: bool,
    #[arg(long, default_value = FFMPEG_EXECUTABLE_PATH, help = "Path to the ffmpeg executable.")]
    /// Path to the ffmpeg executable.
    pub ffmpeg: PathBuf,
    #[arg(long, default_value = FFPROBE_EXECUTABLE_PATH, help = "Path to the ffprobe executable.")]
    /// Path to the ffprobe executable.
    pub ffprobe: PathBuf,
}

impl Args {
    /// Use command line arguments to constuct converter instance.
    pub fn to_converter_config(&self) -> Result<Converter> {
        let resizer = Resizer::new(self.max_dimension, self.scale)?;
        Ok(Converter::new(resizer, self.output_format, !self.quiet))
    }
}
