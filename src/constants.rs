// frametext - Video frame to text encoder.
// Copyright 2025 0verv0ltage
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Global constants.

// === Configuration Constants ===

/// Largest edge length (in pixels) a frame is shrunk to fit into
/// before the scale multiplier is applied.
/// Default: 20
pub const MAX_DIMENSION: u32 = 20;

/// Factor the fitted frame size is multiplied by.
/// 1 keeps frames inside the `MAX_DIMENSION` box,
/// 6 reproduces the enlarged variant.
/// Default: 1
pub const SCALE_MULTIPLIER: u32 = 1;

/// Upper bound for `max_dimension * multiplier`, the longest edge a
/// resized frame can have.
/// Default: 4096
pub const MAX_RENDER_DIMENSION: u32 = 4096;

/// File the encoded lines are written to, relative to the working directory.
/// Default: "output.txt"
pub const OUTPUT_FILE: &str = "output.txt";

/// Path to ffmpeg executable. Resolved through `PATH` unless absolute.
/// Default: "ffmpeg"
pub const FFMPEG_EXECUTABLE_PATH: &str = "ffmpeg";

/// Path to ffprobe executable. Resolved through `PATH` unless absolute.
/// Default: "ffprobe"
pub const FFPROBE_EXECUTABLE_PATH: &str = "ffprobe";

// === Fixed Constants ===
// DO NOT CHANGE THESE

/// How many color channels we use: red, green, blue
pub const COLOR_CHANNELS: usize = 3;

/// Pixel format requested from ffmpeg. Must match `COLOR_CHANNELS`
/// and the channel order of `image::Rgb`.
pub const RAW_PIXEL_FORMAT: &str = "rgb24";
