// frametext - Video frame to text encoder.
// Copyright 2025 0verv0ltage
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Text encodings of a frames pixel data.

use std::fmt::Write;

use clap::ValueEnum;
use image::{Rgb, RgbImage};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
#[value(rename_all = "lower")]
/// Text encoding applied to every pixel of a frame:
/// - monochrome (red intensity)
/// - hex (RRGGBB)
/// - rgb (decimal triplets)
pub enum OutputFormat {
    #[value(name = "monochrome")]
    /// Red channel intensity as a 3 digit zero padded decimal.
    Monochrome,
    #[value(name = "hex")]
    /// Red, green and blue as 6 uppercase hex digits.
    Hex,
    #[value(name = "rgb")]
    /// Red, green and blue as three 3 digit zero padded decimals.
    Rgb,
}

impl OutputFormat {
    /// Number of characters a single pixel is encoded as.
    pub fn pixel_width(self) -> usize {
        match self {
            OutputFormat::Monochrome => 3,
            OutputFormat::Hex => 6,
            OutputFormat::Rgb => 9,
        }
    }

    /// Append the encoding of a single pixel to `out`.
    ///
    /// # Arguments
    /// * `out` - String the encoded pixel is appended to.
    /// * `pixel` - Pixel to encode.
    pub fn encode_pixel(self, out: &mut String, pixel: Rgb<u8>) {
        let [red, green, blue] = pixel.0;
        // Writing into a String never fails.
        let _ = match self {
            OutputFormat::Monochrome => write!(out, "{red:03}"),
            OutputFormat::Hex => write!(out, "{red:02X}{green:02X}{blue:02X}"),
            OutputFormat::Rgb => write!(out, "{red:03}{green:03}{blue:03}"),
        };
    }

    /// Encode all pixels of `frame` into a single line.
    /// Pixels are read row by row, top to bottom and left to right,
    /// and concatenated without separator.
    ///
    /// # Arguments
    /// * `frame` - Resized frame to encode.
    pub fn encode_frame(self, frame: &RgbImage) -> String {
        let pixel_count = frame.width() as usize * frame.height() as usize;
        let mut line = String::with_capacity(pixel_count * self.pixel_width());
        // `pixels()` iterates in row-major order.
        for &pixel in frame.pixels() {
            self.encode_pixel(&mut line, pixel);
        }
        line
    }
}
