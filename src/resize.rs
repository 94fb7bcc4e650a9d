// frametext - Video frame to text encoder.
// Copyright 2025 0verv0ltage
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Scaling decoded frames down to the render grid.

use std::fmt;

use anyhow::{Result, bail};
use image::{
    RgbImage,
    imageops::{self, FilterType},
};

use crate::constants::MAX_RENDER_DIMENSION;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Dimensions of a frame after resizing.
/// Displayed as `(height, width)`.
pub struct RenderSize {
    /// Rows of the resized frame.
    pub height: u32,
    /// Columns of the resized frame.
    pub width: u32,
}

impl fmt::Display for RenderSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.height, self.width)
    }
}

#[derive(Debug, Clone, Copy)]
/// Fits frames of any size into a square box of `max_dimension` pixels,
/// keeping the aspect ratio, then multiplies the result by `multiplier`.
pub struct Resizer {
    /// Edge length of the bounding box.
    max_dimension: u32,
    /// Factor applied on top of the fitted scale.
    multiplier: u32,
}

impl Resizer {
    /// Resampling filter. Bilinear, same as the usual video library default.
    const FILTER: FilterType = FilterType::Triangle;

    /// Generates a new Resizer.
    ///
    /// * `max_dimension` - Edge length of the bounding box frames are fitted into.
    /// * `multiplier` - Factor the fitted size is enlarged by.
    pub fn new(max_dimension: u32, multiplier: u32) -> Result<Self> {
        if max_dimension == 0 {
            bail!("Maximum dimension must be at least one pixel.");
        }
        if multiplier == 0 {
            bail!("Scale multiplier must be at least one.");
        }
        if max_dimension.saturating_mul(multiplier) > MAX_RENDER_DIMENSION {
            bail!(
                "Maximum dimension ({}) times scale multiplier ({}) exceeds {} pixels.",
                max_dimension,
                multiplier,
                MAX_RENDER_DIMENSION
            );
        }
        Ok(Self {
            max_dimension,
            multiplier,
        })
    }

    /// Compute the size a `width` x `height` frame is resized to.
    ///
    /// The scale is `min(max / width, max / height) * multiplier` and each
    /// dimension is truncated toward zero. A dimension that would truncate
    /// to zero (extreme aspect ratios) is clamped to one pixel.
    pub fn render_size(&self, width: u32, height: u32) -> Result<RenderSize> {
        if width == 0 || height == 0 {
            bail!("Can not resize an empty frame ({width}x{height}).");
        }
        let max_dimension = f64::from(self.max_dimension);
        let scale = (max_dimension / f64::from(width)).min(max_dimension / f64::from(height))
            * f64::from(self.multiplier);

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let truncate = |length: u32| ((f64::from(length) * scale) as u32).max(1);

        Ok(RenderSize {
            height: truncate(height),
            width: truncate(width),
        })
    }

    /// Resize `frame` to its render size.
    /// Returns the new frame together with the size it was resized to.
    ///
    /// # Arguments
    /// * `frame` - Decoded frame of arbitrary size.
    pub fn resize(&self, frame: &RgbImage) -> Result<(RgbImage, RenderSize)> {
        let size = self.render_size(frame.width(), frame.height())?;
        let resized = imageops::resize(frame, size.width, size.height, Self::FILTER);
        Ok((resized, size))
    }
}
