// frametext - Video frame to text encoder.
// Copyright 2025 0verv0ltage
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Drives frames from a source through resizing and encoding into a sink.

use std::io::Write;

use anyhow::Result;
use image::RgbImage;

use crate::{encoder::OutputFormat, resize::Resizer, sink::LineSink, source::FrameSource};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Why the frame loop stopped.
pub enum StreamEnd {
    /// All frames of the source were converted.
    Exhausted,
    /// Decoding failed before the end of the source.
    /// Lines written up to that point are kept.
    DecodeFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of converting a whole video.
pub struct RunReport {
    /// Lines written to the sink, one per frame.
    pub frames_written: usize,
    /// How the source ended.
    pub end: StreamEnd,
}

#[derive(Debug, Clone, Copy)]
/// Converts frames into lines of text.
/// Holds the resizing and encoding parameters chosen for a run.
pub struct Converter {
    /// Scales frames to the render grid.
    resizer: Resizer,
    /// Encoding applied to every frame.
    format: OutputFormat,
    /// Print each frames render size.
    report_sizes: bool,
}

impl Converter {
    /// Generates a new Converter.
    ///
    /// * `resizer` - Resizing parameters.
    /// * `format` - Text encoding of the pixels.
    /// * `report_sizes` - If the render size of every frame should be printed.
    pub fn new(resizer: Resizer, format: OutputFormat, report_sizes: bool) -> Self {
        Self {
            resizer,
            format,
            report_sizes,
        }
    }

    /// Encoding this converter writes.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Resize and encode a single frame.
    pub fn convert_frame(&self, frame: &RgbImage) -> Result<String> {
        let (resized, render_size) = self.resizer.resize(frame)?;
        if self.report_sizes {
            println!("Recommended rendering size: {render_size} (height, width)");
        }
        Ok(self.format.encode_frame(&resized))
    }

    /// Pull frames from `source` until it ends and write one line per frame to `sink`.
    /// A decode failure ends the loop like the end of the stream and is recorded
    /// in the report. Failing to resize or write a frame aborts the run.
    ///
    /// # Arguments
    /// * `source` - Frames to convert, in order.
    /// * `sink` - Destination of the encoded lines.
    pub fn run<S, W>(&self, source: &mut S, sink: &mut LineSink<W>) -> Result<RunReport>
    where
        S: FrameSource + ?Sized,
        W: Write,
    {
        let end = loop {
            let frame = match source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break StreamEnd::Exhausted,
                Err(error) => break StreamEnd::DecodeFailed(format!("{error:#}")),
            };
            let line = self.convert_frame(&frame)?;
            sink.write_line(&line)?;
        };
        Ok(RunReport {
            frames_written: sink.lines_written(),
            end,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use anyhow::anyhow;
    use image::Rgb;

    use super::*;

    /// In memory source, optionally failing after its frames.
    struct ScriptedSource {
        /// Frames handed out in order.
        frames: VecDeque<RgbImage>,
        /// Fail instead of ending once `frames` is empty.
        fail_at_end: bool,
    }

    impl FrameSource for ScriptedSource {
        fn next_frame(&mut self) -> Result<Option<RgbImage>> {
            match self.frames.pop_front() {
                Some(frame) => Ok(Some(frame)),
                None if self.fail_at_end => Err(anyhow!("corrupt packet")),
                None => Ok(None),
            }
        }
    }

    fn source(count: usize, fail_at_end: bool) -> ScriptedSource {
        ScriptedSource {
            frames: (0..count)
                .map(|i| RgbImage::from_pixel(640, 480, Rgb([u8::try_from(i).unwrap(), 0, 0])))
                .collect(),
            fail_at_end,
        }
    }

    fn converter(format: OutputFormat) -> Converter {
        Converter::new(Resizer::new(20, 1).unwrap(), format, false)
    }

    #[test]
    fn writes_one_line_per_frame() {
        let mut sink = LineSink::new(Vec::new());
        let report = converter(OutputFormat::Monochrome)
            .run(&mut source(3, false), &mut sink)
            .unwrap();
        assert_eq!(
            report,
            RunReport {
                frames_written: 3,
                end: StreamEnd::Exhausted
            }
        );

        let output = String::from_utf8(sink.finish().unwrap()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        for (index, line) in lines.iter().enumerate() {
            assert_eq!(line.len(), 20 * 15 * 3);
            assert_eq!(&line[..3], format!("{index:03}"));
        }
    }

    #[test]
    fn decode_failure_keeps_written_lines() {
        let mut sink = LineSink::new(Vec::new());
        let report = converter(OutputFormat::Rgb)
            .run(&mut source(2, true), &mut sink)
            .unwrap();
        assert_eq!(report.frames_written, 2);
        assert_eq!(
            report.end,
            StreamEnd::DecodeFailed("corrupt packet".to_string())
        );
        let output = sink.finish().unwrap();
        assert_eq!(output.iter().filter(|&&b| b == b'\n').count(), 2);
    }

    #[test]
    fn empty_source_writes_nothing() {
        let mut sink = LineSink::new(Vec::new());
        let report = converter(OutputFormat::Hex)
            .run(&mut source(0, false), &mut sink)
            .unwrap();
        assert_eq!(report.frames_written, 0);
        assert!(sink.finish().unwrap().is_empty());
    }

    #[test]
    fn hex_lines_have_six_chars_per_pixel() {
        let frame = RgbImage::from_pixel(100, 50, Rgb([255, 128, 0]));
        let line = converter(OutputFormat::Hex).convert_frame(&frame).unwrap();
        assert_eq!(line.len(), 20 * 10 * 6);
        assert!(line.starts_with("FF8000"));
    }
}
