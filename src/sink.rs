// frametext - Video frame to text encoder.
// Copyright 2025 0verv0ltage
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Line oriented output of encoded frames.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};

use crate::filesys::create_output_file;

#[derive(Debug)]
/// Appends one encoded frame per line.
/// Dropping the sink flushes what it can and closes the writer.
pub struct LineSink<W: Write> {
    /// Buffered output.
    writer: BufWriter<W>,
    /// Lines written so far.
    lines_written: usize,
}

impl LineSink<File> {
    /// Create (or truncate) the file at `path` and write lines into it.
    pub fn create(path: &Path) -> Result<Self> {
        Ok(Self::new(create_output_file(path)?))
    }
}

impl<W: Write> LineSink<W> {
    /// Wrap an arbitrary writer.
    pub fn new(inner: W) -> Self {
        Self {
            writer: BufWriter::new(inner),
            lines_written: 0,
        }
    }

    /// Append `line` followed by a newline.
    ///
    /// # Arguments
    /// * `line` - Encoded frame. Must not contain a newline itself.
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        debug_assert!(!line.contains('\n'));
        self.writer
            .write_all(line.as_bytes())
            .and_then(|()| self.writer.write_all(b"\n"))
            .context("Unable to write to output file.")?;
        self.lines_written += 1;
        Ok(())
    }

    /// Number of lines written so far.
    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    /// Flush all buffered lines and hand back the inner writer.
    pub fn finish(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|error| error.into_error())
            .context("Unable to flush output file.")
    }
}
