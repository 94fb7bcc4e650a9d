// frametext - Video frame to text encoder.
// Copyright 2025 0verv0ltage
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! File system access.

use std::{
    fs::{self, File},
    path::Path,
};

use anyhow::{Context, Result, bail};

/// Checks that a file can be created at `path` without touching it.
/// The containing directory must exist and `path` must not be a directory.
pub fn check_output_path(path: &Path) -> Result<()> {
    if path.is_dir() {
        bail!("Output path {:?} is a directory.", path);
    }
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        // Bare file name, lands in the working directory.
        _ => return Ok(()),
    };
    if !parent.is_dir() {
        bail!("Output directory {:?} does not exist.", parent);
    }
    Ok(())
}

/// Creates the output file, truncating anything already stored there.
pub fn create_output_file(path: &Path) -> Result<File> {
    File::create(path).with_context(|| format!("Unable to create output file {:?}.", path))
}

/// Size of the file at `path` in bytes.
pub fn file_len(path: &Path) -> Result<u64> {
    Ok(fs::metadata(path)
        .with_context(|| format!("Unable to read metadata of {:?}.", path))?
        .len())
}
