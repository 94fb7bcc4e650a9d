// frametext - Video frame to text encoder.
// Copyright 2025 0verv0ltage
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Reading frames out of video files.
//! Probing and decoding is done by the ffmpeg executables, frames are
//! streamed back as raw RGB24 over a pipe.

use std::{
    io::{ErrorKind, Read},
    path::Path,
    process::{Child, ChildStdout, Command, Stdio},
};

use anyhow::{Context, Result, bail};
use image::RgbImage;
use serde::Deserialize;

use crate::constants::{COLOR_CHANNELS, RAW_PIXEL_FORMAT};

/// Ordered, finite sequence of frames.
pub trait FrameSource {
    /// Decode the next frame.
    ///
    /// Returns `Ok(None)` once the source is exhausted and an error if
    /// decoding stopped for any other reason.
    fn next_frame(&mut self) -> Result<Option<RgbImage>>;
}

#[derive(Debug, Deserialize)]
/// Subset of `ffprobe -print_format json -show_streams`.
struct ProbeOutput {
    /// Streams reported for the file.
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
/// Single stream entry of the ffprobe output.
struct ProbeStream {
    /// "video", "audio", ...
    codec_type: Option<String>,
    /// Coded width in pixels.
    width: Option<u32>,
    /// Coded height in pixels.
    height: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Pixel dimensions of the decoded video stream.
pub struct StreamGeometry {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
}

/// Extract the first video streams dimensions from ffprobe JSON output.
fn parse_probe_output(json: &[u8]) -> Result<StreamGeometry> {
    let probe: ProbeOutput =
        serde_json::from_slice(json).context("Unable to parse ffprobe output.")?;
    let Some(stream) = probe
        .streams
        .into_iter()
        .find(|stream| stream.codec_type.as_deref() == Some("video"))
    else {
        bail!("No video stream found.");
    };
    match (stream.width, stream.height) {
        (Some(width), Some(height)) if width > 0 && height > 0 => {
            Ok(StreamGeometry { width, height })
        }
        _ => bail!("Video stream has no valid dimensions."),
    }
}

/// Run ffprobe on a file and read the dimensions of its first video stream.
///
/// # Arguments
/// * `ffprobe` - ffprobe executable.
/// * `path` - Video file to inspect.
pub fn probe_video(ffprobe: &Path, path: &Path) -> Result<StreamGeometry> {
    let output = Command::new(ffprobe)
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-select_streams",
            "v:0",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .output()
        .with_context(|| format!("Unable to run ffprobe at {}.", ffprobe.display()))?;
    if !output.status.success() {
        bail!(
            "ffprobe could not read {} ({}): {}",
            path.display(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    parse_probe_output(&output.stdout)
}

#[derive(Debug)]
/// Cuts a byte stream of packed RGB24 pixels into frames of a fixed size.
pub struct RawFrameReader<R> {
    /// Raw pixel stream.
    reader: R,
    /// Width of every frame.
    width: u32,
    /// Height of every frame.
    height: u32,
    /// Bytes per frame: `width * height * COLOR_CHANNELS`
    frame_len: usize,
}

impl<R: Read> RawFrameReader<R> {
    /// Wrap `reader` which yields `width` x `height` frames back to back.
    pub fn new(reader: R, width: u32, height: u32) -> Self {
        Self {
            reader,
            width,
            height,
            frame_len: width as usize * height as usize * COLOR_CHANNELS,
        }
    }

    /// Read the next frame.
    ///
    /// End of stream on a frame boundary is `Ok(None)`.
    /// End of stream inside a frame or a read error is an error.
    pub fn read_frame(&mut self) -> Result<Option<RgbImage>> {
        let mut buffer = vec![0u8; self.frame_len];
        let mut filled = 0;
        while filled < self.frame_len {
            match self.reader.read(&mut buffer[filled..]) {
                Ok(0) => break,
                Ok(count) => filled += count,
                Err(error) if error.kind() == ErrorKind::Interrupted => {}
                Err(error) => return Err(error).context("Unable to read decoded frame data."),
            }
        }
        if filled == 0 {
            return Ok(None);
        }
        if filled < self.frame_len {
            bail!(
                "Decoded stream ended inside a frame ({} of {} bytes).",
                filled,
                self.frame_len
            );
        }
        RgbImage::from_raw(self.width, self.height, buffer)
            .map(Some)
            .context("Unable to create image buffer from frame data.")
    }
}

#[derive(Debug)]
/// Video file being decoded by an ffmpeg child process.
/// The decoder is stopped when the source is released or dropped.
pub struct VideoSource {
    /// Dimensions of every decoded frame.
    geometry: StreamGeometry,
    /// Frames read from the decoders stdout.
    frames: RawFrameReader<ChildStdout>,
    /// Running ffmpeg process.
    decoder: Child,
    /// Set once the stream ended, cleanly or not.
    finished: bool,
    /// Frame decoded while opening, handed out first.
    pending: Option<RgbImage>,
}

impl VideoSource {
    /// Open a video file for decoding.
    ///
    /// Fails if the file does not exist, ffprobe finds no decodable
    /// video stream in it, ffmpeg can not be started or ffmpeg fails
    /// before delivering the first frame.
    ///
    /// # Arguments
    /// * `path` - Video file to decode.
    /// * `ffmpeg` - ffmpeg executable.
    /// * `ffprobe` - ffprobe executable.
    pub fn open(path: &Path, ffmpeg: &Path, ffprobe: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("Provided video file at {:?} could not be found.", path);
        }
        let geometry = probe_video(ffprobe, path)
            .with_context(|| format!("Could not open video file {}.", path.display()))?;

        let mut decoder = Command::new(ffmpeg)
            .args(["-hide_banner", "-loglevel", "error", "-nostdin", "-noautorotate", "-i"])
            .arg(path)
            .args([
                "-map",
                "0:v:0",
                "-an",
                "-fps_mode",
                "passthrough",
                "-f",
                "rawvideo",
                "-pix_fmt",
                RAW_PIXEL_FORMAT,
                "-",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .spawn()
            .with_context(|| format!("Unable to start ffmpeg at {}.", ffmpeg.display()))?;

        let Some(stdout) = decoder.stdout.take() else {
            let _ = decoder.kill();
            let _ = decoder.wait();
            bail!("Unable to capture ffmpeg output.");
        };

        let mut source = Self {
            geometry,
            frames: RawFrameReader::new(stdout, geometry.width, geometry.height),
            decoder,
            finished: false,
            pending: None,
        };
        // A decoder that can not produce a single frame means the file is unusable.
        // An empty stream that ends cleanly is still a valid video.
        source.pending = source
            .decode_frame()
            .with_context(|| format!("Could not open video file {}.", path.display()))?;
        Ok(source)
    }

    /// Dimensions of the frames this source yields.
    pub fn geometry(&self) -> StreamGeometry {
        self.geometry
    }

    /// Stop the decoder and wait for it to exit.
    pub fn release(mut self) -> Result<()> {
        self.stop_decoder()
    }

    /// Read the next frame from the decoder, checking its exit status at the end.
    fn decode_frame(&mut self) -> Result<Option<RgbImage>> {
        if self.finished {
            return Ok(None);
        }
        match self.frames.read_frame() {
            Ok(Some(frame)) => Ok(Some(frame)),
            Ok(None) => {
                self.finished = true;
                let status = self.decoder.wait().context("Unable to wait for ffmpeg.")?;
                if !status.success() {
                    bail!("ffmpeg stopped decoding with {status}.");
                }
                Ok(None)
            }
            Err(error) => {
                self.finished = true;
                Err(error)
            }
        }
    }

    /// Kill the decoder if still running and reap it.
    fn stop_decoder(&mut self) -> Result<()> {
        // Fails harmlessly when the decoder already exited.
        let _ = self.decoder.kill();
        self.finished = true;
        self.decoder.wait().context("Unable to wait for ffmpeg.")?;
        Ok(())
    }
}

impl FrameSource for VideoSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        if let Some(frame) = self.pending.take() {
            return Ok(Some(frame));
        }
        self.decode_frame()
    }
}

impl Drop for VideoSource {
    fn drop(&mut self) {
        let _ = self.stop_decoder();
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor};

    #[cfg(unix)]
    use super::fake_tools::FakeTools;
    use super::*;

    /// Reader that fails after handing out `good` bytes.
    struct FailingReader {
        good: usize,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.good == 0 {
                return Err(io::Error::other("pipe broke"));
            }
            let count = buf.len().min(self.good);
            buf[..count].fill(7);
            self.good -= count;
            Ok(count)
        }
    }

    #[test]
    fn reads_frames_until_clean_end() {
        // Two 2x1 frames.
        let bytes: Vec<u8> = (0..12).collect();
        let mut reader = RawFrameReader::new(Cursor::new(bytes), 2, 1);

        let first = reader.read_frame().unwrap().unwrap();
        assert_eq!(first.as_raw(), &[0, 1, 2, 3, 4, 5]);
        assert_eq!(first.get_pixel(1, 0).0, [3, 4, 5]);

        let second = reader.read_frame().unwrap().unwrap();
        assert_eq!(second.as_raw(), &[6, 7, 8, 9, 10, 11]);

        assert!(reader.read_frame().unwrap().is_none());
    }

    #[test]
    fn truncated_frame_is_an_error() {
        let mut reader = RawFrameReader::new(Cursor::new(vec![1u8; 8]), 2, 1);
        assert!(reader.read_frame().unwrap().is_some());
        let error = reader.read_frame().unwrap_err();
        assert!(error.to_string().contains("2 of 6 bytes"), "{error}");
    }

    #[test]
    fn read_error_is_not_end_of_stream() {
        let mut reader = RawFrameReader::new(FailingReader { good: 6 }, 2, 1);
        assert!(reader.read_frame().unwrap().is_some());
        assert!(reader.read_frame().is_err());
    }

    #[test]
    fn parses_probe_output() {
        let json = br#"{"streams":[{"index":0,"codec_type":"video","width":640,"height":480}]}"#;
        assert_eq!(
            parse_probe_output(json).unwrap(),
            StreamGeometry {
                width: 640,
                height: 480
            }
        );
    }

    #[test]
    fn probe_without_video_stream_fails() {
        assert!(parse_probe_output(br#"{"streams":[]}"#).is_err());
        assert!(parse_probe_output(br#"{}"#).is_err());
        assert!(
            parse_probe_output(br#"{"streams":[{"codec_type":"video","width":0,"height":4}]}"#)
                .is_err()
        );
        assert!(parse_probe_output(b"not json").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn open_buffers_first_frame_and_ends_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let tools = FakeTools::new(dir.path(), 3, 0);

        let mut source = tools.open().unwrap();
        assert_eq!(
            source.geometry(),
            StreamGeometry {
                width: 4,
                height: 2
            }
        );
        for _ in 0..3 {
            let frame = source.next_frame().unwrap().unwrap();
            assert_eq!((frame.width(), frame.height()), (4, 2));
        }
        assert!(source.next_frame().unwrap().is_none());
        assert!(source.next_frame().unwrap().is_none());
        source.release().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn decoder_exit_after_frames_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let tools = FakeTools::new(dir.path(), 2, 1);

        let mut source = tools.open().unwrap();
        assert!(source.next_frame().unwrap().is_some());
        assert!(source.next_frame().unwrap().is_some());
        let error = source.next_frame().unwrap_err();
        assert!(error.to_string().contains("stopped decoding"), "{error}");
        assert!(source.next_frame().unwrap().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn decoder_failing_before_first_frame_fails_open() {
        let dir = tempfile::tempdir().unwrap();
        let tools = FakeTools::new(dir.path(), 0, 1);

        let error = tools.open().unwrap_err();
        assert!(error.to_string().contains("Could not open video file"), "{error}");
    }

    #[cfg(unix)]
    #[test]
    fn empty_stream_opens_and_ends() {
        let dir = tempfile::tempdir().unwrap();
        let tools = FakeTools::new(dir.path(), 0, 0);

        let mut source = tools.open().unwrap();
        assert!(source.next_frame().unwrap().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn dropping_unfinished_source_stops_decoder() {
        let dir = tempfile::tempdir().unwrap();
        // Far more output than the pipe buffer holds, so ffmpeg would block.
        let tools = FakeTools::new(dir.path(), 100_000, 0);

        let mut source = tools.open().unwrap();
        assert!(source.next_frame().unwrap().is_some());
        drop(source);
    }

    #[test]
    fn open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let error = VideoSource::open(
            &dir.path().join("missing.mp4"),
            Path::new("ffmpeg"),
            Path::new("ffprobe"),
        )
        .unwrap_err();
        assert!(error.to_string().contains("could not be found"));
    }
}
