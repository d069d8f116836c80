//! Full frame walk, for checking the Xing/CBR duration against reality
//!
//! Walks every frame in the audio range, jumping by each frame's size.
//! Bytes that don't decode are grouped into skipped regions and, where
//! possible, identified (Lyrics3 tags, stray ID3v1 tags, zero padding).

use std::io::{Read, Seek, SeekFrom};

use serde::Serialize;

use crate::error::Result;
use crate::hash::AudioRange;
use crate::mp3::{FrameInfo, XingHeader};

/// A run of bytes between frames that didn't decode as a header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRegion {
    pub offset: u64,
    pub size: u64,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrameScan {
    /// Bitrate changes between audio frames
    pub vbr: bool,
    /// Averaged across audio frames, excluding the Xing frame
    pub avg_kbit_rate: f64,
    /// From the first audio frame
    pub sample_rate: u32,
    pub samples_per_frame: u32,
    /// Counted frames, comparable to the Xing frame count
    pub actual_frames: u64,
    pub actual_bytes: u64,
    pub actual_duration_ms: u64,
    /// First of the run of empty frames that ends the file
    pub empty_frame: Option<u64>,
    pub empty_offset: Option<u64>,
    pub empty_duration_ms: Option<u64>,
    pub skipped: Vec<SkippedRegion>,
}

impl FrameScan {
    fn duration_ms(&self, frames: u64) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        u64::from(self.samples_per_frame) * frames * 1000 / u64::from(self.sample_rate)
    }
}

/// Walk all frames in `range`. `xing` is the header found by the duration
/// resolver, if any; its frame is left out of the counts it reports.
pub fn scan_frames<R: Read + Seek>(
    reader: &mut R,
    file_size: u64,
    range: AudioRange,
    xing: Option<&XingHeader>,
) -> Result<FrameScan> {
    let len = range.len(file_size)?;
    reader.seek(SeekFrom::Start(range.header_len))?;
    let mut data = Vec::with_capacity(len as usize);
    reader.by_ref().take(len).read_to_end(&mut data)?;

    let mut walk = Walk::new(range.header_len, xing.is_some());
    let mut off = 0usize;
    while off < data.len() {
        let info = data
            .get(off..off + 4)
            .map(|b| FrameInfo::decode(u32::from_be_bytes([b[0], b[1], b[2], b[3]]), walk.base + off as u64));
        match info {
            Some(Ok(info)) => {
                walk.flush_skipped(&data, off);
                walk.frame(&info, off);
                off += info.frame_size() as usize;
            }
            Some(Err(e)) => {
                walk.skip(off, || e.to_string());
                off += 1;
            }
            None => {
                walk.skip(off, || "partial frame header".to_string());
                off = data.len();
            }
        }
    }
    walk.flush_skipped(&data, off.min(data.len()));

    Ok(walk.finish())
}

struct Walk {
    base: u64,
    has_xing: bool,
    scan: FrameScan,
    kbit_rate_sum: u64,
    last_kbit_rate: u32,
    skip_start: Option<usize>,
    skip_reason: Option<String>,
}

impl Walk {
    fn new(base: u64, has_xing: bool) -> Self {
        Self {
            base,
            has_xing,
            scan: FrameScan::default(),
            kbit_rate_sum: 0,
            last_kbit_rate: 0,
            skip_start: None,
            skip_reason: None,
        }
    }

    fn skip(&mut self, off: usize, reason: impl FnOnce() -> String) {
        if self.skip_start.is_none() {
            self.skip_start = Some(off);
            self.skip_reason = Some(reason());
        }
    }

    fn flush_skipped(&mut self, data: &[u8], end: usize) {
        let start = match self.skip_start.take() {
            Some(start) => start,
            None => return,
        };
        let first_error = self.skip_reason.take().unwrap_or_default();
        let bytes = &data[start..end];
        self.scan.skipped.push(SkippedRegion {
            offset: self.base + start as u64,
            size: bytes.len() as u64,
            reason: diagnose(bytes).map(str::to_string).unwrap_or(first_error),
        });
    }

    fn frame(&mut self, info: &FrameInfo, off: usize) {
        // The Xing frame's bitrate sometimes differs from the audio frames in
        // CBR files, so it doesn't count towards bitrate or sample rate.
        let is_xing_frame = self.has_xing && self.scan.actual_frames == 0;
        if !is_xing_frame {
            if self.last_kbit_rate > 0 && info.kbit_rate != self.last_kbit_rate {
                self.scan.vbr = true;
            }
            self.last_kbit_rate = info.kbit_rate;
            self.kbit_rate_sum += u64::from(info.kbit_rate);

            if self.scan.sample_rate == 0 {
                self.scan.sample_rate = info.sample_rate;
                self.scan.samples_per_frame = info.samples_per_frame;
            }
        }

        if info.is_empty() {
            if self.scan.empty_frame.is_none() {
                self.scan.empty_frame = Some(self.scan.actual_frames);
                self.scan.empty_offset = Some(self.base + off as u64);
            }
        } else {
            self.scan.empty_frame = None;
            self.scan.empty_offset = None;
        }

        self.scan.actual_frames += 1;
        self.scan.actual_bytes += info.frame_size();
    }

    fn finish(mut self) -> FrameScan {
        // The Xing count excludes the frame holding the Xing header (though
        // its byte count includes it), so drop it here to stay comparable.
        if self.has_xing && self.scan.actual_frames > 0 {
            self.scan.actual_frames -= 1;
            if let Some(n) = self.scan.empty_frame {
                self.scan.empty_frame = Some(n.saturating_sub(1));
            }
        }

        if self.scan.actual_frames > 0 {
            self.scan.avg_kbit_rate = self.kbit_rate_sum as f64 / self.scan.actual_frames as f64;
        }
        self.scan.actual_duration_ms = self.scan.duration_ms(self.scan.actual_frames);
        self.scan.empty_duration_ms = self.scan.empty_frame.map(|n| self.scan.duration_ms(n));
        self.scan
    }
}

/// Name common kinds of non-frame data.
fn diagnose(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"LYRICSBEGIN") && bytes.ends_with(b"LYRICSEND") {
        Some("Lyrics3v1 tag")
    } else if bytes.starts_with(b"LYRICSBEGIN") && bytes.ends_with(b"LYRICS200") {
        Some("Lyrics3v2 tag")
    } else if bytes.starts_with(b"TAG") {
        Some("extra ID3v1 tag")
    } else if !bytes.is_empty() && bytes.iter().all(|&b| b == 0) {
        Some("empty")
    } else {
        None
    }
}
