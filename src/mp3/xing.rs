//! Xing/Info header extraction and audio duration
//!
//! Encoders write a Xing (VBR) or Info (CBR) block into the payload of the
//! first frame, right after the side information. When it carries a frame
//! count the duration is exact. Without one we fall back to assuming a
//! constant bitrate across the whole audio range.

use std::io::{Read, Seek};
use std::time::Duration;

use log::debug;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::mp3::frame::{find_frame, FrameInfo};
use crate::read::{read_at, read_u32_at};

const FLAG_FRAMES: u32 = 0x1;
const FLAG_BYTES: u32 = 0x2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum XingKind {
    /// "Xing", written for VBR files
    Xing,
    /// "Info", written by LAME for CBR files
    Info,
}

/// Frame and byte counts from a Xing/Info block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct XingHeader {
    pub kind: XingKind,
    /// Offset of the magic in the file
    pub offset: u64,
    pub flags: u32,
    /// Audio frames, not counting the frame holding this header
    pub frames: u32,
    /// Audio bytes, if the bytes flag was set
    pub bytes: Option<u32>,
}

/// Result of [`compute_audio_duration`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AudioDuration {
    pub duration: Duration,
    /// Offset of the first frame header actually found
    pub first_frame_offset: u64,
    pub frame: FrameInfo,
    pub xing: Option<XingHeader>,
}

impl AudioDuration {
    pub fn millis(&self) -> u64 {
        self.duration.as_millis() as u64
    }

    /// Frame count from the Xing header, 0 when there wasn't one.
    pub fn xing_frames(&self) -> u32 {
        self.xing.map(|x| x.frames).unwrap_or(0)
    }

    /// Byte count from the Xing header, 0 when absent.
    pub fn xing_bytes(&self) -> u32 {
        self.xing.and_then(|x| x.bytes).unwrap_or(0)
    }
}

/// Offset where a Xing/Info magic would sit in the frame at `frame_offset`.
pub fn xing_offset(frame_offset: u64, frame: &FrameInfo) -> u64 {
    frame_offset + 4 + frame.side_info_len()
}

/// Read the Xing/Info block at `offset`, returning `None` if the magic isn't there.
pub fn read_xing_header<R: Read + Seek>(reader: &mut R, offset: u64) -> Result<Option<XingHeader>> {
    let mut magic = [0u8; 4];
    read_at(reader, offset, &mut magic)?;
    let kind = match &magic {
        b"Xing" => XingKind::Xing,
        b"Info" => XingKind::Info,
        _ => return Ok(None),
    };

    let flags = read_u32_at(reader, offset + 4)?;
    if flags & FLAG_FRAMES == 0 {
        return Err(Error::XingMissingFrameCount { offset });
    }
    let frames = read_u32_at(reader, offset + 8)?;
    let bytes = if flags & FLAG_BYTES != 0 {
        Some(read_u32_at(reader, offset + 12)?)
    } else {
        None
    };

    Ok(Some(XingHeader {
        kind,
        offset,
        flags,
        frames,
        bytes,
    }))
}

/// Compute the playback length of the audio between `header_len` and
/// `file_size - footer_len`.
///
/// The first frame is located with [`find_frame`]. If it holds a Xing/Info
/// block the duration is `samples_per_frame * frames / sample_rate`;
/// otherwise the file is assumed to be CBR and the duration is derived from
/// the byte count after the first frame and its bitrate.
pub fn compute_audio_duration<R: Read + Seek>(
    reader: &mut R,
    file_size: u64,
    header_len: u64,
    footer_len: u64,
) -> Result<AudioDuration> {
    let (first_frame_offset, frame) = find_frame(reader, header_len)?;

    let xing_start = xing_offset(first_frame_offset, &frame);
    let xing = read_xing_header(reader, xing_start)?;

    let ms = match &xing {
        Some(x) => {
            debug!("{:?} header at {:#x}: {} frames", x.kind, x.offset, x.frames);
            u64::from(frame.samples_per_frame) * u64::from(x.frames) * 1000 / u64::from(frame.sample_rate)
        }
        None => {
            // No frame count, so assume a constant bitrate rather than
            // counting every frame.
            let audio_bytes = file_size
                .checked_sub(first_frame_offset)
                .and_then(|n| n.checked_sub(footer_len))
                .ok_or(Error::InvalidRange {
                    header_len: first_frame_offset,
                    footer_len,
                    file_size,
                })?;
            debug!(
                "no Xing header at {:#x}, assuming CBR {} kb/s over {} bytes",
                xing_start, frame.kbit_rate, audio_bytes
            );
            audio_bytes * 8 / u64::from(frame.kbit_rate)
        }
    };

    Ok(AudioDuration {
        duration: Duration::from_millis(ms),
        first_frame_offset,
        frame,
        xing,
    })
}
