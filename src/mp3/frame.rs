//! MP3 frame header decoding and the bounded search for the first frame
//!
//! MP3 frames start with a sync word (11 bits of 1s) followed by header info.
//! Frame header structure (4 bytes, bit 0 is the most significant):
//! AAAAAAAA AAABBCCD EEEEFFGH IIJJKLMM
//!
//! A = sync (bits 0-10, 0x7ff)
//! B = MPEG version (bits 11-12): 00=2.5, 01=reserved, 10=2, 11=1
//! C = Layer (bits 13-14): 00=reserved, 01=III, 10=II, 11=I
//! D = Protection bit (bit 15, 0 means a 16-bit CRC follows)
//! E = Bitrate index (bits 16-19)
//! F = Sample rate index (bits 20-21)
//! G = Padding bit (bit 22)
//! H = Private bit
//! I = Channel mode (bits 24-25)
//! J = Mode extension (2 bits)
//! K = Copyright
//! L = Original
//! M = Emphasis (2 bits)
//!
//! Only Layer III is decoded. Any other layer is `Error::UnsupportedLayer`,
//! which also stops [`find_frame`].

use std::io::{Read, Seek, SeekFrom};

use log::debug;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::read::read_u32_at;

const SYNC: u32 = 0x7ff;
const LAYER_III: u32 = 0x1;

/// Bytes searched past the caller's offset before giving up on finding a header.
/// Some files carry junk between the end of the ID3v2 tag and the first frame.
pub const MAX_FRAME_SEARCH_BYTES: u64 = 8192;

/// Frame size in bytes of a frame that holds no audio (32 kbps at 44.1 kHz).
pub const EMPTY_FRAME_SIZE: u64 = 104;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MpegVersion {
    Mpeg1,
    Mpeg2,
    Mpeg25,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChannelMode {
    Stereo,
    JointStereo,
    DualChannel,
    Mono,
}

// Layer III bitrate tables (kbps). Index 0 = free, 15 = bad; both are rejected.
const KBIT_RATES_V1: [u32; 16] = [0, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 0];
const KBIT_RATES_V2: [u32; 16] = [0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160, 0];

// Sample rate tables (Hz). Index 3 is reserved.
const SAMPLE_RATES_V1: [u32; 4] = [44100, 48000, 32000, 0];
const SAMPLE_RATES_V2: [u32; 4] = [22050, 24000, 16000, 0];
const SAMPLE_RATES_V25: [u32; 4] = [11025, 12000, 8000, 0];

impl MpegVersion {
    fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            0b00 => Some(MpegVersion::Mpeg25),
            0b10 => Some(MpegVersion::Mpeg2),
            0b11 => Some(MpegVersion::Mpeg1),
            _ => None,
        }
    }

    fn kbit_rates(self) -> &'static [u32; 16] {
        match self {
            MpegVersion::Mpeg1 => &KBIT_RATES_V1,
            MpegVersion::Mpeg2 | MpegVersion::Mpeg25 => &KBIT_RATES_V2,
        }
    }

    fn sample_rates(self) -> &'static [u32; 4] {
        match self {
            MpegVersion::Mpeg1 => &SAMPLE_RATES_V1,
            MpegVersion::Mpeg2 => &SAMPLE_RATES_V2,
            MpegVersion::Mpeg25 => &SAMPLE_RATES_V25,
        }
    }

    /// Layer III samples per frame.
    pub fn samples_per_frame(self) -> u32 {
        match self {
            MpegVersion::Mpeg1 => 1152,
            MpegVersion::Mpeg2 | MpegVersion::Mpeg25 => 576,
        }
    }
}

impl ChannelMode {
    fn from_bits(bits: u32) -> Self {
        match bits & 0x3 {
            0 => ChannelMode::Stereo,
            1 => ChannelMode::JointStereo,
            2 => ChannelMode::DualChannel,
            _ => ChannelMode::Mono,
        }
    }
}

impl std::fmt::Display for ChannelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelMode::Stereo => write!(f, "stereo"),
            ChannelMode::JointStereo => write!(f, "joint-stereo"),
            ChannelMode::DualChannel => write!(f, "dual-channel"),
            ChannelMode::Mono => write!(f, "mono"),
        }
    }
}

/// Decoded header of one Layer III frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameInfo {
    pub version: MpegVersion,
    /// In 1000 bits per second (not 1024)
    pub kbit_rate: u32,
    pub sample_rate: u32,
    pub samples_per_frame: u32,
    pub channel_mode: ChannelMode,
    /// A 16-bit CRC follows the header
    pub has_crc: bool,
    pub has_padding: bool,
}

impl FrameInfo {
    /// Decode a big-endian header word. `offset` is only used for error context.
    pub fn decode(header: u32, offset: u64) -> Result<Self> {
        let bits = |start: u32, len: u32| (header << start) >> (32 - len);

        let found = bits(0, 11);
        if found != SYNC {
            return Err(Error::NoSync { offset, found });
        }

        let version = MpegVersion::from_bits(bits(11, 2)).ok_or(Error::ReservedVersion { offset })?;

        let layer = bits(13, 2);
        if layer != LAYER_III {
            return Err(Error::UnsupportedLayer {
                offset,
                bits: layer as u8,
            });
        }

        let bitrate_index = bits(16, 4);
        let kbit_rate = version.kbit_rates()[bitrate_index as usize];
        if kbit_rate == 0 {
            return Err(Error::InvalidBitrate {
                offset,
                index: bitrate_index as u8,
            });
        }

        let sample_rate_index = bits(20, 2);
        let sample_rate = version.sample_rates()[sample_rate_index as usize];
        if sample_rate == 0 {
            return Err(Error::InvalidSampleRate {
                offset,
                index: sample_rate_index as u8,
            });
        }

        Ok(FrameInfo {
            version,
            kbit_rate,
            sample_rate,
            samples_per_frame: version.samples_per_frame(),
            channel_mode: ChannelMode::from_bits(bits(24, 2)),
            has_crc: bits(15, 1) == 0,
            has_padding: bits(22, 1) == 1,
        })
    }

    /// Parse a 4-byte header as it appears in the file.
    pub fn parse(header: [u8; 4]) -> Result<Self> {
        Self::decode(u32::from_be_bytes(header), 0)
    }

    /// Frame length in bytes, header included.
    pub fn frame_size(&self) -> u64 {
        let samples_per_byte = u64::from(self.samples_per_frame / 8);
        let size = samples_per_byte * u64::from(self.kbit_rate) * 1000 / u64::from(self.sample_rate);
        if self.has_padding {
            size + 1
        } else {
            size
        }
    }

    /// Encoders emit frames of this size to pad out silence at the end of a file.
    pub fn is_empty(&self) -> bool {
        self.frame_size() == EMPTY_FRAME_SIZE
    }

    /// Bytes between the 4-byte header and the start of the frame's payload:
    /// the optional CRC plus the Layer III side information.
    pub fn side_info_len(&self) -> u64 {
        let crc = if self.has_crc { 2 } else { 0 };
        let side_info = match self.channel_mode {
            ChannelMode::Mono => 17,
            _ => 32,
        };
        crc + side_info
    }
}

/// Read and decode the frame header at `offset`.
pub fn read_frame_info<R: Read + Seek>(reader: &mut R, offset: u64) -> Result<FrameInfo> {
    let header = read_u32_at(reader, offset)?;
    FrameInfo::decode(header, offset)
}

/// Find the first decodable frame header at or after `start`.
///
/// At most [`MAX_FRAME_SEARCH_BYTES`] positions are tried. An unsupported
/// layer ends the search immediately since the rest of the file won't be
/// any different.
pub fn find_frame<R: Read + Seek>(reader: &mut R, start: u64) -> Result<(u64, FrameInfo)> {
    reader.seek(SeekFrom::Start(start))?;
    let mut window = Vec::with_capacity(MAX_FRAME_SEARCH_BYTES as usize + 3);
    reader
        .by_ref()
        .take(MAX_FRAME_SEARCH_BYTES + 3)
        .read_to_end(&mut window)?;

    for (i, bytes) in window.windows(4).enumerate() {
        let offset = start + i as u64;
        let header = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        match FrameInfo::decode(header, offset) {
            Ok(info) => {
                if i > 0 {
                    debug!("skipped {} bytes of junk before frame at {:#x}", i, offset);
                }
                return Ok((offset, info));
            }
            Err(e) if e.is_bad_header() => continue,
            Err(e) => return Err(e),
        }
    }

    Err(Error::NoFrameHeader { start })
}
