//! Error taxonomy shared by every reader in the crate
//!
//! Absence is not an error: a missing ID3v1 footer is `Ok(None)` and a
//! missing Xing/Info block selects the constant-bitrate fallback. Everything
//! below is surfaced to the caller with the byte offset that triggered it.

use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("no 0x7ff sync at {offset:#x} (got {found:#x})")]
    NoSync { offset: u64, found: u32 },

    #[error("reserved MPEG Audio version at {offset:#x}")]
    ReservedVersion { offset: u64 },

    /// The layer field is not Layer III. Searching further is pointless.
    #[error("unsupported layer at {offset:#x} (got {bits:#x} instead of 0x1)")]
    UnsupportedLayer { offset: u64, bits: u8 },

    #[error("invalid bitrate index {index} at {offset:#x}")]
    InvalidBitrate { offset: u64, index: u8 },

    #[error("invalid sample rate index {index} at {offset:#x}")]
    InvalidSampleRate { offset: u64, index: u8 },

    #[error("didn't find frame header after {start:#x}")]
    NoFrameHeader { start: u64 },

    #[error("Xing header at {offset:#x} lacks number of frames")]
    XingMissingFrameCount { offset: u64 },

    #[error("wanted {wanted} bytes at {offset:#x} but the file ends first")]
    Truncated { offset: u64, wanted: u64 },

    #[error("header ({header_len}) and footer ({footer_len}) exceed file size {file_size}")]
    InvalidRange {
        header_len: u64,
        footer_len: u64,
        file_size: u64,
    },

    #[error("unsupported ID3 version {0}")]
    UnsupportedId3Version(String),

    #[error("ID3v2 tag: {0}")]
    Id3(#[from] id3::Error),

    #[error("no ID3v2 tag and no ID3v1 artist or title")]
    NoTags,

    #[error("config: {0}")]
    Config(String),
}

impl Error {
    /// True for the one header failure that should stop a frame search.
    pub fn is_unsupported_layer(&self) -> bool {
        matches!(self, Error::UnsupportedLayer { .. })
    }

    /// True for header decode failures that a forward search may skip past.
    pub(crate) fn is_bad_header(&self) -> bool {
        matches!(
            self,
            Error::NoSync { .. }
                | Error::ReservedVersion { .. }
                | Error::InvalidBitrate { .. }
                | Error::InvalidSampleRate { .. }
        )
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}
