//! Audio-only content hash
//!
//! The digest covers exactly `[header_len, file_size - footer_len)`, so
//! retagging a file never changes its identity. SHA-1 is the default for
//! compatibility with identifiers that are already stored.

use std::io::{self, Read, Seek, SeekFrom};

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use sha2::Sha256;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashAlgorithm::Sha1 => write!(f, "sha1"),
            HashAlgorithm::Sha256 => write!(f, "sha256"),
        }
    }
}

/// The audio byte range of a file: everything between the leading tag and
/// the trailing footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AudioRange {
    pub header_len: u64,
    pub footer_len: u64,
}

impl AudioRange {
    pub fn new(header_len: u64, footer_len: u64) -> Self {
        Self {
            header_len,
            footer_len,
        }
    }

    /// Number of audio bytes in a file of `file_size` bytes.
    pub fn len(&self, file_size: u64) -> Result<u64> {
        file_size
            .checked_sub(self.header_len)
            .and_then(|n| n.checked_sub(self.footer_len))
            .ok_or(Error::InvalidRange {
                header_len: self.header_len,
                footer_len: self.footer_len,
                file_size,
            })
    }
}

/// Hex SHA-1 of the audio range.
pub fn compute_audio_sha1<R: Read + Seek>(reader: &mut R, file_size: u64, range: AudioRange) -> Result<String> {
    hash_range::<Sha1, R>(reader, file_size, range)
}

/// Hex digest of the audio range using `algorithm`.
pub fn compute_audio_hash<R: Read + Seek>(
    reader: &mut R,
    file_size: u64,
    range: AudioRange,
    algorithm: HashAlgorithm,
) -> Result<String> {
    match algorithm {
        HashAlgorithm::Sha1 => hash_range::<Sha1, R>(reader, file_size, range),
        HashAlgorithm::Sha256 => hash_range::<Sha256, R>(reader, file_size, range),
    }
}

fn hash_range<D, R>(reader: &mut R, file_size: u64, range: AudioRange) -> Result<String>
where
    D: Digest + io::Write,
    R: Read + Seek,
{
    let len = range.len(file_size)?;
    reader.seek(SeekFrom::Start(range.header_len))?;

    let mut hasher = D::new();
    let copied = io::copy(&mut reader.by_ref().take(len), &mut hasher)?;
    if copied != len {
        return Err(Error::Truncated {
            offset: range.header_len + copied,
            wanted: len - copied,
        });
    }

    Ok(hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect())
}
