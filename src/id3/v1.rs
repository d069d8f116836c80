//! ID3v1 footer reader
//!
//! ID3v1 is a fixed 128-byte block at the very end of the file:
//!
//! | Offset | Size | Field                                   |
//! |--------|------|-----------------------------------------|
//! | 0      | 3    | "TAG"                                   |
//! | 3      | 30   | title                                   |
//! | 33     | 30   | artist                                  |
//! | 63     | 30   | album                                   |
//! | 93     | 4    | year                                    |
//! | 97     | 30   | comment (ID3v1.1: 28 + NUL + track)     |
//! | 127    | 1    | genre                                   |
//!
//! Text is Latin-1, padded with NULs or spaces.

use std::io::{Read, Seek};

use serde::Serialize;

use crate::error::Result;
use crate::read::read_at;

/// Size of the footer, and so the footer length callers exclude from the audio.
pub const ID3V1_LEN: u64 = 128;

const MAGIC: &[u8; 3] = b"TAG";

/// Genre byte meaning "no genre". 0 is Blues.
pub const GENRE_NONE: u8 = 255;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Id3v1Tag {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub year: String,
    pub comment: String,
    pub genre: u8,
    /// ID3v1.1 track number, 0 if absent
    pub track: u8,
}

impl Id3v1Tag {
    /// Parse a footer block, returning `None` unless it starts with "TAG".
    pub fn parse(buf: &[u8; 128]) -> Option<Self> {
        if &buf[..3] != MAGIC {
            return None;
        }

        let mut comment = [0u8; 30];
        comment.copy_from_slice(&buf[97..127]);
        let mut track = 0;
        if comment[28] == 0 && comment[29] != 0 {
            track = comment[29];
            comment[29] = 0;
        }

        Some(Id3v1Tag {
            title: clean(&buf[3..33]),
            artist: clean(&buf[33..63]),
            album: clean(&buf[63..93]),
            year: clean(&buf[93..97]),
            comment: clean(&comment),
            genre: buf[127],
            track,
        })
    }
}

/// Decode a Latin-1 field and drop trailing NULs and whitespace.
fn clean(field: &[u8]) -> String {
    let text: String = field.iter().map(|&b| char::from(b)).collect();
    text.trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_string()
}

/// Read the ID3v1 footer from the last 128 bytes of a file of `file_size` bytes.
///
/// Files shorter than the footer simply have no tag.
pub fn read_id3v1_footer<R: Read + Seek>(reader: &mut R, file_size: u64) -> Result<Option<Id3v1Tag>> {
    if file_size < ID3V1_LEN {
        return Ok(None);
    }
    let mut buf = [0u8; 128];
    read_at(reader, file_size - ID3V1_LEN, &mut buf)?;
    Ok(Id3v1Tag::parse(&buf))
}
