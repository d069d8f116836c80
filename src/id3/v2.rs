//! ID3v2 helpers on top of the `id3` crate
//!
//! The crate exposes the common frames (artist, title, album) directly but
//! not arbitrary ones such as TPE2 (album artist) or TSST (disc subtitle).
//! [`text_frame`] reads any text frame by ID.

use std::io::{Read, Seek};

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};
use id3::frame::Content;
use id3::{Tag, TagLike, Version};

use crate::error::{Error, Result};
use crate::read::read_at;

const HEADER_LEN: u64 = 10;
const FLAG_FOOTER: u8 = 0x10;

/// Bytes taken up by a leading ID3v2 tag (header, body and optional footer),
/// or 0 when the file doesn't start with one.
pub fn read_id3v2_len<R: Read + Seek>(reader: &mut R, file_size: u64) -> Result<u64> {
    if file_size < HEADER_LEN {
        return Ok(0);
    }
    let mut header = [0u8; 10];
    read_at(reader, 0, &mut header)?;
    if &header[..3] != b"ID3" {
        return Ok(0);
    }

    // Syncsafe integer: 7 bits per byte
    let size = (u64::from(header[6] & 0x7F) << 21)
        | (u64::from(header[7] & 0x7F) << 14)
        | (u64::from(header[8] & 0x7F) << 7)
        | u64::from(header[9] & 0x7F);
    let footer = if header[5] & FLAG_FOOTER != 0 { HEADER_LEN } else { 0 };
    Ok(HEADER_LEN + size + footer)
}

/// First text value of the frame `id`, or an empty string if it's absent.
///
/// Only ID3v2.3 and ID3v2.4 tags are accepted.
pub fn text_frame(tag: &Tag, id: &str) -> Result<String> {
    match tag.version() {
        Version::Id3v23 | Version::Id3v24 => {}
        other => return Err(Error::UnsupportedId3Version(format!("{:?}", other))),
    }

    let frame = match tag.get(id) {
        Some(frame) => frame,
        None => return Ok(String::new()),
    };
    let fields: Vec<String> = match frame.content() {
        Content::Text(s) => s.split('\0').map(str::to_owned).collect(),
        Content::Unknown(unknown) => decode_text_fields(&unknown.data),
        _ => Vec::new(),
    };
    Ok(fields.into_iter().next().unwrap_or_default())
}

/// Split the body of a raw text frame (encoding byte, then NUL-separated
/// strings) into its fields. Malformed input decodes to U+FFFD.
fn decode_text_fields(data: &[u8]) -> Vec<String> {
    let (encoding, body) = match data.split_first() {
        Some((&encoding, body)) => (encoding, body),
        None => return Vec::new(),
    };
    let text = match encoding {
        0 => WINDOWS_1252.decode_without_bom_handling(body).0,
        // UTF-16 with BOM, little-endian when it's missing
        1 => match Encoding::for_bom(body) {
            Some((encoding, bom_len)) => encoding.decode_without_bom_handling(&body[bom_len..]).0,
            None => UTF_16LE.decode_without_bom_handling(body).0,
        },
        2 => UTF_16BE.decode_without_bom_handling(body).0,
        _ => UTF_8.decode_without_bom_handling(body).0,
    };
    text.trim_end_matches('\0')
        .split('\0')
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use id3::frame::{Frame, Unknown};
    use std::io::Cursor;

    fn tag_with(version: Version, frames: &[(&str, &str)]) -> Tag {
        let mut tag = Tag::with_version(version);
        for (id, text) in frames {
            tag.set_text(*id, *text);
        }
        tag
    }

    #[test]
    fn test_text_frame_v24() {
        let tag = tag_with(Version::Id3v24, &[("TPE1", "Artist"), ("TPE2", "Album Artist")]);
        assert_eq!(text_frame(&tag, "TPE2").expect("Should read"), "Album Artist");
    }

    #[test]
    fn test_text_frame_v23() {
        let tag = tag_with(Version::Id3v23, &[("TSST", "Disc Two")]);
        assert_eq!(text_frame(&tag, "TSST").expect("Should read"), "Disc Two");
    }

    #[test]
    fn test_absent_frame_is_empty_string() {
        let tag = tag_with(Version::Id3v24, &[("TPE1", "Artist")]);
        assert_eq!(text_frame(&tag, "TPE2").expect("Should read"), "");
    }

    #[test]
    fn test_first_of_multiple_values() {
        let tag = tag_with(Version::Id3v24, &[("TPE2", "First\0Second")]);
        assert_eq!(text_frame(&tag, "TPE2").expect("Should read"), "First");
    }

    #[test]
    fn test_v22_is_unsupported() {
        let tag = tag_with(Version::Id3v22, &[]);
        assert!(matches!(
            text_frame(&tag, "TPE2"),
            Err(Error::UnsupportedId3Version(_))
        ));
    }

    #[test]
    fn test_raw_text_fields() {
        assert_eq!(decode_text_fields(b"\x00Latin\x00Two\x00"), vec!["Latin", "Two"]);
        assert_eq!(decode_text_fields(b"\x03UTF-8 \xc3\xa9"), vec!["UTF-8 é"]);
        assert_eq!(
            decode_text_fields(&[0x01, 0xFF, 0xFE, b'h', 0x00, b'i', 0x00]),
            vec!["hi"]
        );
        assert_eq!(decode_text_fields(&[0x02, 0x00, b'o', 0x00, b'k']), vec!["ok"]);
        assert_eq!(
            decode_text_fields(&[0x01, 0xFE, 0xFF, 0x00, b'b', 0x00, b'e']),
            vec!["be"]
        );
        assert_eq!(decode_text_fields(&[0x00, b'c', 0xE9]), vec!["c\u{e9}"]);
        assert!(decode_text_fields(&[]).is_empty());
    }

    #[test]
    fn test_odd_utf16_byte_is_replaced() {
        // A dangling half code unit must not vanish silently
        assert_eq!(
            decode_text_fields(&[0x01, 0xFF, 0xFE, b'h', 0x00, b'i']),
            vec!["h\u{FFFD}"]
        );
    }

    #[test]
    fn test_unknown_frame_with_odd_length() {
        let mut tag = Tag::with_version(Version::Id3v24);
        tag.add_frame(Frame::with_content(
            "NCON",
            Content::Unknown(Unknown {
                data: vec![0x01, 0xFF, 0xFE, b'h', 0x00, b'i'],
                version: Version::Id3v24,
            }),
        ));
        assert_eq!(text_frame(&tag, "NCON").expect("Should read"), "h\u{FFFD}");
    }

    // ==========================================================================
    // HEADER LENGTH
    // ==========================================================================
    //
    // "ID3" | major | revision | flags | syncsafe size (4 bytes, 7 bits each)
    // The size excludes the 10-byte header and the optional 10-byte footer.
    // ==========================================================================

    #[test]
    fn test_header_len_syncsafe() {
        let mut data = vec![b'I', b'D', b'3', 0x04, 0x00, 0x00, 0x00, 0x00, 0x02, 0x01];
        data.resize(400, 0);
        let mut cursor = Cursor::new(data);
        // 0x02 << 7 | 0x01 = 257
        assert_eq!(read_id3v2_len(&mut cursor, 400).expect("Should read"), 267);
    }

    #[test]
    fn test_header_len_with_footer_flag() {
        let data = vec![b'I', b'D', b'3', 0x04, 0x00, 0x10, 0x00, 0x00, 0x00, 0x05];
        let mut cursor = Cursor::new(data);
        assert_eq!(read_id3v2_len(&mut cursor, 10).expect("Should read"), 25);
    }

    #[test]
    fn test_header_len_without_tag() {
        let mut cursor = Cursor::new(vec![0xFF, 0xFB, 0x90, 0x00, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(read_id3v2_len(&mut cursor, 11).expect("Should read"), 0);

        let mut cursor = Cursor::new(b"ID3".to_vec());
        assert_eq!(read_id3v2_len(&mut cursor, 3).expect("Should read"), 0);
    }

    #[test]
    fn test_header_len_matches_written_tag() {
        let tag = tag_with(Version::Id3v23, &[("TIT2", "Title"), ("TPE2", "Someone")]);
        let mut data = Vec::new();
        tag.write_to(&mut data, Version::Id3v23).expect("Should write tag");
        let tag_len = data.len() as u64;
        data.extend([0xFF, 0xFB, 0x90, 0x00]);

        let size = data.len() as u64;
        let mut cursor = Cursor::new(data);
        assert_eq!(read_id3v2_len(&mut cursor, size).expect("Should read"), tag_len);
    }
}
