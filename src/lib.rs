//! mpegmeta - Authoritative metadata for MP3 files
//!
//! mpegmeta reads the facts a music library needs to identify and play a
//! song, straight from the bytes of an MP3 file.
//!
//! # Overview
//!
//! Tags change all the time: players rewrite them, taggers pad them, people
//! fix typos. The audio in between doesn't. mpegmeta finds the exact byte
//! range holding the audio (after any ID3v2 tag, before any ID3v1 footer)
//! and hashes only that, so a song keeps the same identity however often it
//! is retagged.
//!
//! # What it reads
//!
//! 1. **ID3v1 footer**: the fixed 128-byte "TAG" block at the end of the file.
//!
//! 2. **ID3v2 header**: its length bounds the audio. Text frames come from the
//!    `id3` crate, including ones it has no accessor for (album artist, disc
//!    subtitle).
//!
//! 3. **Frame headers**: the first valid MPEG Audio Layer III frame gives the
//!    bitrate, sample rate and channel mode.
//!
//! 4. **Xing/Info block**: when present, its frame count gives the exact
//!    duration. Otherwise the duration is estimated from the bitrate.
//!
//! # Quick Start
//!
//! ```no_run
//! use mpegmeta::Analyzer;
//!
//! let analyzer = Analyzer::new();
//! let song = analyzer.analyze("song.mp3")?;
//!
//! println!("{} - {}", song.artist, song.title);
//! println!("{} ms, sha1 {}", song.duration_ms, song.hash);
//! # Ok::<(), mpegmeta::Error>(())
//! ```
//!
//! # Modules
//!
//! - [`analyzer`]: Per-file flow tying the readers together, plus the frame walk
//! - [`mp3`]: Frame header decoding, frame search and Xing/Info durations
//! - [`id3`]: ID3v1 footer and ID3v2 helpers
//! - [`hash`]: Audio-only content hash
//! - [`report`]: Output formatters (text, JSON, CSV)

pub mod analyzer;
pub mod config;
pub mod error;
pub mod hash;
pub mod id3;
pub mod mp3;
mod read;
pub mod report;

pub use analyzer::{Analyzer, FrameScan, SongInfo};
pub use config::Config;
pub use error::{Error, Result};
pub use hash::{compute_audio_hash, compute_audio_sha1, AudioRange, HashAlgorithm};
pub use crate::id3::{read_id3v1_footer, text_frame, Id3v1Tag};
pub use mp3::{compute_audio_duration, AudioDuration, FrameInfo};

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // PUBLIC API TESTS
    // ==========================================================================
    //
    // The core readers and the analyzer are reachable from the crate root.
    // ==========================================================================

    #[test]
    fn test_analyzer_accessible() {
        let analyzer = Analyzer::new();
        assert!(!analyzer.scan);
        assert_eq!(analyzer.config, Config::default());
    }

    #[test]
    fn test_readers_accessible() {
        let mut cursor = std::io::Cursor::new(vec![0u8; 16]);
        assert_eq!(read_id3v1_footer(&mut cursor, 16).ok(), Some(None));
        assert!(matches!(
            mp3::find_frame(&mut cursor, 0),
            Err(Error::NoFrameHeader { start: 0 })
        ));
        assert!(FrameInfo::parse([0xFF, 0xFB, 0x90, 0x00]).is_ok());
    }

    #[test]
    fn test_default_hash_is_sha1() {
        assert_eq!(HashAlgorithm::default(), HashAlgorithm::Sha1);
    }
}
