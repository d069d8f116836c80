pub mod scan;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use id3::{Tag, TagLike, Version};
use log::{debug, warn};
use serde::Serialize;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::hash::{compute_audio_hash, AudioRange, HashAlgorithm};
use crate::id3::{read_id3v1_footer, read_id3v2_len, text_frame, Id3v1Tag, ID3V1_LEN};
use crate::mp3::{compute_audio_duration, ChannelMode};

pub use scan::{scan_frames, FrameScan, SkippedRegion};

/// Album name used for songs that don't belong to an album
pub const NON_ALBUM: &str = "[non-album tracks]";

const ALBUM_ARTIST_FRAME: &str = "TPE2";
const DISC_SUBTITLE_FRAME: &str = "TSST";

/// TXXX description holding the MusicBrainz release ID, usually also the cover ID
pub const ALBUM_ID_DESCRIPTION: &str = "MusicBrainz Album Id";
/// TXXX description for a cover ID on tracks without a MusicBrainz release
pub const COVER_ID_DESCRIPTION: &str = "nup Cover Id";
/// UFID owner holding the MusicBrainz recording ID
pub const RECORDING_ID_OWNER: &str = "http://musicbrainz.org";

/// Everything learned about one file
#[derive(Debug, Clone, Default, Serialize)]
pub struct SongInfo {
    pub file_path: String,
    pub file_name: String,
    pub size: u64,
    /// Bytes before the audio (the ID3v2 tag)
    pub header_len: u64,
    /// Bytes after the audio (the ID3v1 tag)
    pub footer_len: u64,
    pub hash_algorithm: HashAlgorithm,
    /// Hex digest of the audio bytes only
    pub hash: String,
    pub duration_ms: u64,
    pub first_frame_offset: u64,
    pub kbit_rate: u32,
    pub sample_rate: u32,
    pub channel_mode: Option<ChannelMode>,
    pub xing_frames: u32,
    pub xing_bytes: u32,

    pub artist: String,
    pub title: String,
    pub album: String,
    /// Empty when it matches the artist
    pub album_artist: String,
    pub disc_subtitle: String,
    pub year: Option<i32>,
    pub track: Option<u32>,
    pub disc: Option<u32>,
    pub album_id: String,
    pub cover_id: String,
    pub recording_id: String,
    /// Configured extra text frames that were present
    pub text_frames: BTreeMap<String, String>,
    pub id3v1: Option<Id3v1Tag>,
    pub id3v2_version: Option<String>,

    pub scan: Option<FrameScan>,
    pub error: Option<String>,
}

impl SongInfo {
    fn for_path(path: &Path) -> Self {
        let file_path = path.display().to_string();
        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| file_path.clone());
        Self {
            file_path,
            file_name,
            ..Self::default()
        }
    }

    /// Row for a file that couldn't be analyzed
    pub fn from_error<P: AsRef<Path>>(path: P, err: &Error) -> Self {
        Self {
            error: Some(err.to_string()),
            ..Self::for_path(path.as_ref())
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Reads tags, hash and duration from MP3 files
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    pub config: Config,
    /// Walk every frame as well (slow, for debugging odd files)
    pub scan: bool,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Self { config, scan: false }
    }

    pub fn with_hash(mut self, algorithm: HashAlgorithm) -> Self {
        self.config.hash = algorithm;
        self
    }

    pub fn with_scan(mut self, scan: bool) -> Self {
        self.scan = scan;
        self
    }

    pub fn with_text_frames<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.text_frames = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Analyze the file at `path`.
    pub fn analyze<P: AsRef<Path>>(&self, path: P) -> Result<SongInfo> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let size = file.metadata()?.len();
        let mut reader = BufReader::new(file);

        let info = self.analyze_reader(&mut reader, size)?;
        Ok(SongInfo {
            file_path: path.display().to_string(),
            file_name: SongInfo::for_path(path).file_name,
            ..info
        })
    }

    /// Analyze `size` bytes of MP3 data from `reader`.
    pub fn analyze_reader<R: Read + Seek>(&self, reader: &mut R, size: u64) -> Result<SongInfo> {
        let mut song = SongInfo {
            size,
            hash_algorithm: self.config.hash,
            ..SongInfo::default()
        };

        let id3v1 = read_id3v1_footer(reader, size)?;
        if let Some(v1) = &id3v1 {
            song.footer_len = ID3V1_LEN;
            song.artist = v1.artist.clone();
            song.title = v1.title.clone();
            song.album = v1.album.clone();
            song.year = v1.year.parse().ok();
            song.track = (v1.track != 0).then_some(u32::from(v1.track));
        }
        let has_v1_names = !song.artist.is_empty() || !song.title.is_empty();
        song.id3v1 = id3v1;

        reader.seek(SeekFrom::Start(0))?;
        match Tag::read_from2(&mut *reader) {
            Ok(tag) => {
                song.header_len = read_id3v2_len(reader, size)?;
                self.apply_id3v2(&mut song, &tag)?;
            }
            Err(e) if matches!(e.kind, id3::ErrorKind::NoTag) => {
                if self.config.require_tags && !has_v1_names {
                    return Err(Error::NoTags);
                }
            }
            Err(e) => {
                if self.config.require_tags && !has_v1_names {
                    return Err(e.into());
                }
                // header_len stays 0, so the hash covers the broken tag too
                warn!("Using ID3v1 data, ID3v2 tag is unreadable: {}", e);
            }
        }

        let range = AudioRange::new(song.header_len, song.footer_len);
        song.hash = compute_audio_hash(reader, size, range, self.config.hash)?;

        let duration = compute_audio_duration(reader, size, song.header_len, song.footer_len)?;
        song.duration_ms = duration.millis();
        song.first_frame_offset = duration.first_frame_offset;
        song.kbit_rate = duration.frame.kbit_rate;
        song.sample_rate = duration.frame.sample_rate;
        song.channel_mode = Some(duration.frame.channel_mode);
        song.xing_frames = duration.xing_frames();
        song.xing_bytes = duration.xing_bytes();

        if self.scan {
            song.scan = Some(scan_frames(reader, size, range, duration.xing.as_ref())?);
        }

        if let Some(rewrite) = self.config.artist_rewrites.get(&song.artist) {
            debug!("Rewriting artist {:?} to {:?}", song.artist, rewrite);
            song.artist = rewrite.clone();
        }

        Ok(song)
    }

    fn apply_id3v2(&self, song: &mut SongInfo, tag: &Tag) -> Result<()> {
        song.id3v2_version = Some(
            match tag.version() {
                Version::Id3v22 => "2.2",
                Version::Id3v23 => "2.3",
                Version::Id3v24 => "2.4",
            }
            .to_string(),
        );

        // ID3v2 names win over ID3v1 ones, even when empty
        song.artist = tag.artist().unwrap_or_default().to_string();
        song.title = tag.title().unwrap_or_default().to_string();
        song.album = tag.album().unwrap_or_default().to_string();
        song.year = tag.year().or(song.year);
        song.track = tag.track().or(song.track);
        song.disc = tag.disc();

        // Old files may lack TPOS; assume a single-disc album
        if song.disc.is_none() && tag.track().is_some() && song.album != NON_ALBUM {
            song.disc = Some(1);
        }

        song.album_id = extended_text(tag, ALBUM_ID_DESCRIPTION);
        song.cover_id = extended_text(tag, COVER_ID_DESCRIPTION);
        song.recording_id = tag
            .unique_file_identifiers()
            .find(|ufid| ufid.owner_identifier == RECORDING_ID_OWNER)
            .map(|ufid| String::from_utf8_lossy(&ufid.identifier).into_owned())
            .unwrap_or_default();

        let album_artist = text_frame(tag, ALBUM_ARTIST_FRAME)?;
        if album_artist != song.artist {
            song.album_artist = album_artist;
        }
        song.disc_subtitle = text_frame(tag, DISC_SUBTITLE_FRAME)?;

        for id in &self.config.text_frames {
            let value = text_frame(tag, id)?;
            if !value.is_empty() {
                song.text_frames.insert(id.clone(), value);
            }
        }
        Ok(())
    }
}

/// Value of the first TXXX frame with `description`, or an empty string.
fn extended_text(tag: &Tag, description: &str) -> String {
    tag.extended_texts()
        .find(|txxx| txxx.description == description)
        .map(|txxx| txxx.value.clone())
        .unwrap_or_default()
}
