//! Analyzer configuration, optionally loaded from a TOML file
//!
//! ```toml
//! hash = "sha1"
//! text_frames = ["TCOM", "TIT1"]
//! require_tags = true
//!
//! [artist_rewrites]
//! "The Beatles " = "The Beatles"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::hash::HashAlgorithm;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Digest used for the audio hash
    pub hash: HashAlgorithm,
    /// ID3v2 text frames to report on top of album artist and disc subtitle
    pub text_frames: Vec<String>,
    /// Fail files that have neither an ID3v2 tag nor an ID3v1 artist/title
    pub require_tags: bool,
    /// Replacements applied to the final artist string
    pub artist_rewrites: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hash: HashAlgorithm::default(),
            text_frames: Vec::new(),
            require_tags: true,
            artist_rewrites: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("reading {}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        for id in &self.text_frames {
            if !is_frame_id(id) {
                return Err(Error::Config(format!(
                    "text frame ID {:?} isn't 4 uppercase letters or digits",
                    id
                )));
            }
        }
        Ok(())
    }
}

fn is_frame_id(id: &str) -> bool {
    id.len() == 4
        && id
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}
