//! Tag readers: the ID3v1 footer and ID3v2 text frames

pub mod v1;
pub mod v2;

pub use v1::{read_id3v1_footer, Id3v1Tag, ID3V1_LEN};
pub use v2::{read_id3v2_len, text_frame};
