pub mod frame;
pub mod xing;

pub use frame::{find_frame, read_frame_info, ChannelMode, FrameInfo, MpegVersion, MAX_FRAME_SEARCH_BYTES};
pub use xing::{compute_audio_duration, AudioDuration, XingHeader, XingKind};
