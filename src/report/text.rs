//! Human-readable report

use std::io::{self, Write};

use crate::analyzer::{FrameScan, SongInfo};
use crate::report::Summary;

pub fn write<W: Write>(writer: &mut W, results: &[SongInfo]) -> io::Result<()> {
    for r in results {
        writeln!(writer, "{}", r.file_path)?;
        if let Some(err) = &r.error {
            writeln!(writer, "  error:       {}", err)?;
            writeln!(writer)?;
            continue;
        }

        writeln!(
            writer,
            "  size:        {} (header {}, footer {})",
            r.size, r.header_len, r.footer_len
        )?;
        write_field(writer, &r.hash_algorithm.to_string(), &r.hash)?;
        writeln!(writer, "  duration:    {}", format_duration(r.duration_ms))?;
        writeln!(
            writer,
            "  audio:       {} kbps, {} Hz, first frame at {}",
            r.kbit_rate, r.sample_rate, r.first_frame_offset
        )?;
        if r.xing_frames > 0 || r.xing_bytes > 0 {
            writeln!(writer, "  xing:        {} frames, {} bytes", r.xing_frames, r.xing_bytes)?;
        }

        write_field(writer, "artist", &r.artist)?;
        write_field(writer, "title", &r.title)?;
        write_field(writer, "album", &r.album)?;
        write_field(writer, "album artist", &r.album_artist)?;
        write_field(writer, "disc title", &r.disc_subtitle)?;
        write_field(writer, "album id", &r.album_id)?;
        write_field(writer, "cover id", &r.cover_id)?;
        write_field(writer, "recording", &r.recording_id)?;
        if let Some(track) = r.track {
            writeln!(writer, "  track:       {}", track)?;
        }
        if let Some(disc) = r.disc {
            writeln!(writer, "  disc:        {}", disc)?;
        }
        for (id, value) in &r.text_frames {
            write_field(writer, id, value)?;
        }

        if let Some(scan) = &r.scan {
            write_scan(writer, scan)?;
        }
        writeln!(writer)?;
    }

    let summary = Summary::from_results(results);
    writeln!(
        writer,
        "{} files, {} ok, {} errors",
        summary.total, summary.ok, summary.error
    )
}

fn write_field<W: Write>(writer: &mut W, name: &str, value: &str) -> io::Result<()> {
    if value.is_empty() {
        return Ok(());
    }
    let label = format!("{}:", name);
    writeln!(writer, "  {:<12} {}", label, value)
}

fn write_scan<W: Write>(writer: &mut W, scan: &FrameScan) -> io::Result<()> {
    writeln!(
        writer,
        "  scan:        {} frames, {} bytes, {}, {:.1} kbps avg",
        scan.actual_frames,
        scan.actual_bytes,
        if scan.vbr { "VBR" } else { "CBR" },
        scan.avg_kbit_rate
    )?;
    writeln!(writer, "  scanned:     {}", format_duration(scan.actual_duration_ms))?;
    if let (Some(frame), Some(offset), Some(ms)) = (scan.empty_frame, scan.empty_offset, scan.empty_duration_ms) {
        writeln!(
            writer,
            "  empty from:  frame {} at {} ({})",
            frame,
            offset,
            format_duration(ms)
        )?;
    }
    for skipped in &scan.skipped {
        writeln!(
            writer,
            "  skipped:     {} bytes at {}: {}",
            skipped.size, skipped.offset, skipped.reason
        )?;
    }
    Ok(())
}

/// `m:ss.mmm`
fn format_duration(ms: u64) -> String {
    format!("{}:{:02}.{:03}", ms / 60_000, ms / 1000 % 60, ms % 1000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::SkippedRegion;
    use crate::error::Error;

    fn render(results: &[SongInfo]) -> String {
        let mut out = Vec::new();
        write(&mut out, results).expect("Should write");
        String::from_utf8(out).expect("Should be UTF-8")
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00.000");
        assert_eq!(format_duration(2612), "0:02.612");
        assert_eq!(format_duration(225_005), "3:45.005");
        assert_eq!(format_duration(3_600_000), "60:00.000");
    }

    #[test]
    fn test_song_lines() {
        let song = SongInfo {
            file_path: "a.mp3".to_string(),
            size: 5000,
            header_len: 100,
            footer_len: 128,
            hash: "deadbeef".to_string(),
            duration_ms: 2612,
            xing_frames: 100,
            xing_bytes: 41700,
            artist: "Artist".to_string(),
            track: Some(4),
            ..SongInfo::default()
        };
        let text = render(&[song]);

        assert!(text.contains("size:        5000 (header 100, footer 128)"), "{}", text);
        assert!(text.contains("sha1:        deadbeef"), "{}", text);
        assert!(text.contains("duration:    0:02.612"), "{}", text);
        assert!(text.contains("xing:        100 frames, 41700 bytes"), "{}", text);
        assert!(text.contains("artist:      Artist"), "{}", text);
        assert!(!text.contains("album:"), "Empty fields are omitted");
        assert!(text.ends_with("1 files, 1 ok, 0 errors\n"), "{}", text);
    }

    #[test]
    fn test_error_and_scan_lines() {
        let scanned = SongInfo {
            file_path: "b.mp3".to_string(),
            scan: Some(FrameScan {
                actual_frames: 10,
                actual_bytes: 4170,
                avg_kbit_rate: 128.0,
                actual_duration_ms: 261,
                skipped: vec![SkippedRegion {
                    offset: 50,
                    size: 20,
                    reason: "empty".to_string(),
                }],
                ..FrameScan::default()
            }),
            ..SongInfo::default()
        };
        let text = render(&[SongInfo::from_error("c.mp3", &Error::NoTags), scanned]);

        assert!(text.contains("error:       no ID3v2 tag"), "{}", text);
        assert!(text.contains("scan:        10 frames, 4170 bytes, CBR, 128.0 kbps avg"), "{}", text);
        assert!(text.contains("skipped:     20 bytes at 50: empty"), "{}", text);
        assert!(text.contains("2 files, 1 ok, 1 errors"), "{}", text);
    }
}
