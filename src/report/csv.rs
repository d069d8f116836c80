//! CSV report generation

use std::io::{self, Write};

use crate::analyzer::SongInfo;

pub fn write<W: Write>(writer: &mut W, results: &[SongInfo]) -> io::Result<()> {
    writeln!(
        writer,
        "file_path,size,header_len,footer_len,hash,duration_ms,kbit_rate,sample_rate,xing_frames,xing_bytes,artist,title,album,album_artist,track,disc,error"
    )?;

    for r in results {
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            escape_csv(&r.file_path),
            r.size,
            r.header_len,
            r.footer_len,
            r.hash,
            r.duration_ms,
            r.kbit_rate,
            r.sample_rate,
            r.xing_frames,
            r.xing_bytes,
            escape_csv(&r.artist),
            escape_csv(&r.title),
            escape_csv(&r.album),
            escape_csv(&r.album_artist),
            optional(r.track),
            optional(r.disc),
            escape_csv(r.error.as_deref().unwrap_or("")),
        )?;
    }

    Ok(())
}

fn optional(n: Option<u32>) -> String {
    n.map(|n| n.to_string()).unwrap_or_default()
}

fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_csv_rows() {
        let song = SongInfo {
            file_path: "/music/a.mp3".to_string(),
            size: 1000,
            hash: "abc".to_string(),
            artist: "Crosby, Stills & Nash".to_string(),
            track: Some(3),
            ..SongInfo::default()
        };

        let mut out = Vec::new();
        write(&mut out, &[song]).expect("Should write");
        let text = String::from_utf8(out).expect("Should be UTF-8");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].split(',').count(), 17);
        assert_eq!(
            lines[1],
            "/music/a.mp3,1000,0,0,abc,0,0,0,0,0,\"Crosby, Stills & Nash\",,,,3,,"
        );
    }
}
