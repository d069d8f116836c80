//! JSON report generation

use std::io::{self, Write};

use serde::Serialize;

use crate::analyzer::SongInfo;
use crate::report::Summary;

#[derive(Serialize)]
struct JsonReport<'a> {
    generated: String,
    summary: JsonSummary,
    files: &'a [SongInfo],
}

#[derive(Serialize)]
struct JsonSummary {
    total: usize,
    ok: usize,
    error: usize,
}

pub fn write<W: Write>(writer: &mut W, results: &[SongInfo]) -> io::Result<()> {
    let summary = Summary::from_results(results);

    let report = JsonReport {
        generated: chrono::Utc::now().to_rfc3339(),
        summary: JsonSummary {
            total: summary.total,
            ok: summary.ok,
            error: summary.error,
        },
        files: results,
    };

    let json = serde_json::to_string_pretty(&report).map_err(io::Error::other)?;
    writer.write_all(json.as_bytes())?;
    writeln!(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_json_report() {
        let song = SongInfo {
            file_name: "a.mp3".to_string(),
            artist: "Artist".to_string(),
            duration_ms: 2612,
            ..SongInfo::default()
        };
        let results = vec![song, SongInfo::from_error("b.mp3", &Error::NoTags)];

        let mut out = Vec::new();
        write(&mut out, &results).expect("Should write");
        let value: serde_json::Value = serde_json::from_slice(&out).expect("Should be valid JSON");

        assert_eq!(value["summary"]["total"], 2);
        assert_eq!(value["summary"]["error"], 1);
        assert_eq!(value["files"][0]["artist"], "Artist");
        assert_eq!(value["files"][0]["duration_ms"], 2612);
        assert!(value["files"][1]["error"].is_string());

        let generated = value["generated"].as_str().expect("Should have timestamp");
        assert!(chrono::DateTime::parse_from_rfc3339(generated).is_ok());
    }
}
