pub mod csv;
pub mod json;
pub mod text;

use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

use crate::analyzer::SongInfo;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Text,
    Json,
    Csv,
}

impl Format {
    /// Guess the format from a file extension, falling back to text.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "json" => Format::Json,
            "csv" => Format::Csv,
            _ => Format::Text,
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Format::Text),
            "json" => Ok(Format::Json),
            "csv" => Ok(Format::Csv),
            other => Err(format!("unknown report format {:?}", other)),
        }
    }
}

/// Write a report in the format implied by the file extension
pub fn write_to_path<P: AsRef<Path>>(path: P, results: &[SongInfo]) -> io::Result<()> {
    let path = path.as_ref();
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write(&mut file, Format::from_path(path), results)?;
    file.flush()
}

pub fn write<W: Write>(writer: &mut W, format: Format, results: &[SongInfo]) -> io::Result<()> {
    match format {
        Format::Text => text::write(writer, results),
        Format::Json => json::write(writer, results),
        Format::Csv => csv::write(writer, results),
    }
}

/// Counts for a batch of results
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub ok: usize,
    pub error: usize,
}

impl Summary {
    pub fn from_results(results: &[SongInfo]) -> Self {
        let error = results.iter().filter(|r| r.is_error()).count();
        Self {
            total: results.len(),
            ok: results.len() - error,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path("out.json"), Format::Json);
        assert_eq!(Format::from_path("OUT.CSV"), Format::Csv);
        assert_eq!(Format::from_path("out.txt"), Format::Text);
        assert_eq!(Format::from_path("out"), Format::Text);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("json".parse::<Format>(), Ok(Format::Json));
        assert_eq!("CSV".parse::<Format>(), Ok(Format::Csv));
        assert!("html".parse::<Format>().is_err());
    }

    #[test]
    fn test_summary() {
        let results = vec![
            SongInfo::default(),
            SongInfo::from_error("x.mp3", &Error::NoTags),
            SongInfo::default(),
        ];
        let summary = Summary::from_results(&results);
        assert_eq!(summary, Summary { total: 3, ok: 2, error: 1 });
    }

    #[test]
    fn test_write_to_path_uses_extension() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let path = dir.path().join("report.csv");
        write_to_path(&path, &[SongInfo::default()]).expect("Should write");

        let text = std::fs::read_to_string(&path).expect("Should read back");
        assert!(text.starts_with("file_path,"), "{}", text);
    }
}
