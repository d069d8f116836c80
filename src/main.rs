mod logger;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use log::{error, info};

use mpegmeta::report::{self, Format, Summary};
use mpegmeta::{Analyzer, Config, HashAlgorithm, SongInfo};

use crate::logger::Logger;

#[derive(Parser, Debug)]
#[command(name = "mpegmeta")]
#[command(author, version, about = "Audio-only hashes, exact durations and tags of MP3 files", long_about = None)]
struct Cli {
    /// MP3 files to analyze
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report format (defaults to the output file's extension, else text)
    #[arg(short, long)]
    format: Option<Format>,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Walk every frame and report what was found
    #[arg(long)]
    scan: bool,

    /// Hash with SHA-256 instead of SHA-1
    #[arg(long)]
    sha256: bool,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = Logger::setup(cli.verbose, cli.quiet) {
        eprintln!("{} {}", "Error:".red(), e);
        return ExitCode::FAILURE;
    }

    let config = match &cli.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{} {}", "Error:".red(), e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    let mut analyzer = Analyzer::with_config(config).with_scan(cli.scan);
    if cli.sha256 {
        analyzer = analyzer.with_hash(HashAlgorithm::Sha256);
    }

    let results: Vec<SongInfo> = cli
        .paths
        .iter()
        .map(|path| {
            info!("Analyzing {}", path.display());
            analyzer.analyze(path).unwrap_or_else(|e| {
                error!("{}: {}", path.display(), e);
                SongInfo::from_error(path, &e)
            })
        })
        .collect();

    if let Err(e) = write_report(&cli, &results) {
        eprintln!("{} writing report: {}", "Error:".red(), e);
        return ExitCode::FAILURE;
    }

    let summary = Summary::from_results(&results);
    if summary.error > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn write_report(cli: &Cli, results: &[SongInfo]) -> io::Result<()> {
    match (&cli.output, cli.format) {
        (Some(path), None) => report::write_to_path(path, results),
        (Some(path), Some(format)) => {
            let mut file = io::BufWriter::new(std::fs::File::create(path)?);
            report::write(&mut file, format, results)?;
            file.flush()
        }
        (None, format) => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            report::write(&mut out, format.unwrap_or_default(), results)?;
            out.flush()
        }
    }
}
