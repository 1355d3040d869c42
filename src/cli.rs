use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::profile::DEFAULT_BATCH_SIZE;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Convert partner spreadsheet exports into batched SQL scripts",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write batched SQL files and an execute_all.sh driver script
    Convert(ConvertArgs),
    /// List sheets, headers, and sample rows of a source file
    Probe(ProbeArgs),
    /// Show the first rows after column mapping in a formatted table
    Preview(PreviewArgs),
    /// Write the built-in export profile as a YAML template
    Profile(ProfileArgs),
}

/// Options describing how the source file is read.
#[derive(Debug, Clone, Default, Args)]
pub struct SourceArgs {
    /// Worksheet to read (defaults to the first sheet)
    #[arg(long)]
    pub sheet: Option<String>,
    /// Delimiter for CSV/TSV input (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of CSV/TSV input (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Spreadsheet or CSV export to convert
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Directory receiving the SQL files and driver script (created if absent)
    #[arg(short = 'o', long = "output-dir")]
    pub output_dir: PathBuf,
    /// Maximum number of rows per SQL file
    #[arg(short = 'b', long = "batch-size", default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,
    /// YAML export profile overriding the built-in partner profile
    #[arg(short = 'p', long = "profile")]
    pub profile: Option<PathBuf>,
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Debug, Args)]
pub struct ProbeArgs {
    /// Spreadsheet or CSV file to inspect
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Number of sample rows to display per sheet
    #[arg(long = "sample-rows", default_value_t = 3)]
    pub sample_rows: usize,
    /// YAML export profile used to report header mappings
    #[arg(short = 'p', long = "profile")]
    pub profile: Option<PathBuf>,
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Spreadsheet or CSV file to preview
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Number of rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
    /// Truncate cells wider than this many characters
    #[arg(long = "max-width", default_value_t = 24)]
    pub max_width: usize,
    /// YAML export profile overriding the built-in partner profile
    #[arg(short = 'p', long = "profile")]
    pub profile: Option<PathBuf>,
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Debug, Args)]
pub struct ProfileArgs {
    /// Destination YAML file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\\t" => Ok(b'\t'),
        other if other.len() == 1 && other.is_ascii() => Ok(other.as_bytes()[0]),
        other => Err(format!(
            "Delimiter must be a single ASCII character or 'tab' (got '{other}')"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn convert_defaults_batch_size() {
        let cli = Cli::try_parse_from(["partner-batches", "convert", "-i", "a.xlsx", "-o", "out"])
            .unwrap();
        match cli.command {
            Commands::Convert(args) => {
                assert_eq!(args.batch_size, 5000);
                assert!(args.profile.is_none());
                assert!(args.source.sheet.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn negative_batch_size_is_rejected_by_the_parser() {
        let result = Cli::try_parse_from([
            "partner-batches",
            "convert",
            "-i",
            "a.xlsx",
            "-o",
            "out",
            "--batch-size",
            "-5",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_delimiter_accepts_named_tab() {
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert_eq!(parse_delimiter(";"), Ok(b';'));
        assert!(parse_delimiter("::").is_err());
    }
}
