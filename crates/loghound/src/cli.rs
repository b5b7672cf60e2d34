//! Cli — command-line argument surface.

use std::path::PathBuf;

use clap::Parser;

use crate::pipeline::Input;
use crate::report::ReportFormat;

/// Scan logcat-style logs for crash signatures and count distinct events.
#[derive(Debug, Parser)]
#[command(name = "loghound", version)]
pub struct Cli {
    /// Log files to scan; reads stdin when none are given
    #[arg(value_name = "LOGFILE")]
    pub files: Vec<PathBuf>,

    /// Write the report to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Load the signature catalog from a TOML file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value = "text")]
    pub format: ReportFormat,
}

impl Cli {
    /// Inputs in scan order; no file arguments means piped stdin.
    pub fn inputs(&self) -> Vec<Input> {
        if self.files.is_empty() {
            vec![Input::Stdin]
        } else {
            self.files.iter().cloned().map(Input::File).collect()
        }
    }
}
