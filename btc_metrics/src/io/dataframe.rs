use std::fs::{self, File};
use std::path::Path;
use std::str::FromStr;

use polars::prelude::{CsvWriter, DataFrame, IpcWriter};
use polars_io::SerWriter;

use crate::errors::Error;

/// File format understood by the chart renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Arrow IPC, readable as Feather.
    #[default]
    Ipc,
    Csv,
}

impl OutputFormat {
    /// Guess the format from a file extension (`.feather`, `.arrow`, `.ipc`, `.csv`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "feather" | "arrow" | "ipc" => Some(OutputFormat::Ipc),
            "csv" => Some(OutputFormat::Csv),
            _ => None,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ipc" | "feather" | "arrow" => Ok(OutputFormat::Ipc),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(Error::Config(format!("unknown output format: {other}"))),
        }
    }
}

/// Write `frame` to `path`, creating parent directories as needed.
pub fn write_frame(frame: &mut DataFrame, path: &Path, format: OutputFormat) -> Result<(), Error> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    match format {
        OutputFormat::Ipc => IpcWriter::new(&mut file).finish(frame)?,
        OutputFormat::Csv => CsvWriter::new(&mut file).include_header(true).finish(frame)?,
    }
    tracing::debug!(path = %path.display(), ?format, rows = frame.height(), "wrote frame");
    Ok(())
}
