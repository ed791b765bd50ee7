use std::fs::File;
use std::path::PathBuf;

use polars::prelude::*;

use super::{DataSource, errors::DataSourceError};

/// Reads the daily table from an Arrow IPC (Feather v2) snapshot.
///
/// This is the format [`crate::io::write_frame`] produces, so a warehouse
/// extract can be taken once and replayed offline.
#[derive(Debug, Clone)]
pub struct IpcSource {
    path: PathBuf,
    description: String,
}

impl IpcSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let description = format!("ipc:{}", path.display());
        Self { path, description }
    }
}

impl DataSource for IpcSource {
    fn fetch_daily(&mut self) -> Result<DataFrame, DataSourceError> {
        let file = File::open(&self.path).map_err(|source| DataSourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let frame = IpcReader::new(file).finish()?;
        Ok(frame)
    }

    fn description(&self) -> &str {
        &self.description
    }
}
