use polars::prelude::DataFrame;

use super::{DataSource, errors::DataSourceError};

/// Serves a frame that is already in memory.
///
/// Every fetch hands out a clone, so the same source can back several loads.
#[derive(Debug, Clone)]
pub struct FrameSource {
    frame: DataFrame,
    description: String,
}

impl FrameSource {
    pub fn new(frame: DataFrame) -> Self {
        Self {
            frame,
            description: "in-memory frame".to_string(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl DataSource for FrameSource {
    fn fetch_daily(&mut self) -> Result<DataFrame, DataSourceError> {
        Ok(self.frame.clone())
    }

    fn description(&self) -> &str {
        &self.description
    }
}
