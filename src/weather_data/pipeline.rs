use crate::weather_data::data_loader::{SliceLoader, STATION_COLUMN};
use crate::weather_data::error::RetrievalError;
use crate::weather_data::rate_limit::RateLimiter;
use crate::weather_data::slice::RetrievalSlice;
use log::info;
use polars::prelude::*;
use reqwest::Client;
use std::time::Duration;

/// Sequential bulk download of slices into one table.
pub struct BulkRetrieval {
    client: Client,
    endpoint: String,
    limiter: RateLimiter,
}

impl BulkRetrieval {
    pub fn new(client: Client, endpoint: impl Into<String>, delay: Duration) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            limiter: RateLimiter::new(delay),
        }
    }

    /// Downloads every slice in order and stacks the rows, with the station column first.
    ///
    /// Slices are fetched one at a time with the configured delay in between. Files are
    /// kept in a temporary directory that is removed when this call returns. Columns
    /// are read as strings; slices with different columns are stacked by name.
    ///
    /// # Errors
    ///
    /// The first failing slice aborts the whole retrieval; no partial table is returned.
    pub async fn retrieve(&mut self, slices: &[RetrievalSlice]) -> Result<DataFrame, RetrievalError> {
        let work_dir = tempfile::tempdir().map_err(RetrievalError::TempDir)?;
        let loader = SliceLoader::new(&self.client, &self.endpoint, work_dir.path());

        let mut frames = Vec::with_capacity(slices.len());
        for (index, slice) in slices.iter().enumerate() {
            self.limiter.acquire().await;
            info!(
                "Retrieving slice {}/{}: {}",
                index + 1,
                slices.len(),
                slice.file_name()
            );
            let loaded = loader.load(slice).await;
            self.limiter.release();
            frames.push(loaded?.lazy());
        }

        if frames.is_empty() {
            return Ok(DataFrame::empty());
        }
        let aggregate = concat_lf_diagonal(frames, UnionArgs::default())?.collect()?;
        info!(
            "Retrieved {} rows from {} slices",
            aggregate.height(),
            slices.len()
        );
        Ok(station_first(aggregate)?)
    }
}

fn station_first(frame: DataFrame) -> PolarsResult<DataFrame> {
    let mut order: Vec<PlSmallStr> = vec![STATION_COLUMN.into()];
    order.extend(
        frame
            .get_column_names()
            .into_iter()
            .filter(|name| name.as_str() != STATION_COLUMN)
            .cloned(),
    );
    frame.select(order)
}
