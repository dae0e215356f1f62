use crate::header::from_header;
use crate::utils::{download_to_file, read_csv_as_strings, DownloadFailure};
use crate::weather_data::error::RetrievalError;
use crate::weather_data::slice::RetrievalSlice;
use log::{debug, info};
use polars::prelude::*;
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::{fs, task};

/// Name of the column every retrieved row is tagged with.
pub const STATION_COLUMN: &str = "Station ID";

/// Downloads slices into a working directory and parses them.
pub(crate) struct SliceLoader<'a> {
    client: &'a Client,
    endpoint: &'a str,
    work_dir: &'a Path,
}

impl<'a> SliceLoader<'a> {
    pub(crate) fn new(client: &'a Client, endpoint: &'a str, work_dir: &'a Path) -> Self {
        Self {
            client,
            endpoint,
            work_dir,
        }
    }

    /// Fetches one slice and returns its rows, tagged with the station ID.
    pub(crate) async fn load(&self, slice: &RetrievalSlice) -> Result<DataFrame, RetrievalError> {
        let url = slice.url(self.endpoint);
        let path = self.fetch(slice, &url).await?;
        let bytes = fs::read(&path)
            .await
            .map_err(|e| RetrievalError::SliceRead(path.clone(), e))?;

        let station = slice.station;
        let parse_url = url.clone();
        let frame = task::spawn_blocking(move || Self::parse(bytes, station, parse_url)).await??;
        debug!("Parsed {} rows from {}", frame.height(), path.display());
        Ok(frame)
    }

    async fn fetch(&self, slice: &RetrievalSlice, url: &str) -> Result<PathBuf, RetrievalError> {
        let path = self.work_dir.join(slice.file_name());
        info!("Downloading {}", url);
        download_to_file(self.client, url, &path)
            .await
            .map_err(|failure| match failure {
                DownloadFailure::Request(source) => RetrievalError::Unreachable {
                    url: url.to_string(),
                    source,
                },
                DownloadFailure::Status(status, source) => RetrievalError::HttpStatus {
                    url: url.to_string(),
                    status,
                    source,
                },
                DownloadFailure::Io(source) => RetrievalError::Transfer {
                    url: url.to_string(),
                    source,
                },
            })?;
        Ok(path)
    }

    /// Skips the metadata preamble, reads the table below the header and adds the
    /// station column.
    fn parse(bytes: Vec<u8>, station: u32, url: String) -> Result<DataFrame, RetrievalError> {
        let text = String::from_utf8_lossy(&bytes);
        let Some(body) = from_header(&text) else {
            return Err(RetrievalError::EmptySlice { station, url });
        };
        let csv_error = |source| RetrievalError::CsvParse {
            station,
            url: url.clone(),
            source,
        };
        let mut frame = read_csv_as_strings(body).map_err(csv_error)?;
        let tag = Series::new(STATION_COLUMN.into(), vec![station; frame.height()]);
        frame.with_column(tag).map_err(csv_error)?;
        Ok(frame)
    }
}
