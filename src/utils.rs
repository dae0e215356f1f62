use futures_util::TryStreamExt;
use log::{info, warn};
use polars::prelude::*;
use reqwest::Client;
use std::io;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio_util::io::StreamReader;

const CACHE_DIR_NAME: &str = "ec3_rs_cache";

pub fn get_cache_dir() -> io::Result<PathBuf> {
    dirs::cache_dir()
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "Could not determine system cache directory",
            )
        })
        .map(|p| p.join(CACHE_DIR_NAME))
}

pub async fn ensure_cache_dir_exists(path: &Path) -> io::Result<()> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("Cache path exists but is not a directory: {}", path.display()),
                ));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating cache directory: {}", path.display());
            tokio::fs::create_dir_all(path).await
        }
        Err(e) => Err(e),
    }
}

/// Reads CSV text whose first line is the header. Every column is read as a
/// string, so files that would infer different types can still be stacked.
pub(crate) fn read_csv_as_strings(body: String) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(body.into_bytes()))
        .finish()
}

/// Why a download could not be completed.
#[derive(Debug)]
pub(crate) enum DownloadFailure {
    /// The request could not be sent or no response arrived.
    Request(reqwest::Error),
    /// The server answered with an error status.
    Status(reqwest::StatusCode, reqwest::Error),
    /// The body could not be streamed to disk.
    Io(io::Error),
}

/// Streams the body of a GET request into `destination`, returning the number of
/// bytes written.
pub(crate) async fn download_to_file(
    client: &Client,
    url: &str,
    destination: &Path,
) -> Result<u64, DownloadFailure> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(DownloadFailure::Request)?;
    let response = match response.error_for_status() {
        Ok(resp) => resp,
        Err(e) => {
            warn!("HTTP error for {}: {:?}", url, e);
            return Err(match e.status() {
                Some(status) => DownloadFailure::Status(status, e),
                None => DownloadFailure::Request(e),
            });
        }
    };

    let stream = response.bytes_stream().map_err(io::Error::other);
    let mut reader = StreamReader::new(stream);
    let mut file = tokio::fs::File::create(destination)
        .await
        .map_err(DownloadFailure::Io)?;
    let written = tokio::io::copy(&mut reader, &mut file)
        .await
        .map_err(DownloadFailure::Io)?;
    file.flush().await.map_err(DownloadFailure::Io)?;
    Ok(written)
}
