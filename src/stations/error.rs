use crate::types::error::ConfigError;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Cannot find the station inventory at '{0}'. Download it first with `Inventory::download` or `Ec3::update_inventory`")]
    InventoryNotFound(PathBuf),

    #[error("Failed to read inventory file '{0}'")]
    InventoryRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to write inventory file '{0}'")]
    InventoryWrite(PathBuf, #[source] std::io::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Inventory download from {url} was interrupted")]
    DownloadIo {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("The station inventory is empty")]
    EmptyInventory,

    #[error("Failed to parse the station inventory")]
    InventoryParse(#[source] PolarsError),

    #[error("Required column '{0}' not found in the station inventory")]
    MissingColumn(String),

    #[error("Invalid station ID '{value}' on inventory row {row}")]
    InvalidStationId { row: usize, value: String },

    #[error("Station {0} is not in the inventory")]
    StationNotFound(u32),

    #[error("Station {0} has no known coordinates to measure distances from")]
    TargetWithoutCoordinates(u32),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
