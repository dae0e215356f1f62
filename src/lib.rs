mod ec3;
mod error;
mod header;
mod settings;
mod stations;
mod types;
mod utils;
mod weather_data;

pub use ec3::Ec3;
pub use error::Ec3Error;
pub use header::locate_header;
pub use settings::*;

pub use types::data_source::Frequency;
pub use types::error::ConfigError;
pub use types::province::{parse_provinces, Province};
pub use types::query::*;
pub use types::span::{DistanceRange, MonthSpan, YearSpan};
pub use types::station::*;

pub use stations::catalog_query::run_query;
pub use stations::coverage::{covers, split_by_coverage};
pub use stations::distance::{great_circle_km, rank_by_distance, resolve_target};
pub use stations::error::CatalogError;
pub use stations::inventory::{Inventory, INVENTORY_FILE_NAME};
pub use stations::recode::detect_recodes;

pub use weather_data::data_loader::STATION_COLUMN;
pub use weather_data::error::RetrievalError;
pub use weather_data::pipeline::BulkRetrieval;
pub use weather_data::rate_limit::RateLimiter;
pub use weather_data::slice::{RetrievalRequest, RetrievalSlice};
