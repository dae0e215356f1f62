//! Loading and downloading the ECCC station inventory.

use crate::header::from_header;
use crate::stations::error::CatalogError;
use crate::types::province::Province;
use crate::types::station::{DataInventory, Location, Station, YearRange};
use crate::utils::{download_to_file, read_csv_as_strings, DownloadFailure};
use log::{debug, info, warn};
use polars::prelude::{DataFrame, StringChunked};
use reqwest::Client;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

/// File name of the inventory, as published by ECCC.
pub const INVENTORY_FILE_NAME: &str = "Station Inventory EN.csv";

const NAME: &str = "Name";
const PROVINCE: &str = "Province";
const CLIMATE_ID: &str = "Climate ID";
const STATION_ID: &str = "Station ID";
const WMO_ID: &str = "WMO ID";
const TC_ID: &str = "TC ID";
const LATITUDE: &str = "Latitude (Decimal Degrees)";
const LONGITUDE: &str = "Longitude (Decimal Degrees)";
const ELEVATION: &str = "Elevation (m)";
const FIRST_YEAR: &str = "First Year";
const LAST_YEAR: &str = "Last Year";
const HLY_FIRST_YEAR: &str = "HLY First Year";
const HLY_LAST_YEAR: &str = "HLY Last Year";
const DLY_FIRST_YEAR: &str = "DLY First Year";
const DLY_LAST_YEAR: &str = "DLY Last Year";
const MLY_FIRST_YEAR: &str = "MLY First Year";
const MLY_LAST_YEAR: &str = "MLY Last Year";

/// The station inventory: every known station with its metadata and data coverage.
///
/// Loaded once and never modified afterwards. Queries and downloads borrow it.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    stations: Vec<Station>,
    by_id: HashMap<u32, usize>,
}

impl Inventory {
    /// Builds an inventory from stations, keeping their order.
    pub fn new(stations: Vec<Station>) -> Self {
        let by_id = stations
            .iter()
            .enumerate()
            .map(|(index, station)| (station.id, index))
            .collect();
        Self { stations, by_id }
    }

    /// Reads and parses an inventory file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InventoryNotFound`] if there is no file at `path`.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CatalogError::InventoryNotFound(path.to_path_buf()))
            }
            Err(e) => return Err(CatalogError::InventoryRead(path.to_path_buf(), e)),
        };
        let inventory = Self::parse(&text)?;
        info!(
            "Loaded {} stations from {}",
            inventory.len(),
            path.display()
        );
        Ok(inventory)
    }

    /// Parses inventory CSV text. Metadata lines above the header are skipped.
    pub fn parse(text: &str) -> Result<Self, CatalogError> {
        let body = from_header(text).ok_or(CatalogError::EmptyInventory)?;
        let frame = read_csv_as_strings(body).map_err(CatalogError::InventoryParse)?;
        let columns = InventoryColumns::new(&frame)?;
        let stations = (0..frame.height())
            .map(|row| columns.station(row))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(stations))
    }

    /// Downloads the inventory from `url` to `destination`.
    ///
    /// The file is first written next to `destination` and only moved into place once
    /// complete, so an interrupted download never replaces a good inventory. The partial
    /// file is removed when the download fails.
    pub async fn download(
        client: &Client,
        url: &str,
        destination: &Path,
    ) -> Result<u64, CatalogError> {
        info!("Downloading station inventory from {}", url);
        let partial = destination.with_extension("csv.part");
        let moved = match download_to_file(client, url, &partial).await {
            Ok(written) => tokio::fs::rename(&partial, destination)
                .await
                .map(|()| written)
                .map_err(|e| CatalogError::InventoryWrite(destination.to_path_buf(), e)),
            Err(failure) => Err(match failure {
                DownloadFailure::Request(e) => CatalogError::NetworkRequest(url.to_string(), e),
                DownloadFailure::Status(status, source) => CatalogError::HttpStatus {
                    url: url.to_string(),
                    status,
                    source,
                },
                DownloadFailure::Io(source) => CatalogError::DownloadIo {
                    url: url.to_string(),
                    source,
                },
            }),
        };
        let written = match moved {
            Ok(written) => written,
            Err(e) => {
                if tokio::fs::remove_file(&partial).await.is_ok() {
                    debug!("Removed partial download {}", partial.display());
                }
                return Err(e);
            }
        };
        info!(
            "Wrote station inventory ({} bytes) to {}",
            written,
            destination.display()
        );
        Ok(written)
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn iter(&self) -> impl Iterator<Item = &Station> {
        self.stations.iter()
    }

    pub fn get(&self, id: u32) -> Option<&Station> {
        self.by_id.get(&id).map(|&index| &self.stations[index])
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

/// Borrowed string columns of a parsed inventory frame.
struct InventoryColumns<'a> {
    name: &'a StringChunked,
    province: &'a StringChunked,
    station_id: &'a StringChunked,
    latitude: &'a StringChunked,
    longitude: &'a StringChunked,
    hourly: (&'a StringChunked, &'a StringChunked),
    daily: (&'a StringChunked, &'a StringChunked),
    monthly: (&'a StringChunked, &'a StringChunked),
    climate_id: Option<&'a StringChunked>,
    wmo_id: Option<&'a StringChunked>,
    tc_id: Option<&'a StringChunked>,
    elevation: Option<&'a StringChunked>,
    overall: (Option<&'a StringChunked>, Option<&'a StringChunked>),
}

impl<'a> InventoryColumns<'a> {
    fn new(frame: &'a DataFrame) -> Result<Self, CatalogError> {
        let required = move |name: &str| -> Result<&'a StringChunked, CatalogError> {
            frame
                .column(name)
                .map_err(|_| CatalogError::MissingColumn(name.to_string()))?
                .str()
                .map_err(CatalogError::InventoryParse)
        };
        let optional = move |name: &str| -> Option<&'a StringChunked> {
            let column = frame.column(name).ok().and_then(|c| c.str().ok());
            if column.is_none() {
                warn!("Inventory column '{}' is unavailable", name);
            }
            column
        };

        Ok(Self {
            name: required(NAME)?,
            province: required(PROVINCE)?,
            station_id: required(STATION_ID)?,
            latitude: required(LATITUDE)?,
            longitude: required(LONGITUDE)?,
            hourly: (required(HLY_FIRST_YEAR)?, required(HLY_LAST_YEAR)?),
            daily: (required(DLY_FIRST_YEAR)?, required(DLY_LAST_YEAR)?),
            monthly: (required(MLY_FIRST_YEAR)?, required(MLY_LAST_YEAR)?),
            climate_id: optional(CLIMATE_ID),
            wmo_id: optional(WMO_ID),
            tc_id: optional(TC_ID),
            elevation: optional(ELEVATION),
            overall: (optional(FIRST_YEAR), optional(LAST_YEAR)),
        })
    }

    fn station(&self, row: usize) -> Result<Station, CatalogError> {
        let raw_id = text(self.station_id, row).unwrap_or_default();
        let id = parse_number::<u32>(raw_id).ok_or_else(|| CatalogError::InvalidStationId {
            row,
            value: raw_id.to_string(),
        })?;

        let province = text(self.province, row).and_then(|value| {
            let province = Province::from_inventory_name(value);
            if province.is_none() {
                warn!("Station {} has an unknown province '{}'", id, value);
            }
            province
        });

        Ok(Station {
            id,
            name: text(self.name, row).unwrap_or_default().to_string(),
            province,
            climate_id: self
                .climate_id
                .and_then(|c| text(c, row))
                .map(str::to_string),
            wmo_id: self.wmo_id.and_then(|c| number(c, row)),
            tc_id: self.tc_id.and_then(|c| text(c, row)).map(str::to_string),
            location: Location::from_inventory(
                number(self.latitude, row),
                number(self.longitude, row),
                self.elevation.and_then(|c| number(c, row)),
            ),
            inventory: DataInventory {
                overall: YearRange::new(
                    self.overall.0.and_then(|c| number(c, row)),
                    self.overall.1.and_then(|c| number(c, row)),
                ),
                hourly: year_range(self.hourly, row),
                daily: year_range(self.daily, row),
                monthly: year_range(self.monthly, row),
            },
        })
    }
}

fn text(column: &StringChunked, row: usize) -> Option<&str> {
    column.get(row).map(str::trim).filter(|value| !value.is_empty())
}

/// Parses integers that may have been written as floats (`"1953.0"`).
fn parse_number<T: FromStr + NumFromF64>(value: &str) -> Option<T> {
    value
        .parse::<T>()
        .ok()
        .or_else(|| value.parse::<f64>().ok().and_then(T::from_f64))
}

fn number<T: FromStr + NumFromF64>(column: &StringChunked, row: usize) -> Option<T> {
    text(column, row).and_then(parse_number)
}

fn year_range(columns: (&StringChunked, &StringChunked), row: usize) -> YearRange {
    YearRange::new(number(columns.0, row), number(columns.1, row))
}

/// Conversion from a parsed float, used for integer columns written with a decimal point.
trait NumFromF64: Sized {
    fn from_f64(value: f64) -> Option<Self>;
}

impl NumFromF64 for f64 {
    fn from_f64(value: f64) -> Option<Self> {
        Some(value)
    }
}

impl NumFromF64 for i32 {
    fn from_f64(value: f64) -> Option<Self> {
        (value.fract() == 0.0 && value.abs() <= i32::MAX as f64).then_some(value as i32)
    }
}

impl NumFromF64 for u32 {
    fn from_f64(value: f64) -> Option<Self> {
        (value.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&value)).then_some(value as u32)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::data_source::Frequency;

    /// A small inventory in the published format, preamble included.
    pub(crate) const SAMPLE_INVENTORY: &str = "\
\"Modified Date: 2024-01-09 23:30 UTC\"
\"Station Inventory Disclaimer: Please note that this inventory list is a snapshot of stations on our website as of the modified date, and may be subject to change without notice.\"
\"Station ID Disclaimer: Station IDs are an internal index numbering system and may be subject to change without notice.\"
\"Name\",\"Province\",\"Climate ID\",\"Station ID\",\"WMO ID\",\"TC ID\",\"Latitude (Decimal Degrees)\",\"Longitude (Decimal Degrees)\",\"Latitude\",\"Longitude\",\"Elevation (m)\",\"First Year\",\"Last Year\",\"HLY First Year\",\"HLY Last Year\",\"DLY First Year\",\"DLY Last Year\",\"MLY First Year\",\"MLY Last Year\"
\"TORONTO\",\"ONTARIO\",\"6158350\",\"5051\",\"\",\"\",\"43.67\",\"-79.4\",\"434000000\",\"-792400000\",\"112.5\",\"1840\",\"2017\",\"1953\",\"1969\",\"1840\",\"2017\",\"1840\",\"2006\"
\"TORONTO CITY\",\"ONTARIO\",\"6158355\",\"31688\",\"71508\",\"XTO\",\"43.67\",\"-79.4\",\"434000000\",\"-792400000\",\"112.5\",\"2002\",\"2024\",\"2002\",\"2024\",\"2002\",\"2024\",\"2003\",\"2006\"
\"MONTREAL/PIERRE ELLIOTT TRUDEAU INTL\",\"QUEBEC\",\"702S006\",\"51157\",\"71627\",\"YUL\",\"45.47\",\"-73.74\",\"452800000\",\"-734400000\",\"32.1\",\"2013\",\"2024\",\"2013\",\"2024\",\"2013\",\"2024\",\"\",\"\"
\"UNKNOWN SITE\",\"BRITISH COLUMBIA\",\"1100000\",\"999\",\"\",\"\",\"40\",\"-50\",\"\",\"\",\"\",\"1990\",\"1991\",\"\",\"\",\"1990\",\"1991\",\"1990\",\"1991\"
";

    #[test]
    fn test_parse_skips_preamble() {
        let inventory = Inventory::parse(SAMPLE_INVENTORY).unwrap();
        assert_eq!(inventory.len(), 4);

        let toronto = inventory.get(5051).unwrap();
        assert_eq!(toronto.name, "TORONTO");
        assert_eq!(toronto.province, Some(Province::Ontario));
        assert_eq!(toronto.climate_id.as_deref(), Some("6158350"));
        assert_eq!(toronto.wmo_id, None);
        assert_eq!(toronto.location.latitude, Some(43.67));
        assert_eq!(toronto.location.longitude, Some(-79.4));
        assert_eq!(
            *toronto.coverage(Frequency::Hourly),
            YearRange::new(Some(1953), Some(1969))
        );
        assert_eq!(toronto.inventory.overall, YearRange::new(Some(1840), Some(2017)));

        let montreal = inventory.get(51157).unwrap();
        assert_eq!(montreal.province, Some(Province::Quebec));
        assert_eq!(montreal.wmo_id, Some(71627));
        assert_eq!(*montreal.coverage(Frequency::Monthly), YearRange::default());
    }

    #[test]
    fn test_sentinel_coordinates_become_unknown() {
        let inventory = Inventory::parse(SAMPLE_INVENTORY).unwrap();
        let unknown = inventory.get(999).unwrap();
        assert_eq!(unknown.coordinates(), None);
        assert_eq!(unknown.location.elevation, None);
    }

    #[test]
    fn test_keeps_inventory_order() {
        let inventory = Inventory::parse(SAMPLE_INVENTORY).unwrap();
        let ids: Vec<u32> = inventory.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![5051, 31688, 51157, 999]);
    }

    #[test]
    fn test_missing_required_column() {
        let text = "\"Name\",\"Province\",\"Latitude (Decimal Degrees)\"\n\"TORONTO\",\"ONTARIO\",\"43.67\"\n";
        assert!(matches!(
            Inventory::parse(text),
            Err(CatalogError::MissingColumn(column)) if column == STATION_ID
        ));
    }

    #[test]
    fn test_empty_text() {
        assert!(matches!(Inventory::parse(""), Err(CatalogError::EmptyInventory)));
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(INVENTORY_FILE_NAME);
        let err = Inventory::load(&path).unwrap_err();
        assert!(matches!(err, CatalogError::InventoryNotFound(p) if p == path));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(INVENTORY_FILE_NAME);
        std::fs::write(&path, SAMPLE_INVENTORY).unwrap();
        assert_eq!(Inventory::load(&path).unwrap().len(), 4);
    }

    #[test]
    fn test_parse_number_accepts_float_notation() {
        assert_eq!(parse_number::<i32>("1953.0"), Some(1953));
        assert_eq!(parse_number::<i32>("1953.5"), None);
        assert_eq!(parse_number::<u32>("-1"), None);
        assert_eq!(parse_number::<f64>("-79.4"), Some(-79.4));
    }

    #[tokio::test]
    async fn test_download_writes_inventory() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/inventory.csv")
            .with_status(200)
            .with_body(SAMPLE_INVENTORY)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join(INVENTORY_FILE_NAME);
        let url = format!("{}/inventory.csv", server.url());
        let written = Inventory::download(&Client::new(), &url, &destination)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(written as usize, SAMPLE_INVENTORY.len());
        assert_eq!(Inventory::load(&destination).unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_download_http_error_keeps_previous_file() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/inventory.csv")
            .with_status(404)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join(INVENTORY_FILE_NAME);
        std::fs::write(&destination, SAMPLE_INVENTORY).unwrap();

        let url = format!("{}/inventory.csv", server.url());
        let err = Inventory::download(&Client::new(), &url, &destination)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CatalogError::HttpStatus { status, .. } if status == reqwest::StatusCode::NOT_FOUND
        ));
        assert_eq!(std::fs::read_to_string(&destination).unwrap(), SAMPLE_INVENTORY);
    }

    #[tokio::test]
    async fn test_download_interrupted_removes_partial_file() {
        use std::io::Write as _;

        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/inventory.csv")
            .with_status(200)
            .with_chunked_body(|w| {
                w.write_all(&SAMPLE_INVENTORY.as_bytes()[..200])?;
                Err(std::io::Error::other("connection dropped"))
            })
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join(INVENTORY_FILE_NAME);
        std::fs::write(&destination, SAMPLE_INVENTORY).unwrap();

        let url = format!("{}/inventory.csv", server.url());
        let err = Inventory::download(&Client::new(), &url, &destination)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CatalogError::DownloadIo { .. } | CatalogError::NetworkRequest(..)
        ));
        assert!(!destination.with_extension("csv.part").exists());
        assert_eq!(std::fs::read_to_string(&destination).unwrap(), SAMPLE_INVENTORY);
    }
}
