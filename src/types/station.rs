//! Defines the data structures representing ECCC climate stations as listed in the
//! station inventory: identifiers, location and per-frequency data coverage.

use crate::types::data_source::Frequency;
use crate::types::province::Province;
use serde::{Deserialize, Serialize};

/// Latitude the inventory uses as a placeholder for "unknown".
pub const SENTINEL_LATITUDE: f64 = 40.0;
/// Longitude the inventory uses as a placeholder for "unknown".
pub const SENTINEL_LONGITUDE: f64 = -50.0;

/// Represents a geographical coordinate using signed decimal degrees.
///
/// Latitude is the first element, longitude the second. Longitudes west of
/// Greenwich are negative.
///
/// # Examples
///
/// ```
/// use ec3::LatLon;
///
/// // Users usually give Canadian longitudes as a distance west.
/// let toronto = LatLon::from_west_longitude(43.67, 79.4);
/// assert_eq!(toronto, LatLon(43.67, -79.4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    /// Builds a coordinate from a northern latitude and a longitude given as degrees West.
    pub fn from_west_longitude(latitude: f64, longitude_west: f64) -> Self {
        LatLon(latitude, -longitude_west)
    }

    pub fn latitude(&self) -> f64 {
        self.0
    }

    pub fn longitude(&self) -> f64 {
        self.1
    }
}

/// A single station from the ECCC station inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// The ECCC station identifier used by the bulk-export endpoint (e.g. `5051`).
    pub id: u32,
    /// Station name, e.g. `"TORONTO"`.
    pub name: String,
    /// Province or territory, if the inventory value was recognised.
    pub province: Option<Province>,
    /// The climate identifier, e.g. `"6158350"`.
    pub climate_id: Option<String>,
    /// World Meteorological Organization identifier, if any.
    pub wmo_id: Option<u32>,
    /// Transport Canada identifier, if any.
    pub tc_id: Option<String>,
    pub location: Location,
    pub inventory: DataInventory,
}

impl Station {
    /// The station's coordinates, if both latitude and longitude are known.
    pub fn coordinates(&self) -> Option<LatLon> {
        match (self.location.latitude, self.location.longitude) {
            (Some(lat), Some(lon)) => Some(LatLon(lat, lon)),
            _ => None,
        }
    }

    /// The reported years of data for the given frequency.
    pub fn coverage(&self, frequency: Frequency) -> &YearRange {
        match frequency {
            Frequency::Hourly => &self.inventory.hourly,
            Frequency::Daily => &self.inventory.daily,
            Frequency::Monthly => &self.inventory.monthly,
        }
    }
}

/// Represents the location of a station.
///
/// Placeholder coordinates from the inventory are stored as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in decimal degrees (positive for North).
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees (negative for West).
    pub longitude: Option<f64>,
    /// Elevation above sea level in meters, if available.
    pub elevation: Option<f64>,
}

impl Location {
    /// Creates a location from raw inventory values, replacing the sentinel
    /// coordinates with `None`.
    pub fn from_inventory(
        latitude: Option<f64>,
        longitude: Option<f64>,
        elevation: Option<f64>,
    ) -> Self {
        Self {
            latitude: latitude.filter(|lat| *lat != SENTINEL_LATITUDE),
            longitude: longitude.filter(|lon| *lon != SENTINEL_LONGITUDE),
            elevation,
        }
    }
}

/// Stores the years with data for each frequency, as reported by the inventory.
///
/// Gaps may exist inside a range; the inventory only records the first and last year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataInventory {
    /// First and last year with data of any kind.
    pub overall: YearRange,
    pub hourly: YearRange,
    pub daily: YearRange,
    pub monthly: YearRange,
}

/// Represents a year range with optional start and end years.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    /// The first year with data, if known.
    pub start: Option<i32>,
    /// The last year with data, if known.
    pub end: Option<i32>,
}

impl YearRange {
    pub fn new(start: Option<i32>, end: Option<i32>) -> Self {
        Self { start, end }
    }
}
