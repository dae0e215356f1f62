//! Types describing a station catalog query and its outcome.

use crate::types::data_source::Frequency;
use crate::types::error::ConfigError;
use crate::types::province::Province;
use crate::types::span::{DistanceRange, YearSpan};
use crate::types::station::{LatLon, Station};
use bon::Builder;
use polars::prelude::*;
use std::fmt;

/// The point distances are measured from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    /// Use the coordinates of this station from the inventory.
    Station(u32),
    /// Use explicit signed coordinates.
    Coordinates(LatLon),
}

impl Target {
    /// Parses a target the way it is written on the command line: either a station
    /// ID alone, or a latitude (N) followed by a longitude given as degrees West.
    ///
    /// # Examples
    ///
    /// ```
    /// use ec3::{LatLon, Target};
    ///
    /// assert_eq!(Target::parse("5051", None).unwrap(), Target::Station(5051));
    /// assert_eq!(
    ///     Target::parse("43.67", Some("79.4")).unwrap(),
    ///     Target::Coordinates(LatLon(43.67, -79.4))
    /// );
    /// ```
    pub fn parse(first: &str, longitude_west: Option<&str>) -> Result<Self, ConfigError> {
        match longitude_west {
            None => first
                .trim()
                .parse::<u32>()
                .map(Target::Station)
                .map_err(|_| ConfigError::InvalidTarget(first.to_string())),
            Some(lon) => {
                let invalid = || ConfigError::InvalidTarget(format!("{} {}", first, lon));
                let latitude = first.trim().parse::<f64>().map_err(|_| invalid())?;
                let longitude = lon.trim().parse::<f64>().map_err(|_| invalid())?;
                Ok(Target::Coordinates(LatLon::from_west_longitude(
                    latitude, longitude,
                )))
            }
        }
    }
}

/// A requested coverage period for one data frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverageRequest {
    pub period: YearSpan,
    pub frequency: Frequency,
}

impl CoverageRequest {
    pub fn new(period: YearSpan, frequency: Frequency) -> Self {
        Self { period, frequency }
    }
}

/// A structured query against the station inventory. Every filter is optional;
/// an empty query returns the whole inventory.
///
/// # Examples
///
/// ```
/// use ec3::{CoverageRequest, Frequency, Province, StationQuery, YearSpan};
///
/// let query = StationQuery::builder()
///     .name("toronto".to_string())
///     .provinces(vec![Province::Ontario])
///     .coverage(CoverageRequest::new(YearSpan::new(1981, 2010), Frequency::Daily))
///     .detect_recodes(true)
///     .build();
/// assert!(query.target.is_none());
/// ```
#[derive(Debug, Clone, Default, Builder)]
pub struct StationQuery {
    /// Case-insensitive regular expression matched at the start of the station name.
    pub name: Option<String>,
    /// Keep only stations in one of these provinces. Empty means no filter.
    #[builder(default)]
    pub provinces: Vec<Province>,
    /// Keep only stations whose inventory spans this period.
    pub coverage: Option<CoverageRequest>,
    /// Measure distances from this point and sort by them.
    pub target: Option<Target>,
    /// Distance interval applied when a target is given.
    #[builder(default)]
    pub distance: DistanceRange,
    /// Suggest groups of co-located stations that may together cover the period.
    #[builder(default)]
    pub detect_recodes: bool,
}

/// A station under consideration while a query runs.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// Row of the station in the inventory.
    pub position: usize,
    pub station: &'a Station,
    /// Distance to the query target, once computed.
    pub distance_km: Option<f64>,
}

impl<'a> Candidate<'a> {
    pub fn new(position: usize, station: &'a Station) -> Self {
        Self {
            position,
            station,
            distance_km: None,
        }
    }
}

/// A station returned by a query.
#[derive(Debug, Clone, PartialEq)]
pub struct StationMatch {
    pub station: Station,
    /// Distance to the query target in kilometers, when a target was given.
    pub distance_km: Option<f64>,
}

impl From<Candidate<'_>> for StationMatch {
    fn from(candidate: Candidate<'_>) -> Self {
        Self {
            station: candidate.station.to_owned(),
            distance_km: candidate.distance_km,
        }
    }
}

/// The filter stage of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStage {
    /// The inventory itself has no stations.
    Inventory,
    Name,
    Province,
    Distance,
    Coverage,
}

impl fmt::Display for FilterStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            FilterStage::Inventory => "inventory",
            FilterStage::Name => "name",
            FilterStage::Province => "province",
            FilterStage::Distance => "distance",
            FilterStage::Coverage => "coverage",
        };
        write!(f, "{}", stage)
    }
}

/// What a query produced.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// Matching stations, sorted by distance if a target was given.
    Rows(Vec<StationMatch>),
    /// No station survived the given stage; later stages did not run.
    Empty { stage: FilterStage },
}

/// A group of stations at identical coordinates that, taken together, may cover a
/// requested period: likely one site whose station ID was changed.
#[derive(Debug, Clone, PartialEq)]
pub struct RecodeSuggestion {
    /// 1-based counter in the order groups were found.
    pub group: usize,
    pub location: LatLon,
    /// Members, in inventory order.
    pub stations: Vec<Station>,
}

/// The result of a station catalog query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub outcome: QueryOutcome,
    /// Recode suggestions, only populated when requested together with a coverage filter.
    /// These may be present even when the outcome is empty.
    pub recode_suggestions: Vec<RecodeSuggestion>,
    /// Data frequency of the coverage filter, if one was applied. Limits the year
    /// columns of [`QueryResult::to_dataframe`] to that frequency.
    pub coverage_frequency: Option<Frequency>,
}

const DISTANCE_COLUMN: &str = "Dist";

impl QueryResult {
    pub(crate) fn empty(stage: FilterStage, recode_suggestions: Vec<RecodeSuggestion>) -> Self {
        Self {
            outcome: QueryOutcome::Empty { stage },
            recode_suggestions,
            coverage_frequency: None,
        }
    }

    pub(crate) fn rows(rows: Vec<StationMatch>, recode_suggestions: Vec<RecodeSuggestion>) -> Self {
        Self {
            outcome: QueryOutcome::Rows(rows),
            recode_suggestions,
            coverage_frequency: None,
        }
    }

    pub(crate) fn with_coverage_frequency(mut self, frequency: Option<Frequency>) -> Self {
        self.coverage_frequency = frequency;
        self
    }

    /// The matching stations, or an empty slice for an empty outcome.
    pub fn stations(&self) -> &[StationMatch] {
        match &self.outcome {
            QueryOutcome::Rows(rows) => rows,
            QueryOutcome::Empty { .. } => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.outcome, QueryOutcome::Empty { .. })
    }

    /// Converts the matching stations into a table using the inventory's column
    /// names. A `Dist` column is added when distances were computed. After a coverage
    /// filter only the year columns of the filtered frequency are kept, next to the
    /// overall first and last year.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let rows = self.stations();
        let stations: Vec<&Station> = rows.iter().map(|m| &m.station).collect();

        let mut columns: Vec<Column> = vec![
            Series::new("Name".into(), stations.iter().map(|s| s.name.as_str()).collect::<Vec<_>>()).into(),
            Series::new(
                "Province".into(),
                stations
                    .iter()
                    .map(|s| s.province.map(|p| p.inventory_name()))
                    .collect::<Vec<_>>(),
            )
            .into(),
            Series::new(
                "Climate ID".into(),
                stations.iter().map(|s| s.climate_id.as_deref()).collect::<Vec<_>>(),
            )
            .into(),
            Series::new("Station ID".into(), stations.iter().map(|s| s.id).collect::<Vec<_>>()).into(),
            Series::new(
                "WMO ID".into(),
                stations.iter().map(|s| s.wmo_id).collect::<Vec<_>>(),
            )
            .into(),
            Series::new(
                "TC ID".into(),
                stations.iter().map(|s| s.tc_id.as_deref()).collect::<Vec<_>>(),
            )
            .into(),
            Series::new(
                "Latitude (Decimal Degrees)".into(),
                stations.iter().map(|s| s.location.latitude).collect::<Vec<_>>(),
            )
            .into(),
            Series::new(
                "Longitude (Decimal Degrees)".into(),
                stations.iter().map(|s| s.location.longitude).collect::<Vec<_>>(),
            )
            .into(),
            Series::new(
                "Elevation (m)".into(),
                stations.iter().map(|s| s.location.elevation).collect::<Vec<_>>(),
            )
            .into(),
        ];

        let ranges = [
            ("First Year", "Last Year", None),
            ("HLY First Year", "HLY Last Year", Some(Frequency::Hourly)),
            ("DLY First Year", "DLY Last Year", Some(Frequency::Daily)),
            ("MLY First Year", "MLY Last Year", Some(Frequency::Monthly)),
        ];
        for (first_name, last_name, frequency) in ranges {
            if matches!((self.coverage_frequency, frequency), (Some(wanted), Some(f)) if wanted != f) {
                continue;
            }
            let range_of = |s: &Station| match frequency {
                Some(f) => *s.coverage(f),
                None => s.inventory.overall,
            };
            columns.push(
                Series::new(
                    first_name.into(),
                    stations.iter().map(|s| range_of(s).start).collect::<Vec<_>>(),
                )
                .into(),
            );
            columns.push(
                Series::new(
                    last_name.into(),
                    stations.iter().map(|s| range_of(s).end).collect::<Vec<_>>(),
                )
                .into(),
            );
        }

        if rows.iter().any(|m| m.distance_km.is_some()) {
            columns.push(
                Series::new(
                    DISTANCE_COLUMN.into(),
                    rows.iter().map(|m| m.distance_km).collect::<Vec<_>>(),
                )
                .into(),
            );
        }

        DataFrame::new(columns)
    }
}
