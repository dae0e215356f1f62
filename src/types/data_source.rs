//! Defines the data frequencies served by the ECCC bulk-export endpoint, and how
//! users select them.

use crate::types::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The granularity of ECCC climate data.
///
/// Each frequency maps to a `timeframe` code on the bulk-export endpoint and to a
/// pair of first/last-year columns in the station inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    /// Hourly observations, published as one file per station, year and month.
    Hourly,
    /// Daily summaries, published as one file per station and year.
    Daily,
    /// Monthly summaries, published as a single file per station.
    Monthly,
}

impl Frequency {
    /// The `timeframe` query parameter used by the bulk-export endpoint.
    pub fn timeframe(&self) -> u8 {
        match self {
            Frequency::Hourly => 1,
            Frequency::Daily => 2,
            Frequency::Monthly => 3,
        }
    }

    pub(crate) fn path_segment(&self) -> &'static str {
        match self {
            Frequency::Hourly => "hourly",
            Frequency::Daily => "daily",
            Frequency::Monthly => "monthly",
        }
    }

    /// Inventory columns holding the first and last year of data for this frequency.
    pub(crate) fn inventory_columns(&self) -> (&'static str, &'static str) {
        match self {
            Frequency::Hourly => ("HLY First Year", "HLY Last Year"),
            Frequency::Daily => ("DLY First Year", "DLY Last Year"),
            Frequency::Monthly => ("MLY First Year", "MLY Last Year"),
        }
    }

    /// Whether remote files are split per year. Monthly data is not.
    pub fn is_split_by_year(&self) -> bool {
        !matches!(self, Frequency::Monthly)
    }

    /// Whether remote files are split per month. Only hourly data is.
    pub fn is_split_by_month(&self) -> bool {
        matches!(self, Frequency::Hourly)
    }
}

/// Formats a `Frequency` using its lowercase name.
///
/// # Examples
///
/// ```
/// use ec3::Frequency;
///
/// assert_eq!(Frequency::Hourly.to_string(), "hourly");
/// ```
impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}

/// Parses a data type selector.
///
/// Accepts the numeric codes `1`, `2`, `3` or anything starting with `h`, `d` or `m`
/// (case-insensitive), so `"daily"`, `"D"` and `"2"` all mean [`Frequency::Daily`].
///
/// # Examples
///
/// ```
/// use ec3::Frequency;
///
/// assert_eq!("H".parse::<Frequency>().unwrap(), Frequency::Hourly);
/// assert_eq!("monthly".parse::<Frequency>().unwrap(), Frequency::Monthly);
/// assert!("x".parse::<Frequency>().is_err());
/// ```
impl FromStr for Frequency {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().chars().next() {
            Some('1' | 'h' | 'H') => Ok(Frequency::Hourly),
            Some('2' | 'd' | 'D') => Ok(Frequency::Daily),
            Some('3' | 'm' | 'M') => Ok(Frequency::Monthly),
            _ => Err(ConfigError::InvalidFrequency(s.to_string())),
        }
    }
}

impl TryFrom<u8> for Frequency {
    type Error = ConfigError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Frequency::Hourly),
            2 => Ok(Frequency::Daily),
            3 => Ok(Frequency::Monthly),
            other => Err(ConfigError::InvalidFrequency(other.to_string())),
        }
    }
}
