//! Inclusive ranges used in queries and downloads: years, months and distances.
//!
//! All of them are written on the command line as `a:b` (or a single value), and
//! the bounds may be given in either order.

use crate::types::error::ConfigError;
use log::warn;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Splits `a:b` (or a lone `a`) into two unsigned integers of 1 to `max_digits` digits.
/// With `min_digits == max_digits` the width is fixed, as for years.
fn parse_pair(s: &str, min_digits: usize, max_digits: usize, allow_single: bool) -> Option<(u32, u32)> {
    let parse_part = |part: &str| {
        let valid = (min_digits..=max_digits).contains(&part.len())
            && part.chars().all(|c| c.is_ascii_digit());
        if valid {
            part.parse::<u32>().ok()
        } else {
            None
        }
    };

    match s.trim().split_once(':') {
        Some((a, b)) => Some((parse_part(a)?, parse_part(b)?)),
        None if allow_single => {
            let value = parse_part(s.trim())?;
            Some((value, value))
        }
        None => None,
    }
}

/// An inclusive range of years, e.g. `1981:2010`.
///
/// # Examples
///
/// ```
/// use ec3::YearSpan;
///
/// let span: YearSpan = "2010:1981".parse().unwrap();
/// assert_eq!((span.start, span.end), (1981, 2010));
/// assert_eq!("1998".parse::<YearSpan>().unwrap().years().count(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearSpan {
    pub start: i32,
    pub end: i32,
}

impl YearSpan {
    /// Creates a span, ordering the bounds.
    pub fn new(a: i32, b: i32) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn single(year: i32) -> Self {
        Self::new(year, year)
    }

    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.start..=self.end
    }
}

impl FromStr for YearSpan {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = parse_pair(s, 4, 4, true)
            .ok_or_else(|| ConfigError::InvalidYearFormat(s.to_string()))?;
        Ok(YearSpan::new(a as i32, b as i32))
    }
}

/// An inclusive range of months within a year, e.g. `6:8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthSpan {
    pub start: u32,
    pub end: u32,
}

impl MonthSpan {
    /// Creates a span, ordering the bounds. Both months must be within 1 to 12.
    pub fn new(a: u32, b: u32) -> Result<Self, ConfigError> {
        for month in [a, b] {
            if !(1..=12).contains(&month) {
                return Err(ConfigError::MonthOutOfRange(month));
            }
        }
        Ok(Self {
            start: a.min(b),
            end: a.max(b),
        })
    }

    /// January through December.
    pub fn full_year() -> Self {
        Self { start: 1, end: 12 }
    }

    pub fn months(&self) -> impl Iterator<Item = u32> {
        self.start..=self.end
    }
}

impl FromStr for MonthSpan {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = parse_pair(s, 1, 2, true)
            .ok_or_else(|| ConfigError::InvalidMonthFormat(s.to_string()))?;
        MonthSpan::new(a, b)
    }
}

/// An inclusive distance interval in kilometers, `[min_km, max_km]`.
///
/// Defaults to `0:100`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceRange {
    pub min_km: f64,
    pub max_km: f64,
}

impl DistanceRange {
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            min_km: a.min(b),
            max_km: a.max(b),
        }
    }

    pub fn contains(&self, distance_km: f64) -> bool {
        self.min_km <= distance_km && distance_km <= self.max_km
    }

    /// Parses `min:max` (whole kilometers, up to four digits each).
    ///
    /// Unlike the other ranges, a malformed distance is not an error: it falls
    /// back to the default interval and logs a warning.
    ///
    /// # Examples
    ///
    /// ```
    /// use ec3::DistanceRange;
    ///
    /// assert_eq!(DistanceRange::parse_lenient("10:250"), DistanceRange::new(10.0, 250.0));
    /// assert_eq!(DistanceRange::parse_lenient("far"), DistanceRange::default());
    /// ```
    pub fn parse_lenient(s: &str) -> Self {
        match parse_pair(s, 1, 4, false) {
            Some((a, b)) => DistanceRange::new(a as f64, b as f64),
            None => {
                let fallback = DistanceRange::default();
                warn!(
                    "Invalid distance format '{}'. Using {}:{} km.",
                    s, fallback.min_km, fallback.max_km
                );
                fallback
            }
        }
    }
}

impl Default for DistanceRange {
    fn default() -> Self {
        Self {
            min_km: 0.0,
            max_km: 100.0,
        }
    }
}
