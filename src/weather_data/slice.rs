//! Planning of bulk downloads: which remote files make up a request.

use crate::types::data_source::Frequency;
use crate::types::error::ConfigError;
use crate::types::span::{MonthSpan, YearSpan};
use chrono::{Datelike, NaiveDate};
use log::warn;

/// Year requested for monthly data, which is published as one file per station.
const PLACEHOLDER_YEAR: i32 = 1989;
/// Month requested for daily and monthly data, which are not split by month.
const PLACEHOLDER_MONTH: u32 = 6;
/// Day of month sent with every request. The endpoint ignores it, but requires it.
const REQUEST_DAY: u32 = 14;

/// What to download: stations, frequency and (depending on the frequency) years and months.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalRequest {
    pub stations: Vec<u32>,
    pub frequency: Frequency,
    /// Required for hourly and daily data, ignored for monthly data.
    pub years: Option<YearSpan>,
    /// Only used for hourly data. Defaults to the whole year.
    pub months: Option<MonthSpan>,
}

impl RetrievalRequest {
    /// Expands the request into slices, ordered by station, then year, then month.
    ///
    /// Years given for monthly data and months given for daily or monthly data are
    /// ignored with a warning.
    ///
    /// # Examples
    ///
    /// ```
    /// use ec3::{Frequency, MonthSpan, RetrievalRequest, YearSpan};
    ///
    /// let request = RetrievalRequest {
    ///     stations: vec![5051],
    ///     frequency: Frequency::Hourly,
    ///     years: Some(YearSpan::new(1981, 1982)),
    ///     months: Some(MonthSpan::new(6, 7).unwrap()),
    /// };
    /// let files: Vec<String> = request
    ///     .plan_slices()
    ///     .unwrap()
    ///     .iter()
    ///     .map(|s| s.file_name())
    ///     .collect();
    /// assert_eq!(
    ///     files,
    ///     [
    ///         "5051-hourly-1981-06.csv",
    ///         "5051-hourly-1981-07.csv",
    ///         "5051-hourly-1982-06.csv",
    ///         "5051-hourly-1982-07.csv",
    ///     ]
    /// );
    /// ```
    pub fn plan_slices(&self) -> Result<Vec<RetrievalSlice>, ConfigError> {
        if self.stations.is_empty() {
            return Err(ConfigError::NoStations);
        }

        let years: Vec<i32> = if self.frequency.is_split_by_year() {
            self.years
                .ok_or(ConfigError::MissingYears(self.frequency))?
                .years()
                .collect()
        } else {
            if self.years.is_some() {
                warn!("Years are ignored for {} data, which is not split by year", self.frequency);
            }
            vec![PLACEHOLDER_YEAR]
        };

        let months: Vec<u32> = if self.frequency.is_split_by_month() {
            self.months.unwrap_or_else(MonthSpan::full_year).months().collect()
        } else {
            if self.months.is_some() {
                warn!("Months are ignored for {} data, which is not split by month", self.frequency);
            }
            vec![PLACEHOLDER_MONTH]
        };

        let mut slices = Vec::with_capacity(self.stations.len() * years.len() * months.len());
        for &station in &self.stations {
            for &year in &years {
                if NaiveDate::from_ymd_opt(year, 1, 1).is_none() {
                    return Err(ConfigError::YearOutOfRange(year));
                }
                for &month in &months {
                    let date = NaiveDate::from_ymd_opt(year, month, REQUEST_DAY)
                        .ok_or(ConfigError::MonthOutOfRange(month))?;
                    slices.push(RetrievalSlice {
                        station,
                        frequency: self.frequency,
                        date,
                    });
                }
            }
        }
        Ok(slices)
    }
}

/// One remote file: a station's data for one year and month (as far as the frequency
/// is split by them).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrievalSlice {
    pub station: u32,
    pub frequency: Frequency,
    pub date: NaiveDate,
}

impl RetrievalSlice {
    /// The bulk-export URL of this slice.
    pub fn url(&self, endpoint: &str) -> String {
        format!(
            "{}?format=csv&stationID={}&Year={}&Month={}&Day={}&timeframe={}&submit=Download+Data",
            endpoint,
            self.station,
            self.date.year(),
            self.date.month(),
            self.date.day(),
            self.frequency.timeframe()
        )
    }

    /// Local file name, e.g. `5051-hourly-1981-06.csv` or `5051-monthly.csv`.
    pub fn file_name(&self) -> String {
        let mut name = format!("{}-{}", self.station, self.frequency.path_segment());
        if self.frequency.is_split_by_year() {
            name.push_str(&format!("-{}", self.date.year()));
        }
        if self.frequency.is_split_by_month() {
            name.push_str(&format!("-{:02}", self.date.month()));
        }
        name.push_str(".csv");
        name
    }
}
