use crate::types::data_source::Frequency;
use thiserror::Error;

/// Invalid user input: selectors, codes and ranges that could not be understood.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid data type '{0}'. Use 1/hourly, 2/daily or 3/monthly")]
    InvalidFrequency(String),

    #[error("Incorrect province code '{0}'")]
    InvalidProvince(String),

    #[error("Invalid year format '{0}'. Expected YYYY or YYYY:YYYY")]
    InvalidYearFormat(String),

    #[error("Invalid month format '{0}'. Expected M or M:M")]
    InvalidMonthFormat(String),

    #[error("Months must be from 1 to 12, got {0}")]
    MonthOutOfRange(u32),

    #[error("Year {0} is out of range")]
    YearOutOfRange(i32),

    #[error("Invalid name pattern '{pattern}'")]
    InvalidNamePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid target '{0}'. Expected a station ID or a latitude (N) and longitude (W)")]
    InvalidTarget(String),

    #[error("Years must be specified for {0} data")]
    MissingYears(Frequency),

    #[error("At least one station must be given")]
    NoStations,
}
