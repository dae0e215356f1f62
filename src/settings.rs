//! Endpoints and politeness settings for talking to ECCC.

use bon::Builder;
use std::time::Duration;

/// Bulk-export endpoint serving per-station CSV files.
pub const BULK_DATA_URL: &str = "https://climate.weather.gc.ca/climate_data/bulk_data_e.html";

/// HTTPS mirror of the station inventory on the ECCC file-transfer site.
pub const INVENTORY_URL: &str = "https://collaboration.cmc.ec.gc.ca/cmc/climate/Get_More_Data_Plus_de_donnees/Station%20Inventory%20EN.csv";

/// Pause between two consecutive bulk-export requests.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(500);

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Settings for an [`Ec3`](crate::Ec3) client.
///
/// # Examples
///
/// ```
/// use ec3::Settings;
/// use std::time::Duration;
///
/// let settings = Settings::builder()
///     .request_delay(Duration::from_secs(1))
///     .build();
/// assert_eq!(settings.bulk_endpoint, ec3::BULK_DATA_URL);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct Settings {
    #[builder(into, default = BULK_DATA_URL.to_string())]
    pub bulk_endpoint: String,
    #[builder(into, default = INVENTORY_URL.to_string())]
    pub inventory_url: String,
    #[builder(default = DEFAULT_REQUEST_DELAY)]
    pub request_delay: Duration,
    #[builder(into, default = USER_AGENT.to_string())]
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self::builder().build()
    }
}
