//! The main entry point: a client that owns the station inventory and talks to the
//! ECCC bulk-export service.

use crate::error::Ec3Error;
use crate::settings::Settings;
use crate::stations::catalog_query::run_query;
use crate::stations::inventory::{Inventory, INVENTORY_FILE_NAME};
use crate::types::data_source::Frequency;
use crate::types::province::Province;
use crate::types::query::{CoverageRequest, QueryResult, StationQuery, Target};
use crate::types::span::{DistanceRange, MonthSpan, YearSpan};
use crate::utils::{ensure_cache_dir_exists, get_cache_dir};
use crate::weather_data::pipeline::BulkRetrieval;
use crate::weather_data::slice::RetrievalRequest;
use bon::bon;
use log::{info, warn};
use polars::prelude::DataFrame;
use reqwest::Client;
use std::path::PathBuf;

/// Client for finding ECCC climate stations and downloading their data.
///
/// The station inventory is loaded once when the client is created and is not
/// modified afterwards, except by an explicit [`Ec3::update_inventory`].
///
/// # Examples
///
/// ```no_run
/// # use ec3::{Ec3, Ec3Error, Frequency, Province, YearSpan};
/// # #[tokio::main]
/// # async fn main() -> Result<(), Ec3Error> {
/// let ec3 = Ec3::new().await?;
///
/// let found = ec3
///     .find_stations()
///     .name("toronto")
///     .provinces(vec![Province::Ontario])
///     .period(YearSpan::new(1981, 2010))
///     .frequency(Frequency::Daily)
///     .call()?;
/// println!("{}", found.to_dataframe()?);
///
/// let data = ec3
///     .get_data()
///     .stations(vec![5051])
///     .frequency(Frequency::Daily)
///     .years(YearSpan::new(1981, 1982))
///     .call()
///     .await?;
/// println!("{}", data.head(Some(5)));
/// # Ok(())
/// # }
/// ```
pub struct Ec3 {
    cache_folder: PathBuf,
    settings: Settings,
    client: Client,
    inventory: Inventory,
}

#[bon]
impl Ec3 {
    /// Creates a client using the default cache directory (e.g. `~/.cache/ec3_rs_cache`
    /// on Linux). The station inventory is downloaded if it is not cached yet.
    pub async fn new() -> Result<Self, Ec3Error> {
        let cache_folder = get_cache_dir().map_err(Ec3Error::CacheDirResolution)?;
        Self::with_cache_folder(cache_folder).await
    }

    /// Creates a client that keeps the station inventory in `cache_folder`.
    pub async fn with_cache_folder(cache_folder: PathBuf) -> Result<Self, Ec3Error> {
        Self::with_settings(cache_folder, Settings::default()).await
    }

    /// Creates a client with custom endpoints and request delay.
    ///
    /// # Errors
    ///
    /// Returns [`Ec3Error::CacheDirCreation`] if the folder cannot be created, and
    /// [`Ec3Error::Catalog`] if the inventory cannot be downloaded or parsed.
    pub async fn with_settings(cache_folder: PathBuf, settings: Settings) -> Result<Self, Ec3Error> {
        ensure_cache_dir_exists(&cache_folder)
            .await
            .map_err(|e| Ec3Error::CacheDirCreation(cache_folder.clone(), e))?;
        let client = build_client(&settings)?;

        let inventory_path = cache_folder.join(INVENTORY_FILE_NAME);
        if tokio::fs::metadata(&inventory_path).await.is_err() {
            info!(
                "Station inventory not found at {}. Downloading.",
                inventory_path.display()
            );
            Inventory::download(&client, &settings.inventory_url, &inventory_path).await?;
        }
        let inventory = load_inventory(inventory_path).await?;

        Ok(Self {
            cache_folder,
            settings,
            client,
            inventory,
        })
    }

    /// Creates a client around an inventory that is already loaded. Nothing is
    /// downloaded or read from disk.
    pub fn from_inventory(
        cache_folder: PathBuf,
        inventory: Inventory,
        settings: Settings,
    ) -> Result<Self, Ec3Error> {
        Ok(Self {
            client: build_client(&settings)?,
            cache_folder,
            settings,
            inventory,
        })
    }

    /// Downloads the latest station inventory and replaces the loaded one.
    /// Returns the number of stations.
    pub async fn update_inventory(&mut self) -> Result<usize, Ec3Error> {
        ensure_cache_dir_exists(&self.cache_folder)
            .await
            .map_err(|e| Ec3Error::CacheDirCreation(self.cache_folder.clone(), e))?;
        let path = self.inventory_path();
        Inventory::download(&self.client, &self.settings.inventory_url, &path).await?;
        self.inventory = load_inventory(path).await?;
        Ok(self.inventory.len())
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Where the station inventory is cached.
    pub fn inventory_path(&self) -> PathBuf {
        self.cache_folder.join(INVENTORY_FILE_NAME)
    }

    /// Searches the station inventory.
    ///
    /// Every argument is optional; without any the whole inventory is returned.
    ///
    /// * `.name(&str)`: case-insensitive regular expression matched at the start of the name.
    /// * `.provinces(Vec<Province>)`: keep stations in any of these provinces.
    /// * `.period(YearSpan)` with `.frequency(Frequency)`: keep stations whose data of that
    ///   frequency spans the whole period. A period without a frequency is ignored.
    /// * `.target(Target)`: measure distances from a station or coordinates and sort by them.
    /// * `.distance(DistanceRange)`: distance interval for the target, `0:100` km by default.
    /// * `.detect_recodes(bool)`: also suggest co-located stations that together cover the period.
    ///
    /// An empty result is reported through [`QueryResult::outcome`], not as an error.
    #[builder]
    pub fn find_stations(
        &self,
        name: Option<&str>,
        provinces: Option<Vec<Province>>,
        period: Option<YearSpan>,
        frequency: Option<Frequency>,
        target: Option<Target>,
        distance: Option<DistanceRange>,
        detect_recodes: Option<bool>,
    ) -> Result<QueryResult, Ec3Error> {
        let coverage = match (period, frequency) {
            (Some(period), Some(frequency)) => Some(CoverageRequest::new(period, frequency)),
            (Some(_), None) => {
                warn!("No data type passed. Ignoring data filter.");
                None
            }
            (None, _) => None,
        };
        let query = StationQuery {
            name: name.map(str::to_string),
            provinces: provinces.unwrap_or_default(),
            coverage,
            target,
            distance: distance.unwrap_or_default(),
            detect_recodes: detect_recodes.unwrap_or(false),
        };
        Ok(run_query(&self.inventory, &query)?)
    }

    /// Downloads data for one or more stations and stacks it into one table, with the
    /// station ID as first column.
    ///
    /// * `.stations(Vec<u32>)`: **Required.** Station IDs as used by the bulk-export endpoint.
    /// * `.frequency(Frequency)`: defaults to daily.
    /// * `.years(YearSpan)`: required for hourly and daily data, ignored for monthly data.
    /// * `.months(MonthSpan)`: hourly data only, defaults to the whole year.
    ///
    /// Files are fetched one by one with [`Settings::request_delay`] in between. The
    /// first failed download aborts the call.
    #[builder]
    pub async fn get_data(
        &self,
        stations: Vec<u32>,
        frequency: Option<Frequency>,
        years: Option<YearSpan>,
        months: Option<MonthSpan>,
    ) -> Result<DataFrame, Ec3Error> {
        let request = RetrievalRequest {
            stations,
            frequency: frequency.unwrap_or(Frequency::Daily),
            years,
            months,
        };
        let slices = request.plan_slices()?;
        let mut retrieval = BulkRetrieval::new(
            self.client.clone(),
            self.settings.bulk_endpoint.as_str(),
            self.settings.request_delay,
        );
        Ok(retrieval.retrieve(&slices).await?)
    }
}

fn build_client(settings: &Settings) -> Result<Client, Ec3Error> {
    Client::builder()
        .user_agent(settings.user_agent.as_str())
        .build()
        .map_err(Ec3Error::HttpClient)
}

async fn load_inventory(path: PathBuf) -> Result<Inventory, Ec3Error> {
    let inventory = tokio::task::spawn_blocking(move || Inventory::load(&path)).await??;
    Ok(inventory)
}
