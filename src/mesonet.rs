//! The main entry point: a client that retrieves Oklahoma Mesonet station data and derives
//! soil moisture from the heat-dissipation sensors.

use crate::config::{Endpoints, DEFAULT_REQUEST_INTERVAL};
use crate::error::MesonetError;
use crate::feed::data_loader::MesonetDataLoader;
use crate::feed::fetcher::SummaryFetcher;
use crate::feed::MesonetFeed;
use crate::soil::assembler::SoilMoistureAssembler;
use crate::soil::error::HydraulicParamsError;
use crate::soil::hydraulic_params::{HydraulicLookup, HydraulicParameterStore};
use crate::soil::records::records_to_frame;
use crate::stations::directory::StationDirectory;
use crate::summary::daily::DailySummaryComposer;
use crate::summary::monthly::MonthlySummaryDriver;
use crate::types::variables::Variables;
use crate::utils::default_hydraulic_params_path;
use bon::bon;
use chrono::NaiveDateTime;
use log::info;
use polars::prelude::DataFrame;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task;

/// The client for retrieving Mesonet data.
///
/// It owns the HTTP loader, the hydraulic parameter dataset (loaded once when the client
/// is created) and the spacing between the daily requests of a monthly summary. Every
/// retrieval downloads fresh data; nothing is cached between calls.
///
/// # Examples
///
/// ```no_run
/// # use mesonet_soil::{Mesonet, MesonetError};
/// # async fn run() -> Result<(), MesonetError> {
/// // Loads the hydraulic parameters from the default location.
/// let client = Mesonet::new().await?;
/// # Ok(())
/// # }
/// ```
pub struct Mesonet {
    loader: MesonetDataLoader,
    hydraulic_params: HydraulicParameterStore,
    request_interval: Duration,
}

#[bon]
impl Mesonet {
    /// Creates a client with hydraulic parameters read from
    /// [`default_hydraulic_params_path`](crate::default_hydraulic_params_path).
    ///
    /// # Errors
    ///
    /// Returns [`MesonetError::HydraulicParams`] if the location cannot be determined or the
    /// dataset cannot be loaded.
    pub async fn new() -> Result<Self, MesonetError> {
        let path = default_hydraulic_params_path().ok_or(HydraulicParamsError::PathResolution)?;
        Self::with_hydraulic_params_file(path).await
    }

    /// Creates a client with hydraulic parameters read from the CSV file at `path`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use mesonet_soil::{Mesonet, MesonetError};
    /// # async fn run() -> Result<(), MesonetError> {
    /// let client = Mesonet::with_hydraulic_params_file("data/MesoSoilv2_1.csv".into()).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn with_hydraulic_params_file(path: PathBuf) -> Result<Self, MesonetError> {
        info!("Loading hydraulic parameters from {}", path.display());
        let store = task::spawn_blocking(move || HydraulicParameterStore::from_csv_path(path))
            .await
            .map_err(HydraulicParamsError::from)??;
        Ok(Self::with_hydraulic_params(store))
    }

    /// Creates a client around an already loaded hydraulic parameter store.
    pub fn with_hydraulic_params(hydraulic_params: HydraulicParameterStore) -> Self {
        Self {
            loader: MesonetDataLoader::default(),
            hydraulic_params,
            request_interval: DEFAULT_REQUEST_INTERVAL,
        }
    }

    /// Replaces the remote endpoints, e.g. to point at a mirror.
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.loader = MesonetDataLoader::new(endpoints);
        self
    }

    /// Sets the minimum time between the daily requests of [`Mesonet::monthly_summary`].
    pub fn with_request_interval(mut self, request_interval: Duration) -> Self {
        self.request_interval = request_interval;
        self
    }

    pub fn hydraulic_params_store(&self) -> &HydraulicParameterStore {
        &self.hydraulic_params
    }

    /// Retrieves the station metadata table: identity, location, soil texture per depth and
    /// commissioning dates.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.station(&str)`: Optional. 4 letter station identifier. All stations when omitted.
    /// * `.default_columns_only(bool)`: Optional. Keep only
    ///   [`DEFAULT_STATION_COLUMNS`](crate::DEFAULT_STATION_COLUMNS). Defaults to `true`.
    ///
    /// # Errors
    ///
    /// [`MesonetError::StationNotFound`] for an unknown station, [`MesonetError::Feed`] if the
    /// metadata export cannot be retrieved.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use mesonet_soil::{Mesonet, MesonetError};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), MesonetError> {
    /// let client = Mesonet::new().await?;
    /// let acme = client.station_info().station("ACME").call().await?;
    /// println!("{acme}");
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn station_info(
        &self,
        station: Option<&str>,
        default_columns_only: Option<bool>,
    ) -> Result<DataFrame, MesonetError> {
        let directory = StationDirectory::from_frame(self.loader.station_frame().await?)?;
        directory.station_info(station, default_columns_only.unwrap_or(true))
    }

    /// Looks up hydraulic parameters by station and/or depth (5, 25 or 60 cm).
    ///
    /// A depth that does not exist for the selection is ignored; the result then is
    /// [`HydraulicLookup::DepthFallback`] holding every depth.
    ///
    /// # Errors
    ///
    /// [`MesonetError::UnknownHydraulicSite`] for a station without parameters.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use mesonet_soil::{Mesonet, MesonetError};
    /// # async fn run() -> Result<(), MesonetError> {
    /// let client = Mesonet::new().await?;
    /// let lookup = client.hydraulic_params().station("NRMN").depth(25).call()?;
    /// println!("{}", lookup.to_frame()?);
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub fn hydraulic_params(
        &self,
        station: Option<&str>,
        depth: Option<i64>,
    ) -> Result<HydraulicLookup, MesonetError> {
        self.hydraulic_params.lookup(station, depth)
    }

    /// Derives soil moisture at 5, 25 and 60 cm from the 00:00 delta-T readings of `date`.
    ///
    /// Returns one row per station with `Site` and the `FC`, `WP`, `WHC`, `VWC`, `FAW`, `MP`
    /// and `Ks` columns per depth. Stations without hydraulic parameters are left out.
    ///
    /// # Arguments
    ///
    /// * `.date(NaiveDateTime)`: Optional. Defaults to yesterday.
    /// * `.station(&str)`: Optional. Restricts the result to one station.
    #[builder]
    pub async fn soil_moisture(
        &self,
        date: Option<NaiveDateTime>,
        station: Option<&str>,
    ) -> Result<DataFrame, MesonetError> {
        let records = SoilMoistureAssembler::new(&self.hydraulic_params)
            .assemble(&self.loader, date, station)
            .await?;
        Ok(records_to_frame(&records)?)
    }

    /// Daily air temperature, humidity, rainfall, solar radiation and wind speed.
    ///
    /// A given station is verified against the station metadata export first.
    #[builder]
    pub async fn weather(
        &self,
        date: Option<NaiveDateTime>,
        station: Option<&str>,
    ) -> Result<DataFrame, MesonetError> {
        SummaryFetcher::new(&self.loader).weather(date, station).await
    }

    /// Daily soil temperature extremes under bare soil and native sod.
    #[builder]
    pub async fn soil_temperature(
        &self,
        date: Option<NaiveDateTime>,
        station: Option<&str>,
    ) -> Result<DataFrame, MesonetError> {
        SummaryFetcher::new(&self.loader)
            .soil_temperature(date, station)
            .await
    }

    /// Retrieves the daily summary for one date.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.station(&str)`: Optional. 4 letter station identifier. All stations when omitted.
    /// * `.date(NaiveDateTime)`: Optional. Defaults to yesterday.
    /// * `.variables(Variables)`: Optional. Defaults to [`Variables::All`].
    ///
    /// # Returns
    ///
    /// A table with one row per station, `Site` and `Date` as the first two columns.
    ///
    /// # Errors
    ///
    /// Invalid dates and station codes are rejected before any download. A station without a
    /// row in the result gives [`MesonetError::StationNotFound`]. Download and parse failures
    /// give [`MesonetError::Feed`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use mesonet_soil::{generate_date, Mesonet, MesonetError, Variables};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), MesonetError> {
    /// let client = Mesonet::new().await?;
    /// let summary = client
    ///     .daily_summary()
    ///     .station("NRMN")
    ///     .date(generate_date(2024, 6, Some(1), None, None)?)
    ///     .variables(Variables::SoilMoisture)
    ///     .call()
    ///     .await?;
    /// println!("{summary}");
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn daily_summary(
        &self,
        station: Option<&str>,
        date: Option<NaiveDateTime>,
        variables: Option<Variables>,
    ) -> Result<DataFrame, MesonetError> {
        DailySummaryComposer::new(&self.loader, &self.hydraulic_params)
            .compose(date, station, variables.unwrap_or_default())
            .await
    }

    /// Retrieves the daily summaries of a month up to yesterday, one day per request
    /// interval, stacked into a single table.
    ///
    /// # Arguments
    ///
    /// * `.station(&str)`: Optional. 4 letter station identifier.
    /// * `.month(u32)` / `.year(i32)`: Optional. Default to the current month.
    /// * `.variables(Variables)`: Optional. Defaults to [`Variables::All`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use mesonet_soil::{Mesonet, MesonetError, Variables};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), MesonetError> {
    /// let client = Mesonet::new().await?;
    /// let june = client
    ///     .monthly_summary()
    ///     .station("ACME")
    ///     .month(6)
    ///     .year(2024)
    ///     .variables(Variables::Weather)
    ///     .call()
    ///     .await?;
    /// assert_eq!(june.height(), 30);
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn monthly_summary(
        &self,
        station: Option<&str>,
        month: Option<u32>,
        year: Option<i32>,
        variables: Option<Variables>,
    ) -> Result<DataFrame, MesonetError> {
        MonthlySummaryDriver::new(&self.loader, &self.hydraulic_params)
            .with_request_interval(self.request_interval)
            .collect(station, month, year, variables.unwrap_or_default())
            .await
    }
}
