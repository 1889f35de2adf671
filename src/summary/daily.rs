use crate::error::MesonetError;
use crate::feed::extract::{select_columns, SOIL_TEMPERATURE_COLUMNS, WEATHER_COLUMNS};
use crate::feed::fetcher::split_daily;
use crate::feed::MesonetFeed;
use crate::soil::assembler::SoilMoistureAssembler;
use crate::soil::hydraulic_params::HydraulicParameterStore;
use crate::soil::records::records_to_frame;
use crate::stations::directory::normalize_station;
use crate::summary::{insert_date_column, select_station};
use crate::types::date::resolve_date;
use crate::types::variables::Variables;
use crate::utils::SITE_COLUMN;
use chrono::NaiveDateTime;
use log::debug;
use polars::prelude::*;

const DAILY_SOURCE: &str = "daily summary";

/// Builds the daily summary table of weather, soil moisture and soil temperature.
pub struct DailySummaryComposer<'a, F: MesonetFeed> {
    feed: &'a F,
    store: &'a HydraulicParameterStore,
}

impl<'a, F: MesonetFeed> DailySummaryComposer<'a, F> {
    pub fn new(feed: &'a F, store: &'a HydraulicParameterStore) -> Self {
        Self { feed, store }
    }

    /// One row per station with the selected `variables` and a `Date` column in second
    /// position.
    ///
    /// `date` defaults to yesterday. With [`Variables::All`] the three groups are inner
    /// joined on `Site`, so only stations reporting soil moisture are kept.
    ///
    /// # Errors
    ///
    /// Invalid dates and station codes are rejected before any request. A valid station code
    /// without a row in the result gives [`MesonetError::StationNotFound`].
    pub async fn compose(
        &self,
        date: Option<NaiveDateTime>,
        station: Option<&str>,
        variables: Variables,
    ) -> Result<DataFrame, MesonetError> {
        let date = resolve_date(date)?;
        let station = station.map(normalize_station).transpose()?;
        debug!("Composing {variables} summary for {}", date.date());

        let mut frame = match variables {
            Variables::Weather => self.daily_columns(date, &WEATHER_COLUMNS).await?,
            Variables::SoilTemperature => {
                self.daily_columns(date, &SOIL_TEMPERATURE_COLUMNS).await?
            }
            Variables::SoilMoisture => self.soil_moisture(date).await?,
            Variables::All => {
                let soil_moisture = self.soil_moisture(date).await?;
                let (weather, soil_temperature) =
                    split_daily(self.feed.daily_frame(date.date()).await?)?;
                weather
                    .lazy()
                    .inner_join(soil_moisture.lazy(), col(SITE_COLUMN), col(SITE_COLUMN))
                    .inner_join(
                        soil_temperature.lazy(),
                        col(SITE_COLUMN),
                        col(SITE_COLUMN),
                    )
                    .sort([SITE_COLUMN], SortMultipleOptions::default())
                    .collect()?
            }
        };

        insert_date_column(&mut frame, date.date())?;
        select_station(frame, station.as_deref())?.require()
    }

    async fn daily_columns(
        &self,
        date: NaiveDateTime,
        columns: &[&str],
    ) -> Result<DataFrame, MesonetError> {
        let daily = self.feed.daily_frame(date.date()).await?;
        Ok(select_columns(daily, columns, DAILY_SOURCE)?)
    }

    async fn soil_moisture(&self, date: NaiveDateTime) -> Result<DataFrame, MesonetError> {
        let records = SoilMoistureAssembler::new(self.store)
            .assemble(self.feed, Some(date), None)
            .await?;
        Ok(records_to_frame(&records)?)
    }
}
