use crate::error::MesonetError;
use crate::feed::extract::{select_columns, SOIL_TEMPERATURE_COLUMNS, WEATHER_COLUMNS};
use crate::feed::MesonetFeed;
use crate::stations::directory::verify_station;
use crate::types::date::resolve_date;
use crate::utils::SITE_COLUMN;
use chrono::NaiveDateTime;
use polars::prelude::*;

const DAILY_SOURCE: &str = "daily summary";

/// Retrieves the weather and soil temperature parts of the daily summary file.
pub struct SummaryFetcher<'a, F: MesonetFeed> {
    feed: &'a F,
}

impl<'a, F: MesonetFeed> SummaryFetcher<'a, F> {
    pub fn new(feed: &'a F) -> Self {
        Self { feed }
    }

    /// Daily air temperature, humidity, rain, solar radiation and wind speed per station.
    ///
    /// Defaults to yesterday. A given station is verified against the station metadata
    /// service before the summary is downloaded.
    pub async fn weather(
        &self,
        date: Option<NaiveDateTime>,
        station: Option<&str>,
    ) -> Result<DataFrame, MesonetError> {
        self.fetch(date, station, &WEATHER_COLUMNS).await
    }

    /// Daily soil temperature extremes per station.
    pub async fn soil_temperature(
        &self,
        date: Option<NaiveDateTime>,
        station: Option<&str>,
    ) -> Result<DataFrame, MesonetError> {
        self.fetch(date, station, &SOIL_TEMPERATURE_COLUMNS).await
    }

    async fn fetch(
        &self,
        date: Option<NaiveDateTime>,
        station: Option<&str>,
        columns: &[&str],
    ) -> Result<DataFrame, MesonetError> {
        let date = resolve_date(date)?;
        let station = match station {
            Some(code) => Some(verify_station(self.feed, code).await?),
            None => None,
        };

        let daily = self.feed.daily_frame(date.date()).await?;
        let frame = select_columns(daily, columns, DAILY_SOURCE)?;

        match station {
            Some(station) => Ok(frame
                .lazy()
                .filter(col(SITE_COLUMN).eq(lit(station.as_str())))
                .collect()?),
            None => Ok(frame),
        }
    }
}

/// Splits one downloaded daily summary into its weather and soil temperature tables.
pub(crate) fn split_daily(daily: DataFrame) -> Result<(DataFrame, DataFrame), MesonetError> {
    let weather = select_columns(daily.clone(), &WEATHER_COLUMNS, DAILY_SOURCE)?;
    let soil_temperature = select_columns(daily, &SOIL_TEMPERATURE_COLUMNS, DAILY_SOURCE)?;
    Ok((weather, soil_temperature))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::test_support::{past_date, FixtureFeed};

    #[tokio::test]
    async fn test_weather_all_stations() -> Result<(), Box<dyn std::error::Error>> {
        let feed = FixtureFeed::default();
        let df = SummaryFetcher::new(&feed).weather(Some(past_date()), None).await?;

        assert_eq!(df.height(), 4);
        assert_eq!(df.width(), 1 + WEATHER_COLUMNS.len());
        assert_eq!(df.column("TMAX")?.f64()?.get(0), Some(21.3));
        Ok(())
    }

    #[tokio::test]
    async fn test_soil_temperature_single_station() -> Result<(), Box<dyn std::error::Error>> {
        let feed = FixtureFeed::default();
        let df = SummaryFetcher::new(&feed)
            .soil_temperature(Some(past_date()), Some("adax"))
            .await?;

        assert_eq!(df.height(), 1);
        assert_eq!(df.column("Site")?.str()?.get(0), Some("ADAX"));
        assert_eq!(df.column("S5MX")?.f64()?.get(0), Some(16.4));
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_station_rejected() {
        let feed = FixtureFeed::default();
        let err = SummaryFetcher::new(&feed)
            .weather(Some(past_date()), Some("XXXX"))
            .await
            .unwrap_err();
        assert!(matches!(err, MesonetError::StationNotFound(_)));
    }

    #[tokio::test]
    async fn test_invalid_date_fails_before_fetch() {
        let feed = FixtureFeed::failing();
        let date = chrono::NaiveDate::from_ymd_opt(1990, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let err = SummaryFetcher::new(&feed)
            .weather(Some(date), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(feed.calls(), 0);
    }
}
