//! Remote endpoints of the Mesonet services and the URL layout of the MDF archive.

use chrono::{Datelike, NaiveDate};
use std::time::Duration;

pub const DEFAULT_SENSOR_BASE_URL: &str = "https://data.mesonet.org/data/public/mesonet/mdf";
pub const DEFAULT_DAILY_BASE_URL: &str =
    "https://data.mesonet.org/data/public/mesonet/summaries/daily/mdf";
pub const DEFAULT_STATION_INFO_URL: &str =
    "https://api.mesonet.org/index.php/export/station_location_soil_information";

/// Minimum spacing between consecutive daily requests of a monthly summary.
pub const DEFAULT_REQUEST_INTERVAL: Duration = Duration::from_secs(1);

/// Base URLs used by [`crate::MesonetDataLoader`].
///
/// # Examples
///
/// ```
/// use mesonet_soil::Endpoints;
/// use chrono::NaiveDate;
///
/// let endpoints = Endpoints::default();
/// let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
/// assert!(endpoints.daily_url(date).ends_with("/2024/03/20240305.daily.mdf"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Root of the 5-minute MDF archive (`{root}/YYYY/MM/DD/YYYYMMDDHHMM.mdf`).
    pub sensor_base_url: String,
    /// Root of the daily summary archive (`{root}/YYYY/MM/YYYYMMDD.daily.mdf`).
    pub daily_base_url: String,
    /// CSV export of station locations and soil information.
    pub station_info_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            sensor_base_url: DEFAULT_SENSOR_BASE_URL.to_string(),
            daily_base_url: DEFAULT_DAILY_BASE_URL.to_string(),
            station_info_url: DEFAULT_STATION_INFO_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// URL of the 00:00 observation file, which carries the calibrated delta-T readings.
    pub fn sensor_url(&self, date: NaiveDate) -> String {
        let (y, m, d) = (date.year(), date.month(), date.day());
        format!(
            "{}/{y:04}/{m:02}/{d:02}/{y:04}{m:02}{d:02}0000.mdf",
            self.sensor_base_url.trim_end_matches('/')
        )
    }

    pub fn daily_url(&self, date: NaiveDate) -> String {
        let (y, m, d) = (date.year(), date.month(), date.day());
        format!(
            "{}/{y:04}/{m:02}/{y:04}{m:02}{d:02}.daily.mdf",
            self.daily_base_url.trim_end_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_url() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(
            Endpoints::default().sensor_url(date),
            "https://data.mesonet.org/data/public/mesonet/mdf/2024/03/05/202403050000.mdf"
        );
    }

    #[test]
    fn test_daily_url_with_custom_base() {
        let endpoints = Endpoints {
            daily_base_url: "http://localhost:8080/daily/".to_string(),
            ..Endpoints::default()
        };
        let date = NaiveDate::from_ymd_opt(1999, 12, 31).unwrap();
        assert_eq!(
            endpoints.daily_url(date),
            "http://localhost:8080/daily/1999/12/19991231.daily.mdf"
        );
    }
}
