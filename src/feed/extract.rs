use crate::feed::error::FeedError;
use crate::feed::mdf::MISSING_SENTINEL_VALUES;
use crate::types::depth::Depth;
use crate::utils::{null_sentinels, SITE_COLUMN};
use polars::prelude::*;

pub(crate) const STATION_ID_COLUMN: &str = "STID";

/// Calibrated delta-T columns of the 5-minute MDF file, by depth.
pub(crate) const DELTA_T_COLUMNS: [(&str, Depth); 3] = [
    ("TR05", Depth::Cm5),
    ("TR25", Depth::Cm25),
    ("TR60", Depth::Cm60),
];

/// Daily maximum/minimum/average air temperature and humidity, rainfall, total solar
/// radiation and average wind speed.
pub(crate) const WEATHER_COLUMNS: [&str; 9] = [
    "TMAX", "TMIN", "TAVG", "HMAX", "HMIN", "HAVG", "RAIN", "ATOT", "WSPD",
];

/// Soil temperature extremes under bare soil (B), native sod (S) and sod at 5 cm (S5).
pub(crate) const SOIL_TEMPERATURE_COLUMNS: [&str; 6] =
    ["BMIN", "BMAX", "SMAX", "SMIN", "S5MN", "S5MX"];

/// One calibrated delta-T reading for a station and depth.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSensorReading {
    pub site: String,
    pub depth: Depth,
    /// Calibrated delta-T in °C. `None` when the station reported a missing value.
    pub delta_t: Option<f64>,
}

impl RawSensorReading {
    pub fn new(site: impl Into<String>, depth: Depth, delta_t: Option<f64>) -> Self {
        Self {
            site: site.into(),
            depth,
            delta_t,
        }
    }
}

/// Keeps `STID` (renamed to `Site`) and `columns` (as nullable floats) of a parsed MDF frame.
pub(crate) fn select_columns(
    df: DataFrame,
    columns: &[&str],
    source: &str,
) -> Result<DataFrame, FeedError> {
    if let Some(missing) = std::iter::once(&STATION_ID_COLUMN)
        .chain(columns.iter())
        .find(|name| df.column(name).is_err())
    {
        return Err(FeedError::MissingColumn {
            url: source.to_string(),
            column: missing.to_string(),
        });
    }

    let mut exprs = Vec::with_capacity(columns.len() + 1);
    exprs.push(
        col(STATION_ID_COLUMN)
            .cast(DataType::String)
            .alias(SITE_COLUMN),
    );
    exprs.extend(
        columns
            .iter()
            .map(|name| null_sentinels(name, &MISSING_SENTINEL_VALUES)),
    );

    Ok(df.lazy().select(exprs).collect()?)
}

/// Reshapes the wide delta-T columns into one reading per station and depth.
pub(crate) fn sensor_readings(
    df: DataFrame,
    source: &str,
) -> Result<Vec<RawSensorReading>, FeedError> {
    let column_names: Vec<&str> = DELTA_T_COLUMNS.iter().map(|(name, _)| *name).collect();
    let frame = select_columns(df, &column_names, source)?;

    let sites = frame.column(SITE_COLUMN)?.str()?;
    let mut by_depth = Vec::with_capacity(DELTA_T_COLUMNS.len());
    for (name, depth) in DELTA_T_COLUMNS {
        by_depth.push((depth, frame.column(name)?.f64()?));
    }

    let mut readings = Vec::with_capacity(frame.height() * by_depth.len());
    for idx in 0..frame.height() {
        let Some(site) = sites.get(idx) else {
            continue;
        };
        for (depth, values) in &by_depth {
            readings.push(RawSensorReading::new(site, *depth, values.get(idx)));
        }
    }
    Ok(readings)
}
