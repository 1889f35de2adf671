pub mod daily;
pub mod monthly;

use crate::error::MesonetError;
use crate::utils::{DATE_COLUMN, SITE_COLUMN};
use chrono::NaiveDate;
use polars::prelude::*;

/// Outcome of restricting a summary table to one station.
#[derive(Debug, Clone)]
pub enum StationSelection {
    /// The table, filtered to the station when one was requested.
    Found(DataFrame),
    /// A station was requested but the table has no row for it.
    NotFound { station: String },
}

impl StationSelection {
    /// The selected table, or [`MesonetError::StationNotFound`].
    pub fn require(self) -> Result<DataFrame, MesonetError> {
        match self {
            StationSelection::Found(frame) => Ok(frame),
            StationSelection::NotFound { station } => Err(MesonetError::StationNotFound(station)),
        }
    }
}

/// Keeps only the rows of `station` (already normalized) when one is given.
pub fn select_station(
    frame: DataFrame,
    station: Option<&str>,
) -> PolarsResult<StationSelection> {
    let Some(station) = station else {
        return Ok(StationSelection::Found(frame));
    };
    let filtered = frame
        .lazy()
        .filter(col(SITE_COLUMN).eq(lit(station)))
        .collect()?;
    if filtered.height() == 0 {
        return Ok(StationSelection::NotFound {
            station: station.to_string(),
        });
    }
    Ok(StationSelection::Found(filtered))
}

/// Inserts a `Date` column holding `date` as the second column.
pub(crate) fn insert_date_column(frame: &mut DataFrame, date: NaiveDate) -> PolarsResult<()> {
    let dates = DateChunked::from_naive_date(
        DATE_COLUMN.into(),
        std::iter::repeat(date).take(frame.height()),
    );
    frame.insert_column(1, dates.into_series())?;
    Ok(())
}
