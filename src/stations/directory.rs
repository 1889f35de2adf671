//! Station metadata from the Mesonet station export, used both as the public station
//! information table and as the set of valid station codes.

use crate::error::MesonetError;
use crate::feed::error::FeedError;
use crate::feed::MesonetFeed;
use crate::utils::SITE_COLUMN;
use log::debug;
use polars::prelude::*;
use std::collections::HashSet;

const SOURCE: &str = "station metadata export";

/// Export column names and the names they are published under by this crate.
const COLUMN_RENAMES: [(&str, &str); 14] = [
    ("stnm", "Number"),
    ("stid", "Site"),
    ("name", "Name"),
    ("city", "City"),
    ("cnty", "County"),
    ("nlat", "nLat"),
    ("elon", "eLon"),
    ("elev", "Elev"),
    ("cdiv", "Division"),
    ("rang", "Range"),
    ("cdir", "Direction"),
    ("clas", "Class"),
    ("datc", "Commission"),
    ("datd", "Decommission"),
];

/// Identity, location, soil texture by depth and commissioning dates.
pub const DEFAULT_STATION_COLUMNS: [&str; 15] = [
    "Number",
    "Site",
    "Name",
    "City",
    "County",
    "nLat",
    "eLon",
    "Elev",
    "TEXT5",
    "TEXT10",
    "TEXT25",
    "TEXT60",
    "TEXT75",
    "Commission",
    "Decommission",
];

/// Upper-cases a station code after checking it has exactly 4 characters.
pub fn normalize_station(code: &str) -> Result<String, MesonetError> {
    if code.chars().count() != 4 {
        return Err(MesonetError::InvalidStationCode(code.to_string()));
    }
    Ok(code.to_uppercase())
}

/// Normalizes `code` and checks it against the station metadata service.
///
/// # Errors
///
/// [`MesonetError::InvalidStationCode`] or [`MesonetError::StationNotFound`] for bad codes,
/// [`MesonetError::Feed`] when the metadata service cannot be reached.
pub async fn verify_station<F: MesonetFeed>(feed: &F, code: &str) -> Result<String, MesonetError> {
    let station = normalize_station(code)?;
    let directory = StationDirectory::from_frame(feed.station_frame().await?)?;
    if !directory.contains(&station) {
        return Err(MesonetError::StationNotFound(station));
    }
    Ok(station)
}

/// The station metadata table with renamed columns.
#[derive(Debug, Clone)]
pub struct StationDirectory {
    frame: DataFrame,
    stations: HashSet<String>,
}

impl StationDirectory {
    pub fn from_frame(raw: DataFrame) -> Result<Self, FeedError> {
        let exprs: Vec<Expr> = raw
            .get_column_names()
            .iter()
            .map(|name| {
                let name = name.as_str();
                match COLUMN_RENAMES.iter().find(|(from, _)| *from == name) {
                    Some((_, to)) => col(name).alias(*to),
                    None => col(name),
                }
            })
            .collect();
        let frame = raw.lazy().select(exprs).collect()?;

        let stations: HashSet<String> = frame
            .column(SITE_COLUMN)
            .map_err(|_| FeedError::MissingColumn {
                url: SOURCE.to_string(),
                column: "stid".to_string(),
            })?
            .str()?
            .into_iter()
            .flatten()
            .map(|s| s.to_uppercase())
            .collect();
        debug!("Loaded metadata for {} stations", stations.len());

        Ok(Self { frame, stations })
    }

    /// Whether `station` (already upper-cased) is a known station code.
    pub fn contains(&self, station: &str) -> bool {
        self.stations.contains(station)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Station information table, optionally restricted to one station and to
    /// [`DEFAULT_STATION_COLUMNS`].
    pub fn station_info(
        &self,
        station: Option<&str>,
        default_columns_only: bool,
    ) -> Result<DataFrame, MesonetError> {
        let mut frame = self.frame.clone().lazy();

        if default_columns_only {
            if let Some(missing) = DEFAULT_STATION_COLUMNS
                .iter()
                .find(|name| self.frame.column(name).is_err())
            {
                return Err(FeedError::MissingColumn {
                    url: SOURCE.to_string(),
                    column: missing.to_string(),
                }
                .into());
            }
            frame = frame.select(
                DEFAULT_STATION_COLUMNS
                    .iter()
                    .map(|name| col(*name))
                    .collect::<Vec<_>>(),
            );
        }

        let Some(station) = station else {
            return Ok(frame.collect()?);
        };
        let station = station.to_uppercase();
        if !self.contains(&station) {
            return Err(MesonetError::StationNotFound(station));
        }
        Ok(frame
            .filter(col(SITE_COLUMN).eq(lit(station.as_str())))
            .collect()?)
    }
}
