use crate::feed::error::FeedError;
use crate::soil::error::HydraulicParamsError;
use chrono::NaiveDateTime;
use polars::error::PolarsError;
use thiserror::Error;

/// Broad classification of a [`MesonetError`].
///
/// Argument errors are always raised before any network request is made.
/// Data errors wrap the underlying cause and are never retried internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A date, station code, depth or selector given by the caller is not valid.
    InvalidArgument,
    /// Remote data or the hydraulic reference dataset could not be loaded or understood.
    DataUnavailable,
}

#[derive(Debug, Error)]
pub enum MesonetError {
    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    HydraulicParams(#[from] HydraulicParamsError),

    #[error("Failed processing DataFrame: {0}")]
    Frame(#[from] PolarsError),

    #[error("Date components {year}-{month:02}-{day:02} {hour:02}:{minute:02} do not form a valid date")]
    InvalidDateComponents {
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
    },

    #[error("Could not parse '{0}' as a date")]
    UnparseableDate(String),

    #[error("Date {0} lies in the future")]
    FutureDate(NaiveDateTime),

    #[error("Date {0} is earlier than 1994, when the Mesonet started operating")]
    DateBeforeNetwork(NaiveDateTime),

    #[error("Invalid month {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("Station code '{0}' must be exactly 4 characters")]
    InvalidStationCode(String),

    #[error("Station '{0}' not valid")]
    StationNotFound(String),

    #[error("No hydraulic parameters found for site '{0}'")]
    UnknownHydraulicSite(String),

    #[error("Invalid variables selected: '{0}' (expected weather, soil_moist, soil_temp or all)")]
    UnknownVariables(String),
}

impl MesonetError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MesonetError::Feed(_) | MesonetError::HydraulicParams(_) | MesonetError::Frame(_) => {
                ErrorKind::DataUnavailable
            }
            MesonetError::InvalidDateComponents { .. }
            | MesonetError::UnparseableDate(_)
            | MesonetError::FutureDate(_)
            | MesonetError::DateBeforeNetwork(_)
            | MesonetError::InvalidMonth { .. }
            | MesonetError::InvalidStationCode(_)
            | MesonetError::StationNotFound(_)
            | MesonetError::UnknownHydraulicSite(_)
            | MesonetError::UnknownVariables(_) => ErrorKind::InvalidArgument,
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.kind() == ErrorKind::InvalidArgument
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert!(MesonetError::StationNotFound("XXXX".into()).is_invalid_argument());
        assert!(MesonetError::UnknownVariables("rain".into()).is_invalid_argument());
        assert_eq!(
            MesonetError::from(FeedError::MissingHeader {
                url: "https://example.org".into()
            })
            .kind(),
            ErrorKind::DataUnavailable
        );
    }
}
