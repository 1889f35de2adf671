mod config;
mod error;
mod feed;
mod mesonet;
mod soil;
mod stations;
mod summary;
mod types;
mod utils;

#[cfg(test)]
mod test_support;

pub use config::*;
pub use error::{ErrorKind, MesonetError};
pub use mesonet::*;
pub use utils::default_hydraulic_params_path;

pub use feed::data_loader::MesonetDataLoader;
pub use feed::error::FeedError;
pub use feed::extract::RawSensorReading;
pub use feed::fetcher::SummaryFetcher;
pub use feed::MesonetFeed;

pub use soil::assembler::SoilMoistureAssembler;
pub use soil::error::HydraulicParamsError;
pub use soil::hydraulic_params::*;
pub use soil::physics::*;
pub use soil::records::*;

pub use stations::directory::*;

pub use summary::daily::DailySummaryComposer;
pub use summary::monthly::MonthlySummaryDriver;
pub use summary::{select_station, StationSelection};

pub use types::date::*;
pub use types::depth::{Depth, SoilVariable};
pub use types::variables::Variables;
