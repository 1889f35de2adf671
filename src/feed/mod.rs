pub mod data_loader;
pub mod error;
pub mod extract;
pub mod fetcher;
pub(crate) mod mdf;

use crate::feed::error::FeedError;
use chrono::NaiveDate;
use polars::prelude::DataFrame;
use std::future::Future;

/// Source of the raw Mesonet tables consumed by the retrieval pipeline.
///
/// [`data_loader::MesonetDataLoader`] implements this over HTTP. Every call is a fresh pull;
/// implementations must not cache results across calls.
pub trait MesonetFeed {
    /// The 00:00 observation file for `date`, columns as published (`STID`, `TR05`, ...).
    fn sensor_frame(
        &self,
        date: NaiveDate,
    ) -> impl Future<Output = Result<DataFrame, FeedError>> + Send;

    /// The daily summary file for `date`, columns as published (`STID`, `TMAX`, ...).
    fn daily_frame(
        &self,
        date: NaiveDate,
    ) -> impl Future<Output = Result<DataFrame, FeedError>> + Send;

    /// The station metadata export, columns as published (`stid`, `nlat`, ...).
    fn station_frame(&self) -> impl Future<Output = Result<DataFrame, FeedError>> + Send;
}
