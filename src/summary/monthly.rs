use crate::config::DEFAULT_REQUEST_INTERVAL;
use crate::error::MesonetError;
use crate::feed::MesonetFeed;
use crate::soil::hydraulic_params::HydraulicParameterStore;
use crate::stations::directory::normalize_station;
use crate::summary::daily::DailySummaryComposer;
use crate::summary::select_station;
use crate::types::date::{month_dates, yesterday};
use crate::types::variables::Variables;
use chrono::{Datelike, Local};
use log::info;
use polars::prelude::*;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Repeats the daily summary over the days of a month.
pub struct MonthlySummaryDriver<'a, F: MesonetFeed> {
    composer: DailySummaryComposer<'a, F>,
    request_interval: Duration,
}

impl<'a, F: MesonetFeed> MonthlySummaryDriver<'a, F> {
    pub fn new(feed: &'a F, store: &'a HydraulicParameterStore) -> Self {
        Self {
            composer: DailySummaryComposer::new(feed, store),
            request_interval: DEFAULT_REQUEST_INTERVAL,
        }
    }

    /// Minimum time between the start of two daily retrievals.
    pub fn with_request_interval(mut self, request_interval: Duration) -> Self {
        self.request_interval = request_interval;
        self
    }

    /// Daily summaries of every day of `month`/`year` up to yesterday, stacked vertically.
    ///
    /// Defaults to the current month. Days are retrieved one at a time, at most one per
    /// request interval. A month without eligible days gives an empty frame.
    pub async fn collect(
        &self,
        station: Option<&str>,
        month: Option<u32>,
        year: Option<i32>,
        variables: Variables,
    ) -> Result<DataFrame, MesonetError> {
        let today = Local::now().date_naive();
        let year = year.unwrap_or(today.year());
        let month = month.unwrap_or(today.month());
        let station = station.map(normalize_station).transpose()?;

        let dates = month_dates(year, month, yesterday())?;
        if dates.is_empty() {
            info!("No days to retrieve for {month}/{year}");
            return Ok(DataFrame::default());
        }

        let mut stacked: Option<DataFrame> = None;
        for (idx, date) in dates.iter().enumerate() {
            let started = Instant::now();
            info!(
                "Retrieving {month}/{year} ... day {} of {}",
                idx + 1,
                dates.len()
            );

            let frame = self.composer.compose(Some(*date), None, variables).await?;
            stacked = Some(match stacked.take() {
                Some(mut acc) => {
                    acc.vstack_mut(&frame)?;
                    acc
                }
                None => frame,
            });

            if idx + 1 < dates.len() {
                let elapsed = started.elapsed();
                if elapsed < self.request_interval {
                    sleep(self.request_interval - elapsed).await;
                }
            }
        }

        let Some(mut stacked) = stacked else {
            return Ok(DataFrame::default());
        };
        stacked.as_single_chunk_par();
        select_station(stacked, station.as_deref())?.require()
    }
}
