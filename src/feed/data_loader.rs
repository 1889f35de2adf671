use crate::config::Endpoints;
use crate::feed::error::FeedError;
use crate::feed::mdf::parse_mdf;
use crate::feed::MesonetFeed;
use chrono::NaiveDate;
use log::{debug, info, warn};
use polars::prelude::*;
use reqwest::Client;
use std::io::Cursor;
use tokio::task;

/// Downloads and parses Mesonet files over HTTP.
#[derive(Debug, Clone)]
pub struct MesonetDataLoader {
    endpoints: Endpoints,
    download_client: Client,
}

impl Default for MesonetDataLoader {
    fn default() -> Self {
        Self::new(Endpoints::default())
    }
}

impl MesonetDataLoader {
    pub fn new(endpoints: Endpoints) -> MesonetDataLoader {
        MesonetDataLoader {
            endpoints,
            download_client: Client::new(),
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Downloads `url` and returns the body as text.
    async fn download(&self, url: &str) -> Result<String, FeedError> {
        info!("Downloading data from {}", url);

        let response = self
            .download_client
            .get(url)
            .send()
            .await
            .map_err(|e| FeedError::NetworkRequest(url.to_string(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    FeedError::HttpStatus {
                        url: url.to_string(),
                        status,
                        source: e,
                    }
                } else {
                    FeedError::NetworkRequest(url.to_string(), e)
                });
            }
        };

        let body = response
            .text()
            .await
            .map_err(|e| FeedError::BodyRead(url.to_string(), e))?;
        debug!("Downloaded {} bytes from {}", body.len(), url);
        Ok(body)
    }

    /// Downloads an MDF file and parses it on a blocking task.
    async fn mdf_frame(&self, url: String) -> Result<DataFrame, FeedError> {
        let text = self.download(&url).await?;
        task::spawn_blocking(move || parse_mdf(&text, &url)).await?
    }

    /// Parses the comma separated station export on a blocking task.
    async fn csv_frame(&self, url: String) -> Result<DataFrame, FeedError> {
        let text = self.download(&url).await?;
        task::spawn_blocking(move || {
            CsvReadOptions::default()
                .with_has_header(true)
                .with_infer_schema_length(None)
                .into_reader_with_file_handle(Cursor::new(text.into_bytes()))
                .finish()
                .map_err(|e| FeedError::Parse { url, source: e })
        })
        .await?
    }
}

impl MesonetFeed for MesonetDataLoader {
    async fn sensor_frame(&self, date: NaiveDate) -> Result<DataFrame, FeedError> {
        self.mdf_frame(self.endpoints.sensor_url(date)).await
    }

    async fn daily_frame(&self, date: NaiveDate) -> Result<DataFrame, FeedError> {
        self.mdf_frame(self.endpoints.daily_url(date)).await
    }

    async fn station_frame(&self) -> Result<DataFrame, FeedError> {
        self.csv_frame(self.endpoints.station_info_url.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let loader = MesonetDataLoader::new(Endpoints {
            daily_base_url: "http://127.0.0.1:9".to_string(),
            ..Endpoints::default()
        });
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

        let err = loader.daily_frame(date).await.unwrap_err();
        assert!(matches!(err, FeedError::NetworkRequest(url, _) if url.ends_with("20240315.daily.mdf")));
    }

    #[tokio::test]
    #[ignore = "requires network access to data.mesonet.org"]
    async fn test_live_daily_frame() -> Result<(), FeedError> {
        let loader = MesonetDataLoader::default();
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

        let df = loader.daily_frame(date).await?;
        assert!(df.height() > 100);
        assert!(df.column("STID").is_ok());
        Ok(())
    }
}
