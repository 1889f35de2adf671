//! Soil moisture derivation: sensor delta-T readings are joined with the hydraulic
//! parameters of their site and depth, converted to matric potential, water content and
//! available water, then pivoted to one record per site.

use crate::error::MesonetError;
use crate::feed::error::FeedError;
use crate::feed::extract::{sensor_readings, RawSensorReading};
use crate::feed::MesonetFeed;
use crate::soil::hydraulic_params::HydraulicParameterStore;
use crate::soil::physics::{faw, matric_potential, vwc_from_mp, whc};
use crate::soil::records::{DerivedSoilMoistureRow, SoilLayer, WideSoilMoistureRecord};
use crate::stations::directory::normalize_station;
use crate::types::date::resolve_date;
use chrono::NaiveDateTime;
use log::debug;
use std::collections::BTreeMap;

const SENSOR_SOURCE: &str = "sensor feed";

pub struct SoilMoistureAssembler<'a> {
    store: &'a HydraulicParameterStore,
}

impl<'a> SoilMoistureAssembler<'a> {
    pub fn new(store: &'a HydraulicParameterStore) -> Self {
        Self { store }
    }

    /// Joins each reading with its hydraulic parameters and derives MP, VWC, FAW and WHC.
    ///
    /// Readings for a site and depth without parameters are dropped.
    pub fn derive(&self, readings: &[RawSensorReading]) -> Vec<DerivedSoilMoistureRow> {
        let derived: Vec<DerivedSoilMoistureRow> = readings
            .iter()
            .filter_map(|reading| {
                let site = reading.site.to_uppercase();
                let parameters = self.store.get(&site, reading.depth)?.clone();

                let mp = matric_potential(reading.delta_t);
                let vwc = vwc_from_mp(
                    mp,
                    parameters.theta_r,
                    parameters.theta_s,
                    parameters.alpha,
                    parameters.n,
                );
                let faw = faw(vwc, parameters.th1500, parameters.th33);
                let whc = whc(parameters.th1500, parameters.th33);

                Some(DerivedSoilMoistureRow {
                    site,
                    depth: reading.depth,
                    delta_t: reading.delta_t,
                    parameters,
                    mp,
                    vwc,
                    faw,
                    whc,
                })
            })
            .collect();

        let dropped = readings.len() - derived.len();
        if dropped > 0 {
            debug!("Dropped {dropped} readings without hydraulic parameters");
        }
        derived
    }

    /// Groups derived rows by site into wide records, ordered by site code.
    ///
    /// # Errors
    ///
    /// [`FeedError::DuplicateReading`] if a site reports the same depth twice.
    pub fn pivot_wide(
        &self,
        rows: &[DerivedSoilMoistureRow],
    ) -> Result<Vec<WideSoilMoistureRecord>, FeedError> {
        let mut by_site: BTreeMap<&str, WideSoilMoistureRecord> = BTreeMap::new();
        for row in rows {
            let record = by_site
                .entry(row.site.as_str())
                .or_insert_with(|| WideSoilMoistureRecord::new(row.site.as_str()));
            let layer = &mut record.layers[row.depth.index()];
            if layer.is_some() {
                return Err(FeedError::DuplicateReading {
                    site: row.site.clone(),
                    depth: row.depth,
                });
            }
            *layer = Some(SoilLayer::from(row));
        }
        Ok(by_site.into_values().collect())
    }

    /// Derives and pivots `readings`, keeping only `station` when one is given.
    ///
    /// # Errors
    ///
    /// [`MesonetError::StationNotFound`] when `station` has no derived record, which is also
    /// the case for a station without any hydraulic parameters.
    pub fn assemble_readings(
        &self,
        readings: &[RawSensorReading],
        station: Option<&str>,
    ) -> Result<Vec<WideSoilMoistureRecord>, MesonetError> {
        let station = station.map(normalize_station).transpose()?;
        let records = self.pivot_wide(&self.derive(readings))?;

        let Some(station) = station else {
            return Ok(records);
        };
        let record = records
            .into_iter()
            .find(|record| record.site == station)
            .ok_or(MesonetError::StationNotFound(station))?;
        Ok(vec![record])
    }

    /// Soil moisture for every site, or only `station`, at 00:00 UTC on `date`.
    ///
    /// `date` defaults to yesterday. The date and station code are validated before the
    /// sensor file is requested.
    pub async fn assemble<F: MesonetFeed>(
        &self,
        feed: &F,
        date: Option<NaiveDateTime>,
        station: Option<&str>,
    ) -> Result<Vec<WideSoilMoistureRecord>, MesonetError> {
        let date = resolve_date(date)?;
        let station = station.map(normalize_station).transpose()?;

        let frame = feed.sensor_frame(date.date()).await?;
        let readings = sensor_readings(frame, SENSOR_SOURCE)?;
        debug!(
            "Read {} delta-T readings for {}",
            readings.len(),
            date.date()
        );
        self.assemble_readings(&readings, station.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::soil::hydraulic_params::HydraulicParameterRow;
    use crate::test_support::{past_date, sample_store, FixtureFeed};
    use crate::types::depth::{Depth, SoilVariable};
    use approx::assert_relative_eq;

    fn single_row_store() -> HydraulicParameterStore {
        HydraulicParameterStore::from_rows([HydraulicParameterRow {
            site: "TEST".to_string(),
            depth: Depth::Cm5,
            sand: Some(40.0),
            silt: Some(40.0),
            clay: Some(20.0),
            bulk_density: Some(1.4),
            th33: Some(0.30),
            th1500: Some(0.10),
            theta_r: Some(0.05),
            theta_s: Some(0.45),
            alpha: Some(0.02),
            n: Some(1.3),
            ks: Some(1.0),
        }])
        .unwrap()
    }

    #[test]
    fn test_single_site_derivation() {
        let store = single_row_store();
        let assembler = SoilMoistureAssembler::new(&store);
        let readings = [RawSensorReading::new("TEST", Depth::Cm5, Some(3.17))];

        let records = assembler.assemble_readings(&readings, None).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];

        let mp = record
            .value(SoilVariable::MatricPotential, Depth::Cm5)
            .unwrap();
        assert_relative_eq!(mp, -1041.5);

        let expected_vwc =
            0.05 + (0.45 - 0.05) / (1.0 + (0.02f64 * 1041.5).powf(1.3)).powf(1.0 - 1.0 / 1.3);
        let vwc = record
            .value(SoilVariable::VolumetricWaterContent, Depth::Cm5)
            .unwrap();
        assert_relative_eq!(vwc, expected_vwc, epsilon = 1e-12);

        let faw = record
            .value(SoilVariable::FractionAvailableWater, Depth::Cm5)
            .unwrap();
        assert_relative_eq!(faw, (expected_vwc - 0.10) / (0.30 - 0.10), epsilon = 1e-12);

        assert_eq!(record.value(SoilVariable::FieldCapacity, Depth::Cm5), Some(0.30));
        assert_eq!(record.value(SoilVariable::WiltingPoint, Depth::Cm5), Some(0.10));
        assert_relative_eq!(
            record
                .value(SoilVariable::WaterHoldingCapacity, Depth::Cm5)
                .unwrap(),
            0.20,
            epsilon = 1e-12
        );
        assert_eq!(record.value(SoilVariable::Ks, Depth::Cm5), Some(1.0));

        // No parameters at the other depths.
        assert!(record.layer(Depth::Cm25).is_none());
        assert!(record.layer(Depth::Cm60).is_none());
    }

    #[test]
    fn test_unmatched_readings_dropped() {
        let store = single_row_store();
        let assembler = SoilMoistureAssembler::new(&store);
        let readings = [
            RawSensorReading::new("TEST", Depth::Cm5, Some(2.0)),
            RawSensorReading::new("TEST", Depth::Cm25, Some(2.0)),
            RawSensorReading::new("NOPE", Depth::Cm5, Some(2.0)),
        ];

        let derived = assembler.derive(&readings);
        assert_eq!(derived.len(), 1);
        assert_eq!(derived[0].site, "TEST");
        assert_eq!(derived[0].depth, Depth::Cm5);

        let records = assembler.assemble_readings(&readings, None).unwrap();
        assert!(records.iter().all(|r| r.site != "NOPE"));
    }

    #[test]
    fn test_missing_delta_t_propagates() {
        let store = single_row_store();
        let assembler = SoilMoistureAssembler::new(&store);
        let derived = assembler.derive(&[RawSensorReading::new("TEST", Depth::Cm5, None)]);

        assert_eq!(derived.len(), 1);
        assert_eq!(derived[0].mp, None);
        assert!(derived[0].vwc.is_nan());
        assert!(derived[0].faw.is_nan());
        assert_relative_eq!(derived[0].whc, 0.20, epsilon = 1e-12);
    }

    #[test]
    fn test_one_record_per_site() {
        let store = sample_store();
        let assembler = SoilMoistureAssembler::new(&store);
        let readings: Vec<RawSensorReading> = ["ALTU", "ACME", "ADAX"]
            .iter()
            .flat_map(|site| {
                Depth::ALL
                    .iter()
                    .map(move |depth| RawSensorReading::new(*site, *depth, Some(2.5)))
            })
            .collect();

        let records = assembler.assemble_readings(&readings, None).unwrap();
        let sites: Vec<&str> = records.iter().map(|r| r.site.as_str()).collect();
        assert_eq!(sites, vec!["ACME", "ADAX", "ALTU"]);

        let adax = &records[1];
        assert!(adax.layer(Depth::Cm5).is_some());
        assert!(adax.layer(Depth::Cm60).is_none());
    }

    #[test]
    fn test_duplicate_reading_is_malformed() {
        let store = single_row_store();
        let assembler = SoilMoistureAssembler::new(&store);
        let readings = [
            RawSensorReading::new("TEST", Depth::Cm5, Some(2.0)),
            RawSensorReading::new("TEST", Depth::Cm5, Some(2.1)),
        ];

        let err = assembler.assemble_readings(&readings, None).unwrap_err();
        assert!(matches!(
            err,
            MesonetError::Feed(FeedError::DuplicateReading { .. })
        ));
        assert_eq!(err.kind(), ErrorKind::DataUnavailable);
    }

    #[test]
    fn test_station_filter() {
        let store = single_row_store();
        let assembler = SoilMoistureAssembler::new(&store);
        let readings = [
            RawSensorReading::new("TEST", Depth::Cm5, Some(2.0)),
            RawSensorReading::new("NOPE", Depth::Cm5, Some(2.0)),
        ];

        let records = assembler.assemble_readings(&readings, Some("test")).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].site, "TEST");

        // NOPE is in the feed but has no hydraulic parameters at any depth.
        let err = assembler
            .assemble_readings(&readings, Some("NOPE"))
            .unwrap_err();
        assert!(matches!(err, MesonetError::StationNotFound(ref s) if s == "NOPE"));
    }

    #[tokio::test]
    async fn test_assemble_from_feed() -> Result<(), Box<dyn std::error::Error>> {
        let store = sample_store();
        let feed = FixtureFeed::default();
        let records = SoilMoistureAssembler::new(&store)
            .assemble(&feed, Some(past_date()), None)
            .await?;

        // BOIS has no hydraulic parameters.
        let sites: Vec<&str> = records.iter().map(|r| r.site.as_str()).collect();
        assert_eq!(sites, vec!["ACME", "ADAX", "ALTU"]);
        assert_eq!(
            records[0].value(SoilVariable::MatricPotential, Depth::Cm5),
            Some(-1041.5)
        );
        assert_eq!(feed.calls(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_assemble_validates_before_fetch() {
        let store = sample_store();
        let feed = FixtureFeed::failing();
        let assembler = SoilMoistureAssembler::new(&store);

        let future = chrono::Local::now().naive_local() + chrono::Duration::days(3);
        let err = assembler.assemble(&feed, Some(future), None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = assembler
            .assemble(&feed, Some(past_date()), Some("TOOLONG"))
            .await
            .unwrap_err();
        assert!(matches!(err, MesonetError::InvalidStationCode(_)));
        assert_eq!(feed.calls(), 0);
    }

    #[tokio::test]
    async fn test_assemble_fetch_failure() {
        let store = sample_store();
        let feed = FixtureFeed::failing();
        let err = SoilMoistureAssembler::new(&store)
            .assemble(&feed, Some(past_date()), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataUnavailable);
    }
}
