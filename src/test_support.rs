//! Offline fixtures shared by the unit tests.

use crate::feed::error::FeedError;
use crate::feed::mdf::parse_mdf;
use crate::feed::MesonetFeed;
use crate::soil::hydraulic_params::HydraulicParameterStore;
use crate::stations::directory::StationDirectory;
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};

/// 00:00 observation file with calibrated delta-T columns.
pub const SENSOR_MDF: &str = "  101 ! (c) 2024 Oklahoma Climatological Survey and the Oklahoma Mesonet - all rights reserved
 24 2024 03 15 00 00 00
 STID  STNM  TIME   RELH   TAIR   WSPD   TR05   TR25   TR60
 ACME   110     0     80   10.2    3.1   3.17   2.05   1.62
 ADAX     1     0     75   11.0    2.4   2.80   2.41   -998
 ALTU     2     0     60    9.5    4.8   4.10   3.30   2.95
 BOIS     3     0     55    5.0    6.2   1.90   1.75   1.80
";

/// Daily summary file.
pub const DAILY_MDF: &str = "  101 ! (c) 2024 Oklahoma Climatological Survey and the Oklahoma Mesonet - all rights reserved
 24 2024 03 15 00 00 00
 STID  STNM  TMAX  TMIN  TAVG  HMAX  HMIN  HAVG  RAIN   ATOT  WSPD  BMIN  BMAX  SMAX  SMIN  S5MN  S5MX
 ACME   110  21.3   4.2  12.1  94.0  31.0  62.3  0.00  18.52   3.4   8.1  17.2  14.9   9.0   9.4  15.1
 ADAX     1  19.8   6.5  13.0  97.0  40.0  70.1  0.25  15.10   2.9   9.6  16.8  14.2  10.3  10.8  16.4
 ALTU     2  23.4   3.1  13.5  88.0  22.0  51.7  -996  20.04   4.6   7.4  19.9  16.0   8.2   8.8  17.3
 BOIS     3  -999  -3.2   4.0  90.0  35.0  60.2  0.00  19.77   5.8   1.2  10.4   8.7   2.5   2.9   9.6
";

/// Station metadata export.
pub const STATION_CSV: &str = "stnm,stid,name,city,cnty,nlat,elon,elev,cdiv,rang,cdir,clas,datc,datd,TEXT5,TEXT10,TEXT25,TEXT60,TEXT75,WCR05
110,ACME,Acme,Rush Springs,Grady,34.80833,-98.02325,397,Southwest Central,2.0,SE,Rural,19940101,20991231,Loam,Loam,Clay Loam,Clay Loam,Clay Loam,0.35
1,ADAX,Ada,Ada,Pontotoc,34.79851,-96.66909,295,South Central,1.0,SW,Rural,19940101,20991231,Silt Loam,Silt Loam,Silty Clay Loam,Silty Clay,Silty Clay,0.41
2,ALTU,Altus,Altus,Jackson,34.58722,-99.33808,416,Southwest,3.0,N,Rural,19940101,20991231,Clay Loam,Clay Loam,Clay,Clay,Clay,0.44
3,BOIS,Boise City,Boise City,Cimarron,36.69256,-102.49713,1267,Panhandle,1.5,E,Rural,19940101,20991231,Sandy Loam,Sandy Loam,Loam,Loam,Loam,0.22
";

/// Hydraulic parameters for ACME (all depths), ADAX (5 and 25 cm) and ALTU (all depths,
/// missing Ks at 60 cm). BOIS has none.
pub const HYDRAULIC_CSV: &str = "Site,Depth,Sand,Silt,Clay,BulkD,Th33,Th1500,Theta_r,Theta_s,Alpha,N,Ks
ACME,5,40.0,40.0,20.0,1.40,0.30,0.10,0.05,0.45,0.02,1.3,1.0
ACME,25,35.0,38.0,27.0,1.45,0.33,0.15,0.06,0.43,0.015,1.35,0.8
ACME,60,30.0,35.0,35.0,1.50,0.36,0.20,0.07,0.42,0.012,1.25,0.5
ADAX,5,20.0,60.0,20.0,1.35,0.32,0.12,0.04,0.46,0.01,1.4,2.1
ADAX,25,15.0,55.0,30.0,1.42,0.35,0.18,0.05,0.44,0.009,1.3,1.2
ALTU,5,25.0,40.0,35.0,1.38,0.34,0.19,0.06,0.47,0.018,1.2,0.9
ALTU,25,20.0,35.0,45.0,1.44,0.38,0.24,0.07,0.45,0.014,1.18,0.4
ALTU,60,18.0,32.0,50.0,1.52,0.40,0.27,0.08,0.44,0.011,1.15,-9.9
";

pub fn sample_store() -> HydraulicParameterStore {
    HydraulicParameterStore::from_csv_bytes(HYDRAULIC_CSV.as_bytes())
        .expect("hydraulic fixture parses")
}

pub fn station_frame() -> DataFrame {
    CsvReadOptions::default()
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(STATION_CSV.as_bytes().to_vec()))
        .finish()
        .expect("station fixture parses")
}

pub fn station_directory() -> StationDirectory {
    StationDirectory::from_frame(station_frame()).expect("station fixture is complete")
}

/// A date well inside the network's record.
pub fn past_date() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 15)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid fixture date")
}

/// [`MesonetFeed`] serving the fixtures above for every date, counting requests.
#[derive(Debug, Default)]
pub struct FixtureFeed {
    fail: bool,
    calls: AtomicUsize,
}

impl FixtureFeed {
    /// A feed whose every request fails as if the service were unreachable.
    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of requests made so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn serve(&self, source: &str) -> Result<(), FeedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(FeedError::MissingHeader {
                url: source.to_string(),
            });
        }
        Ok(())
    }
}

impl MesonetFeed for FixtureFeed {
    async fn sensor_frame(&self, _date: NaiveDate) -> Result<DataFrame, FeedError> {
        self.serve("fixture sensor file")?;
        parse_mdf(SENSOR_MDF, "fixture sensor file")
    }

    async fn daily_frame(&self, _date: NaiveDate) -> Result<DataFrame, FeedError> {
        self.serve("fixture daily file")?;
        parse_mdf(DAILY_MDF, "fixture daily file")
    }

    async fn station_frame(&self) -> Result<DataFrame, FeedError> {
        self.serve("fixture station export")?;
        Ok(station_frame())
    }
}
