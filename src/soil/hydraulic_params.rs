//! Soil hydraulic parameters for each Mesonet site and sensor depth (Scott et al., 2013).
//!
//! The dataset is loaded once and never mutated. Lookups mirror the public
//! `hydraulic_params` retrieval, including its fallback for unsupported depths, which is
//! reported through [`HydraulicLookup::DepthFallback`] rather than hidden.

use crate::error::MesonetError;
use crate::soil::error::HydraulicParamsError;
use crate::types::depth::Depth;
use crate::utils::{null_sentinels, SITE_COLUMN};
use polars::prelude::*;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

/// Value used by the dataset for missing parameters.
pub const HYDRAULIC_MISSING_SENTINEL: f64 = -9.9;
const HYDRAULIC_MISSING_TEXT: &str = "-9.9";

const DEPTH_COLUMN: &str = "Depth";
const PARAMETER_COLUMNS: [&str; 11] = [
    "Sand", "Silt", "Clay", "BulkD", "Th33", "Th1500", "Theta_r", "Theta_s", "Alpha", "N", "Ks",
];

/// Texture, bulk density, retention and conductivity parameters for one site and depth.
#[derive(Debug, Clone, PartialEq)]
pub struct HydraulicParameterRow {
    pub site: String,
    pub depth: Depth,
    /// Sand fraction, %.
    pub sand: Option<f64>,
    /// Silt fraction, %.
    pub silt: Option<f64>,
    /// Clay fraction, %.
    pub clay: Option<f64>,
    /// Bulk density, g/cm³.
    pub bulk_density: Option<f64>,
    /// Water content at -33 kPa (field capacity).
    pub th33: Option<f64>,
    /// Water content at -1500 kPa (wilting point).
    pub th1500: Option<f64>,
    pub theta_r: Option<f64>,
    pub theta_s: Option<f64>,
    pub alpha: Option<f64>,
    pub n: Option<f64>,
    /// Saturated hydraulic conductivity, cm/day.
    pub ks: Option<f64>,
}

/// Result of [`HydraulicParameterStore::lookup`].
#[derive(Debug, Clone, PartialEq)]
pub enum HydraulicLookup {
    /// Rows matching every filter that was given.
    Found(Vec<HydraulicParameterRow>),
    /// The requested depth does not exist for the selection, so the depth filter was dropped.
    DepthFallback {
        requested: i64,
        rows: Vec<HydraulicParameterRow>,
    },
}

impl HydraulicLookup {
    pub fn rows(&self) -> &[HydraulicParameterRow] {
        match self {
            HydraulicLookup::Found(rows) | HydraulicLookup::DepthFallback { rows, .. } => rows,
        }
    }

    pub fn into_rows(self) -> Vec<HydraulicParameterRow> {
        match self {
            HydraulicLookup::Found(rows) | HydraulicLookup::DepthFallback { rows, .. } => rows,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, HydraulicLookup::DepthFallback { .. })
    }

    /// The selected rows as a table with the dataset's column names.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        rows_to_frame(self.rows())
    }
}

/// Immutable table of [`HydraulicParameterRow`]s with at most one row per site and depth.
#[derive(Debug, Clone, Default)]
pub struct HydraulicParameterStore {
    rows: Vec<HydraulicParameterRow>,
    index: HashMap<(String, Depth), usize>,
}

impl HydraulicParameterStore {
    /// Builds a store from rows, rejecting duplicate (site, depth) keys. Site codes are
    /// upper-cased.
    pub fn from_rows(
        rows: impl IntoIterator<Item = HydraulicParameterRow>,
    ) -> Result<Self, HydraulicParamsError> {
        let mut store = Self::default();
        for mut row in rows {
            row.site = row.site.to_uppercase();
            let key = (row.site.clone(), row.depth);
            if store.index.contains_key(&key) {
                return Err(HydraulicParamsError::DuplicateRow {
                    site: row.site,
                    depth: row.depth.cm(),
                });
            }
            store.index.insert(key, store.rows.len());
            store.rows.push(row);
        }
        Ok(store)
    }

    /// Loads the dataset from a CSV file.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, HydraulicParamsError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(HydraulicParamsError::NotFound(path.to_path_buf()));
        }

        let frame = csv_options()
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .and_then(|reader| reader.finish())
            .map_err(|e| HydraulicParamsError::Read(path.to_path_buf(), e))?;
        Self::from_frame(frame)
    }

    /// Loads the dataset from CSV text already in memory.
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self, HydraulicParamsError> {
        let frame = csv_options()
            .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
            .finish()
            .map_err(HydraulicParamsError::Parse)?;
        Self::from_frame(frame)
    }

    fn from_frame(raw: DataFrame) -> Result<Self, HydraulicParamsError> {
        if let Some(missing) = [SITE_COLUMN, DEPTH_COLUMN]
            .iter()
            .chain(PARAMETER_COLUMNS.iter())
            .find(|name| raw.column(name).is_err())
        {
            return Err(HydraulicParamsError::MissingColumn(missing.to_string()));
        }

        let mut exprs = vec![
            col(SITE_COLUMN).cast(DataType::String),
            col(DEPTH_COLUMN).cast(DataType::Int64),
        ];
        exprs.extend(
            PARAMETER_COLUMNS
                .iter()
                .map(|name| null_sentinels(name, &[HYDRAULIC_MISSING_SENTINEL])),
        );
        let frame = raw.lazy().select(exprs).collect()?;

        let sites = frame.column(SITE_COLUMN)?.str()?;
        let depths = frame.column(DEPTH_COLUMN)?.i64()?;
        let mut values = Vec::with_capacity(PARAMETER_COLUMNS.len());
        for name in PARAMETER_COLUMNS {
            values.push(frame.column(name)?.f64()?);
        }

        let mut rows = Vec::with_capacity(frame.height());
        for idx in 0..frame.height() {
            let site = sites
                .get(idx)
                .ok_or(HydraulicParamsError::MissingSite { row: idx })?;
            let depth = depths.get(idx);
            let depth = depth
                .and_then(Depth::from_cm)
                .ok_or_else(|| HydraulicParamsError::InvalidDepth {
                    site: site.to_string(),
                    depth,
                })?;
            let value = |column: usize| values[column].get(idx);

            rows.push(HydraulicParameterRow {
                site: site.to_string(),
                depth,
                sand: value(0),
                silt: value(1),
                clay: value(2),
                bulk_density: value(3),
                th33: value(4),
                th1500: value(5),
                theta_r: value(6),
                theta_s: value(7),
                alpha: value(8),
                n: value(9),
                ks: value(10),
            });
        }
        Self::from_rows(rows)
    }

    /// The row for `site` (already upper-cased) at `depth`.
    pub fn get(&self, site: &str, depth: Depth) -> Option<&HydraulicParameterRow> {
        self.index
            .get(&(site.to_string(), depth))
            .map(|idx| &self.rows[*idx])
    }

    /// Rows filtered by site and/or depth (in cm).
    ///
    /// A depth that does not exist for the selection is ignored and reported as
    /// [`HydraulicLookup::DepthFallback`].
    ///
    /// # Errors
    ///
    /// [`MesonetError::UnknownHydraulicSite`] when `site` is not in the dataset.
    pub fn lookup(
        &self,
        site: Option<&str>,
        depth: Option<i64>,
    ) -> Result<HydraulicLookup, MesonetError> {
        let selection: Vec<&HydraulicParameterRow> = match site {
            Some(site) => {
                let site = site.to_uppercase();
                let rows: Vec<_> = self.rows.iter().filter(|row| row.site == site).collect();
                if rows.is_empty() {
                    return Err(MesonetError::UnknownHydraulicSite(site));
                }
                rows
            }
            None => self.rows.iter().collect(),
        };

        let Some(requested) = depth else {
            return Ok(HydraulicLookup::Found(selection.into_iter().cloned().collect()));
        };
        let at_depth: Vec<HydraulicParameterRow> = selection
            .iter()
            .filter(|row| row.depth.cm() == requested)
            .map(|row| (*row).clone())
            .collect();
        if at_depth.is_empty() {
            return Ok(HydraulicLookup::DepthFallback {
                requested,
                rows: selection.into_iter().cloned().collect(),
            });
        }
        Ok(HydraulicLookup::Found(at_depth))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[HydraulicParameterRow] {
        &self.rows
    }
}

fn csv_options() -> CsvReadOptions {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .with_parse_options(CsvParseOptions::default().with_null_values(Some(
            NullValues::AllColumns(vec![HYDRAULIC_MISSING_TEXT.into()]),
        )))
}

fn rows_to_frame(rows: &[HydraulicParameterRow]) -> PolarsResult<DataFrame> {
    let parameter = |f: fn(&HydraulicParameterRow) -> Option<f64>| -> Vec<Option<f64>> {
        rows.iter().map(f).collect()
    };
    let values = [
        parameter(|r| r.sand),
        parameter(|r| r.silt),
        parameter(|r| r.clay),
        parameter(|r| r.bulk_density),
        parameter(|r| r.th33),
        parameter(|r| r.th1500),
        parameter(|r| r.theta_r),
        parameter(|r| r.theta_s),
        parameter(|r| r.alpha),
        parameter(|r| r.n),
        parameter(|r| r.ks),
    ];

    let mut columns = Vec::with_capacity(2 + PARAMETER_COLUMNS.len());
    columns.push(Column::new(
        SITE_COLUMN.into(),
        rows.iter().map(|r| r.site.as_str()).collect::<Vec<_>>(),
    ));
    columns.push(Column::new(
        DEPTH_COLUMN.into(),
        rows.iter().map(|r| r.depth.cm()).collect::<Vec<_>>(),
    ));
    for (name, values) in PARAMETER_COLUMNS.iter().zip(values) {
        columns.push(Column::new((*name).into(), values));
    }
    DataFrame::new(columns)
}
