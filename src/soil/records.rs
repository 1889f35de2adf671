use crate::soil::hydraulic_params::HydraulicParameterRow;
use crate::types::depth::{Depth, SoilVariable};
use crate::utils::SITE_COLUMN;
use polars::prelude::*;

/// A sensor reading joined with the hydraulic parameters of its site and depth, plus the
/// quantities derived from both.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedSoilMoistureRow {
    pub site: String,
    pub depth: Depth,
    pub delta_t: Option<f64>,
    pub parameters: HydraulicParameterRow,
    /// Matric potential, kPa. `None` when delta-T was missing.
    pub mp: Option<f64>,
    pub vwc: f64,
    pub faw: f64,
    pub whc: f64,
}

/// Derived values at one depth of a [`WideSoilMoistureRecord`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoilLayer {
    pub fc: Option<f64>,
    pub wp: Option<f64>,
    pub whc: f64,
    pub vwc: f64,
    pub faw: f64,
    pub mp: Option<f64>,
    pub ks: Option<f64>,
}

impl From<&DerivedSoilMoistureRow> for SoilLayer {
    fn from(row: &DerivedSoilMoistureRow) -> Self {
        Self {
            fc: row.parameters.th33,
            wp: row.parameters.th1500,
            whc: row.whc,
            vwc: row.vwc,
            faw: row.faw,
            mp: row.mp,
            ks: row.parameters.ks,
        }
    }
}

impl SoilLayer {
    pub fn value(&self, variable: SoilVariable) -> Option<f64> {
        match variable {
            SoilVariable::FieldCapacity => self.fc,
            SoilVariable::WiltingPoint => self.wp,
            SoilVariable::WaterHoldingCapacity => Some(self.whc),
            SoilVariable::VolumetricWaterContent => Some(self.vwc),
            SoilVariable::FractionAvailableWater => Some(self.faw),
            SoilVariable::MatricPotential => self.mp,
            SoilVariable::Ks => self.ks,
        }
    }
}

/// Soil moisture of one site with a layer per sensor depth.
///
/// A layer is `None` when the site had no hydraulic parameters for that depth.
#[derive(Debug, Clone, PartialEq)]
pub struct WideSoilMoistureRecord {
    pub site: String,
    pub layers: [Option<SoilLayer>; 3],
}

impl WideSoilMoistureRecord {
    pub fn new(site: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            layers: [None; 3],
        }
    }

    pub fn layer(&self, depth: Depth) -> Option<&SoilLayer> {
        self.layers[depth.index()].as_ref()
    }

    /// The value of the `{variable}{depth}` column, e.g. `FC05`.
    pub fn value(&self, variable: SoilVariable, depth: Depth) -> Option<f64> {
        self.layer(depth).and_then(|layer| layer.value(variable))
    }
}

/// Renders the wide records as a table: `Site`, then every variable at 5, 25 and 60 cm
/// (`FC05`, `FC25`, `FC60`, `WP05`, ... `Ks60`).
pub fn records_to_frame(records: &[WideSoilMoistureRecord]) -> PolarsResult<DataFrame> {
    let mut columns = Vec::with_capacity(1 + SoilVariable::ALL.len() * Depth::ALL.len());
    columns.push(Column::new(
        SITE_COLUMN.into(),
        records.iter().map(|r| r.site.as_str()).collect::<Vec<_>>(),
    ));

    for variable in SoilVariable::ALL {
        for depth in Depth::ALL {
            let values: Vec<Option<f64>> = records
                .iter()
                .map(|record| record.value(variable, depth))
                .collect();
            columns.push(Column::new(variable.column_name(depth).into(), values));
        }
    }
    DataFrame::new(columns)
}
