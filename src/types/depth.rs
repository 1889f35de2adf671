//! Installation depths of the Mesonet soil sensors and the variables reported per depth
//! in the wide soil-moisture table.

use std::fmt;
use std::fmt::{Display, Formatter};

/// Sensor installation depth. The Mesonet only reports soil moisture at these three depths.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub enum Depth {
    Cm5,
    Cm25,
    Cm60,
}

impl Depth {
    pub const ALL: [Depth; 3] = [Depth::Cm5, Depth::Cm25, Depth::Cm60];

    pub fn from_cm(cm: i64) -> Option<Depth> {
        match cm {
            5 => Some(Depth::Cm5),
            25 => Some(Depth::Cm25),
            60 => Some(Depth::Cm60),
            _ => None,
        }
    }

    pub fn cm(self) -> i64 {
        match self {
            Depth::Cm5 => 5,
            Depth::Cm25 => 25,
            Depth::Cm60 => 60,
        }
    }

    /// Two-digit suffix used in column names, e.g. `05` in `FC05`.
    pub fn suffix(self) -> &'static str {
        match self {
            Depth::Cm5 => "05",
            Depth::Cm25 => "25",
            Depth::Cm60 => "60",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Depth::Cm5 => 0,
            Depth::Cm25 => 1,
            Depth::Cm60 => 2,
        }
    }
}

impl Display for Depth {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} cm", self.cm())
    }
}

/// Per-depth variables of a [`crate::WideSoilMoistureRecord`], in column order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SoilVariable {
    /// Field capacity (`Th33`).
    FieldCapacity,
    /// Wilting point (`Th1500`).
    WiltingPoint,
    WaterHoldingCapacity,
    VolumetricWaterContent,
    FractionAvailableWater,
    MatricPotential,
    /// Saturated hydraulic conductivity.
    Ks,
}

impl SoilVariable {
    pub const ALL: [SoilVariable; 7] = [
        SoilVariable::FieldCapacity,
        SoilVariable::WiltingPoint,
        SoilVariable::WaterHoldingCapacity,
        SoilVariable::VolumetricWaterContent,
        SoilVariable::FractionAvailableWater,
        SoilVariable::MatricPotential,
        SoilVariable::Ks,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            SoilVariable::FieldCapacity => "FC",
            SoilVariable::WiltingPoint => "WP",
            SoilVariable::WaterHoldingCapacity => "WHC",
            SoilVariable::VolumetricWaterContent => "VWC",
            SoilVariable::FractionAvailableWater => "FAW",
            SoilVariable::MatricPotential => "MP",
            SoilVariable::Ks => "Ks",
        }
    }

    /// Wide column name for this variable at `depth`, e.g. `VWC25`.
    pub fn column_name(self, depth: Depth) -> String {
        format!("{}{}", self.prefix(), depth.suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_from_cm() {
        assert_eq!(Depth::from_cm(5), Some(Depth::Cm5));
        assert_eq!(Depth::from_cm(60), Some(Depth::Cm60));
        assert_eq!(Depth::from_cm(10), None);
        assert_eq!(Depth::from_cm(999), None);
    }

    #[test]
    fn test_column_names() {
        assert_eq!(SoilVariable::FieldCapacity.column_name(Depth::Cm5), "FC05");
        assert_eq!(SoilVariable::Ks.column_name(Depth::Cm60), "Ks60");
        assert_eq!(
            SoilVariable::VolumetricWaterContent.column_name(Depth::Cm25),
            "VWC25"
        );
    }
}
