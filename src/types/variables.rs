use crate::error::MesonetError;
use std::fmt;
use std::str::FromStr;

/// Selects which groups of daily variables a summary contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Variables {
    /// Temperature, humidity, precipitation, radiation and wind speed.
    Weather,
    /// FC, WP, WHC, VWC, FAW, MP and Ks at 5, 25 and 60 cm.
    SoilMoisture,
    /// Temperatures under bare soil and native vegetation.
    SoilTemperature,
    /// Everything above, joined on station.
    #[default]
    All,
}

impl Variables {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variables::Weather => "weather",
            Variables::SoilMoisture => "soil_moist",
            Variables::SoilTemperature => "soil_temp",
            Variables::All => "all",
        }
    }
}

impl FromStr for Variables {
    type Err = MesonetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weather" => Ok(Variables::Weather),
            "soil_moist" => Ok(Variables::SoilMoisture),
            "soil_temp" => Ok(Variables::SoilTemperature),
            "all" => Ok(Variables::All),
            other => Err(MesonetError::UnknownVariables(other.to_string())),
        }
    }
}

impl fmt::Display for Variables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
