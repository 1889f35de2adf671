//! Closed-form soil water relations used to turn heat-dissipation sensor readings into
//! soil moisture (Illston et al., 2008; Zhang et al., 2019).
//!
//! The functions take [`Numeric`] inputs so that missing values flow through the pipeline
//! without errors: a missing delta-T gives no matric potential, a missing retention
//! parameter gives a NaN water content.

/// Scale of the delta-T calibration curve, kPa.
pub const MP_SCALE: f64 = -2083.0;
/// Steepness of the delta-T calibration curve, 1/°C.
pub const MP_SLOPE: f64 = 3.35;
/// Delta-T at the calibration midpoint, °C.
pub const MP_MIDPOINT: f64 = 3.17;

/// A scalar input to the soil water relations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Float(f64),
    Integer(i64),
    Missing,
}

impl Numeric {
    /// The value as a float for any numeric input.
    pub fn as_number(self) -> Option<f64> {
        match self {
            Numeric::Float(v) => Some(v),
            Numeric::Integer(v) => Some(v as f64),
            Numeric::Missing => None,
        }
    }

    /// The value only if it is a float; integers are rejected.
    pub fn as_float(self) -> Option<f64> {
        match self {
            Numeric::Float(v) => Some(v),
            Numeric::Integer(_) | Numeric::Missing => None,
        }
    }
}

impl From<f64> for Numeric {
    fn from(value: f64) -> Self {
        Numeric::Float(value)
    }
}

impl From<i64> for Numeric {
    fn from(value: i64) -> Self {
        Numeric::Integer(value)
    }
}

impl From<i32> for Numeric {
    fn from(value: i32) -> Self {
        Numeric::Integer(value as i64)
    }
}

impl From<Option<f64>> for Numeric {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Numeric::Missing, Numeric::Float)
    }
}

impl From<Option<i64>> for Numeric {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Numeric::Missing, Numeric::Integer)
    }
}

/// Matric potential (kPa) from a calibrated delta-T reading (°C).
///
/// `MP = -2083 / (1 + exp(-3.35 (ΔT - 3.17)))`. Returns `None` for a missing reading.
///
/// ```
/// use mesonet_soil::matric_potential;
///
/// assert_eq!(matric_potential(3.17), Some(-1041.5));
/// assert_eq!(matric_potential(None::<f64>), None);
/// ```
pub fn matric_potential(delta_t: impl Into<Numeric>) -> Option<f64> {
    let delta_t = delta_t.into().as_number()?;
    Some(MP_SCALE / (1.0 + (-MP_SLOPE * (delta_t - MP_MIDPOINT)).exp()))
}

/// Volumetric water content (cm³/cm³) from matric potential with the van Genuchten model.
///
/// `θ = θr + (θs - θr) / (1 + (-α·MP)^n)^(1 - 1/n)`. Any missing input gives NaN.
pub fn vwc_from_mp(
    matric_potential: impl Into<Numeric>,
    theta_r: impl Into<Numeric>,
    theta_s: impl Into<Numeric>,
    alpha: impl Into<Numeric>,
    n: impl Into<Numeric>,
) -> f64 {
    let inputs = [
        matric_potential.into(),
        theta_r.into(),
        theta_s.into(),
        alpha.into(),
        n.into(),
    ];
    let [Some(mp), Some(theta_r), Some(theta_s), Some(alpha), Some(n)] =
        inputs.map(Numeric::as_number)
    else {
        return f64::NAN;
    };
    theta_r + (theta_s - theta_r) / (1.0 + (-alpha * mp).powf(n)).powf(1.0 - 1.0 / n)
}

/// Fraction of available water: `(θ - θwp) / (θfc - θwp)`.
///
/// Only float inputs are accepted; integers and missing values give NaN, as does a zero
/// denominator.
pub fn faw(
    theta: impl Into<Numeric>,
    theta_wp: impl Into<Numeric>,
    theta_fc: impl Into<Numeric>,
) -> f64 {
    let (Some(theta), Some(theta_wp), Some(theta_fc)) = (
        theta.into().as_float(),
        theta_wp.into().as_float(),
        theta_fc.into().as_float(),
    ) else {
        return f64::NAN;
    };
    let range = theta_fc - theta_wp;
    if range == 0.0 {
        return f64::NAN;
    }
    (theta - theta_wp) / range
}

/// Water holding capacity: `θfc - θwp`. Only float inputs are accepted.
pub fn whc(theta_wp: impl Into<Numeric>, theta_fc: impl Into<Numeric>) -> f64 {
    match (theta_wp.into().as_float(), theta_fc.into().as_float()) {
        (Some(theta_wp), Some(theta_fc)) => theta_fc - theta_wp,
        _ => f64::NAN,
    }
}
