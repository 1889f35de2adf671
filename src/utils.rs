use polars::prelude::{col, lit, when, DataType, Expr, NULL};
use std::path::PathBuf;

pub(crate) const SITE_COLUMN: &str = "Site";
pub(crate) const DATE_COLUMN: &str = "Date";

const DATA_DIR_NAME: &str = "mesonet_soil";
const HYDRAULIC_PARAMS_FILE_NAME: &str = "MesoSoilv2_1.csv";
const HYDRAULIC_PARAMS_ENV: &str = "MESONET_SOIL_HYDRAULIC_PARAMS";

/// Location of the hydraulic parameter dataset used by [`crate::Mesonet::new`].
///
/// `MESONET_SOIL_HYDRAULIC_PARAMS` takes precedence, otherwise the file is expected in the
/// user's data directory (e.g. `~/.local/share/mesonet_soil/MesoSoilv2_1.csv` on Linux).
pub fn default_hydraulic_params_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(HYDRAULIC_PARAMS_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::data_dir().map(|p| p.join(DATA_DIR_NAME).join(HYDRAULIC_PARAMS_FILE_NAME))
}

/// Casts column `name` to `Float64`, replacing any of the `sentinels` with null.
pub(crate) fn null_sentinels(name: &str, sentinels: &[f64]) -> Expr {
    let value = col(name).cast(DataType::Float64);
    let is_sentinel = sentinels
        .iter()
        .map(|sentinel| value.clone().eq(lit(*sentinel)))
        .reduce(|acc, matches| acc.or(matches))
        .unwrap_or(lit(false));
    when(is_sentinel)
        .then(lit(NULL))
        .otherwise(value)
        .alias(name)
}
