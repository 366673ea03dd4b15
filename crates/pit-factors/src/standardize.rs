//! Cross-sectional standardization of factor frames.
//!
//! Cross-sectional standardization is essential for comparing factor exposures
//! across different securities and factors. Every function here works on a
//! frame such as the output of
//! [`FactorRegistry::compute_all`](crate::FactorRegistry::compute_all): each
//! `f64` column is treated as one cross-section and other columns pass
//! through. NaN and null are missing; they are left out of the statistics and
//! come back as NaN.

use crate::{FactorError, Result};
use derive_more::Display;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// MAD scaling factor for consistency with normal distribution
const MAD_SCALE: f64 = 1.4826;

/// How [`standardize_frame`] centers and scales a cross-section.
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Standardization {
    /// `(x - mean) / std`, population standard deviation
    #[default]
    ZScore,
    /// `(x - median) / (1.4826 * MAD)`, less sensitive to outliers
    Robust,
}

/// Standardize every `f64` column of a factor frame.
///
/// A constant cross-section maps to zeros.
pub fn standardize_frame(df: &DataFrame, method: Standardization) -> Result<DataFrame> {
    let exprs = factor_columns(df)
        .into_iter()
        .map(|name| {
            let x = missing_as_null(&name);
            let standardized = match method {
                Standardization::ZScore => scaled(x.clone(), x.clone().mean(), x.std(0)),
                Standardization::Robust => {
                    let median = x.clone().median();
                    let mad = (x.clone() - median.clone()).abs().median() * lit(MAD_SCALE);
                    scaled(x, median, mad)
                }
            };
            standardized.fill_null(lit(f64::NAN)).alias(name)
        })
        .collect::<Vec<_>>();

    Ok(df.clone().lazy().with_columns(exprs).collect()?)
}

/// Winsorization for outlier handling.
///
/// Clips every `f64` column to its `lower_pct` and `upper_pct` quantiles
/// (linear interpolation), e.g. 0.01 and 0.99.
pub fn winsorize_frame(df: &DataFrame, lower_pct: f64, upper_pct: f64) -> Result<DataFrame> {
    let unit = 0.0..=1.0;
    if !unit.contains(&lower_pct) || !unit.contains(&upper_pct) || lower_pct > upper_pct {
        return Err(FactorError::InvalidConfig(format!(
            "winsorize bounds {lower_pct}..{upper_pct} outside 0..=1"
        )));
    }

    let exprs = factor_columns(df)
        .into_iter()
        .map(|name| {
            let x = missing_as_null(&name);
            let lower = x.clone().quantile(lit(lower_pct), QuantileMethod::Linear);
            let upper = x.clone().quantile(lit(upper_pct), QuantileMethod::Linear);
            when(x.clone().lt(lower.clone()))
                .then(lower)
                .when(x.clone().gt(upper.clone()))
                .then(upper)
                .otherwise(x)
                .fill_null(lit(f64::NAN))
                .alias(name)
        })
        .collect::<Vec<_>>();

    Ok(df.clone().lazy().with_columns(exprs).collect()?)
}

fn factor_columns(df: &DataFrame) -> Vec<PlSmallStr> {
    df.get_columns()
        .iter()
        .filter(|column| column.dtype() == &DataType::Float64)
        .map(|column| column.name().clone())
        .collect()
}

fn missing_as_null(name: &PlSmallStr) -> Expr {
    col(name.clone()).fill_nan(lit(Null {}))
}

/// `(x - center) / scale`, zero where the scale vanishes.
fn scaled(x: Expr, center: Expr, scale: Expr) -> Expr {
    when(x.clone().is_null())
        .then(lit(f64::NAN))
        .when(scale.clone().gt(lit(0.0)))
        .then((x - center) / scale)
        .otherwise(lit(0.0))
}
