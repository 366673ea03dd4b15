//! Market beta factor - systematic risk exposure.
//!
//! Beta measures the sensitivity of a security's returns to market returns:
//! `β = Cov(R_i, R_m) / Var(R_m)`
//!
//! Higher beta indicates greater systematic risk. Beta = 1 means the security
//! moves in line with the market. Beta > 1 indicates amplified market movements.

use crate::{
    Result,
    asset::Asset,
    columns::ColumnRef,
    registry::FactorCategory,
    traits::{ConfigurableFactor, Factor},
    window::FactorInputs,
};
use chrono::NaiveDate;
use ndarray::{ArrayView1, ArrayViewMut1, Zip};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static INPUTS: LazyLock<Vec<ColumnRef>> = LazyLock::new(|| {
    vec![
        ColumnRef::pricing("returns"),
        ColumnRef::pricing("market_return"),
    ]
});

/// Configuration for the SimpleBeta factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimpleBetaConfig {
    /// Number of daily returns regressed (default: 244)
    pub window_length: usize,
    /// Fraction of the window allowed to be missing (default: 0.25)
    pub allowed_missing_percentage: f64,
}

impl Default for SimpleBetaConfig {
    fn default() -> Self {
        Self {
            window_length: 244,
            allowed_missing_percentage: 0.25,
        }
    }
}

/// Market beta factor.
///
/// Regresses each asset's daily returns on the benchmark's over the window.
/// A day is dropped when either return is missing; if more than
/// `allowed_missing_percentage` of the window is dropped the output is
/// missing.
///
/// # Inputs
/// - `returns`: asset daily returns
/// - `market_return`: benchmark daily return, repeated in every asset column
#[derive(Debug, Clone, Default)]
pub struct SimpleBeta {
    config: SimpleBetaConfig,
}

impl SimpleBeta {
    fn allowed_missing(&self) -> usize {
        (self.config.allowed_missing_percentage * self.config.window_length as f64) as usize
    }
}

/// OLS slope of `dependent` on `independent` over rows where both are finite.
fn beta(
    dependent: ArrayView1<'_, f64>,
    independent: ArrayView1<'_, f64>,
    allowed_missing: usize,
) -> f64 {
    let pairs: Vec<(f64, f64)> = dependent
        .iter()
        .zip(independent.iter())
        .filter(|(y, x)| y.is_finite() && x.is_finite())
        .map(|(y, x)| (*y, *x))
        .collect();
    if pairs.is_empty() || dependent.len() - pairs.len() > allowed_missing {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let x_mean = pairs.iter().map(|(_, x)| x).sum::<f64>() / n;
    let y_mean = pairs.iter().map(|(y, _)| y).sum::<f64>() / n;
    let (cov, var) = pairs.iter().fold((0.0, 0.0), |(cov, var), (y, x)| {
        let dx = x - x_mean;
        (cov + dx * (y - y_mean), var + dx * dx)
    });
    cov / var
}

impl Factor for SimpleBeta {
    fn name(&self) -> &str {
        "beta"
    }

    fn description(&self) -> &str {
        "Slope of asset daily returns regressed on benchmark daily returns"
    }

    fn category(&self) -> FactorCategory {
        FactorCategory::Volatility
    }

    fn inputs(&self) -> &[ColumnRef] {
        &INPUTS
    }

    fn window_length(&self) -> usize {
        self.config.window_length
    }

    fn compute(
        &self,
        _today: NaiveDate,
        _assets: &[Asset],
        inputs: &FactorInputs,
        out: ArrayViewMut1<'_, f64>,
    ) -> Result<()> {
        let returns = inputs.values(0)?;
        let market = inputs.values(1)?;
        let allowed_missing = self.allowed_missing();

        Zip::from(out)
            .and(returns.columns())
            .and(market.columns())
            .for_each(|out, asset, benchmark| *out = beta(asset, benchmark, allowed_missing));
        Ok(())
    }
}

impl ConfigurableFactor for SimpleBeta {
    type Config = SimpleBetaConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
