//! Annualized volatility of daily returns.

use crate::{
    Result,
    asset::Asset,
    columns::ColumnRef,
    registry::FactorCategory,
    stats::nanstd,
    traits::{ConfigurableFactor, Factor},
    window::FactorInputs,
};
use chrono::NaiveDate;
use ndarray::{ArrayViewMut1, Zip};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static INPUTS: LazyLock<Vec<ColumnRef>> = LazyLock::new(|| vec![ColumnRef::pricing("returns")]);

/// Configuration for annualized volatility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnualizedVolatilityConfig {
    /// Number of daily returns in the window (default: 244)
    pub window_length: usize,
    /// Trading days per year (default: 244)
    pub annualization_factor: f64,
}

impl Default for AnnualizedVolatilityConfig {
    fn default() -> Self {
        Self {
            window_length: 244,
            annualization_factor: 244.0,
        }
    }
}

/// Annualized volatility factor - total risk.
///
/// ```text
/// out = std(returns) * sqrt(annualization_factor)
/// ```
///
/// Population standard deviation over the finite returns in the window.
#[derive(Debug, Clone, Default)]
pub struct AnnualizedVolatility {
    config: AnnualizedVolatilityConfig,
}

impl Factor for AnnualizedVolatility {
    fn name(&self) -> &str {
        "annualized_volatility"
    }

    fn description(&self) -> &str {
        "Standard deviation of daily returns scaled to one year"
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
        let scale = self.config.annualization_factor.sqrt();
        Zip::from(out)
            .and(returns.columns())
            .for_each(|out, column| *out = nanstd(column) * scale);
        Ok(())
    }
}

impl ConfigurableFactor for AnnualizedVolatility {
    type Config = AnnualizedVolatilityConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::InputWindow;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_annualized_volatility() {
        let factor = AnnualizedVolatility::with_config(AnnualizedVolatilityConfig {
            window_length: 4,
            annualization_factor: 4.0,
        });
        let returns = array![[0.01, 0.0], [-0.01, 0.0], [0.01, 0.0], [-0.01, 0.0]];
        let inputs = FactorInputs::from(vec![InputWindow::Values(returns)]);
        let assets = vec![Asset::new(1u64, "A"), Asset::new(2u64, "B")];

        let out = factor
            .evaluate(NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(), &assets, &inputs)
            .unwrap();

        assert_relative_eq!(out[0], 0.02, epsilon = 1e-12);
        assert_relative_eq!(out[1], 0.0);
    }
}
