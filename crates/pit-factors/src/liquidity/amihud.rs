//! Amihud illiquidity factor.
//!
//! Measures price impact of trading through the relationship between
//! absolute returns and traded amount.

use crate::{
    Result,
    asset::Asset,
    columns::ColumnRef,
    registry::FactorCategory,
    stats::nanmean,
    traits::{ConfigurableFactor, Factor},
    window::FactorInputs,
};
use chrono::NaiveDate;
use ndarray::{ArrayViewMut1, Zip};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static INPUTS: LazyLock<Vec<ColumnRef>> =
    LazyLock::new(|| vec![ColumnRef::pricing("returns"), ColumnRef::pricing("amount")]);

/// Configuration for the Illiquidity factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IlliquidityConfig {
    /// Number of days to average illiquidity over (default: 20)
    pub window_length: usize,
}

impl Default for IlliquidityConfig {
    fn default() -> Self {
        Self { window_length: 20 }
    }
}

/// Amihud illiquidity factor.
///
/// Average ratio of absolute daily return to traded amount. This measures the
/// price impact per unit of currency traded.
///
/// # Interpretation
///
/// - **Higher values**: More illiquid, larger price impact per unit traded
/// - **Lower values**: More liquid, smaller price impact per unit traded
///
/// # Computation
///
/// 1. `illiq_t = |return_t| / amount_t` for each day in the window
/// 2. Average over the window, skipping non-finite days (suspensions,
///    zero amount)
///
/// Assets without a single usable day report 0.
///
/// # References
///
/// - Amihud, Y. (2002). "Illiquidity and stock returns: cross-section and
///   time-series effects," Journal of Financial Markets 5, 31-56.
#[derive(Debug, Clone, Default)]
pub struct Illiquidity {
    config: IlliquidityConfig,
}

impl Factor for Illiquidity {
    fn name(&self) -> &str {
        "illiquidity"
    }

    fn description(&self) -> &str {
        "Average ratio of absolute daily return to traded amount"
    }

    fn category(&self) -> FactorCategory {
        FactorCategory::Liquidity
    }

    fn inputs(&self) -> &[ColumnRef] {
        &INPUTS
    }

    fn window_length(&self) -> usize {
        self.config.window_length
    }

    fn missing_value(&self) -> f64 {
        0.0
    }

    fn compute(
        &self,
        _today: NaiveDate,
        _assets: &[Asset],
        inputs: &FactorInputs,
        out: ArrayViewMut1<'_, f64>,
    ) -> Result<()> {
        let returns = inputs.values(0)?;
        let amount = inputs.values(1)?;
        let daily = Zip::from(&returns)
            .and(&amount)
            .map_collect(|r, a| r.abs() / a);

        Zip::from(out)
            .and(daily.columns())
            .for_each(|out, column| *out = nanmean(column));
        Ok(())
    }
}

impl ConfigurableFactor for Illiquidity {
    type Config = IlliquidityConfig;

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
    fn test_illiquidity_mean_skips_bad_days() {
        let factor = Illiquidity::with_config(IlliquidityConfig { window_length: 3 });
        let returns = array![[0.02, f64::NAN], [-0.04, f64::NAN], [0.01, 0.05]];
        let amount = array![[1e6, 1e6], [2e6, 0.0], [0.0, f64::NAN]];
        let inputs = FactorInputs::from(vec![
            InputWindow::Values(returns),
            InputWindow::Values(amount),
        ]);
        let assets = vec![Asset::new(1u64, "000001.SZ"), Asset::new(2u64, "000002.SZ")];

        let out = factor
            .evaluate(NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(), &assets, &inputs)
            .unwrap();

        // Day three has zero amount and is skipped: mean(2e-8, 2e-8)
        assert_relative_eq!(out[0], 2e-8, max_relative = 1e-12);
        // Nothing usable: missing value is zero.
        assert_eq!(out[1], 0.0);
    }

    #[test]
    fn test_illiquidity_metadata() {
        let factor = Illiquidity::default();
        assert_eq!(factor.name(), "illiquidity");
        assert_eq!(factor.window_length(), 20);
        assert_eq!(factor.missing_value(), 0.0);
        assert_eq!(factor.category(), FactorCategory::Liquidity);
        assert_eq!(factor.inputs()[1].name(), "amount");
    }
}
