//! Turnover factors.
//!
//! Measures liquidity through shares traded relative to shares available,
//! and how recent activity compares with its longer-run level.

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
use ndarray::{ArrayViewMut1, Zip, s};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static INPUTS: LazyLock<Vec<ColumnRef>> = LazyLock::new(|| vec![ColumnRef::pricing("turnover")]);

/// Configuration for the Turnover factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnoverConfig {
    /// Number of days to average over (default: 20)
    pub window_length: usize,
}

impl Default for TurnoverConfig {
    fn default() -> Self {
        Self { window_length: 20 }
    }
}

/// Average daily turnover.
///
/// Mean of the daily turnover rate over the window, skipping non-finite
/// days. Assets without a usable day report 0.
///
/// # Interpretation
///
/// - **Higher values**: More liquid, easier to trade without price impact
/// - **Lower values**: Less liquid, higher transaction costs
///
/// # References
///
/// - Datar, V. T., Y. Naik, and R. Radcliffe (1998). "Liquidity and stock returns:
///   An alternative test," Journal of Financial Markets.
#[derive(Debug, Clone, Default)]
pub struct Turnover {
    config: TurnoverConfig,
}

impl Factor for Turnover {
    fn name(&self) -> &str {
        "turnover"
    }

    fn description(&self) -> &str {
        "Average daily turnover rate over the window"
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
        let turnover = inputs.values(0)?;
        Zip::from(out)
            .and(turnover.columns())
            .for_each(|out, column| *out = nanmean(column));
        Ok(())
    }
}

impl ConfigurableFactor for Turnover {
    type Config = TurnoverConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}

/// Configuration for the AbnormalTurnover factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbnormalTurnoverConfig {
    /// Long window in trading days (default: 250)
    pub window_length: usize,
    /// Trailing days forming the short average (default: 20)
    pub short_window: usize,
}

impl Default for AbnormalTurnoverConfig {
    fn default() -> Self {
        Self {
            window_length: 250,
            short_window: 20,
        }
    }
}

/// Recent turnover relative to its long-run average.
///
/// ```text
/// out = mean(turnover[-short_window:]) / mean(turnover)
/// ```
///
/// Values above 1 flag unusually active recent trading.
#[derive(Debug, Clone, Default)]
pub struct AbnormalTurnover {
    config: AbnormalTurnoverConfig,
}

impl Factor for AbnormalTurnover {
    fn name(&self) -> &str {
        "abnormal_turnover"
    }

    fn description(&self) -> &str {
        "Short-window average turnover divided by long-window average turnover"
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
        let turnover = inputs.values(0)?;
        let start = turnover.nrows().saturating_sub(self.config.short_window);
        let recent = turnover.slice(s![start.., ..]);

        Zip::from(out)
            .and(recent.columns())
            .and(turnover.columns())
            .for_each(|out, short, long| *out = nanmean(short) / nanmean(long));
        Ok(())
    }
}

impl ConfigurableFactor for AbnormalTurnover {
    type Config = AbnormalTurnoverConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
