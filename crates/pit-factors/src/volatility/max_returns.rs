//! Maximum daily return - lottery-like payoff exposure.

use crate::{
    Result,
    asset::Asset,
    columns::ColumnRef,
    registry::FactorCategory,
    stats::nanmax,
    traits::{ConfigurableFactor, Factor},
    window::FactorInputs,
};
use chrono::NaiveDate;
use ndarray::{ArrayViewMut1, Zip};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static INPUTS: LazyLock<Vec<ColumnRef>> = LazyLock::new(|| vec![ColumnRef::pricing("returns")]);

/// Configuration for the MaxReturns factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxReturnsConfig {
    /// Number of days searched (default: 20)
    pub window_length: usize,
}

impl Default for MaxReturnsConfig {
    fn default() -> Self {
        Self { window_length: 20 }
    }
}

/// Largest daily return in the window, skipping non-finite days.
#[derive(Debug, Clone, Default)]
pub struct MaxReturns {
    config: MaxReturnsConfig,
}

impl Factor for MaxReturns {
    fn name(&self) -> &str {
        "max_returns"
    }

    fn description(&self) -> &str {
        "Maximum daily return over the window"
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
        Zip::from(out)
            .and(returns.columns())
            .for_each(|out, column| *out = nanmax(column));
        Ok(())
    }
}

impl ConfigurableFactor for MaxReturns {
    type Config = MaxReturnsConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
