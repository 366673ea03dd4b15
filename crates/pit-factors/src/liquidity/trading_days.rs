//! Count of days an asset actually traded.

use crate::{
    Result,
    asset::Asset,
    columns::ColumnRef,
    registry::FactorCategory,
    traits::{ConfigurableFactor, Factor},
    window::FactorInputs,
};
use chrono::NaiveDate;
use ndarray::{ArrayViewMut1, Zip};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static INPUTS: LazyLock<Vec<ColumnRef>> = LazyLock::new(|| vec![ColumnRef::pricing("volume")]);

/// Configuration for the TradingDays factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingDaysConfig {
    /// Number of days counted (default: 20)
    pub window_length: usize,
}

impl Default for TradingDaysConfig {
    fn default() -> Self {
        Self { window_length: 20 }
    }
}

/// Number of days in the window with positive volume.
///
/// Zero volume marks a suspended session. Tradability screens combine two of
/// these, e.g. all of the last 20 days and 180 of the last 200.
#[derive(Debug, Clone, Default)]
pub struct TradingDays {
    config: TradingDaysConfig,
}

impl Factor for TradingDays {
    fn name(&self) -> &str {
        "trading_days"
    }

    fn description(&self) -> &str {
        "Number of sessions with positive volume in the window"
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
        let volume = inputs.values(0)?;
        Zip::from(out).and(volume.columns()).for_each(|out, column| {
            *out = column.iter().filter(|v| v.is_finite() && **v > 0.0).count() as f64;
        });
        Ok(())
    }
}

impl ConfigurableFactor for TradingDays {
    type Config = TradingDaysConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
