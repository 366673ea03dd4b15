//! Price momentum skipping the most recent month.

use crate::{
    FactorError, Result,
    asset::Asset,
    columns::ColumnRef,
    registry::FactorCategory,
    traits::{ConfigurableFactor, Factor},
    window::FactorInputs,
};
use chrono::NaiveDate;
use ndarray::{ArrayViewMut1, Zip};
use std::sync::LazyLock;

static INPUTS: LazyLock<Vec<ColumnRef>> = LazyLock::new(|| vec![ColumnRef::pricing("close")]);

/// Configuration for the momentum factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MomentumConfig {
    /// Number of trading days in the window (default: 244)
    ///
    /// The oldest row is the start of the measured return.
    pub window_length: usize,
    /// Recent days excluded from the return to avoid reversal effects
    /// (default: 21)
    pub t0: usize,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            window_length: 244,
            t0: 21,
        }
    }
}

/// Price momentum from the start of the window to `t0` days before today.
///
/// ```text
/// out = close[-t0] / close[0] - 1
/// ```
///
/// With the defaults this is the return from roughly one year ago to one
/// month ago. Skipping the last month keeps short-term reversal out of the
/// signal.
#[derive(Debug, Clone, Default)]
pub struct Momentum {
    config: MomentumConfig,
}

impl Factor for Momentum {
    fn name(&self) -> &str {
        "momentum"
    }

    fn description(&self) -> &str {
        "Price return from the start of the window to t0 days ago"
    }

    fn category(&self) -> FactorCategory {
        FactorCategory::Momentum
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
        let close = inputs.values(0)?;
        let MomentumConfig { t0, .. } = self.config;
        let rows = close.nrows();
        if t0 == 0 || t0 > rows {
            return Err(FactorError::InvalidConfig(format!(
                "momentum t0 must be within 1..={rows}, got {t0}"
            )));
        }

        Zip::from(out)
            .and(close.row(rows - t0))
            .and(close.row(0))
            .for_each(|out, &recent, &start| *out = recent / start - 1.0);
        Ok(())
    }
}

impl ConfigurableFactor for Momentum {
    type Config = MomentumConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
