//! Prior-period value of a point-in-time fundamental.

use super::observations_required;
use crate::{
    Result,
    asset::Asset,
    columns::ColumnRef,
    extract::extract_window_checked,
    registry::FactorCategory,
    traits::{ConfigurableFactor, Factor},
    window::FactorInputs,
};
use chrono::NaiveDate;
use ndarray::ArrayViewMut1;
use serde::{Deserialize, Serialize};

/// Configuration for the previous-year factor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviousYearConfig {
    /// Fundamental field to look up, e.g. `net_profit_is`
    pub field: String,
    /// Years to look back (default: 1)
    pub nyears: usize,
    /// Trailing trading days loaded (default: 300)
    pub window_length: usize,
}

impl Default for PreviousYearConfig {
    fn default() -> Self {
        Self {
            field: "net_profit_is".to_string(),
            nyears: 1,
            window_length: 300,
        }
    }
}

/// The disclosure reported `4 * nyears` periods before the latest one.
///
/// Missing when the window holds fewer than `4 * nyears + 1` distinct
/// disclosures.
#[derive(Debug, Clone)]
pub struct PreviousYear {
    config: PreviousYearConfig,
    name: String,
    inputs: Vec<ColumnRef>,
}

impl PreviousYear {
    /// Value of `field` one year back.
    pub fn new(field: impl Into<String>) -> Self {
        Self::with_config(PreviousYearConfig {
            field: field.into(),
            ..Default::default()
        })
    }
}

impl Default for PreviousYear {
    fn default() -> Self {
        Self::with_config(PreviousYearConfig::default())
    }
}

impl Factor for PreviousYear {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Disclosure reported 4*nyears periods before the latest one"
    }

    fn category(&self) -> FactorCategory {
        FactorCategory::Growth
    }

    fn inputs(&self) -> &[ColumnRef] {
        &self.inputs
    }

    fn window_length(&self) -> usize {
        self.config.window_length
    }

    fn compute(
        &self,
        today: NaiveDate,
        _assets: &[Asset],
        inputs: &FactorInputs,
        mut out: ArrayViewMut1<'_, f64>,
    ) -> Result<()> {
        let values = inputs.values(0)?;
        let asof = inputs.asof(1)?;
        let nobs = observations_required(self.config.nyears);

        for (slot, series) in out
            .iter_mut()
            .zip(extract_window_checked(today, asof, values))
        {
            if let Some(value) = series.from_end(nobs) {
                *slot = value;
            }
        }
        Ok(())
    }
}

impl ConfigurableFactor for PreviousYear {
    type Config = PreviousYearConfig;

    fn with_config(config: Self::Config) -> Self {
        let name = format!("{}_previous_{}y", config.field, config.nyears);
        let inputs = vec![
            ColumnRef::fundamental(config.field.as_str()),
            ColumnRef::asof(config.field.as_str()),
        ];
        Self {
            config,
            name,
            inputs,
        }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
