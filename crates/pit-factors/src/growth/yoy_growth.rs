//! Year-over-year growth of a point-in-time fundamental.
//!
//! The trailing window is daily, so each quarterly disclosure repeats across
//! many rows. The window is first reduced to its distinct disclosures, then
//! the latest one is compared with the one `4 * nyears` periods earlier.

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

/// Configuration for the YoY growth factor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YoYGrowthConfig {
    /// Fundamental field to measure, e.g. `tot_assets`
    pub field: String,
    /// Number of years between the compared disclosures (default: 1)
    pub nyears: usize,
    /// Trailing trading days loaded (default: 300)
    ///
    /// Must span at least `4 * nyears + 1` disclosures.
    pub window_length: usize,
}

impl Default for YoYGrowthConfig {
    fn default() -> Self {
        Self {
            field: "tot_assets".to_string(),
            nyears: 1,
            window_length: 300,
        }
    }
}

/// Year-over-year growth factor.
///
/// ```text
/// nobs = 4 * nyears + 1
/// out  = series[-1] / series[-nobs] - 1     if len(series) >= nobs
/// out  = missing                             otherwise
/// ```
///
/// where `series` is the asset's distinct-disclosure sequence in the window.
///
/// # Inputs
/// - `<field>`: disclosed value
/// - `<field>_asof`: disclosure date
#[derive(Debug, Clone)]
pub struct YoYGrowth {
    config: YoYGrowthConfig,
    name: String,
    inputs: Vec<ColumnRef>,
}

impl YoYGrowth {
    /// One-year growth of `field` over the default 300-day window.
    pub fn new(field: impl Into<String>) -> Self {
        Self::with_config(YoYGrowthConfig {
            field: field.into(),
            ..Default::default()
        })
    }

    /// Same field, growth over `nyears` years.
    pub fn with_nyears(self, nyears: usize) -> Self {
        Self::with_config(YoYGrowthConfig {
            nyears,
            ..self.config
        })
    }

    /// Same factor under another name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Default for YoYGrowth {
    fn default() -> Self {
        Self::with_config(YoYGrowthConfig::default())
    }
}

impl Factor for YoYGrowth {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Growth between the latest disclosure and the one 4*nyears periods earlier"
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
            if series.len() < nobs {
                continue;
            }
            if let (Some(latest), Some(base)) = (series.latest(), series.from_end(nobs)) {
                *slot = latest / base - 1.0;
            }
        }
        Ok(())
    }
}

impl ConfigurableFactor for YoYGrowth {
    type Config = YoYGrowthConfig;

    fn with_config(config: Self::Config) -> Self {
        let name = if config.nyears == 1 {
            format!("{}_yoy_growth", config.field)
        } else {
            format!("{}_{}y_growth", config.field, config.nyears)
        };
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{traits::DataFrequency, window::InputWindow};
    use approx::assert_relative_eq;
    use ndarray::Array2;

    /// Builds a `rows x 1` window where disclosure `k` covers `per` rows.
    fn quarterly_window(values: &[f64], per: usize) -> FactorInputs {
        let rows = values.len() * per;
        let mut vals = Array2::from_elem((rows, 1), f64::NAN);
        let mut asof = Array2::from_elem((rows, 1), None);
        let start = NaiveDate::from_ymd_opt(2022, 3, 31).unwrap();
        for (k, value) in values.iter().enumerate() {
            let date = start + chrono::Months::new(3 * k as u32);
            for r in 0..per {
                vals[[k * per + r, 0]] = value + r as f64;
                asof[[k * per + r, 0]] = Some(date);
            }
        }
        FactorInputs::from(vec![InputWindow::Values(vals), InputWindow::AsOf(asof)])
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
    }

    fn factor(window_length: usize) -> YoYGrowth {
        YoYGrowth::with_config(YoYGrowthConfig {
            field: "tot_assets".to_string(),
            nyears: 1,
            window_length,
        })
    }

    #[test]
    fn test_exactly_nobs_disclosures() {
        let inputs = quarterly_window(&[100.0, 110.0, 120.0, 130.0, 150.0], 3);
        let assets = vec![Asset::new(1u64, "600000.SH")];

        let out = factor(15).evaluate(today(), &assets, &inputs).unwrap();

        // First row of each disclosure: 150 / 100 - 1
        assert_relative_eq!(out[0], 0.5);
    }

    #[test]
    fn test_fewer_than_nobs_is_missing() {
        let inputs = quarterly_window(&[100.0, 110.0, 120.0, 130.0], 3);
        let assets = vec![Asset::new(1u64, "600000.SH")];

        let out = factor(12).evaluate(today(), &assets, &inputs).unwrap();

        assert!(out[0].is_nan());
    }

    #[test]
    fn test_uses_latest_against_nobs_back() {
        let inputs = quarterly_window(&[50.0, 100.0, 110.0, 120.0, 130.0, 200.0], 2);
        let assets = vec![Asset::new(1u64, "600000.SH")];

        let out = factor(12).evaluate(today(), &assets, &inputs).unwrap();

        assert_relative_eq!(out[0], 1.0);
    }

    #[test]
    fn test_zero_base_is_missing() {
        let inputs = quarterly_window(&[0.0, 1.0, 2.0, 3.0, 4.0], 1);
        let assets = vec![Asset::new(1u64, "600000.SH")];

        let out = factor(5).evaluate(today(), &assets, &inputs).unwrap();

        assert!(out[0].is_nan());
    }

    #[test]
    fn test_repeated_evaluation_is_stable() {
        let inputs = quarterly_window(&[100.0, 110.0, 120.0, 130.0, 150.0], 4);
        let assets = vec![Asset::new(1u64, "600000.SH")];
        let factor = factor(20);

        let first = factor.evaluate(today(), &assets, &inputs).unwrap();
        let second = factor.evaluate(today(), &assets, &inputs).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_yoy_growth_metadata() {
        let factor = YoYGrowth::new("eps_basic");
        assert_eq!(factor.name(), "eps_basic_yoy_growth");
        assert_eq!(factor.window_length(), 300);
        assert_eq!(factor.frequency(), DataFrequency::Quarterly);
        assert_eq!(factor.inputs()[1].name(), "eps_basic_asof");

        let two_year = factor.with_nyears(2);
        assert_eq!(two_year.name(), "eps_basic_2y_growth");
        assert_eq!(two_year.config().nyears, 2);
    }
}
