//! Negative log market capitalization factor.
//!
//! The log transformation normalizes the distribution; the sign flip makes
//! smaller companies score higher, matching the small-cap premium.

use crate::{
    Result,
    asset::Asset,
    columns::ColumnRef,
    registry::FactorCategory,
    traits::Factor,
    window::{FactorInputs, last_row},
};
use chrono::NaiveDate;
use ndarray::{ArrayViewMut1, Zip};

/// Size factor.
///
/// # Formula
///
/// `size = -ln(market_cap[-1])`, missing where market cap is not positive.
///
/// # Properties
///
/// - **Category**: Size
/// - **Window**: 1 day
/// - **Window safe**: yes
#[derive(Debug, Clone)]
pub struct Size {
    name: String,
    description: String,
    inputs: Vec<ColumnRef>,
}

impl Size {
    /// Size over a custom market cap column.
    pub fn new(market_cap: ColumnRef) -> Self {
        Self::named("size", market_cap)
    }

    /// Negative log of any positive column under another name, e.g. of
    /// A-share market cap or of the close price.
    pub fn named(name: impl Into<String>, column: ColumnRef) -> Self {
        Self {
            name: name.into(),
            description: format!("Negative natural log of {}", column.name()),
            inputs: vec![column],
        }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(ColumnRef::fundamental("mkt_cap_ard"))
    }
}

impl Factor for Size {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn category(&self) -> FactorCategory {
        FactorCategory::Size
    }

    fn inputs(&self) -> &[ColumnRef] {
        &self.inputs
    }

    fn window_length(&self) -> usize {
        1
    }

    fn window_safe(&self) -> bool {
        true
    }

    fn compute(
        &self,
        _today: NaiveDate,
        _assets: &[Asset],
        inputs: &FactorInputs,
        out: ArrayViewMut1<'_, f64>,
    ) -> Result<()> {
        let Some(market_cap) = last_row(inputs.values(0)?) else {
            return Ok(());
        };
        Zip::from(out).and(market_cap).for_each(|out, &cap| {
            if cap > 0.0 {
                *out = -cap.ln();
            }
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::InputWindow;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_size() {
        let inputs = FactorInputs::from(vec![InputWindow::Values(array![[1e10, 0.0, -5.0]])]);
        let assets = vec![
            Asset::new(1u64, "A"),
            Asset::new(2u64, "B"),
            Asset::new(3u64, "C"),
        ];

        let out = Size::default()
            .evaluate(NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(), &assets, &inputs)
            .unwrap();

        assert_relative_eq!(out[0], -(1e10f64).ln());
        assert!(out[1].is_nan());
        assert!(out[2].is_nan());
    }

    #[test]
    fn test_size_metadata() {
        let factor = Size::default();
        assert!(factor.window_safe());
        assert_eq!(factor.category(), FactorCategory::Size);
        assert_eq!(factor.inputs()[0].name(), "mkt_cap_ard");
        assert_eq!(factor.name(), "size");
    }

    #[test]
    fn test_named_over_close() {
        let factor = Size::named("price", ColumnRef::pricing("close"));
        let inputs = FactorInputs::from(vec![InputWindow::Values(array![[std::f64::consts::E]])]);

        let out = factor
            .evaluate(
                NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
                &[Asset::new(1u64, "A")],
                &inputs,
            )
            .unwrap();

        assert_relative_eq!(out[0], -1.0);
        assert_eq!(factor.description(), "Negative natural log of close");
    }
}
