//! Product of two single-day inputs.

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

/// `left[-1] * right[-1]`, e.g. a per-share figure times shares outstanding.
///
/// Missing wherever either side is missing. Window safe.
#[derive(Debug, Clone)]
pub struct Product {
    name: String,
    description: String,
    category: FactorCategory,
    inputs: Vec<ColumnRef>,
}

impl Product {
    /// Product named `name` of two value columns.
    pub fn new(
        name: impl Into<String>,
        category: FactorCategory,
        left: ColumnRef,
        right: ColumnRef,
    ) -> Self {
        let description = format!("{} * {}", left.name(), right.name());
        Self {
            name: name.into(),
            description,
            category,
            inputs: vec![left, right],
        }
    }
}

impl Factor for Product {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn category(&self) -> FactorCategory {
        self.category
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
        let (Some(left), Some(right)) = (last_row(inputs.values(0)?), last_row(inputs.values(1)?))
        else {
            return Ok(());
        };
        Zip::from(out)
            .and(left)
            .and(right)
            .for_each(|out, &l, &r| *out = l * r);
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
    fn test_product() {
        let factor = Product::new(
            "earnings",
            FactorCategory::Value,
            ColumnRef::fundamental("eps_basic"),
            ColumnRef::fundamental("shares_outstanding"),
        );
        let inputs = FactorInputs::from(vec![
            InputWindow::Values(array![[0.5, f64::NAN]]),
            InputWindow::Values(array![[200.0, 100.0]]),
        ]);
        let assets = vec![Asset::new(1u64, "A"), Asset::new(2u64, "B")];

        let out = factor
            .evaluate(NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(), &assets, &inputs)
            .unwrap();

        assert_relative_eq!(out[0], 100.0);
        assert!(out[1].is_nan());
        assert_eq!(factor.description(), "eps_basic * shares_outstanding");
    }
}
