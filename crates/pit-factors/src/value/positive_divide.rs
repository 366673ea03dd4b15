//! Guarded ratio of two single-day inputs.
//!
//! `numerator / denominator` on the latest row, reported as missing wherever
//! the denominator is not strictly positive. A negative book value or a loss
//! makes a valuation multiple meaningless rather than merely small.

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

/// Guarded ratio factor.
///
/// One parameterized type covers every multiple of the form
/// `numerator / denominator`; see [`crate::builtin`] for the named ones.
///
/// # Formula
///
/// ```text
/// out = numerator[-1] / denominator[-1]   where denominator[-1] > 0
/// out = missing                            otherwise
/// ```
///
/// The output is window safe: both inputs are read on a single day.
#[derive(Debug, Clone)]
pub struct PositiveDivide {
    name: String,
    description: String,
    inputs: Vec<ColumnRef>,
}

impl PositiveDivide {
    /// Create a ratio named `name` over two value columns.
    pub fn new(name: impl Into<String>, numerator: ColumnRef, denominator: ColumnRef) -> Self {
        let description = format!(
            "{} / {}, missing where the denominator is not positive",
            numerator.name(),
            denominator.name()
        );
        Self {
            name: name.into(),
            description,
            inputs: vec![numerator, denominator],
        }
    }

    /// Numerator column.
    pub fn numerator(&self) -> &ColumnRef {
        &self.inputs[0]
    }

    /// Denominator column.
    pub fn denominator(&self) -> &ColumnRef {
        &self.inputs[1]
    }
}

impl Factor for PositiveDivide {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn category(&self) -> FactorCategory {
        FactorCategory::Value
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
        let numerator = inputs.values(0)?;
        let denominator = inputs.values(1)?;
        let (Some(num), Some(den)) = (last_row(numerator), last_row(denominator)) else {
            return Ok(());
        };

        Zip::from(out).and(num).and(den).for_each(|out, &n, &d| {
            if d > 0.0 {
                *out = n / d;
            }
        });
        Ok(())
    }
}
