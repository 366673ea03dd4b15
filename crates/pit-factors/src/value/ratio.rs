//! Plain ratio of single-day inputs.
//!
//! Unlike [`PositiveDivide`](super::PositiveDivide) the denominator is not
//! guarded: a negative equity base gives a negative ROE. Division by zero is
//! non-finite and comes out as missing.

use crate::{
    Result,
    asset::Asset,
    columns::ColumnRef,
    registry::FactorCategory,
    traits::Factor,
    window::{FactorInputs, last_row},
};
use chrono::NaiveDate;
use ndarray::{Array1, ArrayViewMut1, Zip};

/// Ratio factor.
///
/// # Formula
///
/// ```text
/// out = sign * (n_1[-1] + ... + n_k[-1]) / denominator[-1]
/// ```
///
/// Missing numerator terms are skipped; the output is missing only when every
/// term is missing. `sign` is `-1` for a [`negated`](Self::negated) ratio, so
/// that higher leverage scores lower.
#[derive(Debug, Clone)]
pub struct Ratio {
    name: String,
    description: String,
    category: FactorCategory,
    sign: f64,
    /// Numerator terms followed by the denominator.
    inputs: Vec<ColumnRef>,
}

impl Ratio {
    /// `numerator / denominator`, grouped under `category`.
    pub fn new(
        name: impl Into<String>,
        category: FactorCategory,
        numerator: ColumnRef,
        denominator: ColumnRef,
    ) -> Self {
        Self::sum_over(name, category, vec![numerator], denominator)
    }

    /// Sum of `numerators` over `denominator`.
    pub fn sum_over(
        name: impl Into<String>,
        category: FactorCategory,
        numerators: Vec<ColumnRef>,
        denominator: ColumnRef,
    ) -> Self {
        let terms: Vec<String> = numerators.iter().map(ColumnRef::name).collect();
        let description = format!("({}) / {}", terms.join(" + "), denominator.name());
        let mut inputs = numerators;
        inputs.push(denominator);
        Self {
            name: name.into(),
            description,
            category,
            sign: 1.0,
            inputs,
        }
    }

    /// Flip the sign of the output.
    pub fn negated(mut self) -> Self {
        self.sign = -self.sign;
        self.description = format!("-{}", self.description);
        self
    }

    /// Numerator columns.
    pub fn numerators(&self) -> &[ColumnRef] {
        &self.inputs[..self.inputs.len() - 1]
    }

    /// Denominator column.
    pub fn denominator(&self) -> &ColumnRef {
        &self.inputs[self.inputs.len() - 1]
    }
}

impl Factor for Ratio {
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
        assets: &[Asset],
        inputs: &FactorInputs,
        out: ArrayViewMut1<'_, f64>,
    ) -> Result<()> {
        let terms = self.inputs.len() - 1;
        let Some(denominator) = last_row(inputs.values(terms)?) else {
            return Ok(());
        };

        let mut numerator = Array1::from_elem(assets.len(), f64::NAN);
        for index in 0..terms {
            let Some(term) = last_row(inputs.values(index)?) else {
                continue;
            };
            Zip::from(&mut numerator).and(term).for_each(|acc, &v| {
                if !v.is_nan() {
                    *acc = if acc.is_nan() { v } else { *acc + v };
                }
            });
        }

        let sign = self.sign;
        Zip::from(out)
            .and(&numerator)
            .and(denominator)
            .for_each(|out, &n, &d| *out = sign * n / d);
        Ok(())
    }
}
