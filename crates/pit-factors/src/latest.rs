//! Most recent value of a single column.

use crate::{
    Result,
    asset::Asset,
    columns::ColumnRef,
    registry::FactorCategory,
    traits::Factor,
    window::{FactorInputs, last_row},
};
use chrono::NaiveDate;
use ndarray::ArrayViewMut1;

/// Latest value of one column, e.g. a macro series or a membership flag.
#[derive(Debug, Clone)]
pub struct Latest {
    name: String,
    category: FactorCategory,
    inputs: Vec<ColumnRef>,
}

impl Latest {
    /// Latest value of `column`, grouped under `category`.
    pub fn new(column: ColumnRef, category: FactorCategory) -> Self {
        Self {
            name: format!("latest_{}", column.name()),
            category,
            inputs: vec![column],
        }
    }
}

impl Factor for Latest {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Value on the evaluation date"
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

    fn compute(
        &self,
        _today: NaiveDate,
        _assets: &[Asset],
        inputs: &FactorInputs,
        mut out: ArrayViewMut1<'_, f64>,
    ) -> Result<()> {
        if let Some(row) = last_row(inputs.values(0)?) {
            out.assign(&row);
        }
        Ok(())
    }
}
