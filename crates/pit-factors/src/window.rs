//! Trailing input windows handed to a factor for one evaluation.
//!
//! Rows are trading days in ascending order ending at the evaluation date;
//! columns are assets in batch order.

use crate::{FactorError, Result, columns::ColumnKind};
use chrono::NaiveDate;
use derive_more::From;
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

/// One trailing window: disclosed values or their as-of dates.
#[derive(Debug, Clone, PartialEq)]
pub enum InputWindow {
    /// Numeric window; missing cells are NaN.
    Values(Array2<f64>),
    /// As-of dates; `None` where nothing has been disclosed yet.
    AsOf(Array2<Option<NaiveDate>>),
}

impl InputWindow {
    /// Window dimensions as (rows, assets).
    pub fn dim(&self) -> (usize, usize) {
        match self {
            Self::Values(values) => values.dim(),
            Self::AsOf(dates) => dates.dim(),
        }
    }

    /// Kind of column this window was loaded from.
    pub const fn kind(&self) -> ColumnKind {
        match self {
            Self::Values(_) => ColumnKind::Value,
            Self::AsOf(_) => ColumnKind::AsOf,
        }
    }
}

/// Positional inputs of one evaluation, aligned with a factor's declared
/// input columns.
#[derive(Debug, Clone, Default, From)]
pub struct FactorInputs {
    windows: Vec<InputWindow>,
}

impl FactorInputs {
    /// Create from windows in declaration order.
    pub const fn new(windows: Vec<InputWindow>) -> Self {
        Self { windows }
    }

    /// Append the next input window.
    pub fn push(&mut self, window: InputWindow) {
        self.windows.push(window);
    }

    /// Number of windows.
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Whether no windows are present.
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Iterate windows in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &InputWindow> {
        self.windows.iter()
    }

    /// Numeric window at `index`.
    pub fn values(&self, index: usize) -> Result<ArrayView2<'_, f64>> {
        match self.windows.get(index) {
            Some(InputWindow::Values(values)) => Ok(values.view()),
            _ => Err(FactorError::MissingInput {
                index,
                kind: ColumnKind::Value,
            }),
        }
    }

    /// As-of window at `index`.
    pub fn asof(&self, index: usize) -> Result<ArrayView2<'_, Option<NaiveDate>>> {
        match self.windows.get(index) {
            Some(InputWindow::AsOf(dates)) => Ok(dates.view()),
            _ => Err(FactorError::MissingInput {
                index,
                kind: ColumnKind::AsOf,
            }),
        }
    }
}

/// Most recent row of a window, if it has any rows.
pub fn last_row<T>(window: ArrayView2<'_, T>) -> Option<ArrayView1<'_, T>> {
    let rows = window.nrows();
    rows.checked_sub(1)
        .map(|row| window.index_axis_move(Axis(0), row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_typed_access() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 31);
        let inputs = FactorInputs::from(vec![
            InputWindow::Values(array![[1.0, 2.0]]),
            InputWindow::AsOf(array![[date, None]]),
        ]);

        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs.values(0).unwrap()[[0, 1]], 2.0);
        assert_eq!(inputs.asof(1).unwrap()[[0, 0]], date);
        assert!(matches!(
            inputs.asof(0),
            Err(FactorError::MissingInput { index: 0, .. })
        ));
        assert!(inputs.values(2).is_err());
    }

    #[test]
    fn test_last_row() {
        let window = array![[1.0, 2.0], [3.0, 4.0]];
        assert_eq!(last_row(window.view()).unwrap().to_vec(), vec![3.0, 4.0]);

        let empty = Array2::<f64>::zeros((0, 2));
        assert!(last_row(empty.view()).is_none());
    }
}
