//! Window loaders feeding factors.
//!
//! A [`WindowLoader`] turns a [`ColumnRef`] into the trailing window a factor
//! sees on one evaluation date. [`FrameLoader`] serves windows out of a
//! long-format polars frame held in memory:
//!
//! | column | type | notes |
//! |---|---|---|
//! | `symbol` | str | asset symbol |
//! | `date` | ISO date | trading day |
//! | `<field>` | numeric | value column, cast to f64 |
//! | `<field>_asof` | ISO date, nullable | disclosure date of `<field>` |
//!
//! The trading calendar is the sorted set of distinct dates in the frame, and
//! each `(symbol, date)` pair may appear once. Only columns known to the
//! loader's [`ColumnRegistry`] are served.

use crate::{
    FactorError, Result,
    asset::{Asset, Sid},
    columns::{ColumnKind, ColumnRef, ColumnRegistry},
    traits::Factor,
    window::{FactorInputs, InputWindow},
};
use chrono::NaiveDate;
use ndarray::{Array2, ArrayView2, s};
use polars::prelude::*;
use std::{
    collections::{BTreeSet, HashMap, HashSet},
    path::Path,
    sync::{Arc, PoisonError, RwLock},
};
use tracing::debug;

const SYMBOL: &str = "symbol";
const DATE: &str = "date";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Source of input windows.
pub trait WindowLoader: Send + Sync {
    /// Trailing `window_length` rows of `column` ending on the last trading
    /// day not after `today`, one column per asset in `assets` order.
    fn load(
        &self,
        column: &ColumnRef,
        today: NaiveDate,
        assets: &[Asset],
        window_length: usize,
    ) -> Result<InputWindow>;

    /// Load every declared input of `factor`.
    fn load_inputs(
        &self,
        factor: &dyn Factor,
        today: NaiveDate,
        assets: &[Asset],
    ) -> Result<FactorInputs> {
        factor
            .inputs()
            .iter()
            .map(|column| self.load(column, today, assets, factor.window_length()))
            .collect::<Result<Vec<_>>>()
            .map(FactorInputs::new)
    }
}

/// Whole history of one column: rows are calendar days, columns symbols.
#[derive(Debug)]
enum DenseColumn {
    Values(Array2<f64>),
    AsOf(Array2<Option<NaiveDate>>),
}

/// In-memory loader over a long-format [`DataFrame`].
///
/// Columns are pivoted on first use and cached, so repeated evaluations over
/// the same frame only pay for slicing.
#[derive(Debug)]
pub struct FrameLoader {
    frame: DataFrame,
    columns: ColumnRegistry,
    calendar: Vec<NaiveDate>,
    symbols: Vec<String>,
    symbol_index: HashMap<String, usize>,
    /// (calendar row, symbol column) of each frame row
    cells: Vec<(usize, usize)>,
    cache: RwLock<HashMap<ColumnRef, Arc<DenseColumn>>>,
}

impl FrameLoader {
    /// Index a long-format frame, serving the standard columns of
    /// [`ColumnRegistry::with_defaults`].
    ///
    /// Fails on a repeated `(symbol, date)` row.
    pub fn new(frame: DataFrame) -> Result<Self> {
        for required in [SYMBOL, DATE] {
            if frame.get_column_index(required).is_none() {
                return Err(FactorError::MissingColumn(required.to_string()));
            }
        }

        let symbol_col = frame.column(SYMBOL)?.cast(&DataType::String)?;
        let date_col = frame.column(DATE)?.cast(&DataType::String)?;
        let symbol_ca = symbol_col.str()?;
        let date_ca = date_col.str()?;

        let mut rows = Vec::with_capacity(frame.height());
        for (symbol, date) in symbol_ca.into_iter().zip(date_ca.into_iter()) {
            let symbol = symbol.ok_or_else(|| FactorError::MissingColumn(SYMBOL.to_string()))?;
            let date = parse_date(date.ok_or_else(|| FactorError::InvalidDate("null".into()))?)?;
            rows.push((symbol.to_string(), date));
        }

        let calendar: Vec<NaiveDate> = rows
            .iter()
            .map(|(_, date)| *date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let symbols: Vec<String> = rows
            .iter()
            .map(|(symbol, _)| symbol.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let symbol_index: HashMap<String, usize> = symbols
            .iter()
            .enumerate()
            .map(|(i, symbol)| (symbol.clone(), i))
            .collect();

        let mut seen = HashSet::with_capacity(rows.len());
        let mut cells = Vec::with_capacity(rows.len());
        for (symbol, date) in &rows {
            let cell = (calendar.partition_point(|d| d < date), symbol_index[symbol]);
            if !seen.insert(cell) {
                return Err(FactorError::InvalidConfig(format!(
                    "duplicate row for {symbol} on {date}"
                )));
            }
            cells.push(cell);
        }

        debug!(
            rows = frame.height(),
            days = calendar.len(),
            symbols = symbols.len(),
            "indexed frame"
        );

        Ok(Self {
            frame,
            columns: ColumnRegistry::with_defaults(),
            calendar,
            symbols,
            symbol_index,
            cells,
            cache: RwLock::new(HashMap::new()),
        })
    }

    /// Index the frame produced by a lazy query.
    pub fn from_lazy(frame: LazyFrame) -> Result<Self> {
        Self::new(frame.collect()?)
    }

    /// Read a long-format CSV file.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self> {
        let frame = LazyCsvReader::new(path.as_ref())
            .with_has_header(true)
            .finish()?;
        Self::from_lazy(frame)
    }

    /// Serve the columns of `columns` instead of the standard set.
    pub fn with_columns(mut self, columns: ColumnRegistry) -> Self {
        self.columns = columns;
        self
    }

    /// Columns this loader serves.
    pub fn columns(&self) -> &ColumnRegistry {
        &self.columns
    }

    /// Trading calendar, ascending.
    pub fn calendar(&self) -> &[NaiveDate] {
        &self.calendar
    }

    /// Distinct symbols, sorted.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Every symbol of the frame as an asset, sids assigned in sorted order.
    pub fn universe(&self) -> Vec<Asset> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, symbol)| Asset::new(Sid(i as u64), symbol.clone()))
            .collect()
    }

    fn has_column(&self, name: &str) -> bool {
        self.frame.get_column_index(name).is_some()
    }

    fn dense(&self, column: &ColumnRef) -> Result<Arc<DenseColumn>> {
        if let Some(hit) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(column)
        {
            return Ok(Arc::clone(hit));
        }

        let dense = Arc::new(self.pivot(column)?);
        debug!(column = %column.name(), "cached dense column");
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(cache.entry(column.clone()).or_insert(dense)))
    }

    fn pivot(&self, column: &ColumnRef) -> Result<DenseColumn> {
        let name = column.name();
        let shape = (self.calendar.len(), self.symbols.len());

        if !self.has_column(&name) {
            if column.kind == ColumnKind::Value && column.field == "returns" {
                return self.derive_returns();
            }
            return Err(FactorError::MissingColumn(name));
        }

        match column.kind {
            ColumnKind::Value => {
                let series = self.frame.column(&name)?.cast(&DataType::Float64)?;
                let mut dense = Array2::from_elem(shape, f64::NAN);
                for (&cell, value) in self.cells.iter().zip(series.f64()?.into_iter()) {
                    if let Some(value) = value {
                        dense[cell] = value;
                    }
                }
                Ok(DenseColumn::Values(dense))
            }
            ColumnKind::AsOf => {
                let series = self.frame.column(&name)?.cast(&DataType::String)?;
                let mut dense = Array2::from_elem(shape, None);
                for (&cell, value) in self.cells.iter().zip(series.str()?.into_iter()) {
                    if let Some(value) = value {
                        dense[cell] = Some(parse_date(value)?);
                    }
                }
                Ok(DenseColumn::AsOf(dense))
            }
        }
    }

    /// Daily percentage change of `close`, missing on the first calendar day
    /// and wherever either close is missing.
    fn derive_returns(&self) -> Result<DenseColumn> {
        let close = self.dense(&ColumnRef::pricing("close"))?;
        let DenseColumn::Values(close) = close.as_ref() else {
            return Err(FactorError::MissingColumn("close".to_string()));
        };
        debug!("deriving returns from close");

        let mut returns = Array2::from_elem(close.dim(), f64::NAN);
        for row in 1..close.nrows() {
            let change = &close.row(row) / &close.row(row - 1) - 1.0;
            returns.row_mut(row).assign(&change);
        }
        Ok(DenseColumn::Values(returns))
    }
}

impl WindowLoader for FrameLoader {
    fn load(
        &self,
        column: &ColumnRef,
        today: NaiveDate,
        assets: &[Asset],
        window_length: usize,
    ) -> Result<InputWindow> {
        if !self.columns.contains(column) {
            return Err(FactorError::UnknownColumn(column.name()));
        }

        let end = self.calendar.partition_point(|d| *d <= today);
        let start = end.saturating_sub(window_length);
        let pad = window_length - (end - start);
        if pad > 0 {
            debug!(column = %column.name(), %today, pad, "window padded with missing rows");
        }

        let positions: Vec<Option<usize>> = assets
            .iter()
            .map(|asset| self.symbol_index.get(&asset.symbol).copied())
            .collect();
        let shape = (window_length, assets.len());

        Ok(match &*self.dense(column)? {
            DenseColumn::Values(dense) => {
                let mut window = Array2::from_elem(shape, f64::NAN);
                fill(&mut window, dense.slice(s![start..end, ..]), pad, &positions);
                InputWindow::Values(window)
            }
            DenseColumn::AsOf(dense) => {
                let mut window = Array2::from_elem(shape, None);
                fill(&mut window, dense.slice(s![start..end, ..]), pad, &positions);
                InputWindow::AsOf(window)
            }
        })
    }
}

/// Copy the columns of `source` at `positions` into `window` below `pad` rows.
fn fill<T: Clone>(
    window: &mut Array2<T>,
    source: ArrayView2<'_, T>,
    pad: usize,
    positions: &[Option<usize>],
) {
    for (asset, position) in positions.iter().enumerate() {
        if let Some(position) = *position {
            window
                .slice_mut(s![pad.., asset])
                .assign(&source.column(position));
        }
    }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| FactorError::InvalidDate(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn frame() -> DataFrame {
        df![
            "symbol" => ["A", "B", "A", "B", "A", "B"],
            "date" => ["2024-01-02", "2024-01-02", "2024-01-03", "2024-01-03", "2024-01-04", "2024-01-04"],
            "close" => [10.0, 20.0, 11.0, 19.0, 12.1, 19.0],
            "tot_equity" => [Some(5.0), None, Some(5.0), Some(7.0), Some(6.0), Some(7.0)],
            "tot_equity_asof" => [Some("2023-10-30"), None, Some("2023-10-30"), Some("2024-01-03"), Some("2024-01-04"), Some("2024-01-03")],
        ]
        .unwrap()
    }

    fn assets() -> Vec<Asset> {
        vec![Asset::new(1u64, "B"), Asset::new(2u64, "A"), Asset::new(3u64, "Z")]
    }

    #[test]
    fn test_calendar_and_universe() {
        let loader = FrameLoader::new(frame()).unwrap();

        assert_eq!(loader.calendar().len(), 3);
        assert_eq!(loader.symbols(), ["A", "B"]);
        assert_eq!(loader.universe()[1].symbol, "B");
    }

    #[test]
    fn test_values_window_with_padding_and_unknown_asset() {
        let loader = FrameLoader::new(frame()).unwrap();

        let InputWindow::Values(window) = loader
            .load(&ColumnRef::pricing("close"), date("2024-01-03"), &assets(), 3)
            .unwrap()
        else {
            panic!("expected values");
        };

        assert_eq!(window.dim(), (3, 3));
        assert!(window.row(0).iter().all(|v| v.is_nan()));
        assert_eq!(window[[1, 0]], 20.0);
        assert_eq!(window[[2, 1]], 11.0);
        assert!(window.column(2).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_asof_window() {
        let loader = FrameLoader::new(frame()).unwrap();

        let InputWindow::AsOf(window) = loader
            .load(&ColumnRef::asof("tot_equity"), date("2024-01-04"), &assets(), 3)
            .unwrap()
        else {
            panic!("expected as-of dates");
        };

        assert_eq!(window[[0, 0]], None);
        assert_eq!(window[[1, 0]], Some(date("2024-01-03")));
        assert_eq!(window[[2, 1]], Some(date("2024-01-04")));
        assert_eq!(window[[2, 2]], None);
    }

    #[test]
    fn test_derived_returns() {
        let loader = FrameLoader::new(frame()).unwrap();

        let InputWindow::Values(window) = loader
            .load(&ColumnRef::pricing("returns"), date("2024-01-04"), &assets(), 3)
            .unwrap()
        else {
            panic!("expected values");
        };

        assert!(window[[0, 1]].is_nan());
        assert_relative_eq!(window[[1, 1]], 0.1, epsilon = 1e-12);
        assert_relative_eq!(window[[2, 1]], 0.1, epsilon = 1e-12);
        assert_relative_eq!(window[[1, 0]], -0.05, epsilon = 1e-12);
        assert_relative_eq!(window[[2, 0]], 0.0);
    }

    #[test]
    fn test_date_after_calendar_uses_last_day() {
        let loader = FrameLoader::new(frame()).unwrap();

        let InputWindow::Values(window) = loader
            .load(&ColumnRef::pricing("close"), date("2024-02-01"), &assets(), 1)
            .unwrap()
        else {
            panic!("expected values");
        };

        assert_eq!(window[[0, 1]], 12.1);
    }

    #[test]
    fn test_missing_column() {
        let loader = FrameLoader::new(frame()).unwrap();

        assert!(matches!(
            loader.load(&ColumnRef::pricing("volume"), date("2024-01-04"), &assets(), 2),
            Err(FactorError::MissingColumn(name)) if name == "volume"
        ));
    }

    #[test]
    fn test_unregistered_column_is_rejected() {
        let loader = FrameLoader::new(frame()).unwrap();
        let column = ColumnRef::fundamental("dividend");

        assert!(matches!(
            loader.load(&column, date("2024-01-04"), &assets(), 1),
            Err(FactorError::UnknownColumn(name)) if name == "dividend"
        ));
        // Present in the frame, but not a registered field.
        assert!(matches!(
            loader.load(&ColumnRef::pricing("tot_equity"), date("2024-01-04"), &assets(), 1),
            Err(FactorError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_custom_column_registry() {
        let mut columns = ColumnRegistry::new();
        columns.add_pricing("close");
        let loader = FrameLoader::new(frame()).unwrap().with_columns(columns);

        assert!(
            loader
                .load(&ColumnRef::pricing("close"), date("2024-01-04"), &assets(), 1)
                .is_ok()
        );
        assert!(matches!(
            loader.load(&ColumnRef::asof("tot_equity"), date("2024-01-04"), &assets(), 1),
            Err(FactorError::UnknownColumn(name)) if name == "tot_equity_asof"
        ));
    }

    #[test]
    fn test_duplicate_rows_are_rejected() {
        let frame = df![
            "symbol" => ["A", "B", "A"],
            "date" => ["2024-01-02", "2024-01-02", "2024-01-02"],
            "close" => [10.0, 20.0, 10.5],
        ]
        .unwrap();

        assert!(matches!(
            FrameLoader::new(frame),
            Err(FactorError::InvalidConfig(reason)) if reason.contains("A on 2024-01-02")
        ));
    }

    #[test]
    fn test_frame_requires_symbol_and_date() {
        let frame = df!["close" => [1.0]].unwrap();
        assert!(matches!(
            FrameLoader::new(frame),
            Err(FactorError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_load_inputs_for_factor() {
        let loader = FrameLoader::new(frame()).unwrap();
        let factor = crate::builtin::pb_ratio();

        // Market cap is absent from the frame.
        assert!(loader.load_inputs(&factor, date("2024-01-04"), &assets()).is_err());

        let growth = crate::growth::YoYGrowth::new("tot_equity");
        let inputs = loader.load_inputs(&growth, date("2024-01-04"), &assets()).unwrap();
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs.iter().next().unwrap().dim(), (300, 3));
    }
}
