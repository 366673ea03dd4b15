//! Ragged series extraction for point-in-time fundamentals.
//!
//! A fundamentals window is calendar aligned: every trading day carries the
//! most recent disclosure known on that day, so one quarterly report repeats
//! across many consecutive rows. Extraction reduces each asset column to the
//! chronologically ordered, duplicate-free sequence of disclosures it saw.
//!
//! When an as-of date repeats, the value from its first (oldest) row is kept.
//! Later rows carrying the same as-of date are forward-filled copies of that
//! snapshot.

use chrono::NaiveDate;
use ndarray::{ArrayView1, ArrayView2, Axis};
use std::collections::BTreeMap;

/// Distinct disclosures of one asset within one window, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuarterlySeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl QuarterlySeries {
    /// Number of distinct disclosures.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the window held no disclosure at all.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Distinct as-of dates, strictly increasing.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Disclosed values, aligned with [`Self::dates`].
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Most recent disclosure.
    pub fn latest(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// The `n`-th disclosure counted from the end, 1-based.
    ///
    /// `from_end(1)` is the latest; `from_end(5)` is four periods earlier.
    pub fn from_end(&self, n: usize) -> Option<f64> {
        if n == 0 {
            return None;
        }
        self.values
            .len()
            .checked_sub(n)
            .map(|index| self.values[index])
    }
}

/// Extract the disclosure sequence of one asset column.
///
/// `asof` and `values` are parallel columns of a window. Cells without an
/// as-of date carry no disclosure and are skipped.
///
/// # Panics
///
/// Panics if the two columns differ in length.
pub fn extract_series(
    asof: ArrayView1<'_, Option<NaiveDate>>,
    values: ArrayView1<'_, f64>,
) -> QuarterlySeries {
    assert_eq!(asof.len(), values.len(), "as-of and value columns differ in length");

    // Keyed by date so the result is ascending even if a loader breaks the
    // non-decreasing guarantee; `or_insert` keeps the first row.
    let mut first_rows: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for (row, date) in asof.iter().enumerate() {
        if let Some(date) = date {
            first_rows.entry(*date).or_insert(row);
        }
    }

    let mut series = QuarterlySeries {
        dates: Vec::with_capacity(first_rows.len()),
        values: Vec::with_capacity(first_rows.len()),
    };
    for (date, row) in first_rows {
        series.dates.push(date);
        series.values.push(values[row]);
    }
    series
}

/// Extract one disclosure sequence per asset column of a window.
///
/// # Panics
///
/// Panics if the two windows differ in shape.
pub fn extract_window(
    asof: ArrayView2<'_, Option<NaiveDate>>,
    values: ArrayView2<'_, f64>,
) -> Vec<QuarterlySeries> {
    assert_eq!(asof.dim(), values.dim(), "as-of and value windows differ in shape");

    asof.axis_iter(Axis(1))
        .zip(values.axis_iter(Axis(1)))
        .map(|(dates, column)| extract_series(dates, column))
        .collect()
}

/// [`extract_window`] with point-in-time checks in debug builds.
///
/// Asserts that known as-of dates never decrease down a column and never
/// exceed `today`. A violation means the loader leaked future information.
pub fn extract_window_checked(
    today: NaiveDate,
    asof: ArrayView2<'_, Option<NaiveDate>>,
    values: ArrayView2<'_, f64>,
) -> Vec<QuarterlySeries> {
    if cfg!(debug_assertions) {
        for (asset, column) in asof.axis_iter(Axis(1)).enumerate() {
            let mut previous: Option<NaiveDate> = None;
            for date in column.iter().flatten() {
                debug_assert!(
                    *date <= today,
                    "as-of date {date} after evaluation date {today} in column {asset}"
                );
                debug_assert!(
                    previous.is_none_or(|prev| prev <= *date),
                    "as-of dates decrease in column {asset}"
                );
                previous = Some(*date);
            }
        }
    }

    extract_window(asof, values)
}
