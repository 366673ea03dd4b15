//! Reductions that skip non-finite observations.
//!
//! Each returns NaN when no finite observation remains.

use ndarray::ArrayView1;

pub(crate) fn nanmean(values: ArrayView1<'_, f64>) -> f64 {
    let (sum, count) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { f64::NAN } else { sum / count as f64 }
}

pub(crate) fn nanmax(values: ArrayView1<'_, f64>) -> f64 {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::NAN, f64::max)
}

/// Population standard deviation (ddof = 0).
pub(crate) fn nanstd(values: ArrayView1<'_, f64>) -> f64 {
    let mean = nanmean(values);
    if mean.is_nan() {
        return f64::NAN;
    }
    let (sq, count) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sq, count), v| (sq + (v - mean).powi(2), count + 1));
    (sq / count as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_skips_non_finite() {
        let values = array![1.0, f64::NAN, 3.0, f64::INFINITY];
        assert_relative_eq!(nanmean(values.view()), 2.0);
        assert_relative_eq!(nanmax(values.view()), 3.0);
        assert_relative_eq!(nanstd(values.view()), 1.0);
    }

    #[test]
    fn test_all_missing_is_nan() {
        let values = array![f64::NAN, f64::NEG_INFINITY];
        assert!(nanmean(values.view()).is_nan());
        assert!(nanmax(values.view()).is_nan());
        assert!(nanstd(values.view()).is_nan());
    }
}
