//! Core trait definitions for factors.
//!
//! All factors implement the [`Factor`] trait: a fixed trailing window over a
//! declared list of input columns, and a pure compute step that writes one
//! value per asset for one evaluation date.

use crate::{
    FactorCategory, FactorError, Result,
    asset::Asset,
    columns::{ColumnKind, ColumnRef},
    window::FactorInputs,
};
use chrono::NaiveDate;
use derive_more::Display;
use ndarray::{Array1, ArrayViewMut1};
use serde::{Deserialize, Serialize};

/// Data frequency of a factor's inputs.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataFrequency {
    /// Daily frequency - price-based factors
    Daily,
    /// Quarterly frequency - fundamental-based factors
    Quarterly,
}

/// A windowed factor evaluated once per (date, asset batch).
///
/// Implementations hold only immutable configuration, so one instance can be
/// evaluated repeatedly and from several threads on disjoint inputs. Inputs
/// are assumed point-in-time correct; enforcing that is the loader's job.
pub trait Factor: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this factor.
    ///
    /// Should be snake_case and stable across versions.
    fn name(&self) -> &str;

    /// Human-readable description of what this factor measures.
    fn description(&self) -> &str;

    /// Factor category for grouping and analysis.
    fn category(&self) -> FactorCategory;

    /// Input columns, in the order their windows are passed to `compute`.
    fn inputs(&self) -> &[ColumnRef];

    /// Number of trailing trading days in every input window.
    fn window_length(&self) -> usize;

    /// Value emitted wherever the output cannot be computed.
    fn missing_value(&self) -> f64 {
        f64::NAN
    }

    /// Whether the output is point-in-time stable on any single day, so it
    /// may feed another factor with a one-row window.
    fn window_safe(&self) -> bool {
        false
    }

    /// Data frequency required for this factor.
    fn frequency(&self) -> DataFrequency {
        if self.inputs().iter().any(|c| c.kind == ColumnKind::AsOf) {
            DataFrequency::Quarterly
        } else {
            DataFrequency::Daily
        }
    }

    /// Write one value per asset into `out`.
    ///
    /// `out` arrives pre-filled with [`Self::missing_value`]; positions left
    /// untouched stay missing.
    fn compute(
        &self,
        today: NaiveDate,
        assets: &[Asset],
        inputs: &FactorInputs,
        out: ArrayViewMut1<'_, f64>,
    ) -> Result<()>;

    /// Validate inputs, compute, and replace non-finite results with
    /// [`Self::missing_value`].
    ///
    /// This is the primary entry point. It returns one value per asset,
    /// aligned with `assets`.
    fn evaluate(
        &self,
        today: NaiveDate,
        assets: &[Asset],
        inputs: &FactorInputs,
    ) -> Result<Array1<f64>> {
        let declared = self.inputs();
        if declared.len() != inputs.len() {
            return Err(FactorError::InputMismatch {
                factor: self.name().to_string(),
                reason: format!("expected {} inputs, got {}", declared.len(), inputs.len()),
            });
        }

        let expected = (self.window_length(), assets.len());
        for (index, (column, window)) in declared.iter().zip(inputs.iter()).enumerate() {
            if column.kind != window.kind() {
                return Err(FactorError::InputMismatch {
                    factor: self.name().to_string(),
                    reason: format!(
                        "input {index} ({}) expects {} window, got {}",
                        column.name(),
                        column.kind,
                        window.kind()
                    ),
                });
            }
            if window.dim() != expected {
                return Err(FactorError::ShapeMismatch {
                    factor: self.name().to_string(),
                    expected,
                    actual: window.dim(),
                });
            }
        }

        let missing = self.missing_value();
        let mut out = Array1::from_elem(assets.len(), missing);
        self.compute(today, assets, inputs, out.view_mut())?;
        out.mapv_inplace(|v| if v.is_finite() { v } else { missing });
        Ok(out)
    }
}

/// Marker trait for factor configuration types.
///
/// All config types should implement Default, Clone, Send, Sync, and Debug.
pub trait FactorConfig: Default + Clone + Send + Sync + std::fmt::Debug {}

/// A factor that supports runtime configuration.
///
/// This trait extends `Factor` to expose named parameters with defaults,
/// such as `nyears` for growth or `t0` for momentum.
pub trait ConfigurableFactor: Factor {
    /// Configuration type for this factor.
    type Config: FactorConfig;

    /// Create a new factor with the given configuration.
    fn with_config(config: Self::Config) -> Self;

    /// Returns the current configuration.
    fn config(&self) -> &Self::Config;
}

/// Blanket implementation for any type that satisfies the trait bounds.
impl<T: Default + Clone + Send + Sync + std::fmt::Debug> FactorConfig for T {}
