//! Factor registry for discovery and introspection.
//!
//! The registry provides a centralized way to discover, instantiate, and
//! query factors. It supports grouping by category and bulk evaluation of
//! every registered factor for one date.

use crate::{
    Factor, FactorError, Result, asset::Asset, builtin, liquidity, loader::WindowLoader, momentum,
    size, traits::DataFrequency, volatility,
};
use chrono::NaiveDate;
use derive_more::Display;
use ndarray::{Array1, ArrayView1};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Factor category for grouping related factors.
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum FactorCategory {
    /// Momentum - trend persistence factors
    Momentum,
    /// Value - relative valuation factors
    Value,
    /// Quality - solvency, efficiency, profitability and leverage factors
    Quality,
    /// Size - market capitalization factors
    Size,
    /// Volatility - risk and beta factors
    Volatility,
    /// Growth - growth rate factors
    Growth,
    /// Liquidity - trading activity factors
    Liquidity,
}

/// Metadata for factor introspection.
#[derive(Debug, Clone, Serialize)]
pub struct FactorInfo {
    /// Factor name (unique identifier)
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Factor category
    pub category: FactorCategory,
    /// Input column names, in declaration order
    pub inputs: Vec<String>,
    /// Trailing window in trading days
    pub window_length: usize,
    /// Value emitted where the factor cannot be computed
    pub missing_value: f64,
    /// Whether the output may feed a one-row window
    pub window_safe: bool,
    /// Data frequency
    pub frequency: DataFrequency,
}

impl FactorInfo {
    fn of(factor: &dyn Factor) -> Self {
        Self {
            name: factor.name().to_string(),
            description: factor.description().to_string(),
            category: factor.category(),
            inputs: factor.inputs().iter().map(|c| c.name()).collect(),
            window_length: factor.window_length(),
            missing_value: factor.missing_value(),
            window_safe: factor.window_safe(),
            frequency: factor.frequency(),
        }
    }
}

/// Registry for factor discovery and instantiation.
///
/// Factors are keyed by name; iteration is in name order.
#[derive(Debug, Default)]
pub struct FactorRegistry {
    factors: BTreeMap<String, Arc<dyn Factor>>,
}

impl FactorRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register all standard factors.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        // Value factors
        registry.register(Arc::new(builtin::pe_ratio()));
        registry.register(Arc::new(builtin::pb_ratio()));
        registry.register(Arc::new(builtin::ps_ratio()));
        registry.register(Arc::new(builtin::pcf_ratio()));
        registry.register(Arc::new(builtin::earnings_yield()));
        registry.register(Arc::new(builtin::book_yield()));
        registry.register(Arc::new(builtin::cash_flow_yield()));
        registry.register(Arc::new(builtin::sales_yield()));
        registry.register(Arc::new(builtin::cash_yield()));

        // Quality factors
        registry.register(Arc::new(builtin::cash_ratio()));
        registry.register(Arc::new(builtin::quick_ratio()));
        registry.register(Arc::new(builtin::current_ratio()));
        registry.register(Arc::new(builtin::cash_flow_from_operating_ratio()));
        registry.register(Arc::new(builtin::total_asset_turnover()));
        registry.register(Arc::new(builtin::equity_turnover()));
        registry.register(Arc::new(builtin::inventory_turnover()));
        registry.register(Arc::new(builtin::receivables_turnover()));
        registry.register(Arc::new(builtin::gross_profit_margin()));
        registry.register(Arc::new(builtin::net_profit_margin()));
        registry.register(Arc::new(builtin::roa()));
        registry.register(Arc::new(builtin::roe()));
        registry.register(Arc::new(builtin::debt_to_equity_ratio()));
        registry.register(Arc::new(builtin::total_debt_ratio()));
        registry.register(Arc::new(builtin::financial_leverage()));

        // Growth factors
        registry.register(Arc::new(builtin::total_asset_growth()));
        registry.register(Arc::new(builtin::investment()));
        registry.register(Arc::new(builtin::total_equity_growth()));
        registry.register(Arc::new(builtin::revenue_growth()));
        registry.register(Arc::new(builtin::operating_profit_growth()));
        registry.register(Arc::new(builtin::net_profit_growth()));
        registry.register(Arc::new(builtin::cfo_growth()));
        registry.register(Arc::new(builtin::eps_growth()));
        registry.register(Arc::new(builtin::previous_year_net_profit()));

        // Momentum factors
        registry.register(Arc::new(momentum::Momentum::default()));

        // Liquidity factors
        registry.register(Arc::new(liquidity::Illiquidity::default()));
        registry.register(Arc::new(liquidity::Turnover::default()));
        registry.register(Arc::new(liquidity::AbnormalTurnover::default()));
        registry.register(Arc::new(liquidity::TradingDays::default()));

        // Volatility factors
        registry.register(Arc::new(volatility::MaxReturns::default()));
        registry.register(Arc::new(builtin::risk()));
        registry.register(Arc::new(builtin::beta()));

        // Size factors
        registry.register(Arc::new(size::Size::default()));
        registry.register(Arc::new(builtin::mkt_cap()));
        registry.register(Arc::new(builtin::price()));

        registry
    }

    /// Register a factor, replacing any factor of the same name.
    pub fn register(&mut self, factor: Arc<dyn Factor>) {
        self.factors.insert(factor.name().to_string(), factor);
    }

    /// Remove a factor, returning it if present.
    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn Factor>> {
        self.factors.remove(name)
    }

    /// Get a factor by name.
    pub fn get(&self, name: &str) -> Option<&dyn Factor> {
        self.factors.get(name).map(|f| f.as_ref())
    }

    /// Get factors by category.
    pub fn by_category(&self, category: FactorCategory) -> Vec<&dyn Factor> {
        self.factors
            .values()
            .filter(|f| f.category() == category)
            .map(|f| f.as_ref())
            .collect()
    }

    /// Metadata of one factor.
    pub fn info(&self, name: &str) -> Option<FactorInfo> {
        self.get(name).map(FactorInfo::of)
    }

    /// Get all factor metadata, in name order.
    pub fn all_info(&self) -> Vec<FactorInfo> {
        self.factors.values().map(|f| FactorInfo::of(f.as_ref())).collect()
    }

    /// Get all factor names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.factors.keys().map(|s| s.as_str()).collect()
    }

    /// Load the inputs of one factor and evaluate it for `date`.
    pub fn compute(
        &self,
        name: &str,
        loader: &dyn WindowLoader,
        date: NaiveDate,
        assets: &[Asset],
    ) -> Result<Array1<f64>> {
        let factor = self
            .get(name)
            .ok_or_else(|| FactorError::NotFound(name.to_string()))?;
        evaluate(factor, loader, date, assets)
    }

    /// Compute all factors for a given date.
    ///
    /// Returns a DataFrame with a `symbol` column followed by one `f64`
    /// column per factor in name order, one row per asset.
    pub fn compute_all(
        &self,
        loader: &dyn WindowLoader,
        date: NaiveDate,
        assets: &[Asset],
    ) -> Result<DataFrame> {
        info!(%date, factors = self.len(), assets = assets.len(), "computing factors");

        let mut columns: Vec<Column> = Vec::with_capacity(self.len() + 1);
        columns.push(Column::new(
            "symbol".into(),
            assets.iter().map(|a| a.symbol.as_str()).collect::<Vec<_>>(),
        ));
        for (name, factor) in &self.factors {
            let values = evaluate(factor.as_ref(), loader, date, assets)?;
            columns.push(Column::new(name.as_str().into(), values.to_vec()));
        }

        Ok(DataFrame::new(columns)?)
    }

    /// Number of registered factors.
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}

fn evaluate(
    factor: &dyn Factor,
    loader: &dyn WindowLoader,
    date: NaiveDate,
    assets: &[Asset],
) -> Result<Array1<f64>> {
    let inputs = loader.load_inputs(factor, date, assets)?;
    let values = factor.evaluate(date, assets, &inputs)?;
    debug!(
        factor = factor.name(),
        missing = count_missing(values.view(), factor.missing_value()),
        "evaluated factor"
    );
    Ok(values)
}

/// Outputs equal to `missing`, with NaN equal to NaN.
fn count_missing(values: ArrayView1<'_, f64>, missing: f64) -> usize {
    values
        .iter()
        .filter(|&&v| v == missing || (v.is_nan() && missing.is_nan()))
        .count()
}
