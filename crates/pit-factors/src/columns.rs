//! Named input columns and their registry.
//!
//! Every factor input is a [`ColumnRef`]: a field of either the daily pricing
//! dataset or the point-in-time fundamentals dataset. Fundamental fields come
//! in pairs, the disclosed value and its as-of date, addressed by the
//! `<field>` and `<field>_asof` naming convention.

use crate::{FactorError, Result};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Suffix addressing the as-of column of a fundamental field.
pub const ASOF_SUFFIX: &str = "_asof";

/// Daily bar and equity metric fields.
pub const PRICING_FIELDS: &[&str] = &[
    "open",
    "high",
    "low",
    "close",
    "volume",
    "amount",
    "vwap",
    "turnover",
    "returns",
    "market_return",
];

/// Fundamental indicator fields.
pub const FUNDAMENTAL_FIELDS: &[&str] = &[
    "mkt_cap_ard",
    "mkt_cap_ashare",
    "net_profit_is",
    "net_cash_flows_oper_act",
    "tot_oper_rev",
    "tot_oper_cost",
    "tot_equity",
    "tot_assets",
    "tot_liab",
    "tot_cur_assets",
    "tot_cur_liab",
    "monetary_cap",
    "cash_recp_sg_and_rs",
    "acct_rcv",
    "inventories",
    "opprofit",
    "eps_basic",
    "shares_outstanding",
    "float_a_shares",
];

/// Dataset a column belongs to.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataSet {
    /// Calendar-aligned daily bars
    Pricing,
    /// Point-in-time fundamental disclosures
    Fundamentals,
}

/// Whether a column carries values or disclosure dates.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Numeric values
    Value,
    /// Disclosure (as-of) dates
    AsOf,
}

/// Reference to one input column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    /// Owning dataset
    pub dataset: DataSet,
    /// Field name without suffix
    pub field: String,
    /// Value or as-of column
    pub kind: ColumnKind,
}

impl ColumnRef {
    /// Pricing value column.
    pub fn pricing(field: impl Into<String>) -> Self {
        Self {
            dataset: DataSet::Pricing,
            field: field.into(),
            kind: ColumnKind::Value,
        }
    }

    /// Fundamental value column.
    pub fn fundamental(field: impl Into<String>) -> Self {
        Self {
            dataset: DataSet::Fundamentals,
            field: field.into(),
            kind: ColumnKind::Value,
        }
    }

    /// Fundamental as-of column.
    pub fn asof(field: impl Into<String>) -> Self {
        Self {
            dataset: DataSet::Fundamentals,
            field: field.into(),
            kind: ColumnKind::AsOf,
        }
    }

    /// Column name as it appears in a loader frame.
    pub fn name(&self) -> String {
        match self.kind {
            ColumnKind::Value => self.field.clone(),
            ColumnKind::AsOf => format!("{}{ASOF_SUFFIX}", self.field),
        }
    }
}

/// Registry of the columns known at configuration time.
///
/// Populated once at startup; lookups are typed and never fall back to
/// guessing.
#[derive(Debug, Clone, Default)]
pub struct ColumnRegistry {
    pricing: BTreeSet<String>,
    fundamentals: BTreeSet<String>,
}

impl ColumnRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the standard pricing and fundamental fields.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for field in PRICING_FIELDS {
            registry.add_pricing(*field);
        }
        for field in FUNDAMENTAL_FIELDS {
            registry.add_fundamental(*field);
        }
        registry
    }

    /// Register a pricing field.
    pub fn add_pricing(&mut self, field: impl Into<String>) {
        self.pricing.insert(field.into());
    }

    /// Register a fundamental field; its as-of column comes with it.
    pub fn add_fundamental(&mut self, field: impl Into<String>) {
        self.fundamentals.insert(field.into());
    }

    /// Resolve a column name.
    ///
    /// `<field>_asof` resolves to the as-of column of a fundamental field.
    pub fn lookup(&self, name: &str) -> Result<ColumnRef> {
        if self.pricing.contains(name) {
            return Ok(ColumnRef::pricing(name));
        }
        if self.fundamentals.contains(name) {
            return Ok(ColumnRef::fundamental(name));
        }
        match name.strip_suffix(ASOF_SUFFIX) {
            Some(field) if self.fundamentals.contains(field) => Ok(ColumnRef::asof(field)),
            _ => Err(FactorError::UnknownColumn(name.to_string())),
        }
    }

    /// Whether `column` is registered.
    pub fn contains(&self, column: &ColumnRef) -> bool {
        match column.dataset {
            DataSet::Pricing => {
                column.kind == ColumnKind::Value && self.pricing.contains(&column.field)
            }
            DataSet::Fundamentals => self.fundamentals.contains(&column.field),
        }
    }

    /// All addressable column names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.pricing.iter().cloned().collect();
        for field in &self.fundamentals {
            names.push(field.clone());
            names.push(format!("{field}{ASOF_SUFFIX}"));
        }
        names.sort();
        names
    }
}
