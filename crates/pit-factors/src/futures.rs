//! Delivery-month eligibility for continuous futures chains.
//!
//! A chain builder walks the listed contracts of a root symbol and asks
//! [`ChainPredicates::is_eligible`] whether each one belongs in the chain.
//! Roots without a configured rule accept every contract; configured roots
//! accept only contracts whose delivery month is in their set.
//!
//! Contract symbols are `ROOT` + `YY` + `MM`, optionally followed by an
//! exchange suffix after a `.`. Roots compare case-insensitively:
//!
//! ```
//! use pit_factors::futures::ChainPredicates;
//!
//! let predicates = ChainPredicates::with_defaults();
//! assert!(predicates.is_eligible("A", "A1905.XDCE").unwrap());
//! assert!(!predicates.is_eligible("A", "A1903.XDCE").unwrap());
//! ```

use crate::{Result, asset::Asset, error::FactorError};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeSet, HashMap},
    str::FromStr,
};

/// Month of delivery, 1 through 12. Displays as a two-digit code.
#[derive(
    Debug,
    Display,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[display("{_0:02}")]
#[serde(try_from = "String", into = "String")]
pub struct DeliveryMonth(u8);

impl DeliveryMonth {
    /// Validate a month number.
    pub fn new(month: u8) -> Result<Self> {
        if (1..=12).contains(&month) {
            Ok(Self(month))
        } else {
            Err(FactorError::InvalidConfig(format!(
                "delivery month {month} outside 1..=12"
            )))
        }
    }

    /// Month number.
    pub const fn month(self) -> u8 {
        self.0
    }
}

impl FromStr for DeliveryMonth {
    type Err = FactorError;

    /// Parse a two-digit code such as `"06"`.
    fn from_str(code: &str) -> Result<Self> {
        if code.len() != 2 || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FactorError::InvalidConfig(format!(
                "delivery code {code:?} is not two digits"
            )));
        }
        let month = code
            .parse::<u8>()
            .map_err(|e| FactorError::InvalidConfig(format!("delivery code {code:?}: {e}")))?;
        Self::new(month)
    }
}

impl TryFrom<String> for DeliveryMonth {
    type Error = FactorError;

    fn try_from(code: String) -> Result<Self> {
        code.parse()
    }
}

impl From<DeliveryMonth> for String {
    fn from(month: DeliveryMonth) -> Self {
        month.to_string()
    }
}

/// A contract symbol split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractSymbol {
    /// Product root in ASCII uppercase, e.g. `JM` for `jm2201`
    pub root: String,
    /// Two-digit delivery year
    pub year: u8,
    /// Delivery month
    pub month: DeliveryMonth,
}

impl ContractSymbol {
    /// Parse `ROOT` + `YY` + `MM`, ignoring anything after the first `.`.
    pub fn parse(symbol: &str) -> Result<Self> {
        let malformed = |reason| FactorError::MalformedSymbol {
            symbol: symbol.to_string(),
            reason,
        };

        let code = symbol.split('.').next().unwrap_or_default();
        let digits_at = code
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| malformed("no delivery digits"))?;
        let (root, digits) = code.split_at(digits_at);

        if root.is_empty() {
            return Err(malformed("missing root symbol"));
        }
        if !root.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(malformed("root symbol must be letters"));
        }
        if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed("expected four digits YYMM"));
        }

        let (yy, mm) = digits.split_at(2);
        let year = yy.parse().map_err(|_| malformed("bad delivery year"))?;
        let month = mm
            .parse::<u8>()
            .ok()
            .and_then(|m| DeliveryMonth::new(m).ok())
            .ok_or_else(|| malformed("delivery month outside 01..12"))?;

        Ok(Self {
            root: root.to_ascii_uppercase(),
            year,
            month,
        })
    }
}

/// Delivery month of a contract symbol such as `A1905.XDCE`.
pub fn parse_delivery_month(symbol: &str) -> Result<DeliveryMonth> {
    ContractSymbol::parse(symbol).map(|contract| contract.month)
}

const CHAIN_159: &[&str] = &["C", "CS", "I", "J", "JD", "JM", "L", "M", "P", "PP", "V", "Y"];

/// Per-root sets of delivery months allowed into a continuous chain.
///
/// Built once at startup and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainPredicates {
    roots: HashMap<String, BTreeSet<DeliveryMonth>>,
}

impl ChainPredicates {
    /// Table with no configured roots: every contract is eligible.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(root, codes)` pairs, validating every code.
    pub fn from_codes<I, R, C, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (R, C)>,
        R: Into<String>,
        C: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut predicates = Self::new();
        for (root, codes) in entries {
            predicates.allow(root, codes)?;
        }
        Ok(predicates)
    }

    /// Parse a JSON object mapping root symbols to arrays of two-digit codes.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, Vec<String>> = serde_json::from_str(json)?;
        Self::from_codes(raw)
    }

    /// Table used for the Chinese commodity exchanges.
    ///
    /// Financial futures (CFFEX) trade in every month and have no entry.
    pub fn with_defaults() -> Self {
        let mut roots: HashMap<String, BTreeSet<DeliveryMonth>> = HashMap::new();
        let mut set = |root: &str, months: &[u8]| {
            let months = months.iter().map(|&m| DeliveryMonth(m)).collect();
            roots.insert(root.to_string(), months);
        };

        // Semiannual cycle; nearby months are listed but thinly traded.
        set("AG", &[6, 12]);
        set("AU", &[6, 12]);
        set("AP", &[1, 5, 10]);
        set("A", &[1, 5, 7, 9]);
        set("B", &[1, 3, 5, 7, 9, 11]);
        set("EG", &[6, 9]);
        set("BU", &[3, 6, 9, 12]);
        for root in CHAIN_159 {
            set(root, &[1, 5, 9]);
        }

        Self { roots }
    }

    /// Replace the allowed months of `root`.
    pub fn allow<R, C, S>(&mut self, root: R, codes: C) -> Result<&mut Self>
    where
        R: Into<String>,
        C: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let months = codes
            .into_iter()
            .map(|code| code.as_ref().parse())
            .collect::<Result<BTreeSet<DeliveryMonth>>>()?;
        self.roots.insert(root.into().to_ascii_uppercase(), months);
        Ok(self)
    }

    /// Allowed months for `root`, if configured.
    pub fn months(&self, root: &str) -> Option<&BTreeSet<DeliveryMonth>> {
        self.roots.get(&root.to_ascii_uppercase())
    }

    /// Whether `root` has a rule.
    pub fn is_configured(&self, root: &str) -> bool {
        self.months(root).is_some()
    }

    /// Number of configured roots.
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Whether no root is configured.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Whether `contract` may join the continuous chain of `root`.
    ///
    /// The symbol is validated even when `root` has no rule.
    pub fn is_eligible(&self, root: &str, contract: &str) -> Result<bool> {
        let month = parse_delivery_month(contract)?;
        Ok(self
            .months(root)
            .is_none_or(|allowed| allowed.contains(&month)))
    }

    /// [`is_eligible`](Self::is_eligible) for a futures asset.
    ///
    /// Falls back to the root parsed from the symbol when the asset has none.
    pub fn is_eligible_asset(&self, asset: &Asset) -> Result<bool> {
        match &asset.root_symbol {
            Some(root) => self.is_eligible(root, &asset.symbol),
            None => {
                let contract = ContractSymbol::parse(&asset.symbol)?;
                self.is_eligible(&contract.root, &asset.symbol)
            }
        }
    }
}
