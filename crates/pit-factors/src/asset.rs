//! Asset identifiers.

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// Stable security identifier.
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
    From,
    Into,
    Serialize,
    Deserialize,
)]
pub struct Sid(pub u64);

/// A tradable instrument: equity, index or futures contract.
///
/// Created by asset metadata ingestion and never mutated here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Asset {
    /// Stable identifier
    pub sid: Sid,
    /// Ticker or contract symbol, e.g. `000001.SZ` or `A1905.XDCE`
    pub symbol: String,
    /// Product root for futures contracts, e.g. `A`
    pub root_symbol: Option<String>,
}

impl Asset {
    /// Create an equity-like asset without a root symbol.
    pub fn new(sid: impl Into<Sid>, symbol: impl Into<String>) -> Self {
        Self {
            sid: sid.into(),
            symbol: symbol.into(),
            root_symbol: None,
        }
    }

    /// Create a futures contract belonging to `root_symbol`.
    pub fn future(
        sid: impl Into<Sid>,
        symbol: impl Into<String>,
        root_symbol: impl Into<String>,
    ) -> Self {
        Self {
            sid: sid.into(),
            symbol: symbol.into(),
            root_symbol: Some(root_symbol.into()),
        }
    }
}
