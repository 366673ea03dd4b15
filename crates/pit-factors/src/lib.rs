#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/pit-factors/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod asset;
pub mod builtin;
pub mod columns;
pub mod error;
pub mod extract;
pub mod futures;
pub mod growth;
pub mod latest;
pub mod liquidity;
pub mod loader;
pub mod momentum;
pub mod registry;
pub mod size;
pub mod standardize;
pub mod traits;
pub mod value;
pub mod volatility;
pub mod window;

mod stats;

// Re-export core types
pub use asset::{Asset, Sid};
pub use columns::{ColumnKind, ColumnRef, ColumnRegistry, DataSet};
pub use error::{FactorError, Result};
pub use extract::{QuarterlySeries, extract_series, extract_window, extract_window_checked};
pub use futures::{ChainPredicates, ContractSymbol, DeliveryMonth, parse_delivery_month};
pub use latest::Latest;
pub use loader::{FrameLoader, WindowLoader};
pub use registry::{FactorCategory, FactorInfo, FactorRegistry};
pub use standardize::{Standardization, standardize_frame, winsorize_frame};
pub use traits::{ConfigurableFactor, DataFrequency, Factor, FactorConfig};
pub use window::{FactorInputs, InputWindow};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
