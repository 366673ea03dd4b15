//! Momentum factors - measures of trend persistence
//!
//! Momentum factors capture the tendency of assets that performed well over
//! the past year to keep outperforming, excluding the most recent month.

pub mod price_momentum;

pub use price_momentum::{Momentum, MomentumConfig};
