//! Volatility factors - measures of risk
//!
//! Volatility factors capture systematic risk exposure (beta), total risk
//! (annualized volatility) and exposure to extreme daily moves.

pub mod beta;
pub mod historical_vol;
pub mod max_returns;

pub use beta::{SimpleBeta, SimpleBetaConfig};
pub use historical_vol::{AnnualizedVolatility, AnnualizedVolatilityConfig};
pub use max_returns::{MaxReturns, MaxReturnsConfig};
