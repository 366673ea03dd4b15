//! Liquidity factors - measures of trading costs
//!
//! Liquidity factors capture the impact of trading on prices and the
//! liquidity premium earned by holders of less liquid securities. They share
//! a missing value of 0: no usable trading activity reads as no liquidity.

pub mod amihud;
pub mod trading_days;
pub mod turnover;

pub use amihud::{Illiquidity, IlliquidityConfig};
pub use trading_days::{TradingDays, TradingDaysConfig};
pub use turnover::{AbnormalTurnover, AbnormalTurnoverConfig, Turnover, TurnoverConfig};
