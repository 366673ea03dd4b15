//! Value factors - relative valuation
//!
//! Valuation multiples are guarded ratios of two single-day inputs. Yields
//! and the accounting ratios are plain ratios; [`Product`] combines two
//! single-day inputs multiplicatively.

pub mod positive_divide;
pub mod product;
pub mod ratio;

pub use positive_divide::PositiveDivide;
pub use product::Product;
pub use ratio::Ratio;
