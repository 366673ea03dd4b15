//! Size factors - market capitalization

pub mod log_mcap;

pub use log_mcap::Size;
