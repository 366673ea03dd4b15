//! Growth factors - measures of growth rates
//!
//! Growth factors compare point-in-time fundamental disclosures across
//! reporting periods. Both read a trailing daily window and reduce it to
//! distinct disclosures before looking back.

pub mod previous_year;
pub mod yoy_growth;

pub use previous_year::{PreviousYear, PreviousYearConfig};
pub use yoy_growth::{YoYGrowth, YoYGrowthConfig};

/// Distinct disclosures needed to look back `nyears` years of quarters.
pub(crate) const fn observations_required(nyears: usize) -> usize {
    4 * nyears + 1
}
