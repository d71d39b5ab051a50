//! AQI library
//!
//! Converts pollutant concentrations into EPA Air Quality Index values,
//! categories, display colors and health guidance. All tables are static
//! and immutable, so every function here is safe to call from any thread.

pub mod breakpoints;
pub mod category;
pub mod error;
pub mod pollutant;
pub mod recommendations;

use serde::Serialize;

pub use breakpoints::{lookup, Breakpoint};
pub use category::Category;
pub use error::{AqiError, Result};
pub use pollutant::Pollutant;
pub use recommendations::recommendations_for;

/// Index, category and guidance for a single concentration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AqiResult {
    pub index: u16,
    pub category: Category,
    pub color: &'static str,
    pub recommendations: Vec<&'static str>,
}

/// Calculate the AQI for a pollutant concentration.
///
/// # Arguments
///
/// * `pollutant` - Which breakpoint table to use
/// * `concentration` - Concentration in the table's units
///
/// # Returns
///
/// The interpolated index, rounded half to even. A concentration of exactly
/// zero short-circuits to 0. Anything the tables do not cover (negative,
/// NaN, beyond the last segment) yields 0 rather than an error.
///
/// Values that fall between two published segments (PM2.5 9.05) take the
/// lower segment's top index. A plain table lookup would report 0 for them,
/// so the index would drop back to 0 between segments. Taking the lower top
/// index keeps the index non-decreasing in concentration.
///
/// # Examples
///
/// ```
/// use aqf_aqi::{index_for, Pollutant};
///
/// assert_eq!(index_for(Pollutant::Pm25, 9.0), 50);
/// assert_eq!(index_for(Pollutant::Pm25, 9.1), 51);
/// assert_eq!(index_for(Pollutant::Pm25, 45.0), 124);
/// ```
pub fn index_for(pollutant: Pollutant, concentration: f64) -> u16 {
    if concentration == 0.0 {
        return 0;
    }

    if let Some(bp) = breakpoints::lookup(pollutant, concentration) {
        return bp.interpolate(concentration);
    }

    match breakpoints::gap_floor(pollutant, concentration) {
        Some(bp) => bp.index.1,
        None => {
            log::warn!(
                "{} concentration {} is outside every breakpoint, reporting AQI 0",
                pollutant,
                concentration
            );
            0
        }
    }
}

/// Category for an AQI index. See [`Category::from_index`].
pub fn category_for(index: u16) -> Category {
    Category::from_index(index)
}

/// Index, category, color and guidance in one call.
///
/// Fails only when no guidance exists for the pollutant.
pub fn classify(pollutant: Pollutant, concentration: f64) -> Result<AqiResult> {
    let index = index_for(pollutant, concentration);
    let category = category_for(index);
    let recommendations = recommendations_for(pollutant, category)?.to_vec();
    Ok(AqiResult {
        index,
        category,
        color: category.color(),
        recommendations,
    })
}
