/// Concentration classification and worst-case severity resolution.
///
/// Both functions here are pure: no I/O, no mutation, deterministic for
/// a given input. Call volume is small (six classifications per query,
/// a few hundred for the background grid), so no memoization.

use crate::aqi::bands::{self, Category, UNKNOWN_COLOR};
use crate::model::{Pollutant, PollutantReading};

/// Classify a concentration into an AQI category for the given pollutant.
///
/// Scans the pollutant's band table in increasing bound order and
/// returns the first band whose inclusive upper bound covers the value.
/// The last band is infinite, so every finite non-negative concentration
/// classifies.
///
/// Returns `None` for NaN or negative input rather than letting bad
/// values fall through the comparisons into Hazardous.
pub fn classify(concentration: f64, pollutant: Pollutant) -> Option<Category> {
    if concentration.is_nan() || concentration < 0.0 {
        return None;
    }
    bands::bands_for(pollutant)
        .iter()
        .find(|band| concentration <= band.upper_inclusive)
        .map(|band| band.category)
}

/// The resolved worst-case severity for a reading.
///
/// `category` is `None` when the reading contained no classifiable
/// value — surfaced as "unknown" rather than defaulting to Good, so
/// missing data is never presented as clean air.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverallAqi {
    pub category: Option<Category>,
    pub color: &'static str,
}

impl OverallAqi {
    pub fn label(&self) -> &'static str {
        self.category
            .map(Category::label)
            .unwrap_or(bands::UNKNOWN_LABEL)
    }
}

/// Reduce a reading to its single worst pollutant category.
///
/// Species absent from the reading (or carrying invalid values) are
/// skipped — they neither raise nor lower the result. The output color
/// is always the resolved category's own color.
///
/// Used for grid markers only. Single-point query results carry an
/// authoritative category from the backend and must not be overridden
/// by this resolver.
pub fn resolve_overall(reading: &PollutantReading) -> OverallAqi {
    let worst = reading
        .iter()
        .filter_map(|(pollutant, value)| value.and_then(|v| classify(v, pollutant)))
        .max();

    OverallAqi {
        category: worst,
        color: worst.map(Category::color).unwrap_or(UNKNOWN_COLOR),
    }
}
