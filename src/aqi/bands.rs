/// Category band registry for the air quality viewer.
///
/// Defines the canonical per-pollutant threshold bands mapping a raw
/// concentration to one of the six AQI categories, plus the category
/// color palette. This is the single source of truth for thresholds —
/// other modules should look bands up from here rather than hardcoding
/// breakpoints.
///
/// Thresholds follow US EPA-style breakpoints. Units: µg/m³ for
/// NO2/PM2.5/PM10/O3/SO2, mg/m³ for CO.

use crate::model::Pollutant;

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// AQI categories in ascending order of severity.
///
/// The derived `Ord` is the severity order; it is relied on by the
/// severity resolver, so variant order here is load-bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Good,
    Moderate,
    UnhealthyForSensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

/// Marker color used when no category can be resolved (no data, or
/// invalid concentrations only).
pub const UNKNOWN_COLOR: &str = "#6b7280";

/// Display label used when no category can be resolved.
pub const UNKNOWN_LABEL: &str = "Unknown";

impl Category {
    /// Display label, matching the strings the backend reports in
    /// `overallAqiCategory`.
    pub fn label(self) -> &'static str {
        match self {
            Category::Good => "Good",
            Category::Moderate => "Moderate",
            Category::UnhealthyForSensitive => "Unhealthy for Sensitive Groups",
            Category::Unhealthy => "Unhealthy",
            Category::VeryUnhealthy => "Very Unhealthy",
            Category::Hazardous => "Hazardous",
        }
    }

    /// Display color (hex RGB). Presentation attribute only — never used
    /// in severity comparisons.
    pub fn color(self) -> &'static str {
        match self {
            Category::Good => "#00e400",
            Category::Moderate => "#ffff00",
            Category::UnhealthyForSensitive => "#ff7e00",
            Category::Unhealthy => "#ff0000",
            Category::VeryUnhealthy => "#8f3f97",
            Category::Hazardous => "#7e0023",
        }
    }

    /// Inverse of `label`, for interpreting backend-reported categories.
    pub fn from_label(label: &str) -> Option<Category> {
        match label {
            "Good" => Some(Category::Good),
            "Moderate" => Some(Category::Moderate),
            "Unhealthy for Sensitive Groups" => Some(Category::UnhealthyForSensitive),
            "Unhealthy" => Some(Category::Unhealthy),
            "Very Unhealthy" => Some(Category::VeryUnhealthy),
            "Hazardous" => Some(Category::Hazardous),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Band tables
// ---------------------------------------------------------------------------

/// One concentration interval mapped to a category. The interval's lower
/// bound is implied by the previous band (or zero for the first).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryBand {
    /// Upper bound, inclusive. The last band of every table is infinite.
    pub upper_inclusive: f64,
    pub category: Category,
}

const fn band(upper_inclusive: f64, category: Category) -> CategoryBand {
    CategoryBand {
        upper_inclusive,
        category,
    }
}

static NO2_BANDS: [CategoryBand; 6] = [
    band(80.0, Category::Good),
    band(160.0, Category::Moderate),
    band(240.0, Category::UnhealthyForSensitive),
    band(320.0, Category::Unhealthy),
    band(400.0, Category::VeryUnhealthy),
    band(f64::INFINITY, Category::Hazardous),
];

static PM25_BANDS: [CategoryBand; 6] = [
    band(12.0, Category::Good),
    band(35.4, Category::Moderate),
    band(55.4, Category::UnhealthyForSensitive),
    band(150.4, Category::Unhealthy),
    band(250.4, Category::VeryUnhealthy),
    band(f64::INFINITY, Category::Hazardous),
];

static PM10_BANDS: [CategoryBand; 6] = [
    band(54.0, Category::Good),
    band(154.0, Category::Moderate),
    band(254.0, Category::UnhealthyForSensitive),
    band(354.0, Category::Unhealthy),
    band(424.0, Category::VeryUnhealthy),
    band(f64::INFINITY, Category::Hazardous),
];

static O3_BANDS: [CategoryBand; 6] = [
    band(100.0, Category::Good),
    band(160.0, Category::Moderate),
    band(200.0, Category::UnhealthyForSensitive),
    band(240.0, Category::Unhealthy),
    band(400.0, Category::VeryUnhealthy),
    band(f64::INFINITY, Category::Hazardous),
];

static SO2_BANDS: [CategoryBand; 6] = [
    band(75.0, Category::Good),
    band(180.0, Category::Moderate),
    band(300.0, Category::UnhealthyForSensitive),
    band(600.0, Category::Unhealthy),
    band(800.0, Category::VeryUnhealthy),
    band(f64::INFINITY, Category::Hazardous),
];

// CO in mg/m³, not µg/m³.
static CO_BANDS: [CategoryBand; 6] = [
    band(4.4, Category::Good),
    band(9.4, Category::Moderate),
    band(12.4, Category::UnhealthyForSensitive),
    band(15.4, Category::Unhealthy),
    band(30.4, Category::VeryUnhealthy),
    band(f64::INFINITY, Category::Hazardous),
];

/// The ordered band table for a pollutant. Bounds are strictly
/// increasing and the final band is infinite, so the table covers
/// [0, ∞) with no gaps or overlaps.
pub fn bands_for(pollutant: Pollutant) -> &'static [CategoryBand] {
    match pollutant {
        Pollutant::No2 => &NO2_BANDS,
        Pollutant::Pm25 => &PM25_BANDS,
        Pollutant::Pm10 => &PM10_BANDS,
        Pollutant::O3 => &O3_BANDS,
        Pollutant::So2 => &SO2_BANDS,
        Pollutant::Co => &CO_BANDS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_order() {
        assert!(Category::Good < Category::Moderate);
        assert!(Category::Moderate < Category::UnhealthyForSensitive);
        assert!(Category::UnhealthyForSensitive < Category::Unhealthy);
        assert!(Category::Unhealthy < Category::VeryUnhealthy);
        assert!(Category::VeryUnhealthy < Category::Hazardous);
    }

    #[test]
    fn test_band_tables_are_well_formed() {
        for pollutant in Pollutant::ALL {
            let bands = bands_for(pollutant);
            assert_eq!(bands.len(), 6, "{}: six bands expected", pollutant.label());

            // One band per category, in severity order.
            for (i, band) in bands.iter().enumerate() {
                assert_eq!(
                    band.category as usize, i,
                    "{}: bands must ascend through every category",
                    pollutant.label()
                );
            }

            // Strictly increasing bounds, infinite tail.
            for pair in bands.windows(2) {
                assert!(
                    pair[0].upper_inclusive < pair[1].upper_inclusive,
                    "{}: bounds must be strictly increasing",
                    pollutant.label()
                );
            }
            assert!(bands.last().unwrap().upper_inclusive.is_infinite());
        }
    }

    #[test]
    fn test_label_roundtrip() {
        for category in [
            Category::Good,
            Category::Moderate,
            Category::UnhealthyForSensitive,
            Category::Unhealthy,
            Category::VeryUnhealthy,
            Category::Hazardous,
        ] {
            assert_eq!(Category::from_label(category.label()), Some(category));
        }
        assert_eq!(Category::from_label("Unknown"), None);
    }
}
