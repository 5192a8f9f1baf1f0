/// Background grid overlay.
///
/// Derives the marker color for every point of the fetched grid dataset
/// by folding the severity resolver over each point's reading. Pure
/// presentation derivation — no new classification logic lives here.

use crate::aqi::{self, Category};
use crate::model::GridPoint;

/// One renderable grid marker.
#[derive(Debug, Clone, PartialEq)]
pub struct GridMarker {
    pub latitude: f64,
    pub longitude: f64,
    /// `None` when the point had no classifiable reading.
    pub category: Option<Category>,
    pub color: &'static str,
}

impl GridMarker {
    pub fn category_label(&self) -> &'static str {
        self.category
            .map(Category::label)
            .unwrap_or(aqi::UNKNOWN_LABEL)
    }
}

/// Resolve every grid point to its worst-case category and color,
/// preserving source order (render order only, no semantic meaning).
pub fn colorize(grid: &[GridPoint]) -> Vec<GridMarker> {
    grid.iter()
        .map(|point| {
            let overall = aqi::resolve_overall(&point.reading);
            GridMarker {
                latitude: point.latitude,
                longitude: point.longitude,
                category: overall.category,
                color: overall.color,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PollutantReading;

    fn point(latitude: f64, longitude: f64, reading: PollutantReading) -> GridPoint {
        GridPoint {
            latitude,
            longitude,
            reading,
        }
    }

    #[test]
    fn test_colorize_maps_each_point() {
        let grid = vec![
            point(
                10.0,
                20.0,
                PollutantReading {
                    pm25: Some(5.0), // Good
                    ..Default::default()
                },
            ),
            point(
                15.0,
                25.0,
                PollutantReading {
                    pm25: Some(200.0), // Very Unhealthy
                    ..Default::default()
                },
            ),
            point(20.0, 30.0, PollutantReading::default()),
        ];

        let markers = colorize(&grid);
        assert_eq!(markers.len(), 3);

        assert_eq!(markers[0].category, Some(Category::Good));
        assert_eq!(markers[0].color, "#00e400");

        assert_eq!(markers[1].category, Some(Category::VeryUnhealthy));
        assert_eq!(markers[1].color, "#8f3f97");

        // No data is surfaced as unknown, not as clean air.
        assert_eq!(markers[2].category, None);
        assert_eq!(markers[2].color, aqi::UNKNOWN_COLOR);
        assert_eq!(markers[2].category_label(), "Unknown");
    }

    #[test]
    fn test_colorize_preserves_source_order() {
        let grid: Vec<GridPoint> = (0..5)
            .map(|i| point(i as f64, -(i as f64), PollutantReading::default()))
            .collect();
        let markers = colorize(&grid);
        for (i, marker) in markers.iter().enumerate() {
            assert_eq!(marker.latitude, i as f64);
        }
    }
}
